//! Team model.
//!
//! A team meets at fixed weekly times and needs a mentor who can travel to
//! every minute of at least one of those meetings. The team's travel time is
//! attached to each meeting window as a buffer, so containment checks see
//! the meeting plus the journey at both ends.

use serde::Serialize;

use super::{Mentor, WeeklyTimeWindow};
use crate::error::ParseError;

/// A team taking part in the competition.
#[derive(Debug, Clone, Serialize)]
pub struct Team {
    /// Short team code (e.g. `"ABC"`).
    pub id: String,
    /// Already paired with a mentor; never matched.
    pub arranged: bool,
    /// Travel time to the team's venue, in minutes.
    pub travel_time_min: i32,
    /// Postcode or address of the venue, for distance lookups.
    pub postcode: Option<String>,
    meeting_windows: Vec<WeeklyTimeWindow>,
}

impl Team {
    /// Creates a team with no meetings and no travel time.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            arranged: false,
            travel_time_min: 0,
            postcode: None,
            meeting_windows: Vec::new(),
        }
    }

    /// Marks the team as already arranged.
    pub fn with_arranged(mut self, arranged: bool) -> Self {
        self.arranged = arranged;
        self
    }

    /// Sets the travel time and re-buffers every meeting window.
    pub fn with_travel_time(mut self, minutes: i32) -> Self {
        self.travel_time_min = minutes;
        for window in &mut self.meeting_windows {
            *window = window.with_travel_buffer(minutes);
        }
        self
    }

    /// Sets the venue postcode.
    pub fn with_postcode(mut self, postcode: impl Into<String>) -> Self {
        self.postcode = Some(postcode.into());
        self
    }

    /// Adds a meeting window, buffered by the team's travel time.
    pub fn with_meeting_window(mut self, window: WeeklyTimeWindow) -> Self {
        self.meeting_windows
            .push(window.with_travel_buffer(self.travel_time_min));
        self
    }

    /// Parses and adds meeting windows in order.
    pub fn with_meeting_times<S: AsRef<str>>(mut self, times: &[S]) -> Result<Self, ParseError> {
        for text in times {
            let window = WeeklyTimeWindow::parse_with_buffer(text.as_ref(), self.travel_time_min)?;
            self.meeting_windows.push(window);
        }
        Ok(self)
    }

    /// Meeting windows, each carrying the travel buffer.
    pub fn meeting_windows(&self) -> &[WeeklyTimeWindow] {
        &self.meeting_windows
    }

    /// Whether the team has any meeting windows.
    pub fn has_meeting_windows(&self) -> bool {
        !self.meeting_windows.is_empty()
    }

    /// Mentors with a free window around at least one meeting.
    ///
    /// Arranged status is not consulted here; roster order is kept.
    pub fn find_suitable_mentors<'a>(
        &self,
        mentors: &'a [Mentor],
        tolerance_min: u16,
    ) -> Vec<&'a Mentor> {
        mentors
            .iter()
            .filter(|m| m.is_suitable_for(self, tolerance_min))
            .collect()
    }
}
