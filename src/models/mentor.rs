//! Mentor model.
//!
//! Mentors list the weekly windows in which they are free to visit a team.
//! Free windows carry no travel buffer: the team's travel time is already
//! folded into its meeting windows.

use serde::Serialize;

use super::{Team, WeeklyTimeWindow};
use crate::error::ParseError;

/// A volunteer mentor.
#[derive(Debug, Clone, Serialize)]
pub struct Mentor {
    /// Display name, unique within a schedule.
    pub name: String,
    /// New mentor; not enough on their own to cover a team.
    pub rookie: bool,
    free_windows: Vec<WeeklyTimeWindow>,
}

impl Mentor {
    /// Creates an experienced mentor with no free time.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rookie: false,
            free_windows: Vec::new(),
        }
    }

    /// Sets the rookie flag.
    pub fn with_rookie(mut self, rookie: bool) -> Self {
        self.rookie = rookie;
        self
    }

    /// Adds a free window. Any travel buffer on it is dropped.
    pub fn with_free_window(mut self, window: WeeklyTimeWindow) -> Self {
        self.free_windows.push(window.with_travel_buffer(0));
        self
    }

    /// Parses and adds free windows in order.
    pub fn with_free_times<S: AsRef<str>>(mut self, times: &[S]) -> Result<Self, ParseError> {
        for text in times {
            self.free_windows
                .push(WeeklyTimeWindow::parse(text.as_ref())?);
        }
        Ok(self)
    }

    /// Free windows.
    pub fn free_windows(&self) -> &[WeeklyTimeWindow] {
        &self.free_windows
    }

    /// Every (meeting window, free window) pair that fits at `tolerance_min`.
    pub fn fitting_pairs<'a>(
        &'a self,
        team: &'a Team,
        tolerance_min: u16,
    ) -> impl Iterator<Item = (&'a WeeklyTimeWindow, &'a WeeklyTimeWindow)> + 'a {
        self.free_windows.iter().flat_map(move |free| {
            team.meeting_windows()
                .iter()
                .filter(move |meeting| meeting.fits_in(free, tolerance_min))
                .map(move |meeting| (meeting, free))
        })
    }

    /// Whether any of the team's meetings fits in one of these free windows.
    pub fn is_suitable_for(&self, team: &Team, tolerance_min: u16) -> bool {
        self.fitting_pairs(team, tolerance_min).next().is_some()
    }

    /// Non-arranged teams this mentor could cover, in roster order.
    pub fn find_suitable_teams<'a>(&self, teams: &'a [Team], tolerance_min: u16) -> Vec<&'a Team> {
        teams
            .iter()
            .filter(|t| !t.arranged && self.is_suitable_for(t, tolerance_min))
            .collect()
    }
}
