//! Travel-speed feasibility.
//!
//! A free window that contains a meeting leaves some slack before the
//! meeting starts (the journey there) and after it ends (the journey back).
//! Given the distance to the team, that slack implies an average speed; a
//! pair is only usable if both journeys stay below a speed limit.
//!
//! Slack is measured against the meeting as stated, without its travel
//! buffer: the buffer is an estimate, the distance is a measurement.

use serde::{Deserialize, Serialize};

use crate::models::WeeklyTimeWindow;

/// Default speed limit (km/h) for urban travel.
pub const DEFAULT_MAX_SPEED_KMH: f64 = 50.0;

/// Slack around a meeting inside a free window, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Journey {
    /// Minutes between the free window opening and the meeting start.
    pub there_min: i32,
    /// Minutes between the meeting end and the free window closing.
    pub back_min: i32,
}

impl Journey {
    /// Slack of `meeting` inside `free`.
    pub fn between(meeting: &WeeklyTimeWindow, free: &WeeklyTimeWindow) -> Self {
        let free = free.effective_interval();
        Self {
            there_min: meeting.start_min() - free.start_min,
            back_min: free.end_min - meeting.end_min(),
        }
    }

    /// The tighter of the two journeys.
    pub fn min_journey_min(&self) -> i32 {
        self.there_min.min(self.back_min)
    }

    /// Average speed (km/h) needed for the tighter journey.
    ///
    /// `None` when there is no time to travel at all.
    pub fn max_speed_kmh(&self, distance_m: f64) -> Option<f64> {
        let minutes = self.min_journey_min();
        if minutes <= 0 {
            return None;
        }
        Some((distance_m / 1000.0) / (f64::from(minutes) / 60.0))
    }

    /// Whether both journeys can be made below `limit_kmh`.
    pub fn is_feasible(&self, distance_m: f64, limit_kmh: f64) -> bool {
        if distance_m <= 0.0 {
            return true;
        }
        self.max_speed_kmh(distance_m)
            .is_some_and(|speed| speed < limit_kmh)
    }
}
