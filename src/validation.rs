//! Roster checks.
//!
//! Nothing found here stops a run. Each finding is returned as a
//! [`Diagnostic`] so that building teams and mentors stays a pure data
//! transformation and the caller decides how to surface warnings. Detects:
//! - Duplicate team ids and mentor names
//! - Non-arranged teams without meeting times
//! - Non-arranged teams without travel time
//! - Mentors without free times

use std::collections::HashSet;
use std::fmt;

use crate::models::{Mentor, Team};

/// A non-fatal finding.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Finding category.
    pub kind: DiagnosticKind,
    /// Team id, mentor name or file the finding is about.
    pub subject: String,
    /// Human-readable description.
    pub message: String,
}

/// Categories of diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Two teams or two mentors share an identifier.
    DuplicateId,
    /// A team that needs a mentor has no meeting times.
    MissingMeetingTimes,
    /// A team that needs a mentor has no travel time.
    MissingTravelTime,
    /// A mentor has no free times at all.
    MissingFreeTimes,
    /// A team's distance could not be determined.
    MissingDistance,
    /// A calendar entry could not be turned into a weekly window.
    SkippedCalendarEvent,
}

impl Diagnostic {
    pub(crate) fn new(
        kind: DiagnosticKind,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            subject: subject.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.subject, self.message)
    }
}

/// Checks teams and mentors and returns every finding.
///
/// Arranged teams are exempt from the meeting and travel checks since they
/// are never matched.
pub fn check_roster(teams: &[Team], mentors: &[Mentor]) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    let mut team_ids = HashSet::new();
    for team in teams {
        if !team_ids.insert(team.id.as_str()) {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::DuplicateId,
                &team.id,
                "duplicate team id",
            ));
        }

        if team.arranged {
            continue;
        }
        if !team.has_meeting_windows() {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::MissingMeetingTimes,
                &team.id,
                "has no meeting times",
            ));
        }
        if team.travel_time_min == 0 {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::MissingTravelTime,
                &team.id,
                "has no travel time",
            ));
        }
    }

    let mut names = HashSet::new();
    for mentor in mentors {
        if !names.insert(mentor.name.as_str()) {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::DuplicateId,
                &mentor.name,
                "duplicate mentor name",
            ));
        }
        if mentor.free_windows().is_empty() {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::MissingFreeTimes,
                &mentor.name,
                "has no free times",
            ));
        }
    }

    diagnostics
}
