//! Per-team suitability classification.
//!
//! # Algorithm
//!
//! For every team that is not already arranged:
//! 1. `suitable`: mentors with a free window around a meeting at zero tolerance.
//! 2. `close_calls`: mentors that fit at the close-call tolerance, minus `suitable`.
//! 3. If every suitable mentor is a rookie, `suitable` is reported empty.
//!    Rookies stay when at least one experienced mentor is suitable.
//! 4. Optionally, a (meeting, free) pair only counts when the journeys
//!    around the meeting can be made below a speed limit (see [`Journey`]).
//!    A close call whose free window does not cover the meeting itself has
//!    no time to travel and is dropped for teams at a known distance.
//!
//! Teams are independent of each other: a mentor may be suitable for any
//! number of teams. This is a compatibility filter, not an assignment.
//!
//! # Complexity
//! O(t * m * w * f) where t=teams, m=mentors, w=meeting windows, f=free windows.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::Journey;
use crate::models::{Mentor, Team};

/// Default close-call tolerance (minutes).
pub const DEFAULT_CLOSE_CALL_TOLERANCE_MIN: u16 = 10;

/// Classification settings.
///
/// Deserializable from a schedule's `settings.json`; every field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassifierConfig {
    /// Slack in minutes for close calls.
    pub close_call_tolerance: u16,
    /// Apply the rookie-only rule to close calls too.
    pub filter_rookie_close_calls: bool,
    /// Reject pairs whose journey would need more than this speed (km/h).
    /// `None` disables the check.
    pub max_speed_kmh: Option<f64>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            close_call_tolerance: DEFAULT_CLOSE_CALL_TOLERANCE_MIN,
            filter_rookie_close_calls: false,
            max_speed_kmh: None,
        }
    }
}

impl ClassifierConfig {
    /// Sets the close-call tolerance.
    pub fn with_close_call_tolerance(mut self, minutes: u16) -> Self {
        self.close_call_tolerance = minutes;
        self
    }

    /// Applies the rookie-only rule to close calls.
    pub fn with_rookie_filtered_close_calls(mut self, filter: bool) -> Self {
        self.filter_rookie_close_calls = filter;
        self
    }

    /// Enables the travel-speed check.
    pub fn with_max_speed(mut self, kmh: f64) -> Self {
        self.max_speed_kmh = Some(kmh);
        self
    }
}

/// Classification of one team.
#[derive(Debug, Clone)]
pub struct TeamMatch<'a> {
    /// The team.
    pub team: &'a Team,
    /// Mentors that fit at zero tolerance, after the rookie rule.
    pub suitable: Vec<&'a Mentor>,
    /// Mentors that only fit with the close-call tolerance.
    pub close_calls: Vec<&'a Mentor>,
    /// Distance to the team (metres), when known.
    pub distance_m: Option<f64>,
}

impl TeamMatch<'_> {
    /// Whether no mentor at all was found.
    pub fn is_unmatched(&self) -> bool {
        self.suitable.is_empty() && self.close_calls.is_empty()
    }
}

/// Suitability classifier.
///
/// # Example
///
/// ```
/// use u_mentor::matching::{Classifier, ClassifierConfig};
/// use u_mentor::models::{Mentor, Team};
///
/// let teams = vec![Team::new("ABC")
///     .with_travel_time(15)
///     .with_meeting_times(&["Mon 14:00-15:00"])
///     .unwrap()];
/// let mentors = vec![
///     Mentor::new("Alice").with_free_times(&["Mon 13:30-15:30"]).unwrap(),
///     Mentor::new("Bob").with_rookie(true).with_free_times(&["Mon 13:50-15:10"]).unwrap(),
/// ];
///
/// let matches = Classifier::new(ClassifierConfig::default()).classify(&teams, &mentors);
/// assert_eq!(matches[0].suitable[0].name, "Alice");
/// assert_eq!(matches[0].close_calls[0].name, "Bob");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    config: ClassifierConfig,
    distances_m: HashMap<String, f64>,
}

impl Classifier {
    /// Creates a classifier.
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            config,
            distances_m: HashMap::new(),
        }
    }

    /// Sets known team distances (metres), keyed by team id.
    ///
    /// Teams without an entry are never speed-filtered.
    pub fn with_distances(mut self, distances_m: HashMap<String, f64>) -> Self {
        self.distances_m = distances_m;
        self
    }

    /// The settings in use.
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classifies every non-arranged team, in roster order.
    pub fn classify<'a>(&self, teams: &'a [Team], mentors: &'a [Mentor]) -> Vec<TeamMatch<'a>> {
        #[cfg(feature = "parallel")]
        let matches: Vec<TeamMatch<'a>> = {
            use rayon::prelude::*;
            teams
                .par_iter()
                .filter_map(|team| self.classify_team(team, mentors))
                .collect()
        };
        #[cfg(not(feature = "parallel"))]
        let matches: Vec<TeamMatch<'a>> = teams
            .iter()
            .filter_map(|team| self.classify_team(team, mentors))
            .collect();
        matches
    }

    /// Classifies one team. Returns `None` for arranged teams.
    pub fn classify_team<'a>(&self, team: &'a Team, mentors: &'a [Mentor]) -> Option<TeamMatch<'a>> {
        if team.arranged {
            return None;
        }

        let mut suitable = self.candidates(team, mentors, 0);
        let mut close_calls: Vec<&Mentor> = self
            .candidates(team, mentors, self.config.close_call_tolerance)
            .into_iter()
            .filter(|m| !suitable.iter().any(|s| std::ptr::eq(*s, *m)))
            .collect();

        drop_rookie_only(&mut suitable);
        if self.config.filter_rookie_close_calls {
            drop_rookie_only(&mut close_calls);
        }

        Some(TeamMatch {
            team,
            suitable,
            close_calls,
            distance_m: self.distances_m.get(&team.id).copied(),
        })
    }

    fn candidates<'a>(&self, team: &Team, mentors: &'a [Mentor], tolerance_min: u16) -> Vec<&'a Mentor> {
        let speed_check = self
            .config
            .max_speed_kmh
            .zip(self.distances_m.get(&team.id).copied());

        match speed_check {
            None => team.find_suitable_mentors(mentors, tolerance_min),
            Some((limit_kmh, distance_m)) => mentors
                .iter()
                .filter(|m| {
                    m.fitting_pairs(team, tolerance_min).any(|(meeting, free)| {
                        Journey::between(meeting, free).is_feasible(distance_m, limit_kmh)
                    })
                })
                .collect(),
        }
    }
}

/// Empties `mentors` if it holds only rookies.
fn drop_rookie_only(mentors: &mut Vec<&Mentor>) {
    if !mentors.is_empty() && mentors.iter().all(|m| m.rookie) {
        mentors.clear();
    }
}

/// Inverts classification results into suitable teams per mentor.
///
/// Only the `suitable` sets are considered. Every mentor is listed, in
/// roster order, even with no teams.
pub fn teams_by_mentor<'a>(
    matches: &[TeamMatch<'a>],
    mentors: &'a [Mentor],
) -> Vec<(&'a Mentor, Vec<&'a Team>)> {
    mentors
        .iter()
        .map(|mentor| {
            let teams = matches
                .iter()
                .filter(|tm| tm.suitable.iter().any(|s| std::ptr::eq(*s, mentor)))
                .map(|tm| tm.team)
                .collect();
            (mentor, teams)
        })
        .collect()
}
