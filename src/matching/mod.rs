//! Mentor suitability matching.
//!
//! `Classifier` checks every team against every mentor and sorts mentors
//! into suitable and close-call sets. `Journey` adds an optional travel-speed
//! check for teams whose distance is known.
//!
//! The containment predicate itself lives with the models
//! ([`contains`](crate::models::contains)) and is re-exported here.

mod classifier;
mod journey;

pub use crate::models::contains;
pub use classifier::{
    teams_by_mentor, Classifier, ClassifierConfig, TeamMatch, DEFAULT_CLOSE_CALL_TOLERANCE_MIN,
};
pub use journey::{Journey, DEFAULT_MAX_SPEED_KMH};
