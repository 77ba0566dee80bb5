//! Matching domain models.
//!
//! Provides the data types the matcher works on: recurring weekly windows,
//! the intervals they cover, and the two kinds of participants.
//!
//! # Roles
//!
//! | Type | Holds | Buffered |
//! |------|-------|----------|
//! | [`Team`] | meeting windows | yes, by the team's travel time |
//! | [`Mentor`] | free windows | no |

mod interval;
mod mentor;
mod team;
mod window;

pub use interval::{contains, Interval, MINUTES_PER_DAY};
pub use mentor::Mentor;
pub use team::Team;
pub use window::{format_time_of_day, parse_time_of_day, Weekday, WeeklyTimeWindow};
