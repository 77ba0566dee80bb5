//! Mentor-to-team matching for the U-Engine ecosystem.
//!
//! Matches volunteer mentors to competition teams by weekly availability.
//! A mentor is suitable for a team when one of their free windows fully
//! contains one of the team's meetings, including the team's travel time.
//! Mentors that only fit with a few minutes of slack are reported as close
//! calls.
//!
//! # Modules
//!
//! - **`models`**: Domain types (`Weekday`, `WeeklyTimeWindow`, `Interval`,
//!   `Team`, `Mentor`) and the `contains` predicate
//! - **`matching`**: `Classifier` (suitable / close-call / rookie rule) and
//!   the `Journey` travel-speed check
//! - **`validation`**: Non-fatal roster diagnostics
//! - **`config`**: Schedule directory layout and JSON schema
//! - **`geo`**: Geocoding with a persisted cache, great-circle distance
//! - **`calendar`**: iCalendar import, busy → free conversion
//! - **`report`**: Text, HTML and JSON output
//!
//! # Architecture
//!
//! The matcher is pure: it reads immutable teams and mentors and produces
//! results. File access, geocoding and rendering sit around it as adapters
//! and are driven by the `u-mentor` binary.

pub mod calendar;
pub mod config;
pub mod error;
pub mod geo;
pub mod matching;
pub mod models;
pub mod report;
pub mod validation;
