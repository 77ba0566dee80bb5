//! Recurring weekly time windows.
//!
//! A [`WeeklyTimeWindow`] is one interval on one named weekday, repeated
//! every week. Team meeting windows carry the team's travel time as a
//! buffer; mentor free windows carry none, since mentors state their
//! availability with their own travel already taken into account.
//!
//! # Text Form
//! `"<Weekday-prefix> HH:MM-HH:MM"`, e.g. `"Mon 18:30-20:00"`. The weekday
//! prefix is matched against full names in Monday-first order and the first
//! match wins, so `"T"` is Tuesday and `"S"` is Saturday.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use super::interval::{contains, Interval, MINUTES_PER_DAY};
use crate::error::{ParseError, ParseErrorKind};

/// Day of the week, Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All weekdays in canonical order.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Full English name.
    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }

    /// Three-letter abbreviation (`"Mon"`).
    pub fn abbrev(self) -> &'static str {
        &self.name()[..3]
    }

    /// ISO number, Monday = 1 … Sunday = 7.
    pub fn number(self) -> u8 {
        self as u8 + 1
    }

    /// Resolves a name prefix, case-insensitively. Empty prefixes never match.
    pub fn from_prefix(prefix: &str) -> Option<Weekday> {
        if prefix.is_empty() {
            return None;
        }
        let prefix = prefix.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|day| day.name().to_ascii_lowercase().starts_with(&prefix))
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        Self::ALL[day.num_days_from_monday() as usize]
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbrev())
    }
}

/// One recurring interval on one weekday, with an optional travel buffer.
///
/// Immutable once built. Invariant: `0 <= start < end <= 24:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct WeeklyTimeWindow {
    weekday: Weekday,
    start_min: i32,
    end_min: i32,
    travel_buffer_min: i32,
}

impl WeeklyTimeWindow {
    /// Creates a window from minutes since midnight.
    ///
    /// Returns `None` unless `0 <= start_min < end_min <= 1440`.
    pub fn new(weekday: Weekday, start_min: i32, end_min: i32) -> Option<Self> {
        if start_min < 0 || end_min > MINUTES_PER_DAY || start_min >= end_min {
            return None;
        }
        Some(Self {
            weekday,
            start_min,
            end_min,
            travel_buffer_min: 0,
        })
    }

    /// Parses `"<Weekday-prefix> HH:MM-HH:MM"` without a travel buffer.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        Self::parse_with_buffer(text, 0)
    }

    /// Parses a window and attaches a travel buffer in minutes.
    pub fn parse_with_buffer(text: &str, travel_buffer_min: i32) -> Result<Self, ParseError> {
        let mut parts = text.split_whitespace();
        let (day, range) = match (parts.next(), parts.next(), parts.next()) {
            (Some(day), Some(range), None) => (day, range),
            _ => return Err(ParseError::new(ParseErrorKind::Format, text)),
        };

        let weekday = Weekday::from_prefix(day).ok_or_else(|| {
            ParseError::new(ParseErrorKind::UnknownWeekday(day.to_string()), text)
        })?;

        let (start, end) = range
            .split_once('-')
            .ok_or_else(|| ParseError::new(ParseErrorKind::Format, text))?;
        let start_min = time_of_day(start, text)?;
        let end_min = time_of_day(end, text)?;

        Self::new(weekday, start_min, end_min)
            .map(|w| w.with_travel_buffer(travel_buffer_min))
            .ok_or_else(|| ParseError::new(ParseErrorKind::EmptyInterval, text))
    }

    /// Returns a copy carrying `travel_buffer_min` of travel at each end.
    pub fn with_travel_buffer(mut self, travel_buffer_min: i32) -> Self {
        self.travel_buffer_min = travel_buffer_min;
        self
    }

    /// The weekday.
    #[inline]
    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    /// Start (minutes since midnight), without buffer.
    #[inline]
    pub fn start_min(&self) -> i32 {
        self.start_min
    }

    /// End (minutes since midnight), without buffer.
    #[inline]
    pub fn end_min(&self) -> i32 {
        self.end_min
    }

    /// Travel buffer applied at each end (minutes).
    #[inline]
    pub fn travel_buffer_min(&self) -> i32 {
        self.travel_buffer_min
    }

    /// The interval as stated, ignoring the travel buffer.
    pub fn interval(&self) -> Interval {
        Interval::new(self.start_min, self.end_min)
    }

    /// `[start - buffer, end + buffer]`, not wrapped at midnight.
    pub fn effective_interval(&self) -> Interval {
        self.interval().expand(self.travel_buffer_min)
    }

    /// Whether this window fits inside `other`.
    ///
    /// Requires the same weekday and containment of the effective intervals,
    /// with `tolerance_min` of slack on both sides (see [`contains`]).
    pub fn fits_in(&self, other: &WeeklyTimeWindow, tolerance_min: u16) -> bool {
        self.weekday == other.weekday
            && contains(
                other.effective_interval(),
                self.effective_interval(),
                tolerance_min,
            )
    }
}

impl fmt::Display for WeeklyTimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}-{}",
            self.weekday,
            format_time_of_day(self.start_min),
            format_time_of_day(self.end_min)
        )
    }
}

impl FromStr for WeeklyTimeWindow {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Formats minutes since midnight as `HH:MM`.
///
/// Values outside the day are shown as-is (`24:20`), never wrapped.
pub fn format_time_of_day(minute: i32) -> String {
    let sign = if minute < 0 { "-" } else { "" };
    let minute = minute.abs();
    format!("{sign}{:02}:{:02}", minute / 60, minute % 60)
}

/// Parses a 24-hour `HH:MM` value into minutes since midnight.
///
/// `24:00` is accepted as the end of the day.
pub fn parse_time_of_day(time: &str) -> Option<i32> {
    // End of day is the one value NaiveTime cannot hold.
    if time == "24:00" {
        return Some(MINUTES_PER_DAY);
    }
    NaiveTime::parse_from_str(time, "%H:%M")
        .ok()
        .map(|t| (t.hour() * 60 + t.minute()) as i32)
}

fn time_of_day(time: &str, input: &str) -> Result<i32, ParseError> {
    parse_time_of_day(time)
        .ok_or_else(|| ParseError::new(ParseErrorKind::InvalidTime(time.to_string()), input))
}
