//! Time-of-day intervals and the containment test.
//!
//! # Time Model
//! All times are minutes since midnight of a single weekday. Values are
//! plain integers and are never wrapped modulo 24 hours: a travel buffer
//! can push an interval below 0 or past 1440 and comparisons stay linear.
//!
//! # Containment vs. Overlap
//! A meeting has to lie *entirely* inside a free window; touching or
//! partially overlapping is not enough. [`contains`] is the only predicate
//! the matcher uses; [`Interval::overlaps`] exists for calendar arithmetic.

use serde::{Deserialize, Serialize};

/// Minutes in one day.
pub const MINUTES_PER_DAY: i32 = 24 * 60;

/// A time-of-day interval [start, end] in minutes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Interval {
    /// Interval start (minutes since midnight).
    pub start_min: i32,
    /// Interval end (minutes since midnight).
    pub end_min: i32,
}

impl Interval {
    /// Creates a new interval.
    pub fn new(start_min: i32, end_min: i32) -> Self {
        Self { start_min, end_min }
    }

    /// The whole day, 00:00 to 24:00.
    pub fn full_day() -> Self {
        Self::new(0, MINUTES_PER_DAY)
    }

    /// Duration in minutes.
    #[inline]
    pub fn duration_min(&self) -> i32 {
        self.end_min - self.start_min
    }

    /// Whether two intervals share any time. Touching ends do not overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start_min < other.end_min && other.start_min < self.end_min
    }

    /// Grows the interval by `by` minutes at both ends.
    ///
    /// A negative amount shrinks it; the result may become empty or inverted,
    /// in which case [`contains`] can never hold for it as the inner side
    /// unless the outer side is equally generous.
    #[inline]
    pub fn expand(&self, by: i32) -> Self {
        Self::new(
            self.start_min.saturating_sub(by),
            self.end_min.saturating_add(by),
        )
    }

    /// Removes every part of `self` covered by `blocked`.
    ///
    /// Returns the remaining pieces in ascending order. Blocked intervals
    /// may overlap each other and need not be sorted.
    pub fn subtract(&self, blocked: &[Interval]) -> Vec<Interval> {
        let mut cuts: Vec<Interval> = blocked
            .iter()
            .filter(|b| b.overlaps(self))
            .copied()
            .collect();
        cuts.sort_by_key(|b| b.start_min);

        let mut free = Vec::new();
        let mut cursor = self.start_min;
        for cut in cuts {
            if cut.start_min > cursor {
                free.push(Interval::new(cursor, cut.start_min));
            }
            cursor = cursor.max(cut.end_min);
        }
        if cursor < self.end_min {
            free.push(Interval::new(cursor, self.end_min));
        }
        free
    }
}

/// Whether `inner` lies within `outer`, with `tolerance_min` of slack.
///
/// Both sides are made more forgiving by the tolerance: `outer` grows and
/// `inner` shrinks by `tolerance_min` at each end. Bounds are inclusive, so
/// identical intervals are contained at zero tolerance.
pub fn contains(outer: Interval, inner: Interval, tolerance_min: u16) -> bool {
    let tolerance = i32::from(tolerance_min);
    let outer = outer.expand(tolerance);
    let inner = inner.expand(-tolerance);
    outer.start_min <= inner.start_min && inner.end_min <= outer.end_min
}
