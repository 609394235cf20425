use std::fmt::{Debug, Formatter};

use chrono::{DateTime, Local, TimeDelta};

use crate::quantity::time::Hours;

#[derive(Copy, Clone, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[must_use]
pub struct Interval {
    /// Inclusive.
    pub start: DateTime<Local>,

    /// Exclusive.
    pub end: DateTime<Local>,
}

impl Debug for Interval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}..{:?}", self.start, self.end)
    }
}

impl Interval {
    pub const fn new(start: DateTime<Local>, end: DateTime<Local>) -> Self {
        Self { start, end }
    }

    pub const fn with_start(mut self, start: DateTime<Local>) -> Self {
        self.start = start;
        self
    }

    #[must_use]
    pub fn duration(self) -> TimeDelta {
        self.end - self.start
    }

    #[must_use]
    pub fn hours(self) -> Hours {
        Hours::from(self.duration())
    }

    #[must_use]
    pub fn contains(self, other: DateTime<Local>) -> bool {
        (self.start <= other) && (other < self.end)
    }

    /// Check whether the other interval lies entirely within this one.
    #[must_use]
    pub fn covers(self, other: Self) -> bool {
        (self.start <= other.start) && (other.end <= self.end)
    }

    /// Length of the intersection, zero when the intervals do not intersect.
    #[must_use]
    pub fn overlap(self, other: Self) -> TimeDelta {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if start < end { end - start } else { TimeDelta::zero() }
    }
}
