use chrono::{DateTime, Local};
use itertools::Itertools;

use crate::{core::interval::Interval, prelude::*};

/// A value which is considered constant over the interval.
///
/// Depending on the usage, the value is either a price, a CO₂ intensity, or an amount of energy
/// over the entire slot.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rate {
    #[serde(flatten)]
    pub interval: Interval,

    pub value: f64,
}

impl Rate {
    pub const fn new(interval: Interval, value: f64) -> Self {
        Self { interval, value }
    }

    pub fn start(&self) -> DateTime<Local> {
        self.interval.start
    }

    pub fn end(&self) -> DateTime<Local> {
        self.interval.end
    }

    /// Share of the slot value attributable to the sub-interval.
    ///
    /// Zero-length slots contribute nothing.
    #[must_use]
    pub fn prorate(&self, interval: Interval) -> f64 {
        let duration = self.interval.duration().as_seconds_f64();
        if duration > 0.0 {
            self.value * (self.interval.overlap(interval).as_seconds_f64() / duration)
        } else {
            0.0
        }
    }
}

pub trait RateSeries {
    /// The rate which is active at the given moment.
    fn at(&self, time: DateTime<Local>) -> Option<&Rate>;

    /// Sum of the slot values over the interval, prorated by the overlap.
    fn integrate(&self, interval: Interval) -> f64;

    /// Check that the slots are non-empty and sorted by the start time.
    fn validate(&self) -> Result;
}

impl RateSeries for [Rate] {
    fn at(&self, time: DateTime<Local>) -> Option<&Rate> {
        self.iter().find(|rate| rate.interval.contains(time))
    }

    fn integrate(&self, interval: Interval) -> f64 {
        if interval.start >= interval.end {
            return 0.0;
        }
        self.iter().map(|rate| rate.prorate(interval)).sum()
    }

    fn validate(&self) -> Result {
        for rate in self {
            ensure!(rate.start() < rate.end(), "empty or inverted slot: {:?}", rate.interval);
        }
        for (lhs, rhs) in self.iter().tuple_windows() {
            ensure!(
                lhs.start() <= rhs.start(),
                "slots are not sorted: {:?} goes before {:?}",
                lhs.interval,
                rhs.interval,
            );
        }
        Ok(())
    }
}
