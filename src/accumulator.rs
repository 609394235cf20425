use chrono::{DateTime, Local};

use crate::quantity::energy::KilowattHours;

/// Meter which reports the total energy it has seen.
pub trait AccumulatedEnergy {
    fn accumulated_energy(&self) -> KilowattHours;
}

/// Running energy total along with the moment of the last update.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EnergyAccumulator {
    pub accumulated: KilowattHours,
    pub updated: DateTime<Local>,
}

impl EnergyAccumulator {
    pub const fn new(accumulated: KilowattHours, updated: DateTime<Local>) -> Self {
        Self { accumulated, updated }
    }

    pub fn add_energy(&mut self, energy: KilowattHours, now: DateTime<Local>) {
        self.accumulated += energy;
        self.updated = now;
    }
}

impl AccumulatedEnergy for EnergyAccumulator {
    fn accumulated_energy(&self) -> KilowattHours {
        self.accumulated
    }
}
