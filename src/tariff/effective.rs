use chrono::{DateTime, Local};

use crate::{
    core::rate::{Rate, RateSeries},
    prelude::*,
    tariff::{Tariff, TariffType},
};

/// Blended tariff derived from the other ones, usable by the planner like any other tariff.
#[derive(Clone, Debug, derive_more::Constructor)]
pub struct EffectiveTariff {
    rates: Vec<Rate>,
}

impl EffectiveTariff {
    pub fn rates(&self) -> &[Rate] {
        &self.rates
    }
}

impl Tariff for EffectiveTariff {
    fn current(&self, now: DateTime<Local>) -> Result<f64> {
        self.rates.at(now).map(|rate| rate.value).with_context(|| format!("no rate at {now}"))
    }

    fn forecast(&self) -> Vec<Rate> {
        self.rates.clone()
    }

    fn tariff_type(&self) -> TariffType {
        TariffType::Planner
    }
}
