use chrono::{DateTime, Local};

use crate::{
    core::rate::{Rate, RateSeries},
    prelude::*,
    tariff::{Tariff, TariffType},
};

/// Time-varying tariff backed by a known series: dynamic price, CO₂ intensity, or solar forecast.
#[derive(Clone, Debug)]
pub struct SeriesTariff {
    rates: Vec<Rate>,
    tariff_type: TariffType,
}

impl SeriesTariff {
    pub fn try_new(rates: Vec<Rate>, tariff_type: TariffType) -> Result<Self> {
        rates.validate().with_context(|| format!("invalid {tariff_type:?} series"))?;
        Ok(Self { rates, tariff_type })
    }
}

impl Tariff for SeriesTariff {
    fn current(&self, now: DateTime<Local>) -> Result<f64> {
        self.rates.at(now).map(|rate| rate.value).with_context(|| format!("no rate at {now}"))
    }

    fn forecast(&self) -> Vec<Rate> {
        self.rates.clone()
    }

    fn tariff_type(&self) -> TariffType {
        self.tariff_type
    }
}
