//! Tariff providers: anything that answers «what is the value now» and «what is expected».

mod effective;
mod fixed;
mod series;

use std::{collections::BTreeMap, sync::Arc};

use chrono::{DateTime, Local};

pub use self::{effective::EffectiveTariff, fixed::FixedTariff, series::SeriesTariff};
use crate::{core::rate::Rate, prelude::*};

/// Role a tariff plays for the site.
#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    derive_more::Display,
    serde::Deserialize,
    serde::Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TariffUsage {
    #[display("grid")]
    Grid,

    #[display("feed-in")]
    #[serde(rename = "feedin")]
    FeedIn,

    #[display("CO₂")]
    Co2,

    /// Solar production forecast.
    #[display("solar")]
    Solar,

    /// Default tariff for the charge planner.
    #[display("planner")]
    Planner,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, serde::Serialize)]
pub enum TariffType {
    PriceStatic,
    PriceDynamic,
    Co2,
    Solar,
    Planner,
}

pub trait Tariff: Send + Sync {
    /// Value which is active at the given moment.
    fn current(&self, now: DateTime<Local>) -> Result<f64>;

    /// Known upcoming slots, possibly empty.
    fn forecast(&self) -> Vec<Rate>;

    fn tariff_type(&self) -> TariffType;
}

/// Tariffs bound to the site, at most one per usage.
#[derive(Clone, Default)]
pub struct Tariffs(BTreeMap<TariffUsage, Arc<dyn Tariff>>);

impl Tariffs {
    #[must_use]
    pub fn with(mut self, usage: TariffUsage, tariff: Arc<dyn Tariff>) -> Self {
        self.0.insert(usage, tariff);
        self
    }

    pub fn get(&self, usage: TariffUsage) -> Option<&dyn Tariff> {
        self.0.get(&usage).map(|tariff| &**tariff)
    }

    /// Shared handle to the tariff, for handing it out as is.
    pub fn get_shared(&self, usage: TariffUsage) -> Option<Arc<dyn Tariff>> {
        self.0.get(&usage).cloned()
    }

    pub fn usages(&self) -> impl Iterator<Item = TariffUsage> {
        self.0.keys().copied()
    }
}

/// Current value of an optional tariff.
pub fn current(tariff: Option<&dyn Tariff>, now: DateTime<Local>) -> Result<f64> {
    tariff.context("no tariff")?.current(now)
}

/// Forecast of an optional tariff, empty when the tariff is missing.
pub fn forecast(tariff: Option<&dyn Tariff>) -> Vec<Rate> {
    tariff.map(|tariff| tariff.forecast()).unwrap_or_default()
}
