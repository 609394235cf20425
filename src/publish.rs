//! Published telemetry.

use std::collections::BTreeMap;

use crate::{core::rate::Rate, solar::SolarDetails};

#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Key {
    GreenShareHome,
    GreenShareLoadpoints,
    TariffGrid,
    TariffFeedIn,
    TariffCo2,
    TariffSolar,
    TariffPriceHome,
    TariffCo2Home,
    TariffPriceLoadpoints,
    TariffCo2Loadpoints,
    Forecast,
}

pub trait Publish {
    fn publish(&mut self, key: Key, value: serde_json::Value);
}

/// Latest published values.
#[derive(Default, serde::Serialize)]
#[serde(transparent)]
pub struct Telemetry(BTreeMap<Key, serde_json::Value>);

impl Telemetry {
    #[cfg(test)]
    pub fn get(&self, key: Key) -> Option<&serde_json::Value> {
        self.0.get(&key)
    }
}

impl Publish for Telemetry {
    fn publish(&mut self, key: Key, value: serde_json::Value) {
        self.0.insert(key, value);
    }
}

/// Upcoming rates of all tariffs, omitting the missing ones.
#[derive(Default, serde::Serialize)]
pub struct Forecast {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub co2: Vec<Rate>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub feedin: Vec<Rate>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub grid: Vec<Rate>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub planner: Vec<Rate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub solar: Option<SolarDetails>,
}
