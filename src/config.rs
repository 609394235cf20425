//! Site description file.

use std::{collections::BTreeMap, fs, path::Path, sync::Arc};

use chrono::{DateTime, Local};

use crate::{
    accumulator::EnergyAccumulator,
    core::rate::Rate,
    loadpoint::Loadpoint,
    prelude::*,
    quantity::energy::KilowattHours,
    site::Readings,
    tariff::{FixedTariff, SeriesTariff, Tariff, TariffType, TariffUsage, Tariffs},
};

#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    #[serde(default)]
    pub readings: Readings,

    #[serde(default)]
    pub loadpoint: Loadpoint,

    #[serde(default)]
    pub tariffs: BTreeMap<TariffUsage, TariffConfig>,

    #[serde(default)]
    pub meters: MetersConfig,
}

#[derive(Default, serde::Deserialize)]
pub struct MetersConfig {
    /// Energy produced so far, per PV meter.
    #[serde(default)]
    pub pv: BTreeMap<String, KilowattHours>,
}

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TariffConfig {
    /// Same price at any time.
    Fixed { price: f64 },

    /// Explicit slots.
    Series { rates: Vec<Rate> },
}

impl TariffConfig {
    pub fn try_into_tariff(self, usage: TariffUsage) -> Result<Arc<dyn Tariff>> {
        match self {
            Self::Fixed { price } => {
                ensure!(usage != TariffUsage::Solar, "solar forecast must be a series");
                Ok(Arc::new(FixedTariff::new(price)))
            }
            Self::Series { rates } => {
                let tariff_type = match usage {
                    TariffUsage::Grid | TariffUsage::FeedIn | TariffUsage::Planner => {
                        TariffType::PriceDynamic
                    }
                    TariffUsage::Co2 => TariffType::Co2,
                    TariffUsage::Solar => TariffType::Solar,
                };
                Ok(Arc::new(SeriesTariff::try_new(rates, tariff_type)?))
            }
        }
    }
}

impl SiteConfig {
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn read_from(path: &Path) -> Result<Self> {
        info!("reading the site…");
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read `{}`", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("failed to parse `{}`", path.display()))
    }

    pub fn tariffs(&mut self) -> Result<Tariffs> {
        let mut tariffs = Tariffs::default();
        for (usage, config) in std::mem::take(&mut self.tariffs) {
            let tariff = config
                .try_into_tariff(usage)
                .with_context(|| format!("invalid {usage} tariff"))?;
            tariffs = tariffs.with(usage, tariff);
        }
        Ok(tariffs)
    }

    pub fn pv_meters(&self, now: DateTime<Local>) -> BTreeMap<String, EnergyAccumulator> {
        self.meters
            .pv
            .iter()
            .map(|(name, energy)| (name.clone(), EnergyAccumulator::new(*energy, now)))
            .collect()
    }
}
