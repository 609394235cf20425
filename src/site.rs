use std::{
    collections::BTreeMap,
    ops::Range,
    sync::{PoisonError, RwLock},
};

use bon::Builder;
use chrono::{DateTime, Local};

use crate::{
    accumulator::{AccumulatedEnergy, EnergyAccumulator},
    blend::{Blend, effective_tariff},
    core::rate::Rate,
    loadpoint::Load,
    mix,
    prelude::*,
    publish::{Forecast, Key, Publish},
    quantity::{Zero, energy::KilowattHours, power::Watts},
    settings::{SOLAR_ACC_FORECAST, SOLAR_ACC_FORECAST_UPDATED, Settings},
    solar::{self, SolarDetails},
    tariff::{self, Tariff, TariffType, TariffUsage, Tariffs},
};

/// Live power readings of the site.
#[derive(Copy, Clone, Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct Readings {
    pub pv_power: Watts,

    /// Positive when discharging.
    pub battery_power: Watts,

    /// Household consumption, excluding the loadpoints.
    pub home_power: Watts,

    /// Total loadpoint consumption.
    pub charge_power: Watts,
}

/// Context of the computations: the bound tariffs, the latest readings, and the persisted state.
#[derive(Builder)]
pub struct Site {
    #[builder(default)]
    tariffs: Tariffs,

    #[builder(default)]
    readings: Readings,

    /// Accumulated energy per PV meter.
    #[builder(default)]
    pv_meters: BTreeMap<String, EnergyAccumulator>,

    /// Forecasted solar energy accumulated since the first run.
    #[builder(with = |accumulator: EnergyAccumulator| RwLock::new(accumulator))]
    forecast_energy: RwLock<EnergyAccumulator>,

    settings: Box<dyn Settings>,
}

impl Site {
    /// Restore the forecast accumulator from the settings, start anew when there is nothing to restore.
    pub fn restore_forecast_energy(
        settings: &dyn Settings,
        now: DateTime<Local>,
    ) -> EnergyAccumulator {
        let accumulated = KilowattHours(settings.float(SOLAR_ACC_FORECAST).unwrap_or_default());
        #[expect(clippy::cast_possible_truncation)]
        let updated = settings
            .float(SOLAR_ACC_FORECAST_UPDATED)
            .and_then(|timestamp| DateTime::from_timestamp(timestamp as i64, 0))
            .map_or(now, |updated| updated.with_timezone(&Local));
        info!(?accumulated, %updated, "restored the forecast accumulator");
        EnergyAccumulator::new(accumulated, updated)
    }

    pub fn tariff(&self, usage: TariffUsage) -> Option<&dyn Tariff> {
        self.tariffs.get(usage)
    }

    pub fn is_dynamic_tariff(&self, usage: TariffUsage) -> bool {
        self.tariff(usage).is_some_and(|tariff| tariff.tariff_type() != TariffType::PriceStatic)
    }

    /// Consistent copy of the forecast accumulator.
    pub fn forecast_accumulator(&self) -> EnergyAccumulator {
        *self.forecast_energy.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn green_share(&self, band: Range<Watts>) -> f64 {
        mix::green_share(self.readings.pv_power, self.readings.battery_power, band)
    }

    /// Green share of the household consumption.
    pub fn green_share_home(&self) -> f64 {
        self.green_share(Watts::ZERO..self.readings.home_power)
    }

    /// Green share of the loadpoints, which are stacked on top of the household consumption.
    pub fn green_share_loadpoints(&self) -> f64 {
        let home_power = self.readings.home_power;
        self.green_share(home_power..(home_power + self.readings.charge_power))
    }

    /// Effective price, or `None` if the grid price is unknown.
    pub fn effective_price(&self, green_share: f64, now: DateTime<Local>) -> Option<f64> {
        let grid_price = self.current(TariffUsage::Grid, now)?;
        let feed_in_price = self.current(TariffUsage::FeedIn, now);
        Some(mix::effective_price(grid_price, feed_in_price, green_share))
    }

    /// Effective CO₂ intensity, or `None` if the grid intensity is unknown.
    pub fn effective_co2(&self, green_share: f64, now: DateTime<Local>) -> Option<f64> {
        self.current(TariffUsage::Co2, now).map(|co2| mix::effective_co2(co2, green_share))
    }

    pub fn effective_tariff(&self, load: &impl Load, now: DateTime<Local>) -> Blend {
        effective_tariff(&self.tariffs, load.effective_max_power(), now)
    }

    /// Total energy produced according to the PV meters.
    pub fn produced_energy(&self) -> KilowattHours {
        self.pv_meters.values().map(EnergyAccumulator::accumulated_energy).sum()
    }

    /// Daily yields along with the forecast correction.
    ///
    /// Accumulates and persists the energy forecasted since the previous call.
    #[instrument(skip_all, fields(now = %now))]
    pub fn solar_details(&self, solar: &[Rate], now: DateTime<Local>) -> Result<SolarDetails> {
        let mut details = solar::details(solar, now)?;

        let forecasted = {
            let mut accumulator =
                self.forecast_energy.write().unwrap_or_else(PoisonError::into_inner);
            let energy = solar::energy_since(solar, accumulator.updated, now);
            debug!(?energy, since = %accumulator.updated, "accumulating the forecast…");
            accumulator.add_energy(energy, now);
            self.persist(&accumulator);
            accumulator.accumulated_energy()
        };

        let produced = self.produced_energy();
        details.scale = solar::scale(produced, forecasted);
        debug!(?forecasted, ?produced, scale = ?details.scale, "solar forecast");

        Ok(details)
    }

    fn persist(&self, accumulator: &EnergyAccumulator) {
        #[expect(clippy::cast_precision_loss)]
        let updated = accumulator.updated.timestamp() as f64;
        for (key, value) in
            [(SOLAR_ACC_FORECAST, accumulator.accumulated.0), (SOLAR_ACC_FORECAST_UPDATED, updated)]
        {
            if let Err(error) = self.settings.set_float(key, value) {
                warn!(key, "failed to save the setting: {error:#}");
            }
        }
    }

    /// Publish the current tariff values, the effective price and CO₂, and the forecasts.
    #[instrument(skip_all, fields(now = %now))]
    pub fn publish_tariffs(&self, sink: &mut impl Publish, now: DateTime<Local>) -> Result {
        let green_share_home = self.green_share_home();
        let green_share_loadpoints = self.green_share_loadpoints();
        info!(green_share_home, green_share_loadpoints, "publishing…");

        sink.publish(Key::GreenShareHome, green_share_home.into());
        sink.publish(Key::GreenShareLoadpoints, green_share_loadpoints.into());

        for (usage, key) in [
            (TariffUsage::Grid, Key::TariffGrid),
            (TariffUsage::FeedIn, Key::TariffFeedIn),
            (TariffUsage::Co2, Key::TariffCo2),
            (TariffUsage::Solar, Key::TariffSolar),
        ] {
            if let Some(value) = self.current(usage, now) {
                sink.publish(key, value.into());
            }
        }

        for (green_share, price_key, co2_key) in [
            (green_share_home, Key::TariffPriceHome, Key::TariffCo2Home),
            (green_share_loadpoints, Key::TariffPriceLoadpoints, Key::TariffCo2Loadpoints),
        ] {
            if let Some(price) = self.effective_price(green_share, now) {
                sink.publish(price_key, price.into());
            }
            if let Some(co2) = self.effective_co2(green_share, now) {
                sink.publish(co2_key, co2.into());
            }
        }

        let solar = tariff::forecast(self.tariff(TariffUsage::Solar));
        let forecast = Forecast {
            co2: tariff::forecast(self.tariff(TariffUsage::Co2)),
            feedin: tariff::forecast(self.tariff(TariffUsage::FeedIn)),
            grid: tariff::forecast(self.tariff(TariffUsage::Grid)),
            planner: tariff::forecast(self.tariff(TariffUsage::Planner)),
            solar: if solar.is_empty() { None } else { Some(self.solar_details(&solar, now)?) },
        };
        sink.publish(Key::Forecast, serde_json::to_value(forecast)?);

        Ok(())
    }

    /// Current value of the tariff, `None` if the tariff is missing or its value is unavailable.
    fn current(&self, usage: TariffUsage, now: DateTime<Local>) -> Option<f64> {
        tariff::current(self.tariff(usage), now)
            .inspect_err(|error| debug!(%usage, "no current value: {error:#}"))
            .ok()
    }
}
