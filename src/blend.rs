//! Forecast of the effective price for a load, which is partially covered by the solar production.

use std::sync::Arc;

use chrono::{DateTime, Local};

use crate::{
    core::{align::align, rate::Rate},
    prelude::*,
    quantity::{Zero, energy::WattHours, power::Watts},
    tariff::{EffectiveTariff, Tariff, TariffType, TariffUsage, Tariffs},
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, derive_more::Display)]
pub enum FallbackReason {
    #[display("no solar forecast")]
    MissingSolarForecast,

    #[display("no grid tariff")]
    MissingGridTariff,

    #[display("grid tariff has no forecast")]
    MissingGridForecast,

    #[display("no feed-in tariff")]
    MissingFeedInTariff,

    #[display("current feed-in price is unavailable")]
    UnreadableFeedInPrice,

    #[display("unsupported feed-in tariff type: {_0:?}")]
    UnsupportedFeedInType(TariffType),
}

#[must_use]
pub enum Blend {
    Effective(EffectiveTariff),

    /// The effective tariff cannot be computed, the planner tariff is used instead.
    Fallback { reason: FallbackReason, planner: Option<Arc<dyn Tariff>> },
}

/// Blend the grid and feed-in prices according to the solar forecast and the load power.
#[instrument(skip_all, fields(max_power = %max_power))]
pub fn effective_tariff(tariffs: &Tariffs, max_power: Watts, now: DateTime<Local>) -> Blend {
    let fallback = |reason: FallbackReason| {
        info!(%reason, "falling back to the planner tariff");
        Blend::Fallback { reason, planner: tariffs.get_shared(TariffUsage::Planner) }
    };

    let Some(solar) = tariffs.get(TariffUsage::Solar) else {
        return fallback(FallbackReason::MissingSolarForecast);
    };
    let Some(grid) = tariffs.get(TariffUsage::Grid) else {
        return fallback(FallbackReason::MissingGridTariff);
    };
    let Some(feed_in) = tariffs.get(TariffUsage::FeedIn) else {
        return fallback(FallbackReason::MissingFeedInTariff);
    };

    let grid_rates = grid.forecast();
    if grid_rates.is_empty() {
        return fallback(FallbackReason::MissingGridForecast);
    }
    let feed_in_rates = match feed_in.tariff_type() {
        TariffType::PriceStatic => match feed_in.current(now) {
            // Same price at any time, so just follow the grid slots:
            Ok(price) => grid_rates.iter().map(|rate| Rate::new(rate.interval, price)).collect(),
            Err(error) => {
                warn!("failed to get the feed-in price: {error:#}");
                return fallback(FallbackReason::UnreadableFeedInPrice);
            }
        },
        TariffType::PriceDynamic => feed_in.forecast(),
        tariff_type => return fallback(FallbackReason::UnsupportedFeedInType(tariff_type)),
    };

    let rates = blend(grid_rates, feed_in_rates, solar.forecast(), max_power);
    info!(n_rates = rates.len(), "blended");
    Blend::Effective(EffectiveTariff::new(rates))
}

/// Align the series and blend them slot by slot.
///
/// Each slot mixes the grid and feed-in prices in proportion to how much of the load
/// the forecasted solar energy could cover. Should the series still differ in length,
/// the result is cut to the shortest one.
#[must_use]
pub fn blend(
    mut grid: Vec<Rate>,
    mut feed_in: Vec<Rate>,
    mut solar: Vec<Rate>,
    max_power: Watts,
) -> Vec<Rate> {
    align(&mut grid, &mut solar);
    align(&mut grid, &mut feed_in);
    // Feed-in slots may have split the grid ones further:
    align(&mut grid, &mut solar);

    grid.iter()
        .zip(&feed_in)
        .zip(&solar)
        .map(|((grid, feed_in), solar)| {
            let green = green_proportion(WattHours(solar.value), max_power * solar.interval.hours());
            Rate::new(grid.interval, grid.value * (1.0 - green) + feed_in.value * green)
        })
        .collect()
}

/// Fraction of the slot energy ceiling covered by the forecasted solar energy, up to `1.0`.
fn green_proportion(solar_energy: WattHours, ceiling: WattHours) -> f64 {
    if ceiling > WattHours::ZERO && solar_energy > WattHours::ZERO {
        (solar_energy / ceiling).min(1.0)
    } else {
        0.0
    }
}
