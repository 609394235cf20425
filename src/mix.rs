//! Instantaneous green share and the effective price and CO₂ derived from it.

use std::ops::Range;

use crate::quantity::{Zero, power::Watts};

/// Share of the consumption band which can be covered by self-produced power.
///
/// Consumption below `band.start` takes the green power first. Discharging battery counts as green,
/// charging battery and negative PV readings are ignored.
///
/// The result is always within `0.0..=1.0`. An empty band is fully green when any green power is
/// left for it, and not green at all otherwise.
#[must_use]
pub fn green_share(pv_power: Watts, battery_power: Watts, band: Range<Watts>) -> f64 {
    let green_power = pv_power.positive_part() + battery_power.positive_part();
    let available_power = (green_power - band.start).positive_part();
    let band_width = band.end - band.start;

    if band_width > Watts::ZERO {
        available_power.min(band_width) / band_width
    } else if available_power > Watts::ZERO {
        1.0
    } else {
        0.0
    }
}

/// Grid price diluted with the feed-in price, which is what the self-produced energy is worth.
///
/// Missing feed-in price counts as zero.
#[must_use]
pub fn effective_price(grid_price: f64, feed_in_price: Option<f64>, green_share: f64) -> f64 {
    grid_price * (1.0 - green_share) + feed_in_price.unwrap_or_default() * green_share
}

/// Grid CO₂ intensity diluted with the carbon-free self-produced energy.
#[must_use]
pub fn effective_co2(grid_co2: f64, green_share: f64) -> f64 {
    grid_co2 * (1.0 - green_share)
}
