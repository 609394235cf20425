//! Solar forecast: daily yields and the forecast accuracy correction.

use chrono::{DateTime, Days, Local, NaiveTime};

use crate::{
    core::{
        interval::Interval,
        rate::{Rate, RateSeries},
    },
    prelude::*,
    quantity::{
        Zero,
        energy::{KilowattHours, WattHours},
    },
};

/// Below this total, the produced-to-forecasted ratio is too noisy to be useful.
const MIN_SCALE_ENERGY: KilowattHours = KilowattHours(0.5);

#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize)]
pub struct DailyYield {
    pub energy: WattHours,

    /// Whether the forecast spans the entire day, otherwise the energy is underestimated.
    pub complete: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize)]
pub struct TimeseriesEntry {
    pub ts: DateTime<Local>,
    pub val: f64,
}

#[serde_with::skip_serializing_none]
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolarDetails {
    /// Produced-to-forecasted energy ratio.
    pub scale: Option<f64>,

    /// Remaining yield for today.
    pub today: DailyYield,

    pub tomorrow: DailyYield,
    pub day_after_tomorrow: DailyYield,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub timeseries: Vec<TimeseriesEntry>,
}

/// Local calendar day boundaries around the moment.
#[derive(Copy, Clone, Debug)]
pub struct DayBoundaries {
    pub today: Interval,
    pub tomorrow: Interval,
    pub day_after_tomorrow: Interval,
}

impl DayBoundaries {
    pub fn try_around(now: DateTime<Local>) -> Result<Self> {
        let beginning_of_today = now
            .date_naive()
            .and_time(NaiveTime::MIN)
            .and_local_timezone(Local)
            .earliest()
            .with_context(|| format!("no local midnight on {}", now.date_naive()))?;
        let end_of_today = add_day(beginning_of_today)?;
        let end_of_tomorrow = add_day(end_of_today)?;
        let end_of_day_after_tomorrow = add_day(end_of_tomorrow)?;
        Ok(Self {
            today: Interval::new(beginning_of_today, end_of_today),
            tomorrow: Interval::new(end_of_today, end_of_tomorrow),
            day_after_tomorrow: Interval::new(end_of_tomorrow, end_of_day_after_tomorrow),
        })
    }
}

fn add_day(time: DateTime<Local>) -> Result<DateTime<Local>> {
    time.checked_add_days(Days::new(1)).with_context(|| format!("cannot add a day to {time}"))
}

/// Day-bucketed forecast yields, without the accuracy correction.
#[instrument(skip_all, fields(now = %now))]
pub fn details(solar: &[Rate], now: DateTime<Local>) -> Result<SolarDetails> {
    let days = DayBoundaries::try_around(now)?;
    let last_known = solar.last().map(Rate::start);
    let daily_yield = |interval: Interval| DailyYield {
        energy: WattHours(solar.integrate(interval)),
        complete: last_known.is_some_and(|last_known| last_known >= interval.end),
    };
    Ok(SolarDetails {
        scale: None,
        today: daily_yield(days.today.with_start(now)),
        tomorrow: daily_yield(days.tomorrow),
        day_after_tomorrow: daily_yield(days.day_after_tomorrow),
        timeseries: solar
            .iter()
            .map(|rate| TimeseriesEntry { ts: rate.start(), val: rate.value })
            .collect(),
    })
}

/// Forecasted energy between the last observation and now.
#[must_use]
pub fn energy_since(
    solar: &[Rate],
    last_observed: DateTime<Local>,
    now: DateTime<Local>,
) -> KilowattHours {
    KilowattHours::from(WattHours(solar.integrate(Interval::new(last_observed, now))))
}

/// Forecast accuracy correction, if there is enough data for it.
#[must_use]
pub fn scale(produced: KilowattHours, forecasted: KilowattHours) -> Option<f64> {
    (forecasted > KilowattHours::ZERO && produced + forecasted > MIN_SCALE_ENERGY)
        .then(|| produced / forecasted)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::{TimeDelta, TimeZone, Timelike};

    use super::*;

    fn on(day: u32, hour: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 6, day, hour, 0, 0).unwrap()
    }

    /// Hourly forecast from 00:00 on the 15th up to the given moment, 1 kWh per hour from 8 to 16.
    fn forecast_until(until: DateTime<Local>) -> Vec<Rate> {
        let mut rates = Vec::new();
        let mut start = on(15, 0);
        while start < until {
            let end = start + TimeDelta::hours(1);
            let value = if (8..16).contains(&start.hour()) { 1000.0 } else { 0.0 };
            rates.push(Rate::new(Interval::new(start, end), value));
            start = end;
        }
        rates
    }

    #[test]
    fn test_daily_yields() -> Result {
        let solar = forecast_until(on(17, 12));
        let details = details(&solar, on(15, 12))?;

        assert_abs_diff_eq!(details.today.energy.0, 4000.0);
        assert!(details.today.complete);
        assert_abs_diff_eq!(details.tomorrow.energy.0, 8000.0);
        assert!(details.tomorrow.complete);
        assert_abs_diff_eq!(details.day_after_tomorrow.energy.0, 4000.0);
        assert!(!details.day_after_tomorrow.complete);
        assert_eq!(details.timeseries.len(), solar.len());
        assert_eq!(details.timeseries[0], TimeseriesEntry { ts: on(15, 0), val: 0.0 });
        assert!(details.scale.is_none());
        Ok(())
    }

    #[test]
    fn test_today_incomplete() -> Result {
        let solar = forecast_until(on(15, 20));
        let details = details(&solar, on(15, 9))?;
        assert!(!details.today.complete);
        assert!(!details.tomorrow.complete);
        assert_abs_diff_eq!(details.today.energy.0, 7000.0);
        assert_abs_diff_eq!(details.tomorrow.energy.0, 0.0);
        Ok(())
    }

    /// The last slot ends at midnight but starts before it, so the day is still incomplete.
    #[test]
    fn test_today_incomplete_until_midnight() -> Result {
        let details = details(&forecast_until(on(16, 0)), on(15, 9))?;
        assert!(!details.today.complete);
        assert!(!details.tomorrow.complete);
        Ok(())
    }

    #[test]
    fn test_today_complete_with_slot_at_midnight() -> Result {
        let details = details(&forecast_until(on(16, 1)), on(15, 9))?;
        assert!(details.today.complete);
        assert!(!details.tomorrow.complete);
        Ok(())
    }

    #[test]
    fn test_empty_forecast() -> Result {
        let details = details(&[], on(15, 9))?;
        assert!(!details.today.complete);
        assert_abs_diff_eq!(details.today.energy.0, 0.0);
        Ok(())
    }

    #[test]
    fn test_energy_since() {
        let solar = forecast_until(on(16, 0));
        let energy = energy_since(&solar, on(15, 7), on(15, 10));
        assert_abs_diff_eq!(energy.0, 2.0);
        assert_abs_diff_eq!(energy_since(&solar, on(15, 10), on(15, 7)).0, 0.0);
    }

    #[test]
    fn test_scale() {
        assert_eq!(scale(KilowattHours(0.2), KilowattHours(0.3)), None);
        assert_eq!(scale(KilowattHours(0.2), KilowattHours::ZERO), None);
        assert_eq!(scale(KilowattHours(5.0), KilowattHours::ZERO), None);
        assert_abs_diff_eq!(scale(KilowattHours(0.3), KilowattHours(0.3)).unwrap(), 1.0);
        assert_abs_diff_eq!(scale(KilowattHours(9.0), KilowattHours(10.0)).unwrap(), 0.9);
    }

    #[test]
    fn test_serialize() -> Result {
        let solar_details = details(&forecast_until(on(15, 2)), on(15, 0))?;
        let value = serde_json::to_value(SolarDetails { scale: Some(0.9), ..solar_details })?;
        assert_eq!(value["scale"], 0.9);
        assert_eq!(value["dayAfterTomorrow"]["complete"], false);
        assert_eq!(value["today"]["energy"], 0.0);
        assert_eq!(value["timeseries"][1]["val"], 0.0);

        let value = serde_json::to_value(details(&[], on(15, 0))?)?;
        assert!(value.get("scale").is_none());
        assert!(value.get("timeseries").is_none());
        Ok(())
    }
}
