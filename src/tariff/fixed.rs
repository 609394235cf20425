use chrono::{DateTime, Local};

use crate::{
    core::rate::Rate,
    prelude::*,
    tariff::{Tariff, TariffType},
};

/// Static price which is the same at any moment.
#[derive(Copy, Clone, Debug, derive_more::Constructor)]
pub struct FixedTariff {
    price: f64,
}

impl Tariff for FixedTariff {
    fn current(&self, _now: DateTime<Local>) -> Result<f64> {
        Ok(self.price)
    }

    fn forecast(&self) -> Vec<Rate> {
        Vec::new()
    }

    fn tariff_type(&self) -> TariffType {
        TariffType::PriceStatic
    }
}
