use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    core::rate::{Rate, RateSeries},
    tariff::{self, Tariff},
};

/// Render the rates alongside the grid price, highlighting the slots cheaper than the grid.
///
/// The grid forecast is prorated onto each slot the same way the blended rates are.
/// A static grid price is shown as is.
#[must_use]
pub fn build_rates_table(rates: &[Rate], grid: Option<&dyn Tariff>) -> Table {
    let grid_rates = tariff::forecast(grid);
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table.set_header(vec!["Start", "End", "Grid", "Rate"]);
    for rate in rates {
        let grid_price = if grid_rates.is_empty() {
            grid.and_then(|grid| grid.current(rate.start()).ok())
        } else {
            Some(grid_rates.integrate(rate.interval))
        };
        let color = match grid_price {
            Some(grid_price) if rate.value < grid_price => Color::Green,
            Some(_) => Color::Red,
            None => Color::Reset,
        };
        table.add_row(vec![
            Cell::new(rate.start().format("%a %H:%M")),
            Cell::new(rate.end().format("%H:%M")).add_attribute(Attribute::Dim),
            Cell::new(grid_price.map_or_else(|| "—".to_string(), |price| format!("{price:.4}")))
                .set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.4}", rate.value)).set_alignment(CellAlignment::Right).fg(color),
        ]);
    }
    table
}
