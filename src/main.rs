#![allow(clippy::doc_markdown)]

mod accumulator;
mod blend;
mod cli;
mod config;
mod core;
mod loadpoint;
mod mix;
mod prelude;
mod publish;
mod quantity;
mod settings;
mod site;
mod solar;
mod tables;
mod tariff;

use clap::{Parser, crate_version};
use itertools::Itertools;

use crate::{
    blend::Blend,
    cli::{Args, Command, SiteArgs},
    config::SiteConfig,
    prelude::*,
    publish::Telemetry,
    settings::TomlSettings,
    site::Site,
    tables::build_rates_table,
    tariff::TariffUsage,
};

fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    info!(version = crate_version!(), "starting…");

    match Args::parse().command {
        Command::Publish(args) => {
            let now = args.now();
            let mut telemetry = Telemetry::default();
            let site = load_site(&args)?;
            site.publish_tariffs(&mut telemetry, now)?;
            let accumulator = site.forecast_accumulator();
            info!(
                accumulated = ?accumulator.accumulated,
                updated = %accumulator.updated,
                "forecast accumulator",
            );
            println!("{}", serde_json::to_string_pretty(&telemetry)?);
        }
        Command::Blend(args) => {
            let now = args.now();
            let mut config = SiteConfig::read_from(&args.site_path)?;
            let loadpoint = config.loadpoint;
            let site = build_site(&args, &mut config)?;
            info!(dynamic = site.is_dynamic_tariff(TariffUsage::Grid), "grid tariff");
            match site.effective_tariff(&loadpoint, now) {
                Blend::Effective(tariff) => {
                    let grid = site.tariff(TariffUsage::Grid);
                    println!("{}", build_rates_table(tariff.rates(), grid));
                }
                Blend::Fallback { reason, planner } => {
                    warn!(%reason, "cannot blend, showing the planner tariff");
                    let rates = planner.map(|planner| planner.forecast()).unwrap_or_default();
                    println!("{}", build_rates_table(&rates, site.tariff(TariffUsage::Grid)));
                }
            }
        }
    }

    info!("done!");
    Ok(())
}

fn load_site(args: &SiteArgs) -> Result<Site> {
    let mut config = SiteConfig::read_from(&args.site_path)?;
    build_site(args, &mut config)
}

fn build_site(args: &SiteArgs, config: &mut SiteConfig) -> Result<Site> {
    let now = args.now();
    let settings = TomlSettings::read_from(&args.settings_path)?;
    let forecast_energy = Site::restore_forecast_energy(&settings, now);
    let tariffs = config.tariffs()?;
    info!(usages = tariffs.usages().join(", "), "bound tariffs");
    Ok(Site::builder()
        .tariffs(tariffs)
        .readings(config.readings)
        .pv_meters(config.pv_meters(now))
        .forecast_energy(forecast_energy)
        .settings(Box::new(settings))
        .build())
}
