use std::path::PathBuf;

use chrono::{DateTime, Local};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the publish cycle once: green shares, effective price and CO₂, and the forecasts.
    #[clap(name = "publish")]
    Publish(SiteArgs),

    /// Print the effective tariff forecast for the loadpoint.
    #[clap(name = "blend")]
    Blend(SiteArgs),
}

#[derive(Parser)]
pub struct SiteArgs {
    /// Site description: readings, loadpoint, tariffs, and meters.
    #[clap(long = "site", env = "SITE_PATH", default_value = "site.toml")]
    pub site_path: PathBuf,

    /// Persisted settings, such as the accumulated solar forecast.
    #[clap(long = "settings", env = "SETTINGS_PATH", default_value = "settings.toml")]
    pub settings_path: PathBuf,

    /// Override the current time, for example: `2025-06-15T12:00:00+02:00`.
    #[clap(long, env = "NOW")]
    pub now: Option<DateTime<Local>>,
}

impl SiteArgs {
    pub fn now(&self) -> DateTime<Local> {
        self.now.unwrap_or_else(Local::now)
    }
}
