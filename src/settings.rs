//! Key-value settings which survive restarts.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use crate::prelude::*;

/// Accumulated solar forecast energy, kilowatt-hours.
pub const SOLAR_ACC_FORECAST: &str = "solarAccForecast";

/// Last moment the solar forecast was accumulated, Unix timestamp in seconds.
pub const SOLAR_ACC_FORECAST_UPDATED: &str = "solarAccForecastUpdated";

pub trait Settings: Send + Sync {
    fn float(&self, key: &str) -> Option<f64>;

    fn set_float(&self, key: &str, value: f64) -> Result;
}

/// Settings stored in a TOML file, which is rewritten on every change.
pub struct TomlSettings {
    path: PathBuf,
    values: Mutex<BTreeMap<String, f64>>,
}

impl TomlSettings {
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn read_from(path: &Path) -> Result<Self> {
        let values = if path.is_file() {
            toml::from_str(&fs::read_to_string(path)?)
                .with_context(|| format!("failed to parse `{}`", path.display()))?
        } else {
            info!("no settings yet");
            BTreeMap::new()
        };
        Ok(Self { path: path.to_path_buf(), values: Mutex::new(values) })
    }
}

impl Settings for TomlSettings {
    fn float(&self, key: &str) -> Option<f64> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner).get(key).copied()
    }

    #[instrument(skip(self, value), fields(path = %self.path.display()))]
    fn set_float(&self, key: &str, value: f64) -> Result {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value);
        fs::write(&self.path, toml::to_string(&*values)?)
            .with_context(|| format!("failed to write `{}`", self.path.display()))
    }
}
