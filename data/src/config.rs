pub mod timezone;

use std::{fs, io::Write, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    InternalError,
    chart::{AxisSide, ChartType},
    scale::timeseries::TimeDetail,
    util::ok_or_default,
};
use timezone::{Clock, UserTimezone};

pub const CONFIG_FILE: &str = "config.json";

/// Persisted chart settings. Every field deserializes tolerantly so a
/// config written by an older build still loads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(deserialize_with = "ok_or_default", default)]
    pub chart_type: ChartType,
    #[serde(deserialize_with = "ok_or_default", default)]
    pub time_detail: TimeDetail,
    #[serde(deserialize_with = "ok_or_default", default)]
    pub timezone: UserTimezone,
    #[serde(deserialize_with = "ok_or_default", default)]
    pub clock: Clock,
    #[serde(deserialize_with = "ok_or_default", default)]
    pub axis_side: AxisSide,
    #[serde(deserialize_with = "ok_or_default", default = "default_x_ticks")]
    pub x_tick_count: usize,
    #[serde(deserialize_with = "ok_or_default", default = "default_y_ticks")]
    pub y_tick_count: usize,
    /// Theme name, resolved against the GUI's theme list at startup.
    #[serde(deserialize_with = "ok_or_default", default = "default_theme")]
    pub theme: String,
}

fn default_x_ticks() -> usize {
    12
}

fn default_y_ticks() -> usize {
    8
}

fn default_theme() -> String {
    "Ferra".to_string()
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            chart_type: ChartType::default(),
            time_detail: TimeDetail::default(),
            timezone: UserTimezone::default(),
            clock: Clock::default(),
            axis_side: AxisSide::default(),
            x_tick_count: default_x_ticks(),
            y_tick_count: default_y_ticks(),
            theme: default_theme(),
        }
    }
}

/// Loads the saved config, falling back to defaults on any failure. A
/// missing or corrupt file is an expected state, not an error.
pub fn load() -> ChartConfig {
    let path = crate::data_path(Some(CONFIG_FILE));

    match read_from_file(&path) {
        Ok(config) => config,
        Err(err) => {
            log::info!("using default chart config: {err}");
            ChartConfig::default()
        }
    }
}

fn read_from_file(path: &Path) -> Result<ChartConfig, InternalError> {
    let contents =
        fs::read_to_string(path).map_err(|err| InternalError::Io(err.to_string()))?;
    serde_json::from_str(&contents).map_err(|err| InternalError::Json(err.to_string()))
}

pub fn save(config: &ChartConfig) -> Result<(), InternalError> {
    let path = crate::data_path(Some(CONFIG_FILE));

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| InternalError::Io(err.to_string()))?;
    }

    let contents = serde_json::to_string_pretty(config)
        .map_err(|err| InternalError::Json(err.to_string()))?;

    let mut file =
        fs::File::create(&path).map_err(|err| InternalError::Io(err.to_string()))?;
    file.write_all(contents.as_bytes())
        .map_err(|err| InternalError::Io(err.to_string()))
}
