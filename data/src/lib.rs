pub mod chart;
pub mod config;
pub mod drawing;
pub mod log;
pub mod scale;
pub mod series;
pub mod util;

use std::path::PathBuf;

pub use chart::ChartType;
pub use config::timezone::UserTimezone;
pub use scale::{PriceRange, TimeRange, Viewport};
pub use series::{Interval, IntervalSeries};

/// Resolves a path under the platform config directory, used for the
/// persisted chart settings and the log file. Falls back to the working
/// directory when no config dir is available.
pub fn data_path(path_name: Option<&str>) -> PathBuf {
    let data_path = dirs_next::config_dir().map_or_else(
        || PathBuf::from("."),
        |dir| dir.join("candleview"),
    );

    if let Some(file_name) = path_name {
        data_path.join(file_name)
    } else {
        data_path
    }
}

#[derive(thiserror::Error, Debug, Clone)]
pub enum InternalError {
    #[error("io error: {0}")]
    Io(String),
    #[error("parse error: {0}")]
    Json(String),
}
