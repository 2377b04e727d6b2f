use std::path::PathBuf;
use std::{fs, io};

use crate::data_path;

pub const CURRENT_LOG_FILE: &str = "candleview-current.log";
pub const PREVIOUS_LOG_FILE: &str = "candleview-previous.log";

/// Full path of the current log file, with its directory created.
pub fn path() -> Result<PathBuf, Error> {
    let full_path = data_path(Some(CURRENT_LOG_FILE));

    let parent = full_path
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "invalid log file path"))?;

    if !parent.exists() {
        fs::create_dir_all(parent)?;
    }

    Ok(full_path)
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    SetLog(#[from] log::SetLoggerError),
    #[error(transparent)]
    ParseLevel(#[from] log::ParseLevelError),
}
