use std::{fs, path::Path};

pub use data::log::Error;

/// Wires up fern: stdout in debug builds, a rotated file otherwise. The
/// `RUST_LOG` variable overrides the default level.
pub fn setup(is_debug: bool) -> Result<(), Error> {
    let default_level = if is_debug {
        log::Level::Debug
    } else {
        log::Level::Info
    };

    let level_filter = std::env::var("RUST_LOG")
        .ok()
        .as_deref()
        .map(str::parse::<log::Level>)
        .transpose()?
        .unwrap_or(default_level)
        .to_level_filter();

    let mut io_sink = fern::Dispatch::new().format(|out, message, record| {
        out.finish(format_args!(
            "{}:{} -- {}",
            chrono::Local::now().format("%H:%M:%S%.3f"),
            record.level(),
            message
        ));
    });

    if is_debug {
        io_sink = io_sink.chain(std::io::stdout());
    } else {
        let log_path = data::log::path()?;
        rotate_previous(&log_path)?;
        io_sink = io_sink.chain(fern::log_file(&log_path).map_err(Error::Io)?);
    }

    fern::Dispatch::new()
        .level(log::LevelFilter::Off)
        .level_for("iced_wgpu", log::LevelFilter::Info)
        .level_for("candleview_data", level_filter)
        .level_for("candleview", level_filter)
        .chain(io_sink)
        .apply()?;

    Ok(())
}

/// Keeps one previous run's log around; anything older is dropped.
fn rotate_previous(log_path: &Path) -> Result<(), Error> {
    let dir = log_path.parent().unwrap_or_else(|| Path::new("."));
    let previous = dir.join(data::log::PREVIOUS_LOG_FILE);

    if previous.exists() {
        fs::remove_file(&previous)?;
    }
    if log_path.exists() {
        fs::rename(log_path, &previous)?;
    }

    Ok(())
}
