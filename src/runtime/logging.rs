use std::error::Error;
use std::fs::File;
use std::path::PathBuf;

use simplelog::{CombinedLogger, Config, WriteLogger};

use crate::config::LogSettings;

/// Where log lines go when `[log] file` is not set.
pub fn log_path(settings: &LogSettings) -> PathBuf {
    settings
        .file
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("earworm.log"))
}

/// Route the `log` macros to a file; the terminal belongs to the UI.
pub fn init_logging(settings: &LogSettings) -> Result<(), Box<dyn Error>> {
    let level = settings.level.to_filter();
    if level == log::LevelFilter::Off {
        return Ok(());
    }

    CombinedLogger::init(vec![WriteLogger::new(
        level,
        Config::default(),
        File::create(log_path(settings))?,
    )])?;

    Ok(())
}
