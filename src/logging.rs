use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::Local;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

// logs/<timestamp>.log, one file per run
pub fn log_file_path(log_dir: &Path) -> PathBuf {
    let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
    log_dir.join(format!("{timestamp}.log"))
}

/// Route `log` output to a fresh file under `log_dir`. Returns the file path.
pub fn init_logging(log_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;

    let log_path = log_file_path(log_dir);
    let file = fs::File::create(&log_path)
        .with_context(|| format!("opening log file {}", log_path.display()))?;

    WriteLogger::init(LevelFilter::Info, ConfigBuilder::new().build(), file)
        .context("initialising logger")?;

    Ok(log_path)
}
