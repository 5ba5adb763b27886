use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

const DEFAULT_FILTER: &str = "info,chat_widget=debug";

/// Path of the log file. The terminal UI owns stderr, so logs go to disk.
pub fn log_file_path() -> Result<PathBuf> {
    Ok(Config::get_config_dir()?.join("chat-widget.log"))
}

/// Initialize tracing, filtered by `RUST_LOG`
pub fn init() -> Result<PathBuf> {
    let path = log_file_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .try_init()?;

    Ok(path)
}
