//! Tracing setup. The terminal belongs to the UI, so logs go to a file.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::{
    prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use crate::config::LogConfig;
use crate::error::AppError;

/// Install the global subscriber. Returns `false` when logging is disabled.
///
/// `RUST_LOG` takes precedence over the configured filter.
pub fn init(cfg: &LogConfig) -> Result<bool, AppError> {
    let Some(path) = &cfg.file else {
        return Ok(false);
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| AppError::LogFile { path: path.clone(), source })?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(filter(&cfg.filter))
        .try_init()
        .map_err(|e| AppError::Subscriber(e.to_string()))?;

    Ok(true)
}

fn filter(configured: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured))
        .unwrap_or_else(|_| EnvFilter::new("scramble=info"))
}
