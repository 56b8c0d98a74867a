//! Logging initialization for preview_app.
//!
//! File output goes to `./preview_app.log` in the current working directory.

use std::path::Path;

use log::LevelFilter;

use super::config::{AppConfig, LOG_FILENAME};

pub(crate) fn initialize(config: &AppConfig, verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    preview_logging::initialize(
        config.log_destination.into(),
        level,
        Path::new(LOG_FILENAME),
    );
}
