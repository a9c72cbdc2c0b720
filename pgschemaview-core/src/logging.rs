//! Diagnostics for `pg-schema-view`.
//!
//! stdout is reserved for the rendered schema, so it can be piped into a
//! file or another tool; progress and warnings are written to stderr.

use crate::{Result, SchemaViewError};
use tracing::Level;

/// Log ceiling for `-q` and the `-v` count.
///
/// `-q` keeps only errors. Without `-v` connection progress and warnings
/// are shown; `-v` adds query timings and normalization summaries, `-vv`
/// everything.
pub fn level_for(verbose: u8, quiet: bool) -> Level {
    if quiet {
        return Level::ERROR;
    }
    match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Installs the global stderr subscriber.
///
/// Lines carry only level and message; targets, thread ids and source
/// locations are omitted.
///
/// # Errors
/// Fails when a global subscriber is already installed.
///
/// # Example
/// ```rust,no_run
/// use pgschemaview_core::logging::init_logging;
///
/// init_logging(1, false).expect("subscriber already installed");
/// ```
pub fn init_logging(verbose: u8, quiet: bool) -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level_for(verbose, quiet))
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init()
        .map_err(|e| {
            SchemaViewError::configuration(format!("Failed to initialize logging: {}", e))
        })
}
