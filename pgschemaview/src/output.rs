//! Delivery of rendered output to a file or stdout.

use pgschemaview_core::{Result, SchemaViewError};
use std::io::Write;
use std::path::Path;

/// Writes rendered output to `file` when one is configured, otherwise prints
/// it to stdout followed by a newline.
pub(crate) fn emit(rendered: &str, file: Option<&Path>) -> Result<()> {
    match file {
        Some(path) => {
            write_file(rendered, path)?;
            tracing::info!("Output written to {}", path.display());
            Ok(())
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", rendered)
                .and_then(|()| stdout.flush())
                .map_err(|e| SchemaViewError::io("Failed to write to stdout", e))
        }
    }
}

/// Writes the full rendered text to `path`, replacing any existing file
pub(crate) fn write_file(rendered: &str, path: &Path) -> Result<()> {
    std::fs::write(path, rendered).map_err(|e| {
        SchemaViewError::io(format!("Failed to write to {}", path.display()), e)
    })
}
