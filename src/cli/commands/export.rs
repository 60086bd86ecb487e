//! Export command implementation.

use std::io;
use std::path::PathBuf;

use crate::cli::commands::Workspace;
use crate::error::{Error, Result};
use crate::transfer::{FileDownload, WriterDownload, export_json};

/// Execute the export command.
///
/// # Errors
///
/// Returns an error if storage cannot be opened, the export does not
/// validate, or the backup cannot be written.
pub fn execute(
    workspace: &Workspace,
    output: Option<&PathBuf>,
    to_stdout: bool,
    json: bool,
) -> Result<()> {
    let storage = workspace.open_storage()?;

    if to_stdout {
        let mut sink = WriterDownload::new(io::stdout().lock());
        export_json(&storage, &mut sink)?;
        return Ok(());
    }

    let dir = match output {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()
            .map_err(|e| Error::Other(format!("Failed to get current directory: {e}")))?,
    };
    let mut sink = FileDownload::new(dir);
    export_json(&storage, &mut sink)?;

    let path = sink
        .written()
        .map(|p| p.display().to_string())
        .unwrap_or_default();

    if json {
        let output = serde_json::json!({
            "success": true,
            "file": path,
            "structured": storage.is_structured_store_available(),
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("Export complete: {path}");
    }
    Ok(())
}
