//! Import command implementation.
//!
//! The import runs on a tokio runtime: the backup is read asynchronously,
//! and after a successful write the state is re-read once the configured
//! reload delay has passed.

use std::path::Path;

use serde::Serialize;

use crate::cli::commands::Workspace;
use crate::error::{Error, Result};
use crate::model::Domain;
use crate::reload::{IMPORT_SUCCESS_MESSAGE, reload_after};
use crate::transfer::{build_export_document, import_json};

#[derive(Serialize)]
struct ImportOutput {
    success: bool,
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reloaded: Option<Vec<DomainCount>>,
}

#[derive(Serialize)]
struct DomainCount {
    domain: &'static str,
    records: usize,
}

/// Execute the import command.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not a valid backup, or
/// no storage backend accepts it.
pub fn execute(workspace: &Workspace, file: &Path, no_reload: bool, json: bool) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| Error::Other(format!("Failed to create async runtime: {e}")))?;

    rt.block_on(async { execute_async(workspace, file, no_reload, json).await })
}

async fn execute_async(workspace: &Workspace, file: &Path, no_reload: bool, json: bool) -> Result<()> {
    let mut storage = workspace.open_storage()?;
    import_json(&mut storage, file).await?;

    if !json {
        println!("{IMPORT_SUCCESS_MESSAGE}");
    }

    let reloaded = if no_reload {
        None
    } else {
        let document = reload_after(workspace.config.reload_delay(), || {
            build_export_document(&storage)
        })
        .await;
        Some(
            Domain::ALL
                .iter()
                .map(|d| DomainCount {
                    domain: d.document_field(),
                    records: document.count(*d),
                })
                .collect::<Vec<_>>(),
        )
    };

    if json {
        let output = ImportOutput {
            success: true,
            message: IMPORT_SUCCESS_MESSAGE,
            reloaded,
        };
        println!("{}", serde_json::to_string(&output)?);
    } else if let Some(counts) = reloaded {
        for count in counts {
            println!("  {:<10} {}", count.domain, count.records);
        }
    }
    Ok(())
}
