//! Version command implementation.

use serde::Serialize;

use crate::error::Result;
use crate::model::EXPORT_VERSION;
use crate::storage::schema::CURRENT_SCHEMA_VERSION;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VersionOutput {
    version: &'static str,
    build: &'static str,
    export_format: u32,
    schema: i32,
}

fn version_info() -> VersionOutput {
    VersionOutput {
        version: env!("CARGO_PKG_VERSION"),
        build: if cfg!(debug_assertions) {
            "dev"
        } else {
            "release"
        },
        export_format: EXPORT_VERSION,
        schema: CURRENT_SCHEMA_VERSION,
    }
}

/// Execute the version command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(json: bool) -> Result<()> {
    let info = version_info();

    if json {
        println!("{}", serde_json::to_string(&info)?);
    } else {
        println!(
            "haven {} ({}), export format v{}, schema v{}",
            info.version, info.build, info.export_format, info.schema
        );
    }
    Ok(())
}
