//! Deferred reload after an import.
//!
//! After a successful import the freshly written state is re-read once,
//! after a short delay, so every view picks it up the same way.

use std::time::Duration;

use tracing::debug;

/// Message shown after a successful import.
pub const IMPORT_SUCCESS_MESSAGE: &str = "Data imported successfully! Reloading...";

/// Delay between a successful import and the reload.
pub const DEFAULT_RELOAD_DELAY: Duration = Duration::from_millis(1500);

/// Wait `delay`, then run `reload` and return its result.
pub async fn reload_after<F, T>(delay: Duration, reload: F) -> T
where
    F: FnOnce() -> T,
{
    debug!(delay_ms = delay.as_millis(), "Reload scheduled");
    tokio::time::sleep(delay).await;
    reload()
}
