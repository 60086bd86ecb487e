//! 404 redirect path reconstruction.
//!
//! Static hosts answer unknown deep links with a 404 page. That page
//! captures the requested location into the session store and sends the
//! browser to the app's base path; on start-up the app consumes the stored
//! path and routes to it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::storage::KeyValueStore;

/// Session key the requested path is stored under.
pub const REDIRECT_KEY: &str = "redirectPath";

/// Location of a request the static host could not resolve.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestLocation {
    pub pathname: String,
    /// Query string including its leading `?`, or empty
    pub search: String,
    /// Fragment including its leading `#`, or empty
    pub hash: String,
    /// Scheme and host, e.g. `https://example.github.io`
    pub origin: String,
}

/// Result of capturing a request location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectCapture {
    pub redirect_path: String,
    pub base_path: String,
}

/// Capture a location: the full path to restore and the base to send the
/// browser to.
#[must_use]
pub fn capture(location: &RequestLocation) -> RedirectCapture {
    RedirectCapture {
        redirect_path: format!("{}{}{}", location.pathname, location.search, location.hash),
        base_path: format!("{}{}", location.origin, base_path_of(&location.pathname)),
    }
}

/// `pathname` without its last `/`-separated segment, with a trailing `/`.
#[must_use]
pub fn base_path_of(pathname: &str) -> String {
    let parent = pathname.rfind('/').map_or("", |i| &pathname[..i]);
    format!("{parent}/")
}

/// Store a capture in the session store.
///
/// # Errors
///
/// Returns an error if the session store cannot be written.
pub fn store_redirect(session: &mut dyn KeyValueStore, captured: &RedirectCapture) -> Result<()> {
    session.set(REDIRECT_KEY, &captured.redirect_path)?;
    debug!(path = %captured.redirect_path, "Stored redirect path");
    Ok(())
}

/// Turn a stored redirect path into an in-app route.
///
/// The first occurrence of `base_prefix` is replaced by `/`, leading
/// slashes are collapsed to one and a leading `/` is guaranteed.
#[must_use]
pub fn resolve_route(redirect_path: &str, base_prefix: &str) -> String {
    let replaced = redirect_path.replacen(base_prefix, "/", 1);
    format!("/{}", replaced.trim_start_matches('/'))
}

/// Read, clear and resolve the stored redirect path.
///
/// Returns `None` when nothing was stored. A stored path is returned at
/// most once.
///
/// # Errors
///
/// Returns an error if the session store cannot be read or written.
pub fn consume_redirect(
    session: &mut dyn KeyValueStore,
    base_prefix: &str,
) -> Result<Option<String>> {
    let Some(stored) = session.get(REDIRECT_KEY)? else {
        return Ok(None);
    };
    session.remove(REDIRECT_KEY)?;

    let route = resolve_route(&stored, base_prefix);
    debug!(stored = %stored, route = %route, "Consumed redirect path");
    Ok(Some(route))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn location(pathname: &str, search: &str, hash: &str) -> RequestLocation {
        RequestLocation {
            pathname: pathname.to_string(),
            search: search.to_string(),
            hash: hash.to_string(),
            origin: "https://example.github.io".to_string(),
        }
    }

    #[test]
    fn test_capture_deep_link() {
        let captured = capture(&location("/aurorae-haven/tasks", "?filter=urgent", "#list"));
        assert_eq!(captured.redirect_path, "/aurorae-haven/tasks?filter=urgent#list");
        assert_eq!(captured.base_path, "https://example.github.io/aurorae-haven/");
    }

    #[test]
    fn test_base_path_of() {
        assert_eq!(base_path_of("/aurorae-haven/tasks"), "/aurorae-haven/");
        assert_eq!(base_path_of("/a/b/"), "/a/b/");
        assert_eq!(base_path_of("/"), "/");
        assert_eq!(base_path_of("tasks"), "/");
        assert_eq!(base_path_of(""), "/");
    }

    #[test]
    fn test_resolve_route_strips_base() {
        assert_eq!(
            resolve_route("/aurorae-haven/tasks?filter=urgent#list", "/aurorae-haven/"),
            "/tasks?filter=urgent#list"
        );
        assert_eq!(resolve_route("/aurorae-haven/", "/aurorae-haven/"), "/");
    }

    #[test]
    fn test_resolve_route_collapses_leading_slashes() {
        assert_eq!(resolve_route("///habits", "/aurorae-haven/"), "/habits");
        assert_eq!(resolve_route("/aurorae-haven//notes", "/aurorae-haven/"), "/notes");
    }

    #[test]
    fn test_resolve_route_without_base_match() {
        assert_eq!(resolve_route("/schedule", "/aurorae-haven/"), "/schedule");
        assert_eq!(resolve_route("schedule", "/aurorae-haven/"), "/schedule");
    }

    #[test]
    fn test_resolve_route_replaces_first_occurrence_only() {
        assert_eq!(
            resolve_route("/app/notes/app/x", "/app/"),
            "/notes/app/x"
        );
    }

    #[test]
    fn test_redirect_consumed_once() {
        let mut session = MemoryStore::new();
        let captured = capture(&location("/aurorae-haven/tasks", "?filter=urgent", "#list"));
        store_redirect(&mut session, &captured).unwrap();

        assert_eq!(
            consume_redirect(&mut session, "/aurorae-haven/").unwrap().as_deref(),
            Some("/tasks?filter=urgent#list")
        );
        assert!(consume_redirect(&mut session, "/aurorae-haven/").unwrap().is_none());
        assert!(session.is_empty());
    }
}
