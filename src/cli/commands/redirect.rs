//! Redirect command implementations.

use crate::cli::RedirectCommands;
use crate::cli::commands::Workspace;
use crate::error::{Error, Result};
use crate::redirect::{RequestLocation, capture, consume_redirect, store_redirect};

/// Execute redirect commands.
///
/// # Errors
///
/// Returns an error if the origin is empty or the session store cannot be
/// read or written.
pub fn execute(command: &RedirectCommands, workspace: &Workspace, json: bool) -> Result<()> {
    match command {
        RedirectCommands::Capture {
            pathname,
            search,
            hash,
            origin,
        } => {
            let location = RequestLocation {
                pathname: pathname.clone(),
                search: search.clone(),
                hash: hash.clone(),
                origin: origin.clone(),
            };
            capture_location(&location, workspace, json)
        }
        RedirectCommands::Resolve { base_path } => resolve(
            base_path.as_deref().unwrap_or(&workspace.config.base_path),
            workspace,
            json,
        ),
    }
}

fn capture_location(location: &RequestLocation, workspace: &Workspace, json: bool) -> Result<()> {
    if location.origin.trim().is_empty() {
        return Err(Error::InvalidArgument("--origin must not be empty".to_string()));
    }
    let captured = capture(location);
    let mut session = workspace.open_session()?;
    store_redirect(&mut session, &captured)?;

    if json {
        println!("{}", serde_json::to_string(&captured)?);
    } else {
        println!("Stored: {}", captured.redirect_path);
        println!("Redirect to: {}", captured.base_path);
    }
    Ok(())
}

fn resolve(base_path: &str, workspace: &Workspace, json: bool) -> Result<()> {
    let mut session = workspace.open_session()?;
    let route = consume_redirect(&mut session, base_path)?;

    if json {
        let output = serde_json::json!({ "route": route });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        match route {
            Some(route) => println!("{route}"),
            None => println!("No pending redirect."),
        }
    }
    Ok(())
}
