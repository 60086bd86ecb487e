//! Status command implementation.

use colored::Colorize;
use serde::Serialize;

use crate::cli::commands::Workspace;
use crate::config::{session_path, storage_path};
use crate::error::Result;
use crate::model::{
    BlockType, Domain, ExportDocument, Habit, Note, Quadrant, Routine, ScheduleDay, Task,
};
use crate::redirect::REDIRECT_KEY;
use crate::storage::{DomainSummary, KeyValueStore};
use crate::transfer::build_export_document;

/// Output for status command.
#[derive(Serialize)]
struct StatusOutput {
    data_dir: String,
    storage_file: String,
    db_path: String,
    structured_available: bool,
    domains: Vec<DomainStatus>,
    legacy: LegacyStatus,
    pending_redirect: Option<String>,
}

#[derive(Serialize)]
struct DomainStatus {
    domain: &'static str,
    records: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
    /// Last structured-store write, RFC 3339
    updated_at: Option<String>,
}

#[derive(Serialize)]
struct LegacyStatus {
    quadrant_tasks: bool,
    wrapped_notes: bool,
}

/// Execute status command.
///
/// # Errors
///
/// Returns an error if the stores cannot be opened.
pub fn execute(workspace: &Workspace, json: bool) -> Result<()> {
    let storage = workspace.open_storage()?;
    let document = build_export_document(&storage);
    let session = workspace.open_session()?;

    let stored = workspace
        .existing_structured()
        .and_then(|s| s.domain_summaries().ok())
        .unwrap_or_default();

    let output = StatusOutput {
        data_dir: workspace.dir.display().to_string(),
        storage_file: storage_path(&workspace.dir).display().to_string(),
        db_path: workspace.db_path.display().to_string(),
        structured_available: storage.is_structured_store_available(),
        domains: Domain::ALL
            .iter()
            .map(|d| DomainStatus {
                domain: d.label(),
                records: document.count(*d),
                detail: domain_detail(&document, *d),
                updated_at: last_write(&stored, *d),
            })
            .collect(),
        legacy: LegacyStatus {
            quadrant_tasks: document.aurorae_tasks_data.is_some(),
            wrapped_notes: document.brain_dump_data.is_some(),
        },
        pending_redirect: session.get(REDIRECT_KEY)?,
    };

    if json {
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!("{}", "Aurorae Haven".cyan().bold());
    println!("  Data dir:   {}", output.data_dir);
    println!("  Storage:    {}", output.storage_file);
    let backend = if output.structured_available {
        "available".green()
    } else {
        "unavailable (key-string store only)".yellow()
    };
    println!("  Database:   {} [{backend}]", output.db_path);
    println!(
        "  Session:    {}",
        session_path(&workspace.dir).display()
    );
    println!();

    println!("{}", "Records".cyan().bold());
    for domain in &output.domains {
        let mut line = format!("  {:<10} {:<6}", domain.domain, domain.records);
        if let Some(detail) = &domain.detail {
            line.push_str(&format!(" {detail}"));
        }
        if let Some(at) = &domain.updated_at {
            line.push_str(&format!(" {}", format!("(saved {at})").dimmed()));
        }
        println!("{}", line.trim_end());
    }
    println!("  {:<10} {}", "Total".bold(), document.total());

    if output.legacy.quadrant_tasks || output.legacy.wrapped_notes {
        println!();
        println!("{}", "Legacy data".yellow().bold());
        if output.legacy.quadrant_tasks {
            println!("  aurorae_tasks (quadrant-grouped tasks)");
        }
        if output.legacy.wrapped_notes {
            println!("  brainDumpEntries (wrapped notes)");
        }
    }

    if let Some(path) = &output.pending_redirect {
        println!();
        println!("Pending redirect: {path}");
    }
    Ok(())
}

/// Short summary read through the typed models.
fn domain_detail(document: &ExportDocument, domain: Domain) -> Option<String> {
    if document.count(domain) == 0 {
        return None;
    }
    match domain {
        Domain::Tasks => {
            let tasks: Vec<Task> = document.view(domain);
            let open = tasks.iter().filter(|t| !t.is_completed()).count();
            let urgent_important = tasks
                .iter()
                .filter(|t| t.quadrant() == Some(Quadrant::UrgentImportant))
                .count();
            Some(format!("{open} open, {urgent_important} urgent+important"))
        }
        Domain::Sequences => {
            let routines: Vec<Routine> = document.view(domain);
            let total: f64 = routines.iter().map(Routine::total_duration).sum();
            Some(format!("{total} total step duration"))
        }
        Domain::Habits => {
            let habits: Vec<Habit> = document.view(domain);
            let paused = habits.iter().filter(|h| h.is_paused()).count();
            Some(format!("{paused} paused"))
        }
        Domain::Dumps => {
            let notes: Vec<Note> = document.view(domain);
            let filed = notes.iter().filter(|n| n.category.is_some()).count();
            Some(format!("{filed} with a category"))
        }
        Domain::Schedule => {
            let days: Vec<ScheduleDay> = document.view(domain);
            let tasks: usize = days.iter().map(|d| d.count_blocks(BlockType::Task)).sum();
            let routines: usize = days
                .iter()
                .map(|d| d.count_blocks(BlockType::Routine))
                .sum();
            Some(format!("{tasks} task blocks, {routines} routine blocks"))
        }
    }
}

fn last_write(stored: &[DomainSummary], domain: Domain) -> Option<String> {
    stored
        .iter()
        .find(|s| s.name == domain.storage_key())
        .and_then(|s| chrono::DateTime::from_timestamp_millis(s.updated_at))
        .map(|at| at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_domain_detail_reads_unusual_records() {
        let mut document = ExportDocument::empty("2025-01-01T00:00:00.000Z".to_string());
        document.tasks = vec![
            json!({"id": 1, "quadrant": "urgent_important"}),
            json!({"id": 2, "quadrant": "someday", "completed": true}),
        ];
        document.schedule = vec![json!({"day": "mon", "blocks": [
            {"type": "task"}, {"type": "break"}, {"type": "routine"}
        ]})];

        assert_eq!(
            domain_detail(&document, Domain::Tasks).as_deref(),
            Some("1 open, 1 urgent+important")
        );
        assert_eq!(
            domain_detail(&document, Domain::Schedule).as_deref(),
            Some("1 task blocks, 1 routine blocks")
        );
        assert!(domain_detail(&document, Domain::Habits).is_none());
    }
}
