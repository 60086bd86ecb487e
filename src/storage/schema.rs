//! Database schema for the structured store.
//!
//! Each domain is stored one row per record, in document order. A
//! `domains` row marks that a domain has been written at least once (even
//! with zero records) and carries the content hash used to skip rewrites.

use rusqlite::{Connection, Result};

/// Current schema version for migration tracking.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// The complete SQL schema for the structured store.
///
/// Timestamps are stored as INTEGER (Unix milliseconds).
pub const SCHEMA_SQL: &str = r"
-- ====================
-- Schema Version Tracking
-- ====================

CREATE TABLE IF NOT EXISTS schema_migrations (
    version TEXT PRIMARY KEY,
    applied_at INTEGER NOT NULL
);

-- ====================
-- Domain Data
-- ====================

-- Domains: one row per domain that has been written
CREATE TABLE IF NOT EXISTS domains (
    name TEXT PRIMARY KEY,
    content_hash TEXT NOT NULL,
    record_count INTEGER NOT NULL DEFAULT 0,
    updated_at INTEGER NOT NULL
);

-- Records: domain entries in document order
CREATE TABLE IF NOT EXISTS records (
    domain TEXT NOT NULL,
    position INTEGER NOT NULL,
    record_id TEXT,
    data TEXT NOT NULL,
    PRIMARY KEY (domain, position),
    FOREIGN KEY (domain) REFERENCES domains(name) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_records_record_id ON records(domain, record_id);

-- Legacy snapshots: raw legacy structures kept for full-fidelity restores
CREATE TABLE IF NOT EXISTS legacy_snapshots (
    key TEXT PRIMARY KEY,
    data TEXT NOT NULL,
    updated_at INTEGER NOT NULL
);
";

/// Apply the schema to a connection.
///
/// # Errors
///
/// Returns an error if a pragma or DDL statement fails.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;

    conn.execute_batch(SCHEMA_SQL)?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
        rusqlite::params![
            format!("v{CURRENT_SCHEMA_VERSION}"),
            chrono::Utc::now().timestamp_millis()
        ],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_schema() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).expect("Failed to apply schema");

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert!(tables.contains(&"domains".to_string()));
        assert!(tables.contains(&"records".to_string()));
        assert!(tables.contains(&"legacy_snapshots".to_string()));
        assert!(tables.contains(&"schema_migrations".to_string()));
    }

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        apply_schema(&conn).expect("First apply failed");
        apply_schema(&conn).expect("Second apply failed");

        let versions: i32 = conn
            .query_row("SELECT COUNT(*) FROM schema_migrations", [], |row| row.get(0))
            .unwrap();
        assert_eq!(versions, 1);
    }

    #[test]
    fn test_records_cascade_with_domain() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();

        conn.execute(
            "INSERT INTO domains (name, content_hash, record_count, updated_at)
             VALUES ('tasks', 'h', 1, 0)",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO records (domain, position, record_id, data) VALUES ('tasks', 0, '1', '{}')",
            [],
        )
        .unwrap();
        conn.execute("DELETE FROM domains WHERE name = 'tasks'", []).unwrap();

        let remaining: i32 = conn
            .query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))
            .unwrap();
        assert_eq!(remaining, 0);
    }
}
