//! SQLite structured store.
//!
//! Domains are stored one row per record. Writes of a whole import go
//! through [`SqliteStore::mutate`], which wraps them in a single IMMEDIATE
//! transaction and records which domains were written or skipped.

use std::path::Path;
use std::time::Duration;

use rusqlite::{Connection, OptionalExtension, Transaction, params};
use serde_json::Value;
use tracing::{debug, info};

use super::StructuredStore;
use super::migrations::compat_fields;
use super::schema::apply_schema;
use crate::error::{Error, Result};
use crate::model::{Domain, ImportDocument};
use crate::transfer::hash::{content_hash, has_changed};

/// SQLite-backed structured store.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

/// Context for a write operation, tracking which domains it touched.
#[derive(Debug, Default)]
pub struct WriteContext {
    /// Name of the operation being performed.
    pub op_name: String,
    pub written: Vec<Domain>,
    /// Domains whose content hash matched the stored one.
    pub unchanged: Vec<Domain>,
    pub legacy_keys: Vec<&'static str>,
}

impl WriteContext {
    #[must_use]
    pub fn new(op_name: &str) -> Self {
        Self {
            op_name: op_name.to_string(),
            ..Self::default()
        }
    }
}

/// Stored state of one domain, for status output.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DomainSummary {
    pub name: String,
    pub record_count: usize,
    /// Unix milliseconds
    pub updated_at: i64,
}

impl SqliteStore {
    /// Open a store at the given path, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema fails.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_timeout(path, None)
    }

    /// Open a store with an optional busy timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema fails.
    pub fn open_with_timeout(path: &Path, timeout_ms: Option<u64>) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_millis(timeout_ms.unwrap_or(5000)))?;

        apply_schema(&conn)?;
        debug!(path = %path.display(), "Opened structured store");
        Ok(Self { conn })
    }

    /// Open an in-memory store (for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Execute a write inside an IMMEDIATE transaction.
    ///
    /// The closure's changes are committed together, or rolled back if it
    /// returns an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the closure or the commit fails.
    pub fn mutate<F>(&mut self, op: &str, f: F) -> Result<WriteContext>
    where
        F: FnOnce(&Transaction, &mut WriteContext) -> Result<()>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;

        let mut ctx = WriteContext::new(op);
        f(&tx, &mut ctx)?;
        tx.commit()?;

        Ok(ctx)
    }

    /// Summaries of every stored domain.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn domain_summaries(&self) -> Result<Vec<DomainSummary>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, record_count, updated_at FROM domains ORDER BY name")?;
        let rows = stmt.query_map([], |row| {
            Ok(DomainSummary {
                name: row.get(0)?,
                record_count: row.get::<_, i64>(1)?.try_into().unwrap_or(0),
                updated_at: row.get(2)?,
            })
        })?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }
}

/// Replace the records of one domain unless its content is unchanged.
fn write_domain(
    tx: &Transaction,
    ctx: &mut WriteContext,
    domain: Domain,
    records: &[Value],
    now: i64,
) -> Result<()> {
    let name = domain.storage_key();
    let hash = content_hash(records);

    let stored: Option<String> = tx
        .query_row(
            "SELECT content_hash FROM domains WHERE name = ?1",
            [name],
            |row| row.get(0),
        )
        .optional()?;

    if !has_changed(&hash, stored.as_deref()) {
        ctx.unchanged.push(domain);
        return Ok(());
    }

    tx.execute("DELETE FROM records WHERE domain = ?1", [name])?;
    tx.execute(
        "INSERT INTO domains (name, content_hash, record_count, updated_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(name) DO UPDATE SET
             content_hash = excluded.content_hash,
             record_count = excluded.record_count,
             updated_at = excluded.updated_at",
        params![name, hash, i64::try_from(records.len()).unwrap_or(i64::MAX), now],
    )?;

    let mut insert = tx.prepare(
        "INSERT INTO records (domain, position, record_id, data) VALUES (?1, ?2, ?3, ?4)",
    )?;
    for (position, record) in records.iter().enumerate() {
        let record_id = record.get("id").map(|id| match id {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        });
        insert.execute(params![
            name,
            i64::try_from(position).unwrap_or(i64::MAX),
            record_id,
            serde_json::to_string(record)?
        ])?;
    }

    ctx.written.push(domain);
    Ok(())
}

impl StructuredStore for SqliteStore {
    fn is_available(&self) -> bool {
        self.conn
            .query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .is_ok()
    }

    fn import_all(&mut self, document: &ImportDocument) -> Result<()> {
        let now = chrono::Utc::now().timestamp_millis();

        let ctx = self.mutate("import_all", |tx, ctx| {
            for domain in document.domains() {
                if let Some(records) = document.records(domain) {
                    write_domain(tx, ctx, domain, records, now)?;
                }
            }

            for (field, legacy_key) in compat_fields() {
                if let Some(raw) = document.compat_field(field) {
                    tx.execute(
                        "INSERT INTO legacy_snapshots (key, data, updated_at) VALUES (?1, ?2, ?3)
                         ON CONFLICT(key) DO UPDATE SET data = excluded.data, updated_at = excluded.updated_at",
                        params![legacy_key, serde_json::to_string(raw)?, now],
                    )?;
                    ctx.legacy_keys.push(legacy_key);
                }
            }
            Ok(())
        })?;

        info!(
            op = %ctx.op_name,
            written = ctx.written.len(),
            unchanged = ctx.unchanged.len(),
            legacy = ctx.legacy_keys.len(),
            "Structured store write complete"
        );
        Ok(())
    }

    fn load_domain(&self, domain: Domain) -> Result<Option<Vec<Value>>> {
        let name = domain.storage_key();
        let present = self
            .conn
            .prepare("SELECT 1 FROM domains WHERE name = ?1")?
            .exists([name])?;
        if !present {
            return Ok(None);
        }

        let mut stmt = self
            .conn
            .prepare("SELECT data FROM records WHERE domain = ?1 ORDER BY position ASC")?;
        let rows = stmt.query_map([name], |row| row.get::<_, String>(0))?;

        let mut records = Vec::new();
        for data in rows {
            records.push(serde_json::from_str(&data?)?);
        }
        Ok(Some(records))
    }

    fn load_legacy(&self, key: &str) -> Result<Option<Value>> {
        let data: Option<String> = self
            .conn
            .query_row(
                "SELECT data FROM legacy_snapshots WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        data.map(|d| serde_json::from_str(&d).map_err(Error::from))
            .transpose()
    }
}
