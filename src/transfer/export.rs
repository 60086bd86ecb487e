//! JSON export.
//!
//! The export is a single pretty-printed JSON document handed to a
//! [`DownloadSink`] under a dated filename.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use tracing::info;

use super::builder::build_export_document_at;
use super::file::atomic_write;
use crate::error::Result;
use crate::storage::StorageAdapter;
use crate::validate::validate;

/// Destination for a finished export.
pub trait DownloadSink {
    /// Deliver `contents` under `filename`.
    ///
    /// # Errors
    ///
    /// Returns an error if the contents cannot be written.
    fn deliver(&mut self, filename: &str, contents: &str) -> Result<()>;
}

/// Writes exports into a directory.
#[derive(Debug, Clone)]
pub struct FileDownload {
    dir: PathBuf,
    written: Option<PathBuf>,
}

impl FileDownload {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: None,
        }
    }

    /// Path of the last delivered file.
    #[must_use]
    pub fn written(&self) -> Option<&Path> {
        self.written.as_deref()
    }
}

impl DownloadSink for FileDownload {
    fn deliver(&mut self, filename: &str, contents: &str) -> Result<()> {
        let path = self.dir.join(filename);
        atomic_write(&path, contents)?;
        self.written = Some(path);
        Ok(())
    }
}

/// Writes exports to any writer, ignoring the filename.
#[derive(Debug)]
pub struct WriterDownload<W: Write> {
    writer: W,
}

impl<W: Write> WriterDownload<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> DownloadSink for WriterDownload<W> {
    fn deliver(&mut self, _filename: &str, contents: &str) -> Result<()> {
        writeln!(self.writer, "{contents}")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Filename for an export made on `date`.
#[must_use]
pub fn export_filename(date: NaiveDate) -> String {
    format!("aurorae-haven-export-{}.json", date.format("%Y-%m-%d"))
}

/// Build, validate and deliver an export of everything in `storage`.
///
/// # Errors
///
/// Returns [`Error::Validation`](crate::error::Error::Validation) if the
/// built document does not pass validation, or an error from the sink.
pub fn export_json(storage: &StorageAdapter, sink: &mut dyn DownloadSink) -> Result<bool> {
    let now = Utc::now();
    let document = build_export_document_at(storage, now);

    let value = serde_json::to_value(&document)?;
    validate(&value).into_result()?;

    let contents = serde_json::to_string_pretty(&value)?;
    let filename = export_filename(now.date_naive());
    sink.deliver(&filename, &contents)?;

    info!(
        file = %filename,
        records = document.total(),
        "Exported data"
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore};
    use serde_json::Value;
    use tempfile::TempDir;

    #[test]
    fn test_export_filename() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 9).unwrap();
        assert_eq!(export_filename(date), "aurorae-haven-export-2025-01-09.json");
    }

    #[test]
    fn test_export_to_directory() {
        let temp_dir = TempDir::new().unwrap();
        let mut kv = MemoryStore::new();
        kv.set("habits", r#"[{"id":"h1","name":"Stretch","streak":4}]"#)
            .unwrap();
        let adapter = StorageAdapter::new(Box::new(kv));

        let mut sink = FileDownload::new(temp_dir.path());
        assert!(export_json(&adapter, &mut sink).unwrap());

        let path = sink.written().unwrap().to_path_buf();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("aurorae-haven-export-"));
        assert!(name.ends_with(".json"));

        let exported: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(exported["habits"][0]["streak"], 4);
        assert_eq!(exported["tasks"], serde_json::json!([]));

        let leftovers: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|x| x == "tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_export_to_writer() {
        let adapter = StorageAdapter::new(Box::new(MemoryStore::new()));
        let mut buf = Vec::new();
        export_json(&adapter, &mut WriterDownload::new(&mut buf)).unwrap();

        let out = String::from_utf8(buf).unwrap();
        let exported: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(exported["version"], 1);
        assert!(exported["exportedAt"].as_str().unwrap().ends_with('Z'));
    }
}
