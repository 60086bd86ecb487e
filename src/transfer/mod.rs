//! Backup export and restore.
//!
//! - **Export**: storage → [`ExportDocument`](crate::model::ExportDocument) → validated JSON file
//! - **Import**: JSON file → validation → [`StorageAdapter`](crate::storage::StorageAdapter)
//! - **Hashing**: SHA256 content hashes so unchanged domains are not rewritten
//!
//! # Example
//!
//! ```ignore
//! use haven::storage::{FileStore, StorageAdapter};
//! use haven::transfer::{FileDownload, export_json, import_json};
//!
//! let mut storage = StorageAdapter::new(Box::new(FileStore::open(&path)?));
//! export_json(&storage, &mut FileDownload::new("backups"))?;
//! import_json(&mut storage, Path::new("backup.json")).await?;
//! ```

pub mod builder;
pub mod export;
pub mod file;
pub mod hash;
pub mod import;

pub use builder::{build_export_document, build_export_document_at, format_exported_at};
pub use export::{DownloadSink, FileDownload, WriterDownload, export_filename, export_json};
pub use file::{atomic_write, read_text};
pub use hash::{content_hash, has_changed};
pub use import::{import_json, import_json_str};
