//! Aurorae Haven data core.
//!
//! This crate provides backup, restore and legacy migration for the
//! Aurorae Haven productivity data, and the `haven` CLI over it.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`model`] - Data types (Task, Routine, Habit, Note, ScheduleDay, documents)
//! - [`validate`] - Shape check for import payloads
//! - [`storage`] - Storage ports, SQLite and key-string stores, fallback adapter
//! - [`transfer`] - JSON export/import
//! - [`redirect`] - Deep-link redirect path reconstruction
//! - [`reload`] - Deferred reload after an import
//! - [`config`] - Configuration management
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod redirect;
pub mod reload;
pub mod storage;
pub mod transfer;
pub mod validate;

pub use error::{Error, Result};
