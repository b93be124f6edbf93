//! stratum-core - Core library for Stratum
//!
//! This crate provides the migration entity and its classification,
//! checksum, and statement-splitting logic, deterministic natural
//! ordering, the history-table SQL builders, and configuration parsing
//! shared across all Stratum components.

pub mod checksum;
pub mod config;
pub mod error;
pub mod history;
pub mod migration;
pub mod order;

pub use checksum::content_checksum;
pub use config::Config;
pub use error::{CoreError, CoreResult};
pub use history::{HistoryRecord, HistoryTable};
pub use migration::{CallbackKind, Migration, MigrationKind, CALLBACK_KINDS};
pub use order::natural_cmp;
