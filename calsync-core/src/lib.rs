//! Core types for calsync.
//!
//! This crate provides the provider-neutral pieces shared by the CLI and
//! the Google Calendar provider:
//! - `Calendar`, `Event` and related types produced by a sync pass
//! - `SyncBatch`, the (deleted, upserted) shape every sync returns
//! - `CheckpointStore` for the per-calendar last-sync timestamps
//! - `CalsyncConfig`, the layered configuration

pub mod calendar;
pub mod checkpoint;
pub mod config;
pub mod error;
pub mod event;
pub mod sync;

pub use calendar::Calendar;
pub use checkpoint::CheckpointStore;
pub use config::{CalsyncConfig, GoogleApiConfig};
pub use error::{CalsyncError, CalsyncResult};
pub use event::*;
pub use sync::SyncBatch;
