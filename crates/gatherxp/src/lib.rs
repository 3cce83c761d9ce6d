//! # GATHERXP Module
//!
//! The host-facing half of the gathering experience module. Everything with
//! a side effect lives here; the math lives in `gatherxp_core`.
//!
//! ## Layers
//!
//! ```text
//!  host engine ──> GatherEventSink (service) ──> calc + catalog snapshot
//!                        │
//!  operator ──> commands ──> admin ──> GatheringStore ──> reload ──> publish
//! ```
//!
//! ## Failure Policy
//!
//! - Startup: a broken or missing table loads as empty, with a warning.
//!   The module always comes up.
//! - Reload: a store failure aborts the rebuild; the prior snapshot keeps
//!   serving and the generation does not advance.
//! - Admin mutations: validation happens before storage is touched; a
//!   reload failure after a successful write is a warning, not an error.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod admin;
pub mod commands;
pub mod config;
pub mod loader;
pub mod service;
pub mod store;

pub use admin::StatusReport;
pub use commands::handle_command;
pub use config::ModuleConfig;
pub use service::{Character, GatherEventSink, GatheringExperience, MockCharacter};
pub use store::{DefinitionRow, GatheringStore, MemoryStore, SettingRow, TomlStore, ZoneRow};
