//! # medrec
//!
//! Core library for managing patient medical records: a validated,
//! persisted record store with role-based access, a filter/sort/paginate
//! table engine, inline cell editing, JSON/CSV import and export, and summary
//! statistics.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │  UI client   │──►│  MedrecApi   │──►│   commands   │──►│    store     │
//! │  (CLI, ...)  │   │ (auth gate)  │   │  (logic)     │   │ (persisted)  │
//! └──────────────┘   └──────────────┘   └──────────────┘   └──────────────┘
//! ```
//!
//! - [`api`]: The facade every client talks to. Authorizes, parses selectors,
//!   dispatches.
//! - [`commands`]: One module per operation. Returns [`commands::CmdResult`]
//!   with leveled messages instead of printing.
//! - [`store`]: [`store::RecordRepository`] over a key-value
//!   [`store::backend::StorageBackend`] (filesystem or memory).
//! - [`table`]: Pure filter → sort → paginate pipeline and the cell editor.
//! - [`codec`]: JSON and CSV conversion.
//! - [`auth`]: Users, roles, permissions and the mock login session.
//! - [`validation`]: Field format rules shared by the form and imports.
//! - [`stats`]: Record counts, blood groups, BMI, registrations over time.
//! - [`config`] and [`init`]: Settings and wiring for a data directory.
//!
//! The library never writes to stdout or stderr. It logs through the `log`
//! facade and leaves the choice of logger to the binary.

pub mod api;
pub mod auth;
pub mod codec;
pub mod commands;
pub mod config;
pub mod error;
pub mod index;
pub mod init;
pub mod model;
pub mod stats;
pub mod store;
pub mod table;
pub mod validation;

#[cfg(test)]
pub mod test_utils;

pub use error::{MedrecError, Result};
