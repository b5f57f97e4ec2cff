//! # CLI Behavior
//!
//! This is **one possible UI client** for medrec, not the application itself.
//! The CLI is the only place that knows about terminal I/O, exit codes, and output formatting.
//!
//! For the overall architecture, see the crate-level documentation in [`crate`].
//!
//! ## Sessions Across Invocations
//!
//! `medrec login <user>` stores the user in the data directory. Later
//! commands run as that user until `medrec logout`. Every record command is
//! checked against the user's permissions before it touches the store.
//!
//! ### Naked Execution (`medrec`)
//!
//! Running `medrec` with no arguments defaults to `medrec list`.
//!
//! ### Stable Indexes
//!
//! `medrec list` numbers records by their position in the whole store, so
//! `medrec show 3` targets the same record whichever filter or page printed
//! the `3`. Records can also be selected by 11-digit UID or an id prefix.
//!
//! ## Output
//!
//! Human-readable by default. `--json` prints the structured result instead,
//! for scripting.
//!
//! ## Module Structure
//!
//! - `commands`: Context setup, dispatch and per-command handlers
//! - `render`: Output formatting (tables, record cards, messages)
//! - `setup`: Argument parsing via clap
//! - `styles`: Terminal styling constants

mod commands;
mod render;
pub mod setup;
mod styles;

pub use commands::run;
