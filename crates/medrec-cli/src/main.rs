//! # medrec CLI
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/`, while this
//! file only invokes `cli::run()` and handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/medrec/`: core library with UI-agnostic record logic
//! - `crates/medrec-cli/`: this terminal client, depends on the `medrec` library
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/medrec-cli/src/cli/)                     │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Context wiring + dispatch (commands.rs)                  │
//! │  - Terminal rendering with console styles (render.rs)       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (crates/medrec/src/api.rs)                       │
//! │  - Authorizes the logged-in user                            │
//! │  - Parses selectors, dispatches to command modules          │
//! │  - Returns structured `CmdResult` values                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (crates/medrec/src/commands/*)               │
//! │  - Record logic + data access                               │
//! │  - No knowledge of stdout/stderr or process exits           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything from `api.rs` inward is UI agnostic. The CLI layer owns all
//! user-facing concerns: argument parsing, logger setup, context
//! initialization, dispatch, error reporting and rendering.
//!
//! ## Testing Approach
//!
//! - **Commands layer**: unit tests over the in-memory store.
//! - **CLI layer**: renderer unit tests on canned `CmdResult` values, plus
//!   end-to-end runs of the binary in `tests/` against a temporary data
//!   directory.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
