//! Styles for the medrec CLI.
//!
//! Rendering code asks for styles by what the text *is* (an index, a
//! timestamp, a warning), never by color. The palette below is the only place
//! that maps those roles to colors, so retheming touches this file alone.
//!
//! Styling is applied through `console`, which drops the escape codes when
//! stdout is not a terminal or `NO_COLOR` is set. Tests and pipes therefore
//! see plain text.
//!
//! The roles are:
//!
//!     * Muted text (metadata such as timestamps and column headers)
//!     * Faint text (separators)
//!     * Index text (the canonical record number)
//!     * Title text (patient names, section headings)
//!     * Label text (field names on the record card)
//!     * Message levels: info, success, warning, error

use console::Style;
use once_cell::sync::Lazy;

pub static MUTED: Lazy<Style> = Lazy::new(|| Style::new().color256(245));
pub static FAINT: Lazy<Style> = Lazy::new(|| Style::new().color256(240));
pub static INDEX: Lazy<Style> = Lazy::new(|| Style::new().color256(178));
pub static TITLE: Lazy<Style> = Lazy::new(|| Style::new().bold());
pub static LABEL: Lazy<Style> = Lazy::new(|| Style::new().cyan());
pub static TIME: Lazy<Style> = Lazy::new(|| Style::new().color256(245).italic());

pub static INFO: Lazy<Style> = Lazy::new(|| Style::new().color256(245));
pub static SUCCESS: Lazy<Style> = Lazy::new(|| Style::new().green());
pub static WARNING: Lazy<Style> = Lazy::new(|| Style::new().yellow().bold());
pub static ERROR: Lazy<Style> = Lazy::new(|| Style::new().red().bold());
