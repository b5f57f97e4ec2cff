//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It serves as the single
//! entry point for all medrec operations, regardless of the UI being used.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Authorizes** every operation before dispatching it
//! - **Dispatches** to the appropriate command function
//! - **Normalizes inputs** (e.g., parsing selectors like `3` or `12345678901`)
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! ## The Authorization Gate
//!
//! Every record operation passes through [`authorize`] for
//! `(Resource::Records, action)` first. A denied call returns
//! [`MedrecError::NotAuthenticated`] or [`MedrecError::PermissionDenied`]
//! and never reaches the store. Listing, viewing, exporting and statistics
//! all require `read`; there is no way to see records without it.
//!
//! | Operation | Action |
//! |-----------|--------|
//! | create, import | `create` |
//! | list, view, export, stats | `read` |
//! | update | `update` |
//! | delete, undo | `delete` |
//!
//! The acting user's username is recorded as `createdBy` / `updatedBy`.
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: That belongs in `commands/*.rs`
//! - **Terminal output**: Returns data structures, not strings
//!
//! ## Generic Over Store and Authorizer
//!
//! `MedrecApi<R: RecordRepository, A: Authorizer>`:
//! - Production: `MedrecApi<FileStore, Session<FsBackend>>`
//! - Testing: `MedrecApi<InMemoryStore, StaticAuthorizer>`

use crate::auth::{authorize, Action, Authorizer, Credentials, Resource, Session, UserPatch};
use crate::codec::ImportFormat;
use crate::commands::{self, CmdResult};
use crate::error::{MedrecError, Result};
use crate::index::RecordSelector;
use crate::model::{NewRecord, RecordField};
use crate::stats::TimeRange;
use crate::store::backend::StorageBackend;
use crate::store::RecordRepository;
use crate::table::{FilterSet, TableState};
use chrono::{NaiveDate, Utc};
use std::path::Path;

pub struct MedrecApi<R: RecordRepository, A: Authorizer> {
    store: R,
    auth: A,
}

impl<R: RecordRepository, A: Authorizer> MedrecApi<R, A> {
    pub fn new(store: R, auth: A) -> Self {
        Self { store, auth }
    }

    pub fn store(&self) -> &R {
        &self.store
    }

    pub fn authorizer(&self) -> &A {
        &self.auth
    }

    /// Checks `action` on records and returns the acting username.
    fn gate(&self, action: Action) -> Result<String> {
        authorize(&self.auth, Resource::Records, action).into_result()?;
        self.auth
            .current_user()
            .map(|u| u.username.clone())
            .ok_or(MedrecError::NotAuthenticated)
    }

    pub fn can(&self, action: Action) -> bool {
        authorize(&self.auth, Resource::Records, action).is_allowed()
    }

    pub fn create_record(&mut self, new: NewRecord) -> Result<CmdResult> {
        let actor = self.gate(Action::Create)?;
        commands::create::run(&mut self.store, new, &actor)
    }

    pub fn list_records(&self, state: &TableState) -> Result<CmdResult> {
        self.gate(Action::Read)?;
        commands::list::run(&self.store, state)
    }

    pub fn view_record(&self, selector: &str) -> Result<CmdResult> {
        self.gate(Action::Read)?;
        let selector: RecordSelector = selector.parse()?;
        commands::view::run(&self.store, &selector)
    }

    pub fn update_record(
        &mut self,
        selector: &str,
        field: RecordField,
        value: &str,
    ) -> Result<CmdResult> {
        let actor = self.gate(Action::Update)?;
        let selector: RecordSelector = selector.parse()?;
        commands::update::run(&mut self.store, &selector, field, value, &actor)
    }

    pub fn delete_record(&mut self, selector: &str) -> Result<CmdResult> {
        self.gate(Action::Delete)?;
        let selector: RecordSelector = selector.parse()?;
        commands::delete::run(&mut self.store, &selector)
    }

    pub fn undo_delete(&mut self) -> Result<CmdResult> {
        self.gate(Action::Delete)?;
        commands::undo::run(&mut self.store)
    }

    pub fn render_export(&self, format: ImportFormat, filters: &FilterSet) -> Result<String> {
        self.gate(Action::Read)?;
        commands::export::render(&self.store, format, filters).map(|(text, _)| text)
    }

    pub fn export_records(
        &self,
        format: ImportFormat,
        filters: &FilterSet,
        path: &Path,
    ) -> Result<CmdResult> {
        self.gate(Action::Read)?;
        commands::export::run(&self.store, format, filters, path)
    }

    pub fn import_records(&mut self, path: &Path) -> Result<CmdResult> {
        let actor = self.gate(Action::Create)?;
        commands::import::run(&mut self.store, path, &actor, Utc::now())
    }

    pub fn stats(&self, range: TimeRange, today: NaiveDate) -> Result<CmdResult> {
        self.gate(Action::Read)?;
        commands::stats::run(&self.store, range, today)
    }
}

/// Account operations, available when the authorizer is a [`Session`].
impl<R: RecordRepository, B: StorageBackend> MedrecApi<R, Session<B>> {
    pub fn login(&mut self, credentials: &Credentials) -> Result<CmdResult> {
        commands::account::login(&mut self.auth, credentials)
    }

    pub fn logout(&mut self) -> Result<CmdResult> {
        commands::account::logout(&mut self.auth)
    }

    pub fn whoami(&self) -> Result<CmdResult> {
        commands::account::whoami(&self.auth)
    }

    pub fn update_profile(&mut self, patch: UserPatch) -> Result<CmdResult> {
        commands::account::update_profile(&mut self.auth, patch)
    }
}

pub use crate::commands::{CmdMessage, MessageLevel, PageInfo, StatsReport};
