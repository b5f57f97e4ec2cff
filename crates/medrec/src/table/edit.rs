//! Inline cell editing.
//!
//! A [`CellEditor`] tracks one table cell through `Viewing → Editing →
//! Viewing`. It stages text and decides *whether* to save; it does not
//! validate. Whatever `save` does with the value (reject it, persist it,
//! report an error) is the caller's business, and the editor returns to
//! viewing either way.

use crate::model::RecordField;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditState {
    Viewing,
    Editing { buffer: String },
}

/// Side effect the host should perform after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditEffect {
    /// Put keyboard focus on the cell's input.
    FocusInput,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter { shift: bool },
    Escape,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The buffer differed from the original and `save` was called.
    Saved,
    /// Committed without change; `save` was not called.
    Unchanged,
    Cancelled,
    /// The key or call had no effect in the current state.
    Ignored,
}

#[derive(Debug, Clone)]
pub struct CellEditor {
    record_id: String,
    field: RecordField,
    original: String,
    state: EditState,
}

impl CellEditor {
    pub fn new(record_id: impl Into<String>, field: RecordField, value: impl Into<String>) -> Self {
        Self {
            record_id: record_id.into(),
            field,
            original: value.into(),
            state: EditState::Viewing,
        }
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, EditState::Editing { .. })
    }

    pub fn field(&self) -> RecordField {
        self.field
    }

    /// The staged text while editing.
    pub fn buffer(&self) -> Option<&str> {
        match &self.state {
            EditState::Editing { buffer } => Some(buffer),
            EditState::Viewing => None,
        }
    }

    /// Double-click. A second call while editing keeps the current buffer.
    pub fn begin_edit(&mut self) -> EditEffect {
        if self.is_editing() {
            return EditEffect::None;
        }
        self.state = EditState::Editing {
            buffer: self.original.clone(),
        };
        EditEffect::FocusInput
    }

    pub fn set_buffer(&mut self, text: impl Into<String>) {
        if let EditState::Editing { buffer } = &mut self.state {
            *buffer = text.into();
        }
    }

    /// Blur or confirm. Calls `save(record_id, field, value)` only when the
    /// buffer differs from the value the edit started with, and hands back
    /// whatever `save` returned. The editor returns to viewing either way.
    pub fn commit<F, R>(&mut self, save: F) -> (EditOutcome, Option<R>)
    where
        F: FnOnce(&str, RecordField, &str) -> R,
    {
        let EditState::Editing { buffer } = std::mem::replace(&mut self.state, EditState::Viewing)
        else {
            return (EditOutcome::Ignored, None);
        };
        if buffer == self.original {
            return (EditOutcome::Unchanged, None);
        }
        let saved = save(&self.record_id, self.field, &buffer);
        (EditOutcome::Saved, Some(saved))
    }

    pub fn cancel(&mut self) -> EditOutcome {
        if !self.is_editing() {
            return EditOutcome::Ignored;
        }
        self.state = EditState::Viewing;
        EditOutcome::Cancelled
    }

    pub fn handle_key<F, R>(&mut self, key: Key, save: F) -> (EditOutcome, Option<R>)
    where
        F: FnOnce(&str, RecordField, &str) -> R,
    {
        match key {
            Key::Enter { shift: false } => self.commit(save),
            Key::Escape => (self.cancel(), None),
            _ => (EditOutcome::Ignored, None),
        }
    }
}
