use crate::auth::{Action, Resource};
use crate::model::RecordField;
use crate::validation::ValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MedrecError {
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("A record with UID {0} already exists")]
    DuplicateUid(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("'{0}' matches more than one record")]
    AmbiguousSelector(String),

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Field {0} cannot be edited")]
    FieldNotEditable(RecordField),

    #[error("You do not have permission to {action} {resource}")]
    PermissionDenied { resource: Resource, action: Action },

    #[error("You must be logged in")]
    NotAuthenticated,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Import failed: {0}")]
    Parse(String),

    #[error("Unsupported file format: {0}. Use .json or .csv")]
    UnsupportedFormat(String),

    #[error("Another import is already in progress")]
    ImportInProgress,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, MedrecError>;
