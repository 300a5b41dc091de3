//! Persistent store contracts and the SQLite implementation.
//!
//! # Responsibility
//! - Define per-entity storage traits consumed by the repository façades.
//! - Keep SQL details and live-query refresh behavior inside this boundary.
//!
//! # Invariants
//! - Write paths call `Note::validate()` before SQL mutations.
//! - Every mutation refreshes the registered live queries for its scope
//!   before the mutating call returns.
//! - Category deletion nullifies referencing notes in the same transaction
//!   as the row delete; live views refresh only after commit.

use crate::db::DbError;
use crate::model::note::NoteValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod category_store;
pub mod note_store;
pub mod sqlite;

pub use category_store::CategoryStore;
pub use note_store::NoteStore;
pub use sqlite::SqliteStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage-layer error for persistence and live-query operations.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Validation(NoteValidationError),
    /// Targeted row does not exist.
    NotFound { entity: &'static str, id: i64 },
    /// Operation requires a persisted record but the id is unassigned.
    MissingId { entity: &'static str },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::MissingId { entity } => {
                write!(f, "{entity} has no assigned id; persist it first")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::NotFound { .. } => None,
            Self::MissingId { .. } => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<NoteValidationError> for StoreError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}
