//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical note record persisted by the store.
//! - Provide the timestamp validation enforced on every write path.
//!
//! # Invariants
//! - `id` is `None` until the store assigns one; assigned ids never change.
//! - `updated_at` must never be earlier than `created_at`.
//! - A note references at most one category; the reference is nullable.

use super::now_epoch_ms;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable note identifier assigned by the store.
pub type NoteId = i64;

/// A single text note.
///
/// The record is replaced wholesale on save; there is no partial-field
/// update path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// `None` before first persist; `Some` once the store assigned a row id.
    pub id: Option<NoteId>,
    pub title: String,
    pub content: String,
    /// Optional owning category. Cleared by the store when that category is
    /// deleted.
    pub category_id: Option<i64>,
    /// Creation time in epoch milliseconds. Fixed for the note's lifetime.
    pub created_at: i64,
    /// Last-modified time in epoch milliseconds.
    pub updated_at: i64,
}

/// Validation failure for a note record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    /// `updated_at` precedes `created_at`.
    UpdatedBeforeCreated { created_at: i64, updated_at: i64 },
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UpdatedBeforeCreated {
                created_at,
                updated_at,
            } => write!(
                f,
                "note updated_at {updated_at} precedes created_at {created_at}"
            ),
        }
    }
}

impl Error for NoteValidationError {}

impl Note {
    /// Creates an unsaved note stamped with the current time.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        let now = now_epoch_ms();
        Self {
            id: None,
            title: title.into(),
            content: content.into(),
            category_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Checks record-level invariants before persistence.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.updated_at < self.created_at {
            return Err(NoteValidationError::UpdatedBeforeCreated {
                created_at: self.created_at,
                updated_at: self.updated_at,
            });
        }
        Ok(())
    }

    /// Whether the note carries any user-entered text.
    ///
    /// The UI uses the same predicate to decide if save is offered; the core
    /// itself accepts empty saves.
    pub fn has_content(&self) -> bool {
        !self.title.is_empty() || !self.content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{Note, NoteValidationError};

    #[test]
    fn new_note_has_no_id_and_equal_timestamps() {
        let note = Note::new("title", "body");
        assert!(note.id.is_none());
        assert_eq!(note.created_at, note.updated_at);
        assert!(note.category_id.is_none());
    }

    #[test]
    fn validate_rejects_updated_before_created() {
        let mut note = Note::new("t", "c");
        note.updated_at = note.created_at - 1;
        let err = note.validate().unwrap_err();
        assert!(matches!(
            err,
            NoteValidationError::UpdatedBeforeCreated { .. }
        ));
    }

    #[test]
    fn has_content_requires_title_or_content() {
        assert!(!Note::new("", "").has_content());
        assert!(Note::new("only title", "").has_content());
        assert!(Note::new("", "only body").has_content());
    }
}
