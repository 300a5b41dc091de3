//! In-memory edit session for one note creation/edit interaction.
//!
//! # Responsibility
//! - Track the target note, field values and save completion for a single
//!   editing interaction.
//!
//! # Invariants
//! - A session edits at most one note at a time; `reset` is the only way to
//!   retarget it.
//! - Saving an existing note preserves the original `created_at` and
//!   refreshes `updated_at`.
//! - A load that finds no row leaves the session untouched; only storage
//!   failures propagate.

use crate::live::{relock, Live};
use crate::model::category::CategoryId;
use crate::model::note::{Note, NoteId};
use crate::model::now_epoch_ms;
use crate::repo::note_repo::NoteRepository;
use crate::store::note_store::NoteStore;
use crate::store::StoreResult;
use log::debug;
use std::sync::Mutex;

/// Lifecycle of one edit session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditState {
    /// No target; saving creates a new note.
    New,
    /// Fields populated from an existing note, not yet modified.
    Loaded,
    /// At least one field mutated since New/Loaded.
    Dirty,
    /// Save completed. Terminal until `reset`.
    Saved,
}

#[derive(Clone, Copy)]
enum EditTarget {
    New,
    Existing { note_id: NoteId, created_at: i64 },
}

/// Per-interaction edit state machine.
///
/// Field values are exposed as live values so the edit screen can bind to
/// them; mutating commands are plain methods.
pub struct EditSession<S: NoteStore> {
    repo: NoteRepository<S>,
    target: Mutex<EditTarget>,
    state: Mutex<EditState>,
    title: Live<String>,
    content: Live<String>,
    category_id: Live<Option<CategoryId>>,
    is_saved: Live<bool>,
}

impl<S: NoteStore> EditSession<S> {
    /// Creates an empty session targeting a new note.
    pub fn new(repo: NoteRepository<S>) -> Self {
        Self {
            repo,
            target: Mutex::new(EditTarget::New),
            state: Mutex::new(EditState::New),
            title: Live::new(String::new()),
            content: Live::new(String::new()),
            category_id: Live::new(None),
            is_saved: Live::new(false),
        }
    }

    pub fn title(&self) -> Live<String> {
        self.title.clone()
    }

    pub fn content(&self) -> Live<String> {
        self.content.clone()
    }

    pub fn category_id(&self) -> Live<Option<CategoryId>> {
        self.category_id.clone()
    }

    pub fn is_saved(&self) -> Live<bool> {
        self.is_saved.clone()
    }

    pub fn state(&self) -> EditState {
        *relock(&self.state)
    }

    /// Id of the note being edited, once known.
    pub fn target_id(&self) -> Option<NoteId> {
        match *relock(&self.target) {
            EditTarget::New => None,
            EditTarget::Existing { note_id, .. } => Some(note_id),
        }
    }

    /// Populates the session from an existing note.
    ///
    /// A missing row is a designed soft-failure: the session keeps its
    /// current (empty) state. Storage errors propagate.
    pub fn load(&self, id: NoteId) -> StoreResult<()> {
        let Some(note) = self.repo.get_by_id(id)? else {
            debug!("event=edit_load module=service status=ok outcome=not_found id={id}");
            return Ok(());
        };

        *relock(&self.target) = EditTarget::Existing {
            note_id: id,
            created_at: note.created_at,
        };
        self.title.set(note.title);
        self.content.set(note.content);
        self.category_id.set(note.category_id);
        *relock(&self.state) = EditState::Loaded;
        Ok(())
    }

    pub fn set_title(&self, title: impl Into<String>) {
        self.title.set(title.into());
        self.mark_dirty();
    }

    pub fn set_content(&self, content: impl Into<String>) {
        self.content.set(content.into());
        self.mark_dirty();
    }

    pub fn set_category(&self, category_id: Option<CategoryId>) {
        self.category_id.set(category_id);
        self.mark_dirty();
    }

    /// Whether the session carries any user-entered text.
    ///
    /// The edit screen uses this to decide if save is offered; `save` itself
    /// accepts empty notes.
    pub fn has_content(&self) -> bool {
        !self.title.get().is_empty() || !self.content.get().is_empty()
    }

    /// Persists the session: inserts when there is no target, otherwise
    /// updates the target row in place.
    pub fn save(&self) -> StoreResult<NoteId> {
        let now = now_epoch_ms();
        let id = {
            let mut target = relock(&self.target);
            match *target {
                EditTarget::Existing {
                    note_id,
                    created_at,
                } => {
                    let note = Note {
                        id: Some(note_id),
                        title: self.title.get(),
                        content: self.content.get(),
                        category_id: self.category_id.get(),
                        created_at,
                        updated_at: now,
                    };
                    self.repo.update(&note)?;
                    note_id
                }
                EditTarget::New => {
                    let note = Note {
                        id: None,
                        title: self.title.get(),
                        content: self.content.get(),
                        category_id: self.category_id.get(),
                        created_at: now,
                        updated_at: now,
                    };
                    let note_id = self.repo.insert_or_replace(&note)?;
                    *target = EditTarget::Existing {
                        note_id,
                        created_at: now,
                    };
                    note_id
                }
            }
        };

        *relock(&self.state) = EditState::Saved;
        self.is_saved.set(true);
        debug!("event=edit_save module=service status=ok id={id}");
        Ok(id)
    }

    /// Clears the session back to an empty new-note state. Idempotent.
    pub fn reset(&self) {
        *relock(&self.target) = EditTarget::New;
        *relock(&self.state) = EditState::New;
        self.title.set(String::new());
        self.content.set(String::new());
        self.category_id.set(None);
        self.is_saved.set(false);
    }

    fn mark_dirty(&self) {
        *relock(&self.state) = EditState::Dirty;
    }
}
