//! Note repository façade.

use crate::live::Live;
use crate::model::note::{Note, NoteId};
use crate::store::note_store::NoteStore;
use crate::store::StoreResult;

/// Pass-through façade decoupling consumers from the storage implementation.
///
/// Each operation mirrors a store operation 1:1.
#[derive(Clone)]
pub struct NoteRepository<S: NoteStore> {
    store: S,
}

impl<S: NoteStore> NoteRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn insert_or_replace(&self, note: &Note) -> StoreResult<NoteId> {
        self.store.insert_or_replace(note)
    }

    pub fn update(&self, note: &Note) -> StoreResult<()> {
        self.store.update(note)
    }

    pub fn delete_by_id(&self, id: NoteId) -> StoreResult<()> {
        self.store.delete_by_id(id)
    }

    pub fn get_by_id(&self, id: NoteId) -> StoreResult<Option<Note>> {
        self.store.get_by_id(id)
    }

    pub fn live_all(&self) -> StoreResult<Live<Vec<Note>>> {
        self.store.live_all()
    }

    pub fn live_by_category(&self, category_id: i64) -> StoreResult<Live<Vec<Note>>> {
        self.store.live_by_category(category_id)
    }

    pub fn live_search(&self, query: &str) -> StoreResult<Live<Vec<Note>>> {
        self.store.live_search(query)
    }

    pub fn live_count_by_category(&self, category_id: i64) -> StoreResult<Live<i64>> {
        self.store.live_count_by_category(category_id)
    }
}
