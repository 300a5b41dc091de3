//! Category repository façade.

use crate::live::Live;
use crate::model::category::{Category, CategoryId};
use crate::store::category_store::CategoryStore;
use crate::store::StoreResult;

/// Pass-through façade decoupling consumers from the storage implementation.
///
/// Each operation mirrors a store operation 1:1.
#[derive(Clone)]
pub struct CategoryRepository<C: CategoryStore> {
    store: C,
}

impl<C: CategoryStore> CategoryRepository<C> {
    pub fn new(store: C) -> Self {
        Self { store }
    }

    pub fn insert_or_replace(&self, category: &Category) -> StoreResult<CategoryId> {
        self.store.insert_or_replace(category)
    }

    pub fn update(&self, category: &Category) -> StoreResult<()> {
        self.store.update(category)
    }

    pub fn delete_by_id(&self, id: CategoryId) -> StoreResult<()> {
        self.store.delete_by_id(id)
    }

    pub fn get_by_id(&self, id: CategoryId) -> StoreResult<Option<Category>> {
        self.store.get_by_id(id)
    }

    pub fn live_all(&self) -> StoreResult<Live<Vec<Category>>> {
        self.store.live_all()
    }
}
