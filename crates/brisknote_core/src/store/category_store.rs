//! Category storage contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide category CRUD plus the live collection views subscribe to.
//! - Own the set-null referential action on delete.
//!
//! # Invariants
//! - Deleting a category nullifies `category_id` on referencing notes in
//!   the same transaction as the row delete; both scopes' live queries
//!   refresh only after commit, note views before category views, so no
//!   subscriber observes the category gone while a note still references
//!   it.
//! - The live collection is ordered `created_at ASC, id ASC`.

use crate::live::Live;
use crate::model::category::{Category, CategoryId};
use crate::store::sqlite::{Scope, SqliteStore};
use crate::store::{StoreError, StoreResult};
use log::debug;
use rusqlite::{params, OptionalExtension, Row};

const CATEGORY_SELECT_SQL: &str = "SELECT id, name, color, created_at FROM categories";

/// Storage operations for categories.
pub trait CategoryStore {
    /// Persists the record, assigning an id when it has none.
    fn insert_or_replace(&self, category: &Category) -> StoreResult<CategoryId>;
    /// Replaces an existing row; `NotFound` when no row has the record's id.
    fn update(&self, category: &Category) -> StoreResult<()>;
    /// Removes a category and clears the reference on every note that
    /// pointed at it. Deleting an absent id is a no-op.
    fn delete_by_id(&self, id: CategoryId) -> StoreResult<()>;
    fn get_by_id(&self, id: CategoryId) -> StoreResult<Option<Category>>;
    /// All categories in creation order.
    fn live_all(&self) -> StoreResult<Live<Vec<Category>>>;
}

impl CategoryStore for SqliteStore {
    fn insert_or_replace(&self, category: &Category) -> StoreResult<CategoryId> {
        let id = {
            let conn = self.lock_conn();
            match category.id {
                Some(id) => {
                    conn.execute(
                        "INSERT OR REPLACE INTO categories (id, name, color, created_at)
                         VALUES (?1, ?2, ?3, ?4);",
                        params![id, category.name, category.color, category.created_at],
                    )?;
                    id
                }
                None => {
                    conn.execute(
                        "INSERT INTO categories (name, color, created_at)
                         VALUES (?1, ?2, ?3);",
                        params![category.name, category.color, category.created_at],
                    )?;
                    conn.last_insert_rowid()
                }
            }
        };

        debug!("event=category_write module=store status=ok op=insert_or_replace id={id}");
        self.notify(&[Scope::Categories]);
        Ok(id)
    }

    fn update(&self, category: &Category) -> StoreResult<()> {
        let id = category.id.ok_or(StoreError::MissingId {
            entity: "category",
        })?;

        let changed = {
            let conn = self.lock_conn();
            conn.execute(
                "UPDATE categories
                 SET name = ?2, color = ?3, created_at = ?4
                 WHERE id = ?1;",
                params![id, category.name, category.color, category.created_at],
            )?
        };

        if changed == 0 {
            return Err(StoreError::NotFound {
                entity: "category",
                id,
            });
        }

        debug!("event=category_write module=store status=ok op=update id={id}");
        self.notify(&[Scope::Categories]);
        Ok(())
    }

    fn delete_by_id(&self, id: CategoryId) -> StoreResult<()> {
        let deleted = {
            let mut conn = self.lock_conn();
            let tx = conn.transaction()?;
            tx.execute(
                "UPDATE notes SET category_id = NULL WHERE category_id = ?1;",
                [id],
            )?;
            let deleted = tx.execute("DELETE FROM categories WHERE id = ?1;", [id])?;
            tx.commit()?;
            deleted
        };

        if deleted > 0 {
            debug!("event=category_write module=store status=ok op=delete id={id}");
            self.notify(&[Scope::Notes, Scope::Categories]);
        }
        Ok(())
    }

    fn get_by_id(&self, id: CategoryId) -> StoreResult<Option<Category>> {
        let conn = self.lock_conn();
        let category = conn
            .query_row(
                &format!("{CATEGORY_SELECT_SQL} WHERE id = ?1;"),
                [id],
                category_from_row,
            )
            .optional()?;
        Ok(category)
    }

    fn live_all(&self) -> StoreResult<Live<Vec<Category>>> {
        self.register_live(Scope::Categories, |conn| {
            let mut stmt = conn.prepare(&format!(
                "{CATEGORY_SELECT_SQL} ORDER BY created_at ASC, id ASC;"
            ))?;
            let mut rows = stmt.query([])?;
            let mut categories = Vec::new();
            while let Some(row) = rows.next()? {
                categories.push(category_from_row(row)?);
            }
            Ok(categories)
        })
    }
}

fn category_from_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: Some(row.get("id")?),
        name: row.get("name")?,
        color: row.get("color")?,
        created_at: row.get("created_at")?,
    })
}
