//! Note storage contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide note CRUD plus the live collections list views subscribe to.
//!
//! # Invariants
//! - All list queries are ordered `updated_at DESC, id ASC` so equal
//!   timestamps have a deterministic order across re-runs.
//! - Substring search matches title or content literally; `%`, `_` and `\`
//!   in the query are escaped. Matching is ASCII case-insensitive, which is
//!   SQLite's `LIKE` default.

use crate::live::Live;
use crate::model::note::{Note, NoteId};
use crate::store::sqlite::{escape_like, Scope, SqliteStore};
use crate::store::{StoreError, StoreResult};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row};

const NOTE_SELECT_SQL: &str =
    "SELECT id, title, content, category_id, created_at, updated_at FROM notes";

/// Storage operations for notes.
pub trait NoteStore {
    /// Persists the record, assigning an id when it has none. An existing
    /// id replaces that row wholesale.
    fn insert_or_replace(&self, note: &Note) -> StoreResult<NoteId>;
    /// Replaces an existing row; `NotFound` when no row has the note's id.
    fn update(&self, note: &Note) -> StoreResult<()>;
    /// Removes a row by id. Deleting an absent id is a no-op.
    fn delete_by_id(&self, id: NoteId) -> StoreResult<()>;
    fn get_by_id(&self, id: NoteId) -> StoreResult<Option<Note>>;
    /// All notes, most recently updated first.
    fn live_all(&self) -> StoreResult<Live<Vec<Note>>>;
    /// Notes belonging to one category, most recently updated first.
    fn live_by_category(&self, category_id: i64) -> StoreResult<Live<Vec<Note>>>;
    /// Notes whose title or content contains `query` literally.
    fn live_search(&self, query: &str) -> StoreResult<Live<Vec<Note>>>;
    /// Number of notes referencing one category.
    fn live_count_by_category(&self, category_id: i64) -> StoreResult<Live<i64>>;
}

impl NoteStore for SqliteStore {
    fn insert_or_replace(&self, note: &Note) -> StoreResult<NoteId> {
        note.validate()?;

        let id = {
            let conn = self.lock_conn();
            match note.id {
                Some(id) => {
                    conn.execute(
                        "INSERT OR REPLACE INTO notes
                            (id, title, content, category_id, created_at, updated_at)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
                        params![
                            id,
                            note.title,
                            note.content,
                            note.category_id,
                            note.created_at,
                            note.updated_at,
                        ],
                    )?;
                    id
                }
                None => {
                    conn.execute(
                        "INSERT INTO notes
                            (title, content, category_id, created_at, updated_at)
                         VALUES (?1, ?2, ?3, ?4, ?5);",
                        params![
                            note.title,
                            note.content,
                            note.category_id,
                            note.created_at,
                            note.updated_at,
                        ],
                    )?;
                    conn.last_insert_rowid()
                }
            }
        };

        debug!("event=note_write module=store status=ok op=insert_or_replace id={id}");
        self.notify(&[Scope::Notes]);
        Ok(id)
    }

    fn update(&self, note: &Note) -> StoreResult<()> {
        note.validate()?;
        let id = note.id.ok_or(StoreError::MissingId { entity: "note" })?;

        let changed = {
            let conn = self.lock_conn();
            conn.execute(
                "UPDATE notes
                 SET title = ?2, content = ?3, category_id = ?4,
                     created_at = ?5, updated_at = ?6
                 WHERE id = ?1;",
                params![
                    id,
                    note.title,
                    note.content,
                    note.category_id,
                    note.created_at,
                    note.updated_at,
                ],
            )?
        };

        if changed == 0 {
            return Err(StoreError::NotFound { entity: "note", id });
        }

        debug!("event=note_write module=store status=ok op=update id={id}");
        self.notify(&[Scope::Notes]);
        Ok(())
    }

    fn delete_by_id(&self, id: NoteId) -> StoreResult<()> {
        let changed = {
            let conn = self.lock_conn();
            conn.execute("DELETE FROM notes WHERE id = ?1;", [id])?
        };

        if changed > 0 {
            debug!("event=note_write module=store status=ok op=delete id={id}");
            self.notify(&[Scope::Notes]);
        }
        Ok(())
    }

    fn get_by_id(&self, id: NoteId) -> StoreResult<Option<Note>> {
        let conn = self.lock_conn();
        let note = conn
            .query_row(
                &format!("{NOTE_SELECT_SQL} WHERE id = ?1;"),
                [id],
                note_from_row,
            )
            .optional()?;
        Ok(note)
    }

    fn live_all(&self) -> StoreResult<Live<Vec<Note>>> {
        self.register_live(Scope::Notes, |conn| {
            load_notes(
                conn,
                &format!("{NOTE_SELECT_SQL} ORDER BY updated_at DESC, id ASC;"),
                params![],
            )
        })
    }

    fn live_by_category(&self, category_id: i64) -> StoreResult<Live<Vec<Note>>> {
        self.register_live(Scope::Notes, move |conn| {
            load_notes(
                conn,
                &format!(
                    "{NOTE_SELECT_SQL} WHERE category_id = ?1
                     ORDER BY updated_at DESC, id ASC;"
                ),
                params![category_id],
            )
        })
    }

    fn live_search(&self, query: &str) -> StoreResult<Live<Vec<Note>>> {
        let pattern = escape_like(query);
        self.register_live(Scope::Notes, move |conn| {
            load_notes(
                conn,
                &format!(
                    "{NOTE_SELECT_SQL}
                     WHERE title LIKE '%' || ?1 || '%' ESCAPE '\\'
                        OR content LIKE '%' || ?1 || '%' ESCAPE '\\'
                     ORDER BY updated_at DESC, id ASC;"
                ),
                params![pattern],
            )
        })
    }

    fn live_count_by_category(&self, category_id: i64) -> StoreResult<Live<i64>> {
        self.register_live(Scope::Notes, move |conn| {
            let count = conn.query_row(
                "SELECT COUNT(*) FROM notes WHERE category_id = ?1;",
                [category_id],
                |row| row.get::<_, i64>(0),
            )?;
            Ok(count)
        })
    }
}

fn load_notes(conn: &Connection, sql: &str, params: impl rusqlite::Params) -> StoreResult<Vec<Note>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    let mut notes = Vec::new();
    while let Some(row) = rows.next()? {
        notes.push(note_from_row(row)?);
    }
    Ok(notes)
}

fn note_from_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: Some(row.get("id")?),
        title: row.get("title")?,
        content: row.get("content")?,
        category_id: row.get("category_id")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
