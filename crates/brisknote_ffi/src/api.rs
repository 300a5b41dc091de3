//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Hold the process-wide core runtime (store, feed, edit session).
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every DB-backed call returns an envelope carrying `ok` + `message`.
//! - `init_core` runs once per process; repeat calls with the same paths
//!   are a no-op and any other combination is rejected.

use brisknote_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, Category, CoreConfig,
    CoreContext, Note, NoteGroup, SqliteEditSession, SqliteNoteFeed, ThemeMode,
};
use once_cell::sync::OnceCell;
use std::path::PathBuf;

static RUNTIME: OnceCell<CoreRuntime> = OnceCell::new();

struct CoreRuntime {
    db_path: PathBuf,
    settings_path: PathBuf,
    context: CoreContext,
    feed: SqliteNoteFeed,
    session: SqliteEditSession,
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - UI-thread safe for current implementation.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Opens the database and settings files and builds the shared runtime.
///
/// Input semantics:
/// - `db_path`: absolute path of the SQLite database file.
/// - `settings_path`: absolute path of the JSON settings file.
///
/// # FFI contract
/// - Sync call; opens SQLite and applies migrations.
/// - Safe to call repeatedly with the same paths (idempotent).
/// - Reconfiguration attempts with different paths return an error envelope.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn init_core(db_path: String, settings_path: String) -> ActionResponse {
    let db_path = PathBuf::from(db_path.trim());
    let settings_path = PathBuf::from(settings_path.trim());
    if db_path.as_os_str().is_empty() || settings_path.as_os_str().is_empty() {
        return ActionResponse::failure("init_core requires non-empty paths");
    }

    let result = RUNTIME.get_or_try_init(|| start_runtime(db_path.clone(), settings_path.clone()));
    match result {
        Ok(runtime) => {
            // Lost the init race: verify the winner used our configuration.
            if runtime.db_path != db_path || runtime.settings_path != settings_path {
                ActionResponse::failure(format!(
                    "core already runs on `{}`; refusing to switch to `{}`",
                    runtime.db_path.display(),
                    db_path.display()
                ))
            } else {
                ActionResponse::success("Core ready.", None)
            }
        }
        Err(err) => ActionResponse::failure(err),
    }
}

fn start_runtime(db_path: PathBuf, settings_path: PathBuf) -> Result<CoreRuntime, String> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|err| format!("cannot create data directory `{}`: {err}", parent.display()))?;
    }

    let config = CoreConfig {
        db_path: db_path.clone(),
        settings_path: settings_path.clone(),
    };
    let context = CoreContext::open(&config).map_err(|err| format!("core open failed: {err}"))?;
    let feed = context
        .note_feed()
        .map_err(|err| format!("note feed init failed: {err}"))?;
    let session = context.edit_session();

    Ok(CoreRuntime {
        db_path,
        settings_path,
        context,
        feed,
        session,
    })
}

fn runtime() -> Result<&'static CoreRuntime, String> {
    RUNTIME
        .get()
        .ok_or_else(|| "core not initialized; call init_core first".to_string())
}

/// Generic command response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Row id affected or created, when the command yields one.
    pub id: Option<i64>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, id: Option<i64>) -> Self {
        Self {
            ok: true,
            id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
        }
    }
}

/// Note record shape crossing the FFI boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FfiNote {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category_id: Option<i64>,
    /// Creation time in epoch milliseconds.
    pub created_at: i64,
    /// Last-modified time in epoch milliseconds.
    pub updated_at: i64,
}

/// One labeled recency bucket of the grouped list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FfiNoteGroup {
    /// "Today", "Yesterday", or a formatted calendar date.
    pub label: String,
    pub notes: Vec<FfiNote>,
}

/// Snapshot of the grouped list view and its active inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteGroupsResponse {
    pub ok: bool,
    pub message: String,
    pub groups: Vec<FfiNoteGroup>,
    pub search_query: String,
    pub is_searching: bool,
    pub selected_category_id: Option<i64>,
}

/// Category record shape crossing the FFI boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FfiCategory {
    pub id: i64,
    pub name: String,
    /// Packed ARGB color value.
    pub color: u32,
    pub created_at: i64,
}

/// Category list response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoriesResponse {
    pub ok: bool,
    pub message: String,
    pub categories: Vec<FfiCategory>,
}

/// Snapshot of the in-progress edit session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSnapshotResponse {
    pub ok: bool,
    pub message: String,
    /// Target note id; `None` while the session would create a new note.
    pub note_id: Option<i64>,
    pub title: String,
    pub content: String,
    pub category_id: Option<i64>,
    pub is_saved: bool,
    /// Mirror of the predicate the UI uses to enable the save action.
    pub has_content: bool,
}

/// Theme preference response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeResponse {
    pub ok: bool,
    pub message: String,
    /// 0 = light, 1 = dark, 2 = follow system.
    pub mode: i64,
}

/// Returns the grouped note list the main screen renders.
///
/// # FFI contract
/// - Sync call over in-memory live state; no SQL on this path.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn note_groups() -> NoteGroupsResponse {
    match runtime() {
        Ok(runtime) => NoteGroupsResponse {
            ok: true,
            message: String::new(),
            groups: runtime
                .feed
                .displayed_groups()
                .get()
                .into_iter()
                .map(to_ffi_group)
                .collect(),
            search_query: runtime.feed.search_query().get(),
            is_searching: runtime.feed.is_searching().get(),
            selected_category_id: runtime.feed.selected_category().get(),
        },
        Err(err) => NoteGroupsResponse {
            ok: false,
            message: err,
            groups: Vec::new(),
            search_query: String::new(),
            is_searching: false,
            selected_category_id: None,
        },
    }
}

/// Updates the search text; non-empty switches the list to search results.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn set_search_query(text: String) -> ActionResponse {
    match runtime().and_then(|runtime| {
        runtime
            .feed
            .set_search_query(text)
            .map_err(|err| format!("set_search_query failed: {err}"))
    }) {
        Ok(()) => ActionResponse::success("Search updated.", None),
        Err(err) => ActionResponse::failure(err),
    }
}

/// Restricts the list to one category, or clears the restriction.
///
/// # FFI contract
/// - Sync call over in-memory live state.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn set_category_filter(category_id: Option<i64>) -> ActionResponse {
    match runtime() {
        Ok(runtime) => {
            runtime.feed.set_category_filter(category_id);
            ActionResponse::success("Filter updated.", None)
        }
        Err(err) => ActionResponse::failure(err),
    }
}

/// Deletes one note by id.
///
/// # FFI contract
/// - Sync call, DB-backed execution. Deleting an absent id succeeds.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn delete_note(id: i64) -> ActionResponse {
    match runtime().and_then(|runtime| {
        runtime
            .feed
            .delete_note(id)
            .map_err(|err| format!("delete_note failed: {err}"))
    }) {
        Ok(()) => ActionResponse::success("Note deleted.", Some(id)),
        Err(err) => ActionResponse::failure(err),
    }
}

/// Lists all categories in creation order.
///
/// # FFI contract
/// - Sync call over in-memory live state; no SQL on this path.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn list_categories() -> CategoriesResponse {
    match runtime() {
        Ok(runtime) => CategoriesResponse {
            ok: true,
            message: String::new(),
            categories: runtime
                .feed
                .categories()
                .get()
                .into_iter()
                .map(to_ffi_category)
                .collect(),
        },
        Err(err) => CategoriesResponse {
            ok: false,
            message: err,
            categories: Vec::new(),
        },
    }
}

/// Creates a category and returns its assigned id.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn add_category(name: String, color: u32) -> ActionResponse {
    match runtime().and_then(|runtime| {
        runtime
            .context
            .category_repo()
            .insert_or_replace(&Category::new(name, color))
            .map_err(|err| format!("add_category failed: {err}"))
    }) {
        Ok(id) => ActionResponse::success("Category created.", Some(id)),
        Err(err) => ActionResponse::failure(err),
    }
}

/// Replaces one category record wholesale.
///
/// # FFI contract
/// - Sync call, DB-backed execution; absent id returns a failure envelope.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn update_category(id: i64, name: String, color: u32, created_at: i64) -> ActionResponse {
    let record = Category {
        id: Some(id),
        name,
        color,
        created_at,
    };
    match runtime().and_then(|runtime| {
        runtime
            .context
            .category_repo()
            .update(&record)
            .map_err(|err| format!("update_category failed: {err}"))
    }) {
        Ok(()) => ActionResponse::success("Category updated.", Some(id)),
        Err(err) => ActionResponse::failure(err),
    }
}

/// Deletes a category; notes that referenced it keep living uncategorized.
///
/// # FFI contract
/// - Sync call, DB-backed execution; the reference cleanup and the row
///   delete commit in one transaction.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn delete_category(id: i64) -> ActionResponse {
    match runtime().and_then(|runtime| {
        runtime
            .context
            .category_repo()
            .delete_by_id(id)
            .map_err(|err| format!("delete_category failed: {err}"))
    }) {
        Ok(()) => ActionResponse::success("Category deleted.", Some(id)),
        Err(err) => ActionResponse::failure(err),
    }
}

/// Retargets the edit session: `None` starts a new note, `Some(id)` loads
/// an existing one.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - A missing note id leaves the session empty and still succeeds.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn load_note_for_edit(note_id: Option<i64>) -> ActionResponse {
    match runtime().and_then(|runtime| {
        runtime.session.reset();
        if let Some(id) = note_id {
            runtime
                .session
                .load(id)
                .map_err(|err| format!("load_note_for_edit failed: {err}"))?;
        }
        Ok(())
    }) {
        Ok(()) => ActionResponse::success("Edit session ready.", note_id),
        Err(err) => ActionResponse::failure(err),
    }
}

/// Replaces the edit session title.
///
/// # FFI contract
/// - Sync call over in-memory live state.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn edit_set_title(text: String) -> ActionResponse {
    match runtime() {
        Ok(runtime) => {
            runtime.session.set_title(text);
            ActionResponse::success("Title updated.", None)
        }
        Err(err) => ActionResponse::failure(err),
    }
}

/// Replaces the edit session content.
///
/// # FFI contract
/// - Sync call over in-memory live state.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn edit_set_content(text: String) -> ActionResponse {
    match runtime() {
        Ok(runtime) => {
            runtime.session.set_content(text);
            ActionResponse::success("Content updated.", None)
        }
        Err(err) => ActionResponse::failure(err),
    }
}

/// Replaces the edit session category selection.
///
/// # FFI contract
/// - Sync call over in-memory live state; `None` means uncategorized.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn edit_set_category(category_id: Option<i64>) -> ActionResponse {
    match runtime() {
        Ok(runtime) => {
            runtime.session.set_category(category_id);
            ActionResponse::success("Category selection updated.", None)
        }
        Err(err) => ActionResponse::failure(err),
    }
}

/// Persists the edit session, inserting or updating as needed.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Empty title and content are allowed; gating save on `has_content` is
///   the UI's choice.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn save_note() -> ActionResponse {
    match runtime().and_then(|runtime| {
        runtime
            .session
            .save()
            .map_err(|err| format!("save_note failed: {err}"))
    }) {
        Ok(id) => ActionResponse::success("Note saved.", Some(id)),
        Err(err) => ActionResponse::failure(err),
    }
}

/// Clears the edit session back to an empty new-note state.
///
/// # FFI contract
/// - Sync call over in-memory live state; idempotent.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn reset_edit_session() -> ActionResponse {
    match runtime() {
        Ok(runtime) => {
            runtime.session.reset();
            ActionResponse::success("Edit session reset.", None)
        }
        Err(err) => ActionResponse::failure(err),
    }
}

/// Returns the current edit session field values.
///
/// # FFI contract
/// - Sync call over in-memory live state; no SQL on this path.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn edit_snapshot() -> EditSnapshotResponse {
    match runtime() {
        Ok(runtime) => EditSnapshotResponse {
            ok: true,
            message: String::new(),
            note_id: runtime.session.target_id(),
            title: runtime.session.title().get(),
            content: runtime.session.content().get(),
            category_id: runtime.session.category_id().get(),
            is_saved: runtime.session.is_saved().get(),
            has_content: runtime.session.has_content(),
        },
        Err(err) => EditSnapshotResponse {
            ok: false,
            message: err,
            note_id: None,
            title: String::new(),
            content: String::new(),
            category_id: None,
            is_saved: false,
            has_content: false,
        },
    }
}

/// Returns the persisted theme preference.
///
/// # FFI contract
/// - Sync call over in-memory live state.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn theme_mode() -> ThemeResponse {
    match runtime() {
        Ok(runtime) => ThemeResponse {
            ok: true,
            message: String::new(),
            mode: runtime.context.settings().theme_mode().get().as_int(),
        },
        Err(err) => ThemeResponse {
            ok: false,
            message: err,
            mode: ThemeMode::System.as_int(),
        },
    }
}

/// Persists a new theme preference.
///
/// Input semantics: `mode` is 0 (light), 1 (dark) or 2 (system).
///
/// # FFI contract
/// - Sync call; writes the settings file before publishing the value.
/// - Unknown mode values return a failure envelope.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn set_theme_mode(mode: i64) -> ActionResponse {
    let Some(parsed) = ThemeMode::from_int(mode) else {
        return ActionResponse::failure(format!("unknown theme mode value {mode}"));
    };
    match runtime().and_then(|runtime| {
        runtime
            .context
            .settings()
            .set_theme_mode(parsed)
            .map_err(|err| format!("set_theme_mode failed: {err}"))
    }) {
        Ok(()) => ActionResponse::success("Theme updated.", Some(mode)),
        Err(err) => ActionResponse::failure(err),
    }
}

fn to_ffi_note(note: Note) -> FfiNote {
    FfiNote {
        id: note.id.unwrap_or_default(),
        title: note.title,
        content: note.content,
        category_id: note.category_id,
        created_at: note.created_at,
        updated_at: note.updated_at,
    }
}

fn to_ffi_group(group: NoteGroup) -> FfiNoteGroup {
    FfiNoteGroup {
        label: group.label,
        notes: group.notes.into_iter().map(to_ffi_note).collect(),
    }
}

fn to_ffi_category(category: Category) -> FfiCategory {
    FfiCategory {
        id: category.id.unwrap_or_default(),
        name: category.name,
        color: category.color,
        created_at: category.created_at,
    }
}
