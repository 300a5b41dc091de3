//! Core domain logic for the brisknote app.
//! This crate is the single source of truth for note/category state and the
//! live view composition the UI renders.

pub mod context;
pub mod db;
pub mod live;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod settings;
pub mod store;

pub use context::{ContextError, CoreConfig, CoreContext, SqliteEditSession, SqliteNoteFeed};
pub use live::{Live, Subscription, WeakLive};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::category::{Category, CategoryId, DEFAULT_CATEGORY_COLOR};
pub use model::group::{group_notes_by_date, NoteGroup};
pub use model::note::{Note, NoteId, NoteValidationError};
pub use model::now_epoch_ms;
pub use repo::category_repo::CategoryRepository;
pub use repo::note_repo::NoteRepository;
pub use service::edit_session::{EditSession, EditState};
pub use service::note_feed::NoteFeed;
pub use settings::{SettingsError, SettingsStore, ThemeMode};
pub use store::{CategoryStore, NoteStore, SqliteStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
