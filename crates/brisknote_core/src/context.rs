//! Explicitly constructed core context.
//!
//! # Responsibility
//! - Wire the store, repositories and settings into one injectable handle.
//! - Provide factories for the per-screen feed and edit session services.
//!
//! # Invariants
//! - The context owns no global state; callers decide its lifetime and pass
//!   it (or clones) to whatever constructs consumers.

use crate::repo::category_repo::CategoryRepository;
use crate::repo::note_repo::NoteRepository;
use crate::service::edit_session::EditSession;
use crate::service::note_feed::NoteFeed;
use crate::settings::{SettingsError, SettingsStore};
use crate::store::sqlite::SqliteStore;
use crate::store::{StoreError, StoreResult};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Filesystem locations the core persists to.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// SQLite database file for notes and categories.
    pub db_path: PathBuf,
    /// JSON file holding the theme preference.
    pub settings_path: PathBuf,
}

/// Context construction failure.
#[derive(Debug)]
pub enum ContextError {
    Store(StoreError),
    Settings(SettingsError),
}

impl Display for ContextError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Settings(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ContextError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Settings(err) => Some(err),
        }
    }
}

impl From<StoreError> for ContextError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<SettingsError> for ContextError {
    fn from(value: SettingsError) -> Self {
        Self::Settings(value)
    }
}

/// Feed type produced by [`CoreContext::note_feed`].
pub type SqliteNoteFeed = NoteFeed<SqliteStore>;
/// Session type produced by [`CoreContext::edit_session`].
pub type SqliteEditSession = EditSession<SqliteStore>;

/// Shared handles for one running core instance.
///
/// Clones share the same store and settings.
#[derive(Clone)]
pub struct CoreContext {
    note_repo: NoteRepository<SqliteStore>,
    category_repo: CategoryRepository<SqliteStore>,
    settings: SettingsStore,
}

impl CoreContext {
    /// Opens the database and settings at the configured paths.
    pub fn open(config: &CoreConfig) -> Result<Self, ContextError> {
        let store = SqliteStore::open(&config.db_path)?;
        let settings = SettingsStore::load(config.settings_path.clone())?;
        Ok(Self::from_parts(store, settings))
    }

    /// In-memory database variant for tests and probes; settings still live
    /// at the given path.
    pub fn open_in_memory(settings_path: impl Into<PathBuf>) -> Result<Self, ContextError> {
        let store = SqliteStore::open_in_memory()?;
        let settings = SettingsStore::load(settings_path)?;
        Ok(Self::from_parts(store, settings))
    }

    fn from_parts(store: SqliteStore, settings: SettingsStore) -> Self {
        Self {
            note_repo: NoteRepository::new(store.clone()),
            category_repo: CategoryRepository::new(store),
            settings,
        }
    }

    pub fn note_repo(&self) -> &NoteRepository<SqliteStore> {
        &self.note_repo
    }

    pub fn category_repo(&self) -> &CategoryRepository<SqliteStore> {
        &self.category_repo
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    /// Builds a grouped note feed for one list screen.
    pub fn note_feed(&self) -> StoreResult<SqliteNoteFeed> {
        NoteFeed::new(self.note_repo.clone(), self.category_repo.live_all()?)
    }

    /// Builds an edit session for one editing interaction.
    pub fn edit_session(&self) -> SqliteEditSession {
        EditSession::new(self.note_repo.clone())
    }
}
