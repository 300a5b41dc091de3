//! Theme preference persistence.
//!
//! # Responsibility
//! - Load and persist the single theme-mode preference as key-value state,
//!   outside the note/category schema.
//!
//! # Invariants
//! - A missing settings file means `ThemeMode::System`.
//! - `set_theme_mode` persists before publishing, so subscribers never see
//!   a value that failed to reach disk.

use crate::live::Live;
use log::info;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::sync::Arc;

/// UI theme preference, stored as a single integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeMode {
    Light,
    Dark,
    System,
}

impl ThemeMode {
    /// Wire value used by settings storage and the FFI surface.
    pub fn as_int(self) -> i64 {
        match self {
            Self::Light => 0,
            Self::Dark => 1,
            Self::System => 2,
        }
    }

    /// Parses the wire value; unknown values are rejected.
    pub fn from_int(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Light),
            1 => Some(Self::Dark),
            2 => Some(Self::System),
            _ => None,
        }
    }
}

pub type SettingsResult<T> = Result<T, SettingsError>;

/// Settings persistence failure.
#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Format(serde_json::Error),
    /// Persisted integer does not name a known theme mode.
    UnknownThemeMode(i64),
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Format(err) => write!(f, "{err}"),
            Self::UnknownThemeMode(value) => write!(f, "unknown theme mode value {value}"),
        }
    }
}

impl Error for SettingsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Format(err) => Some(err),
            Self::UnknownThemeMode(_) => None,
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(value: serde_json::Error) -> Self {
        Self::Format(value)
    }
}

#[derive(Serialize, Deserialize)]
struct SettingsFile {
    theme_mode: i64,
}

struct SettingsInner {
    path: PathBuf,
    theme_mode: Live<ThemeMode>,
}

/// Key-value settings store with a live theme-mode view.
#[derive(Clone)]
pub struct SettingsStore {
    inner: Arc<SettingsInner>,
}

impl SettingsStore {
    /// Loads settings from `path`, defaulting to `System` when the file
    /// does not exist yet.
    pub fn load(path: impl Into<PathBuf>) -> SettingsResult<Self> {
        let path = path.into();
        let mode = match std::fs::read_to_string(&path) {
            Ok(raw) => {
                let file: SettingsFile = serde_json::from_str(&raw)?;
                ThemeMode::from_int(file.theme_mode)
                    .ok_or(SettingsError::UnknownThemeMode(file.theme_mode))?
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => ThemeMode::System,
            Err(err) => return Err(err.into()),
        };

        info!(
            "event=settings_load module=settings status=ok theme_mode={}",
            mode.as_int()
        );
        Ok(Self {
            inner: Arc::new(SettingsInner {
                path,
                theme_mode: Live::new(mode),
            }),
        })
    }

    /// Current theme preference as a live view.
    pub fn theme_mode(&self) -> Live<ThemeMode> {
        self.inner.theme_mode.clone()
    }

    /// Persists a new theme preference, then publishes it.
    pub fn set_theme_mode(&self, mode: ThemeMode) -> SettingsResult<()> {
        let file = SettingsFile {
            theme_mode: mode.as_int(),
        };
        let raw = serde_json::to_string_pretty(&file)?;
        if let Some(parent) = self.inner.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.inner.path, raw)?;

        info!(
            "event=settings_write module=settings status=ok theme_mode={}",
            mode.as_int()
        );
        self.inner.theme_mode.set(mode);
        Ok(())
    }
}
