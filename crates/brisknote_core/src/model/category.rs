//! Category domain model.
//!
//! # Invariants
//! - `id` is `None` until the store assigns one.
//! - Name emptiness is a UI concern; the core does not reject empty names.

use super::now_epoch_ms;
use serde::{Deserialize, Serialize};

/// Stable category identifier assigned by the store.
pub type CategoryId = i64;

/// Fallback swatch used when the UI does not pick a color.
pub const DEFAULT_CATEGORY_COLOR: u32 = 0xFF67_50A4;

/// A user-defined note category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// `None` before first persist.
    pub id: Option<CategoryId>,
    pub name: String,
    /// Packed ARGB color value.
    pub color: u32,
    /// Creation time in epoch milliseconds.
    pub created_at: i64,
}

impl Category {
    /// Creates an unsaved category stamped with the current time.
    pub fn new(name: impl Into<String>, color: u32) -> Self {
        Self {
            id: None,
            name: name.into(),
            color,
            created_at: now_epoch_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Category, DEFAULT_CATEGORY_COLOR};

    #[test]
    fn new_category_is_unsaved() {
        let category = Category::new("Work", DEFAULT_CATEGORY_COLOR);
        assert!(category.id.is_none());
        assert_eq!(category.color, DEFAULT_CATEGORY_COLOR);
    }
}
