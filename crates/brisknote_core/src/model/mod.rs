//! Domain model for notes, categories and derived view groups.
//!
//! # Responsibility
//! - Define the persisted record shapes used by the storage layer.
//! - Define the derived, never-persisted grouping shape used by views.
//!
//! # Invariants
//! - Record ids are `None` until the store assigns them on first persist.
//! - All timestamps are Unix epoch milliseconds.

pub mod category;
pub mod group;
pub mod note;

use chrono::Utc;

/// Current wall-clock time in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    Utc::now().timestamp_millis()
}
