//! Repository façades over the persistent store.
//!
//! # Responsibility
//! - Present the narrower per-entity interfaces the composition engine and
//!   edit session consume.
//!
//! # Invariants
//! - Every call is a direct delegation to the store; no caching, batching,
//!   or additional invariants live here.

pub mod category_repo;
pub mod note_repo;
