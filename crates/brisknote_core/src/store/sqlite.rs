//! Shared SQLite store handle and live-query registry.
//!
//! # Responsibility
//! - Own the connection and serialize physical writes behind it.
//! - Track registered live queries and re-run them after mutations.
//!
//! # Invariants
//! - Watchers are re-run only for the scope a mutation touched; a category
//!   delete touches both scopes because of the set-null action, notes
//!   first so category subscribers never read a stale note snapshot.
//! - Watchers whose live values were dropped by every consumer are pruned
//!   on the next refresh pass.
//! - Refresh callbacks run on the mutating thread after the write finished
//!   and the connection lock was released.

use crate::db::{open_db, open_db_in_memory};
use crate::live::{relock, Live};
use crate::store::StoreResult;
use log::warn;
use rusqlite::Connection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Which tables a mutation or live query depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scope {
    Notes,
    Categories,
}

type RefreshFn = dyn Fn(&StoreInner) -> bool + Send + Sync;

struct Watcher {
    id: u64,
    scope: Scope,
    refresh: Arc<RefreshFn>,
}

pub(crate) struct StoreInner {
    conn: Mutex<Connection>,
    watchers: Mutex<Vec<Watcher>>,
    next_watcher_id: AtomicU64,
}

/// Shared handle to one SQLite-backed store.
///
/// Clones share the connection and the live-query registry; the handle is
/// cheap to pass to each repository façade.
#[derive(Clone)]
pub struct SqliteStore {
    inner: Arc<StoreInner>,
}

impl SqliteStore {
    /// Opens (and migrates) a database file.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self::from_connection(open_db(path)?))
    }

    /// Opens an in-memory database, mainly for tests and probes.
    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                conn: Mutex::new(conn),
                watchers: Mutex::new(Vec::new()),
                next_watcher_id: AtomicU64::new(0),
            }),
        }
    }

    pub(crate) fn lock_conn(&self) -> MutexGuard<'_, Connection> {
        relock(&self.inner.conn)
    }

    /// Runs `query` once for the initial snapshot, then re-runs it whenever
    /// a mutation touches `scope`.
    ///
    /// The watcher holds only a weak reference to the returned live value;
    /// once every consumer drops it, the watcher is pruned.
    pub(crate) fn register_live<T, F>(&self, scope: Scope, query: F) -> StoreResult<Live<T>>
    where
        T: Clone + Send + 'static,
        F: Fn(&Connection) -> StoreResult<T> + Send + Sync + 'static,
    {
        let initial = {
            let conn = self.lock_conn();
            query(&conn)?
        };
        let live = Live::new(initial);

        let weak = live.downgrade();
        let refresh: Arc<RefreshFn> = Arc::new(move |inner| {
            let Some(live) = weak.upgrade() else {
                return false;
            };
            let snapshot = {
                let conn = relock(&inner.conn);
                query(&conn)
            };
            match snapshot {
                Ok(value) => live.set(value),
                Err(err) => {
                    warn!("event=live_refresh module=store status=error error={err}");
                }
            }
            true
        });

        let id = self.inner.next_watcher_id.fetch_add(1, Ordering::Relaxed);
        relock(&self.inner.watchers).push(Watcher { id, scope, refresh });

        Ok(live)
    }

    /// Re-runs every live query registered for the given scopes, one scope
    /// at a time in the order given.
    ///
    /// The cascade path relies on that order: it names `Notes` before
    /// `Categories` so every note view holds its post-cascade snapshot
    /// before any category subscriber runs, and no subscriber observes a
    /// category gone while a note still references it.
    pub(crate) fn notify(&self, scopes: &[Scope]) {
        let mut dead = Vec::new();
        for scope in scopes {
            // Snapshot outside the registry lock so refresh callbacks can
            // reach the connection (and downstream subscribers can register
            // new live queries) without deadlocking.
            let snapshot: Vec<(u64, Arc<RefreshFn>)> = relock(&self.inner.watchers)
                .iter()
                .filter(|watcher| watcher.scope == *scope)
                .map(|watcher| (watcher.id, Arc::clone(&watcher.refresh)))
                .collect();

            for (id, refresh) in snapshot {
                if !refresh(&self.inner) {
                    dead.push(id);
                }
            }
        }

        if !dead.is_empty() {
            relock(&self.inner.watchers).retain(|watcher| !dead.contains(&watcher.id));
        }
    }

    #[cfg(test)]
    pub(crate) fn watcher_count(&self) -> usize {
        relock(&self.inner.watchers).len()
    }
}

/// Escapes `%`, `_` and `\` so a user query matches as a literal substring
/// under `LIKE ... ESCAPE '\'`.
pub(crate) fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for ch in query.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
