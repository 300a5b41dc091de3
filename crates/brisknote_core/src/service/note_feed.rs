//! Grouped note feed composition.
//!
//! # Responsibility
//! - Combine the live note/category collections with the active search
//!   query, searching flag and category filter into the grouped feed the
//!   list screen renders.
//!
//! # Invariants
//! - Any input change triggers a full recomputation of the output; there is
//!   no incremental diffing. Collections are personal-note sized, so this
//!   is a documented scalability boundary rather than a defect.
//! - Source selection: search results while searching with a non-empty
//!   query, otherwise the full collection. The category filter applies to
//!   either source.
//! - Day-boundary labels are evaluated against the wall clock at
//!   recomputation time.

use crate::live::{relock, Live, Subscription};
use crate::model::category::{Category, CategoryId};
use crate::model::group::{group_notes_by_date, NoteGroup};
use crate::model::note::{Note, NoteId};
use crate::repo::note_repo::NoteRepository;
use crate::store::note_store::NoteStore;
use crate::store::StoreResult;
use chrono::Local;
use log::debug;
use std::sync::{Arc, Mutex};

struct FeedInputs {
    notes: Vec<Note>,
    search_results: Vec<Note>,
}

/// State shared with subscription callbacks.
struct FeedShared {
    inputs: Mutex<FeedInputs>,
    is_searching: Live<bool>,
    selected_category: Live<Option<CategoryId>>,
    displayed_groups: Live<Vec<NoteGroup>>,
}

impl FeedShared {
    /// Re-derives the grouped output from the latest-seen inputs.
    fn recompute(&self) {
        let source = {
            let inputs = relock(&self.inputs);
            if self.is_searching.get() {
                inputs.search_results.clone()
            } else {
                inputs.notes.clone()
            }
        };

        let filtered: Vec<Note> = match self.selected_category.get() {
            Some(category_id) => source
                .into_iter()
                .filter(|note| note.category_id == Some(category_id))
                .collect(),
            None => source,
        };

        let groups = group_notes_by_date(&filtered, Local::now());
        self.displayed_groups.set(groups);
    }
}

/// Live, grouped note list plus the commands that shape it.
///
/// Construct one per consuming screen; dropping the feed releases every
/// subscription it holds.
pub struct NoteFeed<S: NoteStore> {
    note_repo: NoteRepository<S>,
    notes: Live<Vec<Note>>,
    categories: Live<Vec<Category>>,
    search_query: Live<String>,
    shared: Arc<FeedShared>,
    /// Live search query plus its subscription, replaced whenever the query
    /// text changes. The feed owns the pair (not `shared`, which the
    /// subscription callback keeps alive) so dropping the feed detaches the
    /// callback and releases the store watcher.
    search_feed: Mutex<Option<(Live<Vec<Note>>, Subscription)>>,
    _notes_feed: Subscription,
}

impl<S: NoteStore> NoteFeed<S> {
    /// Builds the feed and computes its initial grouped output.
    ///
    /// `categories` is the live collection from the category repository; the
    /// feed re-exposes it so the list screen has a single state source.
    pub fn new(
        note_repo: NoteRepository<S>,
        categories: Live<Vec<Category>>,
    ) -> StoreResult<Self> {
        let notes = note_repo.live_all()?;

        let shared = Arc::new(FeedShared {
            inputs: Mutex::new(FeedInputs {
                notes: Vec::new(),
                search_results: Vec::new(),
            }),
            is_searching: Live::new(false),
            selected_category: Live::new(None),
            displayed_groups: Live::new(Vec::new()),
        });

        // Immediate delivery on subscribe seeds the inputs and computes the
        // first grouped output before the constructor returns.
        let seed = Arc::clone(&shared);
        let notes_feed = notes.subscribe(move |snapshot| {
            relock(&seed.inputs).notes = snapshot.clone();
            seed.recompute();
        });

        Ok(Self {
            note_repo,
            notes,
            categories,
            search_query: Live::new(String::new()),
            shared,
            search_feed: Mutex::new(None),
            _notes_feed: notes_feed,
        })
    }

    /// Full note collection, most recently updated first.
    pub fn notes(&self) -> Live<Vec<Note>> {
        self.notes.clone()
    }

    /// Category collection in creation order.
    pub fn categories(&self) -> Live<Vec<Category>> {
        self.categories.clone()
    }

    /// Grouped feed the list screen renders.
    pub fn displayed_groups(&self) -> Live<Vec<NoteGroup>> {
        self.shared.displayed_groups.clone()
    }

    pub fn search_query(&self) -> Live<String> {
        self.search_query.clone()
    }

    pub fn is_searching(&self) -> Live<bool> {
        self.shared.is_searching.clone()
    }

    pub fn selected_category(&self) -> Live<Option<CategoryId>> {
        self.shared.selected_category.clone()
    }

    /// Updates the search text. Non-empty text switches the feed to search
    /// results for that text; empty text returns to browsing.
    pub fn set_search_query(&self, query: impl Into<String>) -> StoreResult<()> {
        let query = query.into();
        self.search_query.set(query.clone());

        if query.is_empty() {
            *relock(&self.search_feed) = None;
            relock(&self.shared.inputs).search_results.clear();
            self.shared.is_searching.set(false);
            self.shared.recompute();
            return Ok(());
        }

        debug!("event=feed_search module=service status=ok query_len={}", query.len());
        self.shared.is_searching.set(true);

        // Release the previous query's watcher before installing the next
        // one so a stale refresh cannot overwrite fresher results.
        *relock(&self.search_feed) = None;

        let results = self.note_repo.live_search(&query)?;
        let sink = Arc::clone(&self.shared);
        let subscription = results.subscribe(move |snapshot| {
            relock(&sink.inputs).search_results = snapshot.clone();
            sink.recompute();
        });
        *relock(&self.search_feed) = Some((results, subscription));

        Ok(())
    }

    /// Restricts the feed to one category, or clears the restriction.
    pub fn set_category_filter(&self, category_id: Option<CategoryId>) {
        self.shared.selected_category.set(category_id);
        self.shared.recompute();
    }

    /// Deletes a note; the feed refreshes through the live collection.
    pub fn delete_note(&self, id: NoteId) -> StoreResult<()> {
        self.note_repo.delete_by_id(id)
    }
}
