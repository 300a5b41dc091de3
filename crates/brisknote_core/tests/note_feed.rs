use brisknote_core::{
    Category, CategoryRepository, Note, NoteFeed, NoteRepository, SqliteStore, now_epoch_ms,
};
use std::sync::{Arc, Mutex};

const HOUR_MS: i64 = 60 * 60 * 1000;

fn build_feed(store: &SqliteStore) -> NoteFeed<SqliteStore> {
    let categories = CategoryRepository::new(store.clone());
    NoteFeed::new(
        NoteRepository::new(store.clone()),
        categories.live_all().unwrap(),
    )
    .unwrap()
}

fn note_at(title: &str, timestamp: i64) -> Note {
    let mut note = Note::new(title, "");
    note.created_at = timestamp;
    note.updated_at = timestamp;
    note
}

#[test]
fn feed_groups_notes_by_recency() {
    let store = SqliteStore::open_in_memory().unwrap();
    let repo = NoteRepository::new(store.clone());
    let now = now_epoch_ms();
    repo.insert_or_replace(&note_at("fresh", now)).unwrap();
    repo.insert_or_replace(&note_at("day-old", now - 26 * HOUR_MS))
        .unwrap();
    repo.insert_or_replace(&note_at("older", now - 50 * HOUR_MS))
        .unwrap();

    let feed = build_feed(&store);
    let groups = feed.displayed_groups().get();
    assert_eq!(groups.len(), 3);
    assert_eq!(groups[0].label, "Today");
    assert_eq!(groups[1].label, "Yesterday");
    assert_eq!(groups[0].notes[0].title, "fresh");
    assert_eq!(groups[1].notes[0].title, "day-old");
    assert_eq!(groups[2].notes[0].title, "older");
}

#[test]
fn empty_store_yields_empty_feed() {
    let store = SqliteStore::open_in_memory().unwrap();
    let feed = build_feed(&store);
    assert!(feed.displayed_groups().get().is_empty());
}

#[test]
fn feed_recomputes_on_note_changes() {
    let store = SqliteStore::open_in_memory().unwrap();
    let repo = NoteRepository::new(store.clone());
    let feed = build_feed(&store);

    let sizes = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&sizes);
    let _watch = feed.displayed_groups().subscribe(move |groups| {
        let notes: usize = groups.iter().map(|group| group.notes.len()).sum();
        sink.lock().unwrap().push(notes);
    });

    let id = repo.insert_or_replace(&Note::new("draft", "")).unwrap();
    feed.delete_note(id).unwrap();

    assert_eq!(*sizes.lock().unwrap(), vec![0, 1, 0]);
}

#[test]
fn category_filter_restricts_and_clears() {
    let store = SqliteStore::open_in_memory().unwrap();
    let repo = NoteRepository::new(store.clone());
    let categories = CategoryRepository::new(store.clone());
    let work = categories
        .insert_or_replace(&Category::new("Work", 0xFFFF_0000))
        .unwrap();

    let mut tagged = Note::new("tagged", "");
    tagged.category_id = Some(work);
    repo.insert_or_replace(&tagged).unwrap();
    repo.insert_or_replace(&Note::new("loose", "")).unwrap();

    let feed = build_feed(&store);
    feed.set_category_filter(Some(work));
    let filtered: Vec<String> = titles(&feed);
    assert_eq!(filtered, vec!["tagged"]);
    assert_eq!(feed.selected_category().get(), Some(work));

    feed.set_category_filter(None);
    assert_eq!(titles(&feed).len(), 2);
}

#[test]
fn search_mode_switches_to_matches_and_back() {
    let store = SqliteStore::open_in_memory().unwrap();
    let repo = NoteRepository::new(store.clone());
    repo.insert_or_replace(&Note::new("Grocery list", "")).unwrap();
    repo.insert_or_replace(&Note::new("", "buy milk")).unwrap();
    repo.insert_or_replace(&Note::new("Unrelated", "")).unwrap();

    let feed = build_feed(&store);
    feed.set_search_query("milk").unwrap();
    assert!(feed.is_searching().get());
    assert_eq!(feed.search_query().get(), "milk");
    let groups = feed.displayed_groups().get();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].notes.len(), 1);
    assert_eq!(groups[0].notes[0].content, "buy milk");

    feed.set_search_query("").unwrap();
    assert!(!feed.is_searching().get());
    assert_eq!(titles(&feed).len(), 3);
}

#[test]
fn new_query_replaces_previous_results() {
    let store = SqliteStore::open_in_memory().unwrap();
    let repo = NoteRepository::new(store.clone());
    repo.insert_or_replace(&Note::new("Grocery list", "")).unwrap();
    repo.insert_or_replace(&Note::new("", "buy milk")).unwrap();

    let feed = build_feed(&store);
    feed.set_search_query("milk").unwrap();
    feed.set_search_query("Grocery").unwrap();

    let groups = feed.displayed_groups().get();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].notes.len(), 1);
    assert_eq!(groups[0].notes[0].title, "Grocery list");
}

#[test]
fn search_results_stay_live_while_searching() {
    let store = SqliteStore::open_in_memory().unwrap();
    let repo = NoteRepository::new(store.clone());
    let feed = build_feed(&store);

    feed.set_search_query("milk").unwrap();
    assert!(feed.displayed_groups().get().is_empty());

    repo.insert_or_replace(&Note::new("", "buy milk")).unwrap();
    let groups = feed.displayed_groups().get();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].notes[0].content, "buy milk");
}

#[test]
fn feed_exposes_category_collection() {
    let store = SqliteStore::open_in_memory().unwrap();
    let categories = CategoryRepository::new(store.clone());
    categories
        .insert_or_replace(&Category::new("Work", 0xFFFF_0000))
        .unwrap();

    let feed = build_feed(&store);
    let names: Vec<String> = feed
        .categories()
        .get()
        .into_iter()
        .map(|category| category.name)
        .collect();
    assert_eq!(names, vec!["Work"]);
}

fn titles(feed: &NoteFeed<SqliteStore>) -> Vec<String> {
    feed.displayed_groups()
        .get()
        .into_iter()
        .flat_map(|group| group.notes)
        .map(|note| note.title)
        .collect()
}
