use brisknote_core::{Note, NoteRepository, SqliteStore};
use std::sync::{Arc, Mutex};

fn note_at(title: &str, content: &str, timestamp: i64) -> Note {
    let mut note = Note::new(title, content);
    note.created_at = timestamp;
    note.updated_at = timestamp;
    note
}

#[test]
fn live_all_delivers_current_snapshot_then_every_change() {
    let store = SqliteStore::open_in_memory().unwrap();
    let repo = NoteRepository::new(store);
    let view = repo.live_all().unwrap();

    let sizes = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&sizes);
    let _watch = view.subscribe(move |snapshot| sink.lock().unwrap().push(snapshot.len()));

    let id = repo.insert_or_replace(&Note::new("first", "")).unwrap();
    repo.delete_by_id(id).unwrap();

    assert_eq!(*sizes.lock().unwrap(), vec![0, 1, 0]);
}

#[test]
fn live_all_orders_most_recently_updated_first() {
    let store = SqliteStore::open_in_memory().unwrap();
    let repo = NoteRepository::new(store);
    repo.insert_or_replace(&note_at("oldest", "", 1_000)).unwrap();
    repo.insert_or_replace(&note_at("newest", "", 3_000)).unwrap();
    repo.insert_or_replace(&note_at("middle", "", 2_000)).unwrap();

    let titles: Vec<String> = repo
        .live_all()
        .unwrap()
        .get()
        .into_iter()
        .map(|note| note.title)
        .collect();
    assert_eq!(titles, vec!["newest", "middle", "oldest"]);
}

#[test]
fn live_search_matches_title_or_content() {
    let store = SqliteStore::open_in_memory().unwrap();
    let repo = NoteRepository::new(store);
    repo.insert_or_replace(&Note::new("Grocery list", "")).unwrap();
    repo.insert_or_replace(&Note::new("", "buy milk")).unwrap();
    repo.insert_or_replace(&Note::new("Unrelated", "")).unwrap();

    let hits = repo.live_search("milk").unwrap().get();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].content, "buy milk");

    // SQLite LIKE matches ASCII case-insensitively.
    let shouted = repo.live_search("MILK").unwrap().get();
    assert_eq!(shouted.len(), 1);
}

#[test]
fn live_search_treats_wildcard_characters_literally() {
    let store = SqliteStore::open_in_memory().unwrap();
    let repo = NoteRepository::new(store);
    repo.insert_or_replace(&Note::new("progress", "100% done")).unwrap();
    repo.insert_or_replace(&Note::new("progress", "100x done")).unwrap();

    let hits = repo.live_search("0%").unwrap().get();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].content, "100% done");

    assert!(repo.live_search("100_").unwrap().get().is_empty());
}

#[test]
fn live_search_refreshes_when_matching_notes_change() {
    let store = SqliteStore::open_in_memory().unwrap();
    let repo = NoteRepository::new(store);
    repo.insert_or_replace(&Note::new("", "buy milk")).unwrap();

    let hits = repo.live_search("milk").unwrap();
    let sizes = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&sizes);
    let _watch = hits.subscribe(move |snapshot| sink.lock().unwrap().push(snapshot.len()));

    repo.insert_or_replace(&Note::new("milk run", "")).unwrap();
    repo.insert_or_replace(&Note::new("unrelated", "")).unwrap();

    // The non-matching insert still re-runs the query; the snapshot size is
    // unchanged.
    assert_eq!(*sizes.lock().unwrap(), vec![1, 2, 2]);
}

#[test]
fn live_by_category_returns_only_members() {
    let store = SqliteStore::open_in_memory().unwrap();
    let repo = NoteRepository::new(store.clone());
    let categories = brisknote_core::CategoryRepository::new(store);
    let work = categories
        .insert_or_replace(&brisknote_core::Category::new("Work", 0xFFFF_0000))
        .unwrap();

    let mut tagged = Note::new("tagged", "");
    tagged.category_id = Some(work);
    let tagged_id = repo.insert_or_replace(&tagged).unwrap();
    repo.insert_or_replace(&Note::new("loose", "")).unwrap();

    let members = repo.live_by_category(work).unwrap().get();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].id, Some(tagged_id));
}
