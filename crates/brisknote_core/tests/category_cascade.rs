use brisknote_core::{Category, CategoryRepository, Note, NoteRepository, SqliteStore, StoreError};
use std::sync::{Arc, Mutex};

fn repos(store: &SqliteStore) -> (NoteRepository<SqliteStore>, CategoryRepository<SqliteStore>) {
    (
        NoteRepository::new(store.clone()),
        CategoryRepository::new(store.clone()),
    )
}

#[test]
fn deleting_category_nullifies_referencing_notes() {
    let store = SqliteStore::open_in_memory().unwrap();
    let (notes, categories) = repos(&store);
    let work = categories
        .insert_or_replace(&Category::new("Work", 0xFFFF_0000))
        .unwrap();
    let home = categories
        .insert_or_replace(&Category::new("Home", 0xFF00_00FF))
        .unwrap();

    let mut note = Note::new("standup", "prepare updates");
    note.category_id = Some(work);
    let note_id = notes.insert_or_replace(&note).unwrap();

    let mut other = Note::new("chores", "water plants");
    other.category_id = Some(home);
    let other_id = notes.insert_or_replace(&other).unwrap();

    categories.delete_by_id(work).unwrap();

    let fetched = notes.get_by_id(note_id).unwrap().unwrap();
    assert_eq!(fetched.category_id, None);
    // The other category and its note are untouched.
    let untouched = notes.get_by_id(other_id).unwrap().unwrap();
    assert_eq!(untouched.category_id, Some(home));

    let remaining = categories.live_all().unwrap().get();
    let names: Vec<&str> = remaining
        .iter()
        .map(|category| category.name.as_str())
        .collect();
    assert_eq!(names, vec!["Home"]);
}

#[test]
fn subscribers_never_see_category_gone_while_a_note_references_it() {
    let store = SqliteStore::open_in_memory().unwrap();
    let (notes, categories) = repos(&store);
    let work = categories
        .insert_or_replace(&Category::new("Work", 0xFFFF_0000))
        .unwrap();
    let mut note = Note::new("tagged", "");
    note.category_id = Some(work);
    notes.insert_or_replace(&note).unwrap();

    let category_view = categories.live_all().unwrap();
    let note_view = notes.live_all().unwrap();

    // On every categories snapshot where Work has vanished, the notes view
    // must already be free of references to it.
    let violations = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&violations);
    let notes_at_delivery = note_view.clone();
    let _watch = category_view.subscribe(move |snapshot| {
        let work_gone = !snapshot.iter().any(|category| category.id == Some(work));
        if work_gone {
            for current in notes_at_delivery.get() {
                if current.category_id == Some(work) {
                    sink.lock().unwrap().push(current.id);
                }
            }
        }
    });

    categories.delete_by_id(work).unwrap();

    assert!(violations.lock().unwrap().is_empty());
    assert!(category_view.get().is_empty());
}

#[test]
fn fresh_subscriber_after_delete_sees_converged_state() {
    let store = SqliteStore::open_in_memory().unwrap();
    let (notes, categories) = repos(&store);
    let work = categories
        .insert_or_replace(&Category::new("Work", 0xFFFF_0000))
        .unwrap();
    let mut note = Note::new("tagged", "");
    note.category_id = Some(work);
    notes.insert_or_replace(&note).unwrap();

    categories.delete_by_id(work).unwrap();

    assert!(categories.live_all().unwrap().get().is_empty());
    let snapshot = notes.live_all().unwrap().get();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].category_id, None);
}

#[test]
fn live_count_tracks_cascade() {
    let store = SqliteStore::open_in_memory().unwrap();
    let (notes, categories) = repos(&store);
    let work = categories
        .insert_or_replace(&Category::new("Work", 0xFFFF_0000))
        .unwrap();
    let count = notes.live_count_by_category(work).unwrap();
    assert_eq!(count.get(), 0);

    let mut note = Note::new("tagged", "");
    note.category_id = Some(work);
    notes.insert_or_replace(&note).unwrap();
    assert_eq!(count.get(), 1);

    categories.delete_by_id(work).unwrap();
    assert_eq!(count.get(), 0);
}

#[test]
fn deleting_absent_category_is_a_no_op() {
    let store = SqliteStore::open_in_memory().unwrap();
    let (_, categories) = repos(&store);
    categories.delete_by_id(99).unwrap();
}

#[test]
fn category_update_requires_persisted_id() {
    let store = SqliteStore::open_in_memory().unwrap();
    let (_, categories) = repos(&store);
    let err = categories.update(&Category::new("unsaved", 0)).unwrap_err();
    assert!(matches!(err, StoreError::MissingId { entity: "category" }));

    let mut ghost = Category::new("ghost", 0);
    ghost.id = Some(7);
    let err = categories.update(&ghost).unwrap_err();
    assert!(matches!(
        err,
        StoreError::NotFound {
            entity: "category",
            id: 7
        }
    ));
}
