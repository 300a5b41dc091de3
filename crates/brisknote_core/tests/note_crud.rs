use brisknote_core::{Note, NoteStore, SqliteStore, StoreError};

#[test]
fn insert_then_fetch_returns_record_with_assigned_id() {
    let store = SqliteStore::open_in_memory().unwrap();
    let note = Note::new("Grocery list", "buy milk");

    let id = store.insert_or_replace(&note).unwrap();
    let fetched = store.get_by_id(id).unwrap().expect("note should exist");

    let mut expected = note;
    expected.id = Some(id);
    assert_eq!(fetched, expected);
}

#[test]
fn insert_with_existing_id_replaces_the_row() {
    let store = SqliteStore::open_in_memory().unwrap();
    let id = store.insert_or_replace(&Note::new("v1", "first")).unwrap();

    let mut replacement = Note::new("v2", "second");
    replacement.id = Some(id);
    let replaced_id = store.insert_or_replace(&replacement).unwrap();

    assert_eq!(replaced_id, id);
    let fetched = store.get_by_id(id).unwrap().unwrap();
    assert_eq!(fetched.title, "v2");
    assert_eq!(store.live_all().unwrap().get().len(), 1);
}

#[test]
fn update_replaces_fields_of_existing_row() {
    let store = SqliteStore::open_in_memory().unwrap();
    let id = store
        .insert_or_replace(&Note::new("before", "old body"))
        .unwrap();

    let mut edited = store.get_by_id(id).unwrap().unwrap();
    edited.title = "after".to_string();
    edited.updated_at += 1;
    store.update(&edited).unwrap();

    let fetched = store.get_by_id(id).unwrap().unwrap();
    assert_eq!(fetched, edited);
}

#[test]
fn update_missing_row_returns_not_found() {
    let store = SqliteStore::open_in_memory().unwrap();
    let mut ghost = Note::new("ghost", "");
    ghost.id = Some(42);

    let err = store.update(&ghost).unwrap_err();
    assert!(matches!(
        err,
        StoreError::NotFound {
            entity: "note",
            id: 42
        }
    ));
}

#[test]
fn update_without_id_is_rejected() {
    let store = SqliteStore::open_in_memory().unwrap();
    let err = store.update(&Note::new("unsaved", "")).unwrap_err();
    assert!(matches!(err, StoreError::MissingId { entity: "note" }));
}

#[test]
fn delete_by_id_is_idempotent() {
    let store = SqliteStore::open_in_memory().unwrap();
    let id = store.insert_or_replace(&Note::new("doomed", "")).unwrap();

    store.delete_by_id(id).unwrap();
    assert!(store.get_by_id(id).unwrap().is_none());
    store.delete_by_id(id).unwrap();
}

#[test]
fn writes_reject_updated_at_before_created_at() {
    let store = SqliteStore::open_in_memory().unwrap();
    let mut skewed = Note::new("skewed", "");
    skewed.updated_at = skewed.created_at - 1;

    let err = store.insert_or_replace(&skewed).unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
}
