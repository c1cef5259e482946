use mindpad_core::db::open_db;
use mindpad_core::{
    open_note_store, KvStore, LoadOutcome, MemoryKvStore, Note, NoteSnapshotRepository,
    NoteStore, RepoError, RepoResult, SnapshotState, SqliteKvStore, NOTES_SLOT_KEY,
    WELCOME_NOTE_ID, WELCOME_NOTE_TITLE,
};
use std::cell::Cell;
use std::rc::Rc;

/// Slot store whose writes start failing once `failing` is set.
struct FailingKv {
    inner: MemoryKvStore,
    failing: Rc<Cell<bool>>,
}

impl KvStore for FailingKv {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> RepoResult<()> {
        if self.failing.get() {
            return Err(RepoError::from(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_FULL),
                Some("database or disk is full".to_string()),
            )));
        }
        self.inner.set(key, value)
    }
}

fn persisted_notes<S: KvStore>(store: &NoteStore<S>) -> Vec<Note> {
    let raw = store
        .repository()
        .store()
        .get(NOTES_SLOT_KEY)
        .unwrap()
        .expect("snapshot slot should be written");
    serde_json::from_str(&raw).unwrap()
}

fn note(id: &str, title: &str, content: &str, last_modified: i64) -> Note {
    Note {
        id: id.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        last_modified,
    }
}

#[test]
fn empty_slot_seeds_and_persists_welcome_note() {
    let store = NoteStore::load(MemoryKvStore::new()).unwrap();

    assert_eq!(store.load_outcome(), LoadOutcome::Seeded);
    assert_eq!(store.len(), 1);
    assert_eq!(store.notes()[0].id, WELCOME_NOTE_ID);
    assert_eq!(store.notes()[0].title, WELCOME_NOTE_TITLE);
    assert_eq!(persisted_notes(&store), store.notes());
}

#[test]
fn invalid_json_loads_exactly_one_welcome_note() {
    let kv = MemoryKvStore::with_entry(NOTES_SLOT_KEY, "{not json");
    let store = NoteStore::load(kv).unwrap();

    assert_eq!(store.load_outcome(), LoadOutcome::Recovered);
    assert_eq!(store.len(), 1);
    assert_eq!(store.notes()[0].title, "Welcome to MindPad");
}

#[test]
fn valid_empty_snapshot_stays_empty() {
    let kv = MemoryKvStore::with_entry(NOTES_SLOT_KEY, "[]");
    let store = NoteStore::load(kv).unwrap();

    assert_eq!(store.load_outcome(), LoadOutcome::Restored);
    assert!(store.is_empty());
    assert_eq!(store.first_in_display_order(), None);
}

#[test]
fn create_prepends_empty_note_with_unique_id() {
    let mut store = NoteStore::load(MemoryKvStore::new()).unwrap();
    let first = store.create().unwrap();
    let second = store.create().unwrap();

    assert_ne!(first.id, second.id);
    assert!(first.title.is_empty());
    assert!(first.content.is_empty());
    assert_eq!(store.notes()[0].id, second.id);
    assert_eq!(store.notes()[1].id, first.id);
    assert_eq!(store.len(), 3);
}

#[test]
fn snapshot_matches_memory_after_every_mutation() {
    let mut store = NoteStore::load(MemoryKvStore::new()).unwrap();

    let created = store.create().unwrap();
    assert_eq!(persisted_notes(&store), store.notes());

    store
        .edit(created.id.as_str(), "Plan", "ship the release")
        .unwrap()
        .expect("created note should be editable");
    assert_eq!(persisted_notes(&store), store.notes());

    let replaced = store
        .update(note(created.id.as_str(), "Plan v2", "ship it", 42))
        .unwrap();
    assert!(replaced);
    assert_eq!(store.get(created.id.as_str()).unwrap().last_modified, 42);
    assert_eq!(persisted_notes(&store), store.notes());

    assert!(store.delete(WELCOME_NOTE_ID).unwrap());
    assert_eq!(persisted_notes(&store), store.notes());
    assert_eq!(store.len(), 1);
}

#[test]
fn update_and_delete_of_unknown_id_are_noops() {
    let mut store = NoteStore::load(MemoryKvStore::new()).unwrap();
    let before = store.notes().to_vec();

    assert!(!store.update(note("ghost", "t", "c", 1)).unwrap());
    assert!(!store.delete("ghost").unwrap());
    assert_eq!(store.notes(), before.as_slice());
    assert_eq!(persisted_notes(&store), before);
}

#[test]
fn edit_refreshes_last_modified() {
    let kv = MemoryKvStore::with_entry(
        NOTES_SLOT_KEY,
        serde_json::to_string(&[note("a", "old", "", 1)]).unwrap(),
    );
    let mut store = NoteStore::load(kv).unwrap();

    let edited = store.edit("a", "new", "body").unwrap().unwrap();
    assert_eq!(edited.title, "new");
    assert_eq!(edited.content, "body");
    assert!(edited.last_modified > 1);
}

#[test]
fn search_is_case_insensitive_and_sorted() {
    let notes = vec![
        note("groceries", "Groceries", "Milk and EGGS", 300),
        note("recipe", "Omelette", "three eggs", 100),
        note("todo", "Todo", "call bank", 200),
    ];
    let kv = MemoryKvStore::with_entry(NOTES_SLOT_KEY, serde_json::to_string(&notes).unwrap());
    let store = NoteStore::load(kv).unwrap();

    let all: Vec<String> = store.search("").into_iter().map(|n| n.id).collect();
    assert_eq!(all, vec!["groceries", "todo", "recipe"]);

    let eggs: Vec<String> = store.search("Eggs").into_iter().map(|n| n.id).collect();
    assert_eq!(eggs, vec!["groceries", "recipe"]);

    let title_only: Vec<String> = store.search("TODO").into_iter().map(|n| n.id).collect();
    assert_eq!(title_only, vec!["todo"]);

    assert!(store.search("absent").is_empty());
}

#[test]
fn sqlite_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mindpad.sqlite3");

    let created_id = {
        let mut store = open_note_store(&path).unwrap();
        let created = store.create().unwrap();
        store.edit(created.id.as_str(), "Kept", "across reopen").unwrap();
        created.id
    };

    let reopened = open_note_store(&path).unwrap();
    assert_eq!(reopened.load_outcome(), LoadOutcome::Restored);
    assert_eq!(reopened.len(), 2);
    let kept = reopened.get(created_id.as_str()).unwrap();
    assert_eq!(kept.title, "Kept");
    assert_eq!(kept.content, "across reopen");
}

#[test]
fn custom_slot_key_is_isolated_from_default_slot() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_db(dir.path().join("slots.db")).unwrap();
    let kv = SqliteKvStore::try_new(conn).unwrap();
    let repo = NoteSnapshotRepository::with_key(kv, "scratch_notes");
    let store = NoteStore::load_from(repo).unwrap();

    let kv = store.repository().store();
    assert!(kv.get("scratch_notes").unwrap().is_some());
    assert!(kv.get(NOTES_SLOT_KEY).unwrap().is_none());
}

#[test]
fn snapshot_repository_reports_decoded_state() {
    let mut repo = NoteSnapshotRepository::new(MemoryKvStore::new());
    repo.write(&[note("x", "", "", 5)]).unwrap();
    match repo.read().unwrap() {
        SnapshotState::Decoded(notes) => assert_eq!(notes, vec![note("x", "", "", 5)]),
        other => panic!("unexpected state: {other:?}"),
    }
}

#[test]
fn failed_write_leaves_memory_and_slot_unchanged() {
    let failing = Rc::new(Cell::new(false));
    let kv = FailingKv {
        inner: MemoryKvStore::with_entry(
            NOTES_SLOT_KEY,
            serde_json::to_string(&[note("a", "A", "alpha", 1)]).unwrap(),
        ),
        failing: Rc::clone(&failing),
    };
    let mut store = NoteStore::load(kv).unwrap();
    let before = store.notes().to_vec();
    failing.set(true);

    assert!(store.create().is_err());
    assert!(store.update(note("a", "B", "beta", 2)).is_err());
    assert!(store.edit("a", "C", "gamma").is_err());
    assert!(store.delete("a").is_err());

    assert_eq!(store.notes(), before.as_slice());
    assert_eq!(persisted_notes(&store), before);

    failing.set(false);
    let created = store.create().unwrap();
    assert_eq!(store.len(), 2);
    assert_eq!(persisted_notes(&store), store.notes());
    assert_eq!(store.notes()[0].id, created.id);
}
