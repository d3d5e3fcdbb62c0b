//! Unit tests for WindowRepository: default synthesis, edits and renumbering.

use std::sync::Arc;

use weblauncher::database::Database;
use weblauncher::managers::window_repository::*;
use weblauncher::services::settings_store::{SettingsStore, SettingsStoreTrait};
use weblauncher::types::errors::WindowError;
use weblauncher::types::window::WindowConfig;

fn db() -> Arc<Database> {
    Arc::new(Database::open_in_memory().unwrap())
}

fn orders(repo: &WindowRepository) -> Vec<i64> {
    repo.windows().iter().map(|w| w.order).collect()
}

fn names(repo: &WindowRepository) -> Vec<String> {
    repo.windows().iter().map(|w| w.name.clone()).collect()
}

#[test]
fn test_load_empty_store_creates_and_persists_default() {
    let db = db();
    let mut repo = WindowRepository::new(db.clone());
    let loaded = repo.load().unwrap().to_vec();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].name, DEFAULT_WINDOW_NAME);
    assert_eq!(loaded[0].url, DEFAULT_WINDOW_URL);
    assert_eq!(loaded[0].order, 0);

    let stored = SettingsStore::new(db).windows_json();
    assert_eq!(WindowRepository::parse_windows(&stored), loaded);
}

#[test]
fn test_load_malformed_store_falls_back_to_default() {
    let db = db();
    SettingsStore::new(db.clone()).set_windows_json("{oops").unwrap();

    let mut repo = WindowRepository::new(db.clone());
    assert_eq!(repo.load().unwrap().len(), 1);
    let stored = SettingsStore::new(db).windows_json();
    assert_eq!(WindowRepository::parse_windows(&stored).len(), 1);
}

#[test]
fn test_load_existing_list_is_left_alone() {
    let db = db();
    SettingsStore::new(db.clone())
        .set_windows_json(
            r#"[{"id":"a","name":"A","url":"https://a.test","order":3},
                {"id":"b","name":"B","url":"https://b.test","order":9}]"#,
        )
        .unwrap();
    let mut repo = WindowRepository::new(db);
    // Renumbering happens on write, not on read.
    assert_eq!(repo.load().unwrap().iter().map(|w| w.order).collect::<Vec<_>>(), vec![3, 9]);
}

#[test]
fn test_add_edit_delete() {
    let mut repo = WindowRepository::new(db());
    repo.load().unwrap();

    let added = repo.add_window("  Mail ", "https://mail.test").unwrap();
    assert_eq!(added.name, "Mail");
    assert_eq!(added.order, 1);

    let blank = repo.add_window("", "   ").unwrap();
    assert_eq!(blank.name, FALLBACK_WINDOW_NAME);
    assert_eq!(blank.url, DEFAULT_WINDOW_URL);

    repo.edit_window(&added.id, "Inbox", "https://inbox.test").unwrap();
    let edited = repo.get_window(&added.id).unwrap();
    assert_eq!(edited.name, "Inbox");
    assert_eq!(edited.url, "https://inbox.test");

    let first_id = repo.windows()[0].id.clone();
    let removed = repo.delete_window(&first_id).unwrap();
    assert_eq!(removed.name, DEFAULT_WINDOW_NAME);
    assert_eq!(orders(&repo), vec![0, 1]);
    assert_eq!(names(&repo), vec!["Inbox".to_string(), FALLBACK_WINDOW_NAME.to_string()]);
}

#[test]
fn test_unknown_ids_and_bad_index() {
    let mut repo = WindowRepository::new(db());
    repo.load().unwrap();
    let id = repo.windows()[0].id.clone();

    assert!(matches!(repo.edit_window("nope", "a", "b"), Err(WindowError::NotFound(_))));
    assert!(matches!(repo.delete_window("nope"), Err(WindowError::NotFound(_))));
    assert!(matches!(repo.move_window(&id, 1), Err(WindowError::InvalidIndex(1))));
}

#[test]
fn test_move_window_renumbers() {
    let mut repo = WindowRepository::new(db());
    repo.load().unwrap();
    repo.add_window("B", "https://b.test").unwrap();
    let c = repo.add_window("C", "https://c.test").unwrap();

    repo.move_window(&c.id, 0).unwrap();
    assert_eq!(names(&repo), vec!["C", "Home", "B"]);
    assert_eq!(orders(&repo), vec![0, 1, 2]);
}

#[test]
fn test_update_windows_sorts_then_renumbers() {
    let db = db();
    let mut repo = WindowRepository::new(db.clone());
    let list = vec![
        WindowConfig { id: "x".into(), name: "X".into(), url: "https://x.test".into(), order: 40 },
        WindowConfig { id: "y".into(), name: "Y".into(), url: "https://y.test".into(), order: -3 },
        WindowConfig { id: "z".into(), name: "Z".into(), url: "https://z.test".into(), order: 7 },
    ];
    repo.update_windows(list).unwrap();
    assert_eq!(names(&repo), vec!["Y", "Z", "X"]);

    let mut reloaded = WindowRepository::new(db);
    let ids: Vec<(String, i64)> = reloaded
        .load()
        .unwrap()
        .iter()
        .map(|w| (w.id.clone(), w.order))
        .collect();
    assert_eq!(ids, vec![("y".to_string(), 0), ("z".to_string(), 1), ("x".to_string(), 2)]);
}
