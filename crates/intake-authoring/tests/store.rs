use intake_authoring::{AuthoringError, AuthoringStore, FieldPatch, SchemaEdit};
use intake_core::config::EngineConfig;
use intake_core::models::{FieldType, SchemaStatus};
use intake_instruments::get_instrument;
use intake_storage::{FormStore, MemoryFormStore, StorageError};

fn add_field(page_id: &str, field_type: FieldType) -> SchemaEdit {
    SchemaEdit::AddField {
        page_id: page_id.into(),
        field_type,
        index: None,
    }
}

fn rename(title: &str) -> SchemaEdit {
    SchemaEdit::RenamePage {
        page_id: "page_1".into(),
        title: title.into(),
    }
}

#[test]
fn blank_store_starts_dirty_with_a_page_selected() {
    let store = AuthoringStore::blank("New form", &EngineConfig::default());
    assert!(store.is_dirty());
    assert!(!store.can_undo());
    assert_eq!(store.selected_page_id(), Some("page_1"));
    assert_eq!(store.schema().pages.len(), 1);
}

#[test]
fn undo_and_redo_walk_the_history() {
    let mut store = AuthoringStore::blank("New form", &EngineConfig::default());
    let original = store.schema().clone();

    store.apply(rename("About you")).unwrap();
    store.apply(rename("Your details")).unwrap();
    assert_eq!(store.schema().pages[0].title, "Your details");

    assert!(store.undo());
    assert_eq!(store.schema().pages[0].title, "About you");
    assert!(store.undo());
    assert_eq!(store.schema(), &original);
    assert!(!store.undo());

    assert!(store.redo());
    assert!(store.redo());
    assert!(!store.redo());
    assert_eq!(store.schema().pages[0].title, "Your details");
}

#[test]
fn a_new_edit_drops_the_redo_tail() {
    let mut store = AuthoringStore::blank("New form", &EngineConfig::default());
    store.apply(rename("A")).unwrap();
    store.apply(rename("B")).unwrap();
    store.undo();
    assert!(store.can_redo());

    store.apply(rename("C")).unwrap();
    assert!(!store.can_redo());
    store.undo();
    assert_eq!(store.schema().pages[0].title, "A");
}

#[test]
fn history_limit_bounds_undo() {
    let config = EngineConfig {
        history_limit: Some(2),
        ..EngineConfig::default()
    };
    let mut store = AuthoringStore::blank("New form", &config);
    for title in ["A", "B", "C", "D"] {
        store.apply(rename(title)).unwrap();
    }
    assert!(store.undo());
    assert!(store.undo());
    assert!(!store.undo());
    assert_eq!(store.schema().pages[0].title, "B");
    assert_eq!(store.history().len(), 3);
}

#[test]
fn failed_edit_changes_nothing() {
    let mut store = AuthoringStore::blank("New form", &EngineConfig::default());
    let before = store.schema().clone();
    assert!(store.apply(add_field("missing", FieldType::Email)).is_err());
    assert_eq!(store.schema(), &before);
    assert!(!store.can_undo());
}

#[test]
fn selection_follows_added_fields_and_clears_on_removal() {
    let mut store = AuthoringStore::blank("New form", &EngineConfig::default());
    store.apply(add_field("page_1", FieldType::Email)).unwrap();
    let field_id = store.selected_field_id().unwrap().to_string();
    assert!(store.schema().has_field(&field_id));
    assert_eq!(store.selected_page_id(), Some("page_1"));

    store
        .apply(SchemaEdit::RemoveField {
            field_id: field_id.clone(),
        })
        .unwrap();
    assert_eq!(store.selected_field_id(), None);

    // Undo restores the field but not the selection. Undoing the add
    // drops the field, and with it the selection.
    store.undo();
    store.select_field(&field_id).unwrap();
    store.undo();
    assert_eq!(store.selected_field_id(), None);
    assert!(store.select_field(&field_id).is_err());
}

#[tokio::test]
async fn saving_clears_dirty_until_the_next_edit() {
    let backend = MemoryFormStore::new();
    let mut store = AuthoringStore::blank("New form", &EngineConfig::default());
    store.apply(add_field("page_1", FieldType::ShortText)).unwrap();

    let id = store.save(&backend).await.unwrap();
    assert!(!store.is_dirty());
    assert_eq!(&backend.load_schema(&id).await.unwrap(), store.schema());

    store.apply(rename("Renamed")).unwrap();
    assert!(store.is_dirty());
    store.undo();
    assert!(!store.is_dirty());
}

#[tokio::test]
async fn failed_save_keeps_state() {
    let backend = MemoryFormStore::new();
    let mut store = AuthoringStore::blank("New form", &EngineConfig::default());
    store.apply(rename("Intake")).unwrap();
    let before = store.schema().clone();

    backend.set_fail_writes(true);
    let err = store.save(&backend).await.unwrap_err();
    assert!(matches!(err, AuthoringError::Storage(StorageError::Unavailable(_))));
    assert!(store.is_dirty());
    assert_eq!(store.schema(), &before);
    assert!(backend.keys().await.is_empty());
}

#[tokio::test]
async fn publish_requires_a_clean_integrity_check() {
    let backend = MemoryFormStore::new();
    let mut store = AuthoringStore::blank("New form", &EngineConfig::default());
    store.apply(add_field("page_1", FieldType::SingleChoice)).unwrap();
    let field_id = store.selected_field_id().unwrap().to_string();
    store
        .apply(SchemaEdit::UpdateField {
            field_id,
            patch: FieldPatch {
                options: Some(Vec::new()),
                ..FieldPatch::default()
            },
        })
        .unwrap();

    let err = store.publish(&backend).await.unwrap_err();
    assert!(matches!(err, AuthoringError::Integrity(ref issues) if issues.len() == 1));
    assert_eq!(store.schema().status, SchemaStatus::Draft);

    store.undo();
    let version = store.publish(&backend).await.unwrap();
    assert_eq!(version, 2);
    assert_eq!(store.schema().status, SchemaStatus::Published);
    assert!(!store.is_dirty());

    let saved = backend.load_schema(&store.schema().id).await.unwrap();
    assert_eq!(saved.version, 2);
    assert_eq!(saved.status, SchemaStatus::Published);
}

#[tokio::test]
async fn open_loads_a_saved_schema_clean() {
    let backend = MemoryFormStore::new();
    let phq9 = get_instrument("phq9").unwrap();
    backend.save_schema(phq9.schema()).await.unwrap();

    let store = AuthoringStore::open(&backend, "phq9", &EngineConfig::default())
        .await
        .unwrap();
    assert_eq!(store.schema(), phq9.schema());
    assert!(!store.is_dirty());

    let missing = AuthoringStore::open(&backend, "gad7", &EngineConfig::default()).await;
    assert!(matches!(missing, Err(AuthoringError::Storage(StorageError::NotFound { .. }))));
}

#[test]
fn import_is_an_undoable_step() {
    let phq9 = get_instrument("phq9").unwrap();
    let exported = AuthoringStore::new(phq9.schema().clone(), &EngineConfig::default()).export_json();

    let mut store = AuthoringStore::blank("New form", &EngineConfig::default());
    let before = store.schema().clone();
    store.import_json(&exported).unwrap();
    assert_eq!(store.schema(), phq9.schema());

    store.undo();
    assert_eq!(store.schema(), &before);

    assert!(matches!(store.import_json("{}"), Err(AuthoringError::Import(_))));
    assert_eq!(store.schema(), &before);
}
