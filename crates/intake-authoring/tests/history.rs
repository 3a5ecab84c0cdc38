//! Property: undo is the inverse of every successful edit, and redo
//! replays them exactly.

use intake_authoring::{AuthoringStore, FieldPatch, MetadataPatch, SchemaEdit};
use intake_core::config::EngineConfig;
use intake_core::models::{FieldType, Schema};
use proptest::prelude::*;

/// Edit "templates" resolved against the live schema, so most of them hit
/// existing pages and fields.
#[derive(Debug, Clone)]
enum Step {
    AddPage(String),
    AddField(usize, FieldType),
    RenamePage(usize, String),
    MovePage(usize, usize),
    RelabelField(usize, String),
    MoveField(usize, usize, usize),
    RemoveField(usize),
    RemovePage(usize),
    Retitle(String),
}

fn arb_step() -> impl Strategy<Value = Step> {
    let title = "[A-Za-z ]{1,12}";
    prop_oneof![
        title.prop_map(Step::AddPage),
        (0..4usize, proptest::sample::select(FieldType::ALL.to_vec()))
            .prop_map(|(p, t)| Step::AddField(p, t)),
        (0..4usize, title).prop_map(|(p, t)| Step::RenamePage(p, t)),
        (0..4usize, 0..4usize).prop_map(|(p, to)| Step::MovePage(p, to)),
        (0..8usize, title).prop_map(|(f, l)| Step::RelabelField(f, l)),
        (0..8usize, 0..4usize, 0..4usize).prop_map(|(f, p, i)| Step::MoveField(f, p, i)),
        (0..8usize).prop_map(Step::RemoveField),
        (0..4usize).prop_map(Step::RemovePage),
        title.prop_map(Step::Retitle),
    ]
}

fn page_id(schema: &Schema, index: usize) -> String {
    schema
        .pages
        .get(index)
        .map_or_else(|| format!("missing_{index}"), |p| p.id.clone())
}

fn field_id(schema: &Schema, index: usize) -> String {
    schema
        .fields()
        .nth(index)
        .map_or_else(|| format!("missing_{index}"), |f| f.id.clone())
}

fn resolve(step: Step, schema: &Schema) -> SchemaEdit {
    match step {
        Step::AddPage(title) => SchemaEdit::AddPage { title },
        Step::AddField(p, field_type) => SchemaEdit::AddField {
            page_id: page_id(schema, p),
            field_type,
            index: None,
        },
        Step::RenamePage(p, title) => SchemaEdit::RenamePage {
            page_id: page_id(schema, p),
            title,
        },
        Step::MovePage(p, to_index) => SchemaEdit::MovePage {
            page_id: page_id(schema, p),
            to_index,
        },
        Step::RelabelField(f, label) => SchemaEdit::UpdateField {
            field_id: field_id(schema, f),
            patch: FieldPatch {
                label: Some(label),
                ..FieldPatch::default()
            },
        },
        Step::MoveField(f, p, target_index) => SchemaEdit::MoveField {
            field_id: field_id(schema, f),
            target_page_id: page_id(schema, p),
            target_index,
        },
        Step::RemoveField(f) => SchemaEdit::RemoveField {
            field_id: field_id(schema, f),
        },
        Step::RemovePage(p) => SchemaEdit::RemovePage {
            page_id: page_id(schema, p),
        },
        Step::Retitle(title) => SchemaEdit::SetMetadata {
            patch: MetadataPatch {
                title: Some(title),
                ..MetadataPatch::default()
            },
        },
    }
}

proptest! {
    #[test]
    fn undo_inverts_and_redo_replays(steps in proptest::collection::vec(arb_step(), 1..20)) {
        let mut store = AuthoringStore::blank("Property form", &EngineConfig::default());
        let mut snapshots = vec![store.schema().clone()];

        for step in steps {
            let before = store.schema().clone();
            let edit = resolve(step, &before);
            if store.apply(edit).is_ok() {
                // Each edit undoes to exactly the snapshot it started from.
                prop_assert!(store.undo());
                prop_assert_eq!(store.schema(), &before);
                prop_assert!(store.redo());
                snapshots.push(store.schema().clone());
            } else {
                prop_assert_eq!(store.schema(), &before);
            }
        }

        for expected in snapshots.iter().rev().skip(1) {
            prop_assert!(store.undo());
            prop_assert_eq!(store.schema(), expected);
        }
        prop_assert!(!store.can_undo());
        prop_assert_eq!(store.history().index(), 0);

        for expected in snapshots.iter().skip(1) {
            prop_assert!(store.redo());
            prop_assert_eq!(store.schema(), expected);
        }
        prop_assert!(!store.can_redo());
        prop_assert_eq!(store.history().index(), snapshots.len() - 1);
        prop_assert_eq!(store.history().len(), snapshots.len());
    }
}
