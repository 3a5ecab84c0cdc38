//! Schema reducers.
//!
//! Each [`SchemaEdit`] maps a snapshot to a new snapshot. The input is never
//! mutated, so a failed edit needs no rollback.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use intake_core::models::{
    AnswerValue, CompletionAction, ConditionalRule, Field, FieldOption, FieldType, LayoutWidth,
    Page, Schema, ValidationRule,
};

use crate::error::{DanglingReferenceWarning, EditError, Reference, ReferenceChange};

/// Partial update of a field. `None` leaves the property alone; the
/// nested options clear it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FieldPatch {
    #[serde(default)]
    pub field_type: Option<FieldType>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub required: Option<bool>,
    #[serde(default)]
    pub placeholder: Option<Option<String>>,
    #[serde(default)]
    pub options: Option<Vec<FieldOption>>,
    #[serde(default)]
    pub validation_rules: Option<Vec<ValidationRule>>,
    #[serde(default)]
    pub default_value: Option<Option<AnswerValue>>,
    #[serde(default)]
    pub layout_width: Option<LayoutWidth>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MetadataPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub form_type: Option<Option<String>>,
    #[serde(default)]
    pub completion_message: Option<Option<String>>,
    #[serde(default)]
    pub estimated_time: Option<Option<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "op", rename_all = "snake_case")]
#[ts(export)]
pub enum SchemaEdit {
    AddPage {
        title: String,
    },
    RenamePage {
        page_id: String,
        title: String,
    },
    /// Removes the page and every field on it.
    RemovePage {
        page_id: String,
    },
    MovePage {
        page_id: String,
        to_index: usize,
    },
    /// Appends to the page, or inserts at `index` (clamped to the end).
    AddField {
        page_id: String,
        field_type: FieldType,
        #[serde(default)]
        index: Option<usize>,
    },
    UpdateField {
        field_id: String,
        patch: FieldPatch,
    },
    MoveField {
        field_id: String,
        target_page_id: String,
        target_index: usize,
    },
    RemoveField {
        field_id: String,
    },
    AddRule {
        rule: ConditionalRule,
    },
    RemoveRule {
        rule_id: String,
    },
    AddCompletionAction {
        action: CompletionAction,
    },
    RemoveCompletionAction {
        index: usize,
    },
    SetMetadata {
        patch: MetadataPatch,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditOutcome {
    pub schema: Schema,
    pub warnings: Vec<DanglingReferenceWarning>,
    /// Id of the page or field the edit created, if any.
    pub created_id: Option<String>,
}

/// Apply `edit` to a copy of `schema`.
pub fn apply_edit(schema: &Schema, edit: SchemaEdit) -> Result<EditOutcome, EditError> {
    let mut next = schema.clone();
    let mut warnings = Vec::new();
    let mut created_id = None;

    match edit {
        SchemaEdit::AddPage { title } => {
            let id = fresh_id("page", |id| next.page(id).is_some());
            next.pages.push(Page::new(id.clone(), title, Vec::new()));
            created_id = Some(id);
        }
        SchemaEdit::RenamePage { page_id, title } => {
            page_mut(&mut next, &page_id)?.title = title;
        }
        SchemaEdit::RemovePage { page_id } => {
            let index = next
                .page_index(&page_id)
                .ok_or(EditError::UnknownPage(page_id))?;
            let page = next.pages.remove(index);
            for field in &page.fields {
                warnings.extend(dangling(&next, &field.id, ReferenceChange::Removed));
            }
        }
        SchemaEdit::MovePage { page_id, to_index } => {
            let from = next
                .page_index(&page_id)
                .ok_or(EditError::UnknownPage(page_id))?;
            let len = next.pages.len();
            if to_index >= len {
                return Err(EditError::IndexOutOfRange {
                    index: to_index,
                    len,
                });
            }
            let page = next.pages.remove(from);
            next.pages.insert(to_index, page);
        }
        SchemaEdit::AddField {
            page_id,
            field_type,
            index,
        } => {
            let id = fresh_id("field", |id| next.has_field(id));
            let field = new_field(id.clone(), field_type);
            let page = page_mut(&mut next, &page_id)?;
            let at = index.map_or(page.fields.len(), |i| i.min(page.fields.len()));
            page.fields.insert(at, field);
            created_id = Some(id);
        }
        SchemaEdit::UpdateField { field_id, patch } => {
            let (pi, fi) = next
                .locate_field(&field_id)
                .ok_or(EditError::UnknownField(field_id))?;
            apply_patch(&mut next.pages[pi].fields[fi], patch);
        }
        SchemaEdit::MoveField {
            field_id,
            target_page_id,
            target_index,
        } => {
            let (pi, fi) = next
                .locate_field(&field_id)
                .ok_or_else(|| EditError::UnknownField(field_id.clone()))?;
            let target = next
                .page_index(&target_page_id)
                .ok_or(EditError::UnknownPage(target_page_id))?;
            let field = next.pages[pi].fields.remove(fi);
            let fields = &mut next.pages[target].fields;
            fields.insert(target_index.min(fields.len()), field);
            warnings.extend(dangling(&next, &field_id, ReferenceChange::Moved));
        }
        SchemaEdit::RemoveField { field_id } => {
            let (pi, fi) = next
                .locate_field(&field_id)
                .ok_or_else(|| EditError::UnknownField(field_id.clone()))?;
            next.pages[pi].fields.remove(fi);
            warnings.extend(dangling(&next, &field_id, ReferenceChange::Removed));
        }
        SchemaEdit::AddRule { rule } => {
            if next.conditional_rules.iter().any(|r| r.id == rule.id) {
                return Err(EditError::DuplicateRuleId(rule.id));
            }
            next.conditional_rules.push(rule);
        }
        SchemaEdit::RemoveRule { rule_id } => {
            let index = next
                .conditional_rules
                .iter()
                .position(|r| r.id == rule_id)
                .ok_or(EditError::UnknownRule(rule_id))?;
            next.conditional_rules.remove(index);
        }
        SchemaEdit::AddCompletionAction { action } => {
            next.completion_actions.push(action);
        }
        SchemaEdit::RemoveCompletionAction { index } => {
            if index >= next.completion_actions.len() {
                return Err(EditError::UnknownCompletionAction(index));
            }
            next.completion_actions.remove(index);
        }
        SchemaEdit::SetMetadata { patch } => {
            if let Some(title) = patch.title {
                next.title = title;
            }
            if let Some(description) = patch.description {
                next.description = description;
            }
            if let Some(form_type) = patch.form_type {
                next.form_type = form_type;
            }
            if let Some(message) = patch.completion_message {
                next.completion_message = message;
            }
            if let Some(time) = patch.estimated_time {
                next.estimated_time = time;
            }
        }
    }

    next.renumber_pages();
    if !warnings.is_empty() {
        tracing::debug!(warnings = warnings.len(), "edit left dangling references");
    }
    Ok(EditOutcome {
        schema: next,
        warnings,
        created_id,
    })
}

/// Every rule and completion action in `schema` that still mentions
/// `field_id`.
pub fn dangling(schema: &Schema, field_id: &str, change: ReferenceChange) -> Vec<DanglingReferenceWarning> {
    let rules = schema
        .conditional_rules
        .iter()
        .filter(|r| r.references(field_id))
        .map(|r| Reference::Rule {
            rule_id: r.id.clone(),
        });
    let actions = schema
        .completion_actions
        .iter()
        .enumerate()
        .filter(|(_, a)| a.references(field_id))
        .map(|(index, _)| Reference::CompletionAction { index });

    rules
        .chain(actions)
        .map(|referenced_by| DanglingReferenceWarning {
            field_id: field_id.to_string(),
            change,
            referenced_by,
        })
        .collect()
}

fn page_mut<'a>(schema: &'a mut Schema, page_id: &str) -> Result<&'a mut Page, EditError> {
    schema
        .pages
        .iter_mut()
        .find(|p| p.id == page_id)
        .ok_or_else(|| EditError::UnknownPage(page_id.to_string()))
}

/// A short random id with `prefix` that `taken` does not already claim.
fn fresh_id(prefix: &str, taken: impl Fn(&str) -> bool) -> String {
    loop {
        let uuid = Uuid::new_v4().simple().to_string();
        let id = format!("{prefix}_{}", &uuid[..8]);
        if !taken(&id) {
            return id;
        }
    }
}

/// A blank field of `field_type`. Choice fields start with two options so
/// the result passes the integrity check.
fn new_field(id: String, field_type: FieldType) -> Field {
    let field = Field::new(id, field_type, field_type.default_label());
    if field_type.is_choice() {
        field.with_options(&[("option_1", "Option 1"), ("option_2", "Option 2")])
    } else {
        field
    }
}

fn apply_patch(field: &mut Field, patch: FieldPatch) {
    if let Some(field_type) = patch.field_type {
        field.field_type = field_type;
    }
    if let Some(label) = patch.label {
        field.label = label;
    }
    if let Some(required) = patch.required {
        field.required = required;
    }
    if let Some(placeholder) = patch.placeholder {
        field.placeholder = placeholder;
    }
    if let Some(options) = patch.options {
        field.options = options;
    }
    if let Some(rules) = patch.validation_rules {
        field.validation_rules = rules;
    }
    if let Some(default_value) = patch.default_value {
        field.default_value = default_value;
    }
    if let Some(width) = patch.layout_width {
        field.layout_width = width;
    }
}
