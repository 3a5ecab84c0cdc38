//! The authoring session: live schema, history, selection and dirty state.

use intake_core::config::EngineConfig;
use intake_core::integrity::{self, SchemaIssue};
use intake_core::models::{Page, Schema, SchemaStatus};
use intake_storage::FormStore;

use crate::edit::{self, SchemaEdit};
use crate::error::{AuthoringError, DanglingReferenceWarning, EditError};
use crate::history::History;

pub struct AuthoringStore {
    history: History,
    selected_field_id: Option<String>,
    selected_page_id: Option<String>,
}

impl AuthoringStore {
    /// Edit `schema`, treating it as already saved.
    pub fn new(schema: Schema, config: &EngineConfig) -> Self {
        Self {
            history: History::new(schema, config.history_limit),
            selected_field_id: None,
            selected_page_id: None,
        }
    }

    /// A fresh draft with one empty page. Unsaved from the start.
    pub fn blank(title: &str, config: &EngineConfig) -> Self {
        let mut schema = Schema::new(title);
        schema.pages.push(Page::new("page_1", "Page 1", Vec::new()));
        Self {
            history: History::unsaved(schema, config.history_limit),
            selected_field_id: None,
            selected_page_id: Some("page_1".to_string()),
        }
    }

    pub async fn open(
        store: &dyn FormStore,
        schema_id: &str,
        config: &EngineConfig,
    ) -> Result<Self, AuthoringError> {
        let schema = store.load_schema(schema_id).await?;
        tracing::info!(schema_id = %schema.id, version = schema.version, "schema opened for editing");
        Ok(Self::new(schema, config))
    }

    pub fn schema(&self) -> &Schema {
        self.history.current()
    }

    pub fn is_dirty(&self) -> bool {
        self.history.is_dirty()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn selected_field_id(&self) -> Option<&str> {
        self.selected_field_id.as_deref()
    }

    pub fn selected_page_id(&self) -> Option<&str> {
        self.selected_page_id.as_deref()
    }

    /// Apply `edit` and push the result as a new snapshot. Returns any
    /// dangling-reference warnings; on error nothing changes.
    pub fn apply(&mut self, edit: SchemaEdit) -> Result<Vec<DanglingReferenceWarning>, EditError> {
        let page_hint = match &edit {
            SchemaEdit::AddField { page_id, .. } => Some(page_id.clone()),
            _ => None,
        };
        let outcome = edit::apply_edit(self.history.current(), edit)?;
        self.history.push(outcome.schema);

        if let Some(created) = outcome.created_id {
            if let Some(page_id) = page_hint {
                self.selected_page_id = Some(page_id);
                self.selected_field_id = Some(created);
            } else {
                self.selected_page_id = Some(created);
                self.selected_field_id = None;
            }
        }
        self.prune_selection();
        Ok(outcome.warnings)
    }

    pub fn undo(&mut self) -> bool {
        let moved = self.history.undo();
        self.prune_selection();
        moved
    }

    pub fn redo(&mut self) -> bool {
        let moved = self.history.redo();
        self.prune_selection();
        moved
    }

    pub fn select_field(&mut self, field_id: &str) -> Result<(), EditError> {
        let (pi, _) = self
            .schema()
            .locate_field(field_id)
            .ok_or_else(|| EditError::UnknownField(field_id.to_string()))?;
        self.selected_page_id = Some(self.schema().pages[pi].id.clone());
        self.selected_field_id = Some(field_id.to_string());
        Ok(())
    }

    pub fn select_page(&mut self, page_id: &str) -> Result<(), EditError> {
        if self.schema().page(page_id).is_none() {
            return Err(EditError::UnknownPage(page_id.to_string()));
        }
        self.selected_page_id = Some(page_id.to_string());
        self.selected_field_id = None;
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected_field_id = None;
        self.selected_page_id = None;
    }

    /// Integrity issues of the live schema. Publishing requires none.
    pub fn issues(&self) -> Vec<SchemaIssue> {
        integrity::check(self.schema())
    }

    /// Write the live schema. On failure the schema and dirty flag are left
    /// as they were.
    pub async fn save(&mut self, store: &dyn FormStore) -> Result<String, AuthoringError> {
        let id = store.save_schema(self.history.current()).await?;
        self.history.mark_clean();
        tracing::info!(schema_id = %id, "schema saved");
        Ok(id)
    }

    /// Bump the version, mark the schema published and save it. Refused
    /// while integrity issues remain.
    pub async fn publish(&mut self, store: &dyn FormStore) -> Result<u32, AuthoringError> {
        let issues = self.issues();
        if !issues.is_empty() {
            tracing::debug!(issues = issues.len(), "publish refused");
            return Err(AuthoringError::Integrity(issues));
        }

        let mut candidate = self.history.current().clone();
        candidate.version += 1;
        candidate.status = SchemaStatus::Published;
        store.save_schema(&candidate).await?;

        let version = candidate.version;
        tracing::info!(schema_id = %candidate.id, version, "schema published");
        self.history.push(candidate);
        self.history.mark_clean();
        Ok(version)
    }

    /// Replace the live schema with an imported one, as an undoable step.
    pub fn import_json(&mut self, text: &str) -> Result<(), AuthoringError> {
        let schema = intake_codec::import_str(text)?;
        self.history.push(schema);
        self.clear_selection();
        Ok(())
    }

    pub fn export_json(&self) -> String {
        intake_codec::export_string(self.schema())
    }

    /// Drop selections that no longer exist in the live schema.
    fn prune_selection(&mut self) {
        let schema = self.history.current();
        if self
            .selected_field_id
            .as_deref()
            .is_some_and(|id| !schema.has_field(id))
        {
            self.selected_field_id = None;
        }
        if self
            .selected_page_id
            .as_deref()
            .is_some_and(|id| schema.page(id).is_none())
        {
            self.selected_page_id = None;
        }
    }
}
