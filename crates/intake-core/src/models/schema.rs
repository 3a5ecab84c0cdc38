use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::action::CompletionAction;
use super::field::Field;
use super::rule::ConditionalRule;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Page {
    pub id: String,
    pub title: String,
    pub fields: Vec<Field>,
    /// Position among the schema's pages. Kept equal to the page's index by
    /// the authoring reducers.
    pub order: u32,
}

impl Page {
    pub fn new(id: impl Into<String>, title: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            fields,
            order: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SchemaStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl SchemaStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SchemaStatus::Draft => "draft",
            SchemaStatus::Published => "published",
            SchemaStatus::Archived => "archived",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        [
            SchemaStatus::Draft,
            SchemaStatus::Published,
            SchemaStatus::Archived,
        ]
        .into_iter()
        .find(|s| s.as_str() == name)
    }
}

/// The complete declarative definition of one form. Owns its pages, rules
/// and actions by value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Schema {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_type: Option<String>,
    #[serde(default)]
    pub status: SchemaStatus,
    pub pages: Vec<Page>,
    #[serde(default)]
    pub conditional_rules: Vec<ConditionalRule>,
    #[serde(default)]
    pub completion_actions: Vec<CompletionAction>,
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<String>,
}

impl Schema {
    /// An empty draft with a fresh id at version 1.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: String::new(),
            form_type: None,
            status: SchemaStatus::Draft,
            pages: Vec::new(),
            conditional_rules: Vec::new(),
            completion_actions: Vec::new(),
            version: 1,
            completion_message: None,
            estimated_time: None,
        }
    }

    /// All fields in page order, then field order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.pages.iter().flat_map(|p| p.fields.iter())
    }

    pub fn field(&self, id: &str) -> Option<&Field> {
        self.fields().find(|f| f.id == id)
    }

    /// `(page index, field index)` of a field.
    pub fn locate_field(&self, id: &str) -> Option<(usize, usize)> {
        self.pages.iter().enumerate().find_map(|(pi, page)| {
            page.fields
                .iter()
                .position(|f| f.id == id)
                .map(|fi| (pi, fi))
        })
    }

    pub fn page(&self, id: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == id)
    }

    pub fn page_index(&self, id: &str) -> Option<usize> {
        self.pages.iter().position(|p| p.id == id)
    }

    pub fn has_field(&self, id: &str) -> bool {
        self.field(id).is_some()
    }

    /// Renumber `order` to match each page's position.
    pub fn renumber_pages(&mut self) {
        for (i, page) in self.pages.iter_mut().enumerate() {
            page.order = i as u32;
        }
    }
}
