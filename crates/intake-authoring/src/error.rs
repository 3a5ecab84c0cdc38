use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use intake_codec::ImportError;
use intake_core::integrity::SchemaIssue;
use intake_storage::StorageError;

/// An edit that cannot be applied. The schema is left as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("unknown page: {0}")]
    UnknownPage(String),

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("unknown rule: {0}")]
    UnknownRule(String),

    #[error("rule id already in use: {0}")]
    DuplicateRuleId(String),

    #[error("no completion action at index {0}")]
    UnknownCompletionAction(usize),

    #[error("index {index} is out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

#[derive(Debug, Error)]
pub enum AuthoringError {
    #[error(transparent)]
    Edit(#[from] EditError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("import failed: {0}")]
    Import(#[from] ImportError),

    #[error("schema has {} integrity issue(s)", .0.len())]
    Integrity(Vec<SchemaIssue>),
}

/// What refers to a field that was moved or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum Reference {
    Rule { rule_id: String },
    CompletionAction { index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ReferenceChange {
    Moved,
    Removed,
}

/// Non-fatal: a moved or removed field is still referenced. References are
/// never repaired automatically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DanglingReferenceWarning {
    pub field_id: String,
    pub change: ReferenceChange,
    pub referenced_by: Reference,
}

impl fmt::Display for DanglingReferenceWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let change = match self.change {
            ReferenceChange::Moved => "moved",
            ReferenceChange::Removed => "removed",
        };
        match &self.referenced_by {
            Reference::Rule { rule_id } => {
                write!(f, "field '{}' was {change} but rule '{rule_id}' still uses it", self.field_id)
            }
            Reference::CompletionAction { index } => write!(
                f,
                "field '{}' was {change} but completion action #{index} still uses it",
                self.field_id
            ),
        }
    }
}
