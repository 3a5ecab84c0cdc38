use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One problem found while importing, located by JSON path
/// (e.g. `pages[0].elements[2].type`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportIssue {
    pub path: String,
    pub message: String,
}

impl fmt::Display for ImportIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("form definition has {} problem(s): {}", .0.len(), join(.0))]
    Invalid(Vec<ImportIssue>),
}

impl ImportError {
    /// Path-qualified problems; empty for a JSON syntax error.
    pub fn issues(&self) -> &[ImportIssue] {
        match self {
            ImportError::Parse(_) => &[],
            ImportError::Invalid(issues) => issues,
        }
    }
}

fn join(issues: &[ImportIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
