use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Declarative check attached to a field. Evaluated by the runtime against
/// that field's current value only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
#[ts(export)]
pub enum ValidationRule {
    Required,
    MinLength(usize),
    MaxLength(usize),
    Min(f64),
    Max(f64),
    Pattern(String),
    EmailFormat,
    PhoneFormat,
    /// `YYYY-MM-DD`, or the literal [`ValidationRule::TODAY`].
    MaxDate(String),
}

impl ValidationRule {
    /// Resolved to the evaluation-time date by `max_date`.
    pub const TODAY: &'static str = "today";

    pub fn kind(&self) -> &'static str {
        match self {
            ValidationRule::Required => "required",
            ValidationRule::MinLength(_) => "min_length",
            ValidationRule::MaxLength(_) => "max_length",
            ValidationRule::Min(_) => "min",
            ValidationRule::Max(_) => "max",
            ValidationRule::Pattern(_) => "pattern",
            ValidationRule::EmailFormat => "email_format",
            ValidationRule::PhoneFormat => "phone_format",
            ValidationRule::MaxDate(_) => "max_date",
        }
    }
}
