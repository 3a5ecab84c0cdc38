use std::collections::HashMap;
use std::sync::{LazyLock, Mutex, PoisonError};

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use intake_core::models::{AnswerValue, Field, ValidationRule};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?[0-9][0-9\s\-().]{5,18}[0-9]$").expect("phone pattern compiles")
});

/// Author patterns compiled on first use, keyed by source. Compile errors
/// are kept too so a broken pattern is only parsed once.
static PATTERNS: LazyLock<Mutex<HashMap<String, Result<Regex, String>>>> =
    LazyLock::new(Default::default);

fn author_pattern(pattern: &str) -> Result<Regex, String> {
    let mut cache = PATTERNS.lock().unwrap_or_else(PoisonError::into_inner);
    cache
        .entry(pattern.to_string())
        .or_insert_with(|| Regex::new(pattern).map_err(|e| e.to_string()))
        .clone()
}

/// A single failed rule on a single field. Recoverable by the respondent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, Error)]
#[ts(export)]
#[error("{message}")]
pub struct ValidationError {
    pub field_id: String,
    /// Kind of the failed rule, e.g. `"min_length"`.
    pub rule: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &Field, rule: &str, message: String) -> Self {
        Self {
            field_id: field.id.clone(),
            rule: rule.to_string(),
            message,
        }
    }
}

/// Check every rule on `field` against `value` using today's date.
pub fn validate(field: &Field, value: Option<&AnswerValue>) -> Vec<ValidationError> {
    validate_at(field, value, jiff::Zoned::now().date())
}

/// Pure form of [`validate`]: `today` resolves the `"today"` token.
///
/// All failing rules are reported, not only the first.
pub fn validate_at(
    field: &Field,
    value: Option<&AnswerValue>,
    today: jiff::civil::Date,
) -> Vec<ValidationError> {
    validate_with_requirement(field, value, field.required, today)
}

/// Like [`validate_at`] with requiredness supplied by the caller (the flow
/// controller merges in `require_field` effects).
///
/// `required` only adds a check when the field has no explicit
/// `ValidationRule::Required`, so the same gap is never reported twice.
pub fn validate_with_requirement(
    field: &Field,
    value: Option<&AnswerValue>,
    required: bool,
    today: jiff::civil::Date,
) -> Vec<ValidationError> {
    if !field.is_answerable() {
        return Vec::new();
    }

    let blank = value.is_none_or(AnswerValue::is_blank);
    let mut errors = Vec::new();

    let has_required_rule = field
        .validation_rules
        .iter()
        .any(|r| matches!(r, ValidationRule::Required));
    if required && !has_required_rule && blank {
        errors.push(required_error(field));
    }

    for rule in &field.validation_rules {
        if let Some(error) = check_rule(field, rule, value, blank, today) {
            errors.push(error);
        }
    }
    errors
}

fn required_error(field: &Field) -> ValidationError {
    ValidationError::new(field, "required", format!("{} is required", field.label))
}

/// Length rules count selections on multi-select fields.
fn length_unit(field: &Field) -> &'static str {
    if field.field_type.is_list_valued() {
        "selections"
    } else {
        "characters"
    }
}

fn check_rule(
    field: &Field,
    rule: &ValidationRule,
    value: Option<&AnswerValue>,
    blank: bool,
    today: jiff::civil::Date,
) -> Option<ValidationError> {
    if let ValidationRule::Required = rule {
        return blank.then(|| required_error(field));
    }

    // Optional-and-empty only ever fails `required`.
    let value = value.filter(|_| !blank)?;
    let kind = rule.kind();
    let fail = |message: String| Some(ValidationError::new(field, kind, message));

    match rule {
        ValidationRule::Required => None,
        ValidationRule::MinLength(min) => {
            let len = value.length();
            if len < *min {
                fail(format!(
                    "{} needs at least {min} {} (got {len})",
                    field.label,
                    length_unit(field)
                ))
            } else {
                None
            }
        }
        ValidationRule::MaxLength(max) => {
            let len = value.length();
            if len > *max {
                fail(format!(
                    "{} allows at most {max} {} (got {len})",
                    field.label,
                    length_unit(field)
                ))
            } else {
                None
            }
        }
        ValidationRule::Min(min) => match value.as_number() {
            None => fail(format!("{} must be a number", field.label)),
            Some(n) if n < *min => fail(format!("{} must be at least {min}", field.label)),
            Some(_) => None,
        },
        ValidationRule::Max(max) => match value.as_number() {
            None => fail(format!("{} must be a number", field.label)),
            Some(n) if n > *max => fail(format!("{} must be at most {max}", field.label)),
            Some(_) => None,
        },
        ValidationRule::Pattern(pattern) => match author_pattern(pattern) {
            Err(e) => fail(format!("{} has an invalid pattern: {e}", field.label)),
            Ok(re) if !re.is_match(&value.to_string()) => {
                fail(format!("{} is not in the expected format", field.label))
            }
            Ok(_) => None,
        },
        ValidationRule::EmailFormat => {
            if EMAIL.is_match(value.to_string().trim()) {
                None
            } else {
                fail(format!("{} must be a valid email address", field.label))
            }
        }
        ValidationRule::PhoneFormat => {
            if PHONE.is_match(value.to_string().trim()) {
                None
            } else {
                fail(format!("{} must be a valid phone number", field.label))
            }
        }
        ValidationRule::MaxDate(bound) => {
            let limit = if bound == ValidationRule::TODAY {
                today
            } else {
                match bound.parse::<jiff::civil::Date>() {
                    Ok(date) => date,
                    Err(_) => return fail(format!("{} has an invalid date limit", field.label)),
                }
            };
            match value.to_string().trim().parse::<jiff::civil::Date>() {
                Err(_) => fail(format!("{} must be a date (YYYY-MM-DD)", field.label)),
                Ok(date) if date > limit => {
                    fail(format!("{} must be on or before {limit}", field.label))
                }
                Ok(_) => None,
            }
        }
    }
}
