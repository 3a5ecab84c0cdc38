#![allow(dead_code)]

use intake_core::config::EngineConfig;
use intake_core::models::{
    AnswerValue, Condition, ConditionalRule, Field, FieldType, Operator, Page, RuleAction, Schema,
    ValidationRule,
};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn config() -> EngineConfig {
    EngineConfig::default()
}

pub fn rule(id: &str, field: &str, op: Operator, value: Option<AnswerValue>, action: RuleAction) -> ConditionalRule {
    ConditionalRule {
        id: id.to_string(),
        trigger: Condition::new(field, op, value),
        action,
    }
}

pub fn show(target: &str) -> RuleAction {
    RuleAction::ShowField {
        target_id: target.to_string(),
    }
}

pub fn hide(target: &str) -> RuleAction {
    RuleAction::HideField {
        target_id: target.to_string(),
    }
}

/// Three pages: contact details, symptoms (with a conditional "other"
/// description), and consent.
pub fn intake_schema() -> Schema {
    let mut schema = Schema::new("New patient intake");
    schema.pages = vec![
        Page::new(
            "contact",
            "Contact",
            vec![
                Field::new("full_name", FieldType::ShortText, "Full name").required(),
                Field::new("email", FieldType::Email, "Email").with_rule(ValidationRule::EmailFormat),
            ],
        ),
        Page::new(
            "symptoms",
            "Symptoms",
            vec![
                Field::new("symptoms", FieldType::MultiChoice, "Current symptoms").with_options(&[
                    ("pain", "Pain"),
                    ("fatigue", "Fatigue"),
                    ("other", "Other"),
                ]),
                Field::new("other_detail", FieldType::LongText, "Describe other symptoms")
                    .with_rule(ValidationRule::Required),
            ],
        ),
        Page::new(
            "consent",
            "Consent",
            vec![Field::new("consent", FieldType::SingleChoice, "I consent to treatment")
                .required()
                .with_options(&[("yes", "Yes"), ("no", "No")])],
        ),
    ];
    schema.renumber_pages();
    schema.conditional_rules = vec![rule(
        "other_reveals_detail",
        "symptoms",
        Operator::Includes,
        Some("other".into()),
        show("other_detail"),
    )];
    schema
}
