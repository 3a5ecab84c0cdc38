use std::sync::LazyLock;

use intake_core::models::{
    Condition, ConditionalRule, Field, FieldType, Operator, Page, RuleAction, Schema,
    SchemaStatus,
};

use crate::Instrument;
use crate::scoring::{alert_above, band, frequency_item, total_score, SeverityBand};

/// PHQ-9: Patient Health Questionnaire, nine-item depression screen.
/// Items scored 0–3, total 0–27. The functional-difficulty question only
/// appears once any symptom is endorsed.
pub struct Phq9;

pub const SCORE_FIELD: &str = "phq9_score";

const ITEMS: [&str; 9] = [
    "Little interest or pleasure in doing things",
    "Feeling down, depressed, or hopeless",
    "Trouble falling or staying asleep, or sleeping too much",
    "Feeling tired or having little energy",
    "Poor appetite or overeating",
    "Feeling bad about yourself, or that you are a failure or have let yourself or your family down",
    "Trouble concentrating on things, such as reading the newspaper or watching television",
    "Moving or speaking so slowly that other people could have noticed, or the opposite: being so fidgety or restless that you have been moving around a lot more than usual",
    "Thoughts that you would be better off dead, or of hurting yourself in some way",
];

impl Instrument for Phq9 {
    fn id(&self) -> &str {
        "phq9"
    }

    fn name(&self) -> &str {
        "PHQ-9"
    }

    fn schema(&self) -> &Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(build_schema);
        &SCHEMA
    }

    fn score_field(&self) -> &str {
        SCORE_FIELD
    }

    fn severity_bands(&self) -> &[SeverityBand] {
        static BANDS: LazyLock<Vec<SeverityBand>> = LazyLock::new(|| {
            vec![
                band("Minimal", 0.0, 4.0),
                band("Mild", 5.0, 9.0),
                band("Moderate", 10.0, 14.0),
                band("Moderately severe", 15.0, 19.0),
                band("Severe", 20.0, 27.0),
            ]
        });
        &BANDS
    }
}

fn build_schema() -> Schema {
    let item_ids: Vec<String> = (1..=ITEMS.len()).map(|n| format!("phq9_{n}")).collect();

    let symptoms = Page {
        id: "phq9_symptoms".to_string(),
        title: "Over the last 2 weeks, how often have you been bothered by any of the following problems?".to_string(),
        fields: item_ids
            .iter()
            .zip(ITEMS)
            .map(|(id, label)| frequency_item(id, label))
            .collect(),
        order: 0,
    };

    let impact = Page {
        id: "phq9_impact".to_string(),
        title: "Impact".to_string(),
        fields: vec![Field::new(
            "phq9_difficulty",
            FieldType::SingleChoice,
            "How difficult have these problems made it for you to do your work, take care of things at home, or get along with other people?",
        )
        .with_options(&[
            ("not_difficult", "Not difficult at all"),
            ("somewhat", "Somewhat difficult"),
            ("very", "Very difficult"),
            ("extremely", "Extremely difficult"),
        ])],
        order: 1,
    };

    // Any endorsed item reveals the difficulty question.
    let conditional_rules = item_ids
        .iter()
        .map(|id| ConditionalRule {
            id: format!("{id}_reveals_difficulty"),
            trigger: Condition::new(id, Operator::GreaterThan, Some(0.into())),
            action: RuleAction::ShowField {
                target_id: "phq9_difficulty".to_string(),
            },
        })
        .collect();

    Schema {
        id: "phq9".to_string(),
        title: "PHQ-9".to_string(),
        description: "Patient Health Questionnaire depression screen".to_string(),
        form_type: Some("screening".to_string()),
        status: SchemaStatus::Published,
        pages: vec![symptoms, impact],
        conditional_rules,
        completion_actions: vec![
            total_score(&item_ids, SCORE_FIELD),
            alert_above(
                SCORE_FIELD,
                9,
                "PHQ-9 total of 10 or more: moderate depressive symptoms or worse, clinical review recommended",
            ),
            alert_above(
                "phq9_9",
                0,
                "PHQ-9 item 9 endorsed: assess suicide risk before the patient leaves",
            ),
        ],
        version: 1,
        completion_message: Some("Thank you. Your provider will review your answers.".to_string()),
        estimated_time: Some("3 minutes".to_string()),
    }
}
