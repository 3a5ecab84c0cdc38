use std::sync::LazyLock;

use intake_core::models::{Page, Schema, SchemaStatus};

use crate::Instrument;
use crate::scoring::{alert_above, band, frequency_item, total_score, SeverityBand};

/// GAD-7: Generalized Anxiety Disorder seven-item scale.
/// Items scored 0–3, total 0–21.
pub struct Gad7;

pub const SCORE_FIELD: &str = "gad7_score";

const ITEMS: [&str; 7] = [
    "Feeling nervous, anxious, or on edge",
    "Not being able to stop or control worrying",
    "Worrying too much about different things",
    "Trouble relaxing",
    "Being so restless that it is hard to sit still",
    "Becoming easily annoyed or irritable",
    "Feeling afraid, as if something awful might happen",
];

impl Instrument for Gad7 {
    fn id(&self) -> &str {
        "gad7"
    }

    fn name(&self) -> &str {
        "GAD-7"
    }

    fn schema(&self) -> &Schema {
        static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
            let item_ids: Vec<String> = (1..=ITEMS.len()).map(|n| format!("gad7_{n}")).collect();

            Schema {
                id: "gad7".to_string(),
                title: "GAD-7".to_string(),
                description: "Generalized anxiety screen".to_string(),
                form_type: Some("screening".to_string()),
                status: SchemaStatus::Published,
                pages: vec![Page {
                    id: "gad7_symptoms".to_string(),
                    title: "Over the last 2 weeks, how often have you been bothered by the following problems?".to_string(),
                    fields: item_ids
                        .iter()
                        .zip(ITEMS)
                        .map(|(id, label)| frequency_item(id, label))
                        .collect(),
                    order: 0,
                }],
                conditional_rules: vec![],
                completion_actions: vec![
                    total_score(&item_ids, SCORE_FIELD),
                    alert_above(
                        SCORE_FIELD,
                        9,
                        "GAD-7 total of 10 or more: moderate anxiety or worse, clinical review recommended",
                    ),
                ],
                version: 1,
                completion_message: None,
                estimated_time: Some("2 minutes".to_string()),
            }
        });
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
                band("Severe", 15.0, 21.0),
            ]
        });
        &BANDS
    }
}
