use serde::{Deserialize, Serialize};
use ts_rs::TS;

use intake_core::models::{
    Aggregator, AnswerValue, CompletionAction, Condition, Field, FieldType, Operator,
};

/// Frequency scale shared by the PHQ and GAD families ("over the last two
/// weeks, how often..."). Option values are the item scores.
pub const FREQUENCY_OPTIONS: [(&str, &str); 4] = [
    ("0", "Not at all"),
    ("1", "Several days"),
    ("2", "More than half the days"),
    ("3", "Nearly every day"),
];

/// Inclusive score range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoreRange {
    pub min: f64,
    pub max: f64,
}

impl ScoreRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// A named interpretation band for a total score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SeverityBand {
    pub label: String,
    pub range: ScoreRange,
}

pub(crate) fn band(label: &str, min: f64, max: f64) -> SeverityBand {
    SeverityBand {
        label: label.to_string(),
        range: ScoreRange::new(min, max),
    }
}

/// A required single-choice item on the frequency scale.
pub(crate) fn frequency_item(id: &str, label: &str) -> Field {
    Field::new(id, FieldType::SingleChoice, label)
        .required()
        .with_options(&FREQUENCY_OPTIONS)
}

pub(crate) fn total_score(items: &[String], result_field_id: &str) -> CompletionAction {
    CompletionAction::CalculateScore {
        source_field_ids: items.to_vec(),
        aggregator: Aggregator::Sum,
        result_field_id: result_field_id.to_string(),
    }
}

pub(crate) fn alert_above(field_id: &str, threshold: i32, message: &str) -> CompletionAction {
    CompletionAction::ConditionalAlert {
        condition: Condition::new(
            field_id,
            Operator::GreaterThan,
            Some(AnswerValue::from(threshold)),
        ),
        message: message.to_string(),
    }
}
