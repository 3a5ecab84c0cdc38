use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::rule::Condition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Aggregator {
    Sum,
    Average,
    /// Number of answered sources.
    Count,
}

impl Aggregator {
    pub fn as_str(self) -> &'static str {
        match self {
            Aggregator::Sum => "sum",
            Aggregator::Average => "average",
            Aggregator::Count => "count",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        [Aggregator::Sum, Aggregator::Average, Aggregator::Count]
            .into_iter()
            .find(|a| a.as_str() == name)
    }
}

/// A post-submission computation. Run once, in declared order; later actions
/// can read the `result_field_id` of earlier scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum CompletionAction {
    CalculateScore {
        source_field_ids: Vec<String>,
        aggregator: Aggregator,
        result_field_id: String,
    },
    ConditionalAlert {
        condition: Condition,
        message: String,
    },
}

impl CompletionAction {
    pub fn references(&self, field_id: &str) -> bool {
        match self {
            CompletionAction::CalculateScore {
                source_field_ids, ..
            } => source_field_ids.iter().any(|id| id == field_id),
            CompletionAction::ConditionalAlert { condition, .. } => condition.field_id == field_id,
        }
    }
}
