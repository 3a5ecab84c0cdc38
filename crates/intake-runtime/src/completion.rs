//! Post-submission completion pipeline: scores, then alerts that may read
//! those scores.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use intake_core::config::{EngineConfig, MissingScoreSource};
use intake_core::models::{Aggregator, AnswerValue, Answers, CompletionAction};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionOutcome {
    pub computed_results: BTreeMap<String, f64>,
    pub fired_alerts: Vec<String>,
}

/// Run `actions` in declared order over `answers`.
///
/// `answers` should already exclude hidden fields. Results written by a
/// `calculate_score` shadow answers with the same id for every later
/// action. Pure: the same input always gives the same outcome.
pub fn run(actions: &[CompletionAction], answers: &Answers, config: &EngineConfig) -> CompletionOutcome {
    let mut outcome = CompletionOutcome::default();

    for action in actions {
        match action {
            CompletionAction::CalculateScore {
                source_field_ids,
                aggregator,
                result_field_id,
            } => {
                let sources: Vec<Option<AnswerValue>> = source_field_ids
                    .iter()
                    .map(|id| lookup(id, answers, &outcome.computed_results))
                    .collect();
                let score = aggregate(*aggregator, &sources, config.missing_score_source);
                tracing::debug!(result = %result_field_id, score, "score calculated");
                outcome
                    .computed_results
                    .insert(result_field_id.clone(), score);
            }
            CompletionAction::ConditionalAlert { condition, message } => {
                let answer = lookup(&condition.field_id, answers, &outcome.computed_results);
                if condition.holds(answer.as_ref()) {
                    tracing::info!(field = %condition.field_id, "completion alert fired");
                    outcome.fired_alerts.push(message.clone());
                }
            }
        }
    }
    outcome
}

fn lookup(id: &str, answers: &Answers, results: &BTreeMap<String, f64>) -> Option<AnswerValue> {
    results
        .get(id)
        .map(|n| AnswerValue::Number(*n))
        .or_else(|| answers.get(id).cloned())
}

fn aggregate(aggregator: Aggregator, sources: &[Option<AnswerValue>], missing: MissingScoreSource) -> f64 {
    let numbers: Vec<Option<f64>> = sources
        .iter()
        .map(|s| s.as_ref().and_then(AnswerValue::as_number))
        .collect();
    let sum: f64 = numbers.iter().map(|n| n.unwrap_or(0.0)).sum();

    match aggregator {
        Aggregator::Sum => sum,
        Aggregator::Average => {
            let denominator = match missing {
                MissingScoreSource::Zero => numbers.len(),
                MissingScoreSource::Exclude => numbers.iter().filter(|n| n.is_some()).count(),
            };
            if denominator == 0 {
                0.0
            } else {
                sum / denominator as f64
            }
        }
        Aggregator::Count => sources
            .iter()
            .filter(|s| s.as_ref().is_some_and(|v| !v.is_blank()))
            .count() as f64,
    }
}
