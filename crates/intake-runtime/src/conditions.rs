//! Conditional logic evaluator.
//!
//! Rules are evaluated as an arena indexed by declaration order. One pass
//! applies every rule whose trigger holds; passes repeat until the effect
//! set stops changing, because hiding a field un-answers it, which can flip
//! the triggers that read it.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use intake_core::config::EngineConfig;
use intake_core::models::{Answers, ConditionalRule, RuleAction};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ConditionalMessage {
    pub rule_id: String,
    pub target_id: String,
    pub message: String,
}

/// What the rules currently do to the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectSet {
    pub hidden_field_ids: BTreeSet<String>,
    pub required_field_ids: BTreeSet<String>,
    pub disabled_field_ids: BTreeSet<String>,
    pub messages: Vec<ConditionalMessage>,
}

impl EffectSet {
    pub fn is_hidden(&self, field_id: &str) -> bool {
        self.hidden_field_ids.contains(field_id)
    }

    pub fn is_required(&self, field_id: &str) -> bool {
        self.required_field_ids.contains(field_id)
    }

    pub fn is_disabled(&self, field_id: &str) -> bool {
        self.disabled_field_ids.contains(field_id)
    }

    /// `answers` with every hidden field dropped. Hidden fields count as
    /// unanswered no matter what stale value the session still holds.
    pub fn visible_answers(&self, answers: &Answers) -> Answers {
        answers
            .iter()
            .filter(|(id, _)| !self.is_hidden(id))
            .map(|(id, value)| (id.clone(), value.clone()))
            .collect()
    }
}

/// Raised when evaluation does not reach a fixed point. A schema defect:
/// it should block publishing, not crash a fill-out session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("conditional rules did not converge after {passes} passes (oscillating: {})", oscillating.join(", "))]
pub struct CycleDetected {
    pub passes: usize,
    /// Fields whose visibility differed between the last two passes.
    pub oscillating: Vec<String>,
}

/// Evaluate `rules` against `answers` to a fixed point.
///
/// The pass cap is the configured `max_condition_passes`, raised to
/// `rules.len() + 2` so that long acyclic chains always settle.
pub fn evaluate(
    rules: &[ConditionalRule],
    answers: &Answers,
    config: &EngineConfig,
) -> Result<EffectSet, CycleDetected> {
    let cap = config.max_condition_passes.max(rules.len() + 2);

    let mut previous = EffectSet::default();
    let mut current = single_pass(rules, answers, &previous.hidden_field_ids);
    for pass in 2..=cap {
        let next = single_pass(rules, answers, &current.hidden_field_ids);
        if next == current {
            tracing::trace!(passes = pass, rules = rules.len(), "conditions converged");
            return Ok(next);
        }
        previous = std::mem::replace(&mut current, next);
    }

    let oscillating: Vec<String> = previous
        .hidden_field_ids
        .symmetric_difference(&current.hidden_field_ids)
        .cloned()
        .collect();
    tracing::warn!(passes = cap, ?oscillating, "conditional rules did not converge");
    Err(CycleDetected {
        passes: cap,
        oscillating,
    })
}

/// One accumulation pass. Triggers on fields hidden by the previous pass
/// read as unanswered. A later rule overrides an earlier one on the same
/// target.
fn single_pass(
    rules: &[ConditionalRule],
    answers: &Answers,
    hidden: &BTreeSet<String>,
) -> EffectSet {
    // show_field targets start hidden; hide_field targets start visible.
    let mut visible: BTreeMap<&str, bool> = BTreeMap::new();
    for rule in rules {
        if let RuleAction::ShowField { target_id } = &rule.action {
            visible.entry(target_id.as_str()).or_insert(false);
        }
    }

    let mut effects = EffectSet::default();
    for rule in rules {
        let trigger = &rule.trigger.field_id;
        let answer = if hidden.contains(trigger) {
            None
        } else {
            answers.get(trigger)
        };
        if !rule.trigger.holds(answer) {
            continue;
        }

        match &rule.action {
            RuleAction::ShowField { target_id } => {
                visible.insert(target_id, true);
            }
            RuleAction::HideField { target_id } => {
                visible.insert(target_id, false);
            }
            RuleAction::RequireField { target_id } => {
                effects.required_field_ids.insert(target_id.clone());
            }
            RuleAction::DisableField { target_id } => {
                effects.disabled_field_ids.insert(target_id.clone());
            }
            RuleAction::ShowMessage { target_id, message } => {
                effects.messages.push(ConditionalMessage {
                    rule_id: rule.id.clone(),
                    target_id: target_id.clone(),
                    message: message.clone(),
                });
            }
        }
    }

    effects.hidden_field_ids = visible
        .into_iter()
        .filter(|(_, shown)| !shown)
        .map(|(id, _)| id.to_string())
        .collect();
    effects
}
