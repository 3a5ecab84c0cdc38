use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::answer::AnswerValue;
use crate::operator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Operator {
    Equals,
    NotEquals,
    Includes,
    NotIncludes,
    GreaterThan,
    LessThan,
    IsEmpty,
    IsNotEmpty,
}

impl Operator {
    pub const ALL: [Operator; 8] = [
        Operator::Equals,
        Operator::NotEquals,
        Operator::Includes,
        Operator::NotIncludes,
        Operator::GreaterThan,
        Operator::LessThan,
        Operator::IsEmpty,
        Operator::IsNotEmpty,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "not_equals",
            Operator::Includes => "includes",
            Operator::NotIncludes => "not_includes",
            Operator::GreaterThan => "greater_than",
            Operator::LessThan => "less_than",
            Operator::IsEmpty => "is_empty",
            Operator::IsNotEmpty => "is_not_empty",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == name)
    }

    /// `is_empty` / `is_not_empty` ignore the comparison value.
    pub fn takes_value(self) -> bool {
        !matches!(self, Operator::IsEmpty | Operator::IsNotEmpty)
    }
}

/// `answer(field_id) <operator> value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Condition {
    pub field_id: String,
    pub operator: Operator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<AnswerValue>,
}

impl Condition {
    pub fn new(field_id: impl Into<String>, operator: Operator, value: Option<AnswerValue>) -> Self {
        Self {
            field_id: field_id.into(),
            operator,
            value,
        }
    }

    /// Apply the operator to an already-resolved answer (`None` = unanswered).
    pub fn holds(&self, answer: Option<&AnswerValue>) -> bool {
        operator::compare(self.operator, answer, self.value.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum RuleAction {
    /// The target starts hidden and appears while the trigger holds.
    ShowField { target_id: String },
    /// The target starts visible and disappears while the trigger holds.
    HideField { target_id: String },
    RequireField { target_id: String },
    DisableField { target_id: String },
    ShowMessage { target_id: String, message: String },
}

impl RuleAction {
    pub fn target_id(&self) -> &str {
        match self {
            RuleAction::ShowField { target_id }
            | RuleAction::HideField { target_id }
            | RuleAction::RequireField { target_id }
            | RuleAction::DisableField { target_id }
            | RuleAction::ShowMessage { target_id, .. } => target_id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RuleAction::ShowField { .. } => "show_field",
            RuleAction::HideField { .. } => "hide_field",
            RuleAction::RequireField { .. } => "require_field",
            RuleAction::DisableField { .. } => "disable_field",
            RuleAction::ShowMessage { .. } => "show_message",
        }
    }

    /// Actions that make the target's own answer matter to other rules.
    /// These are the edges considered when looking for cyclic chains.
    pub fn chains(&self) -> bool {
        matches!(
            self,
            RuleAction::ShowField { .. }
                | RuleAction::HideField { .. }
                | RuleAction::RequireField { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ConditionalRule {
    pub id: String,
    pub trigger: Condition,
    pub action: RuleAction,
}

impl ConditionalRule {
    pub fn references(&self, field_id: &str) -> bool {
        self.trigger.field_id == field_id || self.action.target_id() == field_id
    }
}
