//! Semantic checks over a structurally valid schema.
//!
//! Everything wrong is reported at once so an author can fix the whole list
//! in one pass. A schema with issues can still be edited and saved as a
//! draft; publishing requires an empty list.

use std::collections::{BTreeMap, HashMap, HashSet};

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::models::{CompletionAction, Schema, ValidationRule};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum SchemaIssue {
    #[error("duplicate field id '{field_id}'")]
    DuplicateFieldId { field_id: String },

    #[error("duplicate page id '{page_id}'")]
    DuplicatePageId { page_id: String },

    #[error("duplicate rule id '{rule_id}'")]
    DuplicateRuleId { rule_id: String },

    #[error("choice field '{field_id}' has no options")]
    MissingOptions { field_id: String },

    #[error("field '{field_id}' has duplicate option value '{value}'")]
    DuplicateOptionValue { field_id: String, value: String },

    #[error("rule '{rule_id}' is triggered by unknown field '{field_id}'")]
    UnknownTriggerField { rule_id: String, field_id: String },

    #[error("rule '{rule_id}' targets unknown field '{field_id}'")]
    UnknownTargetField { rule_id: String, field_id: String },

    #[error("rule '{rule_id}' compares with {operator} but has no value")]
    MissingConditionValue { rule_id: String, operator: String },

    #[error("completion action #{index} references unknown field '{field_id}'")]
    UnknownActionField { index: usize, field_id: String },

    #[error("field '{field_id}' has an invalid pattern: {reason}")]
    InvalidPattern { field_id: String, reason: String },

    #[error("field '{field_id}' has an invalid max_date '{value}'")]
    InvalidMaxDate { field_id: String, value: String },

    #[error("cyclic conditional chain: {}", path.join(" -> "))]
    CyclicConditions { path: Vec<String> },
}

/// Run every check and return all issues found, in schema order.
pub fn check(schema: &Schema) -> Vec<SchemaIssue> {
    let mut issues = Vec::new();
    check_pages_and_fields(schema, &mut issues);
    check_rules(schema, &mut issues);
    check_actions(schema, &mut issues);
    issues.extend(find_cycles(schema));
    issues
}

fn check_pages_and_fields(schema: &Schema, issues: &mut Vec<SchemaIssue>) {
    let mut page_ids = HashSet::new();
    let mut field_ids = HashSet::new();

    for page in &schema.pages {
        if !page_ids.insert(page.id.as_str()) {
            issues.push(SchemaIssue::DuplicatePageId {
                page_id: page.id.clone(),
            });
        }

        for field in &page.fields {
            if !field_ids.insert(field.id.as_str()) {
                issues.push(SchemaIssue::DuplicateFieldId {
                    field_id: field.id.clone(),
                });
            }

            if field.field_type.is_choice() && field.options.is_empty() {
                issues.push(SchemaIssue::MissingOptions {
                    field_id: field.id.clone(),
                });
            }

            let mut values = HashSet::new();
            for option in &field.options {
                if !values.insert(option.value.as_str()) {
                    issues.push(SchemaIssue::DuplicateOptionValue {
                        field_id: field.id.clone(),
                        value: option.value.clone(),
                    });
                }
            }

            for rule in &field.validation_rules {
                match rule {
                    ValidationRule::Pattern(pattern) => {
                        if let Err(e) = Regex::new(pattern) {
                            issues.push(SchemaIssue::InvalidPattern {
                                field_id: field.id.clone(),
                                reason: e.to_string(),
                            });
                        }
                    }
                    ValidationRule::MaxDate(value) => {
                        if value != ValidationRule::TODAY
                            && value.parse::<jiff::civil::Date>().is_err()
                        {
                            issues.push(SchemaIssue::InvalidMaxDate {
                                field_id: field.id.clone(),
                                value: value.clone(),
                            });
                        }
                    }
                    _ => {}
                }
            }
        }
    }
}

fn check_rules(schema: &Schema, issues: &mut Vec<SchemaIssue>) {
    let mut rule_ids = HashSet::new();
    for rule in &schema.conditional_rules {
        if !rule_ids.insert(rule.id.as_str()) {
            issues.push(SchemaIssue::DuplicateRuleId {
                rule_id: rule.id.clone(),
            });
        }
        if !schema.has_field(&rule.trigger.field_id) {
            issues.push(SchemaIssue::UnknownTriggerField {
                rule_id: rule.id.clone(),
                field_id: rule.trigger.field_id.clone(),
            });
        }
        if rule.trigger.operator.takes_value() && rule.trigger.value.is_none() {
            issues.push(SchemaIssue::MissingConditionValue {
                rule_id: rule.id.clone(),
                operator: rule.trigger.operator.as_str().to_string(),
            });
        }
        let target = rule.action.target_id();
        if !schema.has_field(target) {
            issues.push(SchemaIssue::UnknownTargetField {
                rule_id: rule.id.clone(),
                field_id: target.to_string(),
            });
        }
    }
}

/// Score sources and alert conditions may name schema fields or the result
/// of any earlier `calculate_score`.
fn check_actions(schema: &Schema, issues: &mut Vec<SchemaIssue>) {
    let mut results: HashSet<&str> = HashSet::new();
    let known = |id: &str, results: &HashSet<&str>| schema.has_field(id) || results.contains(id);

    for (index, action) in schema.completion_actions.iter().enumerate() {
        match action {
            CompletionAction::CalculateScore {
                source_field_ids,
                result_field_id,
                ..
            } => {
                for source in source_field_ids {
                    if !known(source, &results) {
                        issues.push(SchemaIssue::UnknownActionField {
                            index,
                            field_id: source.clone(),
                        });
                    }
                }
                results.insert(result_field_id.as_str());
            }
            CompletionAction::ConditionalAlert { condition, .. } => {
                if !known(&condition.field_id, &results) {
                    issues.push(SchemaIssue::UnknownActionField {
                        index,
                        field_id: condition.field_id.clone(),
                    });
                }
            }
        }
    }
}

/// Depth-first search over trigger → target edges of chaining actions. One
/// issue per back edge, carrying the cycle path (first node repeated last).
pub fn find_cycles(schema: &Schema) -> Vec<SchemaIssue> {
    let mut edges: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for rule in schema.conditional_rules.iter().filter(|r| r.action.chains()) {
        let targets = edges.entry(rule.trigger.field_id.as_str()).or_default();
        if !targets.contains(&rule.action.target_id()) {
            targets.push(rule.action.target_id());
        }
    }

    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Active,
        Done,
    }

    fn visit<'a>(
        node: &'a str,
        edges: &BTreeMap<&'a str, Vec<&'a str>>,
        marks: &mut HashMap<&'a str, Mark>,
        stack: &mut Vec<&'a str>,
        issues: &mut Vec<SchemaIssue>,
    ) {
        marks.insert(node, Mark::Active);
        stack.push(node);
        for &next in edges.get(node).map(Vec::as_slice).unwrap_or_default() {
            match marks.get(next) {
                Some(Mark::Active) => {
                    let start = stack.iter().position(|n| *n == next).unwrap_or(0);
                    let mut path: Vec<String> =
                        stack[start..].iter().map(|n| n.to_string()).collect();
                    path.push(next.to_string());
                    issues.push(SchemaIssue::CyclicConditions { path });
                }
                Some(Mark::Done) => {}
                None => visit(next, edges, marks, stack, issues),
            }
        }
        stack.pop();
        marks.insert(node, Mark::Done);
    }

    let mut marks = HashMap::new();
    let mut issues = Vec::new();
    for &node in edges.keys() {
        if !marks.contains_key(node) {
            let mut stack = Vec::new();
            visit(node, &edges, &mut marks, &mut stack, &mut issues);
        }
    }
    issues
}
