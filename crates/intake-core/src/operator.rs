//! Condition operator semantics shared by conditional rules and completion
//! alerts.
//!
//! Callers resolve the answer first; `None` means unanswered (or hidden).

use crate::models::{AnswerValue, Operator};

/// Apply `op` to `answer` against the rule's literal `expected`.
pub fn compare(op: Operator, answer: Option<&AnswerValue>, expected: Option<&AnswerValue>) -> bool {
    match op {
        Operator::IsEmpty => answer.is_none_or(AnswerValue::is_blank),
        Operator::IsNotEmpty => answer.is_some_and(|a| !a.is_blank()),
        Operator::Equals => equals(answer, expected),
        Operator::NotEquals => !equals(answer, expected),
        Operator::Includes => includes(answer, expected),
        Operator::NotIncludes => !includes(answer, expected),
        Operator::GreaterThan => numeric_pair(answer, expected).is_some_and(|(a, b)| a > b),
        Operator::LessThan => numeric_pair(answer, expected).is_some_and(|(a, b)| a < b),
    }
}

fn equals(answer: Option<&AnswerValue>, expected: Option<&AnswerValue>) -> bool {
    let (Some(answer), Some(expected)) = (answer, expected) else {
        return false;
    };
    match (answer, expected) {
        (AnswerValue::List(a), AnswerValue::List(b)) => a == b,
        (AnswerValue::List(items), scalar) | (scalar, AnswerValue::List(items)) => {
            items.len() == 1 && scalar_eq(&AnswerValue::Text(items[0].clone()), scalar)
        }
        (a, b) => scalar_eq(a, b),
    }
}

fn scalar_eq(a: &AnswerValue, b: &AnswerValue) -> bool {
    match (a.as_number(), b.as_number()) {
        (Some(x), Some(y)) => (x - y).abs() < f64::EPSILON,
        _ => a.to_string() == b.to_string(),
    }
}

fn includes(answer: Option<&AnswerValue>, expected: Option<&AnswerValue>) -> bool {
    let (Some(answer), Some(expected)) = (answer, expected) else {
        return false;
    };
    let needles: Vec<String> = match expected {
        AnswerValue::List(items) => items.clone(),
        scalar => vec![scalar.to_string()],
    };
    if needles.is_empty() {
        return false;
    }
    match answer.as_list() {
        Some(items) => needles.iter().all(|n| items.contains(n)),
        None => {
            let haystack = answer.to_string();
            needles.iter().all(|n| haystack.contains(n.as_str()))
        }
    }
}

fn numeric_pair(answer: Option<&AnswerValue>, expected: Option<&AnswerValue>) -> Option<(f64, f64)> {
    Some((answer?.as_number()?, expected?.as_number()?))
}
