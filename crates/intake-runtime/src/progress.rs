use serde::{Deserialize, Serialize};
use ts_rs::TS;

use intake_core::models::{AnswerValue, Answers, Schema};

use crate::conditions::EffectSet;

/// Completion progress over every page of the form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Progress {
    /// Visible answerable fields holding a non-blank answer.
    pub answered: usize,
    /// Visible answerable fields.
    pub total: usize,
}

impl Progress {
    /// `answered / total`; a form with nothing left to answer is complete.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.answered as f64 / self.total as f64
        }
    }

    pub fn percent(&self) -> u8 {
        (self.ratio() * 100.0).round() as u8
    }
}

/// Hidden fields drop out of both numerator and denominator.
pub fn compute(schema: &Schema, answers: &Answers, effects: &EffectSet) -> Progress {
    let mut progress = Progress {
        answered: 0,
        total: 0,
    };
    for field in schema
        .fields()
        .filter(|f| f.is_answerable() && !effects.is_hidden(&f.id))
    {
        progress.total += 1;
        if answers.get(&field.id).is_some_and(|v: &AnswerValue| !v.is_blank()) {
            progress.answered += 1;
        }
    }
    progress
}
