use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::answer::Answers;

/// The immutable record of one completed fill-out session.
///
/// Built once at the terminal state of a flow; no setters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Submission {
    schema_id: String,
    schema_version: u32,
    answers: Answers,
    computed_results: BTreeMap<String, f64>,
    fired_alerts: Vec<String>,
    submitted_at: jiff::Timestamp,
}

impl Submission {
    pub fn new(
        schema_id: impl Into<String>,
        schema_version: u32,
        answers: Answers,
        computed_results: BTreeMap<String, f64>,
        fired_alerts: Vec<String>,
        submitted_at: jiff::Timestamp,
    ) -> Self {
        Self {
            schema_id: schema_id.into(),
            schema_version,
            answers,
            computed_results,
            fired_alerts,
            submitted_at,
        }
    }

    pub fn schema_id(&self) -> &str {
        &self.schema_id
    }

    pub fn schema_version(&self) -> u32 {
        self.schema_version
    }

    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    pub fn computed_results(&self) -> &BTreeMap<String, f64> {
        &self.computed_results
    }

    pub fn fired_alerts(&self) -> &[String] {
        &self.fired_alerts
    }

    pub fn submitted_at(&self) -> jiff::Timestamp {
        self.submitted_at
    }
}
