//! Page flow for one fill-out session.
//!
//! The controller owns the (read-only) schema and the session's answers.
//! Every answer change re-evaluates the conditional rules before it is
//! committed, so visibility, requiredness and progress are always current.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use intake_core::config::EngineConfig;
use intake_core::models::{AnswerValue, Answers, Field, Schema, Submission};

use crate::completion;
use crate::conditions::{self, CycleDetected, EffectSet};
use crate::progress::{self, Progress};
use crate::render::{self, RenderView};
use crate::validation::{self, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "page", rename_all = "snake_case")]
pub enum FlowState {
    AtPage(usize),
    Submitted,
}

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("{} validation error(s) block this page", .0.len())]
    Blocked(Vec<ValidationError>),

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("field is disabled: {0}")]
    FieldDisabled(String),

    #[error("field does not take answers: {0}")]
    NotAnswerable(String),

    #[error("page {requested} has not been reached (furthest is {furthest})")]
    PageNotReached { requested: usize, furthest: usize },

    #[error("already on the last page")]
    AtLastPage,

    #[error("submit is only allowed from the last page")]
    NotOnLastPage,

    #[error("form already submitted")]
    AlreadySubmitted,

    #[error("schema has no pages")]
    EmptySchema,

    #[error(transparent)]
    Cycle(#[from] CycleDetected),
}

pub struct FlowController {
    schema: Schema,
    config: EngineConfig,
    answers: Answers,
    effects: EffectSet,
    state: FlowState,
    furthest: usize,
    submission: Option<Submission>,
}

impl FlowController {
    /// Start a session on the first page with visible content. Field
    /// defaults seed the answers.
    pub fn new(schema: Schema, config: EngineConfig) -> Result<Self, FlowError> {
        if schema.pages.is_empty() {
            return Err(FlowError::EmptySchema);
        }

        let answers: Answers = schema
            .fields()
            .filter(|f| f.is_answerable())
            .filter_map(|f| f.default_value.clone().map(|v| (f.id.clone(), v)))
            .collect();
        let effects = conditions::evaluate(&schema.conditional_rules, &answers, &config)?;

        let mut flow = Self {
            schema,
            config,
            answers,
            effects,
            state: FlowState::AtPage(0),
            furthest: 0,
            submission: None,
        };
        if !flow.page_has_content(0)
            && let Some(first) = flow.following_page(0)
        {
            flow.state = FlowState::AtPage(first);
            flow.furthest = first;
        }

        tracing::debug!(schema_id = %flow.schema.id, pages = flow.schema.pages.len(), "flow started");
        Ok(flow)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    pub fn effects(&self) -> &EffectSet {
        &self.effects
    }

    pub fn furthest_page(&self) -> usize {
        self.furthest
    }

    pub fn submission(&self) -> Option<&Submission> {
        self.submission.as_ref()
    }

    pub fn current_page_index(&self) -> Option<usize> {
        match self.state {
            FlowState::AtPage(index) => Some(index),
            FlowState::Submitted => None,
        }
    }

    pub fn current_page(&self) -> Option<&intake_core::models::Page> {
        self.current_page_index().and_then(|i| self.schema.pages.get(i))
    }

    /// Visible fields on `page_index`, in schema order.
    pub fn visible_fields(&self, page_index: usize) -> Vec<&Field> {
        self.schema
            .pages
            .get(page_index)
            .map(|p| {
                p.fields
                    .iter()
                    .filter(|f| !self.effects.is_hidden(&f.id))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn progress(&self) -> Progress {
        progress::compute(&self.schema, &self.answers, &self.effects)
    }

    /// The renderer view of the current page (the last page once submitted).
    pub fn render(&self) -> RenderView {
        let page = self
            .current_page_index()
            .unwrap_or(self.schema.pages.len() - 1);
        render::view(&self.schema, &self.answers, &self.effects, page)
    }

    pub fn set_answer(
        &mut self,
        field_id: &str,
        value: impl Into<AnswerValue>,
    ) -> Result<(), FlowError> {
        self.ensure_open()?;
        let field = self
            .schema
            .field(field_id)
            .ok_or_else(|| FlowError::UnknownField(field_id.to_string()))?;
        if !field.is_answerable() {
            return Err(FlowError::NotAnswerable(field_id.to_string()));
        }
        if self.effects.is_disabled(field_id) {
            return Err(FlowError::FieldDisabled(field_id.to_string()));
        }

        let mut candidate = self.answers.clone();
        candidate.insert(field_id.to_string(), value.into());
        self.commit(candidate)
    }

    pub fn clear_answer(&mut self, field_id: &str) -> Result<(), FlowError> {
        self.ensure_open()?;
        if !self.schema.has_field(field_id) {
            return Err(FlowError::UnknownField(field_id.to_string()));
        }
        if self.effects.is_disabled(field_id) {
            return Err(FlowError::FieldDisabled(field_id.to_string()));
        }

        let mut candidate = self.answers.clone();
        candidate.remove(field_id);
        self.commit(candidate)
    }

    /// Re-evaluate against `candidate` and only then replace the answers,
    /// so a cycle leaves the session exactly as it was.
    fn commit(&mut self, candidate: Answers) -> Result<(), FlowError> {
        let effects = conditions::evaluate(&self.schema.conditional_rules, &candidate, &self.config)?;
        self.answers = candidate;
        self.effects = effects;
        Ok(())
    }

    /// Blocking errors for `page_index`: visible, enabled fields whose value
    /// fails validation. Requiredness comes from the field or an effect.
    ///
    /// Disabled fields are read-only for the respondent, so they never block
    /// even when required.
    pub fn page_errors(&self, page_index: usize) -> Vec<ValidationError> {
        let today = jiff::Zoned::now().date();
        self.page_errors_at(page_index, today)
    }

    fn page_errors_at(&self, page_index: usize, today: jiff::civil::Date) -> Vec<ValidationError> {
        let Some(page) = self.schema.pages.get(page_index) else {
            return Vec::new();
        };
        page.fields
            .iter()
            .filter(|f| !self.effects.is_hidden(&f.id) && !self.effects.is_disabled(&f.id))
            .flat_map(|f| {
                let required = f.required || self.effects.is_required(&f.id);
                validation::validate_with_requirement(f, self.answers.get(&f.id), required, today)
            })
            .collect()
    }

    /// Advance past the current page if it validates. Pages with nothing
    /// visible are skipped.
    pub fn next(&mut self) -> Result<FlowState, FlowError> {
        let current = self.open_page()?;
        let errors = self.page_errors(current);
        if !errors.is_empty() {
            tracing::debug!(page = current, errors = errors.len(), "next blocked by validation");
            return Err(FlowError::Blocked(errors));
        }
        let target = self.following_page(current).ok_or(FlowError::AtLastPage)?;

        self.state = FlowState::AtPage(target);
        self.furthest = self.furthest.max(target);
        Ok(self.state)
    }

    /// Step back without validating. A no-op on the first visible page.
    pub fn back(&mut self) -> Result<FlowState, FlowError> {
        let current = self.open_page()?;
        if let Some(target) = (0..current).rev().find(|&i| self.page_has_content(i)) {
            self.state = FlowState::AtPage(target);
        }
        Ok(self.state)
    }

    /// Revisit any page up to the furthest one reached. Forward skipping is
    /// refused so answers are always given in dependency order.
    pub fn jump_to(&mut self, page_index: usize) -> Result<FlowState, FlowError> {
        self.open_page()?;
        if page_index > self.furthest || page_index >= self.schema.pages.len() {
            return Err(FlowError::PageNotReached {
                requested: page_index,
                furthest: self.furthest,
            });
        }
        self.state = FlowState::AtPage(page_index);
        Ok(self.state)
    }

    pub fn is_last_page(&self) -> bool {
        self.current_page_index()
            .is_some_and(|i| self.following_page(i).is_none())
    }

    /// Finish the session: validate every visible page, run the completion
    /// pipeline once and freeze the answers into a [`Submission`].
    pub fn submit(&mut self, now: jiff::Timestamp) -> Result<&Submission, FlowError> {
        self.open_page()?;
        if !self.is_last_page() {
            return Err(FlowError::NotOnLastPage);
        }

        let today = now.to_zoned(jiff::tz::TimeZone::system()).date();
        let errors: Vec<ValidationError> = (0..self.schema.pages.len())
            .flat_map(|i| self.page_errors_at(i, today))
            .collect();
        if !errors.is_empty() {
            return Err(FlowError::Blocked(errors));
        }

        let final_answers = self.effects.visible_answers(&self.answers);
        let outcome = completion::run(&self.schema.completion_actions, &final_answers, &self.config);
        tracing::info!(
            schema_id = %self.schema.id,
            version = self.schema.version,
            alerts = outcome.fired_alerts.len(),
            "form submitted"
        );

        self.state = FlowState::Submitted;
        let submission = self.submission.insert(Submission::new(
            self.schema.id.clone(),
            self.schema.version,
            final_answers,
            outcome.computed_results,
            outcome.fired_alerts,
            now,
        ));
        Ok(submission)
    }

    fn ensure_open(&self) -> Result<(), FlowError> {
        match self.state {
            FlowState::Submitted => Err(FlowError::AlreadySubmitted),
            FlowState::AtPage(_) => Ok(()),
        }
    }

    fn open_page(&self) -> Result<usize, FlowError> {
        self.current_page_index().ok_or(FlowError::AlreadySubmitted)
    }

    fn following_page(&self, index: usize) -> Option<usize> {
        (index + 1..self.schema.pages.len()).find(|&i| self.page_has_content(i))
    }

    /// A page with every field hidden is skipped by `next` and `back`.
    fn page_has_content(&self, index: usize) -> bool {
        self.schema.pages[index]
            .fields
            .iter()
            .any(|f| !self.effects.is_hidden(&f.id))
    }
}
