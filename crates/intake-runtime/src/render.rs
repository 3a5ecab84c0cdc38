//! Renderer contract: what the UI shell needs to draw one page.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use intake_core::config::EngineConfig;
use intake_core::models::{Answers, Schema, ValidationRule};

use crate::conditions::{self, ConditionalMessage, CycleDetected, EffectSet};
use crate::progress::{self, Progress};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RenderedField {
    pub field_id: String,
    pub required: bool,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RenderView {
    pub page_index: usize,
    /// Visible fields of the page, in schema order.
    pub fields: Vec<RenderedField>,
    /// Messages whose target is a visible field of this page.
    pub messages: Vec<ConditionalMessage>,
    pub progress: Progress,
}

/// Evaluate the rules for `answers` and describe page `page_index`.
///
/// An out-of-range page yields an empty field list with form-wide progress.
pub fn render(
    schema: &Schema,
    answers: &Answers,
    page_index: usize,
    config: &EngineConfig,
) -> Result<RenderView, CycleDetected> {
    let effects = conditions::evaluate(&schema.conditional_rules, answers, config)?;
    Ok(view(schema, answers, &effects, page_index))
}

pub(crate) fn view(
    schema: &Schema,
    answers: &Answers,
    effects: &EffectSet,
    page_index: usize,
) -> RenderView {
    let page_fields = schema
        .pages
        .get(page_index)
        .map(|p| p.fields.as_slice())
        .unwrap_or_default();

    let fields = page_fields
        .iter()
        .filter(|f| !effects.is_hidden(&f.id))
        .map(|f| RenderedField {
            field_id: f.id.clone(),
            required: f.is_answerable()
                && (f.required
                    || effects.is_required(&f.id)
                    || f.validation_rules.contains(&ValidationRule::Required)),
            disabled: effects.is_disabled(&f.id),
        })
        .collect();

    let messages = effects
        .messages
        .iter()
        .filter(|m| !effects.is_hidden(&m.target_id))
        .filter(|m| page_fields.iter().any(|f| f.id == m.target_id))
        .cloned()
        .collect();

    RenderView {
        page_index,
        fields,
        messages,
        progress: progress::compute(schema, answers, effects),
    }
}
