use serde_json::{json, Map, Value};

use intake_core::models::{
    AnswerValue, CompletionAction, Condition, ConditionalRule, Field, LayoutWidth, Page, RuleAction,
    Schema, ValidationRule,
};

use crate::vocabulary;

/// Render `schema` in the advanced exchange shape.
///
/// Every rule is written to the top-level `conditionals` list and every
/// validation rule to the top-level `validation` map, so importing the
/// result gives back an equal schema.
pub fn export(schema: &Schema) -> Value {
    let validation: Map<String, Value> = schema
        .fields()
        .filter(|f| !f.validation_rules.is_empty())
        .map(|f| {
            let rules = f.validation_rules.iter().map(validation_rule).collect();
            (f.id.clone(), Value::Array(rules))
        })
        .collect();

    json!({
        "flowConfig": {
            "id": schema.id,
            "title": schema.title,
            "description": schema.description,
            "form_type": schema.form_type,
            "status": schema.status.as_str(),
            "version": schema.version,
            "completionMessage": schema.completion_message,
            "estimatedTime": schema.estimated_time,
        },
        "pages": schema.pages.iter().map(page).collect::<Vec<_>>(),
        "conditionals": schema.conditional_rules.iter().map(conditional).collect::<Vec<_>>(),
        "validation": validation,
        "completionActions": schema.completion_actions.iter().map(completion_action).collect::<Vec<_>>(),
    })
}

/// [`export`] as pretty-printed JSON text.
pub fn export_string(schema: &Schema) -> String {
    let value = export(schema);
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
}

fn page(page: &Page) -> Value {
    json!({
        "id": page.id,
        "title": page.title,
        "order": page.order,
        "elements": page.fields.iter().map(element).collect::<Vec<_>>(),
    })
}

fn element(field: &Field) -> Value {
    let (field_type, variant) = vocabulary::external_type(field.field_type);
    let mut element = Map::new();
    element.insert("id".into(), json!(field.id));
    element.insert("type".into(), json!(field_type));
    if let Some(variant) = variant {
        element.insert("variant".into(), json!(variant));
    }
    element.insert("label".into(), json!(field.label));
    element.insert("required".into(), json!(field.required));
    if let Some(placeholder) = &field.placeholder {
        element.insert("placeholder".into(), json!(placeholder));
    }
    if !field.options.is_empty() {
        let options = field
            .options
            .iter()
            .map(|o| json!({ "id": o.id, "value": o.value, "label": o.label }))
            .collect();
        element.insert("options".into(), Value::Array(options));
    }
    if let Some(default) = &field.default_value {
        element.insert("defaultValue".into(), answer(default));
    }
    if field.layout_width != LayoutWidth::Full {
        element.insert("width".into(), json!(field.layout_width.as_str()));
    }
    Value::Object(element)
}

fn conditional(rule: &ConditionalRule) -> Value {
    let mut action = Map::new();
    action.insert("type".into(), json!(rule.action.kind()));
    action.insert("target".into(), json!(rule.action.target_id()));
    if let RuleAction::ShowMessage { message, .. } = &rule.action {
        action.insert("message".into(), json!(message));
    }
    json!({
        "id": rule.id,
        "condition": condition(&rule.trigger),
        "action": action,
    })
}

fn condition(condition: &Condition) -> Value {
    let mut out = Map::new();
    out.insert("field".into(), json!(condition.field_id));
    out.insert("operator".into(), json!(condition.operator.as_str()));
    if let Some(value) = &condition.value {
        out.insert("value".into(), answer(value));
    }
    Value::Object(out)
}

fn validation_rule(rule: &ValidationRule) -> Value {
    let value = match rule {
        ValidationRule::Required | ValidationRule::EmailFormat | ValidationRule::PhoneFormat => None,
        ValidationRule::MinLength(n) | ValidationRule::MaxLength(n) => Some(json!(n)),
        ValidationRule::Min(n) | ValidationRule::Max(n) => Some(number(*n)),
        ValidationRule::Pattern(s) | ValidationRule::MaxDate(s) => Some(json!(s)),
    };
    match value {
        Some(value) => json!({ "type": rule.kind(), "value": value }),
        None => json!({ "type": rule.kind() }),
    }
}

fn completion_action(action: &CompletionAction) -> Value {
    match action {
        CompletionAction::CalculateScore {
            source_field_ids,
            aggregator,
            result_field_id,
        } => json!({
            "type": "calculate_score",
            "fields": source_field_ids,
            "action": aggregator.as_str(),
            "result_field": result_field_id,
        }),
        CompletionAction::ConditionalAlert { condition: c, message } => json!({
            "type": "conditional_alert",
            "condition": condition(c),
            "alert_message": message,
        }),
    }
}

fn answer(value: &AnswerValue) -> Value {
    match value {
        AnswerValue::Bool(b) => Value::Bool(*b),
        AnswerValue::Number(n) => number(*n),
        AnswerValue::Text(s) => Value::String(s.clone()),
        AnswerValue::List(items) => json!(items),
    }
}

fn number(n: f64) -> Value {
    serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number)
}
