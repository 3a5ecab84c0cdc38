use serde_json::{Map, Value};

use intake_core::models::{
    Aggregator, AnswerValue, CompletionAction, Condition, ConditionalRule, Field, FieldOption,
    LayoutWidth, Operator, Page, RuleAction, Schema, SchemaStatus, ValidationRule,
};

use crate::error::{ImportError, ImportIssue};
use crate::vocabulary;

type Object = Map<String, Value>;

/// Parse exchange-format JSON text into a [`Schema`].
pub fn import_str(text: &str) -> Result<Schema, ImportError> {
    let value: Value = serde_json::from_str(text)?;
    import(&value)
}

/// Build a [`Schema`] from either exchange shape.
///
/// Rules declared on an element (`conditionals: [{field, operator,
/// value}]`) become `show_field` rules targeting that element, ordered
/// before the top-level rules so that a top-level rule wins any conflict.
pub fn import(value: &Value) -> Result<Schema, ImportError> {
    let mut reader = Reader::default();
    let schema = reader.schema(value);
    match schema {
        Some(schema) if reader.issues.is_empty() => {
            tracing::debug!(
                schema_id = %schema.id,
                pages = schema.pages.len(),
                rules = schema.conditional_rules.len(),
                "form definition imported"
            );
            Ok(schema)
        }
        _ => Err(ImportError::Invalid(reader.issues)),
    }
}

/// Walks the JSON tree, collecting every problem rather than stopping at
/// the first.
#[derive(Default)]
struct Reader {
    issues: Vec<ImportIssue>,
}

impl Reader {
    fn issue(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.issues.push(ImportIssue {
            path: path.into(),
            message: message.into(),
        });
    }

    fn schema(&mut self, root: &Value) -> Option<Schema> {
        let root = self.object(root, "$")?;

        let (meta_obj, meta_path, body, body_path) = if let Some(flow) = root.get("flowConfig") {
            (self.object(flow, "flowConfig")?, "flowConfig", root, "")
        } else if let Some(structure) = root.get("structure") {
            (root, "", self.object(structure, "structure")?, "structure")
        } else {
            self.issue("$", "expected `flowConfig` (advanced shape) or `structure` (simple shape)");
            return None;
        };

        let mut schema = self.metadata(meta_obj, meta_path);

        let mut element_rules = Vec::new();
        let pages_path = join(body_path, "pages");
        match body.get("pages") {
            None => self.issue(&pages_path, "missing"),
            Some(pages) => {
                for (i, page) in self.array(pages, &pages_path).iter().enumerate() {
                    let path = format!("{pages_path}[{i}]");
                    if let Some(page) = self.page(page, &path, i, &mut element_rules) {
                        schema.pages.push(page);
                    }
                }
            }
        }

        schema.conditional_rules = element_rules;
        let rules_path = join(body_path, "conditionals");
        if let Some(rules) = body.get("conditionals") {
            for (i, rule) in self.array(rules, &rules_path).iter().enumerate() {
                let path = format!("{rules_path}[{i}]");
                if let Some(rule) = self.conditional(rule, &path, i) {
                    schema.conditional_rules.push(rule);
                }
            }
        }

        if let Some(validation) = root.get("validation") {
            self.validation_map(validation, &mut schema);
        }

        if let Some(actions) = root.get("completionActions") {
            for (i, action) in self.array(actions, "completionActions").iter().enumerate() {
                let path = format!("completionActions[{i}]");
                if let Some(action) = self.completion_action(action, &path) {
                    schema.completion_actions.push(action);
                }
            }
        }

        Some(schema)
    }

    fn metadata(&mut self, obj: &Object, path: &str) -> Schema {
        // A definition without an id keeps the fresh one from `Schema::new`.
        let mut schema = Schema::new(String::new());
        if let Some(id) = self.optional_str(obj, "id", path) {
            schema.id = id;
        }
        schema.title = self.required_str(obj, "title", path).unwrap_or_default();
        schema.description = self.optional_str(obj, "description", path).unwrap_or_default();
        schema.form_type = self.optional_str(obj, "form_type", path);
        if let Some(status) = self.optional_str(obj, "status", path) {
            match SchemaStatus::parse(&status) {
                Some(status) => schema.status = status,
                None => self.issue(join(path, "status"), format!("unknown status {status:?}")),
            }
        }
        if let Some(version) = obj.get("version").filter(|v| !v.is_null()) {
            match version.as_u64().and_then(|v| u32::try_from(v).ok()).filter(|v| *v > 0) {
                Some(version) => schema.version = version,
                None => self.issue(join(path, "version"), "expected a positive integer"),
            }
        }
        schema.completion_message = self.optional_str(obj, "completionMessage", path);
        schema.estimated_time = self.optional_str(obj, "estimatedTime", path);
        schema
    }

    fn page(
        &mut self,
        value: &Value,
        path: &str,
        index: usize,
        element_rules: &mut Vec<ConditionalRule>,
    ) -> Option<Page> {
        let obj = self.object(value, path)?;
        let id = self.required_str(obj, "id", path);
        let title = self.required_str(obj, "title", path);
        let order = match obj.get("order").filter(|v| !v.is_null()) {
            None => index as u32,
            Some(order) => match order.as_u64().and_then(|o| u32::try_from(o).ok()) {
                Some(order) => order,
                None => {
                    self.issue(join(path, "order"), "expected a non-negative integer");
                    index as u32
                }
            },
        };

        let elements_path = join(path, "elements");
        let mut fields = Vec::new();
        match obj.get("elements") {
            None => self.issue(&elements_path, "missing"),
            Some(elements) => {
                for (i, element) in self.array(elements, &elements_path).iter().enumerate() {
                    let path = format!("{elements_path}[{i}]");
                    if let Some(field) = self.field(element, &path, element_rules) {
                        fields.push(field);
                    }
                }
            }
        }

        Some(Page {
            id: id?,
            title: title?,
            fields,
            order,
        })
    }

    fn field(
        &mut self,
        value: &Value,
        path: &str,
        element_rules: &mut Vec<ConditionalRule>,
    ) -> Option<Field> {
        let obj = self.object(value, path)?;
        let id = self.required_str(obj, "id", path);
        let variant = self.optional_str(obj, "variant", path);
        let field_type = self
            .required_str(obj, "type", path)
            .and_then(|name| match vocabulary::internal_type(&name, variant.as_deref()) {
                Ok(field_type) => Some(field_type),
                Err(message) => {
                    self.issue(join(path, "type"), message);
                    None
                }
            });

        let label = self.optional_str(obj, "label", path);
        let required = match obj.get("required").filter(|v| !v.is_null()) {
            None => false,
            Some(Value::Bool(b)) => *b,
            Some(_) => {
                self.issue(join(path, "required"), "expected a boolean");
                false
            }
        };
        let placeholder = self.optional_str(obj, "placeholder", path);

        let mut options = Vec::new();
        if let Some(list) = obj.get("options").filter(|v| !v.is_null()) {
            let options_path = join(path, "options");
            for (i, option) in self.array(list, &options_path).iter().enumerate() {
                if let Some(option) = self.option(option, &format!("{options_path}[{i}]"), i) {
                    options.push(option);
                }
            }
        }

        let default_value = obj
            .get("defaultValue")
            .and_then(|v| self.answer(v, &join(path, "defaultValue")));

        let layout_width = match self.optional_str(obj, "width", path) {
            None => LayoutWidth::Full,
            Some(width) => LayoutWidth::parse(&width).unwrap_or_else(|| {
                self.issue(join(path, "width"), format!("unknown width {width:?}"));
                LayoutWidth::Full
            }),
        };

        let mut validation_rules = Vec::new();
        if let Some(rules) = obj.get("validation") {
            let rules_path = join(path, "validation");
            for (i, rule) in self.array(rules, &rules_path).iter().enumerate() {
                if let Some(rule) = self.validation_rule(rule, &format!("{rules_path}[{i}]")) {
                    validation_rules.push(rule);
                }
            }
        }

        let id = id?;
        if let Some(conditions) = obj.get("conditionals") {
            let conditions_path = join(path, "conditionals");
            for (i, condition) in self.array(conditions, &conditions_path).iter().enumerate() {
                let condition_path = format!("{conditions_path}[{i}]");
                let Some(trigger) = self
                    .object(condition, &condition_path)
                    .and_then(|c| self.condition(c, &condition_path))
                else {
                    continue;
                };
                element_rules.push(ConditionalRule {
                    id: format!("{id}_cond_{}", i + 1),
                    trigger,
                    action: RuleAction::ShowField {
                        target_id: id.clone(),
                    },
                });
            }
        }

        let field_type = field_type?;
        Some(Field {
            id,
            field_type,
            label: label.unwrap_or_else(|| field_type.default_label().to_string()),
            required,
            placeholder,
            options,
            validation_rules,
            default_value,
            layout_width,
        })
    }

    /// Options are `{id?, value, label?}` objects or bare strings.
    fn option(&mut self, value: &Value, path: &str, index: usize) -> Option<FieldOption> {
        let positional = format!("opt_{}", index + 1);
        if let Value::String(s) = value {
            return Some(FieldOption {
                id: positional,
                value: s.clone(),
                label: s.clone(),
            });
        }
        let obj = self.object(value, path)?;
        let option_value = match obj.get("value") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(_) => {
                self.issue(join(path, "value"), "expected a string or number");
                return None;
            }
            None => {
                self.issue(join(path, "value"), "missing");
                return None;
            }
        };
        let label = self
            .optional_str(obj, "label", path)
            .unwrap_or_else(|| option_value.clone());
        let id = self.optional_str(obj, "id", path).unwrap_or(positional);
        Some(FieldOption {
            id,
            value: option_value,
            label,
        })
    }

    fn conditional(&mut self, value: &Value, path: &str, index: usize) -> Option<ConditionalRule> {
        let obj = self.object(value, path)?;
        let id = self
            .optional_str(obj, "id", path)
            .unwrap_or_else(|| format!("rule_{}", index + 1));

        let condition_path = join(path, "condition");
        let trigger = match obj.get("condition") {
            None => {
                self.issue(&condition_path, "missing");
                None
            }
            Some(c) => self
                .object(c, &condition_path)
                .and_then(|c| self.condition(c, &condition_path)),
        };

        let action_path = join(path, "action");
        let action = match obj.get("action") {
            None => {
                self.issue(&action_path, "missing");
                None
            }
            Some(a) => self.object(a, &action_path).and_then(|a| self.action(a, &action_path)),
        };

        Some(ConditionalRule {
            id,
            trigger: trigger?,
            action: action?,
        })
    }

    fn condition(&mut self, obj: &Object, path: &str) -> Option<Condition> {
        let field = self.required_str(obj, "field", path);
        let operator = self.required_str(obj, "operator", path).and_then(|name| {
            Operator::parse(&name).or_else(|| {
                self.issue(join(path, "operator"), format!("unknown operator {name:?}"));
                None
            })
        });
        let value = obj.get("value").and_then(|v| self.answer(v, &join(path, "value")));
        Some(Condition::new(field?, operator?, value))
    }

    fn action(&mut self, obj: &Object, path: &str) -> Option<RuleAction> {
        let kind = self.required_str(obj, "type", path);
        let target_id = self.required_str(obj, "target", path);
        let kind = kind?;
        let action = match kind.as_str() {
            "show_field" => RuleAction::ShowField { target_id: target_id? },
            "hide_field" => RuleAction::HideField { target_id: target_id? },
            "require_field" => RuleAction::RequireField { target_id: target_id? },
            "disable_field" => RuleAction::DisableField { target_id: target_id? },
            "show_message" => {
                let message = self.required_str(obj, "message", path);
                RuleAction::ShowMessage {
                    target_id: target_id?,
                    message: message?,
                }
            }
            other => {
                self.issue(
                    join(path, "type"),
                    format!(
                        "unknown action {other:?} (expected one of {})",
                        vocabulary::ACTION_TYPES.join(", ")
                    ),
                );
                return None;
            }
        };
        Some(action)
    }

    /// The advanced shape's `validation` object: field id to rule list.
    fn validation_map(&mut self, value: &Value, schema: &mut Schema) {
        let Some(map) = self.object(value, "validation") else {
            return;
        };
        for (field_id, rules) in map {
            let path = format!("validation.{field_id}");
            let Some((pi, fi)) = schema.locate_field(field_id) else {
                self.issue(&path, "unknown field");
                continue;
            };
            for (i, rule) in self.array(rules, &path).iter().enumerate() {
                if let Some(rule) = self.validation_rule(rule, &format!("{path}[{i}]")) {
                    schema.pages[pi].fields[fi].validation_rules.push(rule);
                }
            }
        }
    }

    fn validation_rule(&mut self, value: &Value, path: &str) -> Option<ValidationRule> {
        let obj = self.object(value, path)?;
        let kind = self.required_str(obj, "type", path)?;
        let value_path = join(path, "value");
        let raw = obj.get("value");

        let rule = match kind.as_str() {
            "required" => ValidationRule::Required,
            "email_format" => ValidationRule::EmailFormat,
            "phone_format" => ValidationRule::PhoneFormat,
            "min_length" | "max_length" => {
                let Some(n) = raw.and_then(Value::as_u64).and_then(|n| usize::try_from(n).ok()) else {
                    self.issue(value_path, "expected a non-negative integer");
                    return None;
                };
                if kind == "min_length" {
                    ValidationRule::MinLength(n)
                } else {
                    ValidationRule::MaxLength(n)
                }
            }
            "min" | "max" => {
                let Some(n) = raw.and_then(Value::as_f64) else {
                    self.issue(value_path, "expected a number");
                    return None;
                };
                if kind == "min" {
                    ValidationRule::Min(n)
                } else {
                    ValidationRule::Max(n)
                }
            }
            "pattern" | "max_date" => {
                let Some(s) = raw.and_then(Value::as_str) else {
                    self.issue(value_path, "expected a string");
                    return None;
                };
                if kind == "pattern" {
                    ValidationRule::Pattern(s.to_string())
                } else {
                    ValidationRule::MaxDate(s.to_string())
                }
            }
            other => {
                self.issue(join(path, "type"), format!("unknown validation rule {other:?}"));
                return None;
            }
        };
        Some(rule)
    }

    fn completion_action(&mut self, value: &Value, path: &str) -> Option<CompletionAction> {
        let obj = self.object(value, path)?;
        let kind = self.required_str(obj, "type", path)?;
        match kind.as_str() {
            "calculate_score" => {
                let fields_path = join(path, "fields");
                let sources = match obj.get("fields") {
                    None => {
                        self.issue(&fields_path, "missing");
                        None
                    }
                    Some(list) => self.string_list(list, &fields_path),
                };
                let aggregator = self.required_str(obj, "action", path).and_then(|name| {
                    Aggregator::parse(&name).or_else(|| {
                        self.issue(join(path, "action"), format!("unknown aggregator {name:?}"));
                        None
                    })
                });
                let result_field_id = self.required_str(obj, "result_field", path);
                Some(CompletionAction::CalculateScore {
                    source_field_ids: sources?,
                    aggregator: aggregator?,
                    result_field_id: result_field_id?,
                })
            }
            "conditional_alert" => {
                let condition_path = join(path, "condition");
                let condition = match obj.get("condition") {
                    None => {
                        self.issue(&condition_path, "missing");
                        None
                    }
                    Some(c) => self
                        .object(c, &condition_path)
                        .and_then(|c| self.condition(c, &condition_path)),
                };
                let message = self.required_str(obj, "alert_message", path);
                Some(CompletionAction::ConditionalAlert {
                    condition: condition?,
                    message: message?,
                })
            }
            other => {
                self.issue(join(path, "type"), format!("unknown completion action {other:?}"));
                None
            }
        }
    }

    fn answer(&mut self, value: &Value, path: &str) -> Option<AnswerValue> {
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(AnswerValue::Bool(*b)),
            Value::Number(n) => n.as_f64().map(AnswerValue::Number),
            Value::String(s) => Some(AnswerValue::Text(s.clone())),
            Value::Array(_) => self.string_list(value, path).map(AnswerValue::List),
            Value::Object(_) => {
                self.issue(path, "expected a string, number, boolean or list of strings");
                None
            }
        }
    }

    fn string_list(&mut self, value: &Value, path: &str) -> Option<Vec<String>> {
        let mut out = Vec::new();
        let mut ok = true;
        for (i, item) in self.array(value, path).iter().enumerate() {
            match item {
                Value::String(s) => out.push(s.clone()),
                _ => {
                    self.issue(format!("{path}[{i}]"), "expected a string");
                    ok = false;
                }
            }
        }
        ok.then_some(out)
    }

    fn object<'v>(&mut self, value: &'v Value, path: &str) -> Option<&'v Object> {
        let obj = value.as_object();
        if obj.is_none() {
            self.issue(path, "expected an object");
        }
        obj
    }

    /// The elements of `value`, or nothing (with an issue) if it is not an
    /// array.
    fn array<'v>(&mut self, value: &'v Value, path: &str) -> &'v [Value] {
        match value.as_array() {
            Some(items) => items,
            None => {
                self.issue(path, "expected an array");
                &[]
            }
        }
    }

    fn required_str(&mut self, obj: &Object, key: &str, path: &str) -> Option<String> {
        match obj.get(key) {
            None | Some(Value::Null) => {
                self.issue(join(path, key), "missing");
                None
            }
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                self.issue(join(path, key), "expected a string");
                None
            }
        }
    }

    fn optional_str(&mut self, obj: &Object, key: &str, path: &str) -> Option<String> {
        match obj.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                self.issue(join(path, key), "expected a string");
                None
            }
        }
    }
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}
