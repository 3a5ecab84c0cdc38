use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::answer::AnswerValue;
use super::validation::ValidationRule;

/// Internal field vocabulary. The exchange format uses a coarser set; see
/// the codec for the mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum FieldType {
    ShortText,
    LongText,
    Select,
    Multiselect,
    SingleChoice,
    MultiChoice,
    Email,
    Phone,
    Number,
    Date,
    /// Presence only; the upload itself lives outside the engine.
    File,
    /// Read-only text shown to the respondent. Never answered.
    StaticMessage,
    /// Presence only, like `File`.
    Signature,
    Rating,
}

impl FieldType {
    pub const ALL: [FieldType; 14] = [
        FieldType::ShortText,
        FieldType::LongText,
        FieldType::Select,
        FieldType::Multiselect,
        FieldType::SingleChoice,
        FieldType::MultiChoice,
        FieldType::Email,
        FieldType::Phone,
        FieldType::Number,
        FieldType::Date,
        FieldType::File,
        FieldType::StaticMessage,
        FieldType::Signature,
        FieldType::Rating,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::ShortText => "short_text",
            FieldType::LongText => "long_text",
            FieldType::Select => "select",
            FieldType::Multiselect => "multiselect",
            FieldType::SingleChoice => "single_choice",
            FieldType::MultiChoice => "multi_choice",
            FieldType::Email => "email",
            FieldType::Phone => "phone",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::File => "file",
            FieldType::StaticMessage => "static_message",
            FieldType::Signature => "signature",
            FieldType::Rating => "rating",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    /// Choice-typed fields must carry a non-empty option list.
    pub fn is_choice(self) -> bool {
        matches!(
            self,
            FieldType::Select
                | FieldType::Multiselect
                | FieldType::SingleChoice
                | FieldType::MultiChoice
        )
    }

    pub fn is_list_valued(self) -> bool {
        matches!(self, FieldType::Multiselect | FieldType::MultiChoice)
    }

    pub fn is_answerable(self) -> bool {
        self != FieldType::StaticMessage
    }

    /// Label given to fields freshly dropped onto a page by the builder.
    pub fn default_label(self) -> &'static str {
        match self {
            FieldType::ShortText => "Short answer",
            FieldType::LongText => "Long answer",
            FieldType::Select => "Dropdown",
            FieldType::Multiselect => "Multi-select dropdown",
            FieldType::SingleChoice => "Single choice",
            FieldType::MultiChoice => "Checkboxes",
            FieldType::Email => "Email address",
            FieldType::Phone => "Phone number",
            FieldType::Number => "Number",
            FieldType::Date => "Date",
            FieldType::File => "File upload",
            FieldType::StaticMessage => "Message",
            FieldType::Signature => "Signature",
            FieldType::Rating => "Rating",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FieldOption {
    pub id: String,
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum LayoutWidth {
    #[default]
    Full,
    Half,
    Third,
}

impl LayoutWidth {
    pub fn as_str(self) -> &'static str {
        match self {
            LayoutWidth::Full => "full",
            LayoutWidth::Half => "half",
            LayoutWidth::Third => "third",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        [LayoutWidth::Full, LayoutWidth::Half, LayoutWidth::Third]
            .into_iter()
            .find(|w| w.as_str() == name)
    }
}

/// One answerable (or display-only) unit on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Field {
    /// Unique across the whole schema; rules and actions reference it.
    pub id: String,
    pub field_type: FieldType,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation_rules: Vec<ValidationRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<AnswerValue>,
    #[serde(default)]
    pub layout_width: LayoutWidth,
}

impl Field {
    pub fn new(id: impl Into<String>, field_type: FieldType, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            field_type,
            label: label.into(),
            required: false,
            placeholder: None,
            options: Vec::new(),
            validation_rules: Vec::new(),
            default_value: None,
            layout_width: LayoutWidth::Full,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Attach options given as `(value, label)` pairs. Option ids are
    /// positional (`opt_1`, `opt_2`, ...).
    pub fn with_options(mut self, options: &[(&str, &str)]) -> Self {
        self.options = options
            .iter()
            .enumerate()
            .map(|(i, (value, label))| FieldOption {
                id: format!("opt_{}", i + 1),
                value: (*value).to_string(),
                label: (*label).to_string(),
            })
            .collect();
        self
    }

    pub fn with_rule(mut self, rule: ValidationRule) -> Self {
        self.validation_rules.push(rule);
        self
    }

    pub fn is_answerable(&self) -> bool {
        self.field_type.is_answerable()
    }

    pub fn option_label(&self, value: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.value == value)
            .map(|o| o.label.as_str())
    }
}
