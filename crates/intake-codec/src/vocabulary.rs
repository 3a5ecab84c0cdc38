//! Names used by the exchange format.
//!
//! The external field vocabulary is coarser than [`FieldType`]. Internal
//! types without their own external name travel as the nearest external
//! type plus a `variant` hint.

use intake_core::models::FieldType;

pub const EXTERNAL_TYPES: [&str; 11] = [
    "text_input",
    "textarea",
    "select",
    "radio",
    "checkbox",
    "email",
    "tel",
    "date",
    "number",
    "file_upload",
    "warning",
];

pub const ACTION_TYPES: [&str; 5] = [
    "show_field",
    "hide_field",
    "require_field",
    "disable_field",
    "show_message",
];

/// `(type, variant)` for an internal field type.
pub fn external_type(field_type: FieldType) -> (&'static str, Option<&'static str>) {
    match field_type {
        FieldType::ShortText => ("text_input", None),
        FieldType::LongText => ("textarea", None),
        FieldType::Select => ("select", None),
        FieldType::Multiselect => ("select", Some("multiselect")),
        FieldType::SingleChoice => ("radio", None),
        FieldType::MultiChoice => ("checkbox", None),
        FieldType::Email => ("email", None),
        FieldType::Phone => ("tel", None),
        FieldType::Number => ("number", None),
        FieldType::Date => ("date", None),
        FieldType::File => ("file_upload", None),
        FieldType::StaticMessage => ("warning", None),
        FieldType::Signature => ("file_upload", Some("signature")),
        FieldType::Rating => ("number", Some("rating")),
    }
}

/// Resolve an external `type` (with optional `variant`) or an internal type
/// name. The error is the message for the offending key.
pub fn internal_type(name: &str, variant: Option<&str>) -> Result<FieldType, String> {
    let base = match name {
        "text_input" => FieldType::ShortText,
        "textarea" => FieldType::LongText,
        "radio" => FieldType::SingleChoice,
        "checkbox" => FieldType::MultiChoice,
        "tel" => FieldType::Phone,
        "file_upload" => FieldType::File,
        "warning" => FieldType::StaticMessage,
        other => FieldType::parse(other).ok_or_else(|| format!("unknown field type {other:?}"))?,
    };
    let Some(variant) = variant else {
        return Ok(base);
    };
    match (base, variant) {
        (FieldType::Select, "multiselect") => Ok(FieldType::Multiselect),
        (FieldType::File, "signature") => Ok(FieldType::Signature),
        (FieldType::Number, "rating") => Ok(FieldType::Rating),
        _ => Err(format!("unknown variant {variant:?} for field type {name:?}")),
    }
}
