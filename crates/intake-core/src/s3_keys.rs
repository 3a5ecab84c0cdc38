//! S3 key/path conventions.
//!
//! Pure string functions with no AWS SDK dependency. These define the canonical
//! layout of form objects in the practice bucket.

use uuid::Uuid;

pub const SCHEMAS_PREFIX: &str = "forms/schemas/";

pub fn schema(id: &str) -> String {
    format!("{SCHEMAS_PREFIX}{id}.json")
}

pub fn submissions_prefix(schema_id: &str) -> String {
    format!("forms/submissions/{schema_id}/")
}

pub fn submission(schema_id: &str, submission_id: Uuid) -> String {
    format!("forms/submissions/{schema_id}/{submission_id}.json")
}
