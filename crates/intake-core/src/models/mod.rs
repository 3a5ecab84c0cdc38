mod action;
mod answer;
mod field;
mod rule;
mod schema;
mod submission;
mod validation;

pub use action::{Aggregator, CompletionAction};
pub use answer::{AnswerValue, Answers};
pub use field::{Field, FieldOption, FieldType, LayoutWidth};
pub use rule::{Condition, ConditionalRule, Operator, RuleAction};
pub use schema::{Page, Schema, SchemaStatus};
pub use submission::Submission;
pub use validation::ValidationRule;
