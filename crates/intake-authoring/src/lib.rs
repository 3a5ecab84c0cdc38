//! intake-authoring
//!
//! The form builder's state: a schema under edit, its undo/redo history,
//! the current selection and whether it has unsaved changes. Edits are
//! pure reducers over an immutable snapshot; the store only decides which
//! snapshot is live.

pub mod edit;
pub mod error;
pub mod history;
pub mod store;

pub use edit::{apply_edit, EditOutcome, FieldPatch, MetadataPatch, SchemaEdit};
pub use error::{AuthoringError, DanglingReferenceWarning, EditError, Reference, ReferenceChange};
pub use history::History;
pub use store::AuthoringStore;
