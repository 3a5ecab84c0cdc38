//! intake-codec
//!
//! JSON exchange format for form schemas. Two inbound shapes are accepted:
//! the "simple" shape (`structure`) written by hand-authored templates and
//! the "advanced" shape (`flowConfig`) that [`export`] always produces.
//! Import collects every problem with its JSON path instead of stopping at
//! the first one.

pub mod error;
mod export;
mod import;
pub mod vocabulary;

pub use error::{ImportError, ImportIssue};
pub use export::{export, export_string};
pub use import::{import, import_str};
