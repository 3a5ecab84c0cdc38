//! intake-runtime
//!
//! Form execution: field validation, conditional-logic evaluation to a fixed
//! point, page flow with progress, and the post-submission completion
//! pipeline. Synchronous and storage-agnostic.

pub mod completion;
pub mod conditions;
pub mod flow;
pub mod progress;
pub mod render;
pub mod validation;

pub use conditions::{evaluate, CycleDetected, EffectSet};
pub use flow::{FlowController, FlowError, FlowState};
pub use render::{render, RenderView};
pub use validation::{validate, ValidationError};
