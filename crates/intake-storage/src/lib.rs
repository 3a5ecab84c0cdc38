//! intake-storage
//!
//! Persistence for form schemas and submissions. The [`FormStore`] trait is
//! the only async boundary of the engine; [`S3FormStore`] keeps JSON objects
//! in S3 and [`MemoryFormStore`] keeps the same layout in process.

pub mod error;
pub mod memory;
pub mod objects;
pub mod s3;
pub mod store;

pub use error::StorageError;
pub use memory::MemoryFormStore;
pub use s3::S3FormStore;
pub use store::{BoxFuture, FormStore};
