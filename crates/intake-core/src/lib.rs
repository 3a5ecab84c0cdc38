//! intake-core
//!
//! Pure form-schema types, answer values, shared condition operators,
//! schema integrity checks, engine configuration and storage key layout.
//! No storage or runtime dependency; this is the shared vocabulary of the
//! intake engine.

pub mod config;
pub mod error;
pub mod integrity;
pub mod models;
pub mod operator;
pub mod s3_keys;
