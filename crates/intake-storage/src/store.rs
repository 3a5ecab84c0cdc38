use std::future::Future;
use std::pin::Pin;

use intake_core::models::{Schema, Submission};
use intake_core::s3_keys;

use crate::error::StorageError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Where schemas and submissions live.
///
/// Implementations are shared across sessions, so they take `&self` and
/// handle their own synchronization.
pub trait FormStore: Send + Sync {
    fn load_schema<'a>(&'a self, schema_id: &'a str) -> BoxFuture<'a, Result<Schema, StorageError>>;

    /// Write `schema` under its own id, replacing any previous copy.
    /// Returns the id.
    fn save_schema<'a>(&'a self, schema: &'a Schema) -> BoxFuture<'a, Result<String, StorageError>>;

    /// Store a completed submission under a fresh id and return that id.
    fn record_submission<'a>(
        &'a self,
        submission: &'a Submission,
    ) -> BoxFuture<'a, Result<String, StorageError>>;

    /// Ids of every stored schema, sorted.
    fn list_schemas(&self) -> BoxFuture<'_, Result<Vec<String>, StorageError>>;
}

/// Schema id from a key under [`s3_keys::SCHEMAS_PREFIX`].
pub(crate) fn schema_id_from_key(key: &str) -> Option<&str> {
    key.strip_prefix(s3_keys::SCHEMAS_PREFIX)?.strip_suffix(".json")
}
