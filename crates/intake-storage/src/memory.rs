use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;
use uuid::Uuid;

use intake_core::models::{Schema, Submission};
use intake_core::s3_keys;

use crate::error::StorageError;
use crate::store::{schema_id_from_key, BoxFuture, FormStore};

/// In-process store using the same key layout and JSON encoding as
/// [`S3FormStore`](crate::S3FormStore).
#[derive(Default)]
pub struct MemoryFormStore {
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
    fail_writes: AtomicBool,
}

impl MemoryFormStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every write fails with [`StorageError::Unavailable`] and
    /// leaves the stored objects untouched.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Stored keys, sorted.
    pub async fn keys(&self) -> Vec<String> {
        self.objects.lock().await.keys().cloned().collect()
    }

    /// Keys of the submissions recorded for `schema_id`.
    pub async fn submission_keys(&self, schema_id: &str) -> Vec<String> {
        let prefix = s3_keys::submissions_prefix(schema_id);
        self.objects
            .lock()
            .await
            .keys()
            .filter(|k| k.starts_with(&prefix))
            .cloned()
            .collect()
    }

    async fn put(&self, key: String, body: Vec<u8>) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(format!("write to {key} refused")));
        }
        self.objects.lock().await.insert(key, body);
        Ok(())
    }
}

impl FormStore for MemoryFormStore {
    fn load_schema<'a>(&'a self, schema_id: &'a str) -> BoxFuture<'a, Result<Schema, StorageError>> {
        Box::pin(async move {
            let key = s3_keys::schema(schema_id);
            let objects = self.objects.lock().await;
            let body = objects
                .get(&key)
                .ok_or_else(|| StorageError::NotFound { key: key.clone() })?;
            let schema: Schema = serde_json::from_slice(body)?;
            Ok(schema)
        })
    }

    fn save_schema<'a>(&'a self, schema: &'a Schema) -> BoxFuture<'a, Result<String, StorageError>> {
        Box::pin(async move {
            let body = serde_json::to_vec_pretty(schema)?;
            self.put(s3_keys::schema(&schema.id), body).await?;
            tracing::debug!(schema_id = %schema.id, version = schema.version, "schema saved in memory");
            Ok(schema.id.clone())
        })
    }

    fn record_submission<'a>(
        &'a self,
        submission: &'a Submission,
    ) -> BoxFuture<'a, Result<String, StorageError>> {
        Box::pin(async move {
            let id = Uuid::new_v4();
            let body = serde_json::to_vec_pretty(submission)?;
            self.put(s3_keys::submission(submission.schema_id(), id), body)
                .await?;
            Ok(id.to_string())
        })
    }

    fn list_schemas(&self) -> BoxFuture<'_, Result<Vec<String>, StorageError>> {
        Box::pin(async move {
            let objects = self.objects.lock().await;
            Ok(objects
                .keys()
                .filter_map(|k| schema_id_from_key(k))
                .map(str::to_string)
                .collect())
        })
    }
}
