use aws_sdk_s3::Client;
use uuid::Uuid;

use intake_core::models::{Schema, Submission};
use intake_core::s3_keys;

use crate::error::StorageError;
use crate::objects;
use crate::store::{schema_id_from_key, BoxFuture, FormStore};

/// Schemas and submissions as JSON objects in one S3 bucket.
pub struct S3FormStore {
    client: Client,
    bucket: String,
}

impl S3FormStore {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Resolve credentials from the default AWS chain, optionally pinning
    /// the region, and build a store for `bucket`.
    pub async fn connect(bucket: impl Into<String>, region: Option<&str>) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(aws_config::Region::new(region.to_string()));
        }
        let config = loader.load().await;
        Self::new(Client::new(&config), bucket)
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

impl FormStore for S3FormStore {
    fn load_schema<'a>(&'a self, schema_id: &'a str) -> BoxFuture<'a, Result<Schema, StorageError>> {
        Box::pin(async move {
            let key = s3_keys::schema(schema_id);
            objects::get_json(&self.client, &self.bucket, &key).await
        })
    }

    fn save_schema<'a>(&'a self, schema: &'a Schema) -> BoxFuture<'a, Result<String, StorageError>> {
        Box::pin(async move {
            let key = s3_keys::schema(&schema.id);
            objects::put_json(&self.client, &self.bucket, &key, schema).await?;
            tracing::info!(bucket = %self.bucket, key = %key, version = schema.version, "schema saved");
            Ok(schema.id.clone())
        })
    }

    fn record_submission<'a>(
        &'a self,
        submission: &'a Submission,
    ) -> BoxFuture<'a, Result<String, StorageError>> {
        Box::pin(async move {
            let id = Uuid::new_v4();
            let key = s3_keys::submission(submission.schema_id(), id);
            objects::put_json(&self.client, &self.bucket, &key, submission).await?;
            tracing::info!(bucket = %self.bucket, key = %key, "submission recorded");
            Ok(id.to_string())
        })
    }

    fn list_schemas(&self) -> BoxFuture<'_, Result<Vec<String>, StorageError>> {
        Box::pin(async move {
            let keys = objects::list_keys(&self.client, &self.bucket, s3_keys::SCHEMAS_PREFIX).await?;
            let mut ids: Vec<String> = keys
                .iter()
                .filter_map(|k| schema_id_from_key(k))
                .map(str::to_string)
                .collect();
            ids.sort();
            Ok(ids)
        })
    }
}
