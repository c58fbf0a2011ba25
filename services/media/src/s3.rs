use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::{Client, error::DisplayErrorContext, primitives::ByteStream};
use bytes::Bytes;
use std::env;
use tracing::{debug, info};

use crate::object_store::{ObjectStore, ObjectStoreError};

/// S3 bucket configuration
#[derive(Debug, Clone)]
pub struct S3Config {
    /// Bucket holding post images
    pub bucket: String,
    /// Region override; the default AWS provider chain is used when unset
    pub region: Option<String>,
    /// Custom endpoint URL (for MinIO, LocalStack, etc.)
    pub endpoint_url: Option<String>,
    /// Force path-style access (required for MinIO)
    pub force_path_style: bool,
}

impl S3Config {
    /// Create a new S3Config from environment variables
    ///
    /// # Environment Variables
    /// - `IMAGE_BUCKET_NAME`: Bucket name (default: "post-images")
    /// - `AWS_REGION`: Region override
    /// - `S3_ENDPOINT_URL`: Custom endpoint URL
    /// - `S3_FORCE_PATH_STYLE`: "true" to force path-style addressing
    pub fn from_env() -> Self {
        let bucket = env::var("IMAGE_BUCKET_NAME").unwrap_or_else(|_| "post-images".to_string());
        let region = env::var("AWS_REGION").ok().filter(|r| !r.is_empty());
        let endpoint_url = env::var("S3_ENDPOINT_URL").ok().filter(|u| !u.is_empty());
        let force_path_style = env::var("S3_FORCE_PATH_STYLE")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        Self {
            bucket,
            region,
            endpoint_url,
            force_path_style,
        }
    }
}

/// Object store backed by an S3 bucket
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Build a client from the default AWS configuration plus overrides
    pub async fn new(config: &S3Config) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        let sdk_config = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint_url) = &config.endpoint_url {
            builder = builder.endpoint_url(endpoint_url);
        }
        if config.force_path_style {
            builder = builder.force_path_style(true);
        }

        info!(bucket = %config.bucket, "S3 object store initialized");

        Self {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket.clone(),
        }
    }

    fn location(&self, key: &str) -> String {
        format!("s3://{}/{}", self.bucket, key)
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn upload(
        &self,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<String, ObjectStoreError> {
        debug!(key, size_bytes = body.len(), "Uploading object to S3");

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| ObjectStoreError::Upload {
                key: key.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        Ok(self.location(key))
    }

    async fn delete(&self, key: &str) -> Result<(), ObjectStoreError> {
        debug!(key, "Deleting object from S3");

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| ObjectStoreError::Delete {
                key: key.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        Ok(())
    }
}
