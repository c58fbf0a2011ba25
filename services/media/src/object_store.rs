use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Object store failures
#[derive(Error, Debug)]
pub enum ObjectStoreError {
    #[error("upload of {key} failed: {message}")]
    Upload { key: String, message: String },

    #[error("delete of {key} failed: {message}")]
    Delete { key: String, message: String },
}

/// Blob storage addressed by key
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `body` under `key`, returning the object's location
    async fn upload(
        &self,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<String, ObjectStoreError>;

    /// Remove the object stored under `key`
    async fn delete(&self, key: &str) -> Result<(), ObjectStoreError>;
}
