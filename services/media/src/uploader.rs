//! Per-post fan-out of image uploads and deletes
//!
//! Uploads are spawned one task per image and joined with a tally: a failed
//! image is logged and counted, never propagated, and never stops the other
//! uploads. Spawned tasks are not tied to the caller, so a dropped request
//! does not abort them.
//!
//! Deletes run detached. There is no retry or dead-letter path for a failed
//! delete; the object is left behind and the failure is logged.

use futures::future::join_all;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
    models::{ImageUpload, image_key},
    object_store::{ObjectStore, ObjectStoreError},
    transcode::{self, TranscodeError},
};

/// Outcome of one post's upload batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UploadReport {
    /// Number of images dispatched
    pub attempted: usize,
    /// Number of images that did not reach the store
    pub failed: usize,
}

impl UploadReport {
    pub fn succeeded(&self) -> usize {
        self.attempted - self.failed
    }
}

#[derive(Error, Debug)]
enum ImageError {
    #[error(transparent)]
    Transcode(#[from] TranscodeError),

    #[error(transparent)]
    Store(#[from] ObjectStoreError),

    #[error("transcode task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Dispatches image uploads and deletes for posts
#[derive(Clone)]
pub struct ImageUploader {
    store: Arc<dyn ObjectStore>,
}

impl ImageUploader {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Upload every image of `post_id` concurrently and wait for all of them
    ///
    /// Image `i` is stored under `<post_id>_<i>.jpg`.
    pub async fn upload_all(&self, post_id: Uuid, images: Vec<ImageUpload>) -> UploadReport {
        let attempted = images.len();

        let handles: Vec<JoinHandle<Result<String, ImageError>>> = images
            .into_iter()
            .enumerate()
            .map(|(index, image)| {
                let store = Arc::clone(&self.store);
                let key = image_key(post_id, index);
                tokio::spawn(async move { upload_one(store.as_ref(), &key, image).await })
            })
            .collect();

        let mut failed = 0;
        for (index, outcome) in join_all(handles).await.into_iter().enumerate() {
            match outcome {
                Ok(Ok(location)) => debug!(%post_id, index, %location, "Image uploaded"),
                Ok(Err(e)) => {
                    warn!(%post_id, index, "Image upload failed: {}", e);
                    failed += 1;
                }
                Err(e) => {
                    error!(%post_id, index, "Image upload task aborted: {}", e);
                    failed += 1;
                }
            }
        }

        info!(
            %post_id,
            attempted,
            failed,
            "Finished uploading post images"
        );

        UploadReport { attempted, failed }
    }

    /// Delete the images of `post_id` in the background
    ///
    /// Issues one delete per index in `0..image_count`. The returned handle
    /// resolves to the number of failed deletes; callers are free to drop it.
    pub fn spawn_delete_all(&self, post_id: Uuid, image_count: usize) -> JoinHandle<usize> {
        let store = Arc::clone(&self.store);

        tokio::spawn(async move {
            let deletes = (0..image_count).map(|index| {
                let store = &store;
                async move {
                    let key = image_key(post_id, index);
                    let result = store.delete(&key).await;
                    (key, result)
                }
            });

            let mut failed = 0;
            for (key, result) in join_all(deletes).await {
                if let Err(e) = result {
                    warn!(%post_id, %key, "Image delete failed: {}", e);
                    failed += 1;
                }
            }

            if failed == 0 {
                debug!(%post_id, image_count, "Post images deleted");
            }
            failed
        })
    }
}

async fn upload_one(
    store: &dyn ObjectStore,
    key: &str,
    image: ImageUpload,
) -> Result<String, ImageError> {
    let content_type = image.format;
    let jpeg =
        tokio::task::spawn_blocking(move || transcode::to_jpeg(image.data, content_type)).await??;

    Ok(store.upload(key, jpeg, "image/jpeg").await?)
}
