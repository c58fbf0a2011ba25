//! Post creation and deletion with image fan-out
//!
//! Attachments are validated as a whole before anything is uploaded, so a
//! rejected request leaves no objects behind. Once validated, uploads are
//! best effort: the post is stored with the submitted image count and the
//! number of images that failed is reported back to the caller.

use async_trait::async_trait;
use bytes::Bytes;
use common::error::{StoreError, StoreResult};
use media::{ImageFormat, ImageUpload, ImageUploader, MAX_IMAGES_PER_POST};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::info;
use uuid::Uuid;

use crate::models::post::{NewPost, Post};

/// Persistence for posts
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn create_post(&self, new_post: &NewPost) -> StoreResult<Post>;

    /// Returns `StoreError::NotFound` when no post has this id
    async fn get_post_by_id(&self, id: Uuid) -> StoreResult<Post>;

    async fn delete_post(&self, id: Uuid) -> StoreResult<()>;
}

#[derive(Error, Debug)]
pub enum PostError {
    #[error("a post can carry at most {max} images, got {count}")]
    TooManyImages { count: usize, max: usize },

    #[error("unsupported image content type: {0:?}")]
    UnsupportedMediaType(String),

    #[error("post not found")]
    NotFound,

    #[error("post belongs to another user")]
    Forbidden,

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for PostError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => PostError::NotFound,
            other => PostError::Store(other),
        }
    }
}

/// An uploaded file as received from the client
#[derive(Debug, Clone)]
pub struct Attachment {
    pub content_type: String,
    pub data: Bytes,
}

/// A stored post and how many of its images failed to upload
#[derive(Debug, Clone)]
pub struct CreatedPost {
    pub post: Post,
    pub number_of_errors: usize,
}

/// Coordinates post rows with their images
#[derive(Clone)]
pub struct PostService {
    store: Arc<dyn PostStore>,
    uploader: ImageUploader,
}

impl PostService {
    pub fn new(store: Arc<dyn PostStore>, uploader: ImageUploader) -> Self {
        Self { store, uploader }
    }

    /// Create a post for `user_id` with up to five images
    pub async fn create_post(
        &self,
        user_id: Uuid,
        text_content: String,
        attachments: Vec<Attachment>,
    ) -> Result<CreatedPost, PostError> {
        let images = validate_attachments(attachments)?;
        let image_count = images.len();

        let post_id = Uuid::new_v4();
        let report = self.uploader.upload_all(post_id, images).await;

        let post = self
            .store
            .create_post(&NewPost {
                id: post_id,
                text_content,
                image_count: image_count as i32,
                user_id,
            })
            .await?;

        info!(
            %post_id,
            %user_id,
            image_count,
            failed = report.failed,
            "Post created"
        );

        Ok(CreatedPost {
            post,
            number_of_errors: report.failed,
        })
    }

    /// Delete a post owned by `user_id`
    ///
    /// The row is removed before returning; image cleanup keeps running in
    /// the background. The handle resolves to the number of failed deletes.
    pub async fn delete_post(
        &self,
        user_id: Uuid,
        post_id: Uuid,
    ) -> Result<JoinHandle<usize>, PostError> {
        let post = self.store.get_post_by_id(post_id).await?;
        if post.user_id != user_id {
            return Err(PostError::Forbidden);
        }

        self.store.delete_post(post_id).await?;
        info!(%post_id, %user_id, "Post deleted");

        let image_count = usize::try_from(post.image_count).unwrap_or(0);
        Ok(self.uploader.spawn_delete_all(post_id, image_count))
    }
}

/// Check the cap and every content type before anything is uploaded
fn validate_attachments(attachments: Vec<Attachment>) -> Result<Vec<ImageUpload>, PostError> {
    if attachments.len() > MAX_IMAGES_PER_POST {
        return Err(PostError::TooManyImages {
            count: attachments.len(),
            max: MAX_IMAGES_PER_POST,
        });
    }

    attachments
        .into_iter()
        .map(|attachment| {
            let format = ImageFormat::from_content_type(&attachment.content_type)
                .ok_or(PostError::UnsupportedMediaType(attachment.content_type))?;
            Ok(ImageUpload {
                format,
                data: attachment.data,
            })
        })
        .collect()
}
