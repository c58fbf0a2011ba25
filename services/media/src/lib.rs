//! Post image storage
//!
//! Object-store access (S3 or any S3-compatible bucket), JPEG transcoding and
//! the per-post fan-out of image uploads and deletes.

pub mod models;
pub mod object_store;
pub mod s3;
pub mod transcode;
pub mod uploader;

pub use models::{ImageFormat, ImageUpload, MAX_IMAGES_PER_POST, image_key};
pub use object_store::{ObjectStore, ObjectStoreError};
pub use s3::{S3Config, S3ObjectStore};
pub use uploader::{ImageUploader, UploadReport};
