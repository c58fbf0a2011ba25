use bytes::Bytes;
use uuid::Uuid;

/// Maximum number of images attached to a single post
pub const MAX_IMAGES_PER_POST: usize = 5;

/// Accepted source formats for post images
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    /// Content types accepted on upload
    pub const SUPPORTED_CONTENT_TYPES: [&'static str; 2] = ["image/jpeg", "image/png"];

    /// Map a declared content type onto a supported format
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        match content_type {
            "image/jpeg" => Some(ImageFormat::Jpeg),
            "image/png" => Some(ImageFormat::Png),
            _ => None,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
        }
    }
}

/// One validated attachment awaiting upload
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub format: ImageFormat,
    pub data: Bytes,
}

/// Object key for the image at `index` of `post_id`
///
/// Always `.jpg`: stored objects are JPEG regardless of the source format.
pub fn image_key(post_id: Uuid, index: usize) -> String {
    format!("{}_{}.jpg", post_id, index)
}
