//! JPEG normalization for stored post images

use bytes::Bytes;
use image::{DynamicImage, ImageFormat as Codec};
use std::io::Cursor;
use thiserror::Error;

use crate::models::ImageFormat;

#[derive(Error, Debug)]
pub enum TranscodeError {
    #[error("failed to decode {format:?} image: {source}")]
    Decode {
        format: ImageFormat,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to encode JPEG: {0}")]
    Encode(#[source] image::ImageError),
}

/// Return the image as JPEG bytes
///
/// JPEG input is passed through untouched. Other formats are decoded and
/// re-encoded; the alpha channel is dropped since JPEG cannot carry it.
pub fn to_jpeg(data: Bytes, format: ImageFormat) -> Result<Bytes, TranscodeError> {
    let codec = match format {
        ImageFormat::Jpeg => return Ok(data),
        ImageFormat::Png => Codec::Png,
    };

    let decoded = image::load_from_memory_with_format(&data, codec)
        .map_err(|source| TranscodeError::Decode { format, source })?;

    let rgb = DynamicImage::ImageRgb8(decoded.to_rgb8());
    let mut out = Cursor::new(Vec::new());
    rgb.write_to(&mut out, Codec::Jpeg)
        .map_err(TranscodeError::Encode)?;

    Ok(Bytes::from(out.into_inner()))
}
