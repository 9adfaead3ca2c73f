//! Upload processing: every photo is shrunk to fit a bounding square and
//! re-encoded as JPEG before it is stored.

use std::io::Cursor;

use base64::{Engine, engine::general_purpose::STANDARD};
use image::{DynamicImage, GenericImageView, codecs::jpeg::JpegEncoder};

use crate::error::{AppError, AppResult};

pub const JPEG_QUALITY: u8 = 85;
pub const STORED_CONTENT_TYPE: &str = "image/jpeg";

#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub content_type: &'static str,
}

/// Accepts plain base64 or a `data:<mime>;base64,` URL.
pub fn decode_base64(input: &str) -> AppResult<Vec<u8>> {
    let payload = match input.split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => input,
    };
    STANDARD
        .decode(payload.trim())
        .map_err(|_| AppError::BadRequest("Image is not valid base64".into()))
}

pub fn process_image(raw: &[u8], max_side: u32) -> AppResult<ProcessedImage> {
    let img = image::load_from_memory(raw)
        .map_err(|e| AppError::BadRequest(format!("Unsupported image: {e}")))?;

    let (w, h) = img.dimensions();
    let img = if w.max(h) > max_side {
        img.thumbnail(max_side, max_side)
    } else {
        img
    };

    // JPEG has no alpha channel.
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let (width, height) = rgb.dimensions();

    let mut bytes = Vec::new();
    let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut bytes), JPEG_QUALITY);
    rgb.write_with_encoder(encoder)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("jpeg encode failed: {e}")))?;

    Ok(ProcessedImage {
        bytes,
        width,
        height,
        content_type: STORED_CONTENT_TYPE,
    })
}

pub fn process_upload(input: &str, max_side: u32) -> AppResult<ProcessedImage> {
    let raw = decode_base64(input)?;
    process_image(&raw, max_side)
}

/// Runs the CPU-bound decode/resize/encode off the async workers.
pub async fn process_uploads(inputs: Vec<String>, max_side: u32) -> AppResult<Vec<ProcessedImage>> {
    if inputs.is_empty() {
        return Ok(Vec::new());
    }
    tokio::task::spawn_blocking(move || {
        inputs
            .iter()
            .map(|input| process_upload(input, max_side))
            .collect::<AppResult<Vec<_>>>()
    })
    .await
    .map_err(|e| AppError::Internal(e.into()))?
}
