//! Field checks for item intake and edits. Measurement rules live in
//! [`crate::measurements`].

use crate::error::{AppError, AppResult};

pub const MAX_NAME_LEN: usize = 200;
pub const MAX_DESCRIPTION_LEN: usize = 2000;
pub const MAX_IMAGES_PER_REQUEST: usize = 20;

/// Returns the trimmed name.
pub fn validate_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("name must not be empty".into()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::BadRequest(format!(
            "name is too long (max {MAX_NAME_LEN} chars)"
        )));
    }
    Ok(name.to_string())
}

pub fn validate_price(price: f64) -> AppResult<f64> {
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::BadRequest(
            "price must be a non-negative number".into(),
        ));
    }
    Ok(price)
}

/// Blank descriptions are stored as NULL.
pub fn normalize_description(description: Option<String>) -> AppResult<Option<String>> {
    let Some(text) = description else {
        return Ok(None);
    };
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    if text.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(AppError::BadRequest(format!(
            "description is too long (max {MAX_DESCRIPTION_LEN} chars)"
        )));
    }
    Ok(Some(text.to_string()))
}

pub fn validate_image_batch(images: &[String]) -> AppResult<()> {
    if images.len() > MAX_IMAGES_PER_REQUEST {
        return Err(AppError::BadRequest(format!(
            "at most {MAX_IMAGES_PER_REQUEST} images per request"
        )));
    }
    Ok(())
}
