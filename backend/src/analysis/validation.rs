use crate::error::AnalysisError;
use crate::upload::ImageUpload;

pub const SUPPORTED_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg"];

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// An image that passed validation; filename and content type are always set.
#[derive(Debug, Clone)]
pub struct ValidatedImage {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

pub fn has_supported_extension(filename: &str) -> bool {
    let lower = filename.to_ascii_lowercase();
    SUPPORTED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

pub fn validate_image(
    image: Option<ImageUpload>,
    max_bytes: usize,
) -> Result<ValidatedImage, AnalysisError> {
    let Some(image) = image.filter(|image| !image.bytes.is_empty()) else {
        return Err(AnalysisError::Validation("No image file provided.".into()));
    };
    let Some(filename) = image.filename.filter(|name| !name.is_empty()) else {
        return Err(AnalysisError::Validation("No image file provided.".into()));
    };

    if !has_supported_extension(&filename) {
        return Err(AnalysisError::Validation(
            "Unsupported image format. Please upload PNG, JPG, or JPEG.".into(),
        ));
    }

    if image.bytes.len() > max_bytes {
        return Err(AnalysisError::Validation(format!(
            "Image file too large ({} bytes). Maximum allowed is {} bytes.",
            image.bytes.len(),
            max_bytes
        )));
    }

    Ok(ValidatedImage {
        filename,
        content_type: image
            .content_type
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
        bytes: image.bytes,
    })
}
