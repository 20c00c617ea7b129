use std::collections::HashMap;

use actix_multipart::Multipart;
use futures::{StreamExt, TryStreamExt};

use crate::config::DEFAULT_MAX_IMAGE_BYTES;
use crate::error::AnalysisError;

pub const IMAGE_FIELD: &str = "image";
pub const DEFAULT_MAX_FIELD_BYTES: usize = 64 * 1024;

/// Per-part size ceilings applied while the body is being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadLimits {
    pub max_image_bytes: usize,
    pub max_field_bytes: usize,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            max_field_bytes: DEFAULT_MAX_FIELD_BYTES,
        }
    }
}

/// The `image` part of an inbound analysis request, exactly as received.
#[derive(Debug, Clone, Default)]
pub struct ImageUpload {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// A fully buffered `POST /api/analyze` body.
#[derive(Debug, Default)]
pub struct AnalysisForm {
    pub image: Option<ImageUpload>,
    pub fields: HashMap<String, String>,
}

impl AnalysisForm {
    /// Adds query parameters that the multipart body did not already carry.
    pub fn merge_query(&mut self, query: HashMap<String, String>) {
        for (name, value) in query {
            self.fields.entry(name).or_insert(value);
        }
    }
}

/// Reads the whole form, failing as soon as any part outgrows its limit.
pub async fn read_analysis_form(
    mut payload: Multipart,
    limits: UploadLimits,
) -> Result<AnalysisForm, AnalysisError> {
    let mut form = AnalysisForm::default();

    while let Some(mut field) = payload.try_next().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let content_type = field.content_type().map(|mime| mime.to_string());

        let is_image = name == IMAGE_FIELD;
        let limit = if is_image {
            limits.max_image_bytes
        } else {
            limits.max_field_bytes
        };

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(malformed)?;
            if data.len() + chunk.len() > limit {
                return Err(too_large(&name, is_image, limit));
            }
            data.extend_from_slice(&chunk);
        }

        if is_image {
            // first image part wins
            if form.image.is_none() {
                form.image = Some(ImageUpload {
                    filename,
                    content_type,
                    bytes: data,
                });
            }
        } else {
            let value = String::from_utf8(data).map_err(|_| {
                AnalysisError::Validation(format!("Form field {} is not valid UTF-8", name))
            })?;
            form.fields.insert(name, value);
        }
    }

    Ok(form)
}

fn too_large(name: &str, is_image: bool, limit: usize) -> AnalysisError {
    if is_image {
        AnalysisError::Validation(format!(
            "Image file too large. Maximum allowed is {} bytes.",
            limit
        ))
    } else {
        AnalysisError::Validation(format!(
            "Form field {} too large. Maximum allowed is {} bytes.",
            name, limit
        ))
    }
}

fn malformed(err: actix_multipart::MultipartError) -> AnalysisError {
    AnalysisError::Validation(format!("Malformed multipart body: {}", err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_fields_take_precedence_over_query() {
        let mut form = AnalysisForm::default();
        form.fields.insert("num_beams".into(), "2".into());

        let query = HashMap::from([
            ("num_beams".to_string(), "8".to_string()),
            ("top_k".to_string(), "50".to_string()),
        ]);
        form.merge_query(query);

        assert_eq!(form.fields["num_beams"], "2");
        assert_eq!(form.fields["top_k"], "50");
    }
}
