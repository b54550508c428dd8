use std::path::Path;

use anyhow::Context;
use larder_core::domain::extraction::{
    entities::Extraction, ports::ExtractionService, value_objects::ScanIngredientsInput,
};

use crate::application::state::AppState;

const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024; // 10MB

pub async fn scan(
    state: &AppState,
    image: &Path,
    mime_type: Option<String>,
) -> Result<Extraction, anyhow::Error> {
    let image_data = tokio::fs::read(image)
        .await
        .with_context(|| format!("cannot read image {}", image.display()))?;

    if image_data.len() > MAX_IMAGE_SIZE {
        anyhow::bail!(
            "Image too large. Max size is {} bytes, got {}",
            MAX_IMAGE_SIZE,
            image_data.len()
        );
    }

    let mime_type = mime_type.or_else(|| detect_mime_type(&image_data));
    tracing::debug!(bytes = image_data.len(), mime_type = ?mime_type, "scanning image");

    let extraction = state
        .service
        .scan_ingredients(ScanIngredientsInput {
            image_data,
            mime_type,
        })
        .await?;

    Ok(extraction)
}

/// `None` lets the core apply its default.
fn detect_mime_type(data: &[u8]) -> Option<String> {
    image::guess_format(data)
        .ok()
        .map(|format| format.to_mime_type().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_png_signature() {
        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
        assert_eq!(detect_mime_type(&png).as_deref(), Some("image/png"));
    }

    #[test]
    fn test_detects_jpeg_signature() {
        let jpeg = [0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10, b'J', b'F', b'I', b'F'];
        assert_eq!(detect_mime_type(&jpeg).as_deref(), Some("image/jpeg"));
    }

    #[test]
    fn test_unknown_bytes_have_no_mime_type() {
        assert_eq!(detect_mime_type(b"not an image"), None);
    }
}
