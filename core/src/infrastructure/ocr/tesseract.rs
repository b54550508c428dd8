use std::io::{Cursor, ErrorKind};
use std::process::Stdio;

use image::ImageFormat;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{instrument, warn};

use crate::domain::{
    common::OcrConfig,
    extraction::{errors::OcrError, ports::OcrEngine},
};

/// Runs the `tesseract` executable on a decoded image, piping PNG bytes on
/// stdin and reading the recognized text from stdout.
#[derive(Debug, Clone)]
pub struct TesseractOcrEngine {
    binary: String,
    language: String,
}

impl TesseractOcrEngine {
    pub fn new(binary: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            language: language.into(),
        }
    }

    pub fn from_config(config: &OcrConfig) -> Self {
        Self::new(config.tesseract_bin.clone(), config.language.clone())
    }
}

/// Decodes any supported format and re-encodes it as PNG for tesseract.
pub fn decode_to_png(image: &[u8]) -> Result<Vec<u8>, OcrError> {
    let decoded = image::load_from_memory(image).map_err(|e| OcrError::Decode(e.to_string()))?;

    let mut png = Cursor::new(Vec::new());
    decoded
        .write_to(&mut png, ImageFormat::Png)
        .map_err(|e| OcrError::Decode(format!("cannot re-encode image: {}", e)))?;

    Ok(png.into_inner())
}

impl OcrEngine for TesseractOcrEngine {
    #[instrument(skip(self, image), fields(bytes = image.len()))]
    async fn recognize(&self, image: &[u8]) -> Result<String, OcrError> {
        let owned = image.to_vec();
        let png = tokio::task::spawn_blocking(move || decode_to_png(&owned))
            .await
            .map_err(|e| OcrError::Failed(format!("decode task aborted: {}", e)))??;

        let mut child = Command::new(&self.binary)
            .args(["stdin", "stdout", "-l", self.language.as_str()])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => OcrError::Unavailable(format!("{} not found", self.binary)),
                _ => OcrError::Failed(format!("failed to spawn {}: {}", self.binary, e)),
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(&png)
                .await
                .map_err(|e| OcrError::Failed(format!("cannot write image to tesseract: {}", e)))?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| OcrError::Failed(format!("tesseract did not finish: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("tesseract exited with {}: {}", output.status, stderr.trim());
            return Err(OcrError::Failed(format!(
                "tesseract exited with {}",
                output.status
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
