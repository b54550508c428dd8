use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OcrError {
    #[error("image could not be decoded: {0}")]
    Decode(String),

    #[error("no OCR backend available: {0}")]
    Unavailable(String),

    #[error("OCR failed: {0}")]
    Failed(String),
}
