pub mod credentials;
pub mod llm;
pub mod ocr;
