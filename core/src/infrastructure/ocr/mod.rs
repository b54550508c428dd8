pub mod tesseract;

pub use tesseract::TesseractOcrEngine;
