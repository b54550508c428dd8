use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::domain::{
    common::DEFAULT_MAX_FALLBACK_TOKENS,
    extraction::{dedupe::dedupe, ports::OcrEngine, value_objects::FallbackOutcome},
};

/// Words of at least two letters, joined by single spaces or hyphens.
pub const TOKEN_PATTERN: &str = r"\b[A-Za-z]{2,}(?:[ -][A-Za-z]{2,})*\b";

/// Longest accepted token. Longer matches are split back into words.
/// The bounds are a tunable default, not an external contract.
pub const MAX_TOKEN_LEN: usize = 41;

static TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(TOKEN_PATTERN).expect("token pattern is a valid regex"));

/// Best-effort ingredient names from local OCR when the remote path fails.
#[derive(Debug, Clone)]
pub struct LocalFallbackExtractor<O: OcrEngine> {
    engine: O,
    max_tokens: usize,
}

impl<O: OcrEngine> LocalFallbackExtractor<O> {
    pub fn new(engine: O) -> Self {
        Self {
            engine,
            max_tokens: DEFAULT_MAX_FALLBACK_TOKENS,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn engine(&self) -> &O {
        &self.engine
    }

    /// Never fails: every OCR error becomes an empty outcome.
    pub async fn extract(&self, image: &[u8]) -> FallbackOutcome {
        let text = match self.engine.recognize(image).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "local OCR fallback produced no text");
                return FallbackOutcome::skipped(e.to_string());
            }
        };

        let names = extract_tokens(&text, self.max_tokens);
        debug!(
            chars = text.len(),
            tokens = names.len(),
            "local OCR fallback finished"
        );

        if names.is_empty() {
            return FallbackOutcome::skipped("no ingredient-like tokens in OCR text");
        }
        FallbackOutcome::extracted(names)
    }
}

/// Lower-cased, de-duplicated letter runs from OCR text, at most `limit`.
pub fn extract_tokens(text: &str, limit: usize) -> Vec<String> {
    let tokens = TOKEN_REGEX
        .find_iter(text)
        .flat_map(|token| bounded(token.as_str()))
        .map(|token| token.to_lowercase());

    let mut names = dedupe(tokens);
    names.truncate(limit);
    names
}

fn bounded(token: &str) -> Vec<&str> {
    if token.len() <= MAX_TOKEN_LEN {
        return vec![token];
    }
    token
        .split([' ', '-'])
        .filter(|word| word.len() <= MAX_TOKEN_LEN)
        .collect()
}
