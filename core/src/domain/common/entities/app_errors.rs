use thiserror::Error;

use crate::domain::extraction::value_objects::FailureClassification;

/// Maximum number of characters of an unparseable reply kept for diagnostics.
pub const EXCERPT_LIMIT: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("inference service unreachable: {0}")]
    Transport(String),

    #[error("inference service returned error: {status} - {body}")]
    Remote { status: u16, body: String },

    #[error("malformed inference reply ({reason}): {excerpt}")]
    MalformedReply { reason: String, excerpt: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl CoreError {
    pub fn malformed(reason: impl Into<String>, text: &str) -> Self {
        CoreError::MalformedReply {
            reason: reason.into(),
            excerpt: excerpt(text),
        }
    }

    /// Maps the error onto the inference failure taxonomy. Input validation
    /// failures happen before any remote work and have no classification.
    pub fn classification(&self) -> Option<FailureClassification> {
        match self {
            CoreError::Configuration(_) => Some(FailureClassification::ConfigurationError),
            CoreError::Transport(_) => Some(FailureClassification::TransportError),
            CoreError::Remote { .. } => Some(FailureClassification::RemoteError),
            CoreError::MalformedReply { .. } => Some(FailureClassification::MalformedReply),
            CoreError::InvalidInput(_) => None,
        }
    }

    pub fn is_fallback_eligible(&self) -> bool {
        self.classification()
            .is_some_and(|classification| classification.is_fallback_eligible())
    }
}

/// First [`EXCERPT_LIMIT`] characters of `text`, suffixed with `...` when cut.
pub fn excerpt(text: &str) -> String {
    match text.char_indices().nth(EXCERPT_LIMIT) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_keeps_short_text() {
        assert_eq!(excerpt("{\"a\": 1}"), "{\"a\": 1}");
    }

    #[test]
    fn test_excerpt_truncates_on_char_boundary() {
        let text = "芒".repeat(EXCERPT_LIMIT + 5);
        let cut = excerpt(&text);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), EXCERPT_LIMIT + 3);
    }

    #[test]
    fn test_fallback_eligibility() {
        assert!(CoreError::Transport("refused".to_string()).is_fallback_eligible());
        assert!(
            CoreError::Remote {
                status: 503,
                body: "unavailable".to_string()
            }
            .is_fallback_eligible()
        );
        assert!(!CoreError::Configuration("missing".to_string()).is_fallback_eligible());
        assert!(!CoreError::malformed("not json", "oops").is_fallback_eligible());
        assert!(!CoreError::InvalidInput("empty".to_string()).is_fallback_eligible());
    }
}
