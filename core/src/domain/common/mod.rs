use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::{NoContext, Timestamp};

pub mod entities;

pub const DEFAULT_LOCATION: &str = "us-central1";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_MAX_FALLBACK_TOKENS: usize = 20;

/// Process-wide configuration snapshot, built once at startup.
#[derive(Clone, Debug, Default)]
pub struct LarderConfig {
    pub vertex: VertexConfig,
    pub ocr: OcrConfig,
}

#[derive(Clone, Debug)]
pub struct VertexConfig {
    pub project_id: Option<String>,
    pub location: String,
    pub credentials_path: Option<PathBuf>,
    pub model: String,
    /// Overrides `https://{location}-aiplatform.googleapis.com`.
    pub endpoint: Option<String>,
    pub timeout: Duration,
}

impl Default for VertexConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            location: DEFAULT_LOCATION.to_string(),
            credentials_path: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl VertexConfig {
    pub fn base_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://{}-aiplatform.googleapis.com", self.location),
        }
    }

    pub fn generate_content_url(&self, project_id: &str) -> String {
        format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:generateContent",
            self.base_url(),
            project_id,
            self.location,
            self.model
        )
    }
}

#[derive(Clone, Debug)]
pub struct OcrConfig {
    pub enabled: bool,
    pub tesseract_bin: String,
    pub language: String,
    pub max_tokens: usize,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tesseract_bin: "tesseract".to_string(),
            language: "eng".to_string(),
            max_tokens: DEFAULT_MAX_FALLBACK_TOKENS,
        }
    }
}

pub fn generate_timestamp() -> (DateTime<Utc>, Timestamp) {
    let now = Utc::now();
    let seconds = now.timestamp().try_into().unwrap_or(0);
    let timestamp = Timestamp::from_unix(NoContext, seconds, now.timestamp_subsec_nanos());

    (now, timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_content_url_uses_location_host() {
        let config = VertexConfig {
            project_id: Some("pantry-prod".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.generate_content_url("pantry-prod"),
            "https://us-central1-aiplatform.googleapis.com/v1/projects/pantry-prod/locations/us-central1/publishers/google/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_endpoint_override_strips_trailing_slash() {
        let config = VertexConfig {
            endpoint: Some("http://127.0.0.1:9000/".to_string()),
            location: "europe-west4".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.generate_content_url("p"),
            "http://127.0.0.1:9000/v1/projects/p/locations/europe-west4/publishers/google/models/gemini-2.5-flash:generateContent"
        );
    }
}
