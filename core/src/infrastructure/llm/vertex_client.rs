use std::sync::Arc;

use reqwest::{Client, header};
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use crate::domain::{
    common::{VertexConfig, entities::app_errors::CoreError},
    extraction::{
        ports::InferenceClient,
        value_objects::{BearerToken, InferencePrompt, PromptPart},
    },
};

#[derive(Debug, Clone)]
pub struct VertexInferenceClient {
    config: Arc<VertexConfig>,
    client: Client,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text {
        text: &'a str,
    },
    #[serde(rename_all = "camelCase")]
    InlineData {
        inline_data: InlineData<'a>,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

impl<'a> From<&'a InferencePrompt> for GenerateContentRequest<'a> {
    fn from(prompt: &'a InferencePrompt) -> Self {
        let parts = prompt
            .parts
            .iter()
            .map(|part| match part {
                PromptPart::Text(text) => Part::Text { text },
                PromptPart::InlineData { mime_type, data } => Part::InlineData {
                    inline_data: InlineData { mime_type, data },
                },
            })
            .collect();

        Self {
            contents: vec![Content {
                role: "user",
                parts,
            }],
            generation_config: GenerationConfig {
                temperature: prompt.temperature,
            },
        }
    }
}

impl VertexInferenceClient {
    pub fn new(config: Arc<VertexConfig>) -> Result<Self, CoreError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CoreError::Configuration(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }
}

impl InferenceClient for VertexInferenceClient {
    #[instrument(skip(self, token, prompt), fields(model = %self.config.model))]
    async fn generate(
        &self,
        project_id: &str,
        token: &BearerToken,
        prompt: &InferencePrompt,
    ) -> Result<Value, CoreError> {
        let url = self.config.generate_content_url(project_id);
        let body = GenerateContentRequest::from(prompt);

        let response = self
            .client
            .post(&url)
            .header(header::AUTHORIZATION, token.authorization_header())
            .header(header::CONTENT_TYPE, "application/json; charset=utf-8")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Vertex request failed: {}", e);
                CoreError::Transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Vertex API error: {} - {}", status, error_text);
            return Err(CoreError::Remote {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let text = response.text().await.map_err(|e| {
            tracing::error!("Failed to read Vertex response body: {}", e);
            CoreError::Transport(format!("response body interrupted: {}", e))
        })?;

        tracing::debug!(bytes = text.len(), "Vertex response received");

        serde_json::from_str(&text).map_err(|e| {
            tracing::error!("Vertex response is not JSON: {}", e);
            CoreError::malformed("unexpected response structure", &text)
        })
    }
}
