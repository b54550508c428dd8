use std::sync::Arc;

use tracing::info;

use crate::{
    domain::{
        common::{LarderConfig, entities::app_errors::CoreError},
        extraction::{fallback::LocalFallbackExtractor, services::ExtractionOrchestrator},
    },
    infrastructure::{
        credentials::ServiceAccountCredentialProvider, llm::VertexInferenceClient,
        ocr::TesseractOcrEngine,
    },
};

pub type LarderService = ExtractionOrchestrator<
    ServiceAccountCredentialProvider,
    VertexInferenceClient,
    TesseractOcrEngine,
>;

/// Wires the production adapters around one configuration snapshot.
pub fn create_service(config: LarderConfig) -> Result<LarderService, CoreError> {
    let vertex = Arc::new(config.vertex);

    let credential_provider =
        ServiceAccountCredentialProvider::new(vertex.credentials_path.clone(), vertex.timeout)?;
    let inference_client = VertexInferenceClient::new(vertex.clone())?;

    let fallback = config.ocr.enabled.then(|| {
        LocalFallbackExtractor::new(TesseractOcrEngine::from_config(&config.ocr))
            .with_max_tokens(config.ocr.max_tokens)
    });

    info!(
        project_configured = vertex.project_id.is_some(),
        location = %vertex.location,
        model = %vertex.model,
        ocr_fallback = fallback.is_some(),
        "extraction service ready"
    );

    Ok(ExtractionOrchestrator::new(
        vertex,
        credential_provider,
        inference_client,
        fallback,
    ))
}
