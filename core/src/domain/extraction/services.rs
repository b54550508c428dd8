use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use crate::domain::{
    common::{VertexConfig, entities::app_errors::CoreError},
    extraction::{
        dedupe::dedupe,
        entities::{Extraction, ExtractionRequest, ExtractionResult, RawReply},
        fallback::LocalFallbackExtractor,
        normalizer::normalize,
        parser::parse,
        ports::{CredentialProvider, ExtractionService, InferenceClient, OcrEngine},
        prompts::build_prompt,
        value_objects::{
            ExtractionSource, GenerateRecipeInput, GenerateShoppingListInput, ParsedValue,
            ScanIngredientsInput,
        },
    },
};

/// Coordinates credential, remote call, reply parsing and OCR fallback for
/// every extraction contract.
#[derive(Debug, Clone)]
pub struct ExtractionOrchestrator<CP, IC, O>
where
    CP: CredentialProvider,
    IC: InferenceClient,
    O: OcrEngine,
{
    config: Arc<VertexConfig>,
    credential_provider: CP,
    inference_client: IC,
    fallback: Option<LocalFallbackExtractor<O>>,
}

impl<CP, IC, O> ExtractionOrchestrator<CP, IC, O>
where
    CP: CredentialProvider,
    IC: InferenceClient,
    O: OcrEngine,
{
    pub fn new(
        config: Arc<VertexConfig>,
        credential_provider: CP,
        inference_client: IC,
        fallback: Option<LocalFallbackExtractor<O>>,
    ) -> Self {
        Self {
            config,
            credential_provider,
            inference_client,
            fallback,
        }
    }

    /// Configure, authorize, build and send. Returns the response envelope.
    async fn invoke(&self, request: &ExtractionRequest) -> Result<Value, CoreError> {
        let project_id = self
            .config
            .project_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| CoreError::Configuration("GCP_PROJECT_ID is not configured".into()))?;

        let token = self
            .credential_provider
            .acquire()
            .await
            .map_err(|e| match e {
                CoreError::Configuration(_) => e,
                other => {
                    CoreError::Configuration(format!("failed to obtain access token: {}", other))
                }
            })?;

        let prompt = build_prompt(request)?;
        debug!(
            contract = request.contract(),
            parts = prompt.parts.len(),
            "sending inference request"
        );

        self.inference_client
            .generate(project_id, &token, &prompt)
            .await
    }

    fn interpret(
        &self,
        request: ExtractionRequest,
        envelope: Value,
    ) -> Result<Extraction, CoreError> {
        let reply_text = reply_text(&envelope)
            .ok_or_else(|| {
                error!("inference response has no candidates[0].content.parts[0].text");
                CoreError::malformed("unexpected response structure", &envelope.to_string())
            })?
            .to_string();

        let cleaned = normalize(&reply_text);
        let parsed = parse(&cleaned, request.shape())?;

        let result = match parsed {
            ParsedValue::Names(names) => ExtractionResult::IngredientList {
                names: dedupe(names),
            },
            ParsedValue::Recipe(recipe) => ExtractionResult::Recipe {
                ingredients: match request {
                    ExtractionRequest::RecipeFromIngredients { ingredient_names } => {
                        ingredient_names
                    }
                    _ => Vec::new(),
                },
                recipe: Some(recipe),
                recipe_raw: cleaned,
            },
            ParsedValue::ShoppingItems(items) => ExtractionResult::ShoppingList { items },
        };

        Ok(Extraction::new(
            result,
            ExtractionSource::Remote,
            RawReply::new(reply_text, envelope),
        ))
    }

    /// Only the image contract has a degraded path. Anything else, or an
    /// empty OCR outcome, surfaces the original failure.
    async fn recover(
        &self,
        request: &ExtractionRequest,
        cause: CoreError,
    ) -> Result<Extraction, CoreError> {
        let (ExtractionRequest::ImageScan { image_bytes, .. }, Some(fallback)) =
            (request, &self.fallback)
        else {
            return Err(cause);
        };

        warn!(error = %cause, "remote scan failed, trying local OCR fallback");
        let outcome = fallback.extract(image_bytes).await;
        if outcome.is_empty() {
            warn!(
                skipped = outcome.skipped.as_deref().unwrap_or_default(),
                "local OCR fallback found nothing"
            );
            return Err(cause);
        }

        Ok(Extraction::new(
            ExtractionResult::IngredientList {
                names: outcome.names,
            },
            ExtractionSource::LocalFallback,
            RawReply::fallback(&cause),
        ))
    }
}

impl<CP, IC, O> ExtractionService for ExtractionOrchestrator<CP, IC, O>
where
    CP: CredentialProvider,
    IC: InferenceClient,
    O: OcrEngine,
{
    #[instrument(skip(self, request), fields(contract = request.contract()))]
    async fn extract(&self, request: ExtractionRequest) -> Result<Extraction, CoreError> {
        match &request {
            ExtractionRequest::RecipeFromIngredients { ingredient_names }
                if ingredient_names.is_empty() =>
            {
                debug!("empty ingredient list, skipping inference");
                return Ok(Extraction::new(
                    ExtractionResult::Recipe {
                        ingredients: Vec::new(),
                        recipe: None,
                        recipe_raw: String::new(),
                    },
                    ExtractionSource::ShortCircuit,
                    RawReply::empty(),
                ));
            }
            ExtractionRequest::ImageScan { image_bytes, .. } if image_bytes.is_empty() => {
                return Err(CoreError::InvalidInput("uploaded image is empty".into()));
            }
            _ => {}
        }

        let started = Instant::now();
        let outcome = match self.invoke(&request).await {
            Ok(envelope) => self.interpret(request, envelope),
            Err(e) if e.is_fallback_eligible() => self.recover(&request, e).await,
            Err(e) => Err(e),
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &outcome {
            Ok(extraction) => info!(
                extraction_id = %extraction.id,
                source = ?extraction.source,
                elapsed_ms,
                "extraction succeeded"
            ),
            Err(e) => error!(
                classification = e.classification().map(|c| c.as_str()),
                error = %e,
                elapsed_ms,
                "extraction failed"
            ),
        }

        outcome
    }

    async fn scan_ingredients(&self, input: ScanIngredientsInput) -> Result<Extraction, CoreError> {
        self.extract(ExtractionRequest::image_scan(input.image_data, input.mime_type))
            .await
    }

    async fn generate_recipe(&self, input: GenerateRecipeInput) -> Result<Extraction, CoreError> {
        self.extract(ExtractionRequest::recipe(input.ingredients))
            .await
    }

    async fn generate_shopping_list(
        &self,
        input: GenerateShoppingListInput,
    ) -> Result<Extraction, CoreError> {
        self.extract(ExtractionRequest::shopping_list(
            input.pantry_ingredients,
            input.recipe_ingredients,
        ))
        .await
    }
}

/// `candidates[0].content.parts[0].text`
fn reply_text(envelope: &Value) -> Option<&str> {
    envelope
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
}
