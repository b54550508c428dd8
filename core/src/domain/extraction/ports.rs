use std::future::Future;

use serde_json::Value;

use crate::domain::{
    common::entities::app_errors::CoreError,
    extraction::{
        entities::{Extraction, ExtractionRequest},
        errors::OcrError,
        value_objects::{
            BearerToken, GenerateRecipeInput, GenerateShoppingListInput, InferencePrompt,
            ScanIngredientsInput,
        },
    },
};

/// Issues bearer credentials for the inference service
#[cfg_attr(test, mockall::automock)]
pub trait CredentialProvider: Send + Sync {
    /// Returns a token that is not expired. Every failure is a
    /// [`CoreError::Configuration`].
    fn acquire(&self) -> impl Future<Output = Result<BearerToken, CoreError>> + Send;
}

/// Remote multimodal inference endpoint
#[cfg_attr(test, mockall::automock)]
pub trait InferenceClient: Send + Sync {
    /// Sends one request and returns the full response envelope.
    ///
    /// No response at all maps to [`CoreError::Transport`], a non-success
    /// status to [`CoreError::Remote`], an unreadable success body to
    /// [`CoreError::MalformedReply`].
    fn generate(
        &self,
        project_id: &str,
        token: &BearerToken,
        prompt: &InferencePrompt,
    ) -> impl Future<Output = Result<Value, CoreError>> + Send;
}

/// Local text recognition used by the degraded scan path
#[cfg_attr(test, mockall::automock)]
pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image: &[u8]) -> impl Future<Output = Result<String, OcrError>> + Send;
}

/// Service trait for the three extraction contracts
#[cfg_attr(test, mockall::automock)]
pub trait ExtractionService: Send + Sync {
    fn extract(
        &self,
        request: ExtractionRequest,
    ) -> impl Future<Output = Result<Extraction, CoreError>> + Send;

    fn scan_ingredients(
        &self,
        input: ScanIngredientsInput,
    ) -> impl Future<Output = Result<Extraction, CoreError>> + Send;

    fn generate_recipe(
        &self,
        input: GenerateRecipeInput,
    ) -> impl Future<Output = Result<Extraction, CoreError>> + Send;

    fn generate_shopping_list(
        &self,
        input: GenerateShoppingListInput,
    ) -> impl Future<Output = Result<Extraction, CoreError>> + Send;
}
