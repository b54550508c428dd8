use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::extraction::entities::{IngredientEntry, RecipeDocument, ShoppingListItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureClassification {
    ConfigurationError,
    TransportError,
    RemoteError,
    MalformedReply,
}

impl FailureClassification {
    pub fn is_fallback_eligible(&self) -> bool {
        matches!(
            self,
            FailureClassification::TransportError | FailureClassification::RemoteError
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FailureClassification::ConfigurationError => "CONFIGURATION_ERROR",
            FailureClassification::TransportError => "TRANSPORT_ERROR",
            FailureClassification::RemoteError => "REMOTE_ERROR",
            FailureClassification::MalformedReply => "MALFORMED_REPLY",
        }
    }
}

impl fmt::Display for FailureClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expected top-level shape of an inference reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeSpec {
    /// Array whose elements are strings or objects with a `name`.
    IngredientNames,
    /// A single JSON object, fields are not validated.
    RecipeObject,
    /// Array of shopping-list objects.
    ShoppingListArray,
}

impl ShapeSpec {
    pub fn expected(&self) -> &'static str {
        match self {
            ShapeSpec::IngredientNames | ShapeSpec::ShoppingListArray => "array",
            ShapeSpec::RecipeObject => "object",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParsedValue {
    Names(Vec<String>),
    Recipe(RecipeDocument),
    ShoppingItems(Vec<ShoppingListItem>),
}

/// Where the data of an [`Extraction`](super::entities::Extraction) came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionSource {
    Remote,
    LocalFallback,
    /// No remote call was made because the input was empty.
    ShortCircuit,
}

#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl BearerToken {
    pub fn new(value: String, expires_at: DateTime<Utc>) -> Self {
        Self { value, expires_at }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.value)
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerToken")
            .field("value", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PromptPart {
    Text(String),
    InlineData { mime_type: String, data: String },
}

/// Contract-specific request body, independent of the wire format.
#[derive(Debug, Clone, PartialEq)]
pub struct InferencePrompt {
    pub parts: Vec<PromptPart>,
    pub temperature: f32,
}

/// Result of the local OCR fallback. Never an error: an empty `names`
/// carries the reason in `skipped`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FallbackOutcome {
    pub names: Vec<String>,
    pub skipped: Option<String>,
}

impl FallbackOutcome {
    pub fn extracted(names: Vec<String>) -> Self {
        Self {
            names,
            skipped: None,
        }
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        Self {
            names: Vec::new(),
            skipped: Some(reason.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ScanIngredientsInput {
    pub image_data: Vec<u8>,
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GenerateRecipeInput {
    pub ingredients: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct GenerateShoppingListInput {
    pub pantry_ingredients: Vec<IngredientEntry>,
    pub recipe_ingredients: Vec<IngredientEntry>,
}
