use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use uuid::Uuid;

use crate::domain::{
    common::{entities::app_errors::CoreError, generate_timestamp},
    extraction::value_objects::{ExtractionSource, ShapeSpec},
};

pub const DEFAULT_IMAGE_MIME_TYPE: &str = "image/jpeg";

/// One pantry or recipe line as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl IngredientEntry {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: None,
            unit: None,
            notes: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionRequest {
    ImageScan {
        image_bytes: Vec<u8>,
        mime_type: String,
    },
    RecipeFromIngredients {
        ingredient_names: Vec<String>,
    },
    ShoppingListReconciliation {
        pantry_items: Vec<IngredientEntry>,
        recipe_items: Vec<IngredientEntry>,
    },
}

impl ExtractionRequest {
    pub fn image_scan(image_bytes: Vec<u8>, mime_type: Option<String>) -> Self {
        ExtractionRequest::ImageScan {
            image_bytes,
            mime_type: mime_type
                .filter(|mime| !mime.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_IMAGE_MIME_TYPE.to_string()),
        }
    }

    pub fn recipe(ingredient_names: Vec<String>) -> Self {
        ExtractionRequest::RecipeFromIngredients { ingredient_names }
    }

    pub fn shopping_list(
        pantry_items: Vec<IngredientEntry>,
        recipe_items: Vec<IngredientEntry>,
    ) -> Self {
        ExtractionRequest::ShoppingListReconciliation {
            pantry_items,
            recipe_items,
        }
    }

    pub fn contract(&self) -> &'static str {
        match self {
            ExtractionRequest::ImageScan { .. } => "image_scan",
            ExtractionRequest::RecipeFromIngredients { .. } => "recipe",
            ExtractionRequest::ShoppingListReconciliation { .. } => "shopping_list",
        }
    }

    pub fn shape(&self) -> ShapeSpec {
        match self {
            ExtractionRequest::ImageScan { .. } => ShapeSpec::IngredientNames,
            ExtractionRequest::RecipeFromIngredients { .. } => ShapeSpec::RecipeObject,
            ExtractionRequest::ShoppingListReconciliation { .. } => ShapeSpec::ShoppingListArray,
        }
    }
}

/// Recipe object as returned by the model. Fields are read defensively.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeDocument {
    pub fields: Map<String, Value>,
}

impl RecipeDocument {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn title(&self) -> Option<&str> {
        self.fields.get("title").and_then(Value::as_str)
    }

    pub fn servings(&self) -> Option<u64> {
        self.fields.get("servings").and_then(Value::as_u64)
    }

    pub fn ingredients(&self) -> &[Value] {
        self.array("ingredients")
    }

    pub fn steps(&self) -> Vec<&str> {
        self.array("steps").iter().filter_map(Value::as_str).collect()
    }

    pub fn estimated_minutes(&self) -> Option<u64> {
        self.fields
            .get("estimated_time_minutes")
            .or_else(|| self.fields.get("estimatedMinutes"))
            .and_then(Value::as_u64)
    }

    pub fn difficulty(&self) -> Option<&str> {
        self.fields.get("difficulty").and_then(Value::as_str)
    }

    fn array(&self, key: &str) -> &[Value] {
        self.fields
            .get(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShoppingListItem {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default)]
    pub matched_existing: Vec<String>,
    #[serde(default)]
    pub matched_recipe: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractionResult {
    IngredientList {
        names: Vec<String>,
    },
    Recipe {
        /// Echo of the caller's ingredient list.
        ingredients: Vec<String>,
        recipe: Option<RecipeDocument>,
        /// Normalized reply text, in the model's own key order.
        recipe_raw: String,
    },
    ShoppingList {
        items: Vec<ShoppingListItem>,
    },
}

/// Untrusted reply text plus the full response envelope, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawReply {
    pub text: String,
    pub envelope: Value,
}

impl RawReply {
    pub fn new(text: String, envelope: Value) -> Self {
        Self { text, envelope }
    }

    pub fn empty() -> Self {
        Self {
            text: String::new(),
            envelope: Value::Object(Map::new()),
        }
    }

    pub fn fallback(cause: &CoreError) -> Self {
        Self {
            text: String::new(),
            envelope: json!({
                "source": "local_ocr_fallback",
                "cause": cause.to_string(),
                "classification": cause.classification().map(|c| c.as_str()),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub id: Uuid,
    pub result: ExtractionResult,
    pub source: ExtractionSource,
    pub reply: RawReply,
    pub created_at: DateTime<Utc>,
}

impl Extraction {
    pub fn new(result: ExtractionResult, source: ExtractionSource, reply: RawReply) -> Self {
        let (now, timestamp) = generate_timestamp();

        Self {
            id: Uuid::new_v7(timestamp),
            result,
            source,
            reply,
            created_at: now,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == ExtractionSource::LocalFallback
    }

    pub fn ingredient_names(&self) -> Option<&[String]> {
        match &self.result {
            ExtractionResult::IngredientList { names } => Some(names),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_scan_defaults_mime_type() {
        let request = ExtractionRequest::image_scan(vec![1, 2, 3], None);
        let ExtractionRequest::ImageScan { mime_type, .. } = request else {
            panic!("expected image scan");
        };
        assert_eq!(mime_type, DEFAULT_IMAGE_MIME_TYPE);

        let request = ExtractionRequest::image_scan(vec![1], Some("  ".to_string()));
        assert!(matches!(
            request,
            ExtractionRequest::ImageScan { ref mime_type, .. } if mime_type == DEFAULT_IMAGE_MIME_TYPE
        ));
    }

    #[test]
    fn test_recipe_document_reads_fields_defensively() {
        let fields = json!({
            "title": "Simple Egg Toast",
            "servings": 1,
            "ingredients": [{"name": "egg", "amount": 1, "unit": "pcs"}],
            "steps": ["Beat the egg.", 7, "Toast the bread."],
            "estimated_time_minutes": 10,
            "difficulty": "easy"
        });
        let Value::Object(fields) = fields else {
            unreachable!()
        };
        let recipe = RecipeDocument::new(fields);

        assert_eq!(recipe.title(), Some("Simple Egg Toast"));
        assert_eq!(recipe.servings(), Some(1));
        assert_eq!(recipe.ingredients().len(), 1);
        assert_eq!(recipe.steps(), vec!["Beat the egg.", "Toast the bread."]);
        assert_eq!(recipe.estimated_minutes(), Some(10));
        assert_eq!(recipe.difficulty(), Some("easy"));

        let empty = RecipeDocument::default();
        assert_eq!(empty.title(), None);
        assert!(empty.ingredients().is_empty());
    }

    #[test]
    fn test_fallback_reply_is_marked() {
        let reply = RawReply::fallback(&CoreError::Transport("connection refused".to_string()));
        assert_eq!(reply.envelope["source"], "local_ocr_fallback");
        assert_eq!(reply.envelope["classification"], "TRANSPORT_ERROR");
        assert!(reply.text.is_empty());
    }

    #[test]
    fn test_recipe_result_keeps_raw_text() {
        let result = ExtractionResult::Recipe {
            ingredients: vec!["bread".to_string()],
            recipe: None,
            recipe_raw: r#"{"title":"Toast","servings":1}"#.to_string(),
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["kind"], "recipe");
        assert_eq!(value["recipe_raw"], r#"{"title":"Toast","servings":1}"#);
    }

    #[test]
    fn test_extraction_id_shares_creation_time() {
        let extraction = Extraction::new(
            ExtractionResult::IngredientList { names: Vec::new() },
            ExtractionSource::Remote,
            RawReply::empty(),
        );

        assert_eq!(extraction.id.get_version_num(), 7);
        let (seconds, _) = extraction.id.get_timestamp().unwrap().to_unix();
        assert_eq!(seconds as i64, extraction.created_at.timestamp());
    }

    #[test]
    fn test_result_serializes_with_kind_tag() {
        let result = ExtractionResult::IngredientList {
            names: vec!["egg".to_string()],
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value, json!({"kind": "ingredient_list", "names": ["egg"]}));
    }
}
