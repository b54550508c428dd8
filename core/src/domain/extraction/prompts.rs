use base64::{Engine as _, engine::general_purpose};

use crate::domain::{
    common::entities::app_errors::CoreError,
    extraction::{
        entities::{ExtractionRequest, IngredientEntry},
        value_objects::{InferencePrompt, PromptPart},
    },
};

pub const SCAN_TEMPERATURE: f32 = 0.1;
pub const RECIPE_TEMPERATURE: f32 = 0.6;
pub const SHOPPING_LIST_TEMPERATURE: f32 = 0.1;

const SCAN_PROMPT: &str = r#"You are an ingredient recognition assistant. Only look at the food ingredients in the picture and ignore tableware, plates, the table surface and decorations.

Return a JSON array in which every element is a string naming one ingredient, as specifically as possible. For example:

[
  "mango slices",
  "pomelo pulp",
  "coconut milk",
  "tapioca pearls",
  "rice paper"
]

Requirements:
- Return JSON only, without any explanation.
- Do not include comments or extra fields.
- If no ingredient can be recognized, return []."#;

const RECIPE_PROMPT: &str = r#"You are a professional cooking assistant. Based on the list of available ingredients below, create ONE complete recipe.

Available ingredients: {ingredients}

Requirements:
1. Use the provided ingredients as primary components.
2. You may add basic seasonings (salt, pepper, oil) but avoid unrelated ingredients.
3. Recipe must serve 1-2 people.
4. Output strictly valid JSON in the exact structure below:

{
  "title": "Example Dish Name",
  "servings": 2,
  "ingredients": [
    {
      "name": "ingredient name",
      "amount": 100,
      "unit": "g"
    }
  ],
  "steps": [
    "Step 1 ...",
    "Step 2 ..."
  ],
  "estimated_time_minutes": 20,
  "difficulty": "easy"
}

Important:
- Return JSON only.
- Do NOT include explanations or comments."#;

const SHOPPING_LIST_PROMPT: &str = r#"IMPORTANT: Your entire response MUST be in ENGLISH ONLY.

- If the input ingredient names are in other languages, you MUST translate and normalize them to natural English cooking terms.
- The JSON you return must not contain any non-English text.

You are an intelligent shopping list assistant.

Your task: given a list of pantry ingredients (what the user already has) and a list of recipe ingredients (what the recipe requires), generate the list of ingredients that the user still needs to buy.

Input format:
- pantry_ingredients: JSON array of ingredients the user already has
- recipe_ingredients: JSON array of ingredients required by the recipe

Each ingredient object may look like:
{
  "name": "ingredient name (any language, normalized to English in the OUTPUT)",
  "quantity": number or null,
  "unit": "unit string or null",
  "notes": "optional notes, e.g. 'large', 'diced'"
}

Your tasks:

1. Identify ingredients that are the same item even if named differently, for example "egg" vs "large egg" vs "eggs", or "coconut milk" vs "canned coconut milk". Non-English names that refer to the same English ingredient must also be merged. Use semantic understanding, not string matching.

2. For each ingredient required by the recipe:
   - If the pantry has none of it, it must appear in the shopping list.
   - If the pantry quantity is insufficient (recipe needs 500 g, pantry has 200 g), the shopping list contains the missing amount (300 g).
   - If quantity or unit information is missing on either side, use a conservative estimate or mark that some extra amount should be bought.

3. Merge duplicates: recipe ingredients that are the same purchase item become a single shopping list item with a unified name and the total missing quantity. Track which original pantry and recipe ingredient names were matched into it.

Output format:
Return only a JSON array. Each element is one ingredient to purchase:

[
  {
    "name": "unified purchase name in English",
    "quantity": number or null,
    "unit": "unit string or null",
    "reason": "short explanation in English of why this is needed and roughly how much",
    "matched_existing": ["matched pantry ingredient name (original input text)"],
    "matched_recipe": ["matched recipe ingredient name (original input text)"]
  }
]

Requirements:
- If nothing needs to be bought, return an empty array: [].
- All names and text in the OUTPUT must be in English only.
- Return pure JSON only, with no explanations, comments, or additional fields."#;

/// Builds the fixed prompt for a request. Only the request's own data is
/// interpolated.
pub fn build_prompt(request: &ExtractionRequest) -> Result<InferencePrompt, CoreError> {
    match request {
        ExtractionRequest::ImageScan {
            image_bytes,
            mime_type,
        } => Ok(InferencePrompt {
            parts: vec![
                PromptPart::Text(SCAN_PROMPT.to_string()),
                PromptPart::InlineData {
                    mime_type: mime_type.clone(),
                    data: general_purpose::STANDARD.encode(image_bytes),
                },
            ],
            temperature: SCAN_TEMPERATURE,
        }),
        ExtractionRequest::RecipeFromIngredients { ingredient_names } => Ok(InferencePrompt {
            parts: vec![PromptPart::Text(
                RECIPE_PROMPT.replace("{ingredients}", &ingredient_names.join(", ")),
            )],
            temperature: RECIPE_TEMPERATURE,
        }),
        ExtractionRequest::ShoppingListReconciliation {
            pantry_items,
            recipe_items,
        } => Ok(InferencePrompt {
            parts: vec![
                PromptPart::Text(SHOPPING_LIST_PROMPT.to_string()),
                PromptPart::Text(format!(
                    "\n\npantry_ingredients (JSON):\n{}",
                    serialize_entries(pantry_items)?
                )),
                PromptPart::Text(format!(
                    "\n\nrecipe_ingredients (JSON):\n{}",
                    serialize_entries(recipe_items)?
                )),
            ],
            temperature: SHOPPING_LIST_TEMPERATURE,
        }),
    }
}

fn serialize_entries(entries: &[IngredientEntry]) -> Result<String, CoreError> {
    serde_json::to_string(entries)
        .map_err(|e| CoreError::InvalidInput(format!("cannot serialize ingredients: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_prompt_attaches_base64_image() {
        let request = ExtractionRequest::image_scan(b"fake-image-bytes".to_vec(), None);
        let prompt = build_prompt(&request).unwrap();

        assert_eq!(prompt.temperature, SCAN_TEMPERATURE);
        assert_eq!(prompt.parts.len(), 2);
        assert!(matches!(&prompt.parts[0], PromptPart::Text(text) if text.contains("JSON array")));
        assert_eq!(
            prompt.parts[1],
            PromptPart::InlineData {
                mime_type: "image/jpeg".to_string(),
                data: "ZmFrZS1pbWFnZS1ieXRlcw==".to_string(),
            }
        );
    }

    #[test]
    fn test_recipe_prompt_embeds_ingredient_list() {
        let request = ExtractionRequest::recipe(vec!["egg".to_string(), "milk".to_string()]);
        let prompt = build_prompt(&request).unwrap();

        assert_eq!(prompt.temperature, RECIPE_TEMPERATURE);
        let [PromptPart::Text(text)] = prompt.parts.as_slice() else {
            panic!("expected a single text part");
        };
        assert!(text.contains("Available ingredients: egg, milk"));
        assert!(!text.contains("{ingredients}"));
    }

    #[test]
    fn test_shopping_list_prompt_serializes_both_lists() {
        let pantry = vec![IngredientEntry {
            name: "鸡蛋".to_string(),
            quantity: Some(2.0),
            unit: Some("pcs".to_string()),
            notes: None,
        }];
        let recipe = vec![IngredientEntry::named("large egg")];
        let prompt = build_prompt(&ExtractionRequest::shopping_list(pantry, recipe)).unwrap();

        assert_eq!(prompt.parts.len(), 3);
        assert_eq!(
            prompt.parts[1],
            PromptPart::Text(
                "\n\npantry_ingredients (JSON):\n[{\"name\":\"鸡蛋\",\"quantity\":2.0,\"unit\":\"pcs\"}]"
                    .to_string()
            )
        );
        assert_eq!(
            prompt.parts[2],
            PromptPart::Text("\n\nrecipe_ingredients (JSON):\n[{\"name\":\"large egg\"}]".to_string())
        );
    }

    #[test]
    fn test_prompts_are_deterministic() {
        let request = ExtractionRequest::recipe(vec!["rice".to_string()]);
        assert_eq!(build_prompt(&request).unwrap(), build_prompt(&request).unwrap());
    }
}
