use serde_json::{Map, Value};

use crate::domain::{
    common::entities::app_errors::CoreError,
    extraction::{
        entities::{RecipeDocument, ShoppingListItem},
        value_objects::{ParsedValue, ShapeSpec},
    },
};

/// Parses normalized reply text against the expected shape.
///
/// Fails with [`CoreError::MalformedReply`] when the text is not JSON or the
/// top-level value has the wrong kind. Array elements that do not fit the
/// shape are skipped.
pub fn parse(text: &str, shape: ShapeSpec) -> Result<ParsedValue, CoreError> {
    let value: Value = serde_json::from_str(text).map_err(|e| {
        tracing::error!(error = %e, "inference reply is not valid JSON");
        CoreError::malformed(format!("invalid JSON: {}", e), text)
    })?;

    match shape {
        ShapeSpec::IngredientNames => {
            let elements = expect_array(value, shape, text)?;
            Ok(ParsedValue::Names(
                elements.iter().filter_map(ingredient_name).collect(),
            ))
        }
        ShapeSpec::RecipeObject => match value {
            Value::Object(fields) => Ok(ParsedValue::Recipe(RecipeDocument::new(fields))),
            _ => Err(wrong_shape(shape, text)),
        },
        ShapeSpec::ShoppingListArray => {
            let elements = expect_array(value, shape, text)?;
            Ok(ParsedValue::ShoppingItems(
                elements
                    .iter()
                    .filter_map(Value::as_object)
                    .map(shopping_list_item)
                    .collect(),
            ))
        }
    }
}

fn expect_array(value: Value, shape: ShapeSpec, text: &str) -> Result<Vec<Value>, CoreError> {
    match value {
        Value::Array(elements) => Ok(elements),
        _ => Err(wrong_shape(shape, text)),
    }
}

fn wrong_shape(shape: ShapeSpec, text: &str) -> CoreError {
    tracing::error!(expected = shape.expected(), "inference reply has wrong top-level shape");
    CoreError::malformed(
        format!("top-level JSON must be an {}", shape.expected()),
        text,
    )
}

fn ingredient_name(element: &Value) -> Option<String> {
    match element {
        Value::String(name) => Some(name.trim().to_string()),
        Value::Object(fields) => fields
            .get("name")
            .and_then(scalar_text)
            .filter(|name| !name.is_empty()),
        _ => None,
    }
}

/// Scalar `name` values are stringified, so `{"name": 5}` yields `"5"`.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn shopping_list_item(fields: &Map<String, Value>) -> ShoppingListItem {
    ShoppingListItem {
        name: string_field(fields, &["name"])
            .map(|name| name.trim().to_string())
            .unwrap_or_default(),
        quantity: fields.get("quantity").and_then(Value::as_f64),
        unit: string_field(fields, &["unit"]),
        reason: string_field(fields, &["reason"]),
        matched_existing: string_list(fields, &["matched_existing", "matchedExisting"]),
        matched_recipe: string_list(fields, &["matched_recipe", "matchedRecipe"]),
    }
}

fn string_field(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| fields.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

fn string_list(fields: &Map<String, Value>, keys: &[&str]) -> Vec<String> {
    keys.iter()
        .find_map(|key| fields.get(*key).and_then(Value::as_array))
        .map(|values| {
            values
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(text: &str) -> Vec<String> {
        match parse(text, ShapeSpec::IngredientNames).unwrap() {
            ParsedValue::Names(names) => names,
            other => panic!("unexpected parsed value: {:?}", other),
        }
    }

    #[test]
    fn test_parse_plain_string_array() {
        assert_eq!(names(r#"["egg", " milk "]"#), vec!["egg", "milk"]);
    }

    #[test]
    fn test_parse_object_elements_with_name() {
        let text = r#"[
            {"name": "mango slices", "category": "fruit", "confidence": 0.98},
            {"name": "  "},
            {"category": "starch"},
            42,
            null,
            "tapioca pearls"
        ]"#;
        assert_eq!(names(text), vec!["mango slices", "tapioca pearls"]);
    }

    #[test]
    fn test_parse_stringifies_scalar_names() {
        let text = r#"[{"name": 5}, {"name": 2.5}, {"name": true}, {"name": null}, {"name": ["egg"]}]"#;
        assert_eq!(names(text), vec!["5", "2.5", "true"]);
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        let err = parse("definitely not json", ShapeSpec::IngredientNames).unwrap_err();
        let CoreError::MalformedReply { excerpt, .. } = err else {
            panic!("expected malformed reply");
        };
        assert_eq!(excerpt, "definitely not json");
    }

    #[test]
    fn test_parse_rejects_object_when_array_expected() {
        let text = r#"{"ingredients": ["egg"]}"#;
        let err = parse(text, ShapeSpec::IngredientNames).unwrap_err();
        match err {
            CoreError::MalformedReply { reason, excerpt } => {
                assert!(reason.contains("array"));
                assert!(excerpt.starts_with("{\"ingredients\""));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_recipe_requires_object() {
        let err = parse(r#"["not", "a", "recipe"]"#, ShapeSpec::RecipeObject).unwrap_err();
        assert!(matches!(err, CoreError::MalformedReply { .. }));

        let parsed = parse(r#"{"title": "Soup", "servings": "two"}"#, ShapeSpec::RecipeObject)
            .unwrap();
        let ParsedValue::Recipe(recipe) = parsed else {
            panic!("expected recipe");
        };
        assert_eq!(recipe.title(), Some("Soup"));
        assert_eq!(recipe.servings(), None);
    }

    #[test]
    fn test_parse_shopping_items_defaults_matches() {
        let text = r#"[
            {
                "name": " egg ",
                "quantity": 1,
                "unit": "pcs",
                "reason": "Recipe needs 3 eggs, pantry has 2.",
                "matched_existing": ["egg"],
                "matched_recipe": ["large egg"]
            },
            {"name": "coconut milk", "quantity": null, "unit": null},
            "stray string",
            7
        ]"#;
        let ParsedValue::ShoppingItems(items) = parse(text, ShapeSpec::ShoppingListArray).unwrap()
        else {
            panic!("expected shopping items");
        };

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "egg");
        assert_eq!(items[0].quantity, Some(1.0));
        assert_eq!(items[0].unit.as_deref(), Some("pcs"));
        assert_eq!(items[0].matched_existing, vec!["egg"]);
        assert_eq!(items[0].matched_recipe, vec!["large egg"]);

        assert_eq!(items[1].name, "coconut milk");
        assert_eq!(items[1].quantity, None);
        assert_eq!(items[1].unit, None);
        assert_eq!(items[1].reason, None);
        assert!(items[1].matched_existing.is_empty());
        assert!(items[1].matched_recipe.is_empty());
    }

    #[test]
    fn test_parse_shopping_items_accepts_camel_case_matches() {
        let text = r#"[{"name": "onion", "matchedExisting": ["red onion"], "matchedRecipe": ["onion"]}]"#;
        let ParsedValue::ShoppingItems(items) = parse(text, ShapeSpec::ShoppingListArray).unwrap()
        else {
            panic!("expected shopping items");
        };
        assert_eq!(items[0].matched_existing, vec!["red onion"]);
        assert_eq!(items[0].matched_recipe, vec!["onion"]);
    }

    #[test]
    fn test_parse_shopping_list_rejects_object() {
        let err = parse(r#"{"to_buy": []}"#, ShapeSpec::ShoppingListArray).unwrap_err();
        assert!(matches!(err, CoreError::MalformedReply { .. }));
    }
}
