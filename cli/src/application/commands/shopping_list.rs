use std::path::Path;

use anyhow::Context;
use larder_core::domain::extraction::{
    entities::{Extraction, IngredientEntry},
    ports::ExtractionService,
    value_objects::GenerateShoppingListInput,
};
use serde::Deserialize;

use crate::application::state::AppState;

/// A list file entry: a bare name or a full ingredient object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IngredientLine {
    Name(String),
    Entry(IngredientEntry),
}

impl From<IngredientLine> for IngredientEntry {
    fn from(line: IngredientLine) -> Self {
        match line {
            IngredientLine::Name(name) => IngredientEntry::named(name),
            IngredientLine::Entry(entry) => entry,
        }
    }
}

pub async fn shopping_list(
    state: &AppState,
    pantry: &Path,
    recipe: &Path,
) -> Result<Extraction, anyhow::Error> {
    let pantry_ingredients = read_ingredients(pantry).await?;
    let recipe_ingredients = read_ingredients(recipe).await?;

    let extraction = state
        .service
        .generate_shopping_list(GenerateShoppingListInput {
            pantry_ingredients,
            recipe_ingredients,
        })
        .await?;

    Ok(extraction)
}

async fn read_ingredients(path: &Path) -> Result<Vec<IngredientEntry>, anyhow::Error> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("cannot read ingredient list {}", path.display()))?;

    parse_ingredients(&raw).with_context(|| format!("invalid ingredient list {}", path.display()))
}

fn parse_ingredients(raw: &str) -> Result<Vec<IngredientEntry>, serde_json::Error> {
    let lines: Vec<IngredientLine> = serde_json::from_str(raw)?;
    Ok(lines.into_iter().map(IngredientEntry::from).collect())
}
