use larder_core::domain::extraction::{
    entities::Extraction, ports::ExtractionService, value_objects::GenerateRecipeInput,
};

use crate::application::state::AppState;

pub async fn recipe(
    state: &AppState,
    ingredients: Vec<String>,
) -> Result<Extraction, anyhow::Error> {
    let extraction = state
        .service
        .generate_recipe(GenerateRecipeInput { ingredients })
        .await?;

    Ok(extraction)
}
