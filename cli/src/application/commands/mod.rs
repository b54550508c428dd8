use larder_core::domain::extraction::entities::Extraction;

use crate::{application::state::AppState, args::Command};

pub mod recipe;
pub mod scan;
pub mod shopping_list;

pub async fn dispatch(state: &AppState) -> Result<Extraction, anyhow::Error> {
    match &state.args.command {
        Command::Scan { image, mime_type } => scan::scan(state, image, mime_type.clone()).await,
        Command::Recipe { ingredients } => recipe::recipe(state, ingredients.clone()).await,
        Command::ShoppingList { pantry, recipe } => {
            shopping_list::shopping_list(state, pantry, recipe).await
        }
    }
}
