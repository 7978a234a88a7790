use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::AddManualRequest;
use super::repo_types::Recipe;
use crate::extract::error::DispatchError;
use crate::refinement::RefinementJob;
use crate::state::AppState;

fn schedule_refinement(state: &AppState, recipe_id: Uuid, recipe: &Recipe) {
    state.refinements.enqueue(RefinementJob {
        recipe_id,
        dish_name: recipe.title.clone(),
        measured_ingredients: recipe.measured_ingredients.clone(),
    });
}

/// Extracts or synthesizes a recipe, persists it and returns its id.
/// Generic-scraper results are queued for refinement after they are stored.
#[instrument(skip(state))]
pub async fn add_auto(state: &AppState, input: &str) -> Result<Uuid, DispatchError> {
    let extraction = state.dispatcher.dispatch(input).await?;
    let recipe = extraction.recipe;

    let id = state
        .recipes
        .insert(&recipe)
        .await
        .map_err(DispatchError::Store)?;
    info!(%id, title = %recipe.title, "recipe stored");

    if extraction.needs_refinement {
        schedule_refinement(state, id, &recipe);
    }
    Ok(id)
}

/// The entered ingredient lines are stored as measured ingredients and refined later.
#[instrument(skip(state, req), fields(title = %req.title))]
pub async fn add_manual(state: &AppState, req: AddManualRequest) -> anyhow::Result<Uuid> {
    let recipe = Recipe {
        id: None,
        title: req.title.trim().to_string(),
        url: String::new(),
        image_url: None,
        ingredients: Vec::new(),
        measured_ingredients: req.ingredients,
        cuisine: String::new(),
        instructions: req.instructions,
    };

    let id = state.recipes.insert(&recipe).await?;
    info!(%id, "manual recipe stored");
    schedule_refinement(state, id, &recipe);
    Ok(id)
}

/// Returns false when no recipe has `id`; nothing is scheduled then.
#[instrument(skip(state, recipe))]
pub async fn update(state: &AppState, id: Uuid, recipe: Recipe) -> anyhow::Result<bool> {
    if !state.recipes.update(id, &recipe).await? {
        return Ok(false);
    }
    info!(%id, "recipe updated");
    schedule_refinement(state, id, &recipe);
    Ok(true)
}
