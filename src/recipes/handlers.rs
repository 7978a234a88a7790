use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, instrument, warn};
use uuid::Uuid;

use super::dto::{AddAutoRequest, AddManualRequest, RecipeListResponse, UpdateRecipeRequest};
use super::repo_types::Recipe;
use super::services;
use crate::extract::error::DispatchError;
use crate::http::{internal, not_found, IdResponse, OkResponse};
use crate::state::AppState;

pub fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(list_recipes))
        .route("/recipe/:id", get(get_recipe).delete(delete_recipe))
        .route("/recipe/add_auto", post(add_auto))
        .route("/recipe/add_manual", post(add_manual))
        .route("/recipe/update", post(update_recipe))
}

fn dispatch_status(e: DispatchError) -> (StatusCode, String) {
    match e {
        DispatchError::NotGenerated => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "Failed to generate recipe".into(),
        ),
        DispatchError::Store(e) => internal(e),
        other => {
            warn!(error = %other, "recipe extraction failed");
            (StatusCode::BAD_REQUEST, other.to_string())
        }
    }
}

#[instrument(skip(state, body))]
pub async fn add_auto(
    State(state): State<AppState>,
    Json(body): Json<AddAutoRequest>,
) -> Result<Json<IdResponse>, (StatusCode, String)> {
    let input = body.request.trim();
    if input.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "request must not be empty".into()));
    }
    let id = services::add_auto(&state, input)
        .await
        .map_err(dispatch_status)?;
    Ok(Json(IdResponse { id }))
}

#[instrument(skip(state))]
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Option<Recipe>>, (StatusCode, String)> {
    let recipe = state.recipes.find_by_id(id).await.map_err(internal)?;
    Ok(Json(recipe))
}

#[instrument(skip(state))]
pub async fn list_recipes(
    State(state): State<AppState>,
) -> Result<Json<RecipeListResponse>, (StatusCode, String)> {
    let recipes = state.recipes.find_all().await.map_err(internal)?;
    Ok(Json(RecipeListResponse { recipes }))
}

#[instrument(skip(state))]
pub async fn delete_recipe(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<OkResponse>, (StatusCode, String)> {
    state.recipes.delete(id).await.map_err(internal)?;
    Ok(Json(OkResponse::default()))
}

#[instrument(skip(state, body))]
pub async fn add_manual(
    State(state): State<AppState>,
    Json(body): Json<AddManualRequest>,
) -> Result<Json<IdResponse>, (StatusCode, String)> {
    if body.title.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "title must not be empty".into()));
    }
    if body.ingredients.iter().all(|i| i.trim().is_empty()) {
        return Err((StatusCode::BAD_REQUEST, "ingredients must not be empty".into()));
    }

    let id = services::add_manual(&state, body).await.map_err(internal)?;
    Ok(Json(IdResponse { id }))
}

#[instrument(skip(state, body), fields(id = %body.id))]
pub async fn update_recipe(
    State(state): State<AppState>,
    Json(body): Json<UpdateRecipeRequest>,
) -> Result<Json<OkResponse>, (StatusCode, String)> {
    if !body.recipe.is_persistable() {
        return Err((
            StatusCode::BAD_REQUEST,
            "title and measured_ingredients must not be empty".into(),
        ));
    }

    match services::update(&state, body.id, body.recipe).await {
        Ok(true) => Ok(Json(OkResponse::default())),
        Ok(false) => Err(not_found("Recipe")),
        Err(e) => {
            error!(error = %e, id = %body.id, "update recipe failed");
            Err(internal(e))
        }
    }
}
