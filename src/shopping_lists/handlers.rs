use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::{info, instrument};

use super::dto::{
    CreateShoppingListRequest, DeleteQuery, FromRecipesRequest, ShoppingListsResponse,
    UpdateShoppingListRequest,
};
use super::services;
use crate::http::{internal, not_found, IdResponse, OkResponse};
use crate::state::AppState;

pub fn shopping_list_routes() -> Router<AppState> {
    Router::new()
        .route("/shopping_lists", get(list_shopping_lists))
        .route("/shopping_list/create", post(create_shopping_list))
        .route("/shopping_list/update", post(update_shopping_list))
        .route("/shopping_list/delete", delete(delete_shopping_list))
        .route("/shopping_list/from_recipes", post(create_from_recipes))
}

#[instrument(skip(state, body), fields(name = %body.name))]
pub async fn create_shopping_list(
    State(state): State<AppState>,
    Json(body): Json<CreateShoppingListRequest>,
) -> Result<Json<IdResponse>, (StatusCode, String)> {
    let id = state
        .shopping_lists
        .create(&body.name, &body.items)
        .await
        .map_err(internal)?;
    info!(%id, "shopping list created");
    Ok(Json(IdResponse { id }))
}

#[instrument(skip(state))]
pub async fn list_shopping_lists(
    State(state): State<AppState>,
) -> Result<Json<ShoppingListsResponse>, (StatusCode, String)> {
    let lists = state.shopping_lists.find_all().await.map_err(internal)?;
    Ok(Json(ShoppingListsResponse { lists }))
}

#[instrument(skip(state, body), fields(id = %body.id))]
pub async fn update_shopping_list(
    State(state): State<AppState>,
    Json(body): Json<UpdateShoppingListRequest>,
) -> Result<Json<OkResponse>, (StatusCode, String)> {
    let found = state
        .shopping_lists
        .update_items(body.id, &body.items)
        .await
        .map_err(internal)?;
    if !found {
        return Err(not_found("Shopping list"));
    }
    Ok(Json(OkResponse::default()))
}

#[instrument(skip(state))]
pub async fn delete_shopping_list(
    State(state): State<AppState>,
    Query(q): Query<DeleteQuery>,
) -> Result<Json<OkResponse>, (StatusCode, String)> {
    state.shopping_lists.delete(q.id).await.map_err(internal)?;
    Ok(Json(OkResponse::default()))
}

#[instrument(skip(state, body), fields(name = %body.name))]
pub async fn create_from_recipes(
    State(state): State<AppState>,
    Json(body): Json<FromRecipesRequest>,
) -> Result<Json<IdResponse>, (StatusCode, String)> {
    let id = services::create_from_recipes(&state, &body.name, &body.recipe_ids)
        .await
        .map_err(internal)?;
    Ok(Json(IdResponse { id }))
}
