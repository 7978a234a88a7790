use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use tracing::{instrument, warn};

use super::services;
use crate::http::{internal, OkResponse};
use crate::shopping_lists::dto::UpdateShoppingListRequest;
use crate::state::AppState;

pub fn notion_routes() -> Router<AppState> {
    Router::new().route("/notion/sync", post(sync_list))
}

#[instrument(skip(state, body), fields(id = %body.id))]
pub async fn sync_list(
    State(state): State<AppState>,
    Json(body): Json<UpdateShoppingListRequest>,
) -> Result<Json<OkResponse>, (StatusCode, String)> {
    let Some(page_sync) = state.page_sync.as_deref() else {
        warn!("notion sync requested but not configured");
        return Err((
            StatusCode::BAD_REQUEST,
            "Notion sync is not configured".into(),
        ));
    };

    services::sync(
        state.notion_pages.as_ref(),
        page_sync,
        body.id,
        &body.name,
        &body.items,
    )
    .await
    .map_err(internal)?;
    Ok(Json(OkResponse::default()))
}
