use crate::error::ApiError;
use crate::models::{ErrorMessage, Hero};
use crate::routes;
use crate::state::AppState;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// GET /heroes handler - List every hero
///
/// Returns 204 with no body when there are none.
#[utoipa::path(
    get,
    path = routes::HEROES,
    responses(
        (status = 200, description = "All heroes", body = [Hero]),
        (status = 204, description = "No heroes stored"),
        (status = 500, description = "Storage error", body = ErrorMessage)
    ),
    tag = "heroes"
)]
pub async fn list_heroes_handler(State(state): State<AppState>) -> Result<Response, ApiError> {
    let heroes = state.heroes.list_heroes().await?;

    if heroes.is_empty() {
        tracing::info!("No heroes to list");
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    tracing::info!("Listed {} heroes", heroes.len());
    Ok((StatusCode::OK, Json(heroes)).into_response())
}
