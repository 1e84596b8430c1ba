use crate::error::ApiError;
use crate::extract::HeroId;
use crate::models::{ErrorMessage, Hero};
use crate::routes;
use crate::state::AppState;
use axum::{
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

/// GET /hero/{id} handler - Retrieve one hero
///
/// A record that was fetched but cannot be encoded is reported as 501 so it
/// is never confused with a failed fetch.
#[utoipa::path(
    get,
    path = routes::HERO_ITEM,
    params(
        ("id" = String, Path, description = "Numeric hero id")
    ),
    responses(
        (status = 200, description = "Hero found", body = Hero),
        (status = 404, description = "Hero not found", body = ErrorMessage),
        (status = 500, description = "Storage error", body = ErrorMessage),
        (status = 501, description = "Hero could not be encoded", body = ErrorMessage)
    ),
    tag = "heroes"
)]
pub async fn get_hero_handler(
    State(state): State<AppState>,
    id: HeroId,
) -> Result<Response, ApiError> {
    let hero = state.heroes.get_hero(id.as_str()).await?;
    let body = serde_json::to_vec(&hero)?;

    tracing::info!("Successfully retrieved hero with id: {}", hero.id);
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response())
}
