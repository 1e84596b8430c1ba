use crate::error::ApiError;
use crate::extract::HeroId;
use crate::models::ErrorMessage;
use crate::routes;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode};

/// DELETE /hero/{id} handler - Remove one hero
#[utoipa::path(
    delete,
    path = routes::HERO_ITEM,
    params(
        ("id" = String, Path, description = "Numeric hero id")
    ),
    responses(
        (status = 204, description = "Hero deleted"),
        (status = 404, description = "Nothing to delete", body = ErrorMessage),
        (status = 500, description = "Storage error", body = ErrorMessage)
    ),
    tag = "heroes"
)]
pub async fn delete_hero_handler(
    State(state): State<AppState>,
    id: HeroId,
) -> Result<StatusCode, ApiError> {
    state.heroes.delete_hero(id.as_str()).await?;

    tracing::info!("Deleted hero with id: {}", id.as_str());
    Ok(StatusCode::NO_CONTENT)
}
