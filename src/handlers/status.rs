use crate::error::ApiError;
use crate::models::{ErrorMessage, StatusResponse};
use crate::routes;
use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};

/// GET /status handler - Backend liveness
///
/// Pings the storage backend and reports its answer. Purely informational:
/// the other endpoints do not consult it.
#[utoipa::path(
    get,
    path = routes::STATUS,
    responses(
        (status = 200, description = "Backend is reachable", body = StatusResponse),
        (status = 500, description = "Backend is unreachable", body = ErrorMessage)
    ),
    tag = "status"
)]
pub async fn status_handler(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<StatusResponse>), ApiError> {
    let token = state.heroes.status().await?;

    tracing::debug!("Status check passed: {}", token);
    Ok((StatusCode::OK, Json(StatusResponse { redis: token })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{failing_state, memory_state, send, test_app};
    use axum::http::Method;

    #[tokio::test]
    async fn test_status_endpoint_healthy() {
        let app = test_app(memory_state());

        let (status, body) = send(&app, Method::GET, routes::STATUS, None).await;

        assert_eq!(status, StatusCode::OK);
        let response_json: StatusResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(response_json.redis, "PONG");
    }

    #[tokio::test]
    async fn test_status_endpoint_backend_down() {
        let app = test_app(failing_state());

        let (status, body) = send(&app, Method::GET, routes::STATUS, None).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let error: ErrorMessage = serde_json::from_slice(&body).unwrap();
        assert!(!error.message.contains("connection refused"));
    }
}
