use crate::error::ApiError;
use crate::models::{ErrorMessage, Hero};
use crate::routes;
use crate::state::AppState;
use axum::{body::Bytes, extract::State, http::StatusCode};

/// POST /hero handler - Store a hero
///
/// Overwrites any hero already stored under the same id. The route is
/// wrapped by the JSON gate, so bodies reaching this point are normally
/// valid; they are decoded again rather than trusted.
#[utoipa::path(
    post,
    path = routes::HERO,
    request_body = Hero,
    responses(
        (status = 200, description = "Hero stored"),
        (status = 400, description = "Unreadable, malformed, or invalid body", body = ErrorMessage),
        (status = 500, description = "Storage error", body = ErrorMessage)
    ),
    tag = "heroes"
)]
pub async fn create_hero_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let hero = Hero::from_json(&body).map_err(|err| {
        tracing::debug!("Unable to decode hero: {}", err);
        ApiError::InvalidBody("unable to unmarshall body to structure".to_string())
    })?;

    state.heroes.create_hero(&hero.id, &hero.name).await?;

    tracing::info!("Successfully stored hero with id: {}", hero.id);
    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{failing_state, memory_state, send, test_app};
    use axum::http::Method;

    #[tokio::test]
    async fn test_create_endpoint_success() {
        let state = memory_state();
        let app = test_app(state.clone());

        let (status, body) = send(
            &app,
            Method::POST,
            routes::HERO,
            Some(r#"{"id":"1","name":"Batman"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
        assert_eq!(
            state.heroes.get_hero("1").await.unwrap(),
            Hero::new("1", "Batman")
        );
    }

    #[tokio::test]
    async fn test_create_endpoint_is_idempotent() {
        let state = memory_state();
        let app = test_app(state.clone());
        let payload = r#"{"id":"1","name":"Batman"}"#;

        let (first, _) = send(&app, Method::POST, routes::HERO, Some(payload)).await;
        let (second, _) = send(&app, Method::POST, routes::HERO, Some(payload)).await;

        assert_eq!(first, StatusCode::OK);
        assert_eq!(second, StatusCode::OK);
        assert_eq!(
            state.heroes.list_heroes().await.unwrap(),
            vec![Hero::new("1", "Batman")]
        );
    }

    #[tokio::test]
    async fn test_create_endpoint_invalid_json() {
        let state = memory_state();
        let app = test_app(state.clone());

        let (status, body) = send(&app, Method::POST, routes::HERO, Some("{invalid json}")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: ErrorMessage = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.message, "unable to unmarshall body to structure");
        assert!(state.heroes.list_heroes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_endpoint_array_body() {
        let state = memory_state();
        let app = test_app(state.clone());

        let payload = r#"["1","Batman"]"#;
        let (status, _) = send(&app, Method::POST, routes::HERO, Some(payload)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(state.heroes.list_heroes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_endpoint_invalid_hero() {
        let app = test_app(memory_state());

        for payload in [
            r#"{"id":"","name":"Batman"}"#,
            r#"{"id":"1","name":""}"#,
            r#"{}"#,
        ] {
            let (status, body) = send(&app, Method::POST, routes::HERO, Some(payload)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "payload {}", payload);
            let error: ErrorMessage = serde_json::from_slice(&body).unwrap();
            assert_eq!(error.message, "data in json are not valid");
        }
    }

    #[tokio::test]
    async fn test_create_endpoint_id_with_separator() {
        let app = test_app(memory_state());

        let (status, _) = send(
            &app,
            Method::POST,
            routes::HERO,
            Some(r#"{"id":"1.5","name":"Half"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_endpoint_backend_down() {
        let app = test_app(failing_state());

        let (status, _) = send(
            &app,
            Method::POST,
            routes::HERO,
            Some(r#"{"id":"1","name":"Batman"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
