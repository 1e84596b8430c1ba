//! Request interceptors shared by the router.

use axum::{
    body::Body,
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;
use crate::models::Hero;

/// Largest create payload the JSON gate will buffer
const MAX_HERO_BODY: usize = 64 * 1024;

/// Record method and path of every inbound request
pub async fn log_request(request: Request, next: Next) -> Response {
    tracing::info!(
        method = %request.method(),
        path = %request.uri().path(),
        "request received"
    );
    next.run(request).await
}

/// Gate for the create route: the body must decode as a valid [`Hero`]
///
/// The buffered body is put back into the request so the handler can read
/// it again.
pub async fn require_valid_hero(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();

    let bytes = match axum::body::to_bytes(body, MAX_HERO_BODY).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::debug!("Unable to read request body: {}", err);
            return reject("unable to read body from request");
        }
    };

    match Hero::from_json(&bytes) {
        Ok(hero) if hero.is_valid() => {}
        Ok(_) => return reject("data in json are not valid"),
        Err(err) => {
            tracing::debug!("Unable to decode hero: {}", err);
            return reject("unable to unmarshall body to structure");
        }
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

fn reject(reason: &str) -> Response {
    ApiError::InvalidBody(reason.to_string()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ErrorMessage;
    use axum::{
        Router,
        body::Bytes,
        http::{Method, StatusCode},
        middleware::from_fn,
        routing::post,
    };
    use tower::ServiceExt;

    // Echoes the body so tests can see what reached the handler
    async fn echo(body: Bytes) -> Bytes {
        body
    }

    async fn gate(body: impl Into<Body>) -> (StatusCode, Bytes) {
        let app = Router::new().route(
            "/hero",
            post(echo).route_layer(from_fn(require_valid_hero)),
        );
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .method(Method::POST)
                    .uri("/hero")
                    .header("content-type", "application/json")
                    .body(body.into())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body)
    }

    fn message(body: &Bytes) -> String {
        serde_json::from_slice::<ErrorMessage>(body).unwrap().message
    }

    #[tokio::test]
    async fn test_valid_hero_reaches_handler_with_body_intact() {
        let payload = r#"{"id":"1","name":"Batman"}"#;
        let (status, body) = gate(payload).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Bytes::from(payload));
    }

    #[tokio::test]
    async fn test_empty_id_is_rejected() {
        let (status, body) = gate(r#"{"id":"","name":"Batman"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message(&body), "data in json are not valid");
    }

    #[tokio::test]
    async fn test_empty_name_is_rejected() {
        let (status, body) = gate(r#"{"id":"1","name":""}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message(&body), "data in json are not valid");
    }

    #[tokio::test]
    async fn test_unparsable_body_is_rejected() {
        let (status, body) = gate("{invalid json}").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message(&body), "unable to unmarshall body to structure");
    }

    #[tokio::test]
    async fn test_array_body_is_rejected() {
        let (status, body) = gate(r#"["1","Batman"]"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message(&body), "unable to unmarshall body to structure");
    }

    #[tokio::test]
    async fn test_other_methods_skip_the_gate() {
        let app = Router::new().route(
            "/hero",
            post(echo).route_layer(from_fn(require_valid_hero)),
        );
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .method(Method::GET)
                    .uri("/hero")
                    .body(Body::from("not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let name = "x".repeat(MAX_HERO_BODY);
        let payload = format!(r#"{{"id":"1","name":"{}"}}"#, name);
        let (status, body) = gate(payload).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message(&body), "unable to read body from request");
    }
}
