use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_doc::ApiDoc;
use crate::handlers::{
    create_hero_handler, delete_hero_handler, get_hero_handler, list_heroes_handler,
    status_handler,
};
use crate::middleware::{log_request, require_valid_hero};
use crate::routes;
use crate::server::ServerSettings;
use crate::state::AppState;

/// Bind every route to its handler and wrap them in the middleware chain
///
/// Outermost first: tracing span, request log, write timeout. The create
/// route additionally passes through the JSON gate.
pub fn router(state: AppState, settings: &ServerSettings) -> Router {
    Router::new()
        .route(routes::STATUS, get(status_handler))
        .route(routes::HEROES, get(list_heroes_handler))
        .route(
            routes::HERO,
            post(create_hero_handler).route_layer(from_fn(require_valid_hero)),
        )
        .route(
            routes::HERO_ITEM,
            get(get_hero_handler).delete(delete_hero_handler),
        )
        .merge(SwaggerUi::new(routes::SWAGGER_UI).url(routes::OPENAPI_JSON, ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(from_fn(log_request))
                .layer(TimeoutLayer::new(settings.write_timeout)),
        )
        .with_state(state)
}
