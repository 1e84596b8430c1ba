use utoipa::OpenApi;

use crate::handlers;
use crate::models::{ErrorMessage, Hero, StatusResponse};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "heroes API",
        version = "1.0.0",
        description = "CRUD over heroes stored in a key-value backend"
    ),
    paths(
        handlers::status::status_handler,
        handlers::list::list_heroes_handler,
        handlers::get::get_hero_handler,
        handlers::create::create_hero_handler,
        handlers::delete::delete_hero_handler
    ),
    components(
        schemas(
            Hero,
            StatusResponse,
            ErrorMessage
        )
    ),
    tags(
        (name = "status", description = "Backend liveness"),
        (name = "heroes", description = "Hero operations")
    )
)]
pub struct ApiDoc;
