// Route path constants - single source of truth for all API paths

pub const STATUS: &str = "/status";
pub const HEROES: &str = "/heroes";
pub const HERO: &str = "/hero";
pub const HERO_ITEM: &str = "/hero/{id}";

pub const SWAGGER_UI: &str = "/swagger-ui";
pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";
