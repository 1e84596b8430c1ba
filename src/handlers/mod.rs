pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod status;

pub use create::create_hero_handler;
pub use delete::delete_hero_handler;
pub use get::get_hero_handler;
pub use list::list_heroes_handler;
pub use status::status_handler;
