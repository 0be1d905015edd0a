pub mod auth;
pub mod cors;

pub use auth::{AuthMiddleware, CurrentUserId};
pub use cors::create_cors;
