pub mod auth_service;
pub mod user_service;

pub use auth_service::*;
pub use user_service::*;
