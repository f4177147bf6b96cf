pub mod auth;
pub mod cors;

pub use auth::{AuthMiddleware, AuthedUser};
pub use cors::create_cors;
