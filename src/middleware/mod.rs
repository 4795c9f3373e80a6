mod auth;
mod error_handler;

pub use auth::{AuthenticatedUser, require_main};
pub use error_handler::log_errors;
