mod auth;
mod cors;
mod error_handler;

pub use auth::{TOKEN_COOKIE, auth_middleware, authenticate, extract_token, require_admin};
pub use cors::{cors_layer, reject_disallowed_origin};
pub use error_handler::{handle_panic, render_errors};
