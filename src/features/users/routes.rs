use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::features::users::handlers::user_handler;
use crate::features::users::services::UserService;

/// Create routes for the users feature
///
/// Note: This feature requires authentication
pub fn routes(service: Arc<UserService>) -> Router {
    Router::new()
        .route("/api/users/me", get(user_handler::get_me))
        .route("/api/users/{id}/role", patch(user_handler::update_role))
        .with_state(service)
}
