use axum::{
    Router, middleware,
    routing::{get, patch, post},
};

use crate::auth::{self, AppState};
use crate::complaints;
use crate::middleware::{require_admin, require_auth};
use crate::users;

/// All HTTP routes. Transport layers (CORS, tracing) are added by the binary.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(complaints::health))
        .route("/catalog", get(complaints::get_catalog))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route(
            "/complaints",
            post(complaints::submit_complaint).get(complaints::lookup_complaints),
        )
        .route("/complaints/{id}", get(complaints::get_complaint))
        .route("/complaints/{id}/responses", post(complaints::add_response));

    let user_routes = Router::new()
        .route("/me", get(users::me).patch(users::update_me))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let admin_routes = Router::new()
        .route("/admin/complaints", get(complaints::admin_list))
        .route("/admin/complaints/{id}", patch(complaints::admin_update))
        .route("/admin/stats", get(complaints::admin_stats))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .merge(admin_routes)
        .with_state(state)
}
