// ============================
// crates/backend-lib/src/router.rs
// ============================
//! HTTP router for the member API.
use crate::handlers::members;
use crate::member::MemberStore;
use crate::middleware::require_member;
use crate::AppState;
use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Create the member API router.
///
/// Routes that need an authenticated member are grouped and wrapped in
/// `require_member` at registration time; the rest are open.
pub fn create_router<S: MemberStore + 'static>(state: Arc<AppState<S>>) -> Router {
    let authenticated = Router::new()
        .route("/api/v1/members/me", get(members::get_me::<S>))
        .route(
            "/api/v1/members/me/password",
            patch(members::change_password::<S>),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_member::<S>,
        ));

    let open = Router::new().route("/api/v1/members", post(members::register::<S>));

    open.merge(authenticated)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
