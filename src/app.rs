//! Application assembly
//!
//! Wires the auth service, renderer and static files into a single router.

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::core::auth::{AuthApiState, AuthService, JwtConfig, JwtService, PasswordHasher, auth_api_router};
use crate::core::db::UserStore;
use crate::ui::HtmlRenderer;

/// Build the shared request state from a signing secret and a user store
pub fn build_state(secret: &str, session_ttl_minutes: i64, store: Arc<dyn UserStore>) -> AuthApiState {
    let jwt_service = JwtService::new(JwtConfig::new(secret).expiration(session_ttl_minutes));
    let auth_service = AuthService::new(store, PasswordHasher::new(), jwt_service);

    AuthApiState {
        auth_service,
        renderer: Arc::new(HtmlRenderer::new()),
    }
}

/// Build the full application router
///
/// Unmatched paths fall through to the static files in `public_dir`.
pub fn app_router(state: AuthApiState, public_dir: impl AsRef<Path>) -> Router {
    auth_api_router(state)
        .fallback_service(ServeDir::new(public_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
}
