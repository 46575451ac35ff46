//! Auth HTTP endpoints
//!
//! Server-rendered pages and form handlers:
//! - GET / - Redirect to the homepage
//! - GET /homepage - Landing page
//! - GET /login, GET /signup - Forms (signed-in users go straight to /userPage)
//! - POST /login, POST /signup - Urlencoded form submissions
//! - GET /userPage - Current user, or redirect to /login
//! - GET /logout - Clear the session cookie
//! - GET /health - Liveness and store health

use axum::{
    Form, Json, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use std::sync::Arc;

use crate::core::auth::jwt::Session;
use crate::core::auth::service::{AuthError, AuthOutcome, AuthService, LoginRequest, SignupRequest};
use crate::ui::{RenderError, TemplateRenderer, View, ViewData};

/// Name of the session cookie
pub const SESSION_COOKIE_NAME: &str = "SimpleValidationApp";

const INTERNAL_ERROR_PAGE: &str =
    "<!DOCTYPE html><html><body><h1>Something went wrong</h1><p>Please try again later.</p></body></html>";

/// Auth API state containing the auth service and page renderer
#[derive(Clone)]
pub struct AuthApiState {
    pub auth_service: AuthService,
    pub renderer: Arc<dyn TemplateRenderer>,
}

impl AuthApiState {
    fn render(&self, view: View, data: &ViewData) -> Result<Html<String>, PageError> {
        Ok(Html(self.renderer.render(view, data)?))
    }

    fn session(&self, jar: &CookieJar) -> Session {
        self.auth_service
            .session(jar.get(SESSION_COOKIE_NAME).map(|cookie| cookie.value()))
    }
}

/// Failure while serving a page
///
/// Details are logged; the client only ever sees a generic 500 page.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        tracing::error!("Request failed: {}", self);

        (StatusCode::INTERNAL_SERVER_ERROR, Html(INTERNAL_ERROR_PAGE)).into_response()
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub store: &'static str,
}

/// Create the auth API router
pub fn auth_api_router(state: AuthApiState) -> Router {
    let state = Arc::new(state);

    Router::new()
        .route("/", get(root_handler))
        .route("/homepage", get(homepage_handler))
        .route("/login", get(login_page_handler).post(login_handler))
        .route("/signup", get(signup_page_handler).post(signup_handler))
        .route("/userPage", get(user_page_handler))
        .route("/logout", get(logout_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Session cookie carrying a signed token
pub fn session_cookie(token: String) -> Cookie<'static> {
    base_cookie(token)
}

/// Cookie that clears the session
///
/// Built from the same base as `session_cookie` so the browser matches and
/// drops the stored one.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = base_cookie(String::new());
    cookie.make_removal();
    cookie
}

fn base_cookie(value: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, value))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build()
}

/// GET /
async fn root_handler() -> Redirect {
    Redirect::to("/homepage")
}

/// GET /homepage
async fn homepage_handler(
    State(state): State<Arc<AuthApiState>>,
) -> Result<Html<String>, PageError> {
    state.render(View::Homepage, &ViewData::default())
}

/// GET /login
async fn login_page_handler(
    State(state): State<Arc<AuthApiState>>,
    jar: CookieJar,
) -> Result<Response, PageError> {
    if state.session(&jar).is_valid() {
        return Ok(Redirect::to("/userPage").into_response());
    }

    Ok(state.render(View::Login, &ViewData::default())?.into_response())
}

/// GET /signup
async fn signup_page_handler(
    State(state): State<Arc<AuthApiState>>,
    jar: CookieJar,
) -> Result<Response, PageError> {
    if state.session(&jar).is_valid() {
        return Ok(Redirect::to("/userPage").into_response());
    }

    Ok(state.render(View::Signup, &ViewData::default())?.into_response())
}

/// POST /signup
/// Register a new user and start a session
async fn signup_handler(
    State(state): State<Arc<AuthApiState>>,
    jar: CookieJar,
    Form(request): Form<SignupRequest>,
) -> Result<Response, PageError> {
    tracing::info!("Signup attempt for email: {}", request.email);

    let outcome = state.auth_service.signup(request).await?;

    respond(&state, jar, View::Signup, outcome)
}

/// POST /login
/// Check credentials and start a session
async fn login_handler(
    State(state): State<Arc<AuthApiState>>,
    jar: CookieJar,
    Form(request): Form<LoginRequest>,
) -> Result<Response, PageError> {
    tracing::info!("Login attempt for email: {}", request.email);

    let outcome = state.auth_service.login(request).await?;

    respond(&state, jar, View::Login, outcome)
}

/// GET /userPage
async fn user_page_handler(
    State(state): State<Arc<AuthApiState>>,
    jar: CookieJar,
) -> Result<Response, PageError> {
    let Session::Valid(claims) = state.session(&jar) else {
        return Ok(Redirect::to("/login").into_response());
    };

    let data = ViewData::for_user(claims.username, claims.email);

    Ok(state.render(View::UserPage, &data)?.into_response())
}

/// GET /logout
async fn logout_handler(jar: CookieJar) -> (CookieJar, Redirect) {
    tracing::debug!("Logout request");

    (jar.add(removal_cookie()), Redirect::to("/homepage"))
}

/// GET /health
async fn health_handler(State(state): State<Arc<AuthApiState>>) -> impl IntoResponse {
    match state.auth_service.store().health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok",
                store: "ok",
            }),
        ),
        Err(e) => {
            tracing::warn!("Store health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "degraded",
                    store: "unavailable",
                }),
            )
        }
    }
}

/// Re-render the form with errors, or set the session cookie and redirect
fn respond(
    state: &AuthApiState,
    jar: CookieJar,
    form: View,
    outcome: AuthOutcome,
) -> Result<Response, PageError> {
    match outcome {
        AuthOutcome::FormError(result) => {
            let page = state.render(form, &ViewData::from(result))?;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
        }
        AuthOutcome::Authenticated(user) => {
            let token = state.auth_service.issue_session(&user)?;

            tracing::info!("Session started for user {} via {}", user.id, form);

            Ok((jar.add(session_cookie(token)), Redirect::to("/userPage")).into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_extra::extract::cookie::Expiration;

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("token123".to_string());

        assert_eq!(cookie.name(), SESSION_COOKIE_NAME);
        assert_eq!(cookie.value(), "token123");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert!(cookie.max_age().is_none());
    }

    #[test]
    fn test_removal_cookie_matches_session_cookie() {
        let issued = session_cookie("token123".to_string());
        let removal = removal_cookie();

        assert_eq!(removal.name(), issued.name());
        assert_eq!(removal.path(), issued.path());
        assert_eq!(removal.http_only(), issued.http_only());
        assert_eq!(removal.secure(), issued.secure());
        assert_eq!(removal.same_site(), issued.same_site());
        assert_eq!(removal.domain(), issued.domain());
    }

    #[test]
    fn test_removal_cookie_expires_immediately() {
        let removal = removal_cookie();

        assert_eq!(removal.value(), "");
        assert_eq!(removal.max_age().map(|age| age.whole_seconds()), Some(0));
        assert!(matches!(removal.expires(), Some(Expiration::DateTime(_))));
    }

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: "ok",
            store: "ok",
        };
        let json = serde_json::to_string(&response).unwrap();

        assert_eq!(json, r#"{"status":"ok","store":"ok"}"#);
    }
}
