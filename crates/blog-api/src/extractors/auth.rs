//! Session authentication extractors
//!
//! The session is a signed token carried in an HttpOnly cookie. The
//! required extractor gates login-only routes before the handler body runs;
//! the optional one backs anonymous-only routes and treats a stale or
//! tampered cookie the same as no cookie at all.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::CookieJar;
use blog_core::Id;

use crate::response::ApiError;
use crate::state::AppState;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "session";

/// Authenticated user extracted from the session cookie
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// User ID bound to the session token
    pub user_id: Id,
}

impl AuthSession {
    /// Create a new AuthSession
    pub fn new(user_id: Id) -> Self {
        Self { user_id }
    }
}

fn verify_cookie(jar: &CookieJar, state: &AppState) -> Option<AuthSession> {
    let cookie = jar.get(SESSION_COOKIE)?;

    match state.tokens().verify_session(cookie.value()) {
        Ok(user_id) => Some(AuthSession::new(user_id)),
        Err(e) => {
            tracing::debug!(error = %e, "Session cookie did not verify");
            None
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthSession
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::MissingAuth)?;

        let app_state = AppState::from_ref(state);

        verify_cookie(&jar, &app_state).ok_or(ApiError::MissingAuth)
    }
}

/// Optional authenticated user
///
/// Resolves to `None` when no session cookie is present or when the cookie
/// no longer verifies (expired or tampered); a browser holding a dead
/// cookie is simply anonymous.
#[derive(Debug, Clone)]
pub struct OptionalAuthSession(pub Option<AuthSession>);

impl OptionalAuthSession {
    /// Whether a valid session is present
    #[inline]
    pub fn is_authenticated(&self) -> bool {
        self.0.is_some()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for OptionalAuthSession
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::MissingAuth)?;

        let app_state = AppState::from_ref(state);

        Ok(OptionalAuthSession(verify_cookie(&jar, &app_state)))
    }
}
