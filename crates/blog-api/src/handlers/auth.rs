//! Authentication handlers
//!
//! Registration, login, and logout. Login establishes the session cookie;
//! logout clears it (idempotently). All three pages are anonymous-only and
//! bounce already-authenticated callers back to the home listing.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use blog_service::dto::{LoginRequest, LoginResponse, MessageResponse, RegisterRequest};
use blog_service::{dto::PublicUserResponse, AuthService};
use serde::Deserialize;

use crate::extractors::{OptionalAuthSession, ValidatedJson, SESSION_COOKIE};
use crate::response::{ApiError, ApiResult, Created, NoContent, SeeOther};
use crate::state::AppState;

/// Build the session cookie carrying a freshly issued token. A max-age is
/// only set for remembered sessions; otherwise the cookie dies with the
/// browser.
fn session_cookie(token: &str, max_age_secs: Option<i64>) -> Result<Cookie<'static>, ApiError> {
    let mut raw = format!("{SESSION_COOKIE}={token}; HttpOnly; Path=/; SameSite=Lax");
    if let Some(secs) = max_age_secs {
        raw.push_str(&format!("; Max-Age={secs}"));
    }
    Cookie::parse(raw).map_err(ApiError::internal)
}

/// An immediately expiring cookie that clears the session
fn expired_session_cookie() -> Result<Cookie<'static>, ApiError> {
    Cookie::parse(format!(
        "{SESSION_COOKIE}=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0"
    ))
    .map_err(ApiError::internal)
}

/// Registration page prefill
///
/// GET /register
pub async fn register_page(session: OptionalAuthSession) -> Response {
    if session.is_authenticated() {
        SeeOther::home().into_response()
    } else {
        NoContent.into_response()
    }
}

/// Create a new account
///
/// POST /register
pub async fn register(
    State(state): State<AppState>,
    session: OptionalAuthSession,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<Response> {
    if session.is_authenticated() {
        return Ok(SeeOther::home().into_response());
    }

    let service = AuthService::new(state.service_context());
    let user = service.register(request).await?;

    let body = MessageResponse::new(format!("Account created for {}!", user.username));
    Ok(Created(Json(body)).into_response())
}

/// The optional post-login destination
#[derive(Debug, Deserialize, Default)]
pub struct NextParams {
    pub next: Option<String>,
}

/// Login page prefill
///
/// GET /login
pub async fn login_page(session: OptionalAuthSession) -> Response {
    if session.is_authenticated() {
        SeeOther::home().into_response()
    } else {
        NoContent.into_response()
    }
}

/// Authenticate and establish a session
///
/// POST /login (`?next=` is honored only for same-origin relative paths)
pub async fn login(
    State(state): State<AppState>,
    session: OptionalAuthSession,
    jar: CookieJar,
    Query(params): Query<NextParams>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Response> {
    if session.is_authenticated() {
        return Ok(SeeOther::home().into_response());
    }

    let service = AuthService::new(state.service_context());
    let authenticated = service.login(request, params.next.as_deref()).await?;

    let cookie = session_cookie(&authenticated.token, authenticated.cookie_max_age_secs)?;
    let body = LoginResponse {
        message: format!("Welcome {}!", authenticated.user.username),
        user: PublicUserResponse::from(&authenticated.user),
        redirect_to: authenticated.redirect_to,
    };

    Ok((jar.add(cookie), Json(body)).into_response())
}

/// Clear the session; a no-op when already anonymous
///
/// GET,POST /logout
pub async fn logout(jar: CookieJar) -> ApiResult<Response> {
    let jar = jar.add(expired_session_cookie()?);
    Ok((jar, SeeOther::home()).into_response())
}
