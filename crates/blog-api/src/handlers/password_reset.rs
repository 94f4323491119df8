//! Password-reset handlers
//!
//! The two-step recovery flow: request an emailed link, then consume the
//! token it carries to set a new password. Both pages are anonymous-only.
//! A relay failure surfaces as an error; the handler never claims success
//! for mail it could not send.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};
use blog_service::dto::{MessageResponse, RequestResetRequest, ResetPasswordRequest};
use blog_service::AuthService;

use crate::extractors::{OptionalAuthSession, ValidatedJson};
use crate::response::{ApiResult, NoContent, SeeOther};
use crate::state::AppState;

/// Reset-request page prefill
///
/// GET /reset_password
pub async fn request_page(session: OptionalAuthSession) -> Response {
    if session.is_authenticated() {
        SeeOther::home().into_response()
    } else {
        NoContent.into_response()
    }
}

/// Request a password-reset email
///
/// POST /reset_password
pub async fn request_reset(
    State(state): State<AppState>,
    session: OptionalAuthSession,
    ValidatedJson(request): ValidatedJson<RequestResetRequest>,
) -> ApiResult<Response> {
    if session.is_authenticated() {
        return Ok(SeeOther::home().into_response());
    }

    let service = AuthService::new(state.service_context());
    service.request_password_reset(request).await?;

    // Deliberately the same response whether or not the account exists
    let body = MessageResponse::new(
        "If an account with that email exists, a reset link has been sent.",
    );
    Ok(Json(body).into_response())
}

/// Validate a reset token before showing the new-password form.
/// An invalid or expired token fails here, sending the caller back to the
/// request flow instead of a form that cannot succeed.
///
/// GET /reset_password/:token
pub async fn reset_page(
    State(state): State<AppState>,
    session: OptionalAuthSession,
    Path(token): Path<String>,
) -> ApiResult<Response> {
    if session.is_authenticated() {
        return Ok(SeeOther::home().into_response());
    }

    state.tokens().verify_password_reset(&token)?;
    Ok(NoContent.into_response())
}

/// Consume a reset token and set the new password
///
/// POST /reset_password/:token
pub async fn reset_password(
    State(state): State<AppState>,
    session: OptionalAuthSession,
    Path(token): Path<String>,
    ValidatedJson(request): ValidatedJson<ResetPasswordRequest>,
) -> ApiResult<Response> {
    if session.is_authenticated() {
        return Ok(SeeOther::home().into_response());
    }

    let service = AuthService::new(state.service_context());
    service.reset_password(&token, request).await?;

    let body = MessageResponse::new("You have successfully updated your password!");
    Ok(Json(body).into_response())
}
