//! Account handlers
//!
//! Profile read, multipart profile update (username, email, optional
//! picture), and authenticated password change.

use axum::{
    extract::{Multipart, State},
    Json,
};
use blog_service::dto::{
    AccountResponse, ChangePasswordRequest, MessageResponse, UpdateAccountRequest,
};
use blog_service::AccountService;
use validator::Validate;

use crate::extractors::{AuthSession, ValidatedJson};
use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

/// The authenticated user's profile (form prefill)
///
/// GET /account
pub async fn get_account(
    State(state): State<AppState>,
    auth: AuthSession,
) -> ApiResult<Json<AccountResponse>> {
    let service = AccountService::new(state.service_context());
    let user = service.get_account(auth.user_id).await?;
    Ok(Json(AccountResponse::from(&user)))
}

/// The parsed multipart profile form
struct AccountForm {
    request: UpdateAccountRequest,
    picture: Option<Vec<u8>>,
}

async fn read_account_form(mut multipart: Multipart) -> Result<AccountForm, ApiError> {
    let mut username = None;
    let mut email = None;
    let mut picture = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::invalid_body(e.to_string()))?
    {
        match field.name() {
            Some("username") => {
                username = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::invalid_body(e.to_string()))?,
                );
            }
            Some("email") => {
                email = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::invalid_body(e.to_string()))?,
                );
            }
            Some("picture") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::invalid_body(e.to_string()))?;
                // Browsers submit an empty part when no file was chosen
                if !bytes.is_empty() {
                    picture = Some(bytes.to_vec());
                }
            }
            _ => {}
        }
    }

    let request = UpdateAccountRequest {
        username: username.ok_or_else(|| ApiError::invalid_body("username field is required"))?,
        email: email.ok_or_else(|| ApiError::invalid_body("email field is required"))?,
    };
    request.validate()?;

    Ok(AccountForm { request, picture })
}

/// Update profile, optionally replacing the avatar
///
/// POST /account (multipart/form-data: username, email, picture?)
pub async fn update_account(
    State(state): State<AppState>,
    auth: AuthSession,
    multipart: Multipart,
) -> ApiResult<Json<AccountResponse>> {
    let form = read_account_form(multipart).await?;

    let service = AccountService::new(state.service_context());
    let user = service
        .update_profile(auth.user_id, form.request, form.picture)
        .await?;

    Ok(Json(AccountResponse::from(&user)))
}

/// Change the authenticated user's password
///
/// POST /account/password
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthSession,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let service = AccountService::new(state.service_context());
    service.change_password(auth.user_id, request).await?;

    Ok(Json(MessageResponse::new(
        "You have successfully updated your password!",
    )))
}
