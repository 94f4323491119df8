//! Authentication service
//!
//! Handles user registration, login, and the password-reset token flow.

use blog_common::auth::{hash_password, verify_password};
use blog_common::AppError;
use blog_core::entities::{NewUser, User};
use blog_core::Id;
use tracing::{info, instrument, warn};

use crate::dto::{LoginRequest, RegisterRequest, RequestResetRequest, ResetPasswordRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// A freshly established session: the signed token, how long the cookie
/// should live (None for a browser-session cookie), the user, and the
/// destination to redirect to.
#[derive(Debug)]
pub struct AuthenticatedSession {
    pub token: String,
    pub cookie_max_age_secs: Option<i64>,
    pub user: User,
    pub redirect_to: String,
}

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new user
    ///
    /// The pre-insert existence checks produce friendly errors; the unique
    /// constraints on the users table settle any race between them and the
    /// insert, so two concurrent registrations of the same name resolve to
    /// one success and one duplicate error.
    #[instrument(skip(self, request), fields(username = %request.username, email = %request.email))]
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<User> {
        if self.ctx.user_repo().username_exists(&request.username).await? {
            return Err(ServiceError::App(AppError::DuplicateUsername));
        }

        if self.ctx.user_repo().email_exists(&request.email).await? {
            return Err(ServiceError::App(AppError::DuplicateEmail));
        }

        let password_hash =
            hash_password(&request.password).map_err(|e| ServiceError::internal(e.to_string()))?;

        let new_user = NewUser {
            username: request.username,
            email: request.email,
        };

        let user = self.ctx.user_repo().create(&new_user, &password_hash).await?;

        info!(user_id = %user.id, "User registered successfully");

        Ok(user)
    }

    /// Login with email and password
    ///
    /// Unknown email and wrong password produce the identical
    /// `InvalidCredentials` error so the response never reveals which
    /// field was wrong.
    #[instrument(skip(self, request, next), fields(email = %request.email))]
    pub async fn login(
        &self,
        request: LoginRequest,
        next: Option<&str>,
    ) -> ServiceResult<AuthenticatedSession> {
        let user = self
            .ctx
            .user_repo()
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| {
                warn!("Login failed: user not found");
                ServiceError::App(AppError::InvalidCredentials)
            })?;

        let password_hash = self
            .ctx
            .user_repo()
            .get_password_hash(user.id)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %user.id, "Login failed: no password hash");
                ServiceError::App(AppError::InvalidCredentials)
            })?;

        let is_valid = verify_password(&request.password, &password_hash)
            .map_err(|e| ServiceError::internal(e.to_string()))?;

        if !is_valid {
            warn!(user_id = %user.id, "Login failed: invalid password");
            return Err(ServiceError::App(AppError::InvalidCredentials));
        }

        let token = self
            .ctx
            .tokens()
            .issue_session(user.id, request.remember)
            .map_err(ServiceError::from)?;

        // Only remembered sessions outlive the browser
        let cookie_max_age_secs = request
            .remember
            .then(|| self.ctx.tokens().session_ttl(true));

        info!(user_id = %user.id, remember = request.remember, "User logged in successfully");

        Ok(AuthenticatedSession {
            token,
            cookie_max_age_secs,
            user,
            redirect_to: sanitize_next(next),
        })
    }

    /// Look up the user bound to a verified session
    #[instrument(skip(self))]
    pub async fn get_user(&self, user_id: Id) -> ServiceResult<User> {
        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id.to_string()))
    }

    /// Request a password-reset email.
    ///
    /// An unknown email succeeds without sending anything, so the endpoint
    /// cannot be used to enumerate accounts. A relay failure for a real
    /// recipient surfaces as an error rather than a false success.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn request_password_reset(&self, request: RequestResetRequest) -> ServiceResult<()> {
        let Some(user) = self.ctx.user_repo().find_by_email(&request.email).await? else {
            info!("Password reset requested for unknown email; nothing sent");
            return Ok(());
        };

        let token = self
            .ctx
            .tokens()
            .issue_password_reset(user.id)
            .map_err(ServiceError::from)?;

        let reset_url = format!("{}/reset_password/{token}", self.ctx.base_url());

        self.ctx
            .mailer()
            .send_password_reset(&user.email, &user.username, &reset_url)
            .await
            .map_err(ServiceError::from)?;

        info!(user_id = %user.id, "Password reset email sent");
        Ok(())
    }

    /// Consume a reset token and set a new password.
    ///
    /// The token is not marked used; it keeps verifying until its 30-minute
    /// window closes. A token whose user no longer exists is invalid.
    #[instrument(skip(self, token, request))]
    pub async fn reset_password(
        &self,
        token: &str,
        request: ResetPasswordRequest,
    ) -> ServiceResult<User> {
        let user_id = self
            .ctx
            .tokens()
            .verify_password_reset(token)
            .map_err(ServiceError::from)?;

        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or(ServiceError::App(AppError::TokenInvalid))?;

        let password_hash =
            hash_password(&request.password).map_err(|e| ServiceError::internal(e.to_string()))?;

        self.ctx
            .user_repo()
            .update_password(user.id, &password_hash)
            .await?;

        info!(user_id = %user.id, "Password reset via token");
        Ok(user)
    }
}

/// Clamp a caller-supplied post-login destination to a same-origin relative
/// path. Anything absolute, protocol-relative, or scheme-carrying falls back
/// to the home listing.
pub fn sanitize_next(next: Option<&str>) -> String {
    match next {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains("://")
                && !path.contains('\\') =>
        {
            path.to_string()
        }
        _ => "/".to_string(),
    }
}
