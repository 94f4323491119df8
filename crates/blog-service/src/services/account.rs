//! Account service
//!
//! Handles profile reads, profile updates (including the avatar pipeline),
//! and authenticated password changes.

use blog_common::auth::hash_password;
use blog_common::AppError;
use blog_core::entities::User;
use blog_core::Id;
use tracing::{info, instrument};

use crate::avatar::process_avatar;
use crate::dto::{ChangePasswordRequest, UpdateAccountRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Account service
pub struct AccountService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AccountService<'a> {
    /// Create a new AccountService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Get the authenticated user's account
    #[instrument(skip(self))]
    pub async fn get_account(&self, user_id: Id) -> ServiceResult<User> {
        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id.to_string()))
    }

    /// Update username, email, and optionally the avatar.
    ///
    /// Uniqueness is only re-checked for values that actually changed
    /// (case-exact comparison), so re-submitting the current profile always
    /// succeeds. The row update is a single atomic statement; the old avatar
    /// file is discarded only after it lands.
    #[instrument(skip(self, request, avatar_bytes), fields(username = %request.username))]
    pub async fn update_profile(
        &self,
        user_id: Id,
        request: UpdateAccountRequest,
        avatar_bytes: Option<Vec<u8>>,
    ) -> ServiceResult<User> {
        let mut user = self.get_account(user_id).await?;

        if request.username != user.username
            && self.ctx.user_repo().username_exists(&request.username).await?
        {
            return Err(ServiceError::App(AppError::DuplicateUsername));
        }

        if request.email != user.email && self.ctx.user_repo().email_exists(&request.email).await? {
            return Err(ServiceError::App(AppError::DuplicateEmail));
        }

        let old_avatar = user.avatar_filename.clone();
        let new_avatar = match avatar_bytes {
            Some(bytes) => {
                let processed = process_avatar(&bytes).map_err(ServiceError::from)?;
                Some(self.ctx.avatars().save(&processed).await?)
            }
            None => None,
        };

        let avatar_filename = new_avatar.clone().unwrap_or_else(|| old_avatar.clone());

        self.ctx
            .user_repo()
            .update_profile(user_id, &request.username, &request.email, &avatar_filename)
            .await?;

        if new_avatar.is_some() {
            self.ctx.avatars().remove(&old_avatar).await;
        }

        user.username = request.username;
        user.email = request.email;
        user.avatar_filename = avatar_filename;

        info!(user_id = %user_id, "Account updated");
        Ok(user)
    }

    /// Change the authenticated user's password
    #[instrument(skip(self, request))]
    pub async fn change_password(
        &self,
        user_id: Id,
        request: ChangePasswordRequest,
    ) -> ServiceResult<()> {
        // Confirm the account still exists before touching credentials
        let user = self.get_account(user_id).await?;

        let password_hash =
            hash_password(&request.password).map_err(|e| ServiceError::internal(e.to_string()))?;

        self.ctx
            .user_repo()
            .update_password(user.id, &password_hash)
            .await?;

        info!(user_id = %user_id, "Password changed");
        Ok(())
    }
}
