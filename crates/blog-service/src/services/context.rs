//! Service context - dependency container for services
//!
//! Holds the repositories, the mailer, the token service, and the avatar
//! store. Handlers construct services against a shared context instead of
//! reaching for ambient global state.

use std::sync::Arc;

use blog_common::auth::TokenService;
use blog_core::traits::{PostRepository, UserRepository};

use crate::avatar::AvatarStore;
use crate::mail::Mailer;

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    user_repo: Arc<dyn UserRepository>,
    post_repo: Arc<dyn PostRepository>,
    mailer: Arc<dyn Mailer>,
    tokens: Arc<TokenService>,
    avatars: AvatarStore,
    /// External base URL used when building links embedded in emails
    base_url: String,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        post_repo: Arc<dyn PostRepository>,
        mailer: Arc<dyn Mailer>,
        tokens: Arc<TokenService>,
        avatars: AvatarStore,
        base_url: String,
    ) -> Self {
        Self {
            user_repo,
            post_repo,
            mailer,
            tokens,
            avatars,
            base_url,
        }
    }

    /// Get the user repository
    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    /// Get the post repository
    pub fn post_repo(&self) -> &dyn PostRepository {
        self.post_repo.as_ref()
    }

    /// Get the mailer
    pub fn mailer(&self) -> &dyn Mailer {
        self.mailer.as_ref()
    }

    /// Get the token service
    pub fn tokens(&self) -> &TokenService {
        self.tokens.as_ref()
    }

    /// Get the avatar store
    pub fn avatars(&self) -> &AvatarStore {
        &self.avatars
    }

    /// Get the external base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Builder for creating ServiceContext
pub struct ServiceContextBuilder {
    user_repo: Option<Arc<dyn UserRepository>>,
    post_repo: Option<Arc<dyn PostRepository>>,
    mailer: Option<Arc<dyn Mailer>>,
    tokens: Option<Arc<TokenService>>,
    avatars: Option<AvatarStore>,
    base_url: Option<String>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            user_repo: None,
            post_repo: None,
            mailer: None,
            tokens: None,
            avatars: None,
            base_url: None,
        }
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn post_repo(mut self, repo: Arc<dyn PostRepository>) -> Self {
        self.post_repo = Some(repo);
        self
    }

    pub fn mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = Some(mailer);
        self
    }

    pub fn tokens(mut self, tokens: Arc<TokenService>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    pub fn avatars(mut self, avatars: AvatarStore) -> Self {
        self.avatars = Some(avatars);
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Build the context
    ///
    /// # Errors
    /// Returns the name of the first missing dependency
    pub fn build(self) -> Result<ServiceContext, &'static str> {
        Ok(ServiceContext {
            user_repo: self.user_repo.ok_or("user_repo is required")?,
            post_repo: self.post_repo.ok_or("post_repo is required")?,
            mailer: self.mailer.ok_or("mailer is required")?,
            tokens: self.tokens.ok_or("tokens is required")?,
            avatars: self.avatars.ok_or("avatars is required")?,
            base_url: self.base_url.ok_or("base_url is required")?,
        })
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
