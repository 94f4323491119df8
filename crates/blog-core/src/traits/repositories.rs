//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Creation methods return the stored entity
//! because ids and timestamps are assigned by the database.

use async_trait::async_trait;

use crate::entities::{NewPost, NewUser, Post, User};
use crate::error::DomainError;
use crate::value_objects::{Id, Page};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Id) -> RepoResult<Option<User>>;

    /// Find user by email
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// Find user by username (case-sensitive, as stored)
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;

    /// Check if username is already taken
    async fn username_exists(&self, username: &str) -> RepoResult<bool>;

    /// Check if email is already taken
    async fn email_exists(&self, email: &str) -> RepoResult<bool>;

    /// Insert a new user and return the stored row.
    ///
    /// A unique violation maps to `UsernameAlreadyExists` or
    /// `EmailAlreadyExists`; the constraint closes the race left open by
    /// any prior existence check.
    async fn create(&self, user: &NewUser, password_hash: &str) -> RepoResult<User>;

    /// Update username, email, and avatar in one atomic statement
    async fn update_profile(
        &self,
        id: Id,
        username: &str,
        email: &str,
        avatar_filename: &str,
    ) -> RepoResult<()>;

    /// Get password hash for authentication
    async fn get_password_hash(&self, id: Id) -> RepoResult<Option<String>>;

    /// Overwrite the password hash
    async fn update_password(&self, id: Id, password_hash: &str) -> RepoResult<()>;
}

// ============================================================================
// Post Repository
// ============================================================================

#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Find post by ID
    async fn find_by_id(&self, id: Id) -> RepoResult<Option<Post>>;

    /// Insert a new post and return the stored row
    async fn create(&self, post: &NewPost) -> RepoResult<Post>;

    /// Update title and content
    async fn update(&self, id: Id, title: &str, content: &str) -> RepoResult<()>;

    /// Permanently delete a post
    async fn delete(&self, id: Id) -> RepoResult<()>;

    /// One page of all posts, newest first (ties broken by id descending)
    async fn list_page(&self, page: i64, per_page: i64) -> RepoResult<Page<Post>>;

    /// One page of a single author's posts, same ordering
    async fn list_by_author_page(
        &self,
        author_id: Id,
        page: i64,
        per_page: i64,
    ) -> RepoResult<Page<Post>>;
}
