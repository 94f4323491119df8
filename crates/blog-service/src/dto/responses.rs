//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Ids are serialized as strings for JavaScript compatibility.

use blog_core::entities::{Post, User};
use blog_core::value_objects::{Id, Page};
use chrono::{DateTime, Utc};
use serde::Serialize;

// ============================================================================
// Common Response Types
// ============================================================================

/// One-shot user-facing notice, the JSON stand-in for a flash message
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Paginated listing response
#[derive(Debug, Serialize)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub per_page: i64,
    pub total_items: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T: Serialize, U: Into<T>> From<Page<U>> for PageResponse<T> {
    fn from(page: Page<U>) -> Self {
        Self {
            page: page.page,
            per_page: page.per_page,
            total_items: page.total_items,
            total_pages: page.total_pages,
            has_next: page.has_next,
            has_prev: page.has_prev,
            items: page.items.into_iter().map(Into::into).collect(),
        }
    }
}

// ============================================================================
// User Responses
// ============================================================================

/// Public view of a user (listing pages, post bylines)
#[derive(Debug, Serialize)]
pub struct PublicUserResponse {
    pub id: Id,
    pub username: String,
    pub avatar_url: String,
}

impl From<&User> for PublicUserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            avatar_url: user.avatar_url(),
        }
    }
}

/// The authenticated user's own account view (profile page prefill)
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id: Id,
    pub username: String,
    pub email: String,
    pub avatar_url: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for AccountResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            avatar_url: user.avatar_url(),
            created_at: user.created_at,
        }
    }
}

/// Successful login: the signed-in user plus where to send them next
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: PublicUserResponse,
    /// Sanitized destination; always a same-origin relative path
    pub redirect_to: String,
}

// ============================================================================
// Post Responses
// ============================================================================

/// A single post
#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: Id,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub author_id: Id,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            created_at: post.created_at,
            author_id: post.author_id,
        }
    }
}

impl From<&Post> for PostResponse {
    fn from(post: &Post) -> Self {
        Self::from(post.clone())
    }
}
