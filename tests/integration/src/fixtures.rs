//! Test fixtures and data generators
//!
//! Provides reusable test data for integration tests.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data (unique across processes too, since
/// test runs share one database)
pub fn unique_suffix() -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() as u64)
        .unwrap_or(0);
    COUNTER.fetch_add(1, Ordering::SeqCst) * 1_000_000_000 + nanos
}

/// Registration request
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

impl RegisterRequest {
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        // Usernames are capped at 20 chars
        let username = format!("u{suffix}");
        Self {
            username: username.chars().take(20).collect(),
            email: format!("test{suffix}@example.com"),
            password: "TestPass123!".to_string(),
            password_confirm: "TestPass123!".to_string(),
        }
    }
}

/// Login request
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub remember: bool,
}

impl LoginRequest {
    pub fn from_register(reg: &RegisterRequest) -> Self {
        Self {
            email: reg.email.clone(),
            password: reg.password.clone(),
            remember: false,
        }
    }
}

/// Post payload for create/update
#[derive(Debug, Serialize)]
pub struct PostPayload {
    pub title: String,
    pub content: String,
}

impl PostPayload {
    pub fn numbered(n: usize) -> Self {
        Self {
            title: format!("Post {n}"),
            content: format!("Content of post {n}"),
        }
    }
}

/// Flash-style message body
#[derive(Debug, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

/// Login response body
#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub message: String,
    pub user: UserBody,
    pub redirect_to: String,
}

/// Public user body
#[derive(Debug, Deserialize)]
pub struct UserBody {
    pub id: String,
    pub username: String,
    pub avatar_url: String,
}

/// Account body
#[derive(Debug, Deserialize)]
pub struct AccountBody {
    pub id: String,
    pub username: String,
    pub email: String,
    pub avatar_url: String,
}

/// Post body
#[derive(Debug, Deserialize)]
pub struct PostBody {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author_id: String,
}

/// Paginated listing body
#[derive(Debug, Deserialize)]
pub struct PageBody<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub per_page: i64,
    pub total_items: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

/// User page body (GET /user/:username)
#[derive(Debug, Deserialize)]
pub struct UserPostsBody {
    pub user: UserBody,
    pub posts: PageBody<PostBody>,
}

/// Error body shape
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetailBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetailBody {
    pub code: String,
    pub message: String,
}
