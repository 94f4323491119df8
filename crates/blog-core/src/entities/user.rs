//! User entity - a registered account that can author posts

use chrono::{DateTime, Utc};

use crate::value_objects::Id;

/// Placeholder avatar assigned at registration; never deleted from disk.
pub const DEFAULT_AVATAR: &str = "default.jpg";

/// User entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Id,
    pub username: String,
    pub email: String,
    pub avatar_filename: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Public URL of the user's avatar under the static file mount
    pub fn avatar_url(&self) -> String {
        format!("/static/profile_pics/{}", self.avatar_filename)
    }

    /// Whether the user still carries the registration placeholder avatar
    #[inline]
    pub fn has_default_avatar(&self) -> bool {
        self.avatar_filename == DEFAULT_AVATAR
    }
}

/// Fields required to register a user; the id and timestamps are
/// assigned by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
}
