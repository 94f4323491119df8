//! Post entity - an authored blog entry

use chrono::{DateTime, Utc};

use crate::value_objects::Id;

/// Post entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: Id,
    pub title: String,
    pub content: String,
    /// Set once at creation, immutable afterwards
    pub created_at: DateTime<Utc>,
    /// Owning user; immutable after creation
    pub author_id: Id,
}

impl Post {
    /// Authorization check: only the author may mutate a post
    #[inline]
    pub fn is_authored_by(&self, user_id: Id) -> bool {
        self.author_id == user_id
    }
}

/// Fields required to create a post; the id and timestamp are assigned
/// by the store.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub author_id: Id,
    pub title: String,
    pub content: String,
}
