//! Post entity <-> model mapper

use blog_core::entities::Post;
use blog_core::value_objects::Id;

use crate::models::PostModel;

/// Convert PostModel to Post entity
impl From<PostModel> for Post {
    fn from(model: PostModel) -> Self {
        Post {
            id: Id::new(model.id),
            title: model.title,
            content: model.content,
            created_at: model.created_at,
            author_id: Id::new(model.author_id),
        }
    }
}
