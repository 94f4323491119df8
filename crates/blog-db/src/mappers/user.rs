//! User entity <-> model mapper

use blog_core::entities::User;
use blog_core::value_objects::Id;

use crate::models::UserModel;

/// Convert UserModel to User entity (the password hash stays behind)
impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: Id::new(model.id),
            username: model.username,
            email: model.email,
            avatar_filename: model.avatar_filename,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
