//! Post service
//!
//! Handles post creation, editing, deletion, and the paginated listings.
//! Mutations are guarded by the author-only check: a caller who is not the
//! author gets `Forbidden`, never `NotFound`, so "exists but not yours"
//! stays distinguishable from "does not exist".

use blog_core::entities::{NewPost, Post, User};
use blog_core::value_objects::{Id, Page, DEFAULT_PAGE_SIZE};
use tracing::{info, instrument, warn};

use crate::dto::{CreatePostRequest, UpdatePostRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Post service
pub struct PostService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PostService<'a> {
    /// Create a new PostService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a new post owned by the authenticated user
    #[instrument(skip(self, request), fields(title = %request.title))]
    pub async fn create_post(
        &self,
        author_id: Id,
        request: CreatePostRequest,
    ) -> ServiceResult<Post> {
        let new_post = NewPost {
            author_id,
            title: request.title,
            content: request.content,
        };

        let post = self.ctx.post_repo().create(&new_post).await?;

        info!(post_id = %post.id, author_id = %author_id, "Post created");
        Ok(post)
    }

    /// Get a post by id
    #[instrument(skip(self))]
    pub async fn get_post(&self, post_id: Id) -> ServiceResult<Post> {
        self.ctx
            .post_repo()
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Post", post_id.to_string()))
    }

    /// Update a post's title and content; author only
    #[instrument(skip(self, request))]
    pub async fn update_post(
        &self,
        post_id: Id,
        user_id: Id,
        request: UpdatePostRequest,
    ) -> ServiceResult<Post> {
        let mut post = self.get_post(post_id).await?;

        if !post.is_authored_by(user_id) {
            warn!(post_id = %post_id, user_id = %user_id, "Update rejected: not the author");
            return Err(ServiceError::Forbidden);
        }

        self.ctx
            .post_repo()
            .update(post_id, &request.title, &request.content)
            .await?;

        post.title = request.title;
        post.content = request.content;

        info!(post_id = %post_id, "Post updated");
        Ok(post)
    }

    /// Permanently delete a post; author only
    #[instrument(skip(self))]
    pub async fn delete_post(&self, post_id: Id, user_id: Id) -> ServiceResult<()> {
        let post = self.get_post(post_id).await?;

        if !post.is_authored_by(user_id) {
            warn!(post_id = %post_id, user_id = %user_id, "Delete rejected: not the author");
            return Err(ServiceError::Forbidden);
        }

        self.ctx.post_repo().delete(post_id).await?;

        info!(post_id = %post_id, "Post deleted");
        Ok(())
    }

    /// One page of the home listing, newest first
    #[instrument(skip(self))]
    pub async fn home_page(&self, page: i64) -> ServiceResult<Page<Post>> {
        Ok(self
            .ctx
            .post_repo()
            .list_page(page, DEFAULT_PAGE_SIZE)
            .await?)
    }

    /// One page of a single user's posts, newest first
    #[instrument(skip(self))]
    pub async fn user_page(&self, username: &str, page: i64) -> ServiceResult<(User, Page<Post>)> {
        let user = self
            .ctx
            .user_repo()
            .find_by_username(username)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", username.to_string()))?;

        let posts = self
            .ctx
            .post_repo()
            .list_by_author_page(user.id, page, DEFAULT_PAGE_SIZE)
            .await?;

        Ok((user, posts))
    }
}
