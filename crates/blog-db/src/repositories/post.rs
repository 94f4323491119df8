//! PostgreSQL implementation of PostRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use blog_core::entities::{NewPost, Post};
use blog_core::traits::{PostRepository, RepoResult};
use blog_core::value_objects::{Id, Page};

use crate::models::PostModel;

use super::error::{map_db_error, post_not_found};

/// PostgreSQL implementation of PostRepository
#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    /// Create a new PgPostRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Id) -> RepoResult<Option<Post>> {
        let result = sqlx::query_as::<_, PostModel>(
            r"
            SELECT id, title, content, created_at, author_id
            FROM posts
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Post::from))
    }

    #[instrument(skip(self, post), fields(author_id = %post.author_id))]
    async fn create(&self, post: &NewPost) -> RepoResult<Post> {
        let result = sqlx::query_as::<_, PostModel>(
            r"
            INSERT INTO posts (title, content, author_id)
            VALUES ($1, $2, $3)
            RETURNING id, title, content, created_at, author_id
            ",
        )
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.author_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(Post::from(result))
    }

    #[instrument(skip(self, title, content))]
    async fn update(&self, id: Id, title: &str, content: &str) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE posts
            SET title = $2, content = $3
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .bind(title)
        .bind(content)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(post_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Id) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            DELETE FROM posts
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(post_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_page(&self, page: i64, per_page: i64) -> RepoResult<Page<Post>> {
        let total = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*) FROM posts
            ",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        let results = sqlx::query_as::<_, PostModel>(
            r"
            SELECT id, title, content, created_at, author_id
            FROM posts
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            ",
        )
        .bind(per_page)
        .bind(Page::<Post>::offset(page, per_page))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let items = results.into_iter().map(Post::from).collect();
        Ok(Page::new(items, page, per_page, total))
    }

    #[instrument(skip(self))]
    async fn list_by_author_page(
        &self,
        author_id: Id,
        page: i64,
        per_page: i64,
    ) -> RepoResult<Page<Post>> {
        let total = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*) FROM posts WHERE author_id = $1
            ",
        )
        .bind(author_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        let results = sqlx::query_as::<_, PostModel>(
            r"
            SELECT id, title, content, created_at, author_id
            FROM posts
            WHERE author_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(author_id.into_inner())
        .bind(per_page)
        .bind(Page::<Post>::offset(page, per_page))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let items = results.into_iter().map(Post::from).collect();
        Ok(Page::new(items, page, per_page, total))
    }
}
