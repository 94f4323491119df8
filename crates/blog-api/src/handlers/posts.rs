//! Post handlers
//!
//! Post CRUD plus the per-user listing. Mutating routes require an
//! authenticated session and the author-only guard.

use axum::{
    extract::{Path, State},
    Json,
};
use blog_core::Id;
use blog_service::dto::{
    CreatePostRequest, PageResponse, PostResponse, PublicUserResponse, UpdatePostRequest,
};
use blog_service::{PostService, ServiceError};
use serde::Serialize;

use crate::extractors::{AuthSession, PageQuery, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent, SeeOther};
use crate::state::AppState;

fn parse_post_id(raw: &str) -> Result<Id, crate::response::ApiError> {
    raw.parse::<Id>()
        .map_err(|_| crate::response::ApiError::invalid_path("Invalid post id format"))
}

/// New-post page prefill (requires a session, like the form itself)
///
/// GET /post/new
pub async fn new_post_page(_auth: AuthSession) -> NoContent {
    NoContent
}

/// Create a post
///
/// POST /post/new
pub async fn create_post(
    State(state): State<AppState>,
    auth: AuthSession,
    ValidatedJson(request): ValidatedJson<CreatePostRequest>,
) -> ApiResult<Created<Json<PostResponse>>> {
    let service = PostService::new(state.service_context());
    let post = service.create_post(auth.user_id, request).await?;
    Ok(Created(Json(PostResponse::from(post))))
}

/// View one post
///
/// GET /post/:post_id
pub async fn get_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> ApiResult<Json<PostResponse>> {
    let post_id = parse_post_id(&post_id)?;

    let service = PostService::new(state.service_context());
    let post = service.get_post(post_id).await?;
    Ok(Json(PostResponse::from(post)))
}

/// Edit page prefill: the current title and content, author only
///
/// GET /post/:post_id/update
pub async fn edit_post_page(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(post_id): Path<String>,
) -> ApiResult<Json<PostResponse>> {
    let post_id = parse_post_id(&post_id)?;

    let service = PostService::new(state.service_context());
    let post = service.get_post(post_id).await?;

    // Same guard as the mutation itself, so the form never opens for a
    // post the caller cannot submit
    if !post.is_authored_by(auth.user_id) {
        return Err(ServiceError::Forbidden.into());
    }

    Ok(Json(PostResponse::from(post)))
}

/// Update a post, author only
///
/// POST /post/:post_id/update
pub async fn update_post(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(post_id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdatePostRequest>,
) -> ApiResult<Json<PostResponse>> {
    let post_id = parse_post_id(&post_id)?;

    let service = PostService::new(state.service_context());
    let post = service.update_post(post_id, auth.user_id, request).await?;
    Ok(Json(PostResponse::from(post)))
}

/// Permanently delete a post, author only
///
/// POST /post/:post_id/delete
pub async fn delete_post(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(post_id): Path<String>,
) -> ApiResult<SeeOther> {
    let post_id = parse_post_id(&post_id)?;

    let service = PostService::new(state.service_context());
    service.delete_post(post_id, auth.user_id).await?;
    Ok(SeeOther::home())
}

/// A user's public page: who they are plus one page of their posts
#[derive(Debug, Serialize)]
pub struct UserPostsResponse {
    pub user: PublicUserResponse,
    pub posts: PageResponse<PostResponse>,
}

/// Paginated posts by one user, newest first
///
/// GET /user/:username (`?page=N`)
pub async fn user_posts(
    State(state): State<AppState>,
    Path(username): Path<String>,
    page: PageQuery,
) -> ApiResult<Json<UserPostsResponse>> {
    let service = PostService::new(state.service_context());
    let (user, posts) = service.user_page(&username, page.page).await?;

    Ok(Json(UserPostsResponse {
        user: PublicUserResponse::from(&user),
        posts: PageResponse::from(posts),
    }))
}
