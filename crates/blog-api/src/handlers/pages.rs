//! Public page handlers
//!
//! The home listing and the static about page.

use axum::{extract::State, Json};
use blog_service::dto::{PageResponse, PostResponse};
use blog_service::PostService;
use serde::Serialize;

use crate::extractors::PageQuery;
use crate::response::ApiResult;
use crate::state::AppState;

/// Paginated post listing, newest first
///
/// GET /, GET /home (`?page=N`)
pub async fn home(
    State(state): State<AppState>,
    page: PageQuery,
) -> ApiResult<Json<PageResponse<PostResponse>>> {
    let service = PostService::new(state.service_context());
    let posts = service.home_page(page.page).await?;
    Ok(Json(PageResponse::from(posts)))
}

/// Static info document
#[derive(Debug, Serialize)]
pub struct AboutResponse {
    pub title: &'static str,
    pub description: &'static str,
}

/// About page
///
/// GET /about
pub async fn about() -> Json<AboutResponse> {
    Json(AboutResponse {
        title: "About",
        description: "A small multi-user blog: read posts, write your own, \
                      and manage your account.",
    })
}
