//! Route definitions
//!
//! The full HTTP surface of the blog, plus the public static mount for
//! avatar files.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::handlers::{account, auth, health, pages, password_reset, posts};
use crate::state::AppState;

/// Create the main router with all routes
pub fn create_router(profile_pics_dir: &str) -> Router<AppState> {
    Router::new()
        .merge(page_routes())
        .merge(auth_routes())
        .merge(account_routes())
        .merge(post_routes())
        .merge(password_reset_routes())
        .route("/health", get(health::health_check))
        // Avatar files are served straight from disk
        .nest_service("/static/profile_pics", ServeDir::new(profile_pics_dir))
}

/// Public pages
fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::home))
        .route("/home", get(pages::home))
        .route("/about", get(pages::about))
}

/// Registration, login, logout
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout).post(auth::logout))
}

/// Account management
fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/account", get(account::get_account).post(account::update_account))
        .route("/account/password", post(account::change_password))
}

/// Post CRUD and listings
fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/post/new", get(posts::new_post_page).post(posts::create_post))
        .route("/post/:post_id", get(posts::get_post))
        .route(
            "/post/:post_id/update",
            get(posts::edit_post_page).post(posts::update_post),
        )
        .route("/post/:post_id/delete", post(posts::delete_post))
        .route("/user/:username", get(posts::user_posts))
}

/// Password recovery flow
fn password_reset_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/reset_password",
            get(password_reset::request_page).post(password_reset::request_reset),
        )
        .route(
            "/reset_password/:token",
            get(password_reset::reset_page).post(password_reset::reset_password),
        )
}
