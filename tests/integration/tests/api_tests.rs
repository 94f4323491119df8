//! API Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance (migrations apply automatically)
//! - Environment variables: DATABASE_URL (SECRET_KEY optional)
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_json, assert_status, check_test_env, fixtures::*, helpers::new_client, TestServer,
};
use reqwest::StatusCode;

/// Register and log in a fresh user on a fresh client; returns the
/// registration data and the logged-in client.
async fn signed_up_client(server: &TestServer) -> (RegisterRequest, reqwest::Client) {
    let request = RegisterRequest::unique();
    let client = new_client().unwrap();

    let response = server.post_with(&client, "/register", &request).await.unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .post_with(&client, "/login", &LoginRequest::from_register(&request))
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    (request, client)
}

// ============================================================================
// Health and public pages
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_home_listing_is_public() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/").await.unwrap();
    let page: PageBody<PostBody> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(page.per_page, 5);

    let response = server.get("/about").await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn test_register_user() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();

    let response = server.post("/register", &request).await.unwrap();
    let body: MessageBody = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert!(body.message.contains(&request.username));
}

#[tokio::test]
async fn test_register_duplicate_username_conflicts() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();

    server.post("/register", &request).await.unwrap();

    // Same username, different email
    let mut second = request.clone();
    second.email = format!("other-{}", second.email);
    let response = server.post("/register", &second).await.unwrap();

    let status = response.status();
    let body: ErrorBody = response.json().await.unwrap();
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body.error.code, "DUPLICATE_USERNAME");
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();

    server.post("/register", &request).await.unwrap();

    let mut second = RegisterRequest::unique();
    second.email = request.email.clone();
    let response = server.post("/register", &second).await.unwrap();

    let status = response.status();
    let body: ErrorBody = response.json().await.unwrap();
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body.error.code, "DUPLICATE_EMAIL");
}

#[tokio::test]
async fn test_register_password_mismatch_is_rejected() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let mut request = RegisterRequest::unique();
    request.password_confirm = "something else".to_string();

    let response = server.post("/register", &request).await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_concurrent_registration_race_resolves_to_one_winner() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");

    // Identical username, distinct emails, fired simultaneously: the
    // uniqueness constraint must let exactly one through
    let request = RegisterRequest::unique();
    let mut rival = request.clone();
    rival.email = format!("rival-{}", request.email);

    let (a, b) = tokio::join!(
        server.post("/register", &request),
        server.post("/register", &rival),
    );

    let statuses = [a.unwrap().status(), b.unwrap().status()];
    let created = statuses.iter().filter(|s| **s == StatusCode::CREATED).count();
    let conflicted = statuses.iter().filter(|s| **s == StatusCode::CONFLICT).count();

    assert_eq!(created, 1, "exactly one registration must win: {statuses:?}");
    assert_eq!(conflicted, 1, "the loser must see a conflict: {statuses:?}");
}

// ============================================================================
// Login / logout / session gates
// ============================================================================

#[tokio::test]
async fn test_login_sets_session_cookie() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();
    server.post("/register", &request).await.unwrap();

    let response = server
        .post("/login", &LoginRequest::from_register(&request))
        .await
        .unwrap();
    let body: LoginBody = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(body.user.username, request.username);
    assert_eq!(body.redirect_to, "/");
    assert!(body.message.contains("Welcome"));

    // The cookie jar now holds a session: the account page opens
    let response = server.get("/account").await.unwrap();
    let account: AccountBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(account.email, request.email);
}

#[tokio::test]
async fn test_login_rejects_bad_credentials_uniformly() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();
    server.post("/register", &request).await.unwrap();

    // Wrong password
    let response = server
        .post(
            "/login",
            &LoginRequest {
                email: request.email.clone(),
                password: "wrong".to_string(),
                remember: false,
            },
        )
        .await
        .unwrap();
    let status = response.status();
    let wrong_pw: ErrorBody = response.json().await.unwrap();
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Unknown email gives the identical code
    let response = server
        .post(
            "/login",
            &LoginRequest {
                email: format!("nobody-{}", request.email),
                password: request.password.clone(),
                remember: false,
            },
        )
        .await
        .unwrap();
    let status = response.status();
    let unknown: ErrorBody = response.json().await.unwrap();
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_pw.error.code, unknown.error.code);
}

#[tokio::test]
async fn test_login_sanitizes_next_parameter() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();
    server.post("/register", &request).await.unwrap();

    let response = server
        .post(
            "/login?next=https://evil.example/phish",
            &LoginRequest::from_register(&request),
        )
        .await
        .unwrap();
    let body: LoginBody = assert_json(response, StatusCode::OK).await.unwrap();

    // The external target is discarded in favor of home
    assert_eq!(body.redirect_to, "/");
}

#[tokio::test]
async fn test_account_requires_session() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/account").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_logout_clears_session_and_is_idempotent() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, client) = signed_up_client(&server).await;

    let response = server.post_empty_with(&client, "/logout").await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    // Session gone
    let response = server.get_with(&client, "/account").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    // Logging out again is still a redirect, not an error
    let response = server.post_empty_with(&client, "/logout").await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_anonymous_only_pages_redirect_when_authenticated() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, client) = signed_up_client(&server).await;

    for path in ["/register", "/login", "/reset_password"] {
        let response = server.get_with(&client, path).await.unwrap();
        assert_eq!(
            response.status(),
            StatusCode::SEE_OTHER,
            "expected {path} to bounce an authenticated caller home"
        );
    }
}

// ============================================================================
// Posts
// ============================================================================

#[tokio::test]
async fn test_post_crud_by_author() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, client) = signed_up_client(&server).await;

    // Create
    let response = server
        .post_with(&client, "/post/new", &PostPayload::numbered(1))
        .await
        .unwrap();
    let post: PostBody = assert_json(response, StatusCode::CREATED).await.unwrap();

    // Read (public)
    let response = server.get(&format!("/post/{}", post.id)).await.unwrap();
    let fetched: PostBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(fetched.title, "Post 1");

    // Update
    let response = server
        .post_with(
            &client,
            &format!("/post/{}/update", post.id),
            &PostPayload {
                title: "Edited".to_string(),
                content: "New content".to_string(),
            },
        )
        .await
        .unwrap();
    let updated: PostBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(updated.title, "Edited");

    // Delete redirects home
    let response = server
        .post_empty_with(&client, &format!("/post/{}/delete", post.id))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    // Gone
    let response = server.get(&format!("/post/{}", post.id)).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_non_author_mutation_is_forbidden_not_missing() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, alice) = signed_up_client(&server).await;
    let (_, bob) = signed_up_client(&server).await;

    let response = server
        .post_with(&alice, "/post/new", &PostPayload::numbered(1))
        .await
        .unwrap();
    let post: PostBody = assert_json(response, StatusCode::CREATED).await.unwrap();

    // Bob cannot edit or delete Alice's post: 403, not 404
    let response = server
        .post_with(
            &bob,
            &format!("/post/{}/update", post.id),
            &PostPayload::numbered(2),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = server
        .post_empty_with(&bob, &format!("/post/{}/delete", post.id))
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    // And anonymously it is 401 before the guard even runs
    let response = server
        .post_empty_with(&server.client, &format!("/post/{}/delete", post.id))
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_post_validation_and_path_errors() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, client) = signed_up_client(&server).await;

    // Empty title is a validation error
    let response = server
        .post_with(
            &client,
            "/post/new",
            &PostPayload {
                title: String::new(),
                content: "body".to_string(),
            },
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    // Unparsable id
    let response = server.get("/post/not-a-number").await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    // Valid-looking but missing id
    let response = server.get("/post/999999999").await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_user_page_paginates_descending() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (request, client) = signed_up_client(&server).await;

    for n in 1..=12 {
        let response = server
            .post_with(&client, "/post/new", &PostPayload::numbered(n))
            .await
            .unwrap();
        assert_status(response, StatusCode::CREATED).await.unwrap();
    }

    // Page 1: the 5 most recent
    let response = server
        .get(&format!("/user/{}?page=1", request.username))
        .await
        .unwrap();
    let body: UserPostsBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body.user.username, request.username);
    assert_eq!(body.posts.items.len(), 5);
    assert_eq!(body.posts.total_items, 12);
    assert_eq!(body.posts.total_pages, 3);
    assert!(body.posts.has_next);
    assert!(!body.posts.has_prev);
    assert_eq!(body.posts.items[0].title, "Post 12");

    // Page 3: the remaining 2
    let response = server
        .get(&format!("/user/{}?page=3", request.username))
        .await
        .unwrap();
    let body: UserPostsBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body.posts.items.len(), 2);
    assert!(!body.posts.has_next);

    // Page 4: empty, no next
    let response = server
        .get(&format!("/user/{}?page=4", request.username))
        .await
        .unwrap();
    let body: UserPostsBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(body.posts.items.is_empty());
    assert!(!body.posts.has_next);
}

#[tokio::test]
async fn test_unknown_user_page_is_not_found() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/user/no-such-user-ever").await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

// ============================================================================
// Account profile
// ============================================================================

fn jpeg_fixture(width: u32, height: u32) -> Vec<u8> {
    use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
    use std::io::Cursor;

    let img = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(width, height, Rgb([1u8, 2, 3])));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Jpeg).unwrap();
    out.into_inner()
}

#[tokio::test]
async fn test_account_update_with_avatar() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (request, client) = signed_up_client(&server).await;

    let form = reqwest::multipart::Form::new()
        .text("username", request.username.clone())
        .text("email", request.email.clone())
        .part(
            "picture",
            reqwest::multipart::Part::bytes(jpeg_fixture(1000, 500))
                .file_name("me.jpg")
                .mime_str("image/jpeg")
                .unwrap(),
        );

    let response = server.post_multipart_with(&client, "/account", form).await.unwrap();
    let account: AccountBody = assert_json(response, StatusCode::OK).await.unwrap();

    assert!(!account.avatar_url.ends_with("default.jpg"));
    assert!(account.avatar_url.starts_with("/static/profile_pics/"));

    // The stored thumbnail is publicly served
    let response = server.get(&account.avatar_url).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_account_update_rejects_gif_avatar() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (request, client) = signed_up_client(&server).await;

    let form = reqwest::multipart::Form::new()
        .text("username", request.username.clone())
        .text("email", request.email.clone())
        .part(
            "picture",
            reqwest::multipart::Part::bytes(b"GIF89a\x01\x00\x01\x00\x00\x00\x00;".to_vec())
                .file_name("me.gif")
                .mime_str("image/gif")
                .unwrap(),
        );

    let response = server.post_multipart_with(&client, "/account", form).await.unwrap();
    assert_status(response, StatusCode::UNSUPPORTED_MEDIA_TYPE)
        .await
        .unwrap();
}

// ============================================================================
// Password reset
// ============================================================================

#[tokio::test]
async fn test_reset_request_for_unknown_email_succeeds_quietly() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");

    // No account, so no mail is attempted: plain success
    let response = server
        .post(
            "/reset_password",
            &serde_json::json!({"email": "nobody-at-all@example.com"}),
        )
        .await
        .unwrap();
    let body: MessageBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(body.message.contains("reset link"));
}

#[tokio::test]
async fn test_reset_page_rejects_garbage_token() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/reset_password/not-a-real-token").await.unwrap();
    let status = response.status();
    let body: ErrorBody = response.json().await.unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.error.code, "TOKEN_INVALID");
}
