//! Shared test doubles: in-memory repositories and a recording mailer.
//!
//! The repository traits are the seam; these implementations mirror the
//! database semantics the services rely on (unique constraints, ordering,
//! page math) without needing PostgreSQL.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use blog_common::auth::TokenService;
use blog_common::AppError;
use blog_core::entities::{NewPost, NewUser, Post, User, DEFAULT_AVATAR};
use blog_core::traits::{PostRepository, RepoResult, UserRepository};
use blog_core::value_objects::{Id, Page};
use blog_core::DomainError;
use blog_service::mail::Mailer;
use blog_service::{AvatarStore, ServiceContext, ServiceContextBuilder};
use chrono::Utc;

// ============================================================================
// In-memory user repository
// ============================================================================

#[derive(Clone)]
struct StoredUser {
    user: User,
    password_hash: String,
}

#[derive(Default)]
pub struct MemoryUserRepository {
    users: Mutex<Vec<StoredUser>>,
    next_id: AtomicI64,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_id(&self, id: Id) -> RepoResult<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|s| s.user.id == id).map(|s| s.user.clone()))
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|s| s.user.email == email)
            .map(|s| s.user.clone()))
    }

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|s| s.user.username == username)
            .map(|s| s.user.clone()))
    }

    async fn username_exists(&self, username: &str) -> RepoResult<bool> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().any(|s| s.user.username == username))
    }

    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().any(|s| s.user.email == email))
    }

    async fn create(&self, user: &NewUser, password_hash: &str) -> RepoResult<User> {
        let mut users = self.users.lock().unwrap();

        // Same uniqueness guarantees the table constraints give
        if users.iter().any(|s| s.user.username == user.username) {
            return Err(DomainError::UsernameAlreadyExists);
        }
        if users.iter().any(|s| s.user.email == user.email) {
            return Err(DomainError::EmailAlreadyExists);
        }

        let now = Utc::now();
        let stored = User {
            id: Id::new(self.next_id.fetch_add(1, Ordering::SeqCst)),
            username: user.username.clone(),
            email: user.email.clone(),
            avatar_filename: DEFAULT_AVATAR.to_string(),
            created_at: now,
            updated_at: now,
        };

        users.push(StoredUser {
            user: stored.clone(),
            password_hash: password_hash.to_string(),
        });

        Ok(stored)
    }

    async fn update_profile(
        &self,
        id: Id,
        username: &str,
        email: &str,
        avatar_filename: &str,
    ) -> RepoResult<()> {
        let mut users = self.users.lock().unwrap();

        if users
            .iter()
            .any(|s| s.user.id != id && s.user.username == username)
        {
            return Err(DomainError::UsernameAlreadyExists);
        }
        if users.iter().any(|s| s.user.id != id && s.user.email == email) {
            return Err(DomainError::EmailAlreadyExists);
        }

        let stored = users
            .iter_mut()
            .find(|s| s.user.id == id)
            .ok_or(DomainError::UserNotFound(id))?;

        stored.user.username = username.to_string();
        stored.user.email = email.to_string();
        stored.user.avatar_filename = avatar_filename.to_string();
        stored.user.updated_at = Utc::now();
        Ok(())
    }

    async fn get_password_hash(&self, id: Id) -> RepoResult<Option<String>> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|s| s.user.id == id)
            .map(|s| s.password_hash.clone()))
    }

    async fn update_password(&self, id: Id, password_hash: &str) -> RepoResult<()> {
        let mut users = self.users.lock().unwrap();
        let stored = users
            .iter_mut()
            .find(|s| s.user.id == id)
            .ok_or(DomainError::UserNotFound(id))?;

        stored.password_hash = password_hash.to_string();
        stored.user.updated_at = Utc::now();
        Ok(())
    }
}

// ============================================================================
// In-memory post repository
// ============================================================================

#[derive(Default)]
pub struct MemoryPostRepository {
    posts: Mutex<Vec<Post>>,
    next_id: AtomicI64,
}

impl MemoryPostRepository {
    pub fn new() -> Self {
        Self {
            posts: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    fn page_of(posts: Vec<Post>, page: i64, per_page: i64) -> Page<Post> {
        let mut posts = posts;
        // created_at descending, id descending on ties
        posts.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let total = posts.len() as i64;
        let offset = Page::<Post>::offset(page, per_page) as usize;
        let items: Vec<Post> = posts
            .into_iter()
            .skip(offset)
            .take(per_page as usize)
            .collect();

        Page::new(items, page, per_page, total)
    }
}

#[async_trait]
impl PostRepository for MemoryPostRepository {
    async fn find_by_id(&self, id: Id) -> RepoResult<Option<Post>> {
        let posts = self.posts.lock().unwrap();
        Ok(posts.iter().find(|p| p.id == id).cloned())
    }

    async fn create(&self, post: &NewPost) -> RepoResult<Post> {
        let mut posts = self.posts.lock().unwrap();
        let stored = Post {
            id: Id::new(self.next_id.fetch_add(1, Ordering::SeqCst)),
            title: post.title.clone(),
            content: post.content.clone(),
            created_at: Utc::now(),
            author_id: post.author_id,
        };
        posts.push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: Id, title: &str, content: &str) -> RepoResult<()> {
        let mut posts = self.posts.lock().unwrap();
        let post = posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(DomainError::PostNotFound(id))?;

        post.title = title.to_string();
        post.content = content.to_string();
        Ok(())
    }

    async fn delete(&self, id: Id) -> RepoResult<()> {
        let mut posts = self.posts.lock().unwrap();
        let before = posts.len();
        posts.retain(|p| p.id != id);

        if posts.len() == before {
            return Err(DomainError::PostNotFound(id));
        }
        Ok(())
    }

    async fn list_page(&self, page: i64, per_page: i64) -> RepoResult<Page<Post>> {
        let posts = self.posts.lock().unwrap().clone();
        Ok(Self::page_of(posts, page, per_page))
    }

    async fn list_by_author_page(
        &self,
        author_id: Id,
        page: i64,
        per_page: i64,
    ) -> RepoResult<Page<Post>> {
        let posts: Vec<Post> = self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.author_id == author_id)
            .cloned()
            .collect();
        Ok(Self::page_of(posts, page, per_page))
    }
}

// ============================================================================
// Recording mailer
// ============================================================================

#[derive(Debug, Clone)]
pub struct SentMail {
    pub to: String,
    pub username: String,
    pub reset_url: String,
}

#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<SentMail>>,
    fail: AtomicBool,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent send fail, simulating a refusing relay
    pub fn fail_next_sends(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_password_reset(
        &self,
        to: &str,
        username: &str,
        reset_url: &str,
    ) -> Result<(), AppError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::MailDelivery("relay refused the message".to_string()));
        }

        self.sent.lock().unwrap().push(SentMail {
            to: to.to_string(),
            username: username.to_string(),
            reset_url: reset_url.to_string(),
        });
        Ok(())
    }
}

// ============================================================================
// Context assembly
// ============================================================================

pub struct TestHarness {
    pub ctx: ServiceContext,
    pub users: Arc<MemoryUserRepository>,
    pub posts: Arc<MemoryPostRepository>,
    pub mailer: Arc<RecordingMailer>,
    pub avatar_dir: std::path::PathBuf,
}

pub fn harness() -> TestHarness {
    let users = Arc::new(MemoryUserRepository::new());
    let posts = Arc::new(MemoryPostRepository::new());
    let mailer = Arc::new(RecordingMailer::new());

    let avatar_dir = std::env::temp_dir().join(format!(
        "blog-service-test-{}-{:x}",
        std::process::id(),
        rand_suffix()
    ));
    std::fs::create_dir_all(&avatar_dir).unwrap();

    let ctx = ServiceContextBuilder::new()
        .user_repo(users.clone())
        .post_repo(posts.clone())
        .mailer(mailer.clone())
        .tokens(Arc::new(TokenService::new(
            "test-secret-key-that-is-long-enough",
            86400,
            2_592_000,
        )))
        .avatars(AvatarStore::new(&avatar_dir))
        .base_url("http://localhost:8000")
        .build()
        .unwrap();

    TestHarness {
        ctx,
        users,
        posts,
        mailer,
        avatar_dir,
    }
}

fn rand_suffix() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .subsec_nanos()
        .into()
}
