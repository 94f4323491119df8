//! Signed token utilities for sessions and password resets
//!
//! Both token families are HS256 JWTs signed with the process-wide secret
//! key, discriminated by a `kind` claim so one can never stand in for the
//! other. Session tokens carry a configurable lifetime (longer when the user
//! asked to be remembered); password-reset tokens expire after a fixed
//! 30-minute window and are never persisted server-side.

use blog_core::Id;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Fixed lifetime of a password-reset token (30 minutes)
pub const RESET_TOKEN_TTL_SECS: i64 = 30 * 60;

/// Token kind enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Session,
    PasswordReset,
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Token kind (session or password reset)
    pub kind: TokenKind,
}

impl Claims {
    /// Get the user ID carried in the subject claim
    ///
    /// # Errors
    /// Returns `TokenInvalid` if the subject is not a numeric id
    pub fn user_id(&self) -> Result<Id, AppError> {
        self.sub.parse::<Id>().map_err(|_| AppError::TokenInvalid)
    }
}

/// Issues and verifies signed tokens
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    session_ttl: i64,
    remember_ttl: i64,
}

impl TokenService {
    /// Create a new token service with the given secret and session lifetimes
    #[must_use]
    pub fn new(secret: &str, session_ttl: i64, remember_ttl: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            session_ttl,
            remember_ttl,
        }
    }

    /// The session lifetime in seconds for the given remember-me choice
    #[must_use]
    pub fn session_ttl(&self, remember: bool) -> i64 {
        if remember {
            self.remember_ttl
        } else {
            self.session_ttl
        }
    }

    /// Issue a session token for a logged-in user
    ///
    /// # Errors
    /// Returns an error if token encoding fails
    pub fn issue_session(&self, user_id: Id, remember: bool) -> Result<String, AppError> {
        self.encode_at(user_id, TokenKind::Session, Utc::now(), self.session_ttl(remember))
    }

    /// Issue a password-reset token for a user
    ///
    /// Pure computation: nothing is persisted and no side effect occurs.
    ///
    /// # Errors
    /// Returns an error if token encoding fails
    pub fn issue_password_reset(&self, user_id: Id) -> Result<String, AppError> {
        self.encode_at(user_id, TokenKind::PasswordReset, Utc::now(), RESET_TOKEN_TTL_SECS)
    }

    fn encode_at(
        &self,
        user_id: Id,
        kind: TokenKind,
        issued_at: DateTime<Utc>,
        ttl_secs: i64,
    ) -> Result<String, AppError> {
        let claims = Claims {
            sub: user_id.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + Duration::seconds(ttl_secs)).timestamp(),
            kind,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Failed to encode token")))
    }

    /// Decode and validate a token of any kind
    ///
    /// # Errors
    /// Returns `TokenExpired` past the expiration instant (no leeway) and
    /// `TokenInvalid` for a bad signature or malformed payload
    pub fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::default();
        // The 30-minute reset window is a hard boundary
        validation.leeway = 0;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::TokenInvalid,
            }
        })?;

        Ok(token_data.claims)
    }

    /// Verify a session token and return the user id it was bound to
    ///
    /// # Errors
    /// Returns an error if the token is invalid, expired, or not a session token
    pub fn verify_session(&self, token: &str) -> Result<Id, AppError> {
        let claims = self.decode_token(token)?;

        if claims.kind != TokenKind::Session {
            return Err(AppError::TokenInvalid);
        }

        claims.user_id()
    }

    /// Verify a password-reset token and return the user id it was issued for
    ///
    /// A token that verified before keeps verifying until its window closes;
    /// nothing marks it consumed.
    ///
    /// # Errors
    /// Returns `TokenExpired` past the 30-minute window, `TokenInvalid` on
    /// tampering, malformed payloads, or a session token presented here
    pub fn verify_password_reset(&self, token: &str) -> Result<Id, AppError> {
        let claims = self.decode_token(token)?;

        if claims.kind != TokenKind::PasswordReset {
            return Err(AppError::TokenInvalid);
        }

        claims.user_id()
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("session_ttl", &self.session_ttl)
            .field("remember_ttl", &self.remember_ttl)
            .finish_non_exhaustive()
    }
}
