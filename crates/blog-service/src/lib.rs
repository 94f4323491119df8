//! # blog-service
//!
//! Application layer containing business logic, services, and DTOs.

pub mod avatar;
pub mod dto;
pub mod mail;
pub mod services;

pub use avatar::{process_avatar, AvatarStore, ProcessedAvatar};
pub use dto::{
    AccountResponse, ChangePasswordRequest, CreatePostRequest, LoginRequest, LoginResponse,
    PageResponse, PostResponse, PublicUserResponse, RegisterRequest, RequestResetRequest,
    ResetPasswordRequest, UpdateAccountRequest, UpdatePostRequest,
};
pub use mail::{Mailer, SmtpMailer};
pub use services::{
    AccountService, AuthService, PostService, ServiceContext, ServiceContextBuilder,
    ServiceError, ServiceResult,
};
