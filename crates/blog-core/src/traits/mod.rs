//! Repository traits (ports)

mod repositories;

pub use repositories::{PostRepository, RepoResult, UserRepository};
