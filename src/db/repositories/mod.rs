//! Repositories
//!
//! Repository pattern implementations for data access.
//! Each repository handles the operations for a specific entity.

pub mod article;
pub mod preferences;
pub mod user;

pub use article::{ArticleRepository, MemoryArticleRepository};
pub use preferences::{
    JsonFilePreferencesRepository, MemoryPreferencesRepository, PreferencesRepository,
};
pub use user::{MemoryUserRepository, UserRepository};
