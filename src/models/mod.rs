//! Data models
//!
//! This module contains the data structures shared by the wiki.
//! Models represent:
//! - Stored entities (User, Article)
//! - The in-memory session
//! - The editor's draft form

mod article;
mod session;
mod user;

pub use article::{
    parse_tags, Article, ArticleDraft, ArticleStatus, NEW_ARTICLE_CONTENT, NEW_ARTICLE_TITLE,
};
pub use session::Session;
pub use user::{User, UserRole};
