//! Data store
//!
//! The wiki keeps users and articles in process memory. Nothing here outlives
//! the process except preferences, which live in their own repository.
//!
//! # Usage
//!
//! ```ignore
//! use scp_wiki::db::DataStore;
//!
//! let store = DataStore::seeded();
//! let articles = store.articles.list().await?;
//! ```

pub mod repositories;
pub mod seed;

use std::sync::Arc;

use repositories::{
    ArticleRepository, MemoryArticleRepository, MemoryUserRepository, UserRepository,
};

/// The in-memory user and article collections
#[derive(Clone)]
pub struct DataStore {
    pub users: Arc<dyn UserRepository>,
    pub articles: Arc<dyn ArticleRepository>,
}

impl DataStore {
    /// A store with no users and no articles
    pub fn empty() -> Self {
        Self {
            users: MemoryUserRepository::boxed(Vec::new()),
            articles: MemoryArticleRepository::boxed(Vec::new()),
        }
    }

    /// A store holding the demo users and articles
    pub fn seeded() -> Self {
        Self {
            users: MemoryUserRepository::boxed(seed::users()),
            articles: MemoryArticleRepository::boxed(seed::articles()),
        }
    }
}
