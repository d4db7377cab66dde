//! Article repository
//!
//! Storage operations for articles.
//!
//! Articles are kept newest first: creation prepends. Ids are the collection
//! length + 1 at creation time, so an id can be handed out again after a
//! delete, and two stored articles may share an id. Replace and delete act on
//! every entry carrying the id.

use crate::models::Article;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Article repository trait
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Prepend an article built by `build` from the next id
    ///
    /// The id is computed and the article inserted under the same lock.
    async fn create_with(&self, build: Box<dyn FnOnce(i64) -> Article + Send>) -> Result<Article>;

    /// Get the first article with the given ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Article>>;

    /// Replace every stored article with the same ID; returns how many were replaced
    async fn replace(&self, article: &Article) -> Result<usize>;

    /// Remove every article with the given ID; returns how many were removed
    async fn delete(&self, id: i64) -> Result<usize>;

    /// All articles, newest first
    async fn list(&self) -> Result<Vec<Article>>;
}

/// In-memory article repository
#[derive(Debug, Default)]
pub struct MemoryArticleRepository {
    articles: RwLock<Vec<Article>>,
}

impl MemoryArticleRepository {
    /// Create a repository holding the given articles in display order
    pub fn with_articles(articles: Vec<Article>) -> Self {
        Self {
            articles: RwLock::new(articles),
        }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(articles: Vec<Article>) -> Arc<dyn ArticleRepository> {
        Arc::new(Self::with_articles(articles))
    }
}

#[async_trait]
impl ArticleRepository for MemoryArticleRepository {
    async fn create_with(&self, build: Box<dyn FnOnce(i64) -> Article + Send>) -> Result<Article> {
        let mut articles = self.articles.write().await;
        let article = build(articles.len() as i64 + 1);
        articles.insert(0, article.clone());
        Ok(article)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Article>> {
        let articles = self.articles.read().await;
        Ok(articles.iter().find(|a| a.id == id).cloned())
    }

    async fn replace(&self, article: &Article) -> Result<usize> {
        let mut articles = self.articles.write().await;
        let mut replaced = 0;
        for slot in articles.iter_mut().filter(|a| a.id == article.id) {
            *slot = article.clone();
            replaced += 1;
        }
        Ok(replaced)
    }

    async fn delete(&self, id: i64) -> Result<usize> {
        let mut articles = self.articles.write().await;
        let before = articles.len();
        articles.retain(|a| a.id != id);
        Ok(before - articles.len())
    }

    async fn list(&self) -> Result<Vec<Article>> {
        Ok(self.articles.read().await.clone())
    }
}
