//! Article service
//!
//! Implements business logic for article management:
//! - Create placeholder articles
//! - Save edited articles
//! - Delete articles
//! - Toggle publication status
//!
//! The service owns id and timestamp assignment. Confirmation before delete
//! is the caller's job.

use crate::db::repositories::ArticleRepository;
use crate::models::Article;
use anyhow::Context;
use chrono::Utc;
use std::sync::Arc;

/// Error types for article service operations
#[derive(Debug, thiserror::Error)]
pub enum ArticleServiceError {
    /// Article not found
    #[error("Article not found: {0}")]
    NotFound(i64),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Article service for managing catalogue entries
pub struct ArticleService {
    repo: Arc<dyn ArticleRepository>,
}

impl ArticleService {
    /// Create a new article service
    pub fn new(repo: Arc<dyn ArticleRepository>) -> Self {
        Self { repo }
    }

    /// Create a placeholder draft authored by `author_id`
    ///
    /// The new article is prepended, so listings stay newest first. Its id is
    /// the collection length + 1, which can repeat an id freed by a delete.
    pub async fn create(&self, author_id: i64) -> Result<Article, ArticleServiceError> {
        let article = self
            .repo
            .create_with(Box::new(move |id| Article::placeholder(id, author_id)))
            .await
            .context("Failed to create article")?;

        tracing::debug!(article_id = article.id, author_id, "Article created");
        Ok(article)
    }

    /// Save an edited article
    ///
    /// Replaces the stored article with the same id and refreshes
    /// `updated_at`. `created_at` is always taken from the stored copy.
    ///
    /// # Errors
    /// - `NotFound` if no article has this id
    pub async fn save(&self, article: Article) -> Result<Article, ArticleServiceError> {
        let existing = self.require(article.id).await?;

        let updated = Article {
            created_at: existing.created_at,
            updated_at: Utc::now(),
            ..article
        };
        self.store(&updated).await?;

        tracing::debug!(article_id = updated.id, "Article saved");
        Ok(updated)
    }

    /// Delete an article
    ///
    /// # Errors
    /// - `NotFound` if no article has this id
    pub async fn delete(&self, id: i64) -> Result<(), ArticleServiceError> {
        let removed = self
            .repo
            .delete(id)
            .await
            .context("Failed to delete article")?;

        if removed == 0 {
            return Err(ArticleServiceError::NotFound(id));
        }

        tracing::debug!(article_id = id, removed, "Article deleted");
        Ok(())
    }

    /// Flip an article between draft and published
    ///
    /// The stored copy is the one flipped, so unsaved edits held by the
    /// caller are not written.
    ///
    /// # Errors
    /// - `NotFound` if no article has this id
    pub async fn toggle_publish(&self, article: &Article) -> Result<Article, ArticleServiceError> {
        let existing = self.require(article.id).await?;

        let updated = Article {
            status: existing.status.toggled(),
            updated_at: Utc::now(),
            ..existing
        };
        self.store(&updated).await?;

        tracing::debug!(article_id = updated.id, status = %updated.status, "Article status toggled");
        Ok(updated)
    }

    /// Get article by ID
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Article>, ArticleServiceError> {
        let article = self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get article")?;
        Ok(article)
    }

    /// All articles, newest first
    pub async fn list(&self) -> Result<Vec<Article>, ArticleServiceError> {
        let articles = self.repo.list().await.context("Failed to list articles")?;
        Ok(articles)
    }

    /// Number of articles written by the given user
    pub async fn count_by_author(&self, author_id: i64) -> Result<usize, ArticleServiceError> {
        let articles = self.list().await?;
        Ok(articles.iter().filter(|a| a.author_id == author_id).count())
    }

    async fn require(&self, id: i64) -> Result<Article, ArticleServiceError> {
        self.get_by_id(id)
            .await?
            .ok_or(ArticleServiceError::NotFound(id))
    }

    async fn store(&self, article: &Article) -> Result<(), ArticleServiceError> {
        let replaced = self
            .repo
            .replace(article)
            .await
            .context("Failed to update article")?;
        if replaced == 0 {
            return Err(ArticleServiceError::NotFound(article.id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::MemoryArticleRepository;
    use crate::db::seed;
    use crate::models::{ArticleStatus, NEW_ARTICLE_TITLE};

    fn setup_test_service() -> ArticleService {
        ArticleService::new(MemoryArticleRepository::boxed(seed::articles()))
    }

    fn ids(articles: &[Article]) -> Vec<i64> {
        articles.iter().map(|a| a.id).collect()
    }

    // ========================================================================
    // Create tests
    // ========================================================================

    #[tokio::test]
    async fn test_create_placeholder() {
        let service = setup_test_service();

        let article = service.create(2).await.expect("Failed to create");

        assert_eq!(article.id, 3);
        assert_eq!(article.title, NEW_ARTICLE_TITLE);
        assert_eq!(article.status, ArticleStatus::Draft);
        assert_eq!(article.author_id, 2);
        assert!(article.tags.is_empty());
        assert_eq!(article.created_at, article.updated_at);
    }

    #[tokio::test]
    async fn test_create_prepends() {
        let service = setup_test_service();

        service.create(1).await.unwrap();

        let articles = service.list().await.unwrap();
        assert_eq!(ids(&articles), vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn test_id_reuse_after_delete() {
        let service = setup_test_service();

        // Deleting SCP-001 shrinks the collection to 1, so the next id is 2
        // again, colliding with SCP-002.
        service.delete(1).await.unwrap();
        let created = service.create(1).await.unwrap();
        assert_eq!(created.id, 2);
        assert_eq!(ids(&service.list().await.unwrap()), vec![2, 2]);
    }

    #[tokio::test]
    async fn test_id_one_reused_after_emptying() {
        let service = setup_test_service();

        service.delete(1).await.unwrap();
        service.delete(2).await.unwrap();
        let created = service.create(1).await.unwrap();

        assert_eq!(created.id, 1);
    }

    // ========================================================================
    // Save tests
    // ========================================================================

    #[tokio::test]
    async fn test_save_updates_fields_and_timestamp() {
        let service = setup_test_service();
        let mut article = service.get_by_id(2).await.unwrap().unwrap();
        let created_at = article.created_at;
        let previous_update = article.updated_at;

        article.title = "SCP-002 - The Vault (revised)".to_string();
        article.tags = vec!["keter".to_string()];
        let saved = service.save(article).await.expect("Failed to save");

        assert_eq!(saved.title, "SCP-002 - The Vault (revised)");
        assert_eq!(saved.tags, vec!["keter"]);
        assert_eq!(saved.created_at, created_at);
        assert!(saved.updated_at >= previous_update);

        let stored = service.get_by_id(2).await.unwrap().unwrap();
        assert_eq!(stored, saved);
    }

    #[tokio::test]
    async fn test_save_ignores_caller_created_at() {
        let service = setup_test_service();
        let original = service.get_by_id(1).await.unwrap().unwrap();

        let mut tampered = original.clone();
        tampered.created_at = original.created_at - chrono::Duration::days(30);
        let saved = service.save(tampered).await.unwrap();

        assert_eq!(saved.created_at, original.created_at);
    }

    #[tokio::test]
    async fn test_create_then_save_unmodified() {
        let service = setup_test_service();

        let created = service.create(1).await.unwrap();
        let saved = service.save(created.clone()).await.unwrap();

        assert!(saved.same_except_updated_at(&created));
        assert!(saved.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_save_missing_article_is_not_found() {
        let service = setup_test_service();
        let ghost = Article::placeholder(42, 1);

        let result = service.save(ghost).await;

        assert!(matches!(result, Err(ArticleServiceError::NotFound(42))));
        assert_eq!(service.list().await.unwrap().len(), 2);
    }

    // ========================================================================
    // Delete tests
    // ========================================================================

    #[tokio::test]
    async fn test_delete() {
        let service = setup_test_service();

        service.delete(1).await.expect("Failed to delete");

        assert!(service.get_by_id(1).await.unwrap().is_none());
        assert_eq!(ids(&service.list().await.unwrap()), vec![2]);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let service = setup_test_service();

        let result = service.delete(99).await;
        assert!(matches!(result, Err(ArticleServiceError::NotFound(99))));
    }

    // ========================================================================
    // Publish tests
    // ========================================================================

    #[tokio::test]
    async fn test_toggle_publish() {
        let service = setup_test_service();
        let draft = service.get_by_id(2).await.unwrap().unwrap();

        let published = service.toggle_publish(&draft).await.unwrap();

        assert_eq!(published.status, ArticleStatus::Published);
        assert!(published.updated_at >= draft.updated_at);
        assert_eq!(service.get_by_id(2).await.unwrap().unwrap().status, ArticleStatus::Published);
    }

    #[tokio::test]
    async fn test_toggle_publish_twice_restores_original() {
        let service = setup_test_service();
        let original = service.get_by_id(1).await.unwrap().unwrap();

        let once = service.toggle_publish(&original).await.unwrap();
        let twice = service.toggle_publish(&once).await.unwrap();

        assert_eq!(once.status, ArticleStatus::Draft);
        assert!(twice.same_except_updated_at(&original));
        assert!(twice.updated_at >= once.updated_at);
    }

    #[tokio::test]
    async fn test_toggle_publish_does_not_write_unsaved_edits() {
        let service = setup_test_service();
        let mut article = service.get_by_id(2).await.unwrap().unwrap();
        article.title = "unsaved".to_string();

        let toggled = service.toggle_publish(&article).await.unwrap();

        assert_eq!(toggled.title, "SCP-002 - The Vault");
    }

    #[tokio::test]
    async fn test_toggle_publish_missing_is_not_found() {
        let service = setup_test_service();
        let ghost = Article::placeholder(7, 1);

        assert!(matches!(
            service.toggle_publish(&ghost).await,
            Err(ArticleServiceError::NotFound(7))
        ));
    }

    #[tokio::test]
    async fn test_count_by_author() {
        let service = setup_test_service();
        service.create(1).await.unwrap();

        assert_eq!(service.count_by_author(1).await.unwrap(), 2);
        assert_eq!(service.count_by_author(2).await.unwrap(), 1);
        assert_eq!(service.count_by_author(3).await.unwrap(), 0);
    }
}
