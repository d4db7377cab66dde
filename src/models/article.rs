//! Article model
//!
//! This module provides:
//! - `Article` entity representing one catalogued anomalous object
//! - `ArticleStatus` enum for publication states
//! - `ArticleDraft`, the editable form of an article held by the editor

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Title given to freshly created articles
pub const NEW_ARTICLE_TITLE: &str = "New object";

/// Markdown skeleton given to freshly created articles
pub const NEW_ARTICLE_CONTENT: &str = "# Special Containment Procedures\n\n\n# Description\n\n";

/// Article entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Identifier (collection length + 1 at creation, may repeat after deletes)
    pub id: i64,
    /// Article title
    pub title: String,
    /// Markdown content
    pub content: String,
    /// Ordered tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Publication status
    pub status: ArticleStatus,
    /// Author user ID (not enforced)
    pub author_id: i64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Article {
    /// Create a new article with the given parameters
    pub fn new(
        id: i64,
        title: impl Into<String>,
        content: impl Into<String>,
        tags: Vec<String>,
        status: ArticleStatus,
        author_id: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            title: title.into(),
            content: content.into(),
            tags,
            status,
            author_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create the placeholder article produced by the "new object" action
    pub fn placeholder(id: i64, author_id: i64) -> Self {
        Self::new(
            id,
            NEW_ARTICLE_TITLE,
            NEW_ARTICLE_CONTENT,
            Vec::new(),
            ArticleStatus::Draft,
            author_id,
        )
    }

    /// Check if the article is published
    pub fn is_published(&self) -> bool {
        self.status == ArticleStatus::Published
    }

    /// Apply an editor draft to this article, leaving identity and timestamps alone
    pub fn apply_draft(&mut self, draft: &ArticleDraft) {
        self.title = draft.title.clone();
        self.content = draft.content.clone();
        self.tags = draft.tags();
    }

    /// Check whether two articles are equal ignoring `updated_at`
    pub fn same_except_updated_at(&self, other: &Article) -> bool {
        self.id == other.id
            && self.title == other.title
            && self.content == other.content
            && self.tags == other.tags
            && self.status == other.status
            && self.author_id == other.author_id
            && self.created_at == other.created_at
    }
}

/// Article publication status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    /// Draft - not part of the published partition
    #[default]
    Draft,
    /// Published - visible to readers
    Published,
}

impl ArticleStatus {
    /// Convert status to its string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleStatus::Draft => "draft",
            ArticleStatus::Published => "published",
        }
    }

    /// The other status
    pub fn toggled(self) -> Self {
        match self {
            ArticleStatus::Draft => ArticleStatus::Published,
            ArticleStatus::Published => ArticleStatus::Draft,
        }
    }
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Editable copy of an article's fields
///
/// Tags are kept as the raw comma-separated text typed into the form and only
/// split when the draft is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleDraft {
    pub title: String,
    pub content: String,
    pub tags_input: String,
}

impl ArticleDraft {
    /// Build a draft holding the article's current values
    pub fn from_article(article: &Article) -> Self {
        Self {
            title: article.title.clone(),
            content: article.content.clone(),
            tags_input: article.tags.join(","),
        }
    }

    /// Tags parsed from the raw input
    pub fn tags(&self) -> Vec<String> {
        parse_tags(&self.tags_input)
    }
}

/// Split comma-separated tag input, trimming entries and dropping empty ones
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
