//! Article search and status filtering
//!
//! Listings are derived in two steps: a case-insensitive title search narrows
//! the collection, then a status filter partitions the result. Both steps
//! keep the original order.

use crate::models::{Article, ArticleStatus};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status partition applied to a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    /// Every article
    #[default]
    All,
    /// Published articles only
    Published,
    /// Draft articles only
    Drafts,
}

impl StatusFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Published => "published",
            StatusFilter::Drafts => "drafts",
        }
    }

    /// Whether an article with `status` belongs to this partition
    pub fn admits(&self, status: ArticleStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Published => status == ArticleStatus::Published,
            StatusFilter::Drafts => status == ArticleStatus::Draft,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "published" => Ok(StatusFilter::Published),
            "drafts" | "draft" => Ok(StatusFilter::Drafts),
            _ => Err(anyhow::anyhow!("Invalid status filter: {}", s)),
        }
    }
}

/// Keep articles whose title contains `query`, ignoring case
///
/// An empty query returns the input unchanged.
pub fn filter(articles: &[Article], query: &str) -> Vec<Article> {
    if query.is_empty() {
        return articles.to_vec();
    }
    let needle = query.to_lowercase();
    articles
        .iter()
        .filter(|a| a.title.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Keep articles admitted by `status`
pub fn partition(articles: &[Article], status: StatusFilter) -> Vec<Article> {
    articles
        .iter()
        .filter(|a| status.admits(a.status))
        .cloned()
        .collect()
}

/// Search then partition
pub fn apply(articles: &[Article], query: &str, status: StatusFilter) -> Vec<Article> {
    partition(&filter(articles, query), status)
}

/// Per-status counts of a search result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ListingSummary {
    pub total: usize,
    pub published: usize,
    pub drafts: usize,
}

impl ListingSummary {
    /// Count the articles matching `query`, split by status
    pub fn of(articles: &[Article], query: &str) -> Self {
        let matched = filter(articles, query);
        let published = matched.iter().filter(|a| a.is_published()).count();
        Self {
            total: matched.len(),
            published,
            drafts: matched.len() - published,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::seed;

    fn titles(articles: &[Article]) -> Vec<&str> {
        articles.iter().map(|a| a.title.as_str()).collect()
    }

    #[test]
    fn test_filter_by_number() {
        let articles = seed::articles();
        assert_eq!(titles(&filter(&articles, "002")), vec!["SCP-002 - The Vault"]);
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let articles = seed::articles();
        assert_eq!(titles(&filter(&articles, "the SEED")), vec!["SCP-001 - The Seed"]);
        assert_eq!(filter(&articles, "scp").len(), 2);
    }

    #[test]
    fn test_filter_ignores_content_and_tags() {
        let articles = seed::articles();
        assert!(filter(&articles, "humanoid").is_empty());
        assert!(filter(&articles, "Site-77").is_empty());
    }

    #[test]
    fn test_filter_empty_query_is_identity() {
        let articles = seed::articles();
        assert_eq!(filter(&articles, ""), articles);
    }

    #[test]
    fn test_partition() {
        let articles = seed::articles();
        assert_eq!(titles(&partition(&articles, StatusFilter::Published)), vec!["SCP-001 - The Seed"]);
        assert_eq!(titles(&partition(&articles, StatusFilter::Drafts)), vec!["SCP-002 - The Vault"]);
        assert_eq!(partition(&articles, StatusFilter::All), articles);
    }

    #[test]
    fn test_apply_composes_search_then_status() {
        let articles = seed::articles();
        assert!(apply(&articles, "002", StatusFilter::Published).is_empty());
        assert_eq!(apply(&articles, "scp", StatusFilter::Drafts).len(), 1);
    }

    #[test]
    fn test_listing_summary() {
        let articles = seed::articles();

        assert_eq!(
            ListingSummary::of(&articles, ""),
            ListingSummary { total: 2, published: 1, drafts: 1 }
        );
        assert_eq!(
            ListingSummary::of(&articles, "vault"),
            ListingSummary { total: 1, published: 0, drafts: 1 }
        );
    }

    #[test]
    fn test_status_filter_from_str() {
        assert_eq!("all".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!("Published".parse::<StatusFilter>().unwrap(), StatusFilter::Published);
        assert_eq!("drafts".parse::<StatusFilter>().unwrap(), StatusFilter::Drafts);
        assert!("archived".parse::<StatusFilter>().is_err());
    }
}

/// Property-based tests for search and partition
#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn status_strategy() -> impl Strategy<Value = ArticleStatus> {
        prop_oneof![Just(ArticleStatus::Draft), Just(ArticleStatus::Published)]
    }

    fn filter_strategy() -> impl Strategy<Value = StatusFilter> {
        prop_oneof![
            Just(StatusFilter::All),
            Just(StatusFilter::Published),
            Just(StatusFilter::Drafts),
        ]
    }

    fn articles_strategy() -> impl Strategy<Value = Vec<Article>> {
        proptest::collection::vec(("[A-Za-z0-9 -]{0,20}", status_strategy()), 0..12).prop_map(
            |entries| {
                entries
                    .into_iter()
                    .enumerate()
                    .map(|(i, (title, status))| {
                        Article::new(i as i64 + 1, title, "", Vec::new(), status, 1)
                    })
                    .collect()
            },
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn empty_query_is_identity(articles in articles_strategy()) {
            prop_assert_eq!(filter(&articles, ""), articles);
        }

        #[test]
        fn filter_result_is_ordered_subsequence(
            articles in articles_strategy(),
            query in "[A-Za-z0-9]{0,3}",
        ) {
            let result = filter(&articles, &query);
            let mut remaining = articles.iter();
            for hit in &result {
                prop_assert!(hit.title.to_lowercase().contains(&query.to_lowercase()));
                prop_assert!(remaining.any(|a| a == hit), "result out of order");
            }
        }

        #[test]
        fn partitions_cover_all(articles in articles_strategy()) {
            let published = partition(&articles, StatusFilter::Published);
            let drafts = partition(&articles, StatusFilter::Drafts);
            prop_assert_eq!(published.len() + drafts.len(), articles.len());
            prop_assert!(published.iter().all(|a| a.status == ArticleStatus::Published));
            prop_assert!(drafts.iter().all(|a| a.status == ArticleStatus::Draft));
        }

        #[test]
        fn summary_matches_partitions(
            articles in articles_strategy(),
            query in "[A-Za-z]{0,2}",
            status in filter_strategy(),
        ) {
            let summary = ListingSummary::of(&articles, &query);
            let shown = apply(&articles, &query, status).len();
            let expected = match status {
                StatusFilter::All => summary.total,
                StatusFilter::Published => summary.published,
                StatusFilter::Drafts => summary.drafts,
            };
            prop_assert_eq!(shown, expected);
        }
    }
}
