//! Demo dataset loaded at startup

use crate::models::{Article, ArticleStatus, User, UserRole};

/// The two demo accounts
pub fn users() -> Vec<User> {
    vec![
        User::new(1, "admin", "admin123", UserRole::Admin),
        User::new(2, "researcher", "pass123", UserRole::User),
    ]
}

/// The two demo articles, in display order
pub fn articles() -> Vec<Article> {
    vec![
        Article::new(
            1,
            "SCP-001 - The Seed",
            "# Special Containment Procedures\n\nSecure in standard humanoid containment chamber at Site-77.\n\n# Description\n\nSCP-001 is a humanoid male with no anomalous properties.",
            tags(&["humanoid", "safe"]),
            ArticleStatus::Published,
            1,
        ),
        Article::new(
            2,
            "SCP-002 - The Vault",
            "# Special Containment Procedures\n\nMaintain pressure of 50psi within the chamber.\n\n# Description\n\nA spherical chamber made of unknown alloy.",
            tags(&["structure", "euclid"]),
            ArticleStatus::Draft,
            2,
        ),
    ]
}

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|t| t.to_string()).collect()
}
