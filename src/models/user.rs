//! User model
//!
//! This module defines the User entity and its role for the wiki.
//!
//! Passwords are kept as plaintext. The wiki is a demo catalogue with a
//! seeded user list and performs no hashing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// User entity representing a registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier (current user count + 1 at registration)
    pub id: i64,
    /// Username (unique, case-sensitive)
    pub username: String,
    /// Plaintext password
    #[serde(skip_serializing, default)]
    pub password: String,
    /// User role
    pub role: UserRole,
}

impl User {
    /// Create a new User with the given parameters.
    pub fn new(id: i64, username: impl Into<String>, password: impl Into<String>, role: UserRole) -> Self {
        Self {
            id,
            username: username.into(),
            password: password.into(),
            role,
        }
    }

    /// Check whether the given credentials match this user exactly
    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

/// User role.
///
/// Roles are informational only; the wiki has no authorization boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Administrator
    Admin,
    /// Regular user (assigned on registration)
    #[default]
    User,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Admin => write!(f, "admin"),
            UserRole::User => write!(f, "user"),
        }
    }
}
