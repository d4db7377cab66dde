//! User repository
//!
//! Storage operations for users.
//!
//! This module provides:
//! - `UserRepository` trait defining the interface for user data access
//! - `MemoryUserRepository` keeping users in process memory

use crate::models::{User, UserRole};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// User repository trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Append a new user; the id is the current user count + 1
    async fn create(&self, username: &str, password: &str, role: UserRole) -> Result<User>;

    /// Get user by username (case-sensitive)
    async fn get_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Find the user whose username and password both match exactly
    async fn find_by_credentials(&self, username: &str, password: &str) -> Result<Option<User>>;
}

/// In-memory user repository
#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl MemoryUserRepository {
    /// Create a repository holding the given users
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: RwLock::new(users),
        }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(users: Vec<User>) -> Arc<dyn UserRepository> {
        Arc::new(Self::with_users(users))
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, username: &str, password: &str, role: UserRole) -> Result<User> {
        let mut users = self.users.write().await;
        let user = User::new(users.len() as i64 + 1, username, password, role);
        users.push(user.clone());
        Ok(user)
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_credentials(&self, username: &str, password: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.matches(username, password)).cloned())
    }
}
