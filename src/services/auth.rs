//! Auth service
//!
//! Implements sign-in for the wiki:
//! - Login against the stored user list
//! - Registration of new `user` accounts
//! - Logout
//!
//! The session lives in process memory only. Passwords are compared as
//! plaintext and there is no rate limiting or session expiry.

use crate::db::repositories::UserRepository;
use crate::models::{Session, User, UserRole};
use anyhow::Context;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Error types for auth service operations
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    /// No user matches both username and password
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// A user with this username already exists
    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Login input
#[derive(Debug, Clone)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

impl LoginInput {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Registration input
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub username: String,
    pub password: String,
}

impl RegisterInput {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Auth service holding the active session
pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
    session: RwLock<Option<Session>>,
}

impl AuthService {
    /// Create a new auth service with no active session
    pub fn new(user_repo: Arc<dyn UserRepository>) -> Self {
        Self {
            user_repo,
            session: RwLock::new(None),
        }
    }

    /// Login with credentials
    ///
    /// On success the returned user becomes the active session.
    ///
    /// # Errors
    ///
    /// - `InvalidCredentials` when no user matches both fields; the session is left untouched
    pub async fn login(&self, input: LoginInput) -> Result<User, AuthServiceError> {
        let user = self
            .user_repo
            .find_by_credentials(&input.username, &input.password)
            .await
            .context("Failed to look up user")?
            .ok_or(AuthServiceError::InvalidCredentials)?;

        tracing::info!(user_id = user.id, username = %user.username, "User logged in");
        self.establish(user.clone()).await;
        Ok(user)
    }

    /// Register a new user and sign them in
    ///
    /// The new account gets the `user` role and an id of the current user count + 1.
    ///
    /// # Errors
    ///
    /// - `UsernameTaken` if the username exists (case-sensitive); nothing is stored
    pub async fn register(&self, input: RegisterInput) -> Result<User, AuthServiceError> {
        if self
            .user_repo
            .get_by_username(&input.username)
            .await
            .context("Failed to check username")?
            .is_some()
        {
            return Err(AuthServiceError::UsernameTaken(input.username));
        }

        let user = self
            .user_repo
            .create(&input.username, &input.password, UserRole::User)
            .await
            .context("Failed to create user")?;

        tracing::info!(user_id = user.id, username = %user.username, "User registered");
        self.establish(user.clone()).await;
        Ok(user)
    }

    /// Clear the active session, whether or not one exists
    pub async fn logout(&self) {
        if let Some(session) = self.session.write().await.take() {
            tracing::info!(user_id = session.user_id(), "User logged out");
        }
    }

    /// The active session, if any
    pub async fn current_session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    /// The signed-in user, if any
    pub async fn current_user(&self) -> Option<User> {
        self.session.read().await.as_ref().map(|s| s.user.clone())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.read().await.is_some()
    }

    async fn establish(&self, user: User) {
        *self.session.write().await = Some(Session::start(user));
    }
}
