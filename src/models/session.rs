//! Session model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::User;

/// The signed-in identity held in process memory.
///
/// Sessions never expire; they end only on logout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Authenticated user
    pub user: User,
    /// When the session was established
    pub started_at: DateTime<Utc>,
}

impl Session {
    /// Start a session for the given user
    pub fn start(user: User) -> Self {
        Self {
            user,
            started_at: Utc::now(),
        }
    }

    /// ID of the signed-in user
    pub fn user_id(&self) -> i64 {
        self.user.id
    }
}
