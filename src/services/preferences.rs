//! Preferences service
//!
//! Business logic for the persisted client preferences. The only preference
//! is the dark-mode flag, stored JSON-encoded under `darkMode`.

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::db::repositories::PreferencesRepository;

/// Known preference keys
pub mod keys {
    pub const DARK_MODE: &str = "darkMode";
}

/// Preferences service errors
#[derive(Debug, Error)]
pub enum PreferencesServiceError {
    #[error("Failed to save preferences: {0}")]
    SaveError(String),
}

/// Preferences service holding the current dark-mode flag
///
/// The flag is read from the repository once, in [`PreferencesService::load`],
/// and written back on every change.
pub struct PreferencesService {
    repo: Arc<dyn PreferencesRepository>,
    dark_mode: RwLock<bool>,
}

impl PreferencesService {
    /// Read the stored preferences
    ///
    /// A missing, unreadable or malformed value falls back to `false`.
    pub async fn load(repo: Arc<dyn PreferencesRepository>) -> Self {
        let dark_mode = match repo.get(keys::DARK_MODE).await {
            Ok(Some(raw)) => serde_json::from_str::<bool>(&raw).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed {} preference {:?}: {}", keys::DARK_MODE, raw, e);
                false
            }),
            Ok(None) => false,
            Err(e) => {
                tracing::warn!("Failed to read preferences, using defaults: {:#}", e);
                false
            }
        };

        Self {
            repo,
            dark_mode: RwLock::new(dark_mode),
        }
    }

    /// Current dark-mode flag
    pub async fn dark_mode(&self) -> bool {
        *self.dark_mode.read().await
    }

    /// Set and persist the dark-mode flag
    pub async fn set_dark_mode(&self, enabled: bool) -> Result<(), PreferencesServiceError> {
        let mut current = self.dark_mode.write().await;
        let encoded = serde_json::to_string(&enabled)
            .map_err(|e| PreferencesServiceError::SaveError(e.to_string()))?;
        self.repo
            .set(keys::DARK_MODE, &encoded)
            .await
            .map_err(|e| PreferencesServiceError::SaveError(format!("{:#}", e)))?;
        *current = enabled;
        tracing::debug!(dark_mode = enabled, "Theme preference saved");
        Ok(())
    }

    /// Flip the dark-mode flag; returns the new value
    pub async fn toggle_dark_mode(&self) -> Result<bool, PreferencesServiceError> {
        let next = !self.dark_mode().await;
        self.set_dark_mode(next).await?;
        Ok(next)
    }
}
