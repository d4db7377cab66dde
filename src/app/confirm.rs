//! Confirmation port
//!
//! Destructive intents ask the view layer for a yes/no answer before they
//! touch the store.

use async_trait::async_trait;

/// Yes/no question answered by the view layer
#[async_trait]
pub trait ConfirmPrompt: Send + Sync {
    /// Returns `true` when the user agreed
    async fn confirm(&self, message: &str) -> bool;
}

/// Answers every question the same way
///
/// Used for non-interactive runs and in tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

#[async_trait]
impl ConfirmPrompt for FixedAnswer {
    async fn confirm(&self, message: &str) -> bool {
        tracing::debug!(answer = self.0, "Auto-answered confirmation: {}", message);
        self.0
    }
}
