//! Services layer - Business logic
//!
//! This module contains the business logic services of the wiki.
//! Services are responsible for:
//! - Implementing business rules
//! - Coordinating repositories
//! - Handling error cases

pub mod article;
pub mod auth;
pub mod markdown;
pub mod preferences;
pub mod search;

pub use article::{ArticleService, ArticleServiceError};
pub use auth::{AuthService, AuthServiceError, LoginInput, RegisterInput};
pub use markdown::{ContentRenderer, MarkdownRenderer};
pub use preferences::{PreferencesService, PreferencesServiceError};
pub use search::{ListingSummary, StatusFilter};
