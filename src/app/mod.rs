//! Application state machine
//!
//! [`App`] owns the active view, the listing's search and status filter, and
//! the current notification. Every user intent goes through one of its
//! methods, which checks the view preconditions, delegates to the services in
//! [`AppContext`] and then moves to the next view.
//!
//! Domain failures (bad credentials, taken usernames, missing articles, empty
//! form fields) are turned into error notifications and also returned to the
//! caller. Rejected transitions are caller errors: they are returned and
//! logged, but never shown as notifications.

pub mod confirm;
pub mod notification;
pub mod view;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::Config;
use crate::db::repositories::JsonFilePreferencesRepository;
use crate::db::DataStore;
use crate::models::{Article, User, UserRole};
use crate::services::{
    search, ArticleService, ArticleServiceError, AuthService, AuthServiceError, ContentRenderer,
    ListingSummary, LoginInput, MarkdownRenderer, PreferencesService, PreferencesServiceError,
    RegisterInput, StatusFilter,
};

pub use confirm::{ConfirmPrompt, FixedAnswer};
pub use notification::{
    DismissTimer, ManualTimer, Notification, NotificationKind, Notifier, TokioTimer,
};
pub use view::{EditorEntry, Editor, Intent, Route, TransitionError, View, ViewKind};

/// Question asked before an article is deleted
pub const DELETE_CONFIRMATION: &str = "Do you really want to delete this object?";

/// Application errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthServiceError),

    #[error(transparent)]
    Article(#[from] ArticleServiceError),

    #[error(transparent)]
    Preferences(#[from] PreferencesServiceError),

    /// A required form field was left empty
    #[error("{0} is required")]
    ValidationRequired(&'static str),

    #[error("Invalid transition: {0}")]
    Transition(#[from] TransitionError),
}

impl AppError {
    /// Text of the error notification, `None` for caller errors
    pub fn user_message(&self) -> Option<String> {
        let message = match self {
            AppError::Auth(AuthServiceError::InvalidCredentials) => {
                "Invalid username or password".to_string()
            }
            AppError::Auth(AuthServiceError::UsernameTaken(_)) => {
                "Username already taken".to_string()
            }
            AppError::Article(ArticleServiceError::NotFound(_)) => "Object not found".to_string(),
            AppError::Preferences(_) => "Could not save the theme preference".to_string(),
            AppError::ValidationRequired(field) => format!("{} is required", field),
            AppError::Auth(AuthServiceError::InternalError(_))
            | AppError::Article(ArticleServiceError::InternalError(_)) => {
                "Something went wrong".to_string()
            }
            AppError::Transition(_) => return None,
        };
        Some(message)
    }
}

/// Services and collaborators shared by the state machine
///
/// Built once at startup and owned by [`App`].
pub struct AppContext {
    pub store: DataStore,
    pub auth: AuthService,
    pub articles: ArticleService,
    pub preferences: PreferencesService,
    pub renderer: Arc<dyn ContentRenderer>,
    pub confirm: Arc<dyn ConfirmPrompt>,
    pub timer: Arc<dyn DismissTimer>,
}

impl AppContext {
    /// Wire the services over `store`
    pub fn new(
        store: DataStore,
        preferences: PreferencesService,
        confirm: Arc<dyn ConfirmPrompt>,
        timer: Arc<dyn DismissTimer>,
    ) -> Self {
        Self {
            auth: AuthService::new(store.users.clone()),
            articles: ArticleService::new(store.articles.clone()),
            store,
            preferences,
            renderer: Arc::new(MarkdownRenderer::new()),
            confirm,
            timer,
        }
    }

    /// Build the context described by `config`
    ///
    /// Preferences come from the configured JSON file and notifications are
    /// dismissed on the tokio clock.
    pub async fn from_config(config: &Config, confirm: Arc<dyn ConfirmPrompt>) -> Self {
        let store = if config.seed.enabled {
            DataStore::seeded()
        } else {
            DataStore::empty()
        };
        let preferences = PreferencesService::load(JsonFilePreferencesRepository::boxed(
            config.preferences.path.clone(),
        ))
        .await;

        tracing::info!(
            seeded = config.seed.enabled,
            preferences = %config.preferences.path.display(),
            "Application context ready"
        );

        Self::new(store, preferences, confirm, Arc::new(TokioTimer))
    }

    /// Replace the content renderer
    pub fn with_renderer(mut self, renderer: Arc<dyn ContentRenderer>) -> Self {
        self.renderer = renderer;
        self
    }
}

/// What the profile view shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileSummary {
    pub username: String,
    pub role: UserRole,
    pub articles_authored: usize,
    pub signed_in_at: DateTime<Utc>,
}

/// The application state machine
pub struct App {
    ctx: AppContext,
    view: View,
    search_query: String,
    status_filter: StatusFilter,
    notifier: Notifier,
}

impl App {
    /// Start on the landing view with no session
    pub fn new(ctx: AppContext, dismiss_after: Duration) -> Self {
        let notifier = Notifier::new(ctx.timer.clone(), dismiss_after);
        Self {
            ctx,
            view: View::default(),
            search_query: String::new(),
            status_filter: StatusFilter::default(),
            notifier,
        }
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn notification(&self) -> Notification {
        self.notifier.current()
    }

    /// Close the visible notification before its timer runs out
    pub fn dismiss_notification(&mut self) {
        self.notifier.dismiss();
    }

    pub async fn current_user(&self) -> Option<User> {
        self.ctx.auth.current_user().await
    }

    // ----- navigation -----

    /// Follow a header link or form switch
    pub async fn navigate(&mut self, route: Route) -> Result<(), AppError> {
        let next = self.next_view(Intent::Go(route)).await?;
        self.enter(next);
        Ok(())
    }

    /// Sign in and go home
    pub async fn submit_login(&mut self, username: &str, password: &str) -> Result<User, AppError> {
        let next = self.next_view(Intent::SignedIn).await?;

        let result = self.login(username, password).await;
        let user = self.report(result)?;

        self.enter(next);
        self.notifier.success("Logged in successfully");
        Ok(user)
    }

    /// Create an account, sign in and go home
    pub async fn submit_register(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<User, AppError> {
        let next = self.next_view(Intent::SignedIn).await?;

        let result = self.register(username, password).await;
        let user = self.report(result)?;

        self.enter(next);
        self.notifier.success("Registration successful");
        Ok(user)
    }

    /// Clear the session and return to the landing page
    pub async fn logout(&mut self) -> Result<(), AppError> {
        self.ctx.auth.logout().await;
        let next = self.next_view(Intent::SignedOut).await?;
        self.enter(next);
        Ok(())
    }

    async fn login(&self, username: &str, password: &str) -> Result<User, AppError> {
        required("Username", username)?;
        required("Password", password)?;
        Ok(self.ctx.auth.login(LoginInput::new(username, password)).await?)
    }

    async fn register(&self, username: &str, password: &str) -> Result<User, AppError> {
        required("Username", username)?;
        required("Password", password)?;
        Ok(self
            .ctx
            .auth
            .register(RegisterInput::new(username, password))
            .await?)
    }

    // ----- listing -----

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn status_filter(&self) -> StatusFilter {
        self.status_filter
    }

    pub fn set_status_filter(&mut self, status: StatusFilter) {
        self.status_filter = status;
    }

    /// Articles matching the search query and status filter, newest first
    pub async fn visible_articles(&self) -> Result<Vec<Article>, AppError> {
        let articles = self.ctx.articles.list().await?;
        Ok(search::apply(
            &articles,
            &self.search_query,
            self.status_filter,
        ))
    }

    /// Per-status counts for the current search query
    pub async fn listing_summary(&self) -> Result<ListingSummary, AppError> {
        let articles = self.ctx.articles.list().await?;
        Ok(ListingSummary::of(&articles, &self.search_query))
    }

    // ----- editor -----

    /// Open an existing article read-only
    pub async fn open_article(&mut self, id: i64) -> Result<(), AppError> {
        self.check_editor_entry(EditorEntry::Open).await?;

        let result = self.find_article(id).await;
        let article = self.report(result)?;

        let next = self.next_view(Intent::Open(article)).await?;
        self.enter(next);
        Ok(())
    }

    /// Create a placeholder article owned by the signed-in user and open it for editing
    pub async fn create_article(&mut self) -> Result<Article, AppError> {
        self.check_editor_entry(EditorEntry::Create).await?;
        let user = self
            .current_user()
            .await
            .ok_or(TransitionError::NotAuthenticated(ViewKind::Editor))?;

        let result = self.ctx.articles.create(user.id).await.map_err(AppError::from);
        let article = self.report(result)?;

        let next = self.next_view(Intent::Create(article.clone())).await?;
        self.enter(next);
        Ok(article)
    }

    /// Flip the editor between read-only and editable; returns the new mode
    pub fn toggle_edit_mode(&mut self) -> Result<bool, AppError> {
        let editor = self.editor_mut()?;
        let edit_mode = editor.toggle_edit_mode();
        tracing::debug!(article_id = editor.article.id, edit_mode, "Edit mode toggled");
        Ok(edit_mode)
    }

    pub fn edit_title(&mut self, title: impl Into<String>) -> Result<(), AppError> {
        self.editor_mut()?.draft_mut()?.title = title.into();
        Ok(())
    }

    pub fn edit_content(&mut self, content: impl Into<String>) -> Result<(), AppError> {
        self.editor_mut()?.draft_mut()?.content = content.into();
        Ok(())
    }

    /// Replace the comma-separated tag input
    pub fn edit_tags(&mut self, tags: impl Into<String>) -> Result<(), AppError> {
        self.editor_mut()?.draft_mut()?.tags_input = tags.into();
        Ok(())
    }

    /// Store the draft and leave edit mode
    pub async fn save_article(&mut self) -> Result<Article, AppError> {
        let editor = self.editor_mut()?;
        if !editor.edit_mode {
            return Err(TransitionError::NotEditing.into());
        }
        let edited = editor.edited_article();

        let result = self.ctx.articles.save(edited).await.map_err(AppError::from);
        let saved = self.report(result)?;

        self.editor_mut()?.saved(saved.clone());
        self.notifier.success("Object saved");
        Ok(saved)
    }

    /// Flip the open article between draft and published
    pub async fn toggle_publish(&mut self) -> Result<Article, AppError> {
        let current = self.editor_mut()?.article.clone();

        let result = self
            .ctx
            .articles
            .toggle_publish(&current)
            .await
            .map_err(AppError::from);
        let updated = self.report(result)?;

        self.editor_mut()?.refreshed(updated.clone());
        if updated.is_published() {
            self.notifier.success("Object published");
        } else {
            self.notifier.success("Object moved to drafts");
        }
        Ok(updated)
    }

    /// Delete an article after confirmation
    ///
    /// Returns `false` when the user declined. Deleting the open article
    /// closes the editor.
    pub async fn delete_article(&mut self, id: i64) -> Result<bool, AppError> {
        let from = self.view.kind();
        if !self.ctx.auth.is_authenticated().await {
            return Err(TransitionError::NotAuthenticated(ViewKind::Home).into());
        }
        if !matches!(from, ViewKind::Home | ViewKind::Editor) {
            return Err(TransitionError::NotAllowed {
                from,
                action: "delete an article",
            }
            .into());
        }

        if !self.ctx.confirm.confirm(DELETE_CONFIRMATION).await {
            tracing::debug!(article_id = id, "Deletion declined");
            return Ok(false);
        }

        let result = self.ctx.articles.delete(id).await.map_err(AppError::from);
        self.report(result)?;

        if self.view.editor().is_some_and(|e| e.article.id == id) {
            let next = self.next_view(Intent::Close).await?;
            self.enter(next);
        }
        self.notifier.success("Object deleted");
        Ok(true)
    }

    /// Stored content of the open article rendered as markup, when read-only
    pub fn rendered_content(&self) -> Option<String> {
        self.view
            .editor()
            .filter(|e| !e.edit_mode)
            .map(|e| self.ctx.renderer.render(&e.article.content))
    }

    // ----- profile & theme -----

    /// Signed-in user, session start and the number of articles they authored
    pub async fn profile(&self) -> Result<ProfileSummary, AppError> {
        let session = self
            .ctx
            .auth
            .current_session()
            .await
            .ok_or(TransitionError::NotAuthenticated(ViewKind::Profile))?;
        let articles_authored = self.ctx.articles.count_by_author(session.user_id()).await?;

        Ok(ProfileSummary {
            username: session.user.username,
            role: session.user.role,
            articles_authored,
            signed_in_at: session.started_at,
        })
    }

    pub async fn dark_mode(&self) -> bool {
        self.ctx.preferences.dark_mode().await
    }

    /// Flip and persist the theme; returns the new dark-mode flag
    pub async fn toggle_dark_mode(&mut self) -> Result<bool, AppError> {
        let result = self
            .ctx
            .preferences
            .toggle_dark_mode()
            .await
            .map_err(AppError::from);
        self.report(result)
    }

    // ----- internals -----

    async fn next_view(&self, intent: Intent) -> Result<View, AppError> {
        let authenticated = self.ctx.auth.is_authenticated().await;
        view::navigate(&self.view, authenticated, intent).map_err(|e| {
            tracing::warn!(from = %self.view.kind(), "Rejected transition: {}", e);
            AppError::from(e)
        })
    }

    async fn check_editor_entry(&self, entry: EditorEntry) -> Result<(), AppError> {
        let authenticated = self.ctx.auth.is_authenticated().await;
        view::check_editor_entry(&self.view, authenticated, entry).map_err(|e| {
            tracing::warn!(from = %self.view.kind(), "Rejected transition: {}", e);
            AppError::from(e)
        })
    }

    fn enter(&mut self, next: View) {
        tracing::debug!(from = %self.view.kind(), to = %next.kind(), "View changed");
        self.view = next;
    }

    fn editor_mut(&mut self) -> Result<&mut Editor, TransitionError> {
        self.view.editor_mut().ok_or(TransitionError::NoArticleOpen)
    }

    async fn find_article(&self, id: i64) -> Result<Article, AppError> {
        self.ctx
            .articles
            .get_by_id(id)
            .await?
            .ok_or_else(|| ArticleServiceError::NotFound(id).into())
    }

    /// Surface a domain failure as an error notification
    fn report<T>(&mut self, result: Result<T, AppError>) -> Result<T, AppError> {
        if let Err(e) = &result {
            match e.user_message() {
                Some(message) => {
                    tracing::debug!("Intent failed: {}", e);
                    self.notifier.error(message);
                }
                None => tracing::warn!("Rejected transition: {}", e),
            }
        }
        result
    }
}

fn required(field: &'static str, value: &str) -> Result<(), AppError> {
    if value.is_empty() {
        return Err(AppError::ValidationRequired(field));
    }
    Ok(())
}
