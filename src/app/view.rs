//! Views and the transition function between them
//!
//! The active view is a [`View`] value. Moving between views goes through
//! [`navigate`], which checks the preconditions of every intent against the
//! current view and the session state.

use serde::Serialize;
use std::fmt;

use crate::models::{Article, ArticleDraft};

/// Destinations reachable from the header and the forms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Landing,
    Login,
    Register,
    Home,
    Profile,
}

/// Tag of a view, without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    Landing,
    Login,
    Register,
    Home,
    Editor,
    Profile,
}

impl ViewKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewKind::Landing => "landing",
            ViewKind::Login => "login",
            ViewKind::Register => "register",
            ViewKind::Home => "home",
            ViewKind::Editor => "editor",
            ViewKind::Profile => "profile",
        }
    }

    /// Views that only exist inside a session
    pub fn requires_session(&self) -> bool {
        matches!(self, ViewKind::Home | ViewKind::Editor | ViewKind::Profile)
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Article open in the editor
///
/// `article` is the last stored version. `draft` holds the form fields and is
/// only writable while `edit_mode` is on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editor {
    pub article: Article,
    pub edit_mode: bool,
    draft: ArticleDraft,
}

impl Editor {
    fn new(article: Article, edit_mode: bool) -> Self {
        let draft = ArticleDraft::from_article(&article);
        Self {
            article,
            edit_mode,
            draft,
        }
    }

    pub fn draft(&self) -> &ArticleDraft {
        &self.draft
    }

    /// Draft fields, if edit mode is on
    pub fn draft_mut(&mut self) -> Result<&mut ArticleDraft, TransitionError> {
        if !self.edit_mode {
            return Err(TransitionError::NotEditing);
        }
        Ok(&mut self.draft)
    }

    /// Flip edit mode; leaving it discards the draft
    pub fn toggle_edit_mode(&mut self) -> bool {
        self.edit_mode = !self.edit_mode;
        if !self.edit_mode {
            self.draft = ArticleDraft::from_article(&self.article);
        }
        self.edit_mode
    }

    /// The stored article with the draft applied
    pub fn edited_article(&self) -> Article {
        let mut article = self.article.clone();
        article.apply_draft(&self.draft);
        article
    }

    /// Take a freshly saved version and leave edit mode
    pub fn saved(&mut self, article: Article) {
        self.draft = ArticleDraft::from_article(&article);
        self.article = article;
        self.edit_mode = false;
    }

    /// Take a new stored version, keeping any unsaved draft
    pub fn refreshed(&mut self, article: Article) {
        if !self.edit_mode {
            self.draft = ArticleDraft::from_article(&article);
        }
        self.article = article;
    }
}

/// Active view
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Landing,
    Login,
    Register,
    Home,
    Editor(Editor),
    Profile,
}

impl View {
    pub fn kind(&self) -> ViewKind {
        match self {
            View::Landing => ViewKind::Landing,
            View::Login => ViewKind::Login,
            View::Register => ViewKind::Register,
            View::Home => ViewKind::Home,
            View::Editor(_) => ViewKind::Editor,
            View::Profile => ViewKind::Profile,
        }
    }

    pub fn editor(&self) -> Option<&Editor> {
        match self {
            View::Editor(editor) => Some(editor),
            _ => None,
        }
    }

    pub fn editor_mut(&mut self) -> Option<&mut Editor> {
        match self {
            View::Editor(editor) => Some(editor),
            _ => None,
        }
    }
}

/// Something that moves the application between views
#[derive(Debug, Clone)]
pub enum Intent {
    /// Header links and form switches
    Go(Route),
    /// Login or registration succeeded
    SignedIn,
    /// Session cleared
    SignedOut,
    /// Existing article selected from the listing
    Open(Article),
    /// Freshly created article
    Create(Article),
    /// Open article removed
    Close,
}

/// Rejected transition
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("the {0} view requires a signed-in user")]
    NotAuthenticated(ViewKind),

    #[error("already signed in")]
    AlreadyAuthenticated,

    #[error("cannot {action} from the {from} view")]
    NotAllowed { from: ViewKind, action: &'static str },

    #[error("no article is open")]
    NoArticleOpen,

    #[error("the editor is not in edit mode")]
    NotEditing,
}

/// How the editor is entered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEntry {
    /// Existing article, read-only
    Open,
    /// Freshly created article, editable
    Create,
}

impl EditorEntry {
    fn action(&self) -> &'static str {
        match self {
            EditorEntry::Open => "open an article",
            EditorEntry::Create => "create an article",
        }
    }
}

/// Check that the editor can be entered from `current`
///
/// Articles are opened and created from the home listing only.
pub fn check_editor_entry(
    current: &View,
    authenticated: bool,
    entry: EditorEntry,
) -> Result<(), TransitionError> {
    if !authenticated {
        return Err(TransitionError::NotAuthenticated(ViewKind::Editor));
    }
    if current.kind() != ViewKind::Home {
        return Err(TransitionError::NotAllowed {
            from: current.kind(),
            action: entry.action(),
        });
    }
    Ok(())
}

/// Compute the view that follows `current` after `intent`
///
/// Signed-out users asking for home land on the landing page. Signed-in users
/// cannot reach the landing page or the auth forms except by signing out.
pub fn navigate(
    current: &View,
    authenticated: bool,
    intent: Intent,
) -> Result<View, TransitionError> {
    match intent {
        Intent::Go(route) => match (authenticated, route) {
            (false, Route::Landing | Route::Home) => Ok(View::Landing),
            (false, Route::Login) => Ok(View::Login),
            (false, Route::Register) => Ok(View::Register),
            (false, Route::Profile) => Err(TransitionError::NotAuthenticated(ViewKind::Profile)),
            (true, Route::Home) => Ok(View::Home),
            (true, Route::Profile) => Ok(View::Profile),
            (true, Route::Landing | Route::Login | Route::Register) => {
                Err(TransitionError::AlreadyAuthenticated)
            }
        },
        Intent::SignedIn => {
            if authenticated || current.kind().requires_session() {
                return Err(TransitionError::AlreadyAuthenticated);
            }
            Ok(View::Home)
        }
        Intent::SignedOut => Ok(View::Landing),
        Intent::Open(article) => {
            check_editor_entry(current, authenticated, EditorEntry::Open)?;
            Ok(View::Editor(Editor::new(article, false)))
        }
        Intent::Create(article) => {
            check_editor_entry(current, authenticated, EditorEntry::Create)?;
            Ok(View::Editor(Editor::new(article, true)))
        }
        Intent::Close => match current {
            View::Editor(_) => Ok(View::Home),
            _ => Err(TransitionError::NoArticleOpen),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArticleStatus;

    fn article() -> Article {
        Article::new(
            1,
            "SCP-001 - The Seed",
            "# Description\n\nA seed.",
            vec!["humanoid".to_string(), "safe".to_string()],
            ArticleStatus::Published,
            1,
        )
    }

    fn editor_view(edit_mode: bool) -> View {
        View::Editor(Editor::new(article(), edit_mode))
    }

    #[test]
    fn test_default_view_is_landing() {
        assert_eq!(View::default(), View::Landing);
        assert_eq!(View::default().kind(), ViewKind::Landing);
    }

    #[test]
    fn test_signed_out_navigation() {
        assert_eq!(navigate(&View::Landing, false, Intent::Go(Route::Login)).unwrap(), View::Login);
        assert_eq!(navigate(&View::Login, false, Intent::Go(Route::Register)).unwrap(), View::Register);
        assert_eq!(navigate(&View::Register, false, Intent::Go(Route::Login)).unwrap(), View::Login);
        assert_eq!(navigate(&View::Login, false, Intent::Go(Route::Landing)).unwrap(), View::Landing);
        assert_eq!(navigate(&View::Login, false, Intent::Go(Route::Home)).unwrap(), View::Landing);
    }

    #[test]
    fn test_signed_out_cannot_reach_profile() {
        let err = navigate(&View::Landing, false, Intent::Go(Route::Profile)).unwrap_err();
        assert_eq!(err, TransitionError::NotAuthenticated(ViewKind::Profile));
    }

    #[test]
    fn test_signed_in_navigation() {
        assert_eq!(navigate(&View::Home, true, Intent::Go(Route::Profile)).unwrap(), View::Profile);
        assert_eq!(navigate(&View::Profile, true, Intent::Go(Route::Home)).unwrap(), View::Home);
        assert_eq!(navigate(&editor_view(true), true, Intent::Go(Route::Home)).unwrap(), View::Home);
    }

    #[test]
    fn test_signed_in_cannot_reach_auth_forms() {
        for route in [Route::Landing, Route::Login, Route::Register] {
            let err = navigate(&View::Home, true, Intent::Go(route)).unwrap_err();
            assert_eq!(err, TransitionError::AlreadyAuthenticated);
        }
    }

    #[test]
    fn test_sign_in_and_out() {
        assert_eq!(navigate(&View::Login, false, Intent::SignedIn).unwrap(), View::Home);
        assert_eq!(navigate(&View::Register, false, Intent::SignedIn).unwrap(), View::Home);
        assert_eq!(
            navigate(&View::Home, true, Intent::SignedIn).unwrap_err(),
            TransitionError::AlreadyAuthenticated
        );

        assert_eq!(navigate(&editor_view(false), true, Intent::SignedOut).unwrap(), View::Landing);
        assert_eq!(navigate(&View::Profile, true, Intent::SignedOut).unwrap(), View::Landing);
    }

    #[test]
    fn test_open_sets_read_only() {
        let view = navigate(&View::Home, true, Intent::Open(article())).unwrap();
        let editor = view.editor().unwrap();
        assert!(!editor.edit_mode);
        assert_eq!(editor.article.id, 1);
        assert_eq!(editor.draft().tags_input, "humanoid,safe");
    }

    #[test]
    fn test_create_sets_edit_mode() {
        let view = navigate(&View::Home, true, Intent::Create(Article::placeholder(3, 1))).unwrap();
        assert!(view.editor().unwrap().edit_mode);
    }

    #[test]
    fn test_editor_requires_session_and_home() {
        assert_eq!(
            navigate(&View::Landing, false, Intent::Open(article())).unwrap_err(),
            TransitionError::NotAuthenticated(ViewKind::Editor)
        );
        assert_eq!(
            navigate(&View::Profile, true, Intent::Create(article())).unwrap_err(),
            TransitionError::NotAllowed {
                from: ViewKind::Profile,
                action: "create an article"
            }
        );
    }

    #[test]
    fn test_close_requires_editor() {
        assert_eq!(navigate(&editor_view(false), true, Intent::Close).unwrap(), View::Home);
        assert_eq!(
            navigate(&View::Home, true, Intent::Close).unwrap_err(),
            TransitionError::NoArticleOpen
        );
    }

    #[test]
    fn test_draft_locked_outside_edit_mode() {
        let mut editor = Editor::new(article(), false);
        assert_eq!(editor.draft_mut().unwrap_err(), TransitionError::NotEditing);

        assert!(editor.toggle_edit_mode());
        editor.draft_mut().unwrap().title = "Renamed".to_string();
        assert_eq!(editor.edited_article().title, "Renamed");
    }

    #[test]
    fn test_leaving_edit_mode_discards_draft() {
        let mut editor = Editor::new(article(), true);
        editor.draft_mut().unwrap().content = "scribbles".to_string();

        assert!(!editor.toggle_edit_mode());
        assert_eq!(editor.draft().content, "# Description\n\nA seed.");
    }

    #[test]
    fn test_edited_article_parses_tags() {
        let mut editor = Editor::new(article(), true);
        editor.draft_mut().unwrap().tags_input = " keter , ,  hostile ".to_string();

        let edited = editor.edited_article();
        assert_eq!(edited.tags, vec!["keter", "hostile"]);
        assert_eq!(edited.id, 1);
    }

    #[test]
    fn test_refreshed_keeps_unsaved_draft() {
        let mut editor = Editor::new(article(), true);
        editor.draft_mut().unwrap().title = "Unsaved".to_string();

        let mut newer = article();
        newer.status = ArticleStatus::Draft;
        editor.refreshed(newer);

        assert_eq!(editor.article.status, ArticleStatus::Draft);
        assert_eq!(editor.draft().title, "Unsaved");
        assert!(editor.edit_mode);
    }

    #[test]
    fn test_saved_leaves_edit_mode() {
        let mut editor = Editor::new(article(), true);
        let mut stored = article();
        stored.title = "Stored".to_string();

        editor.saved(stored);

        assert!(!editor.edit_mode);
        assert_eq!(editor.draft().title, "Stored");
    }
}
