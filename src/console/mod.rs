//! Line-oriented console
//!
//! The binary's view layer. Each input line is parsed into a [`Command`],
//! dispatched to the [`App`] and followed by a text rendering of the active
//! view and any visible notification.
//!
//! Input is shared between the command loop and [`ConsolePrompt`], so a
//! delete confirmation reads the next line typed by the user.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::fmt::Write as _;
use std::str::FromStr;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines};
use tokio::sync::Mutex;

use crate::app::{App, AppError, ConfirmPrompt, NotificationKind, Route, View};
use crate::services::StatusFilter;

/// Console command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Show,
    Go(Route),
    Login { username: String, password: String },
    Register { username: String, password: String },
    Logout,
    Search(String),
    Filter(StatusFilter),
    Open(i64),
    New,
    Edit,
    Title(String),
    Content(String),
    Tags(String),
    Save,
    Publish,
    /// Delete the given article, or the open one
    Delete(Option<i64>),
    Theme,
    Dismiss,
    Quit,
}

/// Unparseable console input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Invalid article id: {0}")]
    InvalidId(String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let credentials = |usage: &'static str| {
            let mut parts = rest.split_whitespace();
            match (parts.next(), parts.next(), parts.next()) {
                (Some(username), Some(password), None) => {
                    Ok((username.to_string(), password.to_string()))
                }
                _ => Err(CommandError::Usage(usage)),
            }
        };
        let id = |raw: &str| {
            raw.parse::<i64>()
                .map_err(|_| CommandError::InvalidId(raw.to_string()))
        };

        let command = match name.to_lowercase().as_str() {
            "help" | "?" => Command::Help,
            "show" | "ls" => Command::Show,
            "landing" => Command::Go(Route::Landing),
            "home" => Command::Go(Route::Home),
            "profile" => Command::Go(Route::Profile),
            "login" if rest.is_empty() => Command::Go(Route::Login),
            "login" => {
                let (username, password) = credentials("login <username> <password>")?;
                Command::Login { username, password }
            }
            "register" if rest.is_empty() => Command::Go(Route::Register),
            "register" => {
                let (username, password) = credentials("register <username> <password>")?;
                Command::Register { username, password }
            }
            "logout" => Command::Logout,
            "search" => Command::Search(rest.to_string()),
            "filter" => Command::Filter(
                rest.parse()
                    .map_err(|_| CommandError::Usage("filter all|published|drafts"))?,
            ),
            "open" if rest.is_empty() => return Err(CommandError::Usage("open <id>")),
            "open" => Command::Open(id(rest)?),
            "new" => Command::New,
            "edit" => Command::Edit,
            "title" => Command::Title(rest.to_string()),
            "content" => Command::Content(unescape(rest)),
            "tags" => Command::Tags(rest.to_string()),
            "save" => Command::Save,
            "publish" => Command::Publish,
            "delete" if rest.is_empty() => Command::Delete(None),
            "delete" => Command::Delete(Some(id(rest)?)),
            "theme" => Command::Theme,
            "dismiss" | "ok" => Command::Dismiss,
            "quit" | "exit" => Command::Quit,
            _ => return Err(CommandError::Unknown(line.to_string())),
        };
        Ok(command)
    }
}

/// `\n` in typed content stands for a line break
fn unescape(raw: &str) -> String {
    raw.replace("\\n", "\n")
}

type LineReader = Lines<Box<dyn AsyncBufRead + Send + Unpin>>;

/// Line source shared by the command loop and the confirmation prompt
#[derive(Clone)]
pub struct ConsoleInput {
    lines: Arc<Mutex<LineReader>>,
}

impl ConsoleInput {
    pub fn new(reader: impl AsyncBufRead + Send + Unpin + 'static) -> Self {
        let reader: Box<dyn AsyncBufRead + Send + Unpin> = Box::new(reader);
        Self {
            lines: Arc::new(Mutex::new(reader.lines())),
        }
    }

    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }

    /// Next line, or `None` at end of input
    pub async fn next_line(&self) -> Result<Option<String>> {
        self.lines
            .lock()
            .await
            .next_line()
            .await
            .context("Failed to read console input")
    }
}

/// Confirmation port answered on the console
///
/// Anything but `y` or `yes` counts as no, including end of input.
pub struct ConsolePrompt {
    input: ConsoleInput,
}

impl ConsolePrompt {
    pub fn new(input: ConsoleInput) -> Self {
        Self { input }
    }
}

#[async_trait]
impl ConfirmPrompt for ConsolePrompt {
    async fn confirm(&self, message: &str) -> bool {
        let mut stdout = tokio::io::stdout();
        let question = format!("{} [y/N] ", message);
        if let Err(e) = stdout.write_all(question.as_bytes()).await {
            tracing::warn!("Failed to write confirmation prompt: {}", e);
        }
        let _ = stdout.flush().await;

        match self.input.next_line().await {
            Ok(Some(answer)) => is_yes(&answer),
            Ok(None) => false,
            Err(e) => {
                tracing::warn!("Failed to read confirmation: {:#}", e);
                false
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Run the command loop until `quit` or end of input
pub async fn run<W>(app: &mut App, input: ConsoleInput, mut output: W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    output
        .write_all(b"SCP Wiki console. Type 'help' for commands, 'quit' to exit.\n\n")
        .await?;
    output.write_all(render(app).await?.as_bytes()).await?;
    output.flush().await?;

    while let Some(line) = input.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            Ok(command) => command,
            Err(e) => {
                output.write_all(format!("{}\n", e).as_bytes()).await?;
                output.flush().await?;
                continue;
            }
        };

        let mut text = String::new();
        match execute(app, command).await {
            Ok(Some(extra)) => text.push_str(&extra),
            Ok(None) => {}
            Err(AppError::Transition(e)) => {
                let _ = writeln!(text, "Not possible here: {}", e);
            }
            // Domain failures are already shown as notifications.
            Err(_) => {}
        }
        text.push_str(&render(app).await?);

        output.write_all(text.as_bytes()).await?;
        output.flush().await?;
    }

    tracing::info!("Console closed");
    Ok(())
}

/// Dispatch one command; returns text to print before the view
pub async fn execute(app: &mut App, command: Command) -> Result<Option<String>, AppError> {
    tracing::debug!(?command, "Executing console command");
    match command {
        Command::Help => return Ok(Some(help())),
        Command::Show | Command::Quit => {}
        Command::Go(route) => app.navigate(route).await?,
        Command::Login { username, password } => {
            if app.view().kind() != crate::app::ViewKind::Login {
                app.navigate(Route::Login).await?;
            }
            app.submit_login(&username, &password).await?;
        }
        Command::Register { username, password } => {
            if app.view().kind() != crate::app::ViewKind::Register {
                app.navigate(Route::Register).await?;
            }
            app.submit_register(&username, &password).await?;
        }
        Command::Logout => app.logout().await?,
        Command::Search(query) => app.set_search_query(query),
        Command::Filter(status) => app.set_status_filter(status),
        Command::Open(id) => app.open_article(id).await?,
        Command::New => {
            app.create_article().await?;
        }
        Command::Edit => {
            app.toggle_edit_mode()?;
        }
        Command::Title(title) => app.edit_title(title)?,
        Command::Content(content) => app.edit_content(content)?,
        Command::Tags(tags) => app.edit_tags(tags)?,
        Command::Save => {
            app.save_article().await?;
        }
        Command::Publish => {
            app.toggle_publish().await?;
        }
        Command::Delete(id) => {
            let id = match id.or_else(|| app.view().editor().map(|e| e.article.id)) {
                Some(id) => id,
                None => return Err(crate::app::TransitionError::NoArticleOpen.into()),
            };
            if !app.delete_article(id).await? {
                return Ok(Some("Deletion cancelled.\n".to_string()));
            }
        }
        Command::Theme => {
            app.toggle_dark_mode().await?;
        }
        Command::Dismiss => app.dismiss_notification(),
    }
    Ok(None)
}

fn help() -> String {
    let mut text = String::from("Commands:\n");
    for (usage, description) in [
        ("help", "Show this help"),
        ("show", "Show the current view"),
        ("landing | home | profile", "Go to a view"),
        ("login [<username> <password>]", "Open the login form or sign in"),
        ("register [<username> <password>]", "Open the registration form or sign up"),
        ("logout", "Sign out"),
        ("search <text>", "Filter the listing by title"),
        ("filter all|published|drafts", "Filter the listing by status"),
        ("open <id>", "Open an article"),
        ("new", "Create an article"),
        ("edit", "Toggle edit mode"),
        ("title <text>", "Set the draft title"),
        ("content <text>", "Set the draft content (\\n for line breaks)"),
        ("tags <a, b, c>", "Set the draft tags"),
        ("save", "Save the draft"),
        ("publish", "Publish or unpublish the open article"),
        ("delete [<id>]", "Delete an article, the open one by default"),
        ("theme", "Toggle dark mode"),
        ("dismiss", "Hide the current notification"),
        ("quit", "Exit"),
    ] {
        let _ = writeln!(text, "  {:<34} {}", usage, description);
    }
    text.push('\n');
    text
}

/// Text rendering of the active view and the visible notification
pub async fn render(app: &App) -> Result<String> {
    let mut text = String::new();
    let theme = if app.dark_mode().await { "dark" } else { "light" };
    let user = app.current_user().await;

    match &user {
        Some(user) => writeln!(
            text,
            "[{}] signed in as {} ({}) | theme: {}",
            app.view().kind(),
            user.username,
            user.role,
            theme
        )?,
        None => writeln!(text, "[{}] theme: {}", app.view().kind(), theme)?,
    }

    match app.view() {
        View::Landing => {
            text.push_str("SCP Foundation wiki. Secure. Contain. Protect.\n");
            text.push_str("Use 'login' or 'register' to continue.\n");
        }
        View::Login => text.push_str("Login: enter 'login <username> <password>'.\n"),
        View::Register => text.push_str("Register: enter 'register <username> <password>'.\n"),
        View::Home => {
            let summary = app.listing_summary().await?;
            writeln!(
                text,
                "Search: {:?} | filter: {} | all {} / published {} / drafts {}",
                app.search_query(),
                app.status_filter(),
                summary.total,
                summary.published,
                summary.drafts
            )?;

            let articles = app.visible_articles().await?;
            if articles.is_empty() {
                text.push_str("No objects found.\n");
            }
            for article in articles {
                writeln!(
                    text,
                    "  #{:<3} {:<40} {:<9} {} | {}",
                    article.id,
                    article.title,
                    article.status.as_str(),
                    article.updated_at.format("%Y-%m-%d %H:%M"),
                    article.tags.join(", ")
                )?;
            }
        }
        View::Editor(editor) => {
            let article = &editor.article;
            writeln!(
                text,
                "#{} {} [{}] {}",
                article.id,
                article.title,
                article.status,
                if editor.edit_mode { "editing" } else { "read-only" }
            )?;
            if editor.edit_mode {
                let draft = editor.draft();
                writeln!(text, "Title: {}", draft.title)?;
                writeln!(text, "Tags: {}", draft.tags_input)?;
                writeln!(text, "Content:\n{}", draft.content)?;
            } else {
                writeln!(text, "Tags: {}", article.tags.join(", "))?;
                if let Some(html) = app.rendered_content() {
                    text.push_str(&html);
                }
            }
        }
        View::Profile => {
            let profile = app.profile().await?;
            writeln!(text, "Username: {}", profile.username)?;
            writeln!(text, "Role: {}", profile.role)?;
            writeln!(text, "Objects authored: {}", profile.articles_authored)?;
            writeln!(
                text,
                "Signed in since: {}",
                profile.signed_in_at.format("%Y-%m-%d %H:%M")
            )?;
        }
    }

    let notification = app.notification();
    if notification.visible {
        let marker = match notification.kind {
            NotificationKind::Success => "ok",
            NotificationKind::Error => "error",
        };
        writeln!(text, "({}) {}", marker, notification.message)?;
    }
    text.push('\n');
    Ok(text)
}
