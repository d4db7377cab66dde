//! Markdown rendering service
//!
//! Turns article content into HTML for the read-only editor view. It uses
//! pulldown-cmark for parsing and covers the subset articles are written in:
//! headings, blockquotes, bold, italic, unordered lists and line breaks.
//!
//! Raw HTML in article content is escaped, never passed through.
//!
//! # Example
//!
//! ```
//! use scp_wiki::services::markdown::MarkdownRenderer;
//!
//! let renderer = MarkdownRenderer::new();
//! let html = renderer.render("# Description\n\nThis is **bold** text.");
//! assert!(html.contains("<h1>"));
//! assert!(html.contains("<strong>"));
//! ```

use pulldown_cmark::{html, Event, Options, Parser};

/// Converts article content to markup
///
/// The view layer depends on this trait so a different renderer can be
/// swapped in without touching the state machine.
pub trait ContentRenderer: Send + Sync {
    fn render(&self, content: &str) -> String;
}

/// Markdown renderer with HTML escaping.
///
/// Single newlines inside a paragraph become `<br />`, matching how the
/// catalogue's articles are typed.
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    options: Options,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer {
    /// Creates a renderer with plain CommonMark options.
    pub fn new() -> Self {
        Self {
            options: Options::empty(),
        }
    }

    /// Renders Markdown text to HTML.
    pub fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);
        let events = parser.map(|event| match event {
            Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
            Event::SoftBreak => Event::HardBreak,
            other => other,
        });

        let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut html_output, events);
        html_output
    }
}

impl ContentRenderer for MarkdownRenderer {
    fn render(&self, content: &str) -> String {
        MarkdownRenderer::render(self, content)
    }
}
