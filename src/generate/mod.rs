//! Drafting book text with a language model.
//!
//! [`ContentGenerator`] always hands back usable text: a full request first,
//! a shorter one if that fails, and finally text built from the book itself.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::{debug, warn};

use crate::book::{Book, BookTemplate, Chapter, TemplateRef};
use crate::notifier::Notifier;

#[cfg(feature = "remote")]
pub mod gemini;
pub mod prompt;

pub const PRIMARY_MAX_TOKENS: u32 = 4000;
pub const SIMPLIFIED_MAX_TOKENS: u32 = 2000;

const DEFAULT_BOOK_TYPE: &str = "general";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ItemKind {
    Cover,
    Chapter,
    Credits,
}

impl ItemKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Cover => "cover",
            Self::Chapter => "chapter",
            Self::Credits => "credits",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cover" => Ok(Self::Cover),
            "chapter" => Ok(Self::Chapter),
            "credits" => Ok(Self::Credits),
            other => Err(format!("unknown item kind: {other}")),
        }
    }
}

/// The parts of a book that prompts are written from.
#[derive(Debug, Clone, PartialEq)]
pub struct BookBrief {
    pub title: String,
    pub book_type: String,
    pub category: String,
    pub description: String,
    /// Complete credits as `role: name` lines.
    pub credits: Vec<String>,
    pub template: Option<BookTemplate>,
}

impl From<&Book> for BookBrief {
    fn from(book: &Book) -> Self {
        let book_type = book
            .book_type
            .clone()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BOOK_TYPE.to_string());
        let category = book
            .category
            .clone()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| book.genre.clone());

        Self {
            title: book.title.clone(),
            book_type,
            category,
            description: book.description.clone(),
            credits: book.credit_lines(),
            template: book
                .template
                .as_ref()
                .and_then(TemplateRef::details)
                .cloned(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("no API key configured (set GEMINI_API_KEY)")]
    MissingKey,
    #[cfg(feature = "remote")]
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unreadable provider response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("provider returned no text")]
    EmptyResponse,
}

/// Anything that turns a prompt into text.
pub trait TextProvider {
    fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, ProviderError>;
}

impl<P: TextProvider + ?Sized> TextProvider for &P {
    fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, ProviderError> {
        (**self).generate(prompt, max_tokens)
    }
}

/// Which rung of the ladder produced the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Primary,
    Simplified,
    Fallback,
}

impl Stage {
    fn next(self) -> Self {
        match self {
            Self::Primary => Self::Simplified,
            Self::Simplified | Self::Fallback => Self::Fallback,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub text: String,
    pub stage: Stage,
}

pub struct ContentGenerator<P, N> {
    provider: P,
    notifier: N,
}

impl<P: TextProvider, N: Notifier> ContentGenerator<P, N> {
    pub fn new(provider: P, notifier: N) -> Self {
        Self { provider, notifier }
    }

    /// Draft text for one item of `book`. Never returns empty text.
    pub fn generate(
        &self,
        book: &Book,
        kind: ItemKind,
        title: &str,
        description: Option<&str>,
    ) -> Generated {
        let brief = BookBrief::from(book);
        let mut stage = Stage::Primary;

        loop {
            let (request, max_tokens) = match stage {
                Stage::Primary => (
                    prompt::primary(&brief, kind, title, description),
                    PRIMARY_MAX_TOKENS,
                ),
                Stage::Simplified => (prompt::simplified(&brief, kind, title), SIMPLIFIED_MAX_TOKENS),
                Stage::Fallback => {
                    warn!(%kind, title, "all generation attempts failed, using book data");
                    return Generated {
                        text: prompt::fallback_text(&brief, kind, title, description),
                        stage,
                    };
                }
            };

            debug!(?stage, %kind, title, max_tokens, prompt = %preview(&request), "requesting text");
            match self.attempt(&request, max_tokens) {
                Ok(text) => {
                    let message = match stage {
                        Stage::Primary => format!("{title} content generated successfully!"),
                        _ => format!("{title} content generated with simplified format."),
                    };
                    self.notifier.success(&message);
                    return Generated { text, stage };
                }
                Err(err) => {
                    warn!(?stage, %kind, error = %err, "generation attempt failed");
                    if stage == Stage::Primary {
                        self.notifier
                            .error(&format!("Failed to generate {kind} content. Please try again."));
                    }
                    stage = stage.next();
                }
            }
        }
    }

    fn attempt(&self, request: &str, max_tokens: u32) -> Result<String, ProviderError> {
        let text = self.provider.generate(request, max_tokens)?;
        if text.trim().is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        Ok(text)
    }
}

/// Store generated text in the matching slot of `book`.
///
/// Chapters are matched by title; an unknown title appends a new chapter.
pub fn apply_to_book(book: &mut Book, kind: ItemKind, title: &str, text: String) {
    match kind {
        ItemKind::Cover => book.cover_page = Some(text),
        ItemKind::Credits => book.credits_page = Some(text),
        ItemKind::Chapter => match book.chapters.iter_mut().find(|c| c.title == title) {
            Some(chapter) => chapter.content = text,
            None => book.chapters.push(Chapter::new(title, text)),
        },
    }
}

fn preview(prompt: &str) -> String {
    let mut head: String = prompt.chars().take(150).collect();
    if head.len() < prompt.len() {
        head.push_str("...");
    }
    head
}
