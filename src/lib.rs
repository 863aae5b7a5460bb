//! # bookkreate
//!
//! Themed book layout and PDF export. A [`Book`] and an [`ExportConfig`] are
//! laid out into a display list of pages, written as Typst markup, and
//! compiled in-process to PDF.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use bookkreate::{Book, Chapter, ExportConfig, export_pdf};
//!
//! let mut book = Book::new("The Lantern Road", "Fantasy");
//! book.chapters.push(Chapter::new("Dusk", "It was dusk.\n\nThe road glowed."));
//!
//! let config = ExportConfig::for_book(&book);
//! let pdf_bytes = export_pdf(&book, &config).expect("export failed");
//! std::fs::write("lantern-road.pdf", &pdf_bytes).unwrap();
//! ```
//!
//! ## Lower-level API
//!
//! ```rust,no_run
//! use bookkreate::{Book, ExportConfig, compile, layout, typeset};
//!
//! let book = Book::new("Draft", "Mystery");
//! let document = layout::assemble(&book, &ExportConfig::default()).unwrap();
//! let typst_source = typeset::to_typst(&document);
//! let pdf = compile::compile_typst_to_pdf(&typst_source).unwrap();
//! ```

pub mod book;
pub mod compile;
pub mod config;
pub mod generate;
pub mod layout;
pub mod manuscript;
pub mod notifier;
pub mod text;
pub mod theme;
pub mod typeset;

#[cfg(feature = "cli")]
pub mod watch;

use thiserror::Error;

pub use book::{Book, Chapter, Credit, TemplateRef};
pub use compile::{CompileError, compile_typst_to_pdf, write_atomically};
pub use config::{ConfigError, ExportConfig};
pub use generate::{ContentGenerator, Generated, ItemKind, ProviderError, Stage, TextProvider};
pub use layout::{Document, LayoutError, assemble};
pub use manuscript::{ManuscriptError, load_book, parse_manuscript};
pub use notifier::{LogNotifier, Notifier, RecordingNotifier};
pub use theme::{ColorScheme, Palette, resolve};

/// Top-level error type combining all pipeline stages.
#[derive(Debug, Error)]
pub enum Error {
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("book: {0}")]
    Manuscript(#[from] ManuscriptError),
    #[error("layout: {0}")]
    Layout(#[from] LayoutError),
    #[error("compile: {0}")]
    Compile(#[from] CompileError),
    #[error("generate: {0}")]
    Provider(#[from] ProviderError),
    #[cfg(feature = "cli")]
    #[error("watch: {0}")]
    Watch(#[from] watch::WatchError),
}

/// Lay out `book` and return the Typst source that reproduces it.
pub fn export_typst(book: &Book, config: &ExportConfig) -> Result<String, Error> {
    config.validate()?;
    let document = assemble(book, config)?;
    Ok(typeset::to_typst(&document))
}

/// Export `book` to PDF bytes in one call.
///
/// Any failure abandons the whole export; there is no partial output.
pub fn export_pdf(book: &Book, config: &ExportConfig) -> Result<Vec<u8>, Error> {
    let source = export_typst(book, config)?;
    Ok(compile_typst_to_pdf(&source)?)
}
