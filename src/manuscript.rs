//! Book files on disk.
//!
//! A `.json` file is a stored [`Book`]. Anything else is a manuscript: YAML
//! front matter between `---` lines, then chapters opened by `=== Title`.
//! Content lines that would read as a marker are escaped with a leading `\`.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::book::{Book, Chapter};

const FENCE: &str = "---";
const CHAPTER_MARKER: &str = "===";
const ESCAPE: char = '\\';

#[derive(Debug, Error)]
pub enum ManuscriptError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("front matter must have opening and closing ---")]
    UnclosedFrontMatter,
    #[error("front matter yaml parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("book json parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("line {line}: text before the first `=== <chapter title>` marker")]
    StrayText { line: usize },
}

/// Load a book from `path`, choosing the format by extension.
pub fn load_book(path: &Path) -> Result<Book, ManuscriptError> {
    let input = fs::read_to_string(path).map_err(|source| ManuscriptError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if is_json(path) {
        Ok(serde_json::from_str(input.trim_start_matches('\u{feff}'))?)
    } else {
        parse_manuscript(&input)
    }
}

pub fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

pub fn parse_manuscript(input: &str) -> Result<Book, ManuscriptError> {
    let normalized = input.trim_start_matches('\u{feff}');
    let (front, body, body_start) = split_front_matter(normalized)?;

    let mut book = if front.trim().is_empty() {
        Book::default()
    } else {
        serde_yaml::from_str::<Book>(front)?
    };

    let mut current: Option<(String, Vec<&str>)> = None;
    for (offset, line) in body.lines().enumerate() {
        if let Some(title) = chapter_title(line) {
            if let Some((title, lines)) = current.take() {
                book.chapters.push(finish_chapter(title, &lines));
            }
            current = Some((title.to_string(), Vec::new()));
            continue;
        }

        match current.as_mut() {
            Some((_, lines)) => lines.push(unescape_line(line)),
            None if line.trim().is_empty() => {}
            None => {
                return Err(ManuscriptError::StrayText {
                    line: body_start + offset + 1,
                });
            }
        }
    }
    if let Some((title, lines)) = current {
        book.chapters.push(finish_chapter(title, &lines));
    }

    Ok(book)
}

/// Render `book` back into manuscript form.
///
/// Parsing the result gives `book` back, except that chapter content loses
/// leading and trailing blank lines and trailing whitespace.
pub fn to_manuscript(book: &Book) -> Result<String, ManuscriptError> {
    let mut meta = book.clone();
    meta.chapters.clear();

    let mut out = String::new();
    out.push_str(FENCE);
    out.push('\n');
    out.push_str(&serde_yaml::to_string(&meta)?);
    out.push_str(FENCE);
    out.push('\n');

    for chapter in &book.chapters {
        out.push('\n');
        out.push_str(CHAPTER_MARKER);
        out.push(' ');
        out.push_str(&chapter.title);
        out.push('\n');
        if !chapter.content.is_empty() {
            for line in chapter.content.split('\n') {
                if looks_like_marker(line) {
                    out.push(ESCAPE);
                }
                out.push_str(line);
                out.push('\n');
            }
        }
    }
    Ok(out)
}

/// Returns (front matter, body, line index where the body starts).
fn split_front_matter(input: &str) -> Result<(&str, &str, usize), ManuscriptError> {
    let mut lines = input.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return Ok(("", input, 0));
    };
    if first.trim_end() != FENCE {
        return Ok(("", input, 0));
    }

    let front_start = first.len();
    let mut pos = front_start;
    for (index, line) in lines.enumerate() {
        if line.trim_end() == FENCE {
            let body_start = pos + line.len();
            return Ok((&input[front_start..pos], &input[body_start..], index + 2));
        }
        pos += line.len();
    }
    Err(ManuscriptError::UnclosedFrontMatter)
}

fn chapter_title(line: &str) -> Option<&str> {
    let rest = line.strip_prefix(CHAPTER_MARKER)?;
    if rest.starts_with('=') {
        return None;
    }
    Some(rest.trim())
}

fn looks_like_marker(line: &str) -> bool {
    line.trim_start_matches(ESCAPE).starts_with(CHAPTER_MARKER)
}

fn unescape_line(line: &str) -> &str {
    match line.strip_prefix(ESCAPE) {
        Some(rest) if looks_like_marker(rest) => rest,
        _ => line,
    }
}

fn finish_chapter(title: String, lines: &[&str]) -> Chapter {
    let content = lines.join("\n");
    Chapter::new(title, content.trim_matches('\n').trim_end())
}
