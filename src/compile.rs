use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use thiserror::Error;
use tracing::{debug, info};
use typst::diag::{FileError, FileResult, SourceDiagnostic};
use typst::foundations::{Bytes, Datetime};
use typst::layout::PagedDocument;
use typst::syntax::{FileId, Source, VirtualPath};
use typst::text::{Font, FontBook, FontInfo};
use typst::utils::LazyHash;
use typst::{Library, World};

use typst_pdf::PdfOptions;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("typst error: {0}")]
    Typst(String),
}

/// Compile Typst source to PDF bytes in memory.
pub fn compile_typst_to_pdf(source: &str) -> Result<Vec<u8>, CompileError> {
    let world = BookWorld::new(source);

    let warned = typst::compile::<PagedDocument>(&world);
    for warning in &warned.warnings {
        debug!(message = %warning.message, "typst warning");
    }
    let document = warned
        .output
        .map_err(|diagnostics| CompileError::Typst(render_diagnostics(&world, &diagnostics)))?;

    let pdf = typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|diagnostics| {
        let messages: Vec<String> = diagnostics.iter().map(|d| d.message.to_string()).collect();
        CompileError::Typst(messages.join("\n"))
    })?;
    info!(pages = document.pages.len(), bytes = pdf.len(), "pdf compiled");
    Ok(pdf)
}

/// Write `bytes` next to `path` and rename into place, so readers never see
/// a half-written file.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), CompileError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let mut partial = path.as_os_str().to_owned();
    partial.push(".partial");
    let partial = PathBuf::from(partial);

    if let Err(err) = fs::write(&partial, bytes).and_then(|()| fs::rename(&partial, path)) {
        let _ = fs::remove_file(&partial);
        return Err(err.into());
    }
    Ok(())
}

fn render_diagnostics(world: &BookWorld, diagnostics: &[SourceDiagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| {
            let line = d
                .span
                .id()
                .and_then(|id| world.source(id).ok())
                .and_then(|src| {
                    let range = src.range(d.span)?;
                    src.byte_to_line(range.start)
                })
                .map(|line| format!(" (line {})", line + 1))
                .unwrap_or_default();
            format!("{}{line}", d.message)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// World: a single in-memory source file plus the shared font store
// ---------------------------------------------------------------------------

struct BookWorld {
    library: LazyHash<Library>,
    main: Source,
    fonts: &'static FontStore,
}

impl BookWorld {
    fn new(source: &str) -> Self {
        let id = FileId::new(None, VirtualPath::new("/book.typ"));
        Self {
            library: LazyHash::new(Library::default()),
            main: Source::new(id, source.to_string()),
            fonts: FontStore::global(),
        }
    }
}

impl World for BookWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.fonts.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.fonts.slots.get(index)?.get()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        None
    }
}

// ---------------------------------------------------------------------------
// Fonts: bundled faces first, then whatever the system provides
// ---------------------------------------------------------------------------

struct FontSlot {
    data: Bytes,
    index: u32,
    font: OnceLock<Option<Font>>,
}

impl FontSlot {
    fn get(&self) -> Option<Font> {
        self.font
            .get_or_init(|| Font::new(self.data.clone(), self.index))
            .clone()
    }
}

struct FontStore {
    book: LazyHash<FontBook>,
    slots: Vec<FontSlot>,
}

static FONT_STORE: OnceLock<FontStore> = OnceLock::new();

const FONT_PATH_ENV: &str = "BOOKKREATE_FONT_PATH";

impl FontStore {
    fn global() -> &'static Self {
        FONT_STORE.get_or_init(|| {
            let mut store = FontStore {
                book: LazyHash::new(FontBook::new()),
                slots: Vec::new(),
            };
            let mut book = FontBook::new();

            for data in typst_assets::fonts() {
                store.register(&mut book, Bytes::new(data));
            }
            for dir in system_font_dirs() {
                store.scan(&mut book, &dir);
            }

            debug!(faces = store.slots.len(), "font store loaded");
            store.book = LazyHash::new(book);
            store
        })
    }

    fn register(&mut self, book: &mut FontBook, data: Bytes) {
        for index in 0_u32.. {
            let Some(info) = FontInfo::new(data.as_slice(), index) else {
                break;
            };
            book.push(info);
            self.slots.push(FontSlot {
                data: data.clone(),
                index,
                font: OnceLock::new(),
            });
        }
    }

    fn scan(&mut self, book: &mut FontBook, dir: &Path) {
        let Ok(entries) = fs::read_dir(dir) else {
            return;
        };

        for path in entries.flatten().map(|entry| entry.path()) {
            if path.is_dir() {
                self.scan(book, &path);
                continue;
            }

            let is_font = path
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_ascii_lowercase)
                .is_some_and(|ext| matches!(ext.as_str(), "ttf" | "otf" | "ttc" | "otc"));
            if !is_font {
                continue;
            }

            if let Ok(data) = fs::read(&path) {
                self.register(book, Bytes::new(data));
            }
        }
    }
}

/// Extra directories from `BOOKKREATE_FONT_PATH`, then the platform's font folders.
fn system_font_dirs() -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = std::env::var_os(FONT_PATH_ENV)
        .map(|paths| std::env::split_paths(&paths).collect())
        .unwrap_or_default();

    #[cfg(target_os = "macos")]
    {
        dirs.push(PathBuf::from("/System/Library/Fonts"));
        dirs.push(PathBuf::from("/Library/Fonts"));
        dirs.extend(home_dir().map(|h| h.join("Library/Fonts")));
    }

    #[cfg(target_os = "linux")]
    {
        dirs.push(PathBuf::from("/usr/share/fonts"));
        dirs.push(PathBuf::from("/usr/local/share/fonts"));
        if let Some(home) = home_dir() {
            dirs.push(home.join(".local/share/fonts"));
            dirs.push(home.join(".fonts"));
        }
    }

    #[cfg(target_os = "windows")]
    {
        dirs.extend(std::env::var_os("WINDIR").map(|w| PathBuf::from(w).join("Fonts")));
        dirs.extend(
            std::env::var_os("LOCALAPPDATA").map(|l| PathBuf::from(l).join("Microsoft\\Fonts")),
        );
    }

    dirs
}

#[cfg(unix)]
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atomic_write_leaves_no_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("book.pdf");
        write_atomically(&target, b"%PDF-1.7").unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"%PDF-1.7");
        assert!(!dir.path().join("nested").join("book.pdf.partial").exists());
    }

    #[test]
    fn compile_errors_carry_line_numbers() {
        let err = compile_typst_to_pdf("ok\n#undefined-function()").unwrap_err();
        let CompileError::Typst(message) = err else {
            panic!("expected a typst error");
        };
        assert!(message.contains("(line 2)"), "{message}");
    }
}
