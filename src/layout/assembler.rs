//! Whole-book assembly: title page, optional cover, one page run per
//! chapter, optional credits.

use tracing::{debug, info};

use crate::book::{Book, Chapter};
use crate::config::ExportConfig;
use crate::text::{FontSpec, FontStyle, wrap_text};
use crate::theme::{Color, ColorScheme};

use super::canvas::{Align, Canvas, Document, Stroke, TextRun};
use super::divider::draw_divider;
use super::frame::{begin_page, footer, paint_page, running_header};
use super::paragraph::layout_chapter_body;
use super::{LayoutContext, LayoutCursor, LayoutError};

const UNTITLED: &str = "Untitled Book";
const NO_GENRE: &str = "No Genre";

/// Baseline of the first body paragraph on a chapter's opening page.
pub const CHAPTER_BODY_TOP: f32 = 40.0;

/// Lay out `book` with `config`.
///
/// A fresh canvas, cursor and random source are used for every call, so the
/// same inputs always give the same document.
pub fn assemble(book: &Book, config: &ExportConfig) -> Result<Document, LayoutError> {
    let mut ctx = LayoutContext::new(config, &book.title);
    let geometry = ctx.geometry;
    if geometry.content_width() <= 0.0 || geometry.height <= geometry.margin * 2.0 {
        return Err(LayoutError::PageTooSmall {
            width: geometry.width,
            height: geometry.height,
        });
    }

    info!(
        title = %book.title,
        chapters = book.chapters.len(),
        scheme = %ctx.scheme,
        "laying out book"
    );

    let mut canvas = Canvas::new(geometry.width, geometry.height);
    title_page(&mut canvas, &mut ctx, book);

    if config.cover_page
        && let Some(cover) = book.cover_text()
    {
        matter_page(&mut canvas, &mut ctx, "Cover Page", cover);
    }

    for (index, chapter) in book.chapters.iter().enumerate() {
        chapter_pages(&mut canvas, &mut ctx, index, chapter);
    }

    if config.credits_page
        && let Some(credits) = book.credits_text()
    {
        matter_page(&mut canvas, &mut ctx, "Credits", credits);
    }

    let document = canvas.finish(&book.title)?;
    info!(pages = document.page_count(), "layout complete");
    Ok(document)
}

fn title_page(canvas: &mut Canvas, ctx: &mut LayoutContext<'_>, book: &Book) {
    paint_page(canvas, ctx);

    let palette = ctx.palette;
    let geometry = ctx.geometry;
    let (w, h, m) = (geometry.width, geometry.height, geometry.margin);
    let center = geometry.center_x();

    let rule = Stroke::new(palette.accent, 1.0);
    if matches!(ctx.scheme, ColorScheme::Elegant | ColorScheme::Artistic) {
        canvas.line((m, 60.0), (center - 20.0, 55.0), rule);
        canvas.line((center + 20.0, 55.0), (w - m, 60.0), rule);
        canvas.line((m, h - 60.0), (center - 20.0, h - 55.0), rule);
        canvas.line((center + 20.0, h - 55.0), (w - m, h - 60.0), rule);
    } else {
        canvas.line((m, 50.0), (w - m, 50.0), rule);
        canvas.line((m, h - 50.0), (w - m, h - 50.0), rule);
    }

    let title = if book.title.trim().is_empty() {
        UNTITLED
    } else {
        book.title.as_str()
    };
    let title_font = ctx.font(FontStyle::Bold, 3.0);
    if matches!(ctx.scheme, ColorScheme::Vibrant | ColorScheme::Fantasy) {
        canvas.text(single_line(
            title,
            center + 1.0,
            82.0,
            title_font,
            Color::rgba(0, 0, 0, 0x22),
            Align::Center,
        ));
    }
    canvas.text(single_line(
        title,
        center,
        80.0,
        title_font,
        palette.heading,
        Align::Center,
    ));

    let genre = if book.genre.trim().is_empty() {
        NO_GENRE
    } else {
        book.genre.as_str()
    };
    let genre_font = ctx.font(FontStyle::Italic, 1.5);
    if matches!(ctx.scheme, ColorScheme::Modern | ColorScheme::Minimalist) {
        let badge_width = genre_font.width_of(genre) + 10.0;
        canvas.rect(
            center - badge_width / 2.0,
            95.0,
            badge_width,
            12.0,
            2.0,
            Some(palette.accent),
            None,
        );
        canvas.text(single_line(
            genre,
            center,
            103.0,
            genre_font,
            Color::WHITE,
            Align::Center,
        ));
    } else {
        canvas.text(single_line(
            genre,
            center,
            100.0,
            genre_font,
            palette.accent,
            Align::Center,
        ));
    }

    if !book.description.trim().is_empty() {
        block_text(canvas, ctx, &book.description, 130.0);
    }
}

/// Cover or credits page: label heading over wrapped free text.
fn matter_page(canvas: &mut Canvas, ctx: &mut LayoutContext<'_>, label: &str, text: &str) {
    begin_page(canvas, ctx);
    debug!(label, page = canvas.page_count(), "front/back matter page");

    if ctx.config.header_footer {
        running_header(canvas, ctx, Align::Left);
        footer(canvas, ctx, label, Align::Right);
    }

    draw_divider(canvas, ctx);
    canvas.text(single_line(
        label,
        ctx.geometry.center_x(),
        30.0,
        ctx.font(FontStyle::Bold, 1.8),
        ctx.palette.heading,
        Align::Center,
    ));

    block_text(canvas, ctx, text, 50.0);
}

fn chapter_pages(
    canvas: &mut Canvas,
    ctx: &mut LayoutContext<'_>,
    index: usize,
    chapter: &Chapter,
) {
    begin_page(canvas, ctx);
    debug!(chapter = index + 1, page = canvas.page_count(), "chapter page");

    let label = page_label(index);
    if ctx.config.header_footer {
        let header_align = match ctx.scheme {
            ColorScheme::Elegant | ColorScheme::Scholarly => Align::Center,
            _ => Align::Left,
        };
        running_header(canvas, ctx, header_align);

        if ctx.config.show_page_numbers {
            let footer_align = match ctx.scheme {
                ColorScheme::Classic | ColorScheme::Scholarly => Align::Center,
                _ => Align::Right,
            };
            footer(canvas, ctx, &label, footer_align);
        }
    }

    draw_divider(canvas, ctx);

    let heading = format!("Chapter {}: {}", index + 1, chapter.title);
    let (x, align) = match ctx.scheme {
        ColorScheme::Modern | ColorScheme::Vibrant => (ctx.geometry.margin, Align::Left),
        _ => (ctx.geometry.center_x(), Align::Center),
    };
    canvas.text(single_line(
        &heading,
        x,
        22.0,
        ctx.font(FontStyle::Bold, 1.8),
        ctx.palette.heading,
        align,
    ));

    if !chapter.content.is_empty() {
        let cursor = LayoutCursor::new(CHAPTER_BODY_TOP, Some(label));
        layout_chapter_body(canvas, ctx, &chapter.content, cursor);
    }
}

/// Footer label for every page of chapter `index`: the title and cover page
/// come first, so numbering starts at 3. Overflow pages reuse the label.
pub fn page_label(index: usize) -> String {
    format!("Page {}", index + 3)
}

/// Wrapped text across the content width at `y`, in the configured alignment.
fn block_text(canvas: &mut Canvas, ctx: &LayoutContext<'_>, text: &str, y: f32) {
    let font = ctx.body_font();
    let width = ctx.geometry.content_width();
    let lines = wrap_text(text, width, &font);
    let align = ctx.align();
    let (x, max_width) = match align {
        Align::Center => (ctx.geometry.center_x(), None),
        Align::Right => (ctx.geometry.width - ctx.geometry.margin, None),
        Align::Justify => (ctx.geometry.margin, Some(width)),
        Align::Left => (ctx.geometry.margin, None),
    };
    canvas.text(TextRun {
        lines,
        x,
        y,
        font,
        color: ctx.palette.text,
        align,
        max_width,
    });
}

fn single_line(
    text: &str,
    x: f32,
    y: f32,
    font: FontSpec,
    color: Color,
    align: Align,
) -> TextRun {
    TextRun {
        lines: vec![text.to_string()],
        x,
        y,
        font,
        color,
        align,
        max_width: None,
    }
}
