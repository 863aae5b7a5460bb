//! Chapter body layout: paragraph classification, wrapping, and pagination
//! by overflow.
//!
//! Pagination is predictive: before each paragraph the cursor is checked
//! against a fixed 30 mm look-ahead. A paragraph taller than that can still
//! run past the bottom margin; it is not split across pages.

use tracing::debug;

use crate::config::TextAlignment;
use crate::text::{FontStyle, wrap_text};
use crate::theme::ColorScheme;

use super::canvas::{Align, Canvas, Stroke, TextRun};
use super::drop_cap::{DropCap, apply_drop_cap};
use super::frame::{begin_page, footer, running_header};
use super::{LayoutContext, LayoutCursor};

/// Space assumed for the next paragraph when deciding to break the page.
pub const LOOKAHEAD: f32 = 30.0;

/// Characters laid out beside a drop cap before text returns to full width.
pub const DROP_CAP_LINE_CHARS: usize = 50;

/// A paragraph classified by its leading marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block<'a> {
    Heading1(&'a str),
    Heading2(&'a str),
    Quote(&'a str),
    Body(&'a str),
}

impl<'a> Block<'a> {
    pub fn classify(paragraph: &'a str) -> Self {
        if let Some(text) = paragraph.strip_prefix("# ") {
            Self::Heading1(text)
        } else if let Some(text) = paragraph.strip_prefix("## ") {
            Self::Heading2(text)
        } else if let Some(text) = paragraph.strip_prefix("> ") {
            Self::Quote(text)
        } else {
            Self::Body(paragraph)
        }
    }
}

/// Paragraphs separated by blank lines. Empty pieces are kept.
pub fn split_paragraphs(content: &str) -> impl Iterator<Item = &str> {
    content.split("\n\n")
}

/// Lay out a chapter body starting at `cursor`, adding overflow pages as
/// needed, and return the cursor after the last paragraph.
pub fn layout_chapter_body(
    canvas: &mut Canvas,
    ctx: &mut LayoutContext<'_>,
    content: &str,
    cursor: LayoutCursor,
) -> LayoutCursor {
    let mut cursor = cursor;
    for paragraph in split_paragraphs(content) {
        cursor = ensure_room(canvas, ctx, cursor);
        cursor = match Block::classify(paragraph) {
            Block::Heading1(text) => heading(canvas, ctx, text, 1.6, 10.0, cursor),
            Block::Heading2(text) => heading(canvas, ctx, text, 1.3, 8.0, cursor),
            Block::Quote(text) => quote(canvas, ctx, text, cursor),
            Block::Body(text) => body(canvas, ctx, text, cursor),
        };
    }
    cursor
}

/// Break to a fresh page when the look-ahead would cross the bottom margin.
fn ensure_room(
    canvas: &mut Canvas,
    ctx: &mut LayoutContext<'_>,
    cursor: LayoutCursor,
) -> LayoutCursor {
    if cursor.y + LOOKAHEAD <= ctx.geometry.bottom_limit() {
        return cursor;
    }

    begin_page(canvas, ctx);
    if ctx.config.header_footer {
        running_header(canvas, ctx, Align::Left);
        if ctx.config.show_page_numbers
            && let Some(label) = cursor.page_label.as_deref()
        {
            footer(canvas, ctx, label, Align::Right);
        }
    }
    debug!(page = canvas.page_count(), "overflow page");

    LayoutCursor {
        y: ctx.geometry.margin + 10.0,
        first_paragraph: false,
        ..cursor
    }
}

fn heading(
    canvas: &mut Canvas,
    ctx: &LayoutContext<'_>,
    text: &str,
    scale: f32,
    advance_per_line: f32,
    cursor: LayoutCursor,
) -> LayoutCursor {
    let font = ctx.font(FontStyle::Bold, scale);
    let lines = wrap_text(text, ctx.geometry.content_width(), &font);
    let line_count = lines.len() as f32;
    let align = if ctx.align() == Align::Center {
        Align::Center
    } else {
        Align::Left
    };

    canvas.text(TextRun {
        lines,
        x: ctx.anchor_x(),
        y: cursor.y,
        font,
        color: ctx.palette.heading,
        align,
        max_width: None,
    });

    LayoutCursor {
        first_paragraph: false,
        ..cursor.advanced(advance_per_line * line_count)
    }
}

fn quote(
    canvas: &mut Canvas,
    ctx: &LayoutContext<'_>,
    text: &str,
    cursor: LayoutCursor,
) -> LayoutCursor {
    let font = ctx.font(FontStyle::Italic, 1.0);
    let geometry = ctx.geometry;
    let palette = ctx.palette;
    let lines = wrap_text(text, geometry.content_width() - 20.0, &font);
    let line_count = lines.len() as f32;

    let box_x = geometry.margin + 5.0;
    let box_y = cursor.y - 5.0;
    let box_w = geometry.content_width() - 10.0;
    let box_h = 10.0 * line_count + 10.0;

    let color = match ctx.scheme {
        ColorScheme::Elegant | ColorScheme::Artistic => {
            canvas.rect(box_x, box_y, box_w, box_h, 3.0, Some(palette.background), None);
            canvas.fill_rect(box_x, box_y, 2.0, box_h, palette.accent);
            palette.accent
        }
        ColorScheme::Fantasy | ColorScheme::Vibrant => {
            const CORNER: f32 = 5.0;
            let tint = palette.accent.with_alpha(0x15);
            canvas.rect(box_x, box_y, box_w, box_h, 3.0, Some(tint), None);

            let stroke = Stroke::new(palette.accent, 0.5);
            let (left, right) = (box_x, box_x + box_w);
            let (top, bottom) = (box_y, box_y + box_h);
            canvas.line((left, top + CORNER), (left, top), stroke);
            canvas.line((left, top), (left + CORNER, top), stroke);
            canvas.line((right - CORNER, top), (right, top), stroke);
            canvas.line((right, top), (right, top + CORNER), stroke);
            canvas.line((left, bottom - CORNER), (left, bottom), stroke);
            canvas.line((left, bottom), (left + CORNER, bottom), stroke);
            canvas.line((right - CORNER, bottom), (right, bottom), stroke);
            canvas.line((right, bottom), (right, bottom - CORNER), stroke);
            palette.heading
        }
        _ => {
            canvas.rect(
                box_x,
                box_y,
                box_w,
                box_h,
                2.0,
                Some(palette.background),
                Some(Stroke::new(palette.accent, 0.2)),
            );
            palette.text
        }
    };

    let (x, align) = if ctx.align() == Align::Center {
        (geometry.center_x(), Align::Center)
    } else {
        (geometry.margin + 15.0, Align::Left)
    };
    canvas.text(TextRun {
        lines,
        x,
        y: cursor.y + 5.0,
        font,
        color,
        align,
        max_width: None,
    });

    LayoutCursor {
        first_paragraph: false,
        ..cursor.advanced(10.0 * (line_count + 1.0))
    }
}

fn body(
    canvas: &mut Canvas,
    ctx: &LayoutContext<'_>,
    text: &str,
    cursor: LayoutCursor,
) -> LayoutCursor {
    if text.trim().is_empty() {
        return cursor;
    }

    let font = ctx.body_font();
    let geometry = ctx.geometry;
    let rest;
    let mut y = cursor.y;
    let mut remaining = text;

    if let DropCap::Applied { rest: after, offset, .. } =
        apply_drop_cap(canvas, ctx, text, cursor.first_paragraph, geometry.margin, y)
    {
        rest = after;
        let (beside, below) = split_chars(&rest, DROP_CAP_LINE_CHARS);
        let width = geometry.content_width() - offset;
        let lines = wrap_text(beside, width, &font);
        let line_count = lines.len() as f32;
        canvas.text(aligned_run(ctx, lines, geometry.margin + offset, y, width));
        y += line_count * font.size * 0.5;
        remaining = below;
    }

    let lines = wrap_text(remaining, geometry.content_width(), &font);
    let line_count = lines.len() as f32;
    canvas.text(aligned_run(
        ctx,
        lines,
        geometry.margin,
        y,
        geometry.content_width(),
    ));
    y += line_count * font.size * ctx.config.line_spacing.multiplier();

    LayoutCursor {
        y,
        first_paragraph: false,
        ..cursor
    }
}

/// Body run placed within the column that starts at `left` and is `width` wide.
fn aligned_run(
    ctx: &LayoutContext<'_>,
    lines: Vec<String>,
    left: f32,
    y: f32,
    width: f32,
) -> TextRun {
    let (x, align, max_width) = match ctx.config.text_alignment {
        TextAlignment::Left => (left, Align::Left, None),
        TextAlignment::Center => (ctx.geometry.center_x(), Align::Center, None),
        TextAlignment::Right => (left + width, Align::Right, None),
        TextAlignment::Justified => (left, Align::Justify, Some(width)),
    };
    TextRun {
        lines,
        x,
        y,
        font: ctx.body_font(),
        color: ctx.palette.text,
        align,
        max_width,
    }
}

/// Split after `count` characters, on a char boundary.
fn split_chars(text: &str, count: usize) -> (&str, &str) {
    let index = text
        .char_indices()
        .nth(count)
        .map_or(text.len(), |(index, _)| index);
    text.split_at(index)
}
