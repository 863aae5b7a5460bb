//! Page furniture shared by every page: background, texture, ornaments,
//! running header and footer.

use crate::text::FontStyle;

use super::canvas::{Align, Canvas, TextRun};
use super::decoration::{apply_paper_texture, decorate_page};
use super::LayoutContext;

/// Paint the background and ornaments of the current page.
pub fn paint_page(canvas: &mut Canvas, ctx: &mut LayoutContext<'_>) {
    let (w, h) = (ctx.geometry.width, ctx.geometry.height);
    canvas.fill_rect(0.0, 0.0, w, h, ctx.palette.background);

    apply_paper_texture(canvas, ctx);

    if ctx.config.decorative_elements {
        decorate_page(
            canvas,
            ctx.scheme.ornament(),
            &ctx.palette,
            &ctx.geometry,
            true,
            &mut ctx.rng,
        );
    }
}

/// Start a new page and paint it.
pub fn begin_page(canvas: &mut Canvas, ctx: &mut LayoutContext<'_>) {
    canvas.add_page();
    paint_page(canvas, ctx);
}

/// Book title along the top edge, `Align::Left` at the margin or centred.
pub fn running_header(canvas: &mut Canvas, ctx: &LayoutContext<'_>, align: Align) {
    let x = match align {
        Align::Center => ctx.geometry.center_x(),
        _ => ctx.geometry.margin,
    };
    canvas.text(furniture_run(ctx, ctx.book_title, x, 10.0, align));
}

/// Footer label along the bottom edge, right-aligned at the margin or centred.
pub fn footer(canvas: &mut Canvas, ctx: &LayoutContext<'_>, label: &str, align: Align) {
    let x = match align {
        Align::Center => ctx.geometry.center_x(),
        _ => ctx.geometry.width - ctx.geometry.margin,
    };
    let align = if align == Align::Center {
        Align::Center
    } else {
        Align::Right
    };
    let y = ctx.geometry.height - 10.0;
    canvas.text(furniture_run(ctx, label, x, y, align));
}

fn furniture_run(ctx: &LayoutContext<'_>, text: &str, x: f32, y: f32, align: Align) -> TextRun {
    TextRun {
        lines: vec![text.to_string()],
        x,
        y,
        font: ctx.font(FontStyle::Italic, 0.8),
        color: ctx.palette.accent,
        align,
        max_width: None,
    }
}
