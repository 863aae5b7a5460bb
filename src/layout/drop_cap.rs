use crate::text::FontStyle;

use super::canvas::{Align, Canvas, TextRun};
use super::LayoutContext;

/// Result of trying to enlarge a paragraph's first letter.
#[derive(Debug, Clone, PartialEq)]
pub enum DropCap {
    Applied {
        /// Paragraph text without the enlarged letter.
        rest: String,
        /// Indent for the text that flows beside the letter, in mm.
        offset: f32,
        /// Height hint for the enlarged glyph, in points.
        line_height: f32,
    },
    Skipped,
}

/// Draw the first character of `text` at three times the base size.
///
/// Skipped unless drop caps are enabled, the text is non-empty and this is
/// the first paragraph of a chapter.
pub fn apply_drop_cap(
    canvas: &mut Canvas,
    ctx: &LayoutContext<'_>,
    text: &str,
    first_paragraph: bool,
    x: f32,
    y: f32,
) -> DropCap {
    if !ctx.config.drop_caps || !first_paragraph {
        return DropCap::Skipped;
    }
    let mut chars = text.chars();
    let Some(initial) = chars.next() else {
        return DropCap::Skipped;
    };

    let font = ctx.font(FontStyle::Bold, 3.0);
    let initial = initial.to_string();
    let offset = font.width_of(&initial) + 2.0;

    canvas.text(TextRun {
        lines: vec![initial],
        x,
        y,
        font,
        color: ctx.palette.heading,
        align: Align::Left,
        max_width: None,
    });

    DropCap::Applied {
        rest: chars.as_str().to_string(),
        offset,
        line_height: font.size * 0.25,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExportConfig;

    fn config(drop_caps: bool) -> ExportConfig {
        ExportConfig {
            drop_caps,
            ..ExportConfig::default()
        }
    }

    #[test]
    fn removes_exactly_one_character() {
        let config = config(true);
        let ctx = LayoutContext::new(&config, "Book");
        let mut canvas = Canvas::new(210.0, 297.0);
        let text = "Once upon a time";

        let DropCap::Applied { rest, offset, line_height } =
            apply_drop_cap(&mut canvas, &ctx, text, true, 20.0, 40.0)
        else {
            panic!("drop cap should apply");
        };
        assert_eq!(rest.chars().count(), text.chars().count() - 1);
        assert_eq!(rest, "nce upon a time");
        assert!(offset > 0.0);
        assert_eq!(line_height, 9.0);
    }

    #[test]
    fn draws_the_initial_in_heading_colour() {
        let config = config(true);
        let ctx = LayoutContext::new(&config, "Book");
        let mut canvas = Canvas::new(210.0, 297.0);
        apply_drop_cap(&mut canvas, &ctx, "Éclair", true, 20.0, 40.0);

        let run = canvas.current_page().text_runs().next().cloned().unwrap();
        assert_eq!(run.lines, vec!["É"]);
        assert_eq!(run.color, ctx.palette.heading);
        assert_eq!(run.font.style, FontStyle::Bold);
        assert_eq!(run.font.size, 36.0);
    }

    #[test]
    fn skipped_when_preconditions_fail() {
        let on = config(true);
        let off = config(false);
        let mut canvas = Canvas::new(210.0, 297.0);

        let ctx = LayoutContext::new(&off, "Book");
        assert_eq!(apply_drop_cap(&mut canvas, &ctx, "Text", true, 0.0, 0.0), DropCap::Skipped);

        let ctx = LayoutContext::new(&on, "Book");
        assert_eq!(apply_drop_cap(&mut canvas, &ctx, "", true, 0.0, 0.0), DropCap::Skipped);
        assert_eq!(apply_drop_cap(&mut canvas, &ctx, "Text", false, 0.0, 0.0), DropCap::Skipped);
        assert!(canvas.current_page().ops.is_empty());
    }
}
