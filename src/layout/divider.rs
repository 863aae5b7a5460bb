//! Ornamental rule under chapter, cover and credits headings.

use rand::Rng;

use crate::theme::DividerStyle;

use super::canvas::{Canvas, Stroke};
use super::LayoutContext;

/// Baseline the divider is drawn on.
pub const DIVIDER_Y: f32 = 25.0;

/// Draw the divider for the configured scheme. No-op when dividers are off.
pub fn draw_divider(canvas: &mut Canvas, ctx: &mut LayoutContext<'_>) {
    if !ctx.config.chapter_dividers {
        return;
    }

    let accent = ctx.palette.accent;
    let stroke = Stroke::new(accent, 0.5);
    let margin = ctx.config.divider_margin();
    let page_width = ctx.geometry.width;
    let content_width = page_width - margin * 2.0;
    let y = DIVIDER_Y;

    match ctx.scheme.divider() {
        DividerStyle::Beaded => {
            let center = page_width / 2.0;
            let reach = content_width / 4.0;
            canvas.line((center - reach, y), (center + reach, y), stroke);
            canvas.circle(center, y, 2.0, Some(accent), None);
            canvas.circle(center - reach, y, 1.0, Some(accent), None);
            canvas.circle(center + reach, y, 1.0, Some(accent), None);
        }
        DividerStyle::Studded => {
            const POINTS: u8 = 7;
            let span = content_width * 0.7;
            let start = (page_width - span) / 2.0;
            canvas.line((start, y), (start + span, y), stroke);
            for i in 0..POINTS {
                let x = start + span * f32::from(i) / f32::from(POINTS - 1);
                if i % 2 == 0 {
                    canvas.circle(x, y, 1.5, Some(accent), None);
                } else {
                    canvas.fill_rect(x - 1.0, y - 2.0, 2.0, 4.0, accent);
                }
            }
        }
        DividerStyle::Sketched => {
            const SEGMENTS: u8 = 12;
            let span = content_width * 0.8;
            let step = span / f32::from(SEGMENTS);
            let start = (page_width - span) / 2.0;
            let stroke = Stroke::new(accent, 1.0).round();
            for i in 0..SEGMENTS {
                let x1 = start + f32::from(i) * step;
                let y1 = y + ctx.rng.gen_range(-1.0f32..1.0);
                let y2 = y + ctx.rng.gen_range(-1.0f32..1.0);
                canvas.line((x1, y1), (x1 + step, y2), stroke);
            }
        }
        DividerStyle::Plain => {
            if ctx.config.decorative_elements {
                canvas.stroke_rect(
                    margin,
                    margin,
                    page_width - margin * 2.0,
                    ctx.geometry.height - margin * 2.0,
                    stroke,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExportConfig;
    use crate::layout::canvas::DrawOp;

    fn ops_for(config: &ExportConfig) -> Vec<DrawOp> {
        let mut ctx = LayoutContext::new(config, "Book");
        let mut canvas = Canvas::new(210.0, 297.0);
        draw_divider(&mut canvas, &mut ctx);
        canvas.current_page().ops.clone()
    }

    fn scheme(name: &str) -> ExportConfig {
        ExportConfig {
            color_scheme: name.into(),
            ..ExportConfig::default()
        }
    }

    #[test]
    fn disabled_dividers_draw_nothing() {
        let config = ExportConfig {
            chapter_dividers: false,
            ..scheme("elegant")
        };
        assert!(ops_for(&config).is_empty());
    }

    #[test]
    fn elegant_is_a_beaded_rule() {
        let ops = ops_for(&scheme("elegant"));
        assert_eq!(ops.len(), 4);
        assert!(matches!(
            ops[0],
            DrawOp::Line { from: (x1, 25.0), to: (x2, 25.0), .. } if (x2 - x1 - 85.0).abs() < 1e-4
        ));
    }

    #[test]
    fn fantasy_alternates_dots_and_ticks() {
        let ops = ops_for(&scheme("fantasy"));
        assert_eq!(ops.len(), 8);
        let circles = ops.iter().filter(|op| matches!(op, DrawOp::Circle { .. })).count();
        let ticks = ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Rect { height, .. } if *height == 4.0))
            .count();
        assert_eq!((circles, ticks), (4, 3));
    }

    #[test]
    fn artistic_segments_stay_near_the_rule() {
        let ops = ops_for(&scheme("artistic"));
        assert_eq!(ops.len(), 12);
        for op in ops {
            let DrawOp::Line { from, to, stroke } = op else {
                panic!("expected line");
            };
            assert!((24.0..=26.0).contains(&from.1) && (24.0..=26.0).contains(&to.1));
            assert_eq!(stroke.width, 1.0);
        }
    }

    #[test]
    fn plain_divider_needs_decorations() {
        assert_eq!(ops_for(&scheme("modern")).len(), 1);
        let bare = ExportConfig {
            decorative_elements: false,
            ..scheme("modern")
        };
        assert!(ops_for(&bare).is_empty());
    }

    #[test]
    fn unknown_scheme_uses_plain_divider() {
        let ops = ops_for(&scheme("glitter"));
        assert!(matches!(ops[0], DrawOp::Rect { x, .. } if x == 20.0));
    }
}
