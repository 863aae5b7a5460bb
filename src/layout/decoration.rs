//! Per-theme page ornaments and the paper-texture speckle.

use rand::Rng;

use crate::theme::{Ornament, Palette};

use super::canvas::{Canvas, Stroke};
use super::{LayoutContext, PageGeometry};

/// Draw the ornament for `ornament` onto the current page.
///
/// `decorative` gates the plain border; the assembler only calls this at all
/// when decorations are enabled.
pub fn decorate_page<R: Rng>(
    canvas: &mut Canvas,
    ornament: Ornament,
    palette: &Palette,
    geometry: &PageGeometry,
    decorative: bool,
    rng: &mut R,
) {
    match ornament {
        Ornament::CornerStrokes => corner_strokes(canvas, palette, geometry),
        Ornament::Dots => corner_dots(canvas, palette, geometry, rng),
        Ornament::Ribbon => ribbon(canvas, palette, geometry),
        Ornament::Framed => framed(canvas, palette, geometry),
        Ornament::Flourish => flourishes(canvas, palette, geometry),
        Ornament::Border => {
            if decorative {
                let m = geometry.margin;
                canvas.stroke_rect(
                    m,
                    m,
                    geometry.width - m * 2.0,
                    geometry.height - m * 2.0,
                    Stroke::new(palette.accent, 0.5),
                );
            }
        }
    }
}

fn corner_strokes(canvas: &mut Canvas, palette: &Palette, geometry: &PageGeometry) {
    let stroke = Stroke::new(palette.accent, 0.5);
    let (w, h, m) = (geometry.width, geometry.height, geometry.margin);

    for leg in [5.0, 15.0] {
        canvas.line((m, m + leg), (m + leg, m), stroke);
        canvas.line((w - m, m + leg), (w - m - leg, m), stroke);
        canvas.line((m, h - m - leg), (m + leg, h - m), stroke);
        canvas.line((w - m, h - m - leg), (w - m - leg, h - m), stroke);
    }
}

fn corner_dots<R: Rng>(
    canvas: &mut Canvas,
    palette: &Palette,
    geometry: &PageGeometry,
    rng: &mut R,
) {
    let stroke = Stroke::new(palette.accent, 0.3);
    let (w, h, m) = (geometry.width, geometry.height, geometry.margin);

    for i in 0..8u8 {
        let x = if i < 4 {
            m + f32::from(i) * 2.0
        } else {
            w - m - f32::from(i - 4) * 2.0
        };
        let y = if matches!(i, 0 | 1 | 4 | 5) {
            m + 5.0
        } else {
            h - m - 5.0
        };
        let radius = rng.gen_range(2.0f32..6.0);
        canvas.circle(x, y, radius, Some(palette.border), Some(stroke));
    }
}

fn ribbon(canvas: &mut Canvas, palette: &Palette, geometry: &PageGeometry) {
    let stroke = Stroke::new(palette.accent, 0.5);
    let (w, h, m) = (geometry.width, geometry.height, geometry.margin);

    let mut x = m;
    while x < w - m {
        let dy = ribbon_offset(x, m);
        canvas.line((x, m + dy), (x + 5.0, m + dy), stroke);
        canvas.line((x, h - m + dy), (x + 5.0, h - m + dy), stroke);
        x += 10.0;
    }
}

fn framed(canvas: &mut Canvas, palette: &Palette, geometry: &PageGeometry) {
    const CORNER: f32 = 10.0;
    let (w, h, m) = (geometry.width, geometry.height, geometry.margin);

    canvas.stroke_rect(
        m,
        m,
        w - m * 2.0,
        h - m * 2.0,
        Stroke::new(palette.heading, 0.7),
    );
    for (x, y) in [
        (m, m),
        (w - m - CORNER, m),
        (m, h - m - CORNER),
        (w - m - CORNER, h - m - CORNER),
    ] {
        canvas.fill_rect(x, y, CORNER, CORNER, palette.accent);
    }
}

fn flourishes(canvas: &mut Canvas, palette: &Palette, geometry: &PageGeometry) {
    const LEG: f32 = 15.0;
    const SCALE: f32 = 0.5;
    let stroke = Stroke::new(palette.accent, 0.4);
    let (w, h, m) = (geometry.width, geometry.height, geometry.margin);

    let corners = [
        ((m + LEG, m + LEG), [(LEG, 0.0), (0.0, -LEG)]),
        ((w - m - LEG, m + LEG), [(0.0, -LEG), (-LEG, 0.0)]),
        ((m + LEG, h - m - LEG), [(0.0, LEG), (LEG, 0.0)]),
        ((w - m - LEG, h - m - LEG), [(-LEG, 0.0), (0.0, LEG)]),
    ];
    for (origin, segments) in corners {
        canvas.relative_lines(origin, &segments, SCALE, stroke);
    }
}

/// Speckle the page with faint dots when the paper-texture effect is on.
pub fn apply_paper_texture(canvas: &mut Canvas, ctx: &mut LayoutContext<'_>) {
    const SPACING: f32 = 2.0;
    if !ctx.config.paper_texture_effect {
        return;
    }

    let speck = ctx.palette.text.lighten(0.99);
    let (w, h) = (ctx.geometry.width, ctx.geometry.height);
    let mut x = 0.0;
    while x < w {
        let mut y = 0.0;
        while y < h {
            if ctx.rng.gen_bool(0.15) {
                let radius = 0.1 + ctx.rng.gen_range(0.0f32..0.2);
                canvas.circle(x, y, radius, Some(speck), None);
            }
            y += SPACING;
        }
        x += SPACING;
    }
}

fn ribbon_offset(x: f32, margin: f32) -> f32 {
    ((x - margin) / 20.0).sin() * 3.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::canvas::DrawOp;
    use crate::theme::ColorScheme;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn a4() -> PageGeometry {
        PageGeometry {
            width: 210.0,
            height: 297.0,
            margin: 20.0,
        }
    }

    fn draw(scheme: ColorScheme, decorative: bool, seed: u64) -> Vec<DrawOp> {
        let mut canvas = Canvas::new(210.0, 297.0);
        let mut rng = StdRng::seed_from_u64(seed);
        decorate_page(
            &mut canvas,
            scheme.ornament(),
            &scheme.palette(),
            &a4(),
            decorative,
            &mut rng,
        );
        canvas.current_page().ops.clone()
    }

    #[test]
    fn border_respects_decorative_flag() {
        assert_eq!(draw(ColorScheme::Modern, true, 1).len(), 1);
        assert!(draw(ColorScheme::Modern, false, 1).is_empty());
    }

    #[test]
    fn elegant_draws_two_strokes_per_corner() {
        let ops = draw(ColorScheme::Elegant, true, 1);
        assert_eq!(ops.len(), 8);
        assert!(ops.iter().all(|op| matches!(op, DrawOp::Line { .. })));
    }

    #[test]
    fn artistic_dots_are_seeded() {
        let first = draw(ColorScheme::Artistic, true, 7);
        assert_eq!(first.len(), 8);
        assert_eq!(first, draw(ColorScheme::Artistic, true, 7));
        for op in &first {
            let DrawOp::Circle { radius, .. } = op else {
                panic!("expected circle, got {op:?}");
            };
            assert!((2.0..6.0).contains(radius));
        }
    }

    #[test]
    fn fantasy_ribbon_spans_the_margins() {
        let ops = draw(ColorScheme::Fantasy, true, 1);
        // x = 20, 30, ..., 180: 17 dashes top and bottom.
        assert_eq!(ops.len(), 34);
        let DrawOp::Line { from, .. } = &ops[2] else {
            panic!("expected line");
        };
        assert!((from.1 - (20.0 + ribbon_offset(30.0, 20.0))).abs() < 1e-4);
    }

    #[test]
    fn scholarly_frames_with_corner_squares() {
        let ops = draw(ColorScheme::Scholarly, true, 1);
        assert_eq!(ops.len(), 5);
        let filled = ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Rect { fill: Some(_), .. }))
            .count();
        assert_eq!(filled, 4);
    }

    #[test]
    fn romantic_flourishes_are_scaled_polylines() {
        let ops = draw(ColorScheme::Romantic, true, 1);
        assert_eq!(ops.len(), 4);
        let DrawOp::Polyline { points, .. } = &ops[0] else {
            panic!("expected polyline");
        };
        assert_eq!(points, &vec![(35.0, 35.0), (42.5, 35.0), (42.5, 27.5)]);
    }
}
