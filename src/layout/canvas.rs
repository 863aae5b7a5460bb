//! Page display list.
//!
//! Layout code draws onto a [`Canvas`]; the result is a frozen [`Document`]
//! of pages holding primitive drawing operations, which the Typst backend
//! turns into a PDF. Coordinates are millimetres from the top-left corner;
//! text `y` is the baseline of the first line.

use serde::Serialize;

use crate::text::FontSpec;
use crate::theme::Color;

use super::LayoutError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    Butt,
    Round,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
    pub cap: LineCap,
}

impl Stroke {
    pub fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            cap: LineCap::Butt,
        }
    }

    pub fn round(self) -> Self {
        Self {
            cap: LineCap::Round,
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
    Right,
    Justify,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRun {
    pub lines: Vec<String>,
    pub x: f32,
    pub y: f32,
    pub font: FontSpec,
    pub color: Color,
    pub align: Align,
    /// Width justified lines are stretched to.
    pub max_width: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum DrawOp {
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        radius: f32,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        stroke: Stroke,
    },
    Circle {
        cx: f32,
        cy: f32,
        radius: f32,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
    Polyline {
        points: Vec<(f32, f32)>,
        stroke: Stroke,
    },
    Text(TextRun),
}

impl DrawOp {
    fn coordinates(&self) -> Vec<f32> {
        match self {
            Self::Rect {
                x,
                y,
                width,
                height,
                radius,
                ..
            } => vec![*x, *y, *width, *height, *radius],
            Self::Line { from, to, stroke } => vec![from.0, from.1, to.0, to.1, stroke.width],
            Self::Circle { cx, cy, radius, .. } => vec![*cx, *cy, *radius],
            Self::Polyline { points, .. } => points.iter().flat_map(|&(x, y)| [x, y]).collect(),
            Self::Text(run) => {
                let mut values = vec![run.x, run.y, run.font.size];
                values.extend(run.max_width);
                values
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    /// Every text line drawn on the page, in drawing order.
    pub fn text_lines(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text(run) => Some(run),
                _ => None,
            })
            .flat_map(|run| run.lines.iter().map(String::as_str))
            .collect()
    }

    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(run) => Some(run),
            _ => None,
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.text_lines().iter().any(|line| line.contains(needle))
    }
}

/// A laid-out book: page size plus the drawing operations of every page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub title: String,
    pub width: f32,
    pub height: f32,
    pub pages: Vec<Page>,
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Drawing surface that records operations onto the current page.
#[derive(Debug)]
pub struct Canvas {
    width: f32,
    height: f32,
    pages: Vec<Page>,
}

impl Canvas {
    /// A canvas with one empty page.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            pages: vec![Page::default()],
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn add_page(&mut self) {
        self.pages.push(Page::default());
    }

    pub fn current_page(&self) -> &Page {
        // `pages` starts with one page and only grows.
        &self.pages[self.pages.len() - 1]
    }

    fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, fill: Color) {
        self.rect(x, y, width, height, 0.0, Some(fill), None);
    }

    pub fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32, stroke: Stroke) {
        self.rect(x, y, width, height, 0.0, None, Some(stroke));
    }

    #[allow(clippy::too_many_arguments)]
    pub fn rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        radius: f32,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    ) {
        self.push(DrawOp::Rect {
            x,
            y,
            width,
            height,
            radius,
            fill,
            stroke,
        });
    }

    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), stroke: Stroke) {
        self.push(DrawOp::Line { from, to, stroke });
    }

    pub fn circle(
        &mut self,
        cx: f32,
        cy: f32,
        radius: f32,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    ) {
        self.push(DrawOp::Circle {
            cx,
            cy,
            radius,
            fill,
            stroke,
        });
    }

    /// Connected segments starting at `origin`, each given relative to the
    /// previous point and multiplied by `scale`.
    pub fn relative_lines(
        &mut self,
        origin: (f32, f32),
        segments: &[(f32, f32)],
        scale: f32,
        stroke: Stroke,
    ) {
        let mut points = vec![origin];
        let (mut x, mut y) = origin;
        for &(dx, dy) in segments {
            x += dx * scale;
            y += dy * scale;
            points.push((x, y));
        }
        self.push(DrawOp::Polyline { points, stroke });
    }

    /// Draw pre-wrapped lines. Nothing is recorded for an empty slice.
    pub fn text(&mut self, run: TextRun) {
        if run.lines.is_empty() {
            return;
        }
        self.push(DrawOp::Text(run));
    }

    /// Freeze the canvas. Fails if any recorded coordinate is not finite.
    pub fn finish(self, title: &str) -> Result<Document, LayoutError> {
        for (index, page) in self.pages.iter().enumerate() {
            if page
                .ops
                .iter()
                .flat_map(DrawOp::coordinates)
                .any(|value| !value.is_finite())
            {
                return Err(LayoutError::InvalidGeometry { page: index + 1 });
            }
        }

        Ok(Document {
            title: title.to_string(),
            width: self.width,
            height: self.height,
            pages: self.pages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{FontFamily, FontStyle};

    fn run(lines: &[&str]) -> TextRun {
        TextRun {
            lines: lines.iter().map(|l| l.to_string()).collect(),
            x: 10.0,
            y: 20.0,
            font: FontSpec::new(FontFamily::Helvetica, FontStyle::Normal, 12.0),
            color: Color::rgb(0, 0, 0),
            align: Align::Left,
            max_width: None,
        }
    }

    #[test]
    fn starts_with_one_page() {
        let canvas = Canvas::new(210.0, 297.0);
        assert_eq!(canvas.page_count(), 1);
    }

    #[test]
    fn ops_land_on_the_current_page() {
        let mut canvas = Canvas::new(210.0, 297.0);
        canvas.text(run(&["first"]));
        canvas.add_page();
        canvas.text(run(&["second", "third"]));
        let doc = canvas.finish("T").unwrap();
        assert_eq!(doc.pages[0].text_lines(), vec!["first"]);
        assert_eq!(doc.pages[1].text_lines(), vec!["second", "third"]);
    }

    #[test]
    fn empty_text_records_nothing() {
        let mut canvas = Canvas::new(210.0, 297.0);
        canvas.text(run(&[]));
        assert!(canvas.current_page().ops.is_empty());
    }

    #[test]
    fn relative_lines_accumulate_scaled_segments() {
        let mut canvas = Canvas::new(100.0, 100.0);
        let stroke = Stroke::new(Color::rgb(0, 0, 0), 0.4);
        canvas.relative_lines((10.0, 10.0), &[(4.0, 0.0), (0.0, -4.0)], 0.5, stroke);
        match &canvas.current_page().ops[0] {
            DrawOp::Polyline { points, .. } => {
                assert_eq!(points, &vec![(10.0, 10.0), (12.0, 10.0), (12.0, 8.0)]);
            }
            other => panic!("unexpected op {other:?}"),
        }
    }

    #[test]
    fn non_finite_geometry_fails_the_document() {
        let mut canvas = Canvas::new(100.0, 100.0);
        canvas.add_page();
        canvas.fill_rect(0.0, f32::NAN, 10.0, 10.0, Color::WHITE);
        assert!(matches!(
            canvas.finish("T"),
            Err(LayoutError::InvalidGeometry { page: 2 })
        ));
    }
}
