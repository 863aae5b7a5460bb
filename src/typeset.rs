//! Display list to Typst markup.
//!
//! Every page becomes a run of absolutely placed elements on a zero-margin
//! page, so the PDF reproduces the layout exactly as computed.

use crate::layout::{Align, Document, DrawOp, LineCap, Stroke, TextRun};
use crate::text::{FontSpec, FontStyle, PT_TO_MM};
use crate::theme::Color;

/// Fraction of the font size between the top of a text box and its baseline.
const ASCENT: f32 = 0.8;

pub fn to_typst(document: &Document) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "#set document(title: \"{}\")\n",
        escape_string(&document.title)
    ));
    out.push_str(&format!(
        "#set page(width: {}, height: {}, margin: 0pt)\n",
        mm(document.width),
        mm(document.height)
    ));
    out.push_str("#set text(top-edge: \"ascender\", bottom-edge: \"descender\")\n");
    out.push_str("#set par(leading: 0pt, spacing: 0pt)\n\n");

    for (index, page) in document.pages.iter().enumerate() {
        if index > 0 {
            out.push_str("#pagebreak()\n");
        }
        for op in &page.ops {
            write_op(&mut out, op, document.width);
        }
    }
    out
}

fn write_op(out: &mut String, op: &DrawOp, page_width: f32) {
    match op {
        DrawOp::Rect {
            x,
            y,
            width,
            height,
            radius,
            fill,
            stroke,
        } => {
            out.push_str(&format!(
                "#place(top + left, dx: {}, dy: {}, rect(width: {}, height: {}, radius: {}, fill: {}, stroke: {}))\n",
                mm(*x),
                mm(*y),
                mm(width.max(0.0)),
                mm(height.max(0.0)),
                mm(radius.max(0.0)),
                paint(*fill),
                stroke_spec(stroke.as_ref()),
            ));
        }
        DrawOp::Line { from, to, stroke } => write_line(out, *from, *to, stroke),
        DrawOp::Circle {
            cx,
            cy,
            radius,
            fill,
            stroke,
        } => {
            out.push_str(&format!(
                "#place(top + left, dx: {}, dy: {}, circle(radius: {}, fill: {}, stroke: {}))\n",
                mm(cx - radius),
                mm(cy - radius),
                mm(*radius),
                paint(*fill),
                stroke_spec(stroke.as_ref()),
            ));
        }
        DrawOp::Polyline { points, stroke } => {
            for pair in points.windows(2) {
                write_line(out, pair[0], pair[1], stroke);
            }
        }
        DrawOp::Text(run) => write_text(out, run, page_width),
    }
}

fn write_line(out: &mut String, from: (f32, f32), to: (f32, f32), stroke: &Stroke) {
    out.push_str(&format!(
        "#place(top + left, line(start: ({}, {}), end: ({}, {}), stroke: {}))\n",
        mm(from.0),
        mm(from.1),
        mm(to.0),
        mm(to.1),
        stroke_spec(Some(stroke)),
    ));
}

fn write_text(out: &mut String, run: &TextRun, page_width: f32) {
    let text_args = text_args(&run.font, run.color);
    let last = run.lines.len().saturating_sub(1);

    for (i, line) in run.lines.iter().enumerate() {
        let baseline = run.y + i as f32 * run.font.line_gap();
        let dy = mm(baseline - run.font.size * PT_TO_MM * ASCENT);
        let body = format!("text({text_args}, \"{}\")", escape_string(line));

        let placed = match (run.align, run.max_width) {
            (Align::Justify, Some(width)) if i < last => format!(
                "#place(top + left, dx: {}, dy: {dy}, block(width: {}, par(justify: true, {body} + linebreak(justify: true))))",
                mm(run.x),
                mm(width),
            ),
            (Align::Center, _) => format!(
                "#place(top + center, dx: {}, dy: {dy}, {body})",
                mm(run.x - page_width / 2.0),
            ),
            (Align::Right, _) => format!(
                "#place(top + right, dx: {}, dy: {dy}, {body})",
                mm(run.x - page_width),
            ),
            _ => format!("#place(top + left, dx: {}, dy: {dy}, {body})", mm(run.x)),
        };
        out.push_str(&placed);
        out.push('\n');
    }
}

fn text_args(font: &FontSpec, color: Color) -> String {
    let families = font
        .family
        .typst_fallbacks()
        .iter()
        .map(|name| format!("\"{name}\""))
        .collect::<Vec<_>>()
        .join(", ");
    let style = match font.style {
        FontStyle::Normal => "",
        FontStyle::Bold => ", weight: \"bold\"",
        FontStyle::Italic => ", style: \"italic\"",
    };
    format!(
        "font: ({families}), size: {:.3}pt, fill: {}{style}",
        font.size,
        color_expr(color)
    )
}

fn stroke_spec(stroke: Option<&Stroke>) -> String {
    match stroke {
        None => "none".to_string(),
        Some(stroke) => {
            let cap = match stroke.cap {
                LineCap::Butt => "butt",
                LineCap::Round => "round",
            };
            format!(
                "(paint: {}, thickness: {}, cap: \"{cap}\")",
                color_expr(stroke.color),
                mm(stroke.width)
            )
        }
    }
}

fn paint(fill: Option<Color>) -> String {
    fill.map_or_else(|| "none".to_string(), color_expr)
}

fn color_expr(color: Color) -> String {
    format!("rgb(\"{color}\")")
}

fn mm(value: f32) -> String {
    format!("{value:.3}mm")
}

fn escape_string(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' | '\r' | '\t' => out.push(' '),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Canvas, Page};
    use crate::text::FontFamily;

    fn run(lines: &[&str], align: Align, max_width: Option<f32>) -> TextRun {
        TextRun {
            lines: lines.iter().map(|l| l.to_string()).collect(),
            x: 20.0,
            y: 40.0,
            font: FontSpec::new(FontFamily::Times, FontStyle::Italic, 12.0),
            color: Color::rgb(0x33, 0x33, 0x33),
            align,
            max_width,
        }
    }

    fn document(pages: Vec<Page>) -> Document {
        Document {
            title: "Doc".into(),
            width: 210.0,
            height: 297.0,
            pages,
        }
    }

    #[test]
    fn header_sets_page_size() {
        let src = to_typst(&document(vec![Page::default()]));
        assert!(src.contains("#set page(width: 210.000mm, height: 297.000mm, margin: 0pt)"));
        assert!(src.contains("title: \"Doc\""));
    }

    #[test]
    fn pages_are_separated_by_breaks() {
        let src = to_typst(&document(vec![Page::default(); 3]));
        assert_eq!(src.matches("#pagebreak()").count(), 2);
    }

    #[test]
    fn text_is_escaped_and_styled() {
        let mut canvas = Canvas::new(210.0, 297.0);
        canvas.text(run(&["He said \"hi\" \\ bye"], Align::Left, None));
        let doc = canvas.finish("Doc").unwrap();
        let src = to_typst(&doc);
        assert!(src.contains("He said \\\"hi\\\" \\\\ bye"));
        assert!(src.contains("style: \"italic\""));
        assert!(src.contains("\"Times New Roman\""));
        assert!(src.contains("rgb(\"#333333ff\")"));
    }

    #[test]
    fn justified_runs_leave_the_last_line_ragged() {
        let mut out = String::new();
        write_text(&mut out, &run(&["one two", "three"], Align::Justify, Some(170.0)), 210.0);
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].contains("linebreak(justify: true)"));
        assert!(!lines[1].contains("justify"));
    }

    #[test]
    fn centred_and_right_text_use_page_relative_offsets() {
        let mut out = String::new();
        write_text(&mut out, &run(&["c"], Align::Center, None), 210.0);
        assert!(out.contains("top + center, dx: -85.000mm"));

        let mut out = String::new();
        let mut right = run(&["r"], Align::Right, None);
        right.x = 190.0;
        write_text(&mut out, &right, 210.0);
        assert!(out.contains("top + right, dx: -20.000mm"));
    }

    #[test]
    fn polyline_becomes_segments() {
        let mut canvas = Canvas::new(100.0, 100.0);
        canvas.relative_lines(
            (10.0, 10.0),
            &[(5.0, 0.0), (0.0, 5.0)],
            1.0,
            Stroke::new(Color::rgb(0, 0, 0), 0.4),
        );
        let src = to_typst(&canvas.finish("P").unwrap());
        assert_eq!(src.matches("line(start:").count(), 2);
    }

    #[test]
    fn shapes_without_stroke_say_none() {
        let mut canvas = Canvas::new(100.0, 100.0);
        canvas.fill_rect(0.0, 0.0, 100.0, 100.0, Color::WHITE);
        canvas.circle(50.0, 50.0, 2.0, None, Some(Stroke::new(Color::rgb(1, 2, 3), 0.3).round()));
        let src = to_typst(&canvas.finish("S").unwrap());
        assert!(src.contains("fill: rgb(\"#ffffffff\"), stroke: none"));
        assert!(src.contains("circle(radius: 2.000mm, fill: none"));
        assert!(src.contains("cap: \"round\""));
    }

    #[test]
    fn each_element_is_placed_on_its_own_line() {
        let mut canvas = Canvas::new(100.0, 100.0);
        canvas.fill_rect(0.0, 0.0, 100.0, 100.0, Color::WHITE);
        canvas.circle(50.0, 50.0, 2.0, Some(Color::WHITE), None);
        canvas.relative_lines((10.0, 10.0), &[(5.0, 0.0)], 1.0, Stroke::new(Color::rgb(0, 0, 0), 0.4));
        canvas.text(run(&["a", "b"], Align::Center, None));
        let src = to_typst(&canvas.finish("E").unwrap());

        assert!(src.ends_with(")\n"));
        let placed: Vec<&str> = src.lines().filter(|l| l.starts_with("#place(")).collect();
        assert_eq!(placed.len(), 5);
        assert!(placed.iter().all(|l| l.matches("#place(").count() == 1));
    }
}
