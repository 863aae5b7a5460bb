//! Font selection, text measurement and greedy line wrapping.
//!
//! Measurement uses per-glyph advance classes close to the standard PDF base
//! fonts. It only has to agree with itself: the same string always measures
//! the same, so pagination is reproducible across machines and font installs.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Millimetres per typographic point.
pub const PT_TO_MM: f32 = 25.4 / 72.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FontFamily {
    #[default]
    Helvetica,
    Times,
    Courier,
    Georgia,
}

impl FontFamily {
    pub const ALL: [Self; 4] = [Self::Helvetica, Self::Times, Self::Courier, Self::Georgia];

    /// Unknown names fall back to Helvetica.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "times" | "times new roman" | "serif" => Self::Times,
            "courier" | "courier new" | "monospace" => Self::Courier,
            "georgia" => Self::Georgia,
            _ => Self::Helvetica,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Helvetica => "helvetica",
            Self::Times => "times",
            Self::Courier => "courier",
            Self::Georgia => "georgia",
        }
    }

    /// Installed-font candidates, most preferred first. The tail is always a
    /// face bundled with the compiler.
    pub fn typst_fallbacks(self) -> &'static [&'static str] {
        match self {
            Self::Helvetica => &[
                "Helvetica",
                "Arial",
                "Liberation Sans",
                "DejaVu Sans",
                "Libertinus Serif",
            ],
            Self::Times => &[
                "Times New Roman",
                "Times",
                "Liberation Serif",
                "Libertinus Serif",
            ],
            Self::Courier => &["Courier New", "Courier", "Liberation Mono", "DejaVu Sans Mono"],
            Self::Georgia => &["Georgia", "Gelasio", "Libertinus Serif"],
        }
    }

    fn scale(self) -> f32 {
        match self {
            Self::Helvetica => 1.0,
            Self::Times => 0.92,
            Self::Courier => 1.0,
            Self::Georgia => 1.02,
        }
    }
}

impl From<String> for FontFamily {
    fn from(value: String) -> Self {
        Self::from_name(&value)
    }
}

impl From<FontFamily> for String {
    fn from(value: FontFamily) -> Self {
        value.name().to_string()
    }
}

impl Display for FontFamily {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Bold,
    Italic,
}

/// A concrete face and size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FontSpec {
    pub family: FontFamily,
    pub style: FontStyle,
    /// Size in points.
    pub size: f32,
}

impl FontSpec {
    pub fn new(family: FontFamily, style: FontStyle, size: f32) -> Self {
        Self {
            family,
            style,
            size,
        }
    }

    /// Distance between consecutive baselines of a multi-line text run, in mm.
    pub fn line_gap(&self) -> f32 {
        self.size * 1.15 * PT_TO_MM
    }

    /// Advance width of `text` in millimetres.
    pub fn width_of(&self, text: &str) -> f32 {
        let em: f32 = text.chars().map(|ch| glyph_em(self.family, ch)).sum();
        let weight = if self.style == FontStyle::Bold { 1.06 } else { 1.0 };
        em * self.family.scale() * weight * self.size * PT_TO_MM
    }
}

fn glyph_em(family: FontFamily, ch: char) -> f32 {
    if family == FontFamily::Courier {
        return 0.6;
    }
    match ch {
        ' ' => 0.278,
        'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '\'' | '|' | '!' | '`' => 0.24,
        'f' | 't' | 'r' | 'I' | '(' | ')' | '[' | ']' | '/' | '-' | '"' => 0.333,
        'm' | 'w' | 'M' | 'W' | '@' => 0.85,
        'A'..='Z' => 0.68,
        '0'..='9' => 0.556,
        c if c.is_ascii() => 0.52,
        c if is_wide(c) => 1.0,
        _ => 0.56,
    }
}

fn is_wide(c: char) -> bool {
    matches!(c as u32, 0x1100..=0x115f | 0x2e80..=0xa4cf | 0xac00..=0xd7a3 | 0xf900..=0xfaff | 0xff00..=0xff60)
}

/// Break `text` into lines no wider than `max_width` mm.
///
/// Newlines are hard breaks. Words longer than the width are split between
/// graphemes. Blank input yields no lines.
pub fn wrap_text(text: &str, max_width: f32, font: &FontSpec) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut lines = Vec::new();
    for hard_line in text.split('\n') {
        let hard_line = hard_line.trim_end_matches('\r');
        let mut current = String::new();

        for word in hard_line.split_whitespace() {
            if current.is_empty() {
                place_word(word, max_width, font, &mut current, &mut lines);
                continue;
            }

            let candidate = format!("{current} {word}");
            if font.width_of(&candidate) <= max_width {
                current = candidate;
            } else {
                lines.push(std::mem::take(&mut current));
                place_word(word, max_width, font, &mut current, &mut lines);
            }
        }

        lines.push(current);
    }
    lines
}

/// Start a fresh line with `word`, splitting it when it cannot fit alone.
fn place_word(
    word: &str,
    max_width: f32,
    font: &FontSpec,
    current: &mut String,
    lines: &mut Vec<String>,
) {
    if font.width_of(word) <= max_width {
        current.push_str(word);
        return;
    }

    for grapheme in word.graphemes(true) {
        if !current.is_empty() && font.width_of(&format!("{current}{grapheme}")) > max_width {
            lines.push(std::mem::take(current));
        }
        current.push_str(grapheme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn body() -> FontSpec {
        FontSpec::new(FontFamily::Helvetica, FontStyle::Normal, 12.0)
    }

    #[test]
    fn courier_is_monospaced() {
        let font = FontSpec::new(FontFamily::Courier, FontStyle::Normal, 10.0);
        assert!((font.width_of("iiii") - font.width_of("MMMM")).abs() < f32::EPSILON);
    }

    #[test]
    fn bold_is_wider() {
        let bold = FontSpec::new(FontFamily::Helvetica, FontStyle::Bold, 12.0);
        assert!(bold.width_of("Chapter") > body().width_of("Chapter"));
    }

    #[test]
    fn blank_text_has_no_lines() {
        assert!(wrap_text("", 100.0, &body()).is_empty());
        assert!(wrap_text("  \n ", 100.0, &body()).is_empty());
    }

    #[test]
    fn short_text_is_one_line() {
        assert_eq!(wrap_text("Hello world", 100.0, &body()), vec!["Hello world"]);
    }

    #[test]
    fn newlines_are_hard_breaks() {
        assert_eq!(wrap_text("one\ntwo", 100.0, &body()), vec!["one", "two"]);
    }

    #[test]
    fn long_text_wraps_on_words() {
        let text = "the quick brown fox jumps over the lazy dog ".repeat(6);
        let lines = wrap_text(&text, 60.0, &body());
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| !l.starts_with(' ') && !l.ends_with(' ')));
        assert_eq!(lines.join(" ").split_whitespace().count(), 54);
    }

    #[test]
    fn overlong_word_is_split() {
        let lines = wrap_text(&"x".repeat(200), 30.0, &body());
        assert!(lines.len() > 1);
        assert_eq!(lines.concat().len(), 200);
    }

    #[test]
    fn unknown_family_name_is_helvetica() {
        assert_eq!(FontFamily::from_name("Papyrus"), FontFamily::Helvetica);
        assert_eq!(FontFamily::from_name("Times"), FontFamily::Times);
    }

    proptest! {
        #[test]
        fn wrapped_lines_fit(text in "[a-zA-Z ,.]{0,300}", width in 10.0f32..180.0) {
            let font = body();
            for line in wrap_text(&text, width, &font) {
                let fits = font.width_of(&line) <= width + 1e-3;
                prop_assert!(fits || line.graphemes(true).count() == 1, "line {line:?} overflows");
            }
        }

        #[test]
        fn wrapping_keeps_every_word(text in "[a-z]{1,8}( [a-z]{1,8}){0,40}") {
            let lines = wrap_text(&text, 50.0, &body());
            let rejoined: Vec<&str> = text.split_whitespace().collect();
            let joined = lines.join(" ");
            let wrapped: Vec<&str> = joined.split_whitespace().collect();
            prop_assert_eq!(wrapped, rejoined);
        }
    }
}
