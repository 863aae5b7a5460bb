//! Colour schemes and their palettes.
//!
//! The table is closed: a scheme name that is not listed resolves to
//! [`ColorScheme::Default`], so lookups never fail.

use std::fmt::{Display, Formatter};

use serde::Serialize;

/// RGBA colour, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Self = Self::rgb(0xff, 0xff, 0xff);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    const fn hex(value: u32) -> Self {
        Self::rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }

    /// Parse `#rrggbb` or `#rrggbbaa`.
    pub fn parse_hex(input: &str) -> Option<Self> {
        let digits = input.strip_prefix('#')?;
        if !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
        match digits.len() {
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    /// Move every channel towards white by `factor` (0 keeps, 1 gives white).
    pub fn lighten(self, factor: f32) -> Self {
        let mix = |c: u8| {
            let c = f32::from(c);
            (c + (255.0 - c) * factor).round().clamp(0.0, 255.0) as u8
        };
        Self {
            r: mix(self.r),
            g: mix(self.g),
            b: mix(self.b),
            a: self.a,
        }
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{:02x}{:02x}{:02x}{:02x}",
            self.r, self.g, self.b, self.a
        )
    }
}

/// The five colours a theme paints with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub heading: Color,
    pub accent: Color,
    pub border: Color,
}

/// Page ornament drawn at the corners/edges of every page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ornament {
    Border,
    CornerStrokes,
    Dots,
    Ribbon,
    Framed,
    Flourish,
}

/// Rule drawn beneath chapter headings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DividerStyle {
    Plain,
    Beaded,
    Studded,
    Sketched,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorScheme {
    #[default]
    Default,
    Elegant,
    Modern,
    Classic,
    Vibrant,
    Minimalist,
    Artistic,
    Scholarly,
    Romantic,
    Fantasy,
}

impl ColorScheme {
    pub const ALL: [Self; 10] = [
        Self::Default,
        Self::Elegant,
        Self::Modern,
        Self::Classic,
        Self::Vibrant,
        Self::Minimalist,
        Self::Artistic,
        Self::Scholarly,
        Self::Romantic,
        Self::Fantasy,
    ];

    /// Total lookup; unknown names give `Default`.
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|scheme| scheme.name().eq_ignore_ascii_case(name))
            .unwrap_or_default()
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Elegant => "elegant",
            Self::Modern => "modern",
            Self::Classic => "classic",
            Self::Vibrant => "vibrant",
            Self::Minimalist => "minimalist",
            Self::Artistic => "artistic",
            Self::Scholarly => "scholarly",
            Self::Romantic => "romantic",
            Self::Fantasy => "fantasy",
        }
    }

    pub fn palette(self) -> Palette {
        let (background, text, heading, accent, border) = match self {
            Self::Default => (0xffffff, 0x000000, 0x000000, 0x4a90e2, 0xdddddd),
            Self::Elegant => (0xf9f9f9, 0x333333, 0x222222, 0x8e44ad, 0xd4c5e5),
            Self::Modern => (0xffffff, 0x2c3e50, 0x16a085, 0x3498db, 0xb3e5fc),
            Self::Classic => (0xfff8e1, 0x3e2723, 0x5d4037, 0x795548, 0xd7ccc8),
            Self::Vibrant => (0xffffff, 0x333333, 0xe74c3c, 0xf39c12, 0xfbd7b5),
            Self::Minimalist => (0xfcfcfc, 0x202020, 0x404040, 0x808080, 0xe0e0e0),
            Self::Artistic => (0xfffaf0, 0x2d3436, 0x6c5ce7, 0xfd79a8, 0xffeaa7),
            Self::Scholarly => (0xf5f5f5, 0x333333, 0x1e3a8a, 0x6b7280, 0xcbd5e1),
            Self::Romantic => (0xfff0f3, 0x4a281f, 0xc71f37, 0xff758f, 0xffd8e2),
            Self::Fantasy => (0xf0f8ff, 0x333652, 0x2a6b96, 0xc06c84, 0xd8e2dc),
        };
        Palette {
            background: Color::hex(background),
            text: Color::hex(text),
            heading: Color::hex(heading),
            accent: Color::hex(accent),
            border: Color::hex(border),
        }
    }

    pub fn ornament(self) -> Ornament {
        match self {
            Self::Elegant => Ornament::CornerStrokes,
            Self::Artistic => Ornament::Dots,
            Self::Fantasy => Ornament::Ribbon,
            Self::Scholarly => Ornament::Framed,
            Self::Romantic => Ornament::Flourish,
            _ => Ornament::Border,
        }
    }

    pub fn divider(self) -> DividerStyle {
        match self {
            Self::Elegant => DividerStyle::Beaded,
            Self::Fantasy => DividerStyle::Studded,
            Self::Artistic => DividerStyle::Sketched,
            _ => DividerStyle::Plain,
        }
    }
}

impl Display for ColorScheme {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Palette for a scheme name, falling back to the default palette.
pub fn resolve(name: &str) -> Palette {
    ColorScheme::from_name(name).palette()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn known_scheme_resolves_to_its_palette() {
        let palette = resolve("romantic");
        assert_eq!(palette.heading, Color::rgb(0xc7, 0x1f, 0x37));
        assert_eq!(palette.background, Color::rgb(0xff, 0xf0, 0xf3));
    }

    #[test]
    fn unknown_scheme_falls_back_to_default() {
        assert_eq!(resolve("neon-goth"), ColorScheme::Default.palette());
        assert_eq!(resolve(""), ColorScheme::Default.palette());
    }

    #[test]
    fn names_are_case_insensitive() {
        assert_eq!(ColorScheme::from_name(" Scholarly "), ColorScheme::Scholarly);
    }

    #[test]
    fn every_scheme_round_trips_through_its_name() {
        for scheme in ColorScheme::ALL {
            assert_eq!(ColorScheme::from_name(scheme.name()), scheme);
        }
    }

    #[test]
    fn lighten_moves_towards_white() {
        let c = Color::rgb(0x33, 0x33, 0x33).lighten(0.99);
        assert_eq!(c, Color::rgb(0xfd, 0xfd, 0xfd));
        assert_eq!(Color::rgb(10, 20, 30).lighten(0.0), Color::rgb(10, 20, 30));
    }

    #[test]
    fn parses_hex_with_and_without_alpha() {
        assert_eq!(Color::parse_hex("#4a90e2"), Some(Color::rgb(0x4a, 0x90, 0xe2)));
        assert_eq!(
            Color::parse_hex("#00000022"),
            Some(Color::rgba(0, 0, 0, 0x22))
        );
        assert_eq!(Color::parse_hex("4a90e2"), None);
        assert_eq!(Color::parse_hex("#zzzzzz"), None);
    }

    #[test]
    fn display_is_rgba_hex() {
        assert_eq!(Color::rgb(0x8e, 0x44, 0xad).to_string(), "#8e44adff");
    }

    proptest! {
        #[test]
        fn resolve_is_total(name in ".{0,24}") {
            let palette = resolve(&name);
            let scheme = ColorScheme::from_name(&name);
            prop_assert_eq!(palette, scheme.palette());
        }
    }
}
