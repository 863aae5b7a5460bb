//! Export configuration: the formatting choices for one PDF export.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::book::Book;
use crate::text::FontFamily;
use crate::theme::ColorScheme;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("font size must be a positive number, got {0}")]
    FontSize(f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum PageSize {
    #[default]
    A4,
    A5,
    Letter,
    Legal,
}

impl PageSize {
    /// Portrait width and height in millimetres.
    pub fn dimensions_mm(self) -> (f32, f32) {
        match self {
            Self::A4 => (210.0, 297.0),
            Self::A5 => (148.0, 210.0),
            Self::Letter => (215.9, 279.4),
            Self::Legal => (215.9, 355.6),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum PageMargins {
    None,
    Narrow,
    #[default]
    Normal,
    Wide,
}

impl PageMargins {
    pub fn millimetres(self) -> f32 {
        match self {
            Self::None => 10.0,
            Self::Narrow => 15.0,
            Self::Normal => 20.0,
            Self::Wide => 25.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum LineSpacing {
    Compact,
    #[default]
    Normal,
    Relaxed,
}

impl LineSpacing {
    pub fn multiplier(self) -> f32 {
        match self {
            Self::Compact => 1.2,
            Self::Normal => 1.5,
            Self::Relaxed => 1.8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum TextAlignment {
    Left,
    Center,
    Right,
    #[default]
    Justified,
}

const DEFAULT_SEED: u64 = 0x626f_6f6b_6b72_6561;

/// Formatting options for one export. Immutable while an export runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportConfig {
    pub page_size: PageSize,
    pub orientation: Orientation,
    pub page_margins: PageMargins,
    /// When false the margin collapses to 10 mm whatever `page_margins` says.
    pub include_margins: bool,
    pub font_family: FontFamily,
    /// Base font size in points.
    pub font_size: f32,
    pub line_spacing: LineSpacing,
    pub text_alignment: TextAlignment,
    /// Free-form scheme name; unknown names render with the default palette.
    pub color_scheme: String,
    pub show_page_numbers: bool,
    pub header_footer: bool,
    pub cover_page: bool,
    pub credits_page: bool,
    pub decorative_elements: bool,
    pub chapter_dividers: bool,
    pub drop_caps: bool,
    pub paper_texture_effect: bool,
    /// Seed for randomized ornaments and paper texture.
    pub seed: u64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            orientation: Orientation::Portrait,
            page_margins: PageMargins::Normal,
            include_margins: true,
            font_family: FontFamily::Helvetica,
            font_size: 12.0,
            line_spacing: LineSpacing::Normal,
            text_alignment: TextAlignment::Justified,
            color_scheme: "elegant".to_string(),
            show_page_numbers: true,
            header_footer: true,
            cover_page: true,
            credits_page: false,
            decorative_elements: true,
            chapter_dividers: true,
            drop_caps: false,
            paper_texture_effect: false,
            seed: DEFAULT_SEED,
        }
    }
}

impl ExportConfig {
    /// Defaults, with the book's own font and colour preferences applied.
    pub fn for_book(book: &Book) -> Self {
        let mut config = Self::default();
        if let Some(font) = book.font_family.as_deref() {
            config.font_family = FontFamily::from_name(font);
        }
        if let Some(scheme) = book.color_scheme.as_deref().filter(|s| !s.trim().is_empty()) {
            config.color_scheme = scheme.to_string();
        }
        config
    }

    /// Load from a YAML or JSON file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&raw)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(ConfigError::FontSize(self.font_size));
        }
        Ok(())
    }

    pub fn scheme(&self) -> ColorScheme {
        ColorScheme::from_name(&self.color_scheme)
    }

    /// Page width and height in millimetres after orientation.
    pub fn page_dimensions(&self) -> (f32, f32) {
        let (w, h) = self.page_size.dimensions_mm();
        match self.orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }

    pub fn margin(&self) -> f32 {
        if self.include_margins {
            self.page_margins.millimetres()
        } else {
            10.0
        }
    }

    /// Margin the chapter divider measures from. It ignores `page_margins`.
    pub fn divider_margin(&self) -> f32 {
        if self.include_margins { 20.0 } else { 10.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_editor_defaults() {
        let config = ExportConfig::default();
        assert_eq!(config.color_scheme, "elegant");
        assert_eq!(config.text_alignment, TextAlignment::Justified);
        assert!(config.show_page_numbers && config.header_footer && config.cover_page);
        assert!(!config.drop_caps && !config.paper_texture_effect && !config.credits_page);
        assert_eq!(config.margin(), 20.0);
        assert_eq!(config.page_dimensions(), (210.0, 297.0));
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config =
            ExportConfig::from_yaml("colorScheme: fantasy\ndropCaps: true\npageMargins: wide\n")
                .unwrap();
        assert_eq!(config.scheme(), ColorScheme::Fantasy);
        assert!(config.drop_caps);
        assert_eq!(config.margin(), 25.0);
        assert_eq!(config.font_size, 12.0);
    }

    #[test]
    fn json_is_accepted() {
        let config =
            ExportConfig::from_yaml(r#"{"pageSize": "letter", "orientation": "landscape"}"#)
                .unwrap();
        assert_eq!(config.page_dimensions(), (279.4, 215.9));
    }

    #[test]
    fn include_margins_off_collapses_margin() {
        let config = ExportConfig {
            include_margins: false,
            page_margins: PageMargins::Wide,
            ..ExportConfig::default()
        };
        assert_eq!(config.margin(), 10.0);
        assert_eq!(config.divider_margin(), 10.0);
    }

    #[test]
    fn unknown_font_falls_back_but_bad_enum_errors() {
        let config = ExportConfig::from_yaml("fontFamily: comic-sans").unwrap();
        assert_eq!(config.font_family, FontFamily::Helvetica);
        assert!(ExportConfig::from_yaml("lineSpacing: cosy").is_err());
    }

    #[test]
    fn non_positive_font_size_is_rejected() {
        assert!(matches!(
            ExportConfig::from_yaml("fontSize: 0"),
            Err(ConfigError::FontSize(_))
        ));
    }

    #[test]
    fn book_preferences_override_defaults() {
        let mut book = Book::new("T", "G");
        book.font_family = Some("georgia".into());
        book.color_scheme = Some("classic".into());
        let config = ExportConfig::for_book(&book);
        assert_eq!(config.font_family, FontFamily::Georgia);
        assert_eq!(config.scheme(), ColorScheme::Classic);
    }
}
