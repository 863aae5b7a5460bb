//! Page layout: turns a [`Book`](crate::book::Book) and an
//! [`ExportConfig`] into a [`Document`] display list.
//!
//! All state that evolves while a document is laid out is explicit: the
//! [`Canvas`] owns the pages, the [`LayoutCursor`] tracks the vertical
//! position, and the [`LayoutContext`] carries the resolved theme and the
//! seeded random source used by ornaments.

pub mod assembler;
pub mod canvas;
pub mod decoration;
pub mod divider;
pub mod drop_cap;
pub mod frame;
pub mod paragraph;

use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;

use crate::config::ExportConfig;
use crate::text::{FontSpec, FontStyle};
use crate::theme::{ColorScheme, Palette};

pub use assembler::assemble;
pub use canvas::{Align, Canvas, Document, DrawOp, LineCap, Page, Stroke, TextRun};

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("page {page} contains non-finite geometry")]
    InvalidGeometry { page: usize },
    #[error("page of {width}x{height} mm leaves no room for content")]
    PageTooSmall { width: f32, height: f32 },
}

/// Page size and the text column inside the margins, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl PageGeometry {
    pub fn from_config(config: &ExportConfig) -> Self {
        let (width, height) = config.page_dimensions();
        Self {
            width,
            height,
            margin: config.margin(),
        }
    }

    pub fn content_width(&self) -> f32 {
        self.width - self.margin * 2.0
    }

    pub fn center_x(&self) -> f32 {
        self.width / 2.0
    }

    /// Lowest baseline paragraphs may start from.
    pub fn bottom_limit(&self) -> f32 {
        self.height - self.margin
    }
}

/// Vertical position and per-page flags while laying out a chapter.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutCursor {
    pub y: f32,
    /// Label printed in the footer of pages started by this chapter.
    pub page_label: Option<String>,
    /// Whether the next paragraph is the first of the chapter body.
    pub first_paragraph: bool,
}

impl LayoutCursor {
    pub fn new(y: f32, page_label: Option<String>) -> Self {
        Self {
            y,
            page_label,
            first_paragraph: true,
        }
    }

    pub fn advanced(self, dy: f32) -> Self {
        Self {
            y: self.y + dy,
            ..self
        }
    }
}

/// Resolved inputs shared by every renderer during one export.
#[derive(Debug)]
pub struct LayoutContext<'a> {
    pub config: &'a ExportConfig,
    pub book_title: &'a str,
    pub scheme: ColorScheme,
    pub palette: Palette,
    pub geometry: PageGeometry,
    pub rng: StdRng,
}

impl<'a> LayoutContext<'a> {
    pub fn new(config: &'a ExportConfig, book_title: &'a str) -> Self {
        let scheme = config.scheme();
        Self {
            config,
            book_title,
            scheme,
            palette: scheme.palette(),
            geometry: PageGeometry::from_config(config),
            rng: StdRng::seed_from_u64(config.seed),
        }
    }

    /// Base font scaled by `factor` in the given style.
    pub fn font(&self, style: FontStyle, factor: f32) -> FontSpec {
        FontSpec::new(self.config.font_family, style, self.config.font_size * factor)
    }

    pub fn body_font(&self) -> FontSpec {
        self.font(FontStyle::Normal, 1.0)
    }

    /// Canvas alignment for the configured text alignment.
    pub fn align(&self) -> Align {
        use crate::config::TextAlignment;
        match self.config.text_alignment {
            TextAlignment::Left => Align::Left,
            TextAlignment::Center => Align::Center,
            TextAlignment::Right => Align::Right,
            TextAlignment::Justified => Align::Justify,
        }
    }

    /// Anchor x for a text block: page centre when centred, else the margin.
    pub fn anchor_x(&self) -> f32 {
        if self.align() == Align::Center {
            self.geometry.center_x()
        } else {
            self.geometry.margin
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Orientation, PageMargins};

    #[test]
    fn geometry_follows_config() {
        let config = ExportConfig {
            orientation: Orientation::Landscape,
            page_margins: PageMargins::Narrow,
            ..ExportConfig::default()
        };
        let geometry = PageGeometry::from_config(&config);
        assert_eq!(geometry.width, 297.0);
        assert_eq!(geometry.content_width(), 297.0 - 30.0);
        assert_eq!(geometry.bottom_limit(), 210.0 - 15.0);
    }

    #[test]
    fn cursor_advance_keeps_flags() {
        let cursor = LayoutCursor::new(40.0, Some("Page 3".into())).advanced(12.5);
        assert_eq!(cursor.y, 52.5);
        assert!(cursor.first_paragraph);
        assert_eq!(cursor.page_label.as_deref(), Some("Page 3"));
    }
}
