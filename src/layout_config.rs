//! Layout config – the intermediate representation between the drawing
//! surface and PDF serialisation. This is the "frozen" structure that encodes
//! exactly which draw operations land on each page.
//!
//! Coordinates are in PDF points with the origin at the top-left of the page.

use serde::{Deserialize, Serialize};

use crate::fonts::FontFace;
use crate::style::Color;

/// A complete document layout ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Document title embedded in the PDF metadata.
    #[serde(default = "LayoutConfig::default_title")]
    pub title: String,
    /// Width of each page in PDF points (1 pt = 1/72 inch).
    pub page_width_pt: f32,
    /// Height of each page in PDF points.
    pub page_height_pt: f32,
    /// Ordered list of pages.
    pub pages: Vec<PageLayout>,
}

/// One page of draw operations, in paint order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    pub page_index: usize,
    pub ops: Vec<DrawOp>,
}

/// A single draw call recorded by the surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    /// One line of text; `y` is the top of the line box.
    Text {
        text: String,
        x: f32,
        y: f32,
        font: FontFace,
        size: f32,
        color: Color,
        underline: bool,
    },
    /// A stroked straight line.
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        width: f32,
        color: Color,
    },
    /// A filled rectangle; `y` is the top edge.
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
    },
}

impl DrawOp {
    pub fn text(&self) -> Option<&str> {
        match self {
            DrawOp::Text { text, .. } => Some(text),
            _ => None,
        }
    }

    /// All coordinates and sizes carried by the op.
    fn numbers(&self) -> Vec<f32> {
        match self {
            DrawOp::Text { x, y, size, .. } => vec![*x, *y, *size],
            DrawOp::Line {
                x1, y1, x2, y2, width, ..
            } => vec![*x1, *y1, *x2, *y2, *width],
            DrawOp::FillRect {
                x, y, width, height, ..
            } => vec![*x, *y, *width, *height],
        }
    }

    pub fn is_finite(&self) -> bool {
        self.numbers().iter().all(|v| v.is_finite())
    }
}

impl PageLayout {
    pub fn new(page_index: usize) -> Self {
        Self {
            page_index,
            ops: Vec::new(),
        }
    }

    /// Text content of every text op on the page, in paint order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops.iter().filter_map(DrawOp::text).collect()
    }
}

impl LayoutConfig {
    /// Create an empty US Letter layout config.
    pub fn letter() -> Self {
        Self {
            title: Self::default_title(),
            // Letter: 8.5in × 11in = 612 × 792 points
            page_width_pt: 612.0,
            page_height_pt: 792.0,
            pages: Vec::new(),
        }
    }

    fn default_title() -> String {
        "laporan".to_string()
    }

    /// Text content of every page, concatenated in page order.
    pub fn texts(&self) -> Vec<&str> {
        self.pages.iter().flat_map(|p| p.texts()).collect()
    }

    /// Serialise to JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Deserialise from JSON.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::FontFamily;

    fn sample() -> LayoutConfig {
        let mut config = LayoutConfig::letter();
        let mut page = PageLayout::new(0);
        page.ops.push(DrawOp::FillRect {
            x: 10.0,
            y: 10.0,
            width: 50.0,
            height: 25.0,
            color: Color::from_hex("#f8fafc").unwrap(),
        });
        page.ops.push(DrawOp::Text {
            text: "Rp1.000".to_string(),
            x: 12.0,
            y: 15.0,
            font: FontFace::bold(FontFamily::Helvetica),
            size: 10.0,
            color: Color::BLACK,
            underline: false,
        });
        config.pages.push(page);
        config
    }

    #[test]
    fn json_round_trip_keeps_ops() {
        let config = sample();
        let json = config.to_json();
        assert!(json.contains("\"op\": \"fill_rect\""));
        assert!(json.contains("\"#f8fafc\""));
        let parsed = LayoutConfig::from_json(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn texts_in_paint_order() {
        assert_eq!(sample().texts(), vec!["Rp1.000"]);
    }

    #[test]
    fn finite_check() {
        let op = DrawOp::Line {
            x1: 0.0,
            y1: f32::NAN,
            x2: 1.0,
            y2: 1.0,
            width: 1.0,
            color: Color::BLACK,
        };
        assert!(!op.is_finite());
        assert!(sample().pages[0].ops.iter().all(DrawOp::is_finite));
    }
}
