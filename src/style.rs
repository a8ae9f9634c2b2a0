//! Colours, alignment and the inline style state of the remarks renderer.

use serde::{Deserialize, Serialize};

use crate::fonts::FontVariant;
use crate::markup::StyleKind;

/// RGB colour (0.0 – 1.0). Serialised as a `#rrggbb` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| v as f32 / 255.0);
        match hex.len() {
            6 => Some(Self {
                r: channel(&hex[0..2])?,
                g: channel(&hex[2..4])?,
                b: channel(&hex[4..6])?,
            }),
            3 => Some(Self {
                r: channel(&hex[0..1].repeat(2))?,
                g: channel(&hex[1..2].repeat(2))?,
                b: channel(&hex[2..3].repeat(2))?,
            }),
            _ => None,
        }
    }

    pub fn to_hex(&self) -> String {
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value).ok_or_else(|| format!("invalid hex colour {value:?}"))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    /// Horizontal offset of a line of `line_width` inside a box of `box_width`.
    pub fn offset(self, box_width: f32, line_width: f32) -> f32 {
        let slack = (box_width - line_width).max(0.0);
        match self {
            TextAlign::Left => 0.0,
            TextAlign::Center => slack / 2.0,
            TextAlign::Right => slack,
        }
    }
}

/// Bold / italic / underline flags active while flowing the remarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StyleState {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl StyleState {
    pub fn set(&mut self, kind: StyleKind, on: bool) {
        match kind {
            StyleKind::Bold => self.bold = on,
            StyleKind::Italic => self.italic = on,
            StyleKind::Underline => self.underline = on,
        }
    }

    /// Font variant implied by the bold / italic combination.
    pub fn variant(&self) -> FontVariant {
        FontVariant::from_style(self.bold, self.italic)
    }
}
