//! Built-in font faces and text measurement.
//!
//! Only the PDF base-14 Helvetica and Times families are supported, so no font
//! bytes are embedded. Widths use an average-advance heuristic that is good
//! enough for centring short table cells and wrapping remarks.

use serde::{Deserialize, Serialize};

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f32 = 1.2;

/// Baseline offset from the top of a line, as a multiple of the font size.
pub const ASCENDER_FACTOR: f32 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    #[default]
    Helvetica,
    Times,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontVariant {
    #[default]
    Regular,
    Bold,
    Oblique,
    BoldOblique,
}

impl FontVariant {
    pub fn from_style(bold: bool, italic: bool) -> Self {
        match (bold, italic) {
            (true, true) => FontVariant::BoldOblique,
            (true, false) => FontVariant::Bold,
            (false, true) => FontVariant::Oblique,
            (false, false) => FontVariant::Regular,
        }
    }

    pub fn is_bold(self) -> bool {
        matches!(self, FontVariant::Bold | FontVariant::BoldOblique)
    }
}

/// A concrete built-in face: family plus variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FontFace {
    pub family: FontFamily,
    pub variant: FontVariant,
}

impl FontFace {
    pub fn new(family: FontFamily, variant: FontVariant) -> Self {
        Self { family, variant }
    }

    pub fn regular(family: FontFamily) -> Self {
        Self::new(family, FontVariant::Regular)
    }

    pub fn bold(family: FontFamily) -> Self {
        Self::new(family, FontVariant::Bold)
    }

    /// The printpdf base-14 font for this face.
    pub fn builtin(&self) -> printpdf::BuiltinFont {
        use printpdf::BuiltinFont;
        match (self.family, self.variant) {
            (FontFamily::Helvetica, FontVariant::Regular) => BuiltinFont::Helvetica,
            (FontFamily::Helvetica, FontVariant::Bold) => BuiltinFont::HelveticaBold,
            (FontFamily::Helvetica, FontVariant::Oblique) => BuiltinFont::HelveticaOblique,
            (FontFamily::Helvetica, FontVariant::BoldOblique) => BuiltinFont::HelveticaBoldOblique,
            (FontFamily::Times, FontVariant::Regular) => BuiltinFont::TimesRoman,
            (FontFamily::Times, FontVariant::Bold) => BuiltinFont::TimesBold,
            (FontFamily::Times, FontVariant::Oblique) => BuiltinFont::TimesItalic,
            (FontFamily::Times, FontVariant::BoldOblique) => BuiltinFont::TimesBoldItalic,
        }
    }
}

/// Measure the width of a string at a given font size (in pt).
///
/// Heuristic: average char width ≈ 0.5 × font_size; bold is ~10 % wider.
pub fn measure_text_width(text: &str, font_size: f32, face: FontFace) -> f32 {
    let avg = if face.variant.is_bold() { 0.55 } else { 0.5 };
    text.chars().count() as f32 * font_size * avg
}

pub fn line_height(font_size: f32) -> f32 {
    font_size * LINE_HEIGHT_FACTOR
}

/// Word-wrap text to fit within `max_width` points. Returns a vec of lines.
///
/// Runs of whitespace collapse to a single space. A single word wider than
/// `max_width` is kept whole on its own line.
pub fn wrap_text(text: &str, font_size: f32, face: FontFace, max_width: f32) -> Vec<String> {
    if max_width <= 0.0 || text.is_empty() {
        return vec![text.trim().to_string()];
    }

    let mut lines: Vec<String> = Vec::new();
    for paragraph in text.split('\n') {
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }

        let mut current_line = String::new();
        for word in &words {
            let candidate = if current_line.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current_line, word)
            };
            let w = measure_text_width(&candidate, font_size, face);
            if w > max_width && !current_line.is_empty() {
                lines.push(current_line);
                current_line = word.to_string();
            } else {
                current_line = candidate;
            }
        }
        if !current_line.is_empty() {
            lines.push(current_line);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
