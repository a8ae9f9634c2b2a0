//! Drawing surface – a recording canvas with a shared text cursor.
//!
//! The surface mirrors the small subset of a PDF drawing API the report
//! needs: explicit page creation, font/fill state, positioned text, lines and
//! filled rectangles, plus cursor-based text flow that starts a new page on
//! its own when a line would cross the bottom margin. Every call appends a
//! [`DrawOp`] to the current page; [`Surface::finish`] hands the recorded
//! pages over as a [`LayoutConfig`] for serialisation.
//!
//! A surface is built per render and never shared.

use crate::fonts::{self, FontFace, FontFamily};
use crate::layout_config::{DrawOp, LayoutConfig, PageLayout};
use crate::style::{Color, TextAlign};

/// Stroke width for rules, in points.
pub const STROKE_WIDTH: f32 = 1.0;

pub struct Surface {
    config: LayoutConfig,
    margin: f32,
    x: f32,
    y: f32,
    font: FontFace,
    font_size: f32,
    fill_color: Color,
}

impl Surface {
    /// Open a surface with one empty page and the cursor at the top-left
    /// margin corner.
    pub fn new(title: &str, page_width: f32, page_height: f32, margin: f32) -> Self {
        let config = LayoutConfig {
            title: title.to_string(),
            page_width_pt: page_width,
            page_height_pt: page_height,
            pages: vec![PageLayout::new(0)],
        };
        Self {
            config,
            margin,
            x: margin,
            y: margin,
            font: FontFace::regular(FontFamily::Helvetica),
            font_size: 12.0,
            fill_color: Color::BLACK,
        }
    }

    pub fn page_width(&self) -> f32 {
        self.config.page_width_pt
    }

    pub fn page_height(&self) -> f32 {
        self.config.page_height_pt
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }

    /// Printable width between the left and right margins.
    pub fn content_width(&self) -> f32 {
        self.page_width() - 2.0 * self.margin
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn set_x(&mut self, x: f32) {
        self.x = x;
    }

    pub fn set_y(&mut self, y: f32) {
        self.y = y;
    }

    pub fn page_count(&self) -> usize {
        self.config.pages.len()
    }

    pub fn font(&self) -> FontFace {
        self.font
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn set_font(&mut self, font: FontFace, size: f32) {
        self.font = font;
        self.font_size = size;
    }

    pub fn fill_color(&self) -> Color {
        self.fill_color
    }

    pub fn set_fill_color(&mut self, color: Color) {
        self.fill_color = color;
    }

    /// Line height of the current font.
    pub fn line_height(&self) -> f32 {
        fonts::line_height(self.font_size)
    }

    /// Advance the cursor by `lines` line heights of the current font.
    pub fn move_down(&mut self, lines: f32) {
        self.y += lines * self.line_height();
    }

    /// Start a new page and put the cursor back at the top margin.
    /// The horizontal cursor position is kept.
    pub fn add_page(&mut self) {
        let index = self.config.pages.len();
        log::debug!("Starting page {}", index + 1);
        self.config.pages.push(PageLayout::new(index));
        self.y = self.margin;
    }

    fn push(&mut self, op: DrawOp) {
        // `new` always creates the first page, so `last_mut` is never `None`.
        if let Some(page) = self.config.pages.last_mut() {
            page.ops.push(op);
        }
    }

    fn push_text(&mut self, text: String, x: f32, y: f32, underline: bool) {
        self.push(DrawOp::Text {
            text,
            x,
            y,
            font: self.font,
            size: self.font_size,
            color: self.fill_color,
            underline,
        });
    }

    /// Fill a rectangle with the current fill colour.
    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.push(DrawOp::FillRect {
            x,
            y,
            width,
            height,
            color: self.fill_color,
        });
    }

    /// Stroke a black rule from `(x1, y1)` to `(x2, y2)`.
    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.push(DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            width: STROKE_WIDTH,
            color: Color::BLACK,
        });
    }

    /// Draw `text` wrapped inside a box of `width` starting at `(x, y)`,
    /// each line aligned per `align`. Does not move the cursor or break pages.
    ///
    /// Returns the height taken by the wrapped lines.
    pub fn text_in_box(&mut self, text: &str, x: f32, y: f32, width: f32, align: TextAlign) -> f32 {
        let line_height = self.line_height();
        let lines = fonts::wrap_text(text, self.font_size, self.font, width);
        let count = lines.len();
        for (i, line) in lines.into_iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let line_width = fonts::measure_text_width(&line, self.font_size, self.font);
            let line_x = x + align.offset(width, line_width);
            self.push_text(line, line_x, y + i as f32 * line_height, false);
        }
        count as f32 * line_height
    }

    /// Flow `text` from the cursor, wrapping at the right margin.
    ///
    /// Each line is drawn at the cursor and the cursor moves down one line
    /// height. A line that would cross the bottom margin goes to a new page.
    pub fn flow_text(&mut self, text: &str, underline: bool) {
        let width = self.page_width() - self.margin - self.x;
        let line_height = self.line_height();
        let bottom = self.page_height() - self.margin;
        for line in fonts::wrap_text(text, self.font_size, self.font, width) {
            if line.is_empty() {
                continue;
            }
            if self.y + line_height > bottom && self.y > self.margin {
                self.add_page();
            }
            let (x, y) = (self.x, self.y);
            self.push_text(line, x, y, underline);
            self.y += line_height;
        }
    }

    /// Close the surface and return the recorded layout.
    pub fn finish(self) -> LayoutConfig {
        self.config
    }
}
