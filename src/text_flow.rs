//! Text flow renderer – draws the tokenized remarks at the surface cursor.
//!
//! Text is buffered until the next style change, line break or paragraph
//! break, then drawn in one call with the font implied by the current bold /
//! italic state. Pagination is left to [`Surface::flow_text`].

use crate::fonts::{FontFace, FontFamily};
use crate::markup::MarkupEvent;
use crate::style::{Color, StyleState};
use crate::surface::Surface;

/// Cursor advance after `</p>`, in line heights.
pub const PARAGRAPH_GAP_LINES: f32 = 0.8;

#[derive(Debug, Clone)]
pub struct TextFlow {
    family: FontFamily,
    font_size: f32,
    paragraph_gap: f32,
}

/// Per-pass state; dropped when the pass ends.
#[derive(Default)]
struct FlowState {
    style: StyleState,
    buffer: String,
}

impl TextFlow {
    pub fn new(family: FontFamily, font_size: f32) -> Self {
        Self {
            family,
            font_size,
            paragraph_gap: PARAGRAPH_GAP_LINES,
        }
    }

    pub fn with_paragraph_gap(mut self, lines: f32) -> Self {
        self.paragraph_gap = lines;
        self
    }

    /// Render one pass over `events`. Style starts all-off.
    pub fn render<I>(&self, surface: &mut Surface, events: I)
    where
        I: IntoIterator<Item = MarkupEvent>,
    {
        let mut state = FlowState::default();

        for event in events {
            match event {
                MarkupEvent::Text(text) => state.buffer.push_str(&text),
                MarkupEvent::StyleOn(kind) => {
                    self.flush(surface, &mut state);
                    state.style.set(kind, true);
                }
                MarkupEvent::StyleOff(kind) => {
                    self.flush(surface, &mut state);
                    state.style.set(kind, false);
                }
                MarkupEvent::LineBreak => {
                    self.flush(surface, &mut state);
                    surface.move_down(1.0);
                }
                MarkupEvent::ParagraphBreak => {
                    self.flush(surface, &mut state);
                    surface.move_down(self.paragraph_gap);
                }
            }
        }

        self.flush(surface, &mut state);
    }

    /// Draw the buffered run. A whitespace-only buffer is kept so it joins
    /// the next run.
    fn flush(&self, surface: &mut Surface, state: &mut FlowState) {
        if state.buffer.trim().is_empty() {
            return;
        }
        let face = FontFace::new(self.family, state.style.variant());
        surface.set_font(face, self.font_size);
        surface.flow_text(&state.buffer, state.style.underline);
        surface.set_fill_color(Color::BLACK);
        state.buffer.clear();
    }
}
