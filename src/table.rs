//! Table layout engine – paginated line-item table with repeating headers.
//!
//! Handles:
//! - column boundaries from fixed width ratios, table centred in the content area
//! - page breaks when the next row would cross the bottom safety margin
//! - header re-emission on every page
//! - zebra striping that restarts on each page
//! - vertical rules drawn per page, never bridging a page break

use crate::currency::format_rupiah;
use crate::fonts::{FontFace, FontFamily};
use crate::model::LineItem;
use crate::style::{Color, TextAlign};
use crate::surface::Surface;

/// Column width ratios: serial, name, contribution, cash.
pub const COLUMN_RATIOS: [f32; 4] = [0.05, 0.5, 0.25, 0.25];
pub const HEADER_LABELS: [&str; 4] = ["ID", "Nama", "Dansos", "Kas"];
/// Table width as a share of the content width.
pub const TABLE_WIDTH_RATIO: f32 = 0.8;
pub const ROW_HEIGHT: f32 = 25.0;
/// Space after the header rule and after the last row.
pub const GAP: f32 = 10.0;
/// Distance from the page bottom that rows must not cross.
pub const BOTTOM_MARGIN: f32 = 50.0;
pub const STRIPE_COLOR: &str = "#f8fafc";
/// The stripe starts this far above the cell text.
const STRIPE_LIFT: f32 = 5.0;

/// Table geometry and look.
#[derive(Debug, Clone)]
pub struct TableStyle {
    pub family: FontFamily,
    pub font_size: f32,
    pub width_ratio: f32,
    pub column_ratios: Vec<f32>,
    pub headers: Vec<String>,
    pub row_height: f32,
    pub gap: f32,
    pub bottom_margin: f32,
    pub stripe_color: Color,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            family: FontFamily::Helvetica,
            font_size: 10.0,
            width_ratio: TABLE_WIDTH_RATIO,
            column_ratios: COLUMN_RATIOS.to_vec(),
            headers: HEADER_LABELS.iter().map(|s| s.to_string()).collect(),
            row_height: ROW_HEIGHT,
            gap: GAP,
            bottom_margin: BOTTOM_MARGIN,
            stripe_color: Color::from_hex(STRIPE_COLOR).unwrap_or(Color::WHITE),
        }
    }
}

/// Outcome of one table pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSummary {
    /// Pages the table touched, including the one it started on.
    pub pages: usize,
    pub headers: usize,
    pub rows: usize,
}

/// Vertical position bookkeeping for the current page span.
struct TableCursor {
    y: f32,
    /// Top of the header on the current page; vertical rules start here.
    page_start_y: f32,
    /// 0-based row position on the current page, drives zebra striping.
    row_on_page: usize,
}

/// Column geometry for one page width; draws with a [`TableStyle`].
pub struct TableLayout<'a> {
    style: &'a TableStyle,
    left: f32,
    width: f32,
    /// Column boundaries, `column_ratios.len() + 1` entries.
    positions: Vec<f32>,
}

impl<'a> TableLayout<'a> {
    pub fn new(style: &'a TableStyle, page_width: f32, margin: f32) -> Self {
        let available = page_width - 2.0 * margin;
        let width = available * style.width_ratio;
        let left = margin + (available - width) / 2.0;

        let mut positions = Vec::with_capacity(style.column_ratios.len() + 1);
        positions.push(left);
        let mut acc = 0.0;
        for ratio in &style.column_ratios {
            acc += ratio * width;
            positions.push(left + acc);
        }

        Self {
            style,
            left,
            width,
            positions,
        }
    }

    pub fn left(&self) -> f32 {
        self.left
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn column_positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn column_widths(&self) -> Vec<f32> {
        self.positions.windows(2).map(|w| w[1] - w[0]).collect()
    }

    /// Draw the table from the surface cursor. Leaves the cursor one gap
    /// below the last row.
    pub fn render(&self, surface: &mut Surface, rows: &[LineItem]) -> TableSummary {
        let mut summary = TableSummary {
            pages: 1,
            headers: 0,
            rows: 0,
        };
        let mut cursor = TableCursor {
            y: surface.y(),
            page_start_y: surface.y(),
            row_on_page: 0,
        };

        self.emit_header(surface, &mut cursor);
        summary.headers += 1;

        for item in rows {
            if cursor.y + self.style.row_height > surface.page_height() - self.style.bottom_margin {
                log::debug!(
                    "Row {} overflows at y={:.1}; continuing table on a new page",
                    item.id,
                    cursor.y
                );
                self.draw_vertical_rules(surface, &cursor);
                surface.add_page();
                cursor.y = surface.margin();
                self.emit_header(surface, &mut cursor);
                summary.pages += 1;
                summary.headers += 1;
            }

            self.emit_row(surface, &mut cursor, item);
            summary.rows += 1;
        }

        self.draw_vertical_rules(surface, &cursor);
        surface.set_y(cursor.y + self.style.gap);
        summary
    }

    fn emit_header(&self, surface: &mut Surface, cursor: &mut TableCursor) {
        cursor.page_start_y = cursor.y;
        cursor.row_on_page = 0;
        surface.set_font(FontFace::bold(self.style.family), self.style.font_size);
        for (i, label) in self.style.headers.iter().enumerate() {
            self.cell(surface, i, cursor.y, label);
        }
        cursor.y += self.style.row_height;
        surface.line(self.left, cursor.y, self.left + self.width, cursor.y);
        cursor.y += self.style.gap;
    }

    fn emit_row(&self, surface: &mut Surface, cursor: &mut TableCursor, item: &LineItem) {
        if cursor.row_on_page % 2 == 0 {
            surface.set_fill_color(self.style.stripe_color);
            surface.fill_rect(
                self.left,
                cursor.y - STRIPE_LIFT,
                self.width,
                self.style.row_height,
            );
            surface.set_fill_color(Color::BLACK);
        }

        surface.set_font(FontFace::regular(self.style.family), self.style.font_size);
        let values = [
            item.id.to_string(),
            item.name.clone(),
            format_rupiah(item.contribution_amount),
            format_rupiah(item.cash_amount),
        ];
        for (i, value) in values.iter().enumerate() {
            self.cell(surface, i, cursor.y, value);
        }

        cursor.y += self.style.row_height;
        cursor.row_on_page += 1;
    }

    fn cell(&self, surface: &mut Surface, column: usize, y: f32, text: &str) {
        if let Some(w) = self.positions.get(column..=column + 1) {
            surface.text_in_box(text, w[0], y, w[1] - w[0], TextAlign::Center);
        }
    }

    fn draw_vertical_rules(&self, surface: &mut Surface, cursor: &TableCursor) {
        for &x in &self.positions {
            surface.line(x, cursor.page_start_y, x, cursor.y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout_config::{DrawOp, LayoutConfig};

    const PAGE_W: f32 = 612.0;
    const PAGE_H: f32 = 792.0;
    const MARGIN: f32 = 30.0;

    fn rows(n: usize) -> Vec<LineItem> {
        (1..=n)
            .map(|i| LineItem::new(i as i64, format!("Row {i}"), 1000.0 * i as f64, 500.0))
            .collect()
    }

    fn render(items: &[LineItem], start_y: f32) -> (LayoutConfig, TableSummary, f32) {
        let style = TableStyle::default();
        let table = TableLayout::new(&style, PAGE_W, MARGIN);
        let mut surface = Surface::new("t", PAGE_W, PAGE_H, MARGIN);
        surface.set_y(start_y);
        let summary = table.render(&mut surface, items);
        let y = surface.y();
        (surface.finish(), summary, y)
    }

    fn header_count(layout: &LayoutConfig) -> usize {
        layout.texts().iter().filter(|t| **t == "Nama").count()
    }

    #[test]
    fn column_widths_sum_to_table_width() {
        let configs: [&[f32]; 3] = [&[0.05, 0.45, 0.25, 0.25], &[0.25, 0.25, 0.25, 0.25], &[0.1, 0.2, 0.3, 0.4]];
        for ratios in configs {
            let style = TableStyle {
                column_ratios: ratios.to_vec(),
                ..TableStyle::default()
            };
            let table = TableLayout::new(&style, PAGE_W, MARGIN);
            let sum: f32 = table.column_widths().iter().sum();
            assert!((sum - table.width()).abs() < 1e-3);
        }
    }

    #[test]
    fn table_is_centred_at_eighty_percent() {
        let style = TableStyle::default();
        let table = TableLayout::new(&style, PAGE_W, MARGIN);
        // available 552, table 441.6, left = 30 + 55.2
        assert!((table.width() - 441.6).abs() < 0.01);
        assert!((table.left() - 85.2).abs() < 0.01);
        // stock ratios sum to 1.05: the last edge sits 5% past the table width
        let right = *table.column_positions().last().unwrap();
        assert!((right - (85.2 + 1.05 * 441.6)).abs() < 0.01);
    }

    #[test]
    fn stock_ratios_are_not_rescaled() {
        let style = TableStyle::default();
        let table = TableLayout::new(&style, PAGE_W, MARGIN);
        let widths = table.column_widths();
        let expected: Vec<f32> = COLUMN_RATIOS.iter().map(|r| r * 441.6).collect();
        for (w, e) in widths.iter().zip(&expected) {
            assert!((w - e).abs() < 0.01, "{w} vs {e}");
        }
        // header rule still spans exactly the table width
        let (layout, _, _) = render(&[], 100.0);
        let header_rule = layout.pages[0]
            .ops
            .iter()
            .find_map(|op| match op {
                DrawOp::Line { x1, x2, y1, y2, .. } if y1 == y2 => Some(x2 - x1),
                _ => None,
            })
            .unwrap();
        assert!((header_rule - 441.6).abs() < 0.01);
    }

    #[test]
    fn row_cells_keep_input_order() {
        let items = vec![
            LineItem::new(9, "Zed", 1000.0, 2000.0),
            LineItem::new(2, "Ann", 0.0, 1_000_000.0),
        ];
        let (layout, summary, _) = render(&items, 100.0);
        assert_eq!(summary.rows, 2);
        assert_eq!(
            layout.texts(),
            vec![
                "ID", "Nama", "Dansos", "Kas", "9", "Zed", "Rp1.000", "Rp2.000", "2", "Ann",
                "Rp0", "Rp1.000.000"
            ]
        );
    }

    #[test]
    fn empty_table_draws_header_and_rules() {
        let (layout, summary, end_y) = render(&[], 100.0);
        assert_eq!(summary, TableSummary { pages: 1, headers: 1, rows: 0 });
        let lines = layout.pages[0]
            .ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Line { .. }))
            .count();
        // header rule + 5 vertical rules
        assert_eq!(lines, 6);
        assert!((end_y - (100.0 + 25.0 + 10.0 + 10.0)).abs() < 0.01);
    }

    #[test]
    fn page_breaks_repeat_header_and_never_split_rows() {
        let items = rows(80);
        let start_y = 100.0;
        let (layout, summary, _) = render(&items, start_y);

        // Simulate the overflow rule independently.
        let limit = PAGE_H - BOTTOM_MARGIN;
        let mut y = start_y + ROW_HEIGHT + GAP;
        let mut pages = 1;
        for _ in &items {
            if y + ROW_HEIGHT > limit {
                pages += 1;
                y = MARGIN + ROW_HEIGHT + GAP;
            }
            y += ROW_HEIGHT;
        }

        assert_eq!(summary.pages, pages);
        assert_eq!(layout.pages.len(), pages);
        assert_eq!(summary.headers, pages);
        assert_eq!(header_count(&layout), pages);
        assert_eq!(summary.rows, 80);

        for page in &layout.pages {
            for op in &page.ops {
                if let DrawOp::FillRect { y, height, .. } = op {
                    // stripe top sits STRIPE_LIFT above the row top
                    assert!(
                        y + STRIPE_LIFT + height <= limit + 0.01,
                        "row crosses bottom margin"
                    );
                }
            }
        }
    }

    #[test]
    fn zebra_restarts_on_each_page() {
        let items = rows(60);
        let (layout, _, _) = render(&items, 100.0);
        assert!(layout.pages.len() > 1);
        for page in &layout.pages {
            let rows_on_page = page.texts().len() / 4 - 1;
            let stripes = page
                .ops
                .iter()
                .filter(|op| matches!(op, DrawOp::FillRect { .. }))
                .count();
            assert_eq!(stripes, rows_on_page.div_ceil(2));

            // The first op after each header is a stripe.
            let first_row_op = page
                .ops
                .iter()
                .position(|op| matches!(op, DrawOp::FillRect { .. }));
            let first_id_text = page.ops.iter().position(|op| {
                op.text()
                    .map(|t| t.parse::<i64>().is_ok())
                    .unwrap_or(false)
            });
            assert!(first_row_op < first_id_text);
        }
    }

    #[test]
    fn vertical_rules_stay_within_their_page() {
        let items = rows(60);
        let (layout, _, _) = render(&items, 100.0);
        for (index, page) in layout.pages.iter().enumerate() {
            let verticals: Vec<(f32, f32)> = page
                .ops
                .iter()
                .filter_map(|op| match op {
                    DrawOp::Line { x1, x2, y1, y2, .. } if x1 == x2 => Some((*y1, *y2)),
                    _ => None,
                })
                .collect();
            assert_eq!(verticals.len(), 5, "page {index} should carry its own rule set");
            let top = if index == 0 { 100.0 } else { MARGIN };
            for (y1, y2) in verticals {
                assert!((y1 - top).abs() < 0.01);
                assert!(y2 <= PAGE_H - BOTTOM_MARGIN + 0.01);
            }
        }
    }

    #[test]
    fn stripe_colour_and_reset_to_black() {
        let (layout, _, _) = render(&rows(1), 100.0);
        let stripe = Color::from_hex(STRIPE_COLOR).unwrap();
        let ops = &layout.pages[0].ops;
        let fill = ops
            .iter()
            .position(|op| matches!(op, DrawOp::FillRect { color, .. } if *color == stripe))
            .expect("stripe drawn");
        assert!(ops[fill + 1..].iter().all(|op| match op {
            DrawOp::Text { color, .. } => *color == Color::BLACK,
            _ => true,
        }));
    }

    #[test]
    fn header_uses_bold_rows_regular() {
        let (layout, _, _) = render(&rows(1), 100.0);
        for op in &layout.pages[0].ops {
            if let DrawOp::Text { text, font, .. } = op {
                let expect_bold = HEADER_LABELS.contains(&text.as_str());
                assert_eq!(font.variant.is_bold(), expect_bold, "{text}");
            }
        }
    }
}
