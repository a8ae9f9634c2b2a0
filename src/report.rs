//! Report renderer – ties together the title block, the line-item table and
//! the remarks flow into a single function call.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::RenderError;
use crate::fonts::{FontFace, FontFamily};
use crate::layout_config::LayoutConfig;
use crate::markup;
use crate::model::ReportDocument;
use crate::render::render_pdf;
use crate::style::{Color, TextAlign};
use crate::surface::Surface;
use crate::table::{self, TableLayout, TableStyle, TableSummary};
use crate::text_flow::{TextFlow, PARAGRAPH_GAP_LINES};

/// MIME type of the rendered report.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// File stem used when the caller does not name the report.
pub const DEFAULT_REPORT_NAME: &str = "laporan";

/// Default page margin in points.
pub const PAGE_MARGIN_PT: f32 = 30.0;

/// Supported paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    /// 612 × 792 pt (default).
    #[default]
    Letter,
    /// 595.28 × 841.89 pt.
    A4,
}

impl PageSize {
    /// Portrait `(width, height)` in points.
    pub fn dimensions(self) -> (f32, f32) {
        match self {
            PageSize::Letter => (612.0, 792.0),
            PageSize::A4 => (595.28, 841.89),
        }
    }
}

/// Page orientation for the generated PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageOrientation {
    /// Portrait mode: height > width (default).
    #[default]
    Portrait,
    /// Landscape mode: width > height.
    Landscape,
}

/// Configuration for the report renderer.
///
/// Every field has a default, so a partial JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub page_size: PageSize,
    /// Page orientation; swaps effective width/height when `Landscape`.
    pub orientation: PageOrientation,
    /// Page margin in points (default: 30).
    pub page_margin: f32,
    pub font_family: FontFamily,
    pub title_font_size: f32,
    /// Font size of table cells and remarks.
    pub body_font_size: f32,
    /// Table width as a share of the content width.
    pub table_width_ratio: f32,
    /// Shares of the table width, one per `header_labels` entry. Not
    /// rescaled: the stock ratios add up to 1.05, so the last column runs
    /// past the header rule.
    pub column_ratios: Vec<f32>,
    pub header_labels: Vec<String>,
    pub row_height: f32,
    pub table_gap: f32,
    /// Rows never extend closer than this to the bottom page edge.
    pub bottom_margin: f32,
    pub stripe_color: Color,
    /// Left edge of the remarks block; `None` means the page margin.
    pub remarks_x: Option<f32>,
    /// Cursor advance after a paragraph, in line heights.
    pub paragraph_gap: f32,
    /// Title embedded in the PDF metadata; `None` uses the document title.
    pub metadata_title: Option<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        let table = TableStyle::default();
        Self {
            page_size: PageSize::Letter,
            orientation: PageOrientation::Portrait,
            page_margin: PAGE_MARGIN_PT,
            font_family: FontFamily::Helvetica,
            title_font_size: 18.0,
            body_font_size: table.font_size,
            table_width_ratio: table.width_ratio,
            column_ratios: table.column_ratios,
            header_labels: table.headers,
            row_height: table.row_height,
            table_gap: table.gap,
            bottom_margin: table.bottom_margin,
            stripe_color: table.stripe_color,
            remarks_x: None,
            paragraph_gap: PARAGRAPH_GAP_LINES,
            metadata_title: None,
        }
    }
}

impl ReportConfig {
    /// Effective page width after applying orientation.
    pub fn effective_width(&self) -> f32 {
        let (w, h) = self.page_size.dimensions();
        match self.orientation {
            PageOrientation::Portrait => w,
            PageOrientation::Landscape => h,
        }
    }

    /// Effective page height after applying orientation.
    pub fn effective_height(&self) -> f32 {
        let (w, h) = self.page_size.dimensions();
        match self.orientation {
            PageOrientation::Portrait => h,
            PageOrientation::Landscape => w,
        }
    }

    /// Create an A4 portrait config.
    pub fn a4() -> Self {
        Self {
            page_size: PageSize::A4,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn table_style(&self) -> TableStyle {
        TableStyle {
            family: self.font_family,
            font_size: self.body_font_size,
            width_ratio: self.table_width_ratio,
            column_ratios: self.column_ratios.clone(),
            headers: self.header_labels.clone(),
            row_height: self.row_height,
            gap: self.table_gap,
            bottom_margin: self.bottom_margin,
            stripe_color: self.stripe_color,
        }
    }

    pub fn validate(&self) -> Result<(), RenderError> {
        let invalid = |msg: String| Err(RenderError::InvalidConfig(msg));

        let positive = [
            ("page_margin", self.page_margin),
            ("title_font_size", self.title_font_size),
            ("body_font_size", self.body_font_size),
            ("table_width_ratio", self.table_width_ratio),
            ("row_height", self.row_height),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return invalid(format!("{name} must be a positive number, got {value}"));
            }
        }
        for (name, value) in [
            ("table_gap", self.table_gap),
            ("bottom_margin", self.bottom_margin),
            ("paragraph_gap", self.paragraph_gap),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return invalid(format!("{name} must not be negative, got {value}"));
            }
        }
        if self.table_width_ratio > 1.0 {
            return invalid(format!(
                "table_width_ratio must be at most 1, got {}",
                self.table_width_ratio
            ));
        }
        if 2.0 * self.page_margin >= self.effective_width().min(self.effective_height()) {
            return invalid(format!(
                "page_margin {} leaves no printable area",
                self.page_margin
            ));
        }
        if self.column_ratios.is_empty() || self.column_ratios.iter().any(|r| !(*r > 0.0)) {
            return invalid("column_ratios must be non-empty and positive".to_string());
        }
        let sum: f32 = self.column_ratios.iter().sum();
        if (sum - 1.0).abs() > 1e-3 && self.column_ratios != table::COLUMN_RATIOS {
            // Columns are laid out at ratio × table width without rescaling,
            // so the last column edge lands at `sum × width`.
            log::warn!("column_ratios sum to {sum}, not 1; the table edge will not match the header rule");
        }
        if self.column_ratios.len() != self.header_labels.len() {
            return invalid(format!(
                "{} column ratios but {} header labels",
                self.column_ratios.len(),
                self.header_labels.len()
            ));
        }
        if self.column_ratios.len() != table::COLUMN_RATIOS.len() {
            return invalid(format!(
                "the table has {} columns, got {} ratios",
                table::COLUMN_RATIOS.len(),
                self.column_ratios.len()
            ));
        }
        if let Some(x) = self.remarks_x {
            if !(x.is_finite() && x >= 0.0 && x < self.effective_width()) {
                return invalid(format!("remarks_x {x} is outside the page"));
            }
        }
        Ok(())
    }
}

/// What a render produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSummary {
    pub pages: usize,
    pub bytes: usize,
    pub table: TableSummary,
}

/// Lay the document out on a fresh surface without serialising it.
pub fn layout_report(document: &ReportDocument, config: &ReportConfig) -> Result<LayoutConfig, RenderError> {
    layout_with_summary(document, config).map(|(layout, _)| layout)
}

fn layout_with_summary(
    document: &ReportDocument,
    config: &ReportConfig,
) -> Result<(LayoutConfig, TableSummary), RenderError> {
    config.validate()?;

    let metadata_title = config
        .metadata_title
        .clone()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| {
            if document.title.trim().is_empty() {
                DEFAULT_REPORT_NAME.to_string()
            } else {
                document.title.clone()
            }
        });

    let mut surface = Surface::new(
        &metadata_title,
        config.effective_width(),
        config.effective_height(),
        config.page_margin,
    );
    let family = config.font_family;

    // 1. Title block
    surface.set_font(FontFace::bold(family), config.title_font_size);
    let (left, top) = (surface.margin(), surface.margin());
    let content_width = surface.content_width();
    let title_height = surface.text_in_box(&document.title, left, top, content_width, TextAlign::Center);
    surface.set_y(top + title_height);
    surface.move_down(2.0);

    // 2. Line-item table
    let style = config.table_style();
    let table = TableLayout::new(&style, surface.page_width(), surface.margin());
    let table_summary = table.render(&mut surface, &document.rows);

    // 3. Remarks
    surface.set_font(FontFace::regular(family), config.body_font_size);
    surface.set_x(config.remarks_x.unwrap_or(config.page_margin));
    surface.move_down(3.0);
    TextFlow::new(family, config.body_font_size)
        .with_paragraph_gap(config.paragraph_gap)
        .render(&mut surface, markup::tokenize(&document.remarks));

    if !markup::is_balanced(&document.remarks) {
        log::warn!("Remarks contain unclosed style tags; styling ran to the end of the text");
    }

    Ok((surface.finish(), table_summary))
}

/// Full pipeline: document → PDF bytes.
pub fn render_report(document: &ReportDocument, config: &ReportConfig) -> Result<Vec<u8>, RenderError> {
    let (layout, table) = layout_with_summary(document, config)?;
    let bytes = render_pdf(&layout)?;
    log::info!(
        "Rendered report {:?}: {} row(s), {} page(s), {} bytes",
        layout.title,
        table.rows,
        layout.pages.len(),
        bytes.len()
    );
    Ok(bytes)
}

/// Render and write the PDF to `writer`. Nothing is written on failure.
pub fn render_report_to<W: Write>(
    document: &ReportDocument,
    config: &ReportConfig,
    writer: &mut W,
) -> Result<RenderSummary, RenderError> {
    let (layout, table) = layout_with_summary(document, config)?;
    let bytes = render_pdf(&layout)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(RenderSummary {
        pages: layout.pages.len(),
        bytes: bytes.len(),
        table,
    })
}

/// Convenience: render with the default Letter config.
pub fn render_default(document: &ReportDocument) -> Result<Vec<u8>, RenderError> {
    render_report(document, &ReportConfig::default())
}

/// `Content-Disposition` value for serving the PDF inline.
///
/// Characters outside `[A-Za-z0-9._-]` in the name become `_`.
pub fn content_disposition(report_name: &str) -> String {
    let stem: String = report_name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let stem = if stem.is_empty() {
        DEFAULT_REPORT_NAME.to_string()
    } else {
        stem
    };
    format!("inline; filename={stem}.pdf")
}
