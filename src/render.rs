//! PDF renderer – takes a [`LayoutConfig`] and produces PDF bytes using
//! `printpdf` (v0.8 ops-based API).

use std::io::Write;

use printpdf::{
    Color as PdfColor, Line, LinePoint, Mm, Op, PaintMode, PdfDocument, PdfPage, PdfSaveOptions,
    PdfWarnMsg, Point, Polygon, PolygonRing, Pt, Rgb, TextItem, WindingOrder,
};

use crate::error::RenderError;
use crate::fonts::ASCENDER_FACTOR;
use crate::layout_config::{DrawOp, LayoutConfig};
use crate::style::Color;

/// Underline stroke width, in points.
const UNDERLINE_WIDTH: f32 = 0.5;

/// Render a LayoutConfig into PDF bytes.
pub fn render_pdf(config: &LayoutConfig) -> Result<Vec<u8>, RenderError> {
    check_layout(config)?;

    let page_w = Mm(config.page_width_pt * 0.352778); // pt → mm
    let page_h = Mm(config.page_height_pt * 0.352778);

    let mut doc = PdfDocument::new(&config.title);

    let mut pages = Vec::new();
    for page_layout in &config.pages {
        let mut ops = Vec::new();
        for op in &page_layout.ops {
            render_op(&mut ops, op, config.page_height_pt);
        }
        pages.push(PdfPage::new(page_w, page_h, ops));
    }

    // Ensure at least one page.
    if pages.is_empty() {
        pages.push(PdfPage::new(page_w, page_h, Vec::new()));
    }

    doc.with_pages(pages);
    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
    for warning in &warnings {
        log::warn!("PDF serialisation: {warning:?}");
    }

    if bytes.is_empty() {
        return Err(RenderError::Surface(
            "PDF serialisation produced no output".to_string(),
        ));
    }
    Ok(bytes)
}

/// Render a LayoutConfig and write the bytes to `writer`.
///
/// Nothing is written when rendering fails. Returns the number of bytes
/// written.
pub fn render_pdf_to<W: Write>(config: &LayoutConfig, writer: &mut W) -> Result<usize, RenderError> {
    let bytes = render_pdf(config)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(bytes.len())
}

/// Reject layouts that cannot be drawn: non-positive or non-finite page size,
/// non-finite coordinates.
fn check_layout(config: &LayoutConfig) -> Result<(), RenderError> {
    let (w, h) = (config.page_width_pt, config.page_height_pt);
    if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
        return Err(RenderError::Surface(format!(
            "invalid page size {w} × {h} pt"
        )));
    }
    for page in &config.pages {
        if let Some(op) = page.ops.iter().find(|op| !op.is_finite()) {
            return Err(RenderError::Surface(format!(
                "non-finite coordinate on page {}: {op:?}",
                page.page_index + 1
            )));
        }
    }
    Ok(())
}

/// Convert a UTF-8 string to raw Windows-1252 bytes then wrap in a String so
/// printpdf writes the bytes unchanged into the PDF stream (builtin fonts use
/// WinAnsiEncoding, so each glyph is one byte 0x00–0xFF).
fn to_winlatin(s: &str) -> String {
    let mut replaced = 0usize;
    let bytes: Vec<u8> = s
        .chars()
        .map(|c| match c {
            '\u{20AC}' => 0x80, // euro
            '\u{2026}' => 0x85, // ellipsis
            '\u{2018}' => 0x91, // left single quote
            '\u{2019}' => 0x92, // right single quote
            '\u{201C}' => 0x93, // left double quote
            '\u{201D}' => 0x94, // right double quote
            '\u{2022}' => 0x95, // bullet
            '\u{2013}' => 0x96, // en-dash
            '\u{2014}' => 0x97, // em-dash
            '\u{00A0}' => 0x20, // non-breaking space -> space
            c if (c as u32) < 256 => c as u8,
            _ => {
                replaced += 1;
                b'?'
            }
        })
        .collect();
    if replaced > 0 {
        log::warn!("{replaced} character(s) in {s:?} have no WinAnsi glyph; drawn as '?'");
    }
    // SAFETY: intentionally non-UTF-8 for 0x80-0xFF; printpdf passes these
    // bytes straight to the PDF stream, decoded by WinAnsiEncoding.
    #[allow(unsafe_code)]
    unsafe {
        String::from_utf8_unchecked(bytes)
    }
}

fn pdf_color(color: Color) -> PdfColor {
    PdfColor::Rgb(Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
        icc_profile: None,
    })
}

fn point(x: f32, y: f32) -> LinePoint {
    LinePoint {
        p: Point { x: Pt(x), y: Pt(y) },
        bezier: false,
    }
}

fn stroke(ops: &mut Vec<Op>, from: (f32, f32), to: (f32, f32), width: f32, color: Color) {
    ops.push(Op::SetOutlineThickness { pt: Pt(width) });
    ops.push(Op::SetOutlineColor {
        col: pdf_color(color),
    });
    ops.push(Op::DrawLine {
        line: Line {
            points: vec![point(from.0, from.1), point(to.0, to.1)],
            is_closed: false,
        },
    });
}

/// Translate one recorded op into printpdf ops.
///
/// PDF coordinate system: origin at bottom-left; the layout uses top-left.
fn render_op(ops: &mut Vec<Op>, op: &DrawOp, page_height: f32) {
    match op {
        DrawOp::FillRect {
            x,
            y,
            width,
            height,
            color,
        } => {
            let x1 = *x;
            let x2 = x + width;
            let y_top = page_height - y;
            let y_bottom = y_top - height;
            ops.push(Op::SetFillColor {
                col: pdf_color(*color),
            });
            ops.push(Op::DrawPolygon {
                polygon: Polygon {
                    rings: vec![PolygonRing {
                        points: vec![
                            point(x1, y_bottom),
                            point(x2, y_bottom),
                            point(x2, y_top),
                            point(x1, y_top),
                        ],
                    }],
                    mode: PaintMode::Fill,
                    winding_order: WindingOrder::NonZero,
                },
            });
        }
        DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            width,
            color,
        } => stroke(
            ops,
            (*x1, page_height - y1),
            (*x2, page_height - y2),
            *width,
            *color,
        ),
        DrawOp::Text {
            text,
            x,
            y,
            font,
            size,
            color,
            underline,
        } => {
            if text.is_empty() {
                return;
            }
            let builtin = font.builtin();
            // Baseline ≈ top of line + ascender
            let baseline = page_height - y - size * ASCENDER_FACTOR;

            ops.push(Op::StartTextSection);
            ops.push(Op::SetTextCursor {
                pos: Point {
                    x: Pt(*x),
                    y: Pt(baseline),
                },
            });
            ops.push(Op::SetFontSizeBuiltinFont {
                size: Pt(*size),
                font: builtin,
            });
            ops.push(Op::SetFillColor {
                col: pdf_color(*color),
            });
            ops.push(Op::WriteTextBuiltinFont {
                items: vec![TextItem::Text(to_winlatin(text))],
                font: builtin,
            });
            ops.push(Op::EndTextSection);

            if *underline {
                let underline_y = baseline - size * 0.1;
                let width = crate::fonts::measure_text_width(text, *size, *font);
                stroke(
                    ops,
                    (*x, underline_y),
                    (x + width, underline_y),
                    UNDERLINE_WIDTH,
                    *color,
                );
            }
        }
    }
}
