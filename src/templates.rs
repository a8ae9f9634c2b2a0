//! Sample report documents for testing and demonstration.
//!
//! Each sample exercises a different part of the renderer.

use crate::model::{LineItem, ReportDocument};

/// Small monthly cash report: a handful of rows and styled remarks.
pub fn sample_document() -> ReportDocument {
    ReportDocument::new(
        "Laporan Kas RT 05 – Mei 2024",
        "<p>Iuran dansos dan kas bulan ini sudah <b>lunas</b> untuk semua warga yang tercatat.</p>\
         <p>Sisa kas dipakai untuk <i>perbaikan lampu jalan</i>.<br>Mohon <u>konfirmasi</u> sebelum tanggal 10.</p>",
    )
    .with_row(LineItem::new(1, "Budi Santoso", 10_000.0, 25_000.0))
    .with_row(LineItem::new(2, "Siti Aminah", 10_000.0, 25_000.0))
    .with_row(LineItem::new(3, "Agus Salim", 15_000.0, 30_000.0))
    .with_row(LineItem::new(4, "Dewi Lestari", 10_000.0, 25_000.0))
}

/// Document with `rows` generated rows, enough to force table page breaks
/// once `rows` exceeds roughly 27 on a Letter page.
pub fn multipage_document(rows: usize) -> ReportDocument {
    let mut document = ReportDocument::new(
        "Rekap Iuran Tahunan",
        "Rekap ini dibuat otomatis dari catatan bulanan.",
    );
    document.rows = (1..=rows)
        .map(|i| {
            let n = i as f64;
            LineItem::new(i as i64, format!("Warga {i}"), 5_000.0 * n, 12_500.0 * n)
        })
        .collect();
    document
}

/// Remarks that use every supported tag plus entities and an unmatched
/// closing tag.
pub fn rich_remarks_document() -> ReportDocument {
    let paragraph = "Rapat warga membahas anggaran kebersihan, keamanan dan kegiatan \
                     tujuh belasan. Semua keputusan dicatat oleh sekretaris. ";
    let mut remarks = String::new();
    remarks.push_str("<p><b>Catatan rapat</b></p>");
    for _ in 0..6 {
        remarks.push_str("<p>");
        remarks.push_str(paragraph);
        remarks.push_str("<b><i>Penting:</i></b> iuran naik &amp; jadwal ronda berubah.</p>");
    }
    remarks.push_str("Tanda tangan ketua RT.</u><br>&lt;arsip&gt;");

    ReportDocument::new("Notulen Rapat", remarks).with_row(LineItem::new(1, "Kas awal", 0.0, 1_250_000.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_are_valid() {
        assert!(sample_document().validate().is_ok());
        assert!(multipage_document(60).validate().is_ok());
        assert!(rich_remarks_document().validate().is_ok());
    }

    #[test]
    fn multipage_ids_are_sequential() {
        let doc = multipage_document(5);
        let ids: Vec<i64> = doc.rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }
}
