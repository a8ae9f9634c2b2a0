//! The report document and its table rows.
//!
//! Field names serialise in camelCase; the Indonesian keys used by earlier
//! clients (`judul`, `keterangan`, `tabel`, `nama`, `dansos`, `kas`) are
//! accepted as aliases on input.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// The single title / remarks / rows aggregate that gets rendered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDocument {
    #[serde(default, alias = "judul")]
    pub title: String,
    /// Remarks in the restricted markup understood by [`crate::markup`].
    #[serde(default, alias = "keterangan")]
    pub remarks: String,
    /// Display order; never re-sorted.
    #[serde(default, alias = "tabel")]
    pub rows: Vec<LineItem>,
}

/// One table entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Assigned by the store; opaque to the renderer.
    pub id: i64,
    #[serde(alias = "nama")]
    pub name: String,
    #[serde(alias = "dansos")]
    pub contribution_amount: f64,
    #[serde(alias = "kas")]
    pub cash_amount: f64,
}

/// Row payload without an id, used when creating or replacing a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowInput {
    #[serde(alias = "nama")]
    pub name: String,
    #[serde(alias = "dansos")]
    pub contribution_amount: f64,
    #[serde(alias = "kas")]
    pub cash_amount: f64,
}

/// Title / remarks payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataUpdate {
    #[serde(alias = "judul")]
    pub title: String,
    #[serde(alias = "keterangan")]
    pub remarks: String,
}

impl ReportDocument {
    pub fn new(title: impl Into<String>, remarks: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            remarks: remarks.into(),
            rows: Vec::new(),
        }
    }

    pub fn with_row(mut self, row: LineItem) -> Self {
        self.rows.push(row);
        self
    }

    /// Check every row's amounts.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.rows.iter().try_for_each(LineItem::validate)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

impl LineItem {
    pub fn new(id: i64, name: impl Into<String>, contribution_amount: f64, cash_amount: f64) -> Self {
        Self {
            id,
            name: name.into(),
            contribution_amount,
            cash_amount,
        }
    }

    pub fn from_input(id: i64, input: RowInput) -> Self {
        Self {
            id,
            name: input.name,
            contribution_amount: input.contribution_amount,
            cash_amount: input.cash_amount,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_amounts(
            &self.id.to_string(),
            self.contribution_amount,
            self.cash_amount,
        )
    }
}

impl RowInput {
    pub fn new(name: impl Into<String>, contribution_amount: f64, cash_amount: f64) -> Self {
        Self {
            name: name.into(),
            contribution_amount,
            cash_amount,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_amounts(&self.name, self.contribution_amount, self.cash_amount)
    }
}

fn check_amounts(row: &str, contribution: f64, cash: f64) -> Result<(), ValidationError> {
    for (field, value) in [("contributionAmount", contribution), ("cashAmount", cash)] {
        if !value.is_finite() {
            return Err(ValidationError::NonFiniteAmount {
                row: row.to_string(),
                field,
            });
        }
        if value < 0.0 {
            return Err(ValidationError::NegativeAmount {
                row: row.to_string(),
                field,
                value,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_english_keys() {
        let json = r#"{
            "title": "Report",
            "remarks": "<b>Note</b>",
            "rows": [{"id": 1, "name": "A", "contributionAmount": 1000, "cashAmount": 2000}]
        }"#;
        let doc = ReportDocument::from_json(json).unwrap();
        assert_eq!(doc.title, "Report");
        assert_eq!(doc.rows, vec![LineItem::new(1, "A", 1000.0, 2000.0)]);
    }

    #[test]
    fn parses_indonesian_aliases() {
        let json = r#"{
            "judul": "Laporan Kas",
            "keterangan": "<p>Lunas</p>",
            "tabel": [{"id": 7, "nama": "Budi", "dansos": 5000, "kas": 10000}]
        }"#;
        let doc = ReportDocument::from_json(json).unwrap();
        assert_eq!(doc.title, "Laporan Kas");
        assert_eq!(doc.remarks, "<p>Lunas</p>");
        assert_eq!(doc.rows[0].name, "Budi");
        assert_eq!(doc.rows[0].cash_amount, 10000.0);
    }

    #[test]
    fn serialises_camel_case() {
        let doc = ReportDocument::new("T", "").with_row(LineItem::new(1, "A", 1.0, 2.0));
        let json = doc.to_json();
        assert!(json.contains("\"contributionAmount\""));
        assert!(json.contains("\"cashAmount\""));
        assert_eq!(ReportDocument::from_json(&json).unwrap(), doc);
    }

    #[test]
    fn rejects_negative_amounts() {
        let doc = ReportDocument::new("T", "").with_row(LineItem::new(3, "X", -1.0, 0.0));
        let err = doc.validate().unwrap_err();
        assert!(matches!(
            err,
            ValidationError::NegativeAmount { field: "contributionAmount", .. }
        ));
        assert!(RowInput::new("Y", 0.0, f64::NAN).validate().is_err());
        assert!(RowInput::new("Z", 0.0, 0.0).validate().is_ok());
    }
}
