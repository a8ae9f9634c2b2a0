//! # laporan – report document store and PDF renderer
//!
//! This crate keeps a single report document (a title, a table of line items
//! with two money columns, and free-text remarks) and renders it to a
//! paginated PDF. The render stages are:
//!
//! 1. **Title** – bold, centred at the top margin ([`report`])
//! 2. **Table** – fixed-ratio columns, zebra stripes, header repeated on
//!    every page ([`table`])
//! 3. **Remarks** – restricted markup ([`markup`]) flowed below the table
//!    with bold/italic/underline runs ([`text_flow`])
//! 4. **Render** – the recorded [`layout_config::LayoutConfig`] is emitted
//!    as PDF bytes via printpdf ([`render`])
//!
//! Drawing goes through a recording [`surface::Surface`]; the document itself
//! lives in a [`store::DocumentStore`] owned by the caller.

pub mod currency;
pub mod error;
pub mod fonts;
pub mod layout_config;
pub mod markup;
pub mod model;
pub mod render;
pub mod report;
pub mod store;
pub mod style;
pub mod surface;
pub mod table;
pub mod templates;
pub mod text_flow;

// Re-exports for convenience
pub use error::{Error, RenderError, StoreError, ValidationError};
pub use model::{LineItem, MetadataUpdate, ReportDocument, RowInput};
pub use report::{render_default, render_report, render_report_to, PageOrientation, PageSize, ReportConfig};
pub use store::{DocumentStore, JsonFileStore, MemoryStore};
