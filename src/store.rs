//! Document stores – own the single report document and hand out copies for
//! rendering.
//!
//! Two backends share the [`DocumentStore`] trait: [`MemoryStore`] keeps the
//! document in process, [`JsonFileStore`] persists it to a JSON file after
//! every change.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::model::{LineItem, MetadataUpdate, ReportDocument, RowInput};

/// CRUD operations over the report document.
///
/// Row lookups match on `id`. Updating or deleting an id that is not
/// present is a no-op and reports `false`.
pub trait DocumentStore {
    /// Current document state.
    fn find_document(&self) -> Result<ReportDocument, StoreError>;

    /// Replace title and remarks; rows are untouched.
    fn replace_metadata(&mut self, update: MetadataUpdate) -> Result<(), StoreError>;

    /// Append a row and return the id assigned to it.
    fn append_row(&mut self, input: RowInput) -> Result<i64, StoreError>;

    /// Replace the fields of row `id`, keeping its id and position.
    fn update_row(&mut self, id: i64, input: RowInput) -> Result<bool, StoreError>;

    fn delete_row(&mut self, id: i64) -> Result<bool, StoreError>;

    /// Overwrite title and remarks, then append every incoming row with its
    /// id kept verbatim.
    fn merge_import(&mut self, incoming: ReportDocument) -> Result<(), StoreError>;
}

// Shared row edits; both backends apply these to an owned document.

fn apply_metadata(document: &mut ReportDocument, update: MetadataUpdate) {
    document.title = update.title;
    document.remarks = update.remarks;
}

fn apply_update(document: &mut ReportDocument, id: i64, input: RowInput) -> bool {
    match document.rows.iter_mut().find(|row| row.id == id) {
        Some(row) => {
            *row = LineItem::from_input(id, input);
            true
        }
        None => {
            log::debug!("update_row: no row with id {id}");
            false
        }
    }
}

fn apply_delete(document: &mut ReportDocument, id: i64) -> bool {
    let before = document.rows.len();
    document.rows.retain(|row| row.id != id);
    let removed = document.rows.len() != before;
    if !removed {
        log::debug!("delete_row: no row with id {id}");
    }
    removed
}

fn apply_import(document: &mut ReportDocument, incoming: ReportDocument) {
    document.title = incoming.title;
    document.remarks = incoming.remarks;
    document.rows.extend(incoming.rows);
}

fn max_id(document: &ReportDocument) -> i64 {
    document.rows.iter().map(|row| row.id).max().unwrap_or(0)
}

// ─── In-memory store ──────────────────────────────────────────────────────────

/// In-process store. New rows get `max(id) + 1`, or 1 for an empty table.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    document: ReportDocument,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing document. The document is validated first.
    pub fn with_document(document: ReportDocument) -> Result<Self, StoreError> {
        document.validate()?;
        Ok(Self { document })
    }
}

impl DocumentStore for MemoryStore {
    fn find_document(&self) -> Result<ReportDocument, StoreError> {
        Ok(self.document.clone())
    }

    fn replace_metadata(&mut self, update: MetadataUpdate) -> Result<(), StoreError> {
        apply_metadata(&mut self.document, update);
        Ok(())
    }

    fn append_row(&mut self, input: RowInput) -> Result<i64, StoreError> {
        input.validate()?;
        let id = max_id(&self.document) + 1;
        self.document.rows.push(LineItem::from_input(id, input));
        Ok(id)
    }

    fn update_row(&mut self, id: i64, input: RowInput) -> Result<bool, StoreError> {
        input.validate()?;
        Ok(apply_update(&mut self.document, id, input))
    }

    fn delete_row(&mut self, id: i64) -> Result<bool, StoreError> {
        Ok(apply_delete(&mut self.document, id))
    }

    fn merge_import(&mut self, incoming: ReportDocument) -> Result<(), StoreError> {
        incoming.validate()?;
        apply_import(&mut self.document, incoming);
        Ok(())
    }
}

// ─── JSON file store ──────────────────────────────────────────────────────────

/// On-disk layout of a [`JsonFileStore`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoreFile {
    document: ReportDocument,
    next_id: i64,
}

/// File-backed store.
///
/// Ids come from a persisted counter and are never handed out twice, even
/// after the row that held them is deleted. Every change is written to a
/// sibling temp file which then replaces the store file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    state: StoreFile,
}

impl JsonFileStore {
    /// Open the store at `path`, starting empty when the file does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let state = if path.exists() {
            let file = File::open(&path)?;
            let state: StoreFile = serde_json::from_reader(std::io::BufReader::new(file))?;
            state.document.validate()?;
            log::debug!(
                "Opened store {} ({} row(s), next id {})",
                path.display(),
                state.document.rows.len(),
                state.next_id
            );
            state
        } else {
            log::debug!("Store {} does not exist yet; starting empty", path.display());
            StoreFile {
                document: ReportDocument::default(),
                next_id: 1,
            }
        };
        Ok(Self { path, state })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(format!(".tmp-{}", std::process::id()));
        self.path.with_file_name(name)
    }

    fn save(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let temp_path = self.temp_path();
        let written = (|| -> Result<(), StoreError> {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &self.state)?;
            writer.flush()?;
            Ok(())
        })();
        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }

    /// Keep the counter ahead of every id in the table.
    fn bump_next_id(&mut self) {
        let floor = max_id(&self.state.document) + 1;
        if self.state.next_id < floor {
            self.state.next_id = floor;
        }
    }
}

impl DocumentStore for JsonFileStore {
    fn find_document(&self) -> Result<ReportDocument, StoreError> {
        Ok(self.state.document.clone())
    }

    fn replace_metadata(&mut self, update: MetadataUpdate) -> Result<(), StoreError> {
        apply_metadata(&mut self.state.document, update);
        self.save()
    }

    fn append_row(&mut self, input: RowInput) -> Result<i64, StoreError> {
        input.validate()?;
        self.bump_next_id();
        let id = self.state.next_id;
        self.state.document.rows.push(LineItem::from_input(id, input));
        self.state.next_id += 1;
        self.save()?;
        Ok(id)
    }

    fn update_row(&mut self, id: i64, input: RowInput) -> Result<bool, StoreError> {
        input.validate()?;
        let updated = apply_update(&mut self.state.document, id, input);
        if updated {
            self.save()?;
        }
        Ok(updated)
    }

    fn delete_row(&mut self, id: i64) -> Result<bool, StoreError> {
        let removed = apply_delete(&mut self.state.document, id);
        if removed {
            self.save()?;
        }
        Ok(removed)
    }

    fn merge_import(&mut self, incoming: ReportDocument) -> Result<(), StoreError> {
        incoming.validate()?;
        apply_import(&mut self.state.document, incoming);
        self.bump_next_id();
        self.save()
    }
}
