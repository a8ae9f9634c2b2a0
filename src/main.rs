//! laporan – command-line front end for the report store and renderer.
//!
//! Usage:
//!   laporan [--store laporan.json] <command>
//!
//! Every command works on the JSON store file; `render` writes the PDF next
//! to it unless `--output` is given.

use std::{fs, path::PathBuf, process};

use clap::{Parser, Subcommand};

use laporan::{
    report::{content_disposition, render_report_to, ReportConfig, DEFAULT_REPORT_NAME, PDF_CONTENT_TYPE},
    DocumentStore, Error, JsonFileStore, MetadataUpdate, ReportDocument, RowInput,
};

#[derive(Parser)]
#[command(name = "laporan", version)]
#[command(about = "Keep a cash report and render it to PDF")]
struct Cli {
    /// JSON file holding the report document
    #[arg(long, default_value = "laporan.json")]
    store: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the stored document as JSON
    Show,

    /// Replace title and remarks
    SetMeta {
        #[arg(long)]
        title: String,
        /// Remarks markup (<b>, <i>, <u>, <br>, <p>)
        #[arg(long, default_value = "")]
        remarks: String,
    },

    /// Append a table row and print its id
    AddRow {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "0")]
        contribution: f64,
        #[arg(long, default_value = "0")]
        cash: f64,
    },

    /// Replace the row with the given id
    UpdateRow {
        id: i64,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "0")]
        contribution: f64,
        #[arg(long, default_value = "0")]
        cash: f64,
    },

    /// Remove the row with the given id
    DeleteRow { id: i64 },

    /// Merge a document file: overwrite title/remarks, append its rows
    Import { file: PathBuf },

    /// Render the document to PDF
    Render {
        /// Output path (default: store path with .pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Renderer configuration as JSON; missing fields use defaults
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Render this document file instead of the store
        #[arg(short, long)]
        document: Option<PathBuf>,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = fallible_main(cli) {
        log::error!("{e}");
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn fallible_main(cli: Cli) -> Result<(), Error> {
    let mut store = JsonFileStore::open(&cli.store)?;

    match cli.command {
        Command::Show => {
            println!("{}", store.find_document()?.to_json());
        }
        Command::SetMeta { title, remarks } => {
            store.replace_metadata(MetadataUpdate { title, remarks })?;
        }
        Command::AddRow {
            name,
            contribution,
            cash,
        } => {
            let id = store.append_row(RowInput::new(name, contribution, cash))?;
            println!("{id}");
        }
        Command::UpdateRow {
            id,
            name,
            contribution,
            cash,
        } => {
            if !store.update_row(id, RowInput::new(name, contribution, cash))? {
                eprintln!("No row with id {id}; nothing changed");
            }
        }
        Command::DeleteRow { id } => {
            if !store.delete_row(id)? {
                eprintln!("No row with id {id}; nothing changed");
            }
        }
        Command::Import { file } => {
            let incoming = ReportDocument::from_json(&fs::read_to_string(&file)?)?;
            let count = incoming.rows.len();
            store.merge_import(incoming)?;
            eprintln!("Imported {count} row{} from '{}'", plural(count), file.display());
        }
        Command::Render {
            output,
            config,
            document,
        } => {
            let config = match config {
                Some(path) => ReportConfig::from_json(&fs::read_to_string(path)?)?,
                None => ReportConfig::default(),
            };
            let document = match document {
                Some(path) => {
                    let doc = ReportDocument::from_json(&fs::read_to_string(path)?)?;
                    doc.validate()?;
                    doc
                }
                None => store.find_document()?,
            };

            // Default output: same directory + same stem as the store, but with .pdf
            let output = output.unwrap_or_else(|| {
                let mut o = cli.store.clone();
                o.set_extension("pdf");
                o
            });
            if let Some(parent) = output.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }

            // Render into memory first so a failed render leaves no file behind.
            let mut bytes = Vec::new();
            let summary = render_report_to(&document, &config, &mut bytes)?;
            fs::write(&output, &bytes)?;

            let name = output
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or(DEFAULT_REPORT_NAME);
            eprintln!("Content-Type: {PDF_CONTENT_TYPE}");
            eprintln!("Content-Disposition: {}", content_disposition(name));
            eprintln!(
                "Wrote '{}' ({} bytes, {} page{})",
                output.display(),
                summary.bytes,
                summary.pages,
                plural(summary.pages)
            );
        }
    }
    Ok(())
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
