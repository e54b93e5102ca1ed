mod csv;
mod pdf;
mod snapshot;

use std::fs;
use std::path::Path;

pub use self::csv::{to_csv, write_csv, CSV_FILE_NAME, CSV_HEADER};
pub use self::pdf::{page_offsets, render_pdf, write_pdf, PdfStyle, Rgb, PAGE_BUDGET_MM, PDF_FILE_NAME};
pub use self::snapshot::Snapshot;

use crate::error::ExportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Csv,
    Pdf,
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    fs::write(path, bytes).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })
}
