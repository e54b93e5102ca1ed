//! Paginated PDF output for a rendered [`Snapshot`].
//!
//! The snapshot is laid out as one tall picture, 190 mm wide at a 10 mm left
//! margin on A4 portrait. Each page shows the same picture shifted up by
//! another 277 mm, so consecutive pages continue where the last one stopped.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use super::snapshot::Snapshot;
use super::write_file;
use crate::error::ExportError;

pub const PDF_FILE_NAME: &str = "task-manager.pdf";

const PAGE_WIDTH_MM: f64 = 210.0;
const PAGE_HEIGHT_MM: f64 = 297.0;
const IMAGE_X_MM: f64 = 10.0;
const IMAGE_WIDTH_MM: f64 = 190.0;
pub const PAGE_BUDGET_MM: f64 = 277.0;
/// Terminal cells are about twice as tall as they are wide.
const CELL_ASPECT: f64 = 2.0;
/// Advance width of a Courier glyph, in ems.
const COURIER_ADVANCE: f64 = 0.6;
const PT_PER_MM: f64 = 72.0 / 25.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    fn operands(self) -> String {
        format!(
            "{:.3} {:.3} {:.3}",
            self.0 as f64 / 255.0,
            self.1 as f64 / 255.0,
            self.2 as f64 / 255.0
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PdfStyle {
    pub background: Rgb,
    pub foreground: Rgb,
}

/// Vertical offset of the picture on each page, in mm. A page is added for
/// as long as the height left over after the previous pages is not negative.
pub fn page_offsets(image_height_mm: f64) -> Vec<f64> {
    let mut offsets = vec![0.0];
    let mut height_left = image_height_mm - PAGE_BUDGET_MM;
    while height_left >= 0.0 {
        offsets.push(height_left - image_height_mm);
        height_left -= PAGE_BUDGET_MM;
    }
    offsets
}

struct Geometry {
    cell_width_mm: f64,
    cell_height_mm: f64,
    font_size_pt: f64,
}

impl Geometry {
    fn for_width(columns: u16) -> Geometry {
        let cell_width_mm = IMAGE_WIDTH_MM / f64::from(columns.max(1));
        Geometry {
            cell_width_mm,
            cell_height_mm: cell_width_mm * CELL_ASPECT,
            font_size_pt: cell_width_mm * PT_PER_MM / COURIER_ADVANCE,
        }
    }

    fn image_height_mm(&self, rows: usize) -> f64 {
        rows as f64 * self.cell_height_mm
    }
}

/// Encodes a row for a PDF string literal in WinAnsi. Box-drawing glyphs
/// become ASCII; anything else outside the encoding becomes `?`.
fn pdf_text(row: &str) -> String {
    let mut out = String::with_capacity(row.len());
    for c in row.chars() {
        let c = match c {
            '─' | '━' | '═' => '-',
            '│' | '┃' | '║' => '|',
            '┌' | '┐' | '└' | '┘' | '├' | '┤' | '┬' | '┴' | '┼' | '╭' | '╮' | '╰' | '╯' => '+',
            other => other,
        };
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            '•' => out.push_str("\\225"),
            '\u{a0}'..='\u{ff}' => {
                let _ = write!(out, "\\{:03o}", c as u32);
            }
            _ => out.push('?'),
        }
    }
    out
}

fn page_content(snapshot: &Snapshot, geometry: &Geometry, offset_mm: f64, style: &PdfStyle) -> String {
    let page_width_pt = PAGE_WIDTH_MM * PT_PER_MM;
    let page_height_pt = PAGE_HEIGHT_MM * PT_PER_MM;
    let mut content = String::new();
    let _ = writeln!(content, "q {} rg 0 0 {page_width_pt:.2} {page_height_pt:.2} re f Q", style.background.operands());
    let _ = writeln!(content, "BT /F1 {:.2} Tf {} rg", geometry.font_size_pt, style.foreground.operands());

    let x_pt = IMAGE_X_MM * PT_PER_MM;
    for (index, row) in snapshot.rows().iter().enumerate() {
        let top_mm = offset_mm + index as f64 * geometry.cell_height_mm;
        if top_mm + geometry.cell_height_mm <= 0.0 || top_mm >= PAGE_HEIGHT_MM || row.is_empty() {
            continue;
        }
        let baseline_mm = top_mm + geometry.cell_height_mm * 0.75;
        let y_pt = page_height_pt - baseline_mm * PT_PER_MM;
        let _ = writeln!(content, "1 0 0 1 {x_pt:.2} {y_pt:.2} Tm ({}) Tj", pdf_text(row));
    }
    content.push_str("ET\n");
    content
}

#[derive(Default)]
struct PdfWriter {
    bytes: Vec<u8>,
    offsets: Vec<usize>,
}

impl PdfWriter {
    fn object(&mut self, body: &str) {
        self.offsets.push(self.bytes.len());
        let number = self.offsets.len();
        self.bytes
            .extend_from_slice(format!("{number} 0 obj\n{body}\nendobj\n").as_bytes());
    }

    fn stream(&mut self, content: &str) {
        self.object(&format!(
            "<< /Length {} >>\nstream\n{content}endstream",
            content.len()
        ));
    }

    fn finish(mut self) -> Vec<u8> {
        let xref = self.bytes.len();
        let mut tail = format!("xref\n0 {}\n0000000000 65535 f \n", self.offsets.len() + 1);
        for offset in &self.offsets {
            let _ = write!(tail, "{offset:010} 00000 n \n");
        }
        let _ = write!(
            tail,
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref}\n%%EOF\n",
            self.offsets.len() + 1
        );
        self.bytes.extend_from_slice(tail.as_bytes());
        self.bytes
    }
}

/// Builds the whole document in memory.
pub fn render_pdf(snapshot: &Snapshot, style: &PdfStyle) -> Vec<u8> {
    let geometry = Geometry::for_width(snapshot.width());
    let offsets = page_offsets(geometry.image_height_mm(snapshot.height()));

    // 1 catalog, 2 page tree, 3 font, then a page + content pair per page.
    let kids: Vec<String> = (0..offsets.len())
        .map(|i| format!("{} 0 R", 4 + 2 * i))
        .collect();

    let mut writer = PdfWriter::default();
    writer.bytes.extend_from_slice(b"%PDF-1.4\n");
    writer.object("<< /Type /Catalog /Pages 2 0 R >>");
    writer.object(&format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids.join(" "),
        offsets.len()
    ));
    writer.object("<< /Type /Font /Subtype /Type1 /BaseFont /Courier /Encoding /WinAnsiEncoding >>");

    for (i, offset) in offsets.iter().enumerate() {
        writer.object(&format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
            PAGE_WIDTH_MM * PT_PER_MM,
            PAGE_HEIGHT_MM * PT_PER_MM,
            5 + 2 * i
        ));
        writer.stream(&page_content(snapshot, &geometry, *offset, style));
    }
    writer.finish()
}

/// Writes `dir/task-manager.pdf`. An empty snapshot means there was nothing
/// on screen to capture.
pub fn write_pdf(dir: &Path, snapshot: &Snapshot, style: &PdfStyle) -> Result<PathBuf, ExportError> {
    if snapshot.is_empty() {
        return Err(ExportError::MissingRenderTarget);
    }
    let path = dir.join(PDF_FILE_NAME);
    let bytes = render_pdf(snapshot, style);
    write_file(&path, &bytes)?;
    log::info!("exported {} rows to {}", snapshot.height(), path.display());
    Ok(path)
}
