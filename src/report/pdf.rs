use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use log::warn;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};

use super::{ReportTable, Renderer};

const LAYER: &str = "Layer 1";
const REGULAR_FONT: &str = "DejaVuSerif.ttf";
const BOLD_FONT: &str = "DejaVuSerif-Bold.ttf";

/// Landscape A4 with a fixed-width grid; long tables continue on new pages.
///
/// Text is set in the DejaVu faces from `fonts_dir` so that Czech and Slovak
/// letters survive. Without them the built-in Helvetica is used, which only
/// covers Windows-1252.
pub struct PdfRenderer {
    fonts_dir: PathBuf,
    page_width: f32,
    page_height: f32,
    margin: f32,
    font_size: f32,
    line_height: f32,
}

impl PdfRenderer {
    pub fn new(fonts_dir: &Path) -> Self {
        Self {
            fonts_dir: fonts_dir.to_path_buf(),
            page_width: 297.0,
            page_height: 210.0,
            margin: 18.0,
            font_size: 11.0,
            line_height: 7.0,
        }
    }
}

impl PdfRenderer {
    fn load_fonts(&self, doc: &PdfDocumentReference) -> Result<(IndirectFontRef, IndirectFontRef)> {
        let regular = self.fonts_dir.join(REGULAR_FONT);
        let bold = self.fonts_dir.join(BOLD_FONT);

        if !regular.is_file() || !bold.is_file() {
            warn!(
                "Fonts {} and {} not found in {}; accented letters outside Latin-1 will be lost",
                REGULAR_FONT,
                BOLD_FONT,
                self.fonts_dir.display()
            );
            return Ok((
                add_builtin(doc, BuiltinFont::Helvetica)?,
                add_builtin(doc, BuiltinFont::HelveticaBold)?,
            ));
        }

        Ok((add_external(doc, &regular)?, add_external(doc, &bold)?))
    }

    fn rows_per_page(&self) -> usize {
        let usable = self.page_height - 2.0 * self.margin - 3.0 * self.line_height;
        (usable / self.line_height).max(1.0) as usize
    }

    fn column_width(&self, columns: usize) -> f32 {
        (self.page_width - 2.0 * self.margin) / columns.max(1) as f32
    }

    fn write_line(&self, layer: &PdfLayerReference, cells: &[String], y: f32, font: &IndirectFontRef) {
        let width = self.column_width(cells.len());
        for (col, cell) in cells.iter().enumerate() {
            let x = self.margin + col as f32 * width;
            layer.use_text(cell.as_str(), self.font_size, Mm(x), Mm(y), font);
        }
    }

    fn write_page(
        &self,
        layer: &PdfLayerReference,
        table: &ReportTable,
        rows: &[Vec<String>],
        fonts: (&IndirectFontRef, &IndirectFontRef),
    ) {
        let (regular, bold) = fonts;
        let mut y = self.page_height - self.margin;

        layer.use_text(table.title.as_str(), self.font_size + 3.0, Mm(self.margin), Mm(y), bold);
        y -= 2.0 * self.line_height;

        self.write_line(layer, &table.header, y, bold);
        y -= self.line_height;

        for row in rows {
            self.write_line(layer, row, y, regular);
            y -= self.line_height;
        }
    }
}

impl Renderer for PdfRenderer {
    fn render(&self, table: &ReportTable, path: &Path) -> Result<()> {
        let (doc, first_page, first_layer) = PdfDocument::new(
            table.title.as_str(),
            Mm(self.page_width),
            Mm(self.page_height),
            LAYER,
        );

        let (regular, bold) = self.load_fonts(&doc)?;

        let chunks: Vec<&[Vec<String>]> = if table.rows.is_empty() {
            vec![table.rows.as_slice()]
        } else {
            table.rows.chunks(self.rows_per_page()).collect()
        };

        for (idx, chunk) in chunks.iter().enumerate() {
            let layer = if idx == 0 {
                doc.get_page(first_page).get_layer(first_layer)
            } else {
                let (page, layer) = doc.add_page(Mm(self.page_width), Mm(self.page_height), LAYER);
                doc.get_page(page).get_layer(layer)
            };
            self.write_page(&layer, table, chunk, (&regular, &bold));
        }

        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        doc.save(&mut BufWriter::new(file))
            .map_err(|e| anyhow!("Failed to write PDF {}: {}", path.display(), e))?;
        Ok(())
    }
}

fn add_external(doc: &PdfDocumentReference, path: &Path) -> Result<IndirectFontRef> {
    let file = File::open(path).with_context(|| format!("Failed to open font {}", path.display()))?;
    doc.add_external_font(BufReader::new(file))
        .map_err(|e| anyhow!("Failed to load font {}: {}", path.display(), e))
}

fn add_builtin(doc: &PdfDocumentReference, font: BuiltinFont) -> Result<IndirectFontRef> {
    doc.add_builtin_font(font)
        .map_err(|e| anyhow!("Failed to load PDF font: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use printpdf::lopdf::{self, content::Content};

    fn fonts_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("fonts")
    }

    fn single_cell(name: &str) -> ReportTable {
        ReportTable {
            title: "Pairings - round 1".to_string(),
            header: vec!["White".to_string()],
            rows: vec![vec![name.to_string()]],
        }
    }

    /// Byte strings passed to `Tj` on every page of the written file.
    fn shown_text(path: &Path) -> Vec<Vec<u8>> {
        let doc = lopdf::Document::load(path).unwrap();
        doc.get_pages()
            .values()
            .flat_map(|&page| Content::decode(&doc.get_page_content(page).unwrap()).unwrap().operations)
            .filter(|op| op.operator == "Tj")
            .filter_map(|op| op.operands.first().and_then(|o| o.as_str().ok()).map(|b| b.to_vec()))
            .collect()
    }

    #[test]
    fn test_czech_letters_keep_their_glyphs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pairing.pdf");
        let name = "Novák Čťžš Dvořák";

        PdfRenderer::new(&fonts_dir()).render(&single_cell(name), &path).unwrap();

        // two-byte glyph ids, one per character
        let glyphs = 2 * name.chars().count();
        assert!(shown_text(&path).iter().any(|s| s.len() == glyphs));
    }

    #[test]
    fn test_missing_fonts_fall_back_to_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pairing.pdf");

        PdfRenderer::new(&dir.path().join("no-fonts"))
            .render(&single_cell("Novak Jan"), &path)
            .unwrap();

        assert!(shown_text(&path).iter().any(|s| s.as_slice() == b"Novak Jan"));
    }

    #[test]
    fn test_long_tables_paginate() {
        let renderer = PdfRenderer::new(&fonts_dir());
        assert!(renderer.rows_per_page() > 10);
        assert!(renderer.rows_per_page() < 40);
    }

    #[test]
    fn test_writes_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pairing.pdf");
        let rows = (1..=60)
            .map(|board| vec![board.to_string(), "Novak Jan".to_string()])
            .collect();
        let table = ReportTable {
            title: "Pairings - round 2".to_string(),
            header: vec!["Board".to_string(), "White".to_string()],
            rows,
        };

        PdfRenderer::new(&fonts_dir()).render(&table, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
