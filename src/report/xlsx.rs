use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook};

use super::{ReportTable, Renderer};

const SHEET_NAME: &str = "Handicap";

pub struct XlsxRenderer;

impl Renderer for XlsxRenderer {
    fn render(&self, table: &ReportTable, path: &Path) -> Result<()> {
        let mut workbook = Workbook::new();
        let bold = Format::new().set_bold();

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;

        worksheet.write_string_with_format(0, 0, &table.title, &bold)?;

        for (col, title) in table.header.iter().enumerate() {
            worksheet.write_string_with_format(2, col as u16, title, &bold)?;
        }

        for (idx, row) in table.rows.iter().enumerate() {
            let excel_row = (idx + 3) as u32;
            for (col, cell) in row.iter().enumerate() {
                worksheet.write_string(excel_row, col as u16, cell)?;
            }
        }

        workbook
            .save(path)
            .with_context(|| format!("Failed to save workbook {}", path.display()))?;
        Ok(())
    }
}
