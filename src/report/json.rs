use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::{ReportTable, Renderer};

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, table: &ReportTable, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(table).context("Failed to serialize report")?;
        fs::write(path, json).context("Failed to write report file")?;
        Ok(())
    }
}
