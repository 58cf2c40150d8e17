use crate::database::schema::EntityKind;
use crate::errors::ClassificationError;

use super::parser::Row;

/// The entities an export file can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Players,
    Games,
}

impl ExportKind {
    pub fn entity(&self) -> EntityKind {
        match self {
            ExportKind::Players => EntityKind::Players,
            ExportKind::Games => EntityKind::Games,
        }
    }
}

/// Names the entity an export row set holds, judged by its field count.
///
/// The header row counts towards the shape. Only players and games come
/// through the export file; handicap rules are loaded from their own file.
pub fn classify(rows: &[Row]) -> Result<ExportKind, ClassificationError> {
    let width = header_width(rows)?;
    let kind = kind_for_width(width)?;
    ensure_uniform(rows, width)?;
    Ok(kind)
}

fn header_width(rows: &[Row]) -> Result<usize, ClassificationError> {
    match rows.first() {
        Some(header) if !header.is_empty() => Ok(header.len()),
        _ => Err(ClassificationError::Empty),
    }
}

fn kind_for_width(width: usize) -> Result<ExportKind, ClassificationError> {
    [ExportKind::Players, ExportKind::Games]
        .into_iter()
        .find(|kind| kind.entity().width() == width)
        .ok_or(ClassificationError::UnknownWidth(width))
}

pub fn ensure_uniform(rows: &[Row], expected: usize) -> Result<(), ClassificationError> {
    match rows.iter().position(|row| row.len() != expected) {
        Some(idx) => Err(ClassificationError::RaggedRow {
            row: idx + 1,
            expected,
            found: rows[idx].len(),
        }),
        None => Ok(()),
    }
}
