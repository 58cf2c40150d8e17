pub mod json;
pub mod pdf;
pub mod xlsx;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::{OutputFormat, RatingBasis};
use crate::domain::{IndividualEntry, PairingEntry, StandingEntry};

pub use json::JsonRenderer;
pub use pdf::PdfRenderer;
pub use xlsx::XlsxRenderer;

/// A header plus ordered rows, ready for any output format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportTable {
    pub title: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

pub trait Renderer {
    fn render(&self, table: &ReportTable, path: &Path) -> Result<()>;
}

pub fn renderer_for(format: OutputFormat, fonts_dir: &Path) -> Box<dyn Renderer> {
    match format {
        OutputFormat::Pdf => Box::new(PdfRenderer::new(fonts_dir)),
        OutputFormat::Xlsx => Box::new(XlsxRenderer),
        OutputFormat::Json => Box::new(JsonRenderer),
    }
}

pub fn ensure_output_dir(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    }
    Ok(())
}

impl ReportTable {
    pub fn pairings(round: Option<i64>, entries: &[PairingEntry], basis: RatingBasis) -> Self {
        let rating = basis.label();
        let header = [
            "Board", "White", rating, "Time", "Result", "Black", rating, "Time",
        ];
        let rows = entries
            .iter()
            .map(|e| {
                vec![
                    number(e.board),
                    e.white.name.clone(),
                    number(e.white.rating),
                    text(&e.white.time),
                    e.result.clone(),
                    e.black.name.clone(),
                    number(e.black.rating),
                    text(&e.black.time),
                ]
            })
            .collect();

        Self::new(round_title("Pairings", round), &header, rows)
    }

    pub fn individual(round: Option<i64>, entries: &[IndividualEntry], basis: RatingBasis) -> Self {
        let rating = basis.label();
        let header = ["Name", rating, "Opponent", rating, "Time", "Board", "Colour"];
        let rows = entries
            .iter()
            .map(|e| {
                vec![
                    e.name.clone(),
                    number(e.rating),
                    text(&e.opponent),
                    number(e.opponent_rating),
                    text(&e.time),
                    number(e.board),
                    e.side.as_str().to_string(),
                ]
            })
            .collect();

        Self::new(round_title("Pairings by name", round), &header, rows)
    }

    pub fn standings(entries: &[StandingEntry], basis: RatingBasis) -> Self {
        let header = ["Rank", "Title", "Name", basis.label(), "Fed", "Points"];
        let rows = entries
            .iter()
            .map(|e| {
                vec![
                    e.rank.to_string(),
                    e.title.clone(),
                    e.name.clone(),
                    number(e.rating),
                    e.federation.clone(),
                    e.points.map(format_points).unwrap_or_default(),
                ]
            })
            .collect();

        Self::new("Standings".to_string(), &header, rows)
    }

    fn new(title: String, header: &[&str], rows: Vec<Vec<String>>) -> Self {
        Self {
            title,
            header: header.iter().map(|h| h.to_string()).collect(),
            rows,
        }
    }
}

fn round_title(prefix: &str, round: Option<i64>) -> String {
    match round {
        Some(round) => format!("{} - round {}", prefix, round),
        None => prefix.to_string(),
    }
}

fn number(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/// Half points print as `3.5`, whole ones without decimals.
fn format_points(points: f64) -> String {
    if points.fract() == 0.0 {
        format!("{:.0}", points)
    } else {
        format!("{}", points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PlayerSide, Side};

    #[test]
    fn test_pairing_rows_leave_missing_times_blank() {
        let entry = PairingEntry {
            board: Some(3),
            white: PlayerSide {
                name: "Novak Jan".to_string(),
                rating: Some(2000),
                time: Some("30".to_string()),
            },
            black: PlayerSide {
                name: "Dvorak Petr".to_string(),
                rating: None,
                time: None,
            },
            result: String::new(),
        };

        let table = ReportTable::pairings(Some(4), &[entry], RatingBasis::National);
        assert_eq!(table.title, "Pairings - round 4");
        assert_eq!(table.header.len(), table.rows[0].len());
        assert_eq!(
            table.rows[0],
            vec!["3", "Novak Jan", "2000", "30", "", "Dvorak Petr", "", ""]
        );
    }

    #[test]
    fn test_individual_rows() {
        let entry = IndividualEntry {
            name: "Adamek Ivo".to_string(),
            rating: Some(1700),
            opponent: None,
            opponent_rating: None,
            time: None,
            board: Some(7),
            side: Side::White,
        };

        let table = ReportTable::individual(Some(1), &[entry], RatingBasis::Fide);
        assert_eq!(table.header[1], "FIDE");
        assert_eq!(table.rows[0], vec!["Adamek Ivo", "1700", "", "", "", "7", "White"]);
    }

    #[test]
    fn test_points_formatting() {
        assert_eq!(format_points(3.0), "3");
        assert_eq!(format_points(2.5), "2.5");
    }

    #[test]
    fn test_renderer_selection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.json");
        let table = ReportTable::standings(&[], RatingBasis::National);

        ensure_output_dir(&path).unwrap();
        renderer_for(OutputFormat::Json, dir.path()).render(&table, &path).unwrap();
        assert!(path.exists());
    }
}
