use std::path::PathBuf;

use chrono::Local;
use log::{info, warn};
use rusqlite::Connection;

use crate::config::{AppConfig, PairingLayout};
use crate::database::{self, snapshot};
use crate::domain::{self, ExportKind};
use crate::errors::{HandicapError, HandicapResult};
use crate::handicap::RuleStore;
use crate::report::{self, Renderer, ReportTable};

use super::views::ViewBuilder;

/// What one processing cycle did.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub kind: ExportKind,
    pub imported: usize,
    pub output: Option<PathBuf>,
}

/// Rule reload, import, classification, snapshot replace and rendering for one cycle.
pub struct Pipeline<'a> {
    config: &'a AppConfig,
    renderer: Box<dyn Renderer>,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a AppConfig) -> Self {
        Self {
            config,
            renderer: report::renderer_for(config.report.format, &config.paths.fonts_dir),
        }
    }

    pub fn run_cycle(&self) -> HandicapResult<CycleReport> {
        let paths = &self.config.paths;
        let delimiter = self.config.delimiter();
        info!("=== Processing {} ===", paths.export_file.display());

        let pool = database::create_pool(&paths.database_file)?;
        let mut conn = database::get_connection(&pool)?;

        // Step 1: Refresh handicap rules
        let rules = RuleStore::reload(&mut conn, &paths.rules_file, delimiter)?;

        // Step 2: Read and classify the export
        let rows = domain::read_rows(&paths.export_file, delimiter)?;
        let kind = domain::classify(&rows)?;
        info!("  → Export holds {:?} ({} lines)", kind, rows.len());

        // Step 3: Replace the snapshot
        let imported = snapshot::replace(&mut conn, kind.entity(), &rows)?;
        info!("  → Stored {} rows in {}", imported, kind.entity().table_name());

        if imported == 0 {
            warn!("No data to show; skipping report");
            return Ok(CycleReport {
                kind,
                imported,
                output: None,
            });
        }

        // Step 4: Build the view and hand it to the renderer
        let table = self.build_table(&conn, &rules, kind)?;
        let output = self.render(&table)?;

        info!("=== Cycle Complete ===");
        Ok(CycleReport {
            kind,
            imported,
            output: Some(output),
        })
    }

    fn build_table(&self, conn: &Connection, rules: &RuleStore, kind: ExportKind) -> HandicapResult<ReportTable> {
        let basis = self.config.report.rating_basis;
        let views = ViewBuilder::new(conn, rules, basis);

        let table = match (kind, self.config.report.layout) {
            (ExportKind::Players, _) => ReportTable::standings(&views.standings()?, basis),
            (ExportKind::Games, PairingLayout::Classic) => {
                let view = views.classic()?;
                ReportTable::pairings(view.round, &view.entries, basis)
            }
            (ExportKind::Games, PairingLayout::Individual) => {
                let view = views.individual()?;
                ReportTable::individual(view.round, &view.entries, basis)
            }
        };

        info!("  → Built '{}' with {} rows", table.title, table.rows.len());
        Ok(table)
    }

    fn render(&self, table: &ReportTable) -> HandicapResult<PathBuf> {
        let output = self.config.output_path_at(Local::now());

        report::ensure_output_dir(&output)
            .and_then(|_| self.renderer.render(table, &output))
            .map_err(|e| HandicapError::render(&output, e))?;

        info!("  → Rendered {}", output.display());
        Ok(output)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::RatingBasis;
    use crate::config::settings::{DEF_FONTS_DIR, ImportSettings, PathSettings};
    use std::fs;
    use std::path::Path;

    pub(crate) const RULES: &str = "worst;better;diffFrom;diffTo;betterFrom;betterTo\n45;30;100;300;1900;2100\n";

    pub(crate) fn players_export() -> String {
        let header = (1..=24).map(|i| format!("col{}", i)).collect::<Vec<_>>().join(";");
        let novak = "1;1001;;Novak Jan;Novak;Jan;;;2000;1950;;CZE;M;;;;;0;0;0;0;0;0;1";
        let dvorak = "2;1002;;Dvorak Petr;Dvorak;Petr;Ing.;;1800;1750;;CZE;M;;;;;0;0;0;0;0;0;2";
        format!("{}\n{}\n{}\n", header, novak, dvorak)
    }

    pub(crate) fn games_export() -> String {
        let header = (1..=13).map(|i| format!("col{}", i)).collect::<Vec<_>>().join(";");
        format!("{}\n1;1;1001;1002;1;2;;;;;;;\n", header)
    }

    pub(crate) fn config_in(dir: &Path, output: &str, layout: PairingLayout) -> AppConfig {
        AppConfig::new(
            PathSettings {
                export_file: dir.join("export.txt"),
                rules_file: dir.join("rules.csv"),
                database_file: dir.join("db").join("handicap.db"),
                output_file: dir.join("output").join(output),
                fonts_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(DEF_FONTS_DIR),
            },
            ImportSettings::default(),
            RatingBasis::National,
            layout,
            false,
        )
        .unwrap()
    }

    fn read_json(path: &Path) -> serde_json::Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_players_then_games_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), "pairing.json", PairingLayout::Classic);
        fs::write(&config.paths.rules_file, RULES).unwrap();
        let pipeline = Pipeline::new(&config);

        fs::write(&config.paths.export_file, players_export()).unwrap();
        let players = pipeline.run_cycle().unwrap();
        assert_eq!(players.kind, ExportKind::Players);
        assert_eq!(players.imported, 2);

        fs::write(&config.paths.export_file, games_export()).unwrap();
        let games = pipeline.run_cycle().unwrap();
        assert_eq!(games.kind, ExportKind::Games);

        let report = read_json(games.output.as_deref().unwrap());
        assert_eq!(report["title"], "Pairings - round 1");
        let row = &report["rows"][0];
        assert_eq!(row[1], "Novak Jan");
        assert_eq!(row[2], "2000");
        assert_eq!(row[3], "30");
        assert_eq!(row[5], "Dvorak Petr");
        assert_eq!(row[6], "1800");
        assert_eq!(row[7], "45");
    }

    #[test]
    fn test_individual_layout() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), "pairing.json", PairingLayout::Individual);
        fs::write(&config.paths.rules_file, RULES).unwrap();
        let pipeline = Pipeline::new(&config);

        fs::write(&config.paths.export_file, players_export()).unwrap();
        pipeline.run_cycle().unwrap();
        fs::write(&config.paths.export_file, games_export()).unwrap();
        let games = pipeline.run_cycle().unwrap();

        let report = read_json(games.output.as_deref().unwrap());
        assert_eq!(report["rows"][0][0], "Dvorak Petr");
        assert_eq!(report["rows"][0][4], "45");
        assert_eq!(report["rows"][0][6], "Black");
        assert_eq!(report["rows"][1][4], "30");
    }

    #[test]
    fn test_games_before_players_renders_empty_view() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), "pairing.json", PairingLayout::Classic);
        fs::write(&config.paths.rules_file, RULES).unwrap();
        fs::write(&config.paths.export_file, games_export()).unwrap();

        let report = Pipeline::new(&config).run_cycle().unwrap();
        let json = read_json(report.output.as_deref().unwrap());
        assert_eq!(json["rows"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_header_only_export_skips_rendering() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), "pairing.json", PairingLayout::Classic);
        fs::write(&config.paths.rules_file, RULES).unwrap();
        let header_only = games_export().lines().next().unwrap().to_string();
        fs::write(&config.paths.export_file, header_only).unwrap();

        let report = Pipeline::new(&config).run_cycle().unwrap();
        assert_eq!(report.imported, 0);
        assert_eq!(report.output, None);
        assert!(!config.paths.output_file.exists());
    }

    #[test]
    fn test_unknown_shape_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), "pairing.json", PairingLayout::Classic);
        fs::write(&config.paths.rules_file, RULES).unwrap();
        fs::write(&config.paths.export_file, "a;b;c\n1;2;3\n").unwrap();

        let err = Pipeline::new(&config).run_cycle().unwrap_err();
        assert!(matches!(err, HandicapError::Classification(_)));
        assert!(!err.is_transient());
    }
}
