use std::path::Path;

use log::{info, warn};
use rusqlite::Connection;

use crate::database::connection::DbConn;
use crate::database::schema::EntityKind;
use crate::database::snapshot;
use crate::domain::classifier::ensure_uniform;
use crate::domain::parser::{self, Row};
use crate::errors::{HandicapError, HandicapResult};

pub type Rating = i64;

/// One bucket of the handicap table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandicapRule {
    pub worst_player_time: String,
    pub better_player_time: String,
    pub diff_rating_from: Rating,
    pub diff_rating_to: Rating,
    pub better_rating_from: Rating,
    pub better_rating_to: Rating,
}

impl HandicapRule {
    pub fn matches(&self, diff: Rating, better: Rating) -> bool {
        (self.diff_rating_from..=self.diff_rating_to).contains(&diff)
            && (self.better_rating_from..=self.better_rating_to).contains(&better)
    }

    pub fn overlaps(&self, other: &HandicapRule) -> bool {
        ranges_intersect(
            (self.diff_rating_from, self.diff_rating_to),
            (other.diff_rating_from, other.diff_rating_to),
        ) && ranges_intersect(
            (self.better_rating_from, self.better_rating_to),
            (other.better_rating_from, other.better_rating_to),
        )
    }
}

fn ranges_intersect(a: (Rating, Rating), b: (Rating, Rating)) -> bool {
    a.0 <= b.1 && b.0 <= a.1
}

/// The handicap table, kept in deterministic selection order:
/// smallest `diff_rating_from` first, then smallest `better_rating_from`,
/// then file order.
#[derive(Debug, Clone, Default)]
pub struct RuleStore {
    rules: Vec<HandicapRule>,
}

impl RuleStore {
    pub fn new(mut rules: Vec<HandicapRule>) -> Self {
        rules.sort_by_key(|r| (r.diff_rating_from, r.better_rating_from));
        Self { rules }
    }

    /// Re-reads the rule file, replaces the `handicap_rules` table with it and
    /// loads the stored rules back.
    pub fn reload(conn: &mut DbConn, path: &Path, delimiter: u8) -> HandicapResult<Self> {
        let rows = parser::read_rows(path, delimiter)?;
        validate_rows(&rows)?;

        snapshot::replace(conn, EntityKind::HandicapRules, &rows)?;
        let store = Self::load(conn)?;

        if store.is_empty() {
            warn!("Handicap rule file {} holds no rules; all times will be blank", path.display());
        }
        store.warn_on_overlaps();
        info!("  → Loaded {} handicap rules", store.len());
        Ok(store)
    }

    pub fn load(conn: &Connection) -> HandicapResult<Self> {
        let sql = "SELECT worst_player_time, better_player_time, diff_rating_from, diff_rating_to, better_rating_from, better_rating_to FROM handicap_rules ORDER BY diff_rating_from, better_rating_from, rowid";

        let mut stmt = conn.prepare(sql)?;
        let rules = stmt
            .query_map([], parse_rule_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Self { rules })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn find(&self, diff: Rating, better: Rating) -> Option<&HandicapRule> {
        self.rules.iter().find(|rule| rule.matches(diff, better))
    }

    pub fn overlapping_pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for (i, a) in self.rules.iter().enumerate() {
            for (j, b) in self.rules.iter().enumerate().skip(i + 1) {
                if a.overlaps(b) {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }

    fn warn_on_overlaps(&self) {
        for (i, j) in self.overlapping_pairs() {
            let (a, b) = (&self.rules[i], &self.rules[j]);
            warn!(
                "Handicap rules overlap: diff {}-{} / better {}-{} and diff {}-{} / better {}-{}; the first one wins",
                a.diff_rating_from,
                a.diff_rating_to,
                a.better_rating_from,
                a.better_rating_to,
                b.diff_rating_from,
                b.diff_rating_to,
                b.better_rating_from,
                b.better_rating_to
            );
        }
    }
}

fn parse_rule_row(row: &rusqlite::Row) -> rusqlite::Result<HandicapRule> {
    Ok(HandicapRule {
        worst_player_time: row.get(0)?,
        better_player_time: row.get(1)?,
        diff_rating_from: row.get(2)?,
        diff_rating_to: row.get(3)?,
        better_rating_from: row.get(4)?,
        better_rating_to: row.get(5)?,
    })
}

/// Rejects rule rows the resolver could not use, naming the file line.
fn validate_rows(rows: &[Row]) -> HandicapResult<()> {
    let width = EntityKind::HandicapRules.width();
    ensure_uniform(rows, width).map_err(|e| HandicapError::InvalidRules(e.to_string()))?;

    for (idx, row) in rows.iter().enumerate().skip(1) {
        validate_row(row).map_err(|reason| {
            HandicapError::InvalidRules(format!("row {}: {}", idx + 1, reason))
        })?;
    }

    Ok(())
}

fn validate_row(row: &Row) -> Result<(), String> {
    let bound = |idx: usize, name: &str| {
        parser::parse_integer(&row[idx]).ok_or_else(|| format!("{} '{}' is not a number", name, row[idx]))
    };

    let diff_from = bound(2, "diffRatingFrom")?;
    let diff_to = bound(3, "diffRatingTo")?;
    let better_from = bound(4, "betterRatingFrom")?;
    let better_to = bound(5, "betterRatingTo")?;

    if diff_from > diff_to {
        return Err(format!("rating difference range {}-{} is inverted", diff_from, diff_to));
    }
    if better_from > better_to {
        return Err(format!("better rating range {}-{} is inverted", better_from, better_to));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::connection::{create_pool, get_connection};
    use std::fs;

    fn rule(diff: (Rating, Rating), better: (Rating, Rating), worst: &str, best: &str) -> HandicapRule {
        HandicapRule {
            worst_player_time: worst.to_string(),
            better_player_time: best.to_string(),
            diff_rating_from: diff.0,
            diff_rating_to: diff.1,
            better_rating_from: better.0,
            better_rating_to: better.1,
        }
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let r = rule((100, 300), (1900, 2100), "45", "30");
        assert!(r.matches(100, 1900));
        assert!(r.matches(300, 2100));
        assert!(!r.matches(99, 2000));
        assert!(!r.matches(200, 2101));
    }

    #[test]
    fn test_selection_order_is_deterministic() {
        let store = RuleStore::new(vec![
            rule((100, 400), (1800, 2200), "40", "35"),
            rule((50, 300), (1900, 2100), "45", "30"),
            rule((50, 300), (1500, 2100), "50", "25"),
        ]);

        let chosen = store.find(200, 2000).unwrap();
        assert_eq!(chosen.worst_player_time, "50");
        assert_eq!(store.overlapping_pairs().len(), 3);
    }

    #[test]
    fn test_disjoint_rules_do_not_overlap() {
        let store = RuleStore::new(vec![
            rule((0, 99), (0, 3000), "60", "60"),
            rule((100, 199), (0, 3000), "55", "50"),
        ]);
        assert!(store.overlapping_pairs().is_empty());
        assert!(store.find(5000, 2000).is_none());
    }

    #[test]
    fn test_reload_persists_and_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let rules_path = dir.path().join("rules.csv");
        fs::write(
            &rules_path,
            "worst;better;diffFrom;diffTo;betterFrom;betterTo\n45;30;100;300;1900;2100\n50;25;0;99;0;3000\n",
        )
        .unwrap();

        let pool = create_pool(&dir.path().join("test.db")).unwrap();
        let mut conn = get_connection(&pool).unwrap();
        let store = RuleStore::reload(&mut conn, &rules_path, b';').unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.rules[0].diff_rating_from, 0);
        assert_eq!(store.find(200, 2000).unwrap().better_player_time, "30");
    }

    #[test]
    fn test_reload_rejects_inverted_range() {
        let dir = tempfile::tempdir().unwrap();
        let rules_path = dir.path().join("rules.csv");
        fs::write(&rules_path, "h1;h2;h3;h4;h5;h6\n45;30;300;100;1900;2100\n").unwrap();

        let pool = create_pool(&dir.path().join("test.db")).unwrap();
        let mut conn = get_connection(&pool).unwrap();
        let err = RuleStore::reload(&mut conn, &rules_path, b';').unwrap_err();

        assert!(matches!(err, HandicapError::InvalidRules(ref msg) if msg.starts_with("row 2")));
    }

    #[test]
    fn test_reload_rejects_wrong_width() {
        let dir = tempfile::tempdir().unwrap();
        let rules_path = dir.path().join("rules.csv");
        fs::write(&rules_path, "h1;h2;h3\n1;2;3\n").unwrap();

        let pool = create_pool(&dir.path().join("test.db")).unwrap();
        let mut conn = get_connection(&pool).unwrap();
        let err = RuleStore::reload(&mut conn, &rules_path, b';').unwrap_err();

        assert!(matches!(err, HandicapError::InvalidRules(_)));
    }
}
