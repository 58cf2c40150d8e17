use std::collections::HashSet;

use anyhow::{Result, ensure};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    Integer,
    Real,
}

impl ColumnType {
    pub fn sql(&self) -> &'static str {
        match self {
            ColumnType::Text => "TEXT",
            ColumnType::Integer => "INTEGER",
            ColumnType::Real => "REAL",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnType,
}

const fn text(name: &'static str) -> Column {
    Column { name, kind: ColumnType::Text }
}

const fn integer(name: &'static str) -> Column {
    Column { name, kind: ColumnType::Integer }
}

const fn real(name: &'static str) -> Column {
    Column { name, kind: ColumnType::Real }
}

pub const PLAYER_COLUMNS: [Column; 24] = [
    integer("id"),
    text("national_id"),
    text("fide_id"),
    text("name"),
    text("last_name"),
    text("first_name"),
    text("academic_title"),
    text("fide_title"),
    integer("national_rating"),
    integer("fide_rating"),
    text("birthdate"),
    text("federation"),
    text("sex"),
    text("category"),
    text("club"),
    text("player_type"),
    text("player_group"),
    real("points"),
    real("tiebreak_1"),
    real("tiebreak_2"),
    real("tiebreak_3"),
    real("tiebreak_4"),
    real("tiebreak_5"),
    integer("starting_rank"),
];

pub const GAME_COLUMNS: [Column; 13] = [
    integer("round"),
    integer("board"),
    text("white_national_id"),
    text("black_national_id"),
    integer("white_id"),
    integer("black_id"),
    text("white_result"),
    text("black_result"),
    text("white_forfeit"),
    text("black_forfeit"),
    text("result"),
    text("stake"),
    text("amount"),
];

pub const RULE_COLUMNS: [Column; 6] = [
    text("worst_player_time"),
    text("better_player_time"),
    integer("diff_rating_from"),
    integer("diff_rating_to"),
    integer("better_rating_from"),
    integer("better_rating_to"),
];

/// Every relational table the snapshot store knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Players,
    Games,
    HandicapRules,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [
        EntityKind::Players,
        EntityKind::Games,
        EntityKind::HandicapRules,
    ];

    pub fn table_name(&self) -> &'static str {
        match self {
            EntityKind::Players => "players",
            EntityKind::Games => "games",
            EntityKind::HandicapRules => "handicap_rules",
        }
    }

    pub fn columns(&self) -> &'static [Column] {
        match self {
            EntityKind::Players => &PLAYER_COLUMNS,
            EntityKind::Games => &GAME_COLUMNS,
            EntityKind::HandicapRules => &RULE_COLUMNS,
        }
    }

    pub fn width(&self) -> usize {
        self.columns().len()
    }

    pub fn create_table_sql(&self) -> String {
        let columns = self
            .columns()
            .iter()
            .map(|c| format!("{} {}", c.name, c.kind.sql()))
            .collect::<Vec<_>>()
            .join(", ");
        format!("CREATE TABLE {} ({})", self.table_name(), columns)
    }

    pub fn insert_sql(&self) -> String {
        let placeholders = (1..=self.width())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");
        format!("INSERT INTO {} VALUES ({})", self.table_name(), placeholders)
    }
}

/// Checks the registry once at startup so later code can rely on it.
pub fn validate_registry() -> Result<()> {
    let mut widths = HashSet::new();

    for kind in EntityKind::ALL {
        let mut names = HashSet::new();
        for column in kind.columns() {
            ensure!(
                names.insert(column.name),
                "Duplicate column '{}' in table {}",
                column.name,
                kind.table_name()
            );
        }
        ensure!(
            widths.insert(kind.width()),
            "Table {} shares its width {} with another entity",
            kind.table_name(),
            kind.width()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_is_valid() {
        assert!(validate_registry().is_ok());
        assert_eq!(EntityKind::Players.width(), 24);
        assert_eq!(EntityKind::Games.width(), 13);
        assert_eq!(EntityKind::HandicapRules.width(), 6);
    }

    #[test]
    fn test_generated_sql() {
        let sql = EntityKind::HandicapRules.create_table_sql();
        assert!(sql.starts_with("CREATE TABLE handicap_rules (worst_player_time TEXT"));
        assert!(sql.ends_with("better_rating_to INTEGER)"));

        let insert = EntityKind::HandicapRules.insert_sql();
        assert_eq!(
            insert,
            "INSERT INTO handicap_rules VALUES (?1, ?2, ?3, ?4, ?5, ?6)"
        );
    }
}
