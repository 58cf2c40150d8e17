use rusqlite::{Connection, params};

use crate::config::RatingBasis;
use crate::errors::HandicapResult;

use super::models::{BoardRow, BoardSide};
use super::schema::EntityKind;
use super::snapshot::table_exists;

/// The highest round present in the games table, if any games were imported.
pub fn current_round(conn: &Connection) -> HandicapResult<Option<i64>> {
    if !table_exists(conn, EntityKind::Games)? {
        return Ok(None);
    }

    let round: Option<i64> = conn.query_row("SELECT MAX(round) FROM games", [], |row| row.get(0))?;
    Ok(round)
}

/// Boards of `round` ordered by board number, each side joined with its player.
pub fn list_boards(conn: &Connection, round: i64, basis: RatingBasis) -> HandicapResult<Vec<BoardRow>> {
    let rating = basis.column();
    let sql = format!(
        "SELECT g.board, g.white_id, w.name, w.{rating}, g.black_id, b.name, b.{rating}, g.result
         FROM games g
         LEFT JOIN players w ON w.id = g.white_id
         LEFT JOIN players b ON b.id = g.black_id
         WHERE g.round = ?1
         ORDER BY g.board, g.rowid"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![round], parse_board_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

fn parse_board_row(row: &rusqlite::Row) -> rusqlite::Result<BoardRow> {
    Ok(BoardRow {
        board: row.get(0)?,
        white: BoardSide {
            player_id: row.get(1)?,
            name: row.get(2)?,
            rating: row.get(3)?,
        },
        black: BoardSide {
            player_id: row.get(4)?,
            name: row.get(5)?,
            rating: row.get(6)?,
        },
        result: row.get(7)?,
    })
}
