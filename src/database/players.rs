use rusqlite::Connection;

use crate::config::RatingBasis;
use crate::errors::HandicapResult;

use super::models::StandingRow;

/// Players by points, then tiebreaks one to five, ties kept in import order.
pub fn list_standings(conn: &Connection, basis: RatingBasis) -> HandicapResult<Vec<StandingRow>> {
    let rating = basis.column();
    let sql = format!(
        "SELECT name, academic_title, fide_title, {rating}, federation, points,
                tiebreak_1, tiebreak_2, tiebreak_3, tiebreak_4, tiebreak_5
         FROM players
         ORDER BY points DESC, tiebreak_1 DESC, tiebreak_2 DESC, tiebreak_3 DESC,
                  tiebreak_4 DESC, tiebreak_5 DESC, rowid"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_standing_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

fn parse_standing_row(row: &rusqlite::Row) -> rusqlite::Result<StandingRow> {
    Ok(StandingRow {
        name: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
        academic_title: row.get(1)?,
        fide_title: row.get(2)?,
        rating: row.get(3)?,
        federation: row.get(4)?,
        points: row.get(5)?,
        tiebreaks: [row.get(6)?, row.get(7)?, row.get(8)?, row.get(9)?, row.get(10)?],
    })
}
