use log::warn;
use rusqlite::Connection;

use crate::config::RatingBasis;
use crate::database::models::{BoardRow, BoardSide, StandingRow};
use crate::database::schema::EntityKind;
use crate::database::{games, players, snapshot};
use crate::domain::{IndividualEntry, PairingEntry, PlayerSide, Side, StandingEntry};
use crate::errors::HandicapResult;
use crate::handicap::{Allotment, HandicapResolver, RuleStore};

/// Entries of one projection over the current round.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundView<T> {
    pub round: Option<i64>,
    pub entries: Vec<T>,
}

impl<T> RoundView<T> {
    fn empty() -> Self {
        Self {
            round: None,
            entries: Vec::new(),
        }
    }
}

/// Builds handicap-annotated projections over the stored snapshot.
pub struct ViewBuilder<'a> {
    conn: &'a Connection,
    resolver: HandicapResolver<'a>,
    basis: RatingBasis,
}

impl<'a> ViewBuilder<'a> {
    pub fn new(conn: &'a Connection, rules: &'a RuleStore, basis: RatingBasis) -> Self {
        Self {
            conn,
            resolver: HandicapResolver::new(rules),
            basis,
        }
    }

    /// One entry per board of the current round, ordered by board.
    pub fn classic(&self) -> HandicapResult<RoundView<PairingEntry>> {
        let Some((round, boards)) = self.current_boards()? else {
            return Ok(RoundView::empty());
        };

        let entries = boards.iter().map(|b| self.pairing_entry(b)).collect();
        Ok(RoundView {
            round: Some(round),
            entries,
        })
    }

    /// One entry per player seated in the current round, ordered by name.
    pub fn individual(&self) -> HandicapResult<RoundView<IndividualEntry>> {
        let Some((round, boards)) = self.current_boards()? else {
            return Ok(RoundView::empty());
        };

        let mut entries: Vec<IndividualEntry> = boards
            .iter()
            .flat_map(|b| self.individual_entries(b))
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(RoundView {
            round: Some(round),
            entries,
        })
    }

    pub fn standings(&self) -> HandicapResult<Vec<StandingEntry>> {
        if !self.has_table(EntityKind::Players)? {
            return Ok(Vec::new());
        }

        let rows = players::list_standings(self.conn, self.basis)?;
        Ok(rows
            .into_iter()
            .enumerate()
            .map(|(idx, row)| standing_entry(idx + 1, row))
            .collect())
    }

    fn current_boards(&self) -> HandicapResult<Option<(i64, Vec<BoardRow>)>> {
        if !self.has_table(EntityKind::Players)? || !self.has_table(EntityKind::Games)? {
            return Ok(None);
        }

        let Some(round) = games::current_round(self.conn)? else {
            warn!("No rounds found in games; nothing to pair");
            return Ok(None);
        };

        let boards = games::list_boards(self.conn, round, self.basis)?;
        Ok(Some((round, boards)))
    }

    fn has_table(&self, kind: EntityKind) -> HandicapResult<bool> {
        let exists = snapshot::table_exists(self.conn, kind)?;
        if !exists {
            warn!(
                "Table {} has not been imported yet; producing an empty view",
                kind.table_name()
            );
        }
        Ok(exists)
    }

    fn allotment(&self, board: &BoardRow) -> Allotment {
        if !board.white.is_present() || !board.black.is_present() {
            return Allotment::default();
        }
        self.resolver
            .resolve_optional(board.white.rating, board.black.rating)
    }

    fn pairing_entry(&self, board: &BoardRow) -> PairingEntry {
        let times = self.allotment(board);
        PairingEntry {
            board: board.board,
            white: player_side(&board.white, times.first),
            black: player_side(&board.black, times.second),
            result: board.result.clone().unwrap_or_default(),
        }
    }

    fn individual_entries(&self, board: &BoardRow) -> Vec<IndividualEntry> {
        let times = self.allotment(board);
        let mut entries = Vec::with_capacity(2);

        if board.white.is_present() {
            let white = individual_entry(board, Side::White, &board.white, &board.black, times.first);
            entries.push(white);
        }
        if board.black.is_present() {
            let black = individual_entry(board, Side::Black, &board.black, &board.white, times.second);
            entries.push(black);
        }
        entries
    }
}

fn player_side(side: &BoardSide, time: Option<String>) -> PlayerSide {
    PlayerSide {
        name: side.display_name(),
        rating: side.rating,
        time,
    }
}

fn individual_entry(
    board: &BoardRow,
    side: Side,
    own: &BoardSide,
    other: &BoardSide,
    time: Option<String>,
) -> IndividualEntry {
    let opponent = other.is_present().then_some(other);
    IndividualEntry {
        name: own.display_name(),
        rating: own.rating,
        opponent: opponent.map(|o| o.display_name()),
        opponent_rating: opponent.and_then(|o| o.rating),
        time,
        board: board.board,
        side,
    }
}

fn standing_entry(rank: usize, row: StandingRow) -> StandingEntry {
    let title = [row.fide_title, row.academic_title]
        .into_iter()
        .flatten()
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    StandingEntry {
        rank,
        name: row.name,
        title,
        rating: row.rating,
        federation: row.federation.unwrap_or_default(),
        points: row.points,
    }
}
