/// One side of a board as stored, joined with the player's record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardSide {
    pub player_id: Option<i64>,
    pub name: Option<String>,
    pub rating: Option<i64>,
}

impl BoardSide {
    /// A bye or an empty seat carries no player id (SwissManager writes 0).
    pub fn is_present(&self) -> bool {
        self.player_id.is_some_and(|id| id > 0)
    }

    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoardRow {
    pub board: Option<i64>,
    pub white: BoardSide,
    pub black: BoardSide,
    pub result: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StandingRow {
    pub name: String,
    pub academic_title: Option<String>,
    pub fide_title: Option<String>,
    pub rating: Option<i64>,
    pub federation: Option<String>,
    pub points: Option<f64>,
    pub tiebreaks: [Option<f64>; 5],
}
