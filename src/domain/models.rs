use serde::Serialize;

use crate::handicap::Rating;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub fn as_str(&self) -> &str {
        match self {
            Side::White => "White",
            Side::Black => "Black",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSide {
    pub name: String,
    pub rating: Option<Rating>,
    pub time: Option<String>,
}

/// One board of the current round with both resolved handicaps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairingEntry {
    pub board: Option<i64>,
    pub white: PlayerSide,
    pub black: PlayerSide,
    pub result: String,
}

/// One player's own side of their current-round board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndividualEntry {
    pub name: String,
    pub rating: Option<Rating>,
    pub opponent: Option<String>,
    pub opponent_rating: Option<Rating>,
    pub time: Option<String>,
    pub board: Option<i64>,
    pub side: Side,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandingEntry {
    pub rank: usize,
    pub name: String,
    pub title: String,
    pub rating: Option<Rating>,
    pub federation: String,
    pub points: Option<f64>,
}
