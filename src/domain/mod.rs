pub mod classifier;
pub mod models;
pub mod parser;

pub use classifier::{ExportKind, classify};
pub use models::{IndividualEntry, PairingEntry, PlayerSide, Side, StandingEntry};
pub use parser::{Row, read_rows};
