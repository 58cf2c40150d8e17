pub mod pipeline;
pub mod views;
pub mod watcher;

pub use pipeline::{CycleReport, Pipeline};
pub use views::{RoundView, ViewBuilder};
pub use watcher::{IngestionLoop, LoopState, Tick};
