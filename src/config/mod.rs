pub mod settings;

pub use settings::{AppConfig, OutputFormat, PairingLayout, RatingBasis};
