pub mod resolver;
pub mod rules;

pub use resolver::{Allotment, HandicapResolver};
pub use rules::{HandicapRule, Rating, RuleStore};
