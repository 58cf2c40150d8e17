use super::rules::{Rating, RuleStore};

/// Times granted to the two sides of one board; `None` when no rule applies.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Allotment {
    pub first: Option<String>,
    pub second: Option<String>,
}

impl Allotment {
    pub fn swapped(self) -> Self {
        Self {
            first: self.second,
            second: self.first,
        }
    }
}

pub struct HandicapResolver<'a> {
    rules: &'a RuleStore,
}

impl<'a> HandicapResolver<'a> {
    pub fn new(rules: &'a RuleStore) -> Self {
        Self { rules }
    }

    /// Side `first` receives the better player's time only when strictly
    /// higher rated; on equal ratings it takes the weaker player's time.
    /// A difference too large for a [`Rating`] matches no rule.
    pub fn resolve(&self, first: Rating, second: Rating) -> Allotment {
        let better = first.max(second);
        let Ok(diff) = Rating::try_from(first.abs_diff(second)) else {
            return Allotment::default();
        };

        let Some(rule) = self.rules.find(diff, better) else {
            return Allotment::default();
        };

        let weaker_first = Allotment {
            first: Some(rule.worst_player_time.clone()),
            second: Some(rule.better_player_time.clone()),
        };

        if first > second {
            weaker_first.swapped()
        } else {
            weaker_first
        }
    }

    /// Same as [`resolve`](Self::resolve) but tolerates unrated players.
    pub fn resolve_optional(&self, first: Option<Rating>, second: Option<Rating>) -> Allotment {
        match (first, second) {
            (Some(a), Some(b)) => self.resolve(a, b),
            _ => Allotment::default(),
        }
    }
}
