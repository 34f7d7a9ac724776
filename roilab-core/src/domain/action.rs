//! Discrete per-index decisions emitted by the signal engine.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Action {
    Buy,
    Sell,
    #[default]
    Nothing,
}

impl Action {
    pub fn is_trade(self) -> bool {
        !matches!(self, Action::Nothing)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Buy => "Buy",
            Action::Sell => "Sell",
            Action::Nothing => "Nothing",
        };
        f.write_str(s)
    }
}

/// Actions aligned index-for-index with the price series they were computed from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActionSeries(Vec<Action>);

impl ActionSeries {
    pub fn new(actions: Vec<Action>) -> Self {
        Self(actions)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Action> {
        self.0.get(index).copied()
    }

    pub fn as_slice(&self) -> &[Action] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = Action> + '_ {
        self.0.iter().copied()
    }

    pub fn count(&self, action: Action) -> usize {
        self.0.iter().filter(|&&a| a == action).count()
    }

    pub fn last(&self) -> Option<Action> {
        self.0.last().copied()
    }
}

impl From<Vec<Action>> for ActionSeries {
    fn from(actions: Vec<Action>) -> Self {
        Self(actions)
    }
}
