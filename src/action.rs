//! The abstract action space shared by the trainer and the policy.
//!
//! Five discrete actions: fold, call/check, and three raise sizes expressed
//! as multiples of the minimum raise unit.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of abstract actions at every decision point.
pub const NUM_ACTIONS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Fold = 0,
    Call = 1,
    RaiseMin = 2,
    Raise2x = 3,
    Raise3x = 4,
}

pub const ALL_ACTIONS: [Action; NUM_ACTIONS] = [
    Action::Fold,
    Action::Call,
    Action::RaiseMin,
    Action::Raise2x,
    Action::Raise3x,
];

impl Action {
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Action at a strategy-vector index. Out-of-range indices map to the
    /// last action, matching the sampler's rounding fallback.
    pub fn from_index(i: usize) -> Action {
        ALL_ACTIONS[i.min(NUM_ACTIONS - 1)]
    }

    /// Raise size in min-raise units, `None` for fold and call.
    pub fn raise_multiplier(self) -> Option<u32> {
        match self {
            Action::RaiseMin => Some(1),
            Action::Raise2x => Some(2),
            Action::Raise3x => Some(3),
            Action::Fold | Action::Call => None,
        }
    }

    pub fn is_raise(self) -> bool {
        self.raise_multiplier().is_some()
    }

    pub fn label(self) -> &'static str {
        match self {
            Action::Fold => "F",
            Action::Call => "C",
            Action::RaiseMin => "Rmin",
            Action::Raise2x => "R2x",
            Action::Raise3x => "R3x",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
