//! Serving side: turn a live decision request into a betting command.
//!
//! The policy reads the *average* strategy for the request's infoset and
//! plays its most likely action. Raise sizes are returned as a delta over
//! the current highest bet, in multiples of the minimum raise.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::action::{Action, NUM_ACTIONS};
use crate::cards::Card;
use crate::classify::{has_flush_draw, postflop_tier};
use crate::infoset::{InfosetKey, Street, Tier};
use crate::persistence;
use crate::table::NodeTable;

/// What the engine tells us at a decision point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DecisionRequest {
    /// Community cards dealt so far (0, 3, 4 or 5).
    pub board_len: usize,
    /// Chips in the pot.
    pub pot: u32,
    /// Amount the deciding player must add to call.
    pub to_call: u32,
    /// Minimum raise increment.
    pub min_raise: u32,
    /// Seat of the deciding player (taken modulo 2).
    pub position: u8,
    /// Opponent's action earlier on this street, when the engine tracks it.
    /// Seat 1 falls back to [`infer_opponent_action`] when this is `None`.
    pub last_opponent_action: Option<Action>,
}

/// Seat 1 always faces exactly one opponent action per street: a check when
/// nothing is owed, otherwise the raise whose size is closest to `to_call`
/// in min-raise units.
pub fn infer_opponent_action(to_call: u32, min_raise: u32) -> Action {
    if to_call == 0 {
        return Action::Call;
    }
    let unit = u64::from(min_raise.max(1));
    let mult = ((u64::from(to_call) + unit / 2) / unit).clamp(1, 3);
    match mult {
        1 => Action::RaiseMin,
        2 => Action::Raise2x,
        _ => Action::Raise3x,
    }
}

impl DecisionRequest {
    pub fn street(&self) -> Street {
        Street::from_board_len(self.board_len)
    }

    /// Street history as self-play keys it. Seat 0 acts first on every
    /// street and never has one.
    pub fn history(&self) -> Option<Action> {
        if self.position % 2 == 0 {
            return None;
        }
        Some(
            self.last_opponent_action
                .unwrap_or_else(|| infer_opponent_action(self.to_call, self.min_raise)),
        )
    }

    pub fn infoset_key(&self, tier: Tier, flush_draw: bool) -> InfosetKey {
        InfosetKey::new(
            self.street(),
            self.position,
            tier,
            flush_draw,
            self.to_call,
            self.pot,
            self.history(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Command {
    Fold,
    Call,
    Raise,
}

impl Command {
    pub fn as_str(self) -> &'static str {
        match self {
            Command::Fold => "FOLD",
            Command::Call => "CALL",
            Command::Raise => "RAISE",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub command: Command,
    /// Raise delta over the running max bet; 0 for fold and call.
    pub amount: u32,
}

impl Decision {
    pub fn fold() -> Self {
        Decision { command: Command::Fold, amount: 0 }
    }

    pub fn call() -> Self {
        Decision { command: Command::Call, amount: 0 }
    }

    pub fn raise(amount: u32) -> Self {
        Decision { command: Command::Raise, amount }
    }
}

/// Most likely action; the first one wins ties.
pub fn argmax(strategy: &[f64; NUM_ACTIONS]) -> Action {
    let mut best = 0;
    for i in 1..NUM_ACTIONS {
        if strategy[i] > strategy[best] {
            best = i;
        }
    }
    Action::from_index(best)
}

/// Map an abstract action onto the engine's command vocabulary.
///
/// Folding with nothing to call becomes a check, and raises are sized as
/// `mult * max(min_raise, 1)`.
pub fn translate(action: Action, to_call: u32, min_raise: u32) -> Decision {
    match action {
        Action::Fold if to_call == 0 => Decision::call(),
        Action::Fold => Decision::fold(),
        Action::Call => Decision::call(),
        Action::RaiseMin | Action::Raise2x | Action::Raise3x => {
            let mult = action.raise_multiplier().unwrap_or(1);
            Decision::raise(mult.saturating_mul(min_raise.max(1)))
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Policy {
    table: NodeTable,
}

impl Policy {
    pub fn new(table: NodeTable) -> Self {
        Policy { table }
    }

    /// Load a saved table. A missing or corrupt file yields an untrained
    /// (uniform) policy rather than an error.
    pub fn from_path(path: &Path) -> Self {
        Policy::new(persistence::load_or_empty(path))
    }

    pub fn table(&self) -> &NodeTable {
        &self.table
    }

    /// Average strategy for the request; uniform when the key was never
    /// visited in training.
    pub fn strategy(&self, request: &DecisionRequest, tier: Tier, flush_draw: bool) -> [f64; NUM_ACTIONS] {
        self.table.average_strategy(&request.infoset_key(tier, flush_draw))
    }

    pub fn decide(&self, request: &DecisionRequest, tier: Tier, flush_draw: bool) -> Decision {
        let key = request.infoset_key(tier, flush_draw);
        let strategy = self.table.average_strategy(&key);
        let action = argmax(&strategy);
        let decision = translate(action, request.to_call, request.min_raise);
        log::debug!("{} -> {} ({} {})", key, action, decision.command, decision.amount);
        decision
    }

    /// Classify `hole` + `board` and decide. The request's street comes from
    /// the board length.
    pub fn decide_cards(&self, request: &DecisionRequest, hole: &[Card], board: &[Card]) -> Decision {
        let request = DecisionRequest {
            board_len: board.len(),
            ..*request
        };
        let tier = postflop_tier(hole, board);
        let fd = has_flush_draw(hole, board);
        self.decide(&request, tier, fd)
    }
}
