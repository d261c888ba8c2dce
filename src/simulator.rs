//! Abstract heads-up hand used for self-play.
//!
//! Each street gives player 0 and then player 1 exactly one decision; the
//! action never re-opens. After both have acted the hand moves to the next
//! street (preflop → flop → turn → river → showdown), clearing the amount to
//! call and the street history and redrawing both players' tier and flush
//! draw. A fold ends the hand immediately.

use rand::Rng;

use crate::action::Action;
use crate::infoset::{InfosetKey, Street, Tier};

/// Probability of a flush draw on each postflop street, independent of tier.
pub const FLUSH_DRAW_PROB: f64 = 0.12;

/// Showdown utility is this multiple of the showdown-value difference.
pub const SHOWDOWN_SCALE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blinds {
    pub small: u32,
    pub big: u32,
}

impl Blinds {
    /// Small blind is half the big blind.
    pub fn from_big(big: u32) -> Self {
        Blinds { small: big / 2, big }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    Fold { folder: u8, street: Street },
    Showdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Betting(Street),
    Done(Terminal),
}

/// State of one simulated hand. Created per hand and dropped at the end.
#[derive(Debug, Clone)]
pub struct HandState {
    pub phase: Phase,
    /// Seat to act (0 acts first on every street).
    pub player: u8,
    pub tiers: [Tier; 2],
    pub flush_draws: [bool; 2],
    pub pot: u32,
    /// Amount the acting player owes.
    pub to_call: u32,
    pub min_raise: u32,
    pub max_bet: u32,
    /// Opponent's action earlier on this street, if any.
    pub history: Option<Action>,
}

impl HandState {
    /// Preflop with both blinds in the pot and player 0 to act. Preflop
    /// strength is not modelled: both players start as air without draws.
    pub fn new(blinds: Blinds) -> Self {
        HandState {
            phase: Phase::Betting(Street::Preflop),
            player: 0,
            tiers: [Tier::Air; 2],
            flush_draws: [false; 2],
            pot: blinds.small + blinds.big,
            to_call: 0,
            min_raise: blinds.big,
            max_bet: blinds.big,
            history: None,
        }
    }

    pub fn street(&self) -> Option<Street> {
        match self.phase {
            Phase::Betting(s) => Some(s),
            Phase::Done(_) => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, Phase::Done(_))
    }

    /// Infoset of the acting player; `None` once the hand is over.
    pub fn infoset_key(&self) -> Option<InfosetKey> {
        let street = self.street()?;
        let p = self.player as usize;
        Some(InfosetKey::new(
            street,
            self.player,
            self.tiers[p],
            self.flush_draws[p],
            self.to_call,
            self.pot,
            self.history,
        ))
    }

    /// Apply the acting player's action. When it closes the street, the
    /// next street's features are drawn from `rng`.
    pub fn apply<R: Rng + ?Sized>(&mut self, action: Action, rng: &mut R) {
        let street = match self.phase {
            Phase::Betting(s) => s,
            Phase::Done(_) => return,
        };

        match action {
            Action::Fold => {
                self.phase = Phase::Done(Terminal::Fold {
                    folder: self.player,
                    street,
                });
                return;
            }
            Action::Call => {
                self.pot += self.to_call;
                self.to_call = 0;
            }
            Action::RaiseMin | Action::Raise2x | Action::Raise3x => {
                let mult = action.raise_multiplier().unwrap_or(1);
                let delta = mult * self.min_raise;
                self.max_bet += delta;
                self.pot += delta;
                self.to_call = delta;
            }
        }
        self.history = Some(action);

        if self.player == 0 {
            self.player = 1;
            return;
        }

        match street.next() {
            Some(next) => self.start_street(next, rng),
            None => self.phase = Phase::Done(Terminal::Showdown),
        }
    }

    fn start_street<R: Rng + ?Sized>(&mut self, street: Street, rng: &mut R) {
        self.phase = Phase::Betting(street);
        self.player = 0;
        self.to_call = 0;
        self.history = None;
        for p in 0..2 {
            let (tier, fd) = sample_features(rng);
            self.tiers[p] = tier;
            self.flush_draws[p] = fd;
        }
    }

    /// Utility for player 0 at a terminal state.
    ///
    /// A fold pays the current pot to the other player; showdown pays
    /// `SHOWDOWN_SCALE` times the showdown-value difference.
    pub fn utility(&self) -> Option<f64> {
        match self.phase {
            Phase::Betting(_) => None,
            Phase::Done(Terminal::Fold { folder, .. }) => {
                let pot = f64::from(self.pot);
                Some(if folder == 1 { pot } else { -pot })
            }
            Phase::Done(Terminal::Showdown) => Some(
                SHOWDOWN_SCALE
                    * (self.tiers[0].showdown_value() - self.tiers[1].showdown_value()),
            ),
        }
    }
}

/// Draw a street tier and flush-draw flag for one player.
pub fn sample_features<R: Rng + ?Sized>(rng: &mut R) -> (Tier, bool) {
    let tier = Tier::from_unit(rng.gen::<f64>());
    let fd = rng.gen::<f64>() < FLUSH_DRAW_PROB;
    (tier, fd)
}
