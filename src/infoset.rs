//! Information-set abstraction.
//!
//! A decision point is reduced to street, seat, a coarse hand-strength tier,
//! a flush-draw flag, a bucketed to-call amount and the opponent's most
//! recent action on the current street. The same bucketing is used by the
//! self-play simulator and by the live policy, so both sides always agree
//! on the key for equivalent observations.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::action::Action;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
}

pub const STREET_ORDER: [Street; 4] = [Street::Preflop, Street::Flop, Street::Turn, Street::River];

impl Street {
    /// Street implied by the number of community cards. Anything other than
    /// 0, 3 or 4 cards is treated as the river.
    pub fn from_board_len(n: usize) -> Street {
        match n {
            0 => Street::Preflop,
            3 => Street::Flop,
            4 => Street::Turn,
            _ => Street::River,
        }
    }

    pub fn board_len(self) -> usize {
        match self {
            Street::Preflop => 0,
            Street::Flop => 3,
            Street::Turn => 4,
            Street::River => 5,
        }
    }

    /// Next street in the fixed order, `None` after the river.
    pub fn next(self) -> Option<Street> {
        match self {
            Street::Preflop => Some(Street::Flop),
            Street::Flop => Some(Street::Turn),
            Street::Turn => Some(Street::River),
            Street::River => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Street::Preflop => "preflop",
            Street::Flop => "flop",
            Street::Turn => "turn",
            Street::River => "river",
        }
    }
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discretised made-hand strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Air,
    Pair,
    TopPair,
    TwoPairPlus,
}

pub const ALL_TIERS: [Tier; 4] = [Tier::Air, Tier::Pair, Tier::TopPair, Tier::TwoPairPlus];

impl Tier {
    /// Heuristic showdown value used for counterfactual estimates and
    /// showdown utility.
    pub fn showdown_value(self) -> f64 {
        match self {
            Tier::Air => 0.0,
            Tier::Pair => 0.5,
            Tier::TopPair => 1.0,
            Tier::TwoPairPlus => 1.5,
        }
    }

    /// Map a uniform draw in `[0, 1)` onto the street-tier distribution:
    /// air 50%, pair 30%, top pair 15%, two pair or better 5%.
    pub fn from_unit(u: f64) -> Tier {
        if u < 0.50 {
            Tier::Air
        } else if u < 0.80 {
            Tier::Pair
        } else if u < 0.95 {
            Tier::TopPair
        } else {
            Tier::TwoPairPlus
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Air => "air",
            Tier::Pair => "pair",
            Tier::TopPair => "top_pair",
            Tier::TwoPairPlus => "two_pair_plus",
        }
    }

    pub fn from_str(s: &str) -> Option<Tier> {
        ALL_TIERS.iter().copied().find(|t| t.as_str() == s)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bucket the amount to call relative to the pot:
/// 0 when nothing is owed, 1 up to a third of the pot, 2 up to two thirds,
/// 3 beyond that. Integer arithmetic keeps the thresholds exact.
pub fn to_call_bucket(to_call: u32, pot: u32) -> u8 {
    let to_call = u64::from(to_call);
    let pot = u64::from(pot);
    if to_call == 0 {
        0
    } else if to_call * 3 <= pot {
        1
    } else if to_call * 3 <= pot * 2 {
        2
    } else {
        3
    }
}

/// Lookup key for one information set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InfosetKey {
    pub street: Street,
    pub position: u8,
    pub tier: Tier,
    pub flush_draw: bool,
    pub to_call_bucket: u8,
    /// Opponent's latest action on this street; `None` before anyone acted.
    pub history: Option<Action>,
}

impl InfosetKey {
    pub fn new(
        street: Street,
        position: u8,
        tier: Tier,
        flush_draw: bool,
        to_call: u32,
        pot: u32,
        history: Option<Action>,
    ) -> Self {
        InfosetKey {
            street,
            position: position % 2,
            tier,
            flush_draw,
            to_call_bucket: to_call_bucket(to_call, pot),
            history,
        }
    }
}

impl fmt::Display for InfosetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/p{}/{}{}/tc{}/{}",
            self.street,
            self.position,
            self.tier,
            if self.flush_draw { "+fd" } else { "" },
            self.to_call_bucket,
            self.history.map(|a| a.label()).unwrap_or("-"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_call_bucket_thresholds() {
        assert_eq!(to_call_bucket(0, 90), 0);
        assert_eq!(to_call_bucket(1, 90), 1);
        assert_eq!(to_call_bucket(30, 90), 1);
        assert_eq!(to_call_bucket(31, 90), 2);
        assert_eq!(to_call_bucket(60, 90), 2);
        assert_eq!(to_call_bucket(61, 90), 3);
    }

    #[test]
    fn to_call_with_empty_pot() {
        assert_eq!(to_call_bucket(0, 0), 0);
        assert_eq!(to_call_bucket(5, 0), 3);
    }

    #[test]
    fn street_from_board_len() {
        assert_eq!(Street::from_board_len(0), Street::Preflop);
        assert_eq!(Street::from_board_len(3), Street::Flop);
        assert_eq!(Street::from_board_len(4), Street::Turn);
        assert_eq!(Street::from_board_len(5), Street::River);
        assert_eq!(Street::from_board_len(2), Street::River);
    }

    #[test]
    fn street_order_is_fixed() {
        let mut s = Street::Preflop;
        let mut seen = vec![s];
        while let Some(n) = s.next() {
            seen.push(n);
            s = n;
        }
        assert_eq!(seen, STREET_ORDER.to_vec());
    }

    #[test]
    fn tier_distribution_edges() {
        assert_eq!(Tier::from_unit(0.0), Tier::Air);
        assert_eq!(Tier::from_unit(0.4999), Tier::Air);
        assert_eq!(Tier::from_unit(0.5), Tier::Pair);
        assert_eq!(Tier::from_unit(0.8), Tier::TopPair);
        assert_eq!(Tier::from_unit(0.95), Tier::TwoPairPlus);
    }

    #[test]
    fn tier_names_roundtrip() {
        for t in ALL_TIERS {
            assert_eq!(Tier::from_str(t.as_str()), Some(t));
        }
        assert_eq!(Tier::from_str("quads"), None);
    }

    #[test]
    fn position_is_taken_mod_two() {
        let k = InfosetKey::new(Street::Flop, 3, Tier::Pair, false, 0, 30, None);
        assert_eq!(k.position, 1);
    }

    #[test]
    fn display_is_compact() {
        let k = InfosetKey::new(Street::Turn, 1, Tier::TopPair, true, 25, 30, Some(Action::RaiseMin));
        assert_eq!(k.to_string(), "turn/p1/top_pair+fd/tc3/Rmin");
    }
}
