//! Hand-strength tier and flush-draw detection from real cards.
//!
//! These produce the `tier` and `fd` inputs the policy expects when a live
//! engine hands us hole cards and a board instead of precomputed features.

use std::collections::HashMap;

use crate::cards::{Card, Suit};
use crate::infoset::Tier;

fn rank_counts(cards: &[Card]) -> HashMap<u8, u32> {
    let mut counts = HashMap::new();
    for c in cards {
        *counts.entry(c.value()).or_insert(0u32) += 1;
    }
    counts
}

/// Tier of the best made hand using `hole` and `board`.
///
/// Trips or better and two distinct pairs are both `TwoPairPlus`. A single
/// pair is `TopPair` when a hole card pairs the highest board card or the
/// hole cards are a pocket pair above it (overpair); otherwise `Pair`.
/// Preflop (empty board) is always `Air`.
pub fn postflop_tier(hole: &[Card], board: &[Card]) -> Tier {
    let Some(board_top) = board.iter().map(|c| c.value()).max() else {
        return Tier::Air;
    };

    let all: Vec<Card> = hole.iter().chain(board.iter()).copied().collect();
    let counts = rank_counts(&all);

    if counts.values().any(|&n| n >= 3) {
        return Tier::TwoPairPlus;
    }
    let pairs = counts.values().filter(|&&n| n >= 2).count();
    if pairs >= 2 {
        return Tier::TwoPairPlus;
    }
    if pairs == 0 {
        return Tier::Air;
    }

    let overpair = matches!(hole, [a, b] if a.rank == b.rank && a.value() > board_top);
    let top_pair = hole.iter().any(|c| c.value() == board_top);
    if overpair || top_pair {
        Tier::TopPair
    } else {
        Tier::Pair
    }
}

/// Four or more cards of one suit across hole and board, with at least one
/// of them in the hole. Needs a flop on the table.
pub fn has_flush_draw(hole: &[Card], board: &[Card]) -> bool {
    if board.len() < 3 {
        return false;
    }
    let mut suit_counts: HashMap<Suit, u32> = HashMap::new();
    for c in hole.iter().chain(board.iter()) {
        *suit_counts.entry(c.suit).or_insert(0) += 1;
    }
    suit_counts
        .iter()
        .any(|(suit, &n)| n >= 4 && hole.iter().any(|h| h.suit == *suit))
}
