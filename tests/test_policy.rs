//! Serving: translation rules and consistency with the trained table.

use cfrplus::action::{Action, ALL_ACTIONS};
use cfrplus::config::TrainerConfig;
use cfrplus::infoset::{Tier, ALL_TIERS};
use cfrplus::policy::{translate, Command, DecisionRequest, Policy};
use cfrplus::trainer::Trainer;

fn trained_policy(hands: u64) -> Policy {
    let mut t = Trainer::new(TrainerConfig {
        seed: 42,
        ..Default::default()
    })
    .unwrap();
    t.train(hands).unwrap();
    Policy::new(t.into_table())
}

fn requests() -> Vec<DecisionRequest> {
    let mut out = Vec::new();
    for board_len in [0, 3, 4, 5] {
        for position in 0..2u8 {
            for (pot, to_call) in [(30, 0), (90, 20), (90, 50), (90, 80), (200, 0)] {
                for min_raise in [0, 1, 20] {
                    out.push(DecisionRequest {
                        board_len,
                        pot,
                        to_call,
                        min_raise,
                        position,
                        last_opponent_action: None,
                    });
                }
            }
        }
    }
    out
}

#[test]
fn never_folds_with_nothing_to_call() {
    let policy = trained_policy(5_000);
    for req in requests().into_iter().filter(|r| r.to_call == 0) {
        for tier in ALL_TIERS {
            for fd in [false, true] {
                let d = policy.decide(&req, tier, fd);
                assert_ne!(d.command, Command::Fold, "{:?} {:?}", req, tier);
            }
        }
    }
    // Untrained policy as well.
    let empty = Policy::default();
    for req in requests().into_iter().filter(|r| r.to_call == 0) {
        assert_ne!(empty.decide(&req, Tier::Air, false).command, Command::Fold);
    }
}

#[test]
fn raise_amounts_are_exact_multiples() {
    let policy = trained_policy(5_000);
    for req in requests() {
        let unit = req.min_raise.max(1);
        for tier in ALL_TIERS {
            let d = policy.decide(&req, tier, false);
            match d.command {
                Command::Raise => {
                    assert!(
                        [unit, 2 * unit, 3 * unit].contains(&d.amount),
                        "raise {} with unit {}",
                        d.amount,
                        unit
                    );
                }
                Command::Fold | Command::Call => assert_eq!(d.amount, 0),
            }
        }
    }
}

#[test]
fn translation_covers_every_action() {
    for action in ALL_ACTIONS {
        for to_call in [0, 10] {
            let d = translate(action, to_call, 20);
            match action {
                Action::Fold if to_call == 0 => assert_eq!(d.command, Command::Call),
                Action::Fold => assert_eq!(d.command, Command::Fold),
                Action::Call => assert_eq!(d.command, Command::Call),
                _ => {
                    assert_eq!(d.command, Command::Raise);
                    assert_eq!(d.amount, 20 * action.raise_multiplier().unwrap());
                }
            }
        }
    }
}

#[test]
fn strong_river_hand_learns_not_to_fold() {
    let policy = trained_policy(30_000);
    // First to act on the river: nothing to call and no history yet.
    let req = DecisionRequest {
        board_len: 5,
        pot: 100,
        to_call: 0,
        min_raise: 20,
        position: 0,
        last_opponent_action: None,
    };
    assert!(policy.table().get(&req.infoset_key(Tier::TwoPairPlus, false)).is_some());
    let s = policy.strategy(&req, Tier::TwoPairPlus, false);
    assert!(s[Action::Fold.index()] < s[Action::Call.index()], "{:?}", s);
}

#[test]
fn seat_one_requests_hit_trained_keys() {
    let policy = trained_policy(30_000);
    // Preflop pots are fixed by seat 0's action: 30 + its raise.
    for (pot, to_call) in [(30, 0), (50, 20), (70, 40), (90, 60)] {
        let req = DecisionRequest {
            board_len: 0,
            pot,
            to_call,
            min_raise: 20,
            position: 1,
            last_opponent_action: None,
        };
        let key = req.infoset_key(Tier::Air, false);
        assert!(policy.table().get(&key).is_some(), "untrained key {}", key);
    }
}

#[test]
fn strong_seat_one_hand_calls_a_bet() {
    let policy = trained_policy(30_000);
    let req = DecisionRequest {
        board_len: 5,
        pot: 90,
        to_call: 20,
        min_raise: 20,
        position: 1,
        last_opponent_action: None,
    };
    assert!(policy.table().get(&req.infoset_key(Tier::TwoPairPlus, false)).is_some());
    assert_ne!(policy.decide(&req, Tier::TwoPairPlus, false).command, Command::Fold);
}

#[test]
fn decide_is_pure() {
    let policy = trained_policy(2_000);
    for req in requests() {
        assert_eq!(
            policy.decide(&req, Tier::Pair, true),
            policy.decide(&req, Tier::Pair, true)
        );
    }
}
