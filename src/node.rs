//! Per-infoset CFR+ accumulators.
//!
//! Each node keeps cumulative regret per action (floored at zero after every
//! update) and the cumulative strategy weight used to form the average
//! strategy served at decision time.

use serde::{Deserialize, Serialize};

use crate::action::NUM_ACTIONS;

/// Totals at or below this are treated as empty and fall back to uniform.
pub const EPSILON: f64 = 1e-12;

pub const UNIFORM: [f64; NUM_ACTIONS] = [1.0 / NUM_ACTIONS as f64; NUM_ACTIONS];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegretNode {
    /// Cumulative regret for each action (never negative after an update).
    pub regret: [f64; NUM_ACTIONS],
    /// Cumulative strategy weight for each action.
    pub strategy_sum: [f64; NUM_ACTIONS],
}

impl RegretNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Regret-matching+ strategy without touching the accumulators.
    pub fn strategy(&self) -> [f64; NUM_ACTIONS] {
        let positive_sum: f64 = self.regret.iter().map(|&r| r.max(0.0)).sum();
        if positive_sum <= EPSILON {
            return UNIFORM;
        }
        let mut out = [0.0; NUM_ACTIONS];
        for (o, &r) in out.iter_mut().zip(self.regret.iter()) {
            *o = r.max(0.0) / positive_sum;
        }
        out
    }

    /// Strategy for this visit. Adds `realization_weight * strategy` into
    /// `strategy_sum`, so call it exactly once per visit.
    pub fn current_strategy(&mut self, realization_weight: f64) -> [f64; NUM_ACTIONS] {
        let strat = self.strategy();
        self.accumulate_strategy(&strat, realization_weight);
        strat
    }

    pub fn accumulate_strategy(&mut self, strategy: &[f64; NUM_ACTIONS], weight: f64) {
        for (s, &p) in self.strategy_sum.iter_mut().zip(strategy.iter()) {
            *s += weight * p;
        }
    }

    /// Average strategy over all visits; uniform when nothing accumulated.
    pub fn average_strategy(&self) -> [f64; NUM_ACTIONS] {
        let total: f64 = self.strategy_sum.iter().sum();
        if total <= EPSILON {
            return UNIFORM;
        }
        let mut out = [0.0; NUM_ACTIONS];
        for (o, &s) in out.iter_mut().zip(self.strategy_sum.iter()) {
            *o = s / total;
        }
        out
    }

    /// CFR+ regret update: `regret[i] = max(0, regret[i] + delta[i])`.
    pub fn apply_regret(&mut self, deltas: &[f64; NUM_ACTIONS]) {
        for (r, &d) in self.regret.iter_mut().zip(deltas.iter()) {
            *r = (*r + d).max(0.0);
        }
    }

    pub fn visits_weight(&self) -> f64 {
        self.strategy_sum.iter().sum()
    }
}
