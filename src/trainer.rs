//! CFR+ self-play over the abstract hand.
//!
//! Every decision point draws an action from the node's regret-matched
//! strategy, then updates regret for all five actions from a heuristic
//! counterfactual value vector. The values are a one-step estimate from the
//! two players' street tiers rather than a tree search.
//!
//! With `threads > 1`, hands are played in batches. Each worker reads the
//! table as it stood at the start of the batch and buffers raw deltas; the
//! shards are merged (and regret floored) once per batch.

use std::path::Path;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::action::{Action, NUM_ACTIONS};
use crate::config::TrainerConfig;
use crate::error::{CfrError, CfrResult};
use crate::infoset::Tier;
use crate::persistence;
use crate::simulator::{Blinds, HandState, Phase, Terminal};
use crate::table::{Accumulator, NodeTable, ShardWorker, TableDelta};

/// Value of folding is `-FOLD_PENALTY - edge`.
pub const FOLD_PENALTY: f64 = 0.6;
pub const CALL_COST: f64 = 0.05;
/// Cost per raise size (1x, 2x, 3x).
pub const RAISE_COSTS: [f64; 3] = [0.1, 0.2, 0.35];

/// What each action's value is compared against in the regret update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegretBaseline {
    /// `cfv[i] - cfv[chosen]`: against the action actually sampled.
    #[default]
    ChosenAction,
    /// `cfv[i] - Σ σ[k]·cfv[k]`: against the node's expected value.
    StrategyValue,
}

impl RegretBaseline {
    pub fn regret_deltas(
        self,
        values: &[f64; NUM_ACTIONS],
        chosen: Action,
        strategy: &[f64; NUM_ACTIONS],
    ) -> [f64; NUM_ACTIONS] {
        let baseline = match self {
            RegretBaseline::ChosenAction => values[chosen.index()],
            RegretBaseline::StrategyValue => {
                values.iter().zip(strategy.iter()).map(|(v, p)| v * p).sum()
            }
        };
        let mut out = [0.0; NUM_ACTIONS];
        for (o, &v) in out.iter_mut().zip(values.iter()) {
            *o = v - baseline;
        }
        out
    }
}

/// Heuristic counterfactual values for the acting player.
pub fn counterfactual_values(own: Tier, opponent: Tier) -> [f64; NUM_ACTIONS] {
    let edge = own.showdown_value() - opponent.showdown_value();
    [
        -FOLD_PENALTY - edge,
        edge - CALL_COST,
        edge - RAISE_COSTS[0],
        edge - RAISE_COSTS[1],
        edge - RAISE_COSTS[2],
    ]
}

/// Walk the cumulative distribution with a uniform draw `u`. Rounding
/// shortfalls fall through to the last action.
pub fn sample_action(strategy: &[f64; NUM_ACTIONS], u: f64) -> Action {
    let mut acc = 0.0;
    for (i, &p) in strategy.iter().enumerate() {
        acc += p;
        if u <= acc {
            return Action::from_index(i);
        }
    }
    Action::from_index(NUM_ACTIONS - 1)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandOutcome {
    /// Terminal utility for player 0.
    pub utility: f64,
    /// Decision points visited.
    pub decisions: usize,
    pub terminal: Terminal,
}

/// Play one hand against `acc`, updating regret and strategy sums at every
/// decision point. Realization weight is always 1.0.
pub fn play_hand<A, R>(acc: &mut A, rng: &mut R, blinds: Blinds, baseline: RegretBaseline) -> HandOutcome
where
    A: Accumulator + ?Sized,
    R: Rng + ?Sized,
{
    let mut state = HandState::new(blinds);
    let mut decisions = 0;

    while let Some(key) = state.infoset_key() {
        let me = state.player as usize;
        let strategy = acc.visit(key, 1.0);
        let action = sample_action(&strategy, rng.gen::<f64>());
        // Tiers are read before `apply`, which may redraw them for the next street.
        let values = counterfactual_values(state.tiers[me], state.tiers[1 - me]);
        state.apply(action, rng);
        acc.add_regret(key, &baseline.regret_deltas(&values, action, &strategy));
        decisions += 1;
    }

    let terminal = match state.phase {
        Phase::Done(t) => t,
        // The loop above only exits once the hand is over.
        Phase::Betting(_) => Terminal::Showdown,
    };
    HandOutcome {
        utility: state.utility().unwrap_or(0.0),
        decisions,
        terminal,
    }
}

pub struct Trainer {
    config: TrainerConfig,
    table: NodeTable,
    rng: StdRng,
    hands_played: u64,
}

impl Trainer {
    pub fn new(config: TrainerConfig) -> CfrResult<Self> {
        Self::with_table(config, NodeTable::new())
    }

    /// Continue training from an existing table.
    pub fn with_table(config: TrainerConfig, table: NodeTable) -> CfrResult<Self> {
        config.validate()?;
        let rng = StdRng::seed_from_u64(config.seed);
        Ok(Trainer {
            config,
            table,
            rng,
            hands_played: 0,
        })
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn table(&self) -> &NodeTable {
        &self.table
    }

    pub fn into_table(self) -> NodeTable {
        self.table
    }

    pub fn hands_played(&self) -> u64 {
        self.hands_played
    }

    fn blinds(&self) -> Blinds {
        Blinds::from_big(self.config.big_blind)
    }

    /// Play one hand directly against the table.
    pub fn play_hand(&mut self) -> HandOutcome {
        let blinds = self.blinds();
        let outcome = play_hand(&mut self.table, &mut self.rng, blinds, self.config.baseline);
        self.hands_played += 1;
        outcome
    }

    /// Run `iterations` self-play hands.
    pub fn train(&mut self, iterations: u64) -> CfrResult<()> {
        if iterations == 0 {
            return Err(CfrError::InvalidConfig(
                "iterations must be positive".to_string(),
            ));
        }
        let start = Instant::now();
        log::info!(
            "training {} hands (seed {}, {} thread{}, {} nodes)",
            iterations,
            self.config.seed,
            self.config.threads,
            if self.config.threads == 1 { "" } else { "s" },
            self.table.len(),
        );

        if self.config.threads == 1 {
            self.train_sequential(iterations);
        } else {
            self.train_parallel(iterations)?;
        }

        log::info!(
            "finished {} hands in {:.1}s, {} nodes",
            iterations,
            start.elapsed().as_secs_f64(),
            self.table.len(),
        );
        Ok(())
    }

    fn train_sequential(&mut self, iterations: u64) {
        let report_every = (iterations / 10).max(1);
        for i in 1..=iterations {
            self.play_hand();
            if i % report_every == 0 {
                log::debug!("{}/{} hands, {} nodes", i, iterations, self.table.len());
            }
        }
    }

    fn train_parallel(&mut self, iterations: u64) -> CfrResult<()> {
        let threads = self.config.threads;
        let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
        let blinds = self.blinds();
        let baseline = self.config.baseline;
        let batch = self.config.batch_hands as u64;

        let mut done = 0u64;
        while done < iterations {
            let n = batch.min(iterations - done);
            let jobs: Vec<(u64, u64)> = (0..threads as u64)
                .map(|w| {
                    let share = n / threads as u64 + u64::from(w < n % threads as u64);
                    (share, self.rng.gen::<u64>())
                })
                .collect();

            let snapshot = &self.table;
            let shards: Vec<TableDelta> = pool.install(|| {
                jobs.par_iter()
                    .map(|&(hands, seed)| {
                        let mut rng = StdRng::seed_from_u64(seed);
                        let mut worker = ShardWorker::new(snapshot);
                        for _ in 0..hands {
                            play_hand(&mut worker, &mut rng, blinds, baseline);
                        }
                        worker.into_delta()
                    })
                    .collect()
            });

            let mut merged = TableDelta::default();
            for shard in shards {
                merged.absorb(shard);
            }
            self.table.merge(merged);

            done += n;
            self.hands_played += n;
            log::debug!("{}/{} hands, {} nodes", done, iterations, self.table.len());
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> CfrResult<()> {
        persistence::save(&self.table, path)
    }
}
