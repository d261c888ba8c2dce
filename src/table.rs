//! Infoset → node storage, plus the shard type used by parallel training.

use std::collections::HashMap;

use crate::action::NUM_ACTIONS;
use crate::infoset::InfosetKey;
use crate::node::{RegretNode, UNIFORM};

/// Where self-play sends its per-decision reads and writes.
///
/// The live [`NodeTable`] applies updates immediately; a [`ShardWorker`]
/// reads a frozen snapshot and buffers raw deltas for a later merge.
pub trait Accumulator {
    /// Strategy to play at `key` for this visit. Records
    /// `weight * strategy` towards the average strategy.
    fn visit(&mut self, key: InfosetKey, weight: f64) -> [f64; NUM_ACTIONS];

    /// Record one regret update (unclamped deltas) for `key`.
    fn add_regret(&mut self, key: InfosetKey, deltas: &[f64; NUM_ACTIONS]);
}

/// All learned nodes. Grows lazily; entries are never removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeTable {
    nodes: HashMap<InfosetKey, RegretNode>,
}

impl NodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the node for `key` (zero vectors on first access).
    pub fn get_or_create(&mut self, key: InfosetKey) -> &mut RegretNode {
        self.nodes.entry(key).or_default()
    }

    pub fn get(&self, key: &InfosetKey) -> Option<&RegretNode> {
        self.nodes.get(key)
    }

    pub fn insert(&mut self, key: InfosetKey, node: RegretNode) {
        self.nodes.insert(key, node);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&InfosetKey, &RegretNode)> {
        self.nodes.iter()
    }

    /// Current (regret-matched) strategy; uniform for unseen keys.
    pub fn strategy(&self, key: &InfosetKey) -> [f64; NUM_ACTIONS] {
        self.nodes.get(key).map(RegretNode::strategy).unwrap_or(UNIFORM)
    }

    /// Average strategy; uniform for unseen keys.
    pub fn average_strategy(&self, key: &InfosetKey) -> [f64; NUM_ACTIONS] {
        self.nodes
            .get(key)
            .map(RegretNode::average_strategy)
            .unwrap_or(UNIFORM)
    }

    /// Fold a worker shard into the table. Strategy sums add directly; the
    /// regret floor is applied once to the summed deltas.
    pub fn merge(&mut self, delta: TableDelta) {
        for (key, d) in delta.entries {
            let node = self.get_or_create(key);
            for (s, v) in node.strategy_sum.iter_mut().zip(d.strategy_sum.iter()) {
                *s += v;
            }
            node.apply_regret(&d.regret);
        }
    }
}

impl Accumulator for NodeTable {
    fn visit(&mut self, key: InfosetKey, weight: f64) -> [f64; NUM_ACTIONS] {
        self.get_or_create(key).current_strategy(weight)
    }

    fn add_regret(&mut self, key: InfosetKey, deltas: &[f64; NUM_ACTIONS]) {
        self.get_or_create(key).apply_regret(deltas);
    }
}

/// Unclamped per-key deltas collected by one worker.
#[derive(Debug, Clone, Default)]
pub struct NodeDelta {
    pub regret: [f64; NUM_ACTIONS],
    pub strategy_sum: [f64; NUM_ACTIONS],
}

#[derive(Debug, Clone, Default)]
pub struct TableDelta {
    entries: HashMap<InfosetKey, NodeDelta>,
}

impl TableDelta {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &InfosetKey) -> Option<&NodeDelta> {
        self.entries.get(key)
    }

    /// Combine two shards by element-wise summation.
    pub fn absorb(&mut self, other: TableDelta) {
        for (key, d) in other.entries {
            let entry = self.entries.entry(key).or_default();
            for i in 0..NUM_ACTIONS {
                entry.regret[i] += d.regret[i];
                entry.strategy_sum[i] += d.strategy_sum[i];
            }
        }
    }
}

/// Reads strategies from a frozen table, writes into a private delta.
pub struct ShardWorker<'a> {
    snapshot: &'a NodeTable,
    delta: TableDelta,
}

impl<'a> ShardWorker<'a> {
    pub fn new(snapshot: &'a NodeTable) -> Self {
        ShardWorker {
            snapshot,
            delta: TableDelta::default(),
        }
    }

    pub fn into_delta(self) -> TableDelta {
        self.delta
    }
}

impl Accumulator for ShardWorker<'_> {
    fn visit(&mut self, key: InfosetKey, weight: f64) -> [f64; NUM_ACTIONS] {
        let strat = self.snapshot.strategy(&key);
        let entry = self.delta.entries.entry(key).or_default();
        for (s, &p) in entry.strategy_sum.iter_mut().zip(strat.iter()) {
            *s += weight * p;
        }
        strat
    }

    fn add_regret(&mut self, key: InfosetKey, deltas: &[f64; NUM_ACTIONS]) {
        let entry = self.delta.entries.entry(key).or_default();
        for (r, &d) in entry.regret.iter_mut().zip(deltas.iter()) {
            *r += d;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infoset::{Street, Tier};

    fn key(street: Street) -> InfosetKey {
        InfosetKey::new(street, 0, Tier::Air, false, 0, 30, None)
    }

    #[test]
    fn get_or_create_inserts_zero_node() {
        let mut table = NodeTable::new();
        let k = key(Street::Flop);
        assert!(table.get(&k).is_none());
        table.get_or_create(k);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&k), Some(&RegretNode::new()));
    }

    #[test]
    fn unseen_key_reads_uniform() {
        let table = NodeTable::new();
        assert_eq!(table.average_strategy(&key(Street::River)), UNIFORM);
        assert_eq!(table.strategy(&key(Street::River)), UNIFORM);
        assert!(table.is_empty());
    }

    #[test]
    fn shard_worker_leaves_snapshot_untouched() {
        let table = NodeTable::new();
        let mut worker = ShardWorker::new(&table);
        let k = key(Street::Turn);
        let s = worker.visit(k, 1.0);
        assert_eq!(s, UNIFORM);
        worker.add_regret(k, &[-1.0, 2.0, 0.0, 0.0, 0.0]);
        worker.add_regret(k, &[3.0, -1.0, 0.0, 0.0, 0.0]);
        assert!(table.is_empty());

        let delta = worker.into_delta();
        assert_eq!(delta.get(&k).unwrap().regret, [2.0, 1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn merge_clamps_after_summing() {
        let mut table = NodeTable::new();
        let k = key(Street::Flop);
        let mut a = TableDelta::default();
        {
            let snapshot = NodeTable::new();
            let mut w1 = ShardWorker::new(&snapshot);
            w1.add_regret(k, &[-4.0, 1.0, 0.0, 0.0, 0.0]);
            let mut w2 = ShardWorker::new(&snapshot);
            w2.add_regret(k, &[5.0, -2.0, 0.0, 0.0, 0.0]);
            a.absorb(w1.into_delta());
            a.absorb(w2.into_delta());
        }
        table.merge(a);
        // Sequential clamping would give [5, 0, ...]; merged deltas give [1, 0, ...].
        assert_eq!(table.get(&k).unwrap().regret, [1.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn merge_adds_strategy_sums() {
        let mut table = NodeTable::new();
        let k = key(Street::Preflop);
        table.get_or_create(k).current_strategy(1.0);

        let snapshot = table.clone();
        let mut worker = ShardWorker::new(&snapshot);
        worker.visit(k, 1.0);
        table.merge(worker.into_delta());

        for &s in &table.get(&k).unwrap().strategy_sum {
            assert!((s - 0.4).abs() < 1e-12);
        }
    }
}
