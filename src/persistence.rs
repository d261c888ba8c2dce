//! On-disk format for a trained [`NodeTable`].
//!
//! ```text
//! {
//!   "version": 1,
//!   "num_actions": 5,
//!   "nodes": [
//!     { "key": { "street": "flop", "position": 0, "tier": "pair",
//!                "flush_draw": false, "to_call_bucket": 0, "history": null },
//!       "regret": [..5], "strategy_sum": [..5] },
//!     ...
//!   ]
//! }
//! ```
//!
//! Nodes are sorted by key so identical tables produce identical files.
//! Floats use the shortest representation that parses back to the same bits.

use std::fs;
use std::path::{Path, PathBuf};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::action::NUM_ACTIONS;
use crate::error::{CfrError, CfrResult};
use crate::infoset::InfosetKey;
use crate::node::RegretNode;
use crate::table::NodeTable;

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct TableFile {
    version: u32,
    num_actions: usize,
    nodes: Vec<NodeEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct NodeEntry {
    key: InfosetKey,
    regret: Vec<f64>,
    strategy_sum: Vec<f64>,
}

fn to_array(v: Vec<f64>) -> CfrResult<[f64; NUM_ACTIONS]> {
    let found = v.len();
    v.try_into().map_err(|_| CfrError::ShapeMismatch {
        expected: NUM_ACTIONS,
        found,
    })
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

pub fn to_json(table: &NodeTable) -> CfrResult<String> {
    let nodes = table
        .iter()
        .sorted_by(|a, b| a.0.cmp(b.0))
        .map(|(key, node)| NodeEntry {
            key: *key,
            regret: node.regret.to_vec(),
            strategy_sum: node.strategy_sum.to_vec(),
        })
        .collect();
    let file = TableFile {
        version: FORMAT_VERSION,
        num_actions: NUM_ACTIONS,
        nodes,
    };
    Ok(serde_json::to_string(&file)?)
}

pub fn from_json(json: &str) -> CfrResult<NodeTable> {
    let file: TableFile = serde_json::from_str(json)?;
    if file.version != FORMAT_VERSION {
        return Err(CfrError::UnsupportedVersion {
            found: file.version,
            expected: FORMAT_VERSION,
        });
    }
    if file.num_actions != NUM_ACTIONS {
        return Err(CfrError::ShapeMismatch {
            expected: NUM_ACTIONS,
            found: file.num_actions,
        });
    }
    let mut table = NodeTable::new();
    for entry in file.nodes {
        table.insert(
            entry.key,
            RegretNode {
                regret: to_array(entry.regret)?,
                strategy_sum: to_array(entry.strategy_sum)?,
            },
        );
    }
    Ok(table)
}

/// Write the table to `path`, going through a sibling temp file and a rename
/// so an interrupted save never leaves a truncated table behind.
pub fn save(table: &NodeTable, path: &Path) -> CfrResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = to_json(table)?;
    let tmp = temp_path(path);
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    log::info!("{:<24}{} ({} nodes)", "saved table", path.display(), table.len());
    Ok(())
}

pub fn load(path: &Path) -> CfrResult<NodeTable> {
    let json = fs::read_to_string(path)?;
    let table = from_json(&json)?;
    log::info!("{:<24}{} ({} nodes)", "loaded table", path.display(), table.len());
    Ok(table)
}

/// Load `path`, falling back to an empty (uniform) table when the file is
/// missing or unreadable.
pub fn load_or_empty(path: &Path) -> NodeTable {
    match load(path) {
        Ok(table) => table,
        Err(e) => {
            log::warn!("could not load {}: {}; using empty table", path.display(), e);
            NodeTable::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrainerConfig;
    use crate::trainer::Trainer;

    fn trained() -> NodeTable {
        let mut t = Trainer::new(TrainerConfig {
            seed: 1,
            ..Default::default()
        })
        .unwrap();
        t.train(500).unwrap();
        t.into_table()
    }

    #[test]
    fn json_roundtrip_is_exact() {
        let table = trained();
        let back = from_json(&to_json(&table).unwrap()).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn output_is_deterministic() {
        let table = trained();
        assert_eq!(to_json(&table).unwrap(), to_json(&table.clone()).unwrap());
    }

    #[test]
    fn rejects_wrong_version() {
        let json = r#"{"version": 99, "num_actions": 5, "nodes": []}"#;
        assert!(matches!(
            from_json(json),
            Err(CfrError::UnsupportedVersion { found: 99, .. })
        ));
    }

    #[test]
    fn rejects_short_vectors() {
        let json = r#"{"version": 1, "num_actions": 5, "nodes": [
            {"key": {"street": "flop", "position": 0, "tier": "air", "flush_draw": false,
                     "to_call_bucket": 0, "history": null},
             "regret": [0, 0, 0], "strategy_sum": [0, 0, 0, 0, 0]}]}"#;
        assert!(matches!(
            from_json(json),
            Err(CfrError::ShapeMismatch { expected: 5, found: 3 })
        ));
    }

    #[test]
    fn save_replaces_file_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("table.json");
        let table = trained();
        save(&table, &path).unwrap();
        save(&table, &path).unwrap();
        assert!(path.exists());
        assert!(!temp_path(&path).exists());
        assert_eq!(load(&path).unwrap(), table);
    }

    #[test]
    fn missing_or_corrupt_falls_back_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_or_empty(&dir.path().join("absent.json")).is_empty());

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{ not json").unwrap();
        assert!(load(&bad).is_err());
        assert!(load_or_empty(&bad).is_empty());
    }
}
