//! Training configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CfrError, CfrResult};
use crate::trainer::RegretBaseline;

/// Largest accepted big blind. A hand can grow the pot and max bet to about
/// 25.5 big blinds, so chip arithmetic stays within `u32`.
pub const MAX_BIG_BLIND: u32 = u32::MAX / 32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Number of simulated hands.
    pub iterations: u64,
    pub seed: u64,
    /// Big blind and minimum raise unit; the small blind is half of it.
    pub big_blind: u32,
    /// Worker threads. 1 keeps the exact sequential update order.
    pub threads: usize,
    /// Hands per synchronisation round when `threads > 1`.
    pub batch_hands: usize,
    pub baseline: RegretBaseline,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            iterations: 200_000,
            seed: 42,
            big_blind: 20,
            threads: 1,
            batch_hands: 4096,
            baseline: RegretBaseline::ChosenAction,
        }
    }
}

impl TrainerConfig {
    pub fn from_json_file(path: &Path) -> CfrResult<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: TrainerConfig = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CfrResult<()> {
        if self.iterations == 0 {
            return Err(CfrError::InvalidConfig(
                "iterations must be positive".to_string(),
            ));
        }
        if self.big_blind == 0 {
            return Err(CfrError::InvalidConfig(
                "big blind must be positive".to_string(),
            ));
        }
        if self.big_blind > MAX_BIG_BLIND {
            return Err(CfrError::InvalidConfig(format!(
                "big blind must be at most {}",
                MAX_BIG_BLIND
            )));
        }
        if self.threads == 0 {
            return Err(CfrError::InvalidConfig(
                "threads must be positive".to_string(),
            ));
        }
        if self.batch_hands == 0 {
            return Err(CfrError::InvalidConfig(
                "batch size must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(TrainerConfig::default().validate().is_ok());
    }

    #[test]
    fn oversized_big_blind_rejected() {
        let at_limit = TrainerConfig {
            big_blind: MAX_BIG_BLIND,
            ..Default::default()
        };
        assert!(at_limit.validate().is_ok());
        let over = TrainerConfig {
            big_blind: 1_500_000_000,
            ..Default::default()
        };
        assert!(matches!(over.validate(), Err(CfrError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_zero_fields() {
        let bad = [
            TrainerConfig { iterations: 0, ..Default::default() },
            TrainerConfig { big_blind: 0, ..Default::default() },
            TrainerConfig { threads: 0, ..Default::default() },
            TrainerConfig { batch_hands: 0, ..Default::default() },
        ];
        for cfg in &bad {
            assert!(matches!(cfg.validate(), Err(CfrError::InvalidConfig(_))));
        }
    }

    #[test]
    fn partial_json_uses_defaults() {
        let cfg: TrainerConfig =
            serde_json::from_str(r#"{"iterations": 500, "baseline": "strategy_value"}"#).unwrap();
        assert_eq!(cfg.iterations, 500);
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.big_blind, 20);
        assert_eq!(cfg.baseline, RegretBaseline::StrategyValue);
    }

    #[test]
    fn from_json_file_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("train.json");
        std::fs::write(&path, r#"{"iterations": 0}"#).unwrap();
        assert!(TrainerConfig::from_json_file(&path).is_err());

        std::fs::write(&path, r#"{"iterations": 10, "threads": 2}"#).unwrap();
        let cfg = TrainerConfig::from_json_file(&path).unwrap();
        assert_eq!(cfg.threads, 2);
    }
}
