//! CFR+ self-play trainer and policy server for an abstracted heads-up
//! poker game.
//!
//! [`trainer::Trainer`] learns a [`table::NodeTable`] of per-infoset regret
//! and average-strategy accumulators; [`policy::Policy`] serves decisions
//! from the table's average strategy.

pub mod action;
pub mod cards;
pub mod classify;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod infoset;
pub mod node;
pub mod persistence;
pub mod policy;
pub mod simulator;
pub mod table;
pub mod trainer;
