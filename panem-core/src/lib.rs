//! PANEM Core - District elimination tournament
//!
//! This crate provides the tournament engine:
//! - Persons and per-district odd/even populations
//! - District catalog (pre-admission)
//! - Elimination tree (unbalanced BST keyed by district id)
//! - Dueler selection and duel resolution
//! - Tournament loop and setup parsing
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: Tournament::run (orchestration)
//! - Level 2: select_duelers, resolve_duel, tree insert/find/delete (phases)
//! - Level 3: candidate search, duel scoring, link rewiring (steps)
//! - Level 4: configuration, setup parsing, traversals

pub mod config;
pub mod district;
pub mod error;
pub mod person;
pub mod round;
pub mod selection;
pub mod setup;
pub mod tournament;
pub mod tree;

// Re-exports for convenient access
pub use config::{DuelPolicy, TieBreak, TournamentConfig, DEFAULT_SEED};
pub use district::{Catalog, District, DistrictId};
pub use error::{GamesError, SetupError};
pub use person::{Parity, Person, PersonId, Population};
pub use round::{resolve_duel, DuelOutcome};
pub use selection::{select_duelers, DuelPair, UniformSource};
pub use setup::{parse_setup, Setup};
pub use tournament::{
    DistrictStanding, Elimination, RoundReport, StopReason, Tournament, TournamentResult,
};
pub use tree::{EliminationTree, NodeId, TreeNode};
