//! Configuration types for a tournament run
//!
//! Level 4 - Utilities and configuration

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Seed used when none is given, so identical input replays identically
pub const DEFAULT_SEED: u64 = 2023;

/// How a duel between two contestants is decided
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuelPolicy {
    /// Higher effectiveness wins outright
    Effectiveness,
    /// Each side adds a roll in `[0, sides)` to its effectiveness, odd side rolls first
    Dice { sides: u32 },
}

impl Default for DuelPolicy {
    fn default() -> Self {
        DuelPolicy::Effectiveness
    }
}

/// Which side wins when duel scores are equal
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TieBreak {
    Odd,
    Even,
}

impl Default for TieBreak {
    fn default() -> Self {
        TieBreak::Odd
    }
}

/// Tournament configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentConfig {
    /// Seed for the shared random stream
    pub seed: u64,
    /// Duel resolution rule
    pub duel_policy: DuelPolicy,
    /// Winner on equal scores
    pub tie_break: TieBreak,
    /// Stop after this many rounds (None = run until decided)
    pub max_rounds: Option<usize>,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            duel_policy: DuelPolicy::default(),
            tie_break: TieBreak::default(),
            max_rounds: None,
        }
    }
}

impl TournamentConfig {
    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_duel_policy(mut self, duel_policy: DuelPolicy) -> Self {
        self.duel_policy = duel_policy;
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = Some(max_rounds);
        self
    }

    /// Fresh random stream seeded from this config
    pub fn rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.seed)
    }
}
