//! Tournament execution - admission, rounds, and standings
//!
//! Level 1 - Orchestration and Level 2 - Phases

use serde::{Deserialize, Serialize};

use crate::config::TournamentConfig;
use crate::district::{Catalog, District, DistrictId};
use crate::error::GamesError;
use crate::round::{resolve_duel, DuelOutcome};
use crate::selection::{select_duelers, DuelPair, UniformSource};
use crate::setup::Setup;
use crate::tree::{EliminationTree, NodeId};

/// Why a run stopped
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// Exactly one district left
    Champion,
    /// No districts left
    Extinct,
    /// Selection found nobody on either side
    NoContestants,
    /// Only a bye was possible, so populations can no longer change
    Stalled,
    /// Configured round cap reached
    RoundLimit,
}

/// A district leaving the tree
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Elimination {
    /// Round in which it happened (0 = before any round)
    pub round: usize,
    pub district: DistrictId,
}

/// One round of play
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundReport {
    pub round: usize,
    pub outcome: DuelOutcome,
}

/// Snapshot of a surviving district
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistrictStanding {
    pub district: DistrictId,
    pub odd: usize,
    pub even: usize,
    pub total_effectiveness: i64,
}

impl DistrictStanding {
    fn of(district: &District) -> Self {
        Self {
            district: district.id,
            odd: district.odd_population().len(),
            even: district.even_population().len(),
            total_effectiveness: district.odd_population().total_effectiveness()
                + district.even_population().total_effectiveness(),
        }
    }
}

/// Result of a tournament run
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentResult {
    pub rounds_played: usize,
    pub stop_reason: StopReason,
    /// Last district standing, if exactly one remains
    pub champion: Option<DistrictId>,
    /// Surviving districts in identifier order
    pub survivors: Vec<DistrictStanding>,
    /// Eliminations in the order they happened
    pub eliminations: Vec<Elimination>,
}

/// Catalog, elimination tree, and round bookkeeping
#[derive(Clone, Debug)]
pub struct Tournament {
    catalog: Catalog,
    tree: EliminationTree,
    config: TournamentConfig,
    rounds_played: usize,
    eliminations: Vec<Elimination>,
}

impl Tournament {
    pub fn new(catalog: Catalog, config: TournamentConfig) -> Self {
        Self {
            catalog,
            tree: EliminationTree::new(),
            config,
            rounds_played: 0,
            eliminations: Vec::new(),
        }
    }

    pub fn from_setup(setup: Setup, config: TournamentConfig) -> Self {
        Self::new(setup.catalog, config)
    }

    pub fn config(&self) -> &TournamentConfig {
        &self.config
    }

    /// Districts not yet admitted
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn tree(&self) -> &EliminationTree {
        &self.tree
    }

    pub fn root(&self) -> Option<NodeId> {
        self.tree.root()
    }

    pub fn rounds_played(&self) -> usize {
        self.rounds_played
    }

    pub fn eliminations(&self) -> &[Elimination] {
        &self.eliminations
    }

    /// Districts still in the tree
    pub fn surviving_count(&self) -> usize {
        self.tree.len()
    }

    // ========================================================================
    // Level 2 - Tree access
    // ========================================================================

    /// Move a district from the catalog into the elimination tree
    pub fn admit_district(&mut self, id: DistrictId) -> Result<NodeId, GamesError> {
        let district = self.catalog.take(id).ok_or(GamesError::NotInCatalog(id))?;
        tracing::debug!("Admitting district {}", id);
        Ok(self.tree.insert(district))
    }

    /// Admit every cataloged district in catalog order
    pub fn admit_all(&mut self) -> usize {
        let mut admitted = 0;
        while let Some(district) = self.catalog.take_first() {
            tracing::debug!("Admitting district {}", district.id);
            self.tree.insert(district);
            admitted += 1;
        }
        admitted
    }

    pub fn find_district(&self, id: DistrictId) -> Option<&District> {
        self.tree.find(id)
    }

    /// Remove a district from the tree; absent ids are a no-op
    pub fn eliminate_district(&mut self, id: DistrictId) -> Option<District> {
        let removed = self.tree.delete(id)?;
        self.eliminations.push(Elimination {
            round: self.rounds_played,
            district: id,
        });
        Some(removed)
    }

    pub fn select_duelers<R: UniformSource + ?Sized>(&mut self, rng: &mut R) -> DuelPair {
        select_duelers(&mut self.tree, rng)
    }

    pub fn resolve_duel<R: UniformSource + ?Sized>(
        &mut self,
        pair: DuelPair,
        rng: &mut R,
    ) -> Result<DuelOutcome, GamesError> {
        let outcome = resolve_duel(&mut self.tree, pair, &self.config, rng)?;
        if let Some(district) = outcome.eliminated() {
            self.eliminations.push(Elimination {
                round: self.rounds_played,
                district,
            });
        }
        Ok(outcome)
    }

    /// Surviving districts in identifier order
    pub fn standings(&self) -> Vec<DistrictStanding> {
        self.tree
            .in_order_ids()
            .into_iter()
            .filter_map(|id| self.tree.find(id))
            .map(DistrictStanding::of)
            .collect()
    }

    // ========================================================================
    // Level 1 - Orchestration
    // ========================================================================

    /// Select and resolve one duel
    pub fn play_round<R: UniformSource + ?Sized>(&mut self, rng: &mut R) -> Result<RoundReport, GamesError> {
        self.rounds_played += 1;
        let pair = self.select_duelers(rng);
        let outcome = self.resolve_duel(pair, rng)?;
        Ok(RoundReport {
            round: self.rounds_played,
            outcome,
        })
    }

    /// Play rounds until the tournament is decided or cannot progress
    pub fn run<R: UniformSource + ?Sized>(&mut self, rng: &mut R) -> Result<TournamentResult, GamesError> {
        self.run_with(rng, |_| {})
    }

    /// Like `run`, handing every round report to `on_round` as it is played
    pub fn run_with<R, F>(&mut self, rng: &mut R, mut on_round: F) -> Result<TournamentResult, GamesError>
    where
        R: UniformSource + ?Sized,
        F: FnMut(&RoundReport),
    {
        let stop_reason = loop {
            match self.tree.len() {
                0 => break StopReason::Extinct,
                1 => break StopReason::Champion,
                _ => {}
            }
            if self
                .config
                .max_rounds
                .is_some_and(|max| self.rounds_played >= max)
            {
                break StopReason::RoundLimit;
            }

            let report = self.play_round(rng)?;
            on_round(&report);
            match report.outcome {
                DuelOutcome::NoDuel => break StopReason::NoContestants,
                DuelOutcome::Bye { .. } => break StopReason::Stalled,
                DuelOutcome::Fought { .. } => {}
            }
        };

        let champion = match stop_reason {
            StopReason::Champion => self.tree.root_district().map(|d| d.id),
            _ => None,
        };

        tracing::info!(
            "Tournament finished after {} rounds: {:?}, {} districts remain",
            self.rounds_played,
            stop_reason,
            self.tree.len()
        );

        Ok(TournamentResult {
            rounds_played: self.rounds_played,
            stop_reason,
            champion,
            survivors: self.standings(),
            eliminations: self.eliminations.clone(),
        })
    }
}
