//! Duel resolution
//!
//! The winner goes back to their district; the loser is dropped from the
//! simulation and their district is eliminated once it can no longer field
//! both sides.

use serde::{Deserialize, Serialize};

use crate::config::{DuelPolicy, TieBreak, TournamentConfig};
use crate::district::DistrictId;
use crate::error::GamesError;
use crate::person::{Parity, Person, PersonId};
use crate::selection::{DuelPair, UniformSource};
use crate::tree::EliminationTree;

/// What happened to a duel pair
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuelOutcome {
    /// Empty pair, nothing to do
    NoDuel,
    /// Lone contestant sent straight back
    Bye {
        person: PersonId,
        district: DistrictId,
        /// False when the district had already left the tree
        returned: bool,
    },
    /// Both sides fought
    Fought {
        winner: PersonId,
        winner_district: DistrictId,
        loser: PersonId,
        loser_district: DistrictId,
        /// Loser's district, if the loss eliminated it
        eliminated: Option<DistrictId>,
    },
}

impl DuelOutcome {
    pub fn eliminated(&self) -> Option<DistrictId> {
        match self {
            DuelOutcome::Fought { eliminated, .. } => *eliminated,
            _ => None,
        }
    }
}

/// Resolve a pair produced by dueler selection
pub fn resolve_duel<R: UniformSource + ?Sized>(
    tree: &mut EliminationTree,
    pair: DuelPair,
    config: &TournamentConfig,
    rng: &mut R,
) -> Result<DuelOutcome, GamesError> {
    check_pair(&pair)?;

    let (odd, even) = match (pair.odd, pair.even) {
        (None, None) => return Ok(DuelOutcome::NoDuel),
        (Some(person), None) | (None, Some(person)) => {
            let (id, district) = (person.id, person.district);
            let returned = send_back(tree, person)?;
            tracing::debug!("Bye for {} of district {}", id, district);
            return Ok(DuelOutcome::Bye {
                person: id,
                district,
                returned,
            });
        }
        (Some(odd), Some(even)) => (odd, even),
    };

    let (winner, loser) = match duel(&odd, &even, config, rng) {
        Parity::Odd => (odd, even),
        Parity::Even => (even, odd),
    };

    let (winner_id, winner_district) = (winner.id, winner.district);
    let (loser_id, loser_district) = (loser.id, loser.district);

    send_back(tree, winner)?;
    let eliminated = check_district(tree, loser_district);

    tracing::debug!(
        "Duel: {} ({}) beat {} ({})",
        winner_id,
        winner_district,
        loser_id,
        loser_district
    );

    Ok(DuelOutcome::Fought {
        winner: winner_id,
        winner_district,
        loser: loser_id,
        loser_district,
        eliminated,
    })
}

/// Reject pairs that could not have come out of dueler selection
fn check_pair(pair: &DuelPair) -> Result<(), GamesError> {
    for (slot, expected) in [(&pair.odd, Parity::Odd), (&pair.even, Parity::Even)] {
        if let Some(person) = slot {
            if person.parity() != expected {
                return Err(GamesError::ParityMismatch {
                    person: person.id,
                    expected,
                    actual: person.parity(),
                });
            }
        }
    }

    if let (Some(odd), Some(even)) = (&pair.odd, &pair.even) {
        if odd.district == even.district {
            return Err(GamesError::SameDistrict(odd.district));
        }
    }

    Ok(())
}

/// Decide which side wins
fn duel<R: UniformSource + ?Sized>(
    odd: &Person,
    even: &Person,
    config: &TournamentConfig,
    rng: &mut R,
) -> Parity {
    let mut odd_score = odd.effectiveness as i64;
    let mut even_score = even.effectiveness as i64;

    if let DuelPolicy::Dice { sides } = config.duel_policy {
        if sides > 0 {
            odd_score += rng.next_uniform(sides as usize) as i64;
            even_score += rng.next_uniform(sides as usize) as i64;
        }
    }

    match odd_score.cmp(&even_score) {
        std::cmp::Ordering::Greater => Parity::Odd,
        std::cmp::Ordering::Less => Parity::Even,
        std::cmp::Ordering::Equal => match config.tie_break {
            TieBreak::Odd => Parity::Odd,
            TieBreak::Even => Parity::Even,
        },
    }
}

/// Return a person to their district; false if the district is gone
fn send_back(tree: &mut EliminationTree, person: Person) -> Result<bool, GamesError> {
    match tree.find_mut(person.district) {
        Some(district) => {
            district.add_person(person)?;
            Ok(true)
        }
        None => {
            tracing::debug!(
                "District {} already eliminated, dropping {}",
                person.district,
                person.id
            );
            Ok(false)
        }
    }
}

/// Eliminate a district that lost one of its sides
fn check_district(tree: &mut EliminationTree, id: DistrictId) -> Option<DistrictId> {
    if tree.find(id)?.is_viable() {
        return None;
    }
    let removed = tree.delete(id)?;
    tracing::debug!("District {} eliminated", removed.id);
    Some(removed.id)
}
