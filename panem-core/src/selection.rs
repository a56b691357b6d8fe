//! Dueler selection
//!
//! Picks one odd-side and one even-side contestant from different districts.
//! Eligible persons are preferred; otherwise a uniform draw is made within the
//! first district (in pre-order) that still has someone on the needed side.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::district::DistrictId;
use crate::person::{Parity, Person, PersonId};
use crate::tree::EliminationTree;

/// Source of uniformly distributed indices
pub trait UniformSource {
    /// Uniform integer in `[0, bound)`. `bound` must be non-zero.
    fn next_uniform(&mut self, bound: usize) -> usize;
}

impl<R: Rng> UniformSource for R {
    fn next_uniform(&mut self, bound: usize) -> usize {
        self.gen_range(0..bound)
    }
}

/// Up to one contestant per parity, taken out of their districts
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuelPair {
    pub odd: Option<Person>,
    pub even: Option<Person>,
}

impl DuelPair {
    pub fn new(odd: Option<Person>, even: Option<Person>) -> Self {
        Self { odd, even }
    }

    /// No contestant on either side
    pub fn is_empty(&self) -> bool {
        self.odd.is_none() && self.even.is_none()
    }

    /// Exactly one contestant
    pub fn is_bye(&self) -> bool {
        self.odd.is_some() != self.even.is_some()
    }
}

/// Where a contestant was found
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Candidate {
    district: DistrictId,
    person: PersonId,
}

/// Select and remove the next pair of duelers.
///
/// Precedence: eligible odd, eligible even (excluding the odd district),
/// random odd (excluding the even district), random even (excluding the odd
/// district). Draws happen only for sides with no eligible candidate, odd
/// side first.
pub fn select_duelers<R: UniformSource + ?Sized>(tree: &mut EliminationTree, rng: &mut R) -> DuelPair {
    let odd = find_eligible(tree, Parity::Odd, None);
    let even = find_eligible(tree, Parity::Even, odd.map(|c| c.district));

    let odd = odd.or_else(|| find_random(tree, Parity::Odd, even.map(|c| c.district), rng));
    let even = even.or_else(|| find_random(tree, Parity::Even, odd.map(|c| c.district), rng));

    let pair = DuelPair {
        odd: odd.and_then(|c| take(tree, Parity::Odd, c)),
        even: even.and_then(|c| take(tree, Parity::Even, c)),
    };

    tracing::debug!(
        "Selected duelers: odd={:?} even={:?}",
        pair.odd.as_ref().map(|p| (p.id, p.district)),
        pair.even.as_ref().map(|p| (p.id, p.district))
    );

    pair
}

/// First eligible person of the given parity in pre-order
fn find_eligible(
    tree: &EliminationTree,
    parity: Parity,
    exclude: Option<DistrictId>,
) -> Option<Candidate> {
    tree.pre_order()
        .filter(|d| Some(d.id) != exclude)
        .find_map(|d| {
            d.population(parity).first_eligible().map(|p| Candidate {
                district: d.id,
                person: p.id,
            })
        })
}

/// Uniform pick within the first non-excluded district with someone of the given parity
fn find_random<R: UniformSource + ?Sized>(
    tree: &EliminationTree,
    parity: Parity,
    exclude: Option<DistrictId>,
    rng: &mut R,
) -> Option<Candidate> {
    let district = tree
        .pre_order()
        .filter(|d| Some(d.id) != exclude)
        .find(|d| !d.population(parity).is_empty())?;

    let population = district.population(parity);
    let index = rng.next_uniform(population.len());
    population.get(index).map(|p| Candidate {
        district: district.id,
        person: p.id,
    })
}

fn take(tree: &mut EliminationTree, parity: Parity, candidate: Candidate) -> Option<Person> {
    tree.find_mut(candidate.district)?
        .take_person(parity, candidate.person)
}
