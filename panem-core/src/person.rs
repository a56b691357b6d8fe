//! Persons and the per-district population containers
//!
//! A person lives in exactly one `Population` at a time. Contestants are
//! taken out by `PersonId` and handed back after their duel.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::district::DistrictId;

/// Youngest age that carries priority in dueler selection
pub const ELIGIBLE_MIN_AGE: u32 = 12;
/// First age that no longer carries priority
pub const ELIGIBLE_MAX_AGE: u32 = 18;

// ============================================================================
// TYPES
// ============================================================================

/// Stable handle for a person, assigned once at setup
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PersonId(pub u32);

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Side of a district a person belongs to, derived from birth month
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Parity {
    Odd,
    Even,
}

impl Parity {
    /// Parity of a birth month (even months land on the even side)
    pub fn of_month(birth_month: u32) -> Self {
        if birth_month % 2 == 0 {
            Parity::Even
        } else {
            Parity::Odd
        }
    }

    pub fn other(self) -> Self {
        match self {
            Parity::Odd => Parity::Even,
            Parity::Even => Parity::Odd,
        }
    }
}

/// A tournament participant
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub first_name: String,
    pub last_name: String,
    /// 1..=12
    pub birth_month: u32,
    pub age: u32,
    /// District this person fights for
    pub district: DistrictId,
    /// Base duel strength
    pub effectiveness: i32,
    /// Priority flag, fixed at creation
    pub eligible: bool,
}

impl Person {
    /// Create a person, deriving the eligibility flag from age
    pub fn new(
        id: PersonId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        birth_month: u32,
        age: u32,
        district: DistrictId,
        effectiveness: i32,
    ) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            birth_month,
            age,
            district,
            effectiveness,
            eligible: (ELIGIBLE_MIN_AGE..ELIGIBLE_MAX_AGE).contains(&age),
        }
    }

    pub fn parity(&self) -> Parity {
        Parity::of_month(self.birth_month)
    }

    /// "First Last"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// ============================================================================
// POPULATION
// ============================================================================

/// Ordered container of persons sharing one parity within one district
///
/// Order matters: eligible-first selection scans from the front, and
/// returned duel winners are appended at the back.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Population {
    persons: Vec<Person>,
}

impl Population {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.persons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Person> {
        self.persons.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Person> {
        self.persons.iter()
    }

    pub fn contains(&self, id: PersonId) -> bool {
        self.persons.iter().any(|p| p.id == id)
    }

    /// First person carrying the eligibility flag, in container order
    pub fn first_eligible(&self) -> Option<&Person> {
        self.persons.iter().find(|p| p.eligible)
    }

    /// Append a person at the back
    pub fn push(&mut self, person: Person) {
        self.persons.push(person);
    }

    /// Remove a person by handle, preserving the order of the rest
    pub fn remove(&mut self, id: PersonId) -> Option<Person> {
        let index = self.persons.iter().position(|p| p.id == id)?;
        Some(self.persons.remove(index))
    }

    /// Sum of effectiveness across the container
    pub fn total_effectiveness(&self) -> i64 {
        self.persons.iter().map(|p| p.effectiveness as i64).sum()
    }
}
