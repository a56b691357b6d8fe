//! Error types for the games core
//!
//! Missing districts are never errors here: lookups return `Option` and
//! eliminations of absent districts are no-ops. The variants below are
//! invariant violations and should abort a simulation run.

use crate::district::DistrictId;
use crate::person::{Parity, PersonId};

/// Invariant violations raised by tree, selection and duel operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GamesError {
    #[error("District {0} is not in the catalog")]
    NotInCatalog(DistrictId),

    #[error("Both contestants belong to district {0}")]
    SameDistrict(DistrictId),

    #[error("Person {person} has {actual:?} parity but was placed on the {expected:?} side")]
    ParityMismatch {
        person: PersonId,
        expected: Parity,
        actual: Parity,
    },

    #[error("Person {person} is already present in district {district}")]
    DuplicatePerson {
        person: PersonId,
        district: DistrictId,
    },

    #[error("Elimination tree is inconsistent: {0}")]
    Inconsistent(String),
}

/// Errors produced while reading setup input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("Unexpected end of input while reading {0}")]
    UnexpectedEof(&'static str),

    #[error("Invalid {field} '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Duplicate district id {0}")]
    DuplicateDistrict(DistrictId),

    #[error("Birth month {month} of {name} is outside 1..=12")]
    InvalidBirthMonth { name: String, month: u32 },
}
