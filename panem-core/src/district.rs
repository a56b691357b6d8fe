//! Districts and the pre-admission catalog

use serde::{Deserialize, Serialize};

use crate::error::GamesError;
use crate::person::{Parity, Person, PersonId, Population};

/// District identifier, the sole ordering key of the elimination tree
pub type DistrictId = i32;

/// An administrative unit holding an odd and an even population
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct District {
    pub id: DistrictId,
    odd: Population,
    even: Population,
}

impl District {
    pub fn new(id: DistrictId) -> Self {
        Self {
            id,
            odd: Population::new(),
            even: Population::new(),
        }
    }

    pub fn population(&self, parity: Parity) -> &Population {
        match parity {
            Parity::Odd => &self.odd,
            Parity::Even => &self.even,
        }
    }

    pub fn population_mut(&mut self, parity: Parity) -> &mut Population {
        match parity {
            Parity::Odd => &mut self.odd,
            Parity::Even => &mut self.even,
        }
    }

    pub fn odd_population(&self) -> &Population {
        &self.odd
    }

    pub fn even_population(&self) -> &Population {
        &self.even
    }

    /// Both sides still have someone to send
    pub fn is_viable(&self) -> bool {
        !self.odd.is_empty() && !self.even.is_empty()
    }

    pub fn size(&self) -> usize {
        self.odd.len() + self.even.len()
    }

    pub fn contains(&self, id: PersonId) -> bool {
        self.odd.contains(id) || self.even.contains(id)
    }

    /// Insert a person into the container matching their parity.
    ///
    /// A person already present in either container means a duel pair was
    /// built from a person that never left the registry.
    pub fn add_person(&mut self, person: Person) -> Result<(), GamesError> {
        if self.contains(person.id) {
            return Err(GamesError::DuplicatePerson {
                person: person.id,
                district: self.id,
            });
        }
        self.population_mut(person.parity()).push(person);
        Ok(())
    }

    /// Take a person out of the given side
    pub fn take_person(&mut self, parity: Parity, id: PersonId) -> Option<Person> {
        self.population_mut(parity).remove(id)
    }
}

// ============================================================================
// CATALOG
// ============================================================================

/// Districts that have not been admitted to the tournament yet, in setup order
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Catalog {
    districts: Vec<District>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.districts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.districts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &District> {
        self.districts.iter()
    }

    /// Identifiers in catalog order
    pub fn ids(&self) -> Vec<DistrictId> {
        self.districts.iter().map(|d| d.id).collect()
    }

    pub fn get(&self, id: DistrictId) -> Option<&District> {
        self.districts.iter().find(|d| d.id == id)
    }

    pub fn get_mut(&mut self, id: DistrictId) -> Option<&mut District> {
        self.districts.iter_mut().find(|d| d.id == id)
    }

    pub fn push(&mut self, district: District) {
        self.districts.push(district);
    }

    /// Remove a district for admission, keeping the order of the rest
    pub fn take(&mut self, id: DistrictId) -> Option<District> {
        let index = self.districts.iter().position(|d| d.id == id)?;
        Some(self.districts.remove(index))
    }

    /// Remove the first district in catalog order
    pub fn take_first(&mut self) -> Option<District> {
        if self.districts.is_empty() {
            None
        } else {
            Some(self.districts.remove(0))
        }
    }
}
