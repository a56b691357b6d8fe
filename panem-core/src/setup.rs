//! Setup input parsing
//!
//! Whitespace-separated tokens:
//!
//! ```text
//! <district count>
//! <district id> ...
//! <person count>
//! <first> <last> <birth month> <age> <district id> <effectiveness>
//! ...
//! ```
//!
//! Persons get `PersonId`s in file order. A person naming a district that
//! was not listed is skipped.

use rustc_hash::FxHashMap;
use std::str::FromStr;

use crate::district::{Catalog, District, DistrictId};
use crate::error::SetupError;
use crate::person::{Person, PersonId};

/// Parsed setup: every district in the catalog, populated
#[derive(Clone, Debug, Default)]
pub struct Setup {
    pub catalog: Catalog,
    /// Persons placed into a district
    pub placed: usize,
    /// Persons skipped because their district is unknown
    pub dropped: Vec<PersonId>,
}

/// Parse a complete setup from text
pub fn parse_setup(input: &str) -> Result<Setup, SetupError> {
    let mut tokens = input.split_whitespace();

    let district_count: usize = next_value(&mut tokens, "district count")?;
    let mut districts: Vec<District> = Vec::with_capacity(district_count);
    let mut index: FxHashMap<DistrictId, usize> = FxHashMap::default();

    for _ in 0..district_count {
        let id: DistrictId = next_value(&mut tokens, "district id")?;
        if index.insert(id, districts.len()).is_some() {
            return Err(SetupError::DuplicateDistrict(id));
        }
        districts.push(District::new(id));
    }

    let person_count: usize = next_value(&mut tokens, "person count")?;
    let mut placed = 0;
    let mut dropped = Vec::new();

    for n in 0..person_count {
        let person = next_person(&mut tokens, PersonId(n as u32))?;

        match index.get(&person.district) {
            Some(&slot) => {
                let parity = person.parity();
                districts[slot].population_mut(parity).push(person);
                placed += 1;
            }
            None => {
                tracing::warn!(
                    "Skipping {} ({}): district {} is not listed",
                    person.full_name(),
                    person.id,
                    person.district
                );
                dropped.push(person.id);
            }
        }
    }

    let mut catalog = Catalog::new();
    for district in districts {
        catalog.push(district);
    }

    Ok(Setup {
        catalog,
        placed,
        dropped,
    })
}

fn next_person<'a, I>(tokens: &mut I, id: PersonId) -> Result<Person, SetupError>
where
    I: Iterator<Item = &'a str>,
{
    let first_name = next_token(tokens, "first name")?;
    let last_name = next_token(tokens, "last name")?;
    let birth_month: u32 = next_value(tokens, "birth month")?;
    let age: u32 = next_value(tokens, "age")?;
    let district: DistrictId = next_value(tokens, "district id")?;
    let effectiveness: i32 = next_value(tokens, "effectiveness")?;

    if !(1..=12).contains(&birth_month) {
        return Err(SetupError::InvalidBirthMonth {
            name: format!("{} {}", first_name, last_name),
            month: birth_month,
        });
    }

    Ok(Person::new(
        id,
        first_name,
        last_name,
        birth_month,
        age,
        district,
        effectiveness,
    ))
}

fn next_token<'a, I>(tokens: &mut I, field: &'static str) -> Result<&'a str, SetupError>
where
    I: Iterator<Item = &'a str>,
{
    tokens.next().ok_or(SetupError::UnexpectedEof(field))
}

fn next_value<'a, T, I>(tokens: &mut I, field: &'static str) -> Result<T, SetupError>
where
    T: FromStr,
    I: Iterator<Item = &'a str>,
{
    let token = next_token(tokens, field)?;
    token.parse().map_err(|_| SetupError::InvalidNumber {
        field,
        value: token.to_string(),
    })
}
