//! Integration tests for the PANEM tournament
//!
//! Tests the full stack: setup parsing, admission, selection, duels and
//! elimination, against the bundled sample and generated setups.

use panem_core::{
    parse_setup, select_duelers, Catalog, District, DistrictId, DuelOutcome, Parity, Person,
    PersonId, StopReason, Tournament, TournamentConfig,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST FIXTURES
// ============================================================================

const SAMPLE: &str = include_str!("../../data/panem.in");

/// Random but reproducible catalog where every district starts viable
fn generated_catalog(seed: u64, districts: &[DistrictId], per_side: u32) -> Catalog {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut catalog = Catalog::new();
    let mut next = 0;

    for &id in districts {
        let mut district = District::new(id);
        for i in 0..per_side * 2 {
            let odd_month = rng.gen_range(0..6) * 2 + 1;
            let month = if i % 2 == 0 { odd_month } else { odd_month + 1 };
            let age = rng.gen_range(10..40);
            let effectiveness = rng.gen_range(0..100);
            district
                .add_person(Person::new(PersonId(next), "Gen", "Erated", month, age, id, effectiveness))
                .unwrap();
            next += 1;
        }
        catalog.push(district);
    }

    catalog
}

fn has_eligible(tournament: &Tournament, parity: Parity) -> bool {
    tournament
        .tree()
        .pre_order()
        .any(|d| d.population(parity).first_eligible().is_some())
}

// ============================================================================
// SAMPLE SETUP
// ============================================================================

#[test]
fn test_sample_setup_parses() {
    let setup = parse_setup(SAMPLE).unwrap();

    assert_eq!(setup.catalog.len(), 12);
    assert_eq!(setup.placed, 48);
    assert_eq!(setup.dropped, vec![PersonId(48)]);
}

#[test]
fn test_sample_tournament_is_reproducible() {
    let play = || {
        let setup = parse_setup(SAMPLE).unwrap();
        let config = TournamentConfig::default();
        let mut rng = config.rng();
        let mut tournament = Tournament::from_setup(setup, config);
        tournament.admit_all();
        tournament.run(&mut rng).unwrap()
    };

    let first = play();
    let second = play();
    assert_eq!(first, second);
    assert!(first.rounds_played > 0);
}

#[test]
fn test_sample_tournament_keeps_tree_valid() {
    let setup = parse_setup(SAMPLE).unwrap();
    let mut tournament = Tournament::from_setup(setup, TournamentConfig::default());
    tournament.admit_all();
    let mut rng = tournament.config().rng();

    let result = tournament
        .run_with(&mut rng, |report| {
            if let DuelOutcome::Fought {
                winner_district,
                loser_district,
                ..
            } = report.outcome
            {
                assert_ne!(winner_district, loser_district);
            }
        })
        .unwrap();

    assert!(tournament.tree().validate().is_ok());
    assert_eq!(result.survivors.len(), tournament.surviving_count());
    for elimination in &result.eliminations {
        assert!(tournament.find_district(elimination.district).is_none());
    }
}

// ============================================================================
// TREE SCENARIOS
// ============================================================================

#[test]
fn test_admission_order_shapes_tree() {
    let catalog = generated_catalog(1, &[5, 3, 8, 1, 4, 7, 9], 1);
    let mut tournament = Tournament::new(catalog, TournamentConfig::default());
    tournament.admit_all();

    assert_eq!(tournament.tree().in_order_ids(), vec![1, 3, 4, 5, 7, 8, 9]);

    let root = tournament.root().unwrap();
    tournament.eliminate_district(5);

    assert_eq!(tournament.root(), Some(root));
    assert_eq!(tournament.tree().root_district().map(|d| d.id), Some(7));
    assert_eq!(tournament.tree().in_order_ids(), vec![1, 3, 4, 7, 8, 9]);
    assert!(tournament.find_district(5).is_none());
}

#[test]
fn test_partial_admission_leaves_catalog() {
    let catalog = generated_catalog(2, &[5, 3, 8, 1], 1);
    let mut tournament = Tournament::new(catalog, TournamentConfig::default());

    tournament.admit_district(8).unwrap();
    tournament.admit_district(1).unwrap();

    assert_eq!(tournament.catalog().ids(), vec![5, 3]);
    assert_eq!(tournament.tree().pre_order_ids(), vec![8, 1]);
}

// ============================================================================
// SELECTION PROPERTIES
// ============================================================================

#[test]
fn test_selection_properties_hold_every_round() {
    for seed in 0..20 {
        let catalog = generated_catalog(seed, &[6, 2, 9, 1, 4, 7, 11, 3], 3);
        let mut tournament = Tournament::new(catalog, TournamentConfig::default());
        tournament.admit_all();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        while tournament.surviving_count() > 1 {
            let eligible_odd = has_eligible(&tournament, Parity::Odd);

            let pair = tournament.select_duelers(&mut rng);
            let odd = pair.odd.clone().unwrap();
            let even = pair.even.clone().unwrap();

            assert_ne!(odd.district, even.district);
            assert_eq!(odd.parity(), Parity::Odd);
            assert_eq!(even.parity(), Parity::Even);
            if eligible_odd {
                assert!(odd.eligible, "seed {}: ineligible odd chosen", seed);
            }

            let outcome = tournament.resolve_duel(pair, &mut rng).unwrap();
            if let Some(id) = outcome.eliminated() {
                assert!(tournament.find_district(id).is_none());
            }
            for district in tournament.tree().pre_order() {
                assert!(district.is_viable());
            }
        }
    }
}

#[test]
fn test_lone_eligible_odd_scenario() {
    let mut lone = District::new(1);
    lone.add_person(Person::new(PersonId(0), "Young", "Odd", 3, 15, 1, 10))
        .unwrap();
    lone.add_person(Person::new(PersonId(1), "Old", "Even", 4, 40, 1, 10))
        .unwrap();

    let mut catalog = Catalog::new();
    catalog.push(lone.clone());
    let mut tournament = Tournament::new(catalog, TournamentConfig::default());
    tournament.admit_all();

    let pair = tournament.select_duelers(&mut ChaCha8Rng::seed_from_u64(0));
    assert_eq!(pair.odd.as_ref().map(|p| p.id), Some(PersonId(0)));
    assert!(pair.even.is_none());

    // With a second district, the even side comes from there
    let mut other = District::new(2);
    other
        .add_person(Person::new(PersonId(2), "Other", "Even", 6, 40, 2, 10))
        .unwrap();
    let mut catalog = Catalog::new();
    catalog.push(lone);
    catalog.push(other);
    let mut tournament = Tournament::new(catalog, TournamentConfig::default());
    tournament.admit_all();

    let mut tree = tournament.tree().clone();
    let pair = select_duelers(&mut tree, &mut ChaCha8Rng::seed_from_u64(0));
    assert_eq!(pair.odd.as_ref().map(|p| p.id), Some(PersonId(0)));
    assert_eq!(pair.even.as_ref().map(|p| p.id), Some(PersonId(2)));
}

// ============================================================================
// FULL RUNS
// ============================================================================

#[test]
fn test_viable_catalog_always_crowns_champion() {
    for seed in 0..10 {
        let catalog = generated_catalog(seed, &[10, 4, 15, 2, 7, 12, 20], 2);
        let config = TournamentConfig::default().with_seed(seed);
        let mut rng = config.rng();
        let mut tournament = Tournament::new(catalog, config);
        tournament.admit_all();

        let result = tournament.run(&mut rng).unwrap();

        assert_eq!(result.stop_reason, StopReason::Champion);
        assert_eq!(result.eliminations.len(), 6);
        assert_eq!(result.champion, tournament.tree().root_district().map(|d| d.id));
    }
}

#[test]
fn test_different_seeds_can_diverge() {
    let outcomes: Vec<_> = (0..8)
        .map(|seed| {
            let catalog = generated_catalog(99, &[10, 4, 15, 2, 7, 12, 20], 3);
            let config = TournamentConfig::default()
                .with_seed(seed)
                .with_duel_policy(panem_core::DuelPolicy::Dice { sides: 50 });
            let mut rng = config.rng();
            let mut tournament = Tournament::new(catalog, config);
            tournament.admit_all();
            tournament.run(&mut rng).unwrap().eliminations
        })
        .collect();

    assert!(outcomes.iter().any(|o| o != &outcomes[0]));
}
