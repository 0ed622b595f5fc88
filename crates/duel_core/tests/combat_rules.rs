//! End-to-end combat rule checks through the public API.

use duel_core::damage::{apply_damage, motive_check};
use duel_core::prelude::*;
use duel_core::range::select_range;
use duel_test_utils::fixtures;

/// Dice whose crit and to-hit rolls fall back to 5.
fn quiet() -> ScriptedDice {
    ScriptedDice::repeating(5, 6, 100)
}

fn unit(armor: u32, structure: u32, specials: &[&str]) -> CombatUnit {
    let profile = fixtures::profile(
        &Blueprint::new("Target", UnitType::Mech, armor, structure, [1, 1, 1], 8)
            .with_specials(specials),
    );
    CombatUnit::new(&profile)
}

fn plain_hit(target: &mut CombatUnit, damage: u32, dice: &mut ScriptedDice) -> DamageReport {
    apply_damage(target, damage, RangeBand::Medium, &SpecialSet::new(), false, dice)
}

#[test]
fn test_armor_absorbs_small_hit() {
    let mut target = unit(5, 5, &[]);
    let mut dice = quiet();
    let report = plain_hit(&mut target, 3, &mut dice);

    assert_eq!((target.armor, target.structure), (2, 5));
    assert!(report.crits.is_empty());
    assert_eq!(dice.two_d6_rolled(), 0);
}

#[test]
fn test_exposed_structure() {
    let mut doomed = unit(0, 3, &[]);
    let report = plain_hit(&mut doomed, 3, &mut quiet());
    assert!(report.destroyed);

    let mut survivor = unit(0, 3, &[]);
    let mut dice = quiet();
    let report = plain_hit(&mut survivor, 2, &mut dice);
    assert_eq!(survivor.structure, 1);
    assert_eq!(report.crits.len(), 1);
    assert_eq!(dice.two_d6_rolled(), 1);
}

#[test]
fn test_case_crit_costs_one_point() {
    let mut target = unit(0, 6, &["CASE"]);
    let mut dice = quiet().with_two_d6(&[2]);
    plain_hit(&mut target, 1, &mut dice);
    // 1 from the hit, 1 from the contained explosion
    assert_eq!(target.structure, 4);
    assert!(!target.is_destroyed());
}

#[test]
fn test_second_engine_hit_destroys() {
    let mut target = unit(0, 10, &[]);
    let mut dice = quiet().with_two_d6(&[3, 11]);
    plain_hit(&mut target, 1, &mut dice);
    assert!(target.has_flag(CritFlag::EngineHit));
    assert!(!target.is_destroyed());

    let report = plain_hit(&mut target, 1, &mut dice);
    assert!(report.destroyed);
    assert_eq!(report.crits, vec![CritEffect::EngineHit]);
}

#[test]
fn test_fixed_long_resolves_to_medium() {
    let a = CombatUnit::new(&fixtures::profile(&fixtures::catapult()));
    let b = CombatUnit::new(&fixtures::profile(&fixtures::atlas()));
    let mut dice = quiet();
    for round in 1..10 {
        let band = select_range(RangeMode::Long, round, RangeBand::Long, &a, &b, &mut dice);
        assert_eq!(band, RangeBand::Medium);
    }
}

#[test]
fn test_statues_draw_at_round_cap() {
    let a = fixtures::profile(&fixtures::statue("North"));
    let b = fixtures::profile(&fixtures::statue("South"));
    for mode in ["short", "random", "fast_approach", "min_damage"] {
        let config = BattleConfig::default()
            .with_range_mode(RangeMode::from_name(mode))
            .with_round_cap(30);
        let outcome = run_battle(&a, &b, &config, &mut SeededDice::new(11));
        assert_eq!(outcome.state, BattleState::RoundCapReached, "mode {mode}");
        assert_eq!(outcome.winner, Winner::Tie);
        assert_eq!(outcome.rounds, 30);
    }
}

#[test]
fn test_vehicle_motive_check_before_damage() {
    let profile = fixtures::profile(&fixtures::demolisher());
    let mut vehicle = CombatUnit::new(&profile);
    // wheeled +1: 11 loses half rounded up
    let mut dice = ScriptedDice::repeating(10, 6, 100);
    assert_eq!(motive_check(&mut vehicle, &mut dice), 3);
    assert_eq!(vehicle.movement, 3);
}

#[test]
fn test_seeded_battles_reproduce() {
    let a = fixtures::profile(&fixtures::hellbringer());
    let b = fixtures::profile(&fixtures::saracen());
    let config = BattleConfig::default()
        .with_range_mode(RangeMode::Random)
        .with_terrain([25, 25, 25], [10, 10, 10]);

    for seed in 0..20 {
        let first = run_battle(&a, &b, &config, &mut SeededDice::new(seed));
        let second = run_battle(&a, &b, &config, &mut SeededDice::new(seed));
        assert_eq!(first, second, "seed {seed}");
        assert!(first.rounds >= 1 && first.rounds <= config.round_cap);
    }
}

#[test]
fn test_outcome_matches_state() {
    let a = fixtures::profile(&fixtures::atlas());
    let b = fixtures::profile(&fixtures::elementals());
    let config = BattleConfig::default();

    for seed in 0..50 {
        let outcome = run_battle(&a, &b, &config, &mut SeededDice::new(seed));
        let expected = match outcome.state {
            BattleState::Destroyed(Side::First) => Winner::Second,
            BattleState::Destroyed(Side::Second) => Winner::First,
            BattleState::DestroyedBoth | BattleState::RoundCapReached => Winner::Tie,
            BattleState::InProgress => panic!("finished battle reported in progress"),
        };
        assert_eq!(outcome.winner, expected);
    }
}
