//! Test fixtures and helpers.
//!
//! Ready-made blueprints covering each unit type, for consistent testing.

use duel_core::blueprint::{Blueprint, MotiveType, UnitProfile, UnitType};

/// Validate a fixture blueprint.
///
/// # Panics
///
/// Panics if the blueprint is missing mandatory fields.
#[must_use]
pub fn profile(blueprint: &Blueprint) -> UnitProfile {
    blueprint
        .validate()
        .unwrap_or_else(|e| panic!("fixture blueprint is invalid: {e}"))
}

/// Fire-support Mech with long-range missiles.
#[must_use]
pub fn catapult() -> Blueprint {
    Blueprint::new("Catapult CPLT-C1", UnitType::Mech, 5, 5, [2, 3, 2], 8)
        .with_jump(8)
        .with_specials(&["IF2", "LRM1/2/2"])
        .with_points(32)
}

/// Energy-armed Mech with heat-causing weapons.
#[must_use]
pub fn hellbringer() -> Blueprint {
    Blueprint::new("Hellbringer Prime", UnitType::Mech, 6, 3, [4, 4, 2], 10)
        .with_specials(&["ENE", "CASE", "HT1/1/0"])
        .with_points(43)
}

/// Slow, heavily armored Mech.
#[must_use]
pub fn atlas() -> Blueprint {
    Blueprint::new("Atlas AS7-D", UnitType::Mech, 10, 8, [5, 5, 2], 6)
        .with_specials(&["AC2/2/-", "LRM1/1/1", "IF1"])
        .with_points(52)
}

/// Wheeled vehicle with short-range firepower.
#[must_use]
pub fn demolisher() -> Blueprint {
    Blueprint::new("Demolisher", UnitType::Vehicle, 6, 3, [5, 5, 0], 6)
        .with_motive(MotiveType::Wheeled)
        .with_points(32)
}

/// Fast hover vehicle.
#[must_use]
pub fn saracen() -> Blueprint {
    Blueprint::new("Saracen", UnitType::Vehicle, 3, 2, [2, 2, 1], 14)
        .with_motive(MotiveType::Hover)
        .with_specials(&["SRM2/2"])
        .with_points(23)
}

/// Battle armor squad.
#[must_use]
pub fn elementals() -> Blueprint {
    Blueprint::new("Elemental Point", UnitType::BattleArmor, 4, 2, [2, 1, 0], 2)
        .with_jump(6)
        .with_skill(3)
        .with_specials(&["CASEII"])
        .with_points(32)
}

/// Immobile unit with no weapons; two of them can never finish a battle.
#[must_use]
pub fn statue(name: &str) -> Blueprint {
    Blueprint::new(name, UnitType::Mech, 2, 2, [0, 0, 0], 0)
}

/// A mixed roster of every fixture above except the statue.
#[must_use]
pub fn roster() -> Vec<Blueprint> {
    vec![
        catapult(),
        hellbringer(),
        atlas(),
        demolisher(),
        saracen(),
        elementals(),
    ]
}
