//! Damage mitigation and application.
//!
//! Incoming damage is first mitigated by the defender's specials, then
//! absorbed by armor and structure. Damage that reaches structure without
//! destroying the unit triggers a critical hit.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::blueprint::{RangeBand, UnitType};
use crate::crits::{self, CritEffect};
use crate::dice::Dice;
use crate::math::half_round_up;
use crate::specials::{Special, SpecialSet};
use crate::unit::CombatUnit;

/// Most heat a single hit can add to a Mech.
pub const MAX_HEAT_PER_HIT: u32 = 2;

/// What a single hit did to its target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageReport {
    /// Damage left after mitigation.
    pub mitigated: u32,
    /// Points taken by armor.
    pub armor_damage: u32,
    /// Points taken by structure.
    pub structure_damage: u32,
    /// Heat added to the target.
    pub heat_added: u32,
    /// Crit effects in the order they happened.
    pub crits: Vec<CritEffect>,
    /// Whether the hit destroyed the target.
    pub destroyed: bool,
}

/// Points absorbed by each pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Absorbed {
    pub armor: u32,
    pub structure: u32,
}

/// Apply a hit of `raw_damage` fired at `band` by an attacker with
/// `attacker` specials.
pub fn apply_damage(
    unit: &mut CombatUnit,
    raw_damage: u32,
    band: RangeBand,
    attacker: &SpecialSet,
    is_area_effect: bool,
    dice: &mut impl Dice,
) -> DamageReport {
    let (damage, heat) = mitigate(unit, raw_damage, band, attacker, is_area_effect);
    debug!(unit = %unit.name, raw_damage, damage, heat, %band, "Applying damage");

    let mut report = DamageReport {
        mitigated: damage,
        ..DamageReport::default()
    };
    let absorbed = absorb(unit, damage, dice, &mut report.crits);
    report.armor_damage = absorbed.armor;
    report.structure_damage = absorbed.structure;
    report.destroyed = unit.is_destroyed();

    if !report.destroyed && unit.unit_type.tracks_heat() {
        report.heat_added = heat.min(MAX_HEAT_PER_HIT);
        unit.heat = unit.heat.saturating_add(report.heat_added);
    }
    report
}

/// Mitigated `(damage, heat)` for a hit on `unit`.
fn mitigate(
    unit: &CombatUnit,
    raw_damage: u32,
    band: RangeBand,
    attacker: &SpecialSet,
    is_area_effect: bool,
) -> (u32, u32) {
    let defender = &unit.specials;
    let mut damage = raw_damage;
    let mut heat = attacker.heat_at(band);

    if defender.has(Special::ReflectiveArmor) && attacker.has(Special::Energy) {
        damage /= 2;
        heat /= 2;
    } else if heat > 0 {
        heat /= 2;
        damage = damage.saturating_sub(heat);
    }

    if defender.has(Special::Shield) && !is_area_effect {
        damage = damage.saturating_sub(1);
    }
    if defender.has_anti_missile() && attacker.fires_missiles() {
        damage = damage.saturating_sub(1);
    }

    if !unit.unit_type.tracks_heat() {
        damage = damage.saturating_add(heat);
        heat = 0;
    }
    (damage, heat)
}

/// Put `damage` into armor, then structure, rolling a crit when structure
/// is damaged but survives.
pub(crate) fn absorb(
    unit: &mut CombatUnit,
    damage: u32,
    dice: &mut impl Dice,
    crits: &mut Vec<CritEffect>,
) -> Absorbed {
    if damage <= unit.armor {
        unit.armor -= damage;
        return Absorbed {
            armor: damage,
            structure: 0,
        };
    }

    let armor = unit.armor;
    let carry = damage - armor;
    unit.armor = 0;

    if carry < unit.structure {
        unit.structure -= carry;
        debug!(unit = %unit.name, carry, structure = unit.structure, "Structure damaged");
        crits::resolve_crit(unit, dice, crits);
        Absorbed {
            armor,
            structure: carry,
        }
    } else {
        let structure = unit.structure;
        unit.destroy();
        debug!(unit = %unit.name, "Unit destroyed");
        Absorbed { armor, structure }
    }
}

/// Vehicle motive check after being hit. Returns the movement lost.
///
/// Other unit types are unaffected.
pub fn motive_check(unit: &mut CombatUnit, dice: &mut impl Dice) -> u32 {
    if unit.unit_type != UnitType::Vehicle {
        return 0;
    }

    let roll = dice.two_d6() + unit.motive.motive_bonus();
    let before = unit.movement;
    unit.movement = match roll {
        9 | 10 => before.saturating_sub(2),
        11 => before - half_round_up(before),
        r if r >= 12 => 0,
        _ => before,
    };

    let lost = before - unit.movement;
    debug!(unit = %unit.name, roll, lost, movement = unit.movement, "Motive check");
    lost
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint::{Blueprint, MotiveType};
    use crate::dice::ScriptedDice;

    fn unit(unit_type: UnitType, armor: u32, structure: u32, specials: &[&str]) -> CombatUnit {
        let profile = Blueprint::new("Target", unit_type, armor, structure, [2, 2, 2], 8)
            .with_specials(specials)
            .validate()
            .unwrap();
        CombatUnit::new(&profile)
    }

    fn hit(
        target: &mut CombatUnit,
        damage: u32,
        attacker: &[&str],
        dice: &mut ScriptedDice,
    ) -> DamageReport {
        let attacker = SpecialSet::from_tokens(attacker);
        let area = attacker.is_area_effect();
        apply_damage(target, damage, RangeBand::Short, &attacker, area, dice)
    }

    /// Crit rolls fall back to 5 (no effect on both tables).
    fn quiet_dice() -> ScriptedDice {
        ScriptedDice::repeating(5, 6, 100)
    }

    #[test]
    fn test_armor_only_no_crit() {
        let mut target = unit(UnitType::Mech, 5, 5, &[]);
        let mut dice = quiet_dice();
        let report = hit(&mut target, 3, &[], &mut dice);

        assert_eq!(target.armor, 2);
        assert_eq!(target.structure, 5);
        assert!(report.crits.is_empty());
        assert_eq!(dice.two_d6_rolled(), 0);
    }

    #[test]
    fn test_damage_equal_to_armor_never_destroys() {
        let mut target = unit(UnitType::Mech, 4, 1, &[]);
        let report = hit(&mut target, 4, &[], &mut quiet_dice());
        assert_eq!(target.armor, 0);
        assert_eq!(target.structure, 1);
        assert!(!report.destroyed);
    }

    #[test]
    fn test_damage_equal_to_structure_destroys() {
        let mut target = unit(UnitType::Mech, 0, 3, &[]);
        let mut dice = quiet_dice();
        let report = hit(&mut target, 3, &[], &mut dice);
        assert!(report.destroyed);
        assert!(target.is_destroyed());
        assert_eq!(dice.two_d6_rolled(), 0, "destroying hit rolls no crit");
    }

    #[test]
    fn test_structure_damage_rolls_one_crit() {
        let mut target = unit(UnitType::Mech, 0, 3, &[]);
        let mut dice = quiet_dice();
        let report = hit(&mut target, 2, &[], &mut dice);
        assert_eq!(target.structure, 1);
        assert_eq!(report.crits, vec![CritEffect::None]);
        assert_eq!(dice.two_d6_rolled(), 1);
    }

    #[test]
    fn test_case_follow_on_is_one_point() {
        let mut target = unit(UnitType::Mech, 0, 5, &["CASE"]);
        let mut dice = quiet_dice().with_two_d6(&[2]);
        let report = hit(&mut target, 2, &[], &mut dice);

        assert_eq!(target.structure, 2);
        assert_eq!(report.crits, vec![CritEffect::AmmoExplosion, CritEffect::None]);
    }

    #[test]
    fn test_heat_on_mech() {
        let mut target = unit(UnitType::Mech, 10, 5, &[]);
        // HT4: half (2) subtracted from damage, half (2) added as heat
        let report = hit(&mut target, 5, &["HT4/0/0"], &mut quiet_dice());
        assert_eq!(report.mitigated, 3);
        assert_eq!(report.heat_added, 2);
        assert_eq!(target.heat, 2);
    }

    #[test]
    fn test_heat_capped_per_hit() {
        let mut target = unit(UnitType::Mech, 10, 5, &[]);
        let report = hit(&mut target, 6, &["HT6/0/0"], &mut quiet_dice());
        assert_eq!(report.mitigated, 3);
        assert_eq!(report.heat_added, 2);
    }

    #[test]
    fn test_heat_becomes_damage_on_vehicle() {
        let mut target = unit(UnitType::Vehicle, 10, 5, &[]);
        let report = hit(&mut target, 5, &["HT4/0/0"], &mut quiet_dice());
        assert_eq!(report.mitigated, 5);
        assert_eq!(report.heat_added, 0);
        assert_eq!(target.heat, 0);
    }

    #[test]
    fn test_huge_hit_on_vehicle_saturates() {
        let mut target = unit(UnitType::Vehicle, 10, 5, &[]);
        let report = hit(&mut target, u32::MAX, &["HT4294967295/0/0"], &mut quiet_dice());
        assert_eq!(report.mitigated, u32::MAX);
        assert!(report.destroyed);
    }

    #[test]
    fn test_reflective_armor_against_energy() {
        let mut target = unit(UnitType::Mech, 10, 5, &["RFA"]);
        let report = hit(&mut target, 5, &["ENE", "HT3/0/0"], &mut quiet_dice());
        assert_eq!(report.mitigated, 2);
        assert_eq!(report.heat_added, 1);
    }

    #[test]
    fn test_shield_and_area_effect() {
        let mut target = unit(UnitType::Mech, 10, 5, &["SHLD"]);
        assert_eq!(hit(&mut target, 3, &[], &mut quiet_dice()).mitigated, 2);
        assert_eq!(hit(&mut target, 3, &["AE1"], &mut quiet_dice()).mitigated, 3);
    }

    #[test]
    fn test_anti_missile_needs_missile_attacker() {
        let mut target = unit(UnitType::Mech, 10, 5, &["AMS", "RAMS"]);
        assert_eq!(hit(&mut target, 3, &[], &mut quiet_dice()).mitigated, 3);
        assert_eq!(hit(&mut target, 3, &["LRM1/1/1"], &mut quiet_dice()).mitigated, 2);
    }

    #[test]
    fn test_motive_check() {
        let profile = Blueprint::new("Hover", UnitType::Vehicle, 2, 2, [1, 1, 1], 10)
            .with_motive(MotiveType::Hover)
            .validate()
            .unwrap();

        let mut vehicle = CombatUnit::new(&profile);
        // 8 + 1 = 9
        assert_eq!(motive_check(&mut vehicle, &mut ScriptedDice::repeating(8, 6, 100)), 2);
        assert_eq!(vehicle.movement, 8);

        // 10 + 1 = 11: lose half rounded up
        assert_eq!(motive_check(&mut vehicle, &mut ScriptedDice::repeating(10, 6, 100)), 4);
        assert_eq!(vehicle.movement, 4);

        // 7 + 1 = 8: nothing
        assert_eq!(motive_check(&mut vehicle, &mut ScriptedDice::repeating(7, 6, 100)), 0);

        // 12 + 1 = 13: immobilized
        motive_check(&mut vehicle, &mut ScriptedDice::repeating(12, 6, 100));
        assert_eq!(vehicle.movement, 0);
    }

    #[test]
    fn test_motive_check_ignores_mechs() {
        let mut mech = unit(UnitType::Mech, 2, 2, &[]);
        let mut dice = ScriptedDice::repeating(12, 6, 100);
        assert_eq!(motive_check(&mut mech, &mut dice), 0);
        assert_eq!(mech.movement, 8);
        assert_eq!(dice.two_d6_rolled(), 0);
    }
}
