//! Critical-hit effect tables.
//!
//! A crit roll maps directly to a [`CritEffect`] through a per-type table.
//! ProtoMechs, infantry and battle armor have no crit table.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::blueprint::UnitType;
use crate::damage;
use crate::dice::Dice;
use crate::math::half_round_up;
use crate::specials::Special;
use crate::unit::{CombatUnit, CritFlag};

/// Roll reduction granted by the critical-resistant special.
const CRIT_RESISTANCE: u32 = 2;

/// Skill penalty of a fire-control hit.
const FIRE_CONTROL_PENALTY: i32 = 2;

/// Minimum movement lost to a Mech movement hit.
const MIN_MOVEMENT_LOSS: u32 = 2;

/// Effect of a single critical hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CritEffect {
    /// Roll had no effect.
    None,
    /// Armored component absorbed the crit.
    Negated,
    /// Ammunition exploded.
    AmmoExplosion,
    /// Engine damaged.
    EngineHit,
    /// Fire control damaged: +2 skill.
    FireControlHit,
    /// Weapons damaged: -1 damage at every band.
    WeaponHit,
    /// Mech actuators damaged: movement reduced.
    MovementHit,
    /// Vehicle crew stunned for the round.
    CrewStunned,
    /// Vehicle crew killed.
    CrewKilled,
    /// Unit destroyed outright.
    Destroyed,
}

use CritEffect as C;

/// Mech crit table indexed by roll.
const MECH_TABLE: [CritEffect; 13] = [
    C::None,
    C::None,
    C::AmmoExplosion,
    C::EngineHit,
    C::FireControlHit,
    C::None,
    C::WeaponHit,
    C::MovementHit,
    C::WeaponHit,
    C::None,
    C::FireControlHit,
    C::EngineHit,
    C::Destroyed,
];

/// Vehicle crit table indexed by roll.
const VEHICLE_TABLE: [CritEffect; 13] = [
    C::None,
    C::None,
    C::AmmoExplosion,
    C::CrewStunned,
    C::FireControlHit,
    C::FireControlHit,
    C::None,
    C::None,
    C::None,
    C::WeaponHit,
    C::WeaponHit,
    C::CrewKilled,
    C::EngineHit,
];

/// Look up the effect of a (modified) crit roll for a unit type.
#[must_use]
pub fn crit_effect(unit_type: UnitType, roll: u32) -> CritEffect {
    let table = match unit_type {
        UnitType::Mech => &MECH_TABLE,
        UnitType::Vehicle => &VEHICLE_TABLE,
        UnitType::ProtoMech | UnitType::Infantry | UnitType::BattleArmor => return C::None,
    };
    table.get(roll as usize).copied().unwrap_or(C::None)
}

/// Roll and apply a critical hit.
///
/// Effects are appended to `trail` in the order they happen, including
/// crits caused by contained ammo explosions.
pub fn resolve_crit(unit: &mut CombatUnit, dice: &mut impl Dice, trail: &mut Vec<CritEffect>) {
    if unit.specials.remove(Special::ArmoredComponent) {
        debug!(unit = %unit.name, "Armored component negates crit");
        trail.push(C::Negated);
        return;
    }

    let mut roll = dice.two_d6();
    if unit.specials.has(Special::CriticalResistant) {
        roll = roll.saturating_sub(CRIT_RESISTANCE);
    }

    let effect = crit_effect(unit.unit_type, roll);
    debug!(unit = %unit.name, roll, ?effect, "Crit roll");
    trail.push(effect);
    apply_effect(unit, effect, dice, trail);

    if unit.is_destroyed() {
        debug!(unit = %unit.name, ?effect, "Unit destroyed by critical hit");
    }
}

fn apply_effect(
    unit: &mut CombatUnit,
    effect: CritEffect,
    dice: &mut impl Dice,
    trail: &mut Vec<CritEffect>,
) {
    match effect {
        C::None | C::Negated => {}
        C::AmmoExplosion => {
            if unit.specials.ignores_ammo_explosion() {
                debug!(unit = %unit.name, "Ammo explosion ignored");
            } else if unit.specials.has(Special::Case) {
                debug!(unit = %unit.name, "CASE contains ammo explosion");
                damage::absorb(unit, 1, dice, trail);
            } else {
                unit.destroy();
            }
        }
        C::EngineHit => {
            if !unit.set_flag(CritFlag::EngineHit) {
                unit.destroy();
            } else if unit.unit_type == UnitType::Vehicle {
                unit.movement = half_round_up(unit.movement);
                unit.weapons.update(half_round_up);
            }
        }
        C::FireControlHit => unit.skill = unit.skill.saturating_add(FIRE_CONTROL_PENALTY),
        C::WeaponHit => unit.weapons.update(|value| value.saturating_sub(1)),
        C::MovementHit => {
            let loss = half_round_up(unit.movement).max(MIN_MOVEMENT_LOSS);
            unit.movement = unit.movement.saturating_sub(loss);
        }
        C::CrewStunned => {
            unit.set_flag(CritFlag::CrewStunned);
        }
        C::CrewKilled | C::Destroyed => unit.destroy(),
    }
}
