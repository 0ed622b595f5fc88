//! To-hit modifier engine.
//!
//! An attack hits when 2d6 meets or beats the target number, which is the
//! sum of the attacker's skill, the range modifier, the defender's movement
//! modifier and the defender's terrain modifier.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::blueprint::{ByBand, RangeBand, UnitType};
use crate::dice::Dice;
use crate::specials::Special;
use crate::unit::CombatUnit;

/// Target-number bonus for each terrain feature the defender uses.
pub const TERRAIN_BONUS: i32 = 2;

/// Movement modifier table.
///
/// A unit that did not move is easy to hit unless it jumped.
#[must_use]
pub const fn movement_table(movement: u32, jumped: bool) -> i32 {
    if movement == 0 && !jumped {
        return -4;
    }
    let base = match movement {
        0..=4 => 0,
        5..=8 => 1,
        9..=12 => 2,
        13..=18 => 3,
        19..=34 => 4,
        _ => 5,
    };
    if jumped {
        base + 1
    } else {
        base
    }
}

/// Defensive movement modifier of a unit.
#[must_use]
pub fn movement_modifier(unit: &CombatUnit) -> i32 {
    let jumping = unit.is_jumping();
    let speed = if jumping { unit.jump } else { unit.movement };
    let mut modifier = movement_table(speed, jumping) - unit.specials.size_penalty();
    if matches!(unit.unit_type, UnitType::ProtoMech | UnitType::BattleArmor) {
        modifier += 1;
    }
    modifier
}

/// Skill after heat, shield and jumping penalties.
#[must_use]
pub fn effective_skill(unit: &CombatUnit) -> i32 {
    let heat = i32::try_from(unit.heat).unwrap_or(i32::MAX);
    let mut skill = unit.skill.saturating_add(heat);
    if unit.specials.has(Special::Shield) {
        skill = skill.saturating_add(1);
    }
    if unit.is_jumping() {
        skill = skill.saturating_add(2);
    }
    skill
}

/// Terrain a unit found cover in this round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainRoll {
    /// Unit is in woods.
    pub woods: bool,
    /// Unit is behind cover.
    pub cover: bool,
}

impl TerrainRoll {
    /// Roll woods and cover for one unit at a band.
    pub fn roll(
        woods_percent: &ByBand<u32>,
        cover_percent: &ByBand<u32>,
        band: RangeBand,
        dice: &mut impl Dice,
    ) -> Self {
        let woods = dice.percentile() <= woods_percent.get(band);
        let cover = dice.percentile() <= cover_percent.get(band);
        Self { woods, cover }
    }

    /// Target-number modifier for attacks against this unit.
    #[must_use]
    pub const fn modifier(self) -> i32 {
        let mut modifier = 0;
        if self.woods {
            modifier += TERRAIN_BONUS;
        }
        if self.cover {
            modifier += TERRAIN_BONUS;
        }
        modifier
    }
}

/// Components of one attack's target number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackModifiers {
    /// Attacker's effective skill, including the stationary bonus.
    pub skill: i32,
    /// Range modifier, including the defender's stealth.
    pub range: i32,
    /// Defender's movement modifier.
    pub movement: i32,
    /// Defender's terrain modifier.
    pub terrain: i32,
}

impl AttackModifiers {
    /// Modifiers for `attacker` firing on `defender` at `band`.
    #[must_use]
    pub fn compute(
        attacker: &CombatUnit,
        defender: &CombatUnit,
        band: RangeBand,
        defender_terrain: TerrainRoll,
    ) -> Self {
        let mut skill = effective_skill(attacker);
        if movement_modifier(attacker) == 0 {
            skill = skill.saturating_sub(1);
        }

        let mut range = band.modifier();
        if defender.specials.has(Special::Stealth) {
            range += band.modifier() / 2;
        }

        Self {
            skill,
            range,
            movement: movement_modifier(defender),
            terrain: defender_terrain.modifier(),
        }
    }

    /// Number the 2d6 roll must meet or beat.
    #[must_use]
    pub const fn target_number(&self) -> i32 {
        target_number(self.skill, self.range, self.movement, self.terrain)
    }

    /// Roll to hit.
    pub fn roll(&self, dice: &mut impl Dice) -> bool {
        roll_to_hit(self.skill, self.range, self.movement, self.terrain, dice)
    }
}

const fn target_number(skill: i32, range_mod: i32, movement_mod: i32, terrain_mod: i32) -> i32 {
    skill
        .saturating_add(range_mod)
        .saturating_add(movement_mod)
        .saturating_add(terrain_mod)
}

/// Roll 2d6 against the summed modifiers.
pub fn roll_to_hit(
    skill: i32,
    range_mod: i32,
    movement_mod: i32,
    terrain_mod: i32,
    dice: &mut impl Dice,
) -> bool {
    let target = target_number(skill, range_mod, movement_mod, terrain_mod);
    let roll = dice.two_d6() as i32;
    let hit = roll >= target;
    debug!(target, roll, hit, "To-hit roll");
    hit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint::Blueprint;
    use crate::dice::ScriptedDice;

    fn unit(unit_type: UnitType, movement: u32, jump: u32, specials: &[&str]) -> CombatUnit {
        let profile = Blueprint::new("Unit", unit_type, 4, 4, [2, 2, 2], movement)
            .with_jump(jump)
            .with_specials(specials)
            .validate()
            .unwrap();
        CombatUnit::new(&profile)
    }

    #[test]
    fn test_movement_table() {
        assert_eq!(movement_table(0, false), -4);
        assert_eq!(movement_table(0, true), 1);
        assert_eq!(movement_table(4, false), 0);
        assert_eq!(movement_table(5, false), 1);
        assert_eq!(movement_table(12, false), 2);
        assert_eq!(movement_table(18, true), 4);
        assert_eq!(movement_table(34, false), 4);
        assert_eq!(movement_table(35, false), 5);
    }

    #[test]
    fn test_movement_modifier_adjustments() {
        assert_eq!(movement_modifier(&unit(UnitType::Mech, 8, 0, &[])), 1);
        // jump 10 > movement 6: table on 10 plus 1
        assert_eq!(movement_modifier(&unit(UnitType::Mech, 6, 10, &[])), 3);
        assert_eq!(movement_modifier(&unit(UnitType::Vehicle, 8, 0, &["LG"])), 0);
        assert_eq!(movement_modifier(&unit(UnitType::BattleArmor, 2, 0, &[])), 1);
    }

    #[test]
    fn test_effective_skill() {
        let mut mech = unit(UnitType::Mech, 6, 8, &["SHLD"]);
        mech.heat = 2;
        // 4 + 2 heat + 1 shield + 2 jumping
        assert_eq!(effective_skill(&mech), 9);
    }

    #[test]
    fn test_stationary_attacker_bonus() {
        let slow = unit(UnitType::Mech, 3, 0, &[]);
        let target = unit(UnitType::Mech, 8, 0, &[]);
        let open = TerrainRoll::default();
        let mods = AttackModifiers::compute(&slow, &target, RangeBand::Short, open);
        assert_eq!(mods.skill, 3);
        assert_eq!(mods.target_number(), 4);
    }

    #[test]
    fn test_stealth_adds_half_range() {
        let attacker = unit(UnitType::Mech, 8, 0, &[]);
        let stealthy = unit(UnitType::Mech, 8, 0, &["STL"]);
        let open = TerrainRoll::default();
        let long = AttackModifiers::compute(&attacker, &stealthy, RangeBand::Long, open);
        assert_eq!(long.range, 6);
        let medium = AttackModifiers::compute(&attacker, &stealthy, RangeBand::Medium, open);
        assert_eq!(medium.range, 3);
    }

    #[test]
    fn test_terrain_roll() {
        let woods = ByBand([50, 50, 50]);
        let cover = ByBand([0, 20, 0]);
        let mut dice = ScriptedDice::default().with_percentile(&[50, 20, 51, 1]);

        let first = TerrainRoll::roll(&woods, &cover, RangeBand::Medium, &mut dice);
        assert_eq!(first, TerrainRoll { woods: true, cover: true });
        assert_eq!(first.modifier(), 4);

        let second = TerrainRoll::roll(&woods, &cover, RangeBand::Short, &mut dice);
        assert_eq!(second, TerrainRoll { woods: false, cover: false });
        assert_eq!(second.modifier(), 0);
    }

    #[test]
    fn test_extreme_skill_and_heat_saturate() {
        let mut mech = unit(UnitType::Mech, 6, 8, &["SHLD"]);
        mech.skill = i32::MAX - 1;
        mech.heat = u32::MAX;
        assert_eq!(effective_skill(&mech), i32::MAX);

        let target = unit(UnitType::Mech, 8, 0, &["STL"]);
        let terrain = TerrainRoll { woods: true, cover: true };
        let mods = AttackModifiers::compute(&mech, &target, RangeBand::Long, terrain);
        assert_eq!(mods.target_number(), i32::MAX);
        assert!(!mods.roll(&mut ScriptedDice::repeating(12, 6, 100)));
    }

    #[test]
    fn test_roll_to_hit_meets_target() {
        let mut dice = ScriptedDice::default().with_two_d6(&[8, 7]);
        assert!(roll_to_hit(4, 2, 1, 1, &mut dice));
        assert!(!roll_to_hit(4, 2, 1, 1, &mut dice));
    }
}
