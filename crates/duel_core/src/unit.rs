//! Per-battle mutable unit state.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::blueprint::{ByBand, MotiveType, RangeBand, UnitProfile, UnitType};
use crate::dice::Dice;
use crate::specials::{Special, SpecialSet};

/// Lasting or round-scoped effect left by a critical hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CritFlag {
    /// Engine damaged. A second engine hit destroys the unit.
    EngineHit,
    /// Vehicle crew stunned until the end of the round.
    CrewStunned,
}

impl CritFlag {
    /// Whether the flag is cleared when the round completes.
    #[must_use]
    pub const fn is_transient(self) -> bool {
        matches!(self, CritFlag::CrewStunned)
    }
}

/// A unit taking part in one battle.
///
/// Built fresh from a [`UnitProfile`] for every battle. Crits reduce weapons,
/// movement and skill permanently for the rest of the battle only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombatUnit {
    /// Unit name.
    pub name: String,
    /// Unit category.
    pub unit_type: UnitType,
    /// Motive system.
    pub motive: MotiveType,
    /// Current armor.
    pub armor: u32,
    /// Current structure. The unit is destroyed at 0.
    pub structure: u32,
    /// Armor at battle start.
    pub original_armor: u32,
    /// Structure at battle start.
    pub original_structure: u32,
    /// Current damage by band.
    pub weapons: ByBand<u32>,
    /// Current ground movement.
    pub movement: u32,
    /// Jump movement.
    pub jump: u32,
    /// Current skill rating.
    pub skill: i32,
    /// Accumulated heat (Mechs only).
    pub heat: u32,
    /// This battle's copy of the unit's specials.
    pub specials: SpecialSet,
    flags: BTreeSet<CritFlag>,
}

impl CombatUnit {
    /// Create a fresh unit from a validated profile.
    #[must_use]
    pub fn new(profile: &UnitProfile) -> Self {
        Self {
            name: profile.name().to_string(),
            unit_type: profile.unit_type(),
            motive: profile.motive(),
            armor: profile.armor(),
            structure: profile.structure(),
            original_armor: profile.armor(),
            original_structure: profile.structure(),
            weapons: profile.weapons(),
            movement: profile.movement(),
            jump: profile.jump(),
            skill: profile.skill(),
            heat: 0,
            specials: profile.specials().clone(),
            flags: BTreeSet::new(),
        }
    }

    /// Whether structure has reached 0.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.structure == 0
    }

    /// Whether the unit moves by jumping this round.
    #[must_use]
    pub fn is_jumping(&self) -> bool {
        self.jump > self.movement
    }

    /// Damage the unit deals at a band right now.
    #[must_use]
    pub fn damage_at(&self, band: RangeBand) -> u32 {
        self.weapons.get(band)
    }

    /// Whether a crit flag is set.
    #[must_use]
    pub fn has_flag(&self, flag: CritFlag) -> bool {
        self.flags.contains(&flag)
    }

    /// Set a crit flag. Returns `false` if it was already set.
    pub fn set_flag(&mut self, flag: CritFlag) -> bool {
        self.flags.insert(flag)
    }

    /// Mark the unit destroyed.
    pub fn destroy(&mut self) {
        self.structure = 0;
    }

    /// Heat gain or cooling at the end of the round.
    ///
    /// A Mech with a damaged engine heats up by 1 when it fired. Any unit
    /// that held fire cools down completely.
    pub fn end_of_round_heat(&mut self, fired: bool) {
        if !fired {
            self.heat = 0;
        } else if self.unit_type.tracks_heat() && self.has_flag(CritFlag::EngineHit) {
            self.heat = self.heat.saturating_add(1);
            debug!(unit = %self.name, heat = self.heat, "Engine damage adds heat");
        }
    }

    /// Round completion: clear transient flags, regenerate armor, run the
    /// radical heat sink.
    pub fn round_complete(&mut self, dice: &mut impl Dice) {
        self.flags.retain(|flag| !flag.is_transient());

        let regen = self.specials.armor_regeneration();
        if regen > 0 && self.armor > 0 {
            self.armor = self.armor.saturating_add(regen).min(self.original_armor);
        }

        if self.heat > 0 && self.specials.has(Special::RadicalHeatSink) {
            self.heat -= 1;
            if dice.d6() == 1 {
                self.specials.remove(Special::RadicalHeatSink);
                debug!(unit = %self.name, "Radical heat sink burned out");
            }
        }
    }
}
