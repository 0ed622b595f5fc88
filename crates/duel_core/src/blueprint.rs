//! Immutable unit definitions.
//!
//! A [`Blueprint`] is the raw record supplied by the caller (usually
//! deserialized from a roster file). [`Blueprint::validate`] checks the
//! mandatory fields, fills in defaults and parses special tokens once,
//! producing the [`UnitProfile`] every battle is built from.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::specials::SpecialSet;

/// Default skill rating for blueprints that omit one.
pub const DEFAULT_SKILL: i32 = 4;

/// Engagement distance for a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RangeBand {
    /// Close range, no to-hit penalty.
    Short,
    /// Medium range, +2 to hit.
    Medium,
    /// Long range, +4 to hit.
    Long,
}

impl RangeBand {
    /// All bands from shortest to longest.
    pub const ALL: [RangeBand; 3] = [RangeBand::Short, RangeBand::Medium, RangeBand::Long];

    /// Position of this band in a [`ByBand`] table.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            RangeBand::Short => 0,
            RangeBand::Medium => 1,
            RangeBand::Long => 2,
        }
    }

    /// To-hit modifier for attacks at this band.
    #[must_use]
    pub const fn modifier(self) -> i32 {
        match self {
            RangeBand::Short => 0,
            RangeBand::Medium => 2,
            RangeBand::Long => 4,
        }
    }
}

impl std::fmt::Display for RangeBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RangeBand::Short => "short",
            RangeBand::Medium => "medium",
            RangeBand::Long => "long",
        };
        write!(f, "{s}")
    }
}

/// One value per range band: `[short, medium, long]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ByBand<T>(pub [T; 3]);

impl<T: Copy> ByBand<T> {
    /// Value for a band.
    #[must_use]
    pub fn get(&self, band: RangeBand) -> T {
        self.0[band.index()]
    }

    /// Mutable access to the value for a band.
    pub fn get_mut(&mut self, band: RangeBand) -> &mut T {
        &mut self.0[band.index()]
    }

    /// Apply `f` to every band's value.
    pub fn update(&mut self, mut f: impl FnMut(T) -> T) {
        for value in &mut self.0 {
            *value = f(*value);
        }
    }
}

impl ByBand<u32> {
    /// Longest band with a nonzero value, or short if every band is zero.
    #[must_use]
    pub fn longest_nonzero(&self) -> RangeBand {
        RangeBand::ALL
            .into_iter()
            .rev()
            .find(|band| self.get(*band) > 0)
            .unwrap_or(RangeBand::Short)
    }
}

/// Broad unit category, which selects crit tables and heat tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitType {
    /// BattleMech - tracks heat.
    #[serde(alias = "mech", alias = "BM")]
    Mech,
    /// Combat vehicle - motive checks when hit.
    #[serde(alias = "vehicle", alias = "CV")]
    Vehicle,
    /// ProtoMech.
    #[serde(alias = "protomech", alias = "PM")]
    ProtoMech,
    /// Conventional infantry.
    #[serde(alias = "infantry", alias = "CI")]
    Infantry,
    /// Battle armor.
    #[serde(alias = "battlearmor", alias = "BA")]
    BattleArmor,
}

impl UnitType {
    /// Whether heat accumulates on this unit type.
    #[must_use]
    pub const fn tracks_heat(self) -> bool {
        matches!(self, UnitType::Mech)
    }
}

/// Vehicle motive system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MotiveType {
    /// Tracked vehicle.
    #[default]
    #[serde(alias = "tracked")]
    Tracked,
    /// Naval vessel.
    #[serde(alias = "naval")]
    Naval,
    /// Wheeled vehicle.
    #[serde(alias = "wheeled")]
    Wheeled,
    /// Hovercraft.
    #[serde(alias = "hover")]
    Hover,
    /// VTOL aircraft.
    #[serde(alias = "vtol", alias = "VTOL")]
    Vtol,
    /// Wing-in-ground-effect craft.
    #[serde(alias = "wige", alias = "WIGE")]
    Wige,
}

impl MotiveType {
    /// Bonus added to motive check rolls.
    #[must_use]
    pub const fn motive_bonus(self) -> u32 {
        match self {
            MotiveType::Tracked | MotiveType::Naval => 0,
            MotiveType::Wheeled | MotiveType::Hover => 1,
            MotiveType::Vtol | MotiveType::Wige => 2,
        }
    }
}

/// Raw unit definition as supplied by the caller.
///
/// # Example JSON
///
/// ```json
/// {
///     "name": "Catapult CPLT-C1",
///     "type": "Mech",
///     "armor": 5,
///     "structure": 5,
///     "damage": [2, 3, 2],
///     "movement": 8,
///     "jump": 8,
///     "skill": 4,
///     "special": ["IF2", "LRM1/2/2", "ENE"],
///     "points": 32
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blueprint {
    /// Unit name, used as an identifier in rosters.
    pub name: String,

    /// Unit category.
    #[serde(rename = "type")]
    pub unit_type: UnitType,

    /// Motive system (vehicles only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motive: Option<MotiveType>,

    /// Armor points.
    #[serde(default)]
    pub armor: u32,

    /// Structure points.
    #[serde(default)]
    pub structure: u32,

    /// Damage at short, medium and long range. Mandatory.
    #[serde(default, alias = "weapons")]
    pub damage: Option<ByBand<u32>>,

    /// Ground movement. Mandatory.
    #[serde(default)]
    pub movement: Option<u32>,

    /// Jump movement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jump: Option<u32>,

    /// Skill rating (lower is better).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill: Option<i32>,

    /// Special ability tokens, e.g. `"CASE"`, `"HT1/1/0"`.
    #[serde(default, alias = "specials")]
    pub special: Vec<String>,

    /// Point value, used for roster filtering only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<u32>,
}

impl Blueprint {
    /// Create a blueprint with the mandatory combat fields set.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        unit_type: UnitType,
        armor: u32,
        structure: u32,
        damage: [u32; 3],
        movement: u32,
    ) -> Self {
        Self {
            name: name.into(),
            unit_type,
            motive: None,
            armor,
            structure,
            damage: Some(ByBand(damage)),
            movement: Some(movement),
            jump: None,
            skill: None,
            special: Vec::new(),
            points: None,
        }
    }

    /// Builder method to set skill.
    #[must_use]
    pub fn with_skill(mut self, skill: i32) -> Self {
        self.skill = Some(skill);
        self
    }

    /// Builder method to set jump movement.
    #[must_use]
    pub fn with_jump(mut self, jump: u32) -> Self {
        self.jump = Some(jump);
        self
    }

    /// Builder method to set the motive type.
    #[must_use]
    pub fn with_motive(mut self, motive: MotiveType) -> Self {
        self.motive = Some(motive);
        self
    }

    /// Builder method to add special tokens.
    #[must_use]
    pub fn with_specials(mut self, tokens: &[&str]) -> Self {
        self.special.extend(tokens.iter().map(|t| (*t).to_string()));
        self
    }

    /// Builder method to set the point value.
    #[must_use]
    pub fn with_points(mut self, points: u32) -> Self {
        self.points = Some(points);
        self
    }

    /// Check mandatory fields, apply defaults and parse special tokens.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the name, weapons or movement are missing.
    pub fn validate(&self) -> Result<UnitProfile> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::MissingName);
        }
        let weapons = self
            .damage
            .ok_or_else(|| ConfigError::MissingWeapons(self.name.clone()))?;
        let movement = self
            .movement
            .ok_or_else(|| ConfigError::MissingMovement(self.name.clone()))?;

        Ok(UnitProfile {
            name: self.name.clone(),
            unit_type: self.unit_type,
            motive: self.motive.unwrap_or_default(),
            armor: self.armor,
            structure: self.structure,
            weapons,
            movement,
            jump: self.jump.unwrap_or(0),
            skill: self.skill.unwrap_or(DEFAULT_SKILL),
            specials: SpecialSet::from_tokens(&self.special),
        })
    }
}

/// Validated, immutable unit definition.
///
/// Only obtainable through [`Blueprint::validate`], so a battle can never
/// start from an incomplete blueprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitProfile {
    name: String,
    unit_type: UnitType,
    motive: MotiveType,
    armor: u32,
    structure: u32,
    weapons: ByBand<u32>,
    movement: u32,
    jump: u32,
    skill: i32,
    specials: SpecialSet,
}

impl UnitProfile {
    /// Unit name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit category.
    #[must_use]
    pub const fn unit_type(&self) -> UnitType {
        self.unit_type
    }

    /// Motive system.
    #[must_use]
    pub const fn motive(&self) -> MotiveType {
        self.motive
    }

    /// Starting armor.
    #[must_use]
    pub const fn armor(&self) -> u32 {
        self.armor
    }

    /// Starting structure.
    #[must_use]
    pub const fn structure(&self) -> u32 {
        self.structure
    }

    /// Damage by band.
    #[must_use]
    pub const fn weapons(&self) -> ByBand<u32> {
        self.weapons
    }

    /// Ground movement.
    #[must_use]
    pub const fn movement(&self) -> u32 {
        self.movement
    }

    /// Jump movement (0 if none).
    #[must_use]
    pub const fn jump(&self) -> u32 {
        self.jump
    }

    /// Skill rating.
    #[must_use]
    pub const fn skill(&self) -> i32 {
        self.skill
    }

    /// Parsed special abilities.
    #[must_use]
    pub fn specials(&self) -> &SpecialSet {
        &self.specials
    }
}
