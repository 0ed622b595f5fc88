//! Typed special abilities.
//!
//! Special tokens such as `"CASE"` or `"HT1/1/0"` are parsed once, when a
//! blueprint is validated. Combat code only ever queries the typed set.
//! Unknown tokens are dropped with a debug log.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::blueprint::{ByBand, RangeBand};

/// Token prefixes that mark an attacker as carrying missile weapons.
const MISSILE_PREFIXES: [&str; 4] = ["SRM", "LRM", "IF", "MSL"];

/// A parsed special ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Special {
    /// `RFA` - halves damage and heat from energy attackers.
    ReflectiveArmor,
    /// `SHLD` - blocks 1 point of non-area damage, +1 skill.
    Shield,
    /// `AMS` - blocks 1 point from missile attackers.
    AntiMissile,
    /// `RAMS` - reinforced anti-missile, same effect as `AMS`.
    ReinforcedAntiMissile,
    /// `ARM` - negates the first critical hit, then is consumed.
    ArmoredComponent,
    /// `CR` - -2 on critical hit rolls.
    CriticalResistant,
    /// `CASE` - ammo explosion becomes 1 point of damage.
    Case,
    /// `CASEII` - ammo explosions are ignored.
    CaseII,
    /// `ENE` - energy weapons only: no ammo to explode.
    Energy,
    /// `BHJ2` / `BHJ3` - restores armor each round.
    ArmorRegeneration(u32),
    /// `RHS` - sheds 1 heat per round, may burn out.
    RadicalHeatSink,
    /// `STL` - stealth, adds half the range modifier to incoming attacks.
    Stealth,
    /// `LG` - easier to hit.
    Large,
    /// `VLG` - easier to hit.
    VeryLarge,
    /// `SLG` - easier to hit.
    SuperLarge,
    /// `HTs/m/l` - heat inflicted at each range band.
    Heat(ByBand<u32>),
    /// `SRM*`, `LRM*`, `IF*`, `MSL*` - attacks count as missile fire.
    Missile,
    /// `AE*` - attacks are area-effect and bypass shields.
    AreaEffect,
}

impl Special {
    /// Parse a single token. Returns `None` for unknown tokens.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim().to_uppercase();
        let exact = match token.as_str() {
            "RFA" => Some(Special::ReflectiveArmor),
            "SHLD" => Some(Special::Shield),
            "AMS" => Some(Special::AntiMissile),
            "RAMS" => Some(Special::ReinforcedAntiMissile),
            "ARM" => Some(Special::ArmoredComponent),
            "CR" => Some(Special::CriticalResistant),
            "CASE" => Some(Special::Case),
            "CASEII" => Some(Special::CaseII),
            "ENE" => Some(Special::Energy),
            "BHJ2" => Some(Special::ArmorRegeneration(1)),
            "BHJ3" => Some(Special::ArmorRegeneration(2)),
            "RHS" => Some(Special::RadicalHeatSink),
            "STL" => Some(Special::Stealth),
            "LG" => Some(Special::Large),
            "VLG" => Some(Special::VeryLarge),
            "SLG" => Some(Special::SuperLarge),
            _ => None,
        };
        if exact.is_some() {
            return exact;
        }

        if let Some(values) = token.strip_prefix("HT") {
            return parse_heat(values).map(Special::Heat);
        }
        if MISSILE_PREFIXES.iter().any(|p| token.starts_with(p)) {
            return Some(Special::Missile);
        }
        if token.starts_with("AE") {
            return Some(Special::AreaEffect);
        }
        None
    }
}

/// Parse `"s/m/l"` heat values; `-` counts as zero.
fn parse_heat(values: &str) -> Option<ByBand<u32>> {
    let mut parsed = [0u32; 3];
    let mut parts = values.split('/');
    for slot in &mut parsed {
        let part = parts.next()?.trim();
        *slot = if part == "-" { 0 } else { part.parse().ok()? };
    }
    if parts.next().is_some() {
        return None;
    }
    Some(ByBand(parsed))
}

/// The special abilities of one unit.
///
/// Each battle owns its own copy, so consuming an armored component or
/// burning out a heat sink never leaks into the next battle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecialSet {
    specials: Vec<Special>,
}

impl SpecialSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse raw tokens, ignoring unknown ones.
    #[must_use]
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Self {
        let mut set = Self::new();
        for token in tokens {
            match Special::parse(token.as_ref()) {
                Some(special) => set.insert(special),
                None => debug!(token = token.as_ref(), "Ignoring unrecognized special"),
            }
        }
        set
    }

    /// Add a special ability.
    pub fn insert(&mut self, special: Special) {
        self.specials.push(special);
    }

    /// Remove one instance of a special. Returns whether it was present.
    pub fn remove(&mut self, special: Special) -> bool {
        match self.specials.iter().position(|s| *s == special) {
            Some(index) => {
                self.specials.remove(index);
                true
            }
            None => false,
        }
    }

    /// Whether the exact special is present.
    #[must_use]
    pub fn has(&self, special: Special) -> bool {
        self.specials.contains(&special)
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specials.is_empty()
    }

    /// Iterate over the specials.
    pub fn iter(&self) -> impl Iterator<Item = &Special> {
        self.specials.iter()
    }

    /// Heat payload inflicted at a band (0 without a heat special).
    #[must_use]
    pub fn heat_at(&self, band: RangeBand) -> u32 {
        self.specials
            .iter()
            .filter_map(|s| match s {
                Special::Heat(values) => Some(values.get(band)),
                _ => None,
            })
            .max()
            .unwrap_or(0)
    }

    /// Armor restored per round.
    #[must_use]
    pub fn armor_regeneration(&self) -> u32 {
        self.specials
            .iter()
            .filter_map(|s| match s {
                Special::ArmorRegeneration(amount) => Some(*amount),
                _ => None,
            })
            .max()
            .unwrap_or(0)
    }

    /// Number of size specials that make the unit easier to hit.
    #[must_use]
    pub fn size_penalty(&self) -> i32 {
        self.specials
            .iter()
            .filter(|s| {
                matches!(
                    s,
                    Special::Large | Special::VeryLarge | Special::SuperLarge
                )
            })
            .count() as i32
    }

    /// Whether the unit carries any anti-missile system.
    #[must_use]
    pub fn has_anti_missile(&self) -> bool {
        self.has(Special::AntiMissile) || self.has(Special::ReinforcedAntiMissile)
    }

    /// Whether the unit's attacks count as missile fire.
    #[must_use]
    pub fn fires_missiles(&self) -> bool {
        self.has(Special::Missile)
    }

    /// Whether the unit's attacks are area-effect.
    #[must_use]
    pub fn is_area_effect(&self) -> bool {
        self.has(Special::AreaEffect)
    }

    /// Whether ammo explosions leave this unit untouched.
    #[must_use]
    pub fn ignores_ammo_explosion(&self) -> bool {
        self.has(Special::Energy) || self.has(Special::CaseII)
    }
}
