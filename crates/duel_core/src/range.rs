//! Range band selection strategies.
//!
//! Each round the selector picks the band both units fire at. Faster units
//! dictate the engagement distance in the approach strategies.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::blueprint::RangeBand;
use crate::dice::Dice;
use crate::math::{expected_damage, Fixed};
use crate::modifiers::{AttackModifiers, TerrainRoll};
use crate::unit::CombatUnit;

/// Movement budget used to estimate how many rounds an approach takes.
const APPROACH_DISTANCE: u32 = 36;

/// Rounds spent at long range when two equally fast units approach.
const EQUAL_SPEED_LONG_ROUNDS: u32 = 2;

/// How the engagement band is chosen each round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RangeMode {
    /// Always short range.
    #[default]
    Short,
    /// Always medium range.
    Medium,
    /// Fixed long range, which resolves to medium.
    Long,
    /// Percentile draw each round.
    Random,
    /// Faster unit closes in after fighting at its best range.
    FastApproach,
    /// Faster unit closes in while avoiding the slower unit's best band.
    MinimizeDamage,
}

impl RangeMode {
    /// Configuration name of the mode.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            RangeMode::Short => "short",
            RangeMode::Medium => "medium",
            RangeMode::Long => "long",
            RangeMode::Random => "random",
            RangeMode::FastApproach => "fast_approach",
            RangeMode::MinimizeDamage => "min_damage",
        }
    }

    /// Parse a mode name, falling back to [`RangeMode::Short`] with a warning.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "short" => RangeMode::Short,
            "medium" => RangeMode::Medium,
            "long" => RangeMode::Long,
            "random" => RangeMode::Random,
            "fast_approach" => RangeMode::FastApproach,
            "min_damage" => RangeMode::MinimizeDamage,
            other => {
                warn!(mode = other, "Unknown range mode, using short range");
                RangeMode::Short
            }
        }
    }
}

impl From<String> for RangeMode {
    fn from(name: String) -> Self {
        RangeMode::from_name(&name)
    }
}

impl From<RangeMode> for String {
    fn from(mode: RangeMode) -> Self {
        mode.name().to_string()
    }
}

impl std::fmt::Display for RangeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Pick the band for `round` (1-based).
pub fn select_range(
    mode: RangeMode,
    round: u32,
    previous: RangeBand,
    first: &CombatUnit,
    second: &CombatUnit,
    dice: &mut impl Dice,
) -> RangeBand {
    if first.movement == 0 && second.movement == 0 {
        return previous;
    }

    match mode {
        RangeMode::Short => RangeBand::Short,
        RangeMode::Medium | RangeMode::Long => RangeBand::Medium,
        RangeMode::Random => random_band(dice),
        RangeMode::FastApproach => fast_approach(round, first, second),
        RangeMode::MinimizeDamage => minimize_damage(round, first, second),
    }
}

fn random_band(dice: &mut impl Dice) -> RangeBand {
    match dice.percentile() {
        0..=10 => RangeBand::Short,
        11..=70 => RangeBand::Medium,
        _ => RangeBand::Long,
    }
}

/// `(faster, slower)`; the first unit wins ties.
fn by_speed<'a>(
    first: &'a CombatUnit,
    second: &'a CombatUnit,
) -> (&'a CombatUnit, &'a CombatUnit) {
    if second.movement > first.movement {
        (second, first)
    } else {
        (first, second)
    }
}

fn still_approaching(round: u32, slow: &CombatUnit) -> bool {
    round < APPROACH_DISTANCE / slow.movement
}

fn closed_in(fast: &CombatUnit) -> RangeBand {
    if fast.damage_at(RangeBand::Medium) == 0 {
        RangeBand::Short
    } else {
        RangeBand::Medium
    }
}

fn fast_approach(round: u32, first: &CombatUnit, second: &CombatUnit) -> RangeBand {
    if first.movement == second.movement {
        return if round <= EQUAL_SPEED_LONG_ROUNDS {
            RangeBand::Long
        } else {
            RangeBand::Medium
        };
    }

    let (fast, slow) = by_speed(first, second);
    if slow.movement == 0 || still_approaching(round, slow) {
        fast.weapons.longest_nonzero()
    } else {
        closed_in(fast)
    }
}

fn minimize_damage(round: u32, first: &CombatUnit, second: &CombatUnit) -> RangeBand {
    if round == 1 {
        let any_long =
            first.damage_at(RangeBand::Long) > 0 || second.damage_at(RangeBand::Long) > 0;
        return if any_long {
            RangeBand::Long
        } else {
            RangeBand::Medium
        };
    }

    let (fast, slow) = by_speed(first, second);
    if first.movement == second.movement || slow.movement == 0 {
        least_exposed_band(fast, slow)
    } else if still_approaching(round, slow) {
        fast.weapons.longest_nonzero()
    } else {
        closed_in(fast)
    }
}

/// Band at which `slow` firing on `fast` does the least expected damage.
///
/// Ties go to the longer band.
fn least_exposed_band(fast: &CombatUnit, slow: &CombatUnit) -> RangeBand {
    let exposure = |band: RangeBand| -> Fixed {
        let target =
            AttackModifiers::compute(slow, fast, band, TerrainRoll::default()).target_number();
        expected_damage(slow.damage_at(band), target)
    };

    let mut best = RangeBand::Long;
    let mut best_exposure = exposure(best);
    for band in [RangeBand::Medium, RangeBand::Short] {
        let candidate = exposure(band);
        if candidate < best_exposure {
            best = band;
            best_exposure = candidate;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint::{Blueprint, UnitType};
    use crate::dice::ScriptedDice;

    fn unit(movement: u32, damage: [u32; 3]) -> CombatUnit {
        let profile = Blueprint::new("Unit", UnitType::Mech, 4, 4, damage, movement)
            .validate()
            .unwrap();
        CombatUnit::new(&profile)
    }

    const ALL_MODES: [RangeMode; 6] = [
        RangeMode::Short,
        RangeMode::Medium,
        RangeMode::Long,
        RangeMode::Random,
        RangeMode::FastApproach,
        RangeMode::MinimizeDamage,
    ];

    #[test]
    fn test_immobile_units_keep_previous_band() {
        let a = unit(0, [1, 1, 1]);
        let b = unit(0, [2, 2, 0]);
        let mut dice = ScriptedDice::default();
        for mode in ALL_MODES {
            for previous in RangeBand::ALL {
                for round in 1..5 {
                    assert_eq!(select_range(mode, round, previous, &a, &b, &mut dice), previous);
                }
            }
        }
    }

    #[test]
    fn test_fixed_modes() {
        let a = unit(8, [1, 1, 1]);
        let b = unit(6, [1, 1, 1]);
        let mut dice = ScriptedDice::default();
        let pick = |mode, dice: &mut ScriptedDice| {
            select_range(mode, 3, RangeBand::Short, &a, &b, dice)
        };
        assert_eq!(pick(RangeMode::Short, &mut dice), RangeBand::Short);
        assert_eq!(pick(RangeMode::Medium, &mut dice), RangeBand::Medium);
        assert_eq!(pick(RangeMode::Long, &mut dice), RangeBand::Medium);
    }

    #[test]
    fn test_random_thresholds() {
        let a = unit(8, [1, 1, 1]);
        let b = unit(6, [1, 1, 1]);
        let mut dice = ScriptedDice::default().with_percentile(&[10, 11, 70, 71]);
        let bands: Vec<RangeBand> = (0..4)
            .map(|_| select_range(RangeMode::Random, 1, RangeBand::Short, &a, &b, &mut dice))
            .collect();
        assert_eq!(
            bands,
            vec![RangeBand::Short, RangeBand::Medium, RangeBand::Medium, RangeBand::Long]
        );
    }

    #[test]
    fn test_fast_approach_equal_speed() {
        let a = unit(8, [1, 1, 1]);
        let b = unit(8, [1, 1, 1]);
        let mut dice = ScriptedDice::default();
        let at = |round, dice: &mut ScriptedDice| {
            select_range(RangeMode::FastApproach, round, RangeBand::Short, &a, &b, dice)
        };
        assert_eq!(at(1, &mut dice), RangeBand::Long);
        assert_eq!(at(2, &mut dice), RangeBand::Long);
        assert_eq!(at(3, &mut dice), RangeBand::Medium);
    }

    #[test]
    fn test_approach_window_then_close_in() {
        let fast = unit(12, [3, 2, 1]);
        let slow = unit(6, [1, 1, 1]);
        let mut dice = ScriptedDice::default();

        for mode in [RangeMode::FastApproach, RangeMode::MinimizeDamage] {
            // 36 / 6 = rounds 1-5 spent approaching
            for round in 1..6 {
                let band = select_range(mode, round, RangeBand::Short, &slow, &fast, &mut dice);
                assert_eq!(band, RangeBand::Long, "{mode} round {round}");
            }
            for round in 6..10 {
                let band = select_range(mode, round, RangeBand::Long, &slow, &fast, &mut dice);
                assert_eq!(band, RangeBand::Medium, "{mode} round {round}");
            }
        }
    }

    #[test]
    fn test_short_ranged_fast_unit_closes_to_short() {
        let brawler = unit(12, [3, 0, 0]);
        let slow = unit(6, [1, 1, 1]);
        let mut dice = ScriptedDice::default();
        let mode = RangeMode::FastApproach;
        for round in [1, 7] {
            let band = select_range(mode, round, RangeBand::Long, &brawler, &slow, &mut dice);
            assert_eq!(band, RangeBand::Short, "round {round}");
        }
    }

    #[test]
    fn test_fast_approach_immobile_slow_unit() {
        let fast = unit(10, [2, 2, 2]);
        let stuck = unit(0, [5, 5, 5]);
        let mut dice = ScriptedDice::default();
        assert_eq!(
            select_range(RangeMode::FastApproach, 40, RangeBand::Short, &fast, &stuck, &mut dice),
            RangeBand::Long
        );
    }

    #[test]
    fn test_min_damage_first_round() {
        let mut dice = ScriptedDice::default();
        let a = unit(8, [2, 2, 0]);
        let b = unit(6, [2, 2, 1]);
        assert_eq!(
            select_range(RangeMode::MinimizeDamage, 1, RangeBand::Short, &a, &b, &mut dice),
            RangeBand::Long
        );
        let c = unit(6, [2, 2, 0]);
        assert_eq!(
            select_range(RangeMode::MinimizeDamage, 1, RangeBand::Short, &a, &c, &mut dice),
            RangeBand::Medium
        );
    }

    #[test]
    fn test_min_damage_avoids_slow_units_best_band() {
        let mut dice = ScriptedDice::default();
        let fast = unit(10, [2, 2, 2]);
        // Immobile slow unit that only hurts up close
        let turret = unit(0, [6, 0, 0]);
        let band =
            select_range(RangeMode::MinimizeDamage, 5, RangeBand::Short, &fast, &turret, &mut dice);
        assert_eq!(band, RangeBand::Long);

        // Only dangerous at long range: medium and short tie at zero, medium wins
        let sniper = unit(0, [0, 0, 6]);
        let band =
            select_range(RangeMode::MinimizeDamage, 5, RangeBand::Short, &fast, &sniper, &mut dice);
        assert_eq!(band, RangeBand::Medium);
    }

    #[test]
    fn test_min_damage_with_huge_weapons() {
        let mut dice = ScriptedDice::default();
        let fast = unit(10, [2, 2, 2]);
        let giant = unit(0, [200_000_000, 1, 1]);
        let band =
            select_range(RangeMode::MinimizeDamage, 5, RangeBand::Short, &fast, &giant, &mut dice);
        assert_eq!(band, RangeBand::Long);
    }

    #[test]
    fn test_min_damage_equal_speed_ties_prefer_long() {
        let mut dice = ScriptedDice::default();
        let a = unit(8, [1, 1, 1]);
        let b = unit(8, [0, 0, 0]);
        let band = select_range(RangeMode::MinimizeDamage, 3, RangeBand::Short, &a, &b, &mut dice);
        assert_eq!(band, RangeBand::Long);
    }

    #[test]
    fn test_mode_names() {
        assert_eq!(RangeMode::from_name("fast_approach"), RangeMode::FastApproach);
        assert_eq!(RangeMode::from_name("MIN_DAMAGE"), RangeMode::MinimizeDamage);
        assert_eq!(RangeMode::from_name("sideways"), RangeMode::Short);
        assert_eq!(String::from(RangeMode::Long), "long");
    }
}
