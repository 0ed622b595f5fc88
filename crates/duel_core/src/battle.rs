//! Round engine and battle loop.
//!
//! A [`Battle`] owns fresh [`CombatUnit`]s for both sides and advances one
//! round at a time until a unit is destroyed or the round cap is reached.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::blueprint::{ByBand, RangeBand, UnitProfile};
use crate::damage::{apply_damage, motive_check};
use crate::dice::Dice;
use crate::error::{ConfigError, Result};
use crate::modifiers::{AttackModifiers, TerrainRoll};
use crate::range::{select_range, RangeMode};
use crate::unit::CombatUnit;

/// Default round cap.
pub const DEFAULT_ROUND_CAP: u32 = 100;

/// Default heat above which a unit holds fire.
pub const DEFAULT_MAX_TOLERABLE_HEAT: u32 = 3;

/// Band assumed before the first round.
const INITIAL_BAND: RangeBand = RangeBand::Long;

/// Rules settings shared by every battle in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// A unit with more heat than this skips firing.
    pub max_tolerable_heat: u32,
    /// Range selection strategy.
    pub range_mode: RangeMode,
    /// Chance (percent) per band that a unit finds woods.
    pub woods_percent: ByBand<u32>,
    /// Chance (percent) per band that a unit finds cover.
    pub cover_percent: ByBand<u32>,
    /// Rounds after which the battle is a draw.
    pub round_cap: u32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            max_tolerable_heat: DEFAULT_MAX_TOLERABLE_HEAT,
            range_mode: RangeMode::FastApproach,
            woods_percent: ByBand([0; 3]),
            cover_percent: ByBand([0; 3]),
            round_cap: DEFAULT_ROUND_CAP,
        }
    }
}

impl BattleConfig {
    /// Builder method to set the range mode.
    #[must_use]
    pub fn with_range_mode(mut self, range_mode: RangeMode) -> Self {
        self.range_mode = range_mode;
        self
    }

    /// Builder method to set the round cap.
    #[must_use]
    pub fn with_round_cap(mut self, round_cap: u32) -> Self {
        self.round_cap = round_cap;
        self
    }

    /// Builder method to set terrain chances.
    #[must_use]
    pub fn with_terrain(mut self, woods: [u32; 3], cover: [u32; 3]) -> Self {
        self.woods_percent = ByBand(woods);
        self.cover_percent = ByBand(cover);
        self
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBattleConfig`] for a zero round cap or
    /// a terrain percentage above 100.
    pub fn validate(&self) -> Result<()> {
        if self.round_cap == 0 {
            return Err(ConfigError::InvalidBattleConfig {
                field: "round_cap",
                value: 0,
                reason: "must be at least 1",
            });
        }
        let percents = [
            ("woods_percent", self.woods_percent),
            ("cover_percent", self.cover_percent),
        ];
        for (field, values) in percents {
            if let Some(&value) = values.0.iter().find(|v| **v > 100) {
                return Err(ConfigError::InvalidBattleConfig {
                    field,
                    value,
                    reason: "must be at most 100",
                });
            }
        }
        Ok(())
    }
}

/// One of the two duelists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Unit passed first.
    First,
    /// Unit passed second.
    Second,
}

/// Battle state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleState {
    /// Both units alive.
    InProgress,
    /// One side was destroyed.
    Destroyed(Side),
    /// Both sides were destroyed in the same round.
    DestroyedBoth,
    /// Round cap reached with both units alive.
    RoundCapReached,
}

impl BattleState {
    /// Whether the battle has ended.
    #[must_use]
    pub const fn is_finished(self) -> bool {
        !matches!(self, BattleState::InProgress)
    }

    /// Winner of a finished battle.
    #[must_use]
    pub const fn winner(self) -> Winner {
        match self {
            BattleState::Destroyed(Side::First) => Winner::Second,
            BattleState::Destroyed(Side::Second) => Winner::First,
            BattleState::InProgress | BattleState::DestroyedBoth | BattleState::RoundCapReached => {
                Winner::Tie
            }
        }
    }
}

/// Battle winner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Winner {
    /// Draw, either mutual destruction or round cap.
    Tie,
    /// First unit won.
    First,
    /// Second unit won.
    Second,
}

/// Result of one battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BattleOutcome {
    /// Who won.
    pub winner: Winner,
    /// Rounds fought.
    pub rounds: u32,
    /// Terminal state.
    pub state: BattleState,
}

/// A battle in progress.
#[derive(Debug, Clone)]
pub struct Battle {
    first: CombatUnit,
    second: CombatUnit,
    config: BattleConfig,
    round: u32,
    band: RangeBand,
    state: BattleState,
}

impl Battle {
    /// Start a battle with fresh units.
    #[must_use]
    pub fn new(first: &UnitProfile, second: &UnitProfile, config: &BattleConfig) -> Self {
        Self {
            first: CombatUnit::new(first),
            second: CombatUnit::new(second),
            config: *config,
            round: 0,
            band: INITIAL_BAND,
            state: BattleState::InProgress,
        }
    }

    /// First unit.
    #[must_use]
    pub fn first(&self) -> &CombatUnit {
        &self.first
    }

    /// Second unit.
    #[must_use]
    pub fn second(&self) -> &CombatUnit {
        &self.second
    }

    /// Rounds completed so far.
    #[must_use]
    pub const fn round(&self) -> u32 {
        self.round
    }

    /// Band of the latest round.
    #[must_use]
    pub const fn band(&self) -> RangeBand {
        self.band
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> BattleState {
        self.state
    }

    /// Play one round. Does nothing once the battle has finished.
    pub fn play_round(&mut self, dice: &mut impl Dice) -> BattleState {
        if self.state.is_finished() {
            return self.state;
        }
        self.round += 1;

        let band = select_range(
            self.config.range_mode,
            self.round,
            self.band,
            &self.first,
            &self.second,
            dice,
        );
        self.band = band;
        debug!(round = self.round, %band, "Round start");

        let woods = &self.config.woods_percent;
        let cover = &self.config.cover_percent;
        let first_terrain = TerrainRoll::roll(woods, cover, band, dice);
        let second_terrain = TerrainRoll::roll(woods, cover, band, dice);

        let max_heat = self.config.max_tolerable_heat;
        let first_fires = self.first.heat <= max_heat;
        let second_fires = self.second.heat <= max_heat;

        // Snapshot modifiers and damage before anyone is hit
        let first_attack =
            AttackModifiers::compute(&self.first, &self.second, band, second_terrain);
        let second_attack =
            AttackModifiers::compute(&self.second, &self.first, band, first_terrain);
        let first_damage = self.first.damage_at(band);
        let second_damage = self.second.damage_at(band);

        let first_hits = first_fires && first_attack.roll(dice);
        let second_hits = second_fires && second_attack.roll(dice);

        if first_hits {
            motive_check(&mut self.second, dice);
            let area = self.first.specials.is_area_effect();
            apply_damage(&mut self.second, first_damage, band, &self.first.specials, area, dice);
        }
        if second_hits {
            motive_check(&mut self.first, dice);
            let area = self.second.specials.is_area_effect();
            apply_damage(&mut self.first, second_damage, band, &self.second.specials, area, dice);
        }

        self.first.end_of_round_heat(first_fires);
        self.second.end_of_round_heat(second_fires);
        self.first.round_complete(dice);
        self.second.round_complete(dice);

        self.state = match (self.first.is_destroyed(), self.second.is_destroyed()) {
            (true, true) => BattleState::DestroyedBoth,
            (true, false) => BattleState::Destroyed(Side::First),
            (false, true) => BattleState::Destroyed(Side::Second),
            (false, false) if self.round >= self.config.round_cap => {
                info!(rounds = self.round, "Round cap reached, battle drawn");
                BattleState::RoundCapReached
            }
            (false, false) => BattleState::InProgress,
        };
        self.state
    }

    /// Outcome of the battle so far.
    #[must_use]
    pub const fn outcome(&self) -> BattleOutcome {
        BattleOutcome {
            winner: self.state.winner(),
            rounds: self.round,
            state: self.state,
        }
    }
}

/// Fight one battle to completion.
pub fn run_battle(
    first: &UnitProfile,
    second: &UnitProfile,
    config: &BattleConfig,
    dice: &mut impl Dice,
) -> BattleOutcome {
    let mut battle = Battle::new(first, second, config);
    while !battle.play_round(dice).is_finished() {}

    let outcome = battle.outcome();
    debug!(
        first = first.name(),
        second = second.name(),
        winner = ?outcome.winner,
        rounds = outcome.rounds,
        "Battle finished"
    );
    outcome
}
