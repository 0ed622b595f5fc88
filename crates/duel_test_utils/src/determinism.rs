//! Determinism testing utilities.
//!
//! Provides a harness for verifying that battles produce identical results
//! given identical profiles, configuration and seed.
//!
//! # Testing Strategy
//!
//! Monte Carlo batches are only reproducible if each battle is a pure
//! function of its inputs and its die roller. Sources of non-determinism
//! include:
//!
//! - **Floating-point math**: range selection compares expected damage with
//!   [`duel_core::math::Fixed`] instead of floats.
//!
//! - **Shared randomness**: every battle owns its own seeded roller, so
//!   thread scheduling cannot change which rolls a battle sees.
//!
//! - **Shared unit state**: each battle builds fresh units, so consumed
//!   specials never leak between battles.
//!
//! # Test Levels
//!
//! 1. **Unit tests**: scripted rolls pin individual rules
//! 2. **Property tests**: random blueprints and configs stay reproducible
//! 3. **Parallel tests**: the same seed on N threads gives N equal results

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use duel_core::battle::{Battle, BattleConfig};
use duel_core::blueprint::UnitProfile;
use duel_core::dice::SeededDice;
use duel_core::unit::CombatUnit;
use tracing::debug;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of rounds stepped per run.
    pub rounds: u32,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for deterministic battles).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that the battle was deterministic, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Battle is non-deterministic!\n\
                 Runs: {}\n\
                 Rounds: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.rounds,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Result of parallel battle runs.
#[derive(Debug, Clone)]
pub struct ParallelBattleResult {
    /// Final state hash from each battle.
    pub hashes: Vec<u64>,
    /// Number of battles run.
    pub num_battles: usize,
}

impl ParallelBattleResult {
    /// Check if all battles produced identical results.
    #[must_use]
    pub fn is_deterministic(&self) -> bool {
        self.hashes.windows(2).all(|w| w[0] == w[1])
    }

    /// Assert all battles matched.
    ///
    /// # Panics
    ///
    /// Panics if battles produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic() {
            let mut unique: Vec<u64> = self.hashes.clone();
            unique.sort_unstable();
            unique.dedup();
            panic!(
                "Parallel battles diverged!\n\
                 Battles: {}\n\
                 Unique hashes: {}\n\
                 All hashes: {:?}",
                self.num_battles,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a stepped process multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of times to run
/// * `rounds` - Number of steps per run
/// * `setup` - Function to create initial state
/// * `step` - Function to advance state by one round
/// * `hash` - Function to compute state hash
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    rounds: u32,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();

        for _ in 0..rounds {
            step(&mut state);
        }

        hashes.push(hash(&state));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        rounds,
    }
}

/// Hash of the parts of a unit that combat can change.
fn unit_fingerprint(unit: &CombatUnit) -> (u32, u32, u32, u32, i32, [u32; 3]) {
    (
        unit.armor,
        unit.structure,
        unit.heat,
        unit.movement,
        unit.skill,
        unit.weapons.0,
    )
}

/// Hash of a battle's outcome and both units' current state.
#[must_use]
pub fn battle_hash(battle: &Battle) -> u64 {
    compute_hash(&(
        battle.outcome(),
        unit_fingerprint(battle.first()),
        unit_fingerprint(battle.second()),
    ))
}

/// Fight the same battle `runs` times from `seed` and compare final states.
///
/// Each run steps up to the round cap; finished battles ignore extra steps.
pub fn verify_battle_determinism(
    first: &UnitProfile,
    second: &UnitProfile,
    config: &BattleConfig,
    seed: u64,
    runs: usize,
) -> DeterminismResult {
    verify_determinism(
        runs,
        config.round_cap,
        || (Battle::new(first, second, config), SeededDice::new(seed)),
        |(battle, dice)| {
            battle.play_round(dice);
        },
        |(battle, _)| battle_hash(battle),
    )
}

/// Fight the same seeded battle on `num_battles` threads and collect hashes.
///
/// # Panics
///
/// Panics if a battle thread panics.
pub fn run_parallel_battles(
    first: &UnitProfile,
    second: &UnitProfile,
    config: &BattleConfig,
    seed: u64,
    num_battles: usize,
) -> ParallelBattleResult {
    let hashes = thread::scope(|s| {
        let handles: Vec<_> = (0..num_battles)
            .map(|_| {
                s.spawn(|| {
                    let mut battle = Battle::new(first, second, config);
                    let mut dice = SeededDice::new(seed);
                    while !battle.play_round(&mut dice).is_finished() {}
                    battle_hash(&battle)
                })
            })
            .collect();

        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    ParallelBattleResult {
        hashes,
        num_battles,
    }
}

/// Compare two runs of a battle round-by-round, finding the first divergence.
///
/// # Returns
///
/// `None` if the runs match, `Some(round)` if they diverge at that round.
pub fn find_first_divergence(
    first: &UnitProfile,
    second: &UnitProfile,
    config: &BattleConfig,
    seed: u64,
) -> Option<u32> {
    let mut battle_a = Battle::new(first, second, config);
    let mut battle_b = Battle::new(first, second, config);
    let mut dice_a = SeededDice::new(seed);
    let mut dice_b = SeededDice::new(seed);

    loop {
        let state_a = battle_a.play_round(&mut dice_a);
        let state_b = battle_b.play_round(&mut dice_b);

        if battle_hash(&battle_a) != battle_hash(&battle_b) {
            debug!(round = battle_a.round(), "Battles diverged");
            return Some(battle_a.round());
        }
        if state_a.is_finished() && state_b.is_finished() {
            return None;
        }
    }
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Proptest strategies for battle property testing.
///
/// These strategies generate random but reproducible blueprints and
/// configurations.
pub mod strategies {
    use duel_core::battle::BattleConfig;
    use duel_core::blueprint::{Blueprint, ByBand, MotiveType, UnitType};
    use duel_core::range::RangeMode;
    use proptest::prelude::*;

    /// Special tokens the generators draw from.
    pub const SPECIAL_TOKENS: [&str; 18] = [
        "RFA", "SHLD", "AMS", "RAMS", "ARM", "CR", "CASE", "CASEII", "BHJ2", "BHJ3", "RHS", "STL",
        "ENE", "LG", "HT1/1/0", "HT2/2/1", "LRM1/2/2", "AE1",
    ];

    /// Generate any unit type.
    pub fn arb_unit_type() -> impl Strategy<Value = UnitType> {
        prop_oneof![
            Just(UnitType::Mech),
            Just(UnitType::Vehicle),
            Just(UnitType::ProtoMech),
            Just(UnitType::Infantry),
            Just(UnitType::BattleArmor),
        ]
    }

    /// Generate any motive type.
    pub fn arb_motive() -> impl Strategy<Value = MotiveType> {
        prop_oneof![
            Just(MotiveType::Tracked),
            Just(MotiveType::Naval),
            Just(MotiveType::Wheeled),
            Just(MotiveType::Hover),
            Just(MotiveType::Vtol),
            Just(MotiveType::Wige),
        ]
    }

    /// Generate any range mode.
    pub fn arb_range_mode() -> impl Strategy<Value = RangeMode> {
        prop_oneof![
            Just(RangeMode::Short),
            Just(RangeMode::Medium),
            Just(RangeMode::Long),
            Just(RangeMode::Random),
            Just(RangeMode::FastApproach),
            Just(RangeMode::MinimizeDamage),
        ]
    }

    /// Generate damage values by band (0-8).
    pub fn arb_weapons() -> impl Strategy<Value = [u32; 3]> {
        [0u32..8, 0u32..8, 0u32..8]
    }

    /// Generate a subset of special tokens.
    pub fn arb_specials() -> impl Strategy<Value = Vec<String>> {
        proptest::sample::subsequence(SPECIAL_TOKENS.to_vec(), 0..5)
            .prop_map(|tokens| tokens.into_iter().map(str::to_string).collect())
    }

    /// Generate a complete, valid blueprint.
    pub fn arb_blueprint() -> impl Strategy<Value = Blueprint> {
        (
            arb_unit_type(),
            arb_motive(),
            0u32..12,
            1u32..10,
            arb_weapons(),
            0u32..30,
            proptest::option::of(0u32..20),
            2i32..7,
            arb_specials(),
        )
            .prop_map(
                |(unit_type, motive, armor, structure, weapons, movement, jump, skill, special)| {
                    let mut blueprint =
                        Blueprint::new("Generated", unit_type, armor, structure, weapons, movement)
                            .with_skill(skill)
                            .with_motive(motive);
                    blueprint.jump = jump;
                    blueprint.special = special;
                    blueprint
                },
            )
    }

    /// Generate a battle configuration with a small round cap.
    pub fn arb_battle_config() -> impl Strategy<Value = BattleConfig> {
        (
            0u32..6,
            arb_range_mode(),
            [0u32..=100, 0u32..=100, 0u32..=100],
            [0u32..=100, 0u32..=100, 0u32..=100],
            1u32..60,
        )
            .prop_map(
                |(max_tolerable_heat, range_mode, woods, cover, round_cap)| BattleConfig {
                    max_tolerable_heat,
                    range_mode,
                    woods_percent: ByBand(woods),
                    cover_percent: ByBand(cover),
                    round_cap,
                },
            )
    }
}
