//! Die rollers.
//!
//! Every random decision in a battle goes through [`Dice`]: to-hit and crit
//! rolls (2d6), heat-sink burnout (d6) and percentile checks for terrain and
//! random range selection. Battles are reproducible from the roller's state.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of dice rolls for a battle.
pub trait Dice {
    /// Roll a single six-sided die (1-6).
    fn d6(&mut self) -> u32;

    /// Roll two six-sided dice and return the sum (2-12).
    fn two_d6(&mut self) -> u32;

    /// Roll a percentile value (1-100).
    fn percentile(&mut self) -> u32;
}

/// Seeded ChaCha die roller.
///
/// Two rollers built from the same seed produce the same sequence.
#[derive(Debug, Clone)]
pub struct SeededDice {
    rng: ChaCha8Rng,
}

impl SeededDice {
    /// Create a roller from a seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Dice for SeededDice {
    fn d6(&mut self) -> u32 {
        self.rng.gen_range(1..=6)
    }

    fn two_d6(&mut self) -> u32 {
        self.d6() + self.d6()
    }

    fn percentile(&mut self) -> u32 {
        self.rng.gen_range(1..=100)
    }
}

/// Roller that replays queued results, then repeats fallback values.
///
/// Used to reproduce a specific sequence of events, e.g. forcing an engine
/// hit on the next crit roll.
#[derive(Debug, Clone)]
pub struct ScriptedDice {
    d6: VecDeque<u32>,
    two_d6: VecDeque<u32>,
    percentile: VecDeque<u32>,
    fallback_d6: u32,
    fallback_two_d6: u32,
    fallback_percentile: u32,
    two_d6_rolled: u32,
}

impl ScriptedDice {
    /// Roller whose queues are empty and whose fallbacks are the given values.
    #[must_use]
    pub fn repeating(two_d6: u32, d6: u32, percentile: u32) -> Self {
        Self {
            d6: VecDeque::new(),
            two_d6: VecDeque::new(),
            percentile: VecDeque::new(),
            fallback_d6: d6,
            fallback_two_d6: two_d6,
            fallback_percentile: percentile,
            two_d6_rolled: 0,
        }
    }

    /// Queue 2d6 results.
    #[must_use]
    pub fn with_two_d6(mut self, rolls: &[u32]) -> Self {
        self.two_d6.extend(rolls);
        self
    }

    /// Queue d6 results.
    #[must_use]
    pub fn with_d6(mut self, rolls: &[u32]) -> Self {
        self.d6.extend(rolls);
        self
    }

    /// Queue percentile results.
    #[must_use]
    pub fn with_percentile(mut self, rolls: &[u32]) -> Self {
        self.percentile.extend(rolls);
        self
    }

    /// Number of 2d6 rolls taken so far.
    #[must_use]
    pub fn two_d6_rolled(&self) -> u32 {
        self.two_d6_rolled
    }
}

impl Default for ScriptedDice {
    /// Always rolls 7 on 2d6, 6 on d6 and 100 on percentile.
    fn default() -> Self {
        Self::repeating(7, 6, 100)
    }
}

impl Dice for ScriptedDice {
    fn d6(&mut self) -> u32 {
        self.d6.pop_front().unwrap_or(self.fallback_d6)
    }

    fn two_d6(&mut self) -> u32 {
        self.two_d6_rolled += 1;
        self.two_d6.pop_front().unwrap_or(self.fallback_two_d6)
    }

    fn percentile(&mut self) -> u32 {
        self.percentile.pop_front().unwrap_or(self.fallback_percentile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_bounds() {
        let mut dice = SeededDice::new(7);
        for _ in 0..500 {
            let roll = dice.two_d6();
            assert!((2..=12).contains(&roll), "2d6 roll {roll} out of range");
            let pct = dice.percentile();
            assert!((1..=100).contains(&pct), "percentile {pct} out of range");
            let d = dice.d6();
            assert!((1..=6).contains(&d), "d6 {d} out of range");
        }
    }

    #[test]
    fn test_seeded_reproducible() {
        let mut a = SeededDice::new(12345);
        let mut b = SeededDice::new(12345);
        let seq_a: Vec<u32> = (0..50).map(|_| a.two_d6()).collect();
        let seq_b: Vec<u32> = (0..50).map(|_| b.two_d6()).collect();
        assert_eq!(seq_a, seq_b);
    }

    #[test]
    fn test_scripted_queue_then_fallback() {
        let mut dice = ScriptedDice::repeating(7, 3, 50)
            .with_two_d6(&[2, 12])
            .with_percentile(&[1]);

        assert_eq!(dice.two_d6(), 2);
        assert_eq!(dice.two_d6(), 12);
        assert_eq!(dice.two_d6(), 7);
        assert_eq!(dice.two_d6_rolled(), 3);
        assert_eq!(dice.percentile(), 1);
        assert_eq!(dice.percentile(), 50);
        assert_eq!(dice.d6(), 3);
    }
}
