//! Outcome tallies for pairings and whole batches.

use duel_core::battle::{BattleOutcome, BattleState, Winner};
use serde::{Deserialize, Serialize};

/// Column names of [`PairingSummary::to_csv_row`].
pub const CSV_HEADER: &str = "attacker,defender,battles,attacker_wins,defender_wins,ties,\
timeouts,mutual_kills,attacker_win_rate,defender_win_rate,avg_rounds,min_rounds,max_rounds";

/// Tally of all battles between one attacker and one defender.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PairingSummary {
    /// Attacker (first unit) name.
    pub attacker: String,
    /// Defender (second unit) name.
    pub defender: String,
    /// Battles fought.
    pub battles: u32,
    /// Battles the attacker won.
    pub attacker_wins: u32,
    /// Battles the defender won.
    pub defender_wins: u32,
    /// Drawn battles of any kind.
    pub ties: u32,
    /// Draws caused by the round cap.
    pub timeouts: u32,
    /// Draws where both units were destroyed.
    pub mutual_kills: u32,
    /// Mean battle length in rounds.
    pub avg_rounds: f64,
    /// Shortest battle.
    pub min_rounds: u32,
    /// Longest battle.
    pub max_rounds: u32,
}

impl PairingSummary {
    /// Tally outcomes of battles between `attacker` and `defender`.
    #[must_use]
    pub fn from_outcomes(
        attacker: impl Into<String>,
        defender: impl Into<String>,
        outcomes: &[BattleOutcome],
    ) -> Self {
        let mut summary = Self {
            attacker: attacker.into(),
            defender: defender.into(),
            battles: outcomes.len() as u32,
            ..Self::default()
        };
        if outcomes.is_empty() {
            return summary;
        }

        let mut round_sum = 0u64;
        let mut min_rounds = u32::MAX;
        let mut max_rounds = 0u32;

        for outcome in outcomes {
            round_sum += u64::from(outcome.rounds);
            min_rounds = min_rounds.min(outcome.rounds);
            max_rounds = max_rounds.max(outcome.rounds);

            match outcome.winner {
                Winner::First => summary.attacker_wins += 1,
                Winner::Second => summary.defender_wins += 1,
                Winner::Tie => summary.ties += 1,
            }
            match outcome.state {
                BattleState::RoundCapReached => summary.timeouts += 1,
                BattleState::DestroyedBoth => summary.mutual_kills += 1,
                BattleState::InProgress | BattleState::Destroyed(_) => {}
            }
        }

        summary.avg_rounds = round_sum as f64 / outcomes.len() as f64;
        summary.min_rounds = min_rounds;
        summary.max_rounds = max_rounds;
        summary
    }

    /// Attacker win rate (0.0 - 1.0).
    pub fn attacker_win_rate(&self) -> f64 {
        if self.battles == 0 {
            return 0.0;
        }
        self.attacker_wins as f64 / self.battles as f64
    }

    /// Defender win rate (0.0 - 1.0).
    pub fn defender_win_rate(&self) -> f64 {
        if self.battles == 0 {
            return 0.0;
        }
        self.defender_wins as f64 / self.battles as f64
    }

    /// Tie rate (0.0 - 1.0).
    pub fn tie_rate(&self) -> f64 {
        if self.battles == 0 {
            return 0.0;
        }
        self.ties as f64 / self.battles as f64
    }

    /// One CSV row, matching [`CSV_HEADER`].
    #[must_use]
    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{},{:.4},{:.4},{:.2},{},{}",
            csv_field(&self.attacker),
            csv_field(&self.defender),
            self.battles,
            self.attacker_wins,
            self.defender_wins,
            self.ties,
            self.timeouts,
            self.mutual_kills,
            self.attacker_win_rate(),
            self.defender_win_rate(),
            self.avg_rounds,
            self.min_rounds,
            self.max_rounds,
        )
    }
}

/// Quote a CSV field if it contains a separator, quote or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Totals across every pairing in a batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Pairings simulated.
    pub pairings: u32,
    /// Battles fought.
    pub total_battles: u64,
    /// Attacker wins across all pairings.
    pub attacker_wins: u64,
    /// Defender wins across all pairings.
    pub defender_wins: u64,
    /// Draws across all pairings.
    pub ties: u64,
    /// Round-cap draws across all pairings.
    pub timeouts: u64,
    /// Mean battle length in rounds.
    pub avg_rounds: f64,
}

impl BatchSummary {
    /// Combine pairing summaries.
    #[must_use]
    pub fn from_pairings(pairings: &[PairingSummary]) -> Self {
        let mut summary = Self {
            pairings: pairings.len() as u32,
            ..Self::default()
        };
        let mut round_sum = 0.0;
        for pairing in pairings {
            summary.total_battles += u64::from(pairing.battles);
            summary.attacker_wins += u64::from(pairing.attacker_wins);
            summary.defender_wins += u64::from(pairing.defender_wins);
            summary.ties += u64::from(pairing.ties);
            summary.timeouts += u64::from(pairing.timeouts);
            round_sum += pairing.avg_rounds * f64::from(pairing.battles);
        }
        if summary.total_battles > 0 {
            summary.avg_rounds = round_sum / summary.total_battles as f64;
        }
        summary
    }

    /// Attacker win rate over every battle.
    pub fn attacker_win_rate(&self) -> f64 {
        if self.total_battles == 0 {
            return 0.0;
        }
        self.attacker_wins as f64 / self.total_battles as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duel_core::battle::Side;

    fn outcome(state: BattleState, rounds: u32) -> BattleOutcome {
        BattleOutcome {
            winner: state.winner(),
            rounds,
            state,
        }
    }

    fn sample() -> PairingSummary {
        PairingSummary::from_outcomes(
            "Catapult",
            "Demolisher",
            &[
                outcome(BattleState::Destroyed(Side::Second), 4),
                outcome(BattleState::Destroyed(Side::Second), 6),
                outcome(BattleState::Destroyed(Side::First), 8),
                outcome(BattleState::RoundCapReached, 100),
                outcome(BattleState::DestroyedBoth, 2),
            ],
        )
    }

    #[test]
    fn test_pairing_tally() {
        let summary = sample();
        assert_eq!(summary.battles, 5);
        assert_eq!(summary.attacker_wins, 2);
        assert_eq!(summary.defender_wins, 1);
        assert_eq!(summary.ties, 2);
        assert_eq!(summary.timeouts, 1);
        assert_eq!(summary.mutual_kills, 1);
        assert_eq!(summary.min_rounds, 2);
        assert_eq!(summary.max_rounds, 100);
        assert!((summary.avg_rounds - 24.0).abs() < 1e-9);
        assert!((summary.attacker_win_rate() - 0.4).abs() < 1e-9);
        assert!((summary.tie_rate() - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_empty_pairing() {
        let summary = PairingSummary::from_outcomes("A", "B", &[]);
        assert_eq!(summary.battles, 0);
        assert_eq!(summary.attacker_win_rate(), 0.0);
    }

    #[test]
    fn test_csv_row() {
        let row = sample().to_csv_row();
        assert_eq!(
            row,
            "Catapult,Demolisher,5,2,1,2,1,1,0.4000,0.2000,24.00,2,100"
        );
        assert_eq!(row.split(',').count(), CSV_HEADER.split(',').count());
    }

    #[test]
    fn test_csv_quotes_names() {
        assert_eq!(csv_field("Plain"), "Plain");
        assert_eq!(csv_field("Atlas, Prime"), "\"Atlas, Prime\"");
        assert_eq!(csv_field("The \"Bull\""), "\"The \"\"Bull\"\"\"");
    }

    #[test]
    fn test_batch_summary() {
        let other = PairingSummary::from_outcomes(
            "Atlas",
            "Locust",
            &[outcome(BattleState::Destroyed(Side::Second), 6)],
        );
        let batch = BatchSummary::from_pairings(&[sample(), other]);
        assert_eq!(batch.pairings, 2);
        assert_eq!(batch.total_battles, 6);
        assert_eq!(batch.attacker_wins, 3);
        assert!((batch.avg_rounds - 21.0).abs() < 1e-9);
        assert!((batch.attacker_win_rate() - 0.5).abs() < 1e-9);
    }
}
