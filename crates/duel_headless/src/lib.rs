//! Headless Monte Carlo runner for unit duels.
//!
//! Loads rosters and settings, pits every attacker against every defender
//! many times and tallies the outcomes:
//!
//! - **Rosters**: JSON arrays of blueprints ([`roster`])
//! - **Settings**: RON files naming rosters, units and rules ([`settings`])
//! - **Batches**: parallel, seed-deterministic duels ([`batch`])
//! - **Export**: per-pairing tallies as JSON or CSV ([`metrics`])
//!
//! # Example
//!
//! ```bash
//! # Run a batch described by a settings file
//! cargo run -p duel_headless -- batch --settings sims/pv32.ron
//!
//! # One pairing from a roster
//! cargo run -p duel_headless -- run --roster units.json "Atlas AS7-D" "Demolisher"
//!
//! # Verify determinism
//! cargo run -p duel_headless -- verify --roster units.json "Atlas AS7-D" "Demolisher"
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod batch;
pub mod metrics;
pub mod roster;
pub mod settings;

pub use batch::{run_batch, verify_determinism, BatchConfig, BatchError, BatchResults};
pub use metrics::{BatchSummary, PairingSummary};
pub use roster::{Roster, RosterError};
pub use settings::{SettingsError, SimulationSettings};
