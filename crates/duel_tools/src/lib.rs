//! # Duel Development Tools
//!
//! Command-line tools for roster maintenance:
//! - Roster validation
//! - Settings generation by point value

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod make_settings;
pub mod validate;
