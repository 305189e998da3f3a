//! Bracket Core - single-elimination tournament simulation for a 64-team,
//! four-region field.
//!
//! Teams carry a seed and an Elo-style rating. Each game perturbs both
//! ratings by a seed-calibrated random factor and the higher adjusted rating
//! advances. Python bindings are available behind the `python` feature.

pub mod config;
pub mod constants;
pub mod diagnostics;
pub mod error;
pub mod input;
pub mod matchup;
pub mod odds;
pub mod predictor;
pub mod results;
pub mod team;
pub mod win_prob;

#[cfg(feature = "python")]
mod python;

pub use config::{PredictorConfig, TieBreak};
pub use constants::{round_name, CANONICAL_REGIONS, EXPECTED_MATCHUPS, FIRST_ROUND_PAIRINGS, TBD_ELO};
pub use diagnostics::Diagnostic;
pub use error::{BracketError, Result};
pub use input::{merge_ratings, resolve_field, BracketEntry, Field, TeamRecord};
pub use matchup::Matchup;
pub use odds::{simulate_odds, OddsReport, TeamOdds};
pub use predictor::{BracketPredictor, Stage};
pub use results::{GameResult, TournamentResults};
pub use team::{Team, TeamRef};
pub use win_prob::{estimate_win_prob, first_round_factor, seed_factor, NoJitter, RatingJitter, WinModel};
