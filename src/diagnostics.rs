use serde::Serialize;
use std::fmt;

use crate::constants::round_name;

/// Non-fatal anomaly found while building or running a bracket.
///
/// The engine patches around each of these (placeholders, dropped pairings)
/// and keeps going.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A `(region, seed)` slot had no team and was filled with a placeholder
    PlaceholderCreated { region: String, seed: u8 },

    /// More than one team claimed the same slot; the last one was kept
    DuplicateSlot {
        region: String,
        seed: u8,
        kept: String,
        replaced: String,
    },

    /// A canonical region supplied no teams and its Final Four slot is open
    MissingRegion { region: String },

    /// A round produced fewer matchups than a complete field would
    ShortRound {
        round: u8,
        found: usize,
        expected: usize,
    },

    /// A region had an odd number of winners; the last one got no opponent
    UnpairedWinner { round: u8, region: String, team: String },

    /// A region reached the Final Four step without a champion
    ChampionBackfilled { region: String },

    /// A regional champion beyond the four Final Four slots
    ExtraRegion { region: String, team: String },

    /// A team left out of the field at the input boundary
    Dropped { name: String, reason: String },

    /// A team given the median rating because it had none
    RatingFilled { name: String, elo: f64 },

    /// The configured placeholder rating was not below every real team
    PlaceholderRatingLowered {
        configured: f64,
        used: f64,
        lowest_real: f64,
    },
}

impl Diagnostic {
    /// Log this diagnostic at warn level
    pub fn emit(&self) {
        log::warn!("{}", self);
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::PlaceholderCreated { region, seed } => {
                write!(f, "created TBD team for seed {} in {} region", seed, region)
            }
            Diagnostic::DuplicateSlot {
                region,
                seed,
                kept,
                replaced,
            } => write!(
                f,
                "seed {} in {} claimed twice, kept {:?} over {:?}",
                seed, region, kept, replaced
            ),
            Diagnostic::MissingRegion { region } => write!(f, "missing region: {}", region),
            Diagnostic::ShortRound {
                round,
                found,
                expected,
            } => write!(
                f,
                "round {} ({}) has {} matchups instead of expected {}",
                round,
                round_name(*round).unwrap_or("?"),
                found,
                expected
            ),
            Diagnostic::UnpairedWinner {
                round,
                region,
                team,
            } => write!(
                f,
                "{} in {} has no round {} opponent",
                team,
                region,
                round + 1
            ),
            Diagnostic::ChampionBackfilled { region } => {
                write!(f, "created TBD champion for missing {} region", region)
            }
            Diagnostic::ExtraRegion { region, team } => write!(
                f,
                "{} champion {} has no Final Four slot",
                region, team
            ),
            Diagnostic::Dropped { name, reason } => write!(f, "dropped {}: {}", name, reason),
            Diagnostic::RatingFilled { name, elo } => {
                write!(f, "{} has no rating, using median {:.2}", name, elo)
            }
            Diagnostic::PlaceholderRatingLowered {
                configured,
                used,
                lowest_real,
            } => write!(
                f,
                "placeholder rating {} is not below the weakest team ({}), using {}",
                configured, lowest_real, used
            ),
        }
    }
}

/// Collects diagnostics and logs each one as it arrives, unless quiet.
#[derive(Clone, Debug, Default)]
pub(crate) struct DiagnosticLog {
    entries: Vec<Diagnostic>,
    quiet: bool,
}

impl DiagnosticLog {
    /// A log that records without emitting
    pub(crate) fn quiet() -> Self {
        DiagnosticLog {
            entries: Vec::new(),
            quiet: true,
        }
    }

    pub(crate) fn push(&mut self, diagnostic: Diagnostic) {
        if !self.quiet {
            diagnostic.emit();
        }
        self.entries.push(diagnostic);
    }

    pub(crate) fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
