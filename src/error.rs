use thiserror::Error;

/// Failures the engine cannot degrade around.
///
/// Input anomalies that can be patched with placeholders are reported as
/// [`Diagnostic`](crate::diagnostics::Diagnostic)s instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BracketError {
    #[error("team {name:?} has seed {seed}, expected 1..=16")]
    InvalidSeed { name: String, seed: u8 },

    #[error("team {name:?} has non-finite rating {elo}")]
    InvalidRating { name: String, elo: f64 },

    #[error("no teams with seed and region information")]
    EmptyField,

    #[error("round {round} needs {expected} winners to pair, found {found}")]
    InsufficientWinners {
        round: u8,
        expected: usize,
        found: usize,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, BracketError>;
