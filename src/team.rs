use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::constants::TBD_NAME;
use crate::error::{BracketError, Result};

/// Shared handle to a team. Winners advance as the same allocation.
pub type TeamRef = Arc<Team>;

/// Team in the field, identified by its slot in a region.
///
/// Teams are immutable once built. Randomness is applied to a copy of the
/// rating inside a simulated game, never to the team itself.
#[cfg_attr(feature = "python", pyo3::pyclass(frozen, get_all))]
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Team {
    pub name: String,

    /// Rank within the region, 1 strongest through 16
    pub seed: u8,

    /// Skill rating; higher is stronger
    pub elo: f64,

    pub region: String,

    /// Synthetic stand-in for an unresolved slot
    pub is_tbd: bool,
}

impl Team {
    /// Create a real team, rejecting seeds outside 1..=16 and non-finite ratings.
    pub fn new(name: impl Into<String>, seed: u8, elo: f64, region: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if !(1..=16).contains(&seed) {
            return Err(BracketError::InvalidSeed { name, seed });
        }
        if !elo.is_finite() {
            return Err(BracketError::InvalidRating { name, elo });
        }
        Ok(Team {
            name,
            seed,
            elo,
            region: region.into(),
            is_tbd: false,
        })
    }

    /// Create a placeholder for an empty `(region, seed)` slot.
    pub fn placeholder(seed: u8, region: impl Into<String>, elo: f64) -> Self {
        Team {
            name: TBD_NAME.to_string(),
            seed,
            elo,
            region: region.into(),
            is_tbd: true,
        }
    }

    /// `"TBD"` for placeholders, `"<seed>. <name>"` otherwise
    pub fn display_name(&self) -> String {
        if self.is_tbd {
            TBD_NAME.to_string()
        } else {
            format!("{}. {}", self.seed, self.name)
        }
    }

    pub fn into_ref(self) -> TeamRef {
        Arc::new(self)
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {} (ELO: {:.0})", self.seed, self.name, self.elo)
    }
}
