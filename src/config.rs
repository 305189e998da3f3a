use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::constants::{CANONICAL_REGIONS, CHAMPIONSHIP_BONUS, TBD_ELO};
use crate::error::{BracketError, Result};

/// Winner of a game whose adjusted ratings come out exactly equal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// The second team listed in the matchup
    #[default]
    SecondListed,
    /// The team with the smaller seed number, second listed if seeds match
    BetterSeed,
}

/// Tunable settings for a bracket run.
///
/// Every field has a default, so partial configs deserialize cleanly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    /// Rating of placeholder teams
    pub placeholder_elo: f64,

    /// Final Four ordering; semifinals are `[0]` vs `[1]` and `[2]` vs `[3]`
    pub region_order: Vec<String>,

    /// Multiplier for 1 seeds in the championship game
    pub championship_bonus: f64,

    pub tie_break: TieBreak,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        PredictorConfig {
            placeholder_elo: TBD_ELO,
            region_order: CANONICAL_REGIONS.iter().map(|r| r.to_string()).collect(),
            championship_bonus: CHAMPIONSHIP_BONUS,
            tie_break: TieBreak::default(),
        }
    }
}

impl PredictorConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.placeholder_elo.is_finite() {
            return Err(BracketError::InvalidConfig(format!(
                "placeholder_elo must be finite, got {}",
                self.placeholder_elo
            )));
        }
        if !(self.championship_bonus.is_finite() && self.championship_bonus > 0.0) {
            return Err(BracketError::InvalidConfig(format!(
                "championship_bonus must be positive, got {}",
                self.championship_bonus
            )));
        }
        let distinct: HashSet<&str> = self.region_order.iter().map(String::as_str).collect();
        if self.region_order.len() != 4 || distinct.len() != 4 {
            return Err(BracketError::InvalidConfig(format!(
                "region_order needs 4 distinct regions, got {:?}",
                self.region_order
            )));
        }
        Ok(())
    }

    /// Position of `region` in the Final Four order
    pub fn region_rank(&self, region: &str) -> Option<usize> {
        self.region_order.iter().position(|r| r == region)
    }
}
