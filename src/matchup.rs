use std::fmt;
use std::sync::Arc;

use crate::config::TieBreak;
use crate::team::TeamRef;
use crate::win_prob::{first_round_factor, seed_factor, RatingJitter, WinModel};

/// A single game between two resolved teams.
///
/// `game_id` is the position within its round and region, `unique_game_id`
/// identifies the game across the whole tournament.
#[derive(Clone, Debug)]
pub struct Matchup {
    pub team1: TeamRef,
    pub team2: TeamRef,
    pub round: u8,
    pub region: String,
    pub game_id: u32,
    pub unique_game_id: u32,
}

impl Matchup {
    pub fn new(
        team1: TeamRef,
        team2: TeamRef,
        round: u8,
        region: impl Into<String>,
        game_id: u32,
        unique_game_id: u32,
    ) -> Self {
        Matchup {
            team1,
            team2,
            round,
            region: region.into(),
            game_id,
            unique_game_id,
        }
    }

    /// Play the game with the default [`WinModel`] and return the winner.
    pub fn simulate<J: RatingJitter + ?Sized>(&self, jitter: &mut J) -> TeamRef {
        self.simulate_with(&WinModel::default(), jitter)
    }

    /// Play the game and return the winner. Neither team is modified.
    pub fn simulate_with<J: RatingJitter + ?Sized>(&self, model: &WinModel, jitter: &mut J) -> TeamRef {
        if self.team1_wins(model, jitter) {
            Arc::clone(&self.team1)
        } else {
            Arc::clone(&self.team2)
        }
    }

    pub(crate) fn team1_wins<J: RatingJitter + ?Sized>(&self, model: &WinModel, jitter: &mut J) -> bool {
        // A placeholder cannot win its own first-round game
        if self.round == 1 && self.team1.is_tbd != self.team2.is_tbd {
            return self.team2.is_tbd;
        }

        let (adjusted1, adjusted2) = self.adjusted_ratings(model, jitter);
        if adjusted1 > adjusted2 {
            true
        } else if adjusted1 < adjusted2 {
            false
        } else {
            match model.tie_break {
                TieBreak::SecondListed => false,
                TieBreak::BetterSeed => self.team1.seed < self.team2.seed,
            }
        }
    }

    /// Ratings after randomness and bonuses. Draws team1's multiplier first.
    fn adjusted_ratings<J: RatingJitter + ?Sized>(&self, model: &WinModel, jitter: &mut J) -> (f64, f64) {
        let (seed1, seed2) = (self.team1.seed, self.team2.seed);
        let (magnitude1, magnitude2) = if self.round == 1 {
            let r = first_round_factor(seed1, seed2);
            (r, r)
        } else {
            (seed_factor(seed1, self.round), seed_factor(seed2, self.round))
        };

        let adjusted1 = self.team1.elo * jitter.scale(magnitude1) * model.bonus(seed1, self.round);
        let adjusted2 = self.team2.elo * jitter.scale(magnitude2) * model.bonus(seed2, self.round);
        (adjusted1, adjusted2)
    }
}

impl fmt::Display for Matchup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} vs {} (Round {}, {}, Game {}, UID: {})",
            self.team1, self.team2, self.round, self.region, self.game_id, self.unique_game_id
        )
    }
}
