use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::diagnostics::Diagnostic;
use crate::matchup::Matchup;
use crate::team::TeamRef;

/// A played game.
#[derive(Clone, Debug, Serialize)]
pub struct GameResult {
    pub team1: TeamRef,
    pub team2: TeamRef,
    pub winner: TeamRef,
    pub region: String,
    pub game_id: u32,
    pub unique_game_id: u32,
}

impl GameResult {
    pub fn new(matchup: &Matchup, winner: TeamRef) -> Self {
        GameResult {
            team1: Arc::clone(&matchup.team1),
            team2: Arc::clone(&matchup.team2),
            winner,
            region: matchup.region.clone(),
            game_id: matchup.game_id,
            unique_game_id: matchup.unique_game_id,
        }
    }

    /// The team that did not win
    pub fn loser(&self) -> &TeamRef {
        if Arc::ptr_eq(&self.winner, &self.team1) {
            &self.team2
        } else {
            &self.team1
        }
    }

    /// Whether the higher seed number won
    pub fn is_upset(&self) -> bool {
        self.winner.seed > self.loser().seed
    }
}

/// Games of one tournament run, indexed by round number, in the order they
/// were played.
#[derive(Clone, Debug, Default, Serialize)]
pub struct TournamentResults {
    rounds: BTreeMap<u8, Vec<GameResult>>,
    diagnostics: Vec<Diagnostic>,
}

impl TournamentResults {
    pub(crate) fn record(&mut self, round: u8, game: GameResult) {
        self.rounds.entry(round).or_default().push(game);
    }

    pub(crate) fn set_diagnostics(&mut self, diagnostics: Vec<Diagnostic>) {
        self.diagnostics = diagnostics;
    }

    /// Games played in `round`, empty if none
    pub fn round(&self, round: u8) -> &[GameResult] {
        self.rounds.get(&round).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn rounds(&self) -> &BTreeMap<u8, Vec<GameResult>> {
        &self.rounds
    }

    /// Every game in round order
    pub fn games(&self) -> impl Iterator<Item = &GameResult> {
        self.rounds.values().flatten()
    }

    pub fn num_games(&self) -> usize {
        self.rounds.values().map(Vec::len).sum()
    }

    /// Winner of the championship game, if one was played
    pub fn champion(&self) -> Option<&TeamRef> {
        self.round(6).first().map(|game| &game.winner)
    }

    /// Anomalies the run patched around
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}
