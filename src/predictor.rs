use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::PredictorConfig;
use crate::constants::{
    expected_matchups, round_name, CHAMPIONSHIP, FINAL_FOUR, FIRST_ROUND_PAIRINGS, PLACEHOLDER_RATING_SHARE,
};
use crate::diagnostics::{Diagnostic, DiagnosticLog};
use crate::error::{BracketError, Result};
use crate::matchup::Matchup;
use crate::results::{GameResult, TournamentResults};
use crate::team::{Team, TeamRef};
use crate::win_prob::{RatingJitter, WinModel};

/// Kind of round being played. Each kind builds the next round's matchups
/// from its winners in its own way.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Rounds 1-3, winners stay in their region
    RegionalRound(u8),
    /// Round 4, produces one champion per region
    RegionalFinal,
    /// Round 5, the two semifinals
    FinalFour,
    /// Round 6
    Championship,
}

impl Stage {
    pub fn for_round(round: u8) -> Option<Stage> {
        match round {
            1..=3 => Some(Stage::RegionalRound(round)),
            4 => Some(Stage::RegionalFinal),
            5 => Some(Stage::FinalFour),
            6 => Some(Stage::Championship),
            _ => None,
        }
    }

    pub fn round(self) -> u8 {
        match self {
            Stage::RegionalRound(round) => round,
            Stage::RegionalFinal => 4,
            Stage::FinalFour => 5,
            Stage::Championship => 6,
        }
    }

    /// Stage after this one, `None` once the championship is played
    pub fn next(self) -> Option<Stage> {
        Stage::for_round(self.round() + 1)
    }
}

/// A winner waiting to be paired, with the game it came from.
struct Advanced {
    team: TeamRef,
    region: String,
    game_id: u32,
}

/// Builds a 64-team bracket from seeded teams and plays it out.
#[derive(Clone, Debug)]
pub struct BracketPredictor {
    config: PredictorConfig,
    model: WinModel,
    teams: Vec<TeamRef>,
    bracket: Vec<Matchup>,
    diagnostics: Vec<Diagnostic>,

    /// Rating placeholders get, kept below every real team in the field
    placeholder_elo: f64,
}

impl Default for BracketPredictor {
    fn default() -> Self {
        let config = PredictorConfig::default();
        BracketPredictor {
            model: WinModel::from(&config),
            teams: Vec::new(),
            bracket: Vec::new(),
            diagnostics: Vec::new(),
            placeholder_elo: config.placeholder_elo,
            config,
        }
    }
}

impl BracketPredictor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PredictorConfig) -> Result<Self> {
        config.validate()?;
        Ok(BracketPredictor {
            model: WinModel::from(&config),
            placeholder_elo: config.placeholder_elo,
            config,
            ..Self::default()
        })
    }

    pub fn config(&self) -> &PredictorConfig {
        &self.config
    }

    pub fn model(&self) -> &WinModel {
        &self.model
    }

    /// Teams registered by the last [`setup_first_round`](Self::setup_first_round),
    /// placeholders excluded.
    pub fn teams(&self) -> &[TeamRef] {
        &self.teams
    }

    pub fn team(&self, name: &str) -> Option<&TeamRef> {
        self.teams.iter().find(|t| t.name == name)
    }

    pub fn first_round(&self) -> &[Matchup] {
        &self.bracket
    }

    /// Anomalies found while building the first round
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Rating given to placeholders in the current bracket
    pub fn placeholder_elo(&self) -> f64 {
        self.placeholder_elo
    }

    /// Build the 8 first-round games of every region.
    ///
    /// Regions are taken in name order; `game_id` runs 1..=8 within each
    /// region and `unique_game_id` counts up across all of them. Empty slots
    /// are filled with placeholders rated below the weakest real team. Teams
    /// with a seed outside 1..=16 or a non-finite rating are dropped.
    pub fn setup_first_round<I>(&mut self, teams: I) -> &[Matchup]
    where
        I: IntoIterator<Item = Team>,
    {
        let mut notes = DiagnosticLog::default();
        let mut by_region: BTreeMap<String, BTreeMap<u8, TeamRef>> = BTreeMap::new();

        for team in teams {
            let reason = if !(1..=16).contains(&team.seed) {
                Some(format!("seed {} outside 1..=16", team.seed))
            } else if !team.elo.is_finite() {
                Some(format!("rating {} is not finite", team.elo))
            } else {
                None
            };
            if let Some(reason) = reason {
                notes.push(Diagnostic::Dropped { name: team.name, reason });
                continue;
            }

            let team = team.into_ref();
            let slots = by_region.entry(team.region.clone()).or_default();
            if let Some(previous) = slots.insert(team.seed, Arc::clone(&team)) {
                notes.push(Diagnostic::DuplicateSlot {
                    region: team.region.clone(),
                    seed: team.seed,
                    kept: team.name.clone(),
                    replaced: previous.name.clone(),
                });
            }
        }

        // Only as many as there are empty Final Four slots
        let missing = self
            .config
            .region_order
            .iter()
            .filter(|region| !by_region.contains_key(*region))
            .take(4usize.saturating_sub(by_region.len()));
        for region in missing {
            notes.push(Diagnostic::MissingRegion {
                region: region.clone(),
            });
        }

        self.teams = by_region
            .values()
            .flat_map(|slots| slots.values().cloned())
            .collect();
        self.placeholder_elo = self.capped_placeholder_elo(&mut notes);

        let mut bracket = Vec::with_capacity(32);
        let mut unique_game_id = 1;
        for (region, slots) in &by_region {
            for (game_id, &(seed1, seed2)) in (1..).zip(FIRST_ROUND_PAIRINGS.iter()) {
                let team1 = self.slot(slots, region, seed1, &mut notes);
                let team2 = self.slot(slots, region, seed2, &mut notes);
                bracket.push(Matchup::new(team1, team2, 1, region.as_str(), game_id, unique_game_id));
                unique_game_id += 1;
            }
        }

        check_round_size(1, bracket.len(), &mut notes);
        log::info!(
            "Set up {} first-round games across {} regions",
            bracket.len(),
            by_region.len()
        );

        self.bracket = bracket;
        self.diagnostics = notes.into_vec();
        &self.bracket
    }

    fn slot(
        &self,
        slots: &BTreeMap<u8, TeamRef>,
        region: &str,
        seed: u8,
        notes: &mut DiagnosticLog,
    ) -> TeamRef {
        match slots.get(&seed) {
            Some(team) => Arc::clone(team),
            None => {
                notes.push(Diagnostic::PlaceholderCreated {
                    region: region.to_string(),
                    seed,
                });
                self.placeholder(seed, region)
            }
        }
    }

    fn capped_placeholder_elo(&self, notes: &mut DiagnosticLog) -> f64 {
        let configured = self.config.placeholder_elo;
        let Some(lowest_real) = self.teams.iter().map(|t| t.elo).min_by(f64::total_cmp) else {
            return configured;
        };
        if configured < lowest_real {
            return configured;
        }

        let used = if lowest_real > 0.0 {
            lowest_real * PLACEHOLDER_RATING_SHARE
        } else {
            lowest_real - 1.0
        };
        notes.push(Diagnostic::PlaceholderRatingLowered {
            configured,
            used,
            lowest_real,
        });
        used
    }

    fn placeholder(&self, seed: u8, region: &str) -> TeamRef {
        Team::placeholder(seed, region, self.placeholder_elo).into_ref()
    }

    /// Play every round from the First Round through the Championship.
    ///
    /// Returns [`BracketError::EmptyField`] if no first round has been set up.
    pub fn simulate_tournament<J: RatingJitter + ?Sized>(&self, jitter: &mut J) -> Result<TournamentResults> {
        self.run_tournament(jitter, DiagnosticLog::default())
    }

    /// Play a run whose diagnostics are recorded but not logged
    pub(crate) fn simulate_quietly<J: RatingJitter + ?Sized>(&self, jitter: &mut J) -> Result<TournamentResults> {
        self.run_tournament(jitter, DiagnosticLog::quiet())
    }

    fn run_tournament<J: RatingJitter + ?Sized>(&self, jitter: &mut J, notes: DiagnosticLog) -> Result<TournamentResults> {
        if self.bracket.is_empty() {
            return Err(BracketError::EmptyField);
        }

        let mut run = Run {
            predictor: self,
            next_unique_id: self
                .bracket
                .iter()
                .map(|m| m.unique_game_id)
                .max()
                .unwrap_or(0)
                + 1,
            results: TournamentResults::default(),
            notes,
        };

        let mut matchups = self.bracket.clone();
        let mut stage = Stage::for_round(1);
        while let Some(current) = stage {
            let winners = run.play(current, &matchups, jitter);
            matchups = match current {
                Stage::RegionalRound(round) => run.pair_within_regions(round, winners),
                Stage::RegionalFinal => run.seed_final_four(winners),
                Stage::FinalFour => run.pair_championship(winners)?,
                Stage::Championship => Vec::new(),
            };
            stage = current.next();
            if let Some(next) = stage {
                check_round_size(next.round(), matchups.len(), &mut run.notes);
            }
        }

        if let Some(champion) = run.results.champion() {
            log::info!("Champion: {}", champion);
        }
        let Run { mut results, notes, .. } = run;
        results.set_diagnostics(notes.into_vec());
        Ok(results)
    }
}

fn check_round_size(round: u8, found: usize, notes: &mut DiagnosticLog) {
    if let Some(expected) = expected_matchups(round) {
        if found < expected {
            notes.push(Diagnostic::ShortRound {
                round,
                found,
                expected,
            });
        }
    }
}

/// State owned by a single tournament run.
struct Run<'a> {
    predictor: &'a BracketPredictor,
    next_unique_id: u32,
    results: TournamentResults,
    notes: DiagnosticLog,
}

impl Run<'_> {
    fn play<J: RatingJitter + ?Sized>(&mut self, stage: Stage, matchups: &[Matchup], jitter: &mut J) -> Vec<Advanced> {
        let round = stage.round();
        log::debug!(
            "Playing {} ({} games)",
            round_name(round).unwrap_or("?"),
            matchups.len()
        );

        matchups
            .iter()
            .map(|matchup| {
                let winner = matchup.simulate_with(&self.predictor.model, jitter);
                self.results
                    .record(round, GameResult::new(matchup, Arc::clone(&winner)));
                Advanced {
                    team: winner,
                    region: matchup.region.clone(),
                    game_id: matchup.game_id,
                }
            })
            .collect()
    }

    fn take_unique_id(&mut self) -> u32 {
        let id = self.next_unique_id;
        self.next_unique_id += 1;
        id
    }

    fn group_by_region(winners: Vec<Advanced>) -> BTreeMap<String, Vec<Advanced>> {
        let mut by_region: BTreeMap<String, Vec<Advanced>> = BTreeMap::new();
        for winner in winners {
            by_region.entry(winner.region.clone()).or_default().push(winner);
        }
        by_region
    }

    /// Pair adjacent winners within each region, in bracket order.
    fn pair_within_regions(&mut self, round: u8, winners: Vec<Advanced>) -> Vec<Matchup> {
        let mut next = Vec::new();
        for (region, mut region_winners) in Self::group_by_region(winners) {
            region_winners.sort_by_key(|w| w.game_id);
            for (game_id, pair) in (1..).zip(region_winners.chunks(2)) {
                match pair {
                    [a, b] => {
                        let uid = self.take_unique_id();
                        next.push(Matchup::new(
                            Arc::clone(&a.team),
                            Arc::clone(&b.team),
                            round + 1,
                            region.as_str(),
                            game_id,
                            uid,
                        ));
                    }
                    [lone] => self.notes.push(Diagnostic::UnpairedWinner {
                        round,
                        region: region.clone(),
                        team: lone.team.name.clone(),
                    }),
                    _ => {}
                }
            }
        }
        next
    }

    /// Place one champion per region into the two semifinals.
    fn seed_final_four(&mut self, winners: Vec<Advanced>) -> Vec<Matchup> {
        let predictor = self.predictor;
        let config = &predictor.config;

        // Grouping yields champions in region name order
        let mut champions: Vec<(String, TeamRef)> = Self::group_by_region(winners)
            .into_iter()
            .filter_map(|(region, region_winners)| {
                region_winners
                    .into_iter()
                    .next()
                    .map(|w| (region, w.team))
            })
            .collect();

        // Placeholders only fill slots no real region can take
        for region in &config.region_order {
            if champions.len() >= 4 {
                break;
            }
            if !champions.iter().any(|(r, _)| r == region) {
                self.notes.push(Diagnostic::ChampionBackfilled {
                    region: region.clone(),
                });
                champions.push((region.clone(), predictor.placeholder(1, region)));
            }
        }

        // Stable, so regions outside `region_order` keep name order and go last
        champions.sort_by_key(|(region, _)| config.region_rank(region).unwrap_or(usize::MAX));

        for (region, team) in champions.iter().skip(4) {
            self.notes.push(Diagnostic::ExtraRegion {
                region: region.clone(),
                team: team.name.clone(),
            });
        }

        let mut next = Vec::with_capacity(2);
        for (game_id, pair) in (1..).zip(champions.chunks_exact(2).take(2)) {
            let uid = self.take_unique_id();
            next.push(Matchup::new(
                Arc::clone(&pair[0].1),
                Arc::clone(&pair[1].1),
                5,
                FINAL_FOUR,
                game_id,
                uid,
            ));
        }
        next
    }

    fn pair_championship(&mut self, winners: Vec<Advanced>) -> Result<Vec<Matchup>> {
        match winners.as_slice() {
            [first, second, ..] => {
                let uid = self.take_unique_id();
                Ok(vec![Matchup::new(
                    Arc::clone(&first.team),
                    Arc::clone(&second.team),
                    6,
                    CHAMPIONSHIP,
                    1,
                    uid,
                )])
            }
            _ => Err(BracketError::InsufficientWinners {
                round: 5,
                expected: 2,
                found: winners.len(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::win_prob::NoJitter;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    const REGIONS: [&str; 4] = ["East", "Midwest", "South", "West"];

    /// 64 teams, ratings strictly decreasing by seed, East strongest.
    fn full_field() -> Vec<Team> {
        let mut teams = Vec::new();
        for (r, region) in REGIONS.iter().enumerate() {
            for seed in 1..=16u8 {
                let elo = 2000.0 - f64::from(seed) * 20.0 - r as f64;
                teams.push(Team::new(format!("{}{}", region, seed), seed, elo, *region).unwrap());
            }
        }
        teams
    }

    fn predictor_with(teams: Vec<Team>) -> BracketPredictor {
        let mut predictor = BracketPredictor::new();
        predictor.setup_first_round(teams);
        predictor
    }

    #[test]
    fn test_stage_transitions() {
        let stages: Vec<Stage> = std::iter::successors(Stage::for_round(1), |s| s.next()).collect();
        assert_eq!(
            stages,
            vec![
                Stage::RegionalRound(1),
                Stage::RegionalRound(2),
                Stage::RegionalRound(3),
                Stage::RegionalFinal,
                Stage::FinalFour,
                Stage::Championship,
            ]
        );
        assert_eq!(Stage::for_round(0), None);
    }

    #[test]
    fn test_setup_full_field() {
        let predictor = predictor_with(full_field());
        let bracket = predictor.first_round();
        assert_eq!(bracket.len(), 32);
        assert!(predictor.diagnostics().is_empty());
        assert_eq!(predictor.teams().len(), 64);

        let uids: Vec<u32> = bracket.iter().map(|m| m.unique_game_id).collect();
        assert_eq!(uids, (1..=32).collect::<Vec<u32>>());

        for region in REGIONS {
            let games: Vec<&Matchup> = bracket.iter().filter(|m| m.region == region).collect();
            assert_eq!(games.len(), 8);
            let ids: Vec<u32> = games.iter().map(|m| m.game_id).collect();
            assert_eq!(ids, (1..=8).collect::<Vec<u32>>());
        }

        // Regions in name order, pairings in bracket order
        assert_eq!(bracket[0].region, "East");
        assert_eq!((bracket[0].team1.seed, bracket[0].team2.seed), (1, 16));
        assert_eq!((bracket[1].team1.seed, bracket[1].team2.seed), (8, 9));
        assert_eq!((bracket[7].team1.seed, bracket[7].team2.seed), (2, 15));
        assert_eq!(bracket[8].region, "Midwest");
        assert_eq!(bracket[31].region, "West");
    }

    #[test]
    fn test_setup_fills_incomplete_region() {
        let mut teams: Vec<Team> = full_field()
            .into_iter()
            .filter(|t| t.region != "South" || t.seed <= 3)
            .collect();
        teams.reverse();
        let predictor = predictor_with(teams);

        let south: Vec<&Matchup> = predictor
            .first_round()
            .iter()
            .filter(|m| m.region == "South")
            .collect();
        assert_eq!(south.len(), 8);
        assert_eq!(predictor.first_round().len(), 32);

        let placeholders = predictor
            .diagnostics()
            .iter()
            .filter(|d| matches!(d, Diagnostic::PlaceholderCreated { region, .. } if region == "South"))
            .count();
        assert_eq!(placeholders, 13);

        for m in &south {
            for team in [&m.team1, &m.team2] {
                assert_eq!(team.is_tbd, team.seed > 3);
                if team.is_tbd {
                    assert_eq!(team.elo, 1000.0);
                }
            }
        }
    }

    #[test]
    fn test_setup_reports_short_field_and_missing_region() {
        let teams: Vec<Team> = full_field().into_iter().filter(|t| t.region != "West").collect();
        let predictor = predictor_with(teams);
        assert_eq!(predictor.first_round().len(), 24);
        assert!(predictor.diagnostics().contains(&Diagnostic::MissingRegion {
            region: "West".to_string()
        }));
        assert!(predictor.diagnostics().contains(&Diagnostic::ShortRound {
            round: 1,
            found: 24,
            expected: 32
        }));
    }

    #[test]
    fn test_setup_duplicate_slot_keeps_last() {
        let mut teams = full_field();
        teams.push(Team::new("Impostor", 1, 1234.0, "East").unwrap());
        let predictor = predictor_with(teams);
        assert_eq!(predictor.first_round()[0].team1.name, "Impostor");
        assert!(matches!(
            predictor.diagnostics()[0],
            Diagnostic::DuplicateSlot { ref kept, ref replaced, .. }
                if kept == "Impostor" && replaced == "East1"
        ));
    }

    #[test]
    fn test_simulate_without_setup_fails() {
        let predictor = BracketPredictor::new();
        assert_eq!(
            predictor.simulate_tournament(&mut NoJitter).unwrap_err(),
            BracketError::EmptyField
        );
    }

    #[test]
    fn test_round_sizes_halve() {
        let predictor = predictor_with(full_field());
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        let results = predictor.simulate_tournament(&mut rng).unwrap();

        for (round, expected) in (1..=6u8).zip([32usize, 16, 8, 4, 2, 1]) {
            assert_eq!(results.round(round).len(), expected, "round {}", round);
        }
        assert_eq!(results.num_games(), 63);
        assert!(results.diagnostics().is_empty());
    }

    #[test]
    fn test_unique_ids_strictly_increase() {
        let predictor = predictor_with(full_field());
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let results = predictor.simulate_tournament(&mut rng).unwrap();

        let uids: Vec<u32> = results.games().map(|g| g.unique_game_id).collect();
        assert_eq!(uids, (1..=63).collect::<Vec<u32>>());
        let distinct: HashSet<u32> = uids.into_iter().collect();
        assert_eq!(distinct.len(), 63);
    }

    #[test]
    fn test_labels_and_game_ids() {
        let predictor = predictor_with(full_field());
        let results = predictor
            .simulate_tournament(&mut ChaCha8Rng::seed_from_u64(3))
            .unwrap();

        for round in 2..=4u8 {
            for region in REGIONS {
                let ids: Vec<u32> = results
                    .round(round)
                    .iter()
                    .filter(|g| g.region == region)
                    .map(|g| g.game_id)
                    .collect();
                let per_region = 8 >> (round - 1);
                assert_eq!(ids, (1..=per_region).collect::<Vec<u32>>());
            }
        }
        assert!(results.round(5).iter().all(|g| g.region == "Final Four"));
        assert_eq!(
            results.round(5).iter().map(|g| g.game_id).collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert_eq!(results.round(6)[0].region, "Championship");
    }

    #[test]
    fn test_winners_advance_in_bracket_order() {
        let predictor = predictor_with(full_field());
        let results = predictor
            .simulate_tournament(&mut ChaCha8Rng::seed_from_u64(17))
            .unwrap();

        for round in 1..=5u8 {
            let winners: Vec<&TeamRef> = results.round(round).iter().map(|g| &g.winner).collect();
            let next = results.round(round + 1);
            if round < 4 {
                // Next round's entrants are this round's winners, pairwise, per region
                for region in REGIONS {
                    let region_winners: Vec<&TeamRef> = results
                        .round(round)
                        .iter()
                        .filter(|g| g.region == region)
                        .map(|g| &g.winner)
                        .collect();
                    let entrants: Vec<&TeamRef> = next
                        .iter()
                        .filter(|g| g.region == region)
                        .flat_map(|g| [&g.team1, &g.team2])
                        .collect();
                    assert_eq!(region_winners.len(), entrants.len());
                    for (w, e) in region_winners.iter().zip(entrants) {
                        assert!(Arc::ptr_eq(w, e));
                    }
                }
            } else {
                let entrants: Vec<&TeamRef> = next.iter().flat_map(|g| [&g.team1, &g.team2]).collect();
                for e in entrants {
                    assert!(winners.iter().any(|w| Arc::ptr_eq(w, e)));
                }
            }
        }
    }

    #[test]
    fn test_final_four_uses_canonical_region_order() {
        let predictor = predictor_with(full_field());
        let results = predictor.simulate_tournament(&mut NoJitter).unwrap();
        let semis = results.round(5);
        assert_eq!(semis[0].team1.region, "East");
        assert_eq!(semis[0].team2.region, "West");
        assert_eq!(semis[1].team1.region, "South");
        assert_eq!(semis[1].team2.region, "Midwest");
    }

    #[test]
    fn test_deterministic_run_crowns_best_one_seed() {
        let predictor = predictor_with(full_field());
        let results = predictor.simulate_tournament(&mut NoJitter).unwrap();
        let champion = results.champion().unwrap();
        assert_eq!(champion.name, "East1");
        assert!(Arc::ptr_eq(champion, predictor.team("East1").unwrap()));
        // Without randomness the better seed wins every game
        assert!(results.games().all(|g| !g.is_upset()));
    }

    #[test]
    fn test_missing_region_backfilled_at_final_four() {
        let teams: Vec<Team> = full_field().into_iter().filter(|t| t.region != "West").collect();
        let predictor = predictor_with(teams);
        let results = predictor.simulate_tournament(&mut NoJitter).unwrap();

        assert!(results.diagnostics().contains(&Diagnostic::ChampionBackfilled {
            region: "West".to_string()
        }));
        assert!(results.diagnostics().contains(&Diagnostic::ShortRound {
            round: 2,
            found: 12,
            expected: 16
        }));
        let semis = results.round(5);
        assert_eq!(semis.len(), 2);
        assert!(semis[0].team2.is_tbd);
        assert_eq!(semis[0].team2.region, "West");
        assert_eq!(results.champion().unwrap().name, "East1");
    }

    #[test]
    fn test_extra_region_reported() {
        let mut teams = full_field();
        teams.extend((1..=16u8).map(|seed| {
            Team::new(format!("Atlantis{}", seed), seed, 1500.0 - f64::from(seed), "Atlantis").unwrap()
        }));
        let predictor = predictor_with(teams);
        assert_eq!(predictor.first_round().len(), 40);

        let results = predictor.simulate_tournament(&mut NoJitter).unwrap();
        assert_eq!(results.round(5).len(), 2);
        assert!(results.diagnostics().contains(&Diagnostic::ExtraRegion {
            region: "Atlantis".to_string(),
            team: "Atlantis1".to_string(),
        }));
    }

    #[test]
    fn test_non_canonical_regions_keep_real_champions() {
        let teams: Vec<Team> = full_field()
            .into_iter()
            .map(|t| {
                let region = ["A", "B", "C", "D"][REGIONS.iter().position(|r| *r == t.region).unwrap()];
                Team::new(format!("{}{}", region, t.seed), t.seed, t.elo, region).unwrap()
            })
            .collect();
        let predictor = predictor_with(teams);
        let results = predictor.simulate_tournament(&mut NoJitter).unwrap();

        let semis = results.round(5);
        let regions: Vec<&str> = semis
            .iter()
            .flat_map(|g| [g.team1.region.as_str(), g.team2.region.as_str()])
            .collect();
        assert_eq!(regions, vec!["A", "B", "C", "D"]);
        assert!(semis.iter().all(|g| !g.team1.is_tbd && !g.team2.is_tbd));
        assert_eq!(results.champion().unwrap().name, "A1");
        assert!(!predictor
            .diagnostics()
            .iter()
            .any(|d| matches!(d, Diagnostic::MissingRegion { .. })));
        assert!(!results
            .diagnostics()
            .iter()
            .any(|d| matches!(d, Diagnostic::ChampionBackfilled { .. } | Diagnostic::ExtraRegion { .. })));
    }

    #[test]
    fn test_three_named_regions_backfill_one_slot() {
        let teams: Vec<Team> = full_field()
            .into_iter()
            .filter(|t| t.region != "West")
            .map(|t| {
                let region = ["A", "B", "C"][REGIONS.iter().position(|r| *r == t.region).unwrap()];
                Team::new(format!("{}{}", region, t.seed), t.seed, t.elo, region).unwrap()
            })
            .collect();
        let predictor = predictor_with(teams);
        assert!(predictor.diagnostics().contains(&Diagnostic::MissingRegion {
            region: "East".to_string()
        }));
        let results = predictor.simulate_tournament(&mut NoJitter).unwrap();

        let backfilled: Vec<&Diagnostic> = results
            .diagnostics()
            .iter()
            .filter(|d| matches!(d, Diagnostic::ChampionBackfilled { .. }))
            .collect();
        assert_eq!(
            backfilled,
            vec![&Diagnostic::ChampionBackfilled {
                region: "East".to_string()
            }]
        );
        let semis = results.round(5);
        assert!(semis[0].team1.is_tbd);
        assert_eq!(semis[0].team2.name, "A1");
        assert_eq!((semis[1].team1.name.as_str(), semis[1].team2.name.as_str()), ("B1", "C1"));
        assert_eq!(results.champion().unwrap().name, "A1");
    }

    #[test]
    fn test_low_rated_field_keeps_placeholders_below_real_teams() {
        let teams: Vec<Team> = full_field()
            .into_iter()
            .filter(|t| t.region != "South" || t.seed <= 3)
            .map(|t| {
                // Roughly 24 to 39, same shape as the full field
                let elo = 40.0 - f64::from(t.seed) - (2000.0 - f64::from(t.seed) * 20.0 - t.elo) * 0.1;
                Team::new(t.name, t.seed, elo, t.region).unwrap()
            })
            .collect();
        let lowest = teams.iter().map(|t| t.elo).fold(f64::INFINITY, f64::min);
        let predictor = predictor_with(teams);

        assert!(predictor.placeholder_elo() < lowest);
        assert!(predictor.diagnostics().iter().any(|d| matches!(
            d,
            Diagnostic::PlaceholderRatingLowered { configured, .. } if *configured == 1000.0
        )));

        let results = predictor.simulate_tournament(&mut NoJitter).unwrap();
        for game in results.games() {
            if game.team1.is_tbd != game.team2.is_tbd {
                assert!(!game.winner.is_tbd, "{:?}", game);
            }
        }
        assert!(!results.champion().unwrap().is_tbd);
        assert_eq!(results.champion().unwrap().name, "East1");
    }

    #[test]
    fn test_placeholder_rating_kept_when_already_lowest() {
        let predictor = predictor_with(full_field());
        assert_eq!(predictor.placeholder_elo(), 1000.0);
        assert!(!predictor
            .diagnostics()
            .iter()
            .any(|d| matches!(d, Diagnostic::PlaceholderRatingLowered { .. })));
    }

    #[test]
    fn test_out_of_range_seeds_dropped() {
        let mut teams = full_field();
        for (name, seed) in [("Zero", 0u8), ("Seventeen", 17)] {
            teams.push(Team {
                name: name.to_string(),
                seed,
                elo: 1900.0,
                region: "East".to_string(),
                is_tbd: false,
            });
        }
        let predictor = predictor_with(teams);

        assert_eq!(predictor.teams().len(), 64);
        assert!(predictor.team("Zero").is_none());
        assert!(predictor.team("Seventeen").is_none());
        assert_eq!(predictor.first_round().len(), 32);
        assert_eq!(
            predictor.diagnostics(),
            &[
                Diagnostic::Dropped {
                    name: "Zero".to_string(),
                    reason: "seed 0 outside 1..=16".to_string(),
                },
                Diagnostic::Dropped {
                    name: "Seventeen".to_string(),
                    reason: "seed 17 outside 1..=16".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_placeholder_only_region_still_runs() {
        let mut teams = full_field();
        teams.retain(|t| t.region != "South" || t.seed == 1);
        let predictor = predictor_with(teams);
        let results = predictor.simulate_tournament(&mut NoJitter).unwrap();

        let south_r1: Vec<&GameResult> = results
            .round(1)
            .iter()
            .filter(|g| g.region == "South")
            .collect();
        assert_eq!(south_r1.len(), 8);
        assert_eq!(south_r1[0].winner.name, "South1");
        assert_eq!(results.num_games(), 63);
    }

    #[test]
    fn test_same_seed_same_bracket() {
        let predictor = predictor_with(full_field());
        let names = |seed| {
            let results = predictor
                .simulate_tournament(&mut ChaCha8Rng::seed_from_u64(seed))
                .unwrap();
            results.games().map(|g| g.winner.name.clone()).collect::<Vec<_>>()
        };
        assert_eq!(names(77), names(77));
    }

    #[test]
    fn test_with_config_validates() {
        let config = PredictorConfig {
            region_order: vec!["East".into()],
            ..PredictorConfig::default()
        };
        assert!(BracketPredictor::with_config(config).is_err());
    }

    #[test]
    fn test_custom_region_order() {
        let config = PredictorConfig {
            region_order: REGIONS.iter().map(|r| r.to_string()).collect(),
            ..PredictorConfig::default()
        };
        let mut predictor = BracketPredictor::with_config(config).unwrap();
        predictor.setup_first_round(full_field());
        let results = predictor.simulate_tournament(&mut NoJitter).unwrap();
        let semis = results.round(5);
        assert_eq!(semis[0].team1.region, "East");
        assert_eq!(semis[0].team2.region, "Midwest");
        assert_eq!(semis[1].team1.region, "South");
        assert_eq!(semis[1].team2.region, "West");
    }
}
