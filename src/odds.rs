use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use std::collections::HashMap;

use crate::constants::NUM_ROUNDS;
use crate::error::{BracketError, Result};
use crate::predictor::BracketPredictor;
use crate::results::TournamentResults;

const ROUNDS: usize = NUM_ROUNDS as usize;

/// How often one team won games across many simulated tournaments.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TeamOdds {
    pub name: String,
    pub seed: u8,
    pub region: String,

    /// `wins[r]` counts runs in which the team won its round `r + 1` game
    pub wins: [u32; ROUNDS],

    pub simulations: u32,
}

impl TeamOdds {
    /// Fraction of runs in which the team won its game in `round`
    pub fn win_rate(&self, round: u8) -> f64 {
        match self.count(round) {
            Some(count) if self.simulations > 0 => f64::from(count) / f64::from(self.simulations),
            _ => 0.0,
        }
    }

    pub fn champion_prob(&self) -> f64 {
        self.win_rate(NUM_ROUNDS)
    }

    /// Wilson score interval for [`win_rate`](Self::win_rate) at the given
    /// confidence level, e.g. 0.95.
    ///
    /// `None` for an unknown round, no simulations, or a confidence outside (0, 1).
    pub fn wilson_interval(&self, round: u8, confidence: f64) -> Option<(f64, f64)> {
        let count = self.count(round)?;
        if self.simulations == 0 || !(confidence > 0.0 && confidence < 1.0) {
            return None;
        }
        let z = Normal::new(0.0, 1.0)
            .ok()?
            .inverse_cdf(1.0 - (1.0 - confidence) / 2.0);
        let n = f64::from(self.simulations);
        let p = f64::from(count) / n;
        let z2 = z * z;

        let denom = 1.0 + z2 / n;
        let center = (p + z2 / (2.0 * n)) / denom;
        let half = z / denom * (p * (1.0 - p) / n + z2 / (4.0 * n * n)).sqrt();
        Some(((center - half).max(0.0), (center + half).min(1.0)))
    }

    fn count(&self, round: u8) -> Option<u32> {
        match round {
            1..=NUM_ROUNDS => Some(self.wins[usize::from(round) - 1]),
            _ => None,
        }
    }
}

/// Aggregated outcome of many tournament runs, favourites first.
#[derive(Clone, Debug, Default, Serialize)]
pub struct OddsReport {
    pub simulations: u32,
    pub teams: Vec<TeamOdds>,
}

impl OddsReport {
    pub fn team(&self, name: &str) -> Option<&TeamOdds> {
        self.teams.iter().find(|t| t.name == name)
    }
}

/// Run `n_simulations` independent tournaments in parallel.
///
/// Each run gets its own `ChaCha8Rng` seeded from a master stream, so a
/// fixed `seed` reproduces the whole report regardless of thread count.
pub fn simulate_odds(predictor: &BracketPredictor, n_simulations: u32, seed: Option<u64>) -> Result<OddsReport> {
    let mut master = match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    };
    let sim_seeds: Vec<u64> = (0..n_simulations).map(|_| master.gen::<u64>()).collect();

    // Real teams only; placeholders share a name
    let slots: HashMap<(String, u8), usize> = predictor
        .teams()
        .iter()
        .enumerate()
        .map(|(i, team)| ((team.region.clone(), team.seed), i))
        .collect();
    let zero = || vec![[0u32; ROUNDS]; slots.len()];

    // Every run of one bracket hits the same anomalies; only the first logs them
    let totals = sim_seeds
        .par_iter()
        .enumerate()
        .map(|(i, &sim_seed)| {
            let mut rng = ChaCha8Rng::seed_from_u64(sim_seed);
            if i == 0 {
                predictor.simulate_tournament(&mut rng)
            } else {
                predictor.simulate_quietly(&mut rng)
            }
        })
        .try_fold(zero, |mut acc, results| {
            tally(&mut acc, &results?, &slots);
            Ok::<_, BracketError>(acc)
        })
        .try_reduce(zero, |mut a, b| {
            for (left, right) in a.iter_mut().zip(b) {
                for (l, r) in left.iter_mut().zip(right) {
                    *l += r;
                }
            }
            Ok(a)
        })?;

    let mut teams: Vec<TeamOdds> = predictor
        .teams()
        .iter()
        .zip(totals)
        .map(|(team, wins)| TeamOdds {
            name: team.name.clone(),
            seed: team.seed,
            region: team.region.clone(),
            wins,
            simulations: n_simulations,
        })
        .collect();
    teams.sort_by(|a, b| {
        b.wins
            .iter()
            .rev()
            .cmp(a.wins.iter().rev())
            .then_with(|| a.name.cmp(&b.name))
    });

    log::info!(
        "Ran {} simulations over {} teams",
        n_simulations,
        teams.len()
    );
    Ok(OddsReport {
        simulations: n_simulations,
        teams,
    })
}

fn tally(acc: &mut [[u32; ROUNDS]], results: &TournamentResults, slots: &HashMap<(String, u8), usize>) {
    for (&round, games) in results.rounds() {
        let Some(r) = usize::from(round).checked_sub(1).filter(|&r| r < ROUNDS) else {
            continue;
        };
        for game in games.iter().filter(|g| !g.winner.is_tbd) {
            if let Some(&i) = slots.get(&(game.winner.region.clone(), game.winner.seed)) {
                acc[i][r] += 1;
            }
        }
    }
}
