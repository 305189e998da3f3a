use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::PredictorConfig;
use crate::constants::round_name;
use crate::error::BracketError;
use crate::odds::simulate_odds;
use crate::predictor::BracketPredictor;
use crate::team::Team;

fn to_py_err(err: BracketError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// One played game, flattened for Python.
#[pyclass(name = "GameResult", frozen, get_all)]
#[derive(Clone)]
pub struct PyGameResult {
    pub round: u8,
    pub round_name: String,
    pub team1: Team,
    pub team2: Team,
    pub winner: Team,
    pub region: String,
    pub game_id: u32,
    pub unique_game_id: u32,
}

#[pymethods]
impl PyGameResult {
    fn __repr__(&self) -> String {
        format!(
            "GameResult(round={}, {} vs {}, winner={})",
            self.round,
            self.team1.display_name(),
            self.team2.display_name(),
            self.winner.display_name()
        )
    }
}

#[pyclass(name = "BracketPredictor")]
pub struct PyBracketPredictor {
    inner: BracketPredictor,
}

#[pymethods]
impl PyBracketPredictor {
    /// Build the first round from `(name, seed, elo, region)` tuples.
    #[new]
    #[pyo3(signature = (teams, placeholder_elo = None))]
    fn new(teams: Vec<(String, u8, f64, String)>, placeholder_elo: Option<f64>) -> PyResult<Self> {
        let mut config = PredictorConfig::default();
        if let Some(elo) = placeholder_elo {
            config.placeholder_elo = elo;
        }
        let mut inner = BracketPredictor::with_config(config).map_err(to_py_err)?;

        let teams = teams
            .into_iter()
            .map(|(name, seed, elo, region)| Team::new(name, seed, elo, region))
            .collect::<Result<Vec<_>, _>>()
            .map_err(to_py_err)?;
        inner.setup_first_round(teams);
        Ok(PyBracketPredictor { inner })
    }

    /// Play one tournament; every game in round order.
    #[pyo3(signature = (seed = None))]
    fn simulate(&self, seed: Option<u64>) -> PyResult<Vec<PyGameResult>> {
        let mut rng = match seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_entropy(),
        };
        let results = self.inner.simulate_tournament(&mut rng).map_err(to_py_err)?;

        Ok(results
            .rounds()
            .iter()
            .flat_map(|(&round, games)| {
                games.iter().map(move |game| PyGameResult {
                    round,
                    round_name: round_name(round).unwrap_or_default().to_string(),
                    team1: (*game.team1).clone(),
                    team2: (*game.team2).clone(),
                    winner: (*game.winner).clone(),
                    region: game.region.clone(),
                    game_id: game.game_id,
                    unique_game_id: game.unique_game_id,
                })
            })
            .collect())
    }

    /// Advancement rates per team: `(name, seed, region, [rate for rounds 1..=6])`.
    #[pyo3(signature = (n_simulations, seed = None))]
    fn odds(
        &self,
        py: Python<'_>,
        n_simulations: u32,
        seed: Option<u64>,
    ) -> PyResult<Vec<(String, u8, String, Vec<f64>)>> {
        let report = py
            .allow_threads(|| simulate_odds(&self.inner, n_simulations, seed))
            .map_err(to_py_err)?;
        Ok(report
            .teams
            .into_iter()
            .map(|t| {
                let rates = (1..=6).map(|round| t.win_rate(round)).collect();
                (t.name, t.seed, t.region, rates)
            })
            .collect())
    }

    /// Setup diagnostics as readable messages
    fn diagnostics(&self) -> Vec<String> {
        self.inner.diagnostics().iter().map(|d| d.to_string()).collect()
    }

    fn __repr__(&self) -> String {
        format!(
            "BracketPredictor({} teams, {} first-round games)",
            self.inner.teams().len(),
            self.inner.first_round().len()
        )
    }
}

/// Python module definition
#[pymodule]
fn bracket_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<Team>()?;
    m.add_class::<PyGameResult>()?;
    m.add_class::<PyBracketPredictor>()?;
    Ok(())
}
