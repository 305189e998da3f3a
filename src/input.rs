//! Normalization of raw team records into a validated field.
//!
//! Data loaders produce records of uneven completeness. Everything here runs
//! before the engine sees a team, so the engine only ever handles [`Team`]s
//! with a seed and region.

use statrs::statistics::{Data, Median};
use std::collections::HashMap;

use crate::diagnostics::{Diagnostic, DiagnosticLog};
use crate::error::{BracketError, Result};
use crate::team::Team;

/// A team as supplied by a data source.
#[derive(Clone, Debug, PartialEq)]
pub enum TeamRecord {
    /// Fully specified: seed and region known
    Seeded {
        name: String,
        seed: u8,
        elo: f64,
        region: String,
    },
    /// Only a rating is known
    RatingOnly { name: String, elo: f64 },
}

impl TeamRecord {
    pub fn name(&self) -> &str {
        match self {
            TeamRecord::Seeded { name, .. } | TeamRecord::RatingOnly { name, .. } => name,
        }
    }

    pub fn elo(&self) -> f64 {
        match self {
            TeamRecord::Seeded { elo, .. } | TeamRecord::RatingOnly { elo, .. } => *elo,
        }
    }
}

/// Bracket slot without a rating, e.g. from a published bracket.
#[derive(Clone, Debug, PartialEq)]
pub struct BracketEntry {
    pub name: String,
    pub seed: u8,
    pub region: String,
}

/// Teams ready for [`BracketPredictor::setup_first_round`](crate::BracketPredictor::setup_first_round),
/// with notes about anything changed on the way.
#[derive(Clone, Debug, Default)]
pub struct Field {
    pub teams: Vec<Team>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Turn raw records into a field.
///
/// If no record carries a seed, the 64 best-rated teams are seeded by rank:
/// the i-th best gets seed `i % 16 + 1` in `region_order[i / 16]`. Otherwise
/// rating-only records are dropped.
pub fn resolve_field(records: Vec<TeamRecord>, region_order: &[String]) -> Result<Field> {
    let mut notes = DiagnosticLog::default();
    let any_seeded = records
        .iter()
        .any(|r| matches!(r, TeamRecord::Seeded { .. }));

    let teams = if any_seeded {
        let mut teams = Vec::with_capacity(records.len());
        for record in records {
            match record {
                TeamRecord::Seeded {
                    name,
                    seed,
                    elo,
                    region,
                } => teams.push(Team::new(name, seed, elo, region)?),
                TeamRecord::RatingOnly { name, .. } => notes.push(Diagnostic::Dropped {
                    name,
                    reason: "no seed or region".to_string(),
                }),
            }
        }
        teams
    } else {
        seed_by_rating(records, region_order, &mut notes)?
    };

    if teams.is_empty() {
        return Err(BracketError::EmptyField);
    }
    if teams.len() < 64 {
        log::warn!("Only {} teams in the field, a full bracket has 64", teams.len());
    }

    Ok(Field {
        teams,
        diagnostics: notes.into_vec(),
    })
}

fn seed_by_rating(
    records: Vec<TeamRecord>,
    region_order: &[String],
    notes: &mut DiagnosticLog,
) -> Result<Vec<Team>> {
    for record in &records {
        if !record.elo().is_finite() {
            return Err(BracketError::InvalidRating {
                name: record.name().to_string(),
                elo: record.elo(),
            });
        }
    }

    let mut ranked = records;
    ranked.sort_by(|a, b| b.elo().total_cmp(&a.elo()));

    let slots = 16 * region_order.len();
    let mut teams = Vec::with_capacity(slots.min(ranked.len()));
    for (i, record) in ranked.into_iter().enumerate() {
        if i >= slots {
            notes.push(Diagnostic::Dropped {
                name: record.name().to_string(),
                reason: "outside the top 64 by rating".to_string(),
            });
            continue;
        }
        let seed = (i % 16) as u8 + 1;
        let region = &region_order[i / 16];
        teams.push(Team::new(record.name(), seed, record.elo(), region.as_str())?);
    }
    Ok(teams)
}

/// Join bracket entries with a rating table.
///
/// Entries missing from `ratings` get the median of every supplied rating.
/// Fails with [`BracketError::EmptyField`] if there is nothing to take a
/// median of and a rating is needed.
pub fn merge_ratings(entries: Vec<BracketEntry>, ratings: &HashMap<String, f64>) -> Result<Field> {
    let mut notes = DiagnosticLog::default();
    let median = if ratings.is_empty() {
        None
    } else {
        Some(Data::new(ratings.values().copied().collect::<Vec<f64>>()).median())
    };

    let mut teams = Vec::with_capacity(entries.len());
    for entry in entries {
        let elo = match ratings.get(&entry.name) {
            Some(&elo) => elo,
            None => {
                let elo = median.ok_or(BracketError::EmptyField)?;
                notes.push(Diagnostic::RatingFilled {
                    name: entry.name.clone(),
                    elo,
                });
                elo
            }
        };
        teams.push(Team::new(entry.name, entry.seed, elo, entry.region)?);
    }

    Ok(Field {
        teams,
        diagnostics: notes.into_vec(),
    })
}
