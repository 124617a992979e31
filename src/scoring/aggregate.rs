//! Totals aggregation.
//!
//! Folds result records into per-team or per-candidate totals. One
//! implementation serves every dashboard; the seed-all-vs-winners-only
//! divergence between views is an explicit configuration choice.

use std::collections::HashMap;

use crate::models::{
    Candidate, ProgrammeParticipant, ResultRecord, ResultStatus, Team, Tier, Winners,
};

use super::grade::grade_points;
use super::roster::Roster;

/// Which entity the totals are keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationMode {
    /// Key by team code; individual wins are attributed to the
    /// candidate's team.
    Team,
    /// Key by chest number; team-level results are not attributable and
    /// are skipped.
    Individual,
}

/// Configuration for one aggregation pass.
#[derive(Debug, Clone)]
pub struct AggregationConfig {
    pub mode: AggregationMode,

    /// Only results in this status contribute.
    pub status_filter: ResultStatus,

    /// Seed every known entity with zero totals so non-winners still
    /// appear. Dashboards want this; top-performer lists don't.
    pub seed_all_entities: bool,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            mode: AggregationMode::Team,
            status_filter: ResultStatus::Published,
            seed_all_entities: true,
        }
    }
}

/// Medal counts by position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct MedalCounts {
    pub gold: u32,
    pub silver: u32,
    pub bronze: u32,
}

impl MedalCounts {
    fn record(&mut self, tier: Tier) {
        match tier {
            Tier::First => self.gold += 1,
            Tier::Second => self.silver += 1,
            Tier::Third => self.bronze += 1,
        }
    }
}

/// Accumulated totals for one entity.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct Totals {
    pub points: f64,
    pub wins: u32,
    pub participations: u32,
    pub medals: MedalCounts,
}

impl Totals {
    /// Win rate as a percentage; zero (never NaN) without participations.
    pub fn win_rate(&self) -> f64 {
        if self.participations == 0 {
            0.0
        } else {
            (self.wins as f64 / self.participations as f64) * 100.0
        }
    }
}

/// Fold results and registrations into totals keyed by entity.
///
/// Pure function of its inputs: running it twice over the same snapshot
/// yields identical totals. Winner entries that cannot be attributed to
/// an entity (unknown chest number with no inferable team) are skipped,
/// never an error.
pub fn aggregate(
    results: &[ResultRecord],
    teams: &[Team],
    candidates: &[Candidate],
    registrations: &[ProgrammeParticipant],
    config: &AggregationConfig,
) -> HashMap<String, Totals> {
    let roster = Roster::new(teams, candidates);
    let mut totals: HashMap<String, Totals> = HashMap::new();

    if config.seed_all_entities {
        match config.mode {
            AggregationMode::Team => {
                for team in teams {
                    totals.entry(team.code.clone()).or_default();
                }
            }
            AggregationMode::Individual => {
                for candidate in candidates {
                    totals.entry(candidate.chest_number.clone()).or_default();
                }
            }
        }
    }

    for result in results {
        if result.status != config.status_filter {
            continue;
        }

        for tier in Tier::ALL {
            let base = result.tier_points(tier);

            match &result.winners {
                Winners::Candidates { .. } => {
                    for award in result.winners.candidate_awards(tier) {
                        let key = match config.mode {
                            AggregationMode::Individual => Some(award.chest_number.clone()),
                            AggregationMode::Team => roster.team_of(&award.chest_number),
                        };
                        let Some(key) = key else { continue };
                        let entry = totals.entry(key).or_default();
                        entry.points += base + grade_points(award.grade.as_deref().unwrap_or(""));
                        entry.wins += 1;
                        entry.medals.record(tier);
                    }
                }
                Winners::Teams { .. } => {
                    // Team-level awards have no individual attribution.
                    if config.mode == AggregationMode::Individual {
                        continue;
                    }
                    for award in result.winners.team_awards(tier) {
                        let entry = totals.entry(award.team_code.clone()).or_default();
                        entry.points += base + grade_points(award.grade.as_deref().unwrap_or(""));
                        entry.wins += 1;
                        entry.medals.record(tier);
                    }
                }
            }
        }
    }

    // Participations come from registrations, not from result records.
    for registration in registrations {
        match config.mode {
            AggregationMode::Team => {
                totals
                    .entry(registration.team_code.clone())
                    .or_default()
                    .participations += 1;
            }
            AggregationMode::Individual => {
                for chest_number in &registration.participants {
                    totals.entry(chest_number.clone()).or_default().participations += 1;
                }
            }
        }
    }

    totals
}
