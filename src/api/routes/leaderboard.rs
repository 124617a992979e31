use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{dedup_by_key, ApiError};
use crate::models::{ResultStatus, Section};
use crate::scoring::{aggregate, rank_totals, AggregationConfig, AggregationMode, MedalCounts};
use crate::snapshot::{self, Snapshot};

async fn load_snapshot(state: &AppState) -> Result<Snapshot, ApiError> {
    let mut snapshot = snapshot::load(&state.storage)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    snapshot.teams = dedup_by_key(std::mem::take(&mut snapshot.teams), |t| t.code.clone());
    snapshot.candidates = dedup_by_key(std::mem::take(&mut snapshot.candidates), |c| {
        c.chest_number.clone()
    });
    snapshot.programmes = dedup_by_key(std::mem::take(&mut snapshot.programmes), |p| {
        p.id.as_str().to_string()
    });
    snapshot.participants = dedup_by_key(std::mem::take(&mut snapshot.participants), |r| {
        r.id.as_str().to_string()
    });
    snapshot.results = dedup_by_key(std::mem::take(&mut snapshot.results), |r| {
        r.id.as_str().to_string()
    });

    Ok(snapshot)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ── Team standings ──────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TeamStandingsParams {
    pub status: Option<ResultStatus>,
    pub seed_all: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct TeamStanding {
    pub rank: u32,
    pub team_code: String,
    pub team_name: String,
    pub color: Option<String>,
    pub points: f64,
    pub wins: u32,
    pub participations: u32,
    pub win_rate: f64,
    pub medals: MedalCounts,
}

#[derive(Debug, Serialize)]
pub struct TeamStandingsResponse {
    pub standings: Vec<TeamStanding>,
}

pub async fn team_standings(
    State(state): State<AppState>,
    Query(params): Query<TeamStandingsParams>,
) -> Result<Json<TeamStandingsResponse>, ApiError> {
    let snapshot = load_snapshot(&state).await?;

    let config = AggregationConfig {
        mode: AggregationMode::Team,
        status_filter: params.status.unwrap_or(ResultStatus::Published),
        seed_all_entities: params.seed_all.unwrap_or(true),
    };
    let totals = aggregate(
        &snapshot.results,
        &snapshot.teams,
        &snapshot.candidates,
        &snapshot.participants,
        &config,
    );

    let team_names: HashMap<&str, (&str, &str)> = snapshot
        .teams
        .iter()
        .map(|t| (t.code.as_str(), (t.name.as_str(), t.color.as_str())))
        .collect();

    let standings = rank_totals(totals)
        .into_iter()
        .map(|entry| {
            let (name, color) = team_names
                .get(entry.key.as_str())
                .map(|(n, c)| (n.to_string(), Some(c.to_string())))
                .unwrap_or_else(|| (entry.key.clone(), None));
            TeamStanding {
                rank: entry.rank,
                team_code: entry.key,
                team_name: name,
                color,
                points: entry.totals.points.round(),
                wins: entry.totals.wins,
                participations: entry.totals.participations,
                win_rate: round1(entry.totals.win_rate()),
                medals: entry.totals.medals,
            }
        })
        .collect();

    Ok(Json(TeamStandingsResponse { standings }))
}

// ── Top candidates ──────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TopCandidatesParams {
    pub status: Option<ResultStatus>,
    pub section: Option<Section>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct CandidateStanding {
    pub rank: u32,
    pub chest_number: String,
    pub name: String,
    pub team_code: Option<String>,
    pub section: Option<Section>,
    pub points: f64,
    pub wins: u32,
    pub medals: MedalCounts,
}

#[derive(Debug, Serialize)]
pub struct TopCandidatesResponse {
    pub candidates: Vec<CandidateStanding>,
}

pub async fn top_candidates(
    State(state): State<AppState>,
    Query(params): Query<TopCandidatesParams>,
) -> Result<Json<TopCandidatesResponse>, ApiError> {
    let snapshot = load_snapshot(&state).await?;
    let limit = params.limit.unwrap_or(25).min(100) as usize;

    // Section-scoped boards only consider that section's results, so
    // ranks stay contiguous.
    let results: Vec<_> = match params.section {
        Some(section) => snapshot
            .results
            .iter()
            .filter(|r| r.section == section)
            .cloned()
            .collect(),
        None => snapshot.results.clone(),
    };

    // Top-performer list: only candidates who actually scored appear,
    // so registrations are left out of the fold.
    let config = AggregationConfig {
        mode: AggregationMode::Individual,
        status_filter: params.status.unwrap_or(ResultStatus::Published),
        seed_all_entities: false,
    };
    let totals = aggregate(&results, &snapshot.teams, &snapshot.candidates, &[], &config);

    let candidate_index: HashMap<&str, &crate::models::Candidate> = snapshot
        .candidates
        .iter()
        .map(|c| (c.chest_number.as_str(), c))
        .collect();

    let candidates = rank_totals(totals)
        .into_iter()
        .map(|entry| {
            let candidate = candidate_index.get(entry.key.as_str()).copied();
            CandidateStanding {
                rank: entry.rank,
                chest_number: entry.key,
                name: candidate
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| "Unknown".to_string()),
                team_code: candidate.map(|c| c.team.clone()),
                section: candidate.map(|c| c.section),
                points: entry.totals.points.round(),
                wins: entry.totals.wins,
                medals: entry.totals.medals,
            }
        })
        .take(limit)
        .collect();

    Ok(Json(TopCandidatesResponse { candidates }))
}

// ── Overview ────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct LeadingTeam {
    pub code: String,
    pub name: String,
    pub points: f64,
}

#[derive(Debug, Serialize)]
pub struct OverviewResponse {
    pub total_teams: u32,
    pub total_candidates: u32,
    pub total_programmes: u32,
    pub total_registrations: u32,
    pub pending_results: u32,
    pub checked_results: u32,
    pub published_results: u32,
    pub leading_team: Option<LeadingTeam>,
}

pub async fn overview(State(state): State<AppState>) -> Result<Json<OverviewResponse>, ApiError> {
    let snapshot = load_snapshot(&state).await?;

    let count_status = |status: ResultStatus| {
        snapshot.results.iter().filter(|r| r.status == status).count() as u32
    };

    let totals = aggregate(
        &snapshot.results,
        &snapshot.teams,
        &snapshot.candidates,
        &snapshot.participants,
        &AggregationConfig::default(),
    );
    let leading_team = rank_totals(totals).into_iter().next().and_then(|entry| {
        // An empty store ranks nobody; a seeded zero row is not a leader.
        if entry.totals.points <= 0.0 {
            return None;
        }
        let name = snapshot
            .teams
            .iter()
            .find(|t| t.code == entry.key)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| entry.key.clone());
        Some(LeadingTeam {
            code: entry.key,
            name,
            points: entry.totals.points.round(),
        })
    });

    Ok(Json(OverviewResponse {
        total_teams: snapshot.teams.len() as u32,
        total_candidates: snapshot.candidates.len() as u32,
        total_programmes: snapshot.programmes.len() as u32,
        total_registrations: snapshot.participants.len() as u32,
        pending_results: count_status(ResultStatus::Pending),
        checked_results: count_status(ResultStatus::Checked),
        published_results: count_status(ResultStatus::Published),
        leading_team,
    }))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{get_json, setup_state, write_entities};
    use crate::models::{
        Candidate, CandidateAward, Category, EntityId, PositionType, Programme,
        ProgrammeParticipant, ResultRecord, ResultStatus, Section, Team, Winners,
    };
    use crate::storage::EntityType;
    use axum::http::StatusCode;

    fn team(code: &str, name: &str) -> Team {
        Team::new(code.to_string(), name.to_string(), "#123456".to_string())
    }

    fn candidate(chest: &str, name: &str, team: &str) -> Candidate {
        Candidate::new(
            chest.to_string(),
            name.to_string(),
            team.to_string(),
            Section::Senior,
        )
    }

    fn published_result(programme_id: &str, first: Vec<CandidateAward>) -> ResultRecord {
        let mut result = ResultRecord::new(
            EntityId::from(programme_id),
            Section::Senior,
            PositionType::Individual,
            Winners::Candidates {
                first,
                second: vec![],
                third: vec![],
                participation: vec![],
            },
            5.0,
            3.0,
            1.0,
        )
        .unwrap();
        result.status = ResultStatus::Published;
        result
    }

    #[tokio::test]
    async fn test_team_standings() {
        let (tmp, state) = setup_state();
        write_entities(
            tmp.path(),
            EntityType::Team,
            &[team("A", "Alpha"), team("B", "Beta")],
        );
        write_entities(
            tmp.path(),
            EntityType::Candidate,
            &[candidate("101", "Amina", "A")],
        );
        write_entities(
            tmp.path(),
            EntityType::Result,
            &[published_result(
                "prog-1",
                vec![CandidateAward::new("101").with_grade("A")],
            )],
        );

        let app = crate::api::build_router(state);
        let (status, json) = get_json(app, "/api/leaderboard/teams").await;

        assert_eq!(status, StatusCode::OK);
        let standings = json["standings"].as_array().unwrap();
        // Both teams appear: seeding defaults on
        assert_eq!(standings.len(), 2);
        assert_eq!(standings[0]["team_code"], "A");
        assert_eq!(standings[0]["team_name"], "Alpha");
        assert_eq!(standings[0]["points"], 10.0); // 5 base + grade A bonus
        assert_eq!(standings[0]["rank"], 1);
        assert_eq!(standings[0]["medals"]["gold"], 1);
        assert_eq!(standings[1]["team_code"], "B");
        assert_eq!(standings[1]["points"], 0.0);
    }

    #[tokio::test]
    async fn test_team_standings_seed_all_off() {
        let (tmp, state) = setup_state();
        write_entities(
            tmp.path(),
            EntityType::Team,
            &[team("A", "Alpha"), team("B", "Beta")],
        );
        write_entities(
            tmp.path(),
            EntityType::Candidate,
            &[candidate("101", "Amina", "A")],
        );
        write_entities(
            tmp.path(),
            EntityType::Result,
            &[published_result("prog-1", vec![CandidateAward::new("101")])],
        );

        let app = crate::api::build_router(state);
        let (status, json) = get_json(app, "/api/leaderboard/teams?seed_all=false").await;

        assert_eq!(status, StatusCode::OK);
        let standings = json["standings"].as_array().unwrap();
        assert_eq!(standings.len(), 1);
        assert_eq!(standings[0]["team_code"], "A");
    }

    #[tokio::test]
    async fn test_team_standings_status_filter() {
        let (tmp, state) = setup_state();
        write_entities(tmp.path(), EntityType::Team, &[team("A", "Alpha")]);
        write_entities(
            tmp.path(),
            EntityType::Candidate,
            &[candidate("101", "Amina", "A")],
        );
        let mut pending = published_result("prog-1", vec![CandidateAward::new("101")]);
        pending.status = ResultStatus::Pending;
        write_entities(tmp.path(), EntityType::Result, &[pending]);

        let app = crate::api::build_router(state.clone());
        let (_, json) = get_json(app, "/api/leaderboard/teams").await;
        assert_eq!(json["standings"][0]["points"], 0.0);

        let app = crate::api::build_router(state);
        let (_, json) = get_json(app, "/api/leaderboard/teams?status=pending").await;
        assert_eq!(json["standings"][0]["points"], 5.0);
    }

    #[tokio::test]
    async fn test_top_candidates() {
        let (tmp, state) = setup_state();
        write_entities(tmp.path(), EntityType::Team, &[team("A", "Alpha")]);
        write_entities(
            tmp.path(),
            EntityType::Candidate,
            &[
                candidate("101", "Amina", "A"),
                candidate("102", "Bilal", "A"),
                candidate("103", "Noor", "A"),
            ],
        );
        write_entities(
            tmp.path(),
            EntityType::Result,
            &[published_result(
                "prog-1",
                vec![
                    CandidateAward::new("101").with_grade("A"),
                    CandidateAward::new("102"),
                ],
            )],
        );

        let app = crate::api::build_router(state);
        let (status, json) = get_json(app, "/api/leaderboard/candidates").await;

        assert_eq!(status, StatusCode::OK);
        let candidates = json["candidates"].as_array().unwrap();
        // Only winners appear, never the idle candidate 103
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0]["chest_number"], "101");
        assert_eq!(candidates[0]["name"], "Amina");
        assert_eq!(candidates[0]["points"], 10.0);
        assert_eq!(candidates[1]["chest_number"], "102");
    }

    #[tokio::test]
    async fn test_top_candidates_unknown_candidate_label() {
        let (tmp, state) = setup_state();
        write_entities(tmp.path(), EntityType::Team, &[team("A", "Alpha")]);
        write_entities(
            tmp.path(),
            EntityType::Result,
            &[published_result("prog-1", vec![CandidateAward::new("999")])],
        );

        let app = crate::api::build_router(state);
        let (status, json) = get_json(app, "/api/leaderboard/candidates").await;

        assert_eq!(status, StatusCode::OK);
        let candidates = json["candidates"].as_array().unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0]["name"], "Unknown");
        assert!(candidates[0]["team_code"].is_null());
    }

    #[tokio::test]
    async fn test_overview() {
        let (tmp, state) = setup_state();
        write_entities(
            tmp.path(),
            EntityType::Team,
            &[team("A", "Alpha"), team("B", "Beta")],
        );
        write_entities(
            tmp.path(),
            EntityType::Candidate,
            &[candidate("101", "Amina", "A")],
        );
        let programme = Programme::new(
            "P101".to_string(),
            "Classical Solo".to_string(),
            Category::Arts,
            Section::Senior,
            PositionType::Individual,
        );
        write_entities(tmp.path(), EntityType::Programme, &[programme]);
        write_entities(
            tmp.path(),
            EntityType::ProgrammeParticipant,
            &[ProgrammeParticipant::new(
                EntityId::from("prog-1"),
                "A".to_string(),
                vec!["101".to_string()],
            )],
        );
        let mut pending = published_result("prog-2", vec![]);
        pending.status = ResultStatus::Pending;
        write_entities(
            tmp.path(),
            EntityType::Result,
            &[
                published_result("prog-1", vec![CandidateAward::new("101")]),
                pending,
            ],
        );

        let app = crate::api::build_router(state);
        let (status, json) = get_json(app, "/api/leaderboard/overview").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total_teams"], 2);
        assert_eq!(json["total_candidates"], 1);
        assert_eq!(json["total_programmes"], 1);
        assert_eq!(json["total_registrations"], 1);
        assert_eq!(json["pending_results"], 1);
        assert_eq!(json["published_results"], 1);
        assert_eq!(json["leading_team"]["code"], "A");
        assert_eq!(json["leading_team"]["points"], 5.0);
    }

    #[tokio::test]
    async fn test_overview_empty_store() {
        let (_tmp, state) = setup_state();
        let app = crate::api::build_router(state);
        let (status, json) = get_json(app, "/api/leaderboard/overview").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total_teams"], 0);
        assert!(json["leading_team"].is_null());
    }
}
