use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::{dedup_by_key, ApiError};
use crate::models::Team;
use crate::storage::{EntityType, JsonlStore};

#[derive(Debug, Serialize)]
pub struct TeamsResponse {
    pub teams: Vec<Team>,
}

pub async fn list_teams(State(state): State<AppState>) -> Result<Json<TeamsResponse>, ApiError> {
    let store = JsonlStore::<Team>::for_entity(&state.storage, EntityType::Team);
    let teams = store
        .read_all()
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let mut teams = dedup_by_key(teams, |t| t.code.clone());
    teams.sort_by(|a, b| a.code.cmp(&b.code));

    Ok(Json(TeamsResponse { teams }))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{get_json, setup_state, write_entities};
    use crate::models::Team;
    use crate::storage::EntityType;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_list_teams() {
        let (tmp, state) = setup_state();
        write_entities(
            tmp.path(),
            EntityType::Team,
            &[
                Team::new("SMD".to_string(), "Samad".to_string(), "#e63946".to_string()),
                Team::new("AQS".to_string(), "Aqsa".to_string(), "#2a9d8f".to_string()),
            ],
        );

        let app = crate::api::build_router(state);
        let (status, json) = get_json(app, "/api/teams").await;

        assert_eq!(status, StatusCode::OK);
        let teams = json["teams"].as_array().unwrap();
        assert_eq!(teams.len(), 2);
        // Sorted by code
        assert_eq!(teams[0]["code"], "AQS");
        assert_eq!(teams[1]["code"], "SMD");
    }

    #[tokio::test]
    async fn test_list_teams_dedups_by_code() {
        let (tmp, state) = setup_state();
        write_entities(
            tmp.path(),
            EntityType::Team,
            &[
                Team::new("SMD".to_string(), "Old Name".to_string(), "#000".to_string()),
                Team::new("SMD".to_string(), "New Name".to_string(), "#fff".to_string()),
            ],
        );

        let app = crate::api::build_router(state);
        let (status, json) = get_json(app, "/api/teams").await;

        assert_eq!(status, StatusCode::OK);
        let teams = json["teams"].as_array().unwrap();
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0]["name"], "New Name");
    }

    #[tokio::test]
    async fn test_list_teams_empty() {
        let (_tmp, state) = setup_state();
        let app = crate::api::build_router(state);
        let (status, json) = get_json(app, "/api/teams").await;

        assert_eq!(status, StatusCode::OK);
        assert!(json["teams"].as_array().unwrap().is_empty());
    }
}
