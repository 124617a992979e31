use std::collections::HashSet;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{dedup_by_key, ApiError};
use crate::models::{
    Candidate, Programme, ProgrammeParticipant, RegistrationStatus, ResultRecord, Team,
};
use crate::storage::{EntityType, JsonlStore};

#[derive(Debug, Deserialize)]
pub struct ListRegistrationsParams {
    pub programme_id: Option<String>,
    pub team: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegistrationsResponse {
    pub registrations: Vec<ProgrammeParticipant>,
}

pub async fn list_registrations(
    State(state): State<AppState>,
    Query(params): Query<ListRegistrationsParams>,
) -> Result<Json<RegistrationsResponse>, ApiError> {
    let store = JsonlStore::<ProgrammeParticipant>::for_entity(
        &state.storage,
        EntityType::ProgrammeParticipant,
    );
    let registrations = store
        .read_all()
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let mut registrations = dedup_by_key(registrations, |r| r.id.as_str().to_string());

    if let Some(ref programme_id) = params.programme_id {
        registrations.retain(|r| r.programme_id.as_str() == programme_id);
    }
    if let Some(ref team) = params.team {
        registrations.retain(|r| r.team_code.eq_ignore_ascii_case(team));
    }

    Ok(Json(RegistrationsResponse { registrations }))
}

#[derive(Debug, Deserialize)]
pub struct RegistrationBody {
    pub programme_id: String,
    pub team_code: String,
    pub participants: Vec<String>,
    pub status: Option<RegistrationStatus>,
}

/// Validate a registration body against the reference data.
///
/// Checks the programme and team exist, participant counts are within the
/// programme's limits, and every chest number belongs to the registering
/// team and the programme's section.
fn validate_registration(
    state: &AppState,
    body: &RegistrationBody,
) -> Result<Programme, ApiError> {
    let programmes = JsonlStore::<Programme>::for_entity(&state.storage, EntityType::Programme)
        .read_all()
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    let programme = programmes
        .into_iter()
        .find(|p| p.id.as_str() == body.programme_id)
        .ok_or_else(|| ApiError::NotFound(format!("programme {}", body.programme_id)))?;

    let teams = JsonlStore::<Team>::for_entity(&state.storage, EntityType::Team)
        .read_all()
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    if !teams.iter().any(|t| t.code == body.team_code) {
        return Err(ApiError::NotFound(format!("team {}", body.team_code)));
    }

    let count = body.participants.len() as u32;
    if count < programme.required_participants || count > programme.max_participants {
        return Err(ApiError::BadRequest(format!(
            "programme {} requires {}..={} participants, got {}",
            programme.code, programme.required_participants, programme.max_participants, count
        )));
    }

    let unique: HashSet<&String> = body.participants.iter().collect();
    if unique.len() != body.participants.len() {
        return Err(ApiError::BadRequest(
            "duplicate chest numbers in participants".to_string(),
        ));
    }

    let candidates = JsonlStore::<Candidate>::for_entity(&state.storage, EntityType::Candidate)
        .read_all()
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    for chest_number in &body.participants {
        let candidate = candidates
            .iter()
            .find(|c| &c.chest_number == chest_number)
            .ok_or_else(|| ApiError::NotFound(format!("candidate {}", chest_number)))?;
        if candidate.team != body.team_code {
            return Err(ApiError::BadRequest(format!(
                "candidate {} belongs to team {}, not {}",
                chest_number, candidate.team, body.team_code
            )));
        }
        if !programme.accepts(candidate) {
            return Err(ApiError::BadRequest(format!(
                "candidate {} is in section {}, programme {} is for {}",
                chest_number, candidate.section, programme.code, programme.section
            )));
        }
    }

    Ok(programme)
}

/// Registrations lock once a result for the programme has been entered.
fn registration_locked(state: &AppState, programme_id: &str) -> Result<bool, ApiError> {
    let results = JsonlStore::<ResultRecord>::for_entity(&state.storage, EntityType::Result)
        .read_all()
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(results.iter().any(|r| r.programme_id.as_str() == programme_id))
}

pub async fn create_registration(
    State(state): State<AppState>,
    Json(body): Json<RegistrationBody>,
) -> Result<Json<ProgrammeParticipant>, ApiError> {
    let _guard = state.write_lock.lock().await;

    validate_registration(&state, &body)?;
    if registration_locked(&state, &body.programme_id)? {
        return Err(ApiError::Conflict(format!(
            "results already entered for programme {}",
            body.programme_id
        )));
    }

    let store = JsonlStore::<ProgrammeParticipant>::for_entity(
        &state.storage,
        EntityType::ProgrammeParticipant,
    );
    let existing = store
        .read_all()
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    if existing
        .iter()
        .any(|r| r.programme_id.as_str() == body.programme_id && r.team_code == body.team_code)
    {
        return Err(ApiError::Conflict(format!(
            "team {} is already registered for programme {}",
            body.team_code, body.programme_id
        )));
    }

    let mut registration = ProgrammeParticipant::new(
        body.programme_id.as_str().into(),
        body.team_code,
        body.participants,
    );
    if let Some(status) = body.status {
        registration = registration.with_status(status);
    }

    store
        .append(&registration)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(registration))
}

pub async fn update_registration(
    State(state): State<AppState>,
    Json(body): Json<RegistrationBody>,
) -> Result<Json<ProgrammeParticipant>, ApiError> {
    let _guard = state.write_lock.lock().await;

    validate_registration(&state, &body)?;
    if registration_locked(&state, &body.programme_id)? {
        return Err(ApiError::Conflict(format!(
            "results already entered for programme {}",
            body.programme_id
        )));
    }

    let store = JsonlStore::<ProgrammeParticipant>::for_entity(
        &state.storage,
        EntityType::ProgrammeParticipant,
    );
    let registrations = store
        .read_all()
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    let mut registrations = dedup_by_key(registrations, |r| r.id.as_str().to_string());

    let target = registrations
        .iter_mut()
        .find(|r| r.programme_id.as_str() == body.programme_id && r.team_code == body.team_code)
        .ok_or_else(|| {
            ApiError::NotFound(format!(
                "no registration for team {} in programme {}",
                body.team_code, body.programme_id
            ))
        })?;

    target.participants = body.participants;
    if let Some(status) = body.status {
        target.status = status;
    }
    let updated = target.clone();

    store
        .write_all(&registrations)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(updated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{get_json, send_json, setup_state, write_entities};
    use crate::models::{Category, PositionType, Section, Winners};
    use axum::http::StatusCode;
    use serde_json::json;

    fn seed_reference(data_dir: &std::path::Path) -> Programme {
        let programme = Programme::new(
            "P205".to_string(),
            "Group Song".to_string(),
            Category::Arts,
            Section::Junior,
            PositionType::Group,
        )
        .with_participant_limits(2, 3);

        write_entities(data_dir, EntityType::Programme, &[programme.clone()]);
        write_entities(
            data_dir,
            EntityType::Team,
            &[Team::new("SMD".to_string(), "Samad".to_string(), "#e63946".to_string())],
        );
        write_entities(
            data_dir,
            EntityType::Candidate,
            &[
                Candidate::new("201".to_string(), "Amina".to_string(), "SMD".to_string(), Section::Junior),
                Candidate::new("202".to_string(), "Bilal".to_string(), "SMD".to_string(), Section::Junior),
                Candidate::new("301".to_string(), "Noor".to_string(), "INT".to_string(), Section::Junior),
                Candidate::new("203".to_string(), "Zain".to_string(), "SMD".to_string(), Section::Senior),
            ],
        );
        programme
    }

    fn body(programme: &Programme, participants: &[&str]) -> serde_json::Value {
        json!({
            "programme_id": programme.id.as_str(),
            "team_code": "SMD",
            "participants": participants,
        })
    }

    #[tokio::test]
    async fn test_create_registration() {
        let (tmp, state) = setup_state();
        let programme = seed_reference(tmp.path());

        let app = crate::api::build_router(state.clone());
        let (status, json) = send_json(
            app,
            "POST",
            "/api/programme-participants",
            &body(&programme, &["201", "202"]),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["team_code"], "SMD");
        assert_eq!(json["status"], "registered");

        let app = crate::api::build_router(state);
        let (status, json) = get_json(app, "/api/programme-participants?team=SMD").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["registrations"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_registration() {
        let (tmp, state) = setup_state();
        let programme = seed_reference(tmp.path());

        let app = crate::api::build_router(state.clone());
        let (status, _) = send_json(
            app,
            "POST",
            "/api/programme-participants",
            &body(&programme, &["201", "202"]),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let app = crate::api::build_router(state);
        let (status, _) = send_json(
            app,
            "POST",
            "/api/programme-participants",
            &body(&programme, &["201", "202"]),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_create_rejects_participant_count_out_of_bounds() {
        let (tmp, state) = setup_state();
        let programme = seed_reference(tmp.path());

        let app = crate::api::build_router(state.clone());
        let (status, _) = send_json(
            app,
            "POST",
            "/api/programme-participants",
            &body(&programme, &["201"]),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_rejects_wrong_team_candidate() {
        let (tmp, state) = setup_state();
        let programme = seed_reference(tmp.path());

        let app = crate::api::build_router(state);
        // 301 belongs to INT
        let (status, _) = send_json(
            app,
            "POST",
            "/api/programme-participants",
            &body(&programme, &["201", "301"]),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_rejects_wrong_section_candidate() {
        let (tmp, state) = setup_state();
        let programme = seed_reference(tmp.path());

        let app = crate::api::build_router(state);
        // 203 is senior, programme is junior
        let (status, _) = send_json(
            app,
            "POST",
            "/api/programme-participants",
            &body(&programme, &["201", "203"]),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_candidate() {
        let (tmp, state) = setup_state();
        let programme = seed_reference(tmp.path());

        let app = crate::api::build_router(state);
        let (status, _) = send_json(
            app,
            "POST",
            "/api/programme-participants",
            &body(&programme, &["201", "999"]),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_registration_locked_after_result() {
        let (tmp, state) = setup_state();
        let programme = seed_reference(tmp.path());

        let result = ResultRecord::new(
            programme.id.clone(),
            Section::Junior,
            PositionType::Group,
            Winners::candidates(),
            10.0,
            6.0,
            3.0,
        )
        .unwrap();
        write_entities(tmp.path(), EntityType::Result, &[result]);

        let app = crate::api::build_router(state);
        let (status, _) = send_json(
            app,
            "POST",
            "/api/programme-participants",
            &body(&programme, &["201", "202"]),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_update_registration() {
        let (tmp, state) = setup_state();
        let programme = seed_reference(tmp.path());

        let app = crate::api::build_router(state.clone());
        let (status, _) = send_json(
            app,
            "POST",
            "/api/programme-participants",
            &body(&programme, &["201", "202"]),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let mut updated = body(&programme, &["202", "201"]);
        updated["status"] = json!("confirmed");

        let app = crate::api::build_router(state);
        let (status, json) =
            send_json(app, "PUT", "/api/programme-participants", &updated).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "confirmed");
        assert_eq!(json["participants"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_missing_registration() {
        let (tmp, state) = setup_state();
        let programme = seed_reference(tmp.path());

        let app = crate::api::build_router(state);
        let (status, _) = send_json(
            app,
            "PUT",
            "/api/programme-participants",
            &body(&programme, &["201", "202"]),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
