use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{dedup_by_key, ApiError};
use crate::models::{Category, Programme, ResultRecord, ResultStatus, Winners};
use crate::scoring::enrich_results;
use crate::storage::{EntityType, JsonlStore};

/// One result with its programme metadata for display.
#[derive(Debug, Serialize)]
pub struct ResultView {
    #[serde(flatten)]
    pub result: ResultRecord,
    pub programme_name: String,
    pub programme_code: Option<String>,
    pub programme_category: Option<Category>,
}

#[derive(Debug, Serialize)]
pub struct ResultsResponse {
    pub results: Vec<ResultView>,
}

fn read_results(state: &AppState) -> Result<Vec<ResultRecord>, ApiError> {
    let store = JsonlStore::<ResultRecord>::for_entity(&state.storage, EntityType::Result);
    let results = store
        .read_all()
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(dedup_by_key(results, |r| r.id.as_str().to_string()))
}

fn to_views(state: &AppState, results: Vec<ResultRecord>) -> Result<Vec<ResultView>, ApiError> {
    let programmes = JsonlStore::<Programme>::for_entity(&state.storage, EntityType::Programme)
        .read_all()
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(enrich_results(&results, &programmes)
        .into_iter()
        .map(|enriched| ResultView {
            programme_name: enriched.display_name().to_string(),
            programme_code: enriched.programme_code.clone(),
            programme_category: enriched.programme_category,
            result: enriched.result,
        })
        .collect())
}

pub async fn list_results(
    State(state): State<AppState>,
) -> Result<Json<ResultsResponse>, ApiError> {
    let results = read_results(&state)?;
    Ok(Json(ResultsResponse {
        results: to_views(&state, results)?,
    }))
}

#[derive(Debug, Deserialize)]
pub struct StatusParams {
    pub status: ResultStatus,
}

pub async fn list_by_status(
    State(state): State<AppState>,
    Query(params): Query<StatusParams>,
) -> Result<Json<ResultsResponse>, ApiError> {
    let results = read_results(&state)?;
    let filtered: Vec<ResultRecord> = results
        .into_iter()
        .filter(|r| r.status == params.status)
        .collect();
    Ok(Json(ResultsResponse {
        results: to_views(&state, filtered)?,
    }))
}

#[derive(Debug, Deserialize)]
pub struct CreateResultBody {
    pub programme_id: String,
    pub winners: Winners,
    pub first_points: f64,
    pub second_points: f64,
    pub third_points: f64,
    pub notes: Option<String>,
}

pub async fn create_result(
    State(state): State<AppState>,
    Json(body): Json<CreateResultBody>,
) -> Result<Json<ResultView>, ApiError> {
    let _guard = state.write_lock.lock().await;

    let programmes = JsonlStore::<Programme>::for_entity(&state.storage, EntityType::Programme)
        .read_all()
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    let programme = programmes
        .iter()
        .find(|p| p.id.as_str() == body.programme_id)
        .ok_or_else(|| ApiError::NotFound(format!("programme {}", body.programme_id)))?;

    let mut result = ResultRecord::new(
        programme.id.clone(),
        programme.section,
        programme.position_type,
        body.winners,
        body.first_points,
        body.second_points,
        body.third_points,
    )
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    result.notes = body.notes;

    let store = JsonlStore::<ResultRecord>::for_entity(&state.storage, EntityType::Result);
    let existing = store
        .read_all()
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    if existing.iter().any(|r| r.id == result.id) {
        return Err(ApiError::Conflict(format!(
            "a result for programme {} already exists",
            programme.code
        )));
    }

    store
        .append(&result)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let mut views = to_views(&state, vec![result])?;
    Ok(Json(views.remove(0)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusBody {
    pub status: ResultStatus,
    pub notes: Option<String>,
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateStatusBody>,
) -> Result<Json<ResultView>, ApiError> {
    let _guard = state.write_lock.lock().await;

    let store = JsonlStore::<ResultRecord>::for_entity(&state.storage, EntityType::Result);
    let mut results = read_results(&state)?;

    let target = results
        .iter_mut()
        .find(|r| r.id.as_str() == id)
        .ok_or_else(|| ApiError::NotFound(format!("result {}", id)))?;

    target
        .transition_to(body.status, body.notes)
        .map_err(|e| ApiError::Conflict(e.to_string()))?;
    let updated = target.clone();

    store
        .write_all(&results)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let mut views = to_views(&state, vec![updated])?;
    Ok(Json(views.remove(0)))
}

#[derive(Debug, Deserialize)]
pub struct BulkStatusBody {
    pub result_ids: Vec<String>,
    pub status: ResultStatus,
}

#[derive(Debug, Serialize)]
pub struct BulkStatusResponse {
    pub modified_count: u32,
}

/// Bulk status transition. Results whose current status does not allow
/// the transition are left untouched and not counted.
pub async fn bulk_update_status(
    State(state): State<AppState>,
    Json(body): Json<BulkStatusBody>,
) -> Result<Json<BulkStatusResponse>, ApiError> {
    let _guard = state.write_lock.lock().await;

    let store = JsonlStore::<ResultRecord>::for_entity(&state.storage, EntityType::Result);
    let mut results = read_results(&state)?;

    let mut modified_count = 0u32;
    for result in results.iter_mut() {
        if !body.result_ids.iter().any(|id| id == result.id.as_str()) {
            continue;
        }
        if result.transition_to(body.status, None).is_ok() {
            modified_count += 1;
        }
    }

    if modified_count > 0 {
        store
            .write_all(&results)
            .map_err(|e| ApiError::Internal(e.to_string()))?;
    }

    Ok(Json(BulkStatusResponse { modified_count }))
}
