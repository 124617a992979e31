use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{dedup_by_key, ApiError, Pagination, PaginationMeta};
use crate::models::{Candidate, Section};
use crate::storage::{EntityType, JsonlStore};

#[derive(Debug, Deserialize)]
pub struct ListCandidatesParams {
    pub team: Option<String>,
    pub section: Option<Section>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct CandidatesResponse {
    pub candidates: Vec<Candidate>,
    pub pagination: PaginationMeta,
}

pub async fn list_candidates(
    State(state): State<AppState>,
    Query(params): Query<ListCandidatesParams>,
) -> Result<Json<CandidatesResponse>, ApiError> {
    let store = JsonlStore::<Candidate>::for_entity(&state.storage, EntityType::Candidate);
    let candidates = store
        .read_all()
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let mut candidates = dedup_by_key(candidates, |c| c.chest_number.clone());

    if let Some(ref team) = params.team {
        candidates.retain(|c| c.team.eq_ignore_ascii_case(team));
    }
    if let Some(section) = params.section {
        candidates.retain(|c| c.section == section);
    }

    candidates.sort_by(|a, b| a.chest_number.cmp(&b.chest_number));

    let pagination = Pagination::new(params.page, params.page_size);
    let total_items = candidates.len() as u32;
    let meta = PaginationMeta::new(&pagination, total_items);

    let start = pagination.offset() as usize;
    let end = (start + pagination.page_size as usize).min(candidates.len());
    let page = if start < candidates.len() {
        candidates[start..end].to_vec()
    } else {
        Vec::new()
    };

    Ok(Json(CandidatesResponse {
        candidates: page,
        pagination: meta,
    }))
}
