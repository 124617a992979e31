use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{dedup_by_key, ApiError};
use crate::models::{Category, Programme, Section};
use crate::storage::{EntityType, JsonlStore};

#[derive(Debug, Deserialize)]
pub struct ListProgrammesParams {
    pub category: Option<Category>,
    pub section: Option<Section>,
}

#[derive(Debug, Serialize)]
pub struct ProgrammesResponse {
    pub programmes: Vec<Programme>,
}

pub async fn list_programmes(
    State(state): State<AppState>,
    Query(params): Query<ListProgrammesParams>,
) -> Result<Json<ProgrammesResponse>, ApiError> {
    let store = JsonlStore::<Programme>::for_entity(&state.storage, EntityType::Programme);
    let programmes = store
        .read_all()
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let mut programmes = dedup_by_key(programmes, |p| p.id.as_str().to_string());

    if let Some(category) = params.category {
        programmes.retain(|p| p.category == category);
    }
    if let Some(section) = params.section {
        programmes.retain(|p| p.section == section);
    }

    programmes.sort_by(|a, b| a.code.cmp(&b.code));

    Ok(Json(ProgrammesResponse { programmes }))
}
