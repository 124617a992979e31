//! Result record normalizer.
//!
//! Joins each result to its programme so downstream consumers can filter
//! and label without re-resolving. A result whose programme is missing
//! keeps `None` metadata and displays as "Unknown Programme"; missing
//! reference data is never an error.

use std::collections::HashMap;

use crate::models::{Category, PositionType, Programme, ResultRecord, Section, Subcategory};

/// Label used when a result's programme cannot be resolved.
pub const UNKNOWN_PROGRAMME: &str = "Unknown Programme";

/// A result augmented with its programme's metadata.
#[derive(Debug, Clone)]
pub struct EnrichedResult {
    pub result: ResultRecord,
    pub programme_name: Option<String>,
    pub programme_code: Option<String>,
    pub programme_category: Option<Category>,
    pub programme_section: Option<Section>,
    pub programme_subcategory: Option<Subcategory>,
    pub programme_position_type: Option<PositionType>,
}

impl EnrichedResult {
    /// Display name, substituting a placeholder for missing programmes.
    pub fn display_name(&self) -> &str {
        self.programme_name.as_deref().unwrap_or(UNKNOWN_PROGRAMME)
    }
}

/// Enrich a batch of results against the full programme list.
///
/// Builds the programme index once; lookup is by `EntityId` equality
/// (IDs are one canonical string type on both sides).
pub fn enrich_results(results: &[ResultRecord], programmes: &[Programme]) -> Vec<EnrichedResult> {
    let index: HashMap<&str, &Programme> = programmes
        .iter()
        .map(|p| (p.id.as_str(), p))
        .collect();

    results
        .iter()
        .map(|result| {
            let programme = index.get(result.programme_id.as_str()).copied();
            EnrichedResult {
                result: result.clone(),
                programme_name: programme.map(|p| p.name.clone()),
                programme_code: programme.map(|p| p.code.clone()),
                programme_category: programme.map(|p| p.category),
                programme_section: programme.map(|p| p.section),
                programme_subcategory: programme.and_then(|p| p.subcategory),
                programme_position_type: programme.map(|p| p.position_type),
            }
        })
        .collect()
}
