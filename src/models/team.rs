//! Competing team model.

use serde::{Deserialize, Serialize};

/// A competing team.
///
/// Static reference data created by festival admins before registration
/// opens; rarely mutated once the competition is running.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    /// Short unique code (e.g. "SMD", "INT", "AQS")
    pub code: String,

    /// Display name
    pub name: String,

    /// Accent color for dashboards (hex string)
    pub color: String,

    /// Optional description
    pub description: Option<String>,
}

impl Team {
    /// Create a new Team.
    pub fn new(code: String, name: String, color: String) -> Self {
        Self {
            code,
            name,
            color,
            description: None,
        }
    }

    /// Builder method to set the description.
    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }
}
