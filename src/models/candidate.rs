//! Candidate (individual competitor) model.

use serde::{Deserialize, Serialize};

/// Age section a candidate or programme belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    Senior,
    Junior,
    SubJunior,
    General,
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Section::Senior => write!(f, "senior"),
            Section::Junior => write!(f, "junior"),
            Section::SubJunior => write!(f, "sub-junior"),
            Section::General => write!(f, "general"),
        }
    }
}

/// An individual competitor, identified by chest number.
///
/// Belongs to exactly one team. Membership is treated as immutable once
/// results reference the candidate; no cascading update is modeled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    /// Unique chest number (e.g. "101", "SMD204")
    pub chest_number: String,

    /// Candidate name
    pub name: String,

    /// Code of the owning team
    pub team: String,

    /// Age section
    pub section: Section,
}

impl Candidate {
    /// Create a new Candidate.
    pub fn new(chest_number: String, name: String, team: String, section: Section) -> Self {
        Self {
            chest_number,
            name,
            team,
            section,
        }
    }
}
