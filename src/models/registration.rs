//! Programme registration (team entry) model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EntityId, ProgrammeId, RegistrationId};

/// Registration lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    #[default]
    Registered,
    Confirmed,
}

impl std::fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistrationStatus::Registered => write!(f, "registered"),
            RegistrationStatus::Confirmed => write!(f, "confirmed"),
        }
    }
}

/// A team's entry into a programme, listing the candidates it fields.
///
/// Editable until a result for the programme has been entered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgrammeParticipant {
    /// Unique identifier (derived from programme_id + team_code)
    pub id: RegistrationId,

    /// Programme being entered
    pub programme_id: ProgrammeId,

    /// Registering team
    pub team_code: String,

    /// Chest numbers of the fielded candidates
    pub participants: Vec<String>,

    /// Registration lifecycle status
    pub status: RegistrationStatus,

    /// When this record was created
    pub created_at: DateTime<Utc>,
}

impl ProgrammeParticipant {
    /// Create a new registration with auto-generated ID.
    pub fn new(programme_id: ProgrammeId, team_code: String, participants: Vec<String>) -> Self {
        let id = EntityId::generate(&[programme_id.as_str(), &team_code]);
        Self {
            id,
            programme_id,
            team_code,
            participants,
            status: RegistrationStatus::default(),
            created_at: Utc::now(),
        }
    }

    /// Builder method to set the status.
    pub fn with_status(mut self, status: RegistrationStatus) -> Self {
        self.status = status;
        self
    }
}
