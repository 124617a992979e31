//! Competition result model.
//!
//! A result records the podium for one programme. Individual and group
//! programmes award candidates by chest number; general programmes award
//! whole teams. The two shapes are a tagged union so a record can never
//! carry both.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{EntityId, PositionType, ProgrammeId, ResultId, Section};

/// Errors raised when constructing or mutating a result.
#[derive(Debug, Error)]
pub enum ResultError {
    #[error("winner shape does not match position type {0}")]
    WinnerShapeMismatch(PositionType),

    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition { from: ResultStatus, to: ResultStatus },
}

/// Result review lifecycle.
///
/// Normal flow is pending -> checked -> published. Moving back to pending
/// is the admin correction path; skipping review is not allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    #[default]
    Pending,
    Checked,
    Published,
}

impl ResultStatus {
    /// Whether a transition from `self` to `next` is allowed.
    pub fn can_transition_to(self, next: ResultStatus) -> bool {
        use ResultStatus::*;
        matches!(
            (self, next),
            (Pending, Checked) | (Checked, Published) | (Checked, Pending) | (Published, Pending)
        )
    }
}

impl std::fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultStatus::Pending => write!(f, "pending"),
            ResultStatus::Checked => write!(f, "checked"),
            ResultStatus::Published => write!(f, "published"),
        }
    }
}

impl std::str::FromStr for ResultStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ResultStatus::Pending),
            "checked" => Ok(ResultStatus::Checked),
            "published" => Ok(ResultStatus::Published),
            other => Err(format!("unknown result status: {}", other)),
        }
    }
}

/// A candidate awarded a position, with an optional letter grade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateAward {
    pub chest_number: String,
    pub grade: Option<String>,
}

impl CandidateAward {
    pub fn new(chest_number: &str) -> Self {
        Self {
            chest_number: chest_number.to_string(),
            grade: None,
        }
    }

    pub fn with_grade(mut self, grade: &str) -> Self {
        self.grade = Some(grade.to_string());
        self
    }
}

/// A team awarded a position, with an optional letter grade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamAward {
    pub team_code: String,
    pub grade: Option<String>,
}

impl TeamAward {
    pub fn new(team_code: &str) -> Self {
        Self {
            team_code: team_code.to_string(),
            grade: None,
        }
    }

    pub fn with_grade(mut self, grade: &str) -> Self {
        self.grade = Some(grade.to_string());
        self
    }
}

/// A participation grade handed to a non-placing candidate.
/// Carries its own explicit points; not part of podium scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateParticipation {
    pub chest_number: String,
    pub grade: String,
    pub points: f64,
}

/// A participation grade handed to a non-placing team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamParticipation {
    pub team_code: String,
    pub grade: String,
    pub points: f64,
}

/// The three podium tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    First,
    Second,
    Third,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::First, Tier::Second, Tier::Third];
}

/// Winner arrays, keyed by how the programme is scored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Winners {
    /// Individual and group programmes: chest-number awards.
    Candidates {
        first: Vec<CandidateAward>,
        second: Vec<CandidateAward>,
        third: Vec<CandidateAward>,
        #[serde(default)]
        participation: Vec<CandidateParticipation>,
    },
    /// General programmes: whole-team awards.
    Teams {
        first: Vec<TeamAward>,
        second: Vec<TeamAward>,
        third: Vec<TeamAward>,
        #[serde(default)]
        participation: Vec<TeamParticipation>,
    },
}

impl Winners {
    /// Empty candidate-award shape.
    pub fn candidates() -> Self {
        Winners::Candidates {
            first: Vec::new(),
            second: Vec::new(),
            third: Vec::new(),
            participation: Vec::new(),
        }
    }

    /// Empty team-award shape.
    pub fn teams() -> Self {
        Winners::Teams {
            first: Vec::new(),
            second: Vec::new(),
            third: Vec::new(),
            participation: Vec::new(),
        }
    }

    /// Whether this shape is valid for the given position type.
    pub fn matches(&self, position_type: PositionType) -> bool {
        match self {
            Winners::Candidates { .. } => !position_type.awards_teams(),
            Winners::Teams { .. } => position_type.awards_teams(),
        }
    }

    /// Candidate awards for a tier; empty for team-shaped winners.
    pub fn candidate_awards(&self, tier: Tier) -> &[CandidateAward] {
        match self {
            Winners::Candidates {
                first,
                second,
                third,
                ..
            } => match tier {
                Tier::First => first,
                Tier::Second => second,
                Tier::Third => third,
            },
            Winners::Teams { .. } => &[],
        }
    }

    /// Team awards for a tier; empty for candidate-shaped winners.
    pub fn team_awards(&self, tier: Tier) -> &[TeamAward] {
        match self {
            Winners::Teams {
                first,
                second,
                third,
                ..
            } => match tier {
                Tier::First => first,
                Tier::Second => second,
                Tier::Third => third,
            },
            Winners::Candidates { .. } => &[],
        }
    }
}

/// A result record for one programme.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Unique identifier (derived from programme_id + section)
    pub id: ResultId,

    /// Programme this result belongs to
    pub programme_id: ProgrammeId,

    /// Section copied from the programme at entry time
    pub section: Section,

    /// Scoring granularity copied from the programme at entry time
    pub position_type: PositionType,

    /// Review lifecycle status
    pub status: ResultStatus,

    /// Podium and participation entries
    pub winners: Winners,

    /// Base points for a first place in this programme
    pub first_points: f64,

    /// Base points for a second place
    pub second_points: f64,

    /// Base points for a third place
    pub third_points: f64,

    /// Reviewer notes
    pub notes: Option<String>,

    /// When this record was created
    pub created_at: DateTime<Utc>,
}

impl ResultRecord {
    /// Create a new pending result. Fails if the winner shape does not
    /// match the position type.
    pub fn new(
        programme_id: ProgrammeId,
        section: Section,
        position_type: PositionType,
        winners: Winners,
        first_points: f64,
        second_points: f64,
        third_points: f64,
    ) -> Result<Self, ResultError> {
        if !winners.matches(position_type) {
            return Err(ResultError::WinnerShapeMismatch(position_type));
        }
        let id = EntityId::generate(&["result", programme_id.as_str(), &section.to_string()]);
        Ok(Self {
            id,
            programme_id,
            section,
            position_type,
            status: ResultStatus::default(),
            winners,
            first_points,
            second_points,
            third_points,
            notes: None,
            created_at: Utc::now(),
        })
    }

    /// Base points for the given tier.
    pub fn tier_points(&self, tier: Tier) -> f64 {
        match tier {
            Tier::First => self.first_points,
            Tier::Second => self.second_points,
            Tier::Third => self.third_points,
        }
    }

    /// Move this result to a new status, enforcing the transition rules.
    pub fn transition_to(
        &mut self,
        next: ResultStatus,
        notes: Option<String>,
    ) -> Result<(), ResultError> {
        if !self.status.can_transition_to(next) {
            return Err(ResultError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        if notes.is_some() {
            self.notes = notes;
        }
        Ok(())
    }
}
