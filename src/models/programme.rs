//! Programme (competition event) model.

use serde::{Deserialize, Serialize};

use super::{Candidate, EntityId, ProgrammeId, Section};

/// Top-level programme category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Arts,
    Sports,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Arts => write!(f, "arts"),
            Category::Sports => write!(f, "sports"),
        }
    }
}

/// Stage/non-stage split within the arts category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Subcategory {
    Stage,
    NonStage,
}

/// Whether a programme's results are scored per individual, per small
/// group of individuals, or per whole team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionType {
    Individual,
    Group,
    General,
}

impl PositionType {
    /// General programmes award whole teams; individual and group
    /// programmes award candidates by chest number.
    pub fn awards_teams(&self) -> bool {
        matches!(self, PositionType::General)
    }
}

impl std::fmt::Display for PositionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PositionType::Individual => write!(f, "individual"),
            PositionType::Group => write!(f, "group"),
            PositionType::General => write!(f, "general"),
        }
    }
}

/// A competition event, defined by admins before registration opens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Programme {
    /// Unique identifier (derived from code + name)
    pub id: ProgrammeId,

    /// Short programme code (e.g. "P101")
    pub code: String,

    /// Programme name
    pub name: String,

    /// arts or sports
    pub category: Category,

    /// Stage/non-stage split (arts only)
    pub subcategory: Option<Subcategory>,

    /// Section this programme is open to
    pub section: Section,

    /// Scoring granularity
    pub position_type: PositionType,

    /// Minimum participants a team must register
    pub required_participants: u32,

    /// Maximum participants a team may register
    pub max_participants: u32,
}

impl Programme {
    /// Create a new Programme with auto-generated ID.
    pub fn new(
        code: String,
        name: String,
        category: Category,
        section: Section,
        position_type: PositionType,
    ) -> Self {
        let id = EntityId::generate(&[&code, &name]);
        Self {
            id,
            code,
            name,
            category,
            subcategory: None,
            section,
            position_type,
            required_participants: 1,
            max_participants: 1,
        }
    }

    /// Builder method to set the subcategory.
    pub fn with_subcategory(mut self, subcategory: Subcategory) -> Self {
        self.subcategory = Some(subcategory);
        self
    }

    /// Builder method to set participant limits.
    pub fn with_participant_limits(mut self, required: u32, max: u32) -> Self {
        self.required_participants = required;
        self.max_participants = max;
        self
    }

    /// Check whether a candidate is eligible for this programme's section.
    /// General programmes accept candidates from any section.
    pub fn accepts(&self, candidate: &Candidate) -> bool {
        self.section == Section::General || candidate.section == self.section
    }
}
