//! Candidate and team lookup indexes.
//!
//! Built once per aggregation pass so attribution is O(1) per winner
//! entry instead of a linear scan per result.

use std::collections::HashMap;

use crate::models::{Candidate, Team};

/// Lookup indexes over the reference data for one aggregation pass.
pub struct Roster<'a> {
    candidates: HashMap<&'a str, &'a Candidate>,
    teams: HashMap<&'a str, &'a Team>,
    team_codes: Vec<&'a str>,
}

impl<'a> Roster<'a> {
    /// Build indexes from the reference slices.
    pub fn new(teams: &'a [Team], candidates: &'a [Candidate]) -> Self {
        Self {
            candidates: candidates
                .iter()
                .map(|c| (c.chest_number.as_str(), c))
                .collect(),
            teams: teams.iter().map(|t| (t.code.as_str(), t)).collect(),
            team_codes: teams.iter().map(|t| t.code.as_str()).collect(),
        }
    }

    /// Look up a candidate by chest number.
    pub fn candidate(&self, chest_number: &str) -> Option<&'a Candidate> {
        self.candidates.get(chest_number).copied()
    }

    /// Look up a team by code.
    pub fn team(&self, team_code: &str) -> Option<&'a Team> {
        self.teams.get(team_code).copied()
    }

    /// Team code that owns a chest number.
    ///
    /// Prefers the candidate record's explicit team field; falls back to
    /// [`infer_team_code`] only when the candidate is unknown
    /// (legacy/malformed data).
    pub fn team_of(&self, chest_number: &str) -> Option<String> {
        if let Some(candidate) = self.candidate(chest_number) {
            return Some(candidate.team.clone());
        }
        infer_team_code(chest_number, &self.team_codes)
    }
}

/// Guess the owning team from a chest number alone.
///
/// Legacy fallback for records predating the explicit team field. Tries,
/// in order: 3-letter prefix against known codes, 2-letter hardcoded
/// aliases, numeric banding, substring containment. Returns `None` when
/// nothing matches.
pub fn infer_team_code(chest_number: &str, known_codes: &[&str]) -> Option<String> {
    let chest = chest_number.trim().to_uppercase();
    if chest.is_empty() {
        return None;
    }

    // 3-letter prefix match
    if let Some(prefix) = chest.get(..3) {
        if let Some(code) = known_codes.iter().find(|c| c.eq_ignore_ascii_case(prefix)) {
            return Some(code.to_string());
        }
    }

    // 2-letter aliases from the old numbering scheme
    if let Some(prefix) = chest.get(..2) {
        let alias = match prefix {
            "SM" => Some("SMD"),
            "IN" => Some("INT"),
            "AQ" => Some("AQS"),
            _ => None,
        };
        if let Some(code) = alias {
            return Some(code.to_string());
        }
    }

    // Numeric chest-number bands
    if let Ok(n) = chest.parse::<u32>() {
        let band = match n {
            600..=699 => Some("AQS"),
            400..=499 => Some("INT"),
            200..=299 => Some("SMD"),
            100..=199 => Some("A"),
            _ => None,
        };
        if let Some(code) = band {
            return Some(code.to_string());
        }
    }

    // Substring containment against known codes
    known_codes
        .iter()
        .find(|code| chest.contains(&code.to_uppercase()))
        .map(|code| code.to_string())
}
