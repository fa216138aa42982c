use serde::{Deserialize, Serialize};

use crate::core::types::Strand;
use crate::matching::result::Match;

/// Serializable snapshot of a match tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    pub start: i64,
    pub end: i64,
    pub length: usize,
    pub strand: Strand,
    pub similarity: f64,
    pub impact: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letters: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_matches: Vec<MatchReport>,
}

impl From<&Match> for MatchReport {
    fn from(m: &Match) -> Self {
        Self {
            pattern: m.pattern_name().map(str::to_string),
            start: m.start(),
            end: m.end(),
            length: m.length(),
            strand: m.strand(),
            similarity: m.similarity(),
            impact: m.impact(),
            letters: m.letters(),
            sub_matches: m.sub_matches().iter().map(MatchReport::from).collect(),
        }
    }
}

/// All matches found in one sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchReport {
    pub sequence: String,
    pub matches: Vec<MatchReport>,
}

impl SearchReport {
    pub fn new(sequence: impl Into<String>, matches: &[Match]) -> Self {
        Self {
            sequence: sequence.into(),
            matches: matches.iter().map(MatchReport::from).collect(),
        }
    }

    /// Pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
