use serde::{Deserialize, Serialize};

/// Strand a match was found on.
///
/// Tri-state: a composite match built from sub-matches is forward by
/// convention, while matches that never looked at orientation stay unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strand {
    Forward,
    Reverse,
    #[default]
    Unknown,
}

impl Strand {
    /// Parse a strand from its usual textual forms (`+`, `-`, `.`, names).
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "+" | "forward" | "1" | "+1" => Strand::Forward,
            "-" | "reverse" | "-1" => Strand::Reverse,
            _ => Strand::Unknown,
        }
    }
}

impl std::fmt::Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Forward => write!(f, "+"),
            Self::Reverse => write!(f, "-"),
            Self::Unknown => write!(f, "."),
        }
    }
}
