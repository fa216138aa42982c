use std::collections::HashMap;
use std::sync::Arc;

use crate::matching::result::Match;

/// Latest successful match of every named pattern during one search pass.
///
/// Patterns that refer to earlier matches by name (repeats, constraints,
/// alignments) read them from here. A search keeps one context while it
/// retries a position and clears it when the position moves, so stale
/// matches from previous positions never leak in.
#[derive(Debug, Clone, Default)]
pub struct MatchContext {
    latest: HashMap<Arc<str>, Match>,
}

impl MatchContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `m` as the latest match of the pattern `name`.
    ///
    /// Anonymous patterns are not recorded.
    pub fn record(&mut self, name: &Arc<str>, m: &Match) {
        if name.is_empty() {
            return;
        }
        match self.latest.get_mut(name) {
            Some(existing) => existing.set_from(m),
            None => {
                self.latest.insert(Arc::clone(name), m.clone());
            }
        }
    }

    /// Latest match of the pattern `name`, if it has matched
    pub fn latest(&self, name: &str) -> Option<&Match> {
        self.latest.get(name)
    }

    pub fn clear(&mut self) {
        self.latest.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.latest.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Strand;

    #[test]
    fn test_record_replaces_previous_match() {
        let name: Arc<str> = Arc::from("motif1");
        let mut ctx = MatchContext::new();
        assert!(ctx.latest("motif1").is_none());

        ctx.record(&name, &Match::new(3, 2, Strand::Forward, 1.0).unwrap());
        ctx.record(&name, &Match::new(8, 4, Strand::Forward, 0.5).unwrap());
        let latest = ctx.latest("motif1").unwrap();
        assert_eq!(latest.start(), 8);
        assert_eq!(latest.length(), 4);
    }

    #[test]
    fn test_anonymous_patterns_are_not_recorded() {
        let mut ctx = MatchContext::new();
        ctx.record(&Arc::from(""), &Match::default());
        assert!(ctx.is_empty());
    }
}
