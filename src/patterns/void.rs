use crate::core::sequence::Sequence;
use crate::matching::context::MatchContext;
use crate::matching::result::Match;
use crate::patterns::{Matcher, PatternCore};

/// Matches the empty window at any position
#[derive(Debug, Clone)]
pub struct VoidPattern {
    core: PatternCore,
}

impl VoidPattern {
    pub fn new(name: &str) -> Self {
        Self {
            core: PatternCore::named(name),
        }
    }
}

impl Matcher for VoidPattern {
    fn core(&self) -> &PatternCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PatternCore {
        &mut self.core
    }

    fn match_at(&mut self, sequence: &Sequence, position: i64, _ctx: &mut MatchContext) -> Option<Match> {
        Some(Match::found(sequence, position, 0, 1.0))
    }
}
