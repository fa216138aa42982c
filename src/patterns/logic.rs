use crate::core::sequence::Sequence;
use crate::matching::context::MatchContext;
use crate::matching::result::Match;
use crate::patterns::list::PatternList;
use crate::patterns::{Matcher, Pattern, PatternCore, PatternError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicOp {
    And,
    Or,
    Xor,
}

impl LogicOp {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "AND" => Some(Self::And),
            "OR" => Some(Self::Or),
            "XOR" => Some(Self::Xor),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Xor => "XOR",
        }
    }

    /// Whether `matched` of `total` children satisfy the operation
    fn holds(&self, matched: usize, total: usize) -> bool {
        match self {
            Self::And => matched == total,
            Self::Or => matched >= 1,
            Self::Xor => matched == 1,
        }
    }
}

/// Combines children matched at the same position with AND, OR or XOR.
///
/// Every child is evaluated. The similarity is the impact-weighted mean over
/// the children that matched.
#[derive(Debug, Clone)]
pub struct Logic {
    core: PatternCore,
    op: LogicOp,
    patterns: PatternList,
}

impl Logic {
    /// # Errors
    ///
    /// Returns `PatternError::Validation` for an invalid threshold and
    /// `PatternError::DuplicateName` for children sharing a name.
    pub fn new(name: &str, op: LogicOp, threshold: f64, patterns: Vec<Pattern>) -> Result<Self, PatternError> {
        Ok(Self {
            core: PatternCore::new(name, threshold)?,
            op,
            patterns: PatternList::from_patterns(patterns)?,
        })
    }

    pub fn op(&self) -> LogicOp {
        self.op
    }

    pub fn patterns(&self) -> &PatternList {
        &self.patterns
    }
}

impl Matcher for Logic {
    fn core(&self) -> &PatternCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PatternCore {
        &mut self.core
    }

    fn match_at(&mut self, sequence: &Sequence, position: i64, ctx: &mut MatchContext) -> Option<Match> {
        let total = self.patterns.len();
        if total == 0 {
            return None;
        }
        let subs: Vec<Match> = self
            .patterns
            .iter_mut()
            .filter_map(|pattern| pattern.match_at(sequence, position, ctx))
            .collect();
        if !self.op.holds(subs.len(), total) {
            return None;
        }
        let m = Match::composite(sequence, subs);
        self.core.accepts(m.similarity()).then_some(m)
    }

    fn reset(&mut self) {
        self.patterns.iter_mut().for_each(Pattern::reset);
    }
}
