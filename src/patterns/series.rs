use crate::core::sequence::Sequence;
use crate::matching::context::MatchContext;
use crate::matching::result::Match;
use crate::patterns::chain::{Chain, ChainLink};
use crate::patterns::list::PatternList;
use crate::patterns::{Matcher, Pattern, PatternCore, PatternError, SearchMode};

/// Children matched one directly after the other.
///
/// In ALL mode every combination of child alternatives is produced, one per
/// call at the same position (increment 0 while more follow). In BEST mode
/// each call returns the highest scoring combination.
#[derive(Debug, Clone)]
pub struct Series {
    core: PatternCore,
    mode: SearchMode,
    patterns: PatternList,
    chain: Chain,
    increment: usize,
}

impl Series {
    /// # Errors
    ///
    /// Returns `PatternError::Validation` for an invalid threshold and
    /// `PatternError::DuplicateName` for children sharing a name.
    pub fn new(
        name: &str,
        mode: SearchMode,
        threshold: f64,
        patterns: Vec<Pattern>,
    ) -> Result<Self, PatternError> {
        let patterns = PatternList::from_patterns(patterns)?;
        let links = (0..patterns.len())
            .map(|i| match i {
                0 => ChainLink::origin(),
                _ => ChainLink::follow(i - 1),
            })
            .collect();
        Ok(Self {
            core: PatternCore::new(name, threshold)?,
            mode,
            patterns,
            chain: Chain::new(links),
            increment: 1,
        })
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn patterns(&self) -> &PatternList {
        &self.patterns
    }
}

impl Matcher for Series {
    fn core(&self) -> &PatternCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PatternCore {
        &mut self.core
    }

    fn match_at(&mut self, sequence: &Sequence, position: i64, ctx: &mut MatchContext) -> Option<Match> {
        let patterns = self.patterns.as_mut_slice();
        let found = match self.mode {
            SearchMode::All => self.chain.next_accepted(&self.core, patterns, sequence, position, ctx),
            SearchMode::Best => self.chain.best(&self.core, patterns, sequence, position, ctx),
        };
        self.increment = if self.chain.is_pending() { 0 } else { 1 };
        found
    }

    fn increment(&self) -> usize {
        self.increment
    }

    fn reset(&mut self) {
        self.chain.reset();
        self.patterns.iter_mut().for_each(Pattern::reset);
        self.increment = 1;
    }
}
