use crate::core::sequence::Sequence;
use crate::matching::context::MatchContext;
use crate::matching::result::Match;
use crate::patterns::list::PatternList;
use crate::patterns::{Matcher, Pattern, PatternCore, PatternError, SearchMode};

/// Alternative children tried at the same position.
///
/// ALL mode returns the match of every child (and every alternative of a
/// child) in turn, one per call. BEST mode returns the single highest
/// scoring one. Each result wraps the child's match as its only sub-match.
#[derive(Debug, Clone)]
pub struct Set {
    core: PatternCore,
    mode: SearchMode,
    patterns: PatternList,
    index: usize,
    origin: i64,
    min_increment: Option<usize>,
    increment: usize,
}

impl Set {
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
        Ok(Self {
            core: PatternCore::new(name, threshold)?,
            mode,
            patterns: PatternList::from_patterns(patterns)?,
            index: 0,
            origin: 0,
            min_increment: None,
            increment: 1,
        })
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn patterns(&self) -> &PatternList {
        &self.patterns
    }

    fn track_increment(&mut self, increment: usize) {
        self.min_increment = Some(self.min_increment.map_or(increment, |m| m.min(increment)));
    }

    fn settled_increment(&mut self) -> usize {
        self.min_increment.take().unwrap_or(1).max(1)
    }

    fn match_all(&mut self, sequence: &Sequence, position: i64, ctx: &mut MatchContext) -> Option<Match> {
        if position != self.origin {
            self.index = 0;
            self.min_increment = None;
            self.origin = position;
        }
        while let Some(pattern) = self.patterns.at_mut(self.index) {
            let found = pattern.match_at(sequence, position, ctx);
            let increment = pattern.increment();
            if increment != 0 {
                self.track_increment(increment);
                self.index += 1;
            }
            if let Some(m) = found {
                let m = Match::composite(sequence, vec![m]);
                if self.core.accepts(m.similarity()) {
                    self.increment = 0;
                    return Some(m);
                }
            }
        }
        self.index = 0;
        self.increment = self.settled_increment();
        None
    }

    fn match_best(&mut self, sequence: &Sequence, position: i64, ctx: &mut MatchContext) -> Option<Match> {
        let mut best: Option<Match> = None;
        let mut min_increment: Option<usize> = None;
        for pattern in self.patterns.iter_mut() {
            loop {
                if let Some(m) = pattern.match_at(sequence, position, ctx) {
                    let m = Match::composite(sequence, vec![m]);
                    if self.core.accepts(m.similarity())
                        && best.as_ref().map_or(true, |b| m.similarity() > b.similarity())
                    {
                        best = Some(m);
                    }
                }
                let increment = pattern.increment();
                if increment != 0 {
                    min_increment = Some(min_increment.map_or(increment, |m| m.min(increment)));
                    break;
                }
            }
        }
        self.increment = min_increment.unwrap_or(1).max(1);
        best
    }
}

impl Matcher for Set {
    fn core(&self) -> &PatternCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PatternCore {
        &mut self.core
    }

    fn match_at(&mut self, sequence: &Sequence, position: i64, ctx: &mut MatchContext) -> Option<Match> {
        match self.mode {
            SearchMode::All => self.match_all(sequence, position, ctx),
            SearchMode::Best => self.match_best(sequence, position, ctx),
        }
    }

    fn increment(&self) -> usize {
        self.increment
    }

    fn reset(&mut self) {
        self.index = 0;
        self.min_increment = None;
        self.patterns.iter_mut().for_each(Pattern::reset);
        self.increment = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alphabet::Alphabet;
    use crate::matching::search::{search, SearchConfig};
    use crate::patterns::{Motif, RegexPattern};

    fn dna(letters: &str) -> Sequence {
        Sequence::new(Alphabet::Dna, letters).unwrap()
    }

    fn motif(name: &str, letters: &str, threshold: f64) -> Pattern {
        Pattern::from(Motif::new(name, Alphabet::Dna, letters, threshold).unwrap())
    }

    #[test]
    fn test_all_mode_returns_each_child_match() {
        let seq = dna("acgt");
        let mut set = Set::new(
            "set",
            SearchMode::All,
            0.0,
            vec![motif("ac", "ac", 1.0), motif("tt", "tt", 1.0), motif("acg", "acg", 1.0)],
        )
        .unwrap();
        let mut ctx = MatchContext::new();

        let first = set.match_at(&seq, 1, &mut ctx).unwrap();
        assert_eq!(first.sub_matches()[0].pattern_name(), Some("ac"));
        assert_eq!(set.increment(), 0);

        let second = set.match_at(&seq, 1, &mut ctx).unwrap();
        assert_eq!(second.sub_matches()[0].pattern_name(), Some("acg"));
        assert_eq!(second.length(), 3);
        assert_eq!(set.increment(), 0);

        assert!(set.match_at(&seq, 1, &mut ctx).is_none());
        assert_eq!(set.increment(), 1);
    }

    #[test]
    fn test_all_mode_skips_by_smallest_child_increment() {
        let seq = dna("ttttttacgt");
        let regex1 = Pattern::from(RegexPattern::new("r1", "acg", false).unwrap());
        let regex2 = Pattern::from(RegexPattern::new("r2", "cgt", false).unwrap());
        let mut set = Set::new("set", SearchMode::All, 0.0, vec![regex1, regex2]).unwrap();
        assert!(set.match_at(&seq, 1, &mut MatchContext::new()).is_none());
        assert_eq!(set.increment(), 6);
    }

    #[test]
    fn test_best_mode_picks_highest_similarity() {
        let seq = dna("acgt");
        let mut set = Set::new(
            "set",
            SearchMode::Best,
            0.5,
            vec![motif("close", "acga", 0.0), motif("exact", "acgt", 0.0)],
        )
        .unwrap();
        let m = set.match_at(&seq, 1, &mut MatchContext::new()).unwrap();
        assert_eq!(m.sub_matches()[0].pattern_name(), Some("exact"));
        assert!((m.similarity() - 1.0).abs() < f64::EPSILON);
        assert_eq!(set.increment(), 1);
    }

    #[test]
    fn test_best_mode_keeps_first_of_equal_matches() {
        let seq = dna("ac");
        let mut set = Set::new(
            "set",
            SearchMode::Best,
            0.0,
            vec![motif("first", "aa", 0.5), motif("second", "cc", 0.5)],
        )
        .unwrap();
        let m = set.match_at(&seq, 1, &mut MatchContext::new()).unwrap();
        assert_eq!(m.sub_matches()[0].pattern_name(), Some("first"));
        assert!((m.similarity() - 0.5).abs() < 1e-12);
        assert_eq!(set.increment(), 1);
    }

    #[test]
    fn test_best_mode_skips_by_smallest_child_increment() {
        let seq = dna("aacg");
        let one = Pattern::from(RegexPattern::new("one", "cg", false).unwrap());
        let two = Pattern::from(RegexPattern::new("two", "c", false).unwrap());
        let mut set = Set::new("set", SearchMode::Best, 0.0, vec![one, two]).unwrap();
        assert!(set.match_at(&seq, 1, &mut MatchContext::new()).is_none());
        assert_eq!(set.increment(), 2);
    }

    #[test]
    fn test_search_with_set() {
        let seq = dna("aacgtt");
        let mut set = Pattern::from(
            Set::new(
                "set",
                SearchMode::All,
                1.0,
                vec![motif("cg", "cg", 1.0), motif("gt", "gt", 1.0)],
            )
            .unwrap(),
        );
        let matches = search(&seq, &mut set, &SearchConfig::default());
        let starts: Vec<i64> = matches.iter().map(Match::start).collect();
        assert_eq!(starts, vec![3, 4]);
    }
}
