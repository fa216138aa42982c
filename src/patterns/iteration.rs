use crate::core::sequence::Sequence;
use crate::matching::context::MatchContext;
use crate::matching::result::Match;
use crate::patterns::{Matcher, Pattern, PatternCore, PatternError};
use crate::utils::validation::ValidationError;

/// Repeats one pattern back to back between `minimum` and `maximum` times.
///
/// Each round takes the best of all alternatives the child offers at the
/// round's position and continues directly after it. Iteration stops at
/// `maximum` rounds or at the first round without a match.
#[derive(Debug, Clone)]
pub struct Iteration {
    core: PatternCore,
    pattern: Box<Pattern>,
    minimum: usize,
    maximum: usize,
}

impl Iteration {
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidIterationBounds` if `minimum` is 0 or
    /// `maximum < minimum`, and `PatternError::Validation` for an invalid
    /// threshold.
    pub fn new(
        name: &str,
        pattern: Pattern,
        minimum: usize,
        maximum: usize,
        threshold: f64,
    ) -> Result<Self, PatternError> {
        if minimum == 0 || maximum < minimum {
            return Err(ValidationError::InvalidIterationBounds {
                min: minimum,
                max: maximum,
            }
            .into());
        }
        Ok(Self {
            core: PatternCore::new(name, threshold)?,
            pattern: Box::new(pattern),
            minimum,
            maximum,
        })
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn minimum(&self) -> usize {
        self.minimum
    }

    pub fn maximum(&self) -> usize {
        self.maximum
    }

    /// Best alternative of the child at `position`; later alternatives win ties
    fn best_round(&mut self, sequence: &Sequence, position: i64, ctx: &mut MatchContext) -> Option<Match> {
        let mut best: Option<Match> = None;
        loop {
            if let Some(m) = self.pattern.match_at(sequence, position, ctx) {
                if best.as_ref().map_or(true, |b| m.similarity() >= b.similarity()) {
                    best = Some(m);
                }
            }
            if self.pattern.increment() != 0 {
                return best;
            }
        }
    }
}

impl Matcher for Iteration {
    fn core(&self) -> &PatternCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PatternCore {
        &mut self.core
    }

    fn match_at(&mut self, sequence: &Sequence, position: i64, ctx: &mut MatchContext) -> Option<Match> {
        let mut subs = Vec::new();
        let mut next = position;
        while subs.len() < self.maximum {
            let Some(m) = self.best_round(sequence, next, ctx) else {
                break;
            };
            let length = m.length();
            subs.push(m);
            if length == 0 && subs.len() >= self.minimum {
                // further empty rounds would not advance
                break;
            }
            next += length as i64;
        }
        if subs.len() < self.minimum {
            return None;
        }
        let m = Match::composite(sequence, subs);
        self.core.accepts(m.similarity()).then_some(m)
    }

    fn reset(&mut self) {
        self.pattern.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alphabet::Alphabet;
    use crate::patterns::{Composition, Motif, SearchMode, VoidPattern};

    fn dna(letters: &str) -> Sequence {
        Sequence::new(Alphabet::Dna, letters).unwrap()
    }

    fn repeat_ac(minimum: usize, maximum: usize) -> Iteration {
        let motif = Pattern::from(Motif::new("ac", Alphabet::Dna, "ac", 1.0).unwrap());
        Iteration::new("iter", motif, minimum, maximum, 0.0).unwrap()
    }

    #[test]
    fn test_repeats_until_failure() {
        let seq = dna("acacacgt");
        let mut ctx = MatchContext::new();
        let m = repeat_ac(1, 5).match_at(&seq, 1, &mut ctx).unwrap();
        assert_eq!(m.sub_matches().len(), 3);
        assert_eq!(m.start(), 1);
        assert_eq!(m.end(), 6);

        assert!(repeat_ac(4, 5).match_at(&seq, 1, &mut ctx).is_none());

        let m = repeat_ac(1, 2).match_at(&seq, 1, &mut ctx).unwrap();
        assert_eq!(m.end(), 4);
    }

    #[test]
    fn test_each_round_drains_alternatives() {
        let seq = dna("aaaaccaaaa");
        let mut composition =
            Composition::new("rich", Alphabet::Dna, 2, 4, 1.0, SearchMode::All, 0.0).unwrap();
        composition.add('a', 1.0).unwrap();
        composition.add('c', 0.0).unwrap();
        let mut iteration = Iteration::new("iter", Pattern::from(composition), 1, 1, 0.0).unwrap();
        let m = iteration.match_at(&seq, 1, &mut MatchContext::new()).unwrap();
        // lengths 2, 3 and 4 all score 1.0, the last one wins
        assert_eq!(m.sub_matches()[0].length(), 4);
    }

    #[test]
    fn test_bounds_are_validated() {
        let motif = Pattern::from(Motif::new("ac", Alphabet::Dna, "ac", 1.0).unwrap());
        assert!(Iteration::new("iter", motif.clone(), 0, 2, 0.0).is_err());
        assert_eq!(
            Iteration::new("iter", motif, 3, 2, 0.0).unwrap_err(),
            PatternError::Validation(ValidationError::InvalidIterationBounds { min: 3, max: 2 })
        );
    }

    #[test]
    fn test_empty_rounds_reach_minimum() {
        let seq = dna("acgt");
        let void = Pattern::from(VoidPattern::new("v"));
        let mut iteration = Iteration::new("iter", void, 2, 3, 0.0).unwrap();
        let m = iteration.match_at(&seq, 1, &mut MatchContext::new()).unwrap();
        assert_eq!(m.length(), 0);
        assert_eq!(m.sub_matches().len(), 2);
        assert!((m.similarity() - 1.0).abs() < f64::EPSILON);
    }

}
