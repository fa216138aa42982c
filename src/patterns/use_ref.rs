use crate::core::sequence::Sequence;
use crate::matching::context::MatchContext;
use crate::matching::result::Match;
use crate::patterns::{Matcher, Pattern, PatternCore};

/// Reuses the root pattern of another definition under a new name
#[derive(Debug, Clone)]
pub struct Use {
    core: PatternCore,
    definition: String,
    pattern: Box<Pattern>,
}

impl Use {
    pub fn new(name: &str, definition: &str, pattern: Pattern) -> Self {
        Self {
            core: PatternCore::named(name),
            definition: definition.to_string(),
            pattern: Box::new(pattern),
        }
    }

    /// Name of the definition the pattern was taken from
    pub fn definition(&self) -> &str {
        &self.definition
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }
}

impl Matcher for Use {
    fn core(&self) -> &PatternCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PatternCore {
        &mut self.core
    }

    fn match_at(&mut self, sequence: &Sequence, position: i64, ctx: &mut MatchContext) -> Option<Match> {
        let m = self.pattern.match_at(sequence, position, ctx)?;
        self.core.accepts(m.similarity()).then_some(m)
    }

    fn increment(&self) -> usize {
        self.pattern.increment()
    }

    fn reset(&mut self) {
        self.pattern.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alphabet::Alphabet;
    use crate::patterns::Motif;

    #[test]
    fn test_use_forwards_and_retags() {
        let seq = Sequence::new(Alphabet::Dna, "ttacgt").unwrap();
        let inner = Pattern::from(Motif::new("box", Alphabet::Dna, "acg", 1.0).unwrap());
        let mut outer = Pattern::from(Use::new("promoter", "boxes", inner));
        let mut ctx = MatchContext::new();

        assert!(outer.match_at(&seq, 2, &mut ctx).is_none());
        let m = outer.match_at(&seq, 3, &mut ctx).unwrap();
        assert_eq!(m.pattern_name(), Some("promoter"));
        assert_eq!(m.letters().unwrap(), "acg");
        assert!(ctx.latest("box").is_some());
        assert!(ctx.latest("promoter").is_some());
        assert_eq!(outer.increment(), 1);
    }
}
