use crate::core::sequence::Sequence;
use crate::matching::context::MatchContext;
use crate::matching::result::Match;
use crate::patterns::flexible::LengthCursor;
use crate::patterns::{Matcher, PatternCore, PatternError};
use crate::utils::validation::ValidationError;

/// Matches any symbols over a variable length window
#[derive(Debug, Clone)]
pub struct Any {
    core: PatternCore,
    cursor: LengthCursor,
}

impl Any {
    /// # Errors
    ///
    /// Returns `PatternError::Validation` for invalid length bounds.
    pub fn new(name: &str, min: usize, max: usize, step: f64) -> Result<Self, PatternError> {
        Ok(Self {
            core: PatternCore::new(name, 0.0)?,
            cursor: LengthCursor::new(min, max, step)?,
        })
    }

    pub fn cursor(&self) -> &LengthCursor {
        &self.cursor
    }
}

impl Matcher for Any {
    fn core(&self) -> &PatternCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PatternCore {
        &mut self.core
    }

    fn match_at(&mut self, sequence: &Sequence, position: i64, _ctx: &mut MatchContext) -> Option<Match> {
        let length = self.cursor.next_length();
        sequence.window(position, length)?;
        Some(Match::found(sequence, position, length, 1.0))
    }

    fn increment(&self) -> usize {
        self.cursor.increment()
    }

    fn reset(&mut self) {
        self.cursor.reset();
    }
}

/// A variable length gap whose similarity depends on its length.
///
/// Optional weights are min-max normalized into [0, 1] and indexed by
/// `length - min`, clamped to the table bounds. Without weights every length
/// scores 1.0.
#[derive(Debug, Clone)]
pub struct Gap {
    core: PatternCore,
    cursor: LengthCursor,
    weights: Option<Vec<f64>>,
}

impl Gap {
    /// # Errors
    ///
    /// Returns `PatternError::Validation` for invalid length bounds or threshold.
    pub fn new(name: &str, min: usize, max: usize, step: f64, threshold: f64) -> Result<Self, PatternError> {
        Ok(Self {
            core: PatternCore::new(name, threshold)?,
            cursor: LengthCursor::new(min, max, step)?,
            weights: None,
        })
    }

    /// Attach a length weight table.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyWeights` for an empty table.
    pub fn with_weights(mut self, weights: &[f64]) -> Result<Self, PatternError> {
        self.set_weights(weights)?;
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns `ValidationError::EmptyWeights` for an empty table.
    pub fn set_weights(&mut self, weights: &[f64]) -> Result<(), ValidationError> {
        if weights.is_empty() {
            return Err(ValidationError::EmptyWeights);
        }
        let min = weights.iter().copied().fold(f64::INFINITY, f64::min);
        let max = weights.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let normalized = weights
            .iter()
            .map(|&w| if max == min { 1.0 } else { (w - min) / (max - min) })
            .collect();
        self.weights = Some(normalized);
        Ok(())
    }

    /// Normalized weights, if any
    pub fn weights(&self) -> Option<&[f64]> {
        self.weights.as_deref()
    }

    pub fn cursor(&self) -> &LengthCursor {
        &self.cursor
    }

    /// Similarity of a gap that is `offset` symbols longer than the minimum
    pub fn tabulate(&self, offset: usize) -> f64 {
        match &self.weights {
            None => 1.0,
            Some(table) => table
                .get(offset.min(table.len() - 1))
                .copied()
                .unwrap_or(1.0),
        }
    }
}

impl Matcher for Gap {
    fn core(&self) -> &PatternCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PatternCore {
        &mut self.core
    }

    fn match_at(&mut self, sequence: &Sequence, position: i64, _ctx: &mut MatchContext) -> Option<Match> {
        let length = self.cursor.next_length();
        sequence.window(position, length)?;
        let similarity = self.tabulate(length - self.cursor.min());
        if !self.core.accepts(similarity) {
            return None;
        }
        Some(Match::found(sequence, position, length, similarity))
    }

    fn increment(&self) -> usize {
        self.cursor.increment()
    }

    fn reset(&mut self) {
        self.cursor.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alphabet::Alphabet;

    fn dna(letters: &str) -> Sequence {
        Sequence::new(Alphabet::Dna, letters).unwrap()
    }

    #[test]
    fn test_any_enumerates_lengths() {
        let seq = dna("actgactg");
        let mut any = Any::new("any", 2, 4, 1.0).unwrap();
        let mut ctx = MatchContext::new();
        let mut letters = Vec::new();
        loop {
            let m = any.match_at(&seq, 3, &mut ctx).unwrap();
            letters.push(m.letters().unwrap());
            assert!((m.similarity() - 1.0).abs() < f64::EPSILON);
            if any.increment() == 1 {
                break;
            }
        }
        assert_eq!(letters, vec!["tg", "tga", "tgac"]);
    }

    #[test]
    fn test_any_past_sequence_end() {
        let seq = dna("acgt");
        let mut any = Any::new("any", 3, 3, 1.0).unwrap();
        let mut ctx = MatchContext::new();
        assert!(any.match_at(&seq, 3, &mut ctx).is_none());
        assert_eq!(any.increment(), 1);
        assert!(any.match_at(&seq, 2, &mut ctx).is_some());
    }

    #[test]
    fn test_gap_weights_are_normalized() {
        let gap = Gap::new("gap", 2, 5, 1.0, 0.0)
            .unwrap()
            .with_weights(&[1.0, 3.0, 5.0])
            .unwrap();
        assert_eq!(gap.weights().unwrap(), &[0.0, 0.5, 1.0]);
        assert!(gap.tabulate(0).abs() < f64::EPSILON);
        assert!((gap.tabulate(1) - 0.5).abs() < f64::EPSILON);
        // clamped to the last entry
        assert!((gap.tabulate(7) - 1.0).abs() < f64::EPSILON);

        let flat = Gap::new("flat", 0, 2, 1.0, 0.0)
            .unwrap()
            .with_weights(&[2.0, 2.0])
            .unwrap();
        assert!((flat.tabulate(1) - 1.0).abs() < f64::EPSILON);
        assert!(Gap::new("g", 0, 2, 1.0, 0.0).unwrap().with_weights(&[]).is_err());
    }

    #[test]
    fn test_gap_threshold() {
        let seq = dna("acgtacgt");
        let mut gap = Gap::new("gap", 1, 3, 1.0, 0.5)
            .unwrap()
            .with_weights(&[0.0, 1.0, 2.0])
            .unwrap();
        let mut ctx = MatchContext::new();
        assert!(gap.match_at(&seq, 1, &mut ctx).is_none());
        assert_eq!(gap.increment(), 0);
        let m = gap.match_at(&seq, 1, &mut ctx).unwrap();
        assert_eq!(m.length(), 2);
        assert!((m.similarity() - 0.5).abs() < f64::EPSILON);
        let m = gap.match_at(&seq, 1, &mut ctx).unwrap();
        assert_eq!(m.length(), 3);
        assert_eq!(gap.increment(), 1);
    }
}
