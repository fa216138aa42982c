use std::sync::Arc;

use crate::core::sequence::Sequence;
use crate::core::types::Strand;
use crate::matching::search::{self, SearchConfig};
use crate::patterns::Pattern;
use crate::utils::validation::{clamp_unit, validate_impact, validate_similarity, ValidationError};

/// One matched region of a sequence, possibly composed of sub-matches.
///
/// Coordinates are 1-based and inclusive. A zero-length match at position
/// `p` has `start == p` and `end == p - 1`. Sub-matches are owned, so
/// cloning a match deep-copies the whole tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    start: i64,
    end: i64,
    strand: Strand,
    similarity: f64,
    impact: f64,
    sub_matches: Vec<Match>,
    sequence: Option<Sequence>,
    pattern: Option<Arc<str>>,
}

impl Default for Match {
    fn default() -> Self {
        Self {
            start: 1,
            end: 0,
            strand: Strand::Unknown,
            similarity: 0.0,
            impact: 1.0,
            sub_matches: Vec::new(),
            sequence: None,
            pattern: None,
        }
    }
}

impl Match {
    /// Create a match that is not attached to a sequence.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::SimilarityOutOfRange` if `similarity` is not
    /// in [0, 1].
    pub fn new(
        start: i64,
        length: usize,
        strand: Strand,
        similarity: f64,
    ) -> Result<Self, ValidationError> {
        let mut m = Self::default();
        m.set(None, start, length, strand, similarity)?;
        Ok(m)
    }

    /// Create a match over a region of `sequence`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::SimilarityOutOfRange` if `similarity` is not
    /// in [0, 1].
    pub fn with_sequence(
        sequence: &Sequence,
        start: i64,
        length: usize,
        strand: Strand,
        similarity: f64,
    ) -> Result<Self, ValidationError> {
        let mut m = Self::default();
        m.set(Some(sequence), start, length, strand, similarity)?;
        Ok(m)
    }

    /// Forward match produced by a leaf matcher; the score is clamped
    pub(crate) fn found(sequence: &Sequence, start: i64, length: usize, similarity: f64) -> Self {
        Self {
            start,
            end: start + length as i64 - 1,
            strand: Strand::Forward,
            similarity: clamp_unit(similarity),
            sequence: Some(sequence.clone()),
            ..Self::default()
        }
    }

    /// Forward match spanning its sub-matches, scored by their weighted mean
    pub(crate) fn composite(sequence: &Sequence, sub_matches: Vec<Match>) -> Self {
        let mut m = Self {
            strand: Strand::Forward,
            sequence: Some(sequence.clone()),
            sub_matches,
            ..Self::default()
        };
        m.calc_start_end();
        m.calc_similarity();
        m
    }

    /// Reposition this match.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::SimilarityOutOfRange` if `similarity` is not
    /// in [0, 1]; the match is left unchanged in that case.
    pub fn set(
        &mut self,
        sequence: Option<&Sequence>,
        start: i64,
        length: usize,
        strand: Strand,
        similarity: f64,
    ) -> Result<(), ValidationError> {
        self.similarity = validate_similarity(similarity)?;
        self.start = start;
        self.end = start + length as i64 - 1;
        self.strand = strand;
        self.sequence = sequence.cloned();
        Ok(())
    }

    /// Overwrite this match with a deep copy of `other`
    pub fn set_from(&mut self, other: &Match) {
        self.clone_from(other);
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    /// Span length, `end - start + 1`
    pub fn length(&self) -> usize {
        usize::try_from(self.end - self.start + 1).unwrap_or(0)
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    pub fn set_strand(&mut self, strand: Strand) {
        self.strand = strand;
    }

    pub fn similarity(&self) -> f64 {
        self.similarity
    }

    /// # Errors
    ///
    /// Returns `ValidationError::SimilarityOutOfRange` if the value is not in [0, 1].
    pub fn set_similarity(&mut self, similarity: f64) -> Result<(), ValidationError> {
        self.similarity = validate_similarity(similarity)?;
        Ok(())
    }

    pub fn impact(&self) -> f64 {
        self.impact
    }

    /// # Errors
    ///
    /// Returns `ValidationError::ImpactOutOfRange` if the value is not in [0, 1].
    pub fn set_impact(&mut self, impact: f64) -> Result<(), ValidationError> {
        self.impact = validate_impact(impact)?;
        Ok(())
    }

    /// The sequence this match refers to
    pub fn sequence(&self) -> Option<&Sequence> {
        self.sequence.as_ref()
    }

    /// Name of the pattern that produced this match
    pub fn pattern_name(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    /// Attach the producing pattern's name and impact
    pub(crate) fn tag(&mut self, name: &Arc<str>, impact: f64) {
        self.pattern = Some(Arc::clone(name));
        self.impact = impact;
    }

    pub fn sub_matches(&self) -> &[Match] {
        &self.sub_matches
    }

    pub fn sub_matches_mut(&mut self) -> &mut Vec<Match> {
        &mut self.sub_matches
    }

    pub fn push_sub_match(&mut self, sub_match: Match) {
        self.sub_matches.push(sub_match);
    }

    /// Number of matching symbols implied by the similarity
    pub fn matches(&self) -> usize {
        (self.similarity * self.length() as f64) as usize
    }

    /// Number of mismatching symbols implied by the similarity
    pub fn mismatches(&self) -> usize {
        let length = self.length() as f64;
        (length - self.similarity * length) as usize
    }

    /// Set start and end to the hull of all sub-matches.
    ///
    /// Leaves the coordinates unchanged when there are no sub-matches.
    pub fn calc_start_end(&mut self) {
        let Some(start) = self.sub_matches.iter().map(|m| m.start).min() else {
            return;
        };
        let end = self.sub_matches.iter().map(|m| m.end).max().unwrap_or(start - 1);
        self.start = start;
        self.end = end;
    }

    /// Recompute the similarity as the impact-weighted mean over sub-matches,
    /// recursing into nested sub-matches first.
    ///
    /// Leaves the similarity unchanged when there are no sub-matches. If all
    /// impacts are zero the similarity becomes 0.0.
    pub fn calc_similarity(&mut self) {
        if self.sub_matches.is_empty() {
            return;
        }
        let mut sum = 0.0;
        let mut weight_sum = 0.0;
        for sub_match in &mut self.sub_matches {
            sub_match.calc_similarity();
            sum += sub_match.similarity * sub_match.impact;
            weight_sum += sub_match.impact;
        }
        self.similarity = if weight_sum > 0.0 {
            clamp_unit(sum / weight_sum)
        } else {
            0.0
        };
    }

    /// Sum of the sub-match lengths, or the span length of a leaf match.
    ///
    /// Gaps and overlaps between sub-matches are not accounted for.
    pub fn calc_length(&self) -> usize {
        if self.sub_matches.is_empty() {
            self.length()
        } else {
            self.sub_matches.iter().map(Match::calc_length).sum()
        }
    }

    /// A view of the matched region of the underlying sequence
    pub fn window(&self) -> Option<Sequence> {
        self.sequence
            .as_ref()
            .and_then(|seq| seq.sub_sequence(self.start, self.length()).ok())
    }

    /// The matched symbols. Reverse strand matches yield the lowercase
    /// reverse complement.
    pub fn letters(&self) -> Option<String> {
        let window = self.window()?;
        if self.strand == Strand::Reverse {
            Some(window.reverse_complement().letters().to_lowercase())
        } else {
            Some(window.letters())
        }
    }

    /// Best match of `pattern` inside this match's region.
    ///
    /// Positions are relative to the region; `end <= start` searches all of it.
    pub fn search_best(&self, start: i64, end: i64, pattern: &mut Pattern) -> Option<Match> {
        let window = self.window()?;
        let config = SearchConfig::range(start, end);
        search::search_best(&window, pattern, &config)
    }

    /// All matches of `pattern` inside this match's region.
    ///
    /// Positions are relative to the region; `end <= start` searches all of it.
    pub fn search(&self, start: i64, end: i64, pattern: &mut Pattern) -> Vec<Match> {
        match self.window() {
            Some(window) => search::search(&window, pattern, &SearchConfig::range(start, end)),
            None => Vec::new(),
        }
    }
}

impl std::fmt::Display for Match {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let similarity = (self.similarity * 100.0).trunc() / 100.0;
        write!(
            f,
            "{{{}, {}, {}, {}, {}",
            self.start,
            self.length(),
            self.strand,
            similarity,
            self.letters().unwrap_or_default()
        )?;
        for sub_match in &self.sub_matches {
            write!(f, ", {sub_match}")?;
        }
        write!(f, "}}")
    }
}
