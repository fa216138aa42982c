use std::collections::BTreeMap;

use crate::core::alphabet::Alphabet;
use crate::core::sequence::Sequence;
use crate::matching::context::MatchContext;
use crate::matching::result::Match;
use crate::patterns::flexible::LengthCursor;
use crate::patterns::{Matcher, PatternCore, PatternError, SearchMode};
use crate::utils::validation::clamp_unit;

/// Symbol composition of a variable length window.
///
/// Each symbol carries a weight; symbols without an explicit weight use the
/// default weight. The similarity of a window is its mean symbol weight
/// divided by the largest weight.
///
/// In ALL mode successive calls at the same position enumerate the window
/// lengths. In BEST mode a single call returns the best scoring length.
#[derive(Debug, Clone)]
pub struct Composition {
    core: PatternCore,
    alphabet: Alphabet,
    mode: SearchMode,
    cursor: LengthCursor,
    weights: BTreeMap<u8, f64>,
    default_weight: f64,
    min_weight: f64,
    max_weight: f64,
    increment: usize,
}

impl Composition {
    /// # Errors
    ///
    /// Returns `PatternError::Validation` for invalid length bounds or threshold.
    pub fn new(
        name: &str,
        alphabet: Alphabet,
        min: usize,
        max: usize,
        step: f64,
        mode: SearchMode,
        threshold: f64,
    ) -> Result<Self, PatternError> {
        Ok(Self {
            core: PatternCore::new(name, threshold)?,
            alphabet,
            mode,
            cursor: LengthCursor::new(min, max, step)?,
            weights: BTreeMap::new(),
            default_weight: 0.0,
            min_weight: f64::INFINITY,
            max_weight: f64::NEG_INFINITY,
            increment: 1,
        })
    }

    /// Assign a weight to a symbol.
    ///
    /// # Errors
    ///
    /// Returns `PatternError::InvalidSymbol` if the symbol is not part of the
    /// alphabet and `PatternError::DuplicateSymbol` if it already has a weight.
    pub fn add(&mut self, symbol: char, weight: f64) -> Result<(), PatternError> {
        let byte = u8::try_from(symbol)
            .ok()
            .filter(|&b| self.alphabet.is_valid(b))
            .ok_or_else(|| PatternError::InvalidSymbol {
                alphabet: self.alphabet.to_string(),
                symbol,
            })?;
        let key = self.alphabet.normalize(byte);
        if self.weights.contains_key(&key) {
            return Err(PatternError::DuplicateSymbol(symbol));
        }
        self.weights.insert(key, weight);
        self.track(weight);
        Ok(())
    }

    /// Weight of a symbol, the default weight if it has none
    pub fn weight(&self, symbol: char) -> f64 {
        u8::try_from(symbol)
            .ok()
            .and_then(|b| self.weights.get(&self.alphabet.normalize(b)))
            .copied()
            .unwrap_or(self.default_weight)
    }

    pub fn default_weight(&self) -> f64 {
        self.default_weight
    }

    pub fn set_default_weight(&mut self, weight: f64) {
        self.default_weight = weight;
        self.track(weight);
    }

    pub fn min_weight(&self) -> f64 {
        self.min_weight
    }

    pub fn max_weight(&self) -> f64 {
        self.max_weight
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    pub fn cursor(&self) -> &LengthCursor {
        &self.cursor
    }

    fn track(&mut self, weight: f64) {
        self.max_weight = self.max_weight.max(weight);
        self.min_weight = self.min_weight.min(weight);
    }

    fn mean_weight(&self, window: &[u8]) -> f64 {
        if window.is_empty() {
            return 0.0;
        }
        let sum: f64 = window
            .iter()
            .map(|&s| self.weights.get(&s).copied().unwrap_or(self.default_weight))
            .sum();
        sum / window.len() as f64
    }

    fn similarity_of(&self, mean: f64) -> f64 {
        if !(self.max_weight.is_finite() && self.max_weight > 0.0) {
            return 0.0;
        }
        clamp_unit(mean / self.max_weight)
    }

    fn match_all(&mut self, sequence: &Sequence, position: i64) -> Option<Match> {
        let length = self.cursor.next_length();
        self.increment = self.cursor.increment();
        let window = sequence.window(position, length)?;
        let similarity = self.similarity_of(self.mean_weight(window));
        if !self.core.accepts(similarity) {
            return None;
        }
        Some(Match::found(sequence, position, length, similarity))
    }

    fn match_best(&mut self, sequence: &Sequence, position: i64) -> Option<Match> {
        self.increment = 1;
        let mut best: Option<(usize, f64)> = None;
        for length in self.cursor.lengths() {
            let Some(window) = sequence.window(position, length) else {
                continue;
            };
            let mean = self.mean_weight(window);
            if best.map_or(true, |(_, best_mean)| mean > best_mean) {
                best = Some((length, mean));
            }
        }
        let (length, mean) = best?;
        let similarity = self.similarity_of(mean);
        if !self.core.accepts(similarity) {
            return None;
        }
        Some(Match::found(sequence, position, length, similarity))
    }
}

impl Matcher for Composition {
    fn core(&self) -> &PatternCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PatternCore {
        &mut self.core
    }

    fn match_at(&mut self, sequence: &Sequence, position: i64, _ctx: &mut MatchContext) -> Option<Match> {
        match self.mode {
            SearchMode::All => self.match_all(sequence, position),
            SearchMode::Best => self.match_best(sequence, position),
        }
    }

    fn increment(&self) -> usize {
        self.increment
    }

    fn reset(&mut self) {
        self.cursor.reset();
        self.increment = 1;
    }
}
