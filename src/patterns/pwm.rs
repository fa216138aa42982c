use std::collections::BTreeMap;
use std::fmt::Write as _;

use tracing::debug;

use crate::core::alphabet::Alphabet;
use crate::core::histogram::SymbolHistogram;
use crate::core::sequence::Sequence;
use crate::matching::context::MatchContext;
use crate::matching::result::Match;
use crate::patterns::motif::Motif;
use crate::patterns::{Matcher, PatternCore, PatternError};

/// Position weight matrix.
///
/// Every row maps a symbol to one weight per column. The similarity of a
/// window is its summed weight scaled between the anti-consensus score
/// (0.0) and the consensus score (1.0). Symbols without a row score like the
/// column's anti-consensus symbol.
#[derive(Debug, Clone)]
pub struct Pwm {
    core: PatternCore,
    alphabet: Alphabet,
    rows: BTreeMap<u8, Vec<f64>>,
    width: usize,
    consensus: Vec<u8>,
    anti_consensus: Vec<u8>,
    min_score: f64,
    max_score: f64,
    range_score: f64,
}

impl Pwm {
    /// Empty matrix; the width is fixed by the first row added.
    ///
    /// # Errors
    ///
    /// Returns `PatternError::Validation` for an invalid threshold.
    pub fn new(name: &str, alphabet: Alphabet, threshold: f64) -> Result<Self, PatternError> {
        Ok(Self {
            core: PatternCore::new(name, threshold)?,
            alphabet,
            rows: BTreeMap::new(),
            width: 0,
            consensus: Vec::new(),
            anti_consensus: Vec::new(),
            min_score: 0.0,
            max_score: 0.0,
            range_score: 1.0,
        })
    }

    /// Matrix scoring 100 for the motif's symbols and 1 for all others
    ///
    /// # Errors
    ///
    /// Returns the motif parse errors of [`Motif::new`].
    pub fn from_motif(name: &str, alphabet: Alphabet, motif: &str, threshold: f64) -> Result<Self, PatternError> {
        let parsed = Motif::new(name, alphabet, motif, threshold)?;
        let mut pwm = Self::new(name, alphabet, threshold)?;
        for &symbol in alphabet.symbols() {
            let weights = parsed
                .positions()
                .iter()
                .map(|alternatives| if alternatives.contains(&symbol) { 100.0 } else { 1.0 })
                .collect();
            pwm.add(char::from(symbol), weights)?;
        }
        Ok(pwm)
    }

    fn key(&self, symbol: char) -> Result<u8, PatternError> {
        u8::try_from(symbol)
            .ok()
            .filter(|&b| self.alphabet.is_valid(b))
            .map(|b| self.alphabet.normalize(b))
            .ok_or_else(|| PatternError::InvalidSymbol {
                alphabet: self.alphabet.to_string(),
                symbol,
            })
    }

    /// Add or replace the row of a symbol.
    ///
    /// # Errors
    ///
    /// Returns `PatternError::InvalidSymbol` for symbols outside the alphabet
    /// and `PatternError::WeightLengthMismatch` if the row length differs
    /// from the matrix width.
    pub fn add(&mut self, symbol: char, weights: Vec<f64>) -> Result<(), PatternError> {
        let key = self.key(symbol)?;
        if self.width == 0 {
            self.init(weights.len());
        }
        if weights.len() != self.width {
            return Err(PatternError::WeightLengthMismatch {
                symbol,
                expected: self.width,
                actual: weights.len(),
            });
        }
        self.rows.insert(key, weights);
        self.update_scores();
        Ok(())
    }

    /// Set a single weight of an existing row.
    ///
    /// # Errors
    ///
    /// Returns `PatternError::InvalidSymbol` if the symbol has no row and
    /// `PatternError::InvalidRange` if the column is outside the matrix.
    pub fn set(&mut self, symbol: char, column: usize, weight: f64) -> Result<(), PatternError> {
        let key = self.key(symbol)?;
        let width = self.width;
        let row = self.rows.get_mut(&key).ok_or_else(|| PatternError::InvalidSymbol {
            alphabet: self.alphabet.to_string(),
            symbol,
        })?;
        let cell = row
            .get_mut(column)
            .ok_or_else(|| PatternError::InvalidRange(format!("column {column} outside width {width}")))?;
        *cell = weight;
        self.update_scores();
        Ok(())
    }

    pub(crate) fn init(&mut self, width: usize) {
        self.width = width;
        self.rows.clear();
        self.consensus.clear();
        self.anti_consensus.clear();
        self.update_scores();
    }

    /// Weight of `symbol` in `column`; the anti-consensus weight for symbols
    /// without a row
    pub fn get(&self, symbol: u8, column: usize) -> f64 {
        let symbol = self.alphabet.normalize(symbol);
        if let Some(weight) = self.rows.get(&symbol).and_then(|row| row.get(column)) {
            return *weight;
        }
        self.anti_consensus
            .get(column)
            .and_then(|anti| self.rows.get(anti))
            .and_then(|row| row.get(column))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn row(&self, symbol: char) -> Option<&[f64]> {
        let key = self.key(symbol).ok()?;
        self.rows.get(&key).map(Vec::as_slice)
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows
    pub fn symbol_count(&self) -> usize {
        self.rows.len()
    }

    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    pub fn min_score(&self) -> f64 {
        self.min_score
    }

    pub fn max_score(&self) -> f64 {
        self.max_score
    }

    pub fn range_score(&self) -> f64 {
        self.range_score
    }

    /// Highest weighted symbol of every column
    pub fn consensus(&self) -> String {
        String::from_utf8_lossy(&self.consensus).into_owned()
    }

    /// Lowest weighted symbol of every column
    pub fn anti_consensus(&self) -> String {
        String::from_utf8_lossy(&self.anti_consensus).into_owned()
    }

    fn update_scores(&mut self) {
        self.consensus.clear();
        self.anti_consensus.clear();
        self.max_score = 0.0;
        self.min_score = 0.0;
        if self.rows.is_empty() {
            self.range_score = 1.0;
            return;
        }
        for column in 0..self.width {
            let mut best: Option<(u8, f64)> = None;
            let mut worst: Option<(u8, f64)> = None;
            for (&symbol, row) in &self.rows {
                let weight = row[column];
                if best.map_or(true, |(_, w)| weight > w) {
                    best = Some((symbol, weight));
                }
                if worst.map_or(true, |(_, w)| weight < w) {
                    worst = Some((symbol, weight));
                }
            }
            if let (Some((hi, hi_w)), Some((lo, lo_w))) = (best, worst) {
                self.consensus.push(hi);
                self.anti_consensus.push(lo);
                self.max_score += hi_w;
                self.min_score += lo_w;
            }
        }
        self.range_score = self.max_score - self.min_score;
        if self.range_score == 0.0 {
            self.range_score = 1.0;
        }
    }

    /// Symbols of a column ordered by ascending weight
    pub fn sorting_index(&self, column: usize) -> Vec<char> {
        let mut symbols: Vec<u8> = self.rows.keys().copied().collect();
        symbols.sort_by(|&a, &b| self.get(a, column).total_cmp(&self.get(b, column)));
        symbols.into_iter().map(char::from).collect()
    }

    /// Copy of the columns `start..=end` (0-based).
    ///
    /// # Errors
    ///
    /// Returns `PatternError::InvalidRange` if the columns are not inside the matrix.
    pub fn sub_pwm(&self, name: &str, start: usize, end: usize) -> Result<Pwm, PatternError> {
        if end < start || end >= self.width {
            return Err(PatternError::InvalidRange(format!(
                "columns {start}..={end} outside width {}",
                self.width
            )));
        }
        let mut pwm = Pwm::new(name, self.alphabet, self.core.threshold())?;
        for (&symbol, row) in &self.rows {
            pwm.add(char::from(symbol), row[start..=end].to_vec())?;
        }
        Ok(pwm)
    }

    /// Estimate log-odds weights from aligned sequences.
    ///
    /// One row is created per background symbol. Column `i` is estimated
    /// from the symbols at `start + i` (1-based) with pseudo counts:
    /// `w = log2(((count + 1) / (n + |alphabet|)) / background_frequency)`.
    /// Returns the information content of the matrix.
    ///
    /// # Errors
    ///
    /// Returns `PatternError::EmptySequenceList` for no sequences,
    /// `PatternError::AlphabetMismatch` for sequences of another alphabet and
    /// `PatternError::InvalidRange` if a sequence is too short.
    pub fn estimate(
        &mut self,
        sequences: &[Sequence],
        start: i64,
        background: &SymbolHistogram,
    ) -> Result<f64, PatternError> {
        if sequences.is_empty() {
            return Err(PatternError::EmptySequenceList);
        }
        if let Some(foreign) = sequences.iter().find(|s| s.alphabet() != self.alphabet) {
            return Err(PatternError::AlphabetMismatch {
                expected: self.alphabet.to_string(),
                found: foreign.alphabet().to_string(),
            });
        }

        let width = self.width;
        let symbols: Vec<u8> = background.symbols().collect();
        let mut columns: Vec<Vec<f64>> = vec![vec![0.0; width]; symbols.len()];
        let pseudo_total = (sequences.len() + self.alphabet.len()) as f64;
        let mut information = 0.0;
        let mut histogram = SymbolHistogram::new();

        for column in 0..width {
            let position = start + column as i64;
            histogram.clear();
            for sequence in sequences {
                let symbol = sequence.symbol(position).ok_or_else(|| {
                    PatternError::InvalidRange(format!(
                        "position {position} outside sequence of length {}",
                        sequence.len()
                    ))
                })?;
                histogram.add(symbol);
            }
            for (row, &symbol) in columns.iter_mut().zip(&symbols) {
                let p = (histogram.count(symbol) as f64 + 1.0) / pseudo_total;
                let w = (p / background.frequency(symbol)).log2();
                row[column] = w;
                information += p * w;
            }
        }

        for (symbol, weights) in symbols.into_iter().zip(columns) {
            self.rows.insert(self.alphabet.normalize(symbol), weights);
        }
        self.update_scores();
        debug!(
            pwm = self.core.name(),
            sequences = sequences.len(),
            width,
            information,
            "Estimated weight matrix"
        );
        Ok(information)
    }

    fn score(&self, sequence: &Sequence, position: i64) -> Option<f64> {
        if self.width == 0 {
            return None;
        }
        let window = sequence.window(position, self.width)?;
        let sum: f64 = window.iter().enumerate().map(|(i, &s)| self.get(s, i)).sum();
        Some((sum - self.min_score) / self.range_score)
    }
}

impl std::fmt::Display for Pwm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (&symbol, row) in &self.rows {
            let mut line = format!("{}:\t", char::from(symbol));
            for weight in row {
                let _ = write!(line, "{weight:6.2} ");
            }
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

impl Matcher for Pwm {
    fn core(&self) -> &PatternCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PatternCore {
        &mut self.core
    }

    fn match_at(&mut self, sequence: &Sequence, position: i64, _ctx: &mut MatchContext) -> Option<Match> {
        let similarity = self.score(sequence, position)?;
        if !self.core.accepts(similarity) {
            return None;
        }
        Some(Match::found(sequence, position, self.width, similarity))
    }
}

/// Weight matrix estimated from a block of aligned sequences
#[derive(Debug, Clone)]
pub struct Block {
    pwm: Pwm,
    sequences: Vec<Sequence>,
    information: f64,
}

impl Block {
    /// Estimate a block from equally long sequences. Without a background
    /// all symbols of the alphabet are equally likely.
    ///
    /// # Errors
    ///
    /// Returns `PatternError::EmptySequenceList` for no sequences and
    /// `PatternError::UnequalSequenceLengths` if the lengths differ.
    pub fn new(
        name: &str,
        sequences: Vec<Sequence>,
        background: Option<&SymbolHistogram>,
        threshold: f64,
    ) -> Result<Self, PatternError> {
        let first = sequences.first().ok_or(PatternError::EmptySequenceList)?;
        let length = first.len();
        if let Some(other) = sequences.iter().find(|s| s.len() != length) {
            return Err(PatternError::UnequalSequenceLengths {
                expected: length,
                actual: other.len(),
            });
        }
        let alphabet = first.alphabet();
        let uniform;
        let background = match background {
            Some(histogram) => histogram,
            None => {
                uniform = SymbolHistogram::uniform(alphabet);
                &uniform
            }
        };

        let mut pwm = Pwm::new(name, alphabet, threshold)?;
        pwm.init(length);
        let information = pwm.estimate(&sequences, 1, background)?;
        Ok(Self {
            pwm,
            sequences,
            information,
        })
    }

    pub fn pwm(&self) -> &Pwm {
        &self.pwm
    }

    pub fn sequences(&self) -> &[Sequence] {
        &self.sequences
    }

    /// Information content of the estimated matrix
    pub fn information(&self) -> f64 {
        self.information
    }
}

impl Matcher for Block {
    fn core(&self) -> &PatternCore {
        self.pwm.core()
    }

    fn core_mut(&mut self) -> &mut PatternCore {
        self.pwm.core_mut()
    }

    fn match_at(&mut self, sequence: &Sequence, position: i64, ctx: &mut MatchContext) -> Option<Match> {
        self.pwm.match_at(sequence, position, ctx)
    }
}
