use std::collections::BTreeMap;

use crate::core::alphabet::Alphabet;
use crate::core::sequence::Sequence;

/// Symbol frequency histogram, used as background distribution for
/// weight matrix estimation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolHistogram {
    counts: BTreeMap<u8, usize>,
    total: usize,
}

impl SymbolHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// One count for every unambiguous symbol of the alphabet
    pub fn uniform(alphabet: Alphabet) -> Self {
        let mut histogram = Self::new();
        for &symbol in alphabet.symbols() {
            histogram.add(symbol);
        }
        histogram
    }

    /// Count the symbols of a sequence
    pub fn from_sequence(sequence: &Sequence) -> Self {
        let mut histogram = Self::new();
        for &symbol in sequence.as_bytes() {
            histogram.add(symbol);
        }
        histogram
    }

    pub fn add(&mut self, symbol: u8) {
        *self.counts.entry(symbol).or_insert(0) += 1;
        self.total += 1;
    }

    pub fn count(&self, symbol: u8) -> usize {
        self.counts.get(&symbol).copied().unwrap_or(0)
    }

    /// Total number of counted symbols
    pub fn sum(&self) -> usize {
        self.total
    }

    /// Relative frequency of a symbol, 0.0 for an empty histogram
    pub fn frequency(&self, symbol: u8) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(symbol) as f64 / self.total as f64
    }

    /// Distinct symbols in ascending order
    pub fn symbols(&self) -> impl Iterator<Item = u8> + '_ {
        self.counts.keys().copied()
    }

    /// Number of distinct symbols
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn clear(&mut self) {
        self.counts.clear();
        self.total = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_frequencies() {
        let seq = Sequence::new(Alphabet::Dna, "aacg").unwrap();
        let histogram = SymbolHistogram::from_sequence(&seq);
        assert_eq!(histogram.sum(), 4);
        assert_eq!(histogram.count(b'a'), 2);
        assert_eq!(histogram.count(b't'), 0);
        assert!((histogram.frequency(b'a') - 0.5).abs() < 1e-12);
        assert_eq!(histogram.symbols().collect::<Vec<_>>(), b"acg".to_vec());
    }

    #[test]
    fn test_uniform_background() {
        let histogram = SymbolHistogram::uniform(Alphabet::Dna);
        assert_eq!(histogram.len(), 4);
        assert!((histogram.frequency(b'g') - 0.25).abs() < 1e-12);
        assert!(SymbolHistogram::new().frequency(b'a').abs() < f64::EPSILON);
    }
}
