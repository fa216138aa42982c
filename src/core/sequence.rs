use std::sync::Arc;

use thiserror::Error;

use crate::core::alphabet::Alphabet;

#[derive(Error, Debug)]
pub enum SequenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid {alphabet} symbol '{symbol}' at position {position}")]
    InvalidSymbol {
        alphabet: Alphabet,
        symbol: char,
        position: usize,
    },

    #[error("Sub-sequence out of range: start {start}, length {length}, sequence length {len}")]
    OutOfRange { start: i64, length: usize, len: usize },

    #[error("FASTA error: {0}")]
    Fasta(String),

    #[error("No sequences found")]
    Empty,
}

/// An immutable symbol sequence addressed with 1-based positions.
///
/// Symbols are shared behind an `Arc`, so clones and sub-sequences are views
/// onto the same storage. Matches hold such a view of the sequence they were
/// found in without copying it.
#[derive(Debug, Clone)]
pub struct Sequence {
    name: Arc<str>,
    alphabet: Alphabet,
    symbols: Arc<[u8]>,
    offset: usize,
    len: usize,
}

impl Sequence {
    /// Create an anonymous sequence from letters.
    ///
    /// # Errors
    ///
    /// Returns `SequenceError::InvalidSymbol` if a letter is not valid for the
    /// alphabet.
    pub fn new(alphabet: Alphabet, letters: &str) -> Result<Self, SequenceError> {
        Self::from_bytes("", alphabet, letters.as_bytes())
    }

    /// Create a named sequence from letters.
    ///
    /// # Errors
    ///
    /// Returns `SequenceError::InvalidSymbol` if a letter is not valid for the
    /// alphabet.
    pub fn with_name(
        name: impl Into<String>,
        alphabet: Alphabet,
        letters: &str,
    ) -> Result<Self, SequenceError> {
        Self::from_bytes(&name.into(), alphabet, letters.as_bytes())
    }

    /// Create a sequence from raw bytes, normalizing case to the alphabet.
    ///
    /// # Errors
    ///
    /// Returns `SequenceError::InvalidSymbol` for the first byte that is not
    /// valid for the alphabet.
    pub fn from_bytes(name: &str, alphabet: Alphabet, bytes: &[u8]) -> Result<Self, SequenceError> {
        let mut symbols = Vec::with_capacity(bytes.len());
        for (i, &b) in bytes.iter().enumerate() {
            if !alphabet.is_valid(b) {
                return Err(SequenceError::InvalidSymbol {
                    alphabet,
                    symbol: char::from(b),
                    position: i + 1,
                });
            }
            symbols.push(alphabet.normalize(b));
        }
        let len = symbols.len();
        Ok(Self {
            name: Arc::from(name),
            alphabet,
            symbols: Arc::from(symbols),
            offset: 0,
            len,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// All symbols of this (possibly windowed) sequence
    pub fn as_bytes(&self) -> &[u8] {
        &self.symbols[self.offset..self.offset + self.len]
    }

    /// Symbol at a 1-based position, `None` outside the sequence
    pub fn symbol(&self, position: i64) -> Option<u8> {
        let index = usize::try_from(position).ok()?.checked_sub(1)?;
        self.as_bytes().get(index).copied()
    }

    /// Symbols of the window `[start, start + length - 1]`, `None` if the
    /// window does not lie completely inside the sequence
    pub fn window(&self, start: i64, length: usize) -> Option<&[u8]> {
        let begin = usize::try_from(start).ok()?.checked_sub(1)?;
        let end = begin.checked_add(length)?;
        self.as_bytes().get(begin..end)
    }

    /// Symbols from `start` to the end of the sequence. A start one past the
    /// last symbol yields an empty slice.
    pub fn suffix(&self, start: i64) -> Option<&[u8]> {
        let begin = usize::try_from(start).ok()?.checked_sub(1)?;
        self.as_bytes().get(begin..)
    }

    /// A view of `length` symbols starting at the 1-based `start`.
    ///
    /// # Errors
    ///
    /// Returns `SequenceError::OutOfRange` if the window exceeds the sequence.
    pub fn sub_sequence(&self, start: i64, length: usize) -> Result<Sequence, SequenceError> {
        if self.window(start, length).is_none() {
            return Err(SequenceError::OutOfRange {
                start,
                length,
                len: self.len,
            });
        }
        // window() succeeded, so start >= 1 and fits in usize
        let begin = usize::try_from(start - 1).unwrap_or_default();
        Ok(Self {
            name: Arc::clone(&self.name),
            alphabet: self.alphabet,
            symbols: Arc::clone(&self.symbols),
            offset: self.offset + begin,
            len: length,
        })
    }

    /// A new sequence holding the reverse complement of this one
    pub fn reverse_complement(&self) -> Sequence {
        let symbols: Vec<u8> = self
            .as_bytes()
            .iter()
            .rev()
            .map(|&s| self.alphabet.complement(s))
            .collect();
        Self {
            name: Arc::clone(&self.name),
            alphabet: self.alphabet,
            len: symbols.len(),
            symbols: Arc::from(symbols),
            offset: 0,
        }
    }

    /// The symbols as a string
    pub fn letters(&self) -> String {
        String::from_utf8_lossy(self.as_bytes()).into_owned()
    }
}

impl PartialEq for Sequence {
    fn eq(&self, other: &Self) -> bool {
        self.alphabet == other.alphabet && self.as_bytes() == other.as_bytes()
    }
}

impl std::fmt::Display for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letters())
    }
}
