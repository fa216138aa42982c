use crate::core::sequence::Sequence;
use crate::matching::context::MatchContext;
use crate::matching::result::Match;
use crate::patterns::{Matcher, PatternCore, PatternError};
use crate::utils::validation::ValidationError;

const LETTERS: usize = 26;

/// Direct repeats compare position by position, inverted repeats against
/// the reversed reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatMode {
    Direct,
    Inverted,
}

impl RepeatMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "DIRECT" => Some(Self::Direct),
            "INVERTED" => Some(Self::Inverted),
            _ => None,
        }
    }
}

/// Repetition of the symbols matched by another, named pattern.
///
/// The window at the current position is compared with the latest match of
/// the referenced pattern. Identical symbols score 1.0, other pairs score
/// their pairing weight (0.0 unless configured). Pairing is indexed by
/// letter, ignoring case.
#[derive(Debug, Clone)]
pub struct Repeat {
    core: PatternCore,
    reference: String,
    mode: RepeatMode,
    pairings: Box<[[f64; LETTERS]; LETTERS]>,
}

impl Repeat {
    /// # Errors
    ///
    /// Returns `PatternError::Validation` for an invalid threshold.
    pub fn new(name: &str, reference: &str, mode: RepeatMode, threshold: f64) -> Result<Self, PatternError> {
        Ok(Self {
            core: PatternCore::new(name, threshold)?,
            reference: reference.to_string(),
            mode,
            pairings: Box::new([[0.0; LETTERS]; LETTERS]),
        })
    }

    /// Name of the referenced pattern
    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn mode(&self) -> RepeatMode {
        self.mode
    }

    fn index(letter: char) -> Option<usize> {
        let upper = letter.to_ascii_uppercase();
        upper.is_ascii_uppercase().then(|| upper as usize - 'A' as usize)
    }

    /// Set the weight of pairing `original` with `repeat`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::PairingWeightOutOfRange` if the weight is not
    /// in [0, 1]. Non-letters are ignored.
    pub fn set_weight(&mut self, original: char, repeat: char, weight: f64) -> Result<(), ValidationError> {
        if !(0.0..=1.0).contains(&weight) {
            return Err(ValidationError::PairingWeightOutOfRange(weight));
        }
        if let (Some(i), Some(j)) = (Self::index(original), Self::index(repeat)) {
            self.pairings[i][j] = weight;
        }
        Ok(())
    }

    pub fn weight(&self, original: char, repeat: char) -> f64 {
        match (Self::index(original), Self::index(repeat)) {
            (Some(i), Some(j)) => self.pairings[i][j],
            _ => 0.0,
        }
    }

    /// Pairing score of two symbols
    pub fn compare(&self, original: u8, repeat: u8) -> f64 {
        if original.eq_ignore_ascii_case(&repeat) {
            1.0
        } else {
            self.weight(char::from(original), char::from(repeat))
        }
    }
}

impl Matcher for Repeat {
    fn core(&self) -> &PatternCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PatternCore {
        &mut self.core
    }

    fn match_at(&mut self, sequence: &Sequence, position: i64, ctx: &mut MatchContext) -> Option<Match> {
        let reference = ctx.latest(&self.reference)?.window()?;
        let original = reference.as_bytes();
        let length = original.len();
        let window = sequence.window(position, length)?;
        if length == 0 {
            return Some(Match::found(sequence, position, 0, 1.0));
        }

        let n = length as f64;
        let mut remaining = n;
        for (i, &symbol) in window.iter().enumerate() {
            let paired = match self.mode {
                RepeatMode::Direct => original[i],
                RepeatMode::Inverted => original[length - 1 - i],
            };
            remaining -= 1.0 - self.compare(paired, symbol);
            if !self.core.accepts(remaining / n) {
                return None;
            }
        }
        Some(Match::found(sequence, position, length, remaining / n))
    }
}
