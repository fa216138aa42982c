use crate::core::alphabet::Alphabet;
use crate::core::sequence::Sequence;
use crate::matching::context::MatchContext;
use crate::matching::result::Match;
use crate::patterns::{Matcher, PatternCore, PatternError};
use crate::utils::validation::SCORE_EPSILON;

/// Fixed length motif with per-position alternatives.
///
/// Every motif position holds the set of symbols accepted there. `[ag]`
/// lists alternatives explicitly; ambiguity codes such as `r` expand to the
/// same set. Matching counts positions whose sequence symbol is not in the
/// set and gives up as soon as the threshold can no longer be reached.
#[derive(Debug, Clone)]
pub struct Motif {
    core: PatternCore,
    alphabet: Alphabet,
    positions: Vec<Vec<u8>>,
}

impl Motif {
    /// # Errors
    ///
    /// Returns `PatternError::InvalidMotif` for empty motifs or unbalanced
    /// brackets, `PatternError::InvalidSymbol` for letters outside the
    /// alphabet, and `PatternError::Validation` for an invalid threshold.
    pub fn new(name: &str, alphabet: Alphabet, motif: &str, threshold: f64) -> Result<Self, PatternError> {
        Ok(Self {
            core: PatternCore::new(name, threshold)?,
            alphabet,
            positions: parse_positions(motif, alphabet)?,
        })
    }

    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    /// Number of positions
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Accepted symbols per position
    pub fn positions(&self) -> &[Vec<u8>] {
        &self.positions
    }

    /// Motif text with alternatives in brackets
    pub fn letters(&self) -> String {
        let mut out = String::new();
        for alternatives in &self.positions {
            if let [single] = alternatives.as_slice() {
                out.push(char::from(*single));
            } else {
                out.push('[');
                out.extend(alternatives.iter().map(|&s| char::from(s)));
                out.push(']');
            }
        }
        out
    }

    fn max_mismatches(&self) -> usize {
        let n = self.positions.len() as f64;
        (n * (1.0 - self.core.threshold()) + SCORE_EPSILON).floor() as usize
    }
}

fn parse_positions(motif: &str, alphabet: Alphabet) -> Result<Vec<Vec<u8>>, PatternError> {
    let invalid = |reason: &str| PatternError::InvalidMotif {
        motif: motif.to_string(),
        reason: reason.to_string(),
    };

    let mut positions = Vec::with_capacity(motif.len());
    let mut alternative: Option<Vec<u8>> = None;
    for &letter in motif.as_bytes() {
        match letter {
            b'[' => {
                if alternative.is_some() {
                    return Err(invalid("'[' within alternative"));
                }
                alternative = Some(Vec::new());
            }
            b']' => match alternative.take() {
                Some(symbols) if !symbols.is_empty() => positions.push(symbols),
                Some(_) => return Err(invalid("empty alternative")),
                None => return Err(invalid("opening bracket for ']' is missing")),
            },
            _ => {
                let expansion = expand(letter, alphabet)?;
                match alternative.as_mut() {
                    Some(symbols) => {
                        for s in expansion {
                            if !symbols.contains(&s) {
                                symbols.push(s);
                            }
                        }
                    }
                    None => positions.push(expansion),
                }
            }
        }
    }
    if alternative.is_some() {
        return Err(invalid("']' is missing"));
    }
    if positions.is_empty() {
        return Err(invalid("motif is empty"));
    }
    Ok(positions)
}

fn expand(letter: u8, alphabet: Alphabet) -> Result<Vec<u8>, PatternError> {
    if alphabet.contains(letter) {
        return Ok(vec![alphabet.normalize(letter)]);
    }
    alphabet
        .ambiguity(letter)
        .map(<[u8]>::to_vec)
        .ok_or_else(|| PatternError::InvalidSymbol {
            alphabet: alphabet.to_string(),
            symbol: char::from(letter),
        })
}

impl Matcher for Motif {
    fn core(&self) -> &PatternCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PatternCore {
        &mut self.core
    }

    fn match_at(&mut self, sequence: &Sequence, position: i64, _ctx: &mut MatchContext) -> Option<Match> {
        let length = self.positions.len();
        let window = sequence.window(position, length)?;
        let max_mismatches = self.max_mismatches();
        let mut mismatches = 0;
        for (alternatives, &symbol) in self.positions.iter().zip(window) {
            if !alternatives.contains(&self.alphabet.normalize(symbol)) {
                mismatches += 1;
                if mismatches > max_mismatches {
                    return None;
                }
            }
        }
        let similarity = (length - mismatches) as f64 / length as f64;
        Some(Match::found(sequence, position, length, similarity))
    }
}
