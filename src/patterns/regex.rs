use ::regex::bytes::{Regex, RegexBuilder};

use crate::core::alphabet::Alphabet;
use crate::core::sequence::Sequence;
use crate::matching::context::MatchContext;
use crate::matching::result::Match;
use crate::patterns::{Matcher, PatternCore, PatternError};

/// Regular expression matched against the sequence suffix at a position.
///
/// A hit further downstream is rejected for the current position, and the
/// distance to it becomes the increment so a scan lands on it next.
#[derive(Debug, Clone)]
pub struct RegexPattern {
    core: PatternCore,
    source: String,
    case_sensitive: bool,
    regex: Regex,
    increment: usize,
}

impl RegexPattern {
    /// # Errors
    ///
    /// Returns `PatternError::InvalidRegex` if the expression does not compile.
    pub fn new(name: &str, regex: &str, case_sensitive: bool) -> Result<Self, PatternError> {
        let compiled = RegexBuilder::new(regex)
            .case_insensitive(!case_sensitive)
            .build()
            .map_err(|e| PatternError::InvalidRegex {
                pattern: regex.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            core: PatternCore::new(name, 1.0)?,
            source: regex.to_string(),
            case_sensitive,
            regex: compiled,
            increment: 1,
        })
    }

    pub fn regex(&self) -> &str {
        &self.source
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }
}

impl Matcher for RegexPattern {
    fn core(&self) -> &PatternCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PatternCore {
        &mut self.core
    }

    fn match_at(&mut self, sequence: &Sequence, position: i64, _ctx: &mut MatchContext) -> Option<Match> {
        let Some(suffix) = sequence.suffix(position) else {
            self.increment = 1;
            return None;
        };
        match self.regex.find(suffix) {
            Some(hit) if hit.start() == 0 => {
                self.increment = 1;
                Some(Match::found(sequence, position, hit.len(), 1.0))
            }
            Some(hit) => {
                self.increment = hit.start();
                None
            }
            None => {
                self.increment = suffix.len().saturating_sub(1).max(1);
                None
            }
        }
    }

    fn increment(&self) -> usize {
        self.increment
    }
}

/// A PROSITE pattern, translated into a regular expression
#[derive(Debug, Clone)]
pub struct Prosite {
    inner: RegexPattern,
    prosite: String,
    alphabet: Alphabet,
}

impl Prosite {
    /// # Errors
    ///
    /// Returns `PatternError::InvalidRegex` if the translated expression does
    /// not compile.
    pub fn new(name: &str, alphabet: Alphabet, prosite: &str) -> Result<Self, PatternError> {
        let regex = Self::to_regex(prosite, alphabet);
        Ok(Self {
            inner: RegexPattern::new(name, &regex, false)?,
            prosite: prosite.to_string(),
            alphabet,
        })
    }

    /// Translate PROSITE syntax into regular expression syntax
    pub fn to_regex(prosite: &str, alphabet: Alphabet) -> String {
        let mut regex = String::with_capacity(prosite.len() * 2);
        for ch in prosite.chars() {
            match ch {
                '(' => regex.push('{'),
                ')' => regex.push('}'),
                '{' => regex.push_str("[^"),
                '}' => regex.push(']'),
                '<' => regex.push('^'),
                '>' => regex.push('$'),
                'x' | 'X' => regex.push('.'),
                '.' | '-' => {}
                _ => match u8::try_from(ch).ok().and_then(|b| alphabet.ambiguity(b)) {
                    Some(expansion) => {
                        regex.push('[');
                        regex.extend(expansion.iter().map(|&s| char::from(s)));
                        regex.push(']');
                    }
                    None => regex.push(ch),
                },
            }
        }
        regex
    }

    pub fn prosite(&self) -> &str {
        &self.prosite
    }

    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    /// The translated regular expression
    pub fn regex(&self) -> &str {
        self.inner.regex()
    }
}

impl Matcher for Prosite {
    fn core(&self) -> &PatternCore {
        self.inner.core()
    }

    fn core_mut(&mut self) -> &mut PatternCore {
        self.inner.core_mut()
    }

    fn match_at(&mut self, sequence: &Sequence, position: i64, ctx: &mut MatchContext) -> Option<Match> {
        self.inner.match_at(sequence, position, ctx)
    }

    fn increment(&self) -> usize {
        self.inner.increment()
    }
}
