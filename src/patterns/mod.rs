//! The pattern language: a closed set of matchers that compose into trees.
//!
//! Every pattern kind implements [`Matcher`]. [`Pattern`] is the enum over
//! all kinds and is what composites hold as children and what the search
//! driver scans with.
//!
//! ## Pattern families
//!
//! | Family    | Kinds                                                    |
//! |-----------|----------------------------------------------------------|
//! | Symbols   | [`Motif`], [`RegexPattern`], [`Prosite`]                 |
//! | Scoring   | [`Composition`], [`Pwm`], [`Block`]                      |
//! | Spacing   | [`Any`], [`Gap`], [`VoidPattern`]                        |
//! | Position  | [`Constraint`], [`Alignment`]                            |
//! | Reference | [`Repeat`], [`Use`]                                      |
//! | Composite | [`Logic`], [`Iteration`], [`Series`], [`Set`], [`Profile`] |
//!
//! ## Increments
//!
//! After each `match_at` call a pattern reports how far the caller should
//! advance before the next attempt. An increment of 0 means the pattern has
//! further alternatives at the same position (another length, another
//! combination of children); any other value is a safe skip distance.

use std::sync::Arc;

use thiserror::Error;

use crate::core::sequence::Sequence;
use crate::matching::context::MatchContext;
use crate::matching::result::Match;
use crate::utils::validation::{validate_impact, validate_threshold, ValidationError, SCORE_EPSILON};

pub mod any;
pub mod chain;
pub mod composition;
pub mod constraint;
pub mod flexible;
pub mod iteration;
pub mod list;
pub mod logic;
pub mod motif;
pub mod profile;
pub mod pwm;
pub mod regex;
pub mod repeat;
pub mod series;
pub mod set;
pub mod use_ref;
pub mod void;

pub use any::{Any, Gap};
pub use chain::Anchor;
pub use composition::Composition;
pub use constraint::{Alignment, Constraint};
pub use flexible::LengthCursor;
pub use iteration::Iteration;
pub use list::PatternList;
pub use logic::{Logic, LogicOp};
pub use motif::Motif;
pub use profile::{Profile, ProfileAlignment, ProfileElement};
pub use pwm::{Block, Pwm};
pub use regex::{Prosite, RegexPattern};
pub use repeat::{Repeat, RepeatMode};
pub use series::Series;
pub use set::Set;
pub use use_ref::Use;
pub use void::VoidPattern;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PatternError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Duplicate pattern name: {0}")]
    DuplicateName(String),

    #[error("Child pattern not found: {0}")]
    ChildNotFound(String),

    #[error("Pattern '{0}' does not contain child patterns")]
    NonStructuredPattern(String),

    #[error("Invalid motif '{motif}': {reason}")]
    InvalidMotif { motif: String, reason: String },

    #[error("Invalid {alphabet} symbol '{symbol}'")]
    InvalidSymbol { alphabet: String, symbol: char },

    #[error("Invalid regular expression '{pattern}': {reason}")]
    InvalidRegex { pattern: String, reason: String },

    #[error("Weight vector for '{symbol}' has length {actual}, expected {expected}")]
    WeightLengthMismatch {
        symbol: char,
        expected: usize,
        actual: usize,
    },

    #[error("Duplicate symbol '{0}'")]
    DuplicateSymbol(char),

    #[error("Sequences must have equal length: expected {expected}, found {actual}")]
    UnequalSequenceLengths { expected: usize, actual: usize },

    #[error("Sequence alphabet {found} does not match {expected}")]
    AlphabetMismatch { expected: String, found: String },

    #[error("Sequence list must not be empty")]
    EmptySequenceList,

    #[error("Invalid range: {0}")]
    InvalidRange(String),
}

/// Attributes shared by every pattern
#[derive(Debug, Clone, PartialEq)]
pub struct PatternCore {
    name: Arc<str>,
    threshold: f64,
    impact: f64,
}

impl PatternCore {
    /// # Errors
    ///
    /// Returns `ValidationError::ThresholdOutOfRange` if `threshold` is not in [0, 1].
    pub fn new(name: &str, threshold: f64) -> Result<Self, ValidationError> {
        Ok(Self {
            name: Arc::from(name),
            threshold: validate_threshold(threshold)?,
            impact: 1.0,
        })
    }

    /// Core with threshold 0.0 and impact 1.0
    pub fn named(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            threshold: 0.0,
            impact: 1.0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn name_arc(&self) -> &Arc<str> {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = Arc::from(name);
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// # Errors
    ///
    /// Returns `ValidationError::ThresholdOutOfRange` if the value is not in [0, 1].
    pub fn set_threshold(&mut self, threshold: f64) -> Result<(), ValidationError> {
        self.threshold = validate_threshold(threshold)?;
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

    /// Whether `similarity` reaches the threshold
    pub(crate) fn accepts(&self, similarity: f64) -> bool {
        similarity + SCORE_EPSILON >= self.threshold
    }
}

/// Matching behavior of one pattern kind
pub trait Matcher {
    fn core(&self) -> &PatternCore;

    fn core_mut(&mut self) -> &mut PatternCore;

    /// Try to match at the 1-based `position`.
    ///
    /// Returns `None` if the similarity is below the threshold or a
    /// structural condition fails. Updates the state behind
    /// [`Matcher::increment`] for the next call.
    fn match_at(&mut self, sequence: &Sequence, position: i64, ctx: &mut MatchContext) -> Option<Match>;

    /// Positions to advance after the latest call; 0 means more alternatives
    /// exist at the same position
    fn increment(&self) -> usize {
        1
    }

    /// Drop enumeration state so the next call starts a fresh enumeration
    fn reset(&mut self) {}
}

/// ALL enumerates every alternative across calls, BEST returns only the
/// highest scoring one per call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    #[default]
    All,
    Best,
}

impl SearchMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "ALL" => Some(Self::All),
            "BEST" => Some(Self::Best),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::Best => "BEST",
        }
    }
}

/// The closed set of pattern kind names used in definitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKind {
    Any,
    Alignment,
    Block,
    Composition,
    Constraint,
    Gap,
    Iteration,
    Logic,
    Motif,
    Profile,
    Prosite,
    Pwm,
    Regex,
    Repeat,
    Series,
    Set,
    Use,
    Void,
}

impl PatternKind {
    pub const ALL: [PatternKind; 18] = [
        Self::Any,
        Self::Alignment,
        Self::Block,
        Self::Composition,
        Self::Constraint,
        Self::Gap,
        Self::Iteration,
        Self::Logic,
        Self::Motif,
        Self::Profile,
        Self::Prosite,
        Self::Pwm,
        Self::Regex,
        Self::Repeat,
        Self::Series,
        Self::Set,
        Self::Use,
        Self::Void,
    ];

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Any => "Any",
            Self::Alignment => "Alignment",
            Self::Block => "Block",
            Self::Composition => "Composition",
            Self::Constraint => "Constraint",
            Self::Gap => "Gap",
            Self::Iteration => "Iteration",
            Self::Logic => "Logic",
            Self::Motif => "Motif",
            Self::Profile => "Profile",
            Self::Prosite => "Prosite",
            Self::Pwm => "PWM",
            Self::Regex => "Regex",
            Self::Repeat => "Repeat",
            Self::Series => "Series",
            Self::Set => "Set",
            Self::Use => "Use",
            Self::Void => "Void",
        }
    }

    /// Threshold used when a definition does not specify one
    pub fn default_threshold(&self) -> f64 {
        match self {
            Self::Composition
            | Self::Pwm
            | Self::Block
            | Self::Set
            | Self::Iteration
            | Self::Profile
            | Self::Regex
            | Self::Prosite => 1.0,
            _ => 0.0,
        }
    }
}

impl std::fmt::Display for PatternKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Any pattern of the language
#[derive(Debug, Clone)]
pub enum Pattern {
    Any(Any),
    Gap(Gap),
    Void(VoidPattern),
    Motif(Motif),
    Regex(RegexPattern),
    Prosite(Prosite),
    Composition(Composition),
    Pwm(Pwm),
    Block(Block),
    Constraint(Constraint),
    Alignment(Alignment),
    Use(Use),
    Logic(Logic),
    Iteration(Iteration),
    Series(Series),
    Set(Set),
    Profile(Profile),
    Repeat(Repeat),
}

impl Pattern {
    fn matcher(&self) -> &dyn Matcher {
        match self {
            Self::Any(p) => p,
            Self::Gap(p) => p,
            Self::Void(p) => p,
            Self::Motif(p) => p,
            Self::Regex(p) => p,
            Self::Prosite(p) => p,
            Self::Composition(p) => p,
            Self::Pwm(p) => p,
            Self::Block(p) => p,
            Self::Constraint(p) => p,
            Self::Alignment(p) => p,
            Self::Use(p) => p,
            Self::Logic(p) => p,
            Self::Iteration(p) => p,
            Self::Series(p) => p,
            Self::Set(p) => p,
            Self::Profile(p) => p,
            Self::Repeat(p) => p,
        }
    }

    fn matcher_mut(&mut self) -> &mut dyn Matcher {
        match self {
            Self::Any(p) => p,
            Self::Gap(p) => p,
            Self::Void(p) => p,
            Self::Motif(p) => p,
            Self::Regex(p) => p,
            Self::Prosite(p) => p,
            Self::Composition(p) => p,
            Self::Pwm(p) => p,
            Self::Block(p) => p,
            Self::Constraint(p) => p,
            Self::Alignment(p) => p,
            Self::Use(p) => p,
            Self::Logic(p) => p,
            Self::Iteration(p) => p,
            Self::Series(p) => p,
            Self::Set(p) => p,
            Self::Profile(p) => p,
            Self::Repeat(p) => p,
        }
    }

    pub fn kind(&self) -> PatternKind {
        match self {
            Self::Any(_) => PatternKind::Any,
            Self::Gap(_) => PatternKind::Gap,
            Self::Void(_) => PatternKind::Void,
            Self::Motif(_) => PatternKind::Motif,
            Self::Regex(_) => PatternKind::Regex,
            Self::Prosite(_) => PatternKind::Prosite,
            Self::Composition(_) => PatternKind::Composition,
            Self::Pwm(_) => PatternKind::Pwm,
            Self::Block(_) => PatternKind::Block,
            Self::Constraint(_) => PatternKind::Constraint,
            Self::Alignment(_) => PatternKind::Alignment,
            Self::Use(_) => PatternKind::Use,
            Self::Logic(_) => PatternKind::Logic,
            Self::Iteration(_) => PatternKind::Iteration,
            Self::Series(_) => PatternKind::Series,
            Self::Set(_) => PatternKind::Set,
            Self::Profile(_) => PatternKind::Profile,
            Self::Repeat(_) => PatternKind::Repeat,
        }
    }

    pub fn core(&self) -> &PatternCore {
        self.matcher().core()
    }

    pub fn core_mut(&mut self) -> &mut PatternCore {
        self.matcher_mut().core_mut()
    }

    pub fn name(&self) -> &str {
        self.core().name()
    }

    pub fn threshold(&self) -> f64 {
        self.core().threshold()
    }

    pub fn impact(&self) -> f64 {
        self.core().impact()
    }

    /// Set the impact, builder style.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::ImpactOutOfRange` if the value is not in [0, 1].
    pub fn with_impact(mut self, impact: f64) -> Result<Self, ValidationError> {
        self.core_mut().set_impact(impact)?;
        Ok(self)
    }

    pub fn increment(&self) -> usize {
        self.matcher().increment()
    }

    /// Restart every pending enumeration in this pattern tree
    pub fn reset(&mut self) {
        self.matcher_mut().reset();
    }

    /// Match at the 1-based `position`.
    ///
    /// A successful match is tagged with this pattern's name and impact and
    /// recorded in `ctx` as the latest match of this pattern.
    pub fn match_at(&mut self, sequence: &Sequence, position: i64, ctx: &mut MatchContext) -> Option<Match> {
        let mut m = self.matcher_mut().match_at(sequence, position, ctx)?;
        let core = self.core();
        m.tag(core.name_arc(), core.impact());
        ctx.record(core.name_arc(), &m);
        Some(m)
    }

    /// Direct children of a structured pattern
    pub fn children(&self) -> Option<&PatternList> {
        match self {
            Self::Logic(p) => Some(p.patterns()),
            Self::Series(p) => Some(p.patterns()),
            Self::Set(p) => Some(p.patterns()),
            Self::Profile(p) => Some(p.patterns()),
            _ => None,
        }
    }

    /// Direct child with the given name.
    ///
    /// # Errors
    ///
    /// Returns `PatternError::NonStructuredPattern` if this pattern kind has
    /// no children and `PatternError::ChildNotFound` if no child has the name.
    pub fn child(&self, name: &str) -> Result<&Pattern, PatternError> {
        let children = self
            .children()
            .ok_or_else(|| PatternError::NonStructuredPattern(self.name().to_string()))?;
        children
            .get(name)
            .ok_or_else(|| PatternError::ChildNotFound(name.to_string()))
    }

    /// This pattern followed by all nested patterns, depth first
    pub fn self_and_children(&self) -> Vec<&Pattern> {
        let mut out = vec![self];
        match self {
            Self::Iteration(p) => out.extend(p.pattern().self_and_children()),
            Self::Use(p) => out.extend(p.pattern().self_and_children()),
            _ => {
                if let Some(children) = self.children() {
                    for child in children.iter() {
                        out.extend(child.self_and_children());
                    }
                }
            }
        }
        out
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Pattern {
                fn from(pattern: $ty) -> Self {
                    Pattern::$variant(pattern)
                }
            }
        )*
    };
}

impl_from_variant!(
    Any(Any),
    Gap(Gap),
    Void(VoidPattern),
    Motif(Motif),
    Regex(RegexPattern),
    Prosite(Prosite),
    Composition(Composition),
    Pwm(Pwm),
    Block(Block),
    Constraint(Constraint),
    Alignment(Alignment),
    Use(Use),
    Logic(Logic),
    Iteration(Iteration),
    Series(Series),
    Set(Set),
    Profile(Profile),
    Repeat(Repeat),
);
