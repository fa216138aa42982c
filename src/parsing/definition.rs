//! JSON pattern definitions.
//!
//! A [`Definition`] names one root pattern and may carry nested
//! sub-definitions that `Use` patterns refer to by dotted path. Patterns are
//! described by [`PatternSpec`] objects whose `"type"` is one of the
//! [`PatternKind`] names:
//!
//! ```json
//! {
//!   "name": "promoter",
//!   "definitions": [
//!     { "name": "box", "pattern": { "type": "Motif", "alphabet": "DNA", "motif": "tataat" } }
//!   ],
//!   "pattern": {
//!     "type": "Series", "mode": "BEST", "threshold": 0.8,
//!     "patterns": [
//!       { "type": "Motif", "name": "minus35", "alphabet": "DNA", "motif": "ttgaca", "threshold": 0.6 },
//!       { "type": "Gap", "minimum": 15, "maximum": 19 },
//!       { "type": "Use", "name": "minus10", "definition": "box" }
//!     ]
//!   }
//! }
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::core::alphabet::Alphabet;
use crate::core::histogram::SymbolHistogram;
use crate::core::sequence::{Sequence, SequenceError};
use crate::patterns::{
    Alignment, Anchor, Any, Block, Composition, Constraint, Gap, Iteration, Logic, LogicOp, Motif,
    Pattern, PatternError, PatternKind, Profile, ProfileAlignment, ProfileElement, Prosite, Pwm,
    RegexPattern, Repeat, RepeatMode, SearchMode, Series, Set, Use, VoidPattern,
};
use crate::utils::validation::ValidationError;

#[derive(Error, Debug)]
pub enum DefinitionError {
    #[error("Failed to read definitions: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse definitions: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown pattern type: {0}")]
    UnknownKind(String),

    #[error("{kind} pattern requires attribute '{attribute}'")]
    MissingAttribute {
        kind: PatternKind,
        attribute: &'static str,
    },

    #[error("Invalid value '{value}' for attribute '{attribute}'")]
    InvalidAttribute { attribute: &'static str, value: String },

    #[error("Unknown definition: {0}")]
    UnknownDefinition(String),

    #[error("Duplicate definition name: {0}")]
    DuplicateDefinition(String),

    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error(transparent)]
    Sequence(#[from] SequenceError),
}

impl From<ValidationError> for DefinitionError {
    fn from(err: ValidationError) -> Self {
        Self::Pattern(err.into())
    }
}

/// Pairing weight of a Repeat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairingSpec {
    pub original: char,
    pub repeat: char,
    #[serde(default = "default_pairing_weight")]
    pub weight: f64,
}

fn default_pairing_weight() -> f64 {
    1.0
}

/// One element of a Profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSpec {
    #[serde(default)]
    pub name: String,
    /// Name of an earlier region this one is placed relative to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<String>,
    #[serde(default)]
    pub min_gap: usize,
    #[serde(default)]
    pub max_gap: usize,
    pub pattern: PatternSpec,
}

/// Attributes of one pattern; which ones apply depends on `kind`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatternSpec {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alphabet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motif: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prosite: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_sensitive: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub increment: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbols: Option<BTreeMap<String, f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<BTreeMap<String, Vec<f64>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequences: Option<Vec<String>>,
    /// Letters whose symbol frequencies form the Block background
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<Box<PatternSpec>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pairings: Option<Vec<PairingSpec>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patterns: Option<Vec<PatternSpec>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regions: Option<Vec<RegionSpec>>,
}

/// A named pattern with optional nested sub-definitions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub definitions: Vec<Definition>,
    pub pattern: PatternSpec,
}

impl Definition {
    /// Load a single definition from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `DefinitionError::Io` or `DefinitionError::Json` if the file
    /// cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self, DefinitionError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// # Errors
    ///
    /// Returns `DefinitionError::Json` for malformed JSON.
    pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Nested definition addressed by a dotted path such as `outer.inner`
    pub fn sub_definition(&self, path: &str) -> Option<&Definition> {
        let mut current = self;
        for name in path.split('.') {
            current = current.definitions.iter().find(|d| d.name == name)?;
        }
        Some(current)
    }

    /// Build the root pattern.
    ///
    /// # Errors
    ///
    /// Returns `DefinitionError` for unknown kinds, missing or malformed
    /// attributes, unresolved `Use` definitions or pattern references, and
    /// any constructor failure.
    pub fn build(&self) -> Result<Pattern, DefinitionError> {
        check_unique_names(&self.definitions)?;
        let builder = Builder { definition: self };
        let pattern = builder.pattern(&self.pattern)?;
        check_references(&pattern)?;
        debug!(
            definition = %self.name,
            kind = %pattern.kind(),
            patterns = pattern.self_and_children().len(),
            "Built pattern definition"
        );
        Ok(pattern)
    }
}

/// Serializable list of top-level definitions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefinitionData {
    pub definitions: Vec<Definition>,
}

/// Top-level definitions indexed by name
#[derive(Debug, Clone, Default)]
pub struct DefinitionList {
    definitions: Vec<Definition>,
    index: HashMap<String, usize>,
}

impl DefinitionList {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// Returns `DefinitionError::Io` or `DefinitionError::Json` if the file
    /// cannot be read or parsed, and `DefinitionError::DuplicateDefinition`
    /// for repeated names.
    pub fn load_from_file(path: &Path) -> Result<Self, DefinitionError> {
        let content = std::fs::read_to_string(path)?;
        let list = Self::from_json(&content)?;
        debug!(path = %path.display(), count = list.len(), "Loaded pattern definitions");
        Ok(list)
    }

    /// # Errors
    ///
    /// Returns `DefinitionError::Json` for malformed JSON and
    /// `DefinitionError::DuplicateDefinition` for repeated names.
    pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
        let data: DefinitionData = serde_json::from_str(json)?;
        let mut list = Self::new();
        for definition in data.definitions {
            list.add(definition)?;
        }
        Ok(list)
    }

    /// # Errors
    ///
    /// Returns `DefinitionError::DuplicateDefinition` if the name is taken.
    pub fn add(&mut self, definition: Definition) -> Result<(), DefinitionError> {
        if self.index.contains_key(&definition.name) {
            return Err(DefinitionError::DuplicateDefinition(definition.name));
        }
        self.index
            .insert(definition.name.clone(), self.definitions.len());
        self.definitions.push(definition);
        Ok(())
    }

    /// Definition addressed by a dotted path such as `outer.inner`
    pub fn get(&self, path: &str) -> Option<&Definition> {
        let (top, rest) = match path.split_once('.') {
            Some((top, rest)) => (top, Some(rest)),
            None => (path, None),
        };
        let definition = self
            .index
            .get(top)
            .and_then(|&i| self.definitions.get(i))?;
        match rest {
            Some(rest) => definition.sub_definition(rest),
            None => Some(definition),
        }
    }

    /// Build the pattern of the definition at `path`.
    ///
    /// # Errors
    ///
    /// Returns `DefinitionError::UnknownDefinition` if no definition exists
    /// at `path`, otherwise as [`Definition::build`].
    pub fn pattern(&self, path: &str) -> Result<Pattern, DefinitionError> {
        self.get(path)
            .ok_or_else(|| DefinitionError::UnknownDefinition(path.to_string()))?
            .build()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Definition> {
        self.definitions.iter()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let data = DefinitionData {
            definitions: self.definitions.clone(),
        };
        serde_json::to_string_pretty(&data)
    }
}

fn check_unique_names(definitions: &[Definition]) -> Result<(), DefinitionError> {
    let mut seen = HashSet::new();
    for definition in definitions {
        if !seen.insert(definition.name.as_str()) {
            return Err(DefinitionError::DuplicateDefinition(definition.name.clone()));
        }
    }
    Ok(())
}

/// Every pattern named by a Repeat, Alignment or Constraint must exist in
/// the tree rooted at `root`
fn check_references(root: &Pattern) -> Result<(), DefinitionError> {
    let patterns = root.self_and_children();
    let names: HashSet<&str> = patterns.iter().map(|p| p.name()).collect();
    for pattern in &patterns {
        let reference = match pattern {
            Pattern::Repeat(p) => Some(p.reference()),
            Pattern::Alignment(p) => Some(p.reference()),
            Pattern::Constraint(p) => p.reference(),
            _ => None,
        };
        let Some(reference) = reference else {
            continue;
        };
        if names.contains(reference) {
            continue;
        }
        if patterns.len() == 1 {
            return Err(PatternError::NonStructuredPattern(root.name().to_string()).into());
        }
        return Err(PatternError::ChildNotFound(reference.to_string()).into());
    }
    Ok(())
}

/// Builds patterns whose `Use` references resolve against `definition`
struct Builder<'a> {
    definition: &'a Definition,
}

impl Builder<'_> {
    fn pattern(&self, spec: &PatternSpec) -> Result<Pattern, DefinitionError> {
        let kind = PatternKind::parse(&spec.kind)
            .ok_or_else(|| DefinitionError::UnknownKind(spec.kind.clone()))?;
        let threshold = spec.threshold.unwrap_or_else(|| kind.default_threshold());
        let name = spec.name.as_str();

        let mut pattern = match kind {
            PatternKind::Any => {
                let (min, max, step) = length_range(spec, kind)?;
                Pattern::from(Any::new(name, min, max, step)?)
            }
            PatternKind::Gap => {
                let (min, max, step) = length_range(spec, kind)?;
                let mut gap = Gap::new(name, min, max, step, threshold)?;
                if let Some(weights) = &spec.weights {
                    gap.set_weights(weights)?;
                }
                Pattern::from(gap)
            }
            PatternKind::Void => Pattern::from(VoidPattern::new(name)),
            PatternKind::Motif => {
                let motif = required(&spec.motif, kind, "motif")?;
                Pattern::from(Motif::new(name, alphabet(spec, kind)?, motif, threshold)?)
            }
            PatternKind::Regex => {
                let regex = required(&spec.regex, kind, "regex")?;
                let case_sensitive = spec.case_sensitive.unwrap_or(false);
                Pattern::from(RegexPattern::new(name, regex, case_sensitive)?)
            }
            PatternKind::Prosite => {
                let prosite = required(&spec.prosite, kind, "prosite")?;
                Pattern::from(Prosite::new(name, alphabet(spec, kind)?, prosite)?)
            }
            PatternKind::Composition => self.composition(spec, kind, threshold)?,
            PatternKind::Pwm => {
                let rows = required(&spec.rows, kind, "rows")?;
                let mut pwm = Pwm::new(name, alphabet(spec, kind)?, threshold)?;
                for (symbol, weights) in rows {
                    pwm.add(single_char("rows", symbol)?, weights.clone())?;
                }
                Pattern::from(pwm)
            }
            PatternKind::Block => {
                let alphabet = alphabet(spec, kind)?;
                let sequences = required(&spec.sequences, kind, "sequences")?
                    .iter()
                    .map(|letters| Sequence::new(alphabet, letters))
                    .collect::<Result<Vec<_>, _>>()?;
                let background = spec
                    .background
                    .as_deref()
                    .map(|letters| Sequence::new(alphabet, letters))
                    .transpose()?
                    .map(|sequence| SymbolHistogram::from_sequence(&sequence));
                Pattern::from(Block::new(name, sequences, background.as_ref(), threshold)?)
            }
            PatternKind::Constraint => Pattern::from(Constraint::new(
                name,
                spec.reference.as_deref(),
                anchor(spec, kind)?,
                spec.offset.unwrap_or(0),
            )),
            PatternKind::Alignment => {
                let reference = required(&spec.reference, kind, "reference")?;
                Pattern::from(Alignment::new(
                    name,
                    reference,
                    anchor(spec, kind)?,
                    spec.offset.unwrap_or(0),
                ))
            }
            PatternKind::Use => {
                let path = required(&spec.definition, kind, "definition")?;
                let used = self
                    .definition
                    .sub_definition(path)
                    .ok_or_else(|| DefinitionError::UnknownDefinition(path.clone()))?;
                Pattern::from(Use::new(name, path, used.build()?))
            }
            PatternKind::Logic => {
                let operation = required(&spec.operation, kind, "operation")?;
                let op = LogicOp::parse(operation)
                    .ok_or_else(|| invalid("operation", operation))?;
                Pattern::from(Logic::new(name, op, threshold, self.children(spec, kind)?)?)
            }
            PatternKind::Iteration => {
                let inner = required(&spec.pattern, kind, "pattern")?;
                let minimum = *required(&spec.minimum, kind, "minimum")?;
                let maximum = *required(&spec.maximum, kind, "maximum")?;
                Pattern::from(Iteration::new(
                    name,
                    self.pattern(inner)?,
                    minimum,
                    maximum,
                    threshold,
                )?)
            }
            PatternKind::Series => {
                let mode = search_mode(spec, kind)?;
                Pattern::from(Series::new(name, mode, threshold, self.children(spec, kind)?)?)
            }
            PatternKind::Set => {
                let mode = search_mode(spec, kind)?;
                Pattern::from(Set::new(name, mode, threshold, self.children(spec, kind)?)?)
            }
            PatternKind::Profile => self.profile(spec, kind, threshold)?,
            PatternKind::Repeat => {
                let reference = required(&spec.reference, kind, "reference")?;
                let mode_name = required(&spec.mode, kind, "mode")?;
                let mode = RepeatMode::parse(mode_name).ok_or_else(|| invalid("mode", mode_name))?;
                let mut repeat = Repeat::new(name, reference, mode, threshold)?;
                for pairing in spec.pairings.iter().flatten() {
                    repeat.set_weight(pairing.original, pairing.repeat, pairing.weight)?;
                }
                Pattern::from(repeat)
            }
        };

        // kinds whose constructors take no threshold
        let takes_threshold_later = matches!(
            kind,
            PatternKind::Any
                | PatternKind::Void
                | PatternKind::Constraint
                | PatternKind::Alignment
                | PatternKind::Use
        );
        if let Some(t) = spec.threshold.filter(|_| takes_threshold_later) {
            pattern.core_mut().set_threshold(t)?;
        }
        if let Some(impact) = spec.impact {
            pattern = pattern.with_impact(impact)?;
        }
        Ok(pattern)
    }

    fn children(&self, spec: &PatternSpec, kind: PatternKind) -> Result<Vec<Pattern>, DefinitionError> {
        required(&spec.patterns, kind, "patterns")?
            .iter()
            .map(|child| self.pattern(child))
            .collect()
    }

    fn composition(&self, spec: &PatternSpec, kind: PatternKind, threshold: f64) -> Result<Pattern, DefinitionError> {
        let (min, max, step) = length_range(spec, kind)?;
        let mut composition = Composition::new(
            &spec.name,
            alphabet(spec, kind)?,
            min,
            max,
            step,
            search_mode(spec, kind)?,
            threshold,
        )?;
        for (symbol, &weight) in spec.symbols.iter().flatten() {
            composition.add(single_char("symbols", symbol)?, weight)?;
        }
        if let Some(weight) = spec.default_weight {
            composition.set_default_weight(weight);
        }
        Ok(Pattern::from(composition))
    }

    fn profile(&self, spec: &PatternSpec, kind: PatternKind, threshold: f64) -> Result<Pattern, DefinitionError> {
        let mut profile = Profile::new(&spec.name, search_mode(spec, kind)?, threshold)?;
        for region in required(&spec.regions, kind, "regions")? {
            let reference = match &region.reference {
                Some(name) => Some(
                    profile
                        .element_index(name)
                        .ok_or_else(|| invalid("reference", name))?,
                ),
                None => None,
            };
            let alignment = match &region.alignment {
                Some(value) => ProfileAlignment::parse(value).ok_or_else(|| invalid("alignment", value))?,
                None => ProfileAlignment::None,
            };
            let element = ProfileElement::new(&region.name, reference, alignment, region.min_gap, region.max_gap)?;
            profile.push(element, self.pattern(&region.pattern)?)?;
        }
        Ok(Pattern::from(profile))
    }
}

fn required<'s, T>(value: &'s Option<T>, kind: PatternKind, attribute: &'static str) -> Result<&'s T, DefinitionError> {
    value
        .as_ref()
        .ok_or(DefinitionError::MissingAttribute { kind, attribute })
}

fn invalid(attribute: &'static str, value: &str) -> DefinitionError {
    DefinitionError::InvalidAttribute {
        attribute,
        value: value.to_string(),
    }
}

fn single_char(attribute: &'static str, value: &str) -> Result<char, DefinitionError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(invalid(attribute, value)),
    }
}

fn alphabet(spec: &PatternSpec, kind: PatternKind) -> Result<Alphabet, DefinitionError> {
    let name = required(&spec.alphabet, kind, "alphabet")?;
    Alphabet::parse(name).ok_or_else(|| invalid("alphabet", name))
}

fn anchor(spec: &PatternSpec, kind: PatternKind) -> Result<Anchor, DefinitionError> {
    let position = required(&spec.position, kind, "position")?;
    Anchor::parse(position).ok_or_else(|| invalid("position", position))
}

fn search_mode(spec: &PatternSpec, kind: PatternKind) -> Result<SearchMode, DefinitionError> {
    let mode = required(&spec.mode, kind, "mode")?;
    SearchMode::parse(mode).ok_or_else(|| invalid("mode", mode))
}

fn length_range(spec: &PatternSpec, kind: PatternKind) -> Result<(usize, usize, f64), DefinitionError> {
    Ok((
        *required(&spec.minimum, kind, "minimum")?,
        *required(&spec.maximum, kind, "maximum")?,
        spec.increment.unwrap_or(1.0),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::search::{search, SearchConfig};

    fn dna(letters: &str) -> Sequence {
        Sequence::new(Alphabet::Dna, letters).unwrap()
    }

    #[test]
    fn test_build_series_with_use() {
        let json = r#"{
            "name": "promoter",
            "definitions": [
                { "name": "box", "pattern": { "type": "Motif", "name": "inner", "alphabet": "DNA", "motif": "tata" } }
            ],
            "pattern": {
                "type": "Series", "name": "root", "mode": "BEST", "threshold": 1.0,
                "patterns": [
                    { "type": "Motif", "name": "head", "alphabet": "DNA", "motif": "gc" },
                    { "type": "Gap", "name": "gap", "minimum": 1, "maximum": 3 },
                    { "type": "Use", "name": "tail", "definition": "box" }
                ]
            }
        }"#;
        let definition = Definition::from_json(json).unwrap();
        let mut pattern = definition.build().unwrap();
        assert_eq!(pattern.kind(), PatternKind::Series);
        assert_eq!(pattern.child("tail").unwrap().kind(), PatternKind::Use);

        let matches = search(&dna("aagcattatagg"), &mut pattern, &SearchConfig::default());
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].start(), 3);
        assert_eq!(matches[0].letters().unwrap(), "gcattata");
    }

    #[test]
    fn test_default_thresholds_and_impact() {
        let spec = PatternSpec {
            kind: "Composition".to_string(),
            name: "comp".to_string(),
            alphabet: Some("DNA".to_string()),
            mode: Some("ALL".to_string()),
            minimum: Some(1),
            maximum: Some(3),
            impact: Some(0.5),
            ..PatternSpec::default()
        };
        let definition = Definition {
            name: "d".to_string(),
            definitions: Vec::new(),
            pattern: spec,
        };
        let pattern = definition.build().unwrap();
        assert!((pattern.threshold() - 1.0).abs() < f64::EPSILON);
        assert!((pattern.impact() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_errors() {
        let unknown = r#"{ "pattern": { "type": "Palindrome" } }"#;
        assert!(matches!(
            Definition::from_json(unknown).unwrap().build(),
            Err(DefinitionError::UnknownKind(kind)) if kind == "Palindrome"
        ));

        let missing = r#"{ "pattern": { "type": "Motif", "alphabet": "DNA" } }"#;
        assert!(matches!(
            Definition::from_json(missing).unwrap().build(),
            Err(DefinitionError::MissingAttribute { attribute: "motif", .. })
        ));

        let bad_mode = r#"{ "pattern": { "type": "Set", "mode": "SOME", "patterns": [] } }"#;
        assert!(matches!(
            Definition::from_json(bad_mode).unwrap().build(),
            Err(DefinitionError::InvalidAttribute { attribute: "mode", .. })
        ));

        let bad_use = r#"{ "pattern": { "type": "Use", "definition": "nowhere" } }"#;
        assert!(matches!(
            Definition::from_json(bad_use).unwrap().build(),
            Err(DefinitionError::UnknownDefinition(_))
        ));

        let typo = r#"{ "pattern": { "type": "Void", "treshold": 0.5 } }"#;
        assert!(matches!(Definition::from_json(typo), Err(DefinitionError::Json(_))));
    }

    #[test]
    fn test_references_are_resolved() {
        let dangling = r#"{ "pattern": {
            "type": "Series", "mode": "ALL",
            "patterns": [
                { "type": "Motif", "name": "left", "alphabet": "DNA", "motif": "acg" },
                { "type": "Repeat", "reference": "right", "mode": "DIRECT" }
            ]
        } }"#;
        assert!(matches!(
            Definition::from_json(dangling).unwrap().build(),
            Err(DefinitionError::Pattern(PatternError::ChildNotFound(name))) if name == "right"
        ));

        let leaf = r#"{ "pattern": { "type": "Repeat", "name": "r", "reference": "x", "mode": "INVERTED" } }"#;
        assert!(matches!(
            Definition::from_json(leaf).unwrap().build(),
            Err(DefinitionError::Pattern(PatternError::NonStructuredPattern(_)))
        ));
    }

    #[test]
    fn test_definition_list_paths() {
        let json = r#"{ "definitions": [
            { "name": "outer",
              "definitions": [ { "name": "inner", "pattern": { "type": "Void" } } ],
              "pattern": { "type": "Use", "definition": "inner" } }
        ] }"#;
        let list = DefinitionList::from_json(json).unwrap();
        assert_eq!(list.len(), 1);
        assert!(list.get("outer.inner").is_some());
        assert!(list.get("outer.missing").is_none());
        assert_eq!(list.pattern("outer").unwrap().kind(), PatternKind::Use);
        assert!(matches!(
            list.pattern("inner"),
            Err(DefinitionError::UnknownDefinition(_))
        ));

        let duplicate = r#"{ "definitions": [
            { "name": "a", "pattern": { "type": "Void" } },
            { "name": "a", "pattern": { "type": "Void" } }
        ] }"#;
        assert!(matches!(
            DefinitionList::from_json(duplicate),
            Err(DefinitionError::DuplicateDefinition(name)) if name == "a"
        ));
    }

    #[test]
    fn test_block_background() {
        let json = r#"{ "pattern": {
            "type": "Block", "name": "site", "alphabet": "DNA", "threshold": 0.0,
            "sequences": ["acgt", "acga"], "background": "aacgtt"
        } }"#;
        let pattern = Definition::from_json(json).unwrap().build().unwrap();
        let Pattern::Block(block) = &pattern else {
            panic!("expected a Block, got {}", pattern.kind());
        };
        // column 0 is all 'a': p = 3/6, background frequency 2/6
        let expected = (0.5_f64 / (2.0 / 6.0)).log2();
        assert!((block.pwm().get(b'a', 0) - expected).abs() < 1e-12);

        let bad = r#"{ "pattern": {
            "type": "Block", "alphabet": "DNA", "sequences": ["acgt"], "background": "acxq"
        } }"#;
        assert!(matches!(
            Definition::from_json(bad).unwrap().build(),
            Err(DefinitionError::Sequence(SequenceError::InvalidSymbol { .. }))
        ));
    }

    #[test]
    fn test_profile_regions() {
        let json = r#"{ "pattern": {
            "type": "Profile", "mode": "BEST",
            "regions": [
                { "name": "first", "pattern": { "type": "Motif", "alphabet": "DNA", "motif": "acg" } },
                { "name": "second", "reference": "first", "alignment": "END", "min_gap": 2, "max_gap": 6,
                  "pattern": { "type": "Motif", "alphabet": "DNA", "motif": "gca" } }
            ]
        } }"#;
        let mut pattern = Definition::from_json(json).unwrap().build().unwrap();
        let matches = search(&dna("ttacgttttgca"), &mut pattern, &SearchConfig::default());
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].start(), 3);
        assert_eq!(matches[0].end(), 12);
    }
}
