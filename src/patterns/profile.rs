use crate::core::sequence::Sequence;
use crate::matching::context::MatchContext;
use crate::matching::result::Match;
use crate::patterns::chain::{Anchor, Chain, ChainLink};
use crate::patterns::list::PatternList;
use crate::patterns::{Matcher, Pattern, PatternCore, PatternError, SearchMode};
use crate::utils::validation::ValidationError;

/// How a profile element is placed relative to its reference element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProfileAlignment {
    /// Directly after the reference, no gap
    #[default]
    None,
    Start,
    End,
    Center,
}

impl ProfileAlignment {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "NONE" => Some(Self::None),
            "START" => Some(Self::Start),
            "END" => Some(Self::End),
            "CENTER" => Some(Self::Center),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Start => "START",
            Self::End => "END",
            Self::Center => "CENTER",
        }
    }

    fn anchor(&self) -> Anchor {
        match self {
            Self::None | Self::End => Anchor::End,
            Self::Start => Anchor::Start,
            Self::Center => Anchor::Center,
        }
    }
}

/// Placement of one profile pattern: a gap of `min_gap..=max_gap` symbols
/// measured from an anchor of an earlier element's match.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileElement {
    name: String,
    reference: Option<usize>,
    alignment: ProfileAlignment,
    min_gap: usize,
    max_gap: usize,
}

impl ProfileElement {
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidGapBounds` if `max_gap < min_gap` and
    /// `ValidationError::GapWithoutReference` if a gap is given without both
    /// a reference and an alignment.
    pub fn new(
        name: &str,
        reference: Option<usize>,
        alignment: ProfileAlignment,
        min_gap: usize,
        max_gap: usize,
    ) -> Result<Self, ValidationError> {
        if min_gap > max_gap {
            return Err(ValidationError::InvalidGapBounds {
                min: min_gap,
                max: max_gap,
            });
        }
        if (reference.is_none() || alignment == ProfileAlignment::None) && max_gap != 0 {
            return Err(ValidationError::GapWithoutReference);
        }
        Ok(Self {
            name: name.to_string(),
            reference,
            alignment,
            min_gap,
            max_gap,
        })
    }

    /// Element placed directly after the previous one
    pub fn adjacent(name: &str) -> Self {
        Self {
            name: name.to_string(),
            reference: None,
            alignment: ProfileAlignment::None,
            min_gap: 0,
            max_gap: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn reference(&self) -> Option<usize> {
        self.reference
    }

    pub fn alignment(&self) -> ProfileAlignment {
        self.alignment
    }

    pub fn min_gap(&self) -> usize {
        self.min_gap
    }

    pub fn max_gap(&self) -> usize {
        self.max_gap
    }

    fn link(&self, index: usize) -> ChainLink {
        ChainLink {
            reference: self.reference.or_else(|| index.checked_sub(1)),
            anchor: self.alignment.anchor(),
            min_gap: self.min_gap,
            max_gap: self.max_gap,
        }
    }
}

/// Patterns laid out with variable gaps relative to each other.
///
/// Every element except the first is placed at a gap from the start, end or
/// center of an earlier element's match. Modes behave as for
/// [`Series`](crate::patterns::Series).
#[derive(Debug, Clone)]
pub struct Profile {
    core: PatternCore,
    mode: SearchMode,
    elements: Vec<ProfileElement>,
    patterns: PatternList,
    chain: Chain,
    increment: usize,
}

impl Profile {
    /// Empty profile; add elements with [`Profile::push`] or [`Profile::add`].
    ///
    /// # Errors
    ///
    /// Returns `PatternError::Validation` for an invalid threshold.
    pub fn new(name: &str, mode: SearchMode, threshold: f64) -> Result<Self, PatternError> {
        Ok(Self {
            core: PatternCore::new(name, threshold)?,
            mode,
            elements: Vec::new(),
            patterns: PatternList::new(),
            chain: Chain::new(Vec::new()),
            increment: 1,
        })
    }

    /// Append an element and its pattern.
    ///
    /// # Errors
    ///
    /// Returns `PatternError::InvalidRange` if the element references itself
    /// or a later element, and `PatternError::DuplicateName` if the pattern
    /// name is taken.
    pub fn push(&mut self, element: ProfileElement, pattern: Pattern) -> Result<(), PatternError> {
        let index = self.elements.len();
        if let Some(reference) = element.reference {
            if reference >= index {
                return Err(PatternError::InvalidRange(format!(
                    "profile element {index} references element {reference}"
                )));
            }
        }
        self.patterns.push(pattern)?;
        self.elements.push(element);
        let links = self
            .elements
            .iter()
            .enumerate()
            .map(|(i, e)| e.link(i))
            .collect();
        self.chain = Chain::new(links);
        Ok(())
    }

    /// Append a pattern directly after the previous element.
    ///
    /// # Errors
    ///
    /// Returns `PatternError::DuplicateName` if the pattern name is taken.
    pub fn add(&mut self, pattern: Pattern) -> Result<(), PatternError> {
        let element = ProfileElement::adjacent("");
        self.push(element, pattern)
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn elements(&self) -> &[ProfileElement] {
        &self.elements
    }

    /// Index of the element with the given name
    pub fn element_index(&self, name: &str) -> Option<usize> {
        self.elements.iter().position(|e| e.name == name)
    }

    pub fn patterns(&self) -> &PatternList {
        &self.patterns
    }

    /// Largest safe skip given each element's increment minus the
    /// accumulated maximum gaps before it
    fn settled_increment(&self) -> usize {
        let mut gap_sum = 0i64;
        let mut max_increment = i64::MIN;
        for (element, pattern) in self.elements.iter().zip(self.patterns.iter()) {
            gap_sum += element.max_gap as i64;
            max_increment = max_increment.max(pattern.increment() as i64 - gap_sum);
        }
        usize::try_from(max_increment).unwrap_or(0).max(1)
    }
}

impl Matcher for Profile {
    fn core(&self) -> &PatternCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PatternCore {
        &mut self.core
    }

    fn match_at(&mut self, sequence: &Sequence, position: i64, ctx: &mut MatchContext) -> Option<Match> {
        let patterns = self.patterns.as_mut_slice();
        let found = match self.mode {
            SearchMode::All => self.chain.next_accepted(&self.core, patterns, sequence, position, ctx),
            SearchMode::Best => self.chain.best(&self.core, patterns, sequence, position, ctx),
        };
        self.increment = if self.chain.is_pending() {
            0
        } else {
            self.settled_increment()
        };
        found
    }

    fn increment(&self) -> usize {
        self.increment
    }

    fn reset(&mut self) {
        self.chain.reset();
        self.patterns.iter_mut().for_each(Pattern::reset);
        self.increment = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alphabet::Alphabet;
    use crate::patterns::{Motif, Repeat, RepeatMode};

    fn dna(letters: &str) -> Sequence {
        Sequence::new(Alphabet::Dna, letters).unwrap()
    }

    fn motif(name: &str, letters: &str) -> Pattern {
        Pattern::from(Motif::new(name, Alphabet::Dna, letters, 1.0).unwrap())
    }

    fn two_boxes(mode: SearchMode, alignment: ProfileAlignment, min_gap: usize, max_gap: usize) -> Profile {
        let mut profile = Profile::new("profile", mode, 1.0).unwrap();
        profile.push(ProfileElement::adjacent("first"), motif("acg", "acg")).unwrap();
        profile
            .push(
                ProfileElement::new("second", Some(0), alignment, min_gap, max_gap).unwrap(),
                motif("gca", "gca"),
            )
            .unwrap();
        profile
    }

    #[test]
    fn test_gap_after_end() {
        let seq = dna("ttacgttttgca");
        let mut profile = two_boxes(SearchMode::Best, ProfileAlignment::End, 2, 6);
        let m = profile.match_at(&seq, 3, &mut MatchContext::new()).unwrap();
        assert_eq!(m.start(), 3);
        assert_eq!(m.end(), 12);
        assert_eq!(m.sub_matches()[1].start(), 10);
        assert_eq!(profile.increment(), 1);

        // gap too short to reach the second box
        let mut profile = two_boxes(SearchMode::Best, ProfileAlignment::End, 0, 3);
        assert!(profile.match_at(&seq, 3, &mut MatchContext::new()).is_none());
    }

    #[test]
    fn test_repeat_after_gap_survives_resumed_calls() {
        let seq = dna("acgacgacg");
        let mut profile = Profile::new("profile", SearchMode::All, 1.0).unwrap();
        profile.push(ProfileElement::adjacent("first"), motif("m", "acg")).unwrap();
        profile
            .push(
                ProfileElement::new("second", Some(0), ProfileAlignment::End, 0, 3).unwrap(),
                Pattern::from(Repeat::new("copy", "m", RepeatMode::Direct, 1.0).unwrap()),
            )
            .unwrap();

        let first = profile.match_at(&seq, 1, &mut MatchContext::new()).unwrap();
        assert_eq!((first.start(), first.end()), (1, 6));
        assert_eq!(profile.increment(), 0);

        let second = profile.match_at(&seq, 1, &mut MatchContext::new()).unwrap();
        assert_eq!((second.start(), second.end()), (1, 9));
        assert_eq!(second.sub_matches()[1].start(), 7);
        assert_eq!(profile.increment(), 1);
    }

    #[test]
    fn test_gap_after_start() {
        let seq = dna("ttacgttttgca");
        let mut profile = two_boxes(SearchMode::All, ProfileAlignment::Start, 7, 7);
        let m = profile.match_at(&seq, 3, &mut MatchContext::new()).unwrap();
        assert_eq!(m.end(), 12);
        assert_eq!(profile.increment(), 1);
    }

    #[test]
    fn test_adjacent_elements() {
        let seq = dna("acggca");
        let mut profile = Profile::new("profile", SearchMode::All, 1.0).unwrap();
        profile.add(motif("acg", "acg")).unwrap();
        profile.add(motif("gca", "gca")).unwrap();
        let m = profile.match_at(&seq, 1, &mut MatchContext::new()).unwrap();
        assert_eq!(m.length(), 6);
        assert_eq!(profile.elements().len(), 2);
    }

    #[test]
    fn test_element_validation() {
        assert_eq!(
            ProfileElement::new("e", None, ProfileAlignment::End, 1, 2),
            Err(ValidationError::GapWithoutReference)
        );
        assert_eq!(
            ProfileElement::new("e", Some(0), ProfileAlignment::None, 0, 2),
            Err(ValidationError::GapWithoutReference)
        );
        assert_eq!(
            ProfileElement::new("e", Some(0), ProfileAlignment::End, 3, 2),
            Err(ValidationError::InvalidGapBounds { min: 3, max: 2 })
        );

        let mut profile = Profile::new("profile", SearchMode::All, 1.0).unwrap();
        let forward = ProfileElement::new("e", Some(0), ProfileAlignment::End, 0, 0).unwrap();
        assert!(matches!(
            profile.push(forward, motif("m", "a")),
            Err(PatternError::InvalidRange(_))
        ));
        assert_eq!(ProfileAlignment::parse("center"), Some(ProfileAlignment::Center));
    }

    #[test]
    fn test_increment_subtracts_gaps() {
        let seq = dna("aaaaaaaaaaaa");
        let mut profile = two_boxes(SearchMode::Best, ProfileAlignment::End, 0, 2);
        assert!(profile.match_at(&seq, 1, &mut MatchContext::new()).is_none());
        // max(1 - 0, 1 - 2) clamps to 1
        assert_eq!(profile.increment(), 1);
        assert_eq!(profile.element_index("second"), Some(1));
    }
}
