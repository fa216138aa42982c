//! Resumable backtracking over an ordered list of patterns.
//!
//! Series and Profile place their children one after another: every element
//! is matched at a position derived from an earlier element's match (its
//! start, end or center) plus a gap. [`Chain`] enumerates all such
//! combinations. It keeps its cursor between calls, so a caller can pull one
//! combination per call and resume at the same position.

use tracing::trace;

use crate::core::sequence::Sequence;
use crate::matching::context::MatchContext;
use crate::matching::result::Match;
use crate::patterns::{Pattern, PatternCore};

/// Point of a match, or of the sequence, that a position is measured from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    Start,
    #[default]
    End,
    Center,
}

impl Anchor {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "START" => Some(Self::Start),
            "END" => Some(Self::End),
            "CENTER" => Some(Self::Center),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "START",
            Self::End => "END",
            Self::Center => "CENTER",
        }
    }

    /// Position of this anchor on a match. `End` is the first position
    /// after the match.
    pub fn of_match(&self, m: &Match) -> i64 {
        match self {
            Self::Start => m.start(),
            Self::End => m.end() + 1,
            Self::Center => m.start() + (m.length() / 2) as i64,
        }
    }

    /// Position of this anchor on a whole sequence of `len` symbols
    pub fn of_sequence(&self, len: usize) -> i64 {
        match self {
            Self::Start => 1,
            Self::End => len as i64 + 1,
            Self::Center => 1 + (len / 2) as i64,
        }
    }
}

/// Placement of one chain element relative to an earlier element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ChainLink {
    /// Index of the element this one is placed after; `None` places it at
    /// the chain's start position
    pub reference: Option<usize>,
    pub anchor: Anchor,
    pub min_gap: usize,
    pub max_gap: usize,
}

impl ChainLink {
    /// First element, placed at the start position without a gap
    pub fn origin() -> Self {
        Self {
            reference: None,
            anchor: Anchor::End,
            min_gap: 0,
            max_gap: 0,
        }
    }

    /// Element directly following the end of element `previous`
    pub fn follow(previous: usize) -> Self {
        Self {
            reference: Some(previous),
            ..Self::origin()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChainState {
    Fresh,
    Yielded,
    Exhausted,
}

/// Resumable enumeration of element combinations
#[derive(Debug, Clone)]
pub(crate) struct Chain {
    links: Vec<ChainLink>,
    gaps: Vec<usize>,
    subs: Vec<Option<Match>>,
    state: ChainState,
    origin: i64,
}

impl Chain {
    pub fn new(links: Vec<ChainLink>) -> Self {
        let n = links.len();
        Self {
            gaps: links.iter().map(|link| link.min_gap).collect(),
            subs: vec![None; n],
            links,
            state: ChainState::Fresh,
            origin: 0,
        }
    }

    /// Forget the cursor; the next call starts a new enumeration
    pub fn reset(&mut self) {
        self.state = ChainState::Fresh;
        for (gap, link) in self.gaps.iter_mut().zip(&self.links) {
            *gap = link.min_gap;
        }
        self.subs.iter_mut().for_each(|sub| *sub = None);
    }

    /// Whether the last call yielded a combination and the enumeration may
    /// continue at the same position
    pub fn is_pending(&self) -> bool {
        self.state == ChainState::Yielded
    }

    /// Next combination of element matches at `position`, or `None` once
    /// all combinations have been produced.
    pub fn next(
        &mut self,
        patterns: &mut [Pattern],
        sequence: &Sequence,
        position: i64,
        ctx: &mut MatchContext,
    ) -> Option<Vec<Match>> {
        let n = patterns.len();
        if n == 0 || n != self.links.len() {
            return None;
        }
        if self.state != ChainState::Fresh && position != self.origin {
            self.reset();
        }

        let mut index = match self.state {
            ChainState::Fresh => {
                self.origin = position;
                self.gaps[0] = self.links[0].min_gap;
                0
            }
            ChainState::Yielded => {
                let index = self.resume_from(n - 1, patterns)?;
                self.restore(index, patterns, ctx);
                index
            }
            ChainState::Exhausted => return None,
        };

        loop {
            let found = self
                .element_position(index, position)
                .and_then(|at| patterns[index].match_at(sequence, at, ctx));
            match found {
                Some(m) => {
                    self.subs[index] = Some(m);
                    if index + 1 == n {
                        self.state = ChainState::Yielded;
                        return Some(self.subs.iter().flatten().cloned().collect());
                    }
                    index += 1;
                    self.gaps[index] = self.links[index].min_gap;
                }
                None => {
                    self.subs[index] = None;
                    trace!(index, gap = self.gaps[index], "chain element failed");
                    index = self.resume_from(index, patterns)?;
                }
            }
        }
    }

    /// Record the kept matches of the elements before `index` again; a
    /// resumed call may receive a context that has not seen them
    fn restore(&self, index: usize, patterns: &[Pattern], ctx: &mut MatchContext) {
        for (pattern, sub) in patterns[..index].iter().zip(&self.subs) {
            if let Some(m) = sub {
                ctx.record(pattern.core().name_arc(), m);
            }
        }
    }

    /// Like [`Chain::backtrack`] but marks the chain exhausted on failure
    fn resume_from(&mut self, from: usize, patterns: &[Pattern]) -> Option<usize> {
        let resumed = self.backtrack(from, patterns);
        if resumed.is_none() {
            self.state = ChainState::Exhausted;
        }
        resumed
    }

    /// Highest element at or below `from` that can still change: either its
    /// pattern has alternatives left at the same position or its gap can
    /// grow.
    fn backtrack(&mut self, from: usize, patterns: &[Pattern]) -> Option<usize> {
        for j in (0..=from).rev() {
            if patterns[j].increment() == 0 {
                return Some(j);
            }
            if self.gaps[j] < self.links[j].max_gap {
                self.gaps[j] += 1;
                return Some(j);
            }
        }
        None
    }

    fn element_position(&self, index: usize, position: i64) -> Option<i64> {
        let link = &self.links[index];
        let gap = self.gaps[index] as i64;
        match link.reference {
            None => Some(position + gap),
            Some(r) => {
                let reference = self.subs.get(r)?.as_ref()?;
                Some(link.anchor.of_match(reference) + gap)
            }
        }
    }

    /// Next combination whose weighted similarity reaches the threshold of
    /// `core`. The chain is reset when no further combination can follow.
    pub fn next_accepted(
        &mut self,
        core: &PatternCore,
        patterns: &mut [Pattern],
        sequence: &Sequence,
        position: i64,
        ctx: &mut MatchContext,
    ) -> Option<Match> {
        while let Some(subs) = self.next(patterns, sequence, position, ctx) {
            let m = Match::composite(sequence, subs);
            if core.accepts(m.similarity()) {
                if !self.has_alternatives(patterns) {
                    self.reset();
                }
                return Some(m);
            }
        }
        self.reset();
        None
    }

    /// Highest scoring combination at `position`. Ties keep the first
    /// combination found.
    pub fn best(
        &mut self,
        core: &PatternCore,
        patterns: &mut [Pattern],
        sequence: &Sequence,
        position: i64,
        ctx: &mut MatchContext,
    ) -> Option<Match> {
        self.reset();
        let mut best: Option<Match> = None;
        while let Some(subs) = self.next(patterns, sequence, position, ctx) {
            let m = Match::composite(sequence, subs);
            if core.accepts(m.similarity())
                && best.as_ref().map_or(true, |b| m.similarity() > b.similarity())
            {
                best = Some(m);
            }
        }
        self.reset();
        best
    }

    fn has_alternatives(&self, patterns: &[Pattern]) -> bool {
        patterns
            .iter()
            .zip(self.links.iter().zip(&self.gaps))
            .any(|(pattern, (link, &gap))| pattern.increment() == 0 || gap < link.max_gap)
    }
}
