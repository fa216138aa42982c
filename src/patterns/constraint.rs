use crate::core::sequence::Sequence;
use crate::matching::context::MatchContext;
use crate::matching::result::Match;
use crate::patterns::chain::Anchor;
use crate::patterns::{Matcher, PatternCore};

/// Target position of an anchor plus offset, measured on the latest match of
/// `reference` or, without a reference, on the whole sequence
fn target_position(
    reference: Option<&str>,
    anchor: Anchor,
    offset: i64,
    sequence: &Sequence,
    ctx: &MatchContext,
) -> Option<i64> {
    let base = match reference {
        Some(name) => anchor.of_match(ctx.latest(name)?),
        None => anchor.of_sequence(sequence.len()),
    };
    Some(base + offset)
}

/// Zero-length assertion that the current position lies at a fixed
/// distance from a sequence or match anchor.
///
/// Positions before the target fail with an increment that jumps straight
/// to it.
#[derive(Debug, Clone)]
pub struct Constraint {
    core: PatternCore,
    reference: Option<String>,
    anchor: Anchor,
    offset: i64,
    increment: usize,
}

impl Constraint {
    pub fn new(name: &str, reference: Option<&str>, anchor: Anchor, offset: i64) -> Self {
        Self {
            core: PatternCore::named(name),
            reference: reference.map(str::to_string),
            anchor,
            offset,
            increment: 1,
        }
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }
}

impl Matcher for Constraint {
    fn core(&self) -> &PatternCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PatternCore {
        &mut self.core
    }

    fn match_at(&mut self, sequence: &Sequence, position: i64, ctx: &mut MatchContext) -> Option<Match> {
        self.increment = 1;
        let target = target_position(self.reference.as_deref(), self.anchor, self.offset, sequence, ctx)?;
        let distance = target - position;
        self.increment = usize::try_from(distance).unwrap_or(0).max(1);
        if distance != 0 {
            return None;
        }
        Some(Match::found(sequence, position, 0, 1.0))
    }

    fn increment(&self) -> usize {
        self.increment
    }
}

/// Zero-length match relocated to a fixed distance from the latest match
/// of another pattern.
///
/// Unlike [`Constraint`] it succeeds from any position once the reference
/// has matched, even when the target lies outside the sequence. Without a
/// recorded reference match there is no target and the match fails.
#[derive(Debug, Clone)]
pub struct Alignment {
    core: PatternCore,
    reference: String,
    anchor: Anchor,
    offset: i64,
    increment: usize,
}

impl Alignment {
    pub fn new(name: &str, reference: &str, anchor: Anchor, offset: i64) -> Self {
        Self {
            core: PatternCore::named(name),
            reference: reference.to_string(),
            anchor,
            offset,
            increment: 1,
        }
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }
}

impl Matcher for Alignment {
    fn core(&self) -> &PatternCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PatternCore {
        &mut self.core
    }

    fn match_at(&mut self, sequence: &Sequence, position: i64, ctx: &mut MatchContext) -> Option<Match> {
        self.increment = 1;
        let target = target_position(Some(&self.reference), self.anchor, self.offset, sequence, ctx)?;
        self.increment = usize::try_from(target - position).unwrap_or(0).max(1);
        Some(Match::found(sequence, target, 0, 1.0))
    }

    fn increment(&self) -> usize {
        self.increment
    }
}
