use tracing::debug;

use crate::core::sequence::Sequence;
use crate::matching::context::MatchContext;
use crate::matching::result::Match;
use crate::patterns::Pattern;

/// Configuration for a pattern search over one sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// First position to try (1-based, may be negative)
    pub start: i64,
    /// Last position to try. If `end <= start` the whole sequence is searched.
    /// May exceed the sequence length.
    pub end: i64,
    /// Maximum number of matches collected by [`search`]
    pub limit: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            start: 1,
            end: 0,
            limit: None,
        }
    }
}

impl SearchConfig {
    /// Search positions `start..=end`
    pub fn range(start: i64, end: i64) -> Self {
        Self {
            start,
            end,
            limit: None,
        }
    }

    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Effective `(start, end)` for a sequence of `len` symbols
    pub fn bounds(&self, len: usize) -> (i64, i64) {
        if self.end <= self.start {
            (1, len as i64)
        } else {
            (self.start, self.end)
        }
    }
}

/// Scan the configured range and invoke `on_match` for every match that ends
/// inside it. Stops early when `on_match` returns `false`.
///
/// The position advances by the pattern's increment after every attempt,
/// so an increment of 0 retries the same position for the next alternative.
/// Retries share the latest matches recorded at that position; the context
/// is cleared whenever the position moves. Enumerations left pending by an
/// earlier scan are restarted first.
fn scan<F>(sequence: &Sequence, pattern: &mut Pattern, config: &SearchConfig, mut on_match: F) -> usize
where
    F: FnMut(Match) -> bool,
{
    pattern.reset();
    let (mut position, end) = config.bounds(sequence.len());
    let mut ctx = MatchContext::new();
    let mut attempts = 0;
    while position <= end {
        attempts += 1;
        if let Some(m) = pattern.match_at(sequence, position, &mut ctx) {
            if m.end() <= end && !on_match(m) {
                break;
            }
        }
        let increment = pattern.increment();
        if increment != 0 {
            ctx.clear();
        }
        position += increment as i64;
    }
    attempts
}

/// Find the match with the highest similarity.
///
/// Ties keep the earliest match. Returns `None` if nothing matched.
pub fn search_best(sequence: &Sequence, pattern: &mut Pattern, config: &SearchConfig) -> Option<Match> {
    let mut best: Option<Match> = None;
    let attempts = scan(sequence, pattern, config, |m| {
        if best.as_ref().map_or(true, |b| m.similarity() > b.similarity()) {
            best = Some(m);
        }
        true
    });

    debug!(
        pattern = pattern.name(),
        sequence = sequence.name(),
        attempts,
        found = best.is_some(),
        "Best match search finished"
    );
    best
}

/// Collect all matches of `pattern` in positional order
pub fn search(sequence: &Sequence, pattern: &mut Pattern, config: &SearchConfig) -> Vec<Match> {
    let limit = config.limit.unwrap_or(usize::MAX);
    let mut matches = Vec::new();
    if limit == 0 {
        return matches;
    }
    let attempts = scan(sequence, pattern, config, |m| {
        matches.push(m);
        matches.len() < limit
    });

    debug!(
        pattern = pattern.name(),
        sequence = sequence.name(),
        attempts,
        matches = matches.len(),
        "Search finished"
    );
    matches
}
