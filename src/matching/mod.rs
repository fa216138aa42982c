//! Match results and the search driver.
//!
//! This module provides the result side of the engine:
//!
//! - [`Match`]: a scored region of a sequence with owned sub-matches
//! - [`MatchContext`]: latest match of every named pattern during one attempt
//! - [`search`] / [`search_best`]: scan a sequence with a pattern
//! - [`MatchReport`]: serializable snapshot of a match tree
//!
//! ## Search Algorithm
//!
//! The scan starts at `SearchConfig::start` and asks the pattern to match at
//! every position. After each attempt the position advances by the pattern's
//! increment:
//!
//! 1. **Increment 0**: the pattern has more alternatives at this position
//!    (another length, another combination), so the same position is retried
//! 2. **Increment 1**: ordinary step to the next position
//! 3. **Increment > 1**: the pattern knows no match can start before
//!    `position + increment` (a regex found its next hit further ahead)
//!
//! Matches extending past the configured end are discarded.
//!
//! ## Example
//!
//! ```rust
//! use biopatml::core::{Alphabet, Sequence};
//! use biopatml::matching::{search, SearchConfig};
//! use biopatml::patterns::{Motif, Pattern};
//!
//! let seq = Sequence::new(Alphabet::Dna, "ttacgtacgt").unwrap();
//! let mut pattern = Pattern::from(Motif::new("box", Alphabet::Dna, "acg", 1.0).unwrap());
//!
//! for m in search(&seq, &mut pattern, &SearchConfig::default()) {
//!     println!("{} at {} ({:.2})", m.letters().unwrap_or_default(), m.start(), m.similarity());
//! }
//! ```

pub mod context;
pub mod report;
pub mod result;
pub mod search;

pub use context::MatchContext;
pub use report::{MatchReport, SearchReport};
pub use result::Match;
pub use search::{search, search_best, SearchConfig};
