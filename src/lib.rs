//! # biopatml
//!
//! A pattern matching engine for biological sequences.
//!
//! Patterns describe what to look for in DNA, RNA or protein sequences:
//! exact and fuzzy motifs, regular expressions and PROSITE patterns, weight
//! matrices, symbol composition, gaps, repeats, and compositions of all of
//! these in series, sets, profiles, iterations and logical combinations.
//! Matching a pattern yields scored [`Match`] trees whose similarity lies in
//! [0, 1].
//!
//! ## Features
//!
//! - **Fuzzy scoring**: every pattern reports a similarity and only matches
//!   reaching its threshold are returned
//! - **Exhaustive enumeration**: variable length patterns and series yield
//!   every alternative at a position, or only the best one
//! - **Back references**: repeats and positional constraints refer to the
//!   latest match of another named pattern
//! - **Definitions**: pattern trees load from JSON documents
//!
//! ## Example
//!
//! ```rust
//! use biopatml::core::{Alphabet, Sequence};
//! use biopatml::matching::{search, SearchConfig};
//! use biopatml::patterns::{Gap, Motif, Pattern, SearchMode, Series};
//!
//! let seq = Sequence::new(Alphabet::Dna, "ttgacaatgctatataatg").unwrap();
//! let mut promoter = Pattern::from(
//!     Series::new(
//!         "promoter",
//!         SearchMode::Best,
//!         0.8,
//!         vec![
//!             Pattern::from(Motif::new("minus35", Alphabet::Dna, "ttgaca", 0.6).unwrap()),
//!             Pattern::from(Gap::new("spacer", 3, 6, 1.0, 0.0).unwrap()),
//!             Pattern::from(Motif::new("minus10", Alphabet::Dna, "tataat", 0.6).unwrap()),
//!         ],
//!     )
//!     .unwrap(),
//! );
//!
//! for m in search(&seq, &mut promoter, &SearchConfig::default()) {
//!     println!("{m}");
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: alphabets, sequences and symbol histograms
//! - [`matching`]: match results, the search driver and JSON reports
//! - [`patterns`]: the pattern language
//! - [`parsing`]: JSON definitions and FASTA input
//! - [`utils`]: shared validation helpers

pub mod core;
pub mod matching;
pub mod parsing;
pub mod patterns;
pub mod utils;

// Re-export commonly used types for convenience
pub use core::{Alphabet, Sequence, SequenceError, Strand, SymbolHistogram};
pub use matching::{search, search_best, Match, MatchContext, SearchConfig};
pub use parsing::definition::{Definition, DefinitionError, DefinitionList};
pub use patterns::{Pattern, PatternError, PatternKind};
pub use utils::validation::ValidationError;
