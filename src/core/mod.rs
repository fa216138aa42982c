//! Sequence-side data types the pattern engine matches against.
//!
//! - [`Alphabet`]: DNA, RNA and protein symbol sets with ambiguity codes
//! - [`Sequence`]: an immutable, 1-based, cheaply cloneable symbol sequence
//! - [`SymbolHistogram`]: symbol counts used as background distributions
//! - [`Strand`]: forward, reverse or unknown orientation of a match
//!
//! ## Coordinates
//!
//! All positions are 1-based and inclusive, as in the pattern definitions:
//!
//! | Sequence | Position 1 | Window (2, 3) |
//! |----------|------------|---------------|
//! | `actg`   | `a`        | `ctg`         |

pub mod alphabet;
pub mod histogram;
pub mod sequence;
pub mod types;

pub use alphabet::Alphabet;
pub use histogram::SymbolHistogram;
pub use sequence::{Sequence, SequenceError};
pub use types::Strand;
