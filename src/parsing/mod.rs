//! Loading pattern definitions and sequences from files.
//!
//! - **Definitions** ([`definition`]): JSON documents describing pattern
//!   trees, with nested sub-definitions reachable from `Use` patterns
//! - **FASTA** ([`fasta`]): plain or gzip compressed sequence files, read
//!   with noodles
//!
//! ## Example
//!
//! ```rust,no_run
//! use biopatml::core::Alphabet;
//! use biopatml::matching::{search, SearchConfig};
//! use biopatml::parsing::definition::Definition;
//! use biopatml::parsing::fasta::read_fasta_file;
//! use std::path::Path;
//!
//! let mut pattern = Definition::load_from_file(Path::new("promoter.json"))
//!     .unwrap()
//!     .build()
//!     .unwrap();
//! for sequence in read_fasta_file(Path::new("genes.fa"), Alphabet::Dna).unwrap() {
//!     let matches = search(&sequence, &mut pattern, &SearchConfig::default());
//!     println!("{}: {} matches", sequence.name(), matches.len());
//! }
//! ```

pub mod definition;
pub mod fasta;
