use serde::{Deserialize, Serialize};

const DNA_SYMBOLS: &[u8] = b"acgt";
const RNA_SYMBOLS: &[u8] = b"acgu";
const PROTEIN_SYMBOLS: &[u8] = b"ACDEFGHIKLMNPQRSTVWY";

/// Symbol alphabet of a sequence or pattern
///
/// Nucleotide alphabets are stored lowercase, amino acids uppercase. Lookups
/// accept either case and normalize first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alphabet {
    #[serde(rename = "DNA", alias = "dna")]
    Dna,
    #[serde(rename = "RNA", alias = "rna")]
    Rna,
    #[serde(rename = "AA", alias = "aa", alias = "PROTEIN", alias = "protein")]
    Protein,
}

impl Alphabet {
    /// Parse an alphabet name as used in pattern definitions
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "DNA" => Some(Alphabet::Dna),
            "RNA" => Some(Alphabet::Rna),
            "AA" | "PROTEIN" => Some(Alphabet::Protein),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Dna => "DNA",
            Self::Rna => "RNA",
            Self::Protein => "AA",
        }
    }

    /// The unambiguous symbols of this alphabet, in canonical case
    pub fn symbols(&self) -> &'static [u8] {
        match self {
            Self::Dna => DNA_SYMBOLS,
            Self::Rna => RNA_SYMBOLS,
            Self::Protein => PROTEIN_SYMBOLS,
        }
    }

    /// Number of unambiguous symbols
    pub fn len(&self) -> usize {
        self.symbols().len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols().is_empty()
    }

    /// Convert a symbol to the canonical case of this alphabet
    pub fn normalize(&self, symbol: u8) -> u8 {
        match self {
            Self::Dna | Self::Rna => symbol.to_ascii_lowercase(),
            Self::Protein => symbol.to_ascii_uppercase(),
        }
    }

    /// Check whether `symbol` is one of the unambiguous symbols
    pub fn contains(&self, symbol: u8) -> bool {
        self.symbols().contains(&self.normalize(symbol))
    }

    /// Check whether `symbol` may appear in a sequence of this alphabet,
    /// either as a plain symbol or as an ambiguity code
    pub fn is_valid(&self, symbol: u8) -> bool {
        self.contains(symbol) || self.ambiguity(symbol).is_some()
    }

    /// Expand an IUPAC ambiguity code into the symbols it stands for.
    ///
    /// Returns `None` for plain symbols and unknown letters.
    pub fn ambiguity(&self, symbol: u8) -> Option<&'static [u8]> {
        let symbol = self.normalize(symbol);
        match self {
            Self::Dna => nucleotide_ambiguity(symbol, b't'),
            Self::Rna => nucleotide_ambiguity(symbol, b'u'),
            Self::Protein => match symbol {
                b'B' => Some(b"DN"),
                b'Z' => Some(b"EQ"),
                b'J' => Some(b"IL"),
                b'X' => Some(PROTEIN_SYMBOLS),
                _ => None,
            },
        }
    }

    /// Watson-Crick complement of a nucleotide; amino acids map to themselves
    pub fn complement(&self, symbol: u8) -> u8 {
        let symbol = self.normalize(symbol);
        let thymine = if *self == Self::Rna { b'u' } else { b't' };
        match self {
            Self::Protein => symbol,
            Self::Dna | Self::Rna => match symbol {
                b'a' => thymine,
                b't' | b'u' => b'a',
                b'c' => b'g',
                b'g' => b'c',
                b'r' => b'y',
                b'y' => b'r',
                b'k' => b'm',
                b'm' => b'k',
                b'b' => b'v',
                b'v' => b'b',
                b'd' => b'h',
                b'h' => b'd',
                other => other,
            },
        }
    }

    /// Human readable name of a symbol, if it has one
    pub fn friendly_name(&self, symbol: u8) -> Option<&'static str> {
        let symbol = self.normalize(symbol);
        match self {
            Self::Dna | Self::Rna => match symbol {
                b'a' => Some("Adenine"),
                b'c' => Some("Cytosine"),
                b'g' => Some("Guanine"),
                b't' if *self == Self::Dna => Some("Thymine"),
                b'u' if *self == Self::Rna => Some("Uracil"),
                b'n' => Some("Any"),
                _ => None,
            },
            Self::Protein => amino_acid_name(symbol),
        }
    }
}

impl std::fmt::Display for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

fn nucleotide_ambiguity(symbol: u8, thymine: u8) -> Option<&'static [u8]> {
    let t_variant = thymine == b't';
    let expansion: &'static [u8] = match (symbol, t_variant) {
        (b'r', _) => b"ag",
        (b'y', true) => b"ct",
        (b'y', false) => b"cu",
        (b's', _) => b"cg",
        (b'w', true) => b"at",
        (b'w', false) => b"au",
        (b'k', true) => b"gt",
        (b'k', false) => b"gu",
        (b'm', _) => b"ac",
        (b'b', true) => b"cgt",
        (b'b', false) => b"cgu",
        (b'd', true) => b"agt",
        (b'd', false) => b"agu",
        (b'h', true) => b"act",
        (b'h', false) => b"acu",
        (b'v', _) => b"acg",
        (b'n', true) => DNA_SYMBOLS,
        (b'n', false) => RNA_SYMBOLS,
        _ => return None,
    };
    Some(expansion)
}

fn amino_acid_name(symbol: u8) -> Option<&'static str> {
    let name = match symbol {
        b'A' => "Alanine",
        b'C' => "Cysteine",
        b'D' => "Aspartic acid",
        b'E' => "Glutamic acid",
        b'F' => "Phenylalanine",
        b'G' => "Glycine",
        b'H' => "Histidine",
        b'I' => "Isoleucine",
        b'K' => "Lysine",
        b'L' => "Leucine",
        b'M' => "Methionine",
        b'N' => "Asparagine",
        b'P' => "Proline",
        b'Q' => "Glutamine",
        b'R' => "Arginine",
        b'S' => "Serine",
        b'T' => "Threonine",
        b'V' => "Valine",
        b'W' => "Tryptophan",
        b'Y' => "Tyrosine",
        _ => return None,
    };
    Some(name)
}
