//! Sequence loading from FASTA files using noodles.
//!
//! Supports both uncompressed and gzip/bgzip compressed files.
//!
//! Supported extensions:
//! - `.fa`, `.fasta`, `.fna`, `.faa` (uncompressed)
//! - the same with `.gz` or `.bgz` appended (compressed)

use std::ffi::OsStr;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::GzDecoder;
use noodles::fasta;
use tracing::{debug, warn};

use crate::core::alphabet::Alphabet;
use crate::core::sequence::{Sequence, SequenceError};

/// Check if the path has a FASTA extension
pub fn is_fasta_file(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    let stripped = path_str
        .strip_suffix(".gz")
        .or_else(|| path_str.strip_suffix(".bgz"))
        .unwrap_or(&path_str);

    matches!(
        Path::new(stripped)
            .extension()
            .and_then(OsStr::to_str)
            .map(str::to_lowercase)
            .as_deref(),
        Some("fa" | "fasta" | "fna" | "faa")
    )
}

#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// Read all sequences of a FASTA file over the given alphabet.
///
/// Letters are validated against the alphabet and normalized to its case.
/// Records without symbols are skipped.
///
/// # Errors
///
/// Returns `SequenceError::Io` if the file cannot be read,
/// `SequenceError::Fasta` if a record is malformed,
/// `SequenceError::InvalidSymbol` for letters outside the alphabet and
/// `SequenceError::Empty` if the file holds no sequence.
pub fn read_fasta_file(path: &Path, alphabet: Alphabet) -> Result<Vec<Sequence>, SequenceError> {
    let file = std::fs::File::open(path)?;
    let sequences = if is_gzipped(path) {
        read_fasta(BufReader::new(GzDecoder::new(file)), alphabet)?
    } else {
        read_fasta(BufReader::new(file), alphabet)?
    };
    debug!(
        path = %path.display(),
        count = sequences.len(),
        alphabet = %alphabet,
        "Loaded FASTA sequences"
    );
    Ok(sequences)
}

/// Read all sequences from FASTA text.
///
/// # Errors
///
/// Same as [`read_fasta_file`], without the file access.
pub fn read_fasta<R: BufRead>(reader: R, alphabet: Alphabet) -> Result<Vec<Sequence>, SequenceError> {
    let mut fasta_reader = fasta::io::Reader::new(reader);
    let mut sequences = Vec::new();

    for result in fasta_reader.records() {
        let record = result
            .map_err(|e| SequenceError::Fasta(format!("Failed to parse FASTA record: {e}")))?;
        let name = String::from_utf8_lossy(record.name()).to_string();
        let symbols = record.sequence().as_ref();
        if symbols.is_empty() {
            warn!(name = %name, "Skipping FASTA record without sequence");
            continue;
        }
        sequences.push(Sequence::from_bytes(&name, alphabet, symbols)?);
    }

    if sequences.is_empty() {
        return Err(SequenceError::Empty);
    }
    Ok(sequences)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_is_fasta_file() {
        assert!(is_fasta_file(Path::new("test.fa")));
        assert!(is_fasta_file(Path::new("test.fasta")));
        assert!(is_fasta_file(Path::new("proteins.faa")));
        assert!(is_fasta_file(Path::new("test.fa.gz")));
        assert!(is_fasta_file(Path::new("test.fna.bgz")));
        assert!(is_fasta_file(Path::new("/path/to/Reference.FA")));

        assert!(!is_fasta_file(Path::new("test.json")));
        assert!(!is_fasta_file(Path::new("test.gz")));
        assert!(!is_fasta_file(Path::new("test.fai")));
    }

    #[test]
    fn test_read_fasta_file() {
        let mut temp = NamedTempFile::with_suffix(".fa").unwrap();
        temp.write_all(b">seq1 description\nACGTACGT\nACGT\n>seq2\nggcc\n")
            .unwrap();
        temp.flush().unwrap();

        let sequences = read_fasta_file(temp.path(), Alphabet::Dna).unwrap();
        assert_eq!(sequences.len(), 2);
        assert_eq!(sequences[0].name(), "seq1");
        assert_eq!(sequences[0].letters(), "acgtacgtacgt");
        assert_eq!(sequences[1].letters(), "ggcc");
    }

    #[test]
    fn test_read_gzipped_fasta() {
        use flate2::write::GzEncoder;
        use flate2::Compression;

        let mut temp = NamedTempFile::with_suffix(".fa.gz").unwrap();
        {
            let mut encoder = GzEncoder::new(temp.as_file_mut(), Compression::default());
            encoder.write_all(b">prot\nMKVL\n").unwrap();
            encoder.finish().unwrap();
        }

        let sequences = read_fasta_file(temp.path(), Alphabet::Protein).unwrap();
        assert_eq!(sequences[0].letters(), "MKVL");
    }

    #[test]
    fn test_invalid_and_empty_input() {
        let err = read_fasta(&b">seq\nACQT\n"[..], Alphabet::Dna).unwrap_err();
        assert!(matches!(err, SequenceError::InvalidSymbol { symbol: 'Q', .. }));

        let err = read_fasta(&b""[..], Alphabet::Dna).unwrap_err();
        assert!(matches!(err, SequenceError::Empty));
    }
}
