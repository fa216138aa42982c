//! Definitions and sequences loaded from files, then searched.

mod common;

use std::io::Write;
use std::path::Path;

use biopatml::core::Alphabet;
use biopatml::matching::{search, SearchConfig};
use biopatml::parsing::definition::{DefinitionError, DefinitionList};
use biopatml::parsing::fasta::read_fasta_file;
use biopatml::patterns::PatternKind;
use tempfile::NamedTempFile;

const DEFINITIONS: &str = r#"{
  "definitions": [
    {
      "name": "promoter",
      "pattern": {
        "type": "Series", "name": "promoter", "mode": "BEST",
        "patterns": [
          { "type": "Motif", "name": "minus35", "alphabet": "DNA", "motif": "ttgaca", "threshold": 1.0 },
          { "type": "Gap", "name": "spacer", "minimum": 2, "maximum": 4 },
          { "type": "Motif", "name": "minus10", "alphabet": "DNA", "motif": "tataat", "threshold": 1.0 }
        ]
      }
    },
    {
      "name": "hairpin",
      "definitions": [
        { "name": "arm", "pattern": { "type": "Motif", "name": "arm", "alphabet": "DNA", "motif": "gga", "threshold": 1.0 } }
      ],
      "pattern": {
        "type": "Series", "name": "hairpin", "mode": "ALL", "threshold": 1.0,
        "patterns": [
          { "type": "Use", "name": "stem", "definition": "arm" },
          { "type": "Any", "name": "loop", "minimum": 3, "maximum": 3 },
          { "type": "Repeat", "name": "back", "reference": "stem", "mode": "INVERTED", "threshold": 1.0,
            "pairings": [
              { "original": "a", "repeat": "t" },
              { "original": "g", "repeat": "c" }
            ] }
        ]
      }
    }
  ]
}"#;

const SEQUENCES: &[u8] = b">with_promoter\nccttgacagg\ntataatcc\n>with_hairpin\nAGGAAAATCCA\n>plain\naaaaaaaaaa\n";

fn write_temp(suffix: &str, content: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(suffix).unwrap();
    file.write_all(content).unwrap();
    file.flush().unwrap();
    file
}

fn load(path: &Path) -> DefinitionList {
    DefinitionList::load_from_file(path).unwrap()
}

/// Every definition is searched over every FASTA record.
#[test]
fn test_definitions_against_fasta() {
    common::init_tracing();
    let definitions = write_temp(".json", DEFINITIONS.as_bytes());
    let fasta = write_temp(".fa", SEQUENCES);

    let list = load(definitions.path());
    assert_eq!(list.len(), 2);
    let sequences = read_fasta_file(fasta.path(), Alphabet::Dna).unwrap();
    assert_eq!(sequences.len(), 3);

    let mut promoter = list.pattern("promoter").unwrap();
    let hits: Vec<_> = sequences
        .iter()
        .map(|seq| search(seq, &mut promoter, &SearchConfig::default()))
        .collect();
    assert_eq!(hits[0].len(), 1);
    assert_eq!((hits[0][0].start(), hits[0][0].end()), (3, 16));
    assert_eq!(hits[0][0].sub_matches()[1].length(), 2);
    assert!(hits[1].is_empty());
    assert!(hits[2].is_empty());

    let mut hairpin = list.pattern("hairpin").unwrap();
    let hits = search(&sequences[1], &mut hairpin, &SearchConfig::default());
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].start(), 2);
    assert_eq!(hits[0].letters().as_deref(), Some("ggaaaatcc"));
    assert_eq!(hits[0].sub_matches()[2].pattern_name(), Some("back"));
}

/// Pattern trees built from files keep their structure and names.
#[test]
fn test_built_tree_structure() {
    common::init_tracing();
    let definitions = write_temp(".json", DEFINITIONS.as_bytes());
    let list = load(definitions.path());

    let hairpin = list.pattern("hairpin").unwrap();
    let kinds: Vec<_> = hairpin.self_and_children().iter().map(|p| p.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            PatternKind::Series,
            PatternKind::Use,
            PatternKind::Motif,
            PatternKind::Any,
            PatternKind::Repeat,
        ]
    );
    assert!(list.get("hairpin.arm").is_some());
}

/// A list written back to JSON loads again with the same definitions.
#[test]
fn test_definition_list_rewrite() {
    let list = DefinitionList::from_json(DEFINITIONS).unwrap();
    let rewritten = write_temp(".json", list.to_json().unwrap().as_bytes());
    let reloaded = load(rewritten.path());
    let names: Vec<_> = reloaded.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["promoter", "hairpin"]);
}

/// File and format problems surface as typed errors.
#[test]
fn test_load_errors() {
    let missing = DefinitionList::load_from_file(Path::new("/nonexistent/definitions.json"));
    assert!(matches!(missing, Err(DefinitionError::Io(_))));

    let broken = write_temp(".json", b"{ \"definitions\": [ { \"name\": ");
    assert!(matches!(
        DefinitionList::load_from_file(broken.path()),
        Err(DefinitionError::Json(_))
    ));

    let protein = write_temp(".fa", b">p\nMKVOL\n");
    assert!(read_fasta_file(protein.path(), Alphabet::Protein).is_err());
}
