//! End-to-end searches with patterns assembled in code.

mod common;

use biopatml::core::{Alphabet, Sequence, Strand};
use biopatml::matching::{search, search_best, Match, MatchContext, SearchConfig, SearchReport};
use biopatml::patterns::{
    Any, Composition, Logic, LogicOp, Motif, Pattern, RegexPattern, Repeat, RepeatMode, SearchMode,
    Series,
};

fn dna(letters: &str) -> Sequence {
    Sequence::new(Alphabet::Dna, letters).unwrap()
}

fn motif(name: &str, letters: &str, threshold: f64) -> Pattern {
    Pattern::from(Motif::new(name, Alphabet::Dna, letters, threshold).unwrap())
}

/// Repeated calls at one position walk through the composition window
/// lengths and signal the wrap with an increment of 1.
#[test]
fn test_composition_enumerates_window_lengths() {
    common::init_tracing();
    let seq = dna("actgactg");
    let mut pattern = Pattern::from(
        Composition::new("comp", Alphabet::Dna, 1, 7, 1.7, SearchMode::All, 0.0).unwrap(),
    );
    let mut ctx = MatchContext::new();

    let mut letters = Vec::new();
    let mut increments = Vec::new();
    for _ in 0..5 {
        let m = pattern.match_at(&seq, 1, &mut ctx).unwrap();
        letters.push(m.letters().unwrap());
        increments.push(pattern.increment());
    }
    assert_eq!(letters, vec!["a", "act", "actg", "actgac", "actgact"]);
    assert_eq!(increments, vec![0, 0, 0, 0, 1]);
}

/// AND needs every child, OR is satisfied by one of them.
#[test]
fn test_logic_and_or() {
    common::init_tracing();
    let seq = dna("acgaaa");
    let children = || vec![motif("left", "acg", 1.0), motif("right", "ttt", 1.0)];
    let mut ctx = MatchContext::new();

    let mut and = Pattern::from(Logic::new("and", LogicOp::And, 0.0, children()).unwrap());
    assert!(and.match_at(&seq, 1, &mut ctx).is_none());

    let mut or = Pattern::from(Logic::new("or", LogicOp::Or, 0.0, children()).unwrap());
    let m = or.match_at(&seq, 1, &mut ctx).unwrap();
    assert_eq!(m.sub_matches().len(), 1);
    assert_eq!(m.sub_matches()[0].pattern_name(), Some("left"));
    assert!((m.similarity() - 1.0).abs() < f64::EPSILON);
}

/// A repeat inside a series compares against the motif matched earlier in
/// the same attempt.
#[test]
fn test_series_with_direct_repeat() {
    common::init_tracing();
    let seq = dna("actgttactg");
    let mut pattern = Pattern::from(
        Series::new(
            "tandem",
            SearchMode::All,
            1.0,
            vec![
                motif("unit", "actg", 1.0),
                Pattern::from(Any::new("spacer", 2, 2, 1.0).unwrap()),
                Pattern::from(Repeat::new("copy", "unit", RepeatMode::Direct, 1.0).unwrap()),
            ],
        )
        .unwrap(),
    );

    let matches = search(&seq, &mut pattern, &SearchConfig::default());
    assert_eq!(matches.len(), 1);
    let m = &matches[0];
    assert_eq!((m.start(), m.end()), (1, 10));
    assert!((m.similarity() - 1.0).abs() < f64::EPSILON);
    let names: Vec<_> = m.sub_matches().iter().filter_map(Match::pattern_name).collect();
    assert_eq!(names, vec!["unit", "spacer", "copy"]);
    assert_eq!(m.sub_matches()[2].letters().as_deref(), Some("actg"));
}

/// The scan jumps straight to the next regex hit.
#[test]
fn test_regex_search_skips_ahead() {
    common::init_tracing();
    let seq = dna("aaaagattcaagatc");
    let mut pattern = Pattern::from(RegexPattern::new("site", "gat+c", false).unwrap());
    let matches = search(&seq, &mut pattern, &SearchConfig::default());
    let found: Vec<_> = matches
        .iter()
        .map(|m| (m.start(), m.letters().unwrap()))
        .collect();
    assert_eq!(found, vec![(5, "gattc".to_string()), (12, "gatc".to_string())]);
}

/// Range and limit restrict which matches are collected.
#[test]
fn test_search_range_and_limit() {
    common::init_tracing();
    let seq = dna("acgacgacg");
    let mut pattern = motif("box", "acg", 1.0);

    let all = search(&seq, &mut pattern, &SearchConfig::default());
    let starts: Vec<_> = all.iter().map(Match::start).collect();
    assert_eq!(starts, vec![1, 4, 7]);

    let limited = search(&seq, &mut pattern, &SearchConfig::default().with_limit(2));
    assert_eq!(limited.len(), 2);

    let ranged = search(&seq, &mut pattern, &SearchConfig::range(2, 6));
    let starts: Vec<_> = ranged.iter().map(Match::start).collect();
    assert_eq!(starts, vec![4]);
}

/// The best match wins over earlier, weaker ones.
#[test]
fn test_search_best_prefers_exact_hit() {
    common::init_tracing();
    let seq = dna("acgaacgt");
    let mut pattern = motif("box", "acgt", 0.5);
    let best = search_best(&seq, &mut pattern, &SearchConfig::default()).unwrap();
    assert_eq!(best.start(), 5);
    assert!((best.similarity() - 1.0).abs() < f64::EPSILON);

    let mut absent = motif("none", "tttt", 1.0);
    assert!(search_best(&seq, &mut absent, &SearchConfig::default()).is_none());
}

/// Composite calculations over hand-built sub-matches.
#[test]
fn test_match_calculations() {
    let mut parent = Match::default();
    parent.push_sub_match(Match::new(2, 2, Strand::Forward, 1.0).unwrap());
    parent.push_sub_match(Match::new(3, 2, Strand::Forward, 0.5).unwrap());

    parent.calc_start_end();
    assert_eq!((parent.start(), parent.end()), (2, 4));
    parent.calc_similarity();
    assert!((parent.similarity() - 0.75).abs() < 1e-12);

    let mut disjoint = Match::default();
    disjoint.push_sub_match(Match::new(1, 2, Strand::Forward, 1.0).unwrap());
    disjoint.push_sub_match(Match::new(5, 4, Strand::Forward, 1.0).unwrap());
    assert_eq!(disjoint.calc_length(), 6);

    assert!(Match::new(1, 1, Strand::Forward, 1.5).is_err());
    assert!(parent.set_similarity(-0.1).is_err());
}

/// Clones own their sub-matches.
#[test]
fn test_match_clone_is_deep() {
    let mut original = Match::default();
    original.push_sub_match(Match::new(1, 3, Strand::Forward, 1.0).unwrap());

    let mut copy = original.clone();
    copy.sub_matches_mut()[0].set_similarity(0.25).unwrap();
    copy.push_sub_match(Match::new(4, 1, Strand::Forward, 1.0).unwrap());

    assert_eq!(original.sub_matches().len(), 1);
    assert!((original.sub_matches()[0].similarity() - 1.0).abs() < f64::EPSILON);
}

/// Search results serialize to a JSON report with pattern names and letters.
#[test]
fn test_search_report_json() {
    common::init_tracing();
    let seq = Sequence::with_name("chr1", Alphabet::Dna, "ttacgtt").unwrap();
    let mut pattern = motif("box", "acg", 1.0);
    let matches = search(&seq, &mut pattern, &SearchConfig::default());

    let json = SearchReport::new(seq.name(), &matches).to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["sequence"], "chr1");
    assert_eq!(value["matches"][0]["pattern"], "box");
    assert_eq!(value["matches"][0]["start"], 3);
    assert_eq!(value["matches"][0]["letters"], "acg");
    assert_eq!(value["matches"][0]["strand"], "forward");
}
