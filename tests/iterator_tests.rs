use lazy_seq::{
    lazy, CharPull, FilterPull, MatchPull, PullIterator, RegexSplitPull, SequenceExt,
    StrSplitPull, TerminalExt,
};
use regex::Regex;

fn drain<I: PullIterator>(mut it: I) -> Vec<I::Item> {
    let mut out = Vec::new();
    while it.advance() {
        out.push(it.current());
    }
    out
}

#[test]
fn test_pull_over_indexable_sequence() {
    let seq = lazy(vec![1, 2, 3]);
    let mut it = seq.pull();
    assert!(it.advance());
    assert_eq!(it.current(), 1);
    // current is stable until the next advance
    assert_eq!(it.current(), 1);
    assert!(it.advance());
    assert_eq!(it.current(), 2);
    assert!(it.advance());
    assert!(!it.advance());
}

#[test]
fn test_pull_over_unsized_pipeline() {
    let seq = lazy(vec![Some(1), None, Some(3)]).compact();
    let mut it = seq.pull();
    let mut out = Vec::new();
    while it.advance() {
        out.push(it.current());
    }
    assert_eq!(out, vec![1, 3]);
}

#[test]
fn test_pull_exhaustion_is_sticky() {
    let seq = lazy(vec![1]);
    let mut it = seq.pull();
    assert!(it.advance());
    assert!(!it.advance());
    assert!(!it.advance());
}

#[test]
fn test_filter_pull() {
    let seq = lazy(vec![1, 2, 3, 4, 5, 6]);
    let it = FilterPull::new(seq.pull(), |x: &i32| x % 2 == 0);
    assert_eq!(drain(it), vec![2, 4, 6]);
}

#[test]
fn test_filter_pull_rejecting_everything() {
    let seq = lazy(vec![1, 3, 5]);
    let mut it = FilterPull::new(seq.pull(), |x: &i32| x % 2 == 0);
    assert!(!it.advance());
}

#[test]
fn test_char_pull() {
    assert_eq!(drain(CharPull::new("héllo")), vec!['h', 'é', 'l', 'l', 'o']);
    let mut empty = CharPull::new("");
    assert!(!empty.advance());
}

#[test]
fn test_match_pull() {
    let re = Regex::new(r"\d+").unwrap();
    assert_eq!(drain(MatchPull::new(&re, "a1 b22 c333")), vec!["1", "22", "333"]);
}

#[test]
fn test_match_pull_without_matches() {
    let re = Regex::new(r"\d").unwrap();
    let mut it = MatchPull::new(&re, "abc");
    assert!(!it.advance());
}

#[test]
fn test_match_pull_zero_width_matches_terminate() {
    let re = Regex::new("a*").unwrap();
    let found = drain(MatchPull::new(&re, "bb"));
    assert_eq!(found, vec!["", "", ""]);
}

#[test]
fn test_regex_split_pull_emits_final_segment() {
    let re = Regex::new(r"\d+").unwrap();
    assert_eq!(drain(RegexSplitPull::new(&re, "a1b22c")), vec!["a", "b", "c"]);
    assert_eq!(drain(RegexSplitPull::new(&re, "a1")), vec!["a", ""]);
    assert_eq!(drain(RegexSplitPull::new(&re, "")), vec![""]);
}

#[test]
fn test_str_split_pull() {
    assert_eq!(
        drain(StrSplitPull::new("hello world", " ")),
        vec!["hello", "world"]
    );
    assert_eq!(drain(StrSplitPull::new("a,b,", ",")), vec!["a", "b", ""]);
    assert_eq!(drain(StrSplitPull::new("", ",")), vec![""]);
}

#[test]
fn test_str_split_pull_reports_exhaustion_after_final_segment() {
    let mut it = StrSplitPull::new("x", ",");
    assert!(it.advance());
    assert_eq!(it.current(), "x");
    assert!(!it.advance());
    assert!(!it.advance());
}

#[test]
fn test_std_iterator_bridge() {
    let seq = lazy(vec![1, 2, 3]).map(|x, _| x * 2);
    let collected: Vec<i32> = seq.std_iter().collect();
    assert_eq!(collected, vec![2, 4, 6]);
}

#[test]
fn test_std_iterator_bridge_composes_with_std_adapters() {
    let seq = lazy(vec![1, 2, 3, 4]);
    let total: i32 = seq.std_iter().filter(|x| x % 2 == 0).sum();
    assert_eq!(total, 6);
}
