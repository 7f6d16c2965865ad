use lazy_seq::{lazy, Sequence, SequenceExt, StrSeq, TerminalExt};
use regex::Regex;

#[test]
fn test_string_wrapper_is_a_char_sequence() {
    let seq = lazy("héllo");
    assert_eq!(seq.size(), Some(5));
    assert_eq!(seq.get(1), Some('é'));
    assert_eq!(seq.to_vec(), vec!['h', 'é', 'l', 'l', 'o']);
}

#[test]
fn test_char_at() {
    let seq = StrSeq::new("abc");
    assert_eq!(seq.char_at(0), Some('a'));
    assert_eq!(seq.char_at(3), None);
}

#[test]
fn test_char_sequences_compose_with_core_ops() {
    let filtered: String = lazy("hello world")
        .filter(|c, _| c.is_alphabetic())
        .to_vec()
        .into_iter()
        .collect();
    assert_eq!(filtered, "helloworld");
}

#[test]
fn test_split_on_literal_delimiter() {
    let words = lazy("hello world").split(" ").to_vec();
    assert_eq!(words, vec!["hello", "world"]);
}

#[test]
fn test_split_keeps_empty_segments() {
    assert_eq!(lazy("a,,b,").split(",").to_vec(), vec!["a", "", "b", ""]);
}

#[test]
fn test_split_with_empty_delimiter_yields_characters() {
    assert_eq!(lazy("abc").split("").to_vec(), vec!["a", "b", "c"]);
}

#[test]
fn test_split_is_lazy_under_stop() {
    let seq = lazy("a b c d").split(" ");
    let first_two: Vec<String> = seq.take(2).to_vec();
    assert_eq!(first_two, vec!["a", "b"]);
}

#[test]
fn test_split_re() {
    let re = Regex::new(r"\d+").unwrap();
    let segments = lazy("a1b22c").split_re(re).to_vec();
    assert_eq!(segments, vec!["a", "b", "c"]);
}

#[test]
fn test_split_re_emits_final_empty_segment() {
    let re = Regex::new(r"\d+").unwrap();
    assert_eq!(lazy("a1").split_re(re).to_vec(), vec!["a", ""]);
}

#[test]
fn test_split_re_with_empty_pattern_yields_characters() {
    let re = Regex::new("").unwrap();
    assert_eq!(lazy("ab").split_re(re).to_vec(), vec!["a", "b"]);
}

#[test]
fn test_matches() {
    let re = Regex::new(r"[a-z]\d").unwrap();
    let found = lazy("a1 b2 c3").matches(re).to_vec();
    assert_eq!(found, vec!["a1", "b2", "c3"]);
}

#[test]
fn test_matches_leaves_the_callers_pattern_usable() {
    let re = Regex::new(r"\d+").unwrap();
    let first = lazy("1 22 333").matches(re.clone()).to_vec();
    let second = lazy("1 22 333").matches(re).to_vec();
    assert_eq!(first, second);
    assert_eq!(first, vec!["1", "22", "333"]);
}

#[test]
fn test_match_sequences_short_circuit() {
    let re = Regex::new(r"\d").unwrap();
    let first = lazy("1 2 3 4").matches(re).first();
    assert_eq!(first, Some("1".to_string()));
}

#[test]
fn test_join_on_char_sequence() {
    assert_eq!(lazy("abc").join(""), "abc");
    assert_eq!(lazy("abc").join("-"), "a-b-c");
}
