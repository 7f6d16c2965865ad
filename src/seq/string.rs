//! String specialization: pattern matching and splitting over character
//! sequences
//!
//! Patterns are caller-compiled [`Regex`] values; the regex engine is
//! stateless, so the scanning cursor lives in the iterator and the caller's
//! pattern is never mutated.

use regex::Regex;

use super::core::{Sequence, Step};
use super::iter::{CharPull, MatchPull, PullIterator, RegexSplitPull, StrSplitPull};
use super::sources::StrSeq;

impl StrSeq {
    /// Successive non-overlapping matches of `pattern`; each element is the
    /// matched substring
    pub fn matches(self, pattern: Regex) -> MatchSeq {
        MatchSeq {
            text: self.into_string(),
            pattern,
        }
    }

    /// Substrings between occurrences of `delimiter`, including the final
    /// segment after the last occurrence (which may be empty). An empty
    /// delimiter yields the individual characters.
    pub fn split(self, delimiter: &str) -> SplitSeq {
        SplitSeq {
            text: self.into_string(),
            delimiter: delimiter.to_string(),
        }
    }

    /// Segments between matches of `pattern`, then one final segment. An
    /// empty pattern yields the individual characters.
    pub fn split_re(self, pattern: Regex) -> RegexSplitSeq {
        RegexSplitSeq {
            text: self.into_string(),
            pattern,
        }
    }
}

fn drive(it: &mut dyn PullIterator<Item = String>, f: &mut dyn FnMut(String, usize) -> Step) -> Step {
    let mut i = 0usize;
    while it.advance() {
        if f(it.current(), i).is_stop() {
            return Step::Stop;
        }
        i += 1;
    }
    Step::Continue
}

fn drive_chars(text: &str, f: &mut dyn FnMut(String, usize) -> Step) -> Step {
    let mut it = CharPull::new(text);
    let mut i = 0usize;
    while it.advance() {
        if f(it.current().to_string(), i).is_stop() {
            return Step::Stop;
        }
        i += 1;
    }
    Step::Continue
}

/// Lazy sequence of regex matches over a string
pub struct MatchSeq {
    text: String,
    pattern: Regex,
}

impl Sequence for MatchSeq {
    type Item = String;

    fn each(&self, f: &mut dyn FnMut(String, usize) -> Step) -> Step {
        drive(&mut MatchPull::new(&self.pattern, &self.text), f)
    }
}

/// Lazy sequence of substrings between delimiter occurrences
pub struct SplitSeq {
    text: String,
    delimiter: String,
}

impl Sequence for SplitSeq {
    type Item = String;

    fn each(&self, f: &mut dyn FnMut(String, usize) -> Step) -> Step {
        if self.delimiter.is_empty() {
            return drive_chars(&self.text, f);
        }
        drive(&mut StrSplitPull::new(&self.text, &self.delimiter), f)
    }
}

/// Lazy sequence of segments between regex matches
pub struct RegexSplitSeq {
    text: String,
    pattern: Regex,
}

impl Sequence for RegexSplitSeq {
    type Item = String;

    fn each(&self, f: &mut dyn FnMut(String, usize) -> Step) -> Step {
        if self.pattern.as_str().is_empty() {
            return drive_chars(&self.text, f);
        }
        drive(&mut RegexSplitPull::new(&self.pattern, &self.text), f)
    }
}
