//! Pull iterator surface
//!
//! A pull iterator starts positioned before the first element: `advance`
//! moves the cursor and reports whether a new element is current, `current`
//! reads it. This is the iteration style the async driver consumes, and the
//! engine behind string matching and splitting.

use regex::Regex;

use super::core::{Sequence, Step};

/// Two-method pull iteration: `advance` then `current`.
///
/// # Panics
///
/// `current` panics if called before the first `advance` or after `advance`
/// has returned false.
pub trait PullIterator {
    type Item;

    fn advance(&mut self) -> bool;

    fn current(&self) -> Self::Item;
}

/// Default pull iterator over any sequence.
///
/// Indexable sequences are cursored through `get` one element at a time;
/// anything else is materialized in one shot on the first `advance`. Pull
/// iteration over an unbounded, unsized pipeline will therefore not
/// terminate; bound it with `take` first.
pub struct Pull<S: Sequence> {
    seq: S,
    pos: usize,
    current: Option<S::Item>,
    buffer: Option<Vec<S::Item>>,
}

impl<S: Sequence> Pull<S>
where
    S::Item: Clone,
{
    pub fn new(seq: S) -> Self {
        Pull {
            seq,
            pos: 0,
            current: None,
            buffer: None,
        }
    }
}

impl<S: Sequence> PullIterator for Pull<S>
where
    S::Item: Clone,
{
    type Item = S::Item;

    fn advance(&mut self) -> bool {
        match self.seq.size() {
            Some(n) => {
                if self.pos < n {
                    self.current = self.seq.get(self.pos);
                    self.pos += 1;
                    self.current.is_some()
                } else {
                    self.current = None;
                    false
                }
            }
            None => {
                let seq = &self.seq;
                let buffer = self.buffer.get_or_insert_with(|| {
                    let mut items = Vec::new();
                    seq.each(&mut |e, _| {
                        items.push(e);
                        Step::Continue
                    });
                    items
                });
                if self.pos < buffer.len() {
                    self.current = Some(buffer[self.pos].clone());
                    self.pos += 1;
                    true
                } else {
                    self.current = None;
                    false
                }
            }
        }
    }

    fn current(&self) -> S::Item {
        self.current
            .clone()
            .expect("advance() must be called before current()")
    }
}

/// Wraps another pull iterator, skipping elements the predicate rejects
pub struct FilterPull<I, F> {
    inner: I,
    predicate: F,
}

impl<I, F> FilterPull<I, F>
where
    I: PullIterator,
    F: Fn(&I::Item) -> bool,
{
    pub fn new(inner: I, predicate: F) -> Self {
        FilterPull { inner, predicate }
    }
}

impl<I, F> PullIterator for FilterPull<I, F>
where
    I: PullIterator,
    F: Fn(&I::Item) -> bool,
{
    type Item = I::Item;

    fn advance(&mut self) -> bool {
        while self.inner.advance() {
            if (self.predicate)(&self.inner.current()) {
                return true;
            }
        }
        false
    }

    fn current(&self) -> I::Item {
        self.inner.current()
    }
}

/// Characters of a string slice
pub struct CharPull<'a> {
    chars: std::str::Chars<'a>,
    current: Option<char>,
}

impl<'a> CharPull<'a> {
    pub fn new(text: &'a str) -> Self {
        CharPull {
            chars: text.chars(),
            current: None,
        }
    }
}

impl<'a> PullIterator for CharPull<'a> {
    type Item = char;

    fn advance(&mut self) -> bool {
        self.current = self.chars.next();
        self.current.is_some()
    }

    fn current(&self) -> char {
        self.current
            .expect("advance() must be called before current()")
    }
}

// Byte index of the next character boundary strictly after `index`;
// one past the end once the end is reached, so cursors terminate.
fn next_char_boundary(text: &str, index: usize) -> usize {
    if index >= text.len() {
        return text.len() + 1;
    }
    let mut next = index + 1;
    while next < text.len() && !text.is_char_boundary(next) {
        next += 1;
    }
    next
}

/// Successive non-overlapping matches of a pattern, scanned with a cursor.
/// The caller's `Regex` is borrowed, never mutated. Zero-width matches
/// advance the cursor one character so iteration always terminates.
pub struct MatchPull<'a> {
    pattern: &'a Regex,
    text: &'a str,
    search: usize,
    current: Option<String>,
}

impl<'a> MatchPull<'a> {
    pub fn new(pattern: &'a Regex, text: &'a str) -> Self {
        MatchPull {
            pattern,
            text,
            search: 0,
            current: None,
        }
    }
}

impl<'a> PullIterator for MatchPull<'a> {
    type Item = String;

    fn advance(&mut self) -> bool {
        if self.search > self.text.len() {
            self.current = None;
            return false;
        }
        match self.pattern.find_at(self.text, self.search) {
            Some(m) => {
                self.current = Some(m.as_str().to_string());
                self.search = if m.start() == m.end() {
                    next_char_boundary(self.text, m.end())
                } else {
                    m.end()
                };
                true
            }
            None => {
                self.current = None;
                self.search = self.text.len() + 1;
                false
            }
        }
    }

    fn current(&self) -> String {
        self.current
            .clone()
            .expect("advance() must be called before current()")
    }
}

/// Segments between pattern matches; after the last match one more segment
/// (possibly empty) is produced before exhaustion
pub struct RegexSplitPull<'a> {
    pattern: &'a Regex,
    text: &'a str,
    left: usize,
    search: usize,
    done: bool,
    current: Option<String>,
}

impl<'a> RegexSplitPull<'a> {
    pub fn new(pattern: &'a Regex, text: &'a str) -> Self {
        RegexSplitPull {
            pattern,
            text,
            left: 0,
            search: 0,
            done: false,
            current: None,
        }
    }
}

impl<'a> PullIterator for RegexSplitPull<'a> {
    type Item = String;

    fn advance(&mut self) -> bool {
        if self.done {
            self.current = None;
            return false;
        }
        let found = loop {
            if self.search > self.text.len() {
                break None;
            }
            match self.pattern.find_at(self.text, self.search) {
                None => break None,
                // zero-width match: skip it rather than split on nothing
                Some(m) if m.start() == m.end() => {
                    self.search = next_char_boundary(self.text, m.end());
                }
                Some(m) => break Some((m.start(), m.end())),
            }
        };
        match found {
            Some((start, end)) => {
                self.current = Some(self.text[self.left..start].to_string());
                self.left = end;
                self.search = end;
                true
            }
            None => {
                self.current = Some(self.text[self.left..].to_string());
                self.done = true;
                true
            }
        }
    }

    fn current(&self) -> String {
        self.current
            .clone()
            .expect("advance() must be called before current()")
    }
}

/// Segments between occurrences of a literal, non-empty delimiter; the final
/// segment (from the last delimiter to the end, possibly empty) is produced
/// before exhaustion
pub struct StrSplitPull<'a> {
    text: &'a str,
    delimiter: &'a str,
    left: usize,
    done: bool,
    current: Option<String>,
}

impl<'a> StrSplitPull<'a> {
    pub fn new(text: &'a str, delimiter: &'a str) -> Self {
        assert!(
            !delimiter.is_empty(),
            "StrSplitPull requires a non-empty delimiter"
        );
        StrSplitPull {
            text,
            delimiter,
            left: 0,
            done: false,
            current: None,
        }
    }
}

impl<'a> PullIterator for StrSplitPull<'a> {
    type Item = String;

    fn advance(&mut self) -> bool {
        if self.done {
            self.current = None;
            return false;
        }
        match self.text[self.left..].find(self.delimiter) {
            Some(offset) => {
                let start = self.left;
                self.current = Some(self.text[start..start + offset].to_string());
                self.left = start + offset + self.delimiter.len();
                true
            }
            None => {
                self.current = Some(self.text[self.left..].to_string());
                self.done = true;
                true
            }
        }
    }

    fn current(&self) -> String {
        self.current
            .clone()
            .expect("advance() must be called before current()")
    }
}

/// Bridge from a pull iterator into `std::iter::Iterator`
pub struct PullStdIter<I> {
    inner: I,
}

impl<I: PullIterator> PullStdIter<I> {
    pub fn new(inner: I) -> Self {
        PullStdIter { inner }
    }
}

impl<I: PullIterator> Iterator for PullStdIter<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        if self.inner.advance() {
            Some(self.inner.current())
        } else {
            None
        }
    }
}
