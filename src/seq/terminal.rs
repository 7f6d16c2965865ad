//! Terminal operations: drive `each` and produce a non-sequence result
//!
//! Every method takes `&self`, so a pipeline can be consumed repeatedly;
//! cache-based nodes reuse their buffer across terminals. The
//! short-circuiting terminals stop driving the producer the moment the
//! answer is determined.

use std::cmp::Ordering;
use std::fmt::Display;
use std::ops::Add;

use super::core::{default_order, Sequence, Step};
use super::iter::{Pull, PullStdIter};

/// Extension trait providing terminal operations over any [`Sequence`]
pub trait TerminalExt: Sequence {
    /// Materialize into a fresh vector
    fn to_vec(&self) -> Vec<Self::Item> {
        let mut items = Vec::new();
        self.each(&mut |e, _| {
            items.push(e);
            Step::Continue
        });
        items
    }

    /// Visit every element with its index
    fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(Self::Item, usize),
    {
        self.each(&mut |e, i| {
            f(e, i);
            Step::Continue
        });
    }

    /// Left fold with an explicit seed
    fn fold<B, F>(&self, seed: B, mut f: F) -> B
    where
        F: FnMut(B, Self::Item) -> B,
    {
        let mut acc = Some(seed);
        self.each(&mut |e, _| {
            let current = acc.take().expect("fold accumulator");
            acc = Some(f(current, e));
            Step::Continue
        });
        acc.expect("fold accumulator")
    }

    /// Left fold seeded by the first element; `None` on an empty sequence
    fn reduce<F>(&self, mut f: F) -> Option<Self::Item>
    where
        F: FnMut(Self::Item, Self::Item) -> Self::Item,
    {
        let mut acc: Option<Self::Item> = None;
        self.each(&mut |e, _| {
            acc = Some(match acc.take() {
                None => e,
                Some(current) => f(current, e),
            });
            Step::Continue
        });
        acc
    }

    /// Right fold with an explicit seed
    fn fold_right<B, F>(&self, seed: B, f: F) -> B
    where
        F: FnMut(B, Self::Item) -> B,
    {
        self.to_vec().into_iter().rev().fold(seed, f)
    }

    /// Right fold seeded by the last element; `None` on an empty sequence
    fn reduce_right<F>(&self, f: F) -> Option<Self::Item>
    where
        F: FnMut(Self::Item, Self::Item) -> Self::Item,
    {
        let mut items = self.to_vec();
        let seed = items.pop()?;
        Some(items.into_iter().rev().fold(seed, f))
    }

    /// Smallest element under the default ordering policy
    fn min(&self) -> Option<Self::Item>
    where
        Self::Item: PartialOrd,
    {
        self.reduce(|best, e| {
            if default_order(&e, &best) == Ordering::Less {
                e
            } else {
                best
            }
        })
    }

    /// Largest element under the default ordering policy
    fn max(&self) -> Option<Self::Item>
    where
        Self::Item: PartialOrd,
    {
        self.reduce(|best, e| {
            if default_order(&e, &best) == Ordering::Greater {
                e
            } else {
                best
            }
        })
    }

    /// Sum of all elements, seeded with the zero value
    fn sum(&self) -> Self::Item
    where
        Self::Item: Default + Add<Output = Self::Item>,
    {
        self.fold(Self::Item::default(), |acc, e| acc + e)
    }

    /// Concatenate display representations, `separator` between elements only
    fn join(&self, separator: &str) -> String
    where
        Self::Item: Display,
    {
        let mut joined = String::new();
        self.each(&mut |e, i| {
            if i > 0 {
                joined.push_str(separator);
            }
            joined.push_str(&e.to_string());
            Step::Continue
        });
        joined
    }

    /// First element satisfying the predicate; stops driving on the match
    fn find<F>(&self, mut predicate: F) -> Option<Self::Item>
    where
        F: FnMut(&Self::Item) -> bool,
    {
        let mut found = None;
        self.each(&mut |e, _| {
            if predicate(&e) {
                found = Some(e);
                Step::Stop
            } else {
                Step::Continue
            }
        });
        found
    }

    /// True for every element; vacuously true on empty, stops on first false
    fn all<F>(&self, mut predicate: F) -> bool
    where
        F: FnMut(&Self::Item) -> bool,
    {
        let mut holds = true;
        self.each(&mut |e, _| {
            if predicate(&e) {
                Step::Continue
            } else {
                holds = false;
                Step::Stop
            }
        });
        holds
    }

    /// True for at least one element; false on empty, stops on first true
    fn any<F>(&self, mut predicate: F) -> bool
    where
        F: FnMut(&Self::Item) -> bool,
    {
        let mut found = false;
        self.each(&mut |e, _| {
            if predicate(&e) {
                found = true;
                Step::Stop
            } else {
                Step::Continue
            }
        });
        found
    }

    /// True when the sequence has no elements; visits at most one
    fn is_empty(&self) -> bool {
        let mut has_elements = false;
        self.each(&mut |_, _| {
            has_elements = true;
            Step::Stop
        });
        !has_elements
    }

    /// The first element, or `None` on empty; visits at most one
    fn first(&self) -> Option<Self::Item> {
        let mut first = None;
        self.each(&mut |e, _| {
            first = Some(e);
            Step::Stop
        });
        first
    }

    /// The last element, or `None` on empty. Indexable sequences answer in
    /// O(1); everything else is driven to exhaustion.
    fn last(&self) -> Option<Self::Item> {
        if let Some(n) = self.size() {
            if n == 0 {
                return None;
            }
            return self.get(n - 1);
        }
        let mut last = None;
        self.each(&mut |e, _| {
            last = Some(e);
            Step::Continue
        });
        last
    }

    /// Position of the first element equal to `value`; stops on the match
    fn index_of(&self, value: &Self::Item) -> Option<usize>
    where
        Self::Item: PartialEq,
    {
        let mut found = None;
        self.each(&mut |e, i| {
            if e == *value {
                found = Some(i);
                Step::Stop
            } else {
                Step::Continue
            }
        });
        found
    }

    /// Position of the last element equal to `value`. Scans backwards over
    /// an indexable sequence; otherwise materializes a tail scan.
    fn last_index_of(&self, value: &Self::Item) -> Option<usize>
    where
        Self::Item: PartialEq,
    {
        if let Some(n) = self.size() {
            for i in (0..n).rev() {
                if let Some(e) = self.get(i) {
                    if e == *value {
                        return Some(i);
                    }
                }
            }
            return None;
        }
        let items = self.to_vec();
        for (i, e) in items.iter().enumerate().rev() {
            if *e == *value {
                return Some(i);
            }
        }
        None
    }

    /// Membership by equality; stops on the first match
    fn contains(&self, value: &Self::Item) -> bool
    where
        Self::Item: PartialEq,
    {
        self.index_of(value).is_some()
    }

    /// Insertion point for `value` in an already-sorted indexable sequence,
    /// by binary search under the default ordering policy. `None` when the
    /// sequence is not indexable; unspecified but terminating when the
    /// input is not sorted.
    fn sorted_index(&self, value: &Self::Item) -> Option<usize>
    where
        Self::Item: PartialOrd,
    {
        let n = self.size()?;
        let mut lo = 0usize;
        let mut hi = n;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            match self.get(mid) {
                Some(e) if default_order(&e, value) == Ordering::Less => lo = mid + 1,
                Some(_) => hi = mid,
                None => return None,
            }
        }
        Some(lo)
    }

    /// Pull-style iterator positioned before the first element
    fn pull(&self) -> Pull<&Self>
    where
        Self::Item: Clone,
    {
        Pull::new(self)
    }

    /// Bridge into a standard library iterator
    fn std_iter(&self) -> PullStdIter<Pull<&Self>>
    where
        Self::Item: Clone,
    {
        PullStdIter::new(Pull::new(self))
    }
}

impl<S: Sequence + ?Sized> TerminalExt for S {}
