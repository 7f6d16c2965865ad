//! Core sequence protocol and streaming combinators
//!
//! A [`Sequence`] produces zero or more consecutive elements through
//! visitor-driven iteration. Pipelines are trees of combinator nodes that
//! reference their parent and do no work until a terminal drives `each`.

use std::cmp::Ordering;
use std::hash::Hash;
use std::sync::OnceLock;
use std::time::Duration;

use super::async_seq::AsyncSequence;
use super::cached::{
    Counted, FlattenDeep, Grouped, Initial, Intersection, Memoized, Nested, Reversed, Shuffled,
    Sorted, Unique, Without,
};
use super::sources::ArraySeq;

/// Visitor verdict: keep iterating or stop now.
///
/// Returning [`Step::Stop`] from a visitor is the universal cancellation
/// mechanism; every combinator propagates it through to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Stop,
}

impl Step {
    pub fn is_stop(self) -> bool {
        matches!(self, Step::Stop)
    }
}

/// The comparison policy used by `sort`, `min`, `max` and `sorted_index`:
/// equal values compare `Equal`, otherwise `a > b` is `Greater`, anything
/// else (including incomparable values) is `Less`.
pub fn default_order<T: PartialOrd>(a: &T, b: &T) -> Ordering {
    if a == b {
        Ordering::Equal
    } else if a > b {
        Ordering::Greater
    } else {
        Ordering::Less
    }
}

/// Abstract producer of elements with short-circuit iteration.
///
/// `each` invokes the visitor with `(element, index)` in sequence order and
/// must return [`Step::Stop`] if and only if the visitor requested the stop;
/// combinators rely on that convention to tell a caller-initiated stop from
/// natural exhaustion. Iteration is re-entrant: two successive `each` calls
/// on the same pipeline visit the same elements in the same order.
///
/// `size` and `get` form the indexability capability: `size` returns
/// `Some(n)` when the length is known, and then `get(i)` returns `Some` for
/// every `i < n`. Cache-based nodes may materialize on the first `size` or
/// `get` call; plain streaming nodes leave the defaults in place. `get` may
/// also work without a known size (unbounded generators).
pub trait Sequence {
    type Item;

    fn each(&self, f: &mut dyn FnMut(Self::Item, usize) -> Step) -> Step;

    fn size(&self) -> Option<usize> {
        None
    }

    fn get(&self, _index: usize) -> Option<Self::Item> {
        None
    }
}

impl<S: Sequence + ?Sized> Sequence for &S {
    type Item = S::Item;

    fn each(&self, f: &mut dyn FnMut(Self::Item, usize) -> Step) -> Step {
        (**self).each(f)
    }

    fn size(&self) -> Option<usize> {
        (**self).size()
    }

    fn get(&self, index: usize) -> Option<Self::Item> {
        (**self).get(index)
    }
}

impl<S: Sequence + ?Sized> Sequence for Box<S> {
    type Item = S::Item;

    fn each(&self, f: &mut dyn FnMut(Self::Item, usize) -> Step) -> Step {
        (**self).each(f)
    }

    fn size(&self) -> Option<usize> {
        (**self).size()
    }

    fn get(&self, index: usize) -> Option<Self::Item> {
        (**self).get(index)
    }
}

/// A boxed, heap-allocated sequence with its element type erased to `T`
pub type BoxSequence<T> = Box<dyn Sequence<Item = T> + Send + Sync>;

/// Extension trait providing the non-terminal combinators.
///
/// Every method is O(1): it wraps `self` in a new node and touches no
/// elements. Work happens when a terminal drives the outermost `each`.
pub trait SequenceExt: Sequence + Sized {
    /// Map elements with `(element, index)` -> new element
    fn map<U, F>(self, mapper: F) -> Mapped<Self, F>
    where
        F: Fn(Self::Item, usize) -> U,
    {
        Mapped { parent: self, mapper }
    }

    /// Keep elements where the predicate is true
    fn filter<F>(self, predicate: F) -> Filtered<Self, F>
    where
        F: Fn(&Self::Item, usize) -> bool,
    {
        Filtered {
            parent: self,
            predicate,
            cache: OnceLock::new(),
        }
    }

    /// Keep elements where the predicate is false
    fn reject<F>(self, predicate: F) -> Filtered<Self, impl Fn(&Self::Item, usize) -> bool>
    where
        F: Fn(&Self::Item, usize) -> bool,
    {
        self.filter(move |e, i| !predicate(e, i))
    }

    /// Unwrap the `Some` payloads of an `Option` sequence, dropping `None`s
    fn compact<T>(self) -> Compact<Self>
    where
        Self: Sequence<Item = Option<T>>,
    {
        Compact { parent: self }
    }

    /// Limit to the first `count` elements
    fn take(self, count: usize) -> Take<Self> {
        Take {
            parent: self,
            count,
        }
    }

    /// Drop the first `count` elements
    fn skip(self, count: usize) -> Skip<Self> {
        Skip {
            parent: self,
            count,
        }
    }

    /// All elements of `self`, then all elements of `other`
    fn concat<Q>(self, other: Q) -> Concat<Self, Q>
    where
        Q: Sequence<Item = Self::Item>,
    {
        Concat {
            first: self,
            second: other,
        }
    }

    /// Pair each element with the same-index element of `other`; stops when
    /// `self` ends, and positions past the end of `other` pair with `None`
    fn zip<U>(self, other: Vec<U>) -> Zipped<Self, U>
    where
        U: Clone,
    {
        Zipped {
            parent: self,
            other,
        }
    }

    /// Tuple each element with the same-index elements of every sidecar
    /// array; the parent's element comes first in each tuple
    fn zip_all(self, others: Vec<Vec<Self::Item>>) -> ZipAll<Self>
    where
        Self::Item: Clone,
    {
        ZipAll {
            parent: self,
            others,
        }
    }

    /// Inline one level of nesting
    fn flatten<T>(self) -> FlattenOne<Self>
    where
        Self: Sequence<Item = Vec<T>>,
    {
        FlattenOne { parent: self }
    }

    /// Recursively inline a [`Nested`] value tree
    fn flatten_deep<T>(self) -> FlattenDeep<Self>
    where
        Self: Sequence<Item = Nested<T>>,
    {
        FlattenDeep::new(self)
    }

    /// Materialize-all identity node; the universal fallback for operations
    /// that need a known length. Indexable parents pass straight through.
    fn memoize(self) -> Memoized<Self>
    where
        Self::Item: Clone,
    {
        Memoized::new(self)
    }

    /// Elements in reverse order. Indexable parents are walked backwards
    /// with no cache; anything else is materialized on first use.
    fn reverse(self) -> Reversed<Self>
    where
        Self::Item: Clone,
    {
        Reversed::new(self)
    }

    /// Sort with the default ordering policy (see [`default_order`])
    fn sort(self) -> Sorted<Self, fn(&Self::Item, &Self::Item) -> Ordering>
    where
        Self::Item: PartialOrd + Clone,
    {
        let compare: fn(&Self::Item, &Self::Item) -> Ordering = default_order;
        Sorted::new(self, compare)
    }

    /// Sort with an explicit comparator
    fn sort_by<F>(self, compare: F) -> Sorted<Self, F>
    where
        F: Fn(&Self::Item, &Self::Item) -> Ordering,
        Self::Item: Clone,
    {
        Sorted::new(self, compare)
    }

    /// Sort by a key function; the key is evaluated once per side at
    /// comparison time
    fn sort_by_key<K, F>(self, key: F) -> Sorted<Self, impl Fn(&Self::Item, &Self::Item) -> Ordering>
    where
        K: PartialOrd,
        F: Fn(&Self::Item) -> K,
        Self::Item: Clone,
    {
        Sorted::new(self, move |a: &Self::Item, b: &Self::Item| {
            default_order(&key(a), &key(b))
        })
    }

    /// A uniformly random permutation, drawn once per node
    fn shuffle(self) -> Shuffled<Self>
    where
        Self::Item: Clone,
    {
        Shuffled::new(self)
    }

    /// First occurrence of each distinct element, in encounter order
    fn uniq(self) -> Unique<Self>
    where
        Self::Item: Eq + Hash + Clone,
    {
        Unique::new(self)
    }

    /// Group elements by key, emitting `(key, group)` in first-seen key order
    fn group_by<K, F>(self, key: F) -> Grouped<Self, K, F>
    where
        K: Eq + Hash + Clone,
        F: Fn(&Self::Item) -> K,
    {
        Grouped::new(self, key)
    }

    /// Count elements by key, emitting `(key, count)` in first-seen key order
    fn count_by<K, F>(self, key: F) -> Counted<Self, K, F>
    where
        K: Eq + Hash + Clone,
        F: Fn(&Self::Item) -> K,
    {
        Counted::new(self, key)
    }

    /// Set difference: drop every element that appears in `values`
    fn without(self, values: Vec<Self::Item>) -> Without<Self>
    where
        Self::Item: Eq + Hash + Clone,
    {
        Without::new(self, values)
    }

    /// Elements present in every one of the argument arrays, deduplicated,
    /// in parent order
    fn intersection(self, others: Vec<Vec<Self::Item>>) -> Intersection<Self>
    where
        Self::Item: Eq + Hash + Clone,
    {
        Intersection::new(self, others)
    }

    /// Concatenate, then deduplicate
    fn union(self, other: Vec<Self::Item>) -> Unique<Concat<Self, ArraySeq<Self::Item>>>
    where
        Self::Item: Eq + Hash + Clone,
    {
        self.concat(ArraySeq::new(other)).uniq()
    }

    /// All but the last `count` elements. Parents with an unknown length are
    /// materialized on first use.
    fn initial(self, count: usize) -> Initial<Self>
    where
        Self::Item: Clone,
    {
        Initial::new(self, count)
    }

    /// The last `count` elements, by double reversal
    fn last_n(self, count: usize) -> Reversed<Take<Reversed<Self>>>
    where
        Self::Item: Clone,
    {
        self.reverse().take(count).reverse()
    }

    /// Re-express iteration through the async driver: visitors run from
    /// scheduled tasks, paced by `interval` when present. The wrapper is not
    /// itself a [`Sequence`], so wrapping twice does not compile.
    fn to_async(self, interval: Option<Duration>) -> AsyncSequence<Self>
    where
        Self::Item: Clone,
    {
        AsyncSequence::new(self, interval)
    }
}

impl<S: Sequence + Sized> SequenceExt for S {}

// ================================
// Streaming combinator nodes
// ================================

/// Lazily mapped sequence; propagates indexability
pub struct Mapped<P, F> {
    parent: P,
    mapper: F,
}

impl<P, F, U> Sequence for Mapped<P, F>
where
    P: Sequence,
    F: Fn(P::Item, usize) -> U,
{
    type Item = U;

    fn each(&self, f: &mut dyn FnMut(U, usize) -> Step) -> Step {
        self.parent.each(&mut |e, i| f((self.mapper)(e, i), i))
    }

    fn size(&self) -> Option<usize> {
        self.parent.size()
    }

    fn get(&self, index: usize) -> Option<U> {
        self.parent.get(index).map(|e| (self.mapper)(e, index))
    }
}

/// Lazily filtered sequence.
///
/// `each` streams straight off the parent; random access materializes an
/// internal cache on the first `size`/`get` call and serves from it after.
pub struct Filtered<P: Sequence, F> {
    parent: P,
    predicate: F,
    cache: OnceLock<Vec<P::Item>>,
}

impl<P, F> Filtered<P, F>
where
    P: Sequence,
    F: Fn(&P::Item, usize) -> bool,
{
    fn materialized(&self) -> &Vec<P::Item> {
        self.cache.get_or_init(|| {
            let mut kept = Vec::new();
            self.parent.each(&mut |e, i| {
                if (self.predicate)(&e, i) {
                    kept.push(e);
                }
                Step::Continue
            });
            kept
        })
    }
}

impl<P, F> Sequence for Filtered<P, F>
where
    P: Sequence,
    P::Item: Clone,
    F: Fn(&P::Item, usize) -> bool,
{
    type Item = P::Item;

    fn each(&self, f: &mut dyn FnMut(Self::Item, usize) -> Step) -> Step {
        let mut out = 0usize;
        self.parent.each(&mut |e, i| {
            if (self.predicate)(&e, i) {
                let step = f(e, out);
                out += 1;
                step
            } else {
                Step::Continue
            }
        })
    }

    fn size(&self) -> Option<usize> {
        Some(self.materialized().len())
    }

    fn get(&self, index: usize) -> Option<Self::Item> {
        self.materialized().get(index).cloned()
    }
}

/// The `Some` payloads of an `Option` sequence
pub struct Compact<P> {
    parent: P,
}

impl<T, P> Sequence for Compact<P>
where
    P: Sequence<Item = Option<T>>,
{
    type Item = T;

    fn each(&self, f: &mut dyn FnMut(T, usize) -> Step) -> Step {
        let mut out = 0usize;
        self.parent.each(&mut |e, _| match e {
            Some(value) => {
                let step = f(value, out);
                out += 1;
                step
            }
            None => Step::Continue,
        })
    }
}

/// First `count` elements of the parent
pub struct Take<P> {
    parent: P,
    count: usize,
}

impl<P: Sequence> Sequence for Take<P> {
    type Item = P::Item;

    fn each(&self, f: &mut dyn FnMut(Self::Item, usize) -> Step) -> Step {
        if self.count == 0 {
            return Step::Continue;
        }
        let mut taken = 0usize;
        let mut stopped_by_visitor = false;
        self.parent.each(&mut |e, _| {
            let step = f(e, taken);
            taken += 1;
            if step.is_stop() {
                stopped_by_visitor = true;
                return Step::Stop;
            }
            if taken >= self.count {
                return Step::Stop;
            }
            Step::Continue
        });
        if stopped_by_visitor {
            Step::Stop
        } else {
            Step::Continue
        }
    }

    fn size(&self) -> Option<usize> {
        self.parent.size().map(|n| n.min(self.count))
    }

    fn get(&self, index: usize) -> Option<Self::Item> {
        if index < self.count {
            self.parent.get(index)
        } else {
            None
        }
    }
}

/// Everything after the first `count` elements
pub struct Skip<P> {
    parent: P,
    count: usize,
}

impl<P: Sequence> Sequence for Skip<P> {
    type Item = P::Item;

    fn each(&self, f: &mut dyn FnMut(Self::Item, usize) -> Step) -> Step {
        let mut seen = 0usize;
        let mut out = 0usize;
        self.parent.each(&mut |e, _| {
            if seen < self.count {
                seen += 1;
                return Step::Continue;
            }
            let step = f(e, out);
            out += 1;
            step
        })
    }

    fn size(&self) -> Option<usize> {
        self.parent.size().map(|n| n.saturating_sub(self.count))
    }

    fn get(&self, index: usize) -> Option<Self::Item> {
        self.parent.get(self.count + index)
    }
}

/// `first` followed by `second`
pub struct Concat<A, B> {
    first: A,
    second: B,
}

impl<A, B> Sequence for Concat<A, B>
where
    A: Sequence,
    B: Sequence<Item = A::Item>,
{
    type Item = A::Item;

    fn each(&self, f: &mut dyn FnMut(Self::Item, usize) -> Step) -> Step {
        let mut out = 0usize;
        let step = self.first.each(&mut |e, _| {
            let step = f(e, out);
            out += 1;
            step
        });
        if step.is_stop() {
            return Step::Stop;
        }
        self.second.each(&mut |e, _| {
            let step = f(e, out);
            out += 1;
            step
        })
    }

    fn size(&self) -> Option<usize> {
        match (self.first.size(), self.second.size()) {
            (Some(a), Some(b)) => Some(a + b),
            _ => None,
        }
    }

    fn get(&self, index: usize) -> Option<Self::Item> {
        let split = self.first.size()?;
        if index < split {
            self.first.get(index)
        } else {
            self.second.get(index - split)
        }
    }
}

/// Pairs of parent elements and same-index sidecar elements
pub struct Zipped<P, U> {
    parent: P,
    other: Vec<U>,
}

impl<P, U> Sequence for Zipped<P, U>
where
    P: Sequence,
    U: Clone,
{
    type Item = (P::Item, Option<U>);

    fn each(&self, f: &mut dyn FnMut(Self::Item, usize) -> Step) -> Step {
        self.parent
            .each(&mut |e, i| f((e, self.other.get(i).cloned()), i))
    }

    fn size(&self) -> Option<usize> {
        self.parent.size()
    }

    fn get(&self, index: usize) -> Option<Self::Item> {
        self.parent
            .get(index)
            .map(|e| (e, self.other.get(index).cloned()))
    }
}

/// Tuples of the parent element and the same-index element of every sidecar
pub struct ZipAll<P: Sequence> {
    parent: P,
    others: Vec<Vec<P::Item>>,
}

impl<P> Sequence for ZipAll<P>
where
    P: Sequence,
    P::Item: Clone,
{
    type Item = Vec<Option<P::Item>>;

    fn each(&self, f: &mut dyn FnMut(Self::Item, usize) -> Step) -> Step {
        self.parent.each(&mut |e, i| {
            let mut tuple = Vec::with_capacity(1 + self.others.len());
            tuple.push(Some(e));
            for sidecar in &self.others {
                tuple.push(sidecar.get(i).cloned());
            }
            f(tuple, i)
        })
    }

    fn size(&self) -> Option<usize> {
        self.parent.size()
    }

    fn get(&self, index: usize) -> Option<Self::Item> {
        let e = self.parent.get(index)?;
        let mut tuple = Vec::with_capacity(1 + self.others.len());
        tuple.push(Some(e));
        for sidecar in &self.others {
            tuple.push(sidecar.get(index).cloned());
        }
        Some(tuple)
    }
}

/// One level of nesting inlined
pub struct FlattenOne<P> {
    parent: P,
}

impl<T, P> Sequence for FlattenOne<P>
where
    P: Sequence<Item = Vec<T>>,
{
    type Item = T;

    fn each(&self, f: &mut dyn FnMut(T, usize) -> Step) -> Step {
        let mut out = 0usize;
        self.parent.each(&mut |chunk, _| {
            for value in chunk {
                let step = f(value, out);
                out += 1;
                if step.is_stop() {
                    return Step::Stop;
                }
            }
            Step::Continue
        })
    }
}
