//! Cache-based combinators: sort, shuffle, reverse, group, count, unique,
//! deep flatten, set difference, intersection, memoize
//!
//! These nodes cannot stream off their parent; they materialize into an
//! internal buffer on first use and serve `each`/`size`/`get` from it. The
//! buffer lives in a `OnceLock`, so population is idempotent and concurrent
//! iterations observe the same materialization. Caches are never exposed.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::sync::OnceLock;

use rand::{thread_rng, Rng};

use super::core::{Sequence, Step};

fn collect_all<S: Sequence + ?Sized>(seq: &S) -> Vec<S::Item> {
    let mut items = Vec::new();
    seq.each(&mut |e, _| {
        items.push(e);
        Step::Continue
    });
    items
}

fn serve<T: Clone>(items: &[T], f: &mut dyn FnMut(T, usize) -> Step) -> Step {
    for (i, e) in items.iter().enumerate() {
        if f(e.clone(), i).is_stop() {
            return Step::Stop;
        }
    }
    Step::Continue
}

// ================================
// Memoized
// ================================

/// Materialize-all identity node.
///
/// Parents that already expose `size`/`get` pass straight through untouched;
/// everything else is buffered on first use. This is the fallback for
/// operations that need a known length over an arbitrary pipeline.
pub struct Memoized<P: Sequence> {
    parent: P,
    cache: OnceLock<Vec<P::Item>>,
}

impl<P: Sequence> Memoized<P> {
    pub(crate) fn new(parent: P) -> Self {
        Memoized {
            parent,
            cache: OnceLock::new(),
        }
    }

    fn materialized(&self) -> &Vec<P::Item> {
        self.cache.get_or_init(|| collect_all(&self.parent))
    }
}

impl<P> Sequence for Memoized<P>
where
    P: Sequence,
    P::Item: Clone,
{
    type Item = P::Item;

    fn each(&self, f: &mut dyn FnMut(Self::Item, usize) -> Step) -> Step {
        if self.parent.size().is_some() {
            return self.parent.each(f);
        }
        serve(self.materialized(), f)
    }

    fn size(&self) -> Option<usize> {
        self.parent
            .size()
            .or_else(|| Some(self.materialized().len()))
    }

    fn get(&self, index: usize) -> Option<Self::Item> {
        if self.parent.size().is_some() {
            self.parent.get(index)
        } else {
            self.materialized().get(index).cloned()
        }
    }
}

// ================================
// Reversed
// ================================

/// Elements in reverse order.
///
/// An indexable parent is walked backwards through `get` with no cache;
/// a non-indexable parent is materialized once.
pub struct Reversed<P: Sequence> {
    parent: P,
    cache: OnceLock<Vec<P::Item>>,
}

impl<P: Sequence> Reversed<P> {
    pub(crate) fn new(parent: P) -> Self {
        Reversed {
            parent,
            cache: OnceLock::new(),
        }
    }

    fn materialized(&self) -> &Vec<P::Item> {
        self.cache.get_or_init(|| collect_all(&self.parent))
    }
}

impl<P> Sequence for Reversed<P>
where
    P: Sequence,
    P::Item: Clone,
{
    type Item = P::Item;

    fn each(&self, f: &mut dyn FnMut(Self::Item, usize) -> Step) -> Step {
        match self.parent.size() {
            Some(n) => {
                for (out, i) in (0..n).rev().enumerate() {
                    match self.parent.get(i) {
                        Some(e) => {
                            if f(e, out).is_stop() {
                                return Step::Stop;
                            }
                        }
                        None => return Step::Continue,
                    }
                }
                Step::Continue
            }
            None => {
                let items = self.materialized();
                for (out, e) in items.iter().rev().enumerate() {
                    if f(e.clone(), out).is_stop() {
                        return Step::Stop;
                    }
                }
                Step::Continue
            }
        }
    }

    fn size(&self) -> Option<usize> {
        self.parent
            .size()
            .or_else(|| Some(self.materialized().len()))
    }

    fn get(&self, index: usize) -> Option<Self::Item> {
        match self.parent.size() {
            Some(n) => {
                if index < n {
                    self.parent.get(n - 1 - index)
                } else {
                    None
                }
            }
            None => {
                let items = self.materialized();
                if index < items.len() {
                    items.get(items.len() - 1 - index).cloned()
                } else {
                    None
                }
            }
        }
    }
}

// ================================
// Sorted
// ================================

/// Totally ordered view of the parent, materialized on first use.
///
/// The sort is stable as implemented, but stability is not part of the
/// contract and callers must not rely on it.
pub struct Sorted<P: Sequence, F> {
    parent: P,
    compare: F,
    cache: OnceLock<Vec<P::Item>>,
}

impl<P, F> Sorted<P, F>
where
    P: Sequence,
    F: Fn(&P::Item, &P::Item) -> std::cmp::Ordering,
{
    pub(crate) fn new(parent: P, compare: F) -> Self {
        Sorted {
            parent,
            compare,
            cache: OnceLock::new(),
        }
    }

    fn materialized(&self) -> &Vec<P::Item> {
        self.cache.get_or_init(|| {
            let mut items = collect_all(&self.parent);
            items.sort_by(|a, b| (self.compare)(a, b));
            items
        })
    }
}

impl<P, F> Sequence for Sorted<P, F>
where
    P: Sequence,
    P::Item: Clone,
    F: Fn(&P::Item, &P::Item) -> std::cmp::Ordering,
{
    type Item = P::Item;

    fn each(&self, f: &mut dyn FnMut(Self::Item, usize) -> Step) -> Step {
        serve(self.materialized(), f)
    }

    fn size(&self) -> Option<usize> {
        Some(self.materialized().len())
    }

    fn get(&self, index: usize) -> Option<Self::Item> {
        self.materialized().get(index).cloned()
    }
}

// ================================
// Shuffled
// ================================

/// A uniform random permutation of the parent (Fisher–Yates).
///
/// The permutation is drawn once, on first use; repeated iterations of the
/// same node observe the same order.
pub struct Shuffled<P: Sequence> {
    parent: P,
    cache: OnceLock<Vec<P::Item>>,
}

impl<P: Sequence> Shuffled<P> {
    pub(crate) fn new(parent: P) -> Self {
        Shuffled {
            parent,
            cache: OnceLock::new(),
        }
    }

    fn materialized(&self) -> &Vec<P::Item> {
        self.cache.get_or_init(|| {
            let mut items = collect_all(&self.parent);
            let mut rng = thread_rng();
            for i in (1..items.len()).rev() {
                let j = rng.gen_range(0..=i);
                items.swap(i, j);
            }
            items
        })
    }
}

impl<P> Sequence for Shuffled<P>
where
    P: Sequence,
    P::Item: Clone,
{
    type Item = P::Item;

    fn each(&self, f: &mut dyn FnMut(Self::Item, usize) -> Step) -> Step {
        serve(self.materialized(), f)
    }

    fn size(&self) -> Option<usize> {
        Some(self.materialized().len())
    }

    fn get(&self, index: usize) -> Option<Self::Item> {
        self.materialized().get(index).cloned()
    }
}

// ================================
// Unique
// ================================

const LIST_CACHE_THRESHOLD: usize = 40;
const SET_CACHE_THRESHOLD: usize = 800;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UniqStrategy {
    /// No working set: re-scan the already-visited prefix of an indexable
    /// parent for each element. Wins below ~40 elements.
    Scan,
    /// Vector of emitted distinct values, linear membership checks.
    List,
    /// Hash set of emitted values; also the fallback for unknown sizes.
    Set,
}

/// First occurrence of each distinct element, in encounter order.
///
/// The deduplication strategy is picked once from the parent's size and
/// held for the lifetime of the node; all three strategies produce
/// identical output.
pub struct Unique<P: Sequence> {
    parent: P,
    strategy: OnceLock<UniqStrategy>,
    cache: OnceLock<Vec<P::Item>>,
}

impl<P> Unique<P>
where
    P: Sequence,
    P::Item: Eq + Hash + Clone,
{
    pub(crate) fn new(parent: P) -> Self {
        Unique {
            parent,
            strategy: OnceLock::new(),
            cache: OnceLock::new(),
        }
    }

    fn strategy(&self) -> UniqStrategy {
        *self.strategy.get_or_init(|| match self.parent.size() {
            Some(n) if n < LIST_CACHE_THRESHOLD => UniqStrategy::Scan,
            Some(n) if n < SET_CACHE_THRESHOLD => UniqStrategy::List,
            _ => UniqStrategy::Set,
        })
    }

    fn materialized(&self) -> &Vec<P::Item> {
        self.cache.get_or_init(|| {
            let mut items = Vec::new();
            self.stream(&mut |e, _| {
                items.push(e);
                Step::Continue
            });
            items
        })
    }

    fn stream(&self, f: &mut dyn FnMut(P::Item, usize) -> Step) -> Step {
        match self.strategy() {
            UniqStrategy::Scan => {
                let mut out = 0usize;
                self.parent.each(&mut |e, i| {
                    for j in 0..i {
                        if self.parent.get(j).map_or(false, |prev| prev == e) {
                            return Step::Continue;
                        }
                    }
                    let step = f(e, out);
                    out += 1;
                    step
                })
            }
            UniqStrategy::List => {
                let mut seen: Vec<P::Item> = Vec::new();
                let mut out = 0usize;
                self.parent.each(&mut |e, _| {
                    if seen.contains(&e) {
                        return Step::Continue;
                    }
                    seen.push(e.clone());
                    let step = f(e, out);
                    out += 1;
                    step
                })
            }
            UniqStrategy::Set => {
                let mut seen: HashSet<P::Item> = HashSet::new();
                let mut out = 0usize;
                self.parent.each(&mut |e, _| {
                    if !seen.insert(e.clone()) {
                        return Step::Continue;
                    }
                    let step = f(e, out);
                    out += 1;
                    step
                })
            }
        }
    }
}

impl<P> Sequence for Unique<P>
where
    P: Sequence,
    P::Item: Eq + Hash + Clone,
{
    type Item = P::Item;

    fn each(&self, f: &mut dyn FnMut(Self::Item, usize) -> Step) -> Step {
        self.stream(f)
    }

    fn size(&self) -> Option<usize> {
        Some(self.materialized().len())
    }

    fn get(&self, index: usize) -> Option<Self::Item> {
        self.materialized().get(index).cloned()
    }
}

// ================================
// Grouped / Counted
// ================================

/// `(key, group)` pairs in first-seen key order
pub struct Grouped<P: Sequence, K, F> {
    parent: P,
    key: F,
    cache: OnceLock<Vec<(K, Vec<P::Item>)>>,
}

impl<P, K, F> Grouped<P, K, F>
where
    P: Sequence,
    K: Eq + Hash + Clone,
    F: Fn(&P::Item) -> K,
{
    pub(crate) fn new(parent: P, key: F) -> Self {
        Grouped {
            parent,
            key,
            cache: OnceLock::new(),
        }
    }

    fn materialized(&self) -> &Vec<(K, Vec<P::Item>)> {
        self.cache.get_or_init(|| {
            let mut order: Vec<(K, Vec<P::Item>)> = Vec::new();
            let mut slots: HashMap<K, usize> = HashMap::new();
            self.parent.each(&mut |e, _| {
                let k = (self.key)(&e);
                match slots.get(&k) {
                    Some(&slot) => order[slot].1.push(e),
                    None => {
                        slots.insert(k.clone(), order.len());
                        order.push((k, vec![e]));
                    }
                }
                Step::Continue
            });
            order
        })
    }
}

impl<P, K, F> Sequence for Grouped<P, K, F>
where
    P: Sequence,
    P::Item: Clone,
    K: Eq + Hash + Clone,
    F: Fn(&P::Item) -> K,
{
    type Item = (K, Vec<P::Item>);

    fn each(&self, f: &mut dyn FnMut(Self::Item, usize) -> Step) -> Step {
        serve(self.materialized(), f)
    }

    fn size(&self) -> Option<usize> {
        Some(self.materialized().len())
    }

    fn get(&self, index: usize) -> Option<Self::Item> {
        self.materialized().get(index).cloned()
    }
}

/// `(key, count)` pairs in first-seen key order
pub struct Counted<P, K, F> {
    parent: P,
    key: F,
    cache: OnceLock<Vec<(K, usize)>>,
}

impl<P, K, F> Counted<P, K, F>
where
    P: Sequence,
    K: Eq + Hash + Clone,
    F: Fn(&P::Item) -> K,
{
    pub(crate) fn new(parent: P, key: F) -> Self {
        Counted {
            parent,
            key,
            cache: OnceLock::new(),
        }
    }

    fn materialized(&self) -> &Vec<(K, usize)> {
        self.cache.get_or_init(|| {
            let mut order: Vec<(K, usize)> = Vec::new();
            let mut slots: HashMap<K, usize> = HashMap::new();
            self.parent.each(&mut |e, _| {
                let k = (self.key)(&e);
                match slots.get(&k) {
                    Some(&slot) => order[slot].1 += 1,
                    None => {
                        slots.insert(k.clone(), order.len());
                        order.push((k, 1));
                    }
                }
                Step::Continue
            });
            order
        })
    }
}

impl<P, K, F> Sequence for Counted<P, K, F>
where
    P: Sequence,
    K: Eq + Hash + Clone,
    F: Fn(&P::Item) -> K,
{
    type Item = (K, usize);

    fn each(&self, f: &mut dyn FnMut(Self::Item, usize) -> Step) -> Step {
        serve(self.materialized(), f)
    }

    fn size(&self) -> Option<usize> {
        Some(self.materialized().len())
    }

    fn get(&self, index: usize) -> Option<Self::Item> {
        self.materialized().get(index).cloned()
    }
}

// ================================
// Deep flatten
// ================================

/// A value tree for heterogeneously nested input: each node is either a
/// leaf element or a list of further nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum Nested<T> {
    Leaf(T),
    List(Vec<Nested<T>>),
}

impl<T> Nested<T> {
    pub fn leaf(value: T) -> Self {
        Nested::Leaf(value)
    }

    pub fn list(items: Vec<Nested<T>>) -> Self {
        Nested::List(items)
    }
}

impl<T> From<Vec<Nested<T>>> for Nested<T> {
    fn from(items: Vec<Nested<T>>) -> Self {
        Nested::List(items)
    }
}

fn emit_nested<T>(
    node: Nested<T>,
    f: &mut dyn FnMut(T, usize) -> Step,
    out: &mut usize,
) -> Step {
    match node {
        Nested::Leaf(value) => {
            let step = f(value, *out);
            *out += 1;
            step
        }
        Nested::List(items) => {
            for item in items {
                if emit_nested(item, f, out).is_stop() {
                    return Step::Stop;
                }
            }
            Step::Continue
        }
    }
}

/// Recursively inlines a [`Nested`] value tree, leaves in document order
pub struct FlattenDeep<P> {
    parent: P,
}

impl<P> FlattenDeep<P> {
    pub(crate) fn new(parent: P) -> Self {
        FlattenDeep { parent }
    }
}

impl<T, P> Sequence for FlattenDeep<P>
where
    P: Sequence<Item = Nested<T>>,
{
    type Item = T;

    fn each(&self, f: &mut dyn FnMut(T, usize) -> Step) -> Step {
        let mut out = 0usize;
        self.parent.each(&mut |node, _| emit_nested(node, f, &mut out))
    }
}

// ================================
// Set combinators
// ================================

/// Set difference: parent elements not present in the exclusion set
pub struct Without<P: Sequence> {
    parent: P,
    exclude: HashSet<P::Item>,
}

impl<P> Without<P>
where
    P: Sequence,
    P::Item: Eq + Hash,
{
    pub(crate) fn new(parent: P, values: Vec<P::Item>) -> Self {
        Without {
            parent,
            exclude: values.into_iter().collect(),
        }
    }
}

impl<P> Sequence for Without<P>
where
    P: Sequence,
    P::Item: Eq + Hash,
{
    type Item = P::Item;

    fn each(&self, f: &mut dyn FnMut(Self::Item, usize) -> Step) -> Step {
        let mut out = 0usize;
        self.parent.each(&mut |e, _| {
            if self.exclude.contains(&e) {
                return Step::Continue;
            }
            let step = f(e, out);
            out += 1;
            step
        })
    }
}

/// Parent elements present in every argument array, deduplicated
pub struct Intersection<P: Sequence> {
    parent: P,
    keep: Vec<HashSet<P::Item>>,
}

impl<P> Intersection<P>
where
    P: Sequence,
    P::Item: Eq + Hash,
{
    pub(crate) fn new(parent: P, others: Vec<Vec<P::Item>>) -> Self {
        Intersection {
            parent,
            keep: others
                .into_iter()
                .map(|values| values.into_iter().collect())
                .collect(),
        }
    }
}

impl<P> Sequence for Intersection<P>
where
    P: Sequence,
    P::Item: Eq + Hash + Clone,
{
    type Item = P::Item;

    fn each(&self, f: &mut dyn FnMut(Self::Item, usize) -> Step) -> Step {
        let mut emitted: HashSet<P::Item> = HashSet::new();
        let mut out = 0usize;
        self.parent.each(&mut |e, _| {
            if !self.keep.iter().all(|set| set.contains(&e)) {
                return Step::Continue;
            }
            if !emitted.insert(e.clone()) {
                return Step::Continue;
            }
            let step = f(e, out);
            out += 1;
            step
        })
    }
}

// ================================
// Initial
// ================================

/// All but the last `count` elements. Needs the parent's length; parents
/// that do not know it are materialized on first use.
pub struct Initial<P: Sequence> {
    parent: P,
    count: usize,
    cache: OnceLock<Vec<P::Item>>,
}

impl<P: Sequence> Initial<P> {
    pub(crate) fn new(parent: P, count: usize) -> Self {
        Initial {
            parent,
            count,
            cache: OnceLock::new(),
        }
    }

    fn materialized(&self) -> &Vec<P::Item> {
        self.cache.get_or_init(|| collect_all(&self.parent))
    }
}

impl<P> Sequence for Initial<P>
where
    P: Sequence,
    P::Item: Clone,
{
    type Item = P::Item;

    fn each(&self, f: &mut dyn FnMut(Self::Item, usize) -> Step) -> Step {
        match self.parent.size() {
            Some(len) => {
                let limit = len.saturating_sub(self.count);
                if limit == 0 {
                    return Step::Continue;
                }
                let mut out = 0usize;
                let mut stopped_by_visitor = false;
                self.parent.each(&mut |e, _| {
                    let step = f(e, out);
                    out += 1;
                    if step.is_stop() {
                        stopped_by_visitor = true;
                        return Step::Stop;
                    }
                    if out >= limit {
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
            None => {
                let items = self.materialized();
                let limit = items.len().saturating_sub(self.count);
                serve(&items[..limit], f)
            }
        }
    }

    fn size(&self) -> Option<usize> {
        let len = self
            .parent
            .size()
            .unwrap_or_else(|| self.materialized().len());
        Some(len.saturating_sub(self.count))
    }

    fn get(&self, index: usize) -> Option<Self::Item> {
        match self.parent.size() {
            Some(len) => {
                if index < len.saturating_sub(self.count) {
                    self.parent.get(index)
                } else {
                    None
                }
            }
            None => {
                let items = self.materialized();
                if index < items.len().saturating_sub(self.count) {
                    items.get(index).cloned()
                } else {
                    None
                }
            }
        }
    }
}
