//! Keyed sequences: operators over `(key, value)` pairs
//!
//! A keyed sequence is any [`Sequence`] whose item is a `(String, V)` pair;
//! [`ObjectSeq`](super::sources::ObjectSeq) is the concrete source, but every
//! pair-itemed pipeline gets these operators. Also home to the [`Record`]
//! trait used by `where_fields`, `find_where` and `pluck` over sequences of
//! record-shaped elements.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt::Display;

use super::core::{Sequence, Step};

/// Extension trait providing the keyed operators
pub trait KeyedExt<V>: Sequence<Item = (String, V)> + Sized {
    /// Project the keys
    fn keys(self) -> Keys<Self> {
        Keys { parent: self }
    }

    /// Project the values
    fn values(self) -> Values<Self> {
        Values { parent: self }
    }

    /// Merge with `other`, `other` winning on key conflicts. `other`'s pairs
    /// come first, then the parent's pairs whose keys were not overridden.
    fn assign<K: Into<String>>(self, other: Vec<(K, V)>) -> Assign<Self, V> {
        Assign {
            parent: self,
            other: other.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Fill in missing keys from `defaults`: the parent's pairs first, then
    /// every default whose key the parent never produced
    fn defaults<K: Into<String>>(self, defaults: Vec<(K, V)>) -> Defaults<Self, V> {
        Defaults {
            parent: self,
            defaults: defaults.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Swap keys and values: `(k, v)` becomes `(v, k)`
    fn invert(self) -> Invert<Self>
    where
        V: Display,
    {
        Invert { parent: self }
    }

    /// Keep only the pairs whose key appears in `keys`
    fn pick(self, keys: &[&str]) -> Pick<Self> {
        Pick {
            parent: self,
            keys: keys.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// Drop the pairs whose key appears in `keys`
    fn omit(self, keys: &[&str]) -> Omit<Self> {
        Omit {
            parent: self,
            keys: keys.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// Keep only the pairs whose value satisfies the predicate
    fn filter_values<F>(self, predicate: F) -> FilterValues<Self, F>
    where
        F: Fn(&V) -> bool,
    {
        FilterValues {
            parent: self,
            predicate,
        }
    }

    /// Rebuild a map from the pairs; later pairs win on duplicate keys
    fn to_object(&self) -> HashMap<String, V> {
        let mut map = HashMap::new();
        self.each(&mut |(k, v), _| {
            map.insert(k, v);
            Step::Continue
        });
        map
    }

    /// The pairs in emission order
    fn pairs(&self) -> Vec<(String, V)> {
        let mut out = Vec::new();
        self.each(&mut |pair, _| {
            out.push(pair);
            Step::Continue
        });
        out
    }
}

impl<V, S: Sequence<Item = (String, V)> + Sized> KeyedExt<V> for S {}

/// Keys of a keyed sequence
pub struct Keys<P> {
    parent: P,
}

impl<V, P: Sequence<Item = (String, V)>> Sequence for Keys<P> {
    type Item = String;

    fn each(&self, f: &mut dyn FnMut(String, usize) -> Step) -> Step {
        self.parent.each(&mut |(k, _), i| f(k, i))
    }

    fn size(&self) -> Option<usize> {
        self.parent.size()
    }

    fn get(&self, index: usize) -> Option<String> {
        self.parent.get(index).map(|(k, _)| k)
    }
}

/// Values of a keyed sequence
pub struct Values<P> {
    parent: P,
}

impl<V, P: Sequence<Item = (String, V)>> Sequence for Values<P> {
    type Item = V;

    fn each(&self, f: &mut dyn FnMut(V, usize) -> Step) -> Step {
        self.parent.each(&mut |(_, v), i| f(v, i))
    }

    fn size(&self) -> Option<usize> {
        self.parent.size()
    }

    fn get(&self, index: usize) -> Option<V> {
        self.parent.get(index).map(|(_, v)| v)
    }
}

/// Merge of two keyed collections, the right-hand side winning
pub struct Assign<P, V> {
    parent: P,
    other: Vec<(String, V)>,
}

impl<V, P> Sequence for Assign<P, V>
where
    V: Clone,
    P: Sequence<Item = (String, V)>,
{
    type Item = (String, V);

    fn each(&self, f: &mut dyn FnMut(Self::Item, usize) -> Step) -> Step {
        let mut out = 0usize;
        for (k, v) in &self.other {
            if f((k.clone(), v.clone()), out).is_stop() {
                return Step::Stop;
            }
            out += 1;
        }
        let overridden: HashSet<&str> = self.other.iter().map(|(k, _)| k.as_str()).collect();
        self.parent.each(&mut |(k, v), _| {
            if overridden.contains(k.as_str()) {
                return Step::Continue;
            }
            let step = f((k, v), out);
            out += 1;
            step
        })
    }
}

/// Parent pairs plus defaults for keys the parent never produced
pub struct Defaults<P, V> {
    parent: P,
    defaults: Vec<(String, V)>,
}

impl<V, P> Sequence for Defaults<P, V>
where
    V: Clone,
    P: Sequence<Item = (String, V)>,
{
    type Item = (String, V);

    fn each(&self, f: &mut dyn FnMut(Self::Item, usize) -> Step) -> Step {
        let mut seen: HashSet<String> = HashSet::new();
        let mut out = 0usize;
        let step = self.parent.each(&mut |(k, v), _| {
            seen.insert(k.clone());
            let step = f((k, v), out);
            out += 1;
            step
        });
        if step.is_stop() {
            return Step::Stop;
        }
        for (k, v) in &self.defaults {
            if seen.contains(k) {
                continue;
            }
            if f((k.clone(), v.clone()), out).is_stop() {
                return Step::Stop;
            }
            out += 1;
        }
        Step::Continue
    }
}

/// Keys and values swapped
pub struct Invert<P> {
    parent: P,
}

impl<V, P> Sequence for Invert<P>
where
    V: Display,
    P: Sequence<Item = (String, V)>,
{
    type Item = (String, String);

    fn each(&self, f: &mut dyn FnMut(Self::Item, usize) -> Step) -> Step {
        self.parent.each(&mut |(k, v), i| f((v.to_string(), k), i))
    }

    fn size(&self) -> Option<usize> {
        self.parent.size()
    }

    fn get(&self, index: usize) -> Option<Self::Item> {
        self.parent.get(index).map(|(k, v)| (v.to_string(), k))
    }
}

/// Pairs whose key is in the allow list
pub struct Pick<P> {
    parent: P,
    keys: Vec<String>,
}

impl<V, P: Sequence<Item = (String, V)>> Sequence for Pick<P> {
    type Item = (String, V);

    fn each(&self, f: &mut dyn FnMut(Self::Item, usize) -> Step) -> Step {
        let mut out = 0usize;
        self.parent.each(&mut |(k, v), _| {
            if !self.keys.iter().any(|want| *want == k) {
                return Step::Continue;
            }
            let step = f((k, v), out);
            out += 1;
            step
        })
    }
}

/// Pairs whose key is not in the deny list
pub struct Omit<P> {
    parent: P,
    keys: Vec<String>,
}

impl<V, P: Sequence<Item = (String, V)>> Sequence for Omit<P> {
    type Item = (String, V);

    fn each(&self, f: &mut dyn FnMut(Self::Item, usize) -> Step) -> Step {
        let mut out = 0usize;
        self.parent.each(&mut |(k, v), _| {
            if self.keys.iter().any(|skip| *skip == k) {
                return Step::Continue;
            }
            let step = f((k, v), out);
            out += 1;
            step
        })
    }
}

/// Pairs whose value satisfies a predicate
pub struct FilterValues<P, F> {
    parent: P,
    predicate: F,
}

impl<V, P, F> Sequence for FilterValues<P, F>
where
    P: Sequence<Item = (String, V)>,
    F: Fn(&V) -> bool,
{
    type Item = (String, V);

    fn each(&self, f: &mut dyn FnMut(Self::Item, usize) -> Step) -> Step {
        let mut out = 0usize;
        self.parent.each(&mut |(k, v), _| {
            if !(self.predicate)(&v) {
                return Step::Continue;
            }
            let step = f((k, v), out);
            out += 1;
            step
        })
    }
}

// ================================
// Records
// ================================

/// Field access for record-shaped elements, used by `where_fields`,
/// `find_where` and `pluck`
pub trait Record {
    type Field: PartialEq + Clone;

    fn field(&self, name: &str) -> Option<Self::Field>;
}

impl<V: PartialEq + Clone> Record for HashMap<String, V> {
    type Field = V;

    fn field(&self, name: &str) -> Option<V> {
        self.get(name).cloned()
    }
}

impl<V: PartialEq + Clone> Record for BTreeMap<String, V> {
    type Field = V;

    fn field(&self, name: &str) -> Option<V> {
        self.get(name).cloned()
    }
}

/// Operators over sequences of record-shaped elements
pub trait RecordExt: Sequence + Sized
where
    Self::Item: Record,
{
    /// Keep only the records whose named fields all equal the given values
    fn where_fields(
        self,
        props: Vec<(String, <Self::Item as Record>::Field)>,
    ) -> WhereMatches<Self> {
        WhereMatches {
            parent: self,
            props,
        }
    }

    /// Project the named field out of each record; absent fields are `None`
    fn pluck(self, name: impl Into<String>) -> Plucked<Self> {
        Plucked {
            parent: self,
            name: name.into(),
        }
    }

    /// The first record whose named fields all equal the given values
    fn find_where(
        &self,
        props: &[(String, <Self::Item as Record>::Field)],
    ) -> Option<Self::Item> {
        let mut found = None;
        self.each(&mut |e, _| {
            if props
                .iter()
                .all(|(name, want)| e.field(name).as_ref() == Some(want))
            {
                found = Some(e);
                Step::Stop
            } else {
                Step::Continue
            }
        });
        found
    }
}

impl<S: Sequence + Sized> RecordExt for S where S::Item: Record {}

/// Records whose named fields all match
pub struct WhereMatches<P: Sequence>
where
    P::Item: Record,
{
    parent: P,
    props: Vec<(String, <P::Item as Record>::Field)>,
}

impl<P> Sequence for WhereMatches<P>
where
    P: Sequence,
    P::Item: Record,
{
    type Item = P::Item;

    fn each(&self, f: &mut dyn FnMut(Self::Item, usize) -> Step) -> Step {
        let mut out = 0usize;
        self.parent.each(&mut |e, _| {
            let matches = self
                .props
                .iter()
                .all(|(name, want)| e.field(name).as_ref() == Some(want));
            if !matches {
                return Step::Continue;
            }
            let step = f(e, out);
            out += 1;
            step
        })
    }
}

/// A named field of each record
pub struct Plucked<P> {
    parent: P,
    name: String,
}

impl<P> Sequence for Plucked<P>
where
    P: Sequence,
    P::Item: Record,
{
    type Item = Option<<P::Item as Record>::Field>;

    fn each(&self, f: &mut dyn FnMut(Self::Item, usize) -> Step) -> Step {
        self.parent.each(&mut |e, i| f(e.field(&self.name), i))
    }

    fn size(&self) -> Option<usize> {
        self.parent.size()
    }

    fn get(&self, index: usize) -> Option<Self::Item> {
        self.parent.get(index).map(|e| e.field(&self.name))
    }
}
