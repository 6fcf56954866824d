//! strongly-typed collection algebra
//!
//! The functions here take arguments that were already checked by the variadic entry points in [crate::coll] and
//! can not fail on shape.
//!
//! [flatten], [pick], [omit] and [slice] operate on the dynamic value model. Every result is a new value,
//! subjects are never changed. [slice] is built with [Array::rebuild] so the concrete element type of the subject
//! carries over.
//!
//! [pick_entries] and [omit_entries] work on any [IndexMap] with hashable keys. [pick] and [omit] are these two
//! applied to the entries of an [Object].
use crate::value::{Array, Key, Object, Value};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::hash::{BuildHasher, Hash};
use std::ops::Range;

/// Expand nested arrays depth-first, left to right
///
/// `depth` limits how many levels are expanded, `None` expands all of them. Only arrays are expanded, strings and
/// objects are kept as elements.
pub fn flatten(subject: &Array, depth: Option<usize>) -> Array {
    let mut flat = Vec::with_capacity(subject.len());
    flatten_into(subject, depth, &mut flat);
    Array::Any(flat)
}

fn flatten_into(array: &Array, depth: Option<usize>, flat: &mut Vec<Value>) {
    let Array::Any(items) = array else {
        // typed arrays only hold scalars
        flat.extend(array.iter());
        return;
    };

    for item in items {
        match item {
            Value::Array(inner) if depth != Some(0) => {
                flatten_into(inner, depth.map(|depth| depth - 1), flat)
            }
            other => flat.push(other.clone()),
        }
    }
}

/// Entries whose key is in `keys`
pub fn pick(subject: &Object, keys: &HashSet<Key>) -> Object {
    pick_entries(subject.entries(), keys).into()
}

/// Entries whose key is not in `keys`
pub fn omit(subject: &Object, keys: &HashSet<Key>) -> Object {
    omit_entries(subject.entries(), keys).into()
}

/// Elements in the half-open `range`
///
/// The range must lie within the array.
pub fn slice(subject: &Array, range: Range<usize>) -> Array {
    subject.rebuild(range)
}

/// Entries whose key is in `keys`, in map order
pub fn pick_entries<K, V, S>(map: &IndexMap<K, V>, keys: &HashSet<K, S>) -> IndexMap<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher,
{
    map.iter()
        .filter(|(key, _)| keys.contains(*key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Entries whose key is not in `keys`, in map order
pub fn omit_entries<K, V, S>(map: &IndexMap<K, V>, keys: &HashSet<K, S>) -> IndexMap<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher,
{
    map.iter()
        .filter(|(key, _)| !keys.contains(*key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
