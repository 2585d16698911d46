//! Shared, insertion-ordered containers and their keys.
//!
//! A [`Container`] is a mapping from [`Key`]s to [`crate::Value`]s backed by
//! an [`IndexMap`] behind a shared handle. Cloning a container clones the
//! handle, not the entries; two clones observe each other's mutations. That
//! is what makes the data model's two reference properties expressible:
//!
//! - the same container may appear under several unrelated entries (legal,
//!   each occurrence encodes independently), and
//! - a container may end up inside itself (illegal at encode time, caught by
//!   the encoder's cycle guard via [`Container::identity`]).
//!
//! Equality between containers is structural and order-insensitive: two
//! containers are equal when they hold the same entry set, regardless of the
//! order entries were inserted.
//!
//! IndexMap rather than HashMap keeps encode output deterministic for a given
//! insertion sequence, which keeps tests and diffs predictable.
//!
//! # Examples
//!
//! ```rust
//! use textpack::{Container, Value};
//!
//! let container = Container::new();
//! container.insert("name", "Alice");
//! container.insert("age", 30);
//!
//! assert_eq!(container.len(), 2);
//! assert_eq!(container.get("name"), Some(Value::from("Alice")));
//! ```

use crate::Value;
use indexmap::IndexMap;
use std::cell::{Ref, RefCell};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// A float usable as a container key.
///
/// Equality and hashing go through the raw bit pattern, which gives the
/// total relation `IndexMap` needs. `0.0` and `-0.0` are therefore distinct
/// keys, and a NaN key equals itself.
#[derive(Clone, Copy, Debug)]
pub struct FloatKey(f64);

impl FloatKey {
    #[must_use]
    pub const fn new(value: f64) -> Self {
        FloatKey(value)
    }

    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl PartialEq for FloatKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for FloatKey {}

impl Hash for FloatKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.0.to_bits());
    }
}

/// A container key: text or numeric.
///
/// Keys are the subset of values the format permits in key position. Text
/// keys carry arbitrary bytes, like text values do.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Text(Vec<u8>),
    Integer(i64),
    Float(FloatKey),
}

impl Key {
    /// Converts a decoded value into a key, if the value can key a container.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Key> {
        use crate::Number;
        match value {
            Value::Text(bytes) => Some(Key::Text(bytes.clone())),
            Value::Number(Number::Integer(i)) => Some(Key::Integer(*i)),
            Value::Number(Number::Float(f)) => Some(Key::Float(FloatKey::new(*f))),
            Value::Number(Number::Infinity) => Some(Key::Float(FloatKey::new(f64::INFINITY))),
            Value::Number(Number::NegativeInfinity) => {
                Some(Key::Float(FloatKey::new(f64::NEG_INFINITY)))
            }
            _ => None,
        }
    }

    /// The key as a value, the form it takes on the wire.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Key::Text(bytes) => Value::Text(bytes.clone()),
            Key::Integer(i) => Value::from(*i),
            Key::Float(f) => Value::from(f.get()),
        }
    }

    /// If this is a text key with UTF-8 content, returns it as a str.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Key::Text(bytes) => std::str::from_utf8(bytes).ok(),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Text(bytes) => write!(f, "{}", String::from_utf8_lossy(bytes)),
            Key::Integer(i) => write!(f, "{}", i),
            Key::Float(fl) => write!(f, "{}", fl.get()),
        }
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::Text(value.as_bytes().to_vec())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::Text(value.into_bytes())
    }
}

impl From<&[u8]> for Key {
    fn from(value: &[u8]) -> Self {
        Key::Text(value.to_vec())
    }
}

impl From<i32> for Key {
    fn from(value: i32) -> Self {
        Key::Integer(value as i64)
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Key::Integer(value)
    }
}

impl From<f64> for Key {
    fn from(value: f64) -> Self {
        Key::Float(FloatKey::new(value))
    }
}

/// A shared, insertion-ordered mapping from keys to values.
///
/// See the module docs for the sharing semantics. All mutating methods take
/// `&self`: the entries live behind a `RefCell`, so a container handle
/// behaves like the reference type it models.
#[derive(Clone, Debug, Default)]
pub struct Container {
    entries: Rc<RefCell<IndexMap<Key, Value>>>,
}

impl Container {
    /// Creates an empty container.
    #[must_use]
    pub fn new() -> Self {
        Container {
            entries: Rc::new(RefCell::new(IndexMap::new())),
        }
    }

    /// Creates an empty container with room for `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Container {
            entries: Rc::new(RefCell::new(IndexMap::with_capacity(capacity))),
        }
    }

    /// Inserts an entry, returning the previous value for the key if any.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use textpack::{Container, Value};
    ///
    /// let container = Container::new();
    /// assert!(container.insert("key", 1).is_none());
    /// assert_eq!(container.insert("key", 2), Some(Value::from(1)));
    /// ```
    pub fn insert(&self, key: impl Into<Key>, value: impl Into<Value>) -> Option<Value> {
        self.entries.borrow_mut().insert(key.into(), value.into())
    }

    /// Looks up an entry, cloning the value out.
    #[must_use]
    pub fn get(&self, key: impl Into<Key>) -> Option<Value> {
        self.entries.borrow().get(&key.into()).cloned()
    }

    /// Removes an entry, returning its value if it was present.
    ///
    /// Absent entries are simply not present; there is no tombstone.
    pub fn remove(&self, key: impl Into<Key>) -> Option<Value> {
        self.entries.borrow_mut().shift_remove(&key.into())
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Returns `true` if the container holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Snapshot of the entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> Vec<(Key, Value)> {
        self.entries
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// The identity of this container's allocation.
    ///
    /// Clones of the same handle share an identity; structurally equal but
    /// separately built containers do not. The encoder's cycle guard keys
    /// its ancestor set on this.
    #[must_use]
    pub fn identity(&self) -> usize {
        Rc::as_ptr(&self.entries) as *const () as usize
    }

    /// Returns `true` if `self` and `other` are the same allocation.
    #[must_use]
    pub fn same_as(&self, other: &Container) -> bool {
        Rc::ptr_eq(&self.entries, &other.entries)
    }

    pub(crate) fn borrow(&self) -> Ref<'_, IndexMap<Key, Value>> {
        self.entries.borrow()
    }

    /// Deep structural comparison. `in_progress` holds the identity pairs
    /// currently being compared further up the call stack; hitting one of
    /// them again means both sides loop back in the same place, so the pair
    /// contributes no difference and recursion stops there.
    fn deep_eq(&self, other: &Container, in_progress: &mut Vec<(usize, usize)>) -> bool {
        if self.same_as(other) {
            return true;
        }
        let pair = (self.identity(), other.identity());
        if in_progress.contains(&pair) {
            return true;
        }
        in_progress.push(pair);
        let left = self.entries.borrow();
        let right = other.entries.borrow();
        let equal = left.len() == right.len()
            && left.iter().all(|(key, value)| match right.get(key) {
                Some(other_value) => value_eq(value, other_value, in_progress),
                None => false,
            });
        in_progress.pop();
        equal
    }
}

fn value_eq(left: &Value, right: &Value, in_progress: &mut Vec<(usize, usize)>) -> bool {
    match (left, right) {
        (Value::Container(a), Value::Container(b)) => a.deep_eq(b, in_progress),
        (a, b) => a == b,
    }
}

impl PartialEq for Container {
    fn eq(&self, other: &Self) -> bool {
        // Entries may reach self or other again: containers are shared
        // handles and cyclic shapes are constructible, so the comparison
        // tracks the pairs it is already inside instead of recursing blindly.
        let mut in_progress = Vec::new();
        self.deep_eq(other, &mut in_progress)
    }
}

impl FromIterator<(Key, Value)> for Container {
    fn from_iter<T: IntoIterator<Item = (Key, Value)>>(iter: T) -> Self {
        let container = Container::new();
        for (key, value) in iter {
            container.insert(key, value);
        }
        container
    }
}
