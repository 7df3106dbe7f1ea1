use indexmap::IndexMap;

use crate::value::Value;

/// An insertion-ordered JSON object.
///
/// Pairs an ordered slot list with a key → latest-slot index so lookups are
/// O(1) amortized while iteration and serialization preserve the order keys
/// first appeared. Duplicate keys (the parser's `append` policy) occupy
/// separate slots; [`Object::get`] prefers the most recent one and iteration
/// yields every slot in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Object {
    slots: Vec<(String, Value)>,
    lookup: IndexMap<String, usize>,
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries, counting duplicate-key slots individually.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The latest value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.lookup.get(key).map(|&i| &self.slots[i].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.lookup.get(key).copied().map(|i| &mut self.slots[i].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.lookup.contains_key(key)
    }

    /// Overwrites the latest entry under `key`, or appends a new one.
    /// Returns the replaced value, if any.
    pub fn insert(&mut self, key: &str, value: Value) -> Option<Value> {
        match self.lookup.get(key) {
            Some(&i) => Some(core::mem::replace(&mut self.slots[i].1, value)),
            None => {
                self.lookup.insert(key.to_owned(), self.slots.len());
                self.slots.push((key.to_owned(), value));
                None
            }
        }
    }

    /// Appends a new slot under `key` even when the key already exists.
    /// Subsequent lookups prefer this entry.
    pub fn push(&mut self, key: &str, value: Value) {
        self.lookup.insert(key.to_owned(), self.slots.len());
        self.slots.push((key.to_owned(), value));
    }

    /// The latest value under `key`, inserting a null entry if absent.
    pub fn entry(&mut self, key: &str) -> &mut Value {
        let index = match self.lookup.get(key) {
            Some(&i) => i,
            None => {
                let i = self.slots.len();
                self.lookup.insert(key.to_owned(), i);
                self.slots.push((key.to_owned(), Value::Null));
                i
            }
        };
        &mut self.slots[index].1
    }

    /// Removes every entry stored under `key` and returns how many there were.
    pub fn remove(&mut self, key: &str) -> usize {
        let before = self.slots.len();
        self.slots.retain(|(k, _)| k != key);
        let removed = before - self.slots.len();
        if removed > 0 {
            self.lookup.clear();
            for (i, (k, _)) in self.slots.iter().enumerate() {
                self.lookup.insert(k.clone(), i);
            }
        }
        removed
    }

    /// Iterates `(key, value)` pairs in insertion order, duplicates included.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.slots.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.slots.iter().map(|(_, v)| v)
    }
}

/// Equality is over the ordered slot list; the lookup table is derived state.
impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.slots == other.slots
    }
}
