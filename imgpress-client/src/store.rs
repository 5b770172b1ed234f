//! Local collection store
//!
//! Optimistic mirrors of server-side collections, keyed by id. The server is
//! authoritative: a refetch replaces the whole mapping and mutations are only
//! applied after the server confirmed them.

use std::collections::HashMap;
use std::hash::Hash;

use imgpress_model::prelude::{
    CompressionId, ImageCompression, ImageId, UserImage,
};

/// Items that carry a stable server-assigned key
pub trait Keyed {
    type Key: Clone + Eq + Hash + std::fmt::Debug;

    fn key(&self) -> &Self::Key;
}

impl Keyed for UserImage {
    type Key = ImageId;

    fn key(&self) -> &ImageId {
        &self.id
    }
}

impl Keyed for ImageCompression {
    type Key = CompressionId;

    fn key(&self) -> &CompressionId {
        &self.id
    }
}

/// Keyed mapping that iterates in insertion order
#[derive(Debug, Clone)]
pub struct CollectionStore<T: Keyed> {
    items: HashMap<T::Key, T>,
    order: Vec<T::Key>,
}

impl<T: Keyed> Default for CollectionStore<T> {
    fn default() -> Self {
        Self {
            items: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<T: Keyed> CollectionStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `item`, or overwrite the entry with the same key in place
    pub fn add(&mut self, item: T) {
        let key = item.key().clone();
        if self.items.insert(key.clone(), item).is_none() {
            self.order.push(key);
        }
    }

    /// Remove the entry with `item`'s key; absent keys are ignored
    pub fn remove(&mut self, item: &T) -> Option<T> {
        let key = item.key().clone();
        self.remove_id(&key)
    }

    pub fn remove_id(&mut self, key: &T::Key) -> Option<T> {
        let removed = self.items.remove(key)?;
        self.order.retain(|k| k != key);
        Some(removed)
    }

    /// Swap in a freshly fetched collection
    pub fn replace_all(&mut self, items: impl IntoIterator<Item = T>) {
        self.items.clear();
        self.order.clear();
        for item in items {
            self.add(item);
        }
    }

    pub fn get(&self, key: &T::Key) -> Option<&T> {
        self.items.get(key)
    }

    pub fn contains(&self, key: &T::Key) -> bool {
        self.items.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.order.iter().filter_map(|key| self.items.get(key))
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.order.clear();
    }
}

impl<T: Keyed> FromIterator<T> for CollectionStore<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut store = Self::new();
        store.replace_all(iter);
        store
    }
}
