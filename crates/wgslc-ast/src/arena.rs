//! Arena-based storage with typed handles.
//!
//! All AST nodes and types are owned by module-level arenas and referenced
//! through lightweight [`Handle`]s; nothing is individually freed.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::Index;

/// A typed handle into an [`Arena`] or [`UniqueArena`].
///
/// Handles are lightweight identifiers (u32 index) that provide
/// type-safe access to arena-allocated values. Handle order matches
/// declaration order within a module.
pub struct Handle<T> {
    index: u32,
    _phantom: PhantomData<T>,
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for Handle<T> {}

impl<T> PartialOrd for Handle<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Handle<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.index.cmp(&other.index)
    }
}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.index)
    }
}

impl<T> Handle<T> {
    pub(crate) fn new(index: u32) -> Self {
        Self {
            index,
            _phantom: PhantomData,
        }
    }

    /// Returns the zero-based index of this handle.
    pub fn index(self) -> usize {
        self.index as usize
    }
}

/// An append-only arena with typed [`Handle`]-based access.
#[derive(Clone, Debug)]
pub struct Arena<T> {
    data: Vec<T>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Returns the number of elements in the arena.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the arena contains no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Appends a value and returns its handle.
    pub fn append(&mut self, value: T) -> Handle<T> {
        let index = u32::try_from(self.data.len()).unwrap_or_else(|_| {
            panic!("arena overflow: {} items exceeds u32::MAX", self.data.len())
        });
        self.data.push(value);
        Handle::new(index)
    }

    /// Returns a reference to the value if the handle is valid.
    pub fn try_get(&self, handle: Handle<T>) -> Option<&T> {
        self.data.get(handle.index())
    }

    /// Iterates over `(handle, &value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> {
        // Arena size is bounded by u32::MAX (enforced in append).
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (Handle::new(i as u32), v))
    }
}

impl<T> Index<Handle<T>> for Arena<T> {
    type Output = T;

    fn index(&self, handle: Handle<T>) -> &T {
        &self.data[handle.index()]
    }
}

/// A deduplicating arena that returns the same [`Handle`] for equal values.
///
/// This is the type registry: structurally identical type descriptions are
/// interned to a single canonical instance. There is no removal; the arena's
/// lifetime matches the module's.
#[derive(Clone, Debug)]
pub struct UniqueArena<T> {
    data: Vec<T>,
    map: HashMap<T, u32>,
}

impl<T: Hash + Eq> Default for UniqueArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Hash + Eq> UniqueArena<T> {
    /// Creates an empty deduplicating arena.
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            map: HashMap::new(),
        }
    }

    /// Returns the number of unique elements in the arena.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the arena contains no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Interns a value, returning the existing handle if an equal value is
    /// already present and discarding the candidate.
    pub fn insert(&mut self, value: T) -> Handle<T>
    where
        T: Clone,
    {
        if let Some(&index) = self.map.get(&value) {
            return Handle::new(index);
        }
        let index = u32::try_from(self.data.len()).unwrap_or_else(|_| {
            panic!("arena overflow: {} items exceeds u32::MAX", self.data.len())
        });
        self.map.insert(value.clone(), index);
        self.data.push(value);
        Handle::new(index)
    }

    /// Returns a reference to the value if the handle is valid.
    pub fn try_get(&self, handle: Handle<T>) -> Option<&T> {
        self.data.get(handle.index())
    }

    /// Iterates over `(handle, &value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (Handle::new(i as u32), v))
    }
}

impl<T> Index<Handle<T>> for UniqueArena<T> {
    type Output = T;

    fn index(&self, handle: Handle<T>) -> &T {
        &self.data[handle.index()]
    }
}
