use crate::{ActorClass, ActorHandle};
use alloc::{
    collections::{BTreeMap, BTreeSet},
    vec::Vec,
};

/// Per-class free lists of standby actors.
///
/// Storage never creates or destroys actors, it only keeps handles. Each free
/// list is a stack: the most recently pushed handle is the next one popped.
/// A handle is filed at most once across all free lists.
#[derive(Debug, Default)]
pub struct PoolStorage {
    free_lists: BTreeMap<ActorClass, Vec<ActorHandle>>,
    // Addresses of every filed handle. A filed weak handle keeps its
    // allocation, so an address cannot be reused while it is in here.
    pooled: BTreeSet<usize>,
}

/// Mutable view of one free list, returned by [`PoolStorage::find_or_create`].
#[derive(Debug)]
pub struct FreeListMut<'a> {
    class: ActorClass,
    list: &'a mut Vec<ActorHandle>,
    pooled: &'a mut BTreeSet<usize>,
}

impl FreeListMut<'_> {
    /// Pushes `handle` on top of this free list.
    ///
    /// Returns `false` without filing it if the handle is already pooled or
    /// belongs to another class.
    pub fn push(&mut self, handle: ActorHandle) -> bool {
        if handle.class() != self.class || !self.pooled.insert(handle.addr()) {
            return false;
        }
        self.list.push(handle);
        true
    }

    /// Pops the most recently pushed handle.
    pub fn pop(&mut self) -> Option<ActorHandle> {
        let handle = self.list.pop()?;
        self.pooled.remove(&handle.addr());
        Some(handle)
    }

    /// Reserves room for `additional` more handles.
    pub fn reserve(&mut self, additional: usize) {
        self.list.reserve(additional);
    }

    /// Handles in this free list, bottom to top.
    pub fn as_slice(&self) -> &[ActorHandle] {
        self.list.as_slice()
    }

    /// Number of handles in this free list.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Returns `true` if this free list holds no handle.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

impl PoolStorage {
    /// Creates an empty storage.
    pub fn new() -> Self {
        PoolStorage {
            free_lists: BTreeMap::new(),
            pooled: BTreeSet::new(),
        }
    }

    /// Returns the free list of `class`, if one was ever created.
    pub fn find(&self, class: ActorClass) -> Option<&[ActorHandle]> {
        self.free_lists.get(&class).map(Vec::as_slice)
    }

    /// Returns the free list of `class`, creating an empty one if needed.
    pub fn find_or_create(&mut self, class: ActorClass) -> FreeListMut<'_> {
        FreeListMut {
            class,
            list: self.free_lists.entry(class).or_default(),
            pooled: &mut self.pooled,
        }
    }

    /// Pops the most recently pushed handle of `class`.
    pub fn pop(&mut self, class: ActorClass) -> Option<ActorHandle> {
        let handle = self.free_lists.get_mut(&class)?.pop()?;
        self.pooled.remove(&handle.addr());
        Some(handle)
    }

    /// Pushes `handle` onto the free list of its class.
    ///
    /// Returns `false` if the handle is already filed.
    pub fn push(&mut self, handle: ActorHandle) -> bool {
        self.find_or_create(handle.class()).push(handle)
    }

    /// Returns `true` if `handle` is filed in the free list of its class.
    pub fn contains(&self, handle: &ActorHandle) -> bool {
        self.pooled.contains(&handle.addr())
    }

    /// Reserves room for `additional` more handles of `class`.
    ///
    /// This is only a hint, free lists have no capacity limit.
    pub fn reserve(&mut self, class: ActorClass, additional: usize) {
        self.find_or_create(class).reserve(additional);
    }

    /// Removes the free list of `class` and returns its handles.
    pub fn remove(&mut self, class: ActorClass) -> Vec<ActorHandle> {
        let handles = self.free_lists.remove(&class).unwrap_or_default();
        for handle in &handles {
            self.pooled.remove(&handle.addr());
        }
        handles
    }

    /// Removes every free list and returns all handles they held.
    pub fn clear(&mut self) -> Vec<ActorHandle> {
        self.pooled.clear();
        let free_lists = core::mem::take(&mut self.free_lists);
        free_lists.into_values().flatten().collect()
    }

    /// Number of standby handles of `class`.
    pub fn len_of(&self, class: ActorClass) -> usize {
        self.find(class).map_or(0, <[ActorHandle]>::len)
    }

    /// Number of standby handles across all classes.
    pub fn len(&self) -> usize {
        self.pooled.len()
    }

    /// Returns `true` if no class has a standby handle.
    pub fn is_empty(&self) -> bool {
        self.pooled.is_empty()
    }

    /// Iterates over the classes that have a free list.
    pub fn classes(&self) -> impl Iterator<Item = ActorClass> + '_ {
        self.free_lists.keys().copied()
    }
}
