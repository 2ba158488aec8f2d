//  Copyright 2024 strand Project Authors
//
//  Licensed under the Apache License, Version 2.0 (the "License");
//  you may not use this file except in compliance with the License.
//  You may obtain a copy of the License at
//
//  http://www.apache.org/licenses/LICENSE-2.0
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.

use std::{
    cmp::Ordering,
    fmt::Debug,
    hash::{Hash, Hasher},
    marker::PhantomData,
    mem,
    ops::Range,
    ptr::NonNull,
};

use allocator_api2::alloc::{Allocator, Global};
use strand_common::{strict_assert, strict_assert_eq, Error, Result};

use crate::{
    cursor::{Cursor, CursorMut},
    iter::{IntoIter, Iter, IterMut},
    ring::{self, Link},
    store::{Node, NodeStore},
};

/// A doubly linked list over a sentinel ring.
///
/// The list owns one heap allocated sentinel and one node per element. The sentinel's `next` is
/// the first element and its `prev` the last one; an empty list is a self-linked sentinel.
///
/// Single element operations give the strong guarantee: if allocation or element construction
/// fails (or unwinds), the list is left exactly as it was. Whole list builds (`try_from_iter_in`,
/// `clone`, `clone_from`) release everything they built before reporting a failure. The ordering
/// algorithms that call back into user code (`merge_by`, `sort_by`, `unique_by`) only give the
/// basic guarantee: the ring stays intact and no element is leaked or dropped twice, but the
/// reordering may be incomplete.
pub struct List<T, A: Allocator = Global> {
    pub(crate) ghost: NonNull<Link>,
    pub(crate) len: usize,
    pub(crate) store: NodeStore<A>,
    _marker: PhantomData<T>,
}

unsafe impl<T: Send, A: Allocator + Send> Send for List<T, A> {}
unsafe impl<T: Sync, A: Allocator + Sync> Sync for List<T, A> {}

impl<T> List<T> {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::new_in(Global)
    }

    /// Create a list of `len` default elements.
    pub fn with_len(len: usize) -> Self
    where
        T: Default,
    {
        let mut list = Self::new();
        for _ in 0..len {
            list.push_back_with(T::default);
        }
        list
    }

    /// Build a list from fallible elements.
    ///
    /// See [`List::try_from_iter_in`].
    pub fn try_from_iter<I>(iter: I) -> Result<Self>
    where
        I: IntoIterator<Item = anyhow::Result<T>>,
    {
        Self::try_from_iter_in(iter, Global)
    }
}

impl<T, A: Allocator> List<T, A> {
    /// Create an empty list whose nodes are managed by `alloc`.
    pub fn new_in(alloc: A) -> Self {
        Self::try_new_in(alloc).unwrap_or_else(|e| e.handle())
    }

    /// Create an empty list whose nodes are managed by `alloc`, reporting sentinel allocation
    /// failure.
    pub fn try_new_in(alloc: A) -> Result<Self> {
        let store = NodeStore::new(alloc);
        let ghost = store.allocate_sentinel()?;
        Ok(Self {
            ghost,
            len: 0,
            store,
            _marker: PhantomData,
        })
    }

    /// Build a list from fallible elements, appending them one at a time.
    ///
    /// If an element fails, or its node cannot be allocated, every node built so far is released
    /// before the error is returned. A partial list is never observable.
    pub fn try_from_iter_in<I>(iter: I, alloc: A) -> Result<Self>
    where
        I: IntoIterator<Item = anyhow::Result<T>>,
    {
        let mut list = Self::try_new_in(alloc)?;
        for item in iter {
            let link = match item.map_err(Error::Construct).and_then(|value| list.store.create(value)) {
                Ok(link) => link,
                Err(e) => {
                    tracing::trace!(built = list.len, "[list]: unwind partial build: {e}");
                    return Err(e);
                }
            };
            unsafe { list.link_before(link, list.ghost) };
        }
        list.check();
        Ok(list)
    }

    /// Get the allocator that manages the list nodes.
    pub fn allocator(&self) -> &A {
        self.store.allocator()
    }

    /// Get the element count.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the list holds no element.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Upper bound of the element count imposed by the node size.
    pub fn max_len(&self) -> usize {
        isize::MAX as usize / mem::size_of::<Node<T>>()
    }

    /// Get the reference of the first element.
    pub fn front(&self) -> Option<&T> {
        (!self.is_empty()).then(|| unsafe { Node::value(self.first()) })
    }

    /// Get the reference of the last element.
    pub fn back(&self) -> Option<&T> {
        (!self.is_empty()).then(|| unsafe { Node::value(self.last()) })
    }

    /// Get the mutable reference of the first element.
    pub fn front_mut(&mut self) -> Option<&mut T> {
        (!self.is_empty()).then(|| unsafe { Node::value_mut(self.first()) })
    }

    /// Get the mutable reference of the last element.
    pub fn back_mut(&mut self) -> Option<&mut T> {
        (!self.is_empty()).then(|| unsafe { Node::value_mut(self.last()) })
    }

    /// Append an element.
    pub fn push_back(&mut self, value: T) {
        let link = self.store.create(value).unwrap_or_else(|e| e.handle());
        unsafe { self.link_before(link, self.ghost) };
        self.check();
    }

    /// Prepend an element.
    pub fn push_front(&mut self, value: T) {
        let link = self.store.create(value).unwrap_or_else(|e| e.handle());
        unsafe { self.link_before(link, self.first()) };
        self.check();
    }

    /// Append an element constructed in place by `f`.
    ///
    /// The node is allocated before `f` runs. If `f` unwinds, the node is released and the list
    /// is unchanged.
    pub fn push_back_with<F>(&mut self, f: F) -> &mut T
    where
        F: FnOnce() -> T,
    {
        let link = self.store.create_with(|| Ok(f())).unwrap_or_else(|e| e.handle());
        unsafe {
            self.link_before(link, self.ghost);
            Node::value_mut(link)
        }
    }

    /// Append an element constructed in place by the fallible `f`.
    ///
    /// On failure the list is unchanged.
    pub fn try_push_back_with<F>(&mut self, f: F) -> Result<&mut T>
    where
        F: FnOnce() -> anyhow::Result<T>,
    {
        let link = self.store.create_with(f)?;
        unsafe {
            self.link_before(link, self.ghost);
            Ok(Node::value_mut(link))
        }
    }

    /// Prepend an element constructed in place by the fallible `f`.
    ///
    /// On failure the list is unchanged.
    pub fn try_push_front_with<F>(&mut self, f: F) -> Result<&mut T>
    where
        F: FnOnce() -> anyhow::Result<T>,
    {
        let link = self.store.create_with(f)?;
        unsafe {
            self.link_before(link, self.first());
            Ok(Node::value_mut(link))
        }
    }

    /// Remove the last element.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let value = unsafe { self.unlink(self.last()) };
        self.check();
        Some(value)
    }

    /// Remove the first element.
    pub fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let value = unsafe { self.unlink(self.first()) };
        self.check();
        Some(value)
    }

    /// Append the elements of `iter` in iteration order. Returns the count of inserted elements.
    ///
    /// Use [`CursorMut::insert_many_before`] to keep a position after the inserted run.
    pub fn insert_many_back<I>(&mut self, iter: I) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        self.cursor_end_mut().insert_many_before(iter)
    }

    /// Prepend the elements of `iter`, keeping their iteration order. Returns the count of
    /// inserted elements.
    pub fn insert_many_front<I>(&mut self, iter: I) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        self.cursor_front_mut().insert_many_before(iter)
    }

    /// Remove the elements in `range`, returning how many were removed.
    pub fn remove_range(&mut self, range: Range<usize>) -> Result<usize> {
        if range.start > range.end || range.end > self.len {
            return Err(Error::out_of_range(range.end.max(range.start), self.len));
        }
        let mut cursor = self.cursor_at_mut(range.start)?;
        Ok(cursor.remove_n(range.end - range.start))
    }

    /// Remove all elements.
    pub fn clear(&mut self) {
        struct Guard<'a, T, A: Allocator>(&'a mut List<T, A>);

        impl<T, A: Allocator> Drop for Guard<'_, T, A> {
            fn drop(&mut self) {
                // Keep releasing nodes after an element drop panicked.
                while self.0.pop_front().is_some() {}
            }
        }

        while let Some(value) = self.pop_front() {
            let guard = Guard(self);
            drop(value);
            mem::forget(guard);
        }
    }

    /// Exchange the lifecycle policy, size and contents of two lists in O(1).
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Move all elements into a new list in O(1), leaving `self` empty.
    ///
    /// The new list gets a fresh sentinel and a clone of the allocator.
    pub fn take(&mut self) -> Self
    where
        A: Clone,
    {
        let mut out = Self::new_in(self.allocator().clone());
        unsafe { ring::swap_rings(self.ghost, out.ghost) };
        out.len = mem::take(&mut self.len);
        self.check();
        out.check();
        out
    }

    /// Get a read-only cursor at the first element, or at the end position if the list is empty.
    pub fn cursor_front(&self) -> Cursor<'_, T, A> {
        Cursor::new(self, self.first())
    }

    /// Get a read-only cursor at the end position.
    pub fn cursor_end(&self) -> Cursor<'_, T, A> {
        Cursor::new(self, self.ghost)
    }

    /// Get a read-only cursor at `index`. `index == len` is the end position.
    pub fn cursor_at(&self, index: usize) -> Result<Cursor<'_, T, A>> {
        let link = self.link_at(index)?;
        Ok(Cursor::new(self, link))
    }

    /// Get a mutable cursor at the first element, or at the end position if the list is empty.
    pub fn cursor_front_mut(&mut self) -> CursorMut<'_, T, A> {
        let link = self.first();
        Cursor::new_mut(self, link)
    }

    /// Get a mutable cursor at the end position.
    pub fn cursor_end_mut(&mut self) -> CursorMut<'_, T, A> {
        let link = self.ghost;
        Cursor::new_mut(self, link)
    }

    /// Get a mutable cursor at `index`. `index == len` is the end position.
    pub fn cursor_at_mut(&mut self, index: usize) -> Result<CursorMut<'_, T, A>> {
        let link = self.link_at(index)?;
        Ok(Cursor::new_mut(self, link))
    }

    /// Get the element reference iterator.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.first(), self.last(), self.len)
    }

    /// Get the element mutable reference iterator.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(self.first(), self.last(), self.len)
    }

    /// Walk the ring and check that it is closed in both directions and holds exactly
    /// [`List::len`] elements.
    pub fn is_ring_consistent(&self) -> bool {
        unsafe { ring::count(self.ghost, self.len) == Some(self.len) }
    }

    pub(crate) fn first(&self) -> NonNull<Link> {
        unsafe { ring::next(self.ghost) }
    }

    pub(crate) fn last(&self) -> NonNull<Link> {
        unsafe { ring::prev(self.ghost) }
    }

    fn link_at(&self, index: usize) -> Result<NonNull<Link>> {
        if index > self.len {
            return Err(Error::out_of_range(index, self.len));
        }
        let mut link = self.ghost;
        unsafe {
            if index < self.len / 2 {
                link = ring::next(link);
                for _ in 0..index {
                    link = ring::next(link);
                }
            } else {
                for _ in index..self.len {
                    link = ring::prev(link);
                }
            }
        }
        Ok(link)
    }

    /// Hook a constructed, self-linked node before `pos` and count it.
    ///
    /// # Safety
    ///
    /// `link` must come from this list's store, `pos` must be a member of this list's ring.
    pub(crate) unsafe fn link_before(&mut self, link: NonNull<Link>, pos: NonNull<Link>) {
        ring::hook_before(link, pos);
        self.len += 1;
    }

    /// Unhook the value node at `link`, release it and return its element.
    ///
    /// # Safety
    ///
    /// `link` must be a value node of this list.
    pub(crate) unsafe fn unlink(&mut self, link: NonNull<Link>) -> T {
        strict_assert!(link != self.ghost);
        strict_assert!(self.len > 0);
        ring::unhook(link);
        self.len -= 1;
        self.store.release(link)
    }

    pub(crate) fn check(&self) {
        strict_assert_eq!(self.len == 0, unsafe { ring::is_alone(self.ghost) });
        #[cfg(feature = "sanity")]
        assert!(self.is_ring_consistent(), "list ring is corrupted");
    }
}

impl<T, A: Allocator> Drop for List<T, A> {
    fn drop(&mut self) {
        self.clear();
        unsafe { self.store.deallocate_sentinel(self.ghost) };
    }
}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, A: Allocator + Clone> Clone for List<T, A> {
    fn clone(&self) -> Self {
        let mut list = Self::new_in(self.allocator().clone());
        list.extend(self.iter().cloned());
        list
    }

    /// Build a full copy first, then swap it in, so a failing clone leaves `self` untouched.
    fn clone_from(&mut self, source: &Self) {
        let mut copy = source.clone();
        self.swap(&mut copy);
    }
}

impl<T: Debug, A: Allocator> Debug for List<T, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self).finish()
    }
}

impl<T: PartialEq, A: Allocator> PartialEq for List<T, A> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other)
    }
}

impl<T: Eq, A: Allocator> Eq for List<T, A> {}

impl<T: PartialOrd, A: Allocator> PartialOrd for List<T, A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other)
    }
}

impl<T: Ord, A: Allocator> Ord for List<T, A> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other)
    }
}

impl<T: Hash, A: Allocator> Hash for List<T, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len.hash(state);
        for elt in self {
            elt.hash(state);
        }
    }
}

impl<T, A: Allocator> Extend<T> for List<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<'a, T: Copy + 'a, A: Allocator> Extend<&'a T> for List<T, A> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T> FromIterator<T> for List<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<T, const N: usize> From<[T; N]> for List<T> {
    fn from(arr: [T; N]) -> Self {
        Self::from_iter(arr)
    }
}

impl<T, A: Allocator> IntoIterator for List<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a List<T, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a mut List<T, A> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
