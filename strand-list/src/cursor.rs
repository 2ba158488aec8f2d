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

//! Position handles over the ring.
//!
//! A [`Cursor`] points at a value node or at the sentinel (the end position). It moves in both
//! directions and wraps around through the end position. The capability marker decides what the
//! cursor may do: [`ReadOnly`] cursors only read, [`Mutable`] cursors may also edit elements and
//! restructure the list. A mutable cursor converts into a read-only one, never the other way.

use std::{fmt::Debug, marker::PhantomData, mem, ptr::NonNull};

use allocator_api2::alloc::{Allocator, Global};
use strand_common::Result;

use crate::{
    list::List,
    ring::{self, Link},
    store::Node,
};

mod sealed {
    pub trait Sealed {}
}

/// Capability marker of a [`Cursor`].
pub trait Access: sealed::Sealed {}

/// Marker of cursors that can only read elements.
#[derive(Debug)]
pub enum ReadOnly {}

/// Marker of cursors that can edit elements and restructure the list.
#[derive(Debug)]
pub enum Mutable {}

impl sealed::Sealed for ReadOnly {}
impl sealed::Sealed for Mutable {}
impl Access for ReadOnly {}
impl Access for Mutable {}

/// A position in a [`List`].
///
/// Equality is node identity: two cursors are equal if they point at the same node, regardless of
/// the elements' values or the cursors' capabilities.
pub struct Cursor<'a, T, A: Allocator = Global, M: Access = ReadOnly> {
    node: NonNull<Link>,
    list: NonNull<List<T, A>>,
    _marker: PhantomData<(&'a mut List<T, A>, M)>,
}

/// A cursor that can edit elements and restructure the list.
pub type CursorMut<'a, T, A = Global> = Cursor<'a, T, A, Mutable>;

impl<'a, T, A: Allocator> Cursor<'a, T, A, ReadOnly> {
    pub(crate) fn new(list: &'a List<T, A>, node: NonNull<Link>) -> Self {
        Self {
            node,
            list: NonNull::from(list),
            _marker: PhantomData,
        }
    }

    /// Get the element at the cursor, or `None` at the end position.
    pub fn current(&self) -> Option<&'a T> {
        unsafe { self.value() }
    }
}

impl<'a, T, A: Allocator> Cursor<'a, T, A, Mutable> {
    pub(crate) fn new_mut(list: &'a mut List<T, A>, node: NonNull<Link>) -> Self {
        Self {
            node,
            list: NonNull::from(list),
            _marker: PhantomData,
        }
    }

    /// Get the element at the cursor, or `None` at the end position.
    pub fn current(&self) -> Option<&T> {
        unsafe { self.value() }
    }

    /// Get the mutable element at the cursor, or `None` at the end position.
    pub fn current_mut(&mut self) -> Option<&mut T> {
        if self.is_end() {
            return None;
        }
        Some(unsafe { Node::value_mut(self.node) })
    }

    /// Insert `value` before the cursor and return it. The cursor does not move.
    pub fn insert_before(&mut self, value: T) -> &mut T {
        let list = unsafe { self.list.as_mut() };
        let link = list.store.create(value).unwrap_or_else(|e| e.handle());
        unsafe {
            list.link_before(link, self.node);
            list.check();
            Node::value_mut(link)
        }
    }

    /// Insert an element constructed in place by `f` before the cursor. The node is allocated
    /// before `f` runs.
    ///
    /// If `f` fails or unwinds, the node is released and the list is unchanged.
    pub fn try_insert_before_with<F>(&mut self, f: F) -> Result<&mut T>
    where
        F: FnOnce() -> anyhow::Result<T>,
    {
        let list = unsafe { self.list.as_mut() };
        let link = list.store.create_with(f)?;
        unsafe {
            list.link_before(link, self.node);
            list.check();
            Ok(Node::value_mut(link))
        }
    }

    /// Insert the elements of `iter` before the cursor, in iteration order. Returns the count of
    /// inserted elements.
    ///
    /// The cursor stays on its element (or the end position), which is the position following the
    /// inserted run, so `move_prev` reaches the last inserted element.
    pub fn insert_many_before<I>(&mut self, iter: I) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        iter.into_iter().fold(0, |n, value| {
            self.insert_before(value);
            n + 1
        })
    }

    /// Remove the element at the cursor and move to the next position.
    ///
    /// Returns `None` without moving at the end position.
    pub fn remove(&mut self) -> Option<T> {
        if self.is_end() {
            return None;
        }
        let list = unsafe { self.list.as_mut() };
        let node = self.node;
        unsafe {
            self.node = ring::next(node);
            let value = list.unlink(node);
            list.check();
            Some(value)
        }
    }

    /// Remove up to `n` elements starting at the cursor, stopping at the end position. Returns
    /// how many were removed.
    pub fn remove_n(&mut self, n: usize) -> usize {
        let mut removed = 0;
        while removed < n && self.remove().is_some() {
            removed += 1;
        }
        removed
    }

    /// Move every element of `other` before the cursor in O(1), leaving `other` empty.
    ///
    /// The nodes change owner without being touched, so `other`'s allocator must be able to
    /// release memory handed out by this list's allocator and vice versa (e.g. [`Global`] or
    /// clones of one allocator).
    pub fn splice_before(&mut self, other: &mut List<T, A>) {
        if other.is_empty() {
            return;
        }
        let list = unsafe { self.list.as_mut() };
        tracing::trace!(len = list.len, spliced = other.len, "[list]: splice");
        unsafe { ring::splice_before(other.ghost, self.node) };
        list.len += mem::take(&mut other.len);
        list.check();
        other.check();
    }

    /// Borrow this cursor as a read-only cursor at the same position.
    pub fn as_read_only(&self) -> Cursor<'_, T, A, ReadOnly> {
        Cursor {
            node: self.node,
            list: self.list,
            _marker: PhantomData,
        }
    }
}

impl<'a, T, A: Allocator, M: Access> Cursor<'a, T, A, M> {
    /// Move to the next position. Moving from the last element reaches the end position, moving
    /// from the end position reaches the first element.
    pub fn move_next(&mut self) {
        self.node = unsafe { ring::next(self.node) };
    }

    /// Move to the previous position. Moving from the first element reaches the end position,
    /// moving from the end position reaches the last element.
    pub fn move_prev(&mut self) {
        self.node = unsafe { ring::prev(self.node) };
    }

    /// Check if the cursor is at the end position.
    pub fn is_end(&self) -> bool {
        self.node == self.list().ghost
    }

    /// Get the element after the cursor without moving.
    pub fn peek_next(&self) -> Option<&T> {
        let link = unsafe { ring::next(self.node) };
        (link != self.list().ghost).then(|| unsafe { Node::value(link) })
    }

    /// Get the element before the cursor without moving.
    pub fn peek_prev(&self) -> Option<&T> {
        let link = unsafe { ring::prev(self.node) };
        (link != self.list().ghost).then(|| unsafe { Node::value(link) })
    }

    fn list(&self) -> &List<T, A> {
        unsafe { self.list.as_ref() }
    }

    /// # Safety
    ///
    /// The caller picks a lifetime no longer than the element's borrow.
    unsafe fn value<'b>(&self) -> Option<&'b T> {
        (!self.is_end()).then(|| Node::value(self.node))
    }
}

impl<T, A: Allocator> Clone for Cursor<'_, T, A, ReadOnly> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, A: Allocator> Copy for Cursor<'_, T, A, ReadOnly> {}

impl<'a, T, A: Allocator> From<Cursor<'a, T, A, Mutable>> for Cursor<'a, T, A, ReadOnly> {
    fn from(cursor: Cursor<'a, T, A, Mutable>) -> Self {
        Self {
            node: cursor.node,
            list: cursor.list,
            _marker: PhantomData,
        }
    }
}

impl<'a, 'b, T, A: Allocator, M1: Access, M2: Access> PartialEq<Cursor<'b, T, A, M2>> for Cursor<'a, T, A, M1> {
    fn eq(&self, other: &Cursor<'b, T, A, M2>) -> bool {
        self.node == other.node
    }
}

impl<T, A: Allocator, M: Access> Eq for Cursor<'_, T, A, M> {}

impl<T: Debug, A: Allocator, M: Access> Debug for Cursor<'_, T, A, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Cursor").field(&unsafe { self.value() }).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::iter;

    use itertools::Itertools;

    use super::*;

    #[test]
    fn test_cursor_walk() {
        let l = List::from([1, 2, 3]);
        let mut c = l.cursor_front();
        assert_eq!(c.current(), Some(&1));
        assert_eq!(c.peek_prev(), None);
        c.move_next();
        c.move_next();
        assert_eq!(c.current(), Some(&3));
        assert_eq!(c.peek_next(), None);
        c.move_next();
        assert!(c.is_end());
        assert_eq!(c.current(), None);
        assert_eq!(c, l.cursor_end());
        c.move_next();
        assert_eq!(c, l.cursor_front());
        c.move_prev();
        c.move_prev();
        assert_eq!(c.current(), Some(&3));

        let copy = c;
        assert_eq!(copy, c);
        assert_eq!(format!("{copy:?}"), "Cursor(Some(3))");
    }

    #[test]
    fn test_cursor_identity_not_value() {
        let l = List::from([7, 7]);
        let a = l.cursor_front();
        let mut b = l.cursor_front();
        b.move_next();
        assert_eq!(a.current(), b.current());
        assert_ne!(a, b);
    }

    #[test]
    fn test_cursor_empty_list() {
        let mut l = List::<u8>::new();
        assert!(l.cursor_front().is_end());
        assert_eq!(l.cursor_front(), l.cursor_end());

        let mut c = l.cursor_end_mut();
        assert_eq!(c.remove(), None);
        assert_eq!(c.current_mut(), None);
        c.move_next();
        assert!(c.is_end());
    }

    #[test]
    fn test_cursor_mut_edit() {
        let mut l = List::from([1, 3, 5]);
        let mut c = l.cursor_front_mut();
        c.move_next();
        assert_eq!(*c.insert_before(2), 2);
        assert_eq!(c.current(), Some(&3));
        *c.current_mut().unwrap() = 30;
        c.move_next();
        assert_eq!(c.insert_many_before([4, 4]), 2);
        assert_eq!(c.remove(), Some(5));
        assert!(c.is_end());
        assert_eq!(l.iter().copied().collect_vec(), vec![1, 2, 30, 4, 4]);
        assert!(l.is_ring_consistent());
    }

    #[test]
    fn test_cursor_insert_many_keeps_position() {
        let mut l = List::from([1, 5]);
        let mut c = l.cursor_front_mut();
        c.move_next();
        assert_eq!(c.insert_many_before([2, 3, 4]), 3);
        assert_eq!(c.current(), Some(&5));
        c.move_prev();
        assert_eq!(c.current(), Some(&4));

        let mut c = l.cursor_end_mut();
        assert_eq!(c.insert_many_before(iter::empty()), 0);
        assert!(c.is_end());
        assert_eq!(l.iter().copied().collect_vec(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_cursor_remove_n() {
        let mut l = (0..6).collect::<List<_>>();
        let mut c = l.cursor_at_mut(4).unwrap();
        assert_eq!(c.remove_n(10), 2);
        assert!(c.is_end());
        assert_eq!(l.len(), 4);
    }

    #[test]
    fn test_cursor_try_insert() {
        let mut l = List::from([1]);
        let mut c = l.cursor_end_mut();
        assert!(c.try_insert_before_with(|| anyhow::bail!("refused")).is_err());
        assert_eq!(*c.try_insert_before_with(|| Ok(2)).unwrap(), 2);
        assert_eq!(l.iter().copied().collect_vec(), vec![1, 2]);
    }

    #[test]
    fn test_cursor_splice() {
        let mut l = List::from([1, 4]);
        let mut other = List::from([2, 3]);
        let mut c = l.cursor_front_mut();
        c.move_next();
        c.splice_before(&mut other);
        assert_eq!(c.current(), Some(&4));
        assert!(other.is_empty());
        assert!(other.is_ring_consistent());
        assert_eq!(l.iter().copied().collect_vec(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_cursor_read_only_conversion() {
        let mut l = List::from([1, 2]);
        let mut c = l.cursor_front_mut();
        c.move_next();
        {
            let r = c.as_read_only();
            assert_eq!(r.current(), Some(&2));
            assert_eq!(r, c);
        }
        let mut r: Cursor<'_, i32> = c.into();
        assert_eq!(r.current(), Some(&2));
        r.move_prev();
        assert_eq!(r.current(), Some(&1));
    }
}
