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

use std::{fmt::Debug, iter::FusedIterator, marker::PhantomData, ptr::NonNull};

use allocator_api2::alloc::{Allocator, Global};

use crate::{
    list::List,
    ring::{self, Link},
    store::Node,
};

/// Element reference iterator of a [`List`].
pub struct Iter<'a, T> {
    head: NonNull<Link>,
    tail: NonNull<Link>,
    len: usize,
    _marker: PhantomData<&'a T>,
}

impl<T> Iter<'_, T> {
    pub(crate) fn new(head: NonNull<Link>, tail: NonNull<Link>, len: usize) -> Self {
        Self {
            head,
            tail,
            len,
            _marker: PhantomData,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        let link = self.head;
        unsafe {
            self.head = ring::next(link);
            Some(Node::value(link))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        let link = self.tail;
        unsafe {
            self.tail = ring::prev(link);
            Some(Node::value(link))
        }
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self { ..*self }
    }
}

impl<T: Debug> Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Iter").field(&self.len).finish()
    }
}

/// Element mutable reference iterator of a [`List`].
pub struct IterMut<'a, T> {
    head: NonNull<Link>,
    tail: NonNull<Link>,
    len: usize,
    _marker: PhantomData<&'a mut T>,
}

impl<T> IterMut<'_, T> {
    pub(crate) fn new(head: NonNull<Link>, tail: NonNull<Link>, len: usize) -> Self {
        Self {
            head,
            tail,
            len,
            _marker: PhantomData,
        }
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        let link = self.head;
        unsafe {
            self.head = ring::next(link);
            Some(Node::value_mut(link))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<T> DoubleEndedIterator for IterMut<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        let link = self.tail;
        unsafe {
            self.tail = ring::prev(link);
            Some(Node::value_mut(link))
        }
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}
impl<T> FusedIterator for IterMut<'_, T> {}

impl<T: Debug> Debug for IterMut<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("IterMut").field(&self.len).finish()
    }
}

/// Owning iterator of a [`List`].
pub struct IntoIter<T, A: Allocator = Global> {
    list: List<T, A>,
}

impl<T, A: Allocator> IntoIter<T, A> {
    pub(crate) fn new(list: List<T, A>) -> Self {
        Self { list }
    }
}

impl<T, A: Allocator> Iterator for IntoIter<T, A> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.list.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len(), Some(self.list.len()))
    }
}

impl<T, A: Allocator> DoubleEndedIterator for IntoIter<T, A> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.list.pop_back()
    }
}

impl<T, A: Allocator> ExactSizeIterator for IntoIter<T, A> {}
impl<T, A: Allocator> FusedIterator for IntoIter<T, A> {}

impl<T: Debug, A: Allocator> Debug for IntoIter<T, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("IntoIter").field(&self.list).finish()
    }
}

unsafe impl<T: Sync> Send for Iter<'_, T> {}
unsafe impl<T: Sync> Sync for Iter<'_, T> {}
unsafe impl<T: Send> Send for IterMut<'_, T> {}
unsafe impl<T: Sync> Sync for IterMut<'_, T> {}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;

    #[test]
    fn test_iter_both_ends() {
        let l = (1..=5).collect::<List<_>>();
        let mut it = l.iter();
        assert_eq!(it.len(), 5);
        assert_eq!(it.next(), Some(&1));
        assert_eq!(it.next_back(), Some(&5));
        assert_eq!(it.clone().copied().collect_vec(), vec![2, 3, 4]);
        assert_eq!(it.next_back(), Some(&4));
        assert_eq!(it.next(), Some(&2));
        assert_eq!(it.next(), Some(&3));
        assert_eq!(it.next(), None);
        assert_eq!(it.next_back(), None);
    }

    #[test]
    fn test_iter_mut() {
        let mut l = (1..=4).collect::<List<_>>();
        l.iter_mut().rev().for_each(|v| *v *= 10);
        assert_eq!(l.iter().copied().collect_vec(), vec![10, 20, 30, 40]);
    }

    #[test]
    fn test_into_iter() {
        let l = List::from(["a".to_string(), "b".to_string(), "c".to_string()]);
        let mut it = l.into_iter();
        assert_eq!(it.next_back().as_deref(), Some("c"));
        assert_eq!(it.len(), 2);
        assert_eq!(it.collect_vec(), vec!["a", "b"]);
    }
}
