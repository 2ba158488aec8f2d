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
    alloc::Layout,
    fmt::Debug,
    hash::Hash,
    ops::{Deref, DerefMut, Range},
};

use allocator_api2::{
    alloc::{Allocator, Global},
    vec::{IntoIter, Vec},
};
use strand_common::{strict_assert, Error, Result};

/// A contiguous growable array with an explicit growth policy.
pub struct Vector<T, A: Allocator = Global> {
    buf: Vec<T, A>,
}

impl<T> Vector<T> {
    /// Create an empty vector without allocating.
    pub fn new() -> Self {
        Self::new_in(Global)
    }

    /// Create an empty vector with exactly `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_in(capacity, Global)
    }
}

impl<T, A: Allocator> Vector<T, A> {
    /// Create an empty vector backed by `alloc` without allocating.
    pub fn new_in(alloc: A) -> Self {
        Self { buf: Vec::new_in(alloc) }
    }

    /// Create an empty vector backed by `alloc` with exactly `capacity` slots.
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Self {
        let mut vector = Self::new_in(alloc);
        vector.reserve(capacity);
        vector
    }

    /// Get the element count.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check if the vector holds no element.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Get the count of elements the vector holds without reallocating.
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Upper bound of the element count imposed by the element size.
    pub fn max_len(&self) -> usize {
        match std::mem::size_of::<T>() {
            0 => usize::MAX,
            size => isize::MAX as usize / size,
        }
    }

    /// Get the allocator backing the vector.
    pub fn allocator(&self) -> &A {
        self.buf.allocator()
    }

    /// Grow the capacity to exactly `capacity` if it is smaller. Never shrinks.
    pub fn reserve(&mut self, capacity: usize) {
        self.try_reserve(capacity).unwrap_or_else(|e| e.handle());
    }

    /// Fallible [`Vector::reserve`]. On failure the vector is unchanged.
    pub fn try_reserve(&mut self, capacity: usize) -> Result<()> {
        let old = self.capacity();
        if capacity <= old {
            return Ok(());
        }
        self.buf.try_reserve_exact(capacity - self.len()).map_err(|_| {
            match Layout::array::<T>(capacity) {
                Ok(layout) => Error::alloc(layout),
                Err(_) => Error::CapacityOverflow,
            }
        })?;
        tracing::trace!(from = old, to = self.capacity(), "[vector]: reallocate");
        Ok(())
    }

    /// Release unused capacity, reallocating to exactly [`Vector::len`] slots.
    pub fn shrink_to_fit(&mut self) {
        if self.capacity() > self.len() {
            tracing::trace!(from = self.capacity(), to = self.len(), "[vector]: shrink");
            self.buf.shrink_to_fit();
        }
    }

    /// Append an element, growing 0 → 1 → 2 → 4 → ... when full.
    pub fn push_back(&mut self, value: T) {
        self.grow().unwrap_or_else(|e| e.handle());
        self.buf.push(value);
    }

    /// Fallible [`Vector::push_back`]. On failure the vector is unchanged and `value` is dropped.
    pub fn try_push_back(&mut self, value: T) -> Result<()> {
        self.grow()?;
        self.buf.push(value);
        Ok(())
    }

    /// Remove the last element.
    pub fn pop_back(&mut self) -> Option<T> {
        self.buf.pop()
    }

    /// Insert `value` at `index`, shifting the tail. `index == len` appends.
    pub fn insert(&mut self, index: usize, value: T) -> Result<()> {
        if index > self.len() {
            return Err(Error::out_of_range(index, self.len()));
        }
        self.grow()?;
        self.buf.insert(index, value);
        Ok(())
    }

    /// Remove and return the element at `index`, shifting the tail.
    pub fn erase(&mut self, index: usize) -> Result<T> {
        if index >= self.len() {
            return Err(Error::out_of_range(index, self.len()));
        }
        Ok(self.buf.remove(index))
    }

    /// Remove the elements in `range`, returning how many were removed.
    pub fn erase_range(&mut self, range: Range<usize>) -> Result<usize> {
        if range.start > range.end || range.end > self.len() {
            return Err(Error::out_of_range(range.end.max(range.start), self.len()));
        }
        let n = range.len();
        self.buf.drain(range);
        Ok(n)
    }

    /// Get the element at `index`, reporting out-of-range access.
    pub fn at(&self, index: usize) -> Result<&T> {
        let len = self.len();
        self.buf.get(index).ok_or(Error::out_of_range(index, len))
    }

    /// Get the mutable element at `index`, reporting out-of-range access.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        let len = self.len();
        self.buf.get_mut(index).ok_or(Error::out_of_range(index, len))
    }

    /// Get the reference of the first element.
    pub fn front(&self) -> Option<&T> {
        self.buf.first()
    }

    /// Get the reference of the last element.
    pub fn back(&self) -> Option<&T> {
        self.buf.last()
    }

    /// Remove all elements, keeping the capacity.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Exchange the contents, capacity and allocator of two vectors in O(1).
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(&mut self.buf, &mut other.buf);
    }

    /// View the elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        self.buf.as_slice()
    }

    /// View the elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.buf.as_mut_slice()
    }

    fn grow(&mut self) -> Result<()> {
        if self.len() < self.capacity() {
            return Ok(());
        }
        let target = match self.capacity() {
            0 => 1,
            capacity => capacity.checked_mul(2).ok_or(Error::CapacityOverflow)?,
        };
        self.try_reserve(target)?;
        strict_assert!(self.len() < self.capacity());
        Ok(())
    }
}

impl<T> Default for Vector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, A: Allocator> Deref for Vector<T, A> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T, A: Allocator> DerefMut for Vector<T, A> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

/// Copies have exactly as many slots as elements.
impl<T: Clone, A: Allocator + Clone> Clone for Vector<T, A> {
    fn clone(&self) -> Self {
        let mut vector = Self::with_capacity_in(self.len(), self.allocator().clone());
        vector.buf.extend_from_slice(self);
        vector
    }
}

impl<T: Debug, A: Allocator> Debug for Vector<T, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, A: Allocator> PartialEq for Vector<T, A> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, A: Allocator> Eq for Vector<T, A> {}

impl<T: Hash, A: Allocator> Hash for Vector<T, A> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T, A: Allocator> Extend<T> for Vector<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        self.reserve(self.len().saturating_add(lower));
        for value in iter {
            self.push_back(value);
        }
    }
}

/// Exact-size sources produce a vector with exactly as many slots as elements.
impl<T> FromIterator<T> for Vector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut vector = Self::new();
        vector.extend(iter);
        vector
    }
}

impl<T, const N: usize> From<[T; N]> for Vector<T> {
    fn from(arr: [T; N]) -> Self {
        Self::from_iter(arr)
    }
}

impl<T: Clone> From<&[T]> for Vector<T> {
    fn from(slice: &[T]) -> Self {
        let mut vector = Self::with_capacity(slice.len());
        vector.buf.extend_from_slice(slice);
        vector
    }
}

impl<T, A: Allocator> IntoIterator for Vector<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.buf.into_iter()
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a Vector<T, A> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a mut Vector<T, A> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
