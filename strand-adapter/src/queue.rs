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

use std::{fmt::Debug, marker::PhantomData};

use strand_list::List;

use crate::FrontSequence;

/// FIFO adapter over a [`FrontSequence`]. Elements enter at the back and leave from the front.
pub struct Queue<T, S = List<T>> {
    inner: S,
    _marker: PhantomData<T>,
}

impl<T, S> Queue<T, S>
where
    S: FrontSequence<Item = T>,
{
    /// Create an empty queue.
    pub fn new() -> Self
    where
        S: Default,
    {
        Self::from_container(S::default())
    }

    /// Adopt `inner` as the backing container. Its first element is the next to leave.
    pub fn from_container(inner: S) -> Self {
        Self {
            inner,
            _marker: PhantomData,
        }
    }

    /// Get the reference of the oldest element.
    pub fn front(&self) -> Option<&T> {
        self.inner.front()
    }

    /// Get the reference of the newest element.
    pub fn back(&self) -> Option<&T> {
        self.inner.back()
    }

    /// Enqueue an element at the back.
    pub fn push(&mut self, value: T) {
        self.inner.push_back(value);
    }

    /// Dequeue the oldest element.
    pub fn pop(&mut self) -> Option<T> {
        self.inner.pop_front()
    }

    /// Get the element count.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if the queue holds no element.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Exchange the contents of two queues.
    pub fn swap(&mut self, other: &mut Self) {
        self.inner.swap_with(&mut other.inner);
    }

    /// Get the backing container.
    pub fn as_inner(&self) -> &S {
        &self.inner
    }

    /// Give back the backing container.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<T, S> Default for Queue<T, S>
where
    S: FrontSequence<Item = T> + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S: Clone> Clone for Queue<T, S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T, S: PartialEq> PartialEq for Queue<T, S> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T, S: Eq> Eq for Queue<T, S> {}

impl<T, S: Debug> Debug for Queue<T, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Queue").field(&self.inner).finish()
    }
}

impl<T, S> From<S> for Queue<T, S>
where
    S: FrontSequence<Item = T>,
{
    fn from(inner: S) -> Self {
        Self::from_container(inner)
    }
}

impl<T, S> FromIterator<T> for Queue<T, S>
where
    S: FrontSequence<Item = T> + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut queue = Self::new();
        iter.into_iter().for_each(|value| queue.push(value));
        queue
    }
}

impl<T, S> Extend<T> for Queue<T, S>
where
    S: FrontSequence<Item = T>,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        iter.into_iter().for_each(|value| self.push(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn test_fifo() {
        let mut q: Queue<&str> = ["a", "b"].into_iter().collect();
        q.push("c");
        assert_eq!((q.front(), q.back()), (Some(&"a"), Some(&"c")));
        assert_eq!(q.pop(), Some("a"));
        assert_eq!(q.pop(), Some("b"));
        assert_eq!(q.len(), 1);
        assert_eq!(q.pop(), Some("c"));
        assert_eq!(q.pop(), None);
        assert!(q.is_empty());
    }

    #[test]
    fn test_from_container() {
        let q = Queue::from(List::from([7, 8]));
        assert_eq!(q.front(), Some(&7));
        assert_eq!(format!("{q:?}"), "Queue([7, 8])");
        assert_eq!(q.into_inner().len(), 2);
    }
}
