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

use crate::Sequence;

/// LIFO adapter over a [`Sequence`]. The top of the stack is the back of the container.
pub struct Stack<T, S = List<T>> {
    inner: S,
    _marker: PhantomData<T>,
}

impl<T, S> Stack<T, S>
where
    S: Sequence<Item = T>,
{
    /// Create an empty stack.
    pub fn new() -> Self
    where
        S: Default,
    {
        Self::from_container(S::default())
    }

    /// Adopt `inner` as the backing container. Its last element becomes the top.
    pub fn from_container(inner: S) -> Self {
        Self {
            inner,
            _marker: PhantomData,
        }
    }

    /// Get the reference of the top element.
    pub fn top(&self) -> Option<&T> {
        self.inner.back()
    }

    /// Push an element on top.
    pub fn push(&mut self, value: T) {
        self.inner.push_back(value);
    }

    /// Pop the top element.
    pub fn pop(&mut self) -> Option<T> {
        self.inner.pop_back()
    }

    /// Get the element count.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if the stack holds no element.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Exchange the contents of two stacks.
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

impl<T, S> Default for Stack<T, S>
where
    S: Sequence<Item = T> + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S: Clone> Clone for Stack<T, S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T, S: PartialEq> PartialEq for Stack<T, S> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T, S: Eq> Eq for Stack<T, S> {}

impl<T, S: Debug> Debug for Stack<T, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Stack").field(&self.inner).finish()
    }
}

impl<T, S> From<S> for Stack<T, S>
where
    S: Sequence<Item = T>,
{
    fn from(inner: S) -> Self {
        Self::from_container(inner)
    }
}

/// Elements are pushed in iteration order, so the last yielded element ends up on top.
impl<T, S> FromIterator<T> for Stack<T, S>
where
    S: Sequence<Item = T> + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut stack = Self::new();
        iter.into_iter().for_each(|value| stack.push(value));
        stack
    }
}

impl<T, S> Extend<T> for Stack<T, S>
where
    S: Sequence<Item = T>,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        iter.into_iter().for_each(|value| self.push(value));
    }
}
