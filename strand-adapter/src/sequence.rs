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

use allocator_api2::alloc::Allocator;
use strand_list::List;
use strand_vector::Vector;

/// Back-end contract of [`crate::Stack`].
pub trait Sequence {
    /// Element type.
    type Item;

    /// Get the element count.
    fn len(&self) -> usize;

    /// Check if the sequence holds no element.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the reference of the first element.
    fn front(&self) -> Option<&Self::Item>;

    /// Get the reference of the last element.
    fn back(&self) -> Option<&Self::Item>;

    /// Append an element.
    fn push_back(&mut self, item: Self::Item);

    /// Remove the last element.
    fn pop_back(&mut self) -> Option<Self::Item>;

    /// Exchange the contents of two sequences.
    fn swap_with(&mut self, other: &mut Self);
}

/// Back-end contract of [`crate::Queue`]: a [`Sequence`] that can also shrink from the front.
pub trait FrontSequence: Sequence {
    /// Remove the first element.
    fn pop_front(&mut self) -> Option<Self::Item>;
}

impl<T, A: Allocator> Sequence for List<T, A> {
    type Item = T;

    fn len(&self) -> usize {
        List::len(self)
    }

    fn is_empty(&self) -> bool {
        List::is_empty(self)
    }

    fn front(&self) -> Option<&T> {
        List::front(self)
    }

    fn back(&self) -> Option<&T> {
        List::back(self)
    }

    fn push_back(&mut self, item: T) {
        List::push_back(self, item);
    }

    fn pop_back(&mut self) -> Option<T> {
        List::pop_back(self)
    }

    fn swap_with(&mut self, other: &mut Self) {
        List::swap(self, other);
    }
}

impl<T, A: Allocator> FrontSequence for List<T, A> {
    fn pop_front(&mut self) -> Option<T> {
        List::pop_front(self)
    }
}

impl<T, A: Allocator> Sequence for Vector<T, A> {
    type Item = T;

    fn len(&self) -> usize {
        Vector::len(self)
    }

    fn is_empty(&self) -> bool {
        Vector::is_empty(self)
    }

    fn front(&self) -> Option<&T> {
        Vector::front(self)
    }

    fn back(&self) -> Option<&T> {
        Vector::back(self)
    }

    fn push_back(&mut self, item: T) {
        Vector::push_back(self, item);
    }

    fn pop_back(&mut self) -> Option<T> {
        Vector::pop_back(self)
    }

    fn swap_with(&mut self, other: &mut Self) {
        Vector::swap(self, other);
    }
}
