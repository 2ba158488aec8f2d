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

//! Ordering algorithms. They only relink nodes through the ring primitives, elements never move
//! in memory.

use std::{
    iter,
    marker::PhantomData,
    mem::{self, MaybeUninit},
    ptr::NonNull,
};

use allocator_api2::alloc::Allocator;
use strand_common::{assert::OptionExt, strict_assert};

use crate::{
    list::List,
    ring::{self, Link},
    store::Node,
};

impl<T, A: Allocator> List<T, A> {
    /// Merge the ordered `other` into the ordered `self` under `<`. See [`List::merge_by`].
    pub fn merge(&mut self, other: &mut Self)
    where
        T: PartialOrd,
    {
        self.merge_by(other, |a, b| a < b);
    }

    /// Merge `other` into `self`, both ordered by `less`, without copying any element.
    ///
    /// An element of `other` is moved in front of the current element of `self` only if it is
    /// strictly less, so on ties the elements of `self` come first. When `self` is exhausted, the
    /// rest of `other` is spliced to the tail in O(1). `other` ends empty.
    ///
    /// If `less` panics, the elements moved so far stay in `self` and the rest stay in `other`.
    /// Both lists remain valid.
    ///
    /// Like [`CursorMut::splice_before`](crate::CursorMut::splice_before), the two lists must use
    /// allocators that can release each other's nodes.
    pub fn merge_by<F>(&mut self, other: &mut Self, mut less: F)
    where
        F: FnMut(&T, &T) -> bool,
    {
        tracing::trace!(len = self.len, merged = other.len, "[list]: merge");
        unsafe { merge_rings::<T, F>(self.ghost, &mut self.len, other.ghost, &mut other.len, &mut less) };
        self.check();
        other.check();
    }

    /// Sort under `<`. See [`List::sort_by`].
    pub fn sort(&mut self)
    where
        T: PartialOrd,
    {
        self.sort_by(|a, b| a < b);
    }

    /// Sort by the key extracted by `f` under `<`. See [`List::sort_by`].
    pub fn sort_by_key<K, F>(&mut self, mut f: F)
    where
        K: PartialOrd,
        F: FnMut(&T) -> K,
    {
        self.sort_by(|a, b| f(a) < f(b));
    }

    /// Stable sort where `less(a, b)` tells whether `a` goes before `b`.
    ///
    /// Bottom-up merge sort over O(log n) temporary rings: each element enters a carry ring and
    /// is merged upwards through bins of doubling size, then all bins are merged together. Equal
    /// elements keep their relative order.
    ///
    /// The temporary sentinels live on the stack, so sorting never allocates and works even when
    /// the list's allocator is exhausted.
    ///
    /// If `less` panics, every element is relinked into `self` before the panic propagates. The
    /// order is unspecified then, but no element is lost.
    pub fn sort_by<F>(&mut self, mut less: F)
    where
        F: FnMut(&T, &T) -> bool,
    {
        if self.len < 2 {
            return;
        }
        tracing::trace!(len = self.len, "[list]: sort");
        let mut slots = [const { MaybeUninit::<Link>::uninit() }; SLOTS];
        let mut sorter = Sorter::new(self, &mut slots);
        sorter.run(&mut less);
        drop(sorter);
        self.check();
    }

    /// Remove consecutive equal elements. See [`List::unique_by`].
    pub fn unique(&mut self) -> usize
    where
        T: PartialEq,
    {
        self.unique_by(|a, b| a == b)
    }

    /// Remove every element for which `same(kept, current)` holds, where `kept` is the closest
    /// preceding element that survived. The first element of each run survives. Returns the
    /// count of removed elements.
    pub fn unique_by<F>(&mut self, mut same: F) -> usize
    where
        F: FnMut(&T, &T) -> bool,
    {
        if self.len < 2 {
            return 0;
        }
        let mut removed = 0;
        unsafe {
            let mut kept = self.first();
            let mut link = ring::next(kept);
            while link != self.ghost {
                let after = ring::next(link);
                if same(Node::value(kept), Node::value(link)) {
                    drop(self.unlink(link));
                    removed += 1;
                } else {
                    kept = link;
                }
                link = after;
            }
        }
        self.check();
        removed
    }

    /// Reverse the order of the elements in O(n) without moving any element.
    pub fn reverse(&mut self) {
        unsafe { ring::reverse(self.ghost) };
        self.check();
    }

    /// Move every element of `other` to the back of `self` in O(1).
    pub fn append(&mut self, other: &mut Self) {
        self.cursor_end_mut().splice_before(other);
    }

    /// Move every element of `other` to the front of `self` in O(1).
    pub fn prepend(&mut self, other: &mut Self) {
        self.cursor_front_mut().splice_before(other);
    }
}

/// Merge the ring at `src` into the ring at `dst`, both ordered by `less`.
///
/// Counters move together with every relink, so both rings are consistent whenever `less` runs.
///
/// # Safety
///
/// `dst` and `src` must be sentinels of two distinct rings of `Node<T>`, with `dst_len` and
/// `src_len` their element counts.
unsafe fn merge_rings<T, F>(
    dst: NonNull<Link>,
    dst_len: &mut usize,
    src: NonNull<Link>,
    src_len: &mut usize,
    less: &mut F,
) where
    F: FnMut(&T, &T) -> bool,
{
    let mut first = ring::next(dst);
    let mut second = ring::next(src);
    while first != dst && second != src {
        if less(Node::value(second), Node::value(first)) {
            let after = ring::next(second);
            ring::transfer_before(second, first);
            *dst_len += 1;
            *src_len -= 1;
            second = after;
        } else {
            first = ring::next(first);
        }
    }
    if second != src {
        ring::splice_before(src, dst);
        *dst_len += mem::take(src_len);
    }
}

/// Bin `i` holds a run of `2^i` elements, so one bin per bit of `usize` covers any length.
const BINS: usize = usize::BITS as usize + 1;

/// Sentinel slots for the carry ring and every bin.
const SLOTS: usize = BINS + 1;

/// A temporary ring used by [`List::sort_by`].
struct Bin {
    ghost: NonNull<Link>,
    len: usize,
}

struct Sorter<'a, T, A: Allocator> {
    list: &'a mut List<T, A>,
    carry: Bin,
    bins: [Bin; BINS],
    /// Count of bins in use.
    fill: usize,
    _slots: PhantomData<&'a mut [MaybeUninit<Link>; SLOTS]>,
}

impl<'a, T, A: Allocator> Sorter<'a, T, A> {
    /// Self-link every slot and hand them out as sentinels. The slots stay borrowed, and thus in
    /// place, for as long as the sorter lives.
    fn new(list: &'a mut List<T, A>, slots: &'a mut [MaybeUninit<Link>; SLOTS]) -> Self {
        let base = NonNull::from(slots).cast::<Link>();
        let bin = |i: usize| unsafe {
            let ghost = base.add(i);
            ring::init(ghost);
            Bin { ghost, len: 0 }
        };
        Self {
            list,
            carry: bin(0),
            bins: std::array::from_fn(|i| bin(i + 1)),
            fill: 0,
            _slots: PhantomData,
        }
    }

    fn run<F>(&mut self, less: &mut F)
    where
        F: FnMut(&T, &T) -> bool,
    {
        unsafe {
            while self.list.len > 0 {
                ring::transfer_before(self.list.first(), self.carry.ghost);
                self.list.len -= 1;
                self.carry.len += 1;

                // Bins hold runs of doubling size, higher bins hold earlier elements.
                let mut i = 0;
                while i < self.fill && self.bins[i].len > 0 {
                    let bin = &mut self.bins[i];
                    merge_rings::<T, F>(bin.ghost, &mut bin.len, self.carry.ghost, &mut self.carry.len, less);
                    mem::swap(bin, &mut self.carry);
                    i += 1;
                }
                if i == self.fill {
                    strict_assert!(self.fill < BINS);
                    self.fill += 1;
                }
                mem::swap(&mut self.bins[i], &mut self.carry);
            }

            for i in 1..self.fill {
                let (lower, upper) = self.bins.split_at_mut(i);
                let (later, earlier) = (&mut lower[i - 1], &mut upper[0]);
                merge_rings::<T, F>(earlier.ghost, &mut earlier.len, later.ghost, &mut later.len, less);
            }

            let sorted = self.bins[..self.fill].last_mut().strict_unwrap_unchecked();
            ring::splice_before(sorted.ghost, self.list.ghost);
            self.list.len += mem::take(&mut sorted.len);
        }
    }
}

impl<T, A: Allocator> Drop for Sorter<'_, T, A> {
    fn drop(&mut self) {
        // Only non-empty after an unwinding comparator: return every node to the list.
        for bin in self.bins[..self.fill].iter_mut().rev().chain(iter::once(&mut self.carry)) {
            unsafe {
                ring::splice_before(bin.ghost, self.list.ghost);
                self.list.len += mem::take(&mut bin.len);
            }
        }
    }
}
