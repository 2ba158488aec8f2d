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

//! Node store: memory and lifecycle of list nodes.
//!
//! The store owns the injected allocator and provides exactly the capabilities a list needs:
//! allocate, construct, destroy and deallocate. Nothing else in the crate touches node memory.

use std::{
    alloc::Layout,
    mem,
    ptr::{self, NonNull},
};

use allocator_api2::alloc::{Allocator, Global};
use strand_common::{Error, Result};

use crate::ring::{self, Link};

/// A value node. The link lives at offset zero so that node and link pointers coincide.
#[repr(C)]
pub(crate) struct Node<T> {
    link: Link,
    value: T,
}

impl<T> Node<T> {
    /// Get the element of the value node at `link`.
    ///
    /// # Safety
    ///
    /// `link` must point to a constructed value node, never to a sentinel. The caller picks a
    /// lifetime that does not outlive the node.
    #[inline]
    pub(crate) unsafe fn value<'a>(link: NonNull<Link>) -> &'a T {
        &*ptr::addr_of!((*link.cast::<Node<T>>().as_ptr()).value)
    }

    /// Mutable variant of [`Node::value`].
    ///
    /// # Safety
    ///
    /// See [`Node::value`]. The caller must also guarantee exclusive access to the element.
    #[inline]
    pub(crate) unsafe fn value_mut<'a>(link: NonNull<Link>) -> &'a mut T {
        &mut *ptr::addr_of_mut!((*link.cast::<Node<T>>().as_ptr()).value)
    }
}

/// Memory and lifecycle policy for the nodes of one list.
#[derive(Debug, Clone, Default)]
pub(crate) struct NodeStore<A: Allocator = Global> {
    alloc: A,
}

impl<A: Allocator> NodeStore<A> {
    pub(crate) fn new(alloc: A) -> Self {
        Self { alloc }
    }

    pub(crate) fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Allocate a self-linked sentinel.
    pub(crate) fn allocate_sentinel(&self) -> Result<NonNull<Link>> {
        let layout = Layout::new::<Link>();
        let link = self
            .alloc
            .allocate(layout)
            .map_err(|_| Error::alloc(layout))?
            .cast::<Link>();
        unsafe { ring::init(link) };
        Ok(link)
    }

    /// # Safety
    ///
    /// `sentinel` must come from [`NodeStore::allocate_sentinel`] of this store and must not be
    /// used afterwards.
    pub(crate) unsafe fn deallocate_sentinel(&self, sentinel: NonNull<Link>) {
        self.alloc.deallocate(sentinel.cast(), Layout::new::<Link>());
    }

    /// Allocate storage for a value node without constructing it.
    pub(crate) fn allocate<T>(&self) -> Result<NonNull<Node<T>>> {
        let layout = Layout::new::<Node<T>>();
        let node = self.alloc.allocate(layout).map_err(|_| Error::alloc(layout))?.cast();
        Ok(node)
    }

    /// Construct `value` into an allocated node and self-link it.
    ///
    /// # Safety
    ///
    /// `node` must come from [`NodeStore::allocate`] and must not hold a constructed element.
    pub(crate) unsafe fn construct<T>(&self, node: NonNull<Node<T>>, value: T) -> NonNull<Link> {
        ptr::addr_of_mut!((*node.as_ptr()).value).write(value);
        let link = node.cast::<Link>();
        ring::init(link);
        link
    }

    /// Move the element out of an unhooked node. The node storage stays allocated.
    ///
    /// # Safety
    ///
    /// `link` must point to a constructed value node that is no longer part of any list.
    pub(crate) unsafe fn destroy<T>(&self, link: NonNull<Link>) -> T {
        ptr::addr_of!((*link.cast::<Node<T>>().as_ptr()).value).read()
    }

    /// # Safety
    ///
    /// `node` must come from [`NodeStore::allocate`] of this store and hold no element.
    pub(crate) unsafe fn deallocate<T>(&self, node: NonNull<Node<T>>) {
        self.alloc.deallocate(node.cast(), Layout::new::<Node<T>>());
    }

    /// Allocate and construct a node holding `value`.
    pub(crate) fn create<T>(&self, value: T) -> Result<NonNull<Link>> {
        let node = self.allocate::<T>()?;
        Ok(unsafe { self.construct(node, value) })
    }

    /// Allocate a node, then construct its element in place with `f`.
    ///
    /// If `f` fails or unwinds, the node is released before the failure propagates.
    pub(crate) fn create_with<T, F>(&self, f: F) -> Result<NonNull<Link>>
    where
        F: FnOnce() -> anyhow::Result<T>,
    {
        let node = self.allocate::<T>()?;
        let guard = Release { store: self, node };
        let value = f().map_err(Error::Construct)?;
        mem::forget(guard);
        Ok(unsafe { self.construct(node, value) })
    }

    /// Destroy and deallocate an unhooked node, returning its element.
    ///
    /// # Safety
    ///
    /// See [`NodeStore::destroy`].
    pub(crate) unsafe fn release<T>(&self, link: NonNull<Link>) -> T {
        let value = self.destroy::<T>(link);
        self.deallocate::<T>(link.cast());
        value
    }
}

/// Deallocates a node whose element was never constructed.
struct Release<'a, T, A: Allocator> {
    store: &'a NodeStore<A>,
    node: NonNull<Node<T>>,
}

impl<T, A: Allocator> Drop for Release<'_, T, A> {
    fn drop(&mut self) {
        unsafe { self.store.deallocate(self.node) };
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{catch_unwind, AssertUnwindSafe};

    use super::*;

    #[test]
    fn test_create_release() {
        let store = NodeStore::new(Global);
        let link = store.create(String::from("strand")).unwrap();
        unsafe {
            assert!(ring::is_alone(link));
            assert_eq!(Node::<String>::value(link), "strand");
            Node::<String>::value_mut(link).push('s');
            assert_eq!(store.release::<String>(link), "strands");
        }
    }

    #[test]
    fn test_create_with_failure() {
        let store = NodeStore::new(Global);
        let res = store.create_with::<u64, _>(|| Err(anyhow::anyhow!("no")));
        assert!(matches!(res, Err(Error::Construct(_))));

        let res = catch_unwind(AssertUnwindSafe(|| store.create_with::<u64, _>(|| panic!("boom"))));
        assert!(res.is_err());
    }

    #[test]
    fn test_sentinel() {
        let store = NodeStore::<Global>::default();
        let sentinel = store.allocate_sentinel().unwrap();
        unsafe {
            assert_eq!(ring::count(sentinel, 0), Some(0));
            store.deallocate_sentinel(sentinel);
        }
    }
}
