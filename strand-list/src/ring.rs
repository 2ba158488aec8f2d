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

//! Sentinel ring primitives.
//!
//! A ring is one sentinel [`Link`] plus any number of value node links, closed in both directions.
//! Every structural edit of a list reduces to [`hook_before`] and [`unhook`].
//!
//! ```text
//!      ┌──────────────────────────────────────────────┐
//!      ▼                                              │
//! ┌────────┬──►┌────────┬──►┌────────┬──►┌────────┐  │
//! │sentinel│   │ node 0 │   │ node 1 │   │ node 2 ├──┘
//! └─┬──────┘◄──┴────────┘◄──┴────────┘◄──┴────────┘
//!   │                                         ▲
//!   └─────────────────────────────────────────┘
//! ```
//!
//! All functions here are `unsafe`: callers must pass pointers to live, initialized links.

use std::{mem, ptr::NonNull};

/// Back and forward links of a ring member.
///
/// Value nodes place a `Link` at offset zero, so a node pointer and its link pointer are the same.
pub(crate) struct Link {
    prev: NonNull<Link>,
    next: NonNull<Link>,
}

/// Self-link `link`, making it a ring of one.
///
/// # Safety
///
/// `link` must be valid for writes.
pub(crate) unsafe fn init(link: NonNull<Link>) {
    link.as_ptr().write(Link { prev: link, next: link });
}

/// # Safety
///
/// `link` must be a live ring member.
#[inline]
pub(crate) unsafe fn next(link: NonNull<Link>) -> NonNull<Link> {
    (*link.as_ptr()).next
}

/// # Safety
///
/// `link` must be a live ring member.
#[inline]
pub(crate) unsafe fn prev(link: NonNull<Link>) -> NonNull<Link> {
    (*link.as_ptr()).prev
}

/// Check if `link` is a ring of one.
///
/// # Safety
///
/// `link` must be a live ring member.
#[inline]
pub(crate) unsafe fn is_alone(link: NonNull<Link>) -> bool {
    next(link) == link
}

/// Insert `link` immediately before `target`.
///
/// # Sketch
///
/// ```text
/// ┌────┬──►┌────┬──►┌──────┐
/// │prev│   │link│   │target│
/// └────┘◄──┴────┘◄──┴──────┘
/// ```
///
/// # Safety
///
/// `link` must not be linked into any other ring (a ring of one is fine), `target` must be a live
/// ring member.
pub(crate) unsafe fn hook_before(link: NonNull<Link>, target: NonNull<Link>) {
    let before = prev(target);
    (*link.as_ptr()).next = target;
    (*link.as_ptr()).prev = before;
    (*before.as_ptr()).next = link;
    (*target.as_ptr()).prev = link;
}

/// Remove `link` from its ring and self-link it.
///
/// The remaining ring stays closed. Unhooking a ring of one is a no-op.
///
/// # Safety
///
/// `link` must be a live ring member.
pub(crate) unsafe fn unhook(link: NonNull<Link>) {
    let before = prev(link);
    let after = next(link);
    (*before.as_ptr()).next = after;
    (*after.as_ptr()).prev = before;
    init(link);
}

/// Move `link` to the position immediately before `target`, possibly across rings.
///
/// # Safety
///
/// Both links must be live ring members.
pub(crate) unsafe fn transfer_before(link: NonNull<Link>, target: NonNull<Link>) {
    if link == target {
        return;
    }
    unhook(link);
    hook_before(link, target);
}

/// Exchange the members of the rings headed by `a` and `b`.
///
/// Each sentinel is re-hooked in front of the other ring's first member, so the sentinels keep
/// their identity while the contents swap.
///
/// # Safety
///
/// `a` and `b` must be the sentinels of two distinct rings.
pub(crate) unsafe fn swap_rings(a: NonNull<Link>, b: NonNull<Link>) {
    let a_first = next(a);
    let b_first = next(b);
    unhook(a);
    unhook(b);
    if b_first != b {
        hook_before(a, b_first);
    }
    if a_first != a {
        hook_before(b, a_first);
    }
}

/// Move every member of the ring headed by `sentinel` to the position before `target` in O(1).
///
/// Four boundary links are re-pointed and `sentinel` is left as a ring of one.
///
/// # Safety
///
/// `sentinel` must head a ring that does not contain `target`.
pub(crate) unsafe fn splice_before(sentinel: NonNull<Link>, target: NonNull<Link>) {
    if is_alone(sentinel) {
        return;
    }
    let first = next(sentinel);
    let last = prev(sentinel);
    let before = prev(target);

    (*first.as_ptr()).prev = before;
    (*before.as_ptr()).next = first;
    (*last.as_ptr()).next = target;
    (*target.as_ptr()).prev = last;

    init(sentinel);
}

/// Reverse the traversal order of the ring headed by `sentinel` by swapping every member's links
/// in place, the sentinel's own links last.
///
/// # Safety
///
/// `sentinel` must be a live ring member.
pub(crate) unsafe fn reverse(sentinel: NonNull<Link>) {
    let mut link = next(sentinel);
    while link != sentinel {
        let after = next(link);
        let l = &mut *link.as_ptr();
        mem::swap(&mut l.prev, &mut l.next);
        link = after;
    }
    let s = &mut *sentinel.as_ptr();
    mem::swap(&mut s.prev, &mut s.next);
}

/// Walk the ring headed by `sentinel` and verify `n.next.prev == n` for every member, stepping at
/// most `limit + 1` times. Returns the number of members besides the sentinel if the ring closes.
///
/// # Safety
///
/// Every pointer reachable from `sentinel` must be a live link.
pub(crate) unsafe fn count(sentinel: NonNull<Link>, limit: usize) -> Option<usize> {
    let mut link = sentinel;
    let mut n = 0;
    loop {
        let after = next(link);
        if prev(after) != link {
            return None;
        }
        if after == sentinel {
            return Some(n);
        }
        if n == limit {
            return None;
        }
        n += 1;
        link = after;
    }
}
