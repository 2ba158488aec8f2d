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

//! A doubly linked list built on a sentinel ring.
//!
//! The list keeps one sentinel node plus one node per element in a closed, circular, doubly
//! linked ring. The sentinel is the end position: its `next` is the first element and its `prev`
//! the last one. Every structural edit (insertion, removal, transfer between lists) is one of two
//! O(1) ring primitives, hook-before and unhook, so merge, splice, reverse and sort relink nodes
//! and never move elements.
//!
//! Node memory goes through an injected [`Allocator`](allocator_api2::alloc::Allocator), the
//! element lifecycle policy of the list.
//!
//! ```
//! use strand_list::List;
//!
//! let mut a = List::from([1, 3, 5]);
//! let mut b = List::from([2, 4]);
//! a.merge(&mut b);
//! assert!(b.is_empty());
//! assert_eq!(a.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
//!
//! let mut cursor = a.cursor_front_mut();
//! cursor.move_next();
//! assert_eq!(cursor.remove(), Some(2));
//! assert_eq!(cursor.current(), Some(&3));
//! ```

mod cursor;
mod iter;
mod list;
mod ordering;
mod ring;
mod store;

pub use cursor::{Access, Cursor, CursorMut, Mutable, ReadOnly};
pub use iter::{IntoIter, Iter, IterMut};
pub use list::List;
