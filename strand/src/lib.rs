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

//! strand: sequence containers built around a sentinel-ring doubly-linked list.
//!
//! The [`List`] owns its nodes in a circular ring closed by a heap-allocated sentinel, which
//! makes splicing, merging and stable sorting relink nodes in place without moving elements.
//! [`Vector`] is a contiguous array with an exact growth policy, and [`Stack`]/[`Queue`] adapt
//! either container.
//!
//! ```
//! use strand::prelude::*;
//!
//! let mut odds = List::from([1, 3, 5]);
//! let mut evens = List::from([2, 4, 6]);
//! odds.merge(&mut evens);
//! assert_eq!(odds.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5, 6]);
//!
//! let mut stack: Stack<i32> = odds.into_iter().collect();
//! assert_eq!(stack.pop(), Some(6));
//! ```

/// Everything needed to work with strand containers.
pub mod prelude;

pub use prelude::*;
