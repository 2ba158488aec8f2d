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

//! Stack and queue adapters for strand.
//!
//! Both adapters are generic over any container implementing the [`Sequence`] contract, with
//! [`strand_list::List`] as the default backing.

mod queue;
mod sequence;
mod stack;

pub use queue::Queue;
pub use sequence::{FrontSequence, Sequence};
pub use stack::Stack;
