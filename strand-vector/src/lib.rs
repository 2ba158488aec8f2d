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

//! Dynamic array for strand.
//!
//! [`Vector`] keeps an observable, exact capacity: it grows from 0 to 1 and then doubles, and
//! `reserve`/`shrink_to_fit` allocate exactly what they are asked for. Reallocation moves elements
//! bitwise, so it either fully succeeds or leaves the vector untouched.

mod vector;

pub use vector::Vector;
