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

use std::alloc::Layout;

/// Errors reported by strand containers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Positional access beyond the current length.
    #[error("position {index} is out of range for length {len}")]
    OutOfRange {
        /// Requested position.
        index: usize,
        /// Length of the container at the time of the access.
        len: usize,
    },
    /// The element lifecycle policy failed to provide storage.
    #[error("failed to allocate {} bytes aligned to {}", .layout.size(), .layout.align())]
    Alloc {
        /// Layout of the rejected request.
        layout: Layout,
    },
    /// The requested capacity cannot be represented.
    #[error("capacity overflow")]
    CapacityOverflow,
    /// A caller supplied element constructor failed.
    #[error("element construction failed: {0}")]
    Construct(#[source] anyhow::Error),
}

impl Error {
    /// Build an [`Error::OutOfRange`].
    pub fn out_of_range(index: usize, len: usize) -> Self {
        Self::OutOfRange { index, len }
    }

    /// Build an [`Error::Alloc`] for the given layout.
    pub fn alloc(layout: Layout) -> Self {
        Self::Alloc { layout }
    }

    /// Diverge the same way std collections do when an infallible operation cannot allocate.
    ///
    /// Errors other than [`Error::Alloc`] are turned into a panic carrying their message.
    pub fn handle(self) -> ! {
        match self {
            Self::Alloc { layout } => std::alloc::handle_alloc_error(layout),
            e => panic!("{e}"),
        }
    }
}

/// Result type for strand containers.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::out_of_range(7, 4).to_string(),
            "position 7 is out of range for length 4"
        );
        assert_eq!(
            Error::alloc(Layout::new::<u64>()).to_string(),
            "failed to allocate 8 bytes aligned to 8"
        );

        let e = Error::Construct(anyhow::anyhow!("boom"));
        assert_eq!(e.to_string(), "element construction failed: boom");
        assert!(std::error::Error::source(&e).is_some());
    }
}
