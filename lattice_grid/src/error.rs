// Copyright 2025 the Lattice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by fallible grid construction.

use thiserror::Error;

/// Rejected grid geometry.
///
/// Only the checked constructors ([`GridGeometry::try_new`] and
/// [`GridGeometry::try_with_resolution`]) return this; queries never fail.
///
/// [`GridGeometry::try_new`]: crate::GridGeometry::try_new
/// [`GridGeometry::try_with_resolution`]: crate::GridGeometry::try_with_resolution
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// A bounds coordinate is infinite or NaN.
    #[error("grid bounds must be finite")]
    NonFiniteBounds,
    /// `max < min` on an axis.
    #[error("grid bounds are inverted on axis {axis}")]
    InvertedBounds {
        /// Offending axis.
        axis: usize,
    },
    /// A requested cell count of zero.
    #[error("cell count on axis {axis} must be at least 1")]
    ZeroCellCount {
        /// Offending axis.
        axis: usize,
    },
    /// A requested cell size or cell target that is zero, negative, or not finite.
    #[error("cell size must be positive and finite")]
    InvalidCellSize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_axis() {
        assert_eq!(
            GridError::ZeroCellCount { axis: 2 }.to_string(),
            "cell count on axis 2 must be at least 1"
        );
        assert_eq!(
            GridError::InvertedBounds { axis: 0 }.to_string(),
            "grid bounds are inverted on axis 0"
        );
    }
}
