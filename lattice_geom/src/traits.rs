// Copyright 2025 the Lattice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collaborator traits: how surrounding geometry exposes positions and bounds.

use crate::aabb::Aabb;
use crate::point::Point;
use crate::scalar::Scalar;
use crate::shapes::{Segment, Sphere, Triangle};

/// A value with a single position, such as a mesh vertex.
pub trait Positioned<T: Scalar, const D: usize> {
    /// Position of the value.
    fn position(&self) -> Point<T, D>;
}

/// A value with an axis-aligned bounding box, such as a mesh face.
pub trait Bounded<T: Scalar, const D: usize> {
    /// Axis-aligned bounds of the value.
    fn bounding_box(&self) -> Aabb<T, D>;
}

impl<T: Scalar, const D: usize> Positioned<T, D> for Point<T, D> {
    fn position(&self) -> Point<T, D> {
        *self
    }
}

impl<T: Scalar, const D: usize, V: Positioned<T, D> + ?Sized> Positioned<T, D> for &V {
    fn position(&self) -> Point<T, D> {
        (**self).position()
    }
}

impl<T: Scalar, const D: usize, V: Positioned<T, D> + ?Sized> Positioned<T, D> for Box<V> {
    fn position(&self) -> Point<T, D> {
        (**self).position()
    }
}

impl<T: Scalar, const D: usize> Bounded<T, D> for Point<T, D> {
    fn bounding_box(&self) -> Aabb<T, D> {
        Aabb::from_point(*self)
    }
}

impl<T: Scalar, const D: usize> Bounded<T, D> for Aabb<T, D> {
    fn bounding_box(&self) -> Aabb<T, D> {
        *self
    }
}

impl<T: Scalar, const D: usize> Bounded<T, D> for Sphere<T, D> {
    fn bounding_box(&self) -> Aabb<T, D> {
        Self::bounding_box(self)
    }
}

impl<T: Scalar, const D: usize> Bounded<T, D> for Triangle<T, D> {
    fn bounding_box(&self) -> Aabb<T, D> {
        Self::bounding_box(self)
    }
}

impl<T: Scalar, const D: usize> Bounded<T, D> for Segment<T, D> {
    fn bounding_box(&self) -> Aabb<T, D> {
        Self::bounding_box(self)
    }
}

impl<T: Scalar, const D: usize, V: Bounded<T, D> + ?Sized> Bounded<T, D> for &V {
    fn bounding_box(&self) -> Aabb<T, D> {
        (**self).bounding_box()
    }
}

impl<T: Scalar, const D: usize, V: Bounded<T, D> + ?Sized> Bounded<T, D> for Box<V> {
    fn bounding_box(&self) -> Aabb<T, D> {
        (**self).bounding_box()
    }
}
