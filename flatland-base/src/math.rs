//! Mathematical utilities and decisions.

use euclid::{Point2D, Vector2D};

mod angle;
pub use angle::*;
mod layers;
pub use layers::*;
mod restricted_number;
pub use restricted_number::*;
#[cfg(feature = "serde")]
mod serde_impls;

/// Coordinates that are not locked to any grid.
pub type FreeCoordinate = f64;

/// Unit-of-measure type for the world plane in which all bodies live.
///
/// This is used only as a type parameter of [`euclid`] types, to keep plane coordinates
/// from being confused with anything else that happens to be a pair of numbers.
#[expect(clippy::exhaustive_enums)]
#[derive(Debug, Eq, PartialEq)]
pub enum Plane {}

/// Position in the plane, in world units.
pub type FreePoint = Point2D<FreeCoordinate, Plane>;

/// Displacement, velocity, force, or other vector quantity in the plane.
pub type FreeVector = Vector2D<FreeCoordinate, Plane>;

/// Rotate `vector` counterclockwise by `angle`.
#[inline]
pub fn rotate(vector: FreeVector, angle: Angle) -> FreeVector {
    let (sin, cos) = angle.sin_cos();
    FreeVector::new(vector.x * cos - vector.y * sin, vector.x * sin + vector.y * cos)
}

/// Rotate `vector` clockwise by `angle`; the inverse of [`rotate()`].
#[inline]
pub fn unrotate(vector: FreeVector, angle: Angle) -> FreeVector {
    let (sin, cos) = angle.sin_cos();
    FreeVector::new(vector.x * cos + vector.y * sin, -vector.x * sin + vector.y * cos)
}

/// Returns `vector` rotated a quarter turn counterclockwise.
///
/// This is the direction in which a point at offset `vector` from a center of rotation
/// moves when the rotation is positive.
#[inline]
pub fn perp(vector: FreeVector) -> FreeVector {
    FreeVector::new(-vector.y, vector.x)
}

/// Returns the cosine of the angle between `a` and `b`, or zero if either is zero-length.
#[inline]
pub fn cosine_between(a: FreeVector, b: FreeVector) -> FreeCoordinate {
    let denominator = (a.square_length() * b.square_length()).sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        0.0
    } else {
        a.dot(b) / denominator
    }
}

/// Returns `vector` scaled to unit length, or [`None`] if it has zero or non-finite length.
#[inline]
pub fn normalize_or_none(vector: FreeVector) -> Option<FreeVector> {
    let length = vector.length();
    if length > 0.0 && length.is_finite() {
        Some(vector / length)
    } else {
        None
    }
}
