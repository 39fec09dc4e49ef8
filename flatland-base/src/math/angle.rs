use core::f64::consts::{FRAC_PI_2, PI, TAU};
use core::fmt;
use core::ops;

use crate::math::{FreeCoordinate, FreeVector};

/// An orientation in the plane, measured counterclockwise from the +X axis.
///
/// The stored value is always in radians and within the half-open range `[0, 2π)`.
/// Every way of constructing or combining [`Angle`]s wraps the result back into that range,
/// so two angles describing the same orientation always compare equal.
#[derive(Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Angle(FreeCoordinate);

impl Angle {
    /// The angle of the +X axis.
    pub const ZERO: Self = Self(0.0);
    /// A quarter turn; the angle of the +Y axis.
    pub const HALF_PI: Self = Self(FRAC_PI_2);
    /// A half turn; the angle of the −X axis.
    pub const PI: Self = Self(PI);

    /// Constructs an [`Angle`] from any number of radians, wrapping it into `[0, 2π)`.
    ///
    /// Non-finite inputs produce [`Angle::ZERO`], since they have no meaningful orientation.
    #[inline]
    pub fn from_radians(radians: FreeCoordinate) -> Self {
        if !radians.is_finite() {
            return Self::ZERO;
        }
        let wrapped = radians.rem_euclid(TAU);
        // rem_euclid can round up to exactly TAU for tiny negative inputs.
        if wrapped >= TAU || wrapped <= 0.0 {
            Self::ZERO
        } else {
            Self(wrapped)
        }
    }

    /// Constructs an [`Angle`] from any number of degrees, wrapping it into `[0°, 360°)`.
    #[inline]
    pub fn from_degrees(degrees: FreeCoordinate) -> Self {
        Self::from_radians(degrees.to_radians())
    }

    /// Returns the direction of `vector`, or [`None`] if it has no direction.
    #[inline]
    pub fn of_vector(vector: FreeVector) -> Option<Self> {
        let finite = vector.x.is_finite() && vector.y.is_finite();
        if !finite || (vector.x == 0.0 && vector.y == 0.0) {
            None
        } else {
            Some(Self::from_radians(vector.y.atan2(vector.x)))
        }
    }

    /// Returns the angle in radians, in the range `[0, 2π)`.
    #[inline]
    pub const fn radians(self) -> FreeCoordinate {
        self.0
    }

    /// Returns the angle in degrees, in the range `[0, 360)`.
    #[inline]
    pub fn degrees(self) -> FreeCoordinate {
        self.0.to_degrees()
    }

    /// Returns `(sin, cos)` of this angle.
    #[inline]
    pub fn sin_cos(self) -> (FreeCoordinate, FreeCoordinate) {
        self.0.sin_cos()
    }

    /// Returns the unit vector pointing in this direction, `(cos, sin)`.
    #[inline]
    pub fn unit_vector(self) -> FreeVector {
        let (sin, cos) = self.sin_cos();
        FreeVector::new(cos, sin)
    }
}

impl fmt::Debug for Angle {
    #[inline(never)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Don't print the wrapper, just the value.
        let radians: &FreeCoordinate = &self.0;
        radians.fmt(f)
    }
}

impl fmt::Display for Angle {
    #[inline(never)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°", self.degrees())
    }
}

impl ops::Add for Angle {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self::from_radians(self.0 + rhs.0)
    }
}
impl ops::AddAssign for Angle {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}
impl ops::Sub for Angle {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self::from_radians(self.0 - rhs.0)
    }
}
impl ops::SubAssign for Angle {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}
impl ops::Neg for Angle {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self::Output {
        Self::from_radians(-self.0)
    }
}

impl From<Angle> for FreeCoordinate {
    #[inline]
    fn from(value: Angle) -> Self {
        value.0
    }
}
