use core::fmt;
use core::hash;
use core::ops;

use ordered_float::FloatCore;

// -------------------------------------------------------------------------------------------------

/// A floating-point number which is not NaN and whose sign bit is positive.
///
/// The allowed values consist of positive zero, positive infinity,
/// and every value in between those. This set of values means that this type:
///
/// * Implements [`Eq`] straightforwardly; neither NaN nor signed zeroes
///   can cause problems with using it as a map key.
/// * Is closed under multiplication and addition, so cannot produce a NaN
///   from uncautious arithmetic.
///
/// The arithmetic behavior of `PositiveSign<T>` is *not* identical to `T`.
/// Specifically, the value of `0. * f64::INFINITY` is NaN, but the value of
/// `PositiveSign(0.) * PositiveSign(f64::INFINITY)` is `PositiveSign(0.)` instead.
/// This matches how inverse masses are used: the inverse mass of an immovable body is zero,
/// and zero times anything must stay zero.
#[derive(Clone, Copy, PartialEq, PartialOrd)]
pub struct PositiveSign<T>(T);

/// A floating-point number which is within the range +0 to +1 (inclusive).
///
/// This is used for restitution, correction fractions, and anything else where values
/// outside the range 0 to 1 are meaningless. It is closed under multiplication.
#[derive(Clone, Copy, PartialEq, PartialOrd)]
pub struct ZeroOne<T>(T);

/// A floating-point number which is strictly greater than zero, possibly positive infinity.
///
/// This is the type of masses, moments of inertia, and shape dimensions. Zero is excluded
/// because it would make the reciprocal infinite; infinity is allowed because its
/// reciprocal is zero, which is how immovable bodies are expressed (see [`Positive::recip()`]).
#[derive(Clone, Copy, PartialEq, PartialOrd)]
pub struct Positive<T>(T);

// --- Inherent implementations --------------------------------------------------------------------

impl<T: FloatCore> PositiveSign<T> {
    /// Returns whether the value is finite.
    ///
    /// Since the value is statically guaranteed to be neither NaN nor negative,
    /// the only case where this returns `false` is when the value is positive infinity.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.0 != T::infinity()
    }

    /// Returns the arithmetic mean of `self` and `other`.
    #[inline]
    #[must_use]
    pub fn mean(self, other: Self) -> Self {
        let two = T::one() + T::one();
        // Halve before adding so that two finite maxima do not overflow to infinity.
        Self(self.0 / two + other.0 / two)
    }

    #[cfg(test)]
    #[track_caller]
    pub(crate) fn consistency_check(self)
    where
        Self: fmt::Debug,
    {
        assert!(!self.0.is_nan() && self.0.is_sign_positive(), "{self:?}");
    }
}

impl<T: FloatCore> ZeroOne<T> {
    #[cfg(test)]
    #[track_caller]
    pub(crate) fn consistency_check(self)
    where
        Self: fmt::Debug,
    {
        assert!(
            self.0.is_sign_positive() && self.0 >= T::zero() && self.0 <= T::one(),
            "{self:?}"
        );
    }

    /// Returns `1.0 - self`.
    ///
    /// The result cannot be out of range, so this operation is always successful.
    #[inline]
    #[must_use]
    pub fn complement(self) -> Self {
        // `self.0` is within [0, 1], so the result is too.
        // `1 - 1` is positive zero, never negative zero.
        Self(T::one() - self.0)
    }
}

impl<T: FloatCore> Positive<T> {
    /// Returns whether the value is finite; that is, whether it is not positive infinity.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.0 != T::infinity()
    }

    /// Returns `1 / self`, where the reciprocal of positive infinity is exactly zero.
    ///
    /// The result may be infinite if `self` is small enough that the reciprocal overflows.
    #[inline]
    pub fn recip(self) -> PositiveSign<T> {
        if self.0 == T::infinity() {
            PositiveSign(T::zero())
        } else {
            PositiveSign(self.0.recip())
        }
    }

    #[cfg(test)]
    #[track_caller]
    pub(crate) fn consistency_check(self)
    where
        Self: fmt::Debug,
    {
        assert!(!self.0.is_nan() && self.0 > T::zero(), "{self:?}");
    }
}

// --- Non-generic macro-generated implementations -------------------------------------------------

macro_rules! non_generic_impls {
    ($t:ty) => {
        impl PositiveSign<$t> {
            /// Zero.
            pub const ZERO: Self = Self(0.);
            /// Positive infinity (∞).
            pub const INFINITY: Self = Self(<$t>::INFINITY);

            /// Wraps the given value in `PositiveSign`.
            ///
            /// * If `value` is positive (including positive infinity), returns wrapped `value`.
            /// * If `value` is zero of either sign, returns wrapped positive zero.
            ///   This is lossy, but corresponds to the IEEE 754 idea that -0.0 == +0.0.
            /// * If `value` is negative non-zero or NaN, panics.
            #[track_caller]
            #[inline]
            pub const fn new_strict(value: $t) -> Self {
                if value > 0. {
                    Self(value)
                } else if value == 0. {
                    Self(0.)
                } else {
                    positive_sign_not_positive_panic()
                }
            }

            /// Wraps the given value in `PositiveSign`.
            ///
            /// * If the value is NaN, panics.
            /// * If the value has a negative sign, it is replaced with positive zero.
            #[track_caller]
            #[inline]
            pub const fn new_clamped(value: $t) -> Self {
                if value > 0. {
                    Self(value)
                } else if value == value {
                    Self(0.)
                } else {
                    positive_sign_nan_panic()
                }
            }

            /// Const equivalent of `TryFrom::try_from()`.
            #[inline]
            pub const fn try_new(value: $t) -> Result<Self, NotPositiveSign<$t>> {
                if value > 0. {
                    Ok(Self(value))
                } else if value == 0. {
                    // must be zero, not NaN, but we don’t know the sign
                    Ok(Self::ZERO)
                } else {
                    Err(NotPositiveSign(value))
                }
            }

            /// Unwraps the value without modifying it.
            #[inline]
            pub const fn into_inner(self) -> $t {
                self.0
            }
        }

        impl ZeroOne<$t> {
            /// The number zero, as a constant.
            pub const ZERO: Self = Self(0.);
            /// The number one, as a constant.
            pub const ONE: Self = Self(1.);

            /// Wraps the given value in `ZeroOne`.
            ///
            /// * If `value` is in range, returns wrapped `value`.
            /// * If `value` is zero of either sign, returns wrapped positive zero.
            /// * If `value` is out of range or NaN, panics.
            #[track_caller]
            #[inline]
            pub const fn new_strict(value: $t) -> Self {
                if value > 0. && value <= 1. {
                    Self(value)
                } else if value == 0. {
                    Self(0.)
                } else {
                    zero_one_out_of_range_panic()
                }
            }

            /// Wraps the given value in `ZeroOne`.
            ///
            /// * If the value is NaN, panics.
            /// * If the value is out of range, replaces it with the nearest in-range value
            ///   (0 or 1).
            #[track_caller]
            #[inline]
            pub const fn new_clamped(value: $t) -> Self {
                if value > 0. && value <= 1. {
                    // note > 0, which excludes negative zero
                    Self(value)
                } else if value <= 0. {
                    Self(0.)
                } else if value >= 1. {
                    Self(1.)
                } else {
                    zero_one_nan_panic()
                }
            }

            /// Const equivalent of `TryFrom::try_from()`.
            #[inline]
            pub const fn try_new(value: $t) -> Result<Self, NotZeroOne<$t>> {
                if value > 0. && value <= 1. {
                    Ok(Self(value))
                } else if value == 0. {
                    Ok(Self::ZERO)
                } else {
                    Err(NotZeroOne(value))
                }
            }

            /// Unwraps the value without modifying it.
            #[inline]
            pub const fn into_inner(self) -> $t {
                self.0
            }
        }

        impl Positive<$t> {
            /// Positive infinity (∞): an immovable mass or an unturnable moment of inertia.
            pub const INFINITY: Self = Self(<$t>::INFINITY);
            /// The number one, as a constant.
            pub const ONE: Self = Self(1.);

            /// Wraps the given value in `Positive`.
            ///
            /// Panics if `value` is zero, negative, or NaN.
            #[track_caller]
            #[inline]
            pub const fn new_strict(value: $t) -> Self {
                if value > 0. {
                    Self(value)
                } else {
                    positive_not_positive_panic()
                }
            }

            /// Const equivalent of `TryFrom::try_from()`.
            #[inline]
            pub const fn try_new(value: $t) -> Result<Self, NotPositive<$t>> {
                if value > 0. {
                    Ok(Self(value))
                } else {
                    Err(NotPositive(value))
                }
            }

            /// Like [`Self::try_new()`], but additionally rejects positive infinity.
            #[inline]
            pub fn try_new_finite(value: $t) -> Result<Self, NotPositive<$t>> {
                if value > 0. && value.is_finite() {
                    Ok(Self(value))
                } else {
                    Err(NotPositive(value))
                }
            }

            /// Unwraps the value without modifying it.
            #[inline]
            pub const fn into_inner(self) -> $t {
                self.0
            }
        }

        impl From<PositiveSign<$t>> for $t {
            #[inline]
            fn from(value: PositiveSign<$t>) -> Self {
                value.0
            }
        }
        impl From<ZeroOne<$t>> for $t {
            #[inline]
            fn from(value: ZeroOne<$t>) -> Self {
                value.0
            }
        }
        impl From<Positive<$t>> for $t {
            #[inline]
            fn from(value: Positive<$t>) -> Self {
                value.0
            }
        }

        impl From<ZeroOne<$t>> for PositiveSign<$t> {
            #[inline]
            fn from(value: ZeroOne<$t>) -> Self {
                // Valid `PositiveSign` values are a superset of valid `ZeroOne` values.
                PositiveSign(value.0)
            }
        }
        impl From<Positive<$t>> for PositiveSign<$t> {
            #[inline]
            fn from(value: Positive<$t>) -> Self {
                // Valid `PositiveSign` values are a superset of valid `Positive` values.
                PositiveSign(value.0)
            }
        }

        impl TryFrom<$t> for PositiveSign<$t> {
            type Error = NotPositiveSign<$t>;

            /// Checks that `value` is non-negative and non-NaN.
            #[inline]
            fn try_from(value: $t) -> Result<Self, Self::Error> {
                Self::try_new(value)
            }
        }
        impl TryFrom<$t> for ZeroOne<$t> {
            type Error = NotZeroOne<$t>;

            /// Checks that `value` is within the range 0 to 1.
            #[inline]
            fn try_from(value: $t) -> Result<Self, Self::Error> {
                Self::try_new(value)
            }
        }
        impl TryFrom<$t> for Positive<$t> {
            type Error = NotPositive<$t>;

            /// Checks that `value` is greater than zero.
            #[inline]
            fn try_from(value: $t) -> Result<Self, Self::Error> {
                Self::try_new(value)
            }
        }
    };
}

non_generic_impls!(f32);
non_generic_impls!(f64);

// --- Generic trait implementations ---------------------------------------------------------------

macro_rules! transparent_formatting {
    ($wrapper:ident) => {
        impl<T: fmt::Debug> fmt::Debug for $wrapper<T> {
            #[inline(never)]
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                // Don't print the wrapper, just the value.
                let value: &T = &self.0;
                value.fmt(f)
            }
        }
        impl<T: fmt::Display> fmt::Display for $wrapper<T> {
            #[inline(never)]
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let value: &T = &self.0;
                value.fmt(f)
            }
        }

        // The derived PartialEq implementation is okay, but we need to add Eq.
        impl<T: PartialEq> Eq for $wrapper<T> {}

        #[allow(clippy::derive_ord_xor_partial_ord)]
        impl<T: FloatCore> Ord for $wrapper<T> {
            #[inline]
            fn cmp(&self, other: &Self) -> core::cmp::Ordering {
                // All values that would violate `Ord`’s properties are prohibited,
                // so `partial_cmp()` always succeeds.
                self.partial_cmp(other).unwrap_or(core::cmp::Ordering::Equal)
            }
        }

        impl<T: FloatCore> hash::Hash for $wrapper<T> {
            #[inline]
            fn hash<H: hash::Hasher>(&self, state: &mut H) {
                // Negative zero and NaN are excluded, so bitwise identity is value identity.
                self.0.integer_decode().hash(state)
            }
        }

        impl<T> AsRef<T> for $wrapper<T> {
            #[inline]
            fn as_ref(&self) -> &T {
                &self.0
            }
        }
    };
}

transparent_formatting!(PositiveSign);
transparent_formatting!(ZeroOne);
transparent_formatting!(Positive);

impl<T: FloatCore> Default for PositiveSign<T> {
    /// The default is zero, regardless of what `T::default()` is.
    #[inline]
    fn default() -> Self {
        Self(T::zero())
    }
}
impl<T: FloatCore> Default for ZeroOne<T> {
    /// The default is zero, regardless of what `T::default()` is.
    #[inline]
    fn default() -> Self {
        Self(T::zero())
    }
}
impl<T: FloatCore> Default for Positive<T> {
    /// The default is one, since zero is not permitted.
    #[inline]
    fn default() -> Self {
        Self(T::one())
    }
}

impl<T: FloatCore> ops::Add for PositiveSign<T> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}
impl<T: FloatCore> ops::AddAssign for PositiveSign<T> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}
impl<T: FloatCore> ops::Add for Positive<T> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        // The sum of two values greater than zero is greater than zero (or +∞).
        Self(self.0 + rhs.0)
    }
}

impl<T: FloatCore> ops::Mul for PositiveSign<T> {
    type Output = Self;

    /// This multiplication operation differs from standard floating-point multiplication
    /// in that multiplying zero by positive infinity returns zero instead of NaN.
    /// This is necessary for the type to be closed under multiplication.
    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        let value = self.0 * rhs.0;
        if value.is_nan() {
            Self(T::zero())
        } else {
            debug_assert!(value.is_sign_positive());
            Self(value)
        }
    }
}
impl<T: FloatCore> ops::Mul for ZeroOne<T> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        // Infinity is out of range for both operands, so NaN cannot result.
        Self(self.0 * rhs.0)
    }
}

// --- Errors --------------------------------------------------------------------------------------

/// Error from attempting to construct a [`PositiveSign`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NotPositiveSign<T>(T);

/// Error from attempting to construct a [`ZeroOne`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NotZeroOne<T>(T);

/// Error from attempting to construct a [`Positive`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NotPositive<T>(T);

impl<T: FloatCore + fmt::Display> fmt::Display for NotPositiveSign<T> {
    #[inline(never)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.0;
        if value.is_nan() {
            write!(f, "value was NaN")
        } else {
            write!(f, "{value} did not have a positive sign bit")
        }
    }
}

impl<T: FloatCore + fmt::Display> fmt::Display for NotZeroOne<T> {
    #[inline(never)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.0;
        if value <= T::zero() {
            write!(f, "{value} was less than zero")
        } else if value >= T::one() {
            write!(f, "{value} was greater than one")
        } else {
            write!(f, "value was NaN")
        }
    }
}

impl<T: FloatCore + fmt::Display> fmt::Display for NotPositive<T> {
    #[inline(never)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.0;
        if value.is_nan() {
            write!(f, "value was NaN")
        } else if value == T::infinity() {
            write!(f, "value was infinite")
        } else {
            write!(f, "{value} was not greater than zero")
        }
    }
}

impl<T: FloatCore + fmt::Display + fmt::Debug> core::error::Error for NotPositiveSign<T> {}
impl<T: FloatCore + fmt::Display + fmt::Debug> core::error::Error for NotZeroOne<T> {}
impl<T: FloatCore + fmt::Display + fmt::Debug> core::error::Error for NotPositive<T> {}

impl<T: Copy> NotPositive<T> {
    /// Returns the rejected value.
    #[inline]
    pub fn value(&self) -> T {
        self.0
    }
}
impl<T: Copy> NotZeroOne<T> {
    /// Returns the rejected value.
    #[inline]
    pub fn value(&self) -> T {
        self.0
    }
}
impl<T: Copy> NotPositiveSign<T> {
    /// Returns the rejected value.
    #[inline]
    pub fn value(&self) -> T {
        self.0
    }
}

#[track_caller]
#[cold]
const fn positive_sign_nan_panic() -> ! {
    panic!("PositiveSign value must not be NaN")
}

#[track_caller]
#[cold]
const fn positive_sign_not_positive_panic() -> ! {
    panic!("PositiveSign value must not be NaN or negative")
}

#[track_caller]
#[cold]
const fn positive_not_positive_panic() -> ! {
    panic!("Positive value must be greater than zero")
}

#[track_caller]
#[cold]
const fn zero_one_nan_panic() -> ! {
    panic!("ZeroOne value must not be NaN")
}

#[track_caller]
#[cold]
const fn zero_one_out_of_range_panic() -> ! {
    panic!("ZeroOne value must be between zero and one")
}

// -------------------------------------------------------------------------------------------------

/// Convenient alias for [`PositiveSign::<f64>::new_strict()`],
/// to be used in tests and pseudo-literals.
#[inline]
pub const fn ps64(value: f64) -> PositiveSign<f64> {
    PositiveSign::<f64>::new_strict(value)
}

/// Convenient alias for [`ZeroOne::<f64>::new_strict()`],
/// to be used in tests and pseudo-literals.
#[inline]
pub const fn zo64(value: f64) -> ZeroOne<f64> {
    ZeroOne::<f64>::new_strict(value)
}

/// Convenient alias for [`Positive::<f64>::new_strict()`],
/// to be used in tests and pseudo-literals.
#[inline]
pub const fn pos64(value: f64) -> Positive<f64> {
    Positive::<f64>::new_strict(value)
}

// -------------------------------------------------------------------------------------------------
