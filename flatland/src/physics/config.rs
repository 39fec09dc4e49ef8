use crate::math::{Positive, PositiveSign, ZeroOne, pos64, ps64, zo64};
use crate::time::TickSchedule;

/// Tunable constants of the physics pass, shared by every body in a
/// [`Scene`](crate::scene::Scene).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[non_exhaustive]
pub struct PhysicsConfig {
    /// Number of fixed-length physics ticks per second of simulated time.
    pub fixed_step_hz: Positive<f64>,

    /// Fraction of the penetration depth removed by positional correction after each contact.
    pub correction_percent: ZeroOne<f64>,

    /// Angle in radians below which two segments are considered parallel and not tested
    /// for intersection.
    pub parallel_threshold: PositiveSign<f64>,
}

impl PhysicsConfig {
    #[doc(hidden)] // just a substitute for const trait impl
    pub const DEFAULT: Self = Self {
        fixed_step_hz: pos64(60.0),
        correction_percent: zo64(0.05),
        parallel_threshold: ps64(1e-3),
    };

    /// Returns the schedule of ticks implied by [`Self::fixed_step_hz`].
    ///
    /// Fails if the rate is infinite or too high to represent.
    pub fn tick_schedule(&self) -> Result<TickSchedule, ConfigurationError> {
        TickSchedule::from_hz(self.fixed_step_hz.into_inner())
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A value given for a physical or configuration property is outside its valid range.
///
/// These errors are returned when the value is first supplied, so a scene never holds
/// an invalid body, shape, or configuration.
#[derive(Clone, Copy, Debug, PartialEq, displaydoc::Display)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// mass must be greater than zero, but was {0}
    Mass(f64),
    /// moment of inertia must be greater than zero, but was {0}
    MomentOfInertia(f64),
    /// circle radius must be finite and greater than zero, but was {0}
    Radius(f64),
    /// segment length must be finite and greater than zero, but was {0}
    Length(f64),
    /// bounciness must be between 0 and 1, but was {0}
    Bounciness(f64),
    /// friction coefficient must be finite and not negative, but was {0}
    Friction(f64),
    /// drag coefficients must be finite, but were {coefficient} and {exponent}
    Drag {
        #[allow(missing_docs)]
        coefficient: f64,
        #[allow(missing_docs)]
        exponent: f64,
    },
    /// fixed step rate must be a finite number of steps per second greater than zero, but was {0}
    StepRate(f64),
    /// camera aspect ratio must be finite and greater than zero, but was {0}
    AspectRatio(f64),
    /// correction percentage must be between 0 and 1, but was {0}
    CorrectionPercent(f64),
    /// parallel threshold must not be negative, but was {0}
    ParallelThreshold(f64),
}

impl core::error::Error for ConfigurationError {}
