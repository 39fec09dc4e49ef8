//! Data types for simulated time.

use core::fmt;
use core::num::NonZeroU16;

#[doc(no_inline)]
pub use core::time::Duration;

use crate::math::PositiveSign;
use crate::physics::ConfigurationError;

#[cfg(doc)]
use crate::scene::Scene;

// -------------------------------------------------------------------------------------------------

/// Numeric type for the phase of a [`Clock`].
pub type Phase = u16;

/// Specifies an amount of simulated time passing in a [`Scene`].
///
/// [`Tick`] values are passed along through the `step()` operations that advance time.
/// They are produced by a [`Clock`] which has a [`TickSchedule`], and the clock generates
/// distinct but eventually repeating ticks based on its *phase*.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Tick {
    /// Schedule from which this tick was derived, which also determines its length.
    schedule: TickSchedule,

    /// The phase of the clock *before* this tick happens.
    /// (After this tick happens, the phase is this value plus 1.)
    prev_phase: Phase,

    /// Whether simulated time is paused, and `delta_t` should not be considered
    /// as an amount of time passing. See [`Self::paused()`] for details.
    paused: bool,
}

impl Tick {
    fn new(schedule: TickSchedule, prev_phase: Phase) -> Self {
        Self {
            schedule,
            prev_phase,
            paused: false,
        }
    }

    /// A tick of arbitrary length, for testing purposes. Do not use this for actual simulation.
    pub const fn arbitrary() -> Self {
        Self {
            schedule: TickSchedule::per_second(1),
            prev_phase: 0,
            paused: false,
        }
    }

    /// Construct a non-paused [`Tick`] from a duration expressed in fractional seconds,
    /// and phase 0 as if it were the first tick of a scene.
    ///
    /// This should only be used for tests.
    pub fn from_seconds(dt: f64) -> Self {
        Self {
            schedule: TickSchedule {
                base_duration: Duration::from_micros((dt * 1e6) as u64),
                divisor: NonZeroU16::MIN,
            },
            prev_phase: 0,
            paused: false,
        }
    }

    /// Returns the amount of time passed, as a [`Duration`].
    pub fn delta_t_duration(self) -> Duration {
        self.schedule.delta_t()
    }

    /// Returns the amount of time passed, as a restricted floating-point number of seconds.
    pub fn delta_t_ps64(self) -> PositiveSign<f64> {
        PositiveSign::<f64>::new_clamped(self.delta_t_duration().as_secs_f64())
    }

    /// Returns the amount of time passed, as a floating-point number of seconds.
    pub fn delta_t_f64(self) -> f64 {
        self.delta_t_ps64().into_inner()
    }

    /// Returns the phase of the originating clock *before* this tick happens.
    pub fn prev_phase(self) -> Phase {
        self.prev_phase
    }

    /// Returns the phase of the originating clock *after* this tick happens.
    pub fn next_phase(self) -> Phase {
        (self.prev_phase + 1) % self.schedule.divisor
    }

    /// Set the paused flag. See [`Tick::paused`] for more information.
    #[must_use]
    pub fn pause(self) -> Self {
        Self {
            paused: true,
            ..self
        }
    }

    /// Returns the "paused" state of this Tick. If true, then step operations should
    /// not perform any changes that reflect simulated time passing.
    ///
    /// Update hooks are still called with paused ticks; physics is not.
    pub fn paused(&self) -> bool {
        self.paused
    }
}

// -------------------------------------------------------------------------------------------------

/// Defines how time passes in a [`Scene`].
///
/// Specifically, it defines a base real-time duration (usually 1 second),
/// and a divisor with which to subdivide this duration into individual [`Tick`]s.
/// Every tick of a schedule has the same length; the physics step is always fixed-rate.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct TickSchedule {
    base_duration: Duration,
    divisor: NonZeroU16,
}

impl TickSchedule {
    /// Construct a [`TickSchedule`] which specifies `divisor` ticks per second.
    pub const fn per_second(divisor: u16) -> Self {
        Self {
            base_duration: Duration::from_secs(1),
            divisor: match NonZeroU16::new(divisor) {
                Some(x) => x,
                None => panic!("divisor must be nonzero"),
            },
        }
    }

    /// Construct a [`TickSchedule`] which specifies `hz` ticks per second,
    /// where `hz` need not be an integer.
    ///
    /// Integral rates are represented exactly as [`TickSchedule::per_second()`] would.
    /// Other rates use a single tick per base duration, rounded to the nearest nanosecond.
    ///
    /// Returns [`ConfigurationError::StepRate`] if `hz` is not finite and positive,
    /// or is so large that a tick would last less than a nanosecond.
    pub fn from_hz(hz: f64) -> Result<Self, ConfigurationError> {
        if !(hz.is_finite() && hz > 0.0) {
            return Err(ConfigurationError::StepRate(hz));
        }
        if hz.fract() == 0.0 && hz <= f64::from(u16::MAX) {
            return Ok(Self::per_second(hz as u16));
        }
        match Duration::try_from_secs_f64(hz.recip()) {
            Ok(base_duration) if !base_duration.is_zero() => Ok(Self {
                base_duration,
                divisor: NonZeroU16::MIN,
            }),
            _ => Err(ConfigurationError::StepRate(hz)),
        }
    }

    /// Returns the length of a [`Tick`] in this schedule.
    pub fn delta_t(&self) -> Duration {
        self.base_duration / u32::from(self.divisor.get())
    }
}

impl fmt::Debug for TickSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let TickSchedule {
            base_duration,
            divisor,
        } = *self;
        write!(f, "TickSchedule({base_duration:?} / {divisor})")
    }
}

// -------------------------------------------------------------------------------------------------

/// Defines the passage of time in a [`Scene`].
///
/// See [`TickSchedule`] for details on what is possible.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct Clock {
    schedule: TickSchedule,

    /// Specifies how the current instant relates to the schedule.
    ///
    /// * It should always be the case that `phase < schedule.divisor`.
    /// * The initial phase, such as for a scene that has just been been created but
    ///   not yet stepped, is `0`.
    phase: Phase,
}

impl Clock {
    /// Creates a new [`Clock`] with the given state.
    ///
    /// If the `phase` is out of range, it is reduced modulo `schedule.divisor`.
    pub const fn new(schedule: TickSchedule, phase: Phase) -> Self {
        Self {
            schedule,
            phase: phase % schedule.divisor.get(),
        }
    }

    /// Returns the schedule which this clock obeys.
    pub fn schedule(&self) -> TickSchedule {
        self.schedule
    }

    /// If `paused` is false, advances this clock to the next instant (as defined by
    /// the schedule) and returns the [`Tick`] defining the transition between those
    /// instants.
    ///
    /// If `paused` is true, returns a paused [`Tick`] for the current instant.
    /// See [`Tick::paused`] for information on the meaning of pausing.
    pub fn advance(&mut self, paused: bool) -> Tick {
        let tick = self.next_tick(paused);
        if !paused {
            self.phase = tick.next_phase();
        }
        tick
    }

    /// Returns the tick that will happen the next time [`Self::advance()`] is called,
    /// if the schedule is not changed before then.
    pub fn next_tick(&self, paused: bool) -> Tick {
        let mut tick = Tick::new(self.schedule, self.phase);

        if paused {
            tick = tick.pause();
        }

        tick
    }
}

impl fmt::Debug for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Clock {
            schedule:
                TickSchedule {
                    base_duration,
                    divisor,
                },
            phase,
        } = *self;
        write!(f, "Clock({phase}/{divisor} of {base_duration:?})")
    }
}

// -------------------------------------------------------------------------------------------------
