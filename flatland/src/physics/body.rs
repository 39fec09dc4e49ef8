use core::fmt;

use manyfmt::{Fmt, Refmt as _};

use crate::math::{Angle, FreeCoordinate, FreePoint, FreeVector, Positive, cosine_between, rotate};
use crate::physics::{ConfigurationError, Shape};
use crate::util::{ConciseDebug, StatusText};

/// Physical state and properties of an entity that takes part in the simulation.
///
/// The linear velocity is stored in world space; the angular speed is stored relative to
/// the entity's parent, like the rest of the entity's [`Transform`](crate::transform::Transform).
/// Operations that need the hierarchy, such as applying a force to an entity with children,
/// are methods of [`Scene`](crate::scene::Scene) instead of this type.
#[derive(Clone, PartialEq)]
#[non_exhaustive]
pub struct RigidBody {
    velocity: FreeVector,
    local_angular_speed: f64,

    mass: Positive<f64>,
    moment_of_inertia: Positive<f64>,

    /// Acceleration due to gravity, applied every tick as a force scaled by the tick length.
    pub gravity: FreeVector,

    /// Air resistance.
    pub drag: Drag,

    /// Collision shapes, in the body's frame.
    pub shapes: Vec<Shape>,

    /// Whether the body is integrated and collided. If false, the body is inert scenery
    /// and its own mass does not count towards any total mass.
    pub uses_physics: bool,

    /// Set once the body has been integrated during the current tick.
    pub(crate) calculated_this_frame: bool,
    // When adding a field, don't forget to expand the Debug impl.
}

impl RigidBody {
    /// Creates a body with mass 1, moment of inertia 5, no velocity, no gravity, no drag,
    /// and no shapes, which takes part in physics.
    pub fn new() -> Self {
        Self {
            velocity: FreeVector::zero(),
            local_angular_speed: 0.0,
            mass: Positive::<f64>::ONE,
            moment_of_inertia: Positive::<f64>::new_strict(5.0),
            gravity: FreeVector::zero(),
            drag: Drag::NONE,
            shapes: Vec::new(),
            uses_physics: true,
            calculated_this_frame: false,
        }
    }

    /// Returns the velocity in world space.
    pub fn velocity(&self) -> FreeVector {
        self.velocity
    }

    /// Sets the velocity in world space.
    pub fn set_velocity(&mut self, velocity: FreeVector) {
        self.velocity = velocity;
    }

    /// Returns the angular speed, in radians per second counterclockwise, relative to the
    /// parent's rotation.
    pub fn local_angular_speed(&self) -> f64 {
        self.local_angular_speed
    }

    /// Sets the angular speed relative to the parent, in radians per second.
    pub fn set_local_angular_speed(&mut self, angular_speed: f64) {
        self.local_angular_speed = angular_speed;
    }

    /// Returns the mass of this body alone, excluding any children.
    pub fn mass(&self) -> Positive<f64> {
        self.mass
    }

    /// Sets the mass, which must be greater than zero and may be infinite.
    pub fn set_mass(&mut self, mass: f64) -> Result<(), ConfigurationError> {
        self.mass = Positive::<f64>::try_new(mass).map_err(|_| ConfigurationError::Mass(mass))?;
        Ok(())
    }

    /// Returns the moment of inertia about the body's position.
    pub fn moment_of_inertia(&self) -> Positive<f64> {
        self.moment_of_inertia
    }

    /// Sets the moment of inertia, which must be greater than zero and may be infinite.
    pub fn set_moment_of_inertia(&mut self, moment: f64) -> Result<(), ConfigurationError> {
        self.moment_of_inertia = Positive::<f64>::try_new(moment)
            .map_err(|_| ConfigurationError::MomentOfInertia(moment))?;
        Ok(())
    }

    /// Whether this body has been integrated during the tick in progress or most recently
    /// completed.
    pub fn calculated_this_frame(&self) -> bool {
        self.calculated_this_frame
    }
}

impl Default for RigidBody {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RigidBody {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            velocity,
            local_angular_speed,
            mass,
            moment_of_inertia,
            gravity,
            drag,
            shapes,
            uses_physics,
            calculated_this_frame,
        } = self;
        fmt.debug_struct("RigidBody")
            .field("velocity", &velocity.refmt(&ConciseDebug))
            .field("local_angular_speed", local_angular_speed)
            .field("mass", &mass.refmt(&ConciseDebug))
            .field("moment_of_inertia", &moment_of_inertia.refmt(&ConciseDebug))
            .field("gravity", &gravity.refmt(&ConciseDebug))
            .field("drag", drag)
            .field("shapes", shapes)
            .field("uses_physics", uses_physics)
            .field("calculated_this_frame", calculated_this_frame)
            .finish()
    }
}

impl Fmt<StatusText> for RigidBody {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>, _: &StatusText) -> fmt::Result {
        write!(
            fmt,
            "Velocity: {}  Spin: {:+.3} rad/s",
            self.velocity.refmt(&ConciseDebug),
            self.local_angular_speed,
        )
    }
}

// -------------------------------------------------------------------------------------------------

/// Air resistance opposing a body's motion.
///
/// Each tick, a force of magnitude `coefficient × width × speed^exponent` is applied against
/// the direction of motion, where `width` depends on the [`DragModel`]. A negative
/// coefficient pushes along the direction of motion instead.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Drag {
    coefficient: FreeCoordinate,
    exponent: FreeCoordinate,
    /// How the area facing the airflow is measured.
    pub model: DragModel,
}

impl Drag {
    /// No drag at all.
    pub const NONE: Self = Self {
        coefficient: 0.0,
        exponent: 2.0,
        model: DragModel::Omnidirectional,
    };

    /// Constructs a [`Drag`], checking that the coefficient and exponent are finite.
    pub fn new(
        coefficient: FreeCoordinate,
        exponent: FreeCoordinate,
        model: DragModel,
    ) -> Result<Self, ConfigurationError> {
        if coefficient.is_finite() && exponent.is_finite() {
            Ok(Self {
                coefficient,
                exponent,
                model,
            })
        } else {
            Err(ConfigurationError::Drag {
                coefficient,
                exponent,
            })
        }
    }

    /// Multiplier of the drag force.
    pub fn coefficient(&self) -> FreeCoordinate {
        self.coefficient
    }

    /// The power to which speed is raised; 2 is the physically realistic value.
    pub fn exponent(&self) -> FreeCoordinate {
        self.exponent
    }

    /// Computes the drag force and the point it acts on.
    ///
    /// * `global_velocity` determines the magnitude and direction of the force.
    /// * `local_velocity` and `local_angle` are the body's velocity and angle relative to its
    ///   parent, which orient the drag mesh.
    ///
    /// The point is returned as an offset from the body's position in the parent's frame.
    /// Returns [`None`] if the body is not moving.
    pub fn force(
        &self,
        global_velocity: FreeVector,
        local_velocity: FreeVector,
        local_angle: Angle,
    ) -> Option<(FreeVector, FreeVector)> {
        let speed = global_velocity.length();
        if speed == 0.0 || !speed.is_finite() {
            return None;
        }
        let direction = -global_velocity / speed * self.coefficient;
        let (width, center) = match &self.model {
            DragModel::Omnidirectional => (1.0, FreeVector::zero()),
            DragModel::Mesh(vertices) => mesh_profile(vertices, local_velocity, local_angle),
        };
        Some((direction * width * speed.powf(self.exponent), center))
    }
}

impl Default for Drag {
    fn default() -> Self {
        Self::NONE
    }
}

/// How the cross-section of a body facing the wind is computed.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum DragModel {
    /// The same drag in every direction, acting on the body's position,
    /// so it never causes rotation.
    #[default]
    Omnidirectional,
    /// Drag computed from a closed polygon in the body's frame.
    ///
    /// The edge presenting the widest profile to the direction of motion determines the
    /// width, and the force acts on that edge's midpoint, so an asymmetric mesh will turn
    /// into the wind.
    Mesh(Vec<FreePoint>),
}

/// Returns the widest edge profile of the polygon against `velocity`, and the midpoint of
/// that edge, with the polygon rotated by `angle`.
fn mesh_profile(
    vertices: &[FreePoint],
    velocity: FreeVector,
    angle: Angle,
) -> (FreeCoordinate, FreeVector) {
    let mut width = 0.0;
    let mut center = FreeVector::zero();
    for (i, &start) in vertices.iter().enumerate() {
        let end = vertices[(i + 1) % vertices.len()];
        let start = rotate(start.to_vector(), angle);
        let end = rotate(end.to_vector(), angle);
        let edge = start - end;
        let profile = edge.length() * cosine_between(velocity, edge).abs();
        if profile > width {
            width = profile;
            center = (start + end) / 2.0;
        }
    }
    (width, center)
}
