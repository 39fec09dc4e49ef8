use core::fmt;

use manyfmt::{Fmt, Refmt as _};

use crate::math::{Angle, FreePoint, FreeVector, Positive, PositiveSign, ZeroOne, perp};
use crate::physics::ConfigurationError;
use crate::transform::Pose;
use crate::util::ConciseDebug;

// -------------------------------------------------------------------------------------------------

/// Surface properties of a [`Shape`], used when it is in contact with another.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Material {
    bounciness: ZeroOne<f64>,
    static_friction: PositiveSign<f64>,
    dynamic_friction: PositiveSign<f64>,
}

impl Material {
    #[doc(hidden)] // just a substitute for const trait impl
    pub const DEFAULT: Self = Self {
        bounciness: ZeroOne::<f64>::new_strict(0.5),
        static_friction: PositiveSign::<f64>::new_strict(0.12),
        dynamic_friction: PositiveSign::<f64>::new_strict(0.1),
    };

    /// Constructs a [`Material`], checking that `bounciness` is in `[0, 1]` and the
    /// friction coefficients are finite and not negative.
    pub fn new(
        bounciness: f64,
        static_friction: f64,
        dynamic_friction: f64,
    ) -> Result<Self, ConfigurationError> {
        Ok(Self {
            bounciness: ZeroOne::<f64>::try_new(bounciness)
                .map_err(|_| ConfigurationError::Bounciness(bounciness))?,
            static_friction: friction(static_friction)?,
            dynamic_friction: friction(dynamic_friction)?,
        })
    }

    /// Coefficient of restitution; 0 is perfectly inelastic and 1 is perfectly elastic.
    pub fn bounciness(&self) -> ZeroOne<f64> {
        self.bounciness
    }
    /// Friction coefficient which applies while the surfaces are not sliding.
    pub fn static_friction(&self) -> PositiveSign<f64> {
        self.static_friction
    }
    /// Friction coefficient which applies once the surfaces are sliding.
    pub fn dynamic_friction(&self) -> PositiveSign<f64> {
        self.dynamic_friction
    }

    /// Returns a copy with the bounciness replaced.
    pub fn with_bounciness(self, bounciness: f64) -> Result<Self, ConfigurationError> {
        Self::new(
            bounciness,
            self.static_friction.into_inner(),
            self.dynamic_friction.into_inner(),
        )
    }
}

fn friction(value: f64) -> Result<PositiveSign<f64>, ConfigurationError> {
    match PositiveSign::<f64>::try_new(value) {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ConfigurationError::Friction(value)),
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Whether a [`Shape`] physically blocks other shapes.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, exhaust::Exhaust)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum ShapeRole {
    /// Contacts are resolved by impulses and positional correction.
    #[default]
    Solid,
    /// Contacts are detected and reported in
    /// [`PhysicsStepInfo::sensor_overlaps`](crate::physics::PhysicsStepInfo::sensor_overlaps),
    /// but neither body is affected.
    Sensor,
}

// -------------------------------------------------------------------------------------------------

/// The geometric variant of a [`Shape`], with its size.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum ShapeKind {
    /// A solid disc.
    Circle {
        /// Radius of the disc.
        radius: Positive<f64>,
    },
    /// A line segment with no thickness, centered on the shape's position.
    Segment {
        /// Distance between the endpoints.
        length: Positive<f64>,
        /// Direction of the segment relative to the owning entity.
        local_angle: Angle,
    },
}

/// A collision shape attached to a [`RigidBody`](crate::physics::RigidBody).
///
/// Shapes are placed in the body's frame: their center is offset from the entity's position
/// by `local_center` rotated by the entity's angle.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub struct Shape {
    /// Geometry of the shape.
    pub kind: ShapeKind,
    /// Center of the shape relative to the entity, in the entity's rotated frame.
    pub local_center: FreePoint,
    /// Surface properties.
    pub material: Material,
    /// Whether contacts with this shape are resolved.
    pub role: ShapeRole,
}

impl Shape {
    /// Constructs a solid circle with the default [`Material`].
    ///
    /// Returns [`ConfigurationError::Radius`] if `radius` is not finite and positive.
    pub fn circle(radius: f64, local_center: FreePoint) -> Result<Self, ConfigurationError> {
        let radius = Positive::<f64>::try_new_finite(radius)
            .map_err(|_| ConfigurationError::Radius(radius))?;
        Ok(Self {
            kind: ShapeKind::Circle { radius },
            local_center,
            material: Material::DEFAULT,
            role: ShapeRole::Solid,
        })
    }

    /// Constructs a solid segment with the default [`Material`].
    ///
    /// Returns [`ConfigurationError::Length`] if `length` is not finite and positive.
    pub fn segment(
        length: f64,
        local_center: FreePoint,
        local_angle: Angle,
    ) -> Result<Self, ConfigurationError> {
        let length = Positive::<f64>::try_new_finite(length)
            .map_err(|_| ConfigurationError::Length(length))?;
        Ok(Self {
            kind: ShapeKind::Segment {
                length,
                local_angle,
            },
            local_center,
            material: Material::DEFAULT,
            role: ShapeRole::Solid,
        })
    }

    /// Returns this shape with its material replaced.
    #[must_use]
    pub fn with_material(self, material: Material) -> Self {
        Self { material, ..self }
    }

    /// Returns this shape with its role replaced.
    #[must_use]
    pub fn with_role(self, role: ShapeRole) -> Self {
        Self { role, ..self }
    }

    /// Whether this shape only reports contacts without resolving them.
    pub fn is_sensor(&self) -> bool {
        self.role == ShapeRole::Sensor
    }

    /// Computes the world-space geometry of this shape on an entity whose global pose
    /// is `pose`.
    pub fn place(&self, pose: &Pose) -> PlacedShape {
        let center = pose.local_to_global_point(self.local_center);
        let geometry = match self.kind {
            ShapeKind::Circle { radius } => Geometry::Circle(Circle {
                center,
                radius: radius.into_inner(),
            }),
            ShapeKind::Segment {
                length,
                local_angle,
            } => Geometry::Segment(Segment {
                center,
                angle: pose.angle + local_angle,
                length: length.into_inner(),
            }),
        };
        PlacedShape {
            geometry,
            material: self.material,
            role: self.role,
        }
    }
}

// -------------------------------------------------------------------------------------------------

/// A [`Shape`] positioned in world space for one collision test.
#[derive(Clone, Copy, Debug, PartialEq)]
#[expect(clippy::exhaustive_structs)]
pub struct PlacedShape {
    /// Where the shape is.
    pub geometry: Geometry,
    /// Surface properties.
    pub material: Material,
    /// Whether contacts with this shape are resolved.
    pub role: ShapeRole,
}

/// World-space geometry of a [`PlacedShape`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[expect(clippy::exhaustive_enums)]
#[allow(missing_docs)]
pub enum Geometry {
    Circle(Circle),
    Segment(Segment),
}

/// A disc in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
#[expect(clippy::exhaustive_structs)]
pub struct Circle {
    #[allow(missing_docs)]
    pub center: FreePoint,
    #[allow(missing_docs)]
    pub radius: f64,
}

/// A line segment in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
#[expect(clippy::exhaustive_structs)]
pub struct Segment {
    /// Midpoint of the segment.
    pub center: FreePoint,
    /// Direction from the midpoint towards the second endpoint.
    pub angle: Angle,
    /// Distance between the endpoints.
    pub length: f64,
}

impl Circle {
    /// Twice the radius.
    pub fn diameter(&self) -> f64 {
        self.radius * 2.0
    }
}

impl Segment {
    /// Unit vector along the segment.
    pub fn tangent(&self) -> FreeVector {
        self.angle.unit_vector()
    }

    /// Unit vector perpendicular to the segment, a quarter turn counterclockwise from
    /// [`Self::tangent()`].
    pub fn normal(&self) -> FreeVector {
        perp(self.tangent())
    }

    /// Half of the length; the distance from the center to either endpoint.
    pub fn half_length(&self) -> f64 {
        self.length / 2.0
    }

    /// Returns both endpoints.
    pub fn endpoints(&self) -> [FreePoint; 2] {
        let half = self.tangent() * self.half_length();
        [self.center - half, self.center + half]
    }
}

impl Fmt<ConciseDebug> for Geometry {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>, fopt: &ConciseDebug) -> fmt::Result {
        match self {
            Geometry::Circle(Circle { center, radius }) => {
                write!(fmt, "circle {} r={radius:.3}", center.refmt(fopt))
            }
            Geometry::Segment(segment) => {
                write!(fmt, "segment {}", segment.endpoints().refmt(fopt))
            }
        }
    }
}
