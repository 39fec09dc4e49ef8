//! Narrow-phase contact detection between pairs of placed shapes.

use core::fmt;

use manyfmt::{Fmt, Refmt as _};

use crate::math::{FreeCoordinate, FreePoint, FreeVector, PositiveSign, ZeroOne};
use crate::physics::{Circle, Geometry, Material, PlacedShape, Segment, ShapeRole};
use crate::scene::EntityId;
use crate::util::{ConciseDebug, StatusText};

/// Where and how deeply two shapes overlap.
///
/// By convention, the shapes are called A and B in the order they were passed to the
/// detector, and the normal points from B towards A: moving A along the normal (or B
/// against it) separates them.
#[derive(Clone, Copy, Debug, PartialEq)]
#[expect(clippy::exhaustive_structs)]
pub struct Contact {
    /// Point at which the impulse is applied.
    pub point: FreePoint,
    /// Unit vector from B towards A.
    pub normal: FreeVector,
    /// How far the shapes overlap along the normal. Always positive.
    pub depth: FreeCoordinate,
}

impl Contact {
    /// Returns the same contact as seen with A and B swapped.
    #[must_use]
    pub fn flipped(self) -> Self {
        Self {
            normal: -self.normal,
            ..self
        }
    }
}

impl Fmt<ConciseDebug> for Contact {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>, fopt: &ConciseDebug) -> fmt::Result {
        write!(
            fmt,
            "{} n={} d={:.4}",
            self.point.refmt(fopt),
            self.normal.refmt(fopt),
            self.depth
        )
    }
}

/// Surface coefficients that apply to one contact, combined from both shapes' [`Material`]s.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[expect(clippy::exhaustive_structs)]
pub struct CombinedMaterial {
    /// The lesser bounciness of the two; a soft object stops even a bouncy one.
    pub bounciness: ZeroOne<f64>,
    /// Mean of the static friction coefficients.
    pub static_friction: PositiveSign<f64>,
    /// Mean of the dynamic friction coefficients.
    pub dynamic_friction: PositiveSign<f64>,
}

impl CombinedMaterial {
    /// Combines the materials of the two shapes in contact.
    pub fn new(a: &Material, b: &Material) -> Self {
        Self {
            bounciness: a.bounciness().min(b.bounciness()),
            static_friction: a.static_friction().mean(b.static_friction()),
            dynamic_friction: a.dynamic_friction().mean(b.dynamic_friction()),
        }
    }
}

/// Identifies one [`Shape`](crate::physics::Shape) of one entity's body.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[expect(clippy::exhaustive_structs)]
pub struct ShapeHandle {
    /// The entity whose body holds the shape.
    pub entity: EntityId,
    /// Index into [`RigidBody::shapes`](crate::physics::RigidBody::shapes).
    pub index: usize,
}

/// A [`Contact`] between two specific shapes in a scene, ready to be resolved.
#[derive(Clone, Copy, Debug, PartialEq)]
#[expect(clippy::exhaustive_structs)]
pub struct Collision {
    /// The first shape, which the contact normal points towards.
    pub a: ShapeHandle,
    /// The second shape.
    pub b: ShapeHandle,
    /// Where and how deeply the shapes overlap.
    pub contact: Contact,
    /// Surface properties of the pair.
    pub material: CombinedMaterial,
    /// Whether either shape is a [sensor](ShapeRole::Sensor).
    pub sensor: bool,
}

impl Collision {
    /// Combines the output of [`detect()`] with the identities and surfaces of the shapes.
    pub fn new(
        a: ShapeHandle,
        shape_a: &PlacedShape,
        b: ShapeHandle,
        shape_b: &PlacedShape,
        contact: Contact,
    ) -> Self {
        Self {
            a,
            b,
            contact,
            material: CombinedMaterial::new(&shape_a.material, &shape_b.material),
            sensor: shape_a.role == ShapeRole::Sensor || shape_b.role == ShapeRole::Sensor,
        }
    }
}

impl Fmt<StatusText> for Collision {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>, _: &StatusText) -> fmt::Result {
        write!(
            fmt,
            "{:?}[{}] × {:?}[{}] at {}",
            self.a.entity,
            self.a.index,
            self.b.entity,
            self.b.index,
            self.contact.refmt(&ConciseDebug)
        )
    }
}

// -------------------------------------------------------------------------------------------------

/// Tests whether two shapes overlap, and if so, returns the [`Contact`] between them.
///
/// `parallel_threshold` is the angle in radians below which two segments are treated as
/// parallel; such pairs never produce a contact.
///
/// Returns [`None`] if the shapes do not overlap, if either has non-finite coordinates,
/// or if the pair is degenerate (such as parallel segments).
pub fn detect(a: &PlacedShape, b: &PlacedShape, parallel_threshold: f64) -> Option<Contact> {
    match (&a.geometry, &b.geometry) {
        (Geometry::Circle(a), Geometry::Circle(b)) => circle_circle(a, b),
        (Geometry::Circle(a), Geometry::Segment(b)) => circle_segment(a, b),
        (Geometry::Segment(a), Geometry::Circle(b)) => segment_circle(a, b),
        (Geometry::Segment(a), Geometry::Segment(b)) => segment_segment(a, b, parallel_threshold),
    }
}

fn finite_point(p: FreePoint) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

/// Contact between two discs.
///
/// The contact point is the average of the centers, each weighted by its own radius, so it
/// lies nearer the center of the larger disc. If the centers coincide, the normal is +X.
pub fn circle_circle(a: &Circle, b: &Circle) -> Option<Contact> {
    if !(finite_point(a.center) && finite_point(b.center)) {
        log::trace!("circle_circle: non-finite input {a:?} {b:?}");
        return None;
    }
    let offset = a.center - b.center;
    let radii = a.radius + b.radius;
    let distance_squared = offset.square_length();
    if distance_squared > radii * radii {
        return None;
    }
    let distance = distance_squared.sqrt();
    let normal = if distance > 0.0 {
        offset / distance
    } else {
        log::trace!("circle_circle: coincident centers at {:?}", a.center);
        FreeVector::new(1.0, 0.0)
    };
    let point = ((a.center.to_vector() * a.radius + b.center.to_vector() * b.radius) / radii)
        .to_point();
    Some(Contact {
        point,
        normal,
        depth: radii - distance,
    })
}

/// Contact between a disc (A) and a segment (B).
///
/// The disc touches the segment only if its center projects onto the segment's interior;
/// contacts with the segment's endpoints are not considered. The normal is the segment's
/// normal, facing the disc, and the contact point is the foot of the perpendicular from the
/// disc's center.
pub fn circle_segment(a: &Circle, b: &Segment) -> Option<Contact> {
    if !(finite_point(a.center) && finite_point(b.center)) {
        log::trace!("circle_segment: non-finite input {a:?} {b:?}");
        return None;
    }
    let offset = a.center - b.center;
    let along = offset.dot(b.tangent());
    let across = offset.dot(b.normal());
    let half_length = b.half_length();
    if across * across > a.radius * a.radius || along * along > half_length * half_length {
        return None;
    }
    let normal = if across >= 0.0 { b.normal() } else { -b.normal() };
    let distance = across.abs();
    Some(Contact {
        point: a.center - normal * distance,
        normal,
        depth: a.radius - distance,
    })
}

/// Contact between a segment (A) and a disc (B); the mirror image of [`circle_segment()`].
pub fn segment_circle(a: &Segment, b: &Circle) -> Option<Contact> {
    circle_segment(b, a).map(Contact::flipped)
}

/// Contact between two crossing segments.
///
/// Segments whose directions differ by less than `parallel_threshold` radians never collide.
/// Otherwise, the contact point is their intersection. Of the two segments, the one crossed
/// farther from its own endpoints supplies the normal, since the other one is the segment
/// whose end is poking through it; the depth is how far that end has to go to get back out.
pub fn segment_segment(a: &Segment, b: &Segment, parallel_threshold: f64) -> Option<Contact> {
    if !(finite_point(a.center) && finite_point(b.center)) {
        log::trace!("segment_segment: non-finite input {a:?} {b:?}");
        return None;
    }
    let offset = b.center - a.center;
    let reach = a.half_length() + b.half_length();
    if offset.square_length() > reach * reach {
        return None;
    }

    let tangent_a = a.tangent();
    let tangent_b = b.tangent();
    let denominator = tangent_a.cross(tangent_b);
    if denominator.abs() < parallel_threshold.sin() || denominator == 0.0 {
        log::trace!("segment_segment: parallel segments {a:?} {b:?}");
        return None;
    }

    // Solve a.center + s·tangent_a = b.center + u·tangent_b.
    let s = offset.cross(tangent_b) / denominator;
    let u = offset.cross(tangent_a) / denominator;
    if s.abs() > a.half_length() || u.abs() > b.half_length() {
        return None;
    }
    let point = a.center + tangent_a * s;
    let depth_a = a.half_length() - s.abs();
    let depth_b = b.half_length() - u.abs();

    let normal = if depth_a > depth_b {
        // B's end is inside A: push A away from the side B's center is on.
        let n = a.normal();
        if n.dot(b.center - point) > 0.0 { -n } else { n }
    } else {
        // A's end is inside B: push A further towards the side its center is on.
        let n = b.normal();
        if n.dot(a.center - point) < 0.0 { -n } else { n }
    };
    Some(Contact {
        point,
        normal,
        depth: depth_a.min(depth_b),
    })
}
