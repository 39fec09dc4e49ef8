use crate::math::{FreePoint, FreeVector, ZeroOne, perp};
use crate::physics::Collision;
use crate::scene::{EntityId, LookupError, Scene};
use crate::transform::Space;

/// What [`Collision::resolve()`] did.
#[derive(Clone, Copy, Debug, PartialEq)]
#[non_exhaustive]
pub enum Resolution {
    /// The bodies were approaching; an impulse was applied and they were pushed apart.
    Resolved {
        /// Signed magnitude of the impulse along the contact normal.
        normal_impulse: f64,
        /// Signed magnitude of the friction impulse along the contact tangent.
        tangent_impulse: f64,
        /// Which friction coefficient applied.
        friction: FrictionRegime,
    },
    /// The bodies were already separating, so no impulse was applied, but they were still
    /// pushed apart.
    Separating,
    /// Neither body can be moved, since both have infinite mass.
    Immovable,
    /// One of the shapes is a sensor; nothing was changed.
    Sensor,
}

/// Which friction coefficient limited the tangential impulse of a contact.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, exhaust::Exhaust)]
#[non_exhaustive]
pub enum FrictionRegime {
    /// The tangential impulse fully stopped relative sliding at the contact point.
    Static,
    /// Stopping the sliding would have required more than static friction allows, so a
    /// dynamic friction impulse opposing the sliding was applied instead.
    Dynamic,
}

/// Quantities of one body needed to compute an impulse.
struct BodyTerms {
    id: EntityId,
    inverse_mass: f64,
    inverse_inertia: f64,
    /// Offset from the body's position to the contact point.
    arm: FreeVector,
}

impl BodyTerms {
    fn new(scene: &Scene, id: EntityId, point: FreePoint) -> Result<Self, LookupError> {
        Ok(Self {
            id,
            inverse_mass: scene.inverse_total_mass(id)?.into_inner(),
            inverse_inertia: scene.inverse_moment_of_inertia(id)?,
            arm: point - scene.pose(id)?.position,
        })
    }

    /// Contribution of this body to the effective inverse mass along `direction`.
    fn inverse_mass_along(&self, direction: FreeVector) -> f64 {
        let lever = self.arm.cross(direction);
        self.inverse_mass + lever * lever * self.inverse_inertia
    }
}

impl Collision {
    /// Applies the collision response to both bodies in `scene`.
    ///
    /// If the bodies are approaching at the contact point, an impulse along the normal
    /// reverses their relative normal velocity scaled by the combined bounciness, and a
    /// friction impulse along the tangent opposes sliding. Then, whether or not they were
    /// approaching, both bodies are moved apart along the normal by `correction_percent` of
    /// the penetration depth, split in proportion to their inverse masses.
    ///
    /// Bodies with infinite mass are never moved or accelerated.
    pub fn resolve(
        &self,
        scene: &mut Scene,
        correction_percent: ZeroOne<f64>,
    ) -> Result<Resolution, LookupError> {
        if self.sensor {
            return Ok(Resolution::Sensor);
        }
        let Self {
            a,
            b,
            contact,
            material,
            ..
        } = *self;
        let body_a = BodyTerms::new(scene, a.entity, contact.point)?;
        let body_b = BodyTerms::new(scene, b.entity, contact.point)?;
        if body_a.inverse_mass == 0.0 && body_b.inverse_mass == 0.0 {
            log::trace!("both bodies immovable: {:?} {:?}", a.entity, b.entity);
            return Ok(Resolution::Immovable);
        }

        let normal = contact.normal;
        let relative_velocity = scene.velocity_at_point(b.entity, contact.point)?
            - scene.velocity_at_point(a.entity, contact.point)?;
        let approach_speed = relative_velocity.dot(normal);

        if approach_speed < 0.0 {
            push_apart(scene, self, &body_a, &body_b, correction_percent)?;
            return Ok(Resolution::Separating);
        }

        let normal_denominator =
            body_a.inverse_mass_along(normal) + body_b.inverse_mass_along(normal);
        let normal_impulse =
            -(1.0 + material.bounciness.into_inner()) * approach_speed / normal_denominator;

        let tangent = perp(normal);
        let sliding_speed = relative_velocity.dot(tangent);
        let tangent_denominator =
            body_a.inverse_mass_along(tangent) + body_b.inverse_mass_along(tangent);
        let sticking_impulse = if tangent_denominator > 0.0 {
            -sliding_speed / tangent_denominator
        } else {
            0.0
        };
        let friction_limit = normal_impulse.abs() * material.static_friction.into_inner();
        let sliding_limit = normal_impulse.abs() * material.dynamic_friction.into_inner();
        let (tangent_impulse, friction) = if sticking_impulse.abs() <= friction_limit {
            (sticking_impulse, FrictionRegime::Static)
        } else {
            (-sliding_speed.signum() * sliding_limit, FrictionRegime::Dynamic)
        };

        let impulse = normal * normal_impulse + tangent * tangent_impulse;
        scene.apply_force_at_position(a.entity, -impulse, contact.point, Space::Global)?;
        scene.apply_force_at_position(b.entity, impulse, contact.point, Space::Global)?;
        push_apart(scene, self, &body_a, &body_b, correction_percent)?;

        Ok(Resolution::Resolved {
            normal_impulse,
            tangent_impulse,
            friction,
        })
    }
}

/// Moves both bodies along the contact normal to remove part of the penetration.
fn push_apart(
    scene: &mut Scene,
    collision: &Collision,
    body_a: &BodyTerms,
    body_b: &BodyTerms,
    correction_percent: ZeroOne<f64>,
) -> Result<(), LookupError> {
    let total = body_a.inverse_mass + body_b.inverse_mass;
    if total <= 0.0 {
        return Ok(());
    }
    let correction = collision.contact.normal
        * (collision.contact.depth * correction_percent.into_inner() / total);
    for (terms, sign) in [(body_a, 1.0), (body_b, -1.0)] {
        if terms.inverse_mass > 0.0 {
            let position = scene.pose(terms.id)?.position;
            scene.set_position(terms.id, position + correction * (sign * terms.inverse_mass))?;
        }
    }
    Ok(())
}
