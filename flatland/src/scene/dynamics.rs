//! Velocities, forces, torques, drag, and integration of entities' rigid bodies.

use crate::math::{Angle, FreePoint, FreeVector, PositiveSign, perp, rotate, unrotate};
use crate::physics::{PlacedShape, ShapeHandle};
use crate::scene::{EntityId, LookupError, Scene};
use crate::transform::Space;

impl Scene {
    /// Returns the world-space velocity of an entity.
    pub fn velocity(&self, id: EntityId) -> Result<FreeVector, LookupError> {
        Ok(self.body(id)?.velocity())
    }

    /// Sets the world-space velocity of an entity.
    pub fn set_velocity(&mut self, id: EntityId, velocity: FreeVector) -> Result<(), LookupError> {
        self.body_mut(id)?.set_velocity(velocity);
        Ok(())
    }

    fn parent_velocity(&self, id: EntityId) -> Result<FreeVector, LookupError> {
        match self.entity(id)?.transform.parent() {
            Some(parent) => self.velocity(parent),
            None => Ok(FreeVector::zero()),
        }
    }

    /// Returns the velocity of an entity relative to its parent, in the parent's rotated frame.
    pub fn local_velocity(&self, id: EntityId) -> Result<FreeVector, LookupError> {
        let relative = self.velocity(id)? - self.parent_velocity(id)?;
        Ok(unrotate(relative, self.parent_pose(id)?.angle))
    }

    /// Sets the velocity of an entity relative to its parent, in the parent's rotated frame.
    pub fn set_local_velocity(
        &mut self,
        id: EntityId,
        local_velocity: FreeVector,
    ) -> Result<(), LookupError> {
        let velocity =
            self.parent_velocity(id)? + rotate(local_velocity, self.parent_pose(id)?.angle);
        self.set_velocity(id, velocity)
    }

    /// Returns the world-space angular speed of an entity: its own plus all its ancestors'.
    pub fn angular_speed(&self, id: EntityId) -> Result<f64, LookupError> {
        let entity = self.entity(id)?;
        let local = entity.body.local_angular_speed();
        match entity.transform.parent() {
            Some(parent) => Ok(local + self.angular_speed(parent)?),
            None => Ok(local),
        }
    }

    /// Sets the world-space angular speed of an entity.
    pub fn set_angular_speed(
        &mut self,
        id: EntityId,
        angular_speed: f64,
    ) -> Result<(), LookupError> {
        let parent_speed = match self.entity(id)?.transform.parent() {
            Some(parent) => self.angular_speed(parent)?,
            None => 0.0,
        };
        self.body_mut(id)?.set_local_angular_speed(angular_speed - parent_speed);
        Ok(())
    }

    /// Returns the world-space velocity of the point `point` if it were attached to the entity,
    /// including the contribution of the entity's rotation.
    pub fn velocity_at_point(
        &self,
        id: EntityId,
        point: FreePoint,
    ) -> Result<FreeVector, LookupError> {
        let arm = point - self.pose(id)?.position;
        Ok(self.velocity(id)? + perp(arm) * self.angular_speed(id)?)
    }

    /// Returns the mass of the entity's body, if it uses physics, plus the total masses of all
    /// its children.
    ///
    /// This is the mass that resists forces applied to the entity, since its descendants are
    /// carried along with it.
    pub fn total_mass(&self, id: EntityId) -> Result<PositiveSign<f64>, LookupError> {
        let entity = self.entity(id)?;
        let mut total = if entity.body.uses_physics {
            PositiveSign::from(entity.body.mass())
        } else {
            PositiveSign::<f64>::ZERO
        };
        for &child in entity.transform.children() {
            total += self.total_mass(child)?;
        }
        Ok(total)
    }

    /// Returns the reciprocal of [`Self::total_mass()`], which is zero for infinite masses.
    ///
    /// A total mass of zero also gives zero, since such an entity has nothing for forces to
    /// act on.
    pub fn inverse_total_mass(&self, id: EntityId) -> Result<PositiveSign<f64>, LookupError> {
        let total = self.total_mass(id)?;
        if total == PositiveSign::<f64>::ZERO || !total.is_finite() {
            Ok(PositiveSign::<f64>::ZERO)
        } else {
            Ok(PositiveSign::<f64>::new_clamped(total.into_inner().recip()))
        }
    }

    /// Changes the entity's velocity by `force` divided by its [total mass](Self::total_mass).
    ///
    /// Forces are instantaneous: a force applied once changes the velocity once, regardless of
    /// the tick length. To accelerate continuously, scale the force by the tick length and
    /// apply it every tick.
    ///
    /// If `space` is [`Space::Local`], `force` is in the parent's rotated frame.
    pub fn apply_force(
        &mut self,
        id: EntityId,
        force: FreeVector,
        space: Space,
    ) -> Result<(), LookupError> {
        let inverse_mass = self.inverse_total_mass(id)?.into_inner();
        if inverse_mass == 0.0 {
            if self.total_mass(id)? == PositiveSign::<f64>::ZERO {
                log::trace!("ignoring force on massless {id:?}");
            }
            return Ok(());
        }
        let change = match space {
            Space::Global => force * inverse_mass,
            Space::Local => rotate(force * inverse_mass, self.parent_pose(id)?.angle),
        };
        let body = self.body_mut(id)?;
        body.set_velocity(body.velocity() + change);
        Ok(())
    }

    /// Applies a force of `magnitude` along the unit vector `direction`.
    pub fn apply_force_in_direction(
        &mut self,
        id: EntityId,
        magnitude: f64,
        direction: FreeVector,
        space: Space,
    ) -> Result<(), LookupError> {
        self.apply_force(id, direction * magnitude, space)
    }

    /// Applies a force of `magnitude` along the direction `angle`.
    pub fn apply_force_at_angle(
        &mut self,
        id: EntityId,
        magnitude: f64,
        angle: Angle,
        space: Space,
    ) -> Result<(), LookupError> {
        self.apply_force_in_direction(id, magnitude, angle.unit_vector(), space)
    }

    /// Returns the reciprocal of the body's moment of inertia, or zero if the entity cannot
    /// be moved at all because its [inverse total mass](Self::inverse_total_mass) is zero.
    pub fn inverse_moment_of_inertia(&self, id: EntityId) -> Result<f64, LookupError> {
        if self.inverse_total_mass(id)?.into_inner() == 0.0 {
            return Ok(0.0);
        }
        Ok(self.body(id)?.moment_of_inertia().recip().into_inner())
    }

    /// Changes the entity's angular speed by `torque` divided by its body's moment of inertia.
    ///
    /// Entities with infinite or zero total mass do not turn, whatever their inertia.
    pub fn apply_torque(&mut self, id: EntityId, torque: f64) -> Result<(), LookupError> {
        let inverse_inertia = self.inverse_moment_of_inertia(id)?;
        if inverse_inertia != 0.0 {
            let body = self.body_mut(id)?;
            body.set_local_angular_speed(body.local_angular_speed() + torque * inverse_inertia);
        }
        Ok(())
    }

    /// Applies `force` as if pushing on `position`, which both accelerates the entity as
    /// [`Self::apply_force()`] does and turns it with a torque of `arm × force`.
    ///
    /// * With [`Space::Global`], `position` is a point in world space and `force` is a
    ///   world-space vector.
    /// * With [`Space::Local`], `position` is the offset from the entity's position and
    ///   `force` a vector, both in the parent's rotated frame.
    pub fn apply_force_at_position(
        &mut self,
        id: EntityId,
        force: FreeVector,
        position: FreePoint,
        space: Space,
    ) -> Result<(), LookupError> {
        let arm = match space {
            Space::Global => position - self.pose(id)?.position,
            Space::Local => position.to_vector(),
        };
        self.apply_force(id, force, space)?;
        self.apply_torque(id, arm.cross(force))
    }

    /// Applies one tick's worth of air resistance, as defined by the body's
    /// [`Drag`](crate::physics::Drag).
    pub fn apply_drag(&mut self, id: EntityId) -> Result<(), LookupError> {
        let entity = self.entity(id)?;
        let local_angle = entity.transform.local_angle();
        let global_velocity = entity.body.velocity();
        let Some((force, center)) =
            entity
                .body
                .drag
                .force(global_velocity, self.local_velocity(id)?, local_angle)
        else {
            return Ok(());
        };
        let point = self.pose(id)?.position + rotate(center, self.parent_pose(id)?.angle);
        self.apply_force_at_position(id, force, point, Space::Global)
    }

    /// Returns the world-space geometry of one shape, or [`None`] if the body has no shape
    /// with that index.
    pub fn placed_shape(&self, handle: ShapeHandle) -> Result<Option<PlacedShape>, LookupError> {
        match self.body(handle.entity)?.shapes.get(handle.index) {
            Some(shape) => Ok(Some(shape.place(&self.pose(handle.entity)?))),
            None => Ok(None),
        }
    }

    /// Advances one body by `dt` seconds: gravity, then motion, then drag.
    ///
    /// Bodies that do not use physics are left alone.
    pub(crate) fn integrate(&mut self, id: EntityId, dt: f64) -> Result<bool, LookupError> {
        let body = self.body(id)?;
        if !body.uses_physics {
            return Ok(false);
        }
        let gravity = body.gravity;
        self.apply_force(id, gravity * dt, Space::Global)?;

        let local_velocity = self.local_velocity(id)?;
        let entity = self.entity_mut(id)?;
        let transform = &mut entity.transform;
        transform.set_local_position(transform.local_position() + local_velocity * dt);
        transform.set_local_angle(
            transform.local_angle() + Angle::from_radians(entity.body.local_angular_speed() * dt),
        );

        self.apply_drag(id)?;
        self.body_mut(id)?.calculated_this_frame = true;
        Ok(true)
    }
}
