//! Transform hierarchy: global poses, reparenting, and pose setters.

use crate::math::{Angle, FreePoint, FreeVector};
use crate::scene::{EntityId, HierarchyError, LookupError, Scene};
use crate::transform::Pose;

impl Scene {
    /// Returns the world-space pose of an entity, composed from its own transform and those
    /// of all its ancestors.
    pub fn pose(&self, id: EntityId) -> Result<Pose, LookupError> {
        let entity = self.entity(id)?;
        Ok(self.parent_pose(id)?.compose(&entity.transform))
    }

    /// Returns the world-space pose of an entity's parent, or [`Pose::WORLD`] if it has none.
    pub fn parent_pose(&self, id: EntityId) -> Result<Pose, LookupError> {
        match self.entity(id)?.transform.parent() {
            Some(parent) => self.pose(parent),
            None => Ok(Pose::WORLD),
        }
    }

    /// Moves the entity so that its world-space position is `position`.
    pub fn set_position(&mut self, id: EntityId, position: FreePoint) -> Result<(), LookupError> {
        let local = self.parent_pose(id)?.global_to_local_point(position);
        self.entity_mut(id)?.transform.set_local_position(local);
        Ok(())
    }

    /// Moves the entity by `offset` in world space.
    pub fn translate(&mut self, id: EntityId, offset: FreeVector) -> Result<(), LookupError> {
        let position = self.pose(id)?.position;
        self.set_position(id, position + offset)
    }

    /// Rotates the entity so that its world-space angle is `angle`.
    pub fn set_angle(&mut self, id: EntityId, angle: Angle) -> Result<(), LookupError> {
        let local = angle - self.parent_pose(id)?.angle;
        self.entity_mut(id)?.transform.set_local_angle(local);
        Ok(())
    }

    /// Scales the entity so that its world-space scale is `scale`.
    pub fn set_scale(&mut self, id: EntityId, scale: FreeVector) -> Result<(), LookupError> {
        let local = scale - self.parent_pose(id)?.scale;
        self.entity_mut(id)?.transform.set_local_scale(local);
        Ok(())
    }

    /// Rotates the entity so that its +X axis points at `target`.
    ///
    /// If `target` is exactly at the entity's position, the angle is unchanged.
    pub fn look_at(&mut self, id: EntityId, target: FreePoint) -> Result<(), LookupError> {
        let position = self.pose(id)?.position;
        match Angle::of_vector(target - position) {
            Some(angle) => self.set_angle(id, angle),
            None => Ok(()),
        }
    }

    /// Rotates the entity so that its +X axis points at another entity's position.
    pub fn look_at_entity(&mut self, id: EntityId, target: EntityId) -> Result<(), LookupError> {
        let target = self.pose(target)?.position;
        self.look_at(id, target)
    }

    /// Attaches `child` to `parent`, or detaches it to be a root if `parent` is [`None`].
    ///
    /// The child's world-space pose, velocity, and angular speed are unchanged; its local
    /// values are recomputed relative to the new parent. Its own descendants move along with
    /// it, so they are unchanged too.
    ///
    /// Fails if `parent` is `child` or one of its descendants.
    pub fn set_parent(
        &mut self,
        child: EntityId,
        parent: Option<EntityId>,
    ) -> Result<(), HierarchyError> {
        self.entity(child)?;
        if let Some(parent) = parent {
            self.entity(parent)?;
            if parent == child || self.is_descendant_of(parent, child) {
                return Err(HierarchyError::WouldCycle { child, parent });
            }
        }
        self.attach(child, parent)?;
        Ok(())
    }

    /// Relinks `child` under `parent`, preserving world-space state, without checking for
    /// cycles.
    pub(in crate::scene) fn attach(
        &mut self,
        child: EntityId,
        parent: Option<EntityId>,
    ) -> Result<(), LookupError> {
        let pose = self.pose(child)?;
        let angular_speed = self.angular_speed(child)?;
        let new_parent_pose = match parent {
            Some(parent) => self.pose(parent)?,
            None => Pose::WORLD,
        };
        let new_parent_angular_speed = match parent {
            Some(parent) => self.angular_speed(parent)?,
            None => 0.0,
        };

        if let Some(old_parent) = self.entity(child)?.transform.parent()
            && let Ok(old_parent) = self.entity_mut(old_parent)
        {
            old_parent.transform.remove_child_link(child);
        }
        if let Some(parent) = parent {
            self.entity_mut(parent)?.transform.add_child_link(child);
        }

        let entity = self.entity_mut(child)?;
        let transform = &mut entity.transform;
        transform.set_parent_link(parent);
        transform.set_local_position(new_parent_pose.global_to_local_point(pose.position));
        transform.set_local_angle(pose.angle - new_parent_pose.angle);
        transform.set_local_scale(pose.scale - new_parent_pose.scale);
        entity
            .body
            .set_local_angular_speed(angular_speed - new_parent_angular_speed);
        Ok(())
    }

    /// Returns whether `parent` is the direct parent of `child`.
    ///
    /// Returns false if either entity does not exist.
    pub fn is_child_of(&self, child: EntityId, parent: EntityId) -> bool {
        self.entity(parent).is_ok()
            && self
                .entity(child)
                .is_ok_and(|c| c.transform.parent() == Some(parent))
    }

    /// Returns whether `ancestor` is the parent of `id`, or the parent of its parent, and so on.
    ///
    /// Returns false if either entity does not exist.
    pub fn is_descendant_of(&self, id: EntityId, ancestor: EntityId) -> bool {
        if self.entity(ancestor).is_err() {
            return false;
        }
        let mut current = id;
        while let Ok(entity) = self.entity(current) {
            match entity.transform.parent() {
                Some(parent) if parent == ancestor => return true,
                Some(parent) => current = parent,
                None => return false,
            }
        }
        false
    }

    /// Returns the number of entities directly attached to `id`.
    pub fn child_count(&self, id: EntityId) -> Result<usize, LookupError> {
        Ok(self.entity(id)?.transform.children().len())
    }

    /// Returns the number of entities attached to `id` directly or indirectly.
    pub fn descendant_count(&self, id: EntityId) -> Result<usize, LookupError> {
        let mut count = 0;
        let mut stack = self.entity(id)?.transform.children().to_vec();
        while let Some(next) = stack.pop() {
            count += 1;
            stack.extend_from_slice(self.entity(next)?.transform.children());
        }
        Ok(count)
    }
}
