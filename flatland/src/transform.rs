//! Position, orientation, and scale of entities, relative to their parents.

use core::fmt;

use manyfmt::{Fmt, Refmt as _};

use crate::math::{Angle, FreePoint, FreeVector, perp, rotate, unrotate};
use crate::scene::EntityId;
use crate::util::ConciseDebug;

#[cfg(doc)]
use crate::scene::Scene;

// -------------------------------------------------------------------------------------------------

/// Which frame of reference a vector or point argument is expressed in.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum Space {
    /// World coordinates.
    #[default]
    Global,
    /// The frame of the entity's parent; world coordinates if it has no parent.
    ///
    /// This is the frame in which the entity's local position and velocity are measured.
    Local,
}

// -------------------------------------------------------------------------------------------------

/// The local placement of an entity, and its links to the rest of the scene hierarchy.
///
/// Local quantities are relative to the parent's global [`Pose`]:
///
/// * the global position is the parent's position plus the local position rotated by the
///   parent's angle,
/// * the global angle is the sum of the local angle and the parent's angle,
/// * the global scale is the sum of the local scale and the parent's scale.
///
/// An entity without a parent is in world space, so its local values are its global ones.
/// The parent and child links can only be changed through the [`Scene`], which keeps them
/// mutually consistent and free of cycles.
#[derive(Clone, PartialEq)]
pub struct Transform {
    local_position: FreePoint,
    local_angle: Angle,
    local_scale: FreeVector,
    parent: Option<EntityId>,
    children: Vec<EntityId>,
}

impl Transform {
    /// Creates a root transform with the given world-space placement.
    pub fn new(position: FreePoint, angle: Angle, scale: FreeVector) -> Self {
        Self {
            local_position: position,
            local_angle: angle,
            local_scale: scale,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Position relative to the parent, in the parent's rotated frame.
    pub fn local_position(&self) -> FreePoint {
        self.local_position
    }
    /// Angle relative to the parent.
    pub fn local_angle(&self) -> Angle {
        self.local_angle
    }
    /// Scale relative to the parent.
    pub fn local_scale(&self) -> FreeVector {
        self.local_scale
    }

    /// Sets the position relative to the parent.
    pub fn set_local_position(&mut self, position: FreePoint) {
        self.local_position = position;
    }
    /// Sets the angle relative to the parent.
    pub fn set_local_angle(&mut self, angle: Angle) {
        self.local_angle = angle;
    }
    /// Sets the scale relative to the parent.
    pub fn set_local_scale(&mut self, scale: FreeVector) {
        self.local_scale = scale;
    }

    /// Returns the entity this one is attached to, if any.
    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    /// Returns the entities directly attached to this one, in the order they were attached.
    pub fn children(&self) -> &[EntityId] {
        &self.children
    }

    /// Unit vector along the +X axis of this transform's local angle, in the parent's frame.
    pub fn local_right(&self) -> FreeVector {
        self.local_angle.unit_vector()
    }

    /// Unit vector along the +Y axis of this transform's local angle, in the parent's frame.
    pub fn local_up(&self) -> FreeVector {
        perp(self.local_right())
    }

    pub(crate) fn set_parent_link(&mut self, parent: Option<EntityId>) {
        self.parent = parent;
    }

    pub(crate) fn add_child_link(&mut self, child: EntityId) {
        if !self.children.contains(&child) {
            self.children.push(child);
        }
    }

    pub(crate) fn remove_child_link(&mut self, child: EntityId) {
        self.children.retain(|&c| c != child);
    }

    pub(crate) fn take_children(&mut self) -> Vec<EntityId> {
        core::mem::take(&mut self.children)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(FreePoint::origin(), Angle::ZERO, FreeVector::new(1.0, 1.0))
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            local_position,
            local_angle,
            local_scale,
            parent,
            children,
        } = self;
        f.debug_struct("Transform")
            .field("local_position", &local_position.refmt(&ConciseDebug))
            .field("local_angle", &local_angle.refmt(&ConciseDebug))
            .field("local_scale", &local_scale.refmt(&ConciseDebug))
            .field("parent", parent)
            .field("children", children)
            .finish()
    }
}

// -------------------------------------------------------------------------------------------------

/// The world-space placement of an entity, computed by composing its [`Transform`] with
/// those of all its ancestors.
#[derive(Clone, Copy, Debug, PartialEq)]
#[expect(clippy::exhaustive_structs)]
pub struct Pose {
    /// Position in world coordinates.
    pub position: FreePoint,
    /// Orientation in world coordinates.
    pub angle: Angle,
    /// Sum of the local scales of the entity and all its ancestors.
    pub scale: FreeVector,
}

impl Pose {
    /// The frame of entities that have no parent.
    ///
    /// Note that its scale is zero, not one, since scales combine by addition.
    pub const WORLD: Self = Self {
        position: FreePoint::new(0.0, 0.0),
        angle: Angle::ZERO,
        scale: FreeVector::new(0.0, 0.0),
    };

    /// Returns the pose of an entity whose parent has this pose.
    #[must_use]
    pub fn compose(&self, child: &Transform) -> Self {
        Self {
            position: self.local_to_global_point(child.local_position),
            angle: self.angle + child.local_angle,
            scale: self.scale + child.local_scale,
        }
    }

    /// Converts a point in this pose's frame to world coordinates.
    pub fn local_to_global_point(&self, point: FreePoint) -> FreePoint {
        self.position + rotate(point.to_vector(), self.angle)
    }

    /// Converts a point in world coordinates to this pose's frame.
    pub fn global_to_local_point(&self, point: FreePoint) -> FreePoint {
        unrotate(point - self.position, self.angle).to_point()
    }

    /// Converts a direction or velocity in this pose's frame to world coordinates.
    pub fn local_to_global_vector(&self, vector: FreeVector) -> FreeVector {
        rotate(vector, self.angle)
    }

    /// Converts a direction or velocity in world coordinates to this pose's frame.
    pub fn global_to_local_vector(&self, vector: FreeVector) -> FreeVector {
        unrotate(vector, self.angle)
    }

    /// Converts an angle measured in this pose's frame to a world angle.
    pub fn local_to_global_angle(&self, angle: Angle) -> Angle {
        self.angle + angle
    }

    /// Converts a world angle to one measured in this pose's frame.
    pub fn global_to_local_angle(&self, angle: Angle) -> Angle {
        angle - self.angle
    }

    /// Unit vector along this pose's +X axis.
    pub fn right(&self) -> FreeVector {
        self.angle.unit_vector()
    }

    /// Unit vector along this pose's +Y axis.
    pub fn up(&self) -> FreeVector {
        perp(self.right())
    }
}

impl Fmt<ConciseDebug> for Pose {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>, fopt: &ConciseDebug) -> fmt::Result {
        write!(
            fmt,
            "{} @ {} × {}",
            self.position.refmt(fopt),
            self.angle.refmt(fopt),
            self.scale.refmt(fopt)
        )
    }
}
