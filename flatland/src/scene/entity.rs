use core::fmt;

use manyfmt::{Fmt, Refmt as _};

use crate::math::{Angle, FreePoint, FreeVector, LayerMask, Positive};
use crate::physics::{ConfigurationError, RigidBody};
use crate::scene::{EntityId, Name};
use crate::transform::Transform;
use crate::util::{ConciseDebug, StatusText};

#[cfg(doc)]
use crate::scene::Scene;

/// Opaque identifier of the image an entity is drawn with.
///
/// The scene never interprets it; it is passed through to
/// [`RenderItem`](crate::scene::RenderItem)s.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[expect(clippy::exhaustive_structs)]
pub struct SpriteId(pub u32);

/// Makes an entity into a viewpoint from which the scene can be drawn.
///
/// The camera sees the entities whose layers intersect the camera entity's own layers.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Camera {
    aspect_ratio: Positive<f64>,
}

impl Camera {
    /// Constructs a [`Camera`] whose view is `aspect_ratio` times as wide as it is tall.
    pub fn new(aspect_ratio: f64) -> Result<Self, ConfigurationError> {
        Ok(Self {
            aspect_ratio: Positive::<f64>::try_new_finite(aspect_ratio)
                .map_err(|_| ConfigurationError::AspectRatio(aspect_ratio))?,
        })
    }

    /// Width of the view divided by its height.
    pub fn aspect_ratio(&self) -> Positive<f64> {
        self.aspect_ratio
    }
}

// -------------------------------------------------------------------------------------------------

/// Something that exists in a [`Scene`]: a named transform with a rigid body, and
/// optionally a sprite or camera.
#[derive(Clone, Debug)]
pub struct Entity {
    name: Name,
    pub(in crate::scene) transform: Transform,
    pub(in crate::scene) body: RigidBody,
    /// Layers the entity belongs to, for collision filtering and cameras.
    pub layers: LayerMask,
    /// Image the renderer draws the entity with, if any.
    pub sprite: Option<SpriteId>,
    pub(in crate::scene) camera: Option<Camera>,
}

impl Entity {
    /// Returns the name this entity was inserted with.
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Returns the local transform and hierarchy links.
    ///
    /// To get the entity's world-space placement, use [`Scene::pose()`].
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Returns the local transform for modification.
    ///
    /// Only local values can be changed this way; use [`Scene::set_parent()`] to move the
    /// entity in the hierarchy.
    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    /// Returns the entity's physical state.
    pub fn body(&self) -> &RigidBody {
        &self.body
    }

    /// Returns the entity's physical state for modification.
    pub fn body_mut(&mut self) -> &mut RigidBody {
        &mut self.body
    }

    /// Returns the camera component, if this entity is a camera.
    pub fn camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }
}

impl Fmt<StatusText> for Entity {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>, fopt: &StatusText) -> fmt::Result {
        write!(
            fmt,
            "{}: {} {}  {}",
            self.name,
            self.transform.local_position().refmt(&ConciseDebug),
            self.transform.local_angle().refmt(&ConciseDebug),
            self.body.refmt(fopt)
        )
    }
}

// -------------------------------------------------------------------------------------------------

/// Tool for constructing an [`Entity`] to insert into a [`Scene`].
///
/// The placement given to the builder is in world space, even if a [`parent`](Self::parent)
/// is specified. Unless a [`body`](Self::body) is given, the entity gets a default body
/// with [`RigidBody::uses_physics`] set to false.
#[derive(Clone, Debug)]
#[must_use]
pub struct EntityBuilder {
    pub(in crate::scene) position: FreePoint,
    pub(in crate::scene) angle: Angle,
    pub(in crate::scene) scale: FreeVector,
    pub(in crate::scene) layers: LayerMask,
    pub(in crate::scene) body: RigidBody,
    pub(in crate::scene) sprite: Option<SpriteId>,
    pub(in crate::scene) camera: Option<Camera>,
    pub(in crate::scene) parent: Option<EntityId>,
}

impl EntityBuilder {
    /// Starts building an entity at the origin, unrotated, with scale 1 on layer 0.
    pub fn new() -> Self {
        let mut body = RigidBody::new();
        body.uses_physics = false;
        Self {
            position: FreePoint::origin(),
            angle: Angle::ZERO,
            scale: FreeVector::new(1.0, 1.0),
            layers: LayerMask::DEFAULT,
            body,
            sprite: None,
            camera: None,
            parent: None,
        }
    }

    /// Sets the world-space position. Default: the origin.
    pub fn position(mut self, position: FreePoint) -> Self {
        self.position = position;
        self
    }
    /// Sets the world-space angle. Default: [`Angle::ZERO`].
    pub fn angle(mut self, angle: Angle) -> Self {
        self.angle = angle;
        self
    }
    /// Sets the world-space scale. Default: `(1, 1)`.
    pub fn scale(mut self, scale: FreeVector) -> Self {
        self.scale = scale;
        self
    }
    /// Sets the layers. Default: [`LayerMask::DEFAULT`].
    pub fn layers(mut self, layers: LayerMask) -> Self {
        self.layers = layers;
        self
    }
    /// Sets the physical state, replacing the default inert body.
    pub fn body(mut self, body: RigidBody) -> Self {
        self.body = body;
        self
    }
    /// Sets the image the entity is drawn with.
    pub fn sprite(mut self, sprite: SpriteId) -> Self {
        self.sprite = Some(sprite);
        self
    }
    /// Makes the entity a camera.
    pub fn camera(mut self, camera: Camera) -> Self {
        self.camera = Some(camera);
        self
    }

    /// Attaches the new entity to `parent`, preserving the world-space placement.
    pub fn parent(mut self, parent: EntityId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub(in crate::scene) fn into_entity(self, name: Name) -> Entity {
        Entity {
            name,
            transform: Transform::new(self.position, self.angle, self.scale),
            body: self.body,
            layers: self.layers,
            sprite: self.sprite,
            camera: self.camera,
        }
    }
}

impl Default for EntityBuilder {
    fn default() -> Self {
        Self::new()
    }
}
