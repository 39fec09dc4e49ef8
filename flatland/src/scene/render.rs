use core::cmp::Reverse;

use crate::math::{Angle, FreePoint, FreeVector, LayerMask};
use crate::scene::{EntityId, LookupError, Name, Scene, SpriteId};

/// What a renderer needs to know to draw one entity from one camera's point of view.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct RenderItem {
    /// The entity to draw.
    pub entity: EntityId,
    /// The entity's name.
    pub name: Name,
    /// The entity's image, if it has one.
    pub sprite: Option<SpriteId>,
    /// World-space position.
    pub position: FreePoint,
    /// World-space angle.
    pub angle: Angle,
    /// World-space scale.
    pub scale: FreeVector,
    /// World-space unit vector along the entity's +X axis.
    pub right: FreeVector,
    /// World-space unit vector along the entity's +Y axis.
    pub up: FreeVector,
    /// Position relative to the camera's position, unrotated.
    pub camera_offset: FreeVector,
    /// The highest layer shared by the entity and the camera. Items on higher layers are
    /// drawn first, so lower layers appear on top.
    pub layer: u32,
}

impl Scene {
    /// Returns everything `camera` can see, in drawing order.
    ///
    /// An entity is visible if its layers intersect the camera's. Items are ordered by the
    /// highest layer they share with the camera, highest first; entities with the same layer
    /// keep the order of their ids. Cameras are never included.
    pub fn render_list(&self, camera: EntityId) -> Result<Vec<RenderItem>, LookupError> {
        let camera_entity = self.entity(camera)?;
        if camera_entity.camera.is_none() {
            return Err(LookupError::NotACamera(camera));
        }
        let view_layers: LayerMask = camera_entity.layers;
        let camera_position = self.pose(camera)?.position;

        let mut items = Vec::new();
        for (id, entity) in self.iter() {
            if entity.camera.is_some() {
                continue;
            }
            let Some(layer) = (entity.layers & view_layers).highest_layer() else {
                continue;
            };
            let pose = self.pose(id)?;
            items.push(RenderItem {
                entity: id,
                name: entity.name().clone(),
                sprite: entity.sprite,
                position: pose.position,
                angle: pose.angle,
                scale: pose.scale,
                right: pose.right(),
                up: pose.up(),
                camera_offset: pose.position - camera_position,
                layer,
            });
        }
        items.sort_by_key(|item| Reverse(item.layer));
        Ok(items)
    }
}
