use core::fmt;

#[cfg(doc)]
use crate::scene::Scene;

/// Copiable identifier of an entity in a [`Scene`].
///
/// Ids are only meaningful to the scene that issued them. Slots freed by removing an entity
/// are reused, but with a new generation number, so an id kept past its entity's removal
/// reports [`LookupError::Gone`](crate::scene::LookupError::Gone) rather than reaching
/// some other entity.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct EntityId {
    index: u32,
    generation: u32,
}

impl EntityId {
    pub(in crate::scene) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub(in crate::scene) fn index(self) -> usize {
        self.index as usize
    }

    pub(in crate::scene) fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { index, generation } = *self;
        write!(f, "EntityId({index}v{generation})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn debug() {
        assert_eq!(format!("{:?}", EntityId::new(4, 1)), "EntityId(4v1)");
    }

    #[test]
    fn order_is_by_slot_first() {
        assert!(EntityId::new(1, 9) < EntityId::new(2, 0));
    }
}
