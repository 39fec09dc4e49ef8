bitflags::bitflags! {
    /// Set of up to 64 layers an entity belongs to.
    ///
    /// Two bodies are considered for collision only if their masks [intersect]; a camera
    /// draws the entities whose masks intersect its own.
    ///
    /// [intersect]: LayerMask::intersects
    #[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
    pub struct LayerMask: u64 {
        /// Layer 0, which new entities are placed on unless otherwise specified.
        const DEFAULT = 1 << 0;

        // Every bit is a valid layer.
        const _ = !0;
    }
}

impl LayerMask {
    /// Returns the mask containing only layer `index`, or [`None`] if `index` ≥ 64.
    #[inline]
    pub const fn layer(index: u32) -> Option<Self> {
        match 1u64.checked_shl(index) {
            Some(bits) => Some(Self::from_bits_retain(bits)),
            None => None,
        }
    }

    /// Returns the highest-numbered layer in this mask, or [`None`] if it is empty.
    #[inline]
    pub const fn highest_layer(self) -> Option<u32> {
        match self.bits() {
            0 => None,
            bits => Some(63 - bits.leading_zeros()),
        }
    }
}

impl Default for LayerMask {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}
