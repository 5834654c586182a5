//! Fixed-width component signatures.
//!
//! A [`Signature`] is a 32-bit mask. Bit *i* set means the owner has (for an
//! entity) or requires (for a system) the component kind with id *i*.

use std::fmt;
use std::ops::{BitAnd, BitOr};

use crate::component::ComponentTypeId;

/// Maximum number of distinct component kinds; the width of a [`Signature`].
pub const MAX_COMPONENTS: usize = 32;

/// Bitmask of component kinds.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Signature(u32);

impl Signature {
    /// The empty signature.
    pub const EMPTY: Signature = Signature(0);

    /// Create an empty signature.
    #[inline]
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Build a signature from raw bits.
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw bits.
    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    fn mask(id: ComponentTypeId) -> u32 {
        assert!(
            id.index() < MAX_COMPONENTS,
            "component id {} does not fit in a {MAX_COMPONENTS}-bit signature",
            id.index()
        );
        1 << id.0
    }

    /// Set the bit for `id`.
    #[inline]
    pub fn set(&mut self, id: ComponentTypeId) {
        self.0 |= Self::mask(id);
    }

    /// Clear the bit for `id`.
    #[inline]
    pub fn clear(&mut self, id: ComponentTypeId) {
        self.0 &= !Self::mask(id);
    }

    /// Whether the bit for `id` is set.
    #[inline]
    pub fn test(self, id: ComponentTypeId) -> bool {
        self.0 & Self::mask(id) != 0
    }

    /// Superset test: every bit of `required` is also set in `self`.
    #[inline]
    pub fn contains(self, required: Signature) -> bool {
        self.0 & required.0 == required.0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of set bits.
    #[inline]
    pub fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Ids of all set bits, ascending.
    pub fn iter(self) -> impl Iterator<Item = ComponentTypeId> {
        (0..MAX_COMPONENTS as u32)
            .filter(move |&bit| self.0 & (1u32 << bit) != 0)
            .map(ComponentTypeId)
    }
}

impl BitAnd for Signature {
    type Output = Signature;

    fn bitand(self, rhs: Signature) -> Signature {
        Signature(self.0 & rhs.0)
    }
}

impl BitOr for Signature {
    type Output = Signature;

    fn bitor(self, rhs: Signature) -> Signature {
        Signature(self.0 | rhs.0)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({:#034b})", self.0)
    }
}
