//! Area classification of walkable triangles and the masks used to filter them during queries.

#[cfg(feature = "bevy_reflect")]
use bevy_reflect::prelude::*;

/// The area type of a walkable triangle.
///
/// Area types are `0..=63`, matching the 6 bits Recast reserves for them.
/// [`AreaType::NOT_WALKABLE`] triangles are never part of a navmesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bevy_reflect", derive(Reflect))]
pub struct AreaType(pub u8);

impl From<u8> for AreaType {
    fn from(value: u8) -> Self {
        AreaType(value)
    }
}

impl AreaType {
    /// The area type 0. Triangles with this area type are not walkable.
    pub const NOT_WALKABLE: Self = Self(0);
    /// Default area type for walkable triangles. The highest possible area type.
    pub const DEFAULT_WALKABLE: Self = Self(63);

    /// Whether triangles of this area type can be walked on at all.
    #[inline]
    pub fn is_walkable(self) -> bool {
        self != Self::NOT_WALKABLE
    }
}

bitflags::bitflags! {
    /// Set of [`AreaType`]s a query is allowed to traverse. Bit `n` enables area type `n`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
    #[repr(transparent)]
    pub struct AreaMask: u64 {
        /// Traverse every area type.
        const ALL = u64::MAX;
    }
}

impl Default for AreaMask {
    fn default() -> Self {
        Self::ALL
    }
}

impl AreaMask {
    /// A mask allowing only the given area type.
    pub fn from_area(area: AreaType) -> Self {
        Self::empty().with_area(area)
    }

    /// Returns a copy of this mask that additionally allows `area`.
    #[must_use]
    pub fn with_area(self, area: AreaType) -> Self {
        let Some(bit) = 1_u64.checked_shl(u32::from(area.0)) else {
            return self;
        };
        self | Self::from_bits_retain(bit)
    }

    /// Whether a query using this mask may traverse triangles of the given area type.
    #[inline]
    pub fn allows(self, area: AreaType) -> bool {
        if !area.is_walkable() {
            return false;
        }
        if self == Self::ALL {
            return true;
        }
        1_u64
            .checked_shl(u32::from(area.0))
            .is_some_and(|bit| self.bits() & bit != 0)
    }
}
