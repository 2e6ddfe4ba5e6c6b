//! Integer box in voxel (ijk) space

use crate::core::types::{IVec3, UVec3};

/// Inclusive axis-aligned box of voxel coordinates.
///
/// `min > max` on any axis means the box is empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VoxelBox {
    pub min: IVec3,
    pub max: IVec3,
}

impl VoxelBox {
    /// An empty box; expanding it with any voxel yields that voxel.
    pub const EMPTY: VoxelBox = VoxelBox {
        min: IVec3::splat(i32::MAX),
        max: IVec3::splat(i32::MIN),
    };

    /// Create from inclusive min/max corners
    pub fn new(min: IVec3, max: IVec3) -> Self {
        Self { min, max }
    }

    /// Box containing a single voxel
    pub fn from_voxel(coord: IVec3) -> Self {
        Self { min: coord, max: coord }
    }

    /// Box spanning a full volume of the given dimensions
    pub fn full(dims: UVec3) -> Self {
        Self {
            min: IVec3::ZERO,
            max: dims.as_ivec3() - IVec3::ONE,
        }
    }

    /// True if the box contains no voxels
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Number of voxels per axis (zero if empty)
    pub fn size(&self) -> UVec3 {
        if self.is_empty() {
            return UVec3::ZERO;
        }
        (self.max - self.min + IVec3::ONE).as_uvec3()
    }

    /// Check if a voxel is inside the box
    pub fn contains(&self, coord: IVec3) -> bool {
        coord.x >= self.min.x && coord.x <= self.max.x &&
        coord.y >= self.min.y && coord.y <= self.max.y &&
        coord.z >= self.min.z && coord.z <= self.max.z
    }

    /// Expand to include a voxel
    pub fn expand(&mut self, coord: IVec3) {
        self.min = self.min.min(coord);
        self.max = self.max.max(coord);
    }

    /// Return merged box containing both
    pub fn merged(&self, other: &VoxelBox) -> VoxelBox {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        VoxelBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Intersection with another box (possibly empty)
    pub fn intersection(&self, other: &VoxelBox) -> VoxelBox {
        VoxelBox {
            min: self.min.max(other.min),
            max: self.max.min(other.max),
        }
    }

    /// Clamp to a volume extent, keeping only in-bounds voxels
    pub fn clamped(&self, dims: UVec3) -> VoxelBox {
        self.intersection(&VoxelBox::full(dims))
    }

    /// Iterate all voxel coordinates in the box, x fastest
    pub fn iter(&self) -> impl Iterator<Item = IVec3> + use<> {
        let b = *self;
        (b.min.z..=b.max.z).flat_map(move |z| {
            (b.min.y..=b.max.y).flat_map(move |y| {
                (b.min.x..=b.max.x).map(move |x| IVec3::new(x, y, z))
            })
        })
    }
}
