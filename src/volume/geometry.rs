//! Volume grid geometry and coordinate transforms.
//!
//! The editing core never owns the intensity samples; it only needs the
//! grid's extent, spacing, origin and orientation to map between world
//! space and voxel (ijk) space. Integer ijk coordinates address voxel
//! centers.

use crate::core::types::{IVec3, Mat3, Mat4, UVec3, Vec3};
use crate::math::{Aabb, VoxelBox};

/// Geometry of a 3D sample grid: dimensions, spacing, origin, orientation.
#[derive(Clone, Debug)]
pub struct VolumeGeometry {
    dims: UVec3,
    spacing: Vec3,
    /// Voxel (continuous ijk) to world transform
    voxel_to_world: Mat4,
    /// Cached inverse for point queries
    world_to_voxel: Mat4,
}

impl VolumeGeometry {
    /// Create a grid from dimensions, spacing, world origin and a direction
    /// (orientation) matrix whose columns are the world directions of the
    /// i/j/k axes.
    pub fn new(dims: UVec3, spacing: Vec3, origin: Vec3, direction: Mat3) -> Self {
        let voxel_to_world = Mat4::from_translation(origin)
            * Mat4::from_mat3(direction)
            * Mat4::from_scale(spacing);
        Self {
            dims,
            spacing,
            voxel_to_world,
            world_to_voxel: voxel_to_world.inverse(),
        }
    }

    /// Axis-aligned grid with the given spacing, origin at world zero
    pub fn axis_aligned(dims: UVec3, spacing: Vec3) -> Self {
        Self::new(dims, spacing, Vec3::ZERO, Mat3::IDENTITY)
    }

    /// Unit-spacing axis-aligned grid (voxel coords == world coords)
    pub fn unit(dims: UVec3) -> Self {
        Self::axis_aligned(dims, Vec3::ONE)
    }

    /// Grid dimensions (voxels per axis)
    pub fn dims(&self) -> UVec3 {
        self.dims
    }

    /// Voxel size per axis
    pub fn spacing(&self) -> Vec3 {
        self.spacing
    }

    /// Total number of voxels
    pub fn voxel_count(&self) -> usize {
        self.dims.x as usize * self.dims.y as usize * self.dims.z as usize
    }

    /// Smallest spacing component (used for stroke supersampling)
    pub fn min_spacing(&self) -> f32 {
        self.spacing.x.min(self.spacing.y).min(self.spacing.z)
    }

    /// Check if a voxel coordinate is inside the grid
    pub fn in_bounds(&self, coord: IVec3) -> bool {
        VoxelBox::full(self.dims).contains(coord)
    }

    /// World position of a voxel center
    pub fn voxel_to_world(&self, coord: IVec3) -> Vec3 {
        self.voxel_to_world.transform_point3(coord.as_vec3())
    }

    /// Continuous ijk coordinates of a world point
    pub fn world_to_voxel_continuous(&self, point: Vec3) -> Vec3 {
        self.world_to_voxel.transform_point3(point)
    }

    /// Nearest voxel to a world point (may be out of bounds)
    pub fn world_to_voxel(&self, point: Vec3) -> IVec3 {
        let ijk = self.world_to_voxel_continuous(point);
        IVec3::new(
            ijk.x.round() as i32,
            ijk.y.round() as i32,
            ijk.z.round() as i32,
        )
    }

    /// World-space bounds of the whole grid (voxel centers padded by half a
    /// voxel on each side in ijk space before transforming)
    pub fn world_bounds(&self) -> Aabb {
        let max = self.dims.as_vec3() - Vec3::splat(0.5);
        let corners = [
            Vec3::new(-0.5, -0.5, -0.5),
            Vec3::new(max.x, -0.5, -0.5),
            Vec3::new(-0.5, max.y, -0.5),
            Vec3::new(max.x, max.y, -0.5),
            Vec3::new(-0.5, -0.5, max.z),
            Vec3::new(max.x, -0.5, max.z),
            Vec3::new(-0.5, max.y, max.z),
            Vec3::new(max.x, max.y, max.z),
        ];
        Aabb::from_points(corners.map(|c| self.voxel_to_world.transform_point3(c)))
    }

    /// Voxel box covering a world-space AABB (unclamped; callers clamp to
    /// the grid before iterating)
    pub fn world_aabb_to_voxels(&self, aabb: &Aabb) -> VoxelBox {
        let corners = [
            aabb.min,
            Vec3::new(aabb.max.x, aabb.min.y, aabb.min.z),
            Vec3::new(aabb.min.x, aabb.max.y, aabb.min.z),
            Vec3::new(aabb.max.x, aabb.max.y, aabb.min.z),
            Vec3::new(aabb.min.x, aabb.min.y, aabb.max.z),
            Vec3::new(aabb.max.x, aabb.min.y, aabb.max.z),
            Vec3::new(aabb.min.x, aabb.max.y, aabb.max.z),
            aabb.max,
        ];
        let mut result = VoxelBox::EMPTY;
        for corner in corners {
            let ijk = self.world_to_voxel_continuous(corner);
            result.expand(IVec3::new(
                ijk.x.floor() as i32,
                ijk.y.floor() as i32,
                ijk.z.floor() as i32,
            ));
            result.expand(IVec3::new(
                ijk.x.ceil() as i32,
                ijk.y.ceil() as i32,
                ijk.z.ceil() as i32,
            ));
        }
        result
    }

    /// Width of one voxel projected onto a world-space unit direction.
    /// Used to decide whether a voxel layer is cut by a slice plane.
    pub fn voxel_support_along(&self, dir: Vec3) -> f32 {
        let m = self.voxel_to_world;
        m.transform_vector3(Vec3::X).dot(dir).abs()
            + m.transform_vector3(Vec3::Y).dot(dir).abs()
            + m.transform_vector3(Vec3::Z).dot(dir).abs()
    }
}
