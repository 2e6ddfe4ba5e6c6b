//! Brush footprint projection.

use std::collections::HashSet;

use crate::core::types::{IVec3, Vec3};
use crate::math::Aabb;
use crate::view::{ViewContext, ViewKind};
use crate::volume::VolumeGeometry;
use super::{BrushConfig, BrushShape, SizingMode};

/// Tolerance for surface hits so voxel centers exactly on the brush
/// boundary are included
const EDGE_EPS: f32 = 1e-4;

/// World-space brush diameter for a sample.
///
/// Invariant sizing converts the pixel diameter with the view's current
/// pixel scale, so it must be re-evaluated on every sample; zoom can
/// change mid-stroke. Pressure, when reported, scales the diameter.
pub fn world_diameter(brush: &BrushConfig, view: &ViewContext, pressure: Option<f32>) -> f32 {
    let diameter = match brush.sizing {
        SizingMode::Absolute => brush.diameter,
        SizingMode::Invariant => brush.diameter * view.mm_per_pixel,
    };
    diameter * pressure.unwrap_or(1.0)
}

/// Voxels affected by one brush sample at a world position.
///
/// Slice views constrain the footprint to the voxel layer cut by the
/// slice plane; 3D views get the full 3D footprint (planar shapes stay
/// one layer thick around the view's focal plane). A brush smaller than
/// one voxel still affects the nearest voxel.
pub fn footprint(
    geometry: &VolumeGeometry,
    view: &ViewContext,
    brush: &BrushConfig,
    world_center: Vec3,
    pressure: Option<f32>,
) -> Vec<IVec3> {
    let radius = world_diameter(brush, view, pressure) * 0.5;
    let normal = view.plane.normal;
    let half_layer = geometry.voxel_support_along(normal) * 0.5 + EDGE_EPS;

    // Planar shapes and slice views are restricted to one voxel layer
    let layer_bound = match (view.kind, brush.shape) {
        (ViewKind::Slice, _) => Some(view.plane),
        (ViewKind::ThreeD, BrushShape::Disc | BrushShape::Square) => {
            Some(crate::math::Plane::new(world_center, normal))
        }
        (ViewKind::ThreeD, BrushShape::Sphere) => None,
    };

    // Screen axes in world space orient square brushes
    let axis_u = view.view_to_world.transform_vector3(Vec3::X).normalize_or(Vec3::X);
    let axis_v = view.view_to_world.transform_vector3(Vec3::Y).normalize_or(Vec3::Y);

    let half_extent = Vec3::splat(radius.max(geometry.min_spacing() * 0.5));
    let candidates = geometry
        .world_aabb_to_voxels(&Aabb::from_center_half_extent(world_center, half_extent))
        .clamped(geometry.dims());

    let mut voxels = Vec::new();
    for coord in candidates.iter() {
        let center = geometry.voxel_to_world(coord);
        if let Some(plane) = layer_bound {
            if plane.signed_distance(center).abs() > half_layer {
                continue;
            }
        }

        let offset = center - world_center;
        let inside = match brush.shape {
            BrushShape::Sphere => offset.length() <= radius + EDGE_EPS,
            BrushShape::Disc => {
                let in_plane = offset - normal * offset.dot(normal);
                in_plane.length() <= radius + EDGE_EPS
            }
            BrushShape::Square => {
                offset.dot(axis_u).abs() <= radius + EDGE_EPS
                    && offset.dot(axis_v).abs() <= radius + EDGE_EPS
            }
        };
        if inside {
            voxels.push(coord);
        }
    }

    // Minimum footprint of one voxel
    if voxels.is_empty() {
        let nearest = geometry.world_to_voxel(world_center);
        if geometry.in_bounds(nearest) {
            voxels.push(nearest);
        }
    }
    voxels
}

/// Union of footprints along the segment between two samples.
///
/// The segment is supersampled at half the smallest voxel spacing so
/// fast pointer motion still paints a continuous path.
pub fn path_footprint(
    geometry: &VolumeGeometry,
    view: &ViewContext,
    brush: &BrushConfig,
    from_world: Vec3,
    to_world: Vec3,
    pressure: Option<f32>,
) -> Vec<IVec3> {
    let step = (geometry.min_spacing() * 0.5).max(1e-3);
    let distance = (to_world - from_world).length();
    let steps = (distance / step).ceil() as usize;

    if steps == 0 {
        return footprint(geometry, view, brush, to_world, pressure);
    }

    let mut union: HashSet<IVec3> = HashSet::new();
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        let sample = from_world.lerp(to_world, t);
        union.extend(footprint(geometry, view, brush, sample, pressure));
    }
    union.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Mat4, UVec3};
    use crate::math::Plane;

    fn unit_volume() -> VolumeGeometry {
        VolumeGeometry::unit(UVec3::splat(10))
    }

    fn three_d_view() -> ViewContext {
        ViewContext::three_d(Mat4::IDENTITY, 1.0, Plane::new(Vec3::ZERO, Vec3::Z))
    }

    fn slice_view_at_z(z: f32) -> ViewContext {
        // Display (x, y) maps straight onto the z = const slice plane
        let view_to_world = Mat4::from_translation(Vec3::new(0.0, 0.0, z));
        ViewContext::slice(view_to_world, 1.0, Plane::new(Vec3::new(0.0, 0.0, z), Vec3::Z))
    }

    fn absolute_sphere(diameter: f32) -> BrushConfig {
        BrushConfig {
            shape: BrushShape::Sphere,
            sizing: SizingMode::Absolute,
            diameter,
        }
    }

    #[test]
    fn test_invariant_diameter_tracks_zoom() {
        let brush = BrushConfig {
            sizing: SizingMode::Invariant,
            diameter: 20.0,
            ..BrushConfig::default()
        };
        let baseline = ViewContext::slice(Mat4::IDENTITY, 1.0, Plane::default());
        // 2x zoom: each pixel covers half the world length
        let zoomed = ViewContext::slice(Mat4::IDENTITY, 0.5, Plane::default());

        let d1 = world_diameter(&brush, &baseline, None);
        let d2 = world_diameter(&brush, &zoomed, None);
        assert_eq!(d1, 20.0);
        assert_eq!(d2, 10.0);
    }

    #[test]
    fn test_absolute_diameter_ignores_zoom() {
        let brush = absolute_sphere(8.0);
        let zoomed = ViewContext::slice(Mat4::IDENTITY, 0.25, Plane::default());
        assert_eq!(world_diameter(&brush, &zoomed, None), 8.0);
    }

    #[test]
    fn test_pressure_scales_diameter() {
        let brush = absolute_sphere(8.0);
        let view = three_d_view();
        assert_eq!(world_diameter(&brush, &view, Some(0.5)), 4.0);
    }

    #[test]
    fn test_sphere_radius_one_hits_face_neighbors() {
        let geometry = unit_volume();
        let view = three_d_view();
        let brush = absolute_sphere(2.0); // radius 1 voxel

        let mut voxels = footprint(&geometry, &view, &brush, Vec3::splat(5.0), None);
        voxels.sort_unstable_by_key(|c| (c.z, c.y, c.x));

        let center = IVec3::splat(5);
        let mut expected = vec![
            center,
            center - IVec3::X,
            center + IVec3::X,
            center - IVec3::Y,
            center + IVec3::Y,
            center - IVec3::Z,
            center + IVec3::Z,
        ];
        expected.sort_unstable_by_key(|c| (c.z, c.y, c.x));
        assert_eq!(voxels, expected);
    }

    #[test]
    fn test_minimum_footprint_is_one_voxel() {
        let geometry = unit_volume();
        let view = three_d_view();
        let brush = absolute_sphere(0.01); // far below one voxel

        let voxels = footprint(&geometry, &view, &brush, Vec3::new(3.3, 4.6, 5.1), None);
        assert_eq!(voxels, vec![IVec3::new(3, 5, 5)]);
    }

    #[test]
    fn test_out_of_volume_sample_is_empty() {
        let geometry = unit_volume();
        let view = three_d_view();
        let brush = absolute_sphere(0.5);

        let voxels = footprint(&geometry, &view, &brush, Vec3::splat(50.0), None);
        assert!(voxels.is_empty());
    }

    #[test]
    fn test_slice_view_constrains_to_layer() {
        let geometry = unit_volume();
        let view = slice_view_at_z(5.0);
        let brush = absolute_sphere(4.0);

        let voxels = footprint(&geometry, &view, &brush, Vec3::new(5.0, 5.0, 5.0), None);
        assert!(!voxels.is_empty());
        assert!(voxels.iter().all(|c| c.z == 5));
    }

    #[test]
    fn test_square_brush_in_slice() {
        let geometry = unit_volume();
        let view = slice_view_at_z(2.0);
        let brush = BrushConfig {
            shape: BrushShape::Square,
            sizing: SizingMode::Absolute,
            diameter: 2.0,
        };

        let voxels = footprint(&geometry, &view, &brush, Vec3::new(5.0, 5.0, 2.0), None);
        // 3x3 in-plane square, one layer thick
        assert_eq!(voxels.len(), 9);
        assert!(voxels.iter().all(|c| c.z == 2));
        assert!(voxels.iter().all(|c| (c.x - 5).abs() <= 1 && (c.y - 5).abs() <= 1));
    }

    #[test]
    fn test_disc_brush_in_three_d_stays_planar() {
        let geometry = unit_volume();
        let view = three_d_view();
        let brush = BrushConfig {
            shape: BrushShape::Disc,
            sizing: SizingMode::Absolute,
            diameter: 4.0,
        };

        let voxels = footprint(&geometry, &view, &brush, Vec3::splat(5.0), None);
        assert!(!voxels.is_empty());
        // focal plane normal is Z: a single z layer
        assert!(voxels.iter().all(|c| c.z == 5));
    }

    #[test]
    fn test_path_footprint_is_continuous() {
        let geometry = unit_volume();
        let view = slice_view_at_z(5.0);
        let brush = absolute_sphere(1.0);

        let from = Vec3::new(1.0, 5.0, 5.0);
        let to = Vec3::new(8.0, 5.0, 5.0);
        let voxels = path_footprint(&geometry, &view, &brush, from, to, None);

        for x in 1..=8 {
            assert!(
                voxels.contains(&IVec3::new(x, 5, 5)),
                "gap at x={x} along the stroke path"
            );
        }
    }
}
