//! Scissor polygon rasterization.
//!
//! The scissor effect collects a lasso in display space; at commit the
//! enclosed voxels are computed here. On a slice view the fill covers the
//! current voxel layer; on a 3D view the polygon is extruded along the
//! view direction through the whole volume, so every voxel projecting
//! into the lasso is affected. Rasterization is pure and parallelized
//! across z slabs.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::types::{IVec3, Vec2};
use crate::math::Aabb;
use crate::view::{ViewContext, ViewKind};
use crate::volume::VolumeGeometry;

/// Interior rule for self-intersecting polygons
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillRule {
    /// A point is inside if a ray from it crosses the outline an odd
    /// number of times (default)
    #[default]
    EvenOdd,
    /// A point is inside if the outline winds around it a net nonzero
    /// number of times
    NonzeroWinding,
}

/// Point-in-polygon test under the given fill rule
pub fn point_in_polygon(polygon: &[Vec2], point: Vec2, rule: FillRule) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    match rule {
        FillRule::EvenOdd => {
            let mut inside = false;
            let mut j = polygon.len() - 1;
            for i in 0..polygon.len() {
                let (a, b) = (polygon[i], polygon[j]);
                if (a.y > point.y) != (b.y > point.y) {
                    let x_cross = a.x + (point.y - a.y) * (b.x - a.x) / (b.y - a.y);
                    if point.x < x_cross {
                        inside = !inside;
                    }
                }
                j = i;
            }
            inside
        }
        FillRule::NonzeroWinding => {
            let mut winding = 0i32;
            let mut j = polygon.len() - 1;
            for i in 0..polygon.len() {
                let (a, b) = (polygon[j], polygon[i]);
                if a.y <= point.y {
                    if b.y > point.y && edge_side(a, b, point) > 0.0 {
                        winding += 1;
                    }
                } else if b.y <= point.y && edge_side(a, b, point) < 0.0 {
                    winding -= 1;
                }
                j = i;
            }
            winding != 0
        }
    }
}

/// Cross product sign: positive if `point` is left of the edge a -> b
fn edge_side(a: Vec2, b: Vec2, point: Vec2) -> f32 {
    (b.x - a.x) * (point.y - a.y) - (point.x - a.x) * (b.y - a.y)
}

/// Voxels enclosed by a display-space polygon on the given view.
pub fn rasterize(
    geometry: &VolumeGeometry,
    view: &ViewContext,
    polygon: &[Vec2],
    rule: FillRule,
) -> Vec<IVec3> {
    if polygon.len() < 3 {
        return Vec::new();
    }

    match view.kind {
        ViewKind::Slice => rasterize_slice(geometry, view, polygon, rule),
        ViewKind::ThreeD => rasterize_prism(geometry, view, polygon, rule),
    }
}

/// Fill within the slice plane's voxel layer only
fn rasterize_slice(
    geometry: &VolumeGeometry,
    view: &ViewContext,
    polygon: &[Vec2],
    rule: FillRule,
) -> Vec<IVec3> {
    let world_outline = polygon.iter().map(|&p| view.display_to_world(p));
    let candidates = geometry
        .world_aabb_to_voxels(&Aabb::from_points(world_outline))
        .clamped(geometry.dims());

    let half_layer = geometry.voxel_support_along(view.plane.normal) * 0.5 + 1e-4;

    candidates
        .iter()
        .filter(|&coord| {
            let center = geometry.voxel_to_world(coord);
            view.plane.signed_distance(center).abs() <= half_layer
                && point_in_polygon(polygon, view.world_to_display(center), rule)
        })
        .collect()
}

/// Extrude the polygon through the volume along the view direction
fn rasterize_prism(
    geometry: &VolumeGeometry,
    view: &ViewContext,
    polygon: &[Vec2],
    rule: FillRule,
) -> Vec<IVec3> {
    let dims = geometry.dims();
    (0..dims.z as i32)
        .into_par_iter()
        .flat_map_iter(|z| {
            let mut hits = Vec::new();
            for y in 0..dims.y as i32 {
                for x in 0..dims.x as i32 {
                    let coord = IVec3::new(x, y, z);
                    let projected = view.world_to_display(geometry.voxel_to_world(coord));
                    if point_in_polygon(polygon, projected, rule) {
                        hits.push(coord);
                    }
                }
            }
            hits
        })
        .collect()
}
