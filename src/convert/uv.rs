//! UV projection strategies for generated texture coordinates.
//!
//! Each strategy yields a continuous, seam-minimizing coordinate pair in a
//! bounded range: angles are normalized to [0, 1] over their full range,
//! linear components are centered so positions inside the projection's
//! scale box land in [0, 1].

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use crate::chunk::Axis;

/// Projection strategy selected per surface.
///
/// Dispatch is a single exhaustive match; the strategy table is closed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UvProjection {
    /// Drop the projection axis; the remaining two components form the UV.
    Planar {
        /// Axis most aligned with the projection normal.
        axis: Axis,
    },
    /// Azimuth and elevation around the projection center.
    Spherical {
        /// Polar axis.
        axis: Axis,
    },
    /// Azimuth around the axis and signed distance along it.
    Cylindrical {
        /// Wrapping axis.
        axis: Axis,
    },
    /// Planar onto the cube face best aligned with the vertex direction.
    Cubic,
}

impl UvProjection {
    /// Project one position, relative to the centroid and scaled by the
    /// block's scale, into UV space.
    pub fn project(&self, position: Vec3, centroid: Vec3, scale: Vec3) -> Vec2 {
        let local = (position - centroid) / scale;
        match *self {
            Self::Planar { axis } => map_planar(local, axis),
            Self::Spherical { axis } => map_spherical(local, axis),
            Self::Cylindrical { axis } => map_cylindrical(local, axis),
            Self::Cubic => map_cubic(local),
        }
    }
}

/// Cache key over the exact bit patterns of (position, centroid).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UvKey {
    pos: [u32; 3],
    centroid: [u32; 3],
}

impl UvKey {
    /// Key for one projection request.
    pub fn new(position: Vec3, centroid: Vec3) -> Self {
        Self {
            pos: [
                position.x.to_bits(),
                position.y.to_bits(),
                position.z.to_bits(),
            ],
            centroid: [
                centroid.x.to_bits(),
                centroid.y.to_bits(),
                centroid.z.to_bits(),
            ],
        }
    }
}

/// The two components left after dropping the projection axis.
fn planar_components(local: Vec3, axis: Axis) -> (f32, f32) {
    match axis {
        Axis::X => (local.z, local.y),
        Axis::Y => (local.x, local.z),
        Axis::Z => (local.x, local.y),
    }
}

/// Decompose into (height along the axis, in-plane pair).
fn axial_components(local: Vec3, axis: Axis) -> (f32, f32, f32) {
    match axis {
        Axis::X => (local.x, local.y, local.z),
        Axis::Y => (local.y, local.z, local.x),
        Axis::Z => (local.z, local.x, local.y),
    }
}

fn map_planar(local: Vec3, axis: Axis) -> Vec2 {
    let (u, v) = planar_components(local, axis);
    Vec2::new(u + 0.5, v + 0.5)
}

fn map_spherical(local: Vec3, axis: Axis) -> Vec2 {
    let (h, a, b) = axial_components(local, axis);
    let len = local.length();
    if len <= f32::EPSILON {
        return Vec2::new(0.5, 0.5);
    }
    let azimuth = b.atan2(a);
    let elevation = (h / len).clamp(-1.0, 1.0).asin();
    Vec2::new(azimuth / TAU + 0.5, elevation / PI + 0.5)
}

fn map_cylindrical(local: Vec3, axis: Axis) -> Vec2 {
    let (h, a, b) = axial_components(local, axis);
    if a == 0.0 && b == 0.0 {
        // on the axis the azimuth is undefined
        return Vec2::new(0.5, h + 0.5);
    }
    let azimuth = b.atan2(a);
    Vec2::new(azimuth / TAU + 0.5, h + 0.5)
}

fn map_cubic(local: Vec3) -> Vec2 {
    let abs = local.abs();
    let axis = if abs.x >= abs.y && abs.x >= abs.z {
        Axis::X
    } else if abs.y >= abs.z {
        Axis::Y
    } else {
        Axis::Z
    };
    map_planar(local, axis)
}
