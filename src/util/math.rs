//! Math type re-exports and small geometric helpers.
//!
//! Re-exports the subset of `glam` used by the conversion core.

pub use glam::{Vec2, Vec3, Vec4};

/// Centroid of a set of positions, or the origin for an empty set.
pub fn centroid_of(positions: &[Vec3]) -> Vec3 {
    if positions.is_empty() {
        return Vec3::ZERO;
    }
    let sum: Vec3 = positions.iter().copied().sum();
    sum / positions.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centroid() {
        assert_eq!(centroid_of(&[]), Vec3::ZERO);

        let c = centroid_of(&[
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 4.0, 6.0),
        ]);
        assert_eq!(c, Vec3::new(1.0, 2.0, 3.0));
    }
}
