use bevy::math::{DVec2, DVec3, UVec2};

// ---------------------------------------------------------------------------
// Editor space -> engine space
// ---------------------------------------------------------------------------
//
// Editor: X right, Y forward, Z up.
// Engine: X right, Y up, Z forward.

/// Convert a position from editor space to engine space: `(x, y, z) -> (x, z, -y)`.
pub fn convert_point(p: DVec3) -> DVec3 {
    DVec3::new(p.x, p.z, -p.y)
}

/// Convert an XYZ euler rotation in radians (editor space) to degrees in engine space.
///
/// Uses the same axis permutation as [`convert_point`]; the negation happens
/// before the degree conversion so the result is exactly `degrees(-y)`.
pub fn convert_euler_deg(e: DVec3) -> DVec3 {
    DVec3::new(e.x.to_degrees(), e.z.to_degrees(), (-e.y).to_degrees())
}

/// Convert a scale vector. Scale is a magnitude per axis, so only the
/// permutation applies.
pub fn convert_scale(s: DVec3) -> DVec3 {
    DVec3::new(s.x, s.z, s.y)
}

// ---------------------------------------------------------------------------
// Collision primitives
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollisionShape {
    Cone,
    Sphere,
    Cylinder,
}

/// Radius/height of a collision primitive derived from an editor-space scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeExtents {
    pub radius: f64,
    /// Zero for spheres.
    pub height: f64,
}

impl CollisionShape {
    /// Editor X scale drives the radius for every shape. Cones and cylinders take
    /// their height from editor Z scale and ignore Y; spheres ignore both.
    pub fn extents(self, scale: DVec3) -> ShapeExtents {
        let radius = scale.x.abs();
        match self {
            Self::Sphere => ShapeExtents { radius, height: 0.0 },
            Self::Cone | Self::Cylinder => ShapeExtents {
                radius,
                height: scale.z.abs(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Collision grid
// ---------------------------------------------------------------------------

/// Regular 2D grid used by an item group for spatial collision lookup.
///
/// `start`/`step` are in the item group's local XZ plane (engine space), so
/// the editor's Y component lands in the grid's second axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionGrid {
    pub start: DVec2,
    pub step: DVec2,
    pub count: UVec2,
}

impl Default for CollisionGrid {
    fn default() -> Self {
        Self {
            start: DVec2::splat(-256.0),
            step: DVec2::splat(32.0),
            count: UVec2::splat(16),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KNOWN: [DVec3; 5] = [
        DVec3::new(0.0, 0.0, 0.0),
        DVec3::new(1.0, 2.0, 3.0),
        DVec3::new(-4.5, 0.25, 1e9),
        DVec3::new(f64::MAX, -f64::MAX, f64::MIN_POSITIVE),
        DVec3::new(-0.0, 7.0, -7.0),
    ];

    #[test]
    fn point_permutation_is_exact() {
        for p in KNOWN {
            let q = convert_point(p);
            assert_eq!(q, DVec3::new(p.x, p.z, -p.y));
        }
        assert_eq!(
            convert_point(DVec3::new(1.0, 2.0, 3.0)),
            DVec3::new(1.0, 3.0, -2.0)
        );
    }

    #[test]
    fn applying_twice_matches_the_axis_cycle() {
        // (x, y, z) -> (x, z, -y) -> (x, -y, -z)
        for p in KNOWN {
            assert_eq!(convert_point(convert_point(p)), DVec3::new(p.x, -p.y, -p.z));
        }
    }

    #[test]
    fn euler_is_permuted_then_converted_to_degrees() {
        let e = DVec3::new(std::f64::consts::FRAC_PI_2, 0.5, -std::f64::consts::PI);
        let d = convert_euler_deg(e);
        assert_eq!(d.x, e.x.to_degrees());
        assert_eq!(d.y, e.z.to_degrees());
        assert_eq!(d.z, (-e.y).to_degrees());
        assert!((d.x - 90.0).abs() < 1e-9);
        assert!((d.y + 180.0).abs() < 1e-9);
    }

    #[test]
    fn scale_permutes_without_sign() {
        assert_eq!(
            convert_scale(DVec3::new(1.0, 2.0, 3.0)),
            DVec3::new(1.0, 3.0, 2.0)
        );
    }

    #[test]
    fn shape_extents_ignore_the_documented_axes() {
        let scale = DVec3::new(2.0, 9.0, -3.0);
        assert_eq!(
            CollisionShape::Cone.extents(scale),
            ShapeExtents { radius: 2.0, height: 3.0 }
        );
        assert_eq!(
            CollisionShape::Cylinder.extents(scale),
            ShapeExtents { radius: 2.0, height: 3.0 }
        );
        assert_eq!(
            CollisionShape::Sphere.extents(scale),
            ShapeExtents { radius: 2.0, height: 0.0 }
        );
    }

    #[test]
    fn default_grid_spans_the_stage() {
        let grid = CollisionGrid::default();
        let end = grid.start + grid.step * grid.count.as_dvec2();
        assert_eq!(end, DVec2::splat(256.0));
    }
}
