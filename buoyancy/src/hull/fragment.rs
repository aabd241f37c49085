use bevy::math::Vec3;

use crate::constants::DEGENERATE_EPSILON;

/// A triangle (whole or clipped) lying entirely below the water surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleFragment {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
    /// Where the hydrostatic force is applied
    pub buoyancy_center: Vec3,
    /// Geometric centroid, where pressure drag is applied
    pub center: Vec3,
    /// Outward normal scaled to the triangle area
    normal: Vec3,
}

impl TriangleFragment {
    /// Fragment whose forces act at its centroid.
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        let center = (a + b + c) / 3.0;
        Self {
            a,
            b,
            c,
            buoyancy_center: center,
            center,
            normal: area_normal(a, b, c),
        }
    }

    /// Fragment with an exact center of pressure.
    ///
    /// `a` is the apex and `b`, `c` lie at the same height; `apex_depth` is
    /// the depth of `a` below the surface.
    pub fn with_pressure_center(a: Vec3, b: Vec3, c: Vec3, apex_depth: f32) -> Self {
        let center = (a + b + c) / 3.0;
        let base_midpoint = (b + c) * 0.5;
        let buoyancy_center = match pressure_center_fraction(apex_depth, a.y - b.y) {
            Some(fraction) => a + (base_midpoint - a) * fraction,
            None => center,
        };

        Self {
            a,
            b,
            c,
            buoyancy_center,
            center,
            normal: area_normal(a, b, c),
        }
    }

    #[inline]
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    #[inline]
    pub fn area(&self) -> f32 {
        self.normal.length()
    }

    #[inline]
    pub fn vertices(&self) -> [Vec3; 3] {
        [self.a, self.b, self.c]
    }
}

#[inline]
fn area_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (b - a).cross(c - a) * 0.5
}

/// True when two of the three vertices coincide.
#[inline]
pub fn is_degenerate(a: Vec3, b: Vec3, c: Vec3) -> bool {
    a == b || a == c || b == c
}

/// Position of the center of hydrostatic pressure along the segment from the
/// apex to the midpoint of the horizontal base, as a fraction of its length.
///
/// `apex_depth` is the depth of the apex and `h` the apex height above the
/// base (negative when the apex is the lowest vertex). Returns `None` when the
/// result would not lie on that segment: a horizontal triangle on the
/// surface, or depths that disagree with the vertex heights (sloped water
/// sampled per vertex).
pub fn pressure_center_fraction(apex_depth: f32, h: f32) -> Option<f32> {
    let z0 = apex_depth.abs();
    let denominator = 6.0 * z0 + 4.0 * h;
    if denominator.abs() <= DEGENERATE_EPSILON {
        return None;
    }
    let fraction = (4.0 * z0 + 3.0 * h) / denominator;
    (0.0..=1.0).contains(&fraction).then_some(fraction)
}
