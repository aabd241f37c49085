//! Cuts a hull mesh against the water surface.
//!
//! Water height is sampled once per mesh vertex and treated as linear along
//! each edge: crossing points are interpolated from the two endpoint depths,
//! never resampled from the wave field. Changing that would change force
//! magnitudes, so it stays as is.

use bevy::math::Vec3;
use serde::{Deserialize, Serialize};

use super::fragment::{is_degenerate, TriangleFragment};
use crate::error::BuoyancyError;

/// Trade-off between fragment count and force placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Accuracy {
    /// Whole triangles only, forces at the centroid
    Low,
    /// Exact clip, forces at the centroid
    #[default]
    Medium,
    /// Exact clip, hydrostatic force at the analytic center of pressure
    High,
}

/// Appends the submerged part of the mesh to `out`.
///
/// `vertices` are world-space positions and `depths` the matching depth
/// samples (positive below the surface). Fails on malformed input without
/// touching `out`.
pub fn clip_submerged(
    vertices: &[Vec3],
    indices: &[u32],
    depths: &[f32],
    accuracy: Accuracy,
    out: &mut Vec<TriangleFragment>,
) -> Result<(), BuoyancyError> {
    if depths.len() != vertices.len() {
        return Err(BuoyancyError::DepthCountMismatch {
            depths: depths.len(),
            vertices: vertices.len(),
        });
    }
    if indices.len() % 3 != 0 {
        return Err(BuoyancyError::IndexCount(indices.len()));
    }
    if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
        return Err(BuoyancyError::IndexOutOfRange {
            index,
            vertex_count: vertices.len(),
        });
    }

    let mut emitter = FragmentEmitter { accuracy, out };
    for triangle in indices.chunks_exact(3) {
        let [i, j, k] = [triangle[0] as usize, triangle[1] as usize, triangle[2] as usize];
        emitter.clip_triangle(
            [vertices[i], vertices[j], vertices[k]],
            [depths[i], depths[j], depths[k]],
        );
    }

    Ok(())
}

/// Point where the surface crosses the edge `p -> q`.
#[inline]
fn crossing(p: Vec3, dp: f32, q: Vec3, dq: f32) -> Vec3 {
    p.lerp(q, dp / (dp - dq))
}

/// Sorts a triangle by descending height with a small swap network.
///
/// The flag is true when an even number of swaps happened, i.e. the returned
/// order has the same winding as the input.
pub fn order_by_height(vertices: [Vec3; 3], depths: [f32; 3]) -> ([Vec3; 3], [f32; 3], bool) {
    let [mut a, mut b, mut c] = vertices;
    let [mut da, mut db, mut dc] = depths;
    let mut keeps_winding = true;

    if a.y < b.y {
        std::mem::swap(&mut a, &mut b);
        std::mem::swap(&mut da, &mut db);
        keeps_winding = !keeps_winding;
    }
    if b.y < c.y {
        std::mem::swap(&mut b, &mut c);
        std::mem::swap(&mut db, &mut dc);
        keeps_winding = !keeps_winding;
        if a.y < b.y {
            std::mem::swap(&mut a, &mut b);
            std::mem::swap(&mut da, &mut db);
            keeps_winding = !keeps_winding;
        }
    }

    ([a, b, c], [da, db, dc], keeps_winding)
}

struct FragmentEmitter<'a> {
    accuracy: Accuracy,
    out: &'a mut Vec<TriangleFragment>,
}

impl FragmentEmitter<'_> {
    fn clip_triangle(&mut self, pos: [Vec3; 3], depth: [f32; 3]) {
        let [p0, p1, p2] = pos;
        let [d0, d1, d2] = depth;

        if d0 <= 0.0 && d1 <= 0.0 && d2 <= 0.0 {
            return;
        }

        if self.accuracy == Accuracy::Low {
            if d0 + d1 + d2 >= 0.0 {
                self.push(p0, p1, p2, d0, d1, d2);
            }
            return;
        }

        if d0 >= 0.0 && d1 >= 0.0 && d2 >= 0.0 {
            self.push(p0, p1, p2, d0, d1, d2);
        } else if d0 < 0.0 && d1 < 0.0 {
            // only p2 submerged
            let w20 = crossing(p2, d2, p0, d0);
            let w21 = crossing(p2, d2, p1, d1);
            self.push(p2, w20, w21, d2, 0.0, 0.0);
        } else if d2 < 0.0 && d1 < 0.0 {
            // only p0 submerged
            let w02 = crossing(p0, d0, p2, d2);
            let w01 = crossing(p0, d0, p1, d1);
            self.push(p0, w01, w02, d0, 0.0, 0.0);
        } else if d2 < 0.0 && d0 < 0.0 {
            // only p1 submerged
            let w12 = crossing(p1, d1, p2, d2);
            let w10 = crossing(p1, d1, p0, d0);
            self.push(p1, w12, w10, d1, 0.0, 0.0);
        } else if d0 < 0.0 {
            // p1 and p2 submerged
            let w02 = crossing(p0, d0, p2, d2);
            let w01 = crossing(p0, d0, p1, d1);
            self.push(p1, w02, w01, d1, 0.0, 0.0);
            self.push(p1, p2, w02, d1, d2, 0.0);
        } else if d1 < 0.0 {
            // p0 and p2 submerged
            let w12 = crossing(p1, d1, p2, d2);
            let w10 = crossing(p1, d1, p0, d0);
            self.push(p0, w10, w12, d0, 0.0, 0.0);
            self.push(p0, w12, p2, d0, 0.0, d2);
        } else {
            // p0 and p1 submerged
            let w20 = crossing(p2, d2, p0, d0);
            let w21 = crossing(p2, d2, p1, d1);
            self.push(p0, w21, w20, d0, 0.0, 0.0);
            self.push(p0, p1, w21, d0, d1, 0.0);
        }
    }

    fn push(&mut self, a: Vec3, b: Vec3, c: Vec3, da: f32, db: f32, dc: f32) {
        if is_degenerate(a, b, c) {
            return;
        }

        if self.accuracy != Accuracy::High {
            self.out.push(TriangleFragment::new(a, b, c));
            return;
        }

        let ([a, b, c], [da, _, dc], keeps_winding) = order_by_height([a, b, c], [da, db, dc]);

        if a.y == b.y {
            let (first, second) = if keeps_winding { (a, b) } else { (b, a) };
            self.push_pressure(c, first, second, dc);
        } else if b.y == c.y {
            let (first, second) = if keeps_winding { (b, c) } else { (c, b) };
            self.push_pressure(a, first, second, da);
        } else {
            // d lies on ac at the height of b, so bd is horizontal
            let t = (a.y - b.y) / (a.y - c.y);
            let d = a.lerp(c, t);
            if keeps_winding {
                self.push_pressure(a, b, d, da);
                self.push_pressure(c, d, b, dc);
            } else {
                self.push_pressure(a, d, b, da);
                self.push_pressure(c, b, d, dc);
            }
        }
    }

    fn push_pressure(&mut self, apex: Vec3, b: Vec3, c: Vec3, apex_depth: f32) {
        if is_degenerate(apex, b, c) {
            return;
        }
        self.out
            .push(TriangleFragment::with_pressure_center(apex, b, c, apex_depth));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    const ALL: [Accuracy; 3] = [Accuracy::Low, Accuracy::Medium, Accuracy::High];

    fn clip(pos: [Vec3; 3], depth: [f32; 3], accuracy: Accuracy) -> Vec<TriangleFragment> {
        let mut out = Vec::new();
        clip_submerged(&pos, &[0, 1, 2], &depth, accuracy, &mut out).unwrap();
        out
    }

    fn triangle_area(p: [Vec3; 3]) -> f32 {
        (p[1] - p[0]).cross(p[2] - p[0]).length() * 0.5
    }

    fn total_area(fragments: &[TriangleFragment]) -> f32 {
        fragments.iter().map(TriangleFragment::area).sum()
    }

    /// Area below the surface when depth varies linearly over the triangle.
    fn submerged_area(p: [Vec3; 3], d: [f32; 3]) -> f32 {
        let area = triangle_area(p);
        let wet: Vec<usize> = (0..3).filter(|&i| d[i] >= 0.0).collect();
        let t = |from: usize, to: usize| d[from] / (d[from] - d[to]);
        match wet.len() {
            0 => 0.0,
            3 => area,
            1 => {
                let i = wet[0];
                let (j, k) = ((i + 1) % 3, (i + 2) % 3);
                area * t(i, j) * t(i, k)
            }
            _ => {
                let dry = (0..3).find(|&i| d[i] < 0.0).unwrap();
                let (j, k) = ((dry + 1) % 3, (dry + 2) % 3);
                area * (1.0 - t(dry, j) * t(dry, k))
            }
        }
    }

    fn random_triangle(rng: &mut StdRng) -> ([Vec3; 3], [f32; 3]) {
        let mut point = || {
            Vec3::new(
                rng.gen_range(-3.0..3.0),
                rng.gen_range(-3.0..3.0),
                rng.gen_range(-3.0..3.0),
            )
        };
        let pos = [point(), point(), point()];
        let depth = [
            rng.gen_range(-2.0..2.0),
            rng.gen_range(-2.0..2.0),
            rng.gen_range(-2.0..2.0),
        ];
        (pos, depth)
    }

    fn sample_triangle() -> [Vec3; 3] {
        [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 2.0),
            Vec3::new(2.0, -0.5, 0.0),
        ]
    }

    #[test]
    fn test_dry_triangle_yields_nothing() {
        for accuracy in ALL {
            assert!(clip(sample_triangle(), [-1.0, -0.5, 0.0], accuracy).is_empty());
            assert!(clip(sample_triangle(), [0.0, 0.0, 0.0], accuracy).is_empty());
        }
    }

    #[test]
    fn test_submerged_triangle_is_emitted_unchanged() {
        let pos = sample_triangle();
        let fragments = clip(pos, [1.0, 0.5, 2.0], Accuracy::Medium);
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].vertices(), pos);
        assert_eq!(fragments[0], TriangleFragment::new(pos[0], pos[1], pos[2]));
    }

    #[test]
    fn test_high_accuracy_submerged_triangle_with_horizontal_edge() {
        let pos = [
            Vec3::new(0.0, -2.0, 0.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(-1.0, -1.0, 1.0),
        ];
        let fragments = clip(pos, [2.0, 1.0, 1.0], Accuracy::High);
        assert_eq!(fragments.len(), 1);

        let fragment = fragments[0];
        for vertex in pos {
            assert!(fragment.vertices().contains(&vertex));
        }
        let original = TriangleFragment::new(pos[0], pos[1], pos[2]);
        assert!((fragment.normal() - original.normal()).length() < 1e-6);
    }

    #[test]
    fn test_high_accuracy_splits_into_horizontal_edges() {
        let pos = sample_triangle();
        let fragments = clip(pos, [1.0, 0.5, 2.0], Accuracy::High);
        assert_eq!(fragments.len(), 2);
        assert!((total_area(&fragments) - triangle_area(pos)).abs() < 1e-5);
        for fragment in &fragments {
            assert!((fragment.b.y - fragment.c.y).abs() < 1e-5);
        }
    }

    #[test]
    fn test_low_accuracy_is_binary() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let (pos, depth) = random_triangle(&mut rng);
            let fragments = clip(pos, depth, Accuracy::Low);
            let any_wet = depth.iter().any(|&d| d > 0.0);
            if any_wet && depth.iter().sum::<f32>() >= 0.0 {
                assert_eq!(fragments.len(), 1);
                assert_eq!(fragments[0].vertices(), pos);
                assert_eq!(fragments[0].buoyancy_center, fragments[0].center);
            } else {
                assert!(fragments.is_empty());
            }
        }
    }

    #[test]
    fn test_partial_clip_conserves_area() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut checked = 0;
        while checked < 1000 {
            let (pos, depth) = random_triangle(&mut rng);
            let wet = depth.iter().filter(|&&d| d >= 0.0).count();
            if wet == 0 || wet == 3 || triangle_area(pos) < 1e-2 {
                continue;
            }
            checked += 1;

            let expected = submerged_area(pos, depth);
            for accuracy in [Accuracy::Medium, Accuracy::High] {
                let area = total_area(&clip(pos, depth, accuracy));
                assert!(
                    (area - expected).abs() <= 1e-3 * expected.max(1.0),
                    "{accuracy:?}: {area} != {expected} for {pos:?} {depth:?}"
                );
            }
        }
    }

    #[test]
    fn test_fragments_keep_original_winding() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..500 {
            let (pos, depth) = random_triangle(&mut rng);
            if triangle_area(pos) < 1e-2 {
                continue;
            }
            let original = (pos[1] - pos[0]).cross(pos[2] - pos[0]);
            for accuracy in ALL {
                for fragment in clip(pos, depth, accuracy) {
                    if fragment.area() > 1e-4 {
                        assert!(fragment.normal().dot(original) > 0.0, "{accuracy:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_fragments_stay_below_flat_surface() {
        let mut rng = StdRng::seed_from_u64(11);
        let surface = 0.25;
        for _ in 0..500 {
            let (pos, _) = random_triangle(&mut rng);
            let depth = pos.map(|p| surface - p.y);
            for accuracy in [Accuracy::Medium, Accuracy::High] {
                for fragment in clip(pos, depth, accuracy) {
                    for vertex in fragment.vertices() {
                        assert!(vertex.y <= surface + 1e-4);
                    }
                    assert!(fragment.buoyancy_center.y <= surface + 1e-4);
                }
            }
        }
    }

    #[test]
    fn test_high_accuracy_fragments_have_horizontal_base() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..500 {
            let (pos, depth) = random_triangle(&mut rng);
            for fragment in clip(pos, depth, Accuracy::High) {
                assert!((fragment.b.y - fragment.c.y).abs() < 1e-4);
                let midpoint = (fragment.b + fragment.c) * 0.5;
                // center of pressure lies on the apex-to-base median
                let along = midpoint - fragment.a;
                let offset = fragment.buoyancy_center - fragment.a;
                let tolerance = 1e-3 * along.length().max(1.0) * offset.length().max(1.0);
                assert!(along.cross(offset).length() <= tolerance);
            }
        }
    }

    #[test]
    fn test_pressure_center_stays_on_fragment_under_sloped_water() {
        let pos = [
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(1.0, 0.5, 0.0),
            Vec3::new(-1.0, 0.5, 0.5),
        ];
        // Per-vertex depths of a tilted surface: the apex is barely deeper
        // than the base even though it sits 1.5 below it
        let fragments = clip(pos, [1.01, 0.1, 0.1], Accuracy::High);
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].a, pos[0]);
        assert_eq!(fragments[0].buoyancy_center, fragments[0].center);

        let mut rng = StdRng::seed_from_u64(23);
        for _ in 0..1000 {
            let (pos, depth) = random_triangle(&mut rng);
            for fragment in clip(pos, depth, Accuracy::High) {
                let [a, b, c] = fragment.vertices();
                let min = a.min(b).min(c) - Vec3::splat(1e-4);
                let max = a.max(b).max(c) + Vec3::splat(1e-4);
                let point = fragment.buoyancy_center;
                assert!(
                    point.cmpge(min).all() && point.cmple(max).all(),
                    "{point:?} outside {min:?}..{max:?}"
                );
            }
        }
    }

    #[test]
    fn test_single_submerged_vertex_cut() {
        let pos = [
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(2.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 2.0),
        ];
        let fragments = clip(pos, [1.0, -1.0, -1.0], Accuracy::Medium);
        assert_eq!(fragments.len(), 1);
        let fragment = fragments[0];
        assert_eq!(fragment.a, pos[0]);
        assert!((fragment.b - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-6);
        assert!((fragment.c - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-6);
    }

    #[test]
    fn test_zero_area_pieces_are_discarded() {
        // p1 sits exactly on the surface, so one half of the quad collapses
        let fragments = clip(sample_triangle(), [1.0, 0.0, -1.0], Accuracy::Medium);
        assert_eq!(fragments.len(), 1);
        for fragment in fragments {
            assert!(!is_degenerate(fragment.a, fragment.b, fragment.c));
        }
    }

    #[test]
    fn test_order_by_height() {
        let low = Vec3::new(0.0, -1.0, 0.0);
        let mid = Vec3::new(1.0, 0.0, 0.0);
        let high = Vec3::new(0.0, 1.0, 1.0);
        let winding = |[a, b, c]: [Vec3; 3]| (b - a).cross(c - a);

        for input in [
            [low, mid, high],
            [low, high, mid],
            [mid, low, high],
            [mid, high, low],
            [high, low, mid],
            [high, mid, low],
        ] {
            let depths = input.map(|v| -v.y);
            let (sorted, sorted_depths, keeps_winding) = order_by_height(input, depths);
            assert_eq!(sorted, [high, mid, low]);
            assert_eq!(sorted_depths, [-1.0, 0.0, 1.0]);
            let same = winding(sorted).dot(winding(input)) > 0.0;
            assert_eq!(same, keeps_winding, "{input:?}");
        }
    }

    #[test]
    fn test_malformed_input_is_rejected() {
        let pos = sample_triangle();
        let mut out = Vec::new();

        assert_eq!(
            clip_submerged(&pos, &[0, 1, 2], &[1.0, 1.0], Accuracy::Medium, &mut out),
            Err(BuoyancyError::DepthCountMismatch {
                depths: 2,
                vertices: 3
            })
        );
        assert_eq!(
            clip_submerged(&pos, &[0, 1, 5], &[1.0; 3], Accuracy::Medium, &mut out),
            Err(BuoyancyError::IndexOutOfRange {
                index: 5,
                vertex_count: 3
            })
        );
        assert_eq!(
            clip_submerged(&pos, &[0, 1], &[1.0; 3], Accuracy::Medium, &mut out),
            Err(BuoyancyError::IndexCount(2))
        );
        assert!(out.is_empty());
    }
}
