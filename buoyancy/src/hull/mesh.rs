use bevy::math::{Affine3A, Vec3};

use crate::error::BuoyancyError;

/// Static triangle mesh of a floating body, in the body's local space.
///
/// Triangles wind counter-clockwise when seen from outside, so
/// `cross(b - a, c - a)` points out of the hull.
#[derive(Debug, Clone, PartialEq)]
pub struct HullMesh {
    vertices: Vec<Vec3>,
    indices: Vec<u32>,
}

impl HullMesh {
    pub fn new(vertices: Vec<Vec3>, indices: Vec<u32>) -> Result<Self, BuoyancyError> {
        if vertices.is_empty() {
            return Err(BuoyancyError::EmptyMesh);
        }
        if indices.is_empty() {
            return Err(BuoyancyError::EmptyTriangles);
        }
        if indices.len() % 3 != 0 {
            return Err(BuoyancyError::IndexCount(indices.len()));
        }
        if let Some(i) = vertices.iter().position(|v| !v.is_finite()) {
            return Err(BuoyancyError::NonFiniteVertex(i));
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(BuoyancyError::IndexOutOfRange {
                index,
                vertex_count: vertices.len(),
            });
        }

        Ok(Self { vertices, indices })
    }

    /// Closed box centered on the origin.
    pub fn cuboid(half_extents: Vec3) -> Self {
        let Vec3 { x, y, z } = half_extents;
        let vertices = vec![
            Vec3::new(-x, -y, -z),
            Vec3::new(x, -y, -z),
            Vec3::new(x, -y, z),
            Vec3::new(-x, -y, z),
            Vec3::new(-x, y, -z),
            Vec3::new(x, y, -z),
            Vec3::new(x, y, z),
            Vec3::new(-x, y, z),
        ];
        #[rustfmt::skip]
        let indices = vec![
            0, 1, 2, 0, 2, 3, // bottom
            4, 6, 5, 4, 7, 6, // top
            0, 4, 5, 0, 5, 1, // -z
            3, 2, 6, 3, 6, 7, // +z
            0, 3, 7, 0, 7, 4, // -x
            1, 5, 6, 1, 6, 2, // +x
        ];
        Self { vertices, indices }
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|t| [t[0] as usize, t[1] as usize, t[2] as usize])
    }

    /// Writes the world-space position of every vertex into `out`.
    pub fn transform_into(&self, to_world: &Affine3A, out: &mut Vec<Vec3>) {
        out.clear();
        out.extend(self.vertices.iter().map(|v| to_world.transform_point3(*v)));
    }

    /// Enclosed volume, assuming the mesh is closed.
    pub fn volume(&self) -> f32 {
        self.triangles()
            .map(|[a, b, c]| {
                let (a, b, c) = (self.vertices[a], self.vertices[b], self.vertices[c]);
                a.dot(b.cross(c)) / 6.0
            })
            .sum()
    }
}
