//! Analytic ocean surface sampling.
//!
//! The field has no mutable state beyond its configuration; every query is a
//! pure function of position and time, so a single `WaveField` can be shared
//! by reference between bodies and threads.

use bevy::math::{Vec2, Vec3};
use noise::{NoiseFn, Perlin};

use super::config::WaveFieldParams;
use crate::error::BuoyancyError;

/// Result of a surface query with its normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    /// Surface height (Y coordinate)
    pub height: f32,
    /// Normalized `(dh/dx, dh/dz, -1)`; the third component is the vertical one
    pub normal: Vec3,
}

impl SurfaceSample {
    /// Surface normal in Y-up world space, pointing out of the water.
    #[inline]
    pub fn up_normal(&self) -> Vec3 {
        Vec3::new(-self.normal.x, -self.normal.z, -self.normal.y)
    }
}

/// Sine swell with an optional coherent-noise chop.
#[derive(Debug, Clone)]
pub struct WaveField {
    params: WaveFieldParams,
    noise: Perlin,
}

impl WaveField {
    pub fn new(params: WaveFieldParams) -> Result<Self, BuoyancyError> {
        params.validate()?;
        Ok(Self {
            params,
            noise: Perlin::new(params.noise_seed),
        })
    }

    pub fn params(&self) -> &WaveFieldParams {
        &self.params
    }

    #[inline]
    fn phase(&self, x: f32, z: f32, time: f32) -> f32 {
        self.params.frequency * time
            + x * self.params.inverse_length.x
            + z * self.params.inverse_length.y
    }

    /// Noise in roughly `[0, 1]`, scrolling diagonally with time.
    #[inline]
    fn noise(&self, x: f32, z: f32, time: f32) -> f32 {
        let drift = self.params.noise_frequency * time;
        let value = self
            .noise
            .get([(x + drift) as f64, (z + 0.5 + drift) as f64]);
        (value as f32 * 0.5 + 0.5).clamp(0.0, 1.0)
    }

    /// Water surface height at `(x, z)` and `time`.
    #[inline]
    pub fn height(&self, x: f32, z: f32, time: f32) -> f32 {
        self.height_with_noise(x, z, time, true)
    }

    pub fn height_with_noise(&self, x: f32, z: f32, time: f32, add_noise: bool) -> f32 {
        let mut height = self.params.amplitude * self.phase(x, z, time).sin();
        if add_noise && self.params.noise_strength > 0.0 {
            height += self.params.noise_strength * self.noise(x, z, time);
        }
        height
    }

    /// Height plus the analytic normal of the sine term.
    ///
    /// Noise contributes to the height only.
    #[inline]
    pub fn height_and_normal(&self, x: f32, z: f32, time: f32) -> SurfaceSample {
        self.height_and_normal_with_noise(x, z, time, true)
    }

    pub fn height_and_normal_with_noise(
        &self,
        x: f32,
        z: f32,
        time: f32,
        add_noise: bool,
    ) -> SurfaceSample {
        let (sin_phase, cos_phase) = self.phase(x, z, time).sin_cos();
        let slope = cos_phase * self.params.amplitude;
        let dh_dx = slope * self.params.inverse_length.x;
        let dh_dz = slope * self.params.inverse_length.y;

        let mut height = self.params.amplitude * sin_phase;
        if add_noise && self.params.noise_strength > 0.0 {
            height += self.params.noise_strength * self.noise(x, z, time);
        }

        SurfaceSample {
            height,
            normal: Vec3::new(dh_dx, dh_dz, -1.0).normalize(),
        }
    }

    /// Signed depth of a point: positive below the surface.
    #[inline]
    pub fn depth_at(&self, position: Vec3, time: f32) -> f32 {
        self.height(position.x, position.z, time) - position.y
    }

    #[inline]
    pub fn is_underwater(&self, position: Vec3, time: f32) -> bool {
        self.depth_at(position, time) > 0.0
    }

    /// Depth of many points at once.
    pub fn sample_depths(&self, points: &[Vec3], time: f32, depths: &mut [f32]) {
        debug_assert_eq!(points.len(), depths.len());

        for (depth, point) in depths.iter_mut().zip(points) {
            *depth = self.depth_at(*point, time);
        }
    }

    /// Heights over a batch of horizontal positions.
    pub fn sample_heights_batch(&self, points: &[Vec2], time: f32, heights: &mut [f32]) {
        debug_assert_eq!(points.len(), heights.len());

        for (height, point) in heights.iter_mut().zip(points) {
            *height = self.height(point.x, point.y, time);
        }
    }
}
