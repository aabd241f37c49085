//! Wave field configuration shared by every consumer of the ocean surface.
//!
//! The same parameters drive physics sampling and (outside this crate) the
//! surface shader, so they are kept serializable and free of derived state.

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, ensure_non_negative, BuoyancyError};

/// Parameters of the analytic ocean surface.
///
/// Height is `amplitude * sin(frequency * t + x * inverse_length.x + z * inverse_length.y)`
/// plus an optional Perlin perturbation scaled by `noise_strength`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveFieldParams {
    /// Peak height of the sine swell (world units)
    pub amplitude: f32,
    /// Angular frequency of the swell (rad/s)
    pub frequency: f32,
    /// Inverse wavelength along x and z; its direction is the propagation direction
    pub inverse_length: Vec2,
    /// How fast the noise pattern scrolls
    pub noise_frequency: f32,
    /// Height added by the noise at its maximum
    pub noise_strength: f32,
    /// Seed of the noise permutation table
    pub noise_seed: u32,
}

impl WaveFieldParams {
    pub fn new(amplitude: f32, frequency: f32, inverse_length: Vec2) -> Self {
        Self {
            amplitude,
            frequency,
            inverse_length,
            noise_frequency: 0.0,
            noise_strength: 0.0,
            noise_seed: 0,
        }
    }

    pub fn with_noise(mut self, noise_frequency: f32, noise_strength: f32) -> Self {
        self.noise_frequency = noise_frequency;
        self.noise_strength = noise_strength;
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.noise_seed = seed;
        self
    }

    /// Wavelength of the swell, `None` when the field does not vary in space.
    pub fn wavelength(&self) -> Option<f32> {
        let k = self.inverse_length.length();
        (k > 0.0).then(|| std::f32::consts::TAU / k)
    }

    pub fn validate(&self) -> Result<(), BuoyancyError> {
        ensure_non_negative("amplitude", self.amplitude)?;
        ensure_finite("frequency", self.frequency)?;
        ensure_finite("inverse_length.x", self.inverse_length.x)?;
        ensure_finite("inverse_length.y", self.inverse_length.y)?;
        ensure_finite("noise_frequency", self.noise_frequency)?;
        ensure_non_negative("noise_strength", self.noise_strength)?;
        Ok(())
    }
}

impl Default for WaveFieldParams {
    fn default() -> Self {
        WavePreset::default().params()
    }
}

/// Preset sea states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WavePreset {
    /// Flat water
    Still,
    /// Small ripples, mostly noise
    Calm,
    /// Long regular swell with light chop
    #[default]
    Swell,
    /// Tall, short waves
    Storm,
}

impl WavePreset {
    pub fn params(self) -> WaveFieldParams {
        match self {
            WavePreset::Still => WaveFieldParams::new(0.0, 0.0, Vec2::ZERO),
            WavePreset::Calm => {
                WaveFieldParams::new(0.05, 0.8, Vec2::new(0.3, 0.1)).with_noise(0.3, 0.05)
            }
            WavePreset::Swell => {
                WaveFieldParams::new(0.4, 1.0, Vec2::new(0.2, 0.05)).with_noise(0.5, 0.15)
            }
            WavePreset::Storm => {
                WaveFieldParams::new(1.5, 1.6, Vec2::new(0.35, 0.2)).with_noise(1.2, 0.4)
            }
        }
    }
}
