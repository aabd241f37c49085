use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PRESSURE_DRAG_COEFFICIENT, WATER_DENSITY};
use crate::error::{ensure_non_negative, ensure_positive, BuoyancyError};
use crate::hull::Accuracy;

/// Per-body buoyancy settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuoyancyConfig {
    /// Density of the surrounding fluid (kg/m³)
    pub fluid_density: f32,
    /// How the submerged part of the hull is reconstructed
    pub accuracy: Accuracy,
    /// Scales pressure drag together with the squared body speed
    pub pressure_drag_coefficient: f32,
}

impl BuoyancyConfig {
    pub fn with_accuracy(mut self, accuracy: Accuracy) -> Self {
        self.accuracy = accuracy;
        self
    }

    pub fn with_fluid_density(mut self, fluid_density: f32) -> Self {
        self.fluid_density = fluid_density;
        self
    }

    pub fn with_pressure_drag(mut self, coefficient: f32) -> Self {
        self.pressure_drag_coefficient = coefficient;
        self
    }

    pub fn validate(&self) -> Result<(), BuoyancyError> {
        ensure_positive("fluid_density", self.fluid_density)?;
        ensure_non_negative("pressure_drag_coefficient", self.pressure_drag_coefficient)?;
        Ok(())
    }
}

impl Default for BuoyancyConfig {
    fn default() -> Self {
        Self {
            fluid_density: WATER_DENSITY,
            accuracy: Accuracy::default(),
            pressure_drag_coefficient: DEFAULT_PRESSURE_DRAG_COEFFICIENT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = BuoyancyConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.accuracy, Accuracy::Medium);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(BuoyancyConfig::default()
            .with_fluid_density(0.0)
            .validate()
            .is_err());
        assert!(BuoyancyConfig::default()
            .with_fluid_density(f32::NAN)
            .validate()
            .is_err());
        assert!(BuoyancyConfig::default()
            .with_pressure_drag(-0.1)
            .validate()
            .is_err());
        assert!(BuoyancyConfig::default()
            .with_pressure_drag(0.0)
            .validate()
            .is_ok());
    }
}
