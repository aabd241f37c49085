use std::fs;
use std::path::Path;

use bevy::prelude::*;
use bevy_log::info;
use buoyancy::error::{ensure_finite, ensure_non_negative, ensure_positive};
use buoyancy::{BuoyancyConfig, BuoyancyError, CargoLoad, WaveFieldParams};
use ron::de::from_str;
use serde::{Deserialize, Serialize};

/// One box-shaped hull to spawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HullSpec {
    pub name: String,
    pub half_extents: Vec3,
    /// Body density in kg/m³
    pub density: f32,
    pub position: Vec3,
    /// Euler angles (XYZ) in degrees
    pub rotation: Vec3,
    /// Local center of mass; the box center when absent
    pub center_of_mass: Option<Vec3>,
    pub cargo: Vec<CargoLoad>,
}

impl HullSpec {
    pub fn transform(&self) -> Transform {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x.to_radians(),
            self.rotation.y.to_radians(),
            self.rotation.z.to_radians(),
        );
        Transform::from_translation(self.position).with_rotation(rotation)
    }

    fn validate(&self) -> Result<(), BuoyancyError> {
        ensure_positive("half_extents.x", self.half_extents.x)?;
        ensure_positive("half_extents.y", self.half_extents.y)?;
        ensure_positive("half_extents.z", self.half_extents.z)?;
        ensure_positive("density", self.density)?;
        if let Some(center) = self.center_of_mass {
            ensure_finite("center_of_mass.x", center.x)?;
            ensure_finite("center_of_mass.y", center.y)?;
            ensure_finite("center_of_mass.z", center.z)?;
        }
        for load in &self.cargo {
            ensure_non_negative("cargo.mass", load.mass)?;
        }
        Ok(())
    }
}

impl Default for HullSpec {
    fn default() -> Self {
        Self {
            name: "barge".into(),
            half_extents: Vec3::new(2.0, 0.5, 1.0),
            density: 500.0,
            position: Vec3::new(0.0, 1.0, 0.0),
            rotation: Vec3::ZERO,
            center_of_mass: None,
            cargo: Vec::new(),
        }
    }
}

/// Everything the headless runner needs, loaded from a RON scene file.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub waves: WaveFieldParams,
    pub buoyancy: BuoyancyConfig,
    pub hulls: Vec<HullSpec>,
    pub duration_secs: f32,
    /// Frame (visual) rate
    pub ticks_per_second: u32,
    /// Physics step rate
    pub physics_hz: f64,
    pub report_interval_secs: f32,
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), BuoyancyError> {
        self.waves.validate()?;
        self.buoyancy.validate()?;
        ensure_positive("duration_secs", self.duration_secs)?;
        ensure_positive("ticks_per_second", self.ticks_per_second as f32)?;
        ensure_positive("physics_hz", self.physics_hz as f32)?;
        ensure_positive("report_interval_secs", self.report_interval_secs)?;
        for hull in &self.hulls {
            hull.validate()?;
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            waves: WaveFieldParams::default(),
            buoyancy: BuoyancyConfig::default(),
            hulls: vec![HullSpec::default()],
            duration_secs: 20.0,
            ticks_per_second: 60,
            physics_hz: 50.0,
            report_interval_secs: 1.0,
        }
    }
}

pub fn load_sim_config(path: &Path) -> Result<SimConfig, Box<dyn std::error::Error>> {
    let contents: String = fs::read_to_string(path)?;
    let config: SimConfig = from_str(&contents)?;
    config.validate()?;

    info!(
        "Loaded scene from {}: {} hulls, {:?} accuracy",
        path.display(),
        config.hulls.len(),
        config.buoyancy.accuracy
    );

    Ok(config)
}
