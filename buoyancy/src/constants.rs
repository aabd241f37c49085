use bevy::math::Vec3;

/// Density of fresh water at 4 °C (kg/m³).
pub const WATER_DENSITY: f32 = 1000.0;
/// Density of sea water (kg/m³).
pub const SEA_WATER_DENSITY: f32 = 1025.0;
/// Gravity used when the physics host does not provide one.
pub const DEFAULT_GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);
pub const DEFAULT_PRESSURE_DRAG_COEFFICIENT: f32 = 0.5;
/// Inverse kinematic viscosity of water at 20 °C (s/m²).
pub const INVERSE_KINEMATIC_VISCOSITY: f32 = 1.0e6;
/// Below this length a normal or velocity is treated as zero.
pub const DEGENERATE_EPSILON: f32 = 1.0e-12;
