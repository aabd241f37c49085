//! Rigid-body side of the buoyancy model.
//!
//! Force resolution belongs to the physics engine; this module only describes
//! what the buoyancy code needs to read from a body and how it hands forces
//! back.

pub mod cargo;
pub mod rapier;

use bevy::math::Vec3;

pub use cargo::{CargoHold, CargoLoad};
pub use rapier::{
    apply_hull_forces, rebuild_underwater_meshes, BuoyancyPlugin, BuoyantBodyBundle, BuoyantHull,
    Ocean,
};

/// Kinematic state of a rigid body plus a way to push on it.
pub trait RigidBodyState {
    fn linear_velocity(&self) -> Vec3;
    fn angular_velocity(&self) -> Vec3;
    fn world_center_of_mass(&self) -> Vec3;
    /// Accumulates `force` applied at the world-space `point`.
    fn add_force_at_point(&mut self, force: Vec3, point: Vec3);
}

/// Body state that sums point forces into a net force and a torque about the
/// center of mass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AccumulatedForces {
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
    pub center_of_mass: Vec3,
    pub force: Vec3,
    pub torque: Vec3,
}

impl AccumulatedForces {
    pub fn new(linear_velocity: Vec3, angular_velocity: Vec3, center_of_mass: Vec3) -> Self {
        Self {
            linear_velocity,
            angular_velocity,
            center_of_mass,
            force: Vec3::ZERO,
            torque: Vec3::ZERO,
        }
    }

    pub fn at_rest(center_of_mass: Vec3) -> Self {
        Self::new(Vec3::ZERO, Vec3::ZERO, center_of_mass)
    }
}

impl RigidBodyState for AccumulatedForces {
    fn linear_velocity(&self) -> Vec3 {
        self.linear_velocity
    }

    fn angular_velocity(&self) -> Vec3 {
        self.angular_velocity
    }

    fn world_center_of_mass(&self) -> Vec3 {
        self.center_of_mass
    }

    fn add_force_at_point(&mut self, force: Vec3, point: Vec3) {
        self.force += force;
        self.torque += (point - self.center_of_mass).cross(force);
    }
}
