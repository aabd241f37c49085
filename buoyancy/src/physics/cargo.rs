use bevy::math::{Affine3A, Vec3};
use bevy::prelude::Component;
use serde::{Deserialize, Serialize};

use crate::forces::{sanitize_force, ForceKind};
use crate::physics::RigidBodyState;

/// A point mass carried by a hull.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CargoLoad {
    /// Mass in kg
    pub mass: f32,
    /// Position in the hull's local frame
    pub local_position: Vec3,
}

impl CargoLoad {
    pub fn new(mass: f32, local_position: Vec3) -> Self {
        Self {
            mass,
            local_position,
        }
    }
}

/// Point masses whose weight is applied to the body every physics tick.
#[derive(Component, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CargoHold(pub Vec<CargoLoad>);

impl CargoHold {
    pub fn total_mass(&self) -> f32 {
        self.0.iter().map(|load| load.mass).sum()
    }

    /// Applies `mass * gravity` for each load at its world position.
    ///
    /// Returns the summed weight that was applied.
    pub fn apply(&self, to_world: &Affine3A, gravity: Vec3, body: &mut impl RigidBodyState) -> Vec3 {
        let mut total = Vec3::ZERO;
        for load in &self.0 {
            let Some(weight) = sanitize_force(gravity * load.mass, ForceKind::CargoWeight) else {
                continue;
            };
            body.add_force_at_point(weight, to_world.transform_point3(load.local_position));
            total += weight;
        }
        total
    }
}
