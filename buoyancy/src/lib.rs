//! Real-time buoyancy for rigid bodies floating on an analytic ocean.
//!
//! Each frame the hull of every body is cut against the water surface into
//! submerged triangle fragments; each physics step those fragments are turned
//! into hydrostatic and pressure drag forces.

pub mod config;
pub mod constants;
pub mod driver;
pub mod error;
pub mod forces;
pub mod hull;
pub mod physics;
pub mod sets;
pub mod water;

pub use config::BuoyancyConfig;
pub use driver::{BuoyancyDriver, DriverPhase, ForceReport};
pub use error::BuoyancyError;
pub use hull::{Accuracy, HullMesh, TriangleFragment};
pub use physics::{
    AccumulatedForces, BuoyancyPlugin, BuoyantBodyBundle, BuoyantHull, CargoHold, CargoLoad,
    Ocean, RigidBodyState,
};
pub use sets::BuoyancySet;
pub use water::{WaveField, WaveFieldParams, WavePreset};
