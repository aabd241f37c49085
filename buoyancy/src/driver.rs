//! Per-body orchestration of the two simulation clocks.
//!
//! The visual tick samples the wave field at every hull vertex and rebuilds
//! the submerged fragment list; the physics tick turns the last completed list
//! into forces. The list is double-buffered: a rebuild writes into a scratch
//! buffer and publishes it by swapping, so force application never sees a
//! half-built list.
//!
//! ```text
//!  visual tick:  Idle ─► SamplingDepths ─► Clipping ─► Ready ─┐
//!                          ▲                                   │
//!                          └───────────────────────────────────┘
//!  physics tick: reads `ready` (previous Ready result) at any phase
//! ```

use std::sync::Arc;

use bevy::math::{Affine3A, Vec3};
use bevy_log::{debug, error};

use crate::config::BuoyancyConfig;
use crate::error::BuoyancyError;
use crate::forces::{
    extent_along, frictional_resistance_coefficient, raw_hydrostatic_force, raw_pressure_drag,
    sanitize_force, FlowState, ForceKind,
};
use crate::hull::{clip_submerged, HullMesh, TriangleFragment};
use crate::physics::RigidBodyState;
use crate::water::WaveField;

/// Where the driver is in its rebuild cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriverPhase {
    /// No rebuild has run yet
    #[default]
    Idle,
    SamplingDepths,
    Clipping,
    /// The last rebuild was published
    Ready,
}

/// Summary of the forces applied during one physics tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ForceReport {
    /// Fragments that were evaluated
    pub fragments: usize,
    pub total_hydrostatic: Vec3,
    pub total_drag: Vec3,
    /// Non-finite forces that were dropped
    pub rejected: usize,
}

pub struct BuoyancyDriver {
    mesh: Arc<HullMesh>,
    field: Arc<WaveField>,
    config: BuoyancyConfig,
    world_vertices: Vec<Vec3>,
    depths: Vec<f32>,
    building: Vec<TriangleFragment>,
    ready: Vec<TriangleFragment>,
    phase: DriverPhase,
    length_along_velocity: f32,
    rebuilds: u64,
}

impl BuoyancyDriver {
    pub fn new(
        mesh: Arc<HullMesh>,
        field: Arc<WaveField>,
        config: BuoyancyConfig,
    ) -> Result<Self, BuoyancyError> {
        config.validate()?;
        let vertex_count = mesh.vertex_count();

        Ok(Self {
            mesh,
            field,
            config,
            world_vertices: Vec::with_capacity(vertex_count),
            depths: vec![0.0; vertex_count],
            building: Vec::new(),
            ready: Vec::new(),
            phase: DriverPhase::Idle,
            length_along_velocity: 0.0,
            rebuilds: 0,
        })
    }

    /// Runs a full visual tick: depth sampling, clipping and publication.
    pub fn rebuild(&mut self, to_world: &Affine3A, linear_velocity: Vec3, time: f32) {
        self.sample_depths(to_world, linear_velocity, time);
        self.clip_and_publish();
    }

    /// First half of a rebuild: world-space vertices and their depths.
    pub fn sample_depths(&mut self, to_world: &Affine3A, linear_velocity: Vec3, time: f32) {
        self.phase = DriverPhase::SamplingDepths;

        self.mesh.transform_into(to_world, &mut self.world_vertices);
        self.depths.resize(self.world_vertices.len(), 0.0);
        self.field
            .sample_depths(&self.world_vertices, time, &mut self.depths);
        self.length_along_velocity = extent_along(&self.world_vertices, linear_velocity);

        self.phase = DriverPhase::Clipping;
    }

    /// Second half of a rebuild: clip into the scratch buffer, then publish it.
    pub fn clip_and_publish(&mut self) {
        if self.phase != DriverPhase::Clipping {
            debug!("clip requested in {:?} phase without fresh depths", self.phase);
            return;
        }

        self.building.clear();
        if let Err(err) = clip_submerged(
            &self.world_vertices,
            self.mesh.indices(),
            &self.depths,
            self.config.accuracy,
            &mut self.building,
        ) {
            error!("failed to clip hull: {err}");
            self.building.clear();
        }

        std::mem::swap(&mut self.building, &mut self.ready);
        self.phase = DriverPhase::Ready;
        self.rebuilds += 1;

        debug!(
            "hull rebuilt: {} underwater fragments ({:?})",
            self.ready.len(),
            self.config.accuracy
        );
    }

    /// Applies hydrostatic and pressure drag forces from the last published
    /// fragment list.
    pub fn apply_forces(
        &self,
        body: &mut impl RigidBodyState,
        gravity: Vec3,
        time: f32,
    ) -> ForceReport {
        let linear_velocity = body.linear_velocity();
        let angular_velocity = body.angular_velocity();
        let center_of_mass = body.world_center_of_mass();
        let drag_scale = self.config.pressure_drag_coefficient * linear_velocity.length_squared();

        let mut report = ForceReport {
            fragments: self.ready.len(),
            ..Default::default()
        };

        for fragment in &self.ready {
            let water_height = self.field.height(
                fragment.buoyancy_center.x,
                fragment.buoyancy_center.z,
                time,
            );
            let hydrostatic = raw_hydrostatic_force(
                fragment,
                self.config.fluid_density,
                gravity.y,
                water_height,
            );
            match sanitize_force(hydrostatic, ForceKind::Hydrostatic) {
                Some(force) => {
                    body.add_force_at_point(force, fragment.buoyancy_center);
                    report.total_hydrostatic += force;
                }
                None => report.rejected += 1,
            }

            let flow =
                FlowState::at_fragment(fragment, linear_velocity, angular_velocity, center_of_mass);
            let drag = raw_pressure_drag(fragment, &flow) * drag_scale;
            match sanitize_force(drag, ForceKind::PressureDrag) {
                Some(force) => {
                    body.add_force_at_point(force, fragment.center);
                    report.total_drag += force;
                }
                None => report.rejected += 1,
            }
        }

        report
    }

    /// Fragments from the last completed rebuild.
    pub fn ready_fragments(&self) -> &[TriangleFragment] {
        &self.ready
    }

    pub fn phase(&self) -> DriverPhase {
        self.phase
    }

    pub fn depths(&self) -> &[f32] {
        &self.depths
    }

    pub fn world_vertices(&self) -> &[Vec3] {
        &self.world_vertices
    }

    pub fn mesh(&self) -> &Arc<HullMesh> {
        &self.mesh
    }

    pub fn field(&self) -> &Arc<WaveField> {
        &self.field
    }

    pub fn config(&self) -> &BuoyancyConfig {
        &self.config
    }

    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    /// Hull extent along the velocity sampled at the last rebuild.
    pub fn length_along_velocity(&self) -> f32 {
        self.length_along_velocity
    }

    /// Frictional resistance coefficient of the hull at `speed`.
    pub fn frictional_resistance_coefficient(&self, speed: f32) -> f32 {
        frictional_resistance_coefficient(speed, self.length_along_velocity)
    }

    /// Sum of fragment areas, i.e. the wetted surface.
    pub fn wetted_area(&self) -> f32 {
        self.ready.iter().map(TriangleFragment::area).sum()
    }
}
