//! Rapier physics integration for buoyant hulls.
//!
//! Hull rebuilds run on the frame clock (`Update`), spread over the task pool;
//! forces run on the physics clock (`FixedUpdate`) and are written into each
//! body's `ExternalForce`, which this plugin owns for buoyant bodies.

use std::sync::Arc;

use bevy::prelude::*;
use bevy_ecs::resource::Resource;
use bevy_log::trace;
use bevy_rapier3d::prelude::*;

use crate::constants::DEFAULT_GRAVITY;
use crate::driver::BuoyancyDriver;
use crate::error::BuoyancyError;
use crate::physics::{AccumulatedForces, CargoHold};
use crate::sets::BuoyancySet;
use crate::water::{WaveField, WaveFieldParams};

/// The water surface shared by every buoyant body.
#[derive(Resource, Clone)]
pub struct Ocean(Arc<WaveField>);

impl Ocean {
    pub fn new(params: WaveFieldParams) -> Result<Self, BuoyancyError> {
        Ok(Self(Arc::new(WaveField::new(params)?)))
    }

    /// A shared handle to hand to a new driver.
    pub fn handle(&self) -> Arc<WaveField> {
        Arc::clone(&self.0)
    }

    pub fn field(&self) -> &WaveField {
        &self.0
    }
}

/// Buoyancy state of one rigid body.
#[derive(Component)]
pub struct BuoyantHull(pub BuoyancyDriver);

/// Bundle for spawning a dynamic body that floats.
#[derive(Bundle)]
pub struct BuoyantBodyBundle {
    pub body: RigidBody,
    pub collider: Collider,
    /// Either a density or explicit mass properties for the collider
    pub collider_mass: ColliderMassProperties,
    pub velocity: Velocity,
    /// Overwritten every physics step by `apply_hull_forces`
    pub external_force: ExternalForce,
    /// Read back to find the world-space center of mass
    pub mass_properties: ReadMassProperties,
    pub damping: Damping,
    pub hull: BuoyantHull,
    pub transform: Transform,
}

impl BuoyantBodyBundle {
    /// A box-shaped body whose collider matches a cuboid hull mesh.
    ///
    /// # Arguments
    /// * `driver` - Driver built on `HullMesh::cuboid(half_extents)`
    /// * `half_extents` - Half size of the box
    /// * `density` - Body density in kg/m³
    pub fn cuboid(driver: BuoyancyDriver, half_extents: Vec3, density: f32) -> Self {
        Self {
            // Dynamic: Rapier integrates our external forces plus its own gravity
            body: RigidBody::Dynamic,
            // Same box as the hull mesh, so contacts and buoyancy agree
            collider: Collider::cuboid(half_extents.x, half_extents.y, half_extents.z),
            // Lighter than water floats, heavier sinks
            collider_mass: ColliderMassProperties::Density(density),
            velocity: Velocity::zero(),
            // Zero until the first physics step after a rebuild
            external_force: ExternalForce::default(),
            mass_properties: ReadMassProperties::default(),
            // Stands in for the unmodelled viscous drag
            damping: Damping {
                linear_damping: 0.1,
                angular_damping: 0.5,
            },
            hull: BuoyantHull(driver),
            transform: Transform::default(),
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Replaces the density-derived mass, e.g. to move the center of mass.
    pub fn with_mass_properties(mut self, mass_properties: MassProperties) -> Self {
        self.collider_mass = ColliderMassProperties::MassProperties(mass_properties);
        self
    }
}

/// Mass properties of a solid box whose center of mass is moved to
/// `local_center_of_mass` (ballast, a low keel).
///
/// The inertia stays the box's own, about its geometric center.
pub fn cuboid_mass_properties(
    half_extents: Vec3,
    density: f32,
    local_center_of_mass: Vec3,
) -> MassProperties {
    let mass = density * 8.0 * half_extents.x * half_extents.y * half_extents.z;
    let squared = half_extents * half_extents;
    MassProperties {
        local_center_of_mass,
        mass,
        principal_inertia_local_frame: Quat::IDENTITY,
        principal_inertia: Vec3::new(
            squared.y + squared.z,
            squared.x + squared.z,
            squared.x + squared.y,
        ) * (mass / 3.0),
    }
}

/// Plugin that rebuilds submerged hulls every frame and applies their forces
/// every physics step.
///
/// Rapier itself must be added separately, in the fixed schedule
/// (`RapierPhysicsPlugin::in_fixed_schedule`), so that each of its steps
/// integrates the forces written in that same step.
pub struct BuoyancyPlugin;

impl Plugin for BuoyancyPlugin {
    fn build(&self, app: &mut App) {
        // Frame clock
        app.configure_sets(Update, BuoyancySet::RebuildFragments)
            // Physics clock: forces must be in place before Rapier copies
            // components into its pipeline
            .configure_sets(
                FixedUpdate,
                BuoyancySet::ApplyForces.before(PhysicsSet::SyncBackend),
            )
            .add_systems(
                Update,
                rebuild_underwater_meshes.in_set(BuoyancySet::RebuildFragments),
            )
            .add_systems(
                FixedUpdate,
                apply_hull_forces.in_set(BuoyancySet::ApplyForces),
            );
    }
}

/// Samples the water under every hull and republishes its fragment list.
pub fn rebuild_underwater_meshes(
    time: Res<Time>,
    mut hulls: Query<(&mut BuoyantHull, &GlobalTransform, Option<&Velocity>)>,
) {
    let elapsed = time.elapsed_secs();
    hulls
        .par_iter_mut()
        .for_each(|(mut hull, transform, velocity)| {
            let linear_velocity = velocity.map_or(Vec3::ZERO, |v| v.linvel);
            hull.0.rebuild(&transform.affine(), linear_velocity, elapsed);
        });
}

/// Turns the last published fragment lists into external forces.
pub fn apply_hull_forces(
    time: Res<Time>,
    rapier_config: Query<&RapierConfiguration>,
    mut bodies: Query<(
        Entity,
        &BuoyantHull,
        &GlobalTransform,
        &Velocity,
        Option<&ReadMassProperties>,
        Option<&CargoHold>,
        &mut ExternalForce,
    )>,
) {
    let gravity = rapier_config
        .iter()
        .next()
        .map_or(DEFAULT_GRAVITY, |config| config.gravity);
    let elapsed = time.elapsed_secs();

    for (entity, hull, transform, velocity, mass_properties, cargo, mut external_force) in
        bodies.iter_mut()
    {
        let local_center_of_mass =
            mass_properties.map_or(Vec3::ZERO, |props| props.get().local_center_of_mass);
        let mut body = AccumulatedForces::new(
            velocity.linvel,
            velocity.angvel,
            transform.transform_point(local_center_of_mass),
        );

        let report = hull.0.apply_forces(&mut body, gravity, elapsed);
        if let Some(cargo) = cargo {
            cargo.apply(&transform.affine(), gravity, &mut body);
        }

        external_force.force = body.force;
        external_force.torque = body.torque;

        trace!(
            "{entity}: {} fragments, buoyancy {:?}, drag {:?}, {} rejected",
            report.fragments,
            report.total_hydrostatic,
            report.total_drag,
            report.rejected
        );
    }
}
