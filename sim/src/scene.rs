use std::sync::Arc;

use bevy::prelude::*;
use bevy_log::{error, info};
use bevy_rapier3d::prelude::{ColliderMassProperties, Velocity};
use buoyancy::physics::rapier::cuboid_mass_properties;
use buoyancy::{BuoyancyDriver, BuoyantBodyBundle, BuoyantHull, CargoHold, HullMesh, Ocean};

use crate::config::SimConfig;

/// Label used in the periodic report.
#[derive(Component, Debug, Clone)]
pub struct HullName(pub String);

#[derive(Resource)]
pub struct ReportTimer(pub Timer);

impl ReportTimer {
    pub fn every(seconds: f32) -> Self {
        Self(Timer::from_seconds(seconds, TimerMode::Repeating))
    }
}

pub fn spawn_hulls(mut commands: Commands, config: Res<SimConfig>, ocean: Res<Ocean>) {
    for spec in &config.hulls {
        let mesh = Arc::new(HullMesh::cuboid(spec.half_extents));
        let driver = match BuoyancyDriver::new(mesh, ocean.handle(), config.buoyancy) {
            Ok(driver) => driver,
            Err(err) => {
                error!("Skipping hull {}: {err}", spec.name);
                continue;
            }
        };

        let mut bundle = BuoyantBodyBundle::cuboid(driver, spec.half_extents, spec.density)
            .with_transform(spec.transform());
        if let Some(center_of_mass) = spec.center_of_mass {
            bundle = bundle.with_mass_properties(cuboid_mass_properties(
                spec.half_extents,
                spec.density,
                center_of_mass,
            ));
        }

        let mut entity = commands.spawn((bundle, HullName(spec.name.clone())));
        if !spec.cargo.is_empty() {
            entity.insert(CargoHold(spec.cargo.clone()));
        }

        info!(
            "Spawned hull {} at {} ({} cargo loads)",
            spec.name,
            spec.position,
            spec.cargo.len()
        );
    }
}

pub fn report_hulls(
    time: Res<Time>,
    mut timer: ResMut<ReportTimer>,
    hulls: Query<(&HullName, &Transform, &Velocity, &BuoyantHull)>,
) {
    if !timer.0.tick(time.delta()).just_finished() {
        return;
    }

    let elapsed = time.elapsed_secs();
    for (name, transform, velocity, hull) in &hulls {
        let driver = &hull.0;
        let position = transform.translation;
        let water_height = driver.field().height(position.x, position.z, elapsed);
        let speed = velocity.linvel.length();

        info!(
            "{:>14} t={elapsed:6.2}s y={:7.3} (water {:6.3}) speed={speed:6.3} fragments={:4} wetted={:7.3}m² cf={:.5}",
            name.0,
            position.y,
            water_height,
            driver.ready_fragments().len(),
            driver.wetted_area(),
            driver.frictional_resistance_coefficient(speed),
        );
    }
}

pub fn exit_after_duration(
    time: Res<Time>,
    config: Res<SimConfig>,
    mut exit: EventWriter<AppExit>,
) {
    if time.elapsed_secs() >= config.duration_secs {
        info!("Simulated {:.1}s, stopping", time.elapsed_secs());
        exit.write(AppExit::Success);
    }
}
