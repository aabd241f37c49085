use std::path::PathBuf;
use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy::transform::TransformPlugin;
use bevy_app::ScheduleRunnerPlugin;
use bevy_log::{error, info, LogPlugin};
use bevy_rapier3d::prelude::*;
use buoyancy::{Accuracy, BuoyancyPlugin, BuoyancySet, Ocean, WavePreset};
use clap::{Parser, ValueEnum};

use crate::config::{load_sim_config, SimConfig};
use crate::scene::{exit_after_duration, report_hulls, spawn_hulls, ReportTimer};

mod config;
mod scene;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// RON scene file; the built-in scene is used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Replaces the scene's wave parameters
    #[arg(short, long, value_enum)]
    preset: Option<PresetArg>,

    #[arg(short, long, value_enum)]
    accuracy: Option<AccuracyArg>,

    /// Simulated seconds before exiting
    #[arg(short, long)]
    duration: Option<f32>,

    /// Pace frames against the wall clock instead of running flat out
    #[arg(long)]
    realtime: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum PresetArg {
    Still,
    Calm,
    Swell,
    Storm,
}

impl From<PresetArg> for WavePreset {
    fn from(preset: PresetArg) -> Self {
        match preset {
            PresetArg::Still => WavePreset::Still,
            PresetArg::Calm => WavePreset::Calm,
            PresetArg::Swell => WavePreset::Swell,
            PresetArg::Storm => WavePreset::Storm,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum AccuracyArg {
    Low,
    Medium,
    High,
}

impl From<AccuracyArg> for Accuracy {
    fn from(accuracy: AccuracyArg) -> Self {
        match accuracy {
            AccuracyArg::Low => Accuracy::Low,
            AccuracyArg::Medium => Accuracy::Medium,
            AccuracyArg::High => Accuracy::High,
        }
    }
}

fn resolve_config(args: &Args) -> Result<SimConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => load_sim_config(path)?,
        None => {
            info!("No scene file given, using the built-in scene");
            SimConfig::default()
        }
    };

    if let Some(preset) = args.preset {
        config.waves = WavePreset::from(preset).params();
    }
    if let Some(accuracy) = args.accuracy {
        config.buoyancy.accuracy = accuracy.into();
    }
    if let Some(duration) = args.duration {
        config.duration_secs = duration;
    }

    config.validate()?;
    Ok(config)
}

fn main() -> AppExit {
    let args = Args::parse();

    let mut app = App::new();
    app.add_plugins(LogPlugin::default());

    let config = match resolve_config(&args) {
        Ok(config) => config,
        Err(err) => {
            error!("Could not load simulation config: {err}");
            return AppExit::error();
        }
    };
    let ocean = match Ocean::new(config.waves) {
        Ok(ocean) => ocean,
        Err(err) => {
            error!("Invalid wave parameters: {err}");
            return AppExit::error();
        }
    };

    let frame = Duration::from_secs_f64(1.0 / config.ticks_per_second as f64);
    let wait = if args.realtime { frame } else { Duration::ZERO };

    // The physics clock has to exist before Rapier picks its timestep
    app.insert_resource(Time::<Fixed>::from_hz(config.physics_hz));
    app.add_plugins((
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(wait)),
        TransformPlugin,
        // Step Rapier on the physics clock, right after the buoyancy forces
        RapierPhysicsPlugin::<NoUserData>::default().in_fixed_schedule(),
        BuoyancyPlugin,
    ));
    app.insert_resource(TimestepMode::Fixed {
        dt: (1.0 / config.physics_hz) as f32,
        substeps: 1,
    });
    if !args.realtime {
        app.insert_resource(TimeUpdateStrategy::ManualDuration(frame));
    }

    info!(
        "Starting buoyancy sim: {} hulls, {:?} accuracy, {}s at {} fps / {} Hz physics",
        config.hulls.len(),
        config.buoyancy.accuracy,
        config.duration_secs,
        config.ticks_per_second,
        config.physics_hz
    );

    app.insert_resource(ReportTimer::every(config.report_interval_secs))
        .insert_resource(ocean)
        .insert_resource(config)
        .add_systems(Startup, spawn_hulls)
        .add_systems(
            Update,
            (
                report_hulls.after(BuoyancySet::RebuildFragments),
                exit_after_duration,
            ),
        );

    app.run()
}
