use bevy::prelude::*;

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum BuoyancySet {
    /// Frame clock: resample depths and republish fragment lists
    RebuildFragments,
    /// Physics clock: turn fragment lists into forces
    ApplyForces,
}
