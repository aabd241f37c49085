//! Hydrostatic and hydrodynamic forces acting on one submerged fragment.
//!
//! Forces follow the per-triangle water interaction model used for boats in
//! games: hydrostatic pressure integrated over each fragment (vertical only)
//! plus a pressure drag term proportional to how squarely the fragment faces
//! its local flow. Viscous drag is not modelled.

use std::fmt;

use bevy::math::Vec3;
use bevy_log::warn;

use crate::constants::{DEGENERATE_EPSILON, INVERSE_KINEMATIC_VISCOSITY};
use crate::hull::TriangleFragment;

/// Which force a value belongs to, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForceKind {
    Hydrostatic,
    PressureDrag,
    CargoWeight,
}

impl fmt::Display for ForceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ForceKind::Hydrostatic => "hydrostatic",
            ForceKind::PressureDrag => "pressure drag",
            ForceKind::CargoWeight => "cargo weight",
        };
        f.write_str(name)
    }
}

/// Passes finite forces through; logs and drops anything else.
pub fn sanitize_force(force: Vec3, kind: ForceKind) -> Option<Vec3> {
    if force.is_finite() {
        Some(force)
    } else {
        warn!("{kind} force is not finite ({force:?}), ignoring it this tick");
        None
    }
}

pub(crate) fn raw_hydrostatic_force(
    fragment: &TriangleFragment,
    fluid_density: f32,
    gravity_y: f32,
    water_height: f32,
) -> Vec3 {
    let depth = water_height - fragment.buoyancy_center.y;
    let force = fragment.normal() * (fluid_density * gravity_y * depth);
    // Only the vertical component is modelled
    Vec3::new(0.0, force.y, 0.0)
}

/// Hydrostatic force on a fragment, applied at its buoyancy center.
///
/// `water_height` is the surface height above the buoyancy center and
/// `gravity_y` the (usually negative) vertical gravity component.
pub fn hydrostatic_force(
    fragment: &TriangleFragment,
    fluid_density: f32,
    gravity_y: f32,
    water_height: f32,
) -> Vec3 {
    let force = raw_hydrostatic_force(fragment, fluid_density, gravity_y, water_height);
    sanitize_force(force, ForceKind::Hydrostatic).unwrap_or(Vec3::ZERO)
}

/// Local flow seen by a fragment of a moving body.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlowState {
    /// Velocity of the fragment centroid
    pub velocity: Vec3,
    /// Cosine of the angle between the fragment normal and its velocity,
    /// zero when either is degenerate
    pub cos_theta: f32,
}

impl FlowState {
    pub fn at_fragment(
        fragment: &TriangleFragment,
        linear_velocity: Vec3,
        angular_velocity: Vec3,
        center_of_mass: Vec3,
    ) -> Self {
        let velocity = linear_velocity + angular_velocity.cross(fragment.center - center_of_mass);
        let normal = fragment.normal();
        let denominator = normal.length() * velocity.length();
        let cos_theta = if denominator > DEGENERATE_EPSILON && denominator.is_finite() {
            normal.dot(velocity) / denominator
        } else {
            0.0
        };

        Self {
            velocity,
            cos_theta,
        }
    }
}

pub(crate) fn raw_pressure_drag(fragment: &TriangleFragment, flow: &FlowState) -> Vec3 {
    -fragment.normal() * flow.cos_theta
}

/// Unscaled pressure drag, applied at the fragment centroid.
///
/// Callers multiply by `pressure_drag_coefficient * |body velocity|²`.
pub fn pressure_drag(fragment: &TriangleFragment, flow: &FlowState) -> Vec3 {
    sanitize_force(raw_pressure_drag(fragment, flow), ForceKind::PressureDrag)
        .unwrap_or(Vec3::ZERO)
}

/// ITTC-1957 frictional resistance coefficient for a body moving through water.
///
/// `Cf = 0.075 / (log10(Re) - 2)²` with `Re = speed * length / ν`.
pub fn frictional_resistance_coefficient(speed: f32, length: f32) -> f32 {
    let reynolds = speed * length * INVERSE_KINEMATIC_VISCOSITY;
    if reynolds.is_nan() || reynolds <= 0.0 {
        return 0.0;
    }
    let denominator = (reynolds.log10() - 2.0).powi(2);
    let coefficient = 0.075 / denominator;
    if coefficient.is_finite() {
        coefficient
    } else {
        0.0
    }
}

/// Extent of a point cloud along `direction` (max minus min projection).
///
/// Zero when `direction` is zero.
pub fn extent_along(points: &[Vec3], direction: Vec3) -> f32 {
    let Some(direction) = direction.try_normalize() else {
        return 0.0;
    };
    let (min, max) = points
        .iter()
        .map(|p| p.dot(direction))
        .fold((f32::MAX, f32::MIN), |(min, max), d| (min.min(d), max.max(d)));
    if points.is_empty() {
        0.0
    } else {
        max - min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bottom_face() -> TriangleFragment {
        // Faces down, area 0.5
        TriangleFragment::new(
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(0.0, -1.0, 1.0),
        )
    }

    #[test]
    fn test_bottom_face_is_pushed_up() {
        let fragment = bottom_face();
        let force = hydrostatic_force(&fragment, 1000.0, -9.81, 0.0);
        // rho * g * depth * area
        assert!((force.y - 1000.0 * 9.81 * 1.0 * 0.5).abs() < 1e-2);
        assert_eq!(force.x, 0.0);
        assert_eq!(force.z, 0.0);
    }

    #[test]
    fn test_hydrostatic_force_is_vertical() {
        let slanted = TriangleFragment::new(
            Vec3::new(0.0, -2.0, 0.0),
            Vec3::new(1.0, -1.0, 0.3),
            Vec3::new(-0.4, -1.5, 1.0),
        );
        for water_height in [-1.0, 0.0, 0.7, 3.0] {
            let force = hydrostatic_force(&slanted, 1025.0, -9.81, water_height);
            assert_eq!(force.x, 0.0);
            assert_eq!(force.z, 0.0);
        }
    }

    #[test]
    fn test_non_finite_hydrostatic_force_is_dropped() {
        let fragment = bottom_face();
        assert_eq!(hydrostatic_force(&fragment, 1000.0, -9.81, f32::NAN), Vec3::ZERO);
        assert_eq!(
            hydrostatic_force(&fragment, f32::INFINITY, -9.81, 1.0),
            Vec3::ZERO
        );
        assert_eq!(
            sanitize_force(Vec3::new(0.0, f32::NAN, 0.0), ForceKind::Hydrostatic),
            None
        );
        assert_eq!(
            sanitize_force(Vec3::ONE, ForceKind::PressureDrag),
            Some(Vec3::ONE)
        );
    }

    #[test]
    fn test_pressure_drag_is_zero_at_rest() {
        let fragment = bottom_face();
        let flow = FlowState::at_fragment(&fragment, Vec3::ZERO, Vec3::ZERO, Vec3::ZERO);
        assert_eq!(flow.cos_theta, 0.0);
        assert_eq!(pressure_drag(&fragment, &flow), Vec3::ZERO);
    }

    #[test]
    fn test_pressure_drag_opposes_motion_into_face() {
        let fragment = bottom_face();
        // Sinking: the downward-facing bottom meets the water head on
        let flow = FlowState::at_fragment(&fragment, Vec3::NEG_Y * 2.0, Vec3::ZERO, Vec3::ZERO);
        assert!((flow.cos_theta - 1.0).abs() < 1e-6);

        let drag = pressure_drag(&fragment, &flow);
        assert!(drag.y > 0.0);
        assert!((drag.length() - fragment.area()).abs() < 1e-6);
    }

    #[test]
    fn test_flow_includes_rotation() {
        let fragment = bottom_face();
        let center_of_mass = Vec3::ZERO;
        let spin = Vec3::new(0.0, 0.0, 1.0);
        let flow = FlowState::at_fragment(&fragment, Vec3::ZERO, spin, center_of_mass);

        let expected = spin.cross(fragment.center - center_of_mass);
        assert!((flow.velocity - expected).length() < 1e-6);
        assert!(flow.cos_theta.abs() <= 1.0);
    }

    #[test]
    fn test_zero_area_fragment_has_no_drag() {
        let sliver = TriangleFragment::new(Vec3::ZERO, Vec3::X, Vec3::X * 2.0);
        let flow = FlowState::at_fragment(&sliver, Vec3::ONE, Vec3::ZERO, Vec3::ZERO);
        assert_eq!(flow.cos_theta, 0.0);
        assert_eq!(pressure_drag(&sliver, &flow), Vec3::ZERO);
    }

    #[test]
    fn test_frictional_resistance_coefficient() {
        // 10 m/s over 100 m: Re = 1e9, log10 = 9, Cf = 0.075 / 49
        let cf = frictional_resistance_coefficient(10.0, 100.0);
        assert!((cf - 0.075 / 49.0).abs() < 1e-6);
        assert_eq!(frictional_resistance_coefficient(0.0, 10.0), 0.0);
        assert_eq!(frictional_resistance_coefficient(1.0, f32::NAN), 0.0);
    }

    #[test]
    fn test_extent_along() {
        let points = [Vec3::new(-1.0, 0.0, 0.0), Vec3::new(3.0, 5.0, 0.0)];
        assert!((extent_along(&points, Vec3::X * 10.0) - 4.0).abs() < 1e-6);
        assert_eq!(extent_along(&points, Vec3::ZERO), 0.0);
        assert_eq!(extent_along(&[], Vec3::X), 0.0);
    }
}
