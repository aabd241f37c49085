//! Errors raised while validating hull meshes and configuration.
//!
//! Runtime numeric problems (zero velocity, non-finite forces) are never
//! reported through this type: they are replaced by a zero force and logged.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuoyancyError {
    #[error("hull mesh has no vertices")]
    EmptyMesh,
    #[error("hull mesh has no triangles")]
    EmptyTriangles,
    #[error("triangle index list has {0} entries, which is not a multiple of 3")]
    IndexCount(usize),
    #[error("triangle index {index} is out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
    #[error("vertex {0} has a non-finite coordinate")]
    NonFiniteVertex(usize),
    #[error("got {depths} depth samples for {vertices} vertices")]
    DepthCountMismatch { depths: usize, vertices: usize },
    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f32 },
    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f32 },
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },
}

/// Rejects NaN and infinities.
pub fn ensure_finite(name: &'static str, value: f32) -> Result<f32, BuoyancyError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(BuoyancyError::NonFinite { name, value })
    }
}

pub fn ensure_non_negative(name: &'static str, value: f32) -> Result<f32, BuoyancyError> {
    let value = ensure_finite(name, value)?;
    if value < 0.0 {
        Err(BuoyancyError::Negative { name, value })
    } else {
        Ok(value)
    }
}

pub fn ensure_positive(name: &'static str, value: f32) -> Result<f32, BuoyancyError> {
    let value = ensure_finite(name, value)?;
    if value <= 0.0 {
        Err(BuoyancyError::NonPositive { name, value })
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_helpers() {
        assert_eq!(ensure_finite("x", 1.5), Ok(1.5));
        assert!(matches!(
            ensure_finite("x", f32::NAN),
            Err(BuoyancyError::NonFinite { name: "x", .. })
        ));
        assert_eq!(
            ensure_non_negative("amplitude", -1.0),
            Err(BuoyancyError::Negative {
                name: "amplitude",
                value: -1.0
            })
        );
        assert_eq!(ensure_non_negative("amplitude", 0.0), Ok(0.0));
        assert!(ensure_positive("density", 0.0).is_err());
        assert!(ensure_positive("density", f32::INFINITY).is_err());
    }
}
