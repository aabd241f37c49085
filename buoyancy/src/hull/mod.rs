//! Hull geometry and the per-tick reconstruction of its submerged part.

pub mod clipper;
pub mod fragment;
pub mod mesh;

pub use clipper::{clip_submerged, order_by_height, Accuracy};
pub use fragment::{pressure_center_fraction, TriangleFragment};
pub use mesh::HullMesh;
