//! Ocean surface model shared by every floating body.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │           WaveFieldParams (config)            │
//! │  amplitude, frequency, inverse length, noise  │
//! └──────────────────────┬────────────────────────┘
//!                        ▼
//!              ┌───────────────────┐
//!              │     WaveField     │  Arc-shared, read-only
//!              │ - height          │
//!              │ - height + normal │
//!              │ - batch depths    │
//!              └─────────┬─────────┘
//!                        ▼
//!              BuoyancyDriver (one per body)
//! ```
//!
//! There is exactly one active field per scene. It is handed to each driver
//! at construction instead of being looked up globally.

pub mod config;
pub mod field;

pub use config::{WaveFieldParams, WavePreset};
pub use field::{SurfaceSample, WaveField};
