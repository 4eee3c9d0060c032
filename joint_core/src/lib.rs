//! # joint_core - Bolted End-Plate Joint Engine
//!
//! `joint_core` computes the design moment resistance `M_j,Rd` and the initial
//! rotational stiffness `S_j,ini` of bolted end-plate beam-to-column joints by
//! the component method of EN 1993-1-8, then classifies the joint by
//! stiffness and strength. All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: pure functions from input records to results
//! - **No I/O**: tables are built in or parsed from strings the caller supplies
//! - **Rich Errors**: structured error types, never partial results
//! - **Configurable code factors**: see [`settings::DesignSettings`]
//!
//! ## Quick Start
//!
//! ```rust
//! use joint_core::{calculate, DesignSettings, JointInput};
//!
//! let result = calculate(&JointInput::demo(), &DesignSettings::default()).unwrap();
//! assert!(result.moment_resistance_knm > 0.0);
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - row assembly, stiffness, classification, joint entry point
//! - [`components`] - effective lengths and component resistances
//! - [`geometry`] - joint input records and derived T-stub dimensions
//! - [`materials`] - steel grades, sections and bolts
//! - [`project`] - batch container for several joints
//! - [`settings`] - partial factors and code coefficients
//! - [`units`] - SI unit wrappers
//! - [`errors`] - structured error types

pub mod calculations;
pub mod components;
pub mod errors;
pub mod geometry;
pub mod materials;
pub mod project;
pub mod settings;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{calculate, JointInput, JointResult, StiffnessClass, StrengthClass};
pub use errors::{CalcError, CalcResult};
pub use project::{JointProject, ProjectMetadata};
pub use settings::DesignSettings;
