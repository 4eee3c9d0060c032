//! # Joint Calculations
//!
//! Assembly of the joint components into the joint's design properties.
//! The entry point follows the usual pattern:
//!
//! - [`JointInput`] - input parameters (JSON-serializable)
//! - [`JointResult`] - results with the full breakdown (JSON-serializable)
//! - [`calculate`] - pure calculation function returning `CalcResult`
//!
//! ## Stages
//!
//! - [`row_assembly`] - row capacities, group and global ceilings, `M_j,Rd`
//! - [`stiffness`] - spring model, `z_eq`, `S_j,ini`
//! - [`classification`] - stiffness and strength classes
//! - [`joint`] - runs the stages in order

pub mod classification;
pub mod joint;
pub mod row_assembly;
pub mod stiffness;

pub use classification::{classify, Classification, ClassificationInput, StiffnessClass, StrengthClass};
pub use joint::{calculate, calculate_with_sections, JointInput, JointResult};
pub use row_assembly::{RowAssembly, RowForce, RowLimit};
pub use stiffness::StiffnessResult;
