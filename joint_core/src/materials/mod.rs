//! # Materials Database
//!
//! Structural steel grades, European I/H section properties and bolt data for
//! end-plate joints.
//!
//! - **Steel grades**: S235 to S460 per EN 10025-2 (nominal thickness ≤ 40 mm)
//! - **Sections**: HEA, HEB and IPE rolled profiles ([`steel`])
//! - **Bolts**: M12 to M36 in property classes 4.6 to 10.9 ([`bolts`])
//!
//! Every table is fixed data; nothing here is computed ad hoc.
//!
//! ## Example
//!
//! ```rust
//! use joint_core::materials::{SteelGrade, BoltGrade, BoltSize};
//!
//! assert_eq!(SteelGrade::S235.fy(), 235.0);
//! assert_eq!(BoltGrade::G8_8.fub(), 800.0);
//! assert_eq!(BoltSize::M20.tensile_area(), 245.0);
//! ```

pub mod bolts;
pub mod steel;

pub use bolts::{bolt_tension_table, BoltGrade, BoltSize, BoltSpec, BoltTensionEntry};
pub use steel::{builtin_sections, SectionDb, SectionProperties, SectionSeries};

use serde::{Deserialize, Serialize};

/// Structural steel grade (EN 10025-2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SteelGrade {
    #[default]
    S235,
    S275,
    S355,
    S460,
}

impl SteelGrade {
    /// All grades for iteration
    pub const ALL: [SteelGrade; 4] = [SteelGrade::S235, SteelGrade::S275, SteelGrade::S355, SteelGrade::S460];

    /// Yield strength f_y (MPa)
    pub fn fy(&self) -> f64 {
        match self {
            SteelGrade::S235 => 235.0,
            SteelGrade::S275 => 275.0,
            SteelGrade::S355 => 355.0,
            SteelGrade::S460 => 460.0,
        }
    }

    /// Ultimate tensile strength f_u (MPa)
    pub fn fu(&self) -> f64 {
        match self {
            SteelGrade::S235 => 360.0,
            SteelGrade::S275 => 430.0,
            SteelGrade::S355 => 490.0,
            SteelGrade::S460 => 540.0,
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            SteelGrade::S235 => "S235",
            SteelGrade::S275 => "S275",
            SteelGrade::S355 => "S355",
            SteelGrade::S460 => "S460",
        }
    }
}

impl std::fmt::Display for SteelGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Elastic modulus of structural steel (MPa)
pub const STEEL_ELASTIC_MODULUS: f64 = 210_000.0;
