//! Bolts (EN ISO 4014 / EN 1993-1-8 Table 3.1)
//!
//! Diameter and tensile stress area are keyed by size; yield and ultimate
//! strengths are keyed by property class. Neither is ever derived from the
//! other.
//!
//! ## Example
//!
//! ```rust
//! use joint_core::materials::{BoltGrade, BoltSize, BoltSpec};
//! use joint_core::settings::DesignSettings;
//!
//! let bolt = BoltSpec::new(BoltSize::M20, BoltGrade::G8_8, 45.0);
//! let f_t = bolt.tension_resistance(&DesignSettings::default()).unwrap();
//!
//! // 0.9 × 245 × 800 / 1.25
//! assert!((f_t - 141_120.0).abs() < 1e-6);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{require_positive, CalcError, CalcResult};
use crate::settings::DesignSettings;
use crate::units::kn;

/// Metric bolt size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoltSize {
    M12,
    M16,
    M20,
    M24,
    M27,
    M30,
    M36,
}

impl BoltSize {
    /// All sizes for iteration
    pub const ALL: [BoltSize; 7] = [
        BoltSize::M12,
        BoltSize::M16,
        BoltSize::M20,
        BoltSize::M24,
        BoltSize::M27,
        BoltSize::M30,
        BoltSize::M36,
    ];

    /// Nominal shank diameter d (mm)
    pub fn diameter(&self) -> f64 {
        match self {
            BoltSize::M12 => 12.0,
            BoltSize::M16 => 16.0,
            BoltSize::M20 => 20.0,
            BoltSize::M24 => 24.0,
            BoltSize::M27 => 27.0,
            BoltSize::M30 => 30.0,
            BoltSize::M36 => 36.0,
        }
    }

    /// Tensile stress area A_s (mm²)
    pub fn tensile_area(&self) -> f64 {
        match self {
            BoltSize::M12 => 84.3,
            BoltSize::M16 => 157.0,
            BoltSize::M20 => 245.0,
            BoltSize::M24 => 353.0,
            BoltSize::M27 => 459.0,
            BoltSize::M30 => 561.0,
            BoltSize::M36 => 817.0,
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            BoltSize::M12 => "M12",
            BoltSize::M16 => "M16",
            BoltSize::M20 => "M20",
            BoltSize::M24 => "M24",
            BoltSize::M27 => "M27",
            BoltSize::M30 => "M30",
            BoltSize::M36 => "M36",
        }
    }
}

impl std::fmt::Display for BoltSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Bolt property class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoltGrade {
    #[serde(rename = "4.6")]
    G4_6,
    #[serde(rename = "5.6")]
    G5_6,
    #[serde(rename = "6.8")]
    G6_8,
    #[serde(rename = "8.8")]
    G8_8,
    #[serde(rename = "10.9")]
    G10_9,
}

impl BoltGrade {
    /// All grades for iteration
    pub const ALL: [BoltGrade; 5] = [
        BoltGrade::G4_6,
        BoltGrade::G5_6,
        BoltGrade::G6_8,
        BoltGrade::G8_8,
        BoltGrade::G10_9,
    ];

    /// Yield strength f_yb (MPa)
    pub fn fyb(&self) -> f64 {
        match self {
            BoltGrade::G4_6 => 240.0,
            BoltGrade::G5_6 => 300.0,
            BoltGrade::G6_8 => 480.0,
            BoltGrade::G8_8 => 640.0,
            BoltGrade::G10_9 => 900.0,
        }
    }

    /// Ultimate tensile strength f_ub (MPa)
    pub fn fub(&self) -> f64 {
        match self {
            BoltGrade::G4_6 => 400.0,
            BoltGrade::G5_6 => 500.0,
            BoltGrade::G6_8 => 600.0,
            BoltGrade::G8_8 => 800.0,
            BoltGrade::G10_9 => 1000.0,
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            BoltGrade::G4_6 => "4.6",
            BoltGrade::G5_6 => "5.6",
            BoltGrade::G6_8 => "6.8",
            BoltGrade::G8_8 => "8.8",
            BoltGrade::G10_9 => "10.9",
        }
    }
}

impl std::fmt::Display for BoltGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

fn default_bolts_per_row() -> u32 {
    2
}

/// Bolt specification shared by every row of the joint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoltSpec {
    /// Size class
    pub size: BoltSize,

    /// Property class
    pub grade: BoltGrade,

    /// Countersunk head (reduces k2)
    #[serde(default)]
    pub countersunk: bool,

    /// Bolt elongation length L_b (mm): grip plus half the head and nut heights
    pub elongation_length: f64,

    /// Bolts per row
    #[serde(default = "default_bolts_per_row")]
    pub bolts_per_row: u32,
}

impl BoltSpec {
    /// Standard (non-countersunk) bolts, two per row
    pub fn new(size: BoltSize, grade: BoltGrade, elongation_length: f64) -> Self {
        BoltSpec {
            size,
            grade,
            countersunk: false,
            elongation_length,
            bolts_per_row: default_bolts_per_row(),
        }
    }

    /// Check bolt count and elongation length
    pub fn validate(&self) -> CalcResult<()> {
        if self.bolts_per_row == 0 {
            return Err(CalcError::invalid_input(
                "bolts.bolts_per_row",
                "0",
                "At least one bolt per row is required",
            ));
        }
        require_positive("bolts.elongation_length", self.elongation_length)?;
        Ok(())
    }

    /// Tension resistance of a single bolt: `F_t,Rd = k2·A_s·f_ub / γM2` (N)
    pub fn tension_resistance(&self, settings: &DesignSettings) -> CalcResult<f64> {
        let gamma_m2 = require_positive("gamma_m2", settings.gamma_m2)?;
        let k2 = settings.coefficients.k2(self.countersunk);
        Ok(k2 * self.size.tensile_area() * self.grade.fub() / gamma_m2)
    }

    /// Tension resistance of one row: `n_bolts·F_t,Rd` (N)
    pub fn row_tension_resistance(&self, settings: &DesignSettings) -> CalcResult<f64> {
        self.validate()?;
        Ok(self.bolts_per_row as f64 * self.tension_resistance(settings)?)
    }

    /// Short label, e.g. "2 × M20 8.8"
    pub fn label(&self) -> String {
        let head = if self.countersunk { " countersunk" } else { "" };
        format!("{} × {} {}{}", self.bolts_per_row, self.size, self.grade, head)
    }
}

/// One entry of the bolt tension resistance table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoltTensionEntry {
    pub grade: BoltGrade,
    pub size: BoltSize,
    /// F_t,Rd for a standard head (kN)
    pub ft_rd_kn: f64,
    /// F_t,Rd for a countersunk head (kN)
    pub ft_rd_countersunk_kn: f64,
}

/// Tension resistance per bolt for every grade/size combination.
pub fn bolt_tension_table(settings: &DesignSettings) -> CalcResult<Vec<BoltTensionEntry>> {
    let mut table = Vec::with_capacity(BoltGrade::ALL.len() * BoltSize::ALL.len());
    for grade in BoltGrade::ALL {
        for size in BoltSize::ALL {
            let mut bolt = BoltSpec::new(size, grade, 1.0);
            let standard = bolt.tension_resistance(settings)?;
            bolt.countersunk = true;
            let countersunk = bolt.tension_resistance(settings)?;
            table.push(BoltTensionEntry {
                grade,
                size,
                ft_rd_kn: kn(standard),
                ft_rd_countersunk_kn: kn(countersunk),
            });
        }
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_tension_resistance_m20_88() {
        let bolt = BoltSpec::new(BoltSize::M20, BoltGrade::G8_8, 45.0);
        let settings = DesignSettings::default();
        assert_relative_eq!(bolt.tension_resistance(&settings).unwrap(), 141_120.0, max_relative = 1e-12);
        assert_relative_eq!(bolt.row_tension_resistance(&settings).unwrap(), 282_240.0, max_relative = 1e-12);
    }

    #[test]
    fn test_countersunk_factor() {
        let mut bolt = BoltSpec::new(BoltSize::M24, BoltGrade::G10_9, 50.0);
        let settings = DesignSettings::default();
        let standard = bolt.tension_resistance(&settings).unwrap();
        bolt.countersunk = true;
        let countersunk = bolt.tension_resistance(&settings).unwrap();
        assert_relative_eq!(countersunk / standard, 0.7, max_relative = 1e-12);
    }

    #[test]
    fn test_zero_bolts_rejected() {
        let mut bolt = BoltSpec::new(BoltSize::M20, BoltGrade::G8_8, 45.0);
        bolt.bolts_per_row = 0;
        let err = bolt.row_tension_resistance(&DesignSettings::default()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_zero_gamma_m2_rejected() {
        let bolt = BoltSpec::new(BoltSize::M20, BoltGrade::G8_8, 45.0);
        let settings = DesignSettings {
            gamma_m2: 0.0,
            ..Default::default()
        };
        assert!(bolt.tension_resistance(&settings).is_err());
    }

    #[test]
    fn test_grade_serde_names() {
        let json = serde_json::to_string(&BoltGrade::G10_9).unwrap();
        assert_eq!(json, "\"10.9\"");
        let bolt: BoltSpec =
            serde_json::from_str(r#"{"size": "M16", "grade": "8.8", "elongation_length": 40}"#).unwrap();
        assert_eq!(bolt.bolts_per_row, 2);
        assert!(!bolt.countersunk);
        assert_eq!(bolt.grade, BoltGrade::G8_8);
    }

    #[test]
    fn test_tension_table() {
        let table = bolt_tension_table(&DesignSettings::default()).unwrap();
        assert_eq!(table.len(), 35);
        let m20 = table
            .iter()
            .find(|e| e.grade == BoltGrade::G8_8 && e.size == BoltSize::M20)
            .unwrap();
        assert_relative_eq!(m20.ft_rd_kn, 141.12, max_relative = 1e-12);
        assert_relative_eq!(m20.ft_rd_countersunk_kn, 98.784, max_relative = 1e-12);
    }

    #[test]
    fn test_grade_and_size_properties() {
        assert_eq!(BoltGrade::G8_8.fyb(), 640.0);
        assert_eq!(BoltGrade::G8_8.fub(), 800.0);
        for grade in BoltGrade::ALL {
            assert!(grade.fyb() < grade.fub());
        }
        assert_eq!(BoltSize::M24.diameter(), 24.0);
        assert!(BoltSize::ALL.windows(2).all(|w| w[0].diameter() < w[1].diameter()));
    }

    #[test]
    fn test_label() {
        let bolt = BoltSpec::new(BoltSize::M20, BoltGrade::G8_8, 45.0);
        assert_eq!(bolt.label(), "2 × M20 8.8");
    }
}
