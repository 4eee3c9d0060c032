//! # Design Settings
//!
//! Partial safety factors and the code coefficients the component method
//! depends on. Published sources disagree on several of these (the end-plate
//! `α` factor, the countersunk bolt factor, the classification boundaries), so
//! they are carried as data with EN 1993-1-8 defaults instead of being
//! hard-coded in the formulas.
//!
//! ## Example
//!
//! ```rust
//! use joint_core::settings::DesignSettings;
//!
//! let mut settings = DesignSettings::default();
//! assert_eq!(settings.gamma_m2, 1.25);
//!
//! settings.coefficients.alpha = 5.5;
//! assert!(settings.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{require_positive, CalcError, CalcResult};

/// Partial safety factors plus code coefficients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignSettings {
    /// Partial factor for resistance of cross-sections (γM0)
    pub gamma_m0: f64,

    /// Partial factor for resistance of bolts (γM2)
    pub gamma_m2: f64,

    /// Code coefficients used by the component formulas
    pub coefficients: CodeCoefficients,
}

impl Default for DesignSettings {
    fn default() -> Self {
        DesignSettings {
            gamma_m0: 1.0,
            gamma_m2: 1.25,
            coefficients: CodeCoefficients::default(),
        }
    }
}

impl DesignSettings {
    /// Check every factor that ends up in a denominator or a comparison.
    pub fn validate(&self) -> CalcResult<()> {
        require_positive("gamma_m0", self.gamma_m0)?;
        require_positive("gamma_m2", self.gamma_m2)?;
        self.coefficients.validate()
    }

    /// Parse settings from a JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> CalcResult<Self> {
        let settings: DesignSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }
}

/// Coefficients from EN 1993-1-8 tables 3.4, 6.6, 6.11 and clause 5.2.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeCoefficients {
    /// Bolt tension factor k2 for standard bolts
    pub bolt_k2: f64,
    /// Bolt tension factor k2 for countersunk bolts
    pub bolt_k2_countersunk: f64,
    /// End-plate α factor for the first row below the tension flange
    pub alpha: f64,
    /// Stiffness factor for column web in tension/compression (k3, k2)
    pub web_stiffness_factor: f64,
    /// Stiffness factor for plates in bending (k4, k5)
    pub plate_stiffness_factor: f64,
    /// Stiffness factor for bolts in tension (k10)
    pub bolt_stiffness_factor: f64,
    /// Stiffness factor for the column web panel in shear (k1)
    pub shear_stiffness_factor: f64,
    /// Stiffness modification coefficient η (S_j = S_j,ini / η)
    pub stiffness_modification: f64,
    /// Elastic moment resistance as a fraction of M_j,Rd
    pub elastic_moment_ratio: f64,
    /// Pinned boundary, multiple of EI/L
    pub pinned_stiffness_ratio: f64,
    /// Rigid boundary for unbraced frames, multiple of EI/L
    pub rigid_stiffness_ratio_unbraced: f64,
    /// Rigid boundary for braced frames, multiple of EI/L
    pub rigid_stiffness_ratio_braced: f64,
    /// Pinned boundary, fraction of M_b,pl,Rd
    pub pinned_strength_ratio: f64,
}

impl Default for CodeCoefficients {
    fn default() -> Self {
        CodeCoefficients {
            bolt_k2: 0.9,
            bolt_k2_countersunk: 0.63,
            alpha: 4.45,
            web_stiffness_factor: 0.7,
            plate_stiffness_factor: 0.9,
            bolt_stiffness_factor: 1.6,
            shear_stiffness_factor: 0.38,
            stiffness_modification: 2.0,
            elastic_moment_ratio: 2.0 / 3.0,
            pinned_stiffness_ratio: 0.5,
            rigid_stiffness_ratio_unbraced: 8.0,
            rigid_stiffness_ratio_braced: 25.0,
            pinned_strength_ratio: 0.25,
        }
    }
}

impl CodeCoefficients {
    /// All coefficients must be positive; boundaries must be ordered.
    pub fn validate(&self) -> CalcResult<()> {
        let fields = [
            ("coefficients.bolt_k2", self.bolt_k2),
            ("coefficients.bolt_k2_countersunk", self.bolt_k2_countersunk),
            ("coefficients.alpha", self.alpha),
            ("coefficients.web_stiffness_factor", self.web_stiffness_factor),
            ("coefficients.plate_stiffness_factor", self.plate_stiffness_factor),
            ("coefficients.bolt_stiffness_factor", self.bolt_stiffness_factor),
            ("coefficients.shear_stiffness_factor", self.shear_stiffness_factor),
            ("coefficients.stiffness_modification", self.stiffness_modification),
            ("coefficients.elastic_moment_ratio", self.elastic_moment_ratio),
            ("coefficients.pinned_stiffness_ratio", self.pinned_stiffness_ratio),
            ("coefficients.rigid_stiffness_ratio_unbraced", self.rigid_stiffness_ratio_unbraced),
            ("coefficients.rigid_stiffness_ratio_braced", self.rigid_stiffness_ratio_braced),
            ("coefficients.pinned_strength_ratio", self.pinned_strength_ratio),
        ];
        for (field, value) in fields {
            require_positive(field, value)?;
        }

        for rigid in [self.rigid_stiffness_ratio_unbraced, self.rigid_stiffness_ratio_braced] {
            if rigid <= self.pinned_stiffness_ratio {
                return Err(CalcError::invalid_input(
                    "coefficients.rigid_stiffness_ratio",
                    rigid.to_string(),
                    "Rigid boundary must exceed the pinned boundary",
                ));
            }
        }
        if self.pinned_strength_ratio >= 1.0 {
            return Err(CalcError::invalid_input(
                "coefficients.pinned_strength_ratio",
                self.pinned_strength_ratio.to_string(),
                "Pinned strength boundary must be below full strength",
            ));
        }
        Ok(())
    }

    /// Bolt tension factor for the given head type
    pub fn k2(&self, countersunk: bool) -> f64 {
        if countersunk {
            self.bolt_k2_countersunk
        } else {
            self.bolt_k2
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = DesignSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.gamma_m0, 1.0);
        assert_eq!(settings.coefficients.rigid_stiffness_ratio_braced, 25.0);
    }

    #[test]
    fn test_zero_gamma_rejected() {
        let settings = DesignSettings {
            gamma_m0: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(CalcError::InvalidInput { ref field, .. }) if field == "gamma_m0"
        ));

        let settings = DesignSettings {
            gamma_m2: 0.0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_boundary_ordering() {
        let mut settings = DesignSettings::default();
        settings.coefficients.rigid_stiffness_ratio_unbraced = 0.4;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = DesignSettings::from_json(r#"{"gamma_m2": 1.3, "coefficients": {"alpha": 6.0}}"#).unwrap();
        assert_eq!(settings.gamma_m2, 1.3);
        assert_eq!(settings.gamma_m0, 1.0);
        assert_eq!(settings.coefficients.alpha, 6.0);
        assert_eq!(settings.coefficients.bolt_k2, 0.9);
    }

    #[test]
    fn test_k2_selection() {
        let c = CodeCoefficients::default();
        assert_eq!(c.k2(false), 0.9);
        assert_eq!(c.k2(true), 0.63);
    }
}
