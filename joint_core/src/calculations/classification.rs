//! # Joint Classification (EN 1993-1-8 5.2)
//!
//! Stiffness: compares `S_j,ini` with `E·I_b/L_b`.
//!
//! | Class | Condition |
//! |---|---|
//! | Pinned | `S ≤ 0.5·EI/L` |
//! | Rigid | `S ≥ 8·EI/L` (unbraced) or `S ≥ 25·EI/L` (braced) |
//! | Semi-rigid | otherwise |
//!
//! Strength: compares `M_j,Rd` with the beam plastic moment `M_b,pl,Rd`.
//!
//! | Class | Condition |
//! |---|---|
//! | Full strength | `M ≥ M_b,pl,Rd` |
//! | Pinned | `M ≤ 0.25·M_b,pl,Rd` |
//! | Partial strength | otherwise |
//!
//! All boundaries are inclusive and come from [`CodeCoefficients`].

use serde::{Deserialize, Serialize};

use crate::errors::{require_non_negative, require_positive, CalcResult};
use crate::settings::CodeCoefficients;

/// Classification by rotational stiffness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StiffnessClass {
    Pinned,
    SemiRigid,
    Rigid,
}

impl StiffnessClass {
    pub fn display_name(&self) -> &'static str {
        match self {
            StiffnessClass::Pinned => "Nominally pinned",
            StiffnessClass::SemiRigid => "Semi-rigid",
            StiffnessClass::Rigid => "Rigid",
        }
    }
}

impl std::fmt::Display for StiffnessClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Classification by moment resistance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrengthClass {
    Pinned,
    PartialStrength,
    FullStrength,
}

impl StrengthClass {
    pub fn display_name(&self) -> &'static str {
        match self {
            StrengthClass::Pinned => "Nominally pinned",
            StrengthClass::PartialStrength => "Partial-strength",
            StrengthClass::FullStrength => "Full-strength",
        }
    }
}

impl std::fmt::Display for StrengthClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Values the classification compares
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationInput {
    /// S_j,ini (N·mm/rad)
    pub initial_stiffness: f64,
    /// M_j,Rd (N·mm)
    pub moment_resistance: f64,
    /// E·I_b / L_b (N·mm)
    pub beam_stiffness_ratio: f64,
    /// M_b,pl,Rd (N·mm)
    pub beam_plastic_moment: f64,
    /// Frame braced against sway
    pub braced: bool,
}

/// Classes plus the boundaries they were judged against
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub stiffness: StiffnessClass,
    pub strength: StrengthClass,
    /// Upper bound of the pinned stiffness zone (N·mm/rad)
    pub pinned_stiffness_limit: f64,
    /// Lower bound of the rigid stiffness zone (N·mm/rad)
    pub rigid_stiffness_limit: f64,
    /// Upper bound of the pinned strength zone (N·mm)
    pub pinned_strength_limit: f64,
    /// Lower bound of the full-strength zone (N·mm)
    pub full_strength_limit: f64,
}

/// Classify a joint by stiffness and strength.
pub fn classify(input: &ClassificationInput, coefficients: &CodeCoefficients) -> CalcResult<Classification> {
    let s = require_non_negative("initial_stiffness", input.initial_stiffness)?;
    let m = require_non_negative("moment_resistance", input.moment_resistance)?;
    let ei_l = require_positive("beam_stiffness_ratio", input.beam_stiffness_ratio)?;
    let m_pl = require_positive("beam_plastic_moment", input.beam_plastic_moment)?;

    let pinned_stiffness_limit = coefficients.pinned_stiffness_ratio * ei_l;
    let rigid_stiffness_limit = if input.braced {
        coefficients.rigid_stiffness_ratio_braced * ei_l
    } else {
        coefficients.rigid_stiffness_ratio_unbraced * ei_l
    };
    let stiffness = if s <= pinned_stiffness_limit {
        StiffnessClass::Pinned
    } else if s >= rigid_stiffness_limit {
        StiffnessClass::Rigid
    } else {
        StiffnessClass::SemiRigid
    };

    let pinned_strength_limit = coefficients.pinned_strength_ratio * m_pl;
    let strength = if m >= m_pl {
        StrengthClass::FullStrength
    } else if m <= pinned_strength_limit {
        StrengthClass::Pinned
    } else {
        StrengthClass::PartialStrength
    };

    tracing::debug!(?stiffness, ?strength, "classification");
    Ok(Classification {
        stiffness,
        strength,
        pinned_stiffness_limit,
        rigid_stiffness_limit,
        pinned_strength_limit,
        full_strength_limit: m_pl,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(s: f64, m: f64, braced: bool) -> ClassificationInput {
        ClassificationInput {
            initial_stiffness: s,
            moment_resistance: m,
            beam_stiffness_ratio: 1000.0,
            beam_plastic_moment: 100.0,
            braced,
        }
    }

    fn stiffness_of(s: f64, braced: bool) -> StiffnessClass {
        classify(&input(s, 50.0, braced), &CodeCoefficients::default())
            .unwrap()
            .stiffness
    }

    fn strength_of(m: f64) -> StrengthClass {
        classify(&input(5000.0, m, false), &CodeCoefficients::default())
            .unwrap()
            .strength
    }

    #[test]
    fn test_stiffness_boundaries_inclusive() {
        assert_eq!(stiffness_of(500.0, false), StiffnessClass::Pinned);
        assert_eq!(stiffness_of(500.1, false), StiffnessClass::SemiRigid);
        assert_eq!(stiffness_of(8000.0, false), StiffnessClass::Rigid);
        assert_eq!(stiffness_of(7999.9, false), StiffnessClass::SemiRigid);
    }

    #[test]
    fn test_braced_rigid_boundary() {
        assert_eq!(stiffness_of(8000.0, true), StiffnessClass::SemiRigid);
        assert_eq!(stiffness_of(25_000.0, true), StiffnessClass::Rigid);
    }

    #[test]
    fn test_strength_boundaries_inclusive() {
        assert_eq!(strength_of(100.0), StrengthClass::FullStrength);
        assert_eq!(strength_of(99.9), StrengthClass::PartialStrength);
        assert_eq!(strength_of(25.0), StrengthClass::Pinned);
        assert_eq!(strength_of(25.1), StrengthClass::PartialStrength);
        assert_eq!(strength_of(0.0), StrengthClass::Pinned);
    }

    #[test]
    fn test_configurable_boundaries() {
        let coefficients = CodeCoefficients {
            rigid_stiffness_ratio_unbraced: 4.0,
            ..Default::default()
        };
        let c = classify(&input(4000.0, 50.0, false), &coefficients).unwrap();
        assert_eq!(c.stiffness, StiffnessClass::Rigid);
        assert_eq!(c.rigid_stiffness_limit, 4000.0);
    }

    #[test]
    fn test_invalid_inputs() {
        let c = CodeCoefficients::default();
        assert!(classify(&input(-1.0, 50.0, false), &c).is_err());
        assert!(classify(&input(1.0, -50.0, false), &c).is_err());
        let mut bad = input(1.0, 1.0, false);
        bad.beam_stiffness_ratio = 0.0;
        assert!(classify(&bad, &c).is_err());
        let mut bad = input(1.0, 1.0, false);
        bad.beam_plastic_moment = 0.0;
        assert!(classify(&bad, &c).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", StiffnessClass::SemiRigid), "Semi-rigid");
        assert_eq!(format!("{}", StrengthClass::FullStrength), "Full-strength");
    }
}
