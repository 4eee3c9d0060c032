//! # Joint Components
//!
//! The component method breaks the joint into independent resistance and
//! spring elements. Each one has a single parameterised formula:
//!
//! | No. | Component | Scope | Module |
//! |---|---|---|---|
//! | 1 | Column web panel in shear | global | [`global`] |
//! | 2 | Column web in transverse compression | global | [`global`] |
//! | 3 | Column web in transverse tension | per row / group | [`tstub`] |
//! | 4 | Column flange in bending | per row / group | [`tstub`] |
//! | 5 | End plate in bending | per row / group | [`tstub`] |
//! | 7 | Beam flange and web in compression | global | [`global`] |
//! | 8 | Beam web in tension | per row / group | [`tstub`] |
//! | 10 | Bolts in tension | per row / group | [`tstub`] |
//!
//! Per-row T-stub components report all three failure modes; the governing
//! resistance is the smallest, whichever mode that is.

pub mod effective_length;
pub mod global;
pub mod tstub;

pub use effective_length::{effective_length, CaseType, EffectiveLength, RowPosition};

use serde::{Deserialize, Serialize};

/// Basic joint component (numbering of EN 1993-1-8 Table 6.1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComponentKind {
    ColumnWebPanelShear,
    ColumnWebCompression,
    ColumnWebTension,
    ColumnFlangeBending,
    EndPlateBending,
    BeamFlangeCompression,
    BeamWebTension,
    BoltsTension,
}

impl ComponentKind {
    /// All components in table order
    pub const ALL: [ComponentKind; 8] = [
        ComponentKind::ColumnWebPanelShear,
        ComponentKind::ColumnWebCompression,
        ComponentKind::ColumnWebTension,
        ComponentKind::ColumnFlangeBending,
        ComponentKind::EndPlateBending,
        ComponentKind::BeamFlangeCompression,
        ComponentKind::BeamWebTension,
        ComponentKind::BoltsTension,
    ];

    /// Component number in EN 1993-1-8 Table 6.1
    pub fn number(&self) -> u8 {
        match self {
            ComponentKind::ColumnWebPanelShear => 1,
            ComponentKind::ColumnWebCompression => 2,
            ComponentKind::ColumnWebTension => 3,
            ComponentKind::ColumnFlangeBending => 4,
            ComponentKind::EndPlateBending => 5,
            ComponentKind::BeamFlangeCompression => 7,
            ComponentKind::BeamWebTension => 8,
            ComponentKind::BoltsTension => 10,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ComponentKind::ColumnWebPanelShear => "Column web panel in shear",
            ComponentKind::ColumnWebCompression => "Column web in compression",
            ComponentKind::ColumnWebTension => "Column web in tension",
            ComponentKind::ColumnFlangeBending => "Column flange in bending",
            ComponentKind::EndPlateBending => "End plate in bending",
            ComponentKind::BeamFlangeCompression => "Beam flange and web in compression",
            ComponentKind::BeamWebTension => "Beam web in tension",
            ComponentKind::BoltsTension => "Bolts in tension",
        }
    }

    /// EN 1993-1-8 clause giving the resistance
    pub fn clause(&self) -> &'static str {
        match self {
            ComponentKind::ColumnWebPanelShear => "6.2.6.1",
            ComponentKind::ColumnWebCompression => "6.2.6.2",
            ComponentKind::ColumnWebTension => "6.2.6.3",
            ComponentKind::ColumnFlangeBending => "6.2.6.4",
            ComponentKind::EndPlateBending => "6.2.6.5",
            ComponentKind::BeamFlangeCompression => "6.2.6.7",
            ComponentKind::BeamWebTension => "6.2.6.8",
            ComponentKind::BoltsTension => "3.6.1",
        }
    }

    /// Components modelled as an equivalent T-stub with a yield-line length
    pub fn is_tstub(&self) -> bool {
        matches!(
            self,
            ComponentKind::ColumnWebTension | ComponentKind::ColumnFlangeBending | ComponentKind::EndPlateBending
        )
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}) {}", self.number(), self.display_name())
    }
}

/// T-stub failure mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureMode {
    /// Complete yielding of the flange
    Mode1,
    /// Bolt failure with yielding of the flange
    Mode2,
    /// Bolt failure
    Mode3,
}

impl FailureMode {
    pub fn display_name(&self) -> &'static str {
        match self {
            FailureMode::Mode1 => "Mode 1 - flange yielding",
            FailureMode::Mode2 => "Mode 2 - bolt failure with flange yielding",
            FailureMode::Mode3 => "Mode 3 - bolt failure",
        }
    }
}

impl std::fmt::Display for FailureMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Resistances of the three T-stub failure modes (N)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeResistances {
    pub mode1: f64,
    pub mode2: f64,
    pub mode3: f64,
}

impl ModeResistances {
    /// Smallest of the three modes
    pub fn governing(&self) -> f64 {
        self.mode1.min(self.mode2).min(self.mode3)
    }

    /// Mode with the smallest resistance. Ties resolve to the lower mode number.
    pub fn governing_mode(&self) -> FailureMode {
        let g = self.governing();
        if self.mode1 == g {
            FailureMode::Mode1
        } else if self.mode2 == g {
            FailureMode::Mode2
        } else {
            FailureMode::Mode3
        }
    }
}

/// Resistance of one component for one row or group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentResistance {
    pub kind: ComponentKind,
    /// Design resistance (N)
    pub resistance: f64,
    /// Mode breakdown for T-stub components
    pub modes: Option<ModeResistances>,
    /// Yield-line length used (mm), for T-stub and beam web components
    pub effective_length: Option<f64>,
}

impl ComponentResistance {
    /// Scalar resistance without a mode breakdown
    pub fn scalar(kind: ComponentKind, resistance: f64) -> Self {
        ComponentResistance {
            kind,
            resistance,
            modes: None,
            effective_length: None,
        }
    }

    pub fn governing_mode(&self) -> Option<FailureMode> {
        self.modes.map(|m| m.governing_mode())
    }
}

/// The weakest of a set of component resistances
pub fn weakest(components: &[ComponentResistance]) -> Option<&ComponentResistance> {
    components
        .iter()
        .min_by(|a, b| a.resistance.total_cmp(&b.resistance))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_governing_mode_not_ordered() {
        let modes = ModeResistances {
            mode1: 300.0,
            mode2: 120.0,
            mode3: 200.0,
        };
        assert_eq!(modes.governing(), 120.0);
        assert_eq!(modes.governing_mode(), FailureMode::Mode2);

        let modes = ModeResistances {
            mode1: 90.0,
            mode2: 120.0,
            mode3: 80.0,
        };
        assert_eq!(modes.governing(), 80.0);
        assert_eq!(modes.governing_mode(), FailureMode::Mode3);
    }

    #[test]
    fn test_component_numbers() {
        let numbers: Vec<u8> = ComponentKind::ALL.iter().map(|c| c.number()).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 7, 8, 10]);
        assert_eq!(format!("{}", ComponentKind::BoltsTension), "(10) Bolts in tension");
        assert_eq!(ComponentKind::ColumnWebPanelShear.clause(), "6.2.6.1");
        assert_eq!(ComponentKind::BoltsTension.clause(), "3.6.1");
    }

    #[test]
    fn test_tstub_components() {
        assert!(ComponentKind::EndPlateBending.is_tstub());
        assert!(!ComponentKind::BeamWebTension.is_tstub());
    }

    #[test]
    fn test_weakest() {
        let list = vec![
            ComponentResistance::scalar(ComponentKind::BoltsTension, 282_240.0),
            ComponentResistance::scalar(ComponentKind::BeamWebTension, 150_000.0),
        ];
        assert_eq!(weakest(&list).unwrap().kind, ComponentKind::BeamWebTension);
        assert!(weakest(&[]).is_none());
    }
}
