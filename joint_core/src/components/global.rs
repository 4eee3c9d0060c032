//! Components evaluated once per joint: column web panel shear (1), column
//! web in compression (2) and beam flange/web in compression (7).
//!
//! Their minimum is the global ceiling on the sum of bolt-row forces.

use serde::{Deserialize, Serialize};

use crate::components::{ComponentKind, ComponentResistance};
use crate::errors::{require_positive, CalcResult};
use crate::geometry::{JointGeometry, Profile};
use crate::settings::DesignSettings;

/// Column web panel in shear
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WebPanelShear {
    /// Shear area A_vc (mm²)
    pub shear_area: f64,
    /// F = 0.9·A_vc·f_ywc / (√3·γM0) (N)
    pub resistance: f64,
}

/// `V_wp,Rd = 0.9·A_vc·f_ywc / (√3·γM0)`
pub fn web_panel_shear(profile: &Profile, settings: &DesignSettings) -> CalcResult<WebPanelShear> {
    let gamma_m0 = require_positive("gamma_m0", settings.gamma_m0)?;
    let shear_area = require_positive("column.shear_area", profile.column.shear_area())?;
    let resistance = 0.9 * shear_area * profile.fy_column() / (3f64.sqrt() * gamma_m0);

    tracing::debug!(a_vc = shear_area, f_rd = resistance, "column web panel shear");
    Ok(WebPanelShear {
        shear_area,
        resistance,
    })
}

/// Column web in transverse compression
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WebCompression {
    /// Effective width b_eff,c,wc (mm)
    pub effective_width: f64,
    /// Plate slenderness λ̄_p
    pub slenderness: f64,
    /// Plate buckling reduction ρ
    pub rho: f64,
    /// Interaction factor ω
    pub omega: f64,
    /// F (N)
    pub resistance: f64,
}

/// Column web in compression opposite the beam compression flange.
///
/// `b_eff = t_fb + 2√2·a_f + 5(t_fc + r_c) + s_p`,
/// `λ̄ = 0.932·√(b_eff·d_wc·f_ywc / (E·t_fc²))`,
/// `ρ = 1` for `λ̄ ≤ 0.72`, else `(λ̄ − 0.2)/λ̄`,
/// `ω = 1/√(1 + 1.3(b_eff/d_wc)²)`,
/// `F = ω·b_eff·t_fc·f_ywc·ρ / γM0`.
pub fn web_compression(
    profile: &Profile,
    geometry: &JointGeometry,
    flange_weld: f64,
    settings: &DesignSettings,
) -> CalcResult<WebCompression> {
    let gamma_m0 = require_positive("gamma_m0", settings.gamma_m0)?;
    let e = require_positive("elastic_modulus", profile.elastic_modulus)?;
    let t_fc = require_positive("column.t_f", profile.column.t_f)?;
    let d_wc = require_positive("column.web_depth", geometry.d_wc)?;
    let f_ywc = profile.fy_column();

    let effective_width = profile.beam.t_f
        + 2.0 * std::f64::consts::SQRT_2 * flange_weld
        + 5.0 * (t_fc + profile.column.r)
        + geometry.s_p;

    let slenderness = 0.932 * (effective_width * d_wc * f_ywc / (e * t_fc * t_fc)).sqrt();
    let rho = if slenderness <= 0.72 {
        1.0
    } else {
        (slenderness - 0.2) / slenderness
    };
    let omega = 1.0 / (1.0 + 1.3 * (effective_width / d_wc).powi(2)).sqrt();
    let resistance = omega * effective_width * t_fc * f_ywc * rho / gamma_m0;

    tracing::debug!(
        b_eff = effective_width,
        lambda = slenderness,
        rho,
        omega,
        f_rd = resistance,
        "column web compression"
    );
    Ok(WebCompression {
        effective_width,
        slenderness,
        rho,
        omega,
        resistance,
    })
}

/// Beam flange and web in compression
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeamCompression {
    /// Beam plastic moment M_c,Rd = W_pl,y·f_yb / γM0 (N·mm)
    pub plastic_moment: f64,
    /// Distance between flange centroids h_b − t_fb (mm)
    pub flange_lever_arm: f64,
    /// F = M_c,Rd / (h_b − t_fb) (N)
    pub resistance: f64,
}

/// `F = (W_pl,y·f_yb/γM0) / (h_b − t_fb)`
pub fn beam_compression(profile: &Profile, settings: &DesignSettings) -> CalcResult<BeamCompression> {
    let gamma_m0 = require_positive("gamma_m0", settings.gamma_m0)?;
    let plastic_moment = profile.beam.w_pl_y * profile.fy_beam() / gamma_m0;
    let flange_lever_arm = require_positive("beam.h - beam.t_f", profile.beam.h - profile.beam.t_f)?;
    let resistance = plastic_moment / flange_lever_arm;

    tracing::debug!(m_pl = plastic_moment, f_rd = resistance, "beam flange compression");
    Ok(BeamCompression {
        plastic_moment,
        flange_lever_arm,
        resistance,
    })
}

/// The three global components and their minimum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalComponents {
    pub shear: WebPanelShear,
    pub web_compression: WebCompression,
    pub beam_compression: BeamCompression,
}

impl GlobalComponents {
    pub fn calculate(
        profile: &Profile,
        geometry: &JointGeometry,
        flange_weld: f64,
        settings: &DesignSettings,
    ) -> CalcResult<Self> {
        Ok(GlobalComponents {
            shear: web_panel_shear(profile, settings)?,
            web_compression: web_compression(profile, geometry, flange_weld, settings)?,
            beam_compression: beam_compression(profile, settings)?,
        })
    }

    pub fn as_components(&self) -> [ComponentResistance; 3] {
        [
            ComponentResistance::scalar(ComponentKind::ColumnWebPanelShear, self.shear.resistance),
            ComponentResistance::scalar(ComponentKind::ColumnWebCompression, self.web_compression.resistance),
            ComponentResistance::scalar(ComponentKind::BeamFlangeCompression, self.beam_compression.resistance),
        ]
    }

    /// F_glob = min(F_1, F_2, F_7) and the component that sets it
    pub fn ceiling(&self) -> (f64, ComponentKind) {
        let mut best = (self.shear.resistance, ComponentKind::ColumnWebPanelShear);
        for c in self.as_components() {
            if c.resistance < best.0 {
                best = (c.resistance, c.kind);
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{BoltLayout, EndPlate, MemberInput, PlateExtension, SectionSource, WeldThroats};
    use crate::materials::{builtin_sections, BoltGrade, BoltSize, BoltSpec, SteelGrade};
    use approx::assert_relative_eq;

    fn setup() -> (Profile, JointGeometry) {
        let profile = Profile::resolve(
            &MemberInput {
                section: SectionSource::Designation("HEA200".into()),
                grade: SteelGrade::S235,
            },
            &MemberInput {
                section: SectionSource::Designation("HEA140".into()),
                grade: SteelGrade::S235,
            },
            210_000.0,
            5000.0,
            builtin_sections(),
        )
        .unwrap();
        let plate = EndPlate {
            thickness: 15.0,
            width: 140.0,
            grade: SteelGrade::S235,
            extension: Some(PlateExtension {
                bolt_to_flange: 40.0,
                bolt_to_edge: 30.0,
            }),
        };
        let geometry = JointGeometry::derive(
            &profile,
            &plate,
            &BoltSpec::new(BoltSize::M20, BoltGrade::G8_8, 45.0),
            &BoltLayout {
                gauge: 90.0,
                lever_arms: vec![168.75, 75.25],
            },
            &WeldThroats { flange: 6.0, web: 4.0 },
        )
        .unwrap();
        (profile, geometry)
    }

    #[test]
    fn test_web_panel_shear_hea200() {
        let (profile, _) = setup();
        let shear = web_panel_shear(&profile, &DesignSettings::default()).unwrap();
        let expected = 0.9 * 1808.0 * 235.0 / 3f64.sqrt();
        assert_relative_eq!(shear.resistance, expected, max_relative = 1e-6);
        assert_relative_eq!(shear.shear_area, 1808.0, max_relative = 1e-12);
    }

    #[test]
    fn test_web_compression() {
        let (profile, geometry) = setup();
        let wc = web_compression(&profile, &geometry, 6.0, &DesignSettings::default()).unwrap();

        let b_eff = 8.5 + 12.0 * 2f64.sqrt() + 5.0 * 28.0 + 30.0;
        assert_relative_eq!(wc.effective_width, b_eff, max_relative = 1e-12);

        let lambda = 0.932 * (b_eff * 134.0 * 235.0 / (210_000.0 * 100.0)).sqrt();
        assert_relative_eq!(wc.slenderness, lambda, max_relative = 1e-12);
        let rho = if lambda <= 0.72 { 1.0 } else { (lambda - 0.2) / lambda };
        assert_relative_eq!(wc.rho, rho, max_relative = 1e-12);
        let omega = 1.0 / (1.0 + 1.3 * (b_eff / 134.0f64).powi(2)).sqrt();
        assert_relative_eq!(wc.resistance, omega * b_eff * 10.0 * 235.0 * rho, max_relative = 1e-12);
    }

    #[test]
    fn test_beam_compression() {
        let (profile, _) = setup();
        let bc = beam_compression(&profile, &DesignSettings::default()).unwrap();
        assert_relative_eq!(bc.plastic_moment, 173.5e3 * 235.0, max_relative = 1e-12);
        assert_relative_eq!(bc.resistance, 173.5e3 * 235.0 / 124.5, max_relative = 1e-12);
    }

    #[test]
    fn test_zero_gamma_m0() {
        let (profile, geometry) = setup();
        let settings = DesignSettings {
            gamma_m0: 0.0,
            ..Default::default()
        };
        assert!(web_panel_shear(&profile, &settings).is_err());
        assert!(web_compression(&profile, &geometry, 6.0, &settings).is_err());
        assert!(beam_compression(&profile, &settings).is_err());
    }

    #[test]
    fn test_ceiling_is_minimum() {
        let (profile, geometry) = setup();
        let g = GlobalComponents::calculate(&profile, &geometry, 6.0, &DesignSettings::default()).unwrap();
        let (f_glob, kind) = g.ceiling();
        let min = g
            .shear
            .resistance
            .min(g.web_compression.resistance)
            .min(g.beam_compression.resistance);
        assert_eq!(f_glob, min);
        assert!(g.as_components().iter().any(|c| c.kind == kind && c.resistance == min));
    }
}
