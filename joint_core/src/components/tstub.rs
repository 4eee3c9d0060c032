//! Per-row components: equivalent T-stubs (3, 4, 5), beam web in tension (8)
//! and bolts in tension (10).
//!
//! Every per-row component can be evaluated for a single row or for a
//! contiguous group of rows `first..=last`; a group is simply a longer
//! T-stub with more bolts.
//!
//! ```text
//! Mode 1:  F = 4·m_pl / m
//! Mode 2:  F = (2·m_pl + n·ΣF_t,Rd) / (m + n)
//! Mode 3:  F = ΣF_t,Rd
//! m_pl  =  0.25·l_eff·t²·f_y / γM0
//! ```

use serde::{Deserialize, Serialize};

use crate::components::effective_length::PatternDims;
use crate::components::{
    effective_length, CaseType, ComponentKind, ComponentResistance, EffectiveLength, ModeResistances, RowPosition,
};
use crate::errors::{require_non_negative, require_positive, CalcError, CalcResult};
use crate::geometry::{EndPlate, JointGeometry, Profile};
use crate::materials::BoltSpec;
use crate::settings::DesignSettings;

/// Parameters of one equivalent T-stub
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TStubInput {
    /// Governing effective length l_eff (mm)
    pub effective_length: f64,
    /// Bolt axis to plastic hinge m (mm)
    pub m: f64,
    /// Prying lever n (mm)
    pub n: f64,
    /// Flange thickness t (mm)
    pub thickness: f64,
    /// Flange yield strength f_y (MPa)
    pub fy: f64,
    /// Total bolt tension resistance ΣF_t,Rd (N)
    pub bolt_tension: f64,
}

/// Resistance of an equivalent T-stub flange in all three modes
pub fn tstub_resistance(input: &TStubInput, gamma_m0: f64) -> CalcResult<ModeResistances> {
    let gamma_m0 = require_positive("gamma_m0", gamma_m0)?;
    let l_eff = require_positive("effective_length", input.effective_length)?;
    let m = require_positive("m", input.m)?;
    let n = require_non_negative("n", input.n)?;
    let t = require_positive("thickness", input.thickness)?;
    let fy = require_positive("fy", input.fy)?;
    let sum_ft = require_positive("bolt_tension", input.bolt_tension)?;

    let m_pl = 0.25 * l_eff * t * t * fy / gamma_m0;
    Ok(ModeResistances {
        mode1: 4.0 * m_pl / m,
        mode2: (2.0 * m_pl + n * sum_ft) / (m + n),
        mode3: sum_ft,
    })
}

/// `F = b_eff·t_wb·f_ywb / γM0`
pub fn beam_web_tension(effective_width: f64, t_wb: f64, f_ywb: f64, gamma_m0: f64) -> CalcResult<f64> {
    let gamma_m0 = require_positive("gamma_m0", gamma_m0)?;
    let b_eff = require_positive("beam_web.effective_width", effective_width)?;
    let t_wb = require_positive("beam.t_w", t_wb)?;
    Ok(b_eff * t_wb * f_ywb / gamma_m0)
}

/// Everything needed to evaluate per-row components of one joint.
#[derive(Debug, Clone, Copy)]
pub struct RowContext<'a> {
    pub profile: &'a Profile,
    pub geometry: &'a JointGeometry,
    pub plate: &'a EndPlate,
    pub bolts: &'a BoltSpec,
    pub settings: &'a DesignSettings,
}

impl<'a> RowContext<'a> {
    fn position(&self, index: usize) -> RowPosition {
        RowPosition {
            index,
            row_count: self.geometry.row_count(),
            extended: self.geometry.is_extended(),
        }
    }

    fn pattern_dims(&self, kind: ComponentKind) -> PatternDims {
        let alpha = self.settings.coefficients.alpha;
        match kind {
            ComponentKind::EndPlateBending => PatternDims {
                tstub: self.geometry.plate_tstub,
                extension: self.geometry.extension,
                alpha,
            },
            _ => PatternDims {
                tstub: self.geometry.column_tstub,
                extension: None,
                alpha,
            },
        }
    }

    /// Case and pitch of row `index` inside group `first..=last`
    fn row_case(&self, index: usize, first: usize, last: usize) -> CalcResult<(CaseType, f64)> {
        let row = self.geometry.row(index)?;
        let missing = || CalcError::invalid_configuration(format!("bolt row {}", index), "no neighbouring row");
        if first == last {
            return Ok((CaseType::Individual, 0.0));
        }
        if index == first {
            Ok((CaseType::FirstOfGroup, row.pitch_below.ok_or_else(missing)?))
        } else if index == last {
            Ok((CaseType::LastOfGroup, row.pitch_above.ok_or_else(missing)?))
        } else {
            let above = row.pitch_above.ok_or_else(missing)?;
            let below = row.pitch_below.ok_or_else(missing)?;
            Ok((CaseType::InternalOfGroup, 0.5 * (above + below)))
        }
    }

    fn check_range(&self, first: usize, last: usize) -> CalcResult<()> {
        if first == 0 || first > last || last > self.geometry.row_count() {
            return Err(CalcError::invalid_configuration(
                format!("bolt rows {}-{}", first, last),
                format!("not a contiguous range within 1..{}", self.geometry.row_count()),
            ));
        }
        Ok(())
    }

    /// Length contributed by row `index` when it acts within `first..=last`
    pub fn row_length_in_group(
        &self,
        kind: ComponentKind,
        index: usize,
        first: usize,
        last: usize,
    ) -> CalcResult<EffectiveLength> {
        self.check_range(first, last)?;
        if index < first || index > last {
            return Err(CalcError::invalid_configuration(
                format!("bolt row {}", index),
                format!("not inside group {}-{}", first, last),
            ));
        }
        let (case, pitch) = self.row_case(index, first, last)?;
        effective_length(kind, &self.pattern_dims(kind), self.position(index), case, pitch)
    }

    /// Yield-line length of the group `first..=last` (a single row when equal)
    pub fn group_length(&self, kind: ComponentKind, first: usize, last: usize) -> CalcResult<EffectiveLength> {
        self.check_range(first, last)?;
        let dims = self.pattern_dims(kind);
        if last == first + 1 {
            let (_, pitch) = self.row_case(first, first, last)?;
            return effective_length(
                kind,
                &dims,
                self.position(first),
                CaseType::TwoAdjacentRowsCombined,
                pitch,
            );
        }
        let mut total = EffectiveLength::default();
        for index in first..=last {
            total = total + self.row_length_in_group(kind, index, first, last)?;
        }
        Ok(total)
    }

    /// Tension resistance of the bolts in `rows` rows (N)
    pub fn bolt_tension(&self, rows: usize) -> CalcResult<f64> {
        Ok(rows as f64 * self.bolts.row_tension_resistance(self.settings)?)
    }

    fn tstub_input(&self, kind: ComponentKind, first: usize, l_eff: f64, rows: usize) -> CalcResult<TStubInput> {
        let column = &self.profile.column;
        let bolt_tension = self.bolt_tension(rows)?;
        let input = match kind {
            ComponentKind::ColumnWebTension | ComponentKind::ColumnFlangeBending => {
                let m = self.geometry.column_tstub.m;
                let (thickness, fy) = if kind == ComponentKind::ColumnWebTension {
                    (column.t_w, self.profile.fy_column())
                } else {
                    (column.t_f, self.profile.fy_column())
                };
                TStubInput {
                    effective_length: l_eff,
                    m,
                    n: self.geometry.n_for(m),
                    thickness,
                    fy,
                    bolt_tension,
                }
            }
            ComponentKind::EndPlateBending => {
                let (m, n) = match self.geometry.extension {
                    Some(ext) if self.geometry.is_extension_row(first) => (ext.m_x, ext.e_x.min(1.25 * ext.m_x)),
                    _ => {
                        let m = self.geometry.plate_tstub.m;
                        (m, self.geometry.n_for(m))
                    }
                };
                TStubInput {
                    effective_length: l_eff,
                    m,
                    n,
                    thickness: self.plate.thickness,
                    fy: self.plate.grade.fy(),
                    bolt_tension,
                }
            }
            other => {
                return Err(CalcError::invalid_configuration(
                    other.display_name(),
                    "not an equivalent T-stub component",
                ))
            }
        };
        Ok(input)
    }

    /// Resistance of one per-row component for the rows `first..=last`.
    pub fn resistance(&self, kind: ComponentKind, first: usize, last: usize) -> CalcResult<ComponentResistance> {
        self.check_range(first, last)?;
        let rows = last - first + 1;
        let gamma_m0 = self.settings.gamma_m0;

        let result = match kind {
            ComponentKind::ColumnWebTension | ComponentKind::ColumnFlangeBending | ComponentKind::EndPlateBending => {
                let l_eff = self.group_length(kind, first, last)?.governing();
                let modes = tstub_resistance(&self.tstub_input(kind, first, l_eff, rows)?, gamma_m0)?;
                ComponentResistance {
                    kind,
                    resistance: modes.governing(),
                    modes: Some(modes),
                    effective_length: Some(l_eff),
                }
            }
            ComponentKind::BeamWebTension => {
                if self.geometry.is_extension_row(first) {
                    return Err(CalcError::invalid_configuration(
                        format!("bolt rows {}-{}", first, last),
                        "the extension row has no beam web in tension",
                    ));
                }
                let b_eff = self.group_length(ComponentKind::ColumnWebTension, first, last)?.governing();
                let beam = &self.profile.beam;
                ComponentResistance {
                    kind,
                    resistance: beam_web_tension(b_eff, beam.t_w, self.profile.fy_beam(), gamma_m0)?,
                    modes: None,
                    effective_length: Some(b_eff),
                }
            }
            ComponentKind::BoltsTension => ComponentResistance::scalar(kind, self.bolt_tension(rows)?),
            other => {
                return Err(CalcError::invalid_configuration(
                    other.display_name(),
                    "evaluated once per joint, not per row",
                ))
            }
        };

        tracing::debug!(
            component = kind.number(),
            first,
            last,
            f_rd = result.resistance,
            "row component"
        );
        Ok(result)
    }

    /// Components acting on the rows `first..=last`, in table order.
    ///
    /// The extension row of an extended end plate has no beam web in tension;
    /// for a group containing it the end plate is excluded as well, since the
    /// flange splits the plate yield lines.
    pub fn components_for(&self, first: usize, last: usize) -> Vec<ComponentKind> {
        let has_extension = self.geometry.is_extension_row(first);
        let single = first == last;
        let mut kinds = vec![ComponentKind::ColumnWebTension, ComponentKind::ColumnFlangeBending];
        if single || !has_extension {
            kinds.push(ComponentKind::EndPlateBending);
        }
        if !has_extension {
            kinds.push(ComponentKind::BeamWebTension);
        }
        if single {
            kinds.push(ComponentKind::BoltsTension);
        }
        kinds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{BoltLayout, MemberInput, PlateExtension, SectionSource, WeldThroats};
    use crate::materials::{builtin_sections, BoltGrade, BoltSize, SteelGrade};
    use approx::assert_relative_eq;

    struct Fixture {
        profile: Profile,
        geometry: JointGeometry,
        plate: EndPlate,
        bolts: BoltSpec,
        settings: DesignSettings,
    }

    impl Fixture {
        fn new(lever_arms: Vec<f64>, extended: bool) -> Self {
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
                extension: extended.then_some(PlateExtension {
                    bolt_to_flange: 40.0,
                    bolt_to_edge: 30.0,
                }),
            };
            let bolts = BoltSpec::new(BoltSize::M20, BoltGrade::G8_8, 45.0);
            let geometry = JointGeometry::derive(
                &profile,
                &plate,
                &bolts,
                &BoltLayout { gauge: 90.0, lever_arms },
                &WeldThroats { flange: 6.0, web: 4.0 },
            )
            .unwrap();
            Fixture {
                profile,
                geometry,
                plate,
                bolts,
                settings: DesignSettings::default(),
            }
        }

        fn ctx(&self) -> RowContext<'_> {
            RowContext {
                profile: &self.profile,
                geometry: &self.geometry,
                plate: &self.plate,
                bolts: &self.bolts,
                settings: &self.settings,
            }
        }
    }

    #[test]
    fn test_tstub_modes() {
        let input = TStubInput {
            effective_length: 100.0,
            m: 30.0,
            n: 25.0,
            thickness: 10.0,
            fy: 235.0,
            bolt_tension: 282_240.0,
        };
        let modes = tstub_resistance(&input, 1.0).unwrap();
        let m_pl = 0.25 * 100.0 * 100.0 * 235.0;
        assert_relative_eq!(modes.mode1, 4.0 * m_pl / 30.0, max_relative = 1e-12);
        assert_relative_eq!(modes.mode2, (2.0 * m_pl + 25.0 * 282_240.0) / 55.0, max_relative = 1e-12);
        assert_eq!(modes.mode3, 282_240.0);
        assert_eq!(modes.governing(), modes.mode1.min(modes.mode2).min(modes.mode3));
    }

    #[test]
    fn test_tstub_rejects_zero_inputs() {
        let base = TStubInput {
            effective_length: 100.0,
            m: 30.0,
            n: 25.0,
            thickness: 10.0,
            fy: 235.0,
            bolt_tension: 1000.0,
        };
        assert!(tstub_resistance(&TStubInput { m: 0.0, ..base }, 1.0).is_err());
        assert!(tstub_resistance(&TStubInput { thickness: 0.0, ..base }, 1.0).is_err());
        assert!(tstub_resistance(&TStubInput { effective_length: -5.0, ..base }, 1.0).is_err());
        assert!(tstub_resistance(&base, 0.0).is_err());
        assert!(tstub_resistance(&base, f64::NAN).is_err());
    }

    #[test]
    fn test_governing_is_min_for_every_row_component() {
        let f = Fixture::new(vec![168.75, 75.25], true);
        let ctx = f.ctx();
        for index in 1..=2 {
            for kind in [
                ComponentKind::ColumnWebTension,
                ComponentKind::ColumnFlangeBending,
                ComponentKind::EndPlateBending,
            ] {
                let r = ctx.resistance(kind, index, index).unwrap();
                let modes = r.modes.unwrap();
                assert_eq!(r.resistance, modes.mode1.min(modes.mode2).min(modes.mode3));
            }
        }
    }

    #[test]
    fn test_extension_row_uses_m_x() {
        let f = Fixture::new(vec![168.75, 75.25], true);
        let ctx = f.ctx();
        let r = ctx.resistance(ComponentKind::EndPlateBending, 1, 1).unwrap();
        let ext = f.geometry.extension.unwrap();
        let l_eff = r.effective_length.unwrap();
        let input = TStubInput {
            effective_length: l_eff,
            m: ext.m_x,
            n: 30.0f64.min(1.25 * ext.m_x),
            thickness: 15.0,
            fy: 235.0,
            bolt_tension: 282_240.0,
        };
        assert_eq!(r.modes.unwrap(), tstub_resistance(&input, 1.0).unwrap());
    }

    #[test]
    fn test_beam_web_uses_column_web_length() {
        let f = Fixture::new(vec![168.75, 75.25], true);
        let ctx = f.ctx();
        let cwt = ctx.resistance(ComponentKind::ColumnWebTension, 2, 2).unwrap();
        let bwt = ctx.resistance(ComponentKind::BeamWebTension, 2, 2).unwrap();
        assert_eq!(bwt.effective_length, cwt.effective_length);
        assert_relative_eq!(bwt.resistance, cwt.effective_length.unwrap() * 5.5 * 235.0, max_relative = 1e-12);
    }

    #[test]
    fn test_extension_row_has_no_beam_web() {
        let f = Fixture::new(vec![168.75, 75.25], true);
        let ctx = f.ctx();
        assert!(ctx.resistance(ComponentKind::BeamWebTension, 1, 1).is_err());
        assert!(!ctx.components_for(1, 1).contains(&ComponentKind::BeamWebTension));
        assert!(ctx.components_for(2, 2).contains(&ComponentKind::BeamWebTension));
        assert_eq!(
            ctx.components_for(1, 2),
            vec![ComponentKind::ColumnWebTension, ComponentKind::ColumnFlangeBending]
        );
    }

    #[test]
    fn test_group_length_sums_roles() {
        let f = Fixture::new(vec![200.0, 140.0, 90.0, 40.0], false);
        let ctx = f.ctx();
        let kind = ComponentKind::ColumnFlangeBending;
        let total = ctx.group_length(kind, 1, 4).unwrap();
        let mut sum = EffectiveLength::default();
        for i in 1..=4 {
            sum = sum + ctx.row_length_in_group(kind, i, 1, 4).unwrap();
        }
        assert_eq!(total, sum);

        // internal row 2 with pitches 60 and 50 uses p = 55
        assert_eq!(ctx.row_length_in_group(kind, 2, 1, 4).unwrap(), EffectiveLength::new(110.0, 55.0));
    }

    #[test]
    fn test_group_bolt_count() {
        let f = Fixture::new(vec![200.0, 140.0, 90.0], false);
        let ctx = f.ctx();
        let r = ctx.resistance(ComponentKind::ColumnFlangeBending, 1, 3).unwrap();
        assert_eq!(r.modes.unwrap().mode3, 3.0 * 282_240.0);
    }

    #[test]
    fn test_invalid_ranges() {
        let f = Fixture::new(vec![168.75, 75.25], true);
        let ctx = f.ctx();
        assert!(ctx.resistance(ComponentKind::BoltsTension, 0, 1).is_err());
        assert!(ctx.resistance(ComponentKind::BoltsTension, 2, 1).is_err());
        assert!(ctx.resistance(ComponentKind::BoltsTension, 1, 3).is_err());
        assert!(ctx.resistance(ComponentKind::ColumnWebPanelShear, 1, 1).is_err());
    }
}
