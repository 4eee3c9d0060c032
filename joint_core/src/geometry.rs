//! # Joint Geometry
//!
//! Passive data describing a bolted end-plate beam-to-column joint, and the
//! dimensions derived from it once: bolt rows with their pitches and
//! locations, and the equivalent T-stub dimensions `m`, `e`, `n` of the
//! column flange and the end plate.
//!
//! ## Conventions
//!
//! - All lengths in mm, stresses in MPa.
//! - Bolt rows are numbered from the beam tension flange toward the
//!   compression flange. Row 1 sits next to the tension flange weld.
//! - With an extended end plate, row 1 is the extension row (above the
//!   flange). Row 2 is then the first row below the tension flange.
//! - Lever arm `h_i` is measured from the bolt row to the centre of the beam
//!   compression flange.
//!
//! ```text
//!        ┌──────┐  ← plate end
//!   r1 ● │      │ ● (extension row, e_x to plate end, x to flange)
//!  ══════╪══════╪══ tension flange
//!   r2 ● │      │ ● (first row below flange, α pattern)
//!   r3 ● │      │ ●
//!        │      │
//!  ══════╪══════╪══ compression flange (centre of rotation)
//!        └──────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{require_positive, CalcError, CalcResult};
use crate::materials::{BoltSpec, SectionDb, SectionProperties, SteelGrade};

/// Maximum number of bolt rows in tension
pub const MAX_BOLT_ROWS: usize = 4;

// ============================================================================
// Input Records
// ============================================================================

/// A section given either by designation or by explicit properties.
///
/// JSON accepts a plain string (`"HEA200"`) or a full property object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SectionSource {
    Designation(String),
    Custom(SectionProperties),
}

impl SectionSource {
    /// Resolve against a section table
    pub fn resolve(&self, db: &SectionDb) -> CalcResult<SectionProperties> {
        match self {
            SectionSource::Designation(name) => db.lookup(name).cloned(),
            SectionSource::Custom(props) => Ok(props.clone()),
        }
    }
}

/// Beam or column member: section and grade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberInput {
    pub section: SectionSource,
    #[serde(default)]
    pub grade: SteelGrade,
}

/// Immutable beam and column properties shared by every component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub column: SectionProperties,
    pub column_grade: SteelGrade,
    pub beam: SectionProperties,
    pub beam_grade: SteelGrade,
    /// Elastic modulus E (MPa)
    pub elastic_modulus: f64,
    /// Beam span L_b (mm), used for stiffness classification
    pub beam_span: f64,
}

impl Profile {
    /// Resolve member inputs into a profile
    pub fn resolve(
        column: &MemberInput,
        beam: &MemberInput,
        elastic_modulus: f64,
        beam_span: f64,
        db: &SectionDb,
    ) -> CalcResult<Self> {
        let profile = Profile {
            column: column.section.resolve(db)?,
            column_grade: column.grade,
            beam: beam.section.resolve(db)?,
            beam_grade: beam.grade,
            elastic_modulus,
            beam_span,
        };
        profile.validate()?;
        Ok(profile)
    }

    pub fn validate(&self) -> CalcResult<()> {
        self.column.validate("column")?;
        self.beam.validate("beam")?;
        require_positive("elastic_modulus", self.elastic_modulus)?;
        require_positive("beam_span", self.beam_span)?;
        require_positive("beam.h - beam.t_f", self.beam.h - self.beam.t_f)?;
        Ok(())
    }

    /// Column yield strength, web and flange (MPa)
    pub fn fy_column(&self) -> f64 {
        self.column_grade.fy()
    }

    /// Beam yield strength, web and flange (MPa)
    pub fn fy_beam(&self) -> f64 {
        self.beam_grade.fy()
    }

    /// Beam flexural stiffness over span: `E·I_b / L_b` (N·mm)
    pub fn beam_stiffness_ratio(&self) -> f64 {
        self.elastic_modulus * self.beam.i_y / self.beam_span
    }
}

/// Plate extension above the tension flange
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlateExtension {
    /// Distance x from the extension bolt row to the tension flange face (mm)
    pub bolt_to_flange: f64,
    /// Distance e_x from the extension bolt row to the plate end (mm)
    pub bolt_to_edge: f64,
}

/// End plate welded to the beam end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndPlate {
    /// Plate thickness t_p (mm)
    pub thickness: f64,
    /// Plate width b_p (mm)
    pub width: f64,
    #[serde(default)]
    pub grade: SteelGrade,
    /// Present for an extended end plate, absent for a flush one
    #[serde(default)]
    pub extension: Option<PlateExtension>,
}

impl EndPlate {
    pub fn is_extended(&self) -> bool {
        self.extension.is_some()
    }
}

/// Bolt positions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoltLayout {
    /// Horizontal distance between the two bolt lines w (mm)
    pub gauge: f64,
    /// Lever arm h_i of each row (mm), row 1 first
    pub lever_arms: Vec<f64>,
}

/// Fillet weld throat thicknesses between beam and plate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeldThroats {
    /// Flange weld throat a_f (mm)
    pub flange: f64,
    /// Web weld throat a_w (mm)
    pub web: f64,
}

// ============================================================================
// Derived Geometry
// ============================================================================

/// Where a bolt row sits relative to the beam tension flange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowLocation {
    /// Above the tension flange, on the plate extension
    Extension,
    /// First row below the tension flange
    FirstBelowFlange,
    /// Between two other rows
    Inner,
    /// Lowest row in tension
    Last,
}

impl RowLocation {
    pub fn display_name(&self) -> &'static str {
        match self {
            RowLocation::Extension => "Extension row",
            RowLocation::FirstBelowFlange => "First row below tension flange",
            RowLocation::Inner => "Inner row",
            RowLocation::Last => "Last row",
        }
    }
}

/// One bolt row in tension
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoltRow {
    /// 1-based ordinal from the tension flange
    pub index: usize,
    /// Lever arm h_i (mm)
    pub lever_arm: f64,
    /// Vertical pitch to row `index − 1` (mm)
    pub pitch_above: Option<f64>,
    /// Vertical pitch to row `index + 1` (mm)
    pub pitch_below: Option<f64>,
    pub location: RowLocation,
}

/// Equivalent T-stub dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TStubDims {
    /// Bolt axis to 80% of the fillet/weld (mm)
    pub m: f64,
    /// Bolt axis to the free edge (mm)
    pub e: f64,
    /// Bolt gauge w (mm)
    pub w: f64,
}

/// T-stub dimensions of the plate extension
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtensionDims {
    /// m_x = x − 0.8·a_f·√2 (mm)
    pub m_x: f64,
    /// e_x (mm)
    pub e_x: f64,
    /// Plate width b_p (mm)
    pub b_p: f64,
}

/// Everything the component calculators need that is derived from input
/// geometry, computed and validated once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointGeometry {
    pub rows: Vec<BoltRow>,
    /// Column flange T-stub (components 3 and 4)
    pub column_tstub: TStubDims,
    /// End plate T-stub below the flange (component 5)
    pub plate_tstub: TStubDims,
    /// End plate extension T-stub, when extended
    pub extension: Option<ExtensionDims>,
    /// e_min = min(e_column, e_plate) (mm)
    pub e_min: f64,
    /// Clear depth of the column web d_wc (mm)
    pub d_wc: f64,
    /// Load spread through the end plate s_p = 2·t_p (mm)
    pub s_p: f64,
}

impl JointGeometry {
    /// Derive rows and T-stub dimensions from the input records.
    pub fn derive(
        profile: &Profile,
        plate: &EndPlate,
        bolts: &BoltSpec,
        layout: &BoltLayout,
        welds: &WeldThroats,
    ) -> CalcResult<Self> {
        bolts.validate()?;
        require_positive("end_plate.thickness", plate.thickness)?;
        require_positive("end_plate.width", plate.width)?;
        require_positive("layout.gauge", layout.gauge)?;
        require_positive("welds.flange", welds.flange)?;
        require_positive("welds.web", welds.web)?;

        let rows = build_rows(&layout.lever_arms, plate.is_extended())?;

        let column = &profile.column;
        let beam = &profile.beam;
        let w = layout.gauge;

        let column_tstub = TStubDims {
            m: require_positive("column.m", w / 2.0 - column.t_w / 2.0 - 0.8 * column.r)?,
            e: require_positive("column.e", (column.b - w) / 2.0)?,
            w,
        };
        let plate_tstub = TStubDims {
            m: require_positive(
                "end_plate.m",
                w / 2.0 - beam.t_w / 2.0 - 0.8 * welds.web * std::f64::consts::SQRT_2,
            )?,
            e: require_positive("end_plate.e", (plate.width - w) / 2.0)?,
            w,
        };

        let extension = match plate.extension {
            Some(ext) => Some(ExtensionDims {
                m_x: require_positive(
                    "end_plate.m_x",
                    ext.bolt_to_flange - 0.8 * welds.flange * std::f64::consts::SQRT_2,
                )?,
                e_x: require_positive("end_plate.extension.bolt_to_edge", ext.bolt_to_edge)?,
                b_p: plate.width,
            }),
            None => None,
        };

        Ok(JointGeometry {
            rows,
            column_tstub,
            plate_tstub,
            extension,
            e_min: column_tstub.e.min(plate_tstub.e),
            d_wc: require_positive("column.web_depth", column.web_depth())?,
            s_p: 2.0 * plate.thickness,
        })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_extended(&self) -> bool {
        self.extension.is_some()
    }

    /// Row by 1-based index
    pub fn row(&self, index: usize) -> CalcResult<&BoltRow> {
        index
            .checked_sub(1)
            .and_then(|i| self.rows.get(i))
            .ok_or_else(|| {
                CalcError::invalid_configuration(
                    format!("bolt row {}", index),
                    format!("joint has rows 1..{}", self.rows.len()),
                )
            })
    }

    /// Is row `index` the end-plate extension row?
    pub fn is_extension_row(&self, index: usize) -> bool {
        self.is_extended() && index == 1
    }

    /// Effective bolt distance n = min(e_min, 1.25·m)
    pub fn n_for(&self, m: f64) -> f64 {
        self.e_min.min(1.25 * m)
    }
}

fn build_rows(lever_arms: &[f64], extended: bool) -> CalcResult<Vec<BoltRow>> {
    let count = lever_arms.len();
    if count == 0 || count > MAX_BOLT_ROWS {
        return Err(CalcError::invalid_configuration(
            "bolt rows",
            format!("{} rows given, 1 to {} supported", count, MAX_BOLT_ROWS),
        ));
    }

    for (i, h) in lever_arms.iter().enumerate() {
        require_positive(&format!("layout.lever_arms[{}]", i), *h)?;
    }
    for (i, pair) in lever_arms.windows(2).enumerate() {
        if pair[1] >= pair[0] {
            return Err(CalcError::invalid_configuration(
                format!("bolt row {}", i + 2),
                "lever arms must decrease strictly from row 1 downward",
            ));
        }
    }

    let first_below = if extended { 2 } else { 1 };
    let rows = (1..=count)
        .map(|index| {
            let i = index - 1;
            let location = if extended && index == 1 {
                RowLocation::Extension
            } else if index == first_below {
                RowLocation::FirstBelowFlange
            } else if index == count {
                RowLocation::Last
            } else {
                RowLocation::Inner
            };
            BoltRow {
                index,
                lever_arm: lever_arms[i],
                pitch_above: (i > 0).then(|| lever_arms[i - 1] - lever_arms[i]),
                pitch_below: (index < count).then(|| lever_arms[i] - lever_arms[i + 1]),
                location,
            }
        })
        .collect();
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::{builtin_sections, BoltGrade, BoltSize, STEEL_ELASTIC_MODULUS};
    use approx::assert_relative_eq;

    fn profile() -> Profile {
        let db = builtin_sections();
        Profile::resolve(
            &MemberInput {
                section: SectionSource::Designation("HEA200".into()),
                grade: SteelGrade::S235,
            },
            &MemberInput {
                section: SectionSource::Designation("HEA140".into()),
                grade: SteelGrade::S235,
            },
            STEEL_ELASTIC_MODULUS,
            5000.0,
            db,
        )
        .unwrap()
    }

    fn plate() -> EndPlate {
        EndPlate {
            thickness: 15.0,
            width: 140.0,
            grade: SteelGrade::S235,
            extension: Some(PlateExtension {
                bolt_to_flange: 40.0,
                bolt_to_edge: 30.0,
            }),
        }
    }

    fn bolts() -> BoltSpec {
        BoltSpec::new(BoltSize::M20, BoltGrade::G8_8, 45.0)
    }

    fn welds() -> WeldThroats {
        WeldThroats { flange: 6.0, web: 4.0 }
    }

    #[test]
    fn test_derive_extended() {
        let layout = BoltLayout {
            gauge: 90.0,
            lever_arms: vec![168.75, 75.25],
        };
        let g = JointGeometry::derive(&profile(), &plate(), &bolts(), &layout, &welds()).unwrap();

        assert_eq!(g.row_count(), 2);
        assert_eq!(g.rows[0].location, RowLocation::Extension);
        assert_eq!(g.rows[1].location, RowLocation::FirstBelowFlange);
        assert_relative_eq!(g.rows[0].pitch_below.unwrap(), 93.5);
        assert_eq!(g.rows[0].pitch_above, None);

        // 45 - 3.25 - 14.4
        assert_relative_eq!(g.column_tstub.m, 27.35, max_relative = 1e-12);
        assert_relative_eq!(g.column_tstub.e, 55.0);
        // 45 - 2.75 - 3.2*sqrt(2)
        assert_relative_eq!(g.plate_tstub.m, 42.25 - 3.2 * 2f64.sqrt(), max_relative = 1e-12);
        assert_relative_eq!(g.plate_tstub.e, 25.0);
        assert_relative_eq!(g.e_min, 25.0);

        let ext = g.extension.unwrap();
        assert_relative_eq!(ext.m_x, 40.0 - 4.8 * 2f64.sqrt(), max_relative = 1e-12);
        assert_relative_eq!(g.d_wc, 134.0);
        assert_relative_eq!(g.s_p, 30.0);
        assert!(g.is_extension_row(1));
        assert!(!g.is_extension_row(2));
    }

    #[test]
    fn test_flush_plate_locations() {
        let mut p = plate();
        p.extension = None;
        let layout = BoltLayout {
            gauge: 90.0,
            lever_arms: vec![100.0, 60.0, 30.0],
        };
        let g = JointGeometry::derive(&profile(), &p, &bolts(), &layout, &welds()).unwrap();
        let locations: Vec<_> = g.rows.iter().map(|r| r.location).collect();
        assert_eq!(
            locations,
            vec![RowLocation::FirstBelowFlange, RowLocation::Inner, RowLocation::Last]
        );
        assert!(!g.is_extension_row(1));
    }

    #[test]
    fn test_too_many_rows() {
        let layout = BoltLayout {
            gauge: 90.0,
            lever_arms: vec![200.0, 150.0, 100.0, 60.0, 30.0],
        };
        let err = JointGeometry::derive(&profile(), &plate(), &bolts(), &layout, &welds()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIGURATION");
    }

    #[test]
    fn test_lever_arms_must_decrease() {
        let layout = BoltLayout {
            gauge: 90.0,
            lever_arms: vec![100.0, 120.0],
        };
        let err = JointGeometry::derive(&profile(), &plate(), &bolts(), &layout, &welds()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIGURATION");
    }

    #[test]
    fn test_zero_plate_thickness() {
        let mut p = plate();
        p.thickness = 0.0;
        let layout = BoltLayout {
            gauge: 90.0,
            lever_arms: vec![168.75, 75.25],
        };
        let err = JointGeometry::derive(&profile(), &p, &bolts(), &layout, &welds()).unwrap_err();
        assert!(matches!(err, CalcError::InvalidInput { ref field, .. } if field == "end_plate.thickness"));
    }

    #[test]
    fn test_gauge_wider_than_column() {
        let layout = BoltLayout {
            gauge: 210.0,
            lever_arms: vec![168.75, 75.25],
        };
        let err = JointGeometry::derive(&profile(), &plate(), &bolts(), &layout, &welds()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_row_lookup() {
        let layout = BoltLayout {
            gauge: 90.0,
            lever_arms: vec![168.75, 75.25],
        };
        let g = JointGeometry::derive(&profile(), &plate(), &bolts(), &layout, &welds()).unwrap();
        assert_eq!(g.row(2).unwrap().index, 2);
        assert!(g.row(0).is_err());
        assert!(g.row(3).is_err());
    }

    #[test]
    fn test_section_source_json() {
        let by_name: MemberInput = serde_json::from_str(r#"{"section": "IPE300", "grade": "S355"}"#).unwrap();
        assert_eq!(by_name.section, SectionSource::Designation("IPE300".into()));
        let resolved = by_name.section.resolve(builtin_sections()).unwrap();
        assert_eq!(resolved.h, 300.0);
    }

    #[test]
    fn test_beam_stiffness_ratio() {
        let p = profile();
        assert_relative_eq!(p.beam_stiffness_ratio(), 210_000.0 * 10.33e6 / 5000.0, max_relative = 1e-12);
    }
}
