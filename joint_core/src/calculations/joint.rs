//! # Bolted End-Plate Joint
//!
//! Design moment resistance, initial rotational stiffness and classification
//! of a bolted end-plate beam-to-column joint by the component method of
//! EN 1993-1-8.
//!
//! ## Assumptions
//!
//! - Single-sided joint, beam framing into the column flange
//! - Unstiffened column web and flange
//! - Up to four bolt rows in tension, two bolts per row by default
//! - Hogging moment only; the centre of compression is the beam
//!   compression flange
//!
//! ## Example
//!
//! ```rust
//! use joint_core::calculations::joint::{calculate, JointInput};
//! use joint_core::settings::DesignSettings;
//!
//! let input = JointInput::demo();
//! let result = calculate(&input, &DesignSettings::default()).unwrap();
//!
//! println!("M_j,Rd  = {:.1} kNm", result.moment_resistance_knm);
//! println!("S_j,ini = {:.0} kNm/rad", result.initial_stiffness_knm_per_rad);
//! println!("{} / {}", result.classification.stiffness, result.classification.strength);
//! assert!(result.total_row_force() <= result.assembly.global_ceiling * (1.0 + 1e-12));
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::classification::{classify, Classification, ClassificationInput};
use crate::calculations::row_assembly::{assemble_rows, RowAssembly};
use crate::calculations::stiffness::{calculate_stiffness, StiffnessResult};
use crate::components::global::GlobalComponents;
use crate::components::tstub::RowContext;
use crate::errors::{require_positive, CalcResult};
use crate::geometry::{
    BoltLayout, EndPlate, JointGeometry, MemberInput, PlateExtension, Profile, SectionSource, WeldThroats,
};
use crate::materials::{builtin_sections, BoltGrade, BoltSize, BoltSpec, SectionDb, SteelGrade, STEEL_ELASTIC_MODULUS};
use crate::settings::DesignSettings;
use crate::units::{
    KilonewtonMeters, KilonewtonMetersPerRad, NewtonMillimeters, NewtonMillimetersPerRad,
};

fn default_elastic_modulus() -> f64 {
    STEEL_ELASTIC_MODULUS
}

fn default_beta() -> f64 {
    1.0
}

/// Input parameters for one joint.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "J-1",
///   "column": { "section": "HEA200", "grade": "S235" },
///   "beam": { "section": "HEA140", "grade": "S235" },
///   "beam_span": 5000,
///   "end_plate": {
///     "thickness": 15, "width": 140, "grade": "S235",
///     "extension": { "bolt_to_flange": 40, "bolt_to_edge": 30 }
///   },
///   "bolts": { "size": "M20", "grade": "8.8", "elongation_length": 45 },
///   "layout": { "gauge": 90, "lever_arms": [168.75, 75.25] },
///   "welds": { "flange": 6, "web": 4 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointInput {
    /// User label (e.g., "J-1", "Grid B/3 level 2")
    pub label: String,

    pub column: MemberInput,

    pub beam: MemberInput,

    /// Elastic modulus E (MPa)
    #[serde(default = "default_elastic_modulus")]
    pub elastic_modulus: f64,

    /// Beam span L_b (mm)
    pub beam_span: f64,

    pub end_plate: EndPlate,

    pub bolts: BoltSpec,

    pub layout: BoltLayout,

    pub welds: WeldThroats,

    /// Web panel transformation parameter β (1.0 for a single-sided joint)
    #[serde(default = "default_beta")]
    pub beta: f64,

    /// Frame braced against sway (raises the rigid boundary)
    #[serde(default)]
    pub braced: bool,
}

impl JointInput {
    /// HEA200 column, HEA140 beam, S235, extended 15 mm plate, two rows of
    /// M20 8.8 bolts.
    pub fn demo() -> Self {
        JointInput {
            label: "Demo HEA200/HEA140".to_string(),
            column: MemberInput {
                section: SectionSource::Designation("HEA200".to_string()),
                grade: SteelGrade::S235,
            },
            beam: MemberInput {
                section: SectionSource::Designation("HEA140".to_string()),
                grade: SteelGrade::S235,
            },
            elastic_modulus: STEEL_ELASTIC_MODULUS,
            beam_span: 5000.0,
            end_plate: EndPlate {
                thickness: 15.0,
                width: 140.0,
                grade: SteelGrade::S235,
                extension: Some(PlateExtension {
                    bolt_to_flange: 40.0,
                    bolt_to_edge: 30.0,
                }),
            },
            bolts: BoltSpec::new(BoltSize::M20, BoltGrade::G8_8, 45.0),
            layout: BoltLayout {
                gauge: 90.0,
                lever_arms: vec![168.75, 75.25],
            },
            welds: WeldThroats { flange: 6.0, web: 4.0 },
            beta: 1.0,
            braced: false,
        }
    }

    /// Parse from JSON
    pub fn from_json(json: &str) -> CalcResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Scalar checks that do not need the section table
    pub fn validate(&self) -> CalcResult<()> {
        require_positive("beta", self.beta)?;
        require_positive("beam_span", self.beam_span)?;
        require_positive("elastic_modulus", self.elastic_modulus)?;
        self.bolts.validate()?;
        Ok(())
    }
}

/// Complete joint result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointResult {
    pub label: String,

    /// Resolved beam and column properties
    pub profile: Profile,

    /// Derived rows and T-stub dimensions
    pub geometry: JointGeometry,

    /// Components 1, 2 and 7
    pub global: GlobalComponents,

    /// Row forces, group checks and M_j,Rd in N·mm
    pub assembly: RowAssembly,

    /// Spring model and S_j,ini in N·mm/rad
    pub stiffness: StiffnessResult,

    pub classification: Classification,

    /// Design moment resistance M_j,Rd (kNm)
    pub moment_resistance_knm: f64,

    /// Elastic moment resistance M_j,el,Rd = 2/3·M_j,Rd (kNm)
    pub elastic_moment_resistance_knm: f64,

    /// Beam plastic moment M_b,pl,Rd (kNm)
    pub beam_plastic_moment_knm: f64,

    /// Equivalent lever arm z_eq (mm)
    pub equivalent_lever_arm: f64,

    /// Initial rotational stiffness S_j,ini (kNm/rad)
    pub initial_stiffness_knm_per_rad: f64,

    /// Secant stiffness S_j = S_j,ini / η (kNm/rad)
    pub secant_stiffness_knm_per_rad: f64,
}

impl JointResult {
    /// Sum of final bolt-row forces (N)
    pub fn total_row_force(&self) -> f64 {
        self.assembly.total_force()
    }

    /// M_j,Rd / M_b,pl,Rd
    pub fn strength_ratio(&self) -> f64 {
        self.moment_resistance_knm / self.beam_plastic_moment_knm
    }
}

/// Evaluate a joint using the built-in section table.
pub fn calculate(input: &JointInput, settings: &DesignSettings) -> CalcResult<JointResult> {
    calculate_with_sections(input, settings, builtin_sections())
}

/// Evaluate a joint, resolving section designations against `db`.
///
/// # Errors
///
/// * `InvalidConfiguration` - unsupported row count or row ordering
/// * `InvalidInput` - a zero, negative or NaN value reached a formula
/// * `SectionNotFound` - a designation is not in `db`
pub fn calculate_with_sections(
    input: &JointInput,
    settings: &DesignSettings,
    db: &SectionDb,
) -> CalcResult<JointResult> {
    settings.validate()?;
    input.validate()?;

    let profile = Profile::resolve(&input.column, &input.beam, input.elastic_modulus, input.beam_span, db)?;
    let geometry = JointGeometry::derive(&profile, &input.end_plate, &input.bolts, &input.layout, &input.welds)?;

    let ctx = RowContext {
        profile: &profile,
        geometry: &geometry,
        plate: &input.end_plate,
        bolts: &input.bolts,
        settings,
    };

    let global = GlobalComponents::calculate(&profile, &geometry, input.welds.flange, settings)?;
    let assembly = assemble_rows(&ctx, &global)?;
    let stiffness = calculate_stiffness(&ctx, global.web_compression.effective_width, input.beta)?;

    let beam_plastic_moment = global.beam_compression.plastic_moment;
    let classification = classify(
        &ClassificationInput {
            initial_stiffness: stiffness.initial_stiffness,
            moment_resistance: assembly.moment_resistance,
            beam_stiffness_ratio: profile.beam_stiffness_ratio(),
            beam_plastic_moment,
            braced: input.braced,
        },
        &settings.coefficients,
    )?;

    let moment = KilonewtonMeters::from(NewtonMillimeters(assembly.moment_resistance));
    let elastic = moment * settings.coefficients.elastic_moment_ratio;
    let s_ini = KilonewtonMetersPerRad::from(NewtonMillimetersPerRad(stiffness.initial_stiffness));
    let s_sec = KilonewtonMetersPerRad::from(NewtonMillimetersPerRad(stiffness.secant_stiffness));

    tracing::info!(
        label = %input.label,
        m_j_rd_knm = moment.value(),
        s_j_ini_knm_rad = s_ini.value(),
        stiffness = %classification.stiffness,
        strength = %classification.strength,
        "joint evaluated"
    );

    Ok(JointResult {
        label: input.label.clone(),
        equivalent_lever_arm: stiffness.equivalent_lever_arm,
        moment_resistance_knm: moment.value(),
        elastic_moment_resistance_knm: elastic.value(),
        beam_plastic_moment_knm: KilonewtonMeters::from(NewtonMillimeters(beam_plastic_moment)).value(),
        initial_stiffness_knm_per_rad: s_ini.value(),
        secant_stiffness_knm_per_rad: s_sec.value(),
        profile,
        geometry,
        global,
        assembly,
        stiffness,
        classification,
    })
}
