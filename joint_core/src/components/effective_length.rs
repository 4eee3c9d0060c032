//! Effective lengths of equivalent T-stubs (EN 1993-1-8 Tables 6.4 and 6.6)
//!
//! One algorithm serves the column flange, the column web and the end plate.
//! Only the yield-line pattern tables differ. Each call returns the
//! circular-pattern and non-circular-pattern lengths of one bolt row in one
//! case; the governing length is the smaller of the two.
//!
//! Groups are assembled by summing the lengths of their rows, each taken in
//! its role within the group (first, internal, last). A pair of adjacent rows
//! is [`CaseType::TwoAdjacentRowsCombined`], which is first-of-group for the
//! upper row plus last-of-group for the lower one.

use std::f64::consts::PI;
use std::ops::Add;

use serde::{Deserialize, Serialize};

use crate::components::ComponentKind;
use crate::errors::{require_positive, CalcError, CalcResult};
use crate::geometry::{ExtensionDims, TStubDims, MAX_BOLT_ROWS};

/// Role of a bolt row in the yield-line mechanism
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaseType {
    Individual,
    FirstOfGroup,
    InternalOfGroup,
    LastOfGroup,
    TwoAdjacentRowsCombined,
}

impl CaseType {
    pub fn display_name(&self) -> &'static str {
        match self {
            CaseType::Individual => "individual",
            CaseType::FirstOfGroup => "first of group",
            CaseType::InternalOfGroup => "internal of group",
            CaseType::LastOfGroup => "last of group",
            CaseType::TwoAdjacentRowsCombined => "two adjacent rows",
        }
    }
}

/// Position of a row within the joint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowPosition {
    /// 1-based row index
    pub index: usize,
    /// Number of rows in tension
    pub row_count: usize,
    /// End plate extends above the tension flange
    pub extended: bool,
}

impl RowPosition {
    fn is_first(&self) -> bool {
        self.index == 1
    }

    fn is_last(&self) -> bool {
        self.index == self.row_count
    }

    fn is_extension_row(&self) -> bool {
        self.extended && self.index == 1
    }

    fn is_first_below_flange(&self) -> bool {
        self.index == if self.extended { 2 } else { 1 }
    }

    fn next(&self) -> RowPosition {
        RowPosition {
            index: self.index + 1,
            ..*self
        }
    }
}

/// Yield-line lengths of one row (or sum over a group) in mm
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EffectiveLength {
    /// Circular patterns l_eff,cp
    pub circular: f64,
    /// Non-circular patterns l_eff,nc
    pub non_circular: f64,
}

impl EffectiveLength {
    pub fn new(circular: f64, non_circular: f64) -> Self {
        EffectiveLength { circular, non_circular }
    }

    /// min(l_eff,cp, l_eff,nc)
    pub fn governing(&self) -> f64 {
        self.circular.min(self.non_circular)
    }
}

impl Add for EffectiveLength {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        EffectiveLength::new(self.circular + rhs.circular, self.non_circular + rhs.non_circular)
    }
}

/// T-stub dimensions the pattern tables draw on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatternDims {
    pub tstub: TStubDims,
    /// End plate extension, only consulted for the extension row
    pub extension: Option<ExtensionDims>,
    /// α for the first end-plate row below the tension flange
    pub alpha: f64,
}

/// Effective length of one row in one case.
///
/// `pitch` is the vertical distance to the neighbouring row inside the group
/// (the mean of both pitches for an internal row). It is ignored for
/// `Individual`.
///
/// # Errors
///
/// `InvalidConfiguration` when the component is not a T-stub or the
/// row/case combination does not exist in the joint topology;
/// `InvalidInput` when a dimension or the pitch is not positive.
pub fn effective_length(
    component: ComponentKind,
    dims: &PatternDims,
    position: RowPosition,
    case: CaseType,
    pitch: f64,
) -> CalcResult<EffectiveLength> {
    if !component.is_tstub() {
        return Err(CalcError::invalid_configuration(
            component.display_name(),
            "no yield-line pattern for a non T-stub component",
        ));
    }
    check_position(position)?;
    check_case(component, position, case)?;

    require_positive("m", dims.tstub.m)?;
    require_positive("e", dims.tstub.e)?;
    if case != CaseType::Individual {
        require_positive("pitch", pitch)?;
    }

    if case == CaseType::TwoAdjacentRowsCombined {
        let upper = effective_length(component, dims, position, CaseType::FirstOfGroup, pitch)?;
        let lower = effective_length(component, dims, position.next(), CaseType::LastOfGroup, pitch)?;
        return Ok(upper + lower);
    }

    let TStubDims { m, e, .. } = dims.tstub;
    let length = match component {
        ComponentKind::EndPlateBending if position.is_extension_row() => extension_row(dims)?,
        ComponentKind::EndPlateBending if position.is_first_below_flange() => {
            let alpha = require_positive("alpha", dims.alpha)?;
            match case {
                CaseType::Individual => EffectiveLength::new(2.0 * PI * m, alpha * m),
                _ => EffectiveLength::new(PI * m + pitch, 0.5 * pitch + alpha * m - (2.0 * m + 0.625 * e)),
            }
        }
        _ => standard_row(m, e, case, pitch),
    };

    tracing::trace!(
        component = component.number(),
        row = position.index,
        case = case.display_name(),
        l_cp = length.circular,
        l_nc = length.non_circular,
        "effective length"
    );
    Ok(length)
}

/// Unstiffened column flange, and end-plate rows away from the flange
fn standard_row(m: f64, e: f64, case: CaseType, p: f64) -> EffectiveLength {
    match case {
        CaseType::Individual => EffectiveLength::new(2.0 * PI * m, 4.0 * m + 1.25 * e),
        CaseType::InternalOfGroup => EffectiveLength::new(2.0 * p, p),
        _ => EffectiveLength::new(PI * m + p, 2.0 * m + 0.625 * e + 0.5 * p),
    }
}

fn extension_row(dims: &PatternDims) -> CalcResult<EffectiveLength> {
    let ext = dims.extension.ok_or_else(|| {
        CalcError::invalid_configuration("end plate extension row", "extension dimensions missing")
    })?;
    let m_x = require_positive("m_x", ext.m_x)?;
    let e_x = require_positive("e_x", ext.e_x)?;
    let e = dims.tstub.e;
    let w = dims.tstub.w;

    let circular = (2.0 * PI * m_x).min(PI * m_x + w).min(PI * m_x + 2.0 * e);
    let non_circular = (4.0 * m_x + 1.25 * e_x)
        .min(e + 2.0 * m_x + 0.625 * e_x)
        .min(0.5 * ext.b_p)
        .min(0.5 * w + 2.0 * m_x + 0.625 * e_x);
    Ok(EffectiveLength::new(circular, non_circular))
}

fn check_position(position: RowPosition) -> CalcResult<()> {
    if position.row_count == 0 || position.row_count > MAX_BOLT_ROWS {
        return Err(CalcError::invalid_configuration(
            "row count",
            format!("{} rows, 1 to {} supported", position.row_count, MAX_BOLT_ROWS),
        ));
    }
    if position.index == 0 || position.index > MAX_BOLT_ROWS || position.index > position.row_count {
        return Err(CalcError::invalid_configuration(
            format!("bolt row {}", position.index),
            format!("row index outside 1..{}", position.row_count),
        ));
    }
    Ok(())
}

fn check_case(component: ComponentKind, position: RowPosition, case: CaseType) -> CalcResult<()> {
    let item = || format!("bolt row {} ({})", position.index, case.display_name());

    let reason = match case {
        CaseType::FirstOfGroup | CaseType::TwoAdjacentRowsCombined if position.is_last() => {
            Some("the last row cannot start a group")
        }
        CaseType::LastOfGroup if position.is_first() => Some("row 1 cannot end a group"),
        CaseType::InternalOfGroup if position.is_first() || position.is_last() => {
            Some("an internal row needs a row on each side")
        }
        _ => None,
    };
    if let Some(reason) = reason {
        return Err(CalcError::invalid_configuration(item(), reason));
    }

    if component == ComponentKind::EndPlateBending && case != CaseType::Individual {
        if position.is_extension_row() {
            return Err(CalcError::invalid_configuration(
                item(),
                "the beam flange separates the extension row from the rows below",
            ));
        }
        if position.is_first_below_flange()
            && matches!(case, CaseType::InternalOfGroup | CaseType::LastOfGroup)
        {
            return Err(CalcError::invalid_configuration(
                item(),
                "the first row below the flange can only start a group",
            ));
        }
    }
    Ok(())
}
