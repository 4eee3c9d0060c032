//! # Initial Rotational Stiffness
//!
//! Spring model of EN 1993-1-8 6.3. Each bolt row is a chain of springs in
//! series (column web in tension k3, column flange k4, end plate k5, bolts
//! k10). The rows are collapsed into one equivalent spring `k_eq` at the
//! equivalent lever arm `z_eq`, which then acts in series with the column
//! web panel in shear (k1) and the column web in compression (k2). The beam
//! flange in compression (k7) is rigid.
//!
//! ```text
//! k_eff,r = 1 / (1/k3 + 1/k4 + 1/k5 + 1/k10)
//! z_eq    = Σ k_eff,r·h_r² / Σ k_eff,r·h_r
//! k_eq    = Σ k_eff,r·h_r / z_eq
//! S_j,ini = E·z_eq² / (1/k1 + 1/k2 + 1/k_eq)
//! ```
//!
//! Stiffness coefficients are lengths (mm); `S_j,ini` is in N·mm/rad.

use serde::{Deserialize, Serialize};

use crate::components::tstub::RowContext;
use crate::components::ComponentKind;
use crate::errors::{require_positive, CalcResult};

/// Springs of one bolt row (mm)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RowStiffness {
    pub index: usize,
    pub lever_arm: f64,
    /// Column-side effective length used for k3 and k4 (mm)
    pub column_length: f64,
    /// End-plate effective length used for k5 (mm)
    pub plate_length: f64,
    pub k3: f64,
    pub k4: f64,
    pub k5: f64,
    pub k10: f64,
    pub k_eff: f64,
}

/// Assembled stiffness of the joint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StiffnessResult {
    pub rows: Vec<RowStiffness>,
    /// Equivalent lever arm z_eq (mm)
    pub equivalent_lever_arm: f64,
    /// Equivalent tension spring k_eq (mm)
    pub k_eq: f64,
    /// Column web panel in shear k1 (mm)
    pub k1: f64,
    /// Column web in compression k2 (mm)
    pub k2: f64,
    /// S_j,ini (N·mm/rad)
    pub initial_stiffness: f64,
    /// S_j = S_j,ini / η (N·mm/rad)
    pub secant_stiffness: f64,
}

/// Smaller of the individual length and the row's length as part of the
/// widest group the component allows.
fn stiffness_length(ctx: &RowContext<'_>, kind: ComponentKind, index: usize) -> CalcResult<f64> {
    let n = ctx.geometry.row_count();
    let individual = ctx.row_length_in_group(kind, index, index, index)?.governing();

    let first = match kind {
        ComponentKind::EndPlateBending if ctx.geometry.is_extended() => {
            if index == 1 {
                return Ok(individual);
            }
            2
        }
        _ => 1,
    };
    if first == n {
        return Ok(individual);
    }
    let in_group = ctx.row_length_in_group(kind, index, first, n)?.governing();
    Ok(individual.min(in_group))
}

/// Assemble `S_j,ini`.
///
/// `compression_width` is b_eff,c,wc of the column web in compression;
/// `beta` is the transformation parameter of the web panel.
pub fn calculate_stiffness(ctx: &RowContext<'_>, compression_width: f64, beta: f64) -> CalcResult<StiffnessResult> {
    let c = &ctx.settings.coefficients;
    let column = &ctx.profile.column;
    let d_wc = require_positive("column.web_depth", ctx.geometry.d_wc)?;
    let t_wc = column.t_w;
    let t_fc = column.t_f;
    let t_p = ctx.plate.thickness;
    let m_c = require_positive("column.m", ctx.geometry.column_tstub.m)?;

    let k10 = require_positive(
        "k10",
        c.bolt_stiffness_factor * ctx.bolts.size.tensile_area()
            / require_positive("bolts.elongation_length", ctx.bolts.elongation_length)?,
    )?;

    let mut rows = Vec::with_capacity(ctx.geometry.row_count());
    for row in &ctx.geometry.rows {
        let column_length = stiffness_length(ctx, ComponentKind::ColumnFlangeBending, row.index)?;
        let plate_length = stiffness_length(ctx, ComponentKind::EndPlateBending, row.index)?;
        let m_p = match ctx.geometry.extension {
            Some(ext) if ctx.geometry.is_extension_row(row.index) => ext.m_x,
            _ => ctx.geometry.plate_tstub.m,
        };
        let m_p = require_positive("end_plate.m", m_p)?;

        let k3 = require_positive("k3", c.web_stiffness_factor * column_length * t_wc / d_wc)?;
        let k4 = require_positive("k4", c.plate_stiffness_factor * column_length * t_fc.powi(3) / m_c.powi(3))?;
        let k5 = require_positive("k5", c.plate_stiffness_factor * plate_length * t_p.powi(3) / m_p.powi(3))?;
        let k_eff = require_positive("k_eff", 1.0 / (1.0 / k3 + 1.0 / k4 + 1.0 / k5 + 1.0 / k10))?;

        tracing::debug!(row = row.index, k3, k4, k5, k10, k_eff, "row stiffness");
        rows.push(RowStiffness {
            index: row.index,
            lever_arm: row.lever_arm,
            column_length,
            plate_length,
            k3,
            k4,
            k5,
            k10,
            k_eff,
        });
    }

    let sum_kh: f64 = rows.iter().map(|r| r.k_eff * r.lever_arm).sum();
    let sum_kh2: f64 = rows.iter().map(|r| r.k_eff * r.lever_arm * r.lever_arm).sum();
    let z_eq = require_positive("z_eq", sum_kh2 / require_positive("sum k_eff h", sum_kh)?)?;
    let k_eq = require_positive("k_eq", sum_kh / z_eq)?;

    let beta = require_positive("beta", beta)?;
    let k1 = require_positive("k1", c.shear_stiffness_factor * column.shear_area() / (beta * z_eq))?;
    let k2 = require_positive("k2", c.web_stiffness_factor * compression_width * t_wc / d_wc)?;

    let e = require_positive("elastic_modulus", ctx.profile.elastic_modulus)?;
    let initial_stiffness = e * z_eq * z_eq / (1.0 / k1 + 1.0 / k2 + 1.0 / k_eq);
    let eta = require_positive("coefficients.stiffness_modification", c.stiffness_modification)?;

    tracing::debug!(z_eq, k_eq, k1, k2, s_j_ini = initial_stiffness, "joint stiffness");
    Ok(StiffnessResult {
        rows,
        equivalent_lever_arm: z_eq,
        k_eq,
        k1,
        k2,
        initial_stiffness,
        secant_stiffness: initial_stiffness / eta,
    })
}
