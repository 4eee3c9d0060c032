//! # Bolt Row Assembly
//!
//! Turns per-component resistances into final bolt-row forces and the
//! design moment resistance `M_j,Rd = Σ F_r·h_r` (EN 1993-1-8 6.2.7.2).
//!
//! ## Steps
//!
//! 1. **Individual rows** - each row's capacity is its weakest component
//!    among 3, 4, 5, 8 and 10. The extension row of an extended end plate
//!    has no beam web in tension.
//! 2. **Groups** - for every row `r = 2..N` and every contiguous group
//!    ending at `r` (widest first), if the rows of the group together exceed
//!    the group resistance, row `r` is cut back to what the group leaves
//!    over. Inner rows keep their already-reduced values.
//! 3. **Global ceiling** - the rows together may not exceed
//!    `min(F_1, F_2, F_7)`. Rows are reduced from the last one inward until
//!    the sum fits.
//!
//! Ceilings only ever lower a force; no row ends above its step-1 capacity.

use serde::{Deserialize, Serialize};

use crate::components::global::GlobalComponents;
use crate::components::tstub::RowContext;
use crate::components::{weakest, ComponentKind, ComponentResistance, FailureMode};
use crate::errors::{CalcError, CalcResult};

/// What fixed the final force of a row
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RowLimit {
    /// The row's own weakest component
    Individual { component: ComponentKind },
    /// The resistance of group `first..=last`
    Group {
        first: usize,
        last: usize,
        component: ComponentKind,
    },
    /// The global ceiling min(F_1, F_2, F_7)
    Global { component: ComponentKind },
}

impl RowLimit {
    pub fn display_name(&self) -> String {
        match self {
            RowLimit::Individual { component } => format!("individual: {}", component.display_name()),
            RowLimit::Group {
                first,
                last,
                component,
            } => format!("group {}-{}: {}", first, last, component.display_name()),
            RowLimit::Global { component } => format!("global: {}", component.display_name()),
        }
    }
}

/// Final force of one bolt row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowForce {
    /// 1-based row index
    pub index: usize,
    /// Lever arm h_r (mm)
    pub lever_arm: f64,
    /// Step-1 capacity: weakest individual component (N)
    pub capacity: f64,
    /// Force after group and global ceilings (N)
    pub force: f64,
    /// What fixed `force`
    pub limit: RowLimit,
    /// Failure mode of the weakest individual T-stub component, if it is one
    pub governing_mode: Option<FailureMode>,
    /// Individual component resistances of this row
    pub components: Vec<ComponentResistance>,
}

/// Group resistance check for rows `first..=last`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupCheck {
    pub first: usize,
    pub last: usize,
    /// Group component resistances
    pub components: Vec<ComponentResistance>,
    /// Weakest group component (N)
    pub ceiling: f64,
    pub governing: ComponentKind,
    pub governing_mode: Option<FailureMode>,
    /// Sum of the row forces when the group was checked (N)
    pub rows_sum: f64,
    /// New force of row `last` if the check reduced it (N)
    pub reduced_to: Option<f64>,
}

/// Result of the row assembly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowAssembly {
    pub rows: Vec<RowForce>,
    pub groups: Vec<GroupCheck>,
    /// F_glob = min(F_1, F_2, F_7) (N)
    pub global_ceiling: f64,
    pub global_component: ComponentKind,
    /// M_j,Rd = Σ F_r·h_r (N·mm)
    pub moment_resistance: f64,
}

impl RowAssembly {
    /// Sum of the final row forces (N)
    pub fn total_force(&self) -> f64 {
        self.rows.iter().map(|r| r.force).sum()
    }
}

/// Cut back the last row of `forces[first..=last]` (0-based, inclusive) so the
/// group does not exceed `ceiling`.
///
/// Returns the new force of the last row when it was reduced.
pub fn apply_group_ceiling(forces: &mut [f64], first: usize, last: usize, ceiling: f64) -> Option<f64> {
    let others: f64 = forces[first..last].iter().sum();
    if others + forces[last] <= ceiling {
        return None;
    }
    let candidate = (ceiling - others).max(0.0);
    if candidate < forces[last] {
        forces[last] = candidate;
        Some(candidate)
    } else {
        None
    }
}

/// Reduce rows from the last one inward until `Σ forces ≤ ceiling`.
///
/// Returns the 0-based indices of the rows that were reduced, last row first.
pub fn apply_global_ceiling(forces: &mut [f64], ceiling: f64) -> Vec<usize> {
    let mut reduced = Vec::new();
    if forces.iter().sum::<f64>() <= ceiling {
        return reduced;
    }
    for r in (0..forces.len()).rev() {
        let above: f64 = forces[..r].iter().sum();
        let allowed = (ceiling - above).max(0.0);
        if allowed < forces[r] {
            forces[r] = allowed;
            reduced.push(r);
        }
        // a positive remainder means rows 1..=r now fit exactly
        if allowed > 0.0 {
            break;
        }
    }
    reduced
}

/// Run steps 1 to 3 and compute `M_j,Rd`.
pub fn assemble_rows(ctx: &RowContext<'_>, global: &GlobalComponents) -> CalcResult<RowAssembly> {
    let n = ctx.geometry.row_count();

    // Step 1: individual rows
    let mut rows = Vec::with_capacity(n);
    for row in &ctx.geometry.rows {
        let components = ctx
            .components_for(row.index, row.index)
            .into_iter()
            .map(|kind| ctx.resistance(kind, row.index, row.index))
            .collect::<CalcResult<Vec<_>>>()?;
        let limiting = weakest(&components).ok_or_else(|| {
            CalcError::invalid_configuration(format!("bolt row {}", row.index), "no components act on the row")
        })?;
        let capacity = limiting.resistance;
        let limit = RowLimit::Individual { component: limiting.kind };
        let governing_mode = limiting.governing_mode();

        tracing::debug!(
            row = row.index,
            capacity,
            component = limiting.kind.number(),
            "row capacity"
        );
        rows.push(RowForce {
            index: row.index,
            lever_arm: row.lever_arm,
            capacity,
            force: capacity,
            limit,
            governing_mode,
            components,
        });
    }

    let mut forces: Vec<f64> = rows.iter().map(|r| r.force).collect();

    // Step 2: groups ending at row r, widest first
    let mut groups = Vec::new();
    for last in 2..=n {
        for first in 1..last {
            let components = ctx
                .components_for(first, last)
                .into_iter()
                .map(|kind| ctx.resistance(kind, first, last))
                .collect::<CalcResult<Vec<_>>>()?;
            let limiting = weakest(&components).ok_or_else(|| {
                CalcError::invalid_configuration(
                    format!("bolt rows {}-{}", first, last),
                    "no components act on the group",
                )
            })?;
            let ceiling = limiting.resistance;
            let governing = limiting.kind;
            let governing_mode = limiting.governing_mode();

            let rows_sum: f64 = forces[first - 1..last].iter().sum();
            let reduced_to = apply_group_ceiling(&mut forces, first - 1, last - 1, ceiling);
            if let Some(f) = reduced_to {
                tracing::warn!(
                    first,
                    last,
                    ceiling,
                    row = last,
                    force = f,
                    "group resistance reduces row force"
                );
                rows[last - 1].limit = RowLimit::Group {
                    first,
                    last,
                    component: governing,
                };
            }
            groups.push(GroupCheck {
                first,
                last,
                components,
                ceiling,
                governing,
                governing_mode,
                rows_sum,
                reduced_to,
            });
        }
    }

    // Step 3: global ceiling
    let (global_ceiling, global_component) = global.ceiling();
    for r in apply_global_ceiling(&mut forces, global_ceiling) {
        tracing::warn!(
            row = r + 1,
            ceiling = global_ceiling,
            force = forces[r],
            "global ceiling reduces row force"
        );
        rows[r].limit = RowLimit::Global {
            component: global_component,
        };
    }

    for (row, force) in rows.iter_mut().zip(&forces) {
        row.force = *force;
    }
    let moment_resistance = rows.iter().map(|r| r.force * r.lever_arm).sum();

    Ok(RowAssembly {
        rows,
        groups,
        global_ceiling,
        global_component,
        moment_resistance,
    })
}
