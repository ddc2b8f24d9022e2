//! Solution Materializer.
//!
//! Converts the solved `X[t,c,s]` values into the wide tabular layout the
//! reporting layer expects: one row per time block, one column per staff
//! member, holding the child assigned to that staff at that block (or
//! empty). Built as a `polars` `DataFrame`.

use std::collections::HashMap;

use polars::prelude::*;

use crate::model::variables::{VarKey, VariableIndex};
use crate::time::index_to_time;

/// A condition raised while coercing degenerate solver output: a fractional
/// value, or more than one child mapped to the same `(t, s)`.
#[derive(Debug, Clone)]
pub struct SolutionWarning {
    pub time_block: i64,
    pub staff: String,
    pub message: String,
}

/// The materialized per-day result: the wide table plus any warnings raised
/// while coercing degenerate solver output.
pub struct MaterializedSolution {
    pub table: DataFrame,
    pub warnings: Vec<SolutionWarning>,
}

/// Epsilon below which a solver-reported binary value is treated as exactly 0 or 1.
const FRACTIONAL_EPSILON: f64 = 1e-6;

/// Build the wide `Day, Time Block, <staff1>, <staff2>, ...` table for one
/// solved day.
///
/// `values` is `None` for a non-ok [`crate::solver::SolveStatus`] — callers
/// should not materialize in that case; this function assumes every key in
/// `index.index` has a value when `values` is present.
pub fn materialize(day: &str, index: &VariableIndex, values: &HashMap<VarKey, f64>) -> MaterializedSolution {
    let mut warnings = Vec::new();
    let staff_names = index.staff_names();
    let child_names = index.child_names();

    // For each (t, s), the assigned child, resolved with the spec's
    // lexicographic tie-break whenever the solver's raw output is degenerate.
    let mut cells: HashMap<(i64, String), Option<String>> = HashMap::new();
    for t in index.time_blocks.clone() {
        for staff in &staff_names {
            let mut assigned: Vec<&String> = Vec::new();
            for child in &child_names {
                if let Some(&value) = values.get(&(t, child.clone(), staff.clone())) {
                    if value > 1.0 - FRACTIONAL_EPSILON {
                        assigned.push(child);
                    } else if value > FRACTIONAL_EPSILON {
                        warnings.push(SolutionWarning {
                            time_block: t,
                            staff: staff.clone(),
                            message: format!("fractional value {value:.6} for child {child}"),
                        });
                    }
                }
            }
            assigned.sort_unstable();
            if assigned.len() > 1 {
                warnings.push(SolutionWarning {
                    time_block: t,
                    staff: staff.clone(),
                    message: format!("multiple children assigned: {assigned:?}, picked {}", assigned[0]),
                });
            }
            cells.insert((t, staff.clone()), assigned.first().map(|c| (*c).clone()));
        }
    }

    let time_blocks: Vec<i64> = index.time_blocks.clone().collect();
    let day_col: Vec<&str> = std::iter::repeat(day).take(time_blocks.len()).collect();
    let time_block_col: Vec<String> = time_blocks.iter().map(|&t| index_to_time(t)).collect();

    let mut columns: Vec<Column> = vec![
        Series::new("Day".into(), &day_col).into(),
        Series::new("Time Block".into(), &time_block_col).into(),
    ];
    for staff in &staff_names {
        let values: Vec<Option<String>> = time_blocks.iter().map(|&t| cells.remove(&(t, staff.clone())).flatten()).collect();
        columns.push(Series::new(staff.as_str().into(), &values).into());
    }

    let table = DataFrame::new(columns).expect("materializer builds columns of equal length by construction");
    MaterializedSolution { table, warnings }
}

/// An empty `Day, Time Block` table with no staff columns and no rows, for a
/// day that never had anything to schedule (e.g. the center is closed).
pub fn empty(day: &str) -> MaterializedSolution {
    let day_col: Vec<&str> = Vec::new();
    let time_block_col: Vec<String> = Vec::new();
    let columns: Vec<Column> = vec![
        Series::new("Day".into(), &day_col).into(),
        Series::new("Time Block".into(), &time_block_col).into(),
    ];
    let table = DataFrame::new(columns).expect("two equal-length empty columns always construct a DataFrame");
    MaterializedSolution {
        table,
        warnings: vec![SolutionWarning {
            time_block: -1,
            staff: String::new(),
            message: format!("{day}: no time blocks to schedule, returning an empty solution"),
        }],
    }
}
