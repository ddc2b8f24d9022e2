//! Variable Index Builder.
//!
//! Builds `TIME_BLOCKS` and the sparse `X[t, c, s]` variable family. The
//! index is built only over eligible `(child, staff)` pairs — never the full
//! `T x C x S` cube — which is how staff-child eligibility ends up enforced
//! structurally rather than as a constraint.

use std::collections::{HashMap, HashSet};
use std::ops::Range;

use good_lp::{variable, ProblemVariables, Variable};

use crate::error::{ScheduleError, ScheduleResult};
use crate::input::{NormalizedDay, StaffChildPair};
use crate::time::TimeBlock;

/// A decision-variable key: block, child, staff.
pub type VarKey = (TimeBlock, String, String);

/// The sparse variable dictionary `X` plus its iteration spine, materialized
/// here as `index` rather than a DataFrame, since every downstream stage
/// only ever needs to iterate it or look a triple up by key. Cheaply
/// [`Clone`]able (`good_lp::Variable` is a
/// `Copy` index type) so a caller that needs the index's shape to survive
/// past a solve — which consumes the whole [`crate::model::BuiltModel`] —
/// can keep a copy without rebuilding the model.
#[derive(Clone)]
pub struct VariableIndex {
    pub time_blocks: Range<TimeBlock>,
    /// The distinct `(child, staff)` pairs this day's model is built over,
    /// in a stable order so model construction is deterministic.
    pub staff_child: Vec<StaffChildPair>,
    /// Every valid `(t, c, s)` triple, in the same stable order as
    /// `staff_child`, blocks outermost.
    pub index: Vec<VarKey>,
    pub x: HashMap<VarKey, Variable>,
}

impl VariableIndex {
    pub fn get(&self, t: TimeBlock, child: &str, staff: &str) -> Option<Variable> {
        self.x.get(&(t, child.to_string(), staff.to_string())).copied()
    }

    /// Every staff name appearing in at least one eligible pair.
    pub fn staff_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .staff_child
            .iter()
            .map(|p| p.staff.clone())
            .collect::<std::collections::HashSet<_>>()
            .into_iter()
            .collect();
        names.sort();
        names
    }

    /// Every child name appearing in at least one eligible pair.
    pub fn child_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .staff_child
            .iter()
            .map(|p| p.child.clone())
            .collect::<std::collections::HashSet<_>>()
            .into_iter()
            .collect();
        names.sort();
        names
    }
}

/// Build `TIME_BLOCKS` and `X` for a normalized day.
///
/// `fixed_zero` is the set of triples the Hard Constraint Layer
/// (`model::constraints::compute_fixed_zero`) has already decided must be
/// zero (center-hours gaps, absence-type fixings). Those variables are still
/// created — so every downstream stage can look them up uniformly — but
/// bounded to `{0}` at creation, which is cheaper for the solver's presolve
/// than adding an equality row per fixing.
pub fn build_variables(
    day: &NormalizedDay,
    vars: &mut ProblemVariables,
    fixed_zero: &HashSet<VarKey>,
) -> ScheduleResult<VariableIndex> {
    if day.open_idx >= day.close_idx {
        return Err(ScheduleError::ModelBuild { reason: "TIME_BLOCKS is empty" });
    }
    if day.staff_child.is_empty() {
        return Err(ScheduleError::ModelBuild { reason: "STAFF_CHILD is empty" });
    }

    let mut staff_child: Vec<StaffChildPair> = day.staff_child.iter().cloned().collect();
    staff_child.sort_by(|a, b| (a.child.as_str(), a.staff.as_str()).cmp(&(b.child.as_str(), b.staff.as_str())));

    let time_blocks = day.open_idx..day.close_idx;
    let mut index = Vec::with_capacity(staff_child.len() * time_blocks.len());
    let mut x = HashMap::with_capacity(index.capacity());

    for t in time_blocks.clone() {
        for pair in &staff_child {
            let key = (t, pair.child.clone(), pair.staff.clone());
            let binary = variable().binary();
            let v = if fixed_zero.contains(&key) {
                vars.add(binary.max(0))
            } else {
                vars.add(binary)
            };
            x.insert(key.clone(), v);
            index.push(key);
        }
    }

    Ok(VariableIndex { time_blocks, staff_child, index, x })
}
