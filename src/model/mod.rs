//! The model-builder pipeline: a sequence of pure functions threading a
//! mutable `good_lp` model, run in a fixed order that does not commute —
//! indicator variables must exist before the objective references them, and
//! every hard constraint must be decided before variables are even created,
//! since fixing happens at variable-creation time.

pub mod constraints;
pub mod indicators;
pub mod objective;
pub mod variables;

use good_lp::{Expression, ProblemVariables, SolverModel};

use crate::config::{ConstraintToggles, ObjectiveConfig};
use crate::error::ScheduleResult;
use crate::input::NormalizedDay;
use crate::model::indicators::Indicators;
use crate::model::variables::VariableIndex;

/// Everything the solver needs: the variable index, the indicator
/// dictionaries (so the Solution Materializer can ignore them), and the
/// objective expression, plus a closure that attaches every row constraint
/// once a concrete solver backend has been selected.
pub struct BuiltModel {
    pub vars: ProblemVariables,
    pub index: VariableIndex,
    pub indicators: Indicators,
    pub objective: Expression,
}

impl BuiltModel {
    /// Attach every row constraint (hard constraints that need a row, plus
    /// every indicator-linearizing row) to a concrete solver-backed problem.
    /// Must run after `.maximise(objective).using(backend)`, since that is
    /// the only point in `good_lp`'s builder chain where row constraints can
    /// be attached — by then `self.vars` has already been consumed by
    /// `maximise`, so this takes the surviving pieces by reference rather
    /// than `&self`.
    pub fn attach_constraints<M: SolverModel>(
        index: &VariableIndex,
        indicator_vars: &Indicators,
        problem: M,
        day: &NormalizedDay,
        toggles: &ConstraintToggles,
    ) -> ScheduleResult<M> {
        let problem = constraints::add_row_constraints(problem, index, day, toggles)?;
        indicators::add_indicator_constraints(problem, index, indicator_vars)
    }
}

/// Run the full model-builder pipeline for one day.
pub fn build_model(day: &NormalizedDay, toggles: &ConstraintToggles, objective_cfg: &ObjectiveConfig) -> ScheduleResult<BuiltModel> {
    let fixed_zero = constraints::compute_fixed_zero(day, toggles);

    let mut vars = ProblemVariables::new();
    let index = variables::build_variables(day, &mut vars, &fixed_zero)?;
    let indicators = indicators::build_indicator_vars(&index, &mut vars, objective_cfg);
    let objective = objective::build_objective(&index, day, &indicators, objective_cfg);

    Ok(BuiltModel { vars, index, indicators, objective })
}
