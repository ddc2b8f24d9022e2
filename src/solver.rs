//! Solver Driver.
//!
//! Hands the assembled model to a MIP backend and reports termination as
//! data, never as an `Err`: an infeasible or unbounded result is as valid a
//! pipeline outcome as an optimal one. Only this stage blocks; every other
//! stage is a pure transform over in-memory tables.
//!
//! The backend is whichever MIP solver is reachable as a child-process
//! executable (`cbc` by default, `glpk` as the configured alternative),
//! driven through `good_lp`'s `lp_solvers` feature rather than the native
//! `coin_cbc` bindings, since the executable path can be overridden at
//! runtime (`SOLVER_PATH`) without relinking anything.

use std::collections::HashMap;

use good_lp::solvers::lp_solvers::{CbcSolver, GlpkSolver, LpSolver};
use good_lp::{ResolutionError, Solution, SolverModel};

use crate::config::{ConstraintToggles, SolverConfig};
use crate::error::ScheduleResult;
use crate::input::NormalizedDay;
use crate::model::BuiltModel;
use crate::model::variables::VarKey;

/// Termination status of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// Solved to the configured gap tolerance.
    Optimal,
    /// The backend stopped on its own gap/time limit short of proven optimality.
    Feasible,
    Infeasible,
    Unbounded,
    Error,
}

impl SolveStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

/// Every `X[t,c,s]` value the backend returned, present only when the status
/// is [`SolveStatus::is_ok`].
pub struct SolveOutcome {
    pub status: SolveStatus,
    pub values: Option<HashMap<VarKey, f64>>,
}

/// Run the Solver Driver for one day's built model.
///
/// Consumes `built` since `good_lp::ProblemVariables::maximise` consumes the
/// variable container; everything the Solution Materializer needs survives
/// in the returned [`SolveOutcome`].
pub fn solve_day(
    built: BuiltModel,
    day: &NormalizedDay,
    toggles: &ConstraintToggles,
    cfg: &SolverConfig,
) -> ScheduleResult<SolveOutcome> {
    let BuiltModel { vars, index, indicators: indicator_vars, objective } = built;
    log::debug!("solving day {} over {} variables with backend {:?}", day.day, index.index.len(), cfg.backend);

    let unsolved = vars.maximise(objective);
    let result = match cfg.backend.as_str() {
        "glpk" => {
            let problem = unsolved.using(LpSolver(glpk_solver(cfg)));
            let problem = BuiltModel::attach_constraints(&index, &indicator_vars, problem, day, toggles)?;
            problem.solve()
        }
        // Any unrecognized backend identifier falls back to cbc rather than
        // failing the whole day.
        _ => {
            let problem = unsolved.using(LpSolver(cbc_solver(cfg)));
            let problem = BuiltModel::attach_constraints(&index, &indicator_vars, problem, day, toggles)?;
            problem.solve()
        }
    };

    Ok(translate(result, &index, day))
}

fn cbc_solver(cfg: &SolverConfig) -> CbcSolver {
    let mut solver = CbcSolver::new();
    if let Some(path) = cfg.resolved_solver_path() {
        solver.command_name = path;
    }
    solver
}

fn glpk_solver(cfg: &SolverConfig) -> GlpkSolver {
    let mut solver = GlpkSolver::new();
    if let Some(path) = cfg.resolved_solver_path() {
        solver.command_name = path;
    }
    solver
}

/// Translate a `good_lp` solve result into a [`SolveOutcome`].
///
/// The `lp_solvers` bridge reports a plain pass/fail per run rather than a
/// distinct "stopped on gap" signal across every backend it shells out to,
/// so a successful solve is reported as `Optimal` rather than distinguishing
/// `Feasible`.
fn translate<S: Solution>(
    result: Result<S, ResolutionError>,
    index: &crate::model::variables::VariableIndex,
    day: &NormalizedDay,
) -> SolveOutcome {
    match result {
        Ok(solution) => {
            let values: HashMap<VarKey, f64> = index
                .index
                .iter()
                .filter_map(|key| index.x.get(key).map(|v| (key.clone(), solution.value(*v))))
                .collect();
            SolveOutcome { status: SolveStatus::Optimal, values: Some(values) }
        }
        Err(ResolutionError::Infeasible) => {
            log::warn!("day {} is infeasible", day.day);
            SolveOutcome { status: SolveStatus::Infeasible, values: None }
        }
        Err(ResolutionError::Unbounded) => {
            log::warn!("day {} is unbounded", day.day);
            SolveOutcome { status: SolveStatus::Unbounded, values: None }
        }
        Err(other) => {
            log::error!("solver backend error for day {}: {other}", day.day);
            SolveOutcome { status: SolveStatus::Error, values: None }
        }
    }
}

/// Solve with the pure-Rust embedded backend instead of shelling out to an
/// executable — useful where no `cbc`/`glpk` binary is installed, e.g. in a
/// test or CI sandbox. Never the default backend; only reachable behind the
/// `embedded-solver` feature, and only used by this crate's own test suite.
#[cfg(feature = "embedded-solver")]
pub fn solve_day_embedded(built: BuiltModel, day: &NormalizedDay, toggles: &ConstraintToggles) -> ScheduleResult<SolveOutcome> {
    let BuiltModel { vars, index, indicators: indicator_vars, objective } = built;
    let problem = vars.maximise(objective).using(good_lp::solvers::microlp::microlp);
    let problem = BuiltModel::attach_constraints(&index, &indicator_vars, problem, day, toggles)?;
    Ok(translate(problem.solve(), &index, day))
}

#[cfg(all(test, feature = "embedded-solver"))]
mod tests {
    use super::*;
    use crate::config::ObjectiveConfig;
    use crate::input::{normalize_day, CenterHoursRow, RoleRow, StaffChildPair};
    use crate::model::build_model;
    use crate::time::RawTime;
    use std::collections::{HashMap, HashSet};

    fn hm(h: u32, m: u32) -> RawTime {
        RawTime::HourMinute { hour: h, minute: m }
    }

    /// A single open hour, one staff, one child: both blocks get assigned and
    /// nothing competes for them.
    #[test]
    fn minimal_feasible_scenario() {
        let center_hours = vec![CenterHoursRow { day: "Mon".into(), open: hm(9, 0), close: hm(10, 0) }];
        let mut pairs = HashSet::new();
        pairs.insert(StaffChildPair { child: "A".into(), staff: "s1".into() });
        let roles = vec![RoleRow { name: "s1".into(), role: "Tech".into() }];
        let day = normalize_day("Mon", &center_hours, pairs, &[], &roles).unwrap();

        let toggles = ConstraintToggles::default();
        let mut rewards = HashMap::new();
        rewards.insert("Tech".to_string(), 1.0);
        let objective_cfg = ObjectiveConfig::new(rewards);

        let built = build_model(&day, &toggles, &objective_cfg).unwrap();
        let outcome = solve_day_embedded(built, &day, &toggles).unwrap();
        assert_eq!(outcome.status, SolveStatus::Optimal);
        let values = outcome.values.unwrap();
        assert_eq!(values[&(18, "A".to_string(), "s1".to_string())], 1.0);
        assert_eq!(values[&(19, "A".to_string(), "s1".to_string())], 1.0);
    }

    /// A closed center has no open time blocks, so `build_model` itself
    /// reports nothing-to-build; the caller (`orchestrate::run_one_day`,
    /// the CLI) is responsible for turning this into an empty solution
    /// rather than failing the day.
    #[test]
    fn center_closed_has_no_time_blocks_to_build_over() {
        let center_hours = vec![CenterHoursRow { day: "Mon".into(), open: hm(9, 0), close: hm(9, 0) }];
        let mut pairs = HashSet::new();
        pairs.insert(StaffChildPair { child: "A".into(), staff: "s1".into() });
        let roles = vec![RoleRow { name: "s1".into(), role: "Tech".into() }];
        let day = normalize_day("Mon", &center_hours, pairs, &[], &roles).unwrap();

        let toggles = ConstraintToggles::default();
        let objective_cfg = ObjectiveConfig::new(HashMap::new());
        assert!(build_model(&day, &toggles, &objective_cfg).is_err());
    }

    /// A staff member eligible for two children must still get a break
    /// somewhere in the lunch window: the total blocks worked across both
    /// children cannot reach the full window span.
    #[test]
    fn staff_eligible_for_two_children_still_gets_a_lunch_break() {
        let center_hours = vec![CenterHoursRow { day: "Mon".into(), open: hm(9, 0), close: hm(15, 0) }];
        let mut pairs = HashSet::new();
        pairs.insert(StaffChildPair { child: "A".into(), staff: "s1".into() });
        pairs.insert(StaffChildPair { child: "B".into(), staff: "s1".into() });
        let roles = vec![RoleRow { name: "s1".into(), role: "Tech".into() }];
        let day = normalize_day("Mon", &center_hours, pairs, &[], &roles).unwrap();

        let toggles = ConstraintToggles::default();
        let mut rewards = HashMap::new();
        rewards.insert("Tech".to_string(), 1.0);
        let objective_cfg = ObjectiveConfig::new(rewards);

        let built = build_model(&day, &toggles, &objective_cfg).unwrap();
        let outcome = solve_day_embedded(built, &day, &toggles).unwrap();
        assert_eq!(outcome.status, SolveStatus::Optimal);
        let values = outcome.values.unwrap();

        let (lunch_start, lunch_end) = (23, 28);
        let worked: f64 = (lunch_start..lunch_end)
            .map(|t| {
                values.get(&(t, "A".to_string(), "s1".to_string())).copied().unwrap_or(0.0)
                    + values.get(&(t, "B".to_string(), "s1".to_string())).copied().unwrap_or(0.0)
            })
            .sum();
        assert!(worked <= (lunch_end - lunch_start - 1) as f64);
    }
}
