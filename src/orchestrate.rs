//! Bounded-concurrency per-day runner.
//!
//! The real orchestration shell — the thing that loads the spreadsheet data,
//! invokes this crate once per weekday, and concatenates the five result
//! tables — is out of scope here. What is in scope is the *shape* that shell
//! should follow: day-models share nothing mutable, so they may run
//! concurrently, bounded to the number of weekdays.
//!
//! Each day's build-then-solve-then-materialize run is synchronous CPU work
//! (model building is pure computation; solving shells out to a blocking
//! child process), so it is dispatched with `tokio::task::spawn_blocking` to
//! keep it off the async executor.

use std::sync::Arc;

use tokio::task::JoinSet;

use crate::config::{ConstraintToggles, ObjectiveConfig, SolverConfig};
use crate::error::{ScheduleError, ScheduleResult};
use crate::input::NormalizedDay;
use crate::model::build_model;
use crate::solution::{self, materialize, MaterializedSolution};
use crate::solver::solve_day;

/// One weekday's materialized result, tagged with its source day so the
/// caller can re-associate results after they complete out of order.
pub struct DayResult {
    pub day: String,
    pub result: ScheduleResult<MaterializedSolution>,
}

/// Run the full build -> solve -> materialize pipeline for every supplied
/// day, in parallel, bounded by `days.len()` concurrent blocking tasks. Each
/// day is entirely independent; one day's error does not cancel the others.
pub async fn run_week(
    days: Vec<NormalizedDay>,
    toggles: ConstraintToggles,
    objective_cfg: ObjectiveConfig,
    solver_cfg: SolverConfig,
) -> Vec<DayResult> {
    let toggles = Arc::new(toggles);
    let objective_cfg = Arc::new(objective_cfg);
    let solver_cfg = Arc::new(solver_cfg);

    let mut tasks = JoinSet::new();
    for day in days {
        let toggles = Arc::clone(&toggles);
        let objective_cfg = Arc::clone(&objective_cfg);
        let solver_cfg = Arc::clone(&solver_cfg);
        tasks.spawn_blocking(move || {
            let day_name = day.day.clone();
            let result = run_one_day(&day, &toggles, &objective_cfg, &solver_cfg);
            DayResult { day: day_name, result }
        });
    }

    let mut results = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(day_result) => results.push(day_result),
            Err(join_err) => {
                log::error!("day task panicked: {join_err}");
            }
        }
    }
    results.sort_by(|a, b| a.day.cmp(&b.day));
    results
}

/// The single-threaded per-day pipeline: build, solve, materialize. A day
/// with nothing to schedule (no open time blocks, or no eligible staff-child
/// pair) short-circuits to an empty, warning-flagged solution rather than
/// failing the whole day; any other build-time failure still propagates as
/// an `Err`, and solver infeasibility/unboundedness is reported inside the
/// materialized result's absence of assignments, not as an `Err`.
fn run_one_day(
    day: &NormalizedDay,
    toggles: &ConstraintToggles,
    objective_cfg: &ObjectiveConfig,
    solver_cfg: &SolverConfig,
) -> ScheduleResult<MaterializedSolution> {
    let built = match build_model(day, toggles, objective_cfg) {
        Ok(built) => built,
        Err(ScheduleError::ModelBuild { reason }) => {
            log::warn!("day {}: nothing to schedule ({reason}), returning an empty solution", day.day);
            return Ok(solution::empty(&day.day));
        }
        Err(err) => return Err(err),
    };
    // `solve_day` consumes `built` to hand the variable map to `good_lp`;
    // materialization only needs the index's shape, so a cheap clone
    // survives the solve rather than threading a second copy through it.
    let index = built.index.clone();
    log::debug!("day {}: built model over {} variables", day.day, index.index.len());

    let outcome = solve_day(built, day, toggles, solver_cfg)?;
    match outcome.values {
        Some(values) => Ok(materialize(&day.day, &index, &values)),
        None => {
            log::warn!("day {} did not solve to a usable status: {:?}", day.day, outcome.status);
            Ok(materialize(&day.day, &index, &std::collections::HashMap::new()))
        }
    }
}
