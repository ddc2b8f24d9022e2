//! Thin CLI edge around the model-builder pipeline. Reads one day's
//! already-normalized input tables plus configuration from a JSON file, runs
//! build -> solve -> materialize, and prints the resulting wide table.
//!
//! This binary is deliberately minimal: the spreadsheet/CSV ingestion layer
//! and the browser UI are out of scope, so the only inbound shape this edge
//! understands is the already-parsed JSON the ingestion layer would hand the
//! core in a real deployment.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

use center_scheduling_core::config::{ConstraintToggles, ObjectiveConfig, SolverConfig};
use center_scheduling_core::error::ScheduleError;
use center_scheduling_core::input::{
    normalize_day, staff_child_from_pairs, AbsenceRow, CenterHoursRow, RoleRow, StaffChildPair,
};
use center_scheduling_core::model::build_model;
use center_scheduling_core::solution::{self, materialize};
use center_scheduling_core::solver::{solve_day, SolveStatus};

/// The JSON document this binary accepts: one day's tables plus config.
#[derive(Debug, Deserialize)]
struct DayRequest {
    day: String,
    center_hours: Vec<CenterHoursRow>,
    staff_child: Vec<StaffChildPair>,
    #[serde(default)]
    absences: Vec<AbsenceRow>,
    roles: Vec<RoleRow>,
    #[serde(default)]
    toggles: Option<ConstraintToggles>,
    #[serde(default)]
    objective: Option<ObjectiveConfig>,
    #[serde(default)]
    solver: Option<SolverConfig>,
}

/// Exit codes.
const EXIT_OPTIMAL: i32 = 0;
const EXIT_INFEASIBLE_OR_UNBOUNDED: i32 = 1;
const EXIT_SOLVER_ERROR: i32 = 2;
const EXIT_INPUT_VALIDATION_ERROR: i32 = 3;

fn main() -> Result<()> {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .context("usage: schedule-day <request.json>")?;
    let request = read_request(PathBuf::from(path))?;

    let staff_child = staff_child_from_pairs(&request.staff_child, &request.roles);
    let toggles = request.toggles.unwrap_or_default();
    let objective_cfg = request.objective.unwrap_or_default();
    let solver_cfg = request.solver.unwrap_or_default();

    let day = match normalize_day(&request.day, &request.center_hours, staff_child, &request.absences, &request.roles) {
        Ok(day) => day,
        Err(err) => {
            eprintln!("input validation error: {err}");
            std::process::exit(EXIT_INPUT_VALIDATION_ERROR);
        }
    };

    let built = match build_model(&day, &toggles, &objective_cfg) {
        Ok(built) => built,
        Err(ScheduleError::ModelBuild { reason }) => {
            log::warn!("day {}: nothing to schedule ({reason}), returning an empty solution", day.day);
            let materialized = solution::empty(&day.day);
            println!("{}", materialized.table);
            std::process::exit(EXIT_OPTIMAL);
        }
        Err(err) => {
            eprintln!("model build error: {err}");
            std::process::exit(EXIT_INPUT_VALIDATION_ERROR);
        }
    };
    let index = built.index.clone();

    let outcome = match solve_day(built, &day, &toggles, &solver_cfg) {
        Ok(outcome) => outcome,
        Err(err) => {
            eprintln!("solver error: {err}");
            std::process::exit(EXIT_SOLVER_ERROR);
        }
    };

    match outcome.status {
        SolveStatus::Optimal | SolveStatus::Feasible => {
            let values = outcome.values.unwrap_or_default();
            let materialized = materialize(&day.day, &index, &values);
            for warning in &materialized.warnings {
                log::warn!(
                    "solution warning: block {} staff {}: {}",
                    warning.time_block,
                    warning.staff,
                    warning.message
                );
            }
            println!("{}", materialized.table);
            std::process::exit(EXIT_OPTIMAL);
        }
        SolveStatus::Infeasible | SolveStatus::Unbounded => {
            eprintln!("day {} did not produce a usable schedule: {:?}", day.day, outcome.status);
            std::process::exit(EXIT_INFEASIBLE_OR_UNBOUNDED);
        }
        SolveStatus::Error => {
            eprintln!("solver backend faulted for day {}", day.day);
            std::process::exit(EXIT_SOLVER_ERROR);
        }
    }
}

fn read_request(path: PathBuf) -> Result<DayRequest> {
    let contents = std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parsing {}", path.display()))
}
