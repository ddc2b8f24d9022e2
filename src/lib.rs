//! # Center Staffing Scheduler — Core
//!
//! The per-day mixed-integer program that assigns staff to children in
//! half-hour blocks for a therapy/childcare center, subject to calendar,
//! capacity, role, and availability constraints, optimizing a
//! reward-weighted objective.
//!
//! This crate is the model-builder pipeline only: variable index
//! construction, the constraint families, the indicator variables that
//! linearize nonlinear penalties, the objective, the solver invocation, and
//! the tabular materialization of a solved day. The spreadsheet/CSV
//! ingestion layer, the browser UI, and the per-day orchestration shell that
//! wires five of these together are thin glue that lives outside this
//! crate; `orchestrate` only documents the bounded-concurrency shape that
//! glue should follow.
//!
//! ## Pipeline stages
//!
//! - [`input`]: raw table shapes and the Input Normalizer (name
//!   canonicalization, time parsing, day-scoped filtering).
//! - [`time`]: half-hour time-block indexing shared by every stage.
//! - [`model`]: the Variable Index Builder, Hard Constraint Layer, Indicator
//!   Layer, and Objective Builder — one `build_model` call per day.
//! - [`solver`]: hands the assembled model to a MIP backend (`cbc`/`glpk`)
//!   and reports termination as data.
//! - [`solution`]: converts solved variable values into the wide per-day
//!   result table.
//! - [`orchestrate`]: the bounded-concurrency day runner.
//! - [`config`]: the two configuration maps (constraint toggles, role
//!   rewards) and solver backend selection.
//! - [`error`]: the crate-wide error type.
//!
//! ## Example
//!
//! ```no_run
//! use center_scheduling_core::config::{ConstraintToggles, ObjectiveConfig, SolverConfig};
//! use center_scheduling_core::input::{normalize_day, CenterHoursRow, RoleRow, StaffChildPair};
//! use center_scheduling_core::model::build_model;
//! use center_scheduling_core::solver::solve_day;
//! use center_scheduling_core::solution::materialize;
//! use center_scheduling_core::time::RawTime;
//! use std::collections::{HashMap, HashSet};
//!
//! let center_hours = vec![CenterHoursRow {
//!     day: "Mon".into(),
//!     open: RawTime::HourMinute { hour: 9, minute: 0 },
//!     close: RawTime::HourMinute { hour: 10, minute: 0 },
//! }];
//! let mut pairs = HashSet::new();
//! pairs.insert(StaffChildPair { child: "A".into(), staff: "s1".into() });
//! let roles = vec![RoleRow { name: "s1".into(), role: "Tech".into() }];
//!
//! let day = normalize_day("Mon", &center_hours, pairs, &[], &roles).unwrap();
//! let toggles = ConstraintToggles::default();
//! let mut rewards = HashMap::new();
//! rewards.insert("Tech".to_string(), 1.0);
//! let objective_cfg = ObjectiveConfig::new(rewards);
//!
//! let built = build_model(&day, &toggles, &objective_cfg).unwrap();
//! let index = built.index.clone();
//! let outcome = solve_day(built, &day, &toggles, &SolverConfig::default()).unwrap();
//! let table = materialize(&day.day, &index, &outcome.values.unwrap_or_default());
//! println!("{}", table.table);
//! ```

pub mod config;
pub mod error;
pub mod input;
pub mod model;
pub mod orchestrate;
pub mod solution;
pub mod solver;
pub mod time;
