//! Configuration inputs to the model-builder pipeline.
//!
//! Two maps drive the pipeline: which constraint subfamilies are active, and
//! how much each staff role is rewarded per child-hour in the objective.
//! Both are plain `serde`-deserializable structs so a CLI edge can load them
//! from TOML.

use std::collections::HashMap;

/// One entry per toggleable constraint subfamily, plus `junior_staff`
/// (optional, off by default).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ConstraintToggles {
    pub center_hours: bool,
    pub staff_child: bool,
    pub one_place_per_time: bool,
    pub lunch: bool,
    pub pto: bool,
    pub parent_training: bool,
    pub team_meeting: bool,
    pub nap_time: bool,
    pub speech_therapy: bool,
    pub arrival_departure: bool,
    pub junior_staff: bool,
}

impl Default for ConstraintToggles {
    fn default() -> Self {
        Self {
            center_hours: true,
            staff_child: true,
            one_place_per_time: true,
            lunch: true,
            pto: true,
            parent_training: true,
            team_meeting: true,
            nap_time: true,
            speech_therapy: true,
            arrival_departure: true,
            junior_staff: false,
        }
    }
}

/// `reward_for_child_staff_role`: role name -> objective coefficient.
/// Unknown roles or roles with no staff left after filtering against
/// `STAFF_CHILD` simply contribute nothing to the objective.
///
/// The double-coverage and staff-switch penalties are not part of this
/// struct: they are fixed coefficients of the objective's definition, not
/// tunable inputs, so they live as constants next to where the objective is
/// built (`model::objective`) rather than as deserializable fields a caller
/// could zero out.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ObjectiveConfig {
    pub reward_for_child_staff_role: HashMap<String, f64>,
    /// Weight for the optional "child has no staff" indicator. `None` means
    /// the indicator is not built at all — it is dead weight in the model
    /// otherwise.
    pub no_staff_penalty: Option<f64>,
}

impl ObjectiveConfig {
    pub fn new(reward_for_child_staff_role: HashMap<String, f64>) -> Self {
        Self { reward_for_child_staff_role, no_staff_penalty: None }
    }
}

/// Solver backend selection.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SolverConfig {
    /// Backend identifier: `"cbc"` (default) or `"glpk"`.
    pub backend: String,
    pub threads: u32,
    pub relative_gap: f64,
    pub heuristics: bool,
    /// Optional override of the backend executable location. Falls back to
    /// the `SOLVER_PATH` environment variable when unset.
    pub solver_path: Option<String>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            backend: "cbc".to_string(),
            threads: 4,
            relative_gap: 0.01,
            heuristics: true,
            solver_path: None,
        }
    }
}

impl SolverConfig {
    /// Resolve the executable path: explicit config wins, then `SOLVER_PATH`,
    /// then `None` (let the backend crate find it on `PATH`).
    pub fn resolved_solver_path(&self) -> Option<String> {
        self.solver_path
            .clone()
            .or_else(|| std::env::var("SOLVER_PATH").ok())
    }
}
