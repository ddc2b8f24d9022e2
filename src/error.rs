//! Crate-wide error types.
//!
//! Each pipeline stage returns a typed `Result` and short-circuits on the
//! first non-`Ok` status; there is no exception-style control flow past the
//! stage boundary (see the solver driver for how infeasibility is reported
//! as data rather than as an error).

/// Result alias used throughout the model-builder pipeline.
pub type ScheduleResult<T> = Result<T, ScheduleError>;

/// Errors raised while normalizing inputs, building the model, or solving it.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    /// A required column was absent from an input table.
    #[error("missing required column `{column}` in table `{table}`")]
    MissingColumn { table: &'static str, column: &'static str },

    /// A time value could not be parsed by any of the accepted formats.
    #[error("could not parse time value: {0:?}")]
    UnparseableTime(String),

    /// Names appear in `STAFF_CHILD` that are absent from `Roles` (invariant I3).
    #[error("staff names present in STAFF_CHILD but missing from Roles: {missing_names:?}")]
    InputValidation { missing_names: Vec<String> },

    /// The model has no time blocks or no eligible staff-child pairs to build variables over.
    #[error("cannot build model: {reason}")]
    ModelBuild { reason: &'static str },

    /// The solver backend itself faulted (process error, unsupported option, unknown status).
    #[error("solver backend error: {0}")]
    Solver(String),
}
