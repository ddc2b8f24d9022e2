//! Raw input table shapes.
//!
//! These are the typed Rust equivalents of the four primary tables. Getting
//! them onto the wire (CSV/spreadsheet upload, JSON body, whatever the
//! ingestion layer uses) is out of scope — this crate only consumes
//! already-parsed rows.

use crate::time::RawTime;

/// One row of `CenterHours`: opening times for a single weekday.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CenterHoursRow {
    pub day: String,
    pub open: RawTime,
    pub close: RawTime,
}

/// One allowed `(Child, Staff)` pairing, already in long form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct StaffChildPair {
    pub child: String,
    pub staff: String,
}

/// `StaffChild` as it is commonly authored: a Child x Staff matrix where a
/// non-empty cell means the pairing is allowed. Melted into long form by
/// [`crate::input::normalize::widen_staff_child`].
#[derive(Debug, Clone, Default)]
pub struct StaffChildMatrix {
    pub children: Vec<String>,
    /// One entry per staff column: the staff name and one cell per child
    /// (same order as `children`), `None`/empty meaning "not allowed".
    pub columns: Vec<(String, Vec<Option<String>>)>,
}

/// One row of `Absences`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AbsenceRow {
    pub name: String,
    /// `None` applies to every day.
    pub day: Option<String>,
    pub r#type: String,
    pub start: Option<RawTime>,
    pub end: Option<RawTime>,
}

/// One row of `Roles`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RoleRow {
    pub name: String,
    pub role: String,
}

/// Roles that are allowed with every child regardless of `StaffChild`.
pub const UNIVERSAL_ROLES: [&str; 3] = ["SBT", "TS", "BS"];

/// Roles that make a staff member "junior".
pub const JUNIOR_ROLES: [&str; 2] = ["Tech", "SBT"];

/// Canonicalize a name: strip leading/trailing whitespace, then remove all
/// interior ASCII spaces and underscores.
///
/// Idempotent by construction: the output contains no spaces or
/// underscores, so a second pass is a no-op.
pub fn canonicalize_name(name: &str) -> String {
    name.trim().chars().filter(|c| *c != ' ' && *c != '_').collect()
}
