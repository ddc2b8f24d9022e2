//! Input tables and the Input Normalizer.

pub mod normalize;
pub mod tables;

pub use normalize::{normalize_day, staff_child_from_pairs, widen_staff_child, NormalizedAbsence, NormalizedDay};
pub use tables::{
    canonicalize_name, AbsenceRow, CenterHoursRow, RoleRow, StaffChildMatrix, StaffChildPair,
    JUNIOR_ROLES, UNIVERSAL_ROLES,
};
