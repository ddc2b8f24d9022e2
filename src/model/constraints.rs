//! Hard Constraint Layer.
//!
//! Two kinds of hard constraint exist here. Fixings (center hours, every
//! absence type) remove variables from the feasible region by bounding them
//! to `{0}` before the solver ever sees them — cheaper for presolve than an
//! equality row. Everything else (one-place-per-time, lunch, the optional
//! junior-staff cap) genuinely needs a row, since it relates several
//! variables rather than pinning one.
//!
//! Staff-child eligibility has no code here at all: the Variable Index
//! Builder already never creates a variable for an ineligible pair, so the
//! constraint is structurally satisfied. The `staff_child` toggle in
//! [`crate::config::ConstraintToggles`] is kept only for symmetry with the
//! others; it has no effect either way.

use std::collections::HashSet;

use good_lp::{Expression, SolverModel};

use crate::config::ConstraintToggles;
use crate::error::ScheduleResult;
use crate::input::NormalizedDay;
use crate::model::variables::{VarKey, VariableIndex};
use crate::time::{self, TimeBlock};

/// Lunch window: `[11:30, 14:00)`, i.e. blocks `23..28`.
const LUNCH_WINDOW: (TimeBlock, TimeBlock) = (23, 28);

/// Which side of a `(child, staff)` pair an absence type pins.
enum AbsenceScope {
    /// Fixes every pair where `staff == absence.name` (PTO).
    Staff,
    /// Fixes every pair where `child == absence.name` (parent training, nap,
    /// speech, arrival/departure).
    Child,
    /// Fixes every pair in `STAFF_CHILD` regardless of name (team meeting:
    /// the whole center stops).
    Everyone,
}

/// Compute every `(t, c, s)` key the Hard Constraint Layer fixes to zero.
///
/// Returned as a plain key set rather than applied directly, so the
/// Variable Index Builder can bound those variables to `{0}` at creation
/// time instead of adding rows for them afterward.
pub fn compute_fixed_zero(day: &NormalizedDay, toggles: &ConstraintToggles) -> HashSet<VarKey> {
    let mut fixed = HashSet::new();

    if toggles.center_hours {
        fix_center_hours_gaps(day, &mut fixed);
    }

    let absence_rules: [(&str, bool, AbsenceScope); 6] = [
        ("pto", toggles.pto, AbsenceScope::Staff),
        ("parent training", toggles.parent_training, AbsenceScope::Child),
        ("team meeting", toggles.team_meeting, AbsenceScope::Everyone),
        ("nap", toggles.nap_time, AbsenceScope::Child),
        ("speech", toggles.speech_therapy, AbsenceScope::Child),
        ("late arrival", toggles.arrival_departure, AbsenceScope::Child),
        // "leaves early" shares the same scope/handling as "late arrival";
        // both are matched below via a prefix check rather than two entries.
    ];

    for (kind, enabled, scope) in &absence_rules {
        if *enabled {
            fix_absence_kind(day, kind, scope, &mut fixed);
        }
    }
    if toggles.arrival_departure {
        fix_absence_kind(day, "leaves early", &AbsenceScope::Child, &mut fixed);
    }

    fixed
}

/// Fix every `(t, c, s)` where `t` falls in a gap between this day's
/// `CenterHours` rows. Vacuous for the common case of a single row per day,
/// since then `TIME_BLOCKS` already equals the one interval; only matters
/// for a day with more than one row.
fn fix_center_hours_gaps(day: &NormalizedDay, fixed: &mut HashSet<VarKey>) {
    for t in day.open_idx..day.close_idx {
        let covered = day
            .center_hours_intervals
            .iter()
            .any(|&(open, close)| t >= open && t < close);
        if !covered {
            for pair in &day.staff_child {
                fixed.insert((t, pair.child.clone(), pair.staff.clone()));
            }
        }
    }
}

fn fix_absence_kind(day: &NormalizedDay, kind: &str, scope: &AbsenceScope, fixed: &mut HashSet<VarKey>) {
    for absence in day.absences.iter().filter(|a| a.kind == kind) {
        let start = match time::parse_time_or_default(absence.start.as_ref(), day.open_idx) {
            Ok(v) => v,
            Err(_) => continue,
        };
        let end = match time::parse_time_or_default(absence.end.as_ref(), day.close_idx) {
            Ok(v) => v,
            Err(_) => continue,
        };
        let (start, end) = time::clamp_interval(start, end, day.open_idx, day.close_idx);
        if start >= end {
            continue;
        }

        let matches = |pair: &crate::input::StaffChildPair| match scope {
            AbsenceScope::Staff => pair.staff == absence.name,
            AbsenceScope::Child => pair.child == absence.name,
            AbsenceScope::Everyone => true,
        };

        for t in start..end {
            for pair in day.staff_child.iter().filter(|p| matches(p)) {
                fixed.insert((t, pair.child.clone(), pair.staff.clone()));
            }
        }
    }
}

/// Attach the row constraints that cannot be expressed as variable fixings:
/// one-place-per-time, lunch, and the optional junior-staff cap.
pub fn add_row_constraints<M: SolverModel>(
    mut problem: M,
    idx: &VariableIndex,
    day: &NormalizedDay,
    toggles: &ConstraintToggles,
) -> ScheduleResult<M> {
    if toggles.one_place_per_time {
        for t in idx.time_blocks.clone() {
            for staff in idx.staff_names() {
                let sum: Expression = idx
                    .child_names()
                    .iter()
                    .filter_map(|child| idx.get(t, child, &staff))
                    .sum();
                problem = problem.with(sum.leq(1.0));
            }
        }
    }

    if toggles.lunch {
        let (lunch_start, lunch_end) = LUNCH_WINDOW;
        let start = lunch_start.max(idx.time_blocks.start);
        let end = lunch_end.min(idx.time_blocks.end);
        if start < end {
            let span = end - start;
            let children = idx.child_names();
            for staff in idx.staff_names() {
                let mut sum = Expression::from(0.0);
                for t in start..end {
                    for child in &children {
                        if let Some(v) = idx.get(t, child, &staff) {
                            sum = sum + v;
                        }
                    }
                }
                problem = problem.with(sum.leq((span - 1) as f64));
            }
        }
    }

    if toggles.junior_staff {
        let junior = day.junior_staff();
        if !junior.is_empty() {
            for t in idx.time_blocks.clone() {
                for child in idx.child_names() {
                    let sum: Expression = junior
                        .iter()
                        .filter_map(|staff| idx.get(t, &child, staff))
                        .sum();
                    problem = problem.with(sum.leq(1.0));
                }
            }
        }
    }

    Ok(problem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{normalize_day, CenterHoursRow, RoleRow, StaffChildPair};
    use crate::time::RawTime;
    use std::collections::HashSet as Set;

    fn hm(h: u32, m: u32) -> RawTime {
        RawTime::HourMinute { hour: h, minute: m }
    }

    #[test]
    fn center_hours_gap_is_vacuous_for_single_row_days() {
        let center_hours = vec![CenterHoursRow { day: "Mon".into(), open: hm(9, 0), close: hm(10, 0) }];
        let mut pairs = Set::new();
        pairs.insert(StaffChildPair { child: "A".into(), staff: "s1".into() });
        let roles = vec![RoleRow { name: "s1".into(), role: "Tech".into() }];
        let day = normalize_day("Mon", &center_hours, pairs, &[], &roles).unwrap();

        let toggles = ConstraintToggles::default();
        let fixed = compute_fixed_zero(&day, &toggles);
        assert!(fixed.is_empty());
    }

    #[test]
    fn center_hours_gap_fixes_variables_in_the_gap() {
        let center_hours = vec![
            CenterHoursRow { day: "Mon".into(), open: hm(9, 0), close: hm(10, 0) },
            CenterHoursRow { day: "Mon".into(), open: hm(11, 0), close: hm(12, 0) },
        ];
        let mut pairs = Set::new();
        pairs.insert(StaffChildPair { child: "A".into(), staff: "s1".into() });
        let roles = vec![RoleRow { name: "s1".into(), role: "Tech".into() }];
        let day = normalize_day("Mon", &center_hours, pairs, &[], &roles).unwrap();
        assert_eq!(day.open_idx, 18);
        assert_eq!(day.close_idx, 24);

        let toggles = ConstraintToggles::default();
        let fixed = compute_fixed_zero(&day, &toggles);
        // blocks 20, 21 (10:00-11:00) fall in the gap between the two rows.
        assert!(fixed.contains(&(20, "A".to_string(), "s1".to_string())));
        assert!(fixed.contains(&(21, "A".to_string(), "s1".to_string())));
        assert!(!fixed.contains(&(18, "A".to_string(), "s1".to_string())));
        assert!(!fixed.contains(&(22, "A".to_string(), "s1".to_string())));
    }

    #[test]
    fn pto_fixes_only_the_named_staff() {
        use crate::input::AbsenceRow;
        let center_hours = vec![CenterHoursRow { day: "Mon".into(), open: hm(9, 0), close: hm(12, 0) }];
        let mut pairs = Set::new();
        pairs.insert(StaffChildPair { child: "A".into(), staff: "s1".into() });
        pairs.insert(StaffChildPair { child: "A".into(), staff: "s2".into() });
        let roles = vec![
            RoleRow { name: "s1".into(), role: "Tech".into() },
            RoleRow { name: "s2".into(), role: "Tech".into() },
        ];
        let absences = vec![AbsenceRow {
            name: "s1".into(),
            day: None,
            r#type: "PTO".into(),
            start: Some(hm(9, 0)),
            end: Some(hm(10, 0)),
        }];
        let day = normalize_day("Mon", &center_hours, pairs, &absences, &roles).unwrap();

        let toggles = ConstraintToggles::default();
        let fixed = compute_fixed_zero(&day, &toggles);
        assert!(fixed.contains(&(18, "A".to_string(), "s1".to_string())));
        assert!(!fixed.contains(&(18, "A".to_string(), "s2".to_string())));
    }

    #[test]
    fn disabled_toggle_skips_fixing() {
        use crate::input::AbsenceRow;
        let center_hours = vec![CenterHoursRow { day: "Mon".into(), open: hm(9, 0), close: hm(12, 0) }];
        let mut pairs = Set::new();
        pairs.insert(StaffChildPair { child: "A".into(), staff: "s1".into() });
        let roles = vec![RoleRow { name: "s1".into(), role: "Tech".into() }];
        let absences = vec![AbsenceRow {
            name: "s1".into(),
            day: None,
            r#type: "PTO".into(),
            start: Some(hm(9, 0)),
            end: Some(hm(10, 0)),
        }];
        let day = normalize_day("Mon", &center_hours, pairs, &absences, &roles).unwrap();

        let mut toggles = ConstraintToggles::default();
        toggles.pto = false;
        let fixed = compute_fixed_zero(&day, &toggles);
        assert!(fixed.is_empty());
    }
}
