//! Input Normalizer: canonicalize names, parse times, and scope every table
//! down to a single day.

use std::collections::{HashMap, HashSet};

use crate::error::{ScheduleError, ScheduleResult};
use crate::input::tables::{
    canonicalize_name, AbsenceRow, CenterHoursRow, RoleRow, StaffChildMatrix, StaffChildPair,
    JUNIOR_ROLES, UNIVERSAL_ROLES,
};
use crate::time::{self, TimeBlock};

/// An `Absences` row after normalization: canonical name, lowercased/trimmed
/// type, and a day filter already applied upstream.
#[derive(Debug, Clone)]
pub struct NormalizedAbsence {
    pub name: String,
    pub kind: String,
    pub start: Option<crate::time::RawTime>,
    pub end: Option<crate::time::RawTime>,
}

/// The per-day view of every input table, ready for the Variable Index
/// Builder to consume.
#[derive(Debug, Clone)]
pub struct NormalizedDay {
    pub day: String,
    pub open_idx: TimeBlock,
    pub close_idx: TimeBlock,
    /// Each `CenterHours` row for this day as a `[open, close)` interval.
    /// Usually a single interval spanning `[open_idx, close_idx)`, but a day
    /// with more than one row (e.g. a split morning/afternoon schedule)
    /// leaves a gap the center-hours constraint must close.
    pub center_hours_intervals: Vec<(TimeBlock, TimeBlock)>,
    /// The allowed `(Child, Staff)` set for this day, canonicalized and
    /// augmented with universal-role staff.
    pub staff_child: HashSet<StaffChildPair>,
    pub absences: Vec<NormalizedAbsence>,
    /// Canonical staff name -> role.
    pub roles: HashMap<String, String>,
}

impl NormalizedDay {
    /// Junior staff (roles Tech, SBT) restricted to staff actually appearing
    /// in `STAFF_CHILD`.
    pub fn junior_staff(&self) -> HashSet<String> {
        let staff_in_use: HashSet<&str> = self.staff_child.iter().map(|p| p.staff.as_str()).collect();
        self.roles
            .iter()
            .filter(|(_, role)| JUNIOR_ROLES.contains(&role.as_str()))
            .map(|(name, _)| name.clone())
            .filter(|name| staff_in_use.contains(name.as_str()))
            .collect()
    }

    /// Senior staff: everyone else in `Roles`, restricted the same way.
    pub fn senior_staff(&self) -> HashSet<String> {
        let staff_in_use: HashSet<&str> = self.staff_child.iter().map(|p| p.staff.as_str()).collect();
        self.roles
            .iter()
            .filter(|(_, role)| !JUNIOR_ROLES.contains(&role.as_str()))
            .map(|(name, _)| name.clone())
            .filter(|name| staff_in_use.contains(name.as_str()))
            .collect()
    }
}

/// Melt a Child x Staff matrix into long `(Child, Staff)` pairs, dropping
/// empty/null cells, then append universal-role staff for every child.
pub fn widen_staff_child(matrix: &StaffChildMatrix, roles: &[RoleRow]) -> HashSet<StaffChildPair> {
    let mut pairs = HashSet::new();
    for (staff, cells) in &matrix.columns {
        for (child, cell) in matrix.children.iter().zip(cells.iter()) {
            if let Some(value) = cell {
                if !value.trim().is_empty() {
                    pairs.insert(StaffChildPair {
                        child: canonicalize_name(child),
                        staff: canonicalize_name(staff),
                    });
                }
            }
        }
    }

    let universal_staff: Vec<String> = roles
        .iter()
        .filter(|r| UNIVERSAL_ROLES.contains(&r.role.as_str()))
        .map(|r| canonicalize_name(&r.name))
        .collect();
    let children: HashSet<String> = pairs.iter().map(|p| p.child.clone()).collect();
    for staff in &universal_staff {
        for child in &children {
            pairs.insert(StaffChildPair {
                child: child.clone(),
                staff: staff.clone(),
            });
        }
    }
    pairs
}

/// Build pairs directly from an already-long `StaffChild` table (an
/// alternative entry point to [`widen_staff_child`] when the ingestion layer
/// hands over long-form rows instead of a wide matrix).
pub fn staff_child_from_pairs(pairs: &[StaffChildPair], roles: &[RoleRow]) -> HashSet<StaffChildPair> {
    let mut out: HashSet<StaffChildPair> = pairs
        .iter()
        .map(|p| StaffChildPair {
            child: canonicalize_name(&p.child),
            staff: canonicalize_name(&p.staff),
        })
        .collect();

    let universal_staff: Vec<String> = roles
        .iter()
        .filter(|r| UNIVERSAL_ROLES.contains(&r.role.as_str()))
        .map(|r| canonicalize_name(&r.name))
        .collect();
    let children: HashSet<String> = out.iter().map(|p| p.child.clone()).collect();
    for staff in &universal_staff {
        for child in &children {
            out.insert(StaffChildPair {
                child: child.clone(),
                staff: staff.clone(),
            });
        }
    }
    out
}

/// Normalize every input table down to the view for a single `day`.
///
/// Fails with [`ScheduleError::InputValidation`] if any staff name present in
/// the resulting `STAFF_CHILD` set is absent from `Roles`.
pub fn normalize_day(
    day: &str,
    center_hours: &[CenterHoursRow],
    staff_child: HashSet<StaffChildPair>,
    absences: &[AbsenceRow],
    roles: &[RoleRow],
) -> ScheduleResult<NormalizedDay> {
    let day_rows: Vec<&CenterHoursRow> = center_hours.iter().filter(|r| r.day == day).collect();
    if day_rows.is_empty() {
        return Err(ScheduleError::ModelBuild {
            reason: "no CenterHours rows for the requested day",
        });
    }

    let mut open_idx = TimeBlock::MAX;
    let mut close_idx = TimeBlock::MIN;
    let mut center_hours_intervals = Vec::with_capacity(day_rows.len());
    for row in &day_rows {
        let row_open = time::time_to_index(&row.open)?;
        let row_close = time::time_to_index(&row.close)?;
        open_idx = open_idx.min(row_open);
        close_idx = close_idx.max(row_close);
        center_hours_intervals.push((row_open, row_close));
    }

    let roles_by_name: HashMap<String, String> = roles
        .iter()
        .map(|r| (canonicalize_name(&r.name), r.role.clone()))
        .collect();

    let missing_names: Vec<String> = staff_child
        .iter()
        .map(|p| p.staff.clone())
        .collect::<HashSet<_>>()
        .into_iter()
        .filter(|staff| !roles_by_name.contains_key(staff))
        .collect();
    if !missing_names.is_empty() {
        return Err(ScheduleError::InputValidation { missing_names });
    }

    let absences = absences
        .iter()
        .filter(|row| row.day.as_deref().is_none() || row.day.as_deref() == Some(day))
        .map(|row| NormalizedAbsence {
            name: canonicalize_name(&row.name),
            kind: row.r#type.trim().to_lowercase(),
            start: row.start.clone(),
            end: row.end.clone(),
        })
        .collect();

    Ok(NormalizedDay {
        day: day.to_string(),
        open_idx,
        close_idx,
        center_hours_intervals,
        staff_child,
        absences,
        roles: roles_by_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::RawTime;

    fn hm(h: u32, m: u32) -> RawTime {
        RawTime::HourMinute { hour: h, minute: m }
    }

    #[test]
    fn widen_drops_empty_cells_and_adds_universal_roles() {
        let matrix = StaffChildMatrix {
            children: vec!["A".into(), "B".into()],
            columns: vec![
                ("s1".into(), vec![Some("x".into()), None]),
                ("s2".into(), vec![None, Some("y".into())]),
            ],
        };
        let roles = vec![RoleRow { name: "sbt1".into(), role: "SBT".into() }];
        let pairs = widen_staff_child(&matrix, &roles);
        assert!(pairs.contains(&StaffChildPair { child: "A".into(), staff: "s1".into() }));
        assert!(pairs.contains(&StaffChildPair { child: "B".into(), staff: "s2".into() }));
        assert!(!pairs.contains(&StaffChildPair { child: "B".into(), staff: "s1".into() }));
        assert!(pairs.contains(&StaffChildPair { child: "A".into(), staff: "sbt1".into() }));
        assert!(pairs.contains(&StaffChildPair { child: "B".into(), staff: "sbt1".into() }));
    }

    #[test]
    fn sense_check_fails_on_missing_role() {
        let center_hours = vec![CenterHoursRow { day: "Mon".into(), open: hm(9, 0), close: hm(10, 0) }];
        let mut pairs = HashSet::new();
        pairs.insert(StaffChildPair { child: "A".into(), staff: "ghost".into() });
        let result = normalize_day("Mon", &center_hours, pairs, &[], &[]);
        match result {
            Err(ScheduleError::InputValidation { missing_names }) => {
                assert_eq!(missing_names, vec!["ghost".to_string()]);
            }
            other => panic!("expected InputValidation, got {other:?}"),
        }
    }

    #[test]
    fn day_filter_keeps_null_day_absences() {
        let center_hours = vec![CenterHoursRow { day: "Mon".into(), open: hm(9, 0), close: hm(10, 0) }];
        let mut pairs = HashSet::new();
        pairs.insert(StaffChildPair { child: "A".into(), staff: "s1".into() });
        let roles = vec![RoleRow { name: "s1".into(), role: "Tech".into() }];
        let absences = vec![
            AbsenceRow { name: "s1".into(), day: None, r#type: "PTO".into(), start: Some(hm(9, 0)), end: Some(hm(9, 30)) },
            AbsenceRow { name: "s1".into(), day: Some("Tue".into()), r#type: "PTO".into(), start: Some(hm(9, 0)), end: Some(hm(9, 30)) },
        ];
        let normalized = normalize_day("Mon", &center_hours, pairs, &absences, &roles).unwrap();
        assert_eq!(normalized.absences.len(), 1);
        assert_eq!(normalized.absences[0].kind, "pto");
    }
}
