//! Indicator Layer.
//!
//! Three binary indicator families linearize otherwise-nonlinear objective
//! terms. Each pairs a [`good_lp::Variable`] (added to the problem before the
//! objective is built) with one or two inequality rows (added afterward, once
//! a concrete [`good_lp::SolverModel`] exists) that pin it to the right value
//! at any optimum — none of them are ever forced to their "true" value by an
//! equality; the objective's own sign does that work.

use std::collections::HashMap;

use good_lp::{variable, Expression, ProblemVariables, SolverModel, Variable};

use crate::config::ObjectiveConfig;
use crate::error::ScheduleResult;
use crate::model::variables::VariableIndex;
use crate::time::TimeBlock;

/// `(time_block, child)` or `(time_block, staff)` depending on the family.
pub type IndicatorKey = (TimeBlock, String);

/// Every indicator variable family, plus the row constraints binding each to
/// `X` (added separately by [`add_indicator_constraints`] once the solver
/// backend is known).
pub struct Indicators {
    /// `z_child_2_staff[t, c]`: 1 whenever two staff are on the same child at
    /// the same time.
    pub child_2_staff: HashMap<IndicatorKey, Variable>,
    /// `z_switch[t, s]`: 1 whenever staff `s` is assigned to different
    /// children across consecutive blocks `t` and `t+1`.
    pub switch: HashMap<IndicatorKey, Variable>,
    /// `z_child_no_staff[t, c]`: 1 whenever a child has no staff assigned.
    /// Only built when [`ObjectiveConfig::no_staff_penalty`] is set — an
    /// unused indicator with no objective coefficient is dead weight in the
    /// model, so it is omitted entirely rather than built and ignored.
    pub child_no_staff: Option<HashMap<IndicatorKey, Variable>>,
}

/// Add every indicator variable the objective will reference. Must run
/// before the objective expression is built, and before `vars` is consumed
/// by `.maximise()`/`.using()`.
pub fn build_indicator_vars(idx: &VariableIndex, vars: &mut ProblemVariables, objective: &ObjectiveConfig) -> Indicators {
    let mut child_2_staff = HashMap::new();
    for t in idx.time_blocks.clone() {
        for child in idx.child_names() {
            child_2_staff.insert((t, child), vars.add(variable().binary()));
        }
    }

    let mut switch = HashMap::new();
    for t in idx.time_blocks.clone() {
        for staff in idx.staff_names() {
            switch.insert((t, staff), vars.add(variable().binary()));
        }
    }

    let child_no_staff = objective.no_staff_penalty.map(|_| {
        let mut map = HashMap::new();
        for t in idx.time_blocks.clone() {
            for child in idx.child_names() {
                map.insert((t, child), vars.add(variable().binary()));
            }
        }
        map
    });

    Indicators { child_2_staff, switch, child_no_staff }
}

/// Attach the rows that tie each indicator variable to the `X` family it linearizes.
pub fn add_indicator_constraints<M: SolverModel>(mut problem: M, idx: &VariableIndex, indicators: &Indicators) -> ScheduleResult<M> {
    for t in idx.time_blocks.clone() {
        for child in idx.child_names() {
            let n_staff: Expression = idx
                .staff_names()
                .iter()
                .filter_map(|staff| idx.get(t, &child, staff))
                .sum();
            let z: Expression = indicators.child_2_staff[&(t, child.clone())].into();
            problem = problem.with((n_staff.clone()).leq(z + 1.0));

            if let Some(child_no_staff) = &indicators.child_no_staff {
                let z_no: Expression = child_no_staff[&(t, child.clone())].into();
                // n_staff >= 1 - z_no  <=>  n_staff + z_no >= 1
                problem = problem.with((n_staff + z_no).geq(1.0));
            }
        }
    }

    for t in idx.time_blocks.clone() {
        let next = t + 1;
        if next >= idx.time_blocks.end {
            continue;
        }
        for staff in idx.staff_names() {
            let z: Expression = indicators.switch[&(t, staff.clone())].into();
            for child in idx.child_names() {
                let (Some(here), Some(there)) = (idx.get(t, &child, &staff), idx.get(next, &child, &staff)) else {
                    continue;
                };
                let diff: Expression = Expression::from(here) - Expression::from(there);
                problem = problem.with(diff.clone().leq(z.clone()));
                problem = problem.with((diff * -1.0).leq(z.clone()));
            }
        }
    }

    Ok(problem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{normalize_day, CenterHoursRow, RoleRow, StaffChildPair};
    use crate::model::variables::build_variables;
    use crate::time::RawTime;
    use std::collections::HashSet;

    fn hm(h: u32, m: u32) -> RawTime {
        RawTime::HourMinute { hour: h, minute: m }
    }

    #[test]
    fn no_staff_indicator_is_omitted_when_unconfigured() {
        let center_hours = vec![CenterHoursRow { day: "Mon".into(), open: hm(9, 0), close: hm(10, 0) }];
        let mut pairs = HashSet::new();
        pairs.insert(StaffChildPair { child: "A".into(), staff: "s1".into() });
        let roles = vec![RoleRow { name: "s1".into(), role: "Tech".into() }];
        let day = normalize_day("Mon", &center_hours, pairs, &[], &roles).unwrap();

        let mut vars = ProblemVariables::new();
        let idx = build_variables(&day, &mut vars, &HashSet::new()).unwrap();
        let objective = ObjectiveConfig::new(HashMap::new());
        let indicators = build_indicator_vars(&idx, &mut vars, &objective);
        assert!(indicators.child_no_staff.is_none());
    }

    #[test]
    fn no_staff_indicator_is_built_when_configured() {
        let center_hours = vec![CenterHoursRow { day: "Mon".into(), open: hm(9, 0), close: hm(10, 0) }];
        let mut pairs = HashSet::new();
        pairs.insert(StaffChildPair { child: "A".into(), staff: "s1".into() });
        let roles = vec![RoleRow { name: "s1".into(), role: "Tech".into() }];
        let day = normalize_day("Mon", &center_hours, pairs, &[], &roles).unwrap();

        let mut vars = ProblemVariables::new();
        let idx = build_variables(&day, &mut vars, &HashSet::new()).unwrap();
        let mut objective = ObjectiveConfig::new(HashMap::new());
        objective.no_staff_penalty = Some(0.5);
        let indicators = build_indicator_vars(&idx, &mut vars, &objective);
        assert!(indicators.child_no_staff.is_some());
        assert_eq!(indicators.child_no_staff.unwrap().len(), 2); // 2 time blocks x 1 child
    }

    #[test]
    fn indicator_counts_match_time_blocks() {
        let center_hours = vec![CenterHoursRow { day: "Mon".into(), open: hm(9, 0), close: hm(10, 0) }];
        let mut pairs = HashSet::new();
        pairs.insert(StaffChildPair { child: "A".into(), staff: "s1".into() });
        let roles = vec![RoleRow { name: "s1".into(), role: "Tech".into() }];
        let day = normalize_day("Mon", &center_hours, pairs, &[], &roles).unwrap();

        let mut vars = ProblemVariables::new();
        let idx = build_variables(&day, &mut vars, &HashSet::new()).unwrap();
        let objective = ObjectiveConfig::new(HashMap::new());
        let indicators = build_indicator_vars(&idx, &mut vars, &objective);
        assert_eq!(indicators.child_2_staff.len(), 2);
        assert_eq!(indicators.switch.len(), 2);
    }
}
