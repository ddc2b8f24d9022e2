//! Objective Builder.
//!
//! Maximizes role-weighted child-staff coverage hours, penalized by the
//! two-staff and staff-switch indicators (and, when configured, the
//! no-staff indicator). Every term here is linear — the Indicator Layer
//! already did the work of keeping it that way.

use good_lp::Expression;

use crate::config::ObjectiveConfig;
use crate::input::NormalizedDay;
use crate::model::indicators::Indicators;
use crate::model::variables::VariableIndex;

/// Penalty per child-block with two or more staff assigned.
const DOUBLE_COVERAGE_PENALTY: f64 = 1.0;
/// Penalty per staff handoff between adjacent blocks.
const SWITCH_PENALTY: f64 = 0.1;

/// Build the objective expression to maximize.
pub fn build_objective(idx: &VariableIndex, day: &NormalizedDay, indicators: &Indicators, objective: &ObjectiveConfig) -> Expression {
    let mut expr = Expression::from(0.0);

    for (role, reward) in &objective.reward_for_child_staff_role {
        let relevant_staff: Vec<&str> = day
            .roles
            .iter()
            .filter(|(_, r)| r.eq_ignore_ascii_case(role))
            .map(|(name, _)| name.as_str())
            .collect();
        if relevant_staff.is_empty() {
            continue;
        }
        let role_hours: Expression = idx
            .index
            .iter()
            .filter(|(_, _, staff)| relevant_staff.contains(&staff.as_str()))
            .filter_map(|(t, child, staff)| idx.get(*t, child, staff))
            .sum();
        expr = expr + role_hours * *reward;
    }

    let double_coverage: Expression = indicators.child_2_staff.values().copied().sum();
    expr = expr - double_coverage * DOUBLE_COVERAGE_PENALTY;

    let switching: Expression = indicators.switch.values().copied().sum();
    expr = expr - switching * SWITCH_PENALTY;

    if let (Some(no_staff_penalty), Some(child_no_staff)) = (objective.no_staff_penalty, &indicators.child_no_staff) {
        let no_staff: Expression = child_no_staff.values().copied().sum();
        expr = expr - no_staff * no_staff_penalty;
    }

    expr
}
