//! 提前期與凍結期檢查

use chrono::{Duration, NaiveDateTime};
use fcs_core::dates::saturating_add;
use fcs_core::{PlanId, ResolveState, Result, Schedule, SolverConfig};
use rust_decimal::Decimal;

/// 提前期／凍結期檢查
///
/// 回傳作業計劃是否仍符合限制。檢查可以順帶修改回覆的日期與數量，
/// 也可以把作業計劃移到允許的最早日期。
pub trait LeadTimeCheck {
    fn check(
        &self,
        schedule: &mut Schedule,
        plan: PlanId,
        state: &mut ResolveState,
        allow_late: bool,
    ) -> Result<bool>;
}

/// 不做任何限制
#[derive(Debug, Clone, Copy, Default)]
pub struct NoConstraint;

impl LeadTimeCheck for NoConstraint {
    fn check(
        &self,
        _schedule: &mut Schedule,
        _plan: PlanId,
        _state: &mut ResolveState,
        _allow_late: bool,
    ) -> Result<bool> {
        Ok(true)
    }
}

/// 以計劃當前日期與凍結期決定最早允許的開始日期
#[derive(Debug, Clone, Copy)]
pub struct PlanningFence {
    threshold: NaiveDateTime,
}

impl PlanningFence {
    /// 提前期限制時以 `current` 為下限，凍結期限制時再加上 `fence`
    pub fn new(config: &SolverConfig, current: NaiveDateTime, fence: Duration) -> Self {
        let threshold = if config.fence_constrained {
            saturating_add(current, fence)
        } else if config.leadtime_constrained {
            current
        } else {
            fcs_core::INFINITE_PAST
        };
        Self { threshold }
    }

    /// 最早允許的開始日期
    pub fn threshold(&self) -> NaiveDateTime {
        self.threshold
    }
}

impl LeadTimeCheck for PlanningFence {
    fn check(
        &self,
        schedule: &mut Schedule,
        plan: PlanId,
        state: &mut ResolveState,
        allow_late: bool,
    ) -> Result<bool> {
        let current = schedule.plan(plan)?;
        if current.start >= self.threshold {
            return Ok(true);
        }

        // 移到最早允許的開始日期
        let quantity = current.quantity;
        schedule.set_plan_parameters(plan, quantity, Some(self.threshold), None)?;
        let moved = schedule.plan(plan)?;
        tracing::trace!(
            "作業計劃 {} 違反提前期／凍結期，移到 {} ~ {}",
            plan,
            moved.start,
            moved.end
        );

        state.answered_date = moved.end;
        if allow_late {
            return Ok(true);
        }
        state.answered_qty = Decimal::ZERO;
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fcs_core::{Load, Operation, Resource};
    use chrono::NaiveDate;

    fn hour(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 11, 3)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn fixture() -> (Schedule, PlanId, ResolveState) {
        let mut schedule = Schedule::new();
        let lathe = schedule.add_resource(Resource::finite("LATHE", Decimal::ONE));
        let turn = schedule
            .add_operation(
                Operation::fixed_time("TURN", Duration::hours(4))
                    .with_load(Load::new(lathe, Decimal::ONE)),
            )
            .unwrap();
        let plan = schedule.create_plan(turn, Decimal::ONE, hour(6)).unwrap();
        let mut state = ResolveState::for_load(&schedule, plan, lathe).unwrap();
        state.answered_qty = Decimal::ONE;
        (schedule, plan, state)
    }

    #[test]
    fn test_threshold_by_config() {
        let fence = Duration::hours(3);

        let both = PlanningFence::new(&SolverConfig::default(), hour(1), fence);
        assert_eq!(both.threshold(), hour(4));

        let leadtime_only = SolverConfig::default().with_fence_constrained(false);
        assert_eq!(PlanningFence::new(&leadtime_only, hour(1), fence).threshold(), hour(1));

        let none = SolverConfig::unconstrained();
        assert_eq!(
            PlanningFence::new(&none, hour(1), fence).threshold(),
            fcs_core::INFINITE_PAST
        );
    }

    #[test]
    fn test_plan_within_fence() {
        let (mut schedule, plan, mut state) = fixture();
        let check = PlanningFence::new(&SolverConfig::default(), hour(2), Duration::zero());

        assert!(check.check(&mut schedule, plan, &mut state, false).unwrap());
        assert_eq!(state.answered_qty, Decimal::ONE);
        assert_eq!(schedule.plan(plan).unwrap().start, hour(2));
    }

    #[test]
    fn test_plan_violating_fence_is_moved() {
        let (mut schedule, plan, mut state) = fixture();
        let check = PlanningFence::new(&SolverConfig::default(), hour(3), Duration::zero());

        assert!(!check.check(&mut schedule, plan, &mut state, false).unwrap());
        assert_eq!(state.answered_qty, Decimal::ZERO);
        assert_eq!(state.answered_date, hour(7));
        assert_eq!(schedule.plan(plan).unwrap().start, hour(3));
    }

    #[test]
    fn test_allow_late_keeps_quantity() {
        let (mut schedule, plan, mut state) = fixture();
        let check = PlanningFence::new(&SolverConfig::default(), hour(3), Duration::zero());

        assert!(check.check(&mut schedule, plan, &mut state, true).unwrap());
        assert_eq!(state.answered_qty, Decimal::ONE);
        assert_eq!(state.answered_date, hour(7));
    }

    #[test]
    fn test_no_constraint() {
        let (mut schedule, plan, mut state) = fixture();
        assert!(NoConstraint.check(&mut schedule, plan, &mut state, false).unwrap());
    }
}
