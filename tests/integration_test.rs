//! 集成測試

use chrono::{Duration, NaiveDate, NaiveDateTime};
use fcs::fcs_core::{PlanId, ResourceId};
use fcs::fcs_report::{to_json, Bucket};
use fcs::prelude::*;
use rstest::rstest;

fn hour(h: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 11, 3)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        + Duration::hours(h)
}

fn dec(v: i64) -> Decimal {
    Decimal::from(v)
}

fn add_plan(
    schedule: &mut Schedule,
    resource: ResourceId,
    name: &str,
    load: i64,
    hours: i64,
    end: i64,
) -> PlanId {
    let op = schedule
        .add_operation(
            Operation::fixed_time(name, Duration::hours(hours))
                .with_load(Load::new(resource, dec(load))),
        )
        .unwrap();
    schedule.create_plan(op, Decimal::ONE, hour(end)).unwrap()
}

fn resolve(schedule: &mut Schedule, resource: ResourceId, plan: PlanId) -> ResolveState {
    let mut state = ResolveState::for_load(schedule, plan, resource).unwrap();
    CapacityResolver::new(SolverConfig::default(), &NoConstraint)
        .resolve(schedule, resource, &mut state)
        .unwrap();
    state
}

fn assert_within_capacity(schedule: &Schedule, resource: ResourceId) {
    let config = SolverConfig::default();
    let timeline = schedule.resource(resource).unwrap().timeline();
    for event in timeline.iter() {
        assert!(
            !config.exceeds(event.onhand(), event.max()),
            "{} 超載: {} > {}",
            event.date,
            event.onhand(),
            event.max()
        );
    }
}

#[test]
fn test_sequential_requests_stack_backwards() {
    fcs::logging::init_test();

    // 場景：四張相同的作業計劃都要求在 20:00 完成，資源只能同時做一張
    let mut schedule = Schedule::new();
    let oven = schedule.add_resource(
        Resource::finite("OVEN", dec(10))
            .with_cost(Decimal::ONE)
            .with_max_early(Duration::hours(48)),
    );

    let mut plans = Vec::new();
    for i in 0..4 {
        let plan = add_plan(&mut schedule, oven, &format!("BAKE-{}", i), 6, 4, 20);
        let state = resolve(&mut schedule, oven, plan);

        assert_eq!(state.answered_qty, dec(6));
        assert_within_capacity(&schedule, oven);
        plans.push(plan);
    }

    let mut ends: Vec<_> = plans
        .iter()
        .map(|p| schedule.plan(*p).unwrap().end)
        .collect();
    ends.sort();
    assert_eq!(ends, vec![hour(8), hour(12), hour(16), hour(20)]);

    assert!(detect_overloads(&schedule, &SolverConfig::default()).is_empty());

    let day = Bucket {
        start: hour(0),
        end: hour(24),
    };
    let rows = summarize(&schedule, &[day]).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].available, dec(240));
    assert_eq!(rows[0].load, dec(96));
    assert_eq!(rows[0].free, dec(144));
}

#[test]
fn test_retry_at_answered_date() {
    fcs::logging::init_test();

    let mut schedule = Schedule::new();
    let oven = schedule.add_resource(Resource::finite("OVEN", dec(10)));
    add_plan(&mut schedule, oven, "OTHER", 8, 10, 10);
    let plan = add_plan(&mut schedule, oven, "BAKE", 5, 10, 10);

    let first = resolve(&mut schedule, oven, plan);
    assert_eq!(first.answered_qty, Decimal::ZERO);
    assert!(first.answered_date > first.requested_date);
    assert_ne!(first.answered_date, INFINITE_FUTURE);

    // 外層求解器以回覆日期重新請求
    schedule
        .set_plan_parameters(plan, Decimal::ONE, None, Some(first.answered_date))
        .unwrap();
    let second = resolve(&mut schedule, oven, plan);

    assert_eq!(second.answered_qty, dec(5));
    assert!(schedule.plan(plan).unwrap().end >= first.answered_date);
    assert_within_capacity(&schedule, oven);
}

#[test]
fn test_grant_never_exceeds_request() {
    let mut schedule = Schedule::new();
    let oven = schedule.add_resource(
        Resource::finite("OVEN", dec(10)).with_max_early(Duration::hours(6)),
    );
    add_plan(&mut schedule, oven, "OTHER", 7, 12, 24);

    for (load, end) in [(3, 20), (4, 18), (9, 24), (1, 30)] {
        let plan = add_plan(&mut schedule, oven, "BAKE", load, 2, end);
        let state = resolve(&mut schedule, oven, plan);

        assert!(state.answered_qty >= Decimal::ZERO);
        assert!(state.answered_qty <= state.requested_load());
        if state.answered_qty.is_zero() {
            assert_ne!(state.answered_date, state.requested_date);
        } else {
            assert_within_capacity(&schedule, oven);
        }
    }
}

#[test]
fn test_setup_travels_with_plan_and_exports() {
    fcs::logging::init_test();

    let mut schedule = Schedule::new();
    let press = schedule.add_resource(
        Resource::finite("PRESS", dec(2))
            .with_max_early(Duration::hours(24))
            .with_setup_matrix("COLORS"),
    );
    let blue = schedule
        .add_operation(
            Operation::fixed_time("BLUE", Duration::hours(2))
                .with_load(Load::new(press, Decimal::ONE).with_setup("BLUE")),
        )
        .unwrap();
    schedule.create_plan(blue, Decimal::ONE, hour(8)).unwrap();

    let paint = schedule
        .add_operation(
            Operation::fixed_time("PAINT", Duration::hours(2))
                .with_load(Load::new(press, Decimal::ONE).with_setup("RED")),
        )
        .unwrap();
    let changeover = schedule
        .add_operation(
            Operation::setup("CHANGEOVER", Duration::hours(1))
                .with_load(Load::new(press, Decimal::ONE)),
        )
        .unwrap();
    let main = schedule.create_plan(paint, Decimal::ONE, hour(10)).unwrap();
    let setup = schedule
        .chain_setup(main, changeover, "RED", Decimal::ZERO)
        .unwrap();

    let state = resolve(&mut schedule, press, main);
    assert_eq!(state.answered_qty, Decimal::ONE);

    // 換線緊貼主作業，且不與其他換線代碼的負載重疊
    let main_plan = schedule.plan(main).unwrap();
    let setup_plan = schedule.plan(setup).unwrap();
    assert_eq!(setup_plan.end, main_plan.start);
    assert!(setup_plan.end <= hour(6) || setup_plan.start >= hour(8));

    let rows = export_load_plans(&schedule).unwrap();
    let red: Vec<_> = rows
        .iter()
        .filter(|r| r.setup.as_deref() == Some("RED"))
        .collect();
    assert_eq!(red.len(), 2);
    assert!(red.iter().any(|r| r.enddate == main_plan.start));

    let json: serde_json::Value = serde_json::from_str(&to_json(&rows).unwrap()).unwrap();
    let codes: Vec<_> = json
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|row| row["setup"].as_str())
        .collect();
    assert_eq!(codes.iter().filter(|c| **c == "RED").count(), 2);
    assert!(codes.contains(&"BLUE"));
}

#[test]
fn test_planning_fence_with_late_allowed() {
    let mut schedule = Schedule::new();
    let oven = schedule.add_resource(Resource::finite("OVEN", dec(10)));
    let plan = add_plan(&mut schedule, oven, "BAKE", 5, 4, 6);

    let config = SolverConfig::default().with_fence_constrained(true);
    let fence = PlanningFence::new(&config, hour(0), Duration::hours(4));
    let mut state = ResolveState::for_load(&schedule, plan, oven).unwrap();

    assert!(fence.check(&mut schedule, plan, &mut state, true).unwrap());
    assert_eq!(schedule.plan(plan).unwrap().start, hour(4));
    assert_eq!(state.answered_date, hour(8));
}

/// 單一烤箱（產能 10），請求 5 單位、10 小時、原本結束於 10:00
#[rstest]
#[case::no_capacity_anywhere(Some((10, 10, 10)), 0, true, 0, None, 10)]
#[case::idle_resource(None, 0, false, 5, Some(0), 10)]
#[case::moved_earlier(Some((8, 10, 15)), 24, false, 5, Some(0), 5)]
#[case::window_too_short(Some((8, 10, 15)), 4, false, 0, Some(25), 25)]
fn test_single_resource_scenarios(
    #[case] other: Option<(i64, i64, i64)>,
    #[case] max_early_hours: i64,
    #[case] closes_at_ten: bool,
    #[case] expected_qty: i64,
    #[case] expected_date: Option<i64>,
    #[case] expected_end: i64,
) {
    let mut resource = Resource::finite("OVEN", dec(10))
        .with_cost(dec(2))
        .with_max_early(Duration::hours(max_early_hours));
    if closes_at_ten {
        resource = resource.with_capacity_change(hour(10), Decimal::ZERO);
    }
    let mut schedule = Schedule::new();
    let oven = schedule.add_resource(resource);
    if let Some((load, hours, end)) = other {
        add_plan(&mut schedule, oven, "OTHER", load, hours, end);
    }
    let plan = add_plan(&mut schedule, oven, "BAKE", 5, 10, 10);

    let state = resolve(&mut schedule, oven, plan);

    assert_eq!(state.answered_qty, dec(expected_qty));
    assert_eq!(state.answered_date, expected_date.map_or(INFINITE_FUTURE, hour));
    assert_eq!(schedule.plan(plan).unwrap().end, hour(expected_end));
    if expected_qty > 0 {
        // 數量 × 費率 × 10 小時
        assert_eq!(state.cost, dec(expected_qty * 2 * 10));
        assert_within_capacity(&schedule, oven);
    } else {
        assert_eq!(state.cost, Decimal::ZERO);
    }
}
