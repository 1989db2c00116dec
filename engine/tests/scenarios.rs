//! Literal scenarios from spec section 8 (E1-E6), each run against the
//! public `Engine` API minute-by-minute.

use engine::{AllocationKind, ConsumptionKind, Engine, EngineConfig, Source};

fn count_buffered(engine: &Engine, source: Source, t_prod_at_most: i64) -> usize {
    engine
        .snapshot()
        .conveyors
        .iter()
        .flat_map(|c| c.pallets.iter())
        .filter(|p| p.source == source && p.t_prod <= t_prod_at_most)
        .count()
}

#[test]
fn e1_first_window_opens_at_2640_for_a_with_no_prior_consumption() {
    let cfg = EngineConfig::builder()
        .x_minutes(24)
        .allocation_strategy(AllocationKind::MostFree)
        .consumption_strategy(ConsumptionKind::FirstThree)
        .build()
        .unwrap();
    let mut engine = Engine::new(cfg);

    for _ in 0..2639 {
        let snap = engine.step(1).unwrap();
        assert!(snap.consumption_delta.is_empty(), "no consumption before t=2640");
        assert!(snap.window.active_source.is_none(), "no window before t=2640");
    }

    let snap = engine.step(1).unwrap();
    assert_eq!(engine.now(), 2640);
    assert_eq!(snap.window.active_source, Some(Source::A));
    assert_eq!(count_buffered(&engine, Source::A, 2160), 90);
}

#[test]
fn e2_bs_window_opens_after_as_window_has_closed() {
    let cfg = EngineConfig::builder()
        .x_minutes(24)
        .allocation_strategy(AllocationKind::MostFree)
        .consumption_strategy(ConsumptionKind::FirstThree)
        .build()
        .unwrap();
    let mut engine = Engine::new(cfg);

    let mut snap = engine.snapshot();
    for _ in 0..3360 {
        snap = engine.step(1).unwrap();
    }
    assert_eq!(engine.now(), 3360);
    assert_eq!(snap.window.active_source, None, "A's window has just closed");

    // Per the scheduler's "return to idle evaluation on the following
    // tick" rule, B's trigger is first re-checked at t=3361, one minute
    // after the closing tick.
    snap = engine.step(1).unwrap();
    assert_eq!(engine.now(), 3361);
    assert_eq!(snap.window.active_source, Some(Source::B));
    assert_eq!(snap.window.window_start, Some(3361));
}

#[test]
fn e3_round_robin_spreads_evenly_across_dedicated_rows() {
    let cfg = EngineConfig::builder()
        .x_minutes(24)
        .allocation_strategy(AllocationKind::RoundRobin)
        .consumption_strategy(ConsumptionKind::FirstThree)
        .build()
        .unwrap();
    let mut engine = Engine::new(cfg);

    for _ in 0..(72 * 60) {
        let snap = engine.step(1).unwrap();
        // Round-robin never spills to dynamic rows, so a source's buffer
        // caps at 3 * row_capacity = 66, below lot_size = 90: the window
        // never triggers and occupancy equals cumulative allocations.
        assert!(snap.consumption_delta.is_empty());
    }

    let snap = engine.snapshot();
    for dedicated_rows in [[0usize, 1, 2], [4, 5, 6], [8, 9, 10]] {
        let counts: Vec<usize> = dedicated_rows
            .iter()
            .map(|&r| {
                snap.conveyors[r]
                    .pallets
                    .len()
            })
            .collect();
        let max = *counts.iter().max().unwrap();
        let min = *counts.iter().min().unwrap();
        assert!(max - min <= 1, "round robin spread too uneven: {counts:?}");
    }
}

#[test]
fn e4_simultaneous_activation_opens_only_a_by_rotation_order() {
    let cfg = EngineConfig::builder()
        .x_minutes(24)
        .allocation_strategy(AllocationKind::MostFree)
        .consumption_strategy(ConsumptionKind::FirstThree)
        .activation_times([(Source::A, 0), (Source::B, 0), (Source::C, 0)])
        .build()
        .unwrap();
    let mut engine = Engine::new(cfg);

    let mut snap = engine.snapshot();
    for _ in 0..2640 {
        snap = engine.step(1).unwrap();
    }
    assert_eq!(snap.window.active_source, Some(Source::A));

    for _ in 0..(3360 - 2640 - 1) {
        let snap = engine.step(1).unwrap();
        assert_eq!(snap.window.active_source, Some(Source::A), "B/C stay idle while A is active");
    }

    let snap = engine.step(1).unwrap();
    assert_eq!(engine.now(), 3360);
    assert_eq!(snap.window.active_source, None, "A's window has just closed");

    let snap = engine.step(1).unwrap();
    assert_eq!(engine.now(), 3361);
    assert_eq!(snap.window.active_source, Some(Source::B));
}

#[test]
fn e5_blocking_accumulates_once_dedicated_rows_fill() {
    let cfg = EngineConfig::builder()
        .x_minutes(3)
        .row_capacity(5)
        .allocation_strategy(AllocationKind::RoundRobin)
        .consumption_strategy(ConsumptionKind::FirstThree)
        .build()
        .unwrap();
    let mut engine = Engine::new(cfg);

    let mut blocked = false;
    for _ in 0..2000 {
        let snap = engine.step(1).unwrap();
        if snap
            .producers
            .iter()
            .any(|p| p.source == Source::A && p.blocked_minutes > 0)
        {
            blocked = true;
            break;
        }
    }
    assert!(blocked, "producer A should eventually block once its dedicated rows fill");
}

#[test]
fn e6_lot_affinity_and_longest_head_consumption() {
    let cfg = EngineConfig::builder()
        .x_minutes(24)
        .allocation_strategy(AllocationKind::DedicatedPlusDynamic)
        .consumption_strategy(ConsumptionKind::LongestHead)
        .build()
        .unwrap();
    let mut engine = Engine::new(cfg);

    for _ in 0..3000 {
        engine.step(1).unwrap();
    }

    let snap = engine.snapshot();
    let mut rows_by_lot: std::collections::HashMap<u64, std::collections::HashSet<usize>> =
        std::collections::HashMap::new();
    for row in &snap.conveyors {
        for p in &row.pallets {
            rows_by_lot.entry(p.lot).or_default().insert(row.index);
        }
    }
    for (lot, rows) in &rows_by_lot {
        assert_eq!(rows.len(), 1, "lot {lot} split across rows {rows:?}");
    }
    assert!(!engine.consumption_log().is_empty());
}
