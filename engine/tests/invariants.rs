//! Universal invariants (spec section 8, items 1-8), exercised by stepping
//! a handful of configurations minute-by-minute and checking every
//! resulting snapshot.

use engine::{AllocationKind, ConsumptionKind, Engine, EngineConfig, Source};

fn assert_invariants(engine: &Engine, delta: &[engine::ConsumptionRecord]) {
    let cfg = engine.config();
    let snap = engine.snapshot();

    for row in &snap.conveyors {
        // 1. capacity bound
        assert!(row.pallets.len() <= cfg.row_capacity);

        // 2. t_prod non-decreasing from head (index 0) to tail.
        for pair in row.pallets.windows(2) {
            assert!(pair[0].t_prod <= pair[1].t_prod, "fifo order violated on row {}", row.index);
        }
    }

    // 3. no pallet id appears in two conveyors.
    let mut seen = std::collections::HashSet::new();
    for row in &snap.conveyors {
        for p in &row.pallets {
            assert!(seen.insert(p.id), "pallet {} present twice", p.id);
        }
    }

    // 4 & 5. every record in this tick's delta matured, and if any record
    // exists the window must have been active for that source.
    for record in delta {
        assert!(record.t_consumed_minutes - record.t_prod_minutes >= cfg.maturation_minutes);
    }
    if !delta.is_empty() {
        let source = delta[0].source;
        assert!(delta.iter().all(|r| r.source == source));
        assert_eq!(snap.window.active_source, Some(source));
    }

    // 7. next_emission_time stays on the activation-anchored grid.
    for p in &snap.producers {
        let activation = cfg.activation_time(p.source);
        assert_eq!((p.next_emission_time - activation) % cfg.x_minutes, 0);
    }
}

fn assert_counting_law(engine: &Engine) {
    let snap = engine.snapshot();
    for source in Source::ALL {
        let in_buffer = snap
            .conveyors
            .iter()
            .flat_map(|c| c.pallets.iter())
            .filter(|p| p.source == source)
            .count();
        let consumed = engine
            .consumption_log()
            .iter()
            .filter(|r| r.source == source)
            .count();
        let produced = snap
            .producers
            .iter()
            .find(|p| p.source == source)
            .unwrap()
            .lot_counter as usize;

        assert_eq!(produced, in_buffer + consumed, "counting law violated for {source}");
    }
}

fn run_and_check(mut engine: Engine, minutes: i64) {
    for _ in 0..minutes {
        let snap = engine.step(1).expect("engine must not halt on a valid run");
        assert_invariants(&engine, &snap.consumption_delta);
        assert_counting_law(&engine);
    }
}

#[test]
fn invariants_hold_with_most_free_and_first_three() {
    let cfg = EngineConfig::builder()
        .x_minutes(24)
        .allocation_strategy(AllocationKind::MostFree)
        .consumption_strategy(ConsumptionKind::FirstThree)
        .build()
        .unwrap();
    run_and_check(Engine::new(cfg), 4000);
}

#[test]
fn invariants_hold_with_round_robin_and_longest_head() {
    let cfg = EngineConfig::builder()
        .x_minutes(24)
        .allocation_strategy(AllocationKind::RoundRobin)
        .consumption_strategy(ConsumptionKind::LongestHead)
        .build()
        .unwrap();
    run_and_check(Engine::new(cfg), 4000);
}

#[test]
fn invariants_hold_with_dedicated_plus_dynamic_under_blocking_pressure() {
    let cfg = EngineConfig::builder()
        .x_minutes(3)
        .row_capacity(5)
        .allocation_strategy(AllocationKind::DedicatedPlusDynamic)
        .consumption_strategy(ConsumptionKind::FirstThree)
        .build()
        .unwrap();
    run_and_check(Engine::new(cfg), 2000);
}

#[test]
fn consecutive_consumption_timestamps_never_shrink_below_period() {
    let cfg = EngineConfig::builder().x_minutes(24).build().unwrap();
    let period = cfg.consumption_period();
    let mut engine = Engine::new(cfg);

    for _ in 0..4000 {
        engine.step(1).unwrap();
    }

    let log = engine.consumption_log();
    for pair in log.windows(2) {
        assert!(pair[1].t_consumed_minutes - pair[0].t_consumed_minutes >= period);
    }
}
