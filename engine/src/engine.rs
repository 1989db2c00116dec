//! The engine: owns simulated time, the buffer, producers, the window
//! scheduler, and the pallet log; orchestrates one tick at a time.

use tracing::{instrument, warn};

use crate::allocation::Allocator;
use crate::config::{ConfigurationError, EngineConfig};
use crate::consumption::Consumer;
use crate::conveyor::Conveyor;
use crate::error::EngineError;
use crate::log::PalletLog;
use crate::pallet::{Pallet, Source};
use crate::producer::ProducerState;
use crate::scheduler::WindowScheduler;
use crate::snapshot::{ConveyorView, PalletView, ProducerView, Snapshot, WindowView};

pub struct Engine {
    cfg: EngineConfig,
    now: i64,
    conveyors: Vec<Conveyor>,
    producers: Vec<ProducerState>,
    log: PalletLog,
    scheduler: WindowScheduler,
    allocator: Allocator,
    consumer: Consumer,
    next_pallet_id: u64,
    last_log_len: usize,
    halted: bool,
}

impl Engine {
    pub fn new(cfg: EngineConfig) -> Self {
        let (conveyors, producers, allocator, consumer) = Self::fresh_state(&cfg);
        Self {
            cfg,
            now: 0,
            conveyors,
            producers,
            log: PalletLog::new(),
            scheduler: WindowScheduler::new(),
            allocator,
            consumer,
            next_pallet_id: 0,
            last_log_len: 0,
            halted: false,
        }
    }

    fn fresh_state(cfg: &EngineConfig) -> (Vec<Conveyor>, Vec<ProducerState>, Allocator, Consumer) {
        let conveyors = cfg
            .role_layout
            .iter()
            .enumerate()
            .map(|(i, role)| Conveyor::new(i, *role, cfg.row_capacity))
            .collect();

        let producers = Source::ALL
            .iter()
            .map(|&s| ProducerState::new(s, cfg.activation_time(s), cfg.x_minutes))
            .collect();

        let allocator = match cfg.allocation_strategy {
            crate::config::AllocationKind::MostFree => Allocator::MostFree,
            crate::config::AllocationKind::RoundRobin => Allocator::round_robin(),
            crate::config::AllocationKind::DedicatedPlusDynamic => Allocator::DedicatedPlusDynamic,
        };

        let consumer = match cfg.consumption_strategy {
            crate::config::ConsumptionKind::FirstThree => Consumer::FirstThree,
            crate::config::ConsumptionKind::LongestHead => Consumer::LongestHead,
        };

        (conveyors, producers, allocator, consumer)
    }

    pub fn now(&self) -> i64 {
        self.now
    }

    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    /// Restores t=0 state with the original configuration. Re-validates
    /// that configuration first, so a [`ConfigurationError`] is possible
    /// here too, not just at initial construction.
    pub fn reset(&mut self) -> Result<(), ConfigurationError> {
        self.cfg.revalidate()?;

        let (conveyors, producers, allocator, consumer) = Self::fresh_state(&self.cfg);
        self.now = 0;
        self.conveyors = conveyors;
        self.producers = producers;
        self.log = PalletLog::new();
        self.scheduler = WindowScheduler::new();
        self.allocator = allocator;
        self.consumer = consumer;
        self.next_pallet_id = 0;
        self.last_log_len = 0;
        self.halted = false;
        Ok(())
    }

    pub fn consumption_log(&self) -> &[crate::log::ConsumptionRecord] {
        self.log.consumption_log()
    }

    /// Advances simulated time by `tick_minutes` and returns the resulting
    /// snapshot. Ordering within the tick is fixed: producers (A, B, C)
    /// fire before the scheduler evaluates, and the scheduler evaluates
    /// before consumption.
    #[instrument(skip(self), fields(tick_minutes))]
    pub fn step(&mut self, tick_minutes: i64) -> Result<Snapshot, EngineError> {
        if self.halted {
            return Err(EngineError::Halted);
        }

        self.now += tick_minutes;
        if let Err(err) = self.run_producers(tick_minutes) {
            self.halted = true;
            return Err(err);
        }

        let was_idle = self.scheduler.active_source().is_none();
        self.scheduler.close_if_due(self.now);
        if was_idle {
            self.scheduler.try_trigger(self.now, &self.cfg, &self.conveyors);
        }

        if let Err(err) = self.run_consumption() {
            self.halted = true;
            return Err(err);
        }

        let delta_start = self.last_log_len;
        self.last_log_len = self.log.consumption_log().len();
        let consumption_delta = self.log.consumption_log()[delta_start..].to_vec();

        Ok(Snapshot {
            now: self.now,
            conveyors: self.conveyor_views(),
            producers: self.producer_views(),
            window: self.window_view(),
            consumption_delta,
        })
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            now: self.now,
            conveyors: self.conveyor_views(),
            producers: self.producer_views(),
            window: self.window_view(),
            consumption_delta: Vec::new(),
        }
    }

    fn run_producers(&mut self, tick_minutes: i64) -> Result<(), EngineError> {
        let lot_size = self.cfg.lot_size().max(1) as u64;

        for source in Source::ALL {
            let idx = self
                .producers
                .iter()
                .position(|p| p.source == source)
                .expect("producers always cover all three sources");

            self.producers[idx].activate_if_due(self.now);
            if !self.producers[idx].due_at(self.now) {
                continue;
            }

            // One lot per `lot_size` pallets, not one lot per pallet: this is
            // what makes the dedicated-plus-dynamic allocator's lot-affinity
            // branch reachable, and what E6 clusters on.
            let lot = self.producers[idx].lot_counter / lot_size;
            let t_prod = self.producers[idx].next_emission_time;
            let probe = Pallet::new(0, source, lot, t_prod);

            match self.allocator.allocate(&probe, &self.conveyors) {
                Some(row) => {
                    let pallet_id = self.next_pallet_id;
                    self.next_pallet_id += 1;
                    let pallet = Pallet::new(pallet_id, source, lot, t_prod);

                    self.conveyors[row].enqueue(pallet.clone()).map_err(|_| {
                        EngineError::CapacityExceeded {
                            now: self.now,
                            conveyor: row,
                            capacity: self.cfg.row_capacity,
                        }
                    })?;

                    self.producers[idx].record_emission(self.cfg.x_minutes);
                    self.log.push_produced(pallet);
                }
                None => {
                    self.producers[idx].record_block(tick_minutes);
                }
            }
        }

        Ok(())
    }

    fn run_consumption(&mut self) -> Result<(), EngineError> {
        let Some(active_source) = self.scheduler.active_source() else {
            return Ok(());
        };
        let period = self.cfg.consumption_period();

        loop {
            let Some(next_consume_time) = self.scheduler.next_consume_time() else {
                break;
            };
            let window_end = self
                .scheduler
                .window_end()
                .expect("active window always has an end");

            if self.now < next_consume_time || self.now >= window_end {
                break;
            }

            // Every pallet popped this tick is stamped with the slot it was
            // scheduled for, not the wall-clock `self.now` of the tick that
            // happened to process it: a catch-up loop inside one large
            // `step` can pop several slots at once, and only stamping from
            // `next_consume_time` keeps consecutive timestamps spaced by a
            // full consumption period.
            match self
                .consumer
                .select(active_source, next_consume_time, &self.cfg, &self.conveyors)
            {
                Some(row) => {
                    let maturation = self.cfg.maturation_minutes;
                    let popped = self.conveyors[row].pop_head_if(|p| {
                        p.source == active_source && p.is_mature_at(next_consume_time, maturation)
                    });

                    match popped {
                        Some(mut pallet) => {
                            if !pallet.is_mature_at(next_consume_time, maturation) {
                                return Err(EngineError::ImmatureConsumption {
                                    now: next_consume_time,
                                    pallet_id: pallet.id,
                                    t_prod: pallet.t_prod,
                                    maturation_minutes: maturation,
                                });
                            }
                            pallet.t_consumed = Some(next_consume_time);
                            self.log.push_consumed(&pallet, next_consume_time);
                            self.scheduler.record_consumption(period);
                        }
                        None => {
                            warn!(row, at = next_consume_time, "consumption strategy selected a non-yielding head");
                            return Err(EngineError::StrategyContractViolated {
                                now: next_consume_time,
                                conveyor: row,
                            });
                        }
                    }
                }
                None => break,
            }
        }

        Ok(())
    }

    fn conveyor_views(&self) -> Vec<ConveyorView> {
        self.conveyors
            .iter()
            .map(|c| ConveyorView {
                index: c.index(),
                role: c.role(),
                pallets: c
                    .iter()
                    .map(|p| PalletView {
                        id: p.id,
                        source: p.source,
                        lot: p.lot,
                        t_prod: p.t_prod,
                        mature: p.is_mature_at(self.now, self.cfg.maturation_minutes),
                    })
                    .collect(),
            })
            .collect()
    }

    fn producer_views(&self) -> Vec<ProducerView> {
        self.producers
            .iter()
            .map(|p| ProducerView {
                source: p.source,
                next_emission_time: p.next_emission_time,
                active: p.active,
                blocked_minutes: p.blocked_minutes,
                lot_counter: p.lot_counter,
            })
            .collect()
    }

    fn window_view(&self) -> WindowView {
        WindowView {
            active_source: self.scheduler.active_source(),
            window_start: self.scheduler.window_start(),
            window_end: self.scheduler.window_end(),
            next_consume_time: self.scheduler.next_consume_time(),
            next_candidate_source: self.scheduler.next_candidate_source(),
        }
    }
}
