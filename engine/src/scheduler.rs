//! Window scheduler: decides when a consumption window opens, which source
//! it targets, and when it closes.

use tracing::{debug, instrument};

use crate::config::EngineConfig;
use crate::conveyor::Conveyor;
use crate::pallet::Source;

#[derive(Debug, Clone)]
pub struct WindowScheduler {
    active_source: Option<Source>,
    window_start: i64,
    window_end: i64,
    next_candidate_source: Source,
    next_consume_time: i64,
}

impl WindowScheduler {
    pub fn new() -> Self {
        Self {
            active_source: None,
            window_start: 0,
            window_end: 0,
            next_candidate_source: Source::A,
            next_consume_time: 0,
        }
    }

    pub fn active_source(&self) -> Option<Source> {
        self.active_source
    }

    pub fn window_start(&self) -> Option<i64> {
        self.active_source.map(|_| self.window_start)
    }

    pub fn window_end(&self) -> Option<i64> {
        self.active_source.map(|_| self.window_end)
    }

    pub fn next_candidate_source(&self) -> Source {
        self.next_candidate_source
    }

    pub fn next_consume_time(&self) -> Option<i64> {
        self.active_source.map(|_| self.next_consume_time)
    }

    /// Active(S) -> Idle close check. Advances the rotation cursor on
    /// close. Closing never also triggers a new window in the same tick;
    /// that evaluation happens on the following tick's [`Self::try_trigger`].
    #[instrument(skip(self), fields(now))]
    pub fn close_if_due(&mut self, now: i64) {
        if let Some(source) = self.active_source {
            if now >= self.window_end {
                debug!(%source, "window closed");
                self.active_source = None;
                self.next_candidate_source = self.next_candidate_source.next();
            }
        }
    }

    /// Idle -> Active(S) trigger check. A no-op while a window is active.
    /// The rotation cursor does not advance on a failed trigger: the same
    /// candidate source is retried on the next tick. Counts only pallets
    /// currently sitting in the buffer, not the full production history.
    #[instrument(skip(self, cfg, conveyors), fields(now, candidate = %self.next_candidate_source))]
    pub fn try_trigger(&mut self, now: i64, cfg: &EngineConfig, conveyors: &[Conveyor]) {
        if self.active_source.is_some() {
            return;
        }

        let source = self.next_candidate_source;
        let maturity_cutoff = now - (cfg.maturation_minutes - cfg.window_minutes);
        let count = conveyors
            .iter()
            .flat_map(|c| c.iter())
            .filter(|p| p.source == source && p.t_prod <= maturity_cutoff)
            .count() as i64;
        let lot_size = cfg.lot_size();

        if count >= lot_size {
            debug!(%source, count, lot_size, "window opened");
            self.active_source = Some(source);
            self.window_start = now;
            self.window_end = now + cfg.window_minutes;
            self.next_consume_time = now;
        }
    }

    /// Called once a consumption attempt for the active window succeeds.
    pub fn record_consumption(&mut self, consumption_period: i64) {
        self.next_consume_time += consumption_period;
    }
}

impl Default for WindowScheduler {
    fn default() -> Self {
        Self::new()
    }
}
