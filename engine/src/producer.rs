//! Per-source producer state: staggered activation, emission cadence, and
//! the block-time counter.

use crate::pallet::Source;

#[derive(Debug, Clone)]
pub struct ProducerState {
    pub source: Source,
    pub activation_time: i64,
    pub next_emission_time: i64,
    pub active: bool,
    pub blocked_minutes: i64,
    pub lot_counter: u64,
}

impl ProducerState {
    /// The first attempt happens one cadence period after activation, not
    /// at the activation instant itself: `next_emission_time` starts at
    /// `activation_time + x_minutes`.
    pub fn new(source: Source, activation_time: i64, x_minutes: i64) -> Self {
        Self {
            source,
            activation_time,
            next_emission_time: activation_time + x_minutes,
            active: activation_time <= 0,
            blocked_minutes: 0,
            lot_counter: 0,
        }
    }

    /// Flips to active once `now` reaches the activation instant. A no-op
    /// once already active.
    pub fn activate_if_due(&mut self, now: i64) {
        if !self.active && now >= self.activation_time {
            self.active = true;
        }
    }

    pub fn due_at(&self, now: i64) -> bool {
        self.active && self.next_emission_time <= now
    }

    /// Records a successful emission: hands back this source's emission
    /// index before the increment (the caller derives the pallet's `lot`
    /// from it) and advances the schedule.
    pub fn record_emission(&mut self, x_minutes: i64) -> u64 {
        let emission_index = self.lot_counter;
        self.lot_counter += 1;
        self.next_emission_time += x_minutes;
        emission_index
    }

    pub fn record_block(&mut self, tick_minutes: i64) {
        self.blocked_minutes += tick_minutes;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_attempt_lands_one_period_after_activation() {
        let p = ProducerState::new(Source::B, 720, 24);
        assert_eq!(p.next_emission_time, 744);
    }

    #[test]
    fn inactive_until_activation_time_reached() {
        let mut p = ProducerState::new(Source::C, 1440, 24);
        assert!(!p.active);
        assert!(!p.due_at(1440));

        p.activate_if_due(1440);
        assert!(p.active);
        assert!(!p.due_at(1440));
        assert!(p.due_at(1464));
    }

    #[test]
    fn record_emission_advances_schedule_and_hands_back_lot() {
        let mut p = ProducerState::new(Source::A, 0, 24);
        let lot = p.record_emission(24);
        assert_eq!(lot, 0);
        assert_eq!(p.next_emission_time, 48);
        assert_eq!(p.lot_counter, 1);
    }

    #[test]
    fn record_block_does_not_touch_schedule() {
        let mut p = ProducerState::new(Source::A, 0, 24);
        let before = p.next_emission_time;
        p.record_block(1);
        assert_eq!(p.next_emission_time, before);
        assert_eq!(p.blocked_minutes, 1);
    }
}
