//! Append-only pallet production log and the finalized consumption log.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::pallet::{Pallet, Source};

/// One finalized consumption, stable for CSV export by an external
/// component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumptionRecord {
    pub source: Source,
    pub lot: u64,
    pub pallet_id: u64,
    pub t_prod_minutes: i64,
    pub t_consumed_minutes: i64,
    pub wait_hhmm: String,
}

impl ConsumptionRecord {
    fn from_pallet(pallet: &Pallet, t_consumed: i64) -> Self {
        let wait = Duration::minutes(t_consumed - pallet.t_prod);
        let hours = wait.num_hours();
        let minutes = wait.num_minutes() - hours * 60;

        Self {
            source: pallet.source,
            lot: pallet.lot,
            pallet_id: pallet.id,
            t_prod_minutes: pallet.t_prod,
            t_consumed_minutes: t_consumed,
            wait_hhmm: format!("{hours:02}:{minutes:02}"),
        }
    }
}

/// Append-only record of every pallet ever produced, plus the finalized
/// consumption log derived from it.
///
/// The window scheduler's trigger check scans the buffer directly rather
/// than this log (it only cares about resident pallets, not production
/// history); this type exists for the consumption-side record.
#[derive(Debug, Default)]
pub struct PalletLog {
    produced: Vec<Pallet>,
    consumed: Vec<ConsumptionRecord>,
}

impl PalletLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_produced(&mut self, pallet: Pallet) {
        self.produced.push(pallet);
    }

    /// Finalizes a consumption: appends the stable record. Does not touch
    /// the conveyor; the caller is responsible for having already popped
    /// the pallet from its conveyor.
    pub fn push_consumed(&mut self, pallet: &Pallet, t_consumed: i64) {
        self.consumed.push(ConsumptionRecord::from_pallet(pallet, t_consumed));
    }

    pub fn consumption_log(&self) -> &[ConsumptionRecord] {
        &self.consumed
    }

    pub fn produced_count(&self, source: Source) -> usize {
        self.produced.iter().filter(|p| p.source == source).count()
    }

    pub fn consumed_count(&self, source: Source) -> usize {
        self.consumed.iter().filter(|r| r.source == source).count()
    }
}
