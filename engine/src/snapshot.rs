//! Observable state handed to external drivers: GUI renderers, CSV
//! exporters, the clock driver. The engine owns no rendering or
//! persistence logic; this is the entire surface those collaborators see.

use serde::{Deserialize, Serialize};

use crate::conveyor::Role;
use crate::log::ConsumptionRecord;
use crate::pallet::Source;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PalletView {
    pub id: u64,
    pub source: Source,
    pub lot: u64,
    pub t_prod: i64,
    pub mature: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConveyorView {
    pub index: usize,
    pub role: Role,
    pub pallets: Vec<PalletView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProducerView {
    pub source: Source,
    pub next_emission_time: i64,
    pub active: bool,
    pub blocked_minutes: i64,
    pub lot_counter: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowView {
    pub active_source: Option<Source>,
    pub window_start: Option<i64>,
    pub window_end: Option<i64>,
    pub next_consume_time: Option<i64>,
    pub next_candidate_source: Source,
}

/// A point-in-time view of the engine, plus the consumption records
/// appended during the step that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub now: i64,
    pub conveyors: Vec<ConveyorView>,
    pub producers: Vec<ProducerView>,
    pub window: WindowView,
    pub consumption_delta: Vec<ConsumptionRecord>,
}
