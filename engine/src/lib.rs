//! Two-phase production line simulation: three staggered producers feed a
//! twelve-conveyor maturation buffer; a rotating window scheduler drains it
//! three times as fast, one source at a time.
//!
//! Discrete time, FIFO + maturation + capacity invariants on the buffer,
//! pluggable allocation/consumption strategies, and the window scheduler
//! tying them together. This crate owns no rendering, persistence, or
//! clock-driving — those are external collaborators that call
//! [`engine::Engine::step`] and read [`snapshot::Snapshot`] /
//! [`engine::Engine::consumption_log`].

pub mod allocation;
pub mod config;
pub mod consumption;
pub mod conveyor;
pub mod engine;
pub mod error;
pub mod log;
pub mod pallet;
pub mod producer;
pub mod scheduler;
pub mod snapshot;

pub use config::{AllocationKind, ConfigurationError, ConsumptionKind, EngineConfig};
pub use engine::Engine;
pub use error::EngineError;
pub use log::ConsumptionRecord;
pub use pallet::{Pallet, Source};
pub use snapshot::Snapshot;
