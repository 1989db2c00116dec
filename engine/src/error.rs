//! Fatal, halting errors.
//!
//! These indicate an implementation bug, never a legal shortage: a full
//! buffer, an absent mature head, or an insufficiently-matured source are
//! all modeled states (see [`crate::engine::Engine::step`]), not errors.
//! Construction-time misconfiguration is [`crate::config::ConfigurationError`],
//! not this.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("at t={now}: consumption strategy selected conveyor {conveyor} but its head did not yield")]
    StrategyContractViolated { now: i64, conveyor: usize },

    #[error("at t={now}: conveyor {conveyor} exceeded capacity {capacity}")]
    CapacityExceeded {
        now: i64,
        conveyor: usize,
        capacity: usize,
    },

    #[error(
        "at t={now}: pallet {pallet_id} consumed before maturing (produced {t_prod}, \
         maturation {maturation_minutes})"
    )]
    ImmatureConsumption {
        now: i64,
        pallet_id: u64,
        t_prod: i64,
        maturation_minutes: i64,
    },

    #[error("the engine has already halted on a prior invariant violation")]
    Halted,
}
