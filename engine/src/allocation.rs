//! Allocation strategies: given a new pallet, pick a conveyor that accepts
//! it, or signal that the producer should block this tick.
//!
//! Modeled as a tagged enum rather than a trait object: the engine only
//! ever holds exactly one allocator for the run's lifetime, chosen at
//! construction from [`crate::config::AllocationKind`], so there is no need
//! for dynamic dispatch at this boundary.

use std::collections::HashMap;

use crate::conveyor::Conveyor;
use crate::pallet::{Pallet, Source};

#[derive(Debug, Clone)]
pub enum Allocator {
    MostFree,
    RoundRobin(RoundRobinState),
    DedicatedPlusDynamic,
}

#[derive(Debug, Clone, Default)]
pub struct RoundRobinState {
    cursor: HashMap<Source, usize>,
}

impl Allocator {
    pub fn round_robin() -> Self {
        Allocator::RoundRobin(RoundRobinState::default())
    }

    /// Returns the index of the conveyor the pallet should be enqueued
    /// into, or `None` to block the producer for this tick.
    pub fn allocate(&mut self, pallet: &Pallet, conveyors: &[Conveyor]) -> Option<usize> {
        match self {
            Allocator::MostFree => most_free(pallet, conveyors),
            Allocator::RoundRobin(state) => round_robin(state, pallet, conveyors),
            Allocator::DedicatedPlusDynamic => dedicated_plus_dynamic(pallet, conveyors),
        }
    }
}

/// S1 — considers every conveyor whose role accepts the source, picks the
/// one with the most free capacity, ties broken by lowest row index.
fn most_free(pallet: &Pallet, conveyors: &[Conveyor]) -> Option<usize> {
    conveyors
        .iter()
        .filter(|c| c.role().accepts(pallet.source) && c.can_enqueue())
        .max_by_key(|c| (c.free_capacity(), std::cmp::Reverse(c.index())))
        .map(|c| c.index())
}

/// S2 — per-source round-robin cursor over that source's dedicated rows
/// only. Never spills to dynamic rows.
fn round_robin(state: &mut RoundRobinState, pallet: &Pallet, conveyors: &[Conveyor]) -> Option<usize> {
    let dedicated: Vec<usize> = conveyors
        .iter()
        .filter(|c| c.role().dedicated_to() == Some(pallet.source))
        .map(|c| c.index())
        .collect();

    if dedicated.is_empty() {
        return None;
    }

    let cursor = state.cursor.entry(pallet.source).or_insert(0);
    let start = *cursor % dedicated.len();

    for offset in 0..dedicated.len() {
        let pos = (start + offset) % dedicated.len();
        let row = dedicated[pos];
        if conveyors[row].can_enqueue() {
            *cursor = (pos + 1) % dedicated.len();
            return Some(row);
        }
    }

    None
}

/// S3 — prefers a dedicated row already holding the pallet's lot, then the
/// least-full accepting dedicated row, then falls back to a dynamic row.
fn dedicated_plus_dynamic(pallet: &Pallet, conveyors: &[Conveyor]) -> Option<usize> {
    let lot_affine = conveyors
        .iter()
        .filter(|c| c.role().dedicated_to() == Some(pallet.source) && c.can_enqueue())
        .filter(|c| c.iter().any(|p| p.lot == pallet.lot))
        .min_by_key(|c| c.index());

    if let Some(c) = lot_affine {
        return Some(c.index());
    }

    let least_full = conveyors
        .iter()
        .filter(|c| c.role().dedicated_to() == Some(pallet.source) && c.can_enqueue())
        .max_by_key(|c| (c.free_capacity(), std::cmp::Reverse(c.index())));

    if let Some(c) = least_full {
        return Some(c.index());
    }

    conveyors
        .iter()
        .filter(|c| matches!(c.role(), crate::conveyor::Role::Dynamic) && c.can_enqueue())
        .max_by_key(|c| (c.free_capacity(), std::cmp::Reverse(c.index())))
        .map(|c| c.index())
}
