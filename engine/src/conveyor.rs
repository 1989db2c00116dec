//! The bounded FIFO conveyor and its role layout.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pallet::{Pallet, Source};

/// What sources a conveyor row accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Dedicated(Source),
    Dynamic,
}

impl Role {
    pub fn accepts(self, source: Source) -> bool {
        match self {
            Role::Dedicated(s) => s == source,
            Role::Dynamic => true,
        }
    }

    pub fn dedicated_to(self) -> Option<Source> {
        match self {
            Role::Dedicated(s) => Some(s),
            Role::Dynamic => None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConveyorError {
    #[error("conveyor is at capacity")]
    Full,
}

/// A single bounded FIFO lane.
///
/// Internally backed by a `VecDeque`: the front is the head (consumption
/// end), the back is the tail (insertion end). Nothing removes from the
/// back and nothing inserts at the front; that is the entire FIFO contract.
#[derive(Debug, Clone)]
pub struct Conveyor {
    index: usize,
    role: Role,
    capacity: usize,
    cells: VecDeque<Pallet>,
}

impl Conveyor {
    pub fn new(index: usize, role: Role, capacity: usize) -> Self {
        Self {
            index,
            role,
            capacity,
            cells: VecDeque::with_capacity(capacity),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn occupancy(&self) -> usize {
        self.cells.len()
    }

    pub fn free_capacity(&self) -> usize {
        self.capacity - self.cells.len()
    }

    pub fn can_enqueue(&self) -> bool {
        self.cells.len() < self.capacity
    }

    /// Appends `pallet` at the tail. Never reorders or inspects maturity.
    pub fn enqueue(&mut self, pallet: Pallet) -> Result<(), ConveyorError> {
        if !self.can_enqueue() {
            return Err(ConveyorError::Full);
        }
        self.cells.push_back(pallet);
        Ok(())
    }

    pub fn peek_head(&self) -> Option<&Pallet> {
        self.cells.front()
    }

    /// Removes and returns the head if it exists and `predicate` holds for
    /// it. The head is never skipped: if `predicate` fails, nothing behind
    /// it is inspected or removed.
    pub fn pop_head_if<F>(&mut self, predicate: F) -> Option<Pallet>
    where
        F: FnOnce(&Pallet) -> bool,
    {
        let matches = self.cells.front().map(predicate).unwrap_or(false);
        if matches { self.cells.pop_front() } else { None }
    }

    /// Iterates pallets from head to tail (consumption order to insertion
    /// order), for snapshotting and invariant checks.
    pub fn iter(&self) -> impl Iterator<Item = &Pallet> {
        self.cells.iter()
    }
}
