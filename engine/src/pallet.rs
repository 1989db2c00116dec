//! Pallet and source identity types shared across the buffer, strategies,
//! and log.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Origin machine of a pallet. Immutable once produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    A,
    B,
    C,
}

impl Source {
    /// Fixed iteration order used throughout the engine (producer firing
    /// order, rotation order, row layout order).
    pub const ALL: [Source; 3] = [Source::A, Source::B, Source::C];

    /// Next source in the A -> B -> C -> A rotation.
    pub fn next(self) -> Source {
        match self {
            Source::A => Source::B,
            Source::B => Source::C,
            Source::C => Source::A,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Source::A => "A",
            Source::B => "B",
            Source::C => "C",
        };
        f.write_str(s)
    }
}

/// Atomic unit produced, buffered, and consumed.
///
/// `t_consumed` is `None` while the pallet sits in a conveyor; it is stamped
/// exactly once, by the engine, at the moment of consumption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pallet {
    pub id: u64,
    pub source: Source,
    pub lot: u64,
    pub t_prod: i64,
    pub t_consumed: Option<i64>,
}

impl Pallet {
    pub fn new(id: u64, source: Source, lot: u64, t_prod: i64) -> Self {
        Self {
            id,
            source,
            lot,
            t_prod,
            t_consumed: None,
        }
    }

    /// True when the pallet has matured by `now` (but says nothing about
    /// whether it has actually been removed from its conveyor).
    pub fn is_mature_at(&self, now: i64, maturation_minutes: i64) -> bool {
        now - self.t_prod >= maturation_minutes
    }
}
