//! Consumption strategies: given the active source, pick the conveyor to
//! pop a mature head pallet from.

use crate::config::EngineConfig;
use crate::conveyor::Conveyor;
use crate::pallet::Source;

#[derive(Debug, Clone, Copy)]
pub enum Consumer {
    FirstThree,
    LongestHead,
}

impl Consumer {
    pub fn select(
        &self,
        source: Source,
        now: i64,
        cfg: &EngineConfig,
        conveyors: &[Conveyor],
    ) -> Option<usize> {
        match self {
            Consumer::FirstThree => first_three(source, now, cfg, conveyors),
            Consumer::LongestHead => longest_head(source, now, cfg, conveyors),
        }
    }
}

fn yields_mature_head(c: &Conveyor, source: Source, now: i64, maturation_minutes: i64) -> bool {
    c.peek_head()
        .map(|p| p.source == source && p.is_mature_at(now, maturation_minutes))
        .unwrap_or(false)
}

/// C1 — dedicated rows of `source` in row order first, then dynamic rows
/// in row order. Never inspects anything past an immature or
/// wrong-source head.
fn first_three(source: Source, now: i64, cfg: &EngineConfig, conveyors: &[Conveyor]) -> Option<usize> {
    for row in cfg.dedicated_rows(source) {
        if yields_mature_head(&conveyors[row], source, now, cfg.maturation_minutes) {
            return Some(row);
        }
    }
    for row in cfg.dynamic_rows() {
        if yields_mature_head(&conveyors[row], source, now, cfg.maturation_minutes) {
            return Some(row);
        }
    }
    None
}

/// C2 — among dedicated rows of `source` plus all dynamic rows, picks the
/// longest queue whose head yields; ties broken by lowest row index.
fn longest_head(source: Source, now: i64, cfg: &EngineConfig, conveyors: &[Conveyor]) -> Option<usize> {
    let mut candidates = cfg.dedicated_rows(source);
    candidates.extend(cfg.dynamic_rows());

    candidates
        .into_iter()
        .filter(|&row| yields_mature_head(&conveyors[row], source, now, cfg.maturation_minutes))
        .max_by_key(|&row| (conveyors[row].len(), std::cmp::Reverse(row)))
}
