use clap::{Parser, ValueEnum};

use engine::{AllocationKind, ConsumptionKind};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum AllocationArg {
    MostFree,
    RoundRobin,
    DedicatedPlusDynamic,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ConsumptionArg {
    FirstThree,
    LongestHead,
}

/// Drives the two-phase production-line engine for a fixed number of
/// simulated minutes and prints the consumption log as it accumulates.
#[derive(Debug, Parser)]
#[clap(name = "sim-cli", version)]
pub struct Cli {
    /// Total simulated minutes to run.
    #[clap(long, default_value_t = 4320)]
    pub minutes: i64,

    /// Minutes advanced per engine step.
    #[clap(long, default_value_t = 1)]
    pub tick_minutes: i64,

    /// Producer emission cadence.
    #[clap(long, default_value_t = 24)]
    pub x_minutes: i64,

    /// Allocation strategy for incoming pallets.
    #[clap(long, value_enum, default_value = "most-free")]
    pub allocation: AllocationArg,

    /// Consumption strategy during an active window.
    #[clap(long, value_enum, default_value = "first-three")]
    pub consumption: ConsumptionArg,
}

impl From<AllocationArg> for AllocationKind {
    fn from(v: AllocationArg) -> Self {
        match v {
            AllocationArg::MostFree => AllocationKind::MostFree,
            AllocationArg::RoundRobin => AllocationKind::RoundRobin,
            AllocationArg::DedicatedPlusDynamic => AllocationKind::DedicatedPlusDynamic,
        }
    }
}

impl From<ConsumptionArg> for ConsumptionKind {
    fn from(v: ConsumptionArg) -> Self {
        match v {
            ConsumptionArg::FirstThree => ConsumptionKind::FirstThree,
            ConsumptionArg::LongestHead => ConsumptionKind::LongestHead,
        }
    }
}
