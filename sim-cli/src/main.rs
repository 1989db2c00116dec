pub mod cli;

use clap::Parser;
use tracing::info;

use cli::Cli;
use common::logger::init_logger;
use engine::{Engine, EngineConfig};

fn main() -> anyhow::Result<()> {
    init_logger("sim-cli");

    let cli = Cli::parse();

    let cfg = EngineConfig::builder()
        .x_minutes(cli.x_minutes)
        .allocation_strategy(cli.allocation.into())
        .consumption_strategy(cli.consumption.into())
        .build()?;

    let mut engine = Engine::new(cfg);
    let mut ticks_run = 0;

    while ticks_run < cli.minutes {
        let remaining = cli.minutes - ticks_run;
        let tick = cli.tick_minutes.min(remaining);
        let snapshot = engine.step(tick)?;
        ticks_run += tick;

        for record in &snapshot.consumption_delta {
            println!(
                "t={:<6} source={:?} lot={:<4} pallet={:<6} wait={}",
                snapshot.now, record.source, record.lot, record.pallet_id, record.wait_hhmm
            );
        }
    }

    info!(
        minutes = cli.minutes,
        consumed = engine.consumption_log().len(),
        "run complete"
    );

    Ok(())
}
