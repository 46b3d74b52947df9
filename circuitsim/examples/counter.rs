//! Example: 2-bit synchronous counter paced in real time.
//!
//! This example demonstrates in particular:
//!
//! * parsing of a textual netlist,
//! * real-time clock pacing,
//! * structured logging with `tracing-subscriber`.
//!
//! Run with `RUST_LOG=circuitsim=debug` to see the workers start and stop.
use circuitsim::netlist::Netlist;
use circuitsim::simulation::{Change, SimInit};
use circuitsim::time::SpinPacer;
use tracing_subscriber::EnvFilter;

const COUNTER: &str = include_str!("../netlists/counter.net");

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let netlist = Netlist::parse(COUNTER)?;

    // Four edges per second, so the counter increments every half second.
    let summary = SimInit::new(netlist)
        .set_clock(4, 8)
        .set_pacer(SpinPacer::new())
        .init()?
        .run(&mut |change: Change| {
            println!("[cycle {:>2}] {}", change.cycle, change.word);
        })?;

    println!(
        "{} cycles, final count {}",
        summary.cycles,
        summary.last_word.value()
    );

    Ok(())
}
