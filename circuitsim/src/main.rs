//! Command-line front end of the simulator.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

use circuitsim::netlist::Netlist;
use circuitsim::simulation::{Change, ComponentRef, SimInit, DEFAULT_FREQUENCY, DEFAULT_PULSES};
use circuitsim::time::NoPacer;

/// Simulates a digital logic netlist and prints each change of its output
/// word.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the netlist file
    path: PathBuf,

    /// Level of a source, as NAME=0|1 (NAME may also be a component index)
    #[arg(long = "source", value_name = "NAME=LEVEL", value_parser = parse_assignment)]
    sources: Vec<(ComponentRef, bool)>,

    /// Initial state of a D flip-flop, as NAME=0|1
    #[arg(long = "dff", value_name = "NAME=LEVEL", value_parser = parse_assignment)]
    dffs: Vec<(ComponentRef, bool)>,

    /// Clock frequency, in edges per second
    #[arg(short, long, default_value_t = DEFAULT_FREQUENCY)]
    frequency: u32,

    /// Number of clock pulses to simulate
    #[arg(short, long, default_value_t = DEFAULT_PULSES)]
    pulses: u64,

    /// Level of the first clock edge
    #[arg(
        long,
        value_name = "LEVEL",
        value_parser = parse_level,
        action = ArgAction::Set,
        default_value = "1"
    )]
    clock_start: bool,

    /// Run as fast as possible instead of following the clock frequency
    #[arg(long)]
    fast: bool,

    /// Number of worker threads (defaults to the number of logical CPUs)
    #[arg(short, long, env = "CIRCUITSIM_THREADS")]
    threads: Option<usize>,
}

fn parse_level(s: &str) -> Result<bool, String> {
    match s {
        "0" => Ok(false),
        "1" => Ok(true),
        _ => Err(format!("invalid level '{s}', expected 0 or 1")),
    }
}

fn parse_assignment(s: &str) -> Result<(ComponentRef, bool), String> {
    let (name, level) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid assignment '{s}', expected NAME=0|1"))?;
    if name.is_empty() {
        return Err(format!("missing component in '{s}'"));
    }

    let component = name.parse::<ComponentRef>().unwrap_or_else(|never| match never {});

    Ok((component, parse_level(level)?))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let text = fs::read_to_string(&cli.path)
        .with_context(|| format!("could not read netlist '{}'", cli.path.display()))?;
    let netlist = Netlist::parse(&text)
        .with_context(|| format!("invalid netlist '{}'", cli.path.display()))?;

    println!("Components: {}", netlist.len());
    println!("Terminals: {}", netlist.terminals().len());

    let has_clock = netlist.clock().is_some();
    let mut bench = match cli.threads {
        Some(threads) => SimInit::with_num_threads(netlist, threads),
        None => SimInit::new(netlist),
    };
    for (source, level) in cli.sources {
        bench = bench.set_source(source, level);
    }
    for (dff, level) in cli.dffs {
        bench = bench.set_dff(dff, level);
    }
    if has_clock {
        bench = bench
            .set_clock(cli.frequency, cli.pulses)
            .set_clock_start(cli.clock_start);
    }
    if cli.fast {
        bench = bench.set_pacer(NoPacer::new());
    }

    let simu = bench.init().context("could not initialize the simulation")?;
    simu.run(&mut |change: Change| println!("[Output] {}", change.word))
        .context("simulation failed")?;

    Ok(())
}
