//! Simulation management.
//!
//! This module contains most notably the [`Simulation`] environment, the
//! [`SimInit`] simulation builder and the [`Observer`] trait through which
//! output word changes are reported.
//!
//! # Simulation lifecycle
//!
//! The lifecycle of a simulation typically comprises the following stages:
//!
//! 1. construction of a validated [`Netlist`](crate::netlist::Netlist), either
//!    with a [`NetlistBuilder`](crate::netlist::NetlistBuilder) or by parsing
//!    its textual description,
//! 2. instantiation of a [`SimInit`] builder and configuration of the source
//!    levels, initial flip-flop states, clock and pacer,
//! 3. initialization of a [`Simulation`] with [`SimInit::init()`], which
//!    creates all wires and workers,
//! 4. execution with [`Simulation::run()`], which spawns one worker per
//!    component, samples the terminals until the pulse budget is exhausted
//!    and finally shuts all workers down.
//!
//! # Practical considerations
//!
//! ## Settling
//!
//! There is no global scheduler: each worker blocks until its inputs carry a
//! value for the current cycle and its outputs were drained by all their
//! consumers. A combinational network therefore settles in exactly one pass.
//! In a clocked netlist, the clock waits for the collector's acknowledgement
//! before producing the next edge, so the word reported for a given cycle
//! always reflects the fully settled effects of that edge.
//!
//! ## Clock frequency
//!
//! The frequency sets a lower bound on the interval between two edges: the
//! pause of the [`Pacer`](crate::time::Pacer) only starts once an edge has
//! settled. A simulation paced with [`NoPacer`](crate::time::NoPacer) runs as
//! fast as the workers can propagate values.
//!
//! The clock driver runs on a dedicated thread named
//! [`CLOCK_THREAD_NAME`], so a blocking pacer never holds one of the threads
//! of the worker pool.
//!
//! # Example
//!
//! ```
//! use circuitsim::netlist::Netlist;
//! use circuitsim::simulation::{ChangeBuffer, SimInit};
//!
//! // Two sources feeding an AND gate.
//! let netlist = Netlist::parse(
//!     "source a out 2 0\n\
//!      source b out 2 1\n\
//!      and out res\n",
//! )?;
//!
//! let mut changes = ChangeBuffer::new();
//! let summary = SimInit::new(netlist)
//!     .set_source("a", true)
//!     .set_source("b", true)
//!     .init()?
//!     .run(&mut changes)?;
//!
//! assert_eq!(summary.cycles, 1);
//! assert_eq!(changes.values().collect::<Vec<_>>(), vec![1]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
mod collector;
mod observer;
mod sim_init;

pub use collector::RunSummary;
pub use observer::{Change, ChangeBuffer, ChangeSlot, Observer, OutputWord};
pub use sim_init::{ComponentRef, SimInit, DEFAULT_FREQUENCY, DEFAULT_PULSES};

use std::error::Error;
use std::fmt;
use std::io;
use std::panic;
use std::thread;

use futures_executor::{block_on, ThreadPool};
use tracing::{info, Instrument, Span};

use crate::component::actor::Actor;
use crate::component::ComponentKind;
use crate::wire::WireArena;

use collector::Collector;

/// Name of the dedicated thread running the clock driver.
///
/// The clock is the only worker that blocks while waiting between edges, so
/// it never runs on the worker thread pool.
pub const CLOCK_THREAD_NAME: &str = "circuitsim-clock";

/// Simulation environment.
///
/// A `Simulation` is created by calling [`SimInit::init()`] on a simulation
/// initializer. It owns the worker thread pool, every wire of the netlist and
/// the workers, which are only spawned by [`run()`](Simulation::run).
pub struct Simulation {
    pool: ThreadPool,
    arena: WireArena,
    actors: Vec<(Span, Actor)>,
    collector: Collector,
}

impl Simulation {
    /// Creates a new `Simulation`.
    pub(crate) fn new(
        pool: ThreadPool,
        arena: WireArena,
        actors: Vec<(Span, Actor)>,
        collector: Collector,
    ) -> Self {
        Self {
            pool,
            arena,
            actors,
            collector,
        }
    }

    /// Runs the simulation to completion, reporting each change of the output
    /// word to the observer.
    ///
    /// Without a clock, the terminals are sampled exactly once. Otherwise, the
    /// simulation stops once the configured number of pulses has elapsed.
    /// Either way, all workers are shut down before this method returns.
    pub fn run<O>(self, observer: &mut O) -> Result<RunSummary, SimulationError>
    where
        O: Observer + ?Sized,
    {
        let Self {
            pool,
            arena,
            actors,
            collector,
        } = self;

        info!(
            components = actors.len(),
            wires = arena.len(),
            "simulation started"
        );
        // The clock blocks while pacing and runs on its own thread.
        let mut clock = None;
        for (span, actor) in actors {
            if matches!(actor, Actor::Clock(_)) {
                let spawned = thread::Builder::new()
                    .name(CLOCK_THREAD_NAME.into())
                    .spawn(move || block_on(actor.run().instrument(span)));
                match spawned {
                    Ok(handle) => clock = Some(handle),
                    Err(err) => {
                        arena.close_all();
                        return Err(SimulationError::ThreadPool(err));
                    }
                }
            } else {
                pool.spawn_ok(actor.run().instrument(span));
            }
        }

        let summary = block_on(collector.run(observer));

        // Workers blocked on a wire observe the closure and return.
        arena.close_all();
        if let Some(Err(payload)) = clock.map(|handle| handle.join()) {
            panic::resume_unwind(payload);
        }

        let summary = summary.map_err(|_| SimulationError::Disconnected)?;
        info!(
            cycles = summary.cycles,
            acknowledgements = summary.acknowledgements,
            word = %summary.last_word,
            "simulation completed"
        );

        Ok(summary)
    }
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("components", &self.actors.len())
            .field("wires", &self.arena.len())
            .finish_non_exhaustive()
    }
}

/// An error returned when the run-time configuration is invalid.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// No component of the expected kind matches the reference.
    UnknownComponent(ComponentRef),
    /// The component referenced by index is not of the expected kind.
    KindMismatch {
        /// Index of the component.
        component: usize,
        /// Expected kind.
        expected: ComponentKind,
        /// Actual kind.
        found: ComponentKind,
    },
    /// The clock frequency is zero.
    ZeroFrequency,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownComponent(reference) => {
                write!(fmt, "no matching component for reference {reference}")
            }
            Self::KindMismatch {
                component,
                expected,
                found,
            } => write!(
                fmt,
                "component {component} is a '{found}' but a '{expected}' was expected"
            ),
            Self::ZeroFrequency => fmt.write_str("the clock frequency must be non-zero"),
        }
    }
}

impl Error for ConfigError {}

/// An error returned when a simulation cannot be initialized or run.
#[derive(Debug)]
#[non_exhaustive]
pub enum SimulationError {
    /// The run-time configuration is invalid.
    Config(ConfigError),
    /// The worker thread pool or the clock thread could not be created.
    ThreadPool(io::Error),
    /// A wire was disconnected before the simulation completed, which
    /// typically means that a worker panicked.
    Disconnected,
}

impl fmt::Display for SimulationError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(_) => fmt.write_str("invalid simulation configuration"),
            Self::ThreadPool(_) => fmt.write_str("the worker threads could not be created"),
            Self::Disconnected => fmt.write_str("a wire was disconnected during the simulation"),
        }
    }
}

impl Error for SimulationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::ThreadPool(err) => Some(err),
            Self::Disconnected => None,
        }
    }
}

impl From<ConfigError> for SimulationError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}
