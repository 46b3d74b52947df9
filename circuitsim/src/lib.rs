//! A concurrent simulator for digital logic networks.
//!
//! Circuitsim executes a network of logic gates, constant sources, D
//! flip-flops and a single clock, described as a static netlist. Each
//! component runs as an independent asynchronous worker and communicates with
//! the others exclusively through single-bit [wires](wire): values propagate
//! purely by data dependency, without any central scheduler.
//!
//! A collector samples the observable outputs of the network (its
//! *terminals*) once per cycle, assembles them into an output word and reports
//! each change. In a clocked network, the collector also paces the clock: a
//! new edge is only produced once all effects of the previous one have been
//! observed.
//!
//! # A practical overview
//!
//! Simulating a network involves three activities:
//!
//! 1. the description of the network, either as text parsed with
//!    [`Netlist::parse()`](netlist::Netlist::parse) or programmatically with a
//!    [`NetlistBuilder`](netlist::NetlistBuilder); in both cases the netlist
//!    is fully validated before anything runs,
//! 2. the configuration of a simulation with a
//!    [`SimInit`](simulation::SimInit) builder: levels of the sources,
//!    initial states of the flip-flops, clock frequency and pulse budget,
//! 3. the execution of the simulation with
//!    [`Simulation::run()`](simulation::Simulation::run), which reports each
//!    change of the output word to an [`Observer`](simulation::Observer).
//!
//! ## Netlist format
//!
//! Each line declares one component, indexed from 0 in declaration order. The
//! component type is followed by a name for sources and flip-flops, then by
//! one `out` keyword per output port. Each output lists its subscribers,
//! either as a `<component> <input port>` pair or as `res` to mark the output
//! as a terminal:
//!
//! ```text
//! // Toggle flip-flop
//! clk out 1 0
//! dff t out 2 0 res
//! not out 1 1
//! ```
//!
//! The first terminal is the most significant bit of the output word. Inputs
//! of a D flip-flop are the clock (port 0) and the data line (port 1); its
//! outputs are `Q` (port 0) and `¬Q` (port 1). See the [`netlist`] module for
//! the complete grammar.
//!
//! ## Running a simulation
//!
//! The toggle flip-flop above inverts its output on every active clock level.
//! Using the [`NoPacer`](time::NoPacer) pacer, the simulation runs as fast as
//! possible instead of following the clock frequency in real time:
//!
//! ```
//! use circuitsim::netlist::Netlist;
//! use circuitsim::simulation::{ChangeBuffer, SimInit};
//! use circuitsim::time::NoPacer;
//!
//! let netlist = Netlist::parse(
//!     "clk out 1 0\n\
//!      dff t out 2 0 res\n\
//!      not out 1 1\n",
//! )?;
//!
//! let mut changes = ChangeBuffer::new();
//! let summary = SimInit::new(netlist)
//!     .set_clock(1000, 3)
//!     .set_pacer(NoPacer::new())
//!     .init()?
//!     .run(&mut changes)?;
//!
//! // Two half-edges per pulse, each acknowledged once.
//! assert_eq!(summary.acknowledgements, 6);
//! assert_eq!(changes.values().collect::<Vec<_>>(), vec![0, 1, 0]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Logging
//!
//! The simulator emits [`tracing`] events: `info` for the start and completion
//! of a run, `debug` for the start and stop of each worker and `trace` for
//! every evaluation, edge and sampled word. Each worker runs within a span
//! with the following metadata:
//!
//! - name: `component`,
//! - target: `circuitsim`,
//! - verbosity level: [`Level::INFO`](tracing::Level::INFO),
//! - fields `index`, `kind` and `name`, associated to the declaration of the
//!   component in the netlist (`name` is empty for anonymous components).
//!
//! Spans can be used for filtering with an `EnvFilter` from the
//! `tracing-subscriber` crate, for instance to trace a single flip-flop:
//!
//! ```text
//! RUST_LOG='circuitsim[component{name=t}]=trace'
//! ```
//!
//! # Modules documentation
//!
//! * the [`wire`] module describes the synchronization contract of wires and
//!   their two strengths,
//! * the [`component`] module lists the component kinds and their execution
//!   protocols,
//! * the [`netlist`] module specifies the textual format and the validation
//!   rules,
//! * the [`simulation`] module discusses the simulation lifecycle and how
//!   networks settle,
//! * the [`time`] module provides the pacers controlling the clock in real
//!   time.
#![warn(missing_docs, missing_debug_implementations, unreachable_pub)]

pub mod component;
pub mod netlist;
pub mod simulation;
pub mod time;
pub mod wire;
