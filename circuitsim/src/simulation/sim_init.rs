use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use futures_executor::ThreadPool;
use tracing::{info_span, warn};

use crate::component::actor::{Actor, FlipFlop, GateActor, SourceActor};
use crate::component::clock::ClockDriver;
use crate::component::ComponentKind;
use crate::netlist::{Netlist, Target};
use crate::time::{Pacer, SpinPacer};
use crate::wire::{Strength, WireArena, WireId, WireReader, WireWriter};

use super::collector::Collector;
use super::{ConfigError, Simulation, SimulationError};

/// Default clock frequency, in edges per second.
pub const DEFAULT_FREQUENCY: u32 = 1;

/// Default number of clock pulses.
pub const DEFAULT_PULSES: u64 = 8;

/// A reference to one or several components of a netlist.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ComponentRef {
    /// The component with this declaration index.
    Index(usize),
    /// All components carrying this name.
    Name(String),
}

impl From<usize> for ComponentRef {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<&str> for ComponentRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

impl From<String> for ComponentRef {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl FromStr for ComponentRef {
    type Err = Infallible;

    /// Parses a declaration index, or a name if the string is not a number.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse()
            .map(Self::Index)
            .unwrap_or_else(|_| Self::Name(s.to_owned())))
    }
}

impl fmt::Display for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "#{index}"),
            Self::Name(name) => write!(f, "'{name}'"),
        }
    }
}

/// Builder for a simulation of a netlist.
///
/// The builder binds the run-time configuration to a validated [`Netlist`]:
/// source levels, initial flip-flop states, clock frequency and pulse budget,
/// pacing and number of worker threads. Unless configured otherwise, sources
/// and flip-flops start low, the clock starts high and runs at
/// [`DEFAULT_FREQUENCY`] for [`DEFAULT_PULSES`] pulses in real time.
pub struct SimInit {
    netlist: Netlist,
    num_threads: usize,
    sources: Vec<(ComponentRef, bool)>,
    dffs: Vec<(ComponentRef, bool)>,
    clock: Option<(u32, u64)>,
    clock_start: bool,
    pacer: Box<dyn Pacer + 'static>,
}

impl SimInit {
    /// Creates a builder for a simulation running on all available logical
    /// threads.
    pub fn new(netlist: Netlist) -> Self {
        Self::with_num_threads(netlist, num_cpus::get())
    }

    /// Creates a builder for a simulation running on the specified number of
    /// threads.
    ///
    /// Since every component has a dedicated worker, the number of threads
    /// only affects parallelism, not the result. The clock, if any, runs on an
    /// additional thread of its own.
    pub fn with_num_threads(netlist: Netlist, num_threads: usize) -> Self {
        Self {
            netlist,
            num_threads: num_threads.max(1),
            sources: Vec::new(),
            dffs: Vec::new(),
            clock: None,
            clock_start: true,
            pacer: Box::new(SpinPacer::new()),
        }
    }

    /// Sets the level of one or several sources.
    pub fn set_source(mut self, source: impl Into<ComponentRef>, value: bool) -> Self {
        self.sources.push((source.into(), value));

        self
    }

    /// Sets the initial state of one or several D flip-flops.
    pub fn set_dff(mut self, dff: impl Into<ComponentRef>, value: bool) -> Self {
        self.dffs.push((dff.into(), value));

        self
    }

    /// Sets the clock frequency, in edges per second, and the number of full
    /// clock pulses after which the simulation stops.
    pub fn set_clock(mut self, frequency: u32, pulses: u64) -> Self {
        self.clock = Some((frequency, pulses));

        self
    }

    /// Sets the level of the first clock edge.
    pub fn set_clock_start(mut self, level: bool) -> Self {
        self.clock_start = level;

        self
    }

    /// Paces the clock with the provided [`Pacer`].
    ///
    /// If the pacer isn't explicitly set then the default
    /// [`SpinPacer`] is used, resulting in a clock running in real time.
    pub fn set_pacer(mut self, pacer: impl Pacer + 'static) -> Self {
        self.pacer = Box::new(pacer);

        self
    }

    /// Validates the configuration and creates all wires, workers and the
    /// worker thread pool.
    ///
    /// The workers are only spawned by [`Simulation::run()`].
    pub fn init(self) -> Result<Simulation, SimulationError> {
        let netlist = &self.netlist;

        let mut levels = vec![false; netlist.len()];
        for (reference, value) in &self.sources {
            for index in resolve(netlist, reference, ComponentKind::Source)? {
                levels[index] = *value;
            }
        }
        for (reference, value) in &self.dffs {
            for index in resolve(netlist, reference, ComponentKind::Dff)? {
                levels[index] = *value;
            }
        }

        let (frequency, pulses) = self
            .clock
            .unwrap_or((DEFAULT_FREQUENCY, DEFAULT_PULSES));
        if frequency == 0 {
            return Err(ConfigError::ZeroFrequency.into());
        }
        if self.clock.is_some() && netlist.clock().is_none() {
            warn!("clock configured but the netlist has no clock");
        }
        let half_period = Duration::from_secs(1) / frequency;

        // The wires of the netlist keep their identifiers in the arena.
        let mut arena = WireArena::with_capacity(netlist.wires().len() + 1);
        for wire in netlist.wires() {
            arena.insert(wire.strength(), wire.consumers());
        }
        let settle = netlist
            .clock()
            .map(|_| arena.insert(Strength::Rendezvous, 1));

        // Distribute the readers of each wire to its subscribers.
        let mut writers = Vec::with_capacity(netlist.wires().len());
        let mut inputs: Vec<Vec<Option<WireReader>>> = netlist
            .components()
            .iter()
            .map(|component| (0..component.inputs().len()).map(|_| None).collect())
            .collect();
        let mut terminals = Vec::with_capacity(netlist.terminals().len());
        for (index, wire) in netlist.wires().iter().enumerate() {
            let (writer, readers) = endpoints(&arena, WireId(index))?;
            for (target, reader) in wire.targets().iter().zip(readers) {
                match *target {
                    Target::Input { component, port } => {
                        inputs[component][port] = Some(reader);
                    }
                    Target::Terminal => terminals.push(reader),
                }
            }
            writers.push(writer);
        }

        let (settle_writer, mut settle_reader) = match settle {
            Some(id) => {
                let (writer, mut readers) = endpoints(&arena, id)?;
                (Some(writer), readers.pop())
            }
            None => (None, None),
        };

        let mut pacer = Some(self.pacer);
        let mut writers = writers.into_iter();
        let mut actors = Vec::with_capacity(netlist.len());
        for (index, (component, inputs)) in netlist.components().iter().zip(inputs).enumerate() {
            // Output wires are allocated contiguously in declaration order.
            let mut outputs = writers.by_ref().take(component.outputs().len());
            let mut inputs = inputs.into_iter().flatten();

            let actor = match component.kind() {
                ComponentKind::Gate(gate) => outputs
                    .next()
                    .map(|output| Actor::Gate(GateActor::new(gate, inputs.collect(), output))),
                ComponentKind::Source => outputs
                    .next()
                    .map(|output| Actor::Source(SourceActor::new(levels[index], output))),
                ComponentKind::Dff => flip_flop(levels[index], &mut inputs, &mut outputs),
                ComponentKind::Clock => outputs.next().and_then(|output| {
                    Some(Actor::Clock(ClockDriver::new(
                        self.clock_start,
                        half_period,
                        output,
                        settle_reader.take()?,
                        pacer.take()?,
                    )))
                }),
            }
            .ok_or(SimulationError::Disconnected)?;

            let span = info_span!(
                target: "circuitsim",
                "component",
                index,
                kind = %component.kind(),
                name = component.name().unwrap_or_default()
            );
            actors.push((span, actor));
        }

        let pool = ThreadPool::builder()
            .pool_size(self.num_threads)
            .name_prefix("circuitsim-worker-")
            .create()
            .map_err(SimulationError::ThreadPool)?;

        Ok(Simulation::new(
            pool,
            arena,
            actors,
            Collector::new(terminals, settle_writer, pulses),
        ))
    }
}

impl fmt::Debug for SimInit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimInit")
            .field("components", &self.netlist.len())
            .field("num_threads", &self.num_threads)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

/// Returns the indices of all components of the expected kind matching a
/// reference.
fn resolve(
    netlist: &Netlist,
    reference: &ComponentRef,
    expected: ComponentKind,
) -> Result<Vec<usize>, ConfigError> {
    let indices: Vec<usize> = match reference {
        ComponentRef::Index(index) => {
            let component = netlist
                .component(*index)
                .ok_or_else(|| ConfigError::UnknownComponent(reference.clone()))?;
            if component.kind() != expected {
                return Err(ConfigError::KindMismatch {
                    component: *index,
                    expected,
                    found: component.kind(),
                });
            }
            vec![*index]
        }
        ComponentRef::Name(name) => netlist
            .find(name)
            .filter(|index| {
                netlist
                    .component(*index)
                    .is_some_and(|component| component.kind() == expected)
            })
            .collect(),
    };

    if indices.is_empty() {
        return Err(ConfigError::UnknownComponent(reference.clone()));
    }

    Ok(indices)
}

fn endpoints(
    arena: &WireArena,
    id: WireId,
) -> Result<(WireWriter, Vec<WireReader>), SimulationError> {
    arena
        .get(id)
        .map(|wire| wire.endpoints())
        .ok_or(SimulationError::Disconnected)
}

fn flip_flop(
    initial_q: bool,
    inputs: &mut impl Iterator<Item = WireReader>,
    outputs: &mut impl Iterator<Item = WireWriter>,
) -> Option<Actor> {
    let clock = inputs.next()?;
    let data = inputs.next()?;
    let q_out = outputs.next()?;
    let q_bar_out = outputs.next()?;

    Some(Actor::FlipFlop(FlipFlop::new(
        initial_q, clock, data, q_out, q_bar_out,
    )))
}
