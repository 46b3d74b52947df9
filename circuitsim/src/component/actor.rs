//! Component workers.

use tracing::{debug, trace};

use crate::component::clock::ClockDriver;
use crate::component::Gate;
use crate::wire::{WireClosed, WireReader, WireWriter};

/// A component worker, ready to be spawned.
#[derive(Debug)]
pub(crate) enum Actor {
    Gate(GateActor),
    Source(SourceActor),
    FlipFlop(FlipFlop),
    Clock(ClockDriver),
}

impl Actor {
    /// Runs the worker until one of its wires is closed.
    pub(crate) async fn run(mut self) {
        if let Self::Source(source) = &self {
            // Nothing would ever pace a source without consumers.
            if source.output.consumers() == 0 {
                debug!("source has no consumer, not started");
                return;
            }
        }

        debug!("worker started");

        let mut cycles: u64 = 0;
        loop {
            let step = match &mut self {
                Self::Gate(actor) => actor.step().await,
                Self::Source(actor) => actor.step().await,
                Self::FlipFlop(actor) => actor.step().await,
                Self::Clock(actor) => actor.step().await,
            };
            if step.is_err() {
                break;
            }
            cycles += 1;
        }

        debug!(cycles, "worker stopped");
    }
}

/// Worker of a combinational gate.
#[derive(Debug)]
pub(crate) struct GateActor {
    gate: Gate,
    inputs: Vec<WireReader>,
    output: WireWriter,
}

impl GateActor {
    /// Creates a gate worker.
    ///
    /// The inputs must be provided in port order and their number must match
    /// the gate arity.
    pub(crate) fn new(gate: Gate, inputs: Vec<WireReader>, output: WireWriter) -> Self {
        debug_assert_eq!(inputs.len(), gate.arity());

        Self {
            gate,
            inputs,
            output,
        }
    }

    /// Reads one value from every input, in port order, then broadcasts the
    /// gate output.
    pub(crate) async fn step(&mut self) -> Result<(), WireClosed> {
        let mut values = [false; 2];
        for (value, input) in values.iter_mut().zip(&mut self.inputs) {
            *value = input.read().await?;
        }

        let output = self.gate.eval(&values[..self.inputs.len()]);
        trace!(inputs = ?&values[..self.inputs.len()], output, "gate evaluated");

        self.output.write(output).await
    }
}

/// Worker of a constant source.
#[derive(Debug)]
pub(crate) struct SourceActor {
    value: bool,
    output: WireWriter,
}

impl SourceActor {
    pub(crate) fn new(value: bool, output: WireWriter) -> Self {
        Self { value, output }
    }

    /// Broadcasts the constant level once.
    pub(crate) async fn step(&mut self) -> Result<(), WireClosed> {
        self.output.write(self.value).await
    }
}

/// Worker of an edge-sampled D flip-flop.
#[derive(Debug)]
pub(crate) struct FlipFlop {
    q: bool,
    is_first_cycle: bool,
    clock: WireReader,
    data: WireReader,
    q_out: WireWriter,
    q_bar_out: WireWriter,
}

impl FlipFlop {
    pub(crate) fn new(
        initial_q: bool,
        clock: WireReader,
        data: WireReader,
        q_out: WireWriter,
        q_bar_out: WireWriter,
    ) -> Self {
        Self {
            q: initial_q,
            is_first_cycle: true,
            clock,
            data,
            q_out,
            q_bar_out,
        }
    }

    /// Returns the current state.
    #[cfg(test)]
    pub(crate) fn q(&self) -> bool {
        self.q
    }

    /// Processes one clock level and broadcasts `Q` and `¬Q`.
    pub(crate) async fn step(&mut self) -> Result<(), WireClosed> {
        let clock = self.clock.read().await?;

        // No data is available before the first edge, so the initial state is
        // emitted as is.
        if !self.is_first_cycle {
            // The data line must be drained on every cycle, even when the
            // value is not sampled, or its producer would stall.
            let data = self.data.read().await?;
            if clock {
                self.q = data;
            }
            trace!(clock, data, q = self.q, "flip-flop clocked");
        }

        self.q_out.write(self.q).await?;
        self.q_bar_out.write(!self.q).await?;
        self.is_first_cycle = false;

        Ok(())
    }
}
