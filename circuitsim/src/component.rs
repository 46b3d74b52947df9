//! Component kinds and their execution protocols.
//!
//! Every component of a netlist belongs to one of the [`ComponentKind`]
//! variants, which fixes its input and output arity. At run time, each
//! component is executed by its own worker:
//!
//! * combinational [`Gate`]s read all their inputs, evaluate their boolean
//!   function and broadcast the result,
//! * sources broadcast a constant level forever,
//! * D flip-flops sample their data line on each active clock level and
//!   broadcast `Q` and `¬Q`,
//! * the clock alternates its level, waiting for the collector's settle
//!   acknowledgement between edges.

pub(crate) mod actor;
pub(crate) mod clock;

use std::fmt;

/// Input port of a D flip-flop connected to the clock line.
pub const DFF_CLOCK_PORT: usize = 0;
/// Input port of a D flip-flop connected to the data line.
pub const DFF_DATA_PORT: usize = 1;
/// Output port of a D flip-flop carrying `Q`.
pub const DFF_Q_PORT: usize = 0;
/// Output port of a D flip-flop carrying `¬Q`.
pub const DFF_Q_BAR_PORT: usize = 1;

/// A combinational logic gate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Gate {
    /// Inverter.
    Not,
    /// 2-input AND.
    And,
    /// 2-input OR.
    Or,
    /// 2-input NAND.
    Nand,
    /// 2-input NOR.
    Nor,
    /// 2-input XOR.
    Xor,
}

impl Gate {
    /// Returns the number of inputs of the gate.
    pub const fn arity(self) -> usize {
        match self {
            Self::Not => 1,
            Self::And | Self::Or | Self::Nand | Self::Nor | Self::Xor => 2,
        }
    }

    /// Evaluates the gate.
    ///
    /// # Panics
    ///
    /// Panics if fewer inputs than the gate arity are provided.
    pub fn eval(self, inputs: &[bool]) -> bool {
        match self {
            Self::Not => !inputs[0],
            Self::And => inputs[0] && inputs[1],
            Self::Or => inputs[0] || inputs[1],
            Self::Nand => !(inputs[0] && inputs[1]),
            Self::Nor => !(inputs[0] || inputs[1]),
            Self::Xor => inputs[0] != inputs[1],
        }
    }
}

/// The kind of a netlist component.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// A combinational gate.
    Gate(Gate),
    /// A constant logic level.
    Source,
    /// The clock.
    Clock,
    /// An edge-sampled D flip-flop.
    Dff,
}

impl ComponentKind {
    /// All component kinds, in keyword order.
    pub const ALL: [ComponentKind; 9] = [
        Self::Gate(Gate::Not),
        Self::Gate(Gate::And),
        Self::Gate(Gate::Or),
        Self::Gate(Gate::Nand),
        Self::Gate(Gate::Nor),
        Self::Gate(Gate::Xor),
        Self::Source,
        Self::Clock,
        Self::Dff,
    ];

    /// Returns the number of input ports.
    pub const fn input_arity(self) -> usize {
        match self {
            Self::Gate(gate) => gate.arity(),
            Self::Source | Self::Clock => 0,
            Self::Dff => 2,
        }
    }

    /// Returns the number of output ports.
    pub const fn output_arity(self) -> usize {
        match self {
            Self::Dff => 2,
            _ => 1,
        }
    }

    /// Returns the netlist keyword of this kind.
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Gate(Gate::Not) => "not",
            Self::Gate(Gate::And) => "and",
            Self::Gate(Gate::Or) => "or",
            Self::Gate(Gate::Nand) => "nand",
            Self::Gate(Gate::Nor) => "nor",
            Self::Gate(Gate::Xor) => "xor",
            Self::Source => "source",
            Self::Clock => "clk",
            Self::Dff => "dff",
        }
    }

    /// Looks up a kind from its netlist keyword, ignoring case.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.keyword().eq_ignore_ascii_case(keyword))
    }

    /// Checks whether declarations of this kind carry a name token.
    pub const fn is_named(self) -> bool {
        matches!(self, Self::Source | Self::Dff)
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}
