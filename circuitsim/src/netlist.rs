//! Netlist description, construction and validation.
//!
//! A [`Netlist`] is the immutable graph of components connected by wires. It
//! is constructed once, either programmatically with a [`NetlistBuilder`] or
//! from its textual description with [`Netlist::parse()`], and is fully
//! validated before any worker can be started.
//!
//! # Textual format
//!
//! Each non-comment line declares one component; components are indexed in
//! declaration order, starting from 0:
//!
//! ```text
//! <type> [<name>] out [<dest_index> <dest_port> | res]* [out ...]*
//! ```
//!
//! `<type>` is one of `not`, `and`, `or`, `nand`, `nor`, `xor`, `source`,
//! `clk` and `dff` (case-insensitive); sources and flip-flops carry a name
//! immediately after the type. Each `out` keyword opens the connection list
//! of the next output port, in which a pair of numbers connects the output to
//! an input port of another component while `res` marks the output as an
//! observable terminal. Lines starting with `/` are comments.
//!
//! # Examples
//!
//! A source driving an inverter whose output is observed:
//!
//! ```
//! use circuitsim::netlist::Netlist;
//!
//! let netlist = Netlist::parse(
//!     "// inverter\n\
//!      source a out 1 0\n\
//!      not out res\n",
//! )
//! .unwrap();
//!
//! assert_eq!(netlist.len(), 2);
//! assert_eq!(netlist.terminals().len(), 1);
//! ```
//!
//! The same netlist assembled with a builder:
//!
//! ```
//! use circuitsim::component::{ComponentKind, Gate};
//! use circuitsim::netlist::NetlistBuilder;
//!
//! let mut builder = NetlistBuilder::new();
//! let a = builder.add_named(ComponentKind::Source, "a");
//! let not = builder.add(ComponentKind::Gate(Gate::Not));
//! builder.connect(a, 0, not, 0).terminal(not, 0);
//!
//! let netlist = builder.build().unwrap();
//! assert_eq!(netlist.terminals().len(), 1);
//! ```

mod error;
mod parse;

pub use error::{BuildError, BuildErrorKind};
pub use parse::parse;

use crate::component::{ComponentKind, DFF_DATA_PORT};
use crate::wire::{Strength, WireId};

/// Maximum number of terminals, i.e. the bit width of the output word.
pub const MAX_TERMINALS: usize = u64::BITS as usize;

/// A subscriber of an output port.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Target {
    /// An input port of a component.
    Input {
        /// Index of the component.
        component: usize,
        /// Index of the input port.
        port: usize,
    },
    /// The collector, which observes the output as a terminal.
    Terminal,
}

/// An unvalidated component declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    /// Kind of the component.
    pub kind: ComponentKind,
    /// Optional display name.
    pub name: Option<String>,
    /// Subscribers of each declared output port, in port order.
    pub outputs: Vec<Vec<Target>>,
    /// Source line, if the declaration was parsed.
    pub line: Option<usize>,
}

impl Declaration {
    /// Creates a declaration without name nor outputs.
    pub fn new(kind: ComponentKind) -> Self {
        Self {
            kind,
            name: None,
            outputs: Vec::new(),
            line: None,
        }
    }
}

/// Builder for a [`Netlist`].
#[derive(Clone, Debug, Default)]
pub struct NetlistBuilder {
    declarations: Vec<Declaration>,
}

impl NetlistBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder from existing declarations.
    pub fn from_declarations(declarations: Vec<Declaration>) -> Self {
        Self { declarations }
    }

    /// Adds an anonymous component and returns its index.
    pub fn add(&mut self, kind: ComponentKind) -> usize {
        self.declare(Declaration::new(kind))
    }

    /// Adds a named component and returns its index.
    pub fn add_named(&mut self, kind: ComponentKind, name: impl Into<String>) -> usize {
        let mut declaration = Declaration::new(kind);
        declaration.name = Some(name.into());

        self.declare(declaration)
    }

    /// Adds a declaration and returns its index.
    pub fn declare(&mut self, declaration: Declaration) -> usize {
        self.declarations.push(declaration);

        self.declarations.len() - 1
    }

    /// Connects an output port to an input port of another component.
    ///
    /// The target is only validated by [`build()`](NetlistBuilder::build).
    ///
    /// # Panics
    ///
    /// Panics if `component` was not previously added.
    pub fn connect(
        &mut self,
        component: usize,
        output: usize,
        target: usize,
        port: usize,
    ) -> &mut Self {
        self.output_mut(component, output).push(Target::Input {
            component: target,
            port,
        });

        self
    }

    /// Marks an output port as an observable terminal.
    ///
    /// # Panics
    ///
    /// Panics if `component` was not previously added.
    pub fn terminal(&mut self, component: usize, output: usize) -> &mut Self {
        self.output_mut(component, output).push(Target::Terminal);

        self
    }

    fn output_mut(&mut self, component: usize, output: usize) -> &mut Vec<Target> {
        let outputs = &mut self.declarations[component].outputs;
        if outputs.len() <= output {
            outputs.resize_with(output + 1, Vec::new);
        }

        &mut outputs[output]
    }

    /// Validates the declarations and builds the netlist.
    pub fn build(self) -> Result<Netlist, BuildError> {
        let declarations = self.declarations;
        if declarations.is_empty() {
            return Err(BuildError::new(BuildErrorKind::NoComponents));
        }

        let error = |index: usize, kind: BuildErrorKind| {
            BuildError::new(kind).at(index, declarations[index].line)
        };

        let mut clock = None;
        let mut inputs: Vec<Vec<Option<WireId>>> = declarations
            .iter()
            .map(|declaration| vec![None; declaration.kind.input_arity()])
            .collect();
        let mut outputs = Vec::with_capacity(declarations.len());
        let mut wires = Vec::new();
        let mut terminals = Vec::new();

        for (index, declaration) in declarations.iter().enumerate() {
            let kind = declaration.kind;

            if kind == ComponentKind::Clock {
                if clock.is_some() {
                    return Err(error(index, BuildErrorKind::MultipleClocks));
                }
                clock = Some(index);
            }

            if declaration.outputs.len() > kind.output_arity() {
                return Err(error(
                    index,
                    BuildErrorKind::TooManyOutputs {
                        declared: declaration.outputs.len(),
                        allowed: kind.output_arity(),
                    },
                ));
            }

            // Clock edges are handed over synchronously to each consumer.
            let strength = if kind == ComponentKind::Clock {
                Strength::Rendezvous
            } else {
                Strength::Buffered
            };

            let mut component_outputs = Vec::with_capacity(kind.output_arity());
            for port in 0..kind.output_arity() {
                let id = WireId(wires.len());
                let targets = declaration.outputs.get(port).cloned().unwrap_or_default();

                for target in &targets {
                    match *target {
                        Target::Input {
                            component: target,
                            port: target_port,
                        } => {
                            let Some(target_inputs) = inputs.get_mut(target) else {
                                return Err(error(
                                    index,
                                    BuildErrorKind::ComponentOutOfRange { target },
                                ));
                            };
                            let Some(input) = target_inputs.get_mut(target_port) else {
                                return Err(error(
                                    index,
                                    BuildErrorKind::PortOutOfRange {
                                        target,
                                        port: target_port,
                                    },
                                ));
                            };
                            if input.is_some() {
                                return Err(error(
                                    index,
                                    BuildErrorKind::InputAlreadyBound {
                                        target,
                                        port: target_port,
                                    },
                                ));
                            }
                            *input = Some(id);
                        }
                        Target::Terminal => terminals.push(id),
                    }
                }

                wires.push(WireDecl {
                    producer: index,
                    port,
                    strength,
                    targets,
                });
                component_outputs.push(id);
            }
            outputs.push(component_outputs);
        }

        let mut components = Vec::with_capacity(declarations.len());
        for (index, (declaration, (inputs, outputs))) in declarations
            .iter()
            .zip(inputs.into_iter().zip(outputs))
            .enumerate()
        {
            let inputs = inputs
                .into_iter()
                .enumerate()
                .map(|(port, input)| {
                    input.ok_or_else(|| error(index, BuildErrorKind::UnboundInput { port }))
                })
                .collect::<Result<Vec<_>, _>>()?;

            components.push(Component {
                kind: declaration.kind,
                name: declaration.name.clone(),
                line: declaration.line,
                inputs,
                outputs,
            });
        }

        if terminals.len() > MAX_TERMINALS {
            return Err(BuildError::new(BuildErrorKind::TooManyTerminals {
                count: terminals.len(),
            }));
        }

        let netlist = Netlist {
            components,
            wires,
            terminals,
            clock,
        };

        if let Some(index) = netlist.find_combinational_loop() {
            return Err(error(index, BuildErrorKind::CombinationalLoop));
        }

        Ok(netlist)
    }
}

/// A validated component.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Component {
    kind: ComponentKind,
    name: Option<String>,
    line: Option<usize>,
    inputs: Vec<WireId>,
    outputs: Vec<WireId>,
}

impl Component {
    /// Returns the kind of the component.
    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    /// Returns the display name of the component, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the source line of the declaration, if it was parsed.
    pub fn line(&self) -> Option<usize> {
        self.line
    }

    /// Returns the wire bound to each input port, in port order.
    pub fn inputs(&self) -> &[WireId] {
        &self.inputs
    }

    /// Returns the wire owned by each output port, in port order.
    pub fn outputs(&self) -> &[WireId] {
        &self.outputs
    }
}

/// The declaration of a wire owned by an output port.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WireDecl {
    producer: usize,
    port: usize,
    strength: Strength,
    targets: Vec<Target>,
}

impl WireDecl {
    /// Returns the index of the producing component.
    pub fn producer(&self) -> usize {
        self.producer
    }

    /// Returns the output port of the producing component.
    pub fn port(&self) -> usize {
        self.port
    }

    /// Returns the synchronization strength.
    pub fn strength(&self) -> Strength {
        self.strength
    }

    /// Returns the subscribers, in declaration order.
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Returns the number of consumers, terminals included.
    pub fn consumers(&self) -> usize {
        self.targets.len()
    }
}

/// An immutable, validated netlist.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Netlist {
    components: Vec<Component>,
    wires: Vec<WireDecl>,
    terminals: Vec<WireId>,
    clock: Option<usize>,
}

impl Netlist {
    /// Parses and validates a textual netlist.
    pub fn parse(text: &str) -> Result<Self, BuildError> {
        NetlistBuilder::from_declarations(parse(text)?).build()
    }

    /// Returns the number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Checks whether the netlist has no component.
    ///
    /// This is always `false` for a netlist that was successfully built.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Returns all components in declaration order.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Returns the component at the specified index, if any.
    pub fn component(&self, index: usize) -> Option<&Component> {
        self.components.get(index)
    }

    /// Returns all wires, indexed by [`WireId`].
    pub fn wires(&self) -> &[WireDecl] {
        &self.wires
    }

    /// Returns the wire associated to a handle, if any.
    pub fn wire(&self, id: WireId) -> Option<&WireDecl> {
        self.wires.get(id.0)
    }

    /// Returns the terminal wires, most significant bit first.
    ///
    /// A wire appears once per `res` marker, so a wire marked twice
    /// contributes two bits.
    pub fn terminals(&self) -> &[WireId] {
        &self.terminals
    }

    /// Returns the index of the clock, if any.
    pub fn clock(&self) -> Option<usize> {
        self.clock
    }

    /// Returns the indices of all components with the specified name.
    pub fn find<'a>(&'a self, name: &'a str) -> impl Iterator<Item = usize> + 'a {
        self.components
            .iter()
            .enumerate()
            .filter(move |(_, component)| component.name() == Some(name))
            .map(|(index, _)| index)
    }

    /// Searches for a loop that does not go through the data line of a
    /// flip-flop and returns one of its components.
    ///
    /// The data line of a flip-flop is not read before the first edge, so
    /// only such loops can make progress.
    fn find_combinational_loop(&self) -> Option<usize> {
        #[derive(Copy, Clone, PartialEq, Eq)]
        enum Mark {
            Unvisited,
            InProgress,
            Done,
        }

        let successors = |index: usize| {
            self.components[index]
                .outputs
                .iter()
                .flat_map(|id| self.wires[id.0].targets.iter())
                .filter_map(|target| match *target {
                    Target::Input { component, port } => {
                        let is_data_line = self.components[component].kind == ComponentKind::Dff
                            && port == DFF_DATA_PORT;

                        (!is_data_line).then_some(component)
                    }
                    Target::Terminal => None,
                })
                .collect::<Vec<_>>()
        };

        let mut marks = vec![Mark::Unvisited; self.components.len()];
        for root in 0..self.components.len() {
            if marks[root] != Mark::Unvisited {
                continue;
            }

            // Iterative depth-first search.
            marks[root] = Mark::InProgress;
            let mut stack = vec![(root, successors(root), 0)];
            while let Some((node, next, cursor)) = stack.last_mut() {
                let Some(&successor) = next.get(*cursor) else {
                    marks[*node] = Mark::Done;
                    stack.pop();
                    continue;
                };
                *cursor += 1;

                match marks[successor] {
                    Mark::InProgress => return Some(successor),
                    Mark::Unvisited => {
                        marks[successor] = Mark::InProgress;
                        stack.push((successor, successors(successor), 0));
                    }
                    Mark::Done => {}
                }
            }
        }

        None
    }
}
