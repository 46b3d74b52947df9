use std::error::Error;
use std::fmt;

/// An error returned when a netlist cannot be parsed or validated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildError {
    component: Option<usize>,
    line: Option<usize>,
    kind: BuildErrorKind,
}

impl BuildError {
    pub(crate) fn new(kind: BuildErrorKind) -> Self {
        Self {
            component: None,
            line: None,
            kind,
        }
    }

    pub(crate) fn at(mut self, component: usize, line: Option<usize>) -> Self {
        self.component = Some(component);
        self.line = line;

        self
    }

    /// Returns the category of the error.
    pub fn kind(&self) -> &BuildErrorKind {
        &self.kind
    }

    /// Returns the index of the offending component, if any.
    pub fn component(&self) -> Option<usize> {
        self.component
    }

    /// Returns the 1-based line of the offending declaration, if it was
    /// parsed.
    pub fn line(&self) -> Option<usize> {
        self.line
    }
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line, self.component) {
            (Some(line), Some(component)) => {
                write!(f, "line {line} (component {component}): {}", self.kind)
            }
            (None, Some(component)) => write!(f, "component {component}: {}", self.kind),
            (Some(line), None) => write!(f, "line {line}: {}", self.kind),
            (None, None) => fmt::Display::fmt(&self.kind, f),
        }
    }
}

impl Error for BuildError {}

/// The category of a [`BuildError`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum BuildErrorKind {
    /// The component type keyword is not recognized.
    UnknownType(String),
    /// A source or flip-flop declaration lacks its name.
    MissingName,
    /// The `out` keyword was expected but not found.
    MissingOutput,
    /// More output ports were declared than the component has.
    TooManyOutputs {
        /// Number of declared output ports.
        declared: usize,
        /// Number of output ports of the component.
        allowed: usize,
    },
    /// A destination component index is not a number.
    InvalidIndex(String),
    /// A destination port is missing or is not a number.
    InvalidPort(String),
    /// A destination component does not exist.
    ComponentOutOfRange {
        /// Index of the destination component.
        target: usize,
    },
    /// A destination port does not exist on its component.
    PortOutOfRange {
        /// Index of the destination component.
        target: usize,
        /// Index of the destination port.
        port: usize,
    },
    /// An input port is connected to more than one output.
    InputAlreadyBound {
        /// Index of the destination component.
        target: usize,
        /// Index of the destination port.
        port: usize,
    },
    /// An input port of the component is connected to no output.
    UnboundInput {
        /// Index of the unbound port.
        port: usize,
    },
    /// The netlist declares no component.
    NoComponents,
    /// More than one clock is declared.
    MultipleClocks,
    /// The component is part of a loop that does not go through the data
    /// line of a flip-flop.
    CombinationalLoop,
    /// More terminals are declared than fit in an output word.
    TooManyTerminals {
        /// Number of declared terminals.
        count: usize,
    },
}

impl fmt::Display for BuildErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownType(keyword) => write!(f, "unknown component type '{keyword}'"),
            Self::MissingName => f.write_str("missing component name"),
            Self::MissingOutput => f.write_str("expected 'out'"),
            Self::TooManyOutputs { declared, allowed } => write!(
                f,
                "{declared} outputs declared but the component has {allowed}"
            ),
            Self::InvalidIndex(token) => write!(f, "invalid component index '{token}'"),
            Self::InvalidPort(token) if token.is_empty() => f.write_str("missing port number"),
            Self::InvalidPort(token) => write!(f, "invalid port number '{token}'"),
            Self::ComponentOutOfRange { target } => {
                write!(f, "component {target} does not exist")
            }
            Self::PortOutOfRange { target, port } => {
                write!(f, "component {target} has no input port {port}")
            }
            Self::InputAlreadyBound { target, port } => {
                write!(f, "input port {port} of component {target} is already connected")
            }
            Self::UnboundInput { port } => write!(f, "input port {port} is not connected"),
            Self::NoComponents => f.write_str("the netlist declares no component"),
            Self::MultipleClocks => f.write_str("only one clock may be declared"),
            Self::CombinationalLoop => f.write_str("combinational loop detected"),
            Self::TooManyTerminals { count } => write!(
                f,
                "{count} terminals declared but at most {} are supported",
                super::MAX_TERMINALS
            ),
        }
    }
}
