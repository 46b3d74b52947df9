use std::fmt;

use super::{Strength, Wire};

/// Stable handle to a wire.
///
/// Handles are plain indices: they remain valid for the lifetime of the
/// arena or netlist that issued them and are never reused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WireId(pub(crate) usize);

impl WireId {
    /// Returns the index of the wire within its arena.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

/// An append-only collection of live wires addressed by [`WireId`].
#[derive(Debug, Default)]
pub struct WireArena {
    wires: Vec<Wire>,
}

impl WireArena {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty arena with room for `capacity` wires.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            wires: Vec::with_capacity(capacity),
        }
    }

    /// Creates a new wire and returns its handle.
    pub fn insert(&mut self, strength: Strength, consumers: usize) -> WireId {
        let id = WireId(self.wires.len());
        self.wires.push(Wire::new(strength, consumers));

        id
    }

    /// Returns the wire associated to a handle, if any.
    pub fn get(&self, id: WireId) -> Option<&Wire> {
        self.wires.get(id.0)
    }

    /// Returns the number of wires.
    pub fn len(&self) -> usize {
        self.wires.len()
    }

    /// Checks whether the arena contains no wire.
    pub fn is_empty(&self) -> bool {
        self.wires.is_empty()
    }

    /// Closes all wires, waking every blocked producer and consumer.
    pub fn close_all(&self) {
        for wire in &self.wires {
            wire.close();
        }
    }
}
