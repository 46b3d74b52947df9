use std::fmt;
use std::slice;

/// The value of all terminals sampled during one collector pass.
///
/// The first terminal of the netlist is the most significant bit.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct OutputWord {
    value: u64,
    width: usize,
}

impl OutputWord {
    /// Minimum number of digits printed by the [`Display`](fmt::Display)
    /// implementation.
    pub const MIN_DIGITS: usize = 8;

    /// Creates a word from its value and bit width.
    ///
    /// Bits of `value` beyond `width` are cleared.
    pub fn new(value: u64, width: usize) -> Self {
        let width = width.min(u64::BITS as usize);
        let value = match width {
            0 => 0,
            _ => value & (u64::MAX >> (u64::BITS as usize - width)),
        };

        Self { value, width }
    }

    /// Returns the word as an integer.
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Returns the number of terminals.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the level of a terminal, if it exists.
    ///
    /// Terminals are indexed in declaration order, so index 0 is the most
    /// significant bit.
    pub fn bit(&self, terminal: usize) -> Option<bool> {
        (terminal < self.width).then(|| (self.value >> (self.width - 1 - terminal)) & 1 == 1)
    }
}

impl fmt::Display for OutputWord {
    /// Formats the word as binary, zero-padded to at least
    /// [`MIN_DIGITS`](OutputWord::MIN_DIGITS) digits.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:0digits$b}",
            self.value,
            digits = self.width.max(Self::MIN_DIGITS)
        )
    }
}

/// A change of the output word.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Change {
    /// Index of the collector pass during which the word was sampled, starting
    /// from 0.
    ///
    /// In a clocked netlist, pass `n` samples the settled state after the
    /// `n`-th clock edge (0-based).
    pub cycle: u64,
    /// The new output word.
    pub word: OutputWord,
}

/// A receiver of output word changes.
///
/// The observer is called on the thread running
/// [`Simulation::run()`](crate::simulation::Simulation::run), once for the
/// first sampled word and then each time the word differs from the previous
/// pass.
pub trait Observer {
    /// Handles a change of the output word.
    fn observe(&mut self, change: Change);
}

impl<F: FnMut(Change)> Observer for F {
    fn observe(&mut self, change: Change) {
        self(change)
    }
}

/// An observer that records every change in order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeBuffer {
    changes: Vec<Change>,
}

impl ChangeBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded changes.
    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    /// Returns an iterator over the recorded changes.
    pub fn iter(&self) -> slice::Iter<'_, Change> {
        self.changes.iter()
    }

    /// Returns an iterator over the successive output values.
    pub fn values(&self) -> impl Iterator<Item = u64> + '_ {
        self.changes.iter().map(|change| change.word.value())
    }

    /// Returns the number of recorded changes.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Checks whether no change was recorded.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Consumes the buffer and returns the recorded changes.
    pub fn into_vec(self) -> Vec<Change> {
        self.changes
    }
}

impl Observer for ChangeBuffer {
    fn observe(&mut self, change: Change) {
        self.changes.push(change);
    }
}

impl<'a> IntoIterator for &'a ChangeBuffer {
    type Item = &'a Change;
    type IntoIter = slice::Iter<'a, Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An observer that only keeps the latest change.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeSlot {
    slot: Option<Change>,
}

impl ChangeSlot {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the latest change, if any.
    pub fn get(&self) -> Option<&Change> {
        self.slot.as_ref()
    }

    /// Takes the latest change, if any, leaving the slot empty.
    pub fn take(&mut self) -> Option<Change> {
        self.slot.take()
    }
}

impl Observer for ChangeSlot {
    fn observe(&mut self, change: Change) {
        self.slot = Some(change);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_display_is_zero_padded() {
        assert_eq!(OutputWord::new(5, 3).to_string(), "00000101");
        assert_eq!(OutputWord::new(0, 0).to_string(), "00000000");
        assert_eq!(
            OutputWord::new(0b1_0000_0001, 10).to_string(),
            "0100000001"
        );
    }

    #[test]
    fn word_bits_are_msb_first() {
        let word = OutputWord::new(0b110, 3);

        assert_eq!(word.bit(0), Some(true));
        assert_eq!(word.bit(1), Some(true));
        assert_eq!(word.bit(2), Some(false));
        assert_eq!(word.bit(3), None);
    }

    #[test]
    fn word_is_masked_to_width() {
        assert_eq!(OutputWord::new(0xff, 4).value(), 0xf);
        assert_eq!(OutputWord::new(u64::MAX, 64).value(), u64::MAX);
        assert_eq!(OutputWord::new(u64::MAX, 0).value(), 0);
    }

    #[test]
    fn observers_record_changes() {
        let first = Change {
            cycle: 0,
            word: OutputWord::new(1, 1),
        };
        let second = Change {
            cycle: 3,
            word: OutputWord::new(0, 1),
        };

        let mut buffer = ChangeBuffer::new();
        let mut slot = ChangeSlot::new();
        let mut count = 0;
        let mut closure = |_: Change| count += 1;
        for change in [first, second] {
            buffer.observe(change);
            slot.observe(change);
            closure.observe(change);
        }

        assert_eq!(buffer.changes(), &[first, second]);
        assert_eq!(buffer.values().collect::<Vec<_>>(), vec![1, 0]);
        assert_eq!(slot.take(), Some(second));
        assert_eq!(slot.get(), None);
        assert_eq!(count, 2);
    }
}
