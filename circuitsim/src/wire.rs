//! Single-producer, multiple-consumer signal wires.
//!
//! A wire connects one output port to a fixed number of consumers. Each
//! production cycle, the producer publishes one value and every consumer
//! reads that value exactly once through its own [`WireReader`] cursor.
//!
//! The producer can only publish a new value once all consumers have read
//! the previous one, which is what paces the whole network: a fast producer
//! is held back by its slowest consumer and a consumer waits until its
//! producer has something new.
//!
//! Two synchronization strengths are available:
//!
//! * [`Strength::Buffered`]: a write returns as soon as the value is
//!   published,
//! * [`Strength::Rendezvous`]: a write returns only once every consumer has
//!   taken the value, which makes each handoff synchronous.

mod arena;

pub use arena::{WireArena, WireId};

use std::error;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use async_event::Event;
use crossbeam_utils::CachePadded;
use diatomic_waker::primitives::DiatomicWaker;

/// Synchronization strength of a wire.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Strength {
    /// The producer may publish as soon as the previous value was drained by
    /// all consumers.
    #[default]
    Buffered,
    /// A write completes only when every consumer has taken the value.
    Rendezvous,
}

/// Data shared between the producer and the consumers.
struct Inner {
    /// Synchronization strength.
    strength: Strength,
    /// Number of declared consumers.
    consumers: usize,
    /// Number of values published so far.
    generation: CachePadded<AtomicU64>,
    /// Number of consumers that have not yet read the current value.
    pending: CachePadded<AtomicUsize>,
    /// Current value.
    value: AtomicBool,
    /// Whether the wire was closed.
    is_closed: AtomicBool,
    /// Signalling primitive used to notify the consumers.
    consumer_signal: Event,
    /// Signalling primitive used to notify the producer.
    producer_signal: DiatomicWaker,
}

impl Inner {
    fn close(&self) {
        if !self.is_closed.swap(true, Ordering::AcqRel) {
            // Notify all blocked parties that the wire is closed.
            self.consumer_signal.notify_all();
            self.producer_signal.notify();
        }
    }
}

/// A wire with its declared number of consumers.
///
/// A `Wire` is a cheap handle: cloning it does not create a new wire. The
/// producer and consumer endpoints are obtained once with
/// [`endpoints()`](Wire::endpoints).
#[derive(Clone)]
pub struct Wire {
    inner: Arc<Inner>,
    is_split: Arc<AtomicBool>,
}

impl Wire {
    /// Creates a new wire with the specified strength and consumer count.
    pub fn new(strength: Strength, consumers: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                strength,
                consumers,
                generation: CachePadded::new(AtomicU64::new(0)),
                pending: CachePadded::new(AtomicUsize::new(0)),
                value: AtomicBool::new(false),
                is_closed: AtomicBool::new(false),
                consumer_signal: Event::new(),
                producer_signal: DiatomicWaker::new(),
            }),
            is_split: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns the synchronization strength of the wire.
    pub fn strength(&self) -> Strength {
        self.inner.strength
    }

    /// Returns the number of declared consumers.
    pub fn consumers(&self) -> usize {
        self.inner.consumers
    }

    /// Returns the producer endpoint and one reader per declared consumer.
    ///
    /// # Panics
    ///
    /// This method panics if called more than once on the same wire.
    pub fn endpoints(&self) -> (WireWriter, Vec<WireReader>) {
        assert!(
            !self.is_split.swap(true, Ordering::Relaxed),
            "the endpoints of a wire can only be taken once"
        );

        let writer = WireWriter {
            inner: self.inner.clone(),
        };
        let readers = (0..self.inner.consumers)
            .map(|_| WireReader {
                inner: self.inner.clone(),
                cursor: 0,
            })
            .collect();

        (writer, readers)
    }

    /// Closes the wire.
    ///
    /// All blocked and future writes fail. Reads fail too, except for a value
    /// that was already published and not yet read by the reader.
    pub fn close(&self) {
        self.inner.close();
    }

    /// Checks if the wire is closed.
    pub fn is_closed(&self) -> bool {
        self.inner.is_closed.load(Ordering::Relaxed)
    }
}

impl fmt::Debug for Wire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wire")
            .field("strength", &self.inner.strength)
            .field("consumers", &self.inner.consumers)
            .finish_non_exhaustive()
    }
}

/// The producer endpoint of a wire.
///
/// Dropping the writer closes the wire.
pub struct WireWriter {
    inner: Arc<Inner>,
}

impl WireWriter {
    /// Publishes a value to all consumers.
    ///
    /// This waits until every consumer has read the previous value and, for a
    /// rendezvous wire, until every consumer has taken the new one.
    pub async fn write(&mut self, value: bool) -> Result<(), WireClosed> {
        let inner = &*self.inner;

        // Safety: the producer signal is only awaited by the writer, which is
        // borrowed mutably.
        let is_drained = unsafe {
            inner
                .producer_signal
                .wait_until(|| {
                    if inner.is_closed.load(Ordering::Relaxed) {
                        return Some(false);
                    }

                    (inner.pending.load(Ordering::Acquire) == 0).then_some(true)
                })
                .await
        };
        if !is_drained {
            return Err(WireClosed);
        }

        inner.value.store(value, Ordering::Relaxed);
        inner.pending.store(inner.consumers, Ordering::Relaxed);

        // Ordering: Release synchronizes with the Acquire load of the
        // generation by the readers so they see the value and pending count.
        inner.generation.fetch_add(1, Ordering::Release);
        inner.consumer_signal.notify_all();

        if inner.strength == Strength::Rendezvous {
            // Safety: see above.
            let is_taken = unsafe {
                inner
                    .producer_signal
                    .wait_until(|| {
                        if inner.pending.load(Ordering::Acquire) == 0 {
                            return Some(true);
                        }

                        inner.is_closed.load(Ordering::Relaxed).then_some(false)
                    })
                    .await
            };
            if !is_taken {
                return Err(WireClosed);
            }
        }

        Ok(())
    }

    /// Returns the number of declared consumers.
    pub fn consumers(&self) -> usize {
        self.inner.consumers
    }
}

impl Drop for WireWriter {
    fn drop(&mut self) {
        self.inner.close();
    }
}

impl fmt::Debug for WireWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WireWriter")
            .field("strength", &self.inner.strength)
            .field("consumers", &self.inner.consumers)
            .finish_non_exhaustive()
    }
}

/// A consumer endpoint of a wire.
///
/// Each reader observes every published value exactly once. Dropping a
/// reader closes the wire since its producer could otherwise never make
/// progress again.
pub struct WireReader {
    inner: Arc<Inner>,
    /// Generation of the last value read.
    cursor: u64,
}

impl WireReader {
    /// Reads the value of the current production cycle, if necessary waiting
    /// until the producer publishes it.
    pub async fn read(&mut self) -> Result<bool, WireClosed> {
        let inner = &*self.inner;
        let cursor = self.cursor;

        // The producer cannot publish twice without this reader having read
        // in between, so a generation that differs from the cursor is always
        // the next one.
        let generation = inner
            .consumer_signal
            .wait_until(|| {
                let generation = inner.generation.load(Ordering::Acquire);
                if generation != cursor {
                    return Some(Some(generation));
                }
                if inner.is_closed.load(Ordering::Relaxed) {
                    return Some(None);
                }

                None
            })
            .await
            .ok_or(WireClosed)?;

        let value = inner.value.load(Ordering::Relaxed);
        self.cursor = generation;

        // Ordering: Release makes sure the value was loaded before the
        // producer may overwrite it.
        if inner.pending.fetch_sub(1, Ordering::AcqRel) == 1 {
            inner.producer_signal.notify();
        }

        Ok(value)
    }
}

impl Drop for WireReader {
    fn drop(&mut self) {
        self.inner.close();
    }
}

impl fmt::Debug for WireReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WireReader")
            .field("strength", &self.inner.strength)
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

/// An error returned when reading from or writing to a closed wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WireClosed;

impl fmt::Display for WireClosed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        "the wire was closed".fmt(f)
    }
}

impl error::Error for WireClosed {}
