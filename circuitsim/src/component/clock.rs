//! The clock driver.

use std::fmt;
use std::time::Duration;

use tracing::trace;

use crate::time::Pacer;
use crate::wire::{WireClosed, WireReader, WireWriter};

/// Worker alternating the clock level.
///
/// Each edge is handed to every consumer over a rendezvous wire, after which
/// the driver waits for the collector's settle acknowledgement and pauses for
/// one half-period. A new edge is therefore never produced before the
/// effects of the previous one were observed.
pub(crate) struct ClockDriver {
    level: bool,
    half_period: Duration,
    output: WireWriter,
    settle: WireReader,
    pacer: Box<dyn Pacer>,
}

impl ClockDriver {
    pub(crate) fn new(
        start_level: bool,
        half_period: Duration,
        output: WireWriter,
        settle: WireReader,
        pacer: Box<dyn Pacer>,
    ) -> Self {
        Self {
            level: start_level,
            half_period,
            output,
            settle,
            pacer,
        }
    }

    /// Produces one edge and waits until it has settled.
    pub(crate) async fn step(&mut self) -> Result<(), WireClosed> {
        self.output.write(self.level).await?;
        trace!(level = self.level, "edge delivered");
        self.level = !self.level;

        self.settle.read().await?;
        self.pacer.pause(self.half_period);

        Ok(())
    }
}

impl fmt::Debug for ClockDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClockDriver")
            .field("level", &self.level)
            .field("half_period", &self.half_period)
            .finish_non_exhaustive()
    }
}
