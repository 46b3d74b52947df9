use tracing::trace;

use crate::simulation::{Change, Observer, OutputWord};
use crate::wire::{WireClosed, WireReader, WireWriter};

/// Outcome of a completed simulation run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of collector passes.
    pub cycles: u64,
    /// Number of settle acknowledgements sent to the clock.
    pub acknowledgements: u64,
    /// The last sampled output word.
    pub last_word: OutputWord,
}

/// The driving loop that samples the terminals and paces the clock.
#[derive(Debug)]
pub(crate) struct Collector {
    terminals: Vec<WireReader>,
    settle: Option<WireWriter>,
    pulses: u64,
}

impl Collector {
    /// Creates a collector.
    ///
    /// The terminals must be given most significant bit first. Without a
    /// settle wire, the collector performs a single pass.
    pub(crate) fn new(
        terminals: Vec<WireReader>,
        settle: Option<WireWriter>,
        pulses: u64,
    ) -> Self {
        Self {
            terminals,
            settle,
            pulses,
        }
    }

    /// Runs until the pulse budget is exhausted or, in the absence of a
    /// clock, until the first word was sampled.
    pub(crate) async fn run<O>(mut self, observer: &mut O) -> Result<RunSummary, WireClosed>
    where
        O: Observer + ?Sized,
    {
        let half_edges = self.pulses.saturating_mul(2);
        let mut cycles = 0;
        let mut acknowledgements = 0;
        let mut last_word = None;

        loop {
            let word = self.sample().await?;
            trace!(cycle = cycles, %word, "terminals sampled");

            if last_word != Some(word) {
                observer.observe(Change {
                    cycle: cycles,
                    word,
                });
            }
            last_word = Some(word);
            cycles += 1;

            let Some(settle) = &mut self.settle else {
                break;
            };
            settle.write(true).await?;
            acknowledgements += 1;

            if acknowledgements >= half_edges {
                break;
            }
        }

        Ok(RunSummary {
            cycles,
            acknowledgements,
            last_word: last_word.unwrap_or_default(),
        })
    }

    /// Reads one value from every terminal, in terminal order.
    async fn sample(&mut self) -> Result<OutputWord, WireClosed> {
        let mut value = 0;
        for terminal in &mut self.terminals {
            value = (value << 1) | u64::from(terminal.read().await?);
        }

        Ok(OutputWord::new(value, self.terminals.len()))
    }
}
