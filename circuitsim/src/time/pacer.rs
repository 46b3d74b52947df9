use std::time::Duration;

/// A type that determines how the clock driver waits between two edges.
///
/// A pacer can be associated to a simulation prior to initialization by
/// calling [`SimInit::set_pacer()`](crate::simulation::SimInit::set_pacer).
///
/// The pause takes place after the settle acknowledgement of the previous
/// edge was received, so it sets a minimum rather than an exact interval
/// between consecutive edges.
pub trait Pacer: Send {
    /// Blocks for the duration of a half-period.
    fn pause(&mut self, half_period: Duration);
}

/// A dummy [`Pacer`] that ignores the half-period.
///
/// Choosing this pacer effectively makes the simulation run as fast as
/// possible.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoPacer {}

impl NoPacer {
    /// Constructs a new `NoPacer` object.
    pub fn new() -> Self {
        Self {}
    }
}

impl Pacer for NoPacer {
    /// Returns immediately.
    fn pause(&mut self, _: Duration) {}
}

/// A real-time [`Pacer`] based on the system's monotonic clock.
///
/// The pause is performed with a native sleep followed by a short spin, which
/// gives accurate half-periods even at high clock frequencies.
#[derive(Copy, Clone, Debug, Default)]
pub struct SpinPacer {}

impl SpinPacer {
    /// Constructs a new `SpinPacer`.
    pub fn new() -> Self {
        Self {}
    }
}

impl Pacer for SpinPacer {
    /// Blocks for the whole half-period.
    fn pause(&mut self, half_period: Duration) {
        spin_sleep::sleep(half_period);
    }
}
