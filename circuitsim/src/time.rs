//! Wall-clock pacing of the clock driver.
//!
//! This module provides the [`Pacer`] trait, which determines how the clock
//! driver waits between two edges, together with two implementations:
//!
//! * [`SpinPacer`]: blocks for the full half-period using a precise
//!   spin-sleep, so that edges are produced at the configured frequency at
//!   most,
//! * [`NoPacer`]: returns immediately, making the simulation run as fast as
//!   the settle protocol allows.
//!
//! # Examples
//!
//! A pacer that slows a simulation down by a constant factor.
//!
//! ```
//! use std::time::Duration;
//!
//! use circuitsim::time::{Pacer, SpinPacer};
//!
//! pub struct SlowMotion {
//!     factor: u32,
//!     inner: SpinPacer,
//! }
//!
//! impl Pacer for SlowMotion {
//!     fn pause(&mut self, half_period: Duration) {
//!         self.inner.pause(half_period * self.factor);
//!     }
//! }
//! ```

mod pacer;

pub use pacer::{NoPacer, Pacer, SpinPacer};
