//! Real-time pacing of the clock.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use circuitsim::netlist::Netlist;
use circuitsim::simulation::{ChangeBuffer, SimInit, CLOCK_THREAD_NAME};
use circuitsim::time::{Pacer, SpinPacer};

#[test]
fn clock_follows_frequency() {
    const FREQUENCY: u32 = 100;
    const PULSES: u64 = 2;

    let netlist = Netlist::parse(include_str!("../../netlists/toggle.net")).unwrap();
    let simu = SimInit::with_num_threads(netlist, 2)
        .set_clock(FREQUENCY, PULSES)
        .set_pacer(SpinPacer::new())
        .init()
        .unwrap();

    let now = Instant::now();
    let summary = simu.run(&mut ChangeBuffer::new()).unwrap();
    let elapsed = now.elapsed();

    // The clock pauses after each acknowledgement, but the run completes as
    // soon as the last one was sent.
    let half_period = Duration::from_secs(1) / FREQUENCY;
    let min_elapsed = half_period * (summary.acknowledgements as u32 - 1);

    assert_eq!(summary.acknowledgements, 2 * PULSES);
    assert!(
        elapsed >= min_elapsed,
        "Expected a run of at least {:?}, measured {:?}",
        min_elapsed,
        elapsed,
    );
}

#[derive(Clone, Default)]
struct ThreadRecorder {
    threads: Arc<Mutex<Vec<Option<String>>>>,
}

impl Pacer for ThreadRecorder {
    fn pause(&mut self, _: Duration) {
        let name = thread::current().name().map(str::to_owned);
        self.threads.lock().unwrap().push(name);
    }
}

#[test]
fn clock_does_not_pace_on_the_pool() {
    let netlist = Netlist::parse(include_str!("../../netlists/toggle.net")).unwrap();
    let recorder = ThreadRecorder::default();
    let mut changes = ChangeBuffer::new();

    let summary = SimInit::with_num_threads(netlist, 1)
        .set_clock(1000, 3)
        .set_pacer(recorder.clone())
        .init()
        .unwrap()
        .run(&mut changes)
        .unwrap();

    assert_eq!(summary.acknowledgements, 6);
    assert_eq!(changes.values().collect::<Vec<_>>(), vec![0, 1, 0]);

    let threads = recorder.threads.lock().unwrap();
    assert!(!threads.is_empty());
    assert!(threads
        .iter()
        .all(|name| name.as_deref() == Some(CLOCK_THREAD_NAME)));
}
