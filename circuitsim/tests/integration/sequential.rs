//! Clocked networks and pulse budget.

use circuitsim::netlist::Netlist;
use circuitsim::simulation::{ChangeBuffer, RunSummary, SimInit};
use circuitsim::time::NoPacer;

const MT_NUM_THREADS: usize = 4;

const TOGGLE: &str = include_str!("../../netlists/toggle.net");
const SHIFT_REGISTER: &str = include_str!("../../netlists/shift_register.net");
const COUNTER: &str = include_str!("../../netlists/counter.net");

/// Runs a clocked netlist as fast as possible and returns the reported
/// changes as `(cycle, value)` pairs.
fn run_clocked(
    text: &str,
    num_threads: usize,
    pulses: u64,
    configure: impl FnOnce(SimInit) -> SimInit,
) -> (RunSummary, Vec<(u64, u64)>) {
    let netlist = Netlist::parse(text).unwrap();
    let bench = SimInit::with_num_threads(netlist, num_threads)
        .set_clock(1_000, pulses)
        .set_pacer(NoPacer::new());

    let mut changes = ChangeBuffer::new();
    let summary = configure(bench).init().unwrap().run(&mut changes).unwrap();
    let changes = changes
        .iter()
        .map(|change| (change.cycle, change.word.value()))
        .collect();

    (summary, changes)
}

fn toggle(num_threads: usize) {
    let (summary, changes) = run_clocked(TOGGLE, num_threads, 3, |bench| bench);

    assert_eq!(summary.acknowledgements, 6);
    assert_eq!(summary.cycles, 6);
    assert_eq!(changes, vec![(0, 0), (2, 1), (4, 0)]);
}

fn toggle_low_start(num_threads: usize) {
    let (_, changes) = run_clocked(TOGGLE, num_threads, 3, |bench| {
        bench.set_clock_start(false)
    });

    assert_eq!(changes, vec![(0, 0), (1, 1), (3, 0), (5, 1)]);
}

fn toggle_initial_state(num_threads: usize) {
    let (summary, changes) = run_clocked(TOGGLE, num_threads, 2, |bench| bench.set_dff("t", true));

    assert_eq!(changes, vec![(0, 1), (2, 0)]);
    assert_eq!(summary.last_word.value(), 0);
}

fn pulse_budget(num_threads: usize) {
    for pulses in [0, 1, 2, 5] {
        let (summary, _) = run_clocked(TOGGLE, num_threads, pulses, |bench| bench);

        assert_eq!(summary.acknowledgements, (2 * pulses).max(1), "{pulses} pulses");
        assert_eq!(summary.cycles, summary.acknowledgements);
    }
}

fn clock_terminal(num_threads: usize) {
    let (_, changes) = run_clocked("clk out res\n", num_threads, 2, |bench| bench);

    assert_eq!(changes, vec![(0, 1), (1, 0), (2, 1), (3, 0)]);
}

fn shift_register(num_threads: usize) {
    let (_, changes) = run_clocked(SHIFT_REGISTER, num_threads, 3, |bench| {
        bench.set_source("d", true)
    });
    assert_eq!(changes, vec![(0, 0b00), (2, 0b10), (4, 0b11)]);

    let (_, changes) = run_clocked(SHIFT_REGISTER, num_threads, 3, |bench| {
        bench.set_dff("q0", true)
    });
    assert_eq!(changes, vec![(0, 0b10), (2, 0b01), (4, 0b00)]);
}

fn counter(num_threads: usize) {
    let (summary, changes) = run_clocked(COUNTER, num_threads, 5, |bench| bench);

    assert_eq!(
        changes,
        vec![(0, 0b00), (2, 0b01), (4, 0b10), (6, 0b11), (8, 0b00)]
    );
    assert_eq!(summary.last_word.to_string(), "00000000");
}

#[test]
fn toggle_st() {
    toggle(1);
}

#[test]
fn toggle_mt() {
    toggle(MT_NUM_THREADS);
}

#[test]
fn toggle_low_start_st() {
    toggle_low_start(1);
}

#[test]
fn toggle_low_start_mt() {
    toggle_low_start(MT_NUM_THREADS);
}

#[test]
fn toggle_initial_state_st() {
    toggle_initial_state(1);
}

#[test]
fn toggle_initial_state_mt() {
    toggle_initial_state(MT_NUM_THREADS);
}

#[test]
fn pulse_budget_st() {
    pulse_budget(1);
}

#[test]
fn pulse_budget_mt() {
    pulse_budget(MT_NUM_THREADS);
}

#[test]
fn clock_terminal_st() {
    clock_terminal(1);
}

#[test]
fn clock_terminal_mt() {
    clock_terminal(MT_NUM_THREADS);
}

#[test]
fn shift_register_st() {
    shift_register(1);
}

#[test]
fn shift_register_mt() {
    shift_register(MT_NUM_THREADS);
}

#[test]
fn counter_st() {
    counter(1);
}

#[test]
fn counter_mt() {
    counter(MT_NUM_THREADS);
}
