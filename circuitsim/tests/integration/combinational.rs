//! Propagation through combinational networks.

use circuitsim::component::{ComponentKind, Gate};
use circuitsim::netlist::{Netlist, NetlistBuilder};
use circuitsim::simulation::{ChangeBuffer, ChangeSlot, OutputWord, SimInit};

const MT_NUM_THREADS: usize = 4;

const FULL_ADDER: &str = include_str!("../../netlists/full_adder.net");

fn run_once(netlist: Netlist, num_threads: usize, sources: &[(&str, bool)]) -> ChangeBuffer {
    let mut bench = SimInit::with_num_threads(netlist, num_threads);
    for (name, value) in sources {
        bench = bench.set_source(*name, *value);
    }

    let mut changes = ChangeBuffer::new();
    let summary = bench.init().unwrap().run(&mut changes).unwrap();

    // Without a clock, the network settles in a single pass.
    assert_eq!(summary.cycles, 1);
    assert_eq!(summary.acknowledgements, 0);
    assert_eq!(changes.len(), 1);

    changes
}

fn inverter(num_threads: usize) {
    let netlist = Netlist::parse("source a out 1 0\nnot out res\n").unwrap();
    let changes = run_once(netlist, num_threads, &[("a", true)]);

    assert_eq!(changes.changes()[0].cycle, 0);
    assert_eq!(changes.changes()[0].word, OutputWord::new(0, 1));
    assert_eq!(changes.changes()[0].word.to_string(), "00000000");
}

fn and_gate(num_threads: usize) {
    let netlist = || Netlist::parse("source a out 2 0\nsource b out 2 1\nand out res\n").unwrap();

    let changes = run_once(netlist(), num_threads, &[("a", true), ("b", true)]);
    assert_eq!(changes.values().collect::<Vec<_>>(), vec![1]);

    let changes = run_once(netlist(), num_threads, &[("a", true), ("b", false)]);
    assert_eq!(changes.values().collect::<Vec<_>>(), vec![0]);

    let changes = run_once(netlist(), num_threads, &[("a", false), ("b", true)]);
    assert_eq!(changes.values().collect::<Vec<_>>(), vec![0]);
}

fn full_adder(num_threads: usize) {
    for a in [false, true] {
        for b in [false, true] {
            for cin in [false, true] {
                let netlist = Netlist::parse(FULL_ADDER).unwrap();
                let changes =
                    run_once(netlist, num_threads, &[("a", a), ("b", b), ("cin", cin)]);

                let total = u64::from(a) + u64::from(b) + u64::from(cin);
                let word = changes.changes()[0].word;
                assert_eq!(word.bit(0), Some(total & 1 == 1), "sum of {a}+{b}+{cin}");
                assert_eq!(word.bit(1), Some(total >= 2), "carry of {a}+{b}+{cin}");
            }
        }
    }
}

fn fan_out(num_threads: usize) {
    // One source observed directly and through three inverters.
    let mut builder = NetlistBuilder::new();
    let source = builder.add_named(ComponentKind::Source, "a");
    builder.terminal(source, 0);
    for _ in 0..3 {
        let not = builder.add(ComponentKind::Gate(Gate::Not));
        builder.connect(source, 0, not, 0).terminal(not, 0);
    }
    let netlist = builder.build().unwrap();

    let changes = run_once(netlist, num_threads, &[("a", true)]);
    assert_eq!(changes.changes()[0].word, OutputWord::new(0b1000, 4));
}

fn sources_only(num_threads: usize) {
    const TEXT: &str = "source a out res\nsource b out res\nsource c out res\n";

    let words: Vec<_> = (0..5)
        .map(|_| {
            let netlist = Netlist::parse(TEXT).unwrap();
            let mut slot = ChangeSlot::new();
            let summary = SimInit::with_num_threads(netlist, num_threads)
                .set_source("a", true)
                .set_source(2usize, true)
                .init()
                .unwrap()
                .run(&mut slot)
                .unwrap();

            assert_eq!(summary.cycles, 1);
            assert_eq!(slot.take().map(|change| change.word), Some(summary.last_word));

            summary.last_word
        })
        .collect();

    assert!(words.iter().all(|word| *word == OutputWord::new(0b101, 3)));
}

fn unobserved_gates(num_threads: usize) {
    // Neither the inverter output nor the second source is observed.
    let netlist = Netlist::parse(
        "source a out 2 0 res\n\
         source b out\n\
         not out\n",
    )
    .unwrap();

    let changes = run_once(netlist, num_threads, &[("a", true), ("b", true)]);
    assert_eq!(changes.values().collect::<Vec<_>>(), vec![1]);
}

#[test]
fn inverter_st() {
    inverter(1);
}

#[test]
fn inverter_mt() {
    inverter(MT_NUM_THREADS);
}

#[test]
fn and_gate_st() {
    and_gate(1);
}

#[test]
fn and_gate_mt() {
    and_gate(MT_NUM_THREADS);
}

#[test]
fn full_adder_st() {
    full_adder(1);
}

#[test]
fn full_adder_mt() {
    full_adder(MT_NUM_THREADS);
}

#[test]
fn fan_out_st() {
    fan_out(1);
}

#[test]
fn fan_out_mt() {
    fan_out(MT_NUM_THREADS);
}

#[test]
fn sources_only_st() {
    sources_only(1);
}

#[test]
fn sources_only_mt() {
    sources_only(MT_NUM_THREADS);
}

#[test]
fn unobserved_gates_st() {
    unobserved_gates(1);
}

#[test]
fn unobserved_gates_mt() {
    unobserved_gates(MT_NUM_THREADS);
}
