//! Example: 2-bit ripple-carry adder.
//!
//! This example demonstrates in particular:
//!
//! * programmatic netlist assembly with a builder,
//! * reuse of a netlist across several simulations,
//! * decoding of the output word.
//!
//! ```text
//!              ┌────────────┐ sum0
//!  a0, b0 ────►│ Full adder ├──────►
//!     cin ────►│            ├──┐
//!              └────────────┘  │ carry0
//!              ┌────────────┐  │
//!  a1, b1 ────►│ Full adder │◄─┘    sum1
//!              │            ├──────────►
//!              │            ├──────────► carry1
//!              └────────────┘
//! ```
use circuitsim::component::{ComponentKind, Gate};
use circuitsim::netlist::{Netlist, NetlistBuilder};
use circuitsim::simulation::{ChangeSlot, SimInit};

const XOR: ComponentKind = ComponentKind::Gate(Gate::Xor);
const AND: ComponentKind = ComponentKind::Gate(Gate::And);
const OR: ComponentKind = ComponentKind::Gate(Gate::Or);

/// Adds a full adder fed by the outputs of the `a`, `b` and `carry in`
/// components and returns its `sum` and `carry out` gates.
fn full_adder(builder: &mut NetlistBuilder, a: usize, b: usize, cin: usize) -> (usize, usize) {
    let half_sum = builder.add(XOR);
    let half_carry = builder.add(AND);
    let sum = builder.add(XOR);
    let propagated = builder.add(AND);
    let carry = builder.add(OR);

    builder
        .connect(a, 0, half_sum, 0)
        .connect(b, 0, half_sum, 1)
        .connect(a, 0, half_carry, 0)
        .connect(b, 0, half_carry, 1)
        .connect(half_sum, 0, sum, 0)
        .connect(cin, 0, sum, 1)
        .connect(half_sum, 0, propagated, 0)
        .connect(cin, 0, propagated, 1)
        .connect(half_carry, 0, carry, 0)
        .connect(propagated, 0, carry, 1);

    (sum, carry)
}

fn adder() -> Netlist {
    let mut builder = NetlistBuilder::new();

    let a0 = builder.add_named(ComponentKind::Source, "a0");
    let a1 = builder.add_named(ComponentKind::Source, "a1");
    let b0 = builder.add_named(ComponentKind::Source, "b0");
    let b1 = builder.add_named(ComponentKind::Source, "b1");
    let cin = builder.add_named(ComponentKind::Source, "cin");

    let (sum0, carry0) = full_adder(&mut builder, a0, b0, cin);
    let (sum1, carry1) = full_adder(&mut builder, a1, b1, carry0);

    // Terminals are ordered by declaration: sum0, sum1, carry1.
    builder
        .terminal(sum0, 0)
        .terminal(sum1, 0)
        .terminal(carry1, 0);

    builder.build().expect("the adder netlist should be valid")
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let netlist = adder();
    println!(
        "Components: {} / Terminals: {}",
        netlist.len(),
        netlist.terminals().len()
    );

    for a in 0..4u64 {
        for b in 0..4u64 {
            let mut result = ChangeSlot::new();
            SimInit::new(netlist.clone())
                .set_source("a0", a & 1 == 1)
                .set_source("a1", a & 2 == 2)
                .set_source("b0", b & 1 == 1)
                .set_source("b1", b & 2 == 2)
                .init()?
                .run(&mut result)?;

            let word = result.take().ok_or("no output")?.word;
            let sum = (0..word.width())
                .filter(|&terminal| word.bit(terminal) == Some(true))
                .map(|terminal| 1 << terminal)
                .sum::<u64>();

            println!("{a} + {b} = {sum} [{word}]");
            assert_eq!(sum, a + b);
        }
    }

    Ok(())
}
