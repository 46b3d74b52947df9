//! Rejection of malformed netlists and invalid configurations.

use circuitsim::component::{ComponentKind, Gate};
use circuitsim::netlist::{BuildErrorKind, Netlist};
use circuitsim::simulation::{ConfigError, SimInit, SimulationError};

fn parse_error(text: &str) -> (Option<usize>, Option<usize>, BuildErrorKind) {
    let err = Netlist::parse(text).unwrap_err();

    (err.line(), err.component(), err.kind().clone())
}

#[test]
fn syntax_errors_report_their_line() {
    let text = "// comment\n\
                source a out 1 0\n\
                \n\
                not out 2 x\n";

    assert_eq!(
        parse_error(text),
        (
            Some(4),
            Some(1),
            BuildErrorKind::InvalidPort("x".into())
        )
    );
}

#[test]
fn connection_errors_report_the_producer() {
    let text = "source a out 2 0\n\
                source b out 2 0\n\
                not out res\n";

    assert_eq!(
        parse_error(text),
        (
            Some(2),
            Some(1),
            BuildErrorKind::InputAlreadyBound { target: 2, port: 0 }
        )
    );
}

#[test]
fn structural_errors() {
    let cases = [
        ("", BuildErrorKind::NoComponents),
        ("// only comments\n", BuildErrorKind::NoComponents),
        ("and out res\n", BuildErrorKind::UnboundInput { port: 0 }),
        (
            "source a out 5 0\n",
            BuildErrorKind::ComponentOutOfRange { target: 5 },
        ),
        (
            "source a out 1 2\nand out res\n",
            BuildErrorKind::PortOutOfRange { target: 1, port: 2 },
        ),
        (
            "source a out res out res\n",
            BuildErrorKind::TooManyOutputs {
                declared: 2,
                allowed: 1,
            },
        ),
        ("clk out\nclk out\n", BuildErrorKind::MultipleClocks),
        (
            "source a out 1 0\nxor out 1 1 res\n",
            BuildErrorKind::CombinationalLoop,
        ),
        ("dff\n", BuildErrorKind::MissingName),
        ("dff out res\n", BuildErrorKind::MissingOutput),
        ("mux out res\n", BuildErrorKind::UnknownType("mux".into())),
    ];

    for (text, kind) in cases {
        assert_eq!(Netlist::parse(text).unwrap_err().kind(), &kind, "{text:?}");
    }
}

#[test]
fn too_many_terminals() {
    let text = format!("source a out{}\n", " res".repeat(65));

    assert_eq!(
        Netlist::parse(&text).unwrap_err().kind(),
        &BuildErrorKind::TooManyTerminals { count: 65 }
    );

    let text = format!("source a out{}\n", " res".repeat(64));
    assert_eq!(Netlist::parse(&text).unwrap().terminals().len(), 64);
}

#[test]
fn configuration_errors() {
    let netlist = || Netlist::parse("source a out 1 0\nnot out res\n").unwrap();

    let err = SimInit::with_num_threads(netlist(), 1)
        .set_source("z", true)
        .init()
        .unwrap_err();
    assert!(matches!(
        err,
        SimulationError::Config(ConfigError::UnknownComponent(_))
    ));

    let err = SimInit::with_num_threads(netlist(), 1)
        .set_dff(1usize, true)
        .init()
        .unwrap_err();
    match err {
        SimulationError::Config(ConfigError::KindMismatch {
            component,
            expected,
            found,
        }) => {
            assert_eq!(component, 1);
            assert_eq!(expected, ComponentKind::Dff);
            assert_eq!(found, ComponentKind::Gate(Gate::Not));
        }
        err => panic!("unexpected error: {err}"),
    }

    let err = SimInit::with_num_threads(netlist(), 1)
        .set_clock(0, 4)
        .init()
        .unwrap_err();
    assert!(matches!(
        err,
        SimulationError::Config(ConfigError::ZeroFrequency)
    ));
}
