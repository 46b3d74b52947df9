use tracing::trace;

use crate::component::ComponentKind;
use crate::netlist::{BuildError, BuildErrorKind, Declaration, Target};

const OUT: &str = "out";
const TERMINAL: &str = "res";

/// Parses a textual netlist into unvalidated declarations.
///
/// Only the syntax is checked here; connection targets are validated by
/// [`NetlistBuilder::build()`](crate::netlist::NetlistBuilder::build).
pub fn parse(text: &str) -> Result<Vec<Declaration>, BuildError> {
    let mut declarations = Vec::new();

    for (line, content) in text.lines().enumerate() {
        let line = line + 1;
        let content = content.trim();
        if content.is_empty() || content.starts_with('/') {
            continue;
        }

        let declaration = parse_declaration(content, line)
            .map_err(|kind| BuildError::new(kind).at(declarations.len(), Some(line)))?;
        trace!(line, kind = %declaration.kind, "component declared");

        declarations.push(declaration);
    }

    Ok(declarations)
}

fn parse_declaration(content: &str, line: usize) -> Result<Declaration, BuildErrorKind> {
    let mut tokens = content.split_whitespace();

    // The content is non-empty once trimmed.
    let keyword = tokens.next().unwrap_or_default();
    let kind = ComponentKind::from_keyword(keyword)
        .ok_or_else(|| BuildErrorKind::UnknownType(keyword.to_owned()))?;

    let mut declaration = Declaration::new(kind);
    declaration.line = Some(line);

    if kind.is_named() {
        // The token following the type is the name, whatever it reads.
        let name = tokens.next().ok_or(BuildErrorKind::MissingName)?;
        declaration.name = Some(name.to_owned());
    }

    if !tokens
        .next()
        .is_some_and(|token| token.eq_ignore_ascii_case(OUT))
    {
        return Err(BuildErrorKind::MissingOutput);
    }
    declaration.outputs.push(Vec::new());

    while let Some(token) = tokens.next() {
        if token.eq_ignore_ascii_case(OUT) {
            declaration.outputs.push(Vec::new());
            continue;
        }

        let target = if token.eq_ignore_ascii_case(TERMINAL) {
            Target::Terminal
        } else {
            let component = token
                .parse()
                .map_err(|_| BuildErrorKind::InvalidIndex(token.to_owned()))?;
            let port = tokens.next().unwrap_or_default();
            let port = port
                .parse()
                .map_err(|_| BuildErrorKind::InvalidPort(port.to_owned()))?;

            Target::Input { component, port }
        };

        // An `out` keyword was pushed before entering the loop.
        if let Some(output) = declaration.outputs.last_mut() {
            output.push(target);
        }
    }

    Ok(declaration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Gate;

    #[test]
    fn parse_declarations() {
        let declarations = parse(
            "// half adder\n\
             \n\
             SOURCE a out 2 0 3 0\n\
             source b out 2 1 3 1\n\
             xor out res\n\
             And out res\n",
        )
        .unwrap();

        assert_eq!(declarations.len(), 4);
        assert_eq!(declarations[0].kind, ComponentKind::Source);
        assert_eq!(declarations[0].name.as_deref(), Some("a"));
        assert_eq!(declarations[0].line, Some(3));
        assert_eq!(
            declarations[0].outputs,
            vec![vec![
                Target::Input {
                    component: 2,
                    port: 0
                },
                Target::Input {
                    component: 3,
                    port: 0
                }
            ]]
        );
        assert_eq!(declarations[3].kind, ComponentKind::Gate(Gate::And));
        assert_eq!(declarations[3].outputs, vec![vec![Target::Terminal]]);
    }

    #[test]
    fn parse_dff_outputs() {
        let declarations = parse("dff q out res 2 1 out 3 0 res").unwrap();

        assert_eq!(declarations[0].kind, ComponentKind::Dff);
        assert_eq!(declarations[0].name.as_deref(), Some("q"));
        assert_eq!(
            declarations[0].outputs,
            vec![
                vec![
                    Target::Terminal,
                    Target::Input {
                        component: 2,
                        port: 1
                    }
                ],
                vec![
                    Target::Input {
                        component: 3,
                        port: 0
                    },
                    Target::Terminal
                ],
            ]
        );
    }

    #[test]
    fn parse_unconnected_output() {
        let declarations = parse("clk out").unwrap();

        assert_eq!(declarations[0].outputs, vec![Vec::new()]);
        assert_eq!(declarations[0].name, None);
    }

    #[test]
    fn names_are_taken_verbatim() {
        let declarations = parse("source out out res
dff OUT out 0 1 out").unwrap();

        assert_eq!(declarations[0].name.as_deref(), Some("out"));
        assert_eq!(declarations[0].outputs, vec![vec![Target::Terminal]]);
        assert_eq!(declarations[1].name.as_deref(), Some("OUT"));
        assert_eq!(declarations[1].outputs.len(), 2);
    }

    #[test]
    fn parse_errors() {
        let cases = [
            ("latch out res", BuildErrorKind::UnknownType("latch".into())),
            ("source out res", BuildErrorKind::MissingOutput),
            ("source", BuildErrorKind::MissingName),
            ("and 1 0", BuildErrorKind::MissingOutput),
            ("not", BuildErrorKind::MissingOutput),
            ("not out x 0", BuildErrorKind::InvalidIndex("x".into())),
            ("not out 1 y", BuildErrorKind::InvalidPort("y".into())),
            ("not out 1", BuildErrorKind::InvalidPort(String::new())),
        ];

        for (text, kind) in cases {
            let err = parse(text).unwrap_err();
            assert_eq!(err.kind(), &kind, "{text}");
        }
    }

    #[test]
    fn parse_error_location() {
        let err = parse("source a out 1 0\n/ comment\nnot out 2 z\n").unwrap_err();

        assert_eq!(err.line(), Some(3));
        assert_eq!(err.component(), Some(1));
        assert_eq!(
            err.to_string(),
            "line 3 (component 1): invalid port number 'z'"
        );
    }
}
