//! Spread cycle detection (spec §4.5 "Type references").
//!
//! A type that spreads itself, directly or through a chain of other
//! spreads, can never be flattened; reported once per cycle participant
//! rather than once per edge.

use crate::analyzer::Program;
use crate::diagnostics::{Diagnostic, DiagnosticCode};
use std::collections::{HashMap, HashSet};

pub fn check(program: &Program, diagnostics: &mut Vec<Diagnostic>) {
    let mut state: HashMap<&str, VisitState> = HashMap::new();
    let mut reported: HashSet<&str> = HashSet::new();

    for name in program.types.keys() {
        if !state.contains_key(name.as_str()) {
            visit(program, name, &mut state, &mut Vec::new(), &mut reported, diagnostics);
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum VisitState {
    InProgress,
    Done,
}

fn visit<'a>(
    program: &'a Program,
    name: &'a str,
    state: &mut HashMap<&'a str, VisitState>,
    stack: &mut Vec<&'a str>,
    reported: &mut HashSet<&'a str>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let Some(t) = program.types.get(name) else { return };
    state.insert(name, VisitState::InProgress);
    stack.push(name);

    for spread in &t.spreads {
        let target = spread.type_name.as_str();
        match state.get(target) {
            Some(VisitState::InProgress) => {
                if reported.insert(name) {
                    diagnostics.push(Diagnostic::new(
                        &spread.range,
                        DiagnosticCode::E204SpreadCycle,
                        format!("`{name}` participates in a spread cycle through `{target}`"),
                    ));
                }
            }
            Some(VisitState::Done) => {}
            None => {
                if program.types.contains_key(target) {
                    visit(program, target, state, stack, reported, diagnostics);
                }
            }
        }
    }

    stack.pop();
    state.insert(name, VisitState::Done);
}
