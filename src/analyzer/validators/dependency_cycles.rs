//! Type-dependency cycle detection (spec §4.5 "Type dependencies").
//!
//! A field whose type is directly another type (not behind an array or a
//! map, both of which a codegen backend can box/heap-allocate to break a
//! cycle) creates a hard dependency edge. A cycle through only such edges
//! means no concrete in-memory layout exists for the participants.
//! Requires [`super::type_refs`] to have already run so `resolved_type`
//! is populated.

use crate::analyzer::{FieldTypeInfo, FieldTypeKind, Program};
use crate::diagnostics::{Diagnostic, DiagnosticCode};
use std::collections::{HashMap, HashSet};

pub fn check(program: &Program, diagnostics: &mut Vec<Diagnostic>) {
    let mut state: HashMap<&str, VisitState> = HashMap::new();
    let mut reported: HashSet<&str> = HashSet::new();

    for name in program.types.keys() {
        if !state.contains_key(name.as_str()) {
            visit(program, name, &mut state, &mut reported, diagnostics);
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum VisitState {
    InProgress,
    Done,
}

fn direct_dependencies(info: &FieldTypeInfo) -> Vec<&str> {
    if info.array_dims > 0 {
        return vec![];
    }
    match info.kind {
        FieldTypeKind::Custom => info.resolved_type.as_deref().into_iter().collect(),
        FieldTypeKind::Object => info
            .object
            .iter()
            .flatten()
            .flat_map(|f| direct_dependencies(&f.type_info))
            .collect(),
        _ => vec![],
    }
}

fn visit<'a>(
    program: &'a Program,
    name: &'a str,
    state: &mut HashMap<&'a str, VisitState>,
    reported: &mut HashSet<&'a str>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let Some(t) = program.types.get(name) else { return };
    state.insert(name, VisitState::InProgress);

    for field in &t.fields {
        for dep in direct_dependencies(&field.type_info) {
            match state.get(dep) {
                Some(VisitState::InProgress) => {
                    if reported.insert(name) {
                        diagnostics.push(Diagnostic::new(
                            &field.header.origin.range,
                            DiagnosticCode::E601TypeDependencyCycle,
                            format!("`{name}` has an unbreakable dependency cycle through field `{}` of type `{dep}`", field.header.name),
                        ));
                    }
                }
                Some(VisitState::Done) => {}
                None => {
                    if program.types.contains_key(dep) {
                        visit(program, dep, state, reported, diagnostics);
                    }
                }
            }
        }
    }

    state.insert(name, VisitState::Done);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{FieldSymbol, Header, Origin, TypeSymbol};
    use crate::ast::TypeDecl;
    use crate::position::{Position, Range};

    fn range() -> Range {
        Range::point(Position::new("a.vdl", 1, 1, 0))
    }

    fn field(name: &str, target: &str, array_dims: usize) -> FieldSymbol {
        FieldSymbol {
            header: Header { name: name.to_string(), origin: Origin { file: "a.vdl".into(), range: range() }, docstring: None, deprecated: None },
            optional: false,
            type_info: FieldTypeInfo {
                kind: FieldTypeKind::Custom,
                name: Some(target.to_string()),
                array_dims,
                map_value: None,
                object: None,
                resolved_type: Some(target.to_string()),
                resolved_enum: None,
            },
        }
    }

    fn object_field(name: &str, nested: Vec<FieldSymbol>) -> FieldSymbol {
        FieldSymbol {
            header: Header { name: name.to_string(), origin: Origin { file: "a.vdl".into(), range: range() }, docstring: None, deprecated: None },
            optional: false,
            type_info: FieldTypeInfo {
                kind: FieldTypeKind::Object,
                name: None,
                array_dims: 0,
                map_value: None,
                object: Some(nested),
                resolved_type: None,
                resolved_enum: None,
            },
        }
    }

    fn type_symbol(name: &str, fields: Vec<FieldSymbol>) -> TypeSymbol {
        TypeSymbol {
            header: Header { name: name.to_string(), origin: Origin { file: "a.vdl".into(), range: range() }, docstring: None, deprecated: None },
            ast: TypeDecl { range: range(), docstring: None, deprecated: None, name: name.to_string(), children: vec![] },
            fields,
            spreads: vec![],
        }
    }

    #[test]
    fn direct_cycle_is_reported() {
        let mut program = Program::default();
        program.types.insert("A".to_string(), type_symbol("A", vec![field("b", "B", 0)]));
        program.types.insert("B".to_string(), type_symbol("B", vec![field("a", "A", 0)]));
        let mut diagnostics = Vec::new();
        check(&program, &mut diagnostics);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagnosticCode::E601TypeDependencyCycle);
    }

    #[test]
    fn array_edge_breaks_the_cycle() {
        let mut program = Program::default();
        program.types.insert("A".to_string(), type_symbol("A", vec![field("b", "B", 1)]));
        program.types.insert("B".to_string(), type_symbol("B", vec![field("a", "A", 0)]));
        let mut diagnostics = Vec::new();
        check(&program, &mut diagnostics);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn cycle_through_inline_object_composition_is_reported() {
        let mut program = Program::default();
        program.types.insert("A".to_string(), type_symbol("A", vec![object_field("nested", vec![field("b", "A", 0)])]));
        let mut diagnostics = Vec::new();
        check(&program, &mut diagnostics);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagnosticCode::E601TypeDependencyCycle);
    }
}
