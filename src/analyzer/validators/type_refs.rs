//! Type reference resolution (spec §4.5 "Type references").
//!
//! Resolves every `Custom` field base to a registered type or enum,
//! stitching `resolved_type`/`resolved_enum` onto each `FieldTypeInfo` so
//! editor "go to definition" is O(1) (spec §4.5 "back-references"). Also
//! validates that spread targets resolve to a type, and that recursively
//! expanding a type's spreads does not produce conflicting field names.

use crate::analyzer::{FieldTypeInfo, FieldTypeKind, Program};
use crate::ast::TypeChild;
use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::position::Range;
use std::collections::HashSet;

pub fn check(program: &mut Program, diagnostics: &mut Vec<Diagnostic>) {
    resolve_all_field_types(program, diagnostics);
    check_spread_targets(program, diagnostics);
    check_spread_field_conflicts(program, diagnostics);
    check_block_field_conflicts(program, diagnostics);
}

fn resolve_all_field_types(program: &mut Program, diagnostics: &mut Vec<Diagnostic>) {
    let type_names: HashSet<String> = program.types.keys().cloned().collect();
    let enum_names: HashSet<String> = program.enums.keys().cloned().collect();

    for t in program.types.values_mut() {
        for f in &mut t.fields {
            resolve_field_type_info(&mut f.type_info, &f.header.origin.range, &type_names, &enum_names, diagnostics);
        }
    }
    for r in program.rpcs.values_mut() {
        for p in r.procs.values_mut() {
            for f in p.input.iter_mut().chain(p.output.iter_mut()) {
                resolve_field_type_info(&mut f.type_info, &f.header.origin.range, &type_names, &enum_names, diagnostics);
            }
        }
        for s in r.streams.values_mut() {
            for f in s.input.iter_mut().chain(s.output.iter_mut()) {
                resolve_field_type_info(&mut f.type_info, &f.header.origin.range, &type_names, &enum_names, diagnostics);
            }
        }
    }
}

fn resolve_field_type_info(
    info: &mut FieldTypeInfo,
    range: &Range,
    type_names: &HashSet<String>,
    enum_names: &HashSet<String>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    match info.kind {
        FieldTypeKind::Custom => {
            let name = info.name.clone().unwrap_or_default();
            if type_names.contains(&name) {
                info.resolved_type = Some(name);
            } else if enum_names.contains(&name) {
                info.resolved_enum = Some(name);
            } else {
                diagnostics.push(Diagnostic::new(
                    range,
                    DiagnosticCode::E201UndeclaredType,
                    format!("undeclared type or enum `{name}`"),
                ));
            }
        }
        FieldTypeKind::Map => {
            if let Some(inner) = &mut info.map_value {
                resolve_field_type_info(inner, range, type_names, enum_names, diagnostics);
            }
        }
        FieldTypeKind::Object => {
            if let Some(fields) = &mut info.object {
                for f in fields {
                    resolve_field_type_info(&mut f.type_info, &f.header.origin.range, type_names, enum_names, diagnostics);
                }
            }
        }
        FieldTypeKind::Primitive => {}
    }
}

fn check_spread_targets(program: &Program, diagnostics: &mut Vec<Diagnostic>) {
    for t in program.types.values() {
        for spread in &t.spreads {
            if !program.types.contains_key(&spread.type_name) {
                diagnostics.push(Diagnostic::new(
                    &spread.range,
                    DiagnosticCode::E202MissingSpreadTarget,
                    format!("spread target `{}` is not a declared type", spread.type_name),
                ));
            }
        }
    }
}

/// Recursively expand `children`'s spreads into a flat list of `(field
/// name, range)`, breaking cycles via `visited` (a direct or indirect
/// self-spread is reported separately by the spread-cycle validator; here
/// we simply stop recursing rather than looping forever, per spec §9).
fn flatten_names(program: &Program, children: &[TypeChild], visited: &mut HashSet<String>) -> Vec<(String, Range)> {
    let mut out = Vec::new();
    for child in children {
        match child {
            TypeChild::Field(f) => out.push((f.name.clone(), f.range.clone())),
            TypeChild::Spread(s) => {
                if visited.contains(&s.type_name) {
                    continue;
                }
                if let Some(target) = program.types.get(&s.type_name) {
                    visited.insert(s.type_name.clone());
                    out.extend(flatten_names(program, &target.ast.children, visited));
                    visited.remove(&s.type_name);
                }
            }
            TypeChild::Comment(_) => {}
        }
    }
    out
}

fn report_conflicts(flattened: &[(String, Range)], code: DiagnosticCode, diagnostics: &mut Vec<Diagnostic>) {
    let mut seen: std::collections::HashMap<&str, &Range> = std::collections::HashMap::new();
    for (name, range) in flattened {
        if let Some(prev) = seen.get(name.as_str()) {
            diagnostics.push(Diagnostic::new(
                range,
                code,
                format!("field `{name}` conflicts with a field of the same name introduced at {prev}"),
            ));
        } else {
            seen.insert(name, range);
        }
    }
}

fn check_spread_field_conflicts(program: &Program, diagnostics: &mut Vec<Diagnostic>) {
    for t in program.types.values() {
        if t.spreads.is_empty() {
            continue;
        }
        let mut visited = HashSet::new();
        visited.insert(t.header.name.clone());
        let flattened = flatten_names(program, &t.ast.children, &mut visited);
        report_conflicts(&flattened, DiagnosticCode::E203SpreadFieldConflict, diagnostics);
    }
}

fn check_block_field_conflicts(program: &Program, diagnostics: &mut Vec<Diagnostic>) {
    for r in program.rpcs.values() {
        for p in r.procs.values() {
            check_ast_block(program, p.ast.primary_input(), diagnostics);
            check_ast_block(program, p.ast.primary_output(), diagnostics);
        }
        for s in r.streams.values() {
            check_ast_block(program, s.ast.primary_input(), diagnostics);
            check_ast_block(program, s.ast.primary_output(), diagnostics);
        }
    }
}

fn check_ast_block(program: &Program, block: Option<&crate::ast::Block>, diagnostics: &mut Vec<Diagnostic>) {
    let Some(block) = block else { return };
    let mut visited = HashSet::new();
    let flattened = flatten_names(program, &block.children, &mut visited);
    report_conflicts(&flattened, DiagnosticCode::E703DuplicateFieldName, diagnostics);
}
