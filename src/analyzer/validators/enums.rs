//! Enum validation (spec §4.5 "Enums").
//!
//! All members of one enum must share a value kind (string XOR int);
//! integer enums require an explicit value on every member; string enums
//! default an absent value to the member's own name; duplicate member names
//! and duplicate member values are rejected.

use crate::analyzer::{EnumSymbol, Program};
use crate::ast::Literal;
use crate::diagnostics::{Diagnostic, DiagnosticCode};
use std::collections::HashMap;

pub fn check(program: &Program, diagnostics: &mut Vec<Diagnostic>) {
    for e in program.enums.values() {
        check_one(e, diagnostics);
    }
}

fn check_one(e: &EnumSymbol, diagnostics: &mut Vec<Diagnostic>) {
    let mut seen_names: HashMap<&str, &crate::position::Range> = HashMap::new();
    let mut seen_values: HashMap<&str, &crate::position::Range> = HashMap::new();
    let mut saw_string = false;
    let mut saw_int = false;

    for member in &e.ast.members {
        match &member.value {
            Some(Literal::Str(_)) | None => saw_string = true,
            Some(Literal::Int(_)) => saw_int = true,
            Some(Literal::Float(_)) | Some(Literal::Bool(_)) => {
                diagnostics.push(Diagnostic::new(
                    &member.range,
                    DiagnosticCode::E301MixedEnumValueKinds,
                    format!("enum member `{}` must have a string or int value", member.name),
                ));
            }
        }

        if let Some(prev) = seen_names.get(member.name.as_str()) {
            diagnostics.push(Diagnostic::new(
                &member.range,
                DiagnosticCode::E303DuplicateEnumMember,
                format!("duplicate enum member name `{}` (first declared at {prev})", member.name),
            ));
        } else {
            seen_names.insert(&member.name, &member.range);
        }
    }

    if saw_string && saw_int {
        diagnostics.push(Diagnostic::new(
            &e.header.origin.range,
            DiagnosticCode::E301MixedEnumValueKinds,
            format!("enum `{}` mixes string and int member values; pick one kind", e.header.name),
        ));
    }

    if saw_int {
        for member in &e.ast.members {
            if member.value.is_none() {
                diagnostics.push(Diagnostic::new(
                    &member.range,
                    DiagnosticCode::E302MissingEnumValue,
                    format!("integer enum member `{}` requires an explicit value", member.name),
                ));
            }
        }
    }

    for m in &e.members {
        if let Some(prev) = seen_values.get(m.value.as_str()) {
            diagnostics.push(Diagnostic::new(
                &m.range,
                DiagnosticCode::E303DuplicateEnumMember,
                format!("duplicate enum value `{}` (first used at {prev})", m.value),
            ));
        } else {
            seen_values.insert(&m.value, &m.range);
        }
    }
}
