//! Naming conventions (spec §4.5 "Naming").
//!
//! Types/enums/RPCs/procs/streams/patterns → PascalCase; fields → camelCase;
//! constants → UPPER_SNAKE_CASE; enum members → PascalCase. Leading
//! underscores and embedded underscores in non-constant names are rejected,
//! as is the wrong leading case.

use crate::analyzer::{FieldSymbol, Program};
use crate::diagnostics::{Diagnostic, DiagnosticCode};
use regex::Regex;
use std::sync::OnceLock;

fn pascal_case_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z][A-Za-z0-9]*$").unwrap())
}

fn camel_case_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z][A-Za-z0-9]*$").unwrap())
}

fn upper_snake_case_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z][A-Z0-9_]*$").unwrap())
}

pub fn check(program: &Program, diagnostics: &mut Vec<Diagnostic>) {
    for t in program.types.values() {
        check_name(&t.header.name, &t.header.origin.range, pascal_case_re(), "PascalCase", DiagnosticCode::E101InvalidTypeName, diagnostics);
        check_field_names(&t.fields, diagnostics);
    }
    for e in program.enums.values() {
        check_name(&e.header.name, &e.header.origin.range, pascal_case_re(), "PascalCase", DiagnosticCode::E101InvalidTypeName, diagnostics);
        for m in &e.members {
            check_name(&m.name, &m.range, pascal_case_re(), "PascalCase", DiagnosticCode::E104InvalidEnumMemberName, diagnostics);
        }
    }
    for c in program.consts.values() {
        check_name(&c.header.name, &c.header.origin.range, upper_snake_case_re(), "UPPER_SNAKE_CASE", DiagnosticCode::E103InvalidConstName, diagnostics);
    }
    for p in program.patterns.values() {
        check_name(&p.header.name, &p.header.origin.range, pascal_case_re(), "PascalCase", DiagnosticCode::E101InvalidTypeName, diagnostics);
    }
    for r in program.rpcs.values() {
        check_name(&r.header.name, &r.header.origin.range, pascal_case_re(), "PascalCase", DiagnosticCode::E101InvalidTypeName, diagnostics);
        for p in r.procs.values() {
            check_name(&p.header.name, &p.header.origin.range, pascal_case_re(), "PascalCase", DiagnosticCode::E101InvalidTypeName, diagnostics);
            check_field_names(&p.input, diagnostics);
            check_field_names(&p.output, diagnostics);
        }
        for s in r.streams.values() {
            check_name(&s.header.name, &s.header.origin.range, pascal_case_re(), "PascalCase", DiagnosticCode::E101InvalidTypeName, diagnostics);
            check_field_names(&s.input, diagnostics);
            check_field_names(&s.output, diagnostics);
        }
    }
}

/// Checks each field's own name, then descends into `type_info.object` so
/// fields nested inside an inline `{ ... }` object base get the same check
/// (mirrors the recursion `type_refs.rs::resolve_all_field_types` does for
/// type-reference resolution).
fn check_field_names(fields: &[FieldSymbol], diagnostics: &mut Vec<Diagnostic>) {
    for f in fields {
        check_name(&f.header.name, &f.header.origin.range, camel_case_re(), "camelCase", DiagnosticCode::E102InvalidFieldName, diagnostics);
        if let Some(nested) = &f.type_info.object {
            check_field_names(nested, diagnostics);
        }
    }
}

fn check_name(
    name: &str,
    range: &crate::position::Range,
    re: &Regex,
    expected: &str,
    code: DiagnosticCode,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if re.is_match(name) {
        return;
    }
    let reason = if name.starts_with('_') {
        "must not start with an underscore"
    } else if name.chars().next().is_some_and(|c| c.is_ascii_lowercase()) && expected != "camelCase" {
        "must start with an uppercase letter"
    } else if name.chars().next().is_some_and(|c| c.is_ascii_uppercase()) && expected == "camelCase" {
        "must start with a lowercase letter"
    } else if name.contains('_') {
        "must not contain underscores"
    } else {
        "does not match the required case"
    };
    diagnostics.push(Diagnostic::new(range, code, format!("`{name}` {reason} (expected {expected})")));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{FieldTypeInfo, FieldTypeKind, Header, Origin, Program, TypeSymbol};
    use crate::ast::TypeDecl;
    use crate::position::{Position, Range};

    #[test]
    fn pascal_case_accepts_and_rejects() {
        assert!(pascal_case_re().is_match("User"));
        assert!(pascal_case_re().is_match("UserV2"));
        assert!(!pascal_case_re().is_match("user"));
        assert!(!pascal_case_re().is_match("_User"));
        assert!(!pascal_case_re().is_match("User_Name"));
    }

    #[test]
    fn upper_snake_case_accepts_and_rejects() {
        assert!(upper_snake_case_re().is_match("MAX_SIZE"));
        assert!(!upper_snake_case_re().is_match("maxSize"));
        assert!(!upper_snake_case_re().is_match("_MAX"));
    }

    fn range() -> Range {
        Range::point(Position::new("a.vdl", 1, 1, 0))
    }

    fn primitive_field(name: &str) -> FieldSymbol {
        FieldSymbol {
            header: Header { name: name.to_string(), origin: Origin { file: "a.vdl".into(), range: range() }, docstring: None, deprecated: None },
            optional: false,
            type_info: FieldTypeInfo { kind: FieldTypeKind::Primitive, name: Some("string".to_string()), array_dims: 0, map_value: None, object: None, resolved_type: None, resolved_enum: None },
        }
    }

    fn object_field(name: &str, nested: Vec<FieldSymbol>) -> FieldSymbol {
        FieldSymbol {
            header: Header { name: name.to_string(), origin: Origin { file: "a.vdl".into(), range: range() }, docstring: None, deprecated: None },
            optional: false,
            type_info: FieldTypeInfo { kind: FieldTypeKind::Object, name: None, array_dims: 0, map_value: None, object: Some(nested), resolved_type: None, resolved_enum: None },
        }
    }

    #[test]
    fn rejects_a_bad_name_nested_inside_an_inline_object_field() {
        let mut program = Program::default();
        let field = object_field("nested", vec![primitive_field("Bad_Name")]);
        program.types.insert(
            "A".to_string(),
            TypeSymbol {
                header: Header { name: "A".to_string(), origin: Origin { file: "a.vdl".into(), range: range() }, docstring: None, deprecated: None },
                ast: TypeDecl { range: range(), docstring: None, deprecated: None, name: "A".to_string(), children: vec![] },
                fields: vec![field],
                spreads: vec![],
            },
        );
        let mut diagnostics = Vec::new();
        check(&program, &mut diagnostics);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagnosticCode::E102InvalidFieldName);
    }
}
