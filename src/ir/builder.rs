//! Program → IR flattening (spec §4.6).

use super::types::{
    Const, Enum, EnumMember, Field, FieldType, FieldTypeBase, Ir, Pattern, Primitive, Procedure,
    Rpc, Stream, Type, ValueKind,
};
use crate::analyzer::{self, Program};
use crate::ast;
use std::collections::HashSet;

pub fn build(program: &Program) -> Ir {
    let mut types: Vec<Type> = program
        .types
        .iter()
        .map(|(name, sym)| {
            let mut visited = HashSet::new();
            visited.insert(name.clone());
            Type {
                name: name.clone(),
                doc: sym.header.docstring.as_deref().map(normalize_doc),
                fields: flatten_fields(program, &sym.ast.children, &mut visited),
            }
        })
        .collect();
    types.sort_by(|a, b| a.name.cmp(&b.name));

    let mut enums: Vec<Enum> = program
        .enums
        .values()
        .map(|e| Enum {
            name: e.header.name.clone(),
            doc: e.header.docstring.as_deref().map(normalize_doc),
            value_type: convert_value_kind(e.value_type),
            members: e
                .members
                .iter()
                .map(|m| EnumMember {
                    name: m.name.clone(),
                    doc: m.docstring.as_deref().map(normalize_doc),
                    value: m.value.clone(),
                })
                .collect(),
        })
        .collect();
    enums.sort_by(|a, b| a.name.cmp(&b.name));

    let mut consts: Vec<Const> = program
        .consts
        .values()
        .map(|c| Const {
            name: c.header.name.clone(),
            doc: c.header.docstring.as_deref().map(normalize_doc),
            value_type: convert_value_kind(c.value_type),
            value: c.value.clone(),
        })
        .collect();
    consts.sort_by(|a, b| a.name.cmp(&b.name));

    let mut patterns: Vec<Pattern> = program
        .patterns
        .values()
        .map(|p| Pattern {
            name: p.header.name.clone(),
            doc: p.header.docstring.as_deref().map(normalize_doc),
            template: p.template.clone(),
            placeholders: p.placeholders.clone(),
        })
        .collect();
    patterns.sort_by(|a, b| a.name.cmp(&b.name));

    let mut rpcs = Vec::new();
    let mut procedures = Vec::new();
    let mut streams = Vec::new();
    for r in program.rpcs.values() {
        rpcs.push(Rpc {
            name: r.header.name.clone(),
            doc: r.header.docstring.as_deref().map(normalize_doc),
        });
        for p in r.procs.values() {
            procedures.push(Procedure {
                id: hoisted_id(&r.header.name, &p.header.name),
                rpc_name: r.header.name.clone(),
                name: p.header.name.clone(),
                doc: p.header.docstring.as_deref().map(normalize_doc),
                input: flatten_block(program, p.ast.primary_input()),
                output: flatten_block(program, p.ast.primary_output()),
            });
        }
        for s in r.streams.values() {
            streams.push(Stream {
                id: hoisted_id(&r.header.name, &s.header.name),
                rpc_name: r.header.name.clone(),
                name: s.header.name.clone(),
                doc: s.header.docstring.as_deref().map(normalize_doc),
                input: flatten_block(program, s.ast.primary_input()),
                output: flatten_block(program, s.ast.primary_output()),
            });
        }
    }
    rpcs.sort_by(|a, b| a.name.cmp(&b.name));
    procedures.sort_by(|a, b| (a.rpc_name.as_str(), a.name.as_str()).cmp(&(b.rpc_name.as_str(), b.name.as_str())));
    streams.sort_by(|a, b| (a.rpc_name.as_str(), a.name.as_str()).cmp(&(b.rpc_name.as_str(), b.name.as_str())));

    Ir { types, enums, consts, patterns, rpcs, procedures, streams }
}

/// JSON Schema document for [`Ir`], generated by reflection so it can never
/// drift from the actual wire shape (spec §6 "IR JSON Schema").
pub fn json_schema() -> schemars::Schema {
    schemars::schema_for!(Ir)
}

fn hoisted_id(rpc_name: &str, member_name: &str) -> String {
    format!("{rpc_name}_{member_name}")
}

fn flatten_block(program: &Program, block: Option<&ast::Block>) -> Vec<Field> {
    let Some(block) = block else { return Vec::new() };
    let mut visited = HashSet::new();
    flatten_fields(program, &block.children, &mut visited)
}

fn flatten_fields(program: &Program, children: &[ast::TypeChild], visited: &mut HashSet<String>) -> Vec<Field> {
    let mut out = Vec::new();
    for child in children {
        match child {
            ast::TypeChild::Field(f) => out.push(build_field(program, f, visited)),
            ast::TypeChild::Spread(s) => {
                if visited.contains(&s.type_name) {
                    continue;
                }
                if let Some(target) = program.types.get(&s.type_name) {
                    visited.insert(s.type_name.clone());
                    out.extend(flatten_fields(program, &target.ast.children, visited));
                    visited.remove(&s.type_name);
                }
            }
            ast::TypeChild::Comment(_) => {}
        }
    }
    out
}

fn build_field(program: &Program, f: &ast::Field, visited: &mut HashSet<String>) -> Field {
    Field {
        name: f.name.clone(),
        doc: f.docstring.as_ref().map(|d| normalize_doc(&d.resolved)),
        optional: f.optional,
        field_type: build_field_type(program, &f.field_type, visited),
    }
}

fn build_field_type(program: &Program, ft: &ast::FieldType, visited: &mut HashSet<String>) -> FieldType {
    FieldType { base: build_field_type_base(program, &ft.base, visited), array_dims: ft.array_dims }
}

fn build_field_type_base(program: &Program, base: &ast::FieldTypeBase, visited: &mut HashSet<String>) -> FieldTypeBase {
    match base {
        ast::FieldTypeBase::Named(n) => {
            if ast::FieldTypeBase::is_primitive_named(n) {
                FieldTypeBase::Primitive { name: primitive_from_name(n) }
            } else {
                FieldTypeBase::Named { name: n.clone() }
            }
        }
        ast::FieldTypeBase::Map(inner) => FieldTypeBase::Map { value: Box::new(build_field_type(program, inner, visited)) },
        ast::FieldTypeBase::Object(children) => FieldTypeBase::Object { fields: flatten_fields(program, children, visited) },
    }
}

fn primitive_from_name(name: &str) -> Primitive {
    match name {
        "string" => Primitive::String,
        "int" => Primitive::Int,
        "float" => Primitive::Float,
        "bool" => Primitive::Bool,
        "datetime" => Primitive::Datetime,
        other => unreachable!("not a primitive name: {other}"),
    }
}

fn convert_value_kind(v: analyzer::ValueKind) -> ValueKind {
    match v {
        analyzer::ValueKind::String => ValueKind::String,
        analyzer::ValueKind::Int => ValueKind::Int,
        analyzer::ValueKind::Float => ValueKind::Float,
        analyzer::ValueKind::Bool => ValueKind::Bool,
    }
}

/// Dedents `raw` to its common leading whitespace and trims blank lines
/// from both ends (spec §4.6 "Doc normalization").
fn normalize_doc(raw: &str) -> String {
    let lines: Vec<&str> = raw.lines().collect();
    let indent = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);
    let dedented: Vec<&str> = lines.iter().map(|l| l.get(indent..).unwrap_or(l.trim_start())).collect();

    let start = dedented.iter().position(|l| !l.trim().is_empty()).unwrap_or(dedented.len());
    let end = dedented.iter().rposition(|l| !l.trim().is_empty()).map(|i| i + 1).unwrap_or(start);

    dedented[start..end].join("\n")
}
