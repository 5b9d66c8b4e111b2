//! Phase 4: three passes over a resolved [`crate::resolver::FileSet`]
//! producing a [`Program`] plus diagnostics (spec §4.5).
//!
//! Pass 1 collects symbols (best-effort, spec §7: every syntactically valid
//! declaration is registered regardless of later errors). Pass 2 runs every
//! validator, independently, so multiple problems surface in one run. Pass 3
//! assembles the final `Program`. Validator order is fixed (spec §5):
//! naming → enums → references → spread cycles → RPC structure →
//! dependency cycles → patterns.

pub mod symbols;
mod validators;

pub use symbols::*;

use crate::ast::{self, SchemaItem};
use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::resolver::FileSet;

pub fn analyze(file_set: &FileSet) -> (Program, Vec<Diagnostic>) {
    let mut program = Program {
        entry_point: file_set.entry_point.clone(),
        ..Program::default()
    };
    let mut diagnostics = Vec::new();

    for path in &file_set.visit_order {
        let file = &file_set.files[path];
        program.files.insert(
            path.clone(),
            ProgramFile { path: path.clone(), parsed: file.ast.is_some() },
        );
        let Some(ast) = &file.ast else { continue };
        collect_file(&mut program, path, ast, &mut diagnostics);
    }

    tracing::debug!(
        types = program.types.len(),
        enums = program.enums.len(),
        rpcs = program.rpcs.len(),
        "analyzer: pass 1 complete"
    );

    validators::naming::check(&program, &mut diagnostics);
    validators::enums::check(&program, &mut diagnostics);
    validators::type_refs::check(&mut program, &mut diagnostics);
    validators::spread_cycles::check(&program, &mut diagnostics);
    validators::rpc_structure::check(&program, &mut diagnostics);
    validators::dependency_cycles::check(&program, &mut diagnostics);
    validators::patterns::check(&program, &mut diagnostics);

    (program, diagnostics)
}

fn collect_file(
    program: &mut Program,
    path: &std::path::Path,
    ast: &ast::Schema,
    diagnostics: &mut Vec<Diagnostic>,
) {
    for item in &ast.items {
        match item {
            SchemaItem::Include(_) | SchemaItem::Comment(_) => {}
            SchemaItem::Docstring(d) => {
                program.standalone_docs.push(StandaloneDoc {
                    origin: Origin { file: path.to_path_buf(), range: d.range.clone() },
                    text: d.resolved.clone(),
                });
            }
            SchemaItem::Type(t) => insert_unique(
                &mut program.types,
                t.name.clone(),
                build_type_symbol(path, t),
                DiagnosticCode::E801DuplicateType,
                diagnostics,
            ),
            SchemaItem::Enum(e) => insert_unique(
                &mut program.enums,
                e.name.clone(),
                build_enum_symbol(path, e),
                DiagnosticCode::E802DuplicateEnum,
                diagnostics,
            ),
            SchemaItem::Const(c) => insert_unique(
                &mut program.consts,
                c.name.clone(),
                build_const_symbol(path, c),
                DiagnosticCode::E803DuplicateConst,
                diagnostics,
            ),
            SchemaItem::Pattern(p) => insert_unique(
                &mut program.patterns,
                p.name.clone(),
                build_pattern_symbol(path, p),
                DiagnosticCode::E804DuplicatePattern,
                diagnostics,
            ),
            SchemaItem::Rpc(r) => merge_rpc(program, path, r, diagnostics),
        }
    }
}

fn insert_unique<T>(
    map: &mut std::collections::HashMap<String, T>,
    name: String,
    symbol: T,
    code: DiagnosticCode,
    diagnostics: &mut Vec<Diagnostic>,
) where
    T: HasOrigin,
{
    if let Some(existing) = map.get(&name) {
        let origin = existing.origin();
        diagnostics.push(Diagnostic::new(
            &symbol.origin().range,
            code,
            format!(
                "`{name}` is already declared at {}:{}:{}",
                origin.file.display(),
                origin.range.start.line,
                origin.range.start.column
            ),
        ));
        return;
    }
    map.insert(name, symbol);
}

trait HasOrigin {
    fn origin(&self) -> &Origin;
}
impl HasOrigin for TypeSymbol {
    fn origin(&self) -> &Origin {
        &self.header.origin
    }
}
impl HasOrigin for EnumSymbol {
    fn origin(&self) -> &Origin {
        &self.header.origin
    }
}
impl HasOrigin for ConstSymbol {
    fn origin(&self) -> &Origin {
        &self.header.origin
    }
}
impl HasOrigin for PatternSymbol {
    fn origin(&self) -> &Origin {
        &self.header.origin
    }
}

fn build_type_symbol(path: &std::path::Path, t: &ast::TypeDecl) -> TypeSymbol {
    let header = Header::from_decl(&t.name, &path.to_path_buf(), &t.range, &t.docstring, &t.deprecated);
    let mut fields = Vec::new();
    let mut spreads = Vec::new();
    for child in &t.children {
        match child {
            ast::TypeChild::Field(f) => fields.push(build_field_symbol(path, f)),
            ast::TypeChild::Spread(s) => spreads.push(SpreadRef { type_name: s.type_name.clone(), range: s.range.clone() }),
            ast::TypeChild::Comment(_) => {}
        }
    }
    TypeSymbol { header, ast: t.clone(), fields, spreads }
}

fn build_field_symbol(path: &std::path::Path, f: &ast::Field) -> FieldSymbol {
    let header = Header::from_decl(&f.name, &path.to_path_buf(), &f.range, &f.docstring, &None);
    FieldSymbol {
        header,
        optional: f.optional,
        type_info: build_field_type_info(path, &f.field_type),
    }
}

fn build_field_type_info(path: &std::path::Path, ft: &ast::FieldType) -> FieldTypeInfo {
    let (kind, name, map_value, object) = match &ft.base {
        ast::FieldTypeBase::Named(n) => {
            let kind = if ast::FieldTypeBase::is_primitive_named(n) {
                FieldTypeKind::Primitive
            } else {
                FieldTypeKind::Custom
            };
            (kind, Some(n.clone()), None, None)
        }
        ast::FieldTypeBase::Map(inner) => (
            FieldTypeKind::Map,
            None,
            Some(Box::new(build_field_type_info(path, inner))),
            None,
        ),
        ast::FieldTypeBase::Object(children) => {
            let fields = children
                .iter()
                .filter_map(|c| match c {
                    ast::TypeChild::Field(f) => Some(build_field_symbol(path, f)),
                    _ => None,
                })
                .collect();
            (FieldTypeKind::Object, None, None, Some(fields))
        }
    };
    FieldTypeInfo {
        kind,
        name,
        array_dims: ft.array_dims,
        map_value,
        object,
        resolved_type: None,
        resolved_enum: None,
    }
}

fn build_enum_symbol(path: &std::path::Path, e: &ast::EnumDecl) -> EnumSymbol {
    let header = Header::from_decl(&e.name, &path.to_path_buf(), &e.range, &e.docstring, &e.deprecated);
    let is_int = e.members.iter().any(|m| matches!(m.value, Some(ast::Literal::Int(_))));
    let value_type = if is_int { ValueKind::Int } else { ValueKind::String };
    let members = e
        .members
        .iter()
        .map(|m| EnumMemberSymbol {
            name: m.name.clone(),
            range: m.range.clone(),
            docstring: m.docstring.as_ref().map(|d| d.resolved.clone()),
            value: match &m.value {
                Some(ast::Literal::Str(s)) => s.clone(),
                Some(ast::Literal::Int(i)) => i.to_string(),
                Some(ast::Literal::Float(f)) => f.to_string(),
                Some(ast::Literal::Bool(b)) => b.to_string(),
                None => m.name.clone(),
            },
        })
        .collect();
    EnumSymbol { header, ast: e.clone(), value_type, members }
}

fn literal_value_kind(lit: &ast::Literal) -> (ValueKind, String) {
    match lit {
        ast::Literal::Str(s) => (ValueKind::String, s.clone()),
        ast::Literal::Int(i) => (ValueKind::Int, i.to_string()),
        ast::Literal::Float(f) => (ValueKind::Float, f.to_string()),
        ast::Literal::Bool(b) => (ValueKind::Bool, b.to_string()),
    }
}

fn build_const_symbol(path: &std::path::Path, c: &ast::ConstDecl) -> ConstSymbol {
    let header = Header::from_decl(&c.name, &path.to_path_buf(), &c.range, &c.docstring, &c.deprecated);
    let (value_type, value) = literal_value_kind(&c.value);
    ConstSymbol { header, value_type, value }
}

fn build_pattern_symbol(path: &std::path::Path, p: &ast::PatternDecl) -> PatternSymbol {
    let header = Header::from_decl(&p.name, &path.to_path_buf(), &p.range, &p.docstring, &p.deprecated);
    let placeholders = validators::patterns::extract_placeholders(&p.template);
    PatternSymbol { header, template: p.template.clone(), placeholders }
}

fn merge_rpc(program: &mut Program, path: &std::path::Path, r: &ast::RpcDecl, diagnostics: &mut Vec<Diagnostic>) {
    let entry = program.rpcs.entry(r.name.clone()).or_insert_with(|| RpcSymbol {
        header: Header::from_decl(&r.name, &path.to_path_buf(), &r.range, &r.docstring, &r.deprecated),
        procs: std::collections::HashMap::new(),
        streams: std::collections::HashMap::new(),
        declared_in: Vec::new(),
    });
    if !entry.declared_in.contains(&path.to_path_buf()) {
        entry.declared_in.push(path.to_path_buf());
    }

    for child in &r.children {
        match child {
            ast::RpcChild::Proc(p) => {
                let symbol = ProcSymbol {
                    header: Header::from_decl(&p.name, &path.to_path_buf(), &p.range, &p.docstring, &p.deprecated),
                    ast: p.clone(),
                    input: p.primary_input().map(|b| build_block_fields(path, b)).unwrap_or_default(),
                    output: p.primary_output().map(|b| build_block_fields(path, b)).unwrap_or_default(),
                };
                if let Some(existing) = entry.procs.get(&p.name) {
                    diagnostics.push(duplicate_member_diagnostic(&p.range, DiagnosticCode::E501DuplicateProc, &p.name, &existing.header.origin));
                } else {
                    entry.procs.insert(p.name.clone(), symbol);
                }
            }
            ast::RpcChild::Stream(s) => {
                let symbol = StreamSymbol {
                    header: Header::from_decl(&s.name, &path.to_path_buf(), &s.range, &s.docstring, &s.deprecated),
                    ast: s.clone(),
                    input: s.primary_input().map(|b| build_block_fields(path, b)).unwrap_or_default(),
                    output: s.primary_output().map(|b| build_block_fields(path, b)).unwrap_or_default(),
                };
                if let Some(existing) = entry.streams.get(&s.name) {
                    diagnostics.push(duplicate_member_diagnostic(&s.range, DiagnosticCode::E502DuplicateStream, &s.name, &existing.header.origin));
                } else {
                    entry.streams.insert(s.name.clone(), symbol);
                }
            }
            ast::RpcChild::Comment(_) => {}
            ast::RpcChild::Docstring(d) => {
                program.standalone_docs.push(StandaloneDoc {
                    origin: Origin { file: path.to_path_buf(), range: d.range.clone() },
                    text: d.resolved.clone(),
                });
            }
        }
    }
}

fn duplicate_member_diagnostic(range: &crate::position::Range, code: DiagnosticCode, name: &str, origin: &Origin) -> Diagnostic {
    Diagnostic::new(
        range,
        code,
        format!(
            "`{name}` is already declared in this rpc at {}:{}:{}",
            origin.file.display(),
            origin.range.start.line,
            origin.range.start.column
        ),
    )
}

fn build_block_fields(path: &std::path::Path, b: &ast::Block) -> Vec<FieldSymbol> {
    b.children
        .iter()
        .filter_map(|c| match c {
            ast::TypeChild::Field(f) => Some(build_field_symbol(path, f)),
            _ => None,
        })
        .collect()
}
