//! Program data model: the global, merged semantic view produced by the
//! analyzer (spec §3 "Program").
//!
//! Back-references (`resolved_type`/`resolved_enum`) are name keys, not
//! borrows: the Program owns every symbol in its top-level maps, and field
//! values navigate through those maps by name (spec §9 design note).

use crate::ast::{self};
use crate::position::Range;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Origin {
    pub file: PathBuf,
    pub range: Range,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeprecatedInfo {
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub origin: Origin,
    pub docstring: Option<String>,
    pub deprecated: Option<DeprecatedInfo>,
}

impl Header {
    pub fn from_decl(
        name: &str,
        file: &PathBuf,
        range: &Range,
        docstring: &Option<ast::Docstring>,
        deprecated: &Option<ast::Deprecated>,
    ) -> Self {
        Self {
            name: name.to_string(),
            origin: Origin { file: file.clone(), range: range.clone() },
            docstring: docstring.as_ref().map(|d| d.resolved.clone()),
            deprecated: deprecated.as_ref().map(|d| DeprecatedInfo { message: d.message.clone() }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueKind {
    String,
    Int,
    Float,
    Bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldTypeKind {
    Primitive,
    Custom,
    Map,
    Object,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldTypeInfo {
    pub kind: FieldTypeKind,
    pub name: Option<String>,
    pub array_dims: usize,
    pub map_value: Option<Box<FieldTypeInfo>>,
    pub object: Option<Vec<FieldSymbol>>,
    /// Populated post-validation when `kind == Custom` and `name` resolves
    /// to a registered type.
    pub resolved_type: Option<String>,
    /// Populated post-validation when `kind == Custom` and `name` resolves
    /// to a registered enum.
    pub resolved_enum: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSymbol {
    pub header: Header,
    pub optional: bool,
    pub type_info: FieldTypeInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadRef {
    pub type_name: String,
    pub range: Range,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeSymbol {
    pub header: Header,
    pub ast: ast::TypeDecl,
    pub fields: Vec<FieldSymbol>,
    pub spreads: Vec<SpreadRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumMemberSymbol {
    pub name: String,
    pub range: Range,
    pub docstring: Option<String>,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumSymbol {
    pub header: Header,
    pub ast: ast::EnumDecl,
    pub value_type: ValueKind,
    pub members: Vec<EnumMemberSymbol>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstSymbol {
    pub header: Header,
    pub value_type: ValueKind,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternSymbol {
    pub header: Header,
    pub template: String,
    pub placeholders: Vec<String>,
}

/// `ast` retains the original declaration so the IR builder can recurse
/// through spreads with full fidelity (spec §4.6); `input`/`output` are the
/// pre-expansion field symbols used for editor-facing type info.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcSymbol {
    pub header: Header,
    pub ast: ast::ProcDecl,
    pub input: Vec<FieldSymbol>,
    pub output: Vec<FieldSymbol>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamSymbol {
    pub header: Header,
    pub ast: ast::StreamDecl,
    pub input: Vec<FieldSymbol>,
    pub output: Vec<FieldSymbol>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcSymbol {
    pub header: Header,
    pub procs: HashMap<String, ProcSymbol>,
    pub streams: HashMap<String, StreamSymbol>,
    pub declared_in: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandaloneDoc {
    pub origin: Origin,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramFile {
    pub path: PathBuf,
    pub parsed: bool,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Program {
    pub entry_point: PathBuf,
    pub files: HashMap<PathBuf, ProgramFile>,
    pub types: HashMap<String, TypeSymbol>,
    pub enums: HashMap<String, EnumSymbol>,
    pub consts: HashMap<String, ConstSymbol>,
    pub patterns: HashMap<String, PatternSymbol>,
    pub rpcs: HashMap<String, RpcSymbol>,
    pub standalone_docs: Vec<StandaloneDoc>,
}

impl Program {
    pub fn is_primitive_or_registered(&self, name: &str) -> bool {
        ast::FieldTypeBase::is_primitive_named(name) || self.types.contains_key(name) || self.enums.contains_key(name)
    }
}
